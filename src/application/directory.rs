use crate::domain::ports::StudentStoreBox;
use crate::domain::student::{Student, StudentId};
use crate::error::Result;

/// Keeps one record per student, keyed by email or phone.
pub struct StudentDirectory {
    store: StudentStoreBox,
}

impl StudentDirectory {
    pub fn new(store: StudentStoreBox) -> Self {
        Self { store }
    }

    /// Inserts the record, or updates the existing one matched by identity
    /// key. Email match takes priority over phone match: when the incoming
    /// email already belongs to a record with a different phone, that
    /// record wins and its phone is overwritten.
    pub async fn upsert(&self, mut student: Student) -> Result<StudentId> {
        match self.find_by_identity(&student.email, &student.phone).await? {
            Some(existing) => {
                student.id = existing.id;
                self.store.update(student).await?;
                Ok(existing.id)
            }
            None => self.store.insert(student).await,
        }
    }

    /// Resolves a record by its identity key, email first.
    pub async fn find_by_identity(&self, email: &str, phone: &str) -> Result<Option<Student>> {
        if !email.trim().is_empty() {
            if let Some(found) = self.store.find_by_email(email.trim()).await? {
                return Ok(Some(found));
            }
        }
        if !phone.trim().is_empty() {
            if let Some(found) = self.store.find_by_phone(phone.trim()).await? {
                return Ok(Some(found));
            }
        }
        Ok(None)
    }

    /// Case-insensitive exact match on name, email, phone or alternate
    /// phone. Lowest id wins when several records match.
    pub async fn find_exact(&self, query: &str) -> Result<Option<Student>> {
        let query = query.trim();
        Ok(self
            .store
            .all()
            .await?
            .into_iter()
            .find(|s| s.matches_exact(query)))
    }

    /// Case-insensitive substring match on the same four fields. Lowest id
    /// wins, keeping the result deterministic under multiple matches.
    pub async fn find_fuzzy(&self, query: &str) -> Result<Option<Student>> {
        let query = query.trim();
        Ok(self
            .store
            .all()
            .await?
            .into_iter()
            .find(|s| s.matches_fuzzy(query)))
    }

    /// Exact match first, substring fallback.
    pub async fn lookup(&self, query: &str) -> Result<Option<Student>> {
        if let Some(found) = self.find_exact(query).await? {
            return Ok(Some(found));
        }
        self.find_fuzzy(query).await
    }

    pub async fn update(&self, student: Student) -> Result<()> {
        self.store.update(student).await
    }

    pub async fn clear(&self) -> Result<()> {
        self.store.clear().await
    }
}
