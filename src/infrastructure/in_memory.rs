use crate::domain::payment::Payment;
use crate::domain::ports::{CounterStore, PaymentStore, StudentStore};
use crate::domain::student::{Student, StudentId};
use crate::error::Result;
use async_trait::async_trait;
use std::collections::BTreeMap;
use std::sync::Arc;
use tokio::sync::RwLock;

/// A thread-safe in-memory student table.
///
/// Uses `Arc<RwLock<BTreeMap<..>>>` for shared concurrent access; the
/// BTreeMap keeps `all` in ascending id order. Ideal for tests and for
/// one-shot runs where persistence is not required.
#[derive(Default, Clone)]
pub struct InMemoryStudentStore {
    inner: Arc<RwLock<StudentTable>>,
}

#[derive(Default)]
struct StudentTable {
    rows: BTreeMap<StudentId, Student>,
    next_id: StudentId,
}

impl InMemoryStudentStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl StudentStore for InMemoryStudentStore {
    async fn insert(&self, mut student: Student) -> Result<StudentId> {
        let mut table = self.inner.write().await;
        table.next_id += 1;
        let id = table.next_id;
        student.id = id;
        table.rows.insert(id, student);
        Ok(id)
    }

    async fn update(&self, student: Student) -> Result<()> {
        let mut table = self.inner.write().await;
        table.rows.insert(student.id, student);
        Ok(())
    }

    async fn get(&self, id: StudentId) -> Result<Option<Student>> {
        let table = self.inner.read().await;
        Ok(table.rows.get(&id).cloned())
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<Student>> {
        if email.is_empty() {
            return Ok(None);
        }
        let table = self.inner.read().await;
        Ok(table
            .rows
            .values()
            .find(|s| !s.email.is_empty() && s.email.eq_ignore_ascii_case(email))
            .cloned())
    }

    async fn find_by_phone(&self, phone: &str) -> Result<Option<Student>> {
        if phone.is_empty() {
            return Ok(None);
        }
        let table = self.inner.read().await;
        Ok(table
            .rows
            .values()
            .find(|s| !s.phone.is_empty() && s.phone == phone)
            .cloned())
    }

    async fn all(&self) -> Result<Vec<Student>> {
        let table = self.inner.read().await;
        Ok(table.rows.values().cloned().collect())
    }

    async fn clear(&self) -> Result<()> {
        let mut table = self.inner.write().await;
        table.rows.clear();
        table.next_id = 0;
        Ok(())
    }
}

/// A thread-safe in-memory payment ledger, append-only by construction.
#[derive(Default, Clone)]
pub struct InMemoryPaymentStore {
    rows: Arc<RwLock<Vec<Payment>>>,
}

impl InMemoryPaymentStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl PaymentStore for InMemoryPaymentStore {
    async fn append(&self, mut payment: Payment) -> Result<i64> {
        let mut rows = self.rows.write().await;
        let id = rows.len() as i64 + 1;
        payment.id = id;
        rows.push(payment);
        Ok(id)
    }

    async fn for_student(&self, student: StudentId) -> Result<Vec<Payment>> {
        let rows = self.rows.read().await;
        Ok(rows.iter().filter(|p| p.student == student).cloned().collect())
    }

    async fn clear(&self) -> Result<()> {
        let mut rows = self.rows.write().await;
        rows.clear();
        Ok(())
    }
}

/// A thread-safe in-memory invoice counter. 0 means "not initialized yet";
/// the first load sets it to 1, matching the behavior of a counter file
/// that does not exist yet.
#[derive(Default, Clone)]
pub struct InMemoryCounterStore {
    value: Arc<RwLock<u64>>,
}

impl InMemoryCounterStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl CounterStore for InMemoryCounterStore {
    async fn load(&self) -> Result<u64> {
        let mut value = self.value.write().await;
        if *value == 0 {
            *value = 1;
        }
        Ok(*value)
    }

    async fn save(&self, new_value: u64) -> Result<()> {
        let mut value = self.value.write().await;
        *value = new_value;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn student(email: &str, phone: &str) -> Student {
        Student {
            id: 0,
            name: "Asha Rao".into(),
            address: String::new(),
            email: email.into(),
            phone: phone.into(),
            alt_phone: String::new(),
            course: String::new(),
            duration: String::new(),
            joining_date: String::new(),
            fee: 0,
            discount: 0,
            approved: String::new(),
            total_installments: 0,
            salutation: String::new(),
        }
    }

    #[tokio::test]
    async fn test_student_store_assigns_ascending_ids() {
        let store = InMemoryStudentStore::new();
        let a = store.insert(student("a@example.com", "")).await.unwrap();
        let b = store.insert(student("b@example.com", "")).await.unwrap();
        assert!(b > a);

        let all = store.all().await.unwrap();
        assert_eq!(all.len(), 2);
        assert_eq!(all[0].id, a);
        assert_eq!(all[1].id, b);
    }

    #[tokio::test]
    async fn test_student_store_email_lookup_is_case_insensitive() {
        let store = InMemoryStudentStore::new();
        store.insert(student("Asha@Example.com", "")).await.unwrap();
        assert!(store
            .find_by_email("asha@example.com")
            .await
            .unwrap()
            .is_some());
        assert!(store.find_by_email("").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_student_store_empty_fields_never_match() {
        let store = InMemoryStudentStore::new();
        store.insert(student("", "9876543210")).await.unwrap();
        assert!(store.find_by_email("").await.unwrap().is_none());
        assert!(store.find_by_phone("9876543210").await.unwrap().is_some());
    }

    #[tokio::test]
    async fn test_payment_store_preserves_insertion_order() {
        let store = InMemoryPaymentStore::new();
        for amount in [100, 200, 300] {
            store
                .append(Payment {
                    id: 0,
                    student: 1,
                    invoice: crate::domain::invoice::InvoiceId::from_counter(1),
                    amount,
                    date: "2025-01-10".into(),
                })
                .await
                .unwrap();
        }
        let rows = store.for_student(1).await.unwrap();
        let amounts: Vec<i64> = rows.iter().map(|p| p.amount).collect();
        assert_eq!(amounts, vec![100, 200, 300]);
        assert!(rows.windows(2).all(|w| w[0].id < w[1].id));
    }

    #[tokio::test]
    async fn test_counter_store_initializes_to_one() {
        let store = InMemoryCounterStore::new();
        assert_eq!(store.load().await.unwrap(), 1);
        store.save(5).await.unwrap();
        assert_eq!(store.load().await.unwrap(), 5);
    }
}
