use crate::domain::payment::Payment;
use crate::domain::student::{Student, StudentId};
use crate::error::Result;
use async_trait::async_trait;

/// Storage port for the student collection.
///
/// Implementations must keep email and phone each unique across the
/// collection and return rows in ascending id order from `all`.
#[async_trait]
pub trait StudentStore: Send + Sync {
    /// Inserts a new record and returns the assigned id. The incoming
    /// `id` field is ignored.
    async fn insert(&self, student: Student) -> Result<StudentId>;
    /// Replaces the record with the same id in place.
    async fn update(&self, student: Student) -> Result<()>;
    async fn get(&self, id: StudentId) -> Result<Option<Student>>;
    /// Case-insensitive match on a non-empty email.
    async fn find_by_email(&self, email: &str) -> Result<Option<Student>>;
    /// Exact match on a non-empty phone.
    async fn find_by_phone(&self, phone: &str) -> Result<Option<Student>>;
    /// All students, ascending by id.
    async fn all(&self) -> Result<Vec<Student>>;
    async fn clear(&self) -> Result<()>;
}

/// Storage port for the append-only payment ledger.
#[async_trait]
pub trait PaymentStore: Send + Sync {
    /// Appends a row and returns the assigned row id. The incoming `id`
    /// field is ignored.
    async fn append(&self, payment: Payment) -> Result<i64>;
    /// All rows for a student, ascending by row id (insertion order).
    async fn for_student(&self, student: StudentId) -> Result<Vec<Payment>>;
    async fn clear(&self) -> Result<()>;
}

/// Storage port for the single process-wide invoice counter.
#[async_trait]
pub trait CounterStore: Send + Sync {
    /// Current counter value. A missing counter initializes to 1; an
    /// unreadable or corrupt one is a storage error, never a silent
    /// restart from 1.
    async fn load(&self) -> Result<u64>;
    async fn save(&self, value: u64) -> Result<()>;
}

pub type StudentStoreBox = Box<dyn StudentStore>;
pub type PaymentStoreBox = Box<dyn PaymentStore>;
pub type CounterStoreBox = Box<dyn CounterStore>;
