use crate::domain::invoice::InvoiceId;
use crate::domain::student::StudentId;
use serde::{Deserialize, Serialize};

/// One immutable payment row. Rows are append-only: never updated or
/// deleted except by a bulk reset. The sum of a student's rows is the
/// authoritative amount paid to date.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Payment {
    /// Row id, assigned by the store in insertion order.
    pub id: i64,
    pub student: StudentId,
    pub invoice: InvoiceId,
    /// Whole currency units; no fractional amounts.
    pub amount: i64,
    /// Calendar date as submitted, no time component.
    pub date: String,
}
