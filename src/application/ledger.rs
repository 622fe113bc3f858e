use crate::domain::invoice::InvoiceId;
use crate::domain::payment::Payment;
use crate::domain::ports::PaymentStoreBox;
use crate::domain::student::StudentId;
use crate::error::Result;

/// Label returned once every expected installment has been paid.
pub const PAYMENT_COMPLETED: &str = "Payment Completed";

/// Append-only record of payments per student.
pub struct PaymentLedger {
    store: PaymentStoreBox,
}

impl PaymentLedger {
    pub fn new(store: PaymentStoreBox) -> Self {
        Self { store }
    }

    /// Appends an immutable payment row and returns its row id.
    pub async fn record(
        &self,
        student: StudentId,
        invoice: InvoiceId,
        amount: i64,
        date: &str,
    ) -> Result<i64> {
        self.store
            .append(Payment {
                id: 0,
                student,
                invoice,
                amount,
                date: date.to_string(),
            })
            .await
    }

    /// Sum of all recorded amounts for the student; 0 if none.
    pub async fn total_paid(&self, student: StudentId) -> Result<i64> {
        Ok(self
            .store
            .for_student(student)
            .await?
            .iter()
            .map(|p| p.amount)
            .sum())
    }

    pub async fn payment_count(&self, student: StudentId) -> Result<usize> {
        Ok(self.store.for_student(student).await?.len())
    }

    /// The next installment index as a string, or the completion sentinel
    /// once every expected installment is recorded. A total of 0 is
    /// treated as 1.
    pub async fn next_installment_label(
        &self,
        student: StudentId,
        total_installments: u32,
    ) -> Result<String> {
        let total = total_installments.max(1) as usize;
        let count = self.payment_count(student).await?;
        if count >= total {
            Ok(PAYMENT_COMPLETED.to_string())
        } else {
            Ok((count + 1).to_string())
        }
    }

    /// Invoice id of the most recent prior payment with identical student,
    /// amount and date, if any. Matching on (student, amount, date) cannot
    /// distinguish a page-refresh resubmission from a second genuine
    /// same-day payment of the same amount; the later row wins on ties.
    pub async fn find_duplicate(
        &self,
        student: StudentId,
        amount: i64,
        date: &str,
    ) -> Result<Option<InvoiceId>> {
        Ok(self
            .store
            .for_student(student)
            .await?
            .into_iter()
            .rev()
            .find(|p| p.amount == amount && p.date == date)
            .map(|p| p.invoice))
    }

    pub async fn clear(&self) -> Result<()> {
        self.store.clear().await
    }
}
