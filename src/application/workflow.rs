use crate::application::directory::StudentDirectory;
use crate::application::format::{display_date, rupees_in_words};
use crate::application::ledger::PaymentLedger;
use crate::application::sequencer::InvoiceSequencer;
use crate::domain::receipt::{BillingForm, Receipt};
use crate::domain::student::{Student, StudentId};
use crate::error::{BillingError, Result};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

/// Search result used to prefill the billing form: the student record plus
/// the ledger's view of their payment history.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StudentSummary {
    pub student: Student,
    /// Cumulative amount recorded in the ledger, the source of truth for
    /// installment progress.
    pub total_paid: i64,
    pub next_installment: String,
    pub balance_due: i64,
}

/// Orchestrates the directory, ledger and sequencer to turn form input
/// into receipt data.
pub struct BillingWorkflow {
    directory: StudentDirectory,
    ledger: PaymentLedger,
    sequencer: InvoiceSequencer,
}

impl BillingWorkflow {
    pub fn new(
        directory: StudentDirectory,
        ledger: PaymentLedger,
        sequencer: InvoiceSequencer,
    ) -> Self {
        Self {
            directory,
            ledger,
            sequencer,
        }
    }

    /// Validates and upserts a registration. Repeated registration under
    /// the same email or phone updates the existing record in place.
    pub async fn register(&self, student: Student) -> Result<StudentId> {
        student.validate()?;
        let id = self.directory.upsert(student).await?;
        debug!(student = id, "registration upserted");
        Ok(id)
    }

    /// Looks a student up by exact match first, substring fallback, and
    /// joins in their ledger totals.
    pub async fn search(&self, query: &str) -> Result<StudentSummary> {
        let student = self
            .directory
            .lookup(query)
            .await?
            .ok_or_else(|| BillingError::NotFound(format!("no student matches {query:?}")))?;
        let total_paid = self.ledger.total_paid(student.id).await?;
        let next_installment = self
            .ledger
            .next_installment_label(student.id, student.total_installments)
            .await?;
        let balance_due = (student.fee - student.discount) - total_paid;
        Ok(StudentSummary {
            student,
            total_paid,
            next_installment,
            balance_due,
        })
    }

    /// Runs the receipt state machine: resolve the student, suppress
    /// refresh resubmissions, allocate an invoice number, persist, and
    /// emit the receipt data for rendering.
    pub async fn issue_receipt(&self, form: BillingForm) -> Result<Receipt> {
        let student = self.resolve_student(&form).await?;

        // The duplicate check runs before allocation so a page refresh
        // never burns a sequence number.
        let mut duplicate = false;
        let invoice = match &student {
            Some(s) => {
                match self
                    .ledger
                    .find_duplicate(s.id, form.paid_amount, &form.invoice_date)
                    .await?
                {
                    Some(prior) => {
                        duplicate = true;
                        info!(invoice = %prior, "duplicate resubmission, reusing invoice");
                        prior
                    }
                    None => self.sequencer.allocate_next().await?,
                }
            }
            None => self.sequencer.allocate_next().await?,
        };

        let balance = (form.fee - form.discount) - (form.already_paid + form.paid_amount);

        if !duplicate {
            if let Some(mut s) = student {
                s.fee = form.fee;
                s.discount = form.discount;
                s.approved = form.approved.clone();
                s.total_installments = form.total_installments;
                self.directory.update(s.clone()).await?;
                self.ledger
                    .record(s.id, invoice.clone(), form.paid_amount, &form.invoice_date)
                    .await?;
            }
        }

        let reference = if form.reference.is_empty() {
            "NA".to_string()
        } else {
            form.reference
        };

        Ok(Receipt {
            invoice,
            duplicate,
            invoice_date: display_date(&form.invoice_date),
            joining_date: display_date(&form.joining_date),
            validity: display_date(&form.validity),
            name: form.name,
            address: form.address,
            email: form.email,
            phone: form.phone,
            course: form.course,
            duration: form.duration,
            installment: form.installment,
            payment_method: form.payment_method,
            reference,
            approved: form.approved,
            salutation: form.salutation,
            fee: form.fee,
            discount: form.discount,
            paid_amount: form.paid_amount,
            already_paid: form.already_paid,
            balance,
            amount_in_words: rupees_in_words(form.paid_amount),
        })
    }

    /// Bulk reset: erase all students and payments and put the invoice
    /// counter back to 1.
    pub async fn reset(&self) -> Result<()> {
        // Payments reference students, so the ledger empties first.
        self.ledger.clear().await?;
        self.directory.clear().await?;
        self.sequencer.reset().await?;
        info!("all billing data cleared, invoice counter reset to 1");
        Ok(())
    }

    /// Resolves the student the receipt belongs to. A known identity key
    /// returns the existing record; a new key creates one (a first billing
    /// registers the student); no key at all leaves the receipt unlinked
    /// and nothing is persisted for it.
    async fn resolve_student(&self, form: &BillingForm) -> Result<Option<Student>> {
        if form.email.trim().is_empty() && form.phone.trim().is_empty() {
            return Ok(None);
        }
        if let Some(existing) = self
            .directory
            .find_by_identity(&form.email, &form.phone)
            .await?
        {
            return Ok(Some(existing));
        }
        let student = Student {
            id: 0,
            name: form.name.clone(),
            address: form.address.clone(),
            email: form.email.trim().to_string(),
            phone: form.phone.trim().to_string(),
            alt_phone: form.alt_phone.clone(),
            course: form.course.clone(),
            duration: form.duration.clone(),
            joining_date: form.joining_date.clone(),
            fee: form.fee,
            discount: form.discount,
            approved: form.approved.clone(),
            total_installments: form.total_installments,
            salutation: form.salutation.clone(),
        };
        let id = self.directory.upsert(student.clone()).await?;
        Ok(Some(Student { id, ..student }))
    }
}
