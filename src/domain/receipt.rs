use crate::domain::invoice::InvoiceId;
use serde::{Deserialize, Serialize};

/// Raw billing form input, one field per form control.
///
/// Missing numeric fields default to 0 and missing strings to empty; a
/// malformed date string is carried through untouched rather than rejected.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BillingForm {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub address: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub alt_phone: String,
    #[serde(default)]
    pub course: String,
    #[serde(default)]
    pub duration: String,
    #[serde(default)]
    pub joining_date: String,
    #[serde(default)]
    pub invoice_date: String,
    #[serde(default)]
    pub validity: String,
    #[serde(default)]
    pub approved: String,
    #[serde(default)]
    pub payment_method: String,
    #[serde(default)]
    pub reference: String,
    /// Display label for this payment's installment, echoed onto the receipt.
    #[serde(default)]
    pub installment: String,
    #[serde(default)]
    pub salutation: String,
    #[serde(default)]
    pub fee: i64,
    #[serde(default)]
    pub discount: i64,
    #[serde(default)]
    pub paid_amount: i64,
    /// Running total supplied by the caller, distinct from the ledger's own
    /// cumulative sum.
    #[serde(default)]
    pub already_paid: i64,
    #[serde(default)]
    pub total_installments: u32,
}

/// Receipt data handed to the external renderer. Dates are already in
/// display form (`DD-MM-YYYY`) and `amount_in_words` is empty when the
/// words formatter failed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Receipt {
    pub invoice: InvoiceId,
    /// True when this request reused a prior invoice id instead of
    /// allocating and persisting a new payment.
    pub duplicate: bool,
    pub invoice_date: String,
    pub joining_date: String,
    pub validity: String,
    pub name: String,
    pub address: String,
    pub email: String,
    pub phone: String,
    pub course: String,
    pub duration: String,
    pub installment: String,
    pub payment_method: String,
    pub reference: String,
    pub approved: String,
    pub salutation: String,
    pub fee: i64,
    pub discount: i64,
    pub paid_amount: i64,
    pub already_paid: i64,
    pub balance: i64,
    pub amount_in_words: String,
}
