use crate::error::{BillingError, Result};
use serde::{Deserialize, Serialize};

pub type StudentId = i64;

/// A registered student, keyed by email (preferred) or phone (fallback).
///
/// At most one student per email and at most one per phone. The record is
/// updated in place on repeated registration or billing for the same key and
/// only ever removed by a bulk reset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Student {
    #[serde(default)]
    pub id: StudentId,
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
    pub fee: i64,
    #[serde(default)]
    pub discount: i64,
    #[serde(default)]
    pub approved: String,
    #[serde(default)]
    pub total_installments: u32,
    #[serde(default)]
    pub salutation: String,
}

impl Student {
    /// Checks the required registration fields: non-blank name, an email
    /// with a local part and domain, and a phone with at least ten digits.
    pub fn validate(&self) -> Result<()> {
        if self.name.trim().is_empty() {
            return Err(BillingError::Validation("name must not be blank".into()));
        }
        if !self.email.is_empty() {
            let (local, domain) = self
                .email
                .split_once('@')
                .ok_or_else(|| BillingError::Validation(format!("malformed email: {}", self.email)))?;
            if local.is_empty() || domain.is_empty() {
                return Err(BillingError::Validation(format!(
                    "malformed email: {}",
                    self.email
                )));
            }
        }
        if !self.phone.is_empty() {
            let digits = self.phone.chars().filter(|c| c.is_ascii_digit()).count();
            if digits < 10 {
                return Err(BillingError::Validation(format!(
                    "phone too short: {}",
                    self.phone
                )));
            }
        }
        if self.email.is_empty() && self.phone.is_empty() {
            return Err(BillingError::Validation(
                "either email or phone is required".into(),
            ));
        }
        Ok(())
    }

    /// Case-insensitive exact match against name, email, phone or alternate phone.
    pub fn matches_exact(&self, query: &str) -> bool {
        let q = query.to_lowercase();
        [&self.name, &self.email, &self.phone, &self.alt_phone]
            .iter()
            .any(|field| field.to_lowercase() == q)
    }

    /// Case-insensitive substring match against the same four fields.
    pub fn matches_fuzzy(&self, query: &str) -> bool {
        let q = query.to_lowercase();
        if q.is_empty() {
            return false;
        }
        [&self.name, &self.email, &self.phone, &self.alt_phone]
            .iter()
            .any(|field| field.to_lowercase().contains(&q))
    }
}
