use serde::{Deserialize, Serialize};
use std::fmt;

/// Prefix carried by every externally visible invoice identifier.
pub const INVOICE_PREFIX: &str = "ACT-025-R-";

/// Externally visible receipt identifier: prefix plus zero-padded counter.
///
/// Padding is a minimum width of three digits, never a truncation:
/// counter 7 formats as `ACT-025-R-007`, counter 1000 as `ACT-025-R-1000`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct InvoiceId(String);

impl InvoiceId {
    pub fn from_counter(counter: u64) -> Self {
        Self(format!("{INVOICE_PREFIX}{counter:03}"))
    }

    /// Wraps an already-formatted id read back from storage.
    pub fn from_raw(raw: String) -> Self {
        Self(raw)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for InvoiceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_pads_to_three_digits() {
        assert_eq!(InvoiceId::from_counter(7).as_str(), "ACT-025-R-007");
        assert_eq!(InvoiceId::from_counter(25).as_str(), "ACT-025-R-025");
        assert_eq!(InvoiceId::from_counter(999).as_str(), "ACT-025-R-999");
    }

    #[test]
    fn test_format_never_truncates() {
        assert_eq!(InvoiceId::from_counter(1000).as_str(), "ACT-025-R-1000");
        assert_eq!(InvoiceId::from_counter(123456).as_str(), "ACT-025-R-123456");
    }

    #[test]
    fn test_serializes_as_plain_string() {
        let json = serde_json::to_string(&InvoiceId::from_counter(1)).unwrap();
        assert_eq!(json, "\"ACT-025-R-001\"");
    }
}
