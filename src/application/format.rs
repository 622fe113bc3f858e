use chrono::NaiveDate;
use tracing::warn;

const ONES: [&str; 20] = [
    "Zero", "One", "Two", "Three", "Four", "Five", "Six", "Seven", "Eight", "Nine", "Ten",
    "Eleven", "Twelve", "Thirteen", "Fourteen", "Fifteen", "Sixteen", "Seventeen", "Eighteen",
    "Nineteen",
];

const TENS: [&str; 10] = [
    "", "", "Twenty", "Thirty", "Forty", "Fifty", "Sixty", "Seventy", "Eighty", "Ninety",
];

/// Formats an ISO `YYYY-MM-DD` string as `DD-MM-YYYY` for display.
///
/// Empty input stays empty; an unparseable string is passed through
/// unchanged with a logged warning rather than rejected.
pub fn display_date(raw: &str) -> String {
    if raw.is_empty() {
        return String::new();
    }
    match NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        Ok(date) => date.format("%d-%m-%Y").to_string(),
        Err(_) => {
            warn!(input = raw, "unparseable date passed through unformatted");
            raw.to_string()
        }
    }
}

/// Renders a rupee amount as `"Rupees {words} Only"` in the Indian
/// numbering system, or an empty string when the amount cannot be put
/// into words. Word formatting must never fail a receipt.
pub fn rupees_in_words(amount: i64) -> String {
    match amount_in_words(amount) {
        Some(words) => format!("Rupees {words} Only"),
        None => {
            warn!(amount, "amount not representable in words, degrading to empty");
            String::new()
        }
    }
}

/// Words form of a non-negative amount using lakh/crore grouping.
pub fn amount_in_words(amount: i64) -> Option<String> {
    if amount < 0 {
        return None;
    }
    Some(words(amount as u64))
}

fn words(n: u64) -> String {
    match n {
        0..=19 => ONES[n as usize].to_string(),
        20..=99 => {
            let tens = TENS[(n / 10) as usize];
            if n % 10 == 0 {
                tens.to_string()
            } else {
                format!("{tens} {}", ONES[(n % 10) as usize])
            }
        }
        100..=999 => grouped(n, 100, "Hundred"),
        1_000..=99_999 => grouped(n, 1_000, "Thousand"),
        100_000..=9_999_999 => grouped(n, 100_000, "Lakh"),
        _ => grouped(n, 10_000_000, "Crore"),
    }
}

fn grouped(n: u64, unit: u64, label: &str) -> String {
    let head = words(n / unit);
    let rest = n % unit;
    if rest == 0 {
        format!("{head} {label}")
    } else {
        format!("{head} {label} {}", words(rest))
    }
}
