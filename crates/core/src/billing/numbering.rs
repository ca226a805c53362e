//! Invoice and payment number generation.
//!
//! Numbers look like `INV-MB3K1Z2A-7QX0`: a prefix, the creation time in
//! milliseconds as upper-case base 36, and four random base-36 characters.
//! They are unique in practice; the unique index on the column is what
//! actually guarantees it.

use chrono::Utc;
use rand::Rng;
use scholaris_shared::config::BillingConfig;

const ALPHABET: &[u8; 36] = b"0123456789ABCDEFGHIJKLMNOPQRSTUVWXYZ";
const SUFFIX_LEN: usize = 4;

/// Generates document numbers with configurable prefixes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentNumbering {
    invoice_prefix: String,
    payment_prefix: String,
}

impl Default for DocumentNumbering {
    fn default() -> Self {
        Self::new("INV", "PAY")
    }
}

impl From<&BillingConfig> for DocumentNumbering {
    fn from(config: &BillingConfig) -> Self {
        Self::new(&config.invoice_prefix, &config.payment_prefix)
    }
}

impl DocumentNumbering {
    /// Creates a generator with the given prefixes.
    #[must_use]
    pub fn new(invoice_prefix: &str, payment_prefix: &str) -> Self {
        Self {
            invoice_prefix: invoice_prefix.to_string(),
            payment_prefix: payment_prefix.to_string(),
        }
    }

    /// Generates a new invoice number.
    #[must_use]
    pub fn next_invoice_number(&self) -> String {
        generate(&self.invoice_prefix)
    }

    /// Generates a new payment number.
    #[must_use]
    pub fn next_payment_number(&self) -> String {
        generate(&self.payment_prefix)
    }
}

fn generate(prefix: &str) -> String {
    let millis = u64::try_from(Utc::now().timestamp_millis()).unwrap_or_default();
    let mut rng = rand::rng();
    let suffix: String = (0..SUFFIX_LEN)
        .map(|_| char::from(ALPHABET[rng.random_range(0..ALPHABET.len())]))
        .collect();
    compose(prefix, millis, &suffix)
}

/// Assembles `PREFIX-<base36 millis>-<suffix>`.
#[must_use]
pub fn compose(prefix: &str, millis: u64, suffix: &str) -> String {
    format!("{prefix}-{}-{suffix}", to_base36(millis))
}

/// Formats a number in upper-case base 36.
#[must_use]
pub fn to_base36(mut value: u64) -> String {
    if value == 0 {
        return "0".to_string();
    }
    let mut digits = Vec::new();
    while value > 0 {
        let digit = usize::try_from(value % 36).unwrap_or_default();
        digits.push(ALPHABET[digit]);
        value /= 36;
    }
    digits.reverse();
    String::from_utf8(digits).unwrap_or_default()
}
