use thiserror::Error;

/// Boundary validation failures shared across the core components.
///
/// Anything beyond input validation lives in the owning crate's error
/// type (`JournalError`, `BridgeError`, `ReportError`).
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum DomainError {
    #[error("{field} must not be empty")]
    EmptyField { field: &'static str },
    #[error("amount must be positive, got {amount}")]
    NonPositiveAmount { amount: i64 },
    #[error("currency '{currency}' is not a 3-letter uppercase code")]
    InvalidCurrency { currency: String },
}

/// Validate an ISO-like currency code: exactly three ASCII uppercase
/// letters.
pub fn validate_currency(currency: &str) -> Result<(), DomainError> {
    let ok = currency.len() == 3 && currency.bytes().all(|b| b.is_ascii_uppercase());
    if ok {
        Ok(())
    } else {
        Err(DomainError::InvalidCurrency {
            currency: currency.to_string(),
        })
    }
}
