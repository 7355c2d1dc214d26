//! Recipient number normalisation.

use crate::error::SmsError;
use once_cell::sync::Lazy;
use regex::Regex;

static INDIAN_MOBILE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[6-9]\d{9}$").expect("valid regex"));

/// Strip everything but digits and a leading `91` country code from a
/// 12-digit number, then require a ten-digit Indian mobile.
///
/// ```
/// use ashvault_sms::mobile::clean_and_validate;
///
/// assert_eq!(clean_and_validate("+91 98765-43210").unwrap(), "9876543210");
/// assert!(clean_and_validate("1234567890").is_err());
/// ```
pub fn clean_and_validate(input: &str) -> Result<String, SmsError> {
    let digits: String = input.chars().filter(char::is_ascii_digit).collect();
    let local = match digits.strip_prefix("91") {
        Some(rest) if digits.len() == 12 => rest.to_string(),
        _ => digits,
    };

    if INDIAN_MOBILE.is_match(&local) {
        Ok(local)
    } else {
        Err(SmsError::InvalidMobileFormat(input.to_string()))
    }
}

pub fn is_valid_mobile(input: &str) -> bool {
    clean_and_validate(input).is_ok()
}
