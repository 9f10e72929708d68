//! Identifier and contact field validation.
//!
//! Pure functions: no state, never panic on short or empty input.
//!
//! The identifier is an 11-digit national ID protected by two mod-11 check
//! digits. The first nine digits, weighted 10 down to 2, yield the 10th
//! digit; the first ten digits, weighted 11 down to 2, yield the 11th.

use crate::error::ValidationError;
use regex::Regex;
use std::sync::LazyLock;

/// Digits in a complete identifier
pub const IDENTIFIER_LEN: usize = 11;

/// Digits in a complete mobile phone number (area code + 9 + 8 digits)
pub const PHONE_LEN: usize = 11;

/// Minimum name length after trimming
pub const MIN_NAME_LEN: usize = 3;

#[allow(clippy::expect_used)]
static EMAIL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("email pattern is valid")
});

#[allow(clippy::expect_used)]
static MOBILE_PHONE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[1-9][0-9]9[0-9]{8}$").expect("phone pattern is valid"));

/// Strip everything but ASCII digits
#[must_use]
pub fn normalize(input: &str) -> String {
    input.chars().filter(char::is_ascii_digit).collect()
}

/// Whether `input` is a valid identifier once normalised
///
/// ```
/// use festival_kiosk::validation::is_valid_identifier;
///
/// assert!(is_valid_identifier("529.982.247-25"));
/// assert!(!is_valid_identifier("11111111111"));
/// ```
#[must_use]
pub fn is_valid_identifier(input: &str) -> bool {
    let digits: Vec<usize> = normalize(input)
        .bytes()
        .map(|b| usize::from(b - b'0'))
        .collect();

    if digits.len() != IDENTIFIER_LEN {
        return false;
    }
    if digits.iter().all(|&d| d == digits[0]) {
        return false;
    }

    check_digit(&digits[..9]) == digits[9] && check_digit(&digits[..10]) == digits[10]
}

/// Mod-11 check digit over `digits`, weights descending from `len + 1` to 2
fn check_digit(digits: &[usize]) -> usize {
    let top_weight = digits.len() + 1;
    let sum: usize = digits
        .iter()
        .enumerate()
        .map(|(index, digit)| digit * (top_weight - index))
        .sum();
    let digit = 11 - sum % 11;
    if digit > 9 { 0 } else { digit }
}

/// Whether `input` looks like `local@domain.tld`
#[must_use]
pub fn is_valid_email(input: &str) -> bool {
    EMAIL.is_match(input)
}

/// Whether `input` is an 11-digit mobile number: area code 10-99, then 9,
/// then eight digits. Separators are ignored.
#[must_use]
pub fn is_valid_phone(input: &str) -> bool {
    MOBILE_PHONE.is_match(&normalize(input))
}

/// Render up to 11 identifier digits as `XXX.XXX.XXX-XX`
///
/// Separators appear only once the digits after them exist, so the result
/// can be shown while the visitor is still typing. Digits beyond the 11th
/// are dropped.
///
/// ```
/// use festival_kiosk::validation::format_identifier;
///
/// assert_eq!(format_identifier("5299"), "529.9");
/// assert_eq!(format_identifier("52998224725"), "529.982.247-25");
/// ```
#[must_use]
pub fn format_identifier(input: &str) -> String {
    let mut formatted = String::with_capacity(14);
    for (index, digit) in normalize(input).chars().take(IDENTIFIER_LEN).enumerate() {
        match index {
            3 | 6 => formatted.push('.'),
            9 => formatted.push('-'),
            _ => {},
        }
        formatted.push(digit);
    }
    formatted
}

/// Render a phone as `DD NNNNN-NNNN` once all 11 digits are present,
/// otherwise the raw digits (at most 11)
#[must_use]
pub fn format_phone(input: &str) -> String {
    let digits: String = normalize(input).chars().take(PHONE_LEN).collect();
    if digits.len() == PHONE_LEN {
        format!("{} {}-{}", &digits[..2], &digits[2..7], &digits[7..])
    } else {
        digits
    }
}

/// Validate the visitor's name
///
/// # Errors
///
/// [`ValidationError::NameRequired`] when blank,
/// [`ValidationError::NameTooShort`] when under three characters.
pub fn validate_name(name: &str) -> Result<(), ValidationError> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        Err(ValidationError::NameRequired)
    } else if trimmed.chars().count() < MIN_NAME_LEN {
        Err(ValidationError::NameTooShort)
    } else {
        Ok(())
    }
}

/// Validate the identifier field
///
/// # Errors
///
/// [`ValidationError::IdentifierRequired`] when blank,
/// [`ValidationError::IdentifierInvalid`] when the checksum fails.
pub fn validate_identifier(identifier: &str) -> Result<(), ValidationError> {
    if identifier.trim().is_empty() {
        Err(ValidationError::IdentifierRequired)
    } else if is_valid_identifier(identifier) {
        Ok(())
    } else {
        Err(ValidationError::IdentifierInvalid)
    }
}

/// Validate the phone field
///
/// # Errors
///
/// [`ValidationError::PhoneRequired`] when blank,
/// [`ValidationError::PhoneInvalid`] otherwise.
pub fn validate_phone(phone: &str) -> Result<(), ValidationError> {
    if phone.trim().is_empty() {
        Err(ValidationError::PhoneRequired)
    } else if is_valid_phone(phone) {
        Ok(())
    } else {
        Err(ValidationError::PhoneInvalid)
    }
}

/// Validate the email field
///
/// # Errors
///
/// [`ValidationError::EmailRequired`] when blank,
/// [`ValidationError::EmailInvalid`] otherwise.
pub fn validate_email(email: &str) -> Result<(), ValidationError> {
    if email.trim().is_empty() {
        Err(ValidationError::EmailRequired)
    } else if is_valid_email(email) {
        Ok(())
    } else {
        Err(ValidationError::EmailInvalid)
    }
}
