//! Per-field editing rules for the on-screen keyboard.
//!
//! Identifier and phone fields hold their formatted rendering; edits work
//! on the underlying digits and re-format afterwards.

use crate::types::FormField;
use crate::validation::{IDENTIFIER_LEN, PHONE_LEN, format_identifier, format_phone, normalize};

/// Key layout shown for a field
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyboardLayout {
    /// Letters, digits and `@ . - _`
    Text,
    /// Digits only
    Numeric,
}

impl KeyboardLayout {
    /// Layout for `field`
    #[must_use]
    pub const fn for_field(field: FormField) -> Self {
        match field {
            FormField::Name | FormField::Email => Self::Text,
            FormField::Identifier | FormField::Phone => Self::Numeric,
        }
    }
}

fn push_digit(current: &str, key: char, max: usize, format: fn(&str) -> String) -> String {
    let mut digits = normalize(current);
    if key.is_ascii_digit() && digits.len() < max {
        digits.push(key);
    }
    format(&digits)
}

/// `current` after `key` is pressed in `field`
///
/// Keys the field does not accept leave it unchanged.
#[must_use]
pub fn press_key(field: FormField, current: &str, key: char) -> String {
    if key.is_control() {
        return current.to_string();
    }
    match field {
        FormField::Name => {
            let mut next = current.to_string();
            next.push(key);
            next
        },
        FormField::Email => {
            let mut next = current.to_string();
            next.extend(key.to_lowercase());
            next
        },
        FormField::Identifier => push_digit(current, key, IDENTIFIER_LEN, format_identifier),
        FormField::Phone => push_digit(current, key, PHONE_LEN, format_phone),
    }
}

/// `current` with its last character (or digit) removed
#[must_use]
pub fn backspace(field: FormField, current: &str) -> String {
    match field {
        FormField::Name | FormField::Email => {
            let mut next = current.to_string();
            next.pop();
            next
        },
        FormField::Identifier | FormField::Phone => {
            let mut digits = normalize(current);
            digits.pop();
            sanitize(field, &digits)
        },
    }
}

/// `value` as `field` would hold it had it been typed key by key
#[must_use]
pub fn sanitize(field: FormField, value: &str) -> String {
    match field {
        FormField::Name => value.chars().filter(|c| !c.is_control()).collect(),
        FormField::Email => value
            .chars()
            .filter(|c| !c.is_control())
            .flat_map(char::to_lowercase)
            .collect(),
        FormField::Identifier => format_identifier(value),
        FormField::Phone => format_phone(value),
    }
}
