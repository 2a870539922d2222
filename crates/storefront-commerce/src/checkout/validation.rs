//! Field and sub-form validation.
//!
//! Validation never fails with `Err`: each sub-form yields an ordered list
//! of [`ValidationError`]s, empty when the sub-form is valid.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::checkout::PaymentMethod;

/// Minimum number of phone characters after the optional `+`.
const PHONE_MIN_LEN: usize = 10;

/// A user-correctable problem with the order draft.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ValidationError {
    #[error("Address is required")]
    AddressRequired,

    #[error("Select a payment method")]
    PaymentRequired,

    #[error("Email is required")]
    EmailRequired,

    #[error("Email format is invalid")]
    EmailInvalid,

    #[error("Phone is required")]
    PhoneRequired,

    #[error("Phone format is invalid")]
    PhoneInvalid,
}

/// Check the `local@domain.tld` shape: no whitespace, a single `@`, and a
/// dot inside the domain part with text on both sides.
pub fn is_email(value: &str) -> bool {
    if value.chars().any(char::is_whitespace) {
        return false;
    }
    let Some((local, domain)) = value.split_once('@') else {
        return false;
    };
    if local.is_empty() || domain.contains('@') {
        return false;
    }
    domain
        .char_indices()
        .any(|(i, c)| c == '.' && i > 0 && i + 1 < domain.len())
}

/// Check the phone shape: an optional leading `+`, then at least ten
/// digits, spaces, parentheses or dashes.
pub fn is_phone(value: &str) -> bool {
    let body = value.strip_prefix('+').unwrap_or(value);
    let mut len = 0;
    for c in body.chars() {
        if !(c.is_ascii_digit() || c.is_whitespace() || matches!(c, '(' | ')' | '-')) {
            return false;
        }
        len += 1;
    }
    len >= PHONE_MIN_LEN
}

fn is_blank(value: &str) -> bool {
    value.trim().is_empty()
}

/// Validate the delivery sub-form. Address errors come first.
pub fn validate_delivery(address: &str, payment: Option<PaymentMethod>) -> Vec<ValidationError> {
    let mut errors = Vec::new();
    if is_blank(address) {
        errors.push(ValidationError::AddressRequired);
    }
    if payment.is_none() {
        errors.push(ValidationError::PaymentRequired);
    }
    errors
}

/// Validate the contacts sub-form.
///
/// Email errors come before phone errors, except that a filled phone with
/// a blank email reports only [`ValidationError::PhoneRequired`].
pub fn validate_contacts(email: &str, phone: &str) -> Vec<ValidationError> {
    let email_blank = is_blank(email);
    let phone_blank = is_blank(phone);

    if email_blank && !phone_blank {
        return vec![ValidationError::PhoneRequired];
    }

    let mut errors = Vec::new();
    if email_blank {
        errors.push(ValidationError::EmailRequired);
    } else if !is_email(email) {
        errors.push(ValidationError::EmailInvalid);
    }
    if phone_blank {
        errors.push(ValidationError::PhoneRequired);
    } else if !is_phone(phone) {
        errors.push(ValidationError::PhoneInvalid);
    }
    errors
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_email_shape() {
        assert!(is_email("a@b.com"));
        assert!(is_email("first.last@mail.example.org"));
        assert!(is_email("a@b.c.d"));

        assert!(!is_email(""));
        assert!(!is_email("a@b"));
        assert!(!is_email("@b.com"));
        assert!(!is_email("a@.com"));
        assert!(!is_email("a@b."));
        assert!(!is_email("a@@b.com"));
        assert!(!is_email("a@b@c.com"));
        assert!(!is_email("a b@c.com"));
        assert!(!is_email(" a@b.com"));
    }

    #[test]
    fn test_phone_shape() {
        assert!(is_phone("+7 900 123 4567"));
        assert!(is_phone("89001234567"));
        assert!(is_phone("+7 (900) 123-45-67"));
        assert!(is_phone("1234567890"));

        assert!(!is_phone("123"));
        assert!(!is_phone("123456789"));
        assert!(!is_phone("++79001234567"));
        assert!(!is_phone("8900123456x"));
        assert!(!is_phone("79001+234567"));
    }

    #[test]
    fn test_delivery_errors_in_order() {
        assert_eq!(
            validate_delivery("", None),
            vec![ValidationError::AddressRequired, ValidationError::PaymentRequired]
        );
        assert_eq!(
            validate_delivery("   ", Some(PaymentMethod::Cash)),
            vec![ValidationError::AddressRequired]
        );
        assert!(validate_delivery("Moscow", Some(PaymentMethod::Online)).is_empty());
    }

    #[test]
    fn test_phone_without_email_reports_phone_only() {
        assert_eq!(
            validate_contacts("", "123"),
            vec![ValidationError::PhoneRequired]
        );
    }

    #[test]
    fn test_valid_contacts() {
        assert!(validate_contacts("a@b.com", "+7 900 123 4567").is_empty());
    }

    #[test]
    fn test_contacts_error_combinations() {
        assert_eq!(
            validate_contacts("", ""),
            vec![ValidationError::EmailRequired, ValidationError::PhoneRequired]
        );
        assert_eq!(
            validate_contacts("nope", ""),
            vec![ValidationError::EmailInvalid, ValidationError::PhoneRequired]
        );
        assert_eq!(
            validate_contacts("a@b.com", "12"),
            vec![ValidationError::PhoneInvalid]
        );
        assert_eq!(
            validate_contacts("nope", "12"),
            vec![ValidationError::EmailInvalid, ValidationError::PhoneInvalid]
        );
    }

    #[test]
    fn test_messages() {
        assert_eq!(ValidationError::AddressRequired.to_string(), "Address is required");
        assert_eq!(ValidationError::PhoneInvalid.to_string(), "Phone format is invalid");
    }
}
