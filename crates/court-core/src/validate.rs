//! # Field Validation Bounds
//!
//! The wire-compatibility bounds for user-facing fields: name 1–120,
//! password 8–128, case_id 3–64 characters. Lengths are counted in
//! characters, not bytes. Checks run before any mutation; a failed check
//! surfaces as a 422 at the API boundary.

use crate::error::ValidationError;

/// Inclusive bounds for a person or party name.
pub const NAME_MIN: usize = 1;
/// Inclusive upper bound for a person or party name.
pub const NAME_MAX: usize = 120;

/// Inclusive lower bound for a password.
pub const PASSWORD_MIN: usize = 8;
/// Inclusive upper bound for a password.
pub const PASSWORD_MAX: usize = 128;

/// Inclusive lower bound for a case identifier.
pub const CASE_ID_MIN: usize = 3;
/// Inclusive upper bound for a case identifier.
pub const CASE_ID_MAX: usize = 64;

fn check_len(
    field: &'static str,
    value: &str,
    min: usize,
    max: usize,
) -> Result<(), ValidationError> {
    let len = value.chars().count();
    if len < min || len > max {
        return Err(ValidationError::LengthOutOfBounds { field, min, max, len });
    }
    Ok(())
}

/// Validate a party or user name (1–120 characters).
pub fn check_name(field: &'static str, value: &str) -> Result<(), ValidationError> {
    check_len(field, value, NAME_MIN, NAME_MAX)
}

/// Validate a password (8–128 characters).
pub fn check_password(value: &str) -> Result<(), ValidationError> {
    check_len("password", value, PASSWORD_MIN, PASSWORD_MAX)
}

/// Validate a case identifier (3–64 characters).
pub fn check_case_id(value: &str) -> Result<(), ValidationError> {
    check_len("case_id", value, CASE_ID_MIN, CASE_ID_MAX)
}

/// Validate a required free-text field (argument, evidence).
pub fn check_non_empty(field: &'static str, value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::Empty { field });
    }
    Ok(())
}

/// Structurally validate an email address and normalize it to lowercase.
///
/// Emails compare case-insensitively throughout the stack, so the
/// lowercased form is the only one ever stored. The check is structural
/// (`local@domain` with a dotted, non-empty domain), not a full RFC 5322
/// parse.
pub fn normalize_email(value: &str) -> Result<String, ValidationError> {
    let email = value.trim().to_lowercase();
    let invalid = || ValidationError::InvalidEmail(value.to_string());

    let (local, domain) = email.split_once('@').ok_or_else(invalid)?;
    if local.is_empty() || domain.is_empty() || email.contains(char::is_whitespace) {
        return Err(invalid());
    }
    // Domain must have a dot with non-empty labels on both sides.
    let (host, tld) = domain.rsplit_once('.').ok_or_else(invalid)?;
    if host.is_empty() || tld.is_empty() || domain.contains('@') {
        return Err(invalid());
    }
    Ok(email)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn name_bounds() {
        assert!(check_name("name", "J").is_ok());
        assert!(check_name("name", &"x".repeat(120)).is_ok());
        assert!(check_name("name", "").is_err());
        assert!(check_name("name", &"x".repeat(121)).is_err());
    }

    #[test]
    fn password_bounds() {
        assert!(check_password("eightch8").is_ok());
        assert!(check_password(&"p".repeat(128)).is_ok());
        assert!(check_password("short").is_err());
        assert!(check_password(&"p".repeat(129)).is_err());
    }

    #[test]
    fn case_id_bounds() {
        assert!(check_case_id("C-1").is_ok());
        assert!(check_case_id(&"c".repeat(64)).is_ok());
        assert!(check_case_id("C1").is_err());
        assert!(check_case_id(&"c".repeat(65)).is_err());
    }

    #[test]
    fn bounds_count_characters_not_bytes() {
        // 3 characters, 9 bytes.
        assert!(check_case_id("ありが").is_ok());
    }

    #[test]
    fn non_empty_rejects_whitespace_only() {
        assert!(check_non_empty("argument_text", "the facts").is_ok());
        assert!(check_non_empty("argument_text", "   ").is_err());
        assert!(check_non_empty("argument_text", "").is_err());
    }

    #[test]
    fn email_normalizes_to_lowercase() {
        assert_eq!(
            normalize_email("Jury.Duty@Example.COM").unwrap(),
            "jury.duty@example.com"
        );
    }

    #[test]
    fn email_rejects_malformed() {
        for bad in ["", "no-at-sign", "@example.com", "user@", "user@nodot", "a b@example.com", "user@.com", "user@com."] {
            assert!(normalize_email(bad).is_err(), "accepted {bad:?}");
        }
    }

    #[test]
    fn length_error_reports_field_and_bounds() {
        let err = check_password("short").unwrap_err();
        assert_eq!(
            err,
            ValidationError::LengthOutOfBounds { field: "password", min: 8, max: 128, len: 5 }
        );
    }
}
