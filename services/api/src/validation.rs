//! Input validation utilities

use regex::Regex;
use std::sync::OnceLock;

/// Validate email
pub fn validate_email(email: &str) -> Result<(), String> {
    if email.is_empty() {
        return Err("Email is required".to_string());
    }

    if email.len() > 254 {
        return Err("Email must be at most 254 characters long".to_string());
    }

    static EMAIL_REGEX: OnceLock<Regex> = OnceLock::new();
    let regex = EMAIL_REGEX.get_or_init(|| {
        Regex::new(r"^[a-zA-Z0-9._%+-]+@[a-zA-Z0-9.-]+\.[a-zA-Z]{2,}$")
            .expect("Failed to compile email regex")
    });

    if !regex.is_match(email) {
        return Err("Invalid email format".to_string());
    }

    Ok(())
}

/// Validate a unit field of a conversion or favorite payload
pub fn validate_unit(field: &str, value: &str) -> Result<(), String> {
    if value.trim().is_empty() {
        return Err(format!("{} is required", field));
    }

    if value.len() > 32 {
        return Err(format!("{} must be at most 32 characters long", field));
    }

    Ok(())
}

/// Validate a base currency code for the exchange-rate endpoint
pub fn validate_base_code(code: &str) -> Result<(), String> {
    if code.is_empty() {
        return Err("Base currency is required".to_string());
    }

    if code.len() < 2 || code.len() > 6 {
        return Err("Base currency must be 2 to 6 letters".to_string());
    }

    if !code.chars().all(|c| c.is_ascii_alphabetic()) {
        return Err("Base currency must contain only letters".to_string());
    }

    Ok(())
}

/// Validate a numeric value of a conversion payload
pub fn validate_value(field: &str, value: f64) -> Result<(), String> {
    if !value.is_finite() {
        return Err(format!("{} must be a finite number", field));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_plain_emails() {
        assert!(validate_email("ada@example.com").is_ok());
        assert!(validate_email("a.b+c@sub.example.co").is_ok());
    }

    #[test]
    fn rejects_malformed_emails() {
        assert!(validate_email("").is_err());
        assert!(validate_email("not-an-email").is_err());
        assert!(validate_email("missing@tld").is_err());
    }

    #[test]
    fn unit_fields_must_be_short_and_non_blank() {
        assert!(validate_unit("fromUnit", "cm").is_ok());
        assert!(validate_unit("fromUnit", "   ").is_err());
        assert!(validate_unit("fromUnit", &"x".repeat(33)).is_err());
    }

    #[test]
    fn base_codes_are_short_alphabetic() {
        assert!(validate_base_code("USD").is_ok());
        assert!(validate_base_code("MATIC").is_ok());
        assert!(validate_base_code("U").is_err());
        assert!(validate_base_code("US1").is_err());
        assert!(validate_base_code("TOOLONGCODE").is_err());
    }

    #[test]
    fn values_must_be_finite() {
        assert!(validate_value("fromValue", 1.5).is_ok());
        assert!(validate_value("fromValue", f64::NAN).is_err());
        assert!(validate_value("fromValue", f64::INFINITY).is_err());
    }
}
