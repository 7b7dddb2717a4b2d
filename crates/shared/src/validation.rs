//! Common validation utilities.

use validator::ValidationError;

lazy_static::lazy_static! {
    /// ISO 4217 style currency code, e.g. `GBP`.
    pub static ref CURRENCY_REGEX: regex::Regex = regex::Regex::new(r"^[A-Z]{3}$").unwrap();

    /// 24-hour clock time, e.g. `14:30`.
    pub static ref TIME_OF_DAY_REGEX: regex::Regex =
        regex::Regex::new(r"^([01][0-9]|2[0-3]):[0-5][0-9]$").unwrap();
}

/// Validates that a text field is not empty or whitespace only.
pub fn validate_not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        let mut err = ValidationError::new("blank");
        err.message = Some("Value must not be blank".into());
        Err(err)
    } else {
        Ok(())
    }
}

/// Validates a three-letter upper-case currency code.
pub fn validate_currency_code(code: &str) -> Result<(), ValidationError> {
    if CURRENCY_REGEX.is_match(code) {
        Ok(())
    } else {
        let mut err = ValidationError::new("currency_format");
        err.message = Some("Currency must be a three-letter code such as GBP".into());
        Err(err)
    }
}

/// Validates an `HH:MM` time slot.
pub fn validate_time_of_day(time: &str) -> Result<(), ValidationError> {
    if TIME_OF_DAY_REGEX.is_match(time) {
        Ok(())
    } else {
        let mut err = ValidationError::new("time_format");
        err.message = Some("Time must be HH:MM on a 24-hour clock".into());
        Err(err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_not_blank() {
        assert!(validate_not_blank("Oxford").is_ok());
        assert!(validate_not_blank("").is_err());
        assert!(validate_not_blank("   ").is_err());
    }

    #[test]
    fn test_validate_currency_code() {
        assert!(validate_currency_code("GBP").is_ok());
        assert!(validate_currency_code("EUR").is_ok());
        assert!(validate_currency_code("gbp").is_err());
        assert!(validate_currency_code("POUND").is_err());
        assert!(validate_currency_code("").is_err());
    }

    #[test]
    fn test_validate_time_of_day() {
        assert!(validate_time_of_day("09:00").is_ok());
        assert!(validate_time_of_day("23:59").is_ok());
        assert!(validate_time_of_day("24:00").is_err());
        assert!(validate_time_of_day("9:00").is_err());
        assert!(validate_time_of_day("noon").is_err());
    }

    #[test]
    fn test_validate_currency_code_error_message() {
        let err = validate_currency_code("xx").unwrap_err();
        assert_eq!(
            err.message.unwrap().to_string(),
            "Currency must be a three-letter code such as GBP"
        );
    }
}
