//! Request payload validation shared by the write handlers.

use crate::ServerError;

const CARD_NAME_MAX: usize = 100;
const CATEGORY_NAME_MAX: usize = 50;

fn is_hex_color(color: &str) -> bool {
    let Some(digits) = color.strip_prefix('#') else {
        return false;
    };
    matches!(digits.len(), 3 | 6) && digits.chars().all(|c| c.is_ascii_hexdigit())
}

fn check_name(name: &str, max: usize, violations: &mut Vec<String>) {
    if name.trim().is_empty() {
        violations.push("name is required".to_string());
    } else if name.chars().count() > max {
        violations.push(format!("name must be at most {max} characters"));
    }
}

fn check_color(color: &str, violations: &mut Vec<String>) {
    if !is_hex_color(color) {
        violations.push("color must be a hex color like #3B82F6".to_string());
    }
}

pub(crate) fn card_payload(name: &str, color: &str) -> Result<(), ServerError> {
    let mut violations = Vec::new();
    check_name(name, CARD_NAME_MAX, &mut violations);
    check_color(color, &mut violations);
    if violations.is_empty() {
        Ok(())
    } else {
        Err(ServerError::validation(violations))
    }
}

pub(crate) fn category_payload(name: &str, color: &str) -> Result<(), ServerError> {
    let mut violations = Vec::new();
    check_name(name, CATEGORY_NAME_MAX, &mut violations);
    check_color(color, &mut violations);
    if violations.is_empty() {
        Ok(())
    } else {
        Err(ServerError::validation(violations))
    }
}

pub(crate) fn expense_amount(amount: f64) -> Result<(), ServerError> {
    if amount > 0.0 && amount.is_finite() {
        Ok(())
    } else {
        Err(ServerError::validation(vec![
            "amount must be greater than zero".to_string(),
        ]))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_short_and_long_hex_colors() {
        assert!(is_hex_color("#abc"));
        assert!(is_hex_color("#3B82F6"));
    }

    #[test]
    fn rejects_malformed_colors() {
        assert!(!is_hex_color("3B82F6"));
        assert!(!is_hex_color("#3B82F"));
        assert!(!is_hex_color("#GGGGGG"));
        assert!(!is_hex_color(""));
    }

    #[test]
    fn card_name_limits() {
        assert!(card_payload("Visa", "#3B82F6").is_ok());
        assert!(card_payload("", "#3B82F6").is_err());
        assert!(card_payload(&"x".repeat(101), "#3B82F6").is_err());
        assert!(card_payload(&"x".repeat(100), "#3B82F6").is_ok());
    }

    #[test]
    fn category_name_is_shorter() {
        assert!(category_payload(&"x".repeat(50), "#10B981").is_ok());
        assert!(category_payload(&"x".repeat(51), "#10B981").is_err());
    }

    #[test]
    fn amount_must_be_positive_and_finite() {
        assert!(expense_amount(0.01).is_ok());
        assert!(expense_amount(0.0).is_err());
        assert!(expense_amount(-5.0).is_err());
        assert!(expense_amount(f64::NAN).is_err());
        assert!(expense_amount(f64::INFINITY).is_err());
    }
}
