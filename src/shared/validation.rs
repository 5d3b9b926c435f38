use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    /// Regex for validating phone numbers
    /// Optional leading plus, then 7-15 digits; spaces and hyphens allowed between digits
    /// - Valid: "+919876543210", "0812-3456-789", "555 0100 200"
    /// - Invalid: "abc", "12", "+", "--1234567"
    pub static ref PHONE_REGEX: Regex =
        Regex::new(r"^\+?[0-9](?:[ -]?[0-9]){6,14}$").unwrap();
}

/// Trim and lowercase an email so lookups are case-insensitive
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

/// Trim optional free text, treating blank input as absent
pub fn clean_optional(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_phone_regex_valid() {
        assert!(PHONE_REGEX.is_match("+919876543210"));
        assert!(PHONE_REGEX.is_match("0812-3456-789"));
        assert!(PHONE_REGEX.is_match("555 0100 200"));
        assert!(PHONE_REGEX.is_match("1234567"));
    }

    #[test]
    fn test_phone_regex_invalid() {
        assert!(!PHONE_REGEX.is_match("abc")); // letters
        assert!(!PHONE_REGEX.is_match("12")); // too short
        assert!(!PHONE_REGEX.is_match("+")); // no digits
        assert!(!PHONE_REGEX.is_match("--1234567")); // leading separators
        assert!(!PHONE_REGEX.is_match("")); // empty
        assert!(!PHONE_REGEX.is_match("1234567890123456789")); // too long
    }

    #[test]
    fn test_normalize_email() {
        assert_eq!(normalize_email("  Jane.Doe@Example.COM "), "jane.doe@example.com");
    }

    #[test]
    fn test_clean_optional() {
        assert_eq!(clean_optional(Some("  ".to_string())), None);
        assert_eq!(clean_optional(None), None);
        assert_eq!(
            clean_optional(Some(" Block 4 ".to_string())),
            Some("Block 4".to_string())
        );
    }
}
