//! Common validation utilities.

use validator::ValidationError;

/// Largest participation share a single member can hold.
pub const MAX_PERCENTAGE: i32 = 100;

/// URL schemes accepted for persisted attachments.
const DURABLE_URL_SCHEMES: [&str; 2] = ["https://", "http://"];

/// Validates that a text value contains something other than whitespace.
pub fn validate_not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        let mut err = ValidationError::new("blank");
        err.message = Some("Value must not be blank".into());
        Err(err)
    } else {
        Ok(())
    }
}

/// Validates that a participation share is within 0 to 100.
pub fn validate_percentage(value: i32) -> Result<(), ValidationError> {
    if (0..=MAX_PERCENTAGE).contains(&value) {
        Ok(())
    } else {
        let mut err = ValidationError::new("percentage_range");
        err.message = Some("Percentage must be between 0 and 100".into());
        Err(err)
    }
}

/// Validates that an attachment link points at durable storage.
///
/// Browser object URLs (`blob:`) and inline `data:` URLs only live as long
/// as the page that created them, so they are rejected.
pub fn validate_attachment_url(value: &str) -> Result<(), ValidationError> {
    let lower = value.trim().to_ascii_lowercase();

    let rest = DURABLE_URL_SCHEMES
        .iter()
        .find_map(|scheme| lower.strip_prefix(scheme));

    match rest {
        Some(rest) if !rest.is_empty() && !rest.starts_with('/') && !value.contains(char::is_whitespace) => {
            Ok(())
        }
        _ => {
            let mut err = ValidationError::new("attachment_url");
            err.message = Some("Attachment must be an http(s) URL to uploaded content".into());
            Err(err)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_not_blank() {
        assert!(validate_not_blank("done").is_ok());
        assert!(validate_not_blank("  x  ").is_ok());
        assert!(validate_not_blank("").is_err());
        assert!(validate_not_blank("   \n\t").is_err());
    }

    #[test]
    fn test_validate_percentage() {
        assert!(validate_percentage(0).is_ok());
        assert!(validate_percentage(55).is_ok());
        assert!(validate_percentage(100).is_ok());
        assert!(validate_percentage(-1).is_err());
        assert!(validate_percentage(101).is_err());
    }

    #[test]
    fn test_validate_percentage_error_message() {
        let err = validate_percentage(150).unwrap_err();
        assert_eq!(
            err.message.unwrap().to_string(),
            "Percentage must be between 0 and 100"
        );
    }

    #[test]
    fn test_validate_attachment_url_accepts_http() {
        assert!(validate_attachment_url("https://cdn.example.com/course/intro.pdf").is_ok());
        assert!(validate_attachment_url("http://files.local/a.png").is_ok());
        assert!(validate_attachment_url("HTTPS://CDN.EXAMPLE.COM/A.PNG").is_ok());
    }

    #[test]
    fn test_validate_attachment_url_rejects_object_urls() {
        assert!(validate_attachment_url(
            "blob:https://portal.example.com/7f1c3a52-0f55-4a35-9f0e-1b2a3c4d5e6f"
        )
        .is_err());
        assert!(validate_attachment_url("data:image/png;base64,iVBORw0KGgo=").is_err());
    }

    #[test]
    fn test_validate_attachment_url_rejects_malformed() {
        assert!(validate_attachment_url("").is_err());
        assert!(validate_attachment_url("https://").is_err());
        assert!(validate_attachment_url("https:///path-only").is_err());
        assert!(validate_attachment_url("ftp://files.example.com/a").is_err());
        assert!(validate_attachment_url("https://example.com/with space.pdf").is_err());
    }
}
