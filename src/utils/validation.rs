use crate::domain::model::{OrderDraft, OrderField, ValidationErrors};
use crate::utils::error::{Result, ShopError};
use regex::Regex;
use std::sync::LazyLock;
use url::Url;

static EMAIL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").unwrap());
static PHONE_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^\+?\d+$").unwrap());

pub const ADDRESS_REQUIRED: &str = "address required";
pub const EMAIL_REQUIRED: &str = "email required";
pub const EMAIL_FORMAT: &str = "invalid email format";
pub const PHONE_REQUIRED: &str = "phone required";
pub const PHONE_FORMAT: &str = "phone must contain only digits (optional leading +)";

pub trait Validate {
    fn validate(&self) -> Result<()>;
}

/// Checks every order field independently; all failures are reported together.
pub fn validate_order(draft: &OrderDraft) -> ValidationErrors {
    let mut errors = ValidationErrors::default();

    if draft.address.is_empty() {
        errors.insert(OrderField::Address, ADDRESS_REQUIRED);
    }

    if draft.email.is_empty() {
        errors.insert(OrderField::Email, EMAIL_REQUIRED);
    } else if !EMAIL_RE.is_match(&draft.email) {
        errors.insert(OrderField::Email, EMAIL_FORMAT);
    }

    if draft.phone.is_empty() {
        errors.insert(OrderField::Phone, PHONE_REQUIRED);
    } else if !PHONE_RE.is_match(&draft.phone) {
        errors.insert(OrderField::Phone, PHONE_FORMAT);
    }

    errors
}

pub fn validate_url(field_name: &str, url_str: &str) -> Result<()> {
    if url_str.is_empty() {
        return Err(ShopError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: url_str.to_string(),
            reason: "URL cannot be empty".to_string(),
        });
    }

    match Url::parse(url_str) {
        Ok(url) => match url.scheme() {
            "http" | "https" => Ok(()),
            scheme => Err(ShopError::InvalidConfigValueError {
                field: field_name.to_string(),
                value: url_str.to_string(),
                reason: format!("Unsupported URL scheme: {}", scheme),
            }),
        },
        Err(e) => Err(ShopError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: url_str.to_string(),
            reason: format!("Invalid URL format: {}", e),
        }),
    }
}

pub fn validate_path(field_name: &str, path: &str) -> Result<()> {
    if path.is_empty() {
        return Err(ShopError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: path.to_string(),
            reason: "Path cannot be empty".to_string(),
        });
    }

    if path.contains('\0') {
        return Err(ShopError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: path.to_string(),
            reason: "Path contains null bytes".to_string(),
        });
    }

    Ok(())
}

pub fn validate_non_empty_string(field_name: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(ShopError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: value.to_string(),
            reason: "Value cannot be empty or whitespace-only".to_string(),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn draft(address: &str, email: &str, phone: &str) -> OrderDraft {
        OrderDraft {
            address: address.to_string(),
            email: email.to_string(),
            phone: phone.to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn test_empty_draft_reports_every_field() {
        let errors = validate_order(&draft("", "", ""));
        assert_eq!(errors.len(), 3);
        assert_eq!(errors.get(OrderField::Address), Some(ADDRESS_REQUIRED));
        assert_eq!(errors.get(OrderField::Email), Some(EMAIL_REQUIRED));
        assert_eq!(errors.get(OrderField::Phone), Some(PHONE_REQUIRED));
    }

    #[test]
    fn test_complete_draft_is_valid() {
        assert!(validate_order(&draft("A", "a@b.co", "+123")).is_empty());
    }

    #[test]
    fn test_bad_email_is_a_format_error_only() {
        let errors = validate_order(&draft("A", "bad", "123"));
        assert_eq!(errors.len(), 1);
        assert_eq!(errors.get(OrderField::Email), Some(EMAIL_FORMAT));
    }

    #[test]
    fn test_email_shape() {
        for bad in ["a@b", "a b@c.d", "a@@b.c", "@b.c", "a@b."] {
            let errors = validate_order(&draft("A", bad, "1"));
            assert_eq!(errors.get(OrderField::Email), Some(EMAIL_FORMAT), "{}", bad);
        }
    }

    #[test]
    fn test_phone_shape() {
        assert!(validate_order(&draft("A", "a@b.co", "89991234567")).is_empty());
        for bad in ["12-34", "+", "1+2", "++1", "phone"] {
            let errors = validate_order(&draft("A", "a@b.co", bad));
            assert_eq!(errors.get(OrderField::Phone), Some(PHONE_FORMAT), "{}", bad);
        }
    }

    #[test]
    fn test_validate_url() {
        assert!(validate_url("api.base_url", "https://example.com").is_ok());
        assert!(validate_url("api.base_url", "http://example.com").is_ok());
        assert!(validate_url("api.base_url", "").is_err());
        assert!(validate_url("api.base_url", "invalid-url").is_err());
        assert!(validate_url("api.base_url", "ftp://example.com").is_err());
    }

    #[test]
    fn test_validate_path_and_strings() {
        assert!(validate_path("storage.path", "./data").is_ok());
        assert!(validate_path("storage.path", "").is_err());
        assert!(validate_non_empty_string("storage.basket_key", "   ").is_err());
    }
}
