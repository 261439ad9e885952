use thiserror::Error;

#[derive(Error, Debug)]
pub enum ShopError {
    #[error("API request failed: {0}")]
    ApiError(#[from] reqwest::Error),

    #[error("Server responded with {status}: {message}")]
    ServerError { status: u16, message: String },

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Configuration validation failed for '{field}': {message}")]
    ConfigValidationError { field: String, message: String },

    #[error("Invalid value '{value}' for '{field}': {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Product '{id}' is not in the catalog")]
    LookupError { id: String },

    #[error("Unknown event: {name}")]
    UnknownEvent { name: String },

    #[error("View element not found: {selector}")]
    MissingElement { selector: String },
}

impl ShopError {
    /// Network and server failures leave state untouched and can be retried by the user.
    pub fn is_retryable(&self) -> bool {
        match self {
            ShopError::ApiError(_) | ShopError::IoError(_) => true,
            ShopError::ServerError { status, .. } => *status >= 500,
            _ => false,
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self {
            ShopError::ApiError(_) => "Could not reach the shop service".to_string(),
            ShopError::ServerError { message, .. } => format!("The shop rejected the request: {}", message),
            ShopError::ConfigValidationError { .. } | ShopError::InvalidConfigValueError { .. } => {
                format!("Bad configuration: {}", self)
            }
            ShopError::LookupError { id } => format!("Product {} is no longer available", id),
            other => other.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, ShopError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_server_errors_retry_only_on_5xx() {
        let busy = ShopError::ServerError {
            status: 503,
            message: "busy".to_string(),
        };
        let rejected = ShopError::ServerError {
            status: 400,
            message: "Неверная сумма заказа".to_string(),
        };
        assert!(busy.is_retryable());
        assert!(!rejected.is_retryable());
        assert!(rejected.user_friendly_message().contains("Неверная сумма заказа"));
    }

    #[test]
    fn test_config_errors_are_reported_as_bad_configuration() {
        let err = ShopError::InvalidConfigValueError {
            field: "api.base_url".to_string(),
            value: "ftp://x".to_string(),
            reason: "Unsupported URL scheme: ftp".to_string(),
        };
        assert!(err.user_friendly_message().starts_with("Bad configuration:"));
        assert!(!err.is_retryable());
    }

    #[test]
    fn test_lookup_error_message() {
        let err = ShopError::LookupError { id: "p9".to_string() };
        assert_eq!(err.to_string(), "Product 'p9' is not in the catalog");
        assert!(!err.is_retryable());
    }
}
