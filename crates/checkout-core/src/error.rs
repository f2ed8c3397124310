//! # Checkout Error Types
//!
//! Typed error handling for the storefront checkout flow.
//! All checkout operations return `Result<T, PaymentError>`.

use thiserror::Error;

/// Core error type for all checkout operations
#[derive(Debug, Error)]
pub enum PaymentError {
    /// Configuration errors (missing keys, invalid config)
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// HTTP method other than POST/OPTIONS
    #[error("Method Not Allowed")]
    MethodNotAllowed,

    /// Request arrived without a body
    #[error("Missing request body")]
    MissingBody,

    /// Body is not valid JSON
    #[error("Invalid JSON body")]
    InvalidJson(String),

    /// `cart` field missing, not an array, or empty
    #[error("Missing or invalid cart data")]
    InvalidCart,

    /// A cart entry could not be accepted
    #[error("Invalid cart item at index {index}: {reason}")]
    InvalidCartItem { index: usize, reason: String },

    /// Payment provider API error
    #[error("Provider error [{provider}]: {message}")]
    ProviderError { provider: String, message: String },

    /// Network/HTTP error communicating with provider
    #[error("Network error: {0}")]
    NetworkError(String),

    /// Serialization/deserialization error
    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl PaymentError {
    /// Returns the HTTP status code appropriate for this error
    pub fn status_code(&self) -> u16 {
        match self {
            PaymentError::MethodNotAllowed => 405,
            PaymentError::MissingBody
            | PaymentError::InvalidJson(_)
            | PaymentError::InvalidCart
            | PaymentError::InvalidCartItem { .. } => 400,
            PaymentError::Configuration(_)
            | PaymentError::ProviderError { .. }
            | PaymentError::NetworkError(_)
            | PaymentError::Serialization(_) => 500,
        }
    }

    /// True for errors caused by the caller's request rather than by us or the provider
    pub fn is_client_error(&self) -> bool {
        (400..500).contains(&self.status_code())
    }

    /// Extra diagnostic text that does not belong in the short message
    pub fn details(&self) -> Option<String> {
        match self {
            PaymentError::InvalidJson(reason) => Some(reason.clone()),
            _ => None,
        }
    }
}

/// Result type alias for checkout operations
pub type PaymentResult<T> = Result<T, PaymentError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes() {
        assert_eq!(PaymentError::MethodNotAllowed.status_code(), 405);
        assert_eq!(PaymentError::MissingBody.status_code(), 400);
        assert_eq!(PaymentError::InvalidCart.status_code(), 400);
        assert_eq!(
            PaymentError::ProviderError {
                provider: "stripe".into(),
                message: "card declined".into()
            }
            .status_code(),
            500
        );
        assert_eq!(
            PaymentError::Configuration("STRIPE_SECRET_KEY not set".into()).status_code(),
            500
        );
    }

    #[test]
    fn test_client_error_classification() {
        assert!(PaymentError::InvalidJson("eof".into()).is_client_error());
        assert!(PaymentError::MethodNotAllowed.is_client_error());
        assert!(!PaymentError::NetworkError("timeout".into()).is_client_error());
    }

    #[test]
    fn test_messages() {
        assert_eq!(PaymentError::MethodNotAllowed.to_string(), "Method Not Allowed");
        assert_eq!(
            PaymentError::InvalidCart.to_string(),
            "Missing or invalid cart data"
        );
        assert_eq!(
            PaymentError::InvalidJson("expected value".into()).details(),
            Some("expected value".to_string())
        );
    }
}
