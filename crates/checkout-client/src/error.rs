//! # Client Error Types
//!
//! Errors surfaced to the shopper when a checkout attempt fails.
//! The `Display` text is what ends up in the alert.

use checkout_core::PaymentError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ClientError {
    /// Nothing to check out; never reaches the network
    #[error("Your cart is empty")]
    EmptyCart,

    /// Cart items that cannot be turned into a checkout request
    #[error("{0}")]
    InvalidCart(String),

    /// Non-2xx response, message extracted from the body
    #[error("{0}")]
    Server(String),

    /// 2xx response without a redirect URL
    #[error("No checkout URL returned from server")]
    MissingUrl,

    /// Transport failure
    #[error("{0}")]
    Network(String),

    /// 2xx response whose body is not the expected JSON
    #[error("Invalid response from server: {0}")]
    InvalidResponse(String),

    #[error("Invalid checkout endpoint: {0}")]
    InvalidEndpoint(String),

    #[error("Configuration error: {0}")]
    Configuration(String),
}

pub type ClientResult<T> = Result<T, ClientError>;

impl From<PaymentError> for ClientError {
    fn from(err: PaymentError) -> Self {
        match err {
            PaymentError::InvalidCart => ClientError::EmptyCart,
            other => ClientError::InvalidCart(other.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_cart_maps_to_empty_cart() {
        let err: ClientError = PaymentError::InvalidCart.into();
        assert!(matches!(err, ClientError::EmptyCart));
        assert_eq!(err.to_string(), "Your cart is empty");
    }

    #[test]
    fn test_other_cart_errors_keep_their_message() {
        let err: ClientError = PaymentError::InvalidCartItem {
            index: 1,
            reason: "unitPrice must not be negative".to_string(),
        }
        .into();

        assert!(matches!(err, ClientError::InvalidCart(_)));
        assert_eq!(
            err.to_string(),
            "Invalid cart item at index 1: unitPrice must not be negative"
        );
    }
}
