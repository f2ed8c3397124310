//! # Payment Strategy Trait
//!
//! Seam between the checkout endpoint and the hosted-checkout provider.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                    PaymentStrategy (trait)                  │
//! │  ├── create_checkout()                                      │
//! │  ├── verify_connection()                                    │
//! │  └── provider_name()                                        │
//! └─────────────────────────────────────────────────────────────┘
//!                            ▲
//!                   ┌────────┴────────┐
//!                   │ StripeCheckout  │
//!                   │    Strategy     │
//!                   └─────────────────┘
//! ```
//!
//! The server builds one strategy at startup and hands it to the router as
//! shared state; there is no module-level client.

use crate::error::PaymentResult;
use crate::order::{CheckoutSession, SessionParams};
use async_trait::async_trait;
use std::sync::Arc;

/// Core trait for payment provider implementations.
#[async_trait]
pub trait PaymentStrategy: Send + Sync {
    /// Create a hosted checkout session.
    ///
    /// # Arguments
    /// * `params` - Line items, shipping terms, redirect URLs and metadata
    ///
    /// # Returns
    /// A `CheckoutSession` containing the redirect URL and session id.
    async fn create_checkout(&self, params: &SessionParams) -> PaymentResult<CheckoutSession>;

    /// Cheap authenticated call used to confirm credentials at startup.
    async fn verify_connection(&self) -> PaymentResult<()> {
        Ok(())
    }

    /// Get the provider name (for logging).
    fn provider_name(&self) -> &'static str;
}

/// Type alias for a shared payment strategy (dynamic dispatch)
pub type BoxedPaymentStrategy = Arc<dyn PaymentStrategy>;

/// Redirect targets for the hosted checkout page
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckoutUrls {
    /// Public base URL of the storefront (e.g., "https://raveremedy.netlify.app")
    pub base_url: String,
    /// Success page path
    pub success_path: String,
    /// Cancel page path
    pub cancel_path: String,
}

impl CheckoutUrls {
    pub fn new(base_url: impl Into<String>) -> Self {
        let base_url: String = base_url.into();
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            success_path: "/success".to_string(),
            cancel_path: "/cancel".to_string(),
        }
    }

    pub fn success_url(&self) -> String {
        format!("{}{}", self.base_url, self.success_path)
    }

    pub fn cancel_url(&self) -> String {
        format!("{}{}", self.base_url, self.cancel_path)
    }
}

impl Default for CheckoutUrls {
    fn default() -> Self {
        Self::new("http://localhost:8080")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cart::{CartItem, CheckoutRequest};
    use crate::order::SessionPolicy;

    struct FixedStrategy;

    #[async_trait]
    impl PaymentStrategy for FixedStrategy {
        async fn create_checkout(&self, params: &SessionParams) -> PaymentResult<CheckoutSession> {
            Ok(CheckoutSession::new(
                "sess_fixed",
                format!("{}?from=fixed", params.success_url),
                self.provider_name(),
            ))
        }

        fn provider_name(&self) -> &'static str {
            "fixed"
        }
    }

    #[test]
    fn test_checkout_urls() {
        let urls = CheckoutUrls::new("https://raveremedy.netlify.app");

        assert_eq!(urls.success_url(), "https://raveremedy.netlify.app/success");
        assert_eq!(urls.cancel_url(), "https://raveremedy.netlify.app/cancel");
    }

    #[test]
    fn test_checkout_urls_trailing_slash() {
        let urls = CheckoutUrls::new("http://localhost:8888/");
        assert_eq!(urls.success_url(), "http://localhost:8888/success");
    }

    #[tokio::test]
    async fn test_strategy_via_trait_object() {
        let strategy: BoxedPaymentStrategy = Arc::new(FixedStrategy);
        let request = CheckoutRequest {
            cart: vec![CartItem::new("Pack", 995)],
        };
        let params = SessionParams::from_request(
            &request,
            &CheckoutUrls::new("https://shop.example"),
            &SessionPolicy::default(),
        )
        .unwrap();

        assert!(strategy.verify_connection().await.is_ok());
        let session = strategy.create_checkout(&params).await.unwrap();
        assert_eq!(session.id, "sess_fixed");
        assert_eq!(session.url, "https://shop.example/success?from=fixed");
        assert_eq!(session.provider, "fixed");
    }
}
