//! # checkout-core
//!
//! Core types and traits for the storefront checkout flow.
//!
//! This crate provides:
//! - `CartItem` and `CheckoutRequest` with request-body validation
//! - `LineItem`, `ShippingRate` and `SessionParams` derived from a cart
//! - `CheckoutSession` as returned by a provider
//! - `PaymentStrategy` trait for hosted-checkout providers
//! - `PaymentError` for typed error handling
//!
//! ## Example
//!
//! ```rust,ignore
//! use checkout_core::{CheckoutRequest, CheckoutUrls, SessionParams, SessionPolicy};
//!
//! let request = CheckoutRequest::from_slice(body)?;
//! let params = SessionParams::from_request(
//!     &request,
//!     &CheckoutUrls::new("https://raveremedy.netlify.app"),
//!     &SessionPolicy::default(),
//! )?;
//!
//! let session = strategy.create_checkout(&params).await?;
//! // Redirect user to session.url
//! ```

pub mod cart;
pub mod error;
pub mod order;
pub mod strategy;

// Re-exports for convenience
pub use cart::{CartItem, CheckoutRequest, Currency, DEFAULT_DESCRIPTION, DEFAULT_FLAVOR};
pub use error::{PaymentError, PaymentResult};
pub use order::{
    cart_summary, qualifies_for_free_shipping, CheckoutSession, DeliveryEstimate, LineItem,
    SessionParams, SessionPolicy, ShippingRate, CART_METADATA_KEY, FLAT_SHIPPING_FEE,
};
pub use strategy::{BoxedPaymentStrategy, CheckoutUrls, PaymentStrategy};
