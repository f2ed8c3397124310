//! # checkout-client
//!
//! Client side of the storefront checkout flow.
//!
//! This crate provides:
//! - `CheckoutClient`: normalizes the cart, picks the endpoint, posts the
//!   request, and clears the cart / redirects or alerts
//! - `EndpointStrategy`: fixed path or host-based path selection
//! - `CartStore`, `Navigator`, `Notifier`: the page-side collaborators
//! - Browser bindings when built for `wasm32`
//!
//! ## Usage (JavaScript)
//!
//! ```javascript
//! import init, { checkout } from 'checkout-client';
//!
//! await init();
//!
//! try {
//!   await checkout(cart, clearCart);
//! } catch (e) {
//!   setIsLoading(false);
//! }
//! ```
//!
//! ## Building
//!
//! ```bash
//! wasm-pack build crates/checkout-client --target web
//! ```

pub mod checkout;
pub mod config;
pub mod error;

#[cfg(target_arch = "wasm32")]
pub mod browser;

pub use checkout::{
    extract_error_message, report_failure, CartStore, CheckoutClient, CheckoutRedirect, Navigator,
    Notifier,
};
pub use config::{ClientConfig, EndpointStrategy, API_CHECKOUT_PATH, FUNCTION_CHECKOUT_PATH};
pub use error::{ClientError, ClientResult};
