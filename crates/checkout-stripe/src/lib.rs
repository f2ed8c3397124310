//! # checkout-stripe
//!
//! Stripe payment strategy for the storefront checkout flow.
//!
//! **StripeCheckoutStrategy** creates hosted Checkout Sessions:
//! - Dynamic line items priced in minor units
//! - One fixed-amount shipping option (free or flat fee)
//! - Cart summary stored in session metadata
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use checkout_stripe::StripeCheckoutStrategy;
//! use checkout_core::PaymentStrategy;
//!
//! // Create strategy from environment
//! let strategy = StripeCheckoutStrategy::from_env()?;
//!
//! // Create checkout session
//! let session = strategy.create_checkout(&params).await?;
//!
//! // Redirect user to session.url
//! ```

pub mod checkout;
pub mod config;

// Re-exports
pub use checkout::StripeCheckoutStrategy;
pub use config::StripeConfig;
