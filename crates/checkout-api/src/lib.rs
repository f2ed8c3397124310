//! # checkout-api
//!
//! HTTP API layer for the storefront checkout flow.
//!
//! This crate provides:
//! - Axum-based HTTP server
//! - The session-creation endpoint (POST, OPTIONS preflight, 405 otherwise)
//! - CORS configured from `CorsSettings`
//!
//! ## Endpoints
//!
//! | Method | Path | Description |
//! |--------|------|-------------|
//! | GET | `/health` | Health check |
//! | POST | `/api/create-checkout` | Create checkout session |
//! | POST | `/.netlify/functions/create-checkout` | Alias |
//! | OPTIONS | both checkout paths | CORS preflight |

pub mod handlers;
pub mod routes;
pub mod state;

pub use routes::create_router;
pub use state::{AppConfig, AppState, CorsSettings};
