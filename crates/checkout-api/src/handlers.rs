//! # Request Handlers
//!
//! Axum request handlers for the checkout API.

use crate::state::AppState;
use axum::{
    body::Bytes,
    extract::State,
    http::{Method, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use checkout_core::{CheckoutRequest, PaymentError, SessionParams};
use serde::{Deserialize, Serialize};
use tracing::{debug, error, info, instrument, warn};

// =============================================================================
// Request/Response Types
// =============================================================================

/// Create checkout response
#[derive(Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct CreateCheckoutResponse {
    /// Session ID
    pub id: String,
    /// Checkout URL (redirect user here)
    pub url: String,
}

/// Error response
#[derive(Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct ErrorResponse {
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

impl ErrorResponse {
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            details: None,
        }
    }

    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }
}

/// Map an error to its status and body.
///
/// Client errors carry their own message; server-side failures get a generic
/// message with the underlying error in `details`.
fn payment_error_to_response(err: PaymentError) -> (StatusCode, Json<ErrorResponse>) {
    let status =
        StatusCode::from_u16(err.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

    let response = if err.is_client_error() {
        let body = ErrorResponse::new(err.to_string());
        match err.details() {
            Some(details) => body.with_details(details),
            None => body,
        }
    } else {
        ErrorResponse::new("Failed to create checkout session").with_details(err.to_string())
    };

    (status, Json(response))
}

// =============================================================================
// Handlers
// =============================================================================

/// Health check endpoint
pub async fn health() -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "healthy",
        "service": "storefront-checkout",
        "version": env!("CARGO_PKG_VERSION")
    }))
}

/// Checkout endpoint, mounted for every method.
///
/// OPTIONS answers the preflight with an empty body, POST creates a session,
/// anything else is rejected with 405.
#[instrument(skip(state, body), fields(method = %method))]
pub async fn create_checkout(
    State(state): State<AppState>,
    method: Method,
    body: Bytes,
) -> Result<Response, (StatusCode, Json<ErrorResponse>)> {
    if method == Method::OPTIONS {
        debug!("Handling CORS preflight request");
        return Ok(StatusCode::NO_CONTENT.into_response());
    }

    if method != Method::POST {
        warn!("Method not allowed: {}", method);
        return Err(payment_error_to_response(PaymentError::MethodNotAllowed));
    }

    let request = CheckoutRequest::from_slice(&body).map_err(|e| {
        warn!("Rejected checkout request: {}", e);
        payment_error_to_response(e)
    })?;

    info!("Cart contains {} items", request.len());

    let params = SessionParams::from_request(&request, &state.urls, &state.policy).map_err(|e| {
        error!("Failed to build session parameters: {}", e);
        payment_error_to_response(e)
    })?;

    info!(
        "Creating checkout: {} line items ({} units), total={}, free_shipping={}, success_url={}",
        params.line_items.len(),
        params.item_count(),
        params.policy.currency.display_amount(params.total()),
        params.shipping.is_free(),
        params.success_url
    );

    let session = state
        .strategy
        .create_checkout(&params)
        .await
        .map_err(|e| {
            error!("Checkout error: {}", e);
            payment_error_to_response(e)
        })?;

    info!(
        "Checkout session created: {} via {}",
        session.id,
        state.strategy.provider_name()
    );

    Ok(Json(CreateCheckoutResponse {
        id: session.id,
        url: session.url,
    })
    .into_response())
}
