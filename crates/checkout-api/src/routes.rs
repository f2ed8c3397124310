//! # Routes
//!
//! Axum router configuration for the checkout API.

use crate::handlers;
use crate::state::{AppState, CorsSettings};
use axum::{
    http::{HeaderName, Method},
    routing::{any, get},
    Router,
};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing::warn;

/// Create the main application router
///
/// Routes:
/// - GET  /health - Health check
/// - ANY  /api/create-checkout - Create checkout session (POST), preflight (OPTIONS)
/// - ANY  /.netlify/functions/create-checkout - Alias of the above
///
/// The checkout paths come from `AppConfig::checkout_paths`.
pub fn create_router(state: AppState) -> Router {
    let cors = build_cors(&state.config.cors);

    let mut router: Router<AppState> = Router::new()
        .route("/health", get(handlers::health))
        .route("/", get(handlers::health));

    // Every method reaches the handler so it can answer 405 itself
    for path in &state.config.checkout_paths {
        router = router.route(path, any(handlers::create_checkout));
    }

    router
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Build the CORS layer: any origin, POST and OPTIONS, configured headers
pub fn build_cors(settings: &CorsSettings) -> CorsLayer {
    let headers: Vec<HeaderName> = settings
        .allowed_headers
        .iter()
        .filter_map(|name| match HeaderName::from_bytes(name.as_bytes()) {
            Ok(header) => Some(header),
            Err(_) => {
                warn!("Ignoring invalid CORS header name: {}", name);
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::POST, Method::OPTIONS])
        .allow_headers(headers)
}
