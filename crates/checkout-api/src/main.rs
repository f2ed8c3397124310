//! # Storefront Checkout
//!
//! Session-creation server for the storefront checkout flow.
//!
//! ## Usage
//!
//! ```bash
//! # Set environment variables
//! export STRIPE_SECRET_KEY=sk_test_...
//! export BASE_URL=https://raveremedy.netlify.app
//!
//! # Run the server
//! storefront-checkout
//! ```

use checkout_api::{routes, state::AppConfig, state::AppState};
use tracing::{error, info, warn, Level};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(
            EnvFilter::builder()
                .with_default_directive(Level::INFO.into())
                .from_env_lossy(),
        )
        .init();

    let config = AppConfig::from_env();
    log_environment(&config);

    // Refuse to serve without a working provider configuration
    let state = match AppState::new(config) {
        Ok(state) => state,
        Err(e) => {
            error!("Stripe initialization error: {:#}", e);
            return Err(e);
        }
    };

    let addr = state.config.socket_addr()?;

    // Credentials check runs in the background; startup does not wait on it
    let strategy = state.strategy.clone();
    tokio::spawn(async move {
        match strategy.verify_connection().await {
            Ok(()) => info!("✓ {} connection successful", strategy.provider_name()),
            Err(e) => error!("× {} connection failed: {}", strategy.provider_name(), e),
        }
    });

    let is_prod = state.config.is_production();
    let paths = state.config.checkout_paths.clone();

    // Create router
    let app = routes::create_router(state);

    info!("Storefront checkout starting on http://{}", addr);

    if !is_prod {
        for path in &paths {
            info!("Checkout: POST http://{}{}", addr, path);
        }
    }

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// Log what the server sees in its environment without leaking the key
fn log_environment(config: &AppConfig) {
    info!("Environment: {}", config.environment);
    info!("Redirect base URL: {}", config.base_url);
    info!("CORS allowed headers: {}", config.cors.allowed_headers.join(", "));

    match std::env::var("STRIPE_SECRET_KEY") {
        Ok(key) if !key.is_empty() => info!(
            "STRIPE_SECRET_KEY present: true (prefix {})",
            key.get(..4).unwrap_or("")
        ),
        _ => warn!("STRIPE_SECRET_KEY present: false"),
    }
}
