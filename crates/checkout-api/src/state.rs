//! # Application State
//!
//! Shared state for the Axum application.
//! Contains the payment strategy, redirect URLs, session policy and configuration.

use checkout_core::{BoxedPaymentStrategy, CheckoutUrls, SessionPolicy};
use checkout_stripe::StripeCheckoutStrategy;
use std::sync::Arc;

/// Public URL used for redirects in production when none is configured
pub const PRODUCTION_BASE_URL: &str = "https://raveremedy.netlify.app";

/// Paths the checkout handler is mounted on
pub const DEFAULT_CHECKOUT_PATHS: [&str; 2] =
    ["/api/create-checkout", "/.netlify/functions/create-checkout"];

/// Headers accepted on cross-origin requests
pub const DEFAULT_ALLOWED_HEADERS: &str = "Content-Type, Authorization";

/// CORS knobs for the checkout endpoint
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CorsSettings {
    /// Header names accepted on cross-origin requests
    pub allowed_headers: Vec<String>,
}

impl CorsSettings {
    /// Parse a comma-separated header list, ignoring blanks
    pub fn from_header_list(list: &str) -> Self {
        Self {
            allowed_headers: list
                .split(',')
                .map(str::trim)
                .filter(|h| !h.is_empty())
                .map(String::from)
                .collect(),
        }
    }
}

impl Default for CorsSettings {
    fn default() -> Self {
        Self::from_header_list(DEFAULT_ALLOWED_HEADERS)
    }
}

/// Application configuration
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Host to bind to
    pub host: String,
    /// Port to listen on
    pub port: u16,
    /// Public base URL used for success/cancel redirects
    pub base_url: String,
    /// Environment (development, staging, production)
    pub environment: String,
    /// CORS settings
    pub cors: CorsSettings,
    /// Paths serving the checkout endpoint
    pub checkout_paths: Vec<String>,
}

impl AppConfig {
    /// Load from environment variables
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();

        let port = std::env::var("PORT")
            .ok()
            .and_then(|p| p.parse().ok())
            .unwrap_or(8080);
        let environment =
            std::env::var("ENVIRONMENT").unwrap_or_else(|_| "development".to_string());

        // BASE_URL wins; URL is what Netlify sets for the deployed site
        let base_url = std::env::var("BASE_URL")
            .or_else(|_| std::env::var("URL"))
            .ok()
            .filter(|u| !u.trim().is_empty())
            .unwrap_or_else(|| default_base_url(&environment, port));

        let cors = std::env::var("CORS_ALLOWED_HEADERS")
            .map(|list| CorsSettings::from_header_list(&list))
            .unwrap_or_default();

        let checkout_paths = std::env::var("CHECKOUT_PATHS")
            .map(|list| parse_paths(&list))
            .unwrap_or_else(|_| default_checkout_paths());

        Self {
            host: std::env::var("HOST").unwrap_or_else(|_| "127.0.0.1".to_string()),
            port,
            base_url,
            environment,
            cors,
            checkout_paths,
        }
    }

    /// Get the socket address to bind to
    pub fn socket_addr(&self) -> Result<std::net::SocketAddr, std::net::AddrParseError> {
        format!("{}:{}", self.host, self.port).parse()
    }

    /// Check if running in production
    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }

    /// Reject settings the router cannot be built from
    pub fn validate(&self) -> anyhow::Result<()> {
        if self.checkout_paths.is_empty() {
            anyhow::bail!("at least one checkout path is required");
        }
        if let Some(path) = self.checkout_paths.iter().find(|p| !p.starts_with('/')) {
            anyhow::bail!("checkout path must start with '/': {}", path);
        }
        if self.cors.allowed_headers.is_empty() {
            anyhow::bail!("CORS_ALLOWED_HEADERS must name at least one header");
        }
        Ok(())
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 8080,
            base_url: default_base_url("development", 8080),
            environment: "development".to_string(),
            cors: CorsSettings::default(),
            checkout_paths: default_checkout_paths(),
        }
    }
}

fn default_base_url(environment: &str, port: u16) -> String {
    if environment == "production" {
        PRODUCTION_BASE_URL.to_string()
    } else {
        format!("http://localhost:{}", port)
    }
}

fn default_checkout_paths() -> Vec<String> {
    DEFAULT_CHECKOUT_PATHS.iter().map(|p| p.to_string()).collect()
}

/// Split a comma-separated path list, dropping blanks and duplicates
fn parse_paths(list: &str) -> Vec<String> {
    let mut paths: Vec<String> = Vec::new();
    for path in list.split(',').map(str::trim).filter(|p| !p.is_empty()) {
        if !paths.iter().any(|p| p == path) {
            paths.push(path.to_string());
        }
    }
    paths
}

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    /// Payment provider, built once at startup
    pub strategy: BoxedPaymentStrategy,
    /// Success/cancel redirect URLs
    pub urls: CheckoutUrls,
    /// Fixed session settings
    pub policy: SessionPolicy,
    /// Application config
    pub config: AppConfig,
}

impl AppState {
    /// Create a new AppState with the Stripe strategy.
    ///
    /// Fails if the provider cannot be configured, so the server never starts
    /// without a usable payment client.
    pub fn new(config: AppConfig) -> anyhow::Result<Self> {
        let stripe_strategy = StripeCheckoutStrategy::from_env()
            .map_err(|e| anyhow::anyhow!("Failed to initialize Stripe: {}", e))?;

        Self::with_strategy(config, Arc::new(stripe_strategy))
    }

    /// Create state around an already constructed strategy
    pub fn with_strategy(
        config: AppConfig,
        strategy: BoxedPaymentStrategy,
    ) -> anyhow::Result<Self> {
        config.validate()?;

        Ok(Self {
            strategy,
            urls: CheckoutUrls::new(&config.base_url),
            policy: SessionPolicy::default(),
            config,
        })
    }
}
