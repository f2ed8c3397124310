//! # Client Configuration
//!
//! Where the checkout request is sent.

use crate::error::{ClientError, ClientResult};
use reqwest::Url;

/// Path redirected to the checkout function in local development
pub const API_CHECKOUT_PATH: &str = "/api/create-checkout";

/// Direct function path on Netlify deployments
pub const FUNCTION_CHECKOUT_PATH: &str = "/.netlify/functions/create-checkout";

/// How the endpoint path is chosen
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EndpointStrategy {
    /// Always use this path
    Fixed(String),
    /// Use `matched_path` when the page host contains `host_marker`, else `fallback_path`
    HostBased {
        host_marker: String,
        matched_path: String,
        fallback_path: String,
    },
}

impl EndpointStrategy {
    /// Function path on `*.netlify.app`, API path everywhere else
    pub fn netlify() -> Self {
        EndpointStrategy::HostBased {
            host_marker: "netlify.app".to_string(),
            matched_path: FUNCTION_CHECKOUT_PATH.to_string(),
            fallback_path: API_CHECKOUT_PATH.to_string(),
        }
    }

    /// Path to use for a page served from `host`
    pub fn resolve(&self, host: &str) -> &str {
        match self {
            EndpointStrategy::Fixed(path) => path.as_str(),
            EndpointStrategy::HostBased {
                host_marker,
                matched_path,
                fallback_path,
            } => {
                if host.contains(host_marker.as_str()) {
                    matched_path.as_str()
                } else {
                    fallback_path.as_str()
                }
            }
        }
    }
}

impl Default for EndpointStrategy {
    fn default() -> Self {
        Self::netlify()
    }
}

/// Checkout client configuration
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Origin of the storefront (e.g., "https://raveremedy.netlify.app")
    pub base_url: Url,
    pub endpoint: EndpointStrategy,
}

impl ClientConfig {
    /// Config with the default host-based endpoint selection
    pub fn new(base_url: &str) -> ClientResult<Self> {
        let base_url =
            Url::parse(base_url).map_err(|e| ClientError::InvalidEndpoint(e.to_string()))?;
        Ok(Self {
            base_url,
            endpoint: EndpointStrategy::default(),
        })
    }

    /// Builder: set endpoint strategy
    pub fn with_endpoint(mut self, endpoint: EndpointStrategy) -> Self {
        self.endpoint = endpoint;
        self
    }

    /// Absolute URL the checkout request is posted to
    pub fn endpoint_url(&self) -> ClientResult<Url> {
        let host = self.base_url.host_str().unwrap_or("");
        let path = self.endpoint.resolve(host);
        self.base_url
            .join(path)
            .map_err(|e| ClientError::InvalidEndpoint(e.to_string()))
    }

    /// True when the resolved path is the direct function path
    pub fn uses_function_path(&self) -> bool {
        let host = self.base_url.host_str().unwrap_or("");
        self.endpoint.resolve(host) == FUNCTION_CHECKOUT_PATH
    }
}
