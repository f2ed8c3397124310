//! # Checkout Request Builder
//!
//! Turns the shopper's cart into a checkout request, posts it, and either
//! redirects to the hosted checkout page or alerts the shopper.

use crate::config::ClientConfig;
use crate::error::{ClientError, ClientResult};
use checkout_core::{CartItem, CheckoutRequest};
use reqwest::Client;
use serde::Deserialize;
use std::sync::atomic::{AtomicBool, Ordering};
use tracing::{debug, error, info};

/// Cart state owned by the storefront
pub trait CartStore {
    fn cart(&self) -> &[CartItem];
    fn clear_cart(&mut self);
}

/// Full-page navigation
pub trait Navigator {
    fn navigate(&self, url: &str);
}

/// User-visible alert
pub trait Notifier {
    fn alert(&self, message: &str);
}

/// Log a failed checkout attempt and alert the shopper
pub fn report_failure<A: Notifier + ?Sized>(notifier: &A, err: &ClientError) {
    error!("Checkout error: {}", err);
    notifier.alert(&format!("Checkout Error: {}", err));
}

/// Successful response from the checkout endpoint
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckoutRedirect {
    pub id: Option<String>,
    pub url: String,
}

#[derive(Debug, Deserialize)]
struct SessionResponse {
    #[serde(default)]
    id: Option<String>,
    #[serde(default)]
    url: Option<String>,
}

/// Pick the message to show for a failed response.
///
/// JSON bodies yield `error`, then `details`, then `Error <status>`;
/// anything that is not JSON is shown as-is.
pub fn extract_error_message(status: u16, body: &str) -> String {
    let field = |json: &serde_json::Value, name: &str| {
        json.get(name)
            .and_then(|v| v.as_str())
            .filter(|s| !s.is_empty())
            .map(String::from)
    };

    match serde_json::from_str::<serde_json::Value>(body) {
        Ok(json) => field(&json, "error")
            .or_else(|| field(&json, "details"))
            .unwrap_or_else(|| format!("Error {}", status)),
        Err(_) => body.to_string(),
    }
}

/// Client side of the checkout flow
pub struct CheckoutClient<N, A> {
    http: Client,
    config: ClientConfig,
    navigator: N,
    notifier: A,
    loading: AtomicBool,
}

impl<N: Navigator, A: Notifier> CheckoutClient<N, A> {
    pub fn new(config: ClientConfig, navigator: N, notifier: A) -> ClientResult<Self> {
        let http = Client::builder()
            .build()
            .map_err(|e| ClientError::Configuration(e.to_string()))?;

        Ok(Self {
            http,
            config,
            navigator,
            notifier,
            loading: AtomicBool::new(false),
        })
    }

    /// True while a checkout attempt is in flight or redirecting
    pub fn is_loading(&self) -> bool {
        self.loading.load(Ordering::SeqCst)
    }

    /// Post the cart and return the redirect target.
    ///
    /// No side effects on the cart, navigation or alerts.
    pub async fn create_session(&self, cart: &[CartItem]) -> ClientResult<CheckoutRedirect> {
        let request = CheckoutRequest::from_cart(cart)?;
        debug!("Checkout data prepared: {} items", request.len());

        let endpoint = self.config.endpoint_url()?;
        info!(
            "Using {} endpoint: {}",
            if self.config.uses_function_path() {
                "function"
            } else {
                "api"
            },
            endpoint.path()
        );

        let response = self
            .http
            .post(endpoint)
            .json(&request)
            .send()
            .await
            .map_err(|e| ClientError::Network(e.to_string()))?;

        let status = response.status();
        debug!("Response status: {}", status);

        if !status.is_success() {
            let body = response
                .text()
                .await
                .map_err(|e| ClientError::Network(e.to_string()))?;
            error!("Error response: {}", body);
            return Err(ClientError::Server(extract_error_message(
                status.as_u16(),
                &body,
            )));
        }

        let data: SessionResponse = response
            .json()
            .await
            .map_err(|e| ClientError::InvalidResponse(e.to_string()))?;

        let url = data
            .url
            .filter(|u| !u.is_empty())
            .ok_or(ClientError::MissingUrl)?;

        Ok(CheckoutRedirect { id: data.id, url })
    }

    /// Run one checkout attempt against the shopper's cart.
    ///
    /// On success the cart is cleared and the page navigates to the hosted
    /// checkout; on failure the shopper is alerted, the cart is left alone and
    /// the loading flag is reset.
    pub async fn handle_checkout<S: CartStore + ?Sized>(
        &self,
        store: &mut S,
    ) -> ClientResult<CheckoutRedirect> {
        self.loading.store(true, Ordering::SeqCst);

        let result = self.create_session(store.cart()).await;
        match result {
            Ok(redirect) => {
                info!("Checkout response received, redirecting");
                store.clear_cart();
                self.navigator.navigate(&redirect.url);
                Ok(redirect)
            }
            Err(e) => {
                report_failure(&self.notifier, &e);
                self.loading.store(false, Ordering::SeqCst);
                Err(e)
            }
        }
    }
}
