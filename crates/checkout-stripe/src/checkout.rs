//! # Stripe Checkout Sessions
//!
//! Implementation of the Stripe Checkout Sessions API.
//! Sessions are created in `payment` mode with a single fixed-amount shipping option.

use crate::config::StripeConfig;
use async_trait::async_trait;
use checkout_core::{
    CheckoutSession, PaymentError, PaymentResult, PaymentStrategy, SessionParams,
};
use chrono::DateTime;
use reqwest::Client;
use serde::Deserialize;
use tracing::{debug, error, info, instrument};

const PROVIDER: &str = "stripe";

/// Stripe Checkout Session strategy
///
/// Uses Stripe's hosted checkout page for secure payments.
pub struct StripeCheckoutStrategy {
    config: StripeConfig,
    client: Client,
}

impl StripeCheckoutStrategy {
    /// Create a new Stripe checkout strategy
    pub fn new(config: StripeConfig) -> PaymentResult<Self> {
        let client = Client::builder()
            .timeout(std::time::Duration::from_secs(30))
            .build()
            .map_err(|e| {
                PaymentError::Configuration(format!("Failed to create HTTP client: {}", e))
            })?;

        info!(
            "Stripe client configured ({} mode, API version {})",
            config.mode(),
            config.api_version
        );

        Ok(Self { config, client })
    }

    /// Create from environment variables
    pub fn from_env() -> PaymentResult<Self> {
        let config = StripeConfig::from_env()?;
        Self::new(config)
    }

    /// Turn an error response body into a `PaymentError`
    fn provider_error(status: reqwest::StatusCode, body: &str) -> PaymentError {
        let message = match serde_json::from_str::<StripeErrorResponse>(body) {
            Ok(error_response) => error_response.error.message,
            Err(_) => format!("HTTP {}: {}", status, body),
        };
        PaymentError::ProviderError {
            provider: PROVIDER.to_string(),
            message,
        }
    }
}

/// Encode session parameters in Stripe's bracketed form syntax
fn build_form(params: &SessionParams) -> Vec<(String, String)> {
    let policy = &params.policy;
    let mut form: Vec<(String, String)> = vec![
        ("mode".to_string(), "payment".to_string()),
        ("success_url".to_string(), params.success_url.clone()),
        ("cancel_url".to_string(), params.cancel_url.clone()),
    ];

    for (i, method) in policy.payment_method_types.iter().enumerate() {
        form.push((format!("payment_method_types[{}]", i), method.clone()));
    }

    // Line items
    for (i, item) in params.line_items.iter().enumerate() {
        let prefix = format!("line_items[{}]", i);
        form.push((
            format!("{}[price_data][currency]", prefix),
            item.currency.as_str().to_string(),
        ));
        form.push((
            format!("{}[price_data][unit_amount]", prefix),
            item.unit_amount.to_string(),
        ));
        form.push((
            format!("{}[price_data][product_data][name]", prefix),
            item.name.clone(),
        ));
        if let Some(ref desc) = item.description {
            form.push((
                format!("{}[price_data][product_data][description]", prefix),
                desc.clone(),
            ));
        }
        for (j, img) in item.images.iter().enumerate() {
            form.push((
                format!("{}[price_data][product_data][images][{}]", prefix, j),
                img.clone(),
            ));
        }
        form.push((
            format!("{}[price_data][product_data][metadata][flavor]", prefix),
            item.flavor.clone(),
        ));
        form.push((format!("{}[quantity]", prefix), item.quantity.to_string()));
    }

    for (i, country) in policy.allowed_shipping_countries.iter().enumerate() {
        form.push((
            format!("shipping_address_collection[allowed_countries][{}]", i),
            country.clone(),
        ));
    }

    // Single fixed-amount shipping option
    let rate = "shipping_options[0][shipping_rate_data]";
    let shipping = &params.shipping;
    form.push((format!("{}[type]", rate), "fixed_amount".to_string()));
    form.push((
        format!("{}[fixed_amount][amount]", rate),
        shipping.amount.to_string(),
    ));
    form.push((
        format!("{}[fixed_amount][currency]", rate),
        shipping.currency.as_str().to_string(),
    ));
    form.push((format!("{}[display_name]", rate), shipping.display_name.clone()));
    form.push((
        format!("{}[delivery_estimate][minimum][unit]", rate),
        "business_day".to_string(),
    ));
    form.push((
        format!("{}[delivery_estimate][minimum][value]", rate),
        shipping.delivery_estimate.min_business_days.to_string(),
    ));
    form.push((
        format!("{}[delivery_estimate][maximum][unit]", rate),
        "business_day".to_string(),
    ));
    form.push((
        format!("{}[delivery_estimate][maximum][value]", rate),
        shipping.delivery_estimate.max_business_days.to_string(),
    ));

    for (key, value) in &params.metadata {
        form.push((format!("metadata[{}]", key), value.clone()));
    }

    form.push((
        "allow_promotion_codes".to_string(),
        policy.allow_promotion_codes.to_string(),
    ));
    form.push((
        "phone_number_collection[enabled]".to_string(),
        policy.collect_phone_number.to_string(),
    ));
    if policy.always_create_customer {
        form.push(("customer_creation".to_string(), "always".to_string()));
    }
    form.push((
        "billing_address_collection".to_string(),
        if policy.require_billing_address {
            "required"
        } else {
            "auto"
        }
        .to_string(),
    ));

    form
}

#[async_trait]
impl PaymentStrategy for StripeCheckoutStrategy {
    #[instrument(skip(self, params), fields(items = params.line_items.len()))]
    async fn create_checkout(&self, params: &SessionParams) -> PaymentResult<CheckoutSession> {
        if params.line_items.is_empty() {
            return Err(PaymentError::InvalidCart);
        }

        let form_params = build_form(params);

        debug!(
            "Creating Stripe checkout session: {} line items, shipping={}",
            params.line_items.len(),
            params.shipping.amount
        );

        let url = format!("{}/v1/checkout/sessions", self.config.api_base_url);

        let response = self
            .client
            .post(&url)
            .header("Authorization", self.config.auth_header())
            .header("Stripe-Version", &self.config.api_version)
            .form(&form_params)
            .send()
            .await
            .map_err(|e| PaymentError::NetworkError(e.to_string()))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| PaymentError::NetworkError(e.to_string()))?;

        if !status.is_success() {
            error!("Stripe API error: status={}, body={}", status, body);
            return Err(Self::provider_error(status, &body));
        }

        let session_response: StripeCheckoutSessionResponse = serde_json::from_str(&body)
            .map_err(|e| {
                PaymentError::Serialization(format!("Failed to parse Stripe response: {}", e))
            })?;

        let url = session_response.url.ok_or_else(|| PaymentError::ProviderError {
            provider: PROVIDER.to_string(),
            message: format!("Session {} has no url", session_response.id),
        })?;

        info!("Checkout session created: {}", session_response.id);

        Ok(CheckoutSession {
            id: session_response.id,
            url,
            provider: PROVIDER.to_string(),
            expires_at: session_response
                .expires_at
                .and_then(|ts| DateTime::from_timestamp(ts, 0)),
        })
    }

    #[instrument(skip(self))]
    async fn verify_connection(&self) -> PaymentResult<()> {
        let url = format!("{}/v1/charges", self.config.api_base_url);

        let response = self
            .client
            .get(&url)
            .query(&[("limit", "1")])
            .header("Authorization", self.config.auth_header())
            .header("Stripe-Version", &self.config.api_version)
            .send()
            .await
            .map_err(|e| PaymentError::NetworkError(e.to_string()))?;

        let status = response.status();
        if status.is_success() {
            return Ok(());
        }

        let body = response
            .text()
            .await
            .map_err(|e| PaymentError::NetworkError(e.to_string()))?;
        Err(Self::provider_error(status, &body))
    }

    fn provider_name(&self) -> &'static str {
        PROVIDER
    }
}

// =============================================================================
// Stripe API Types
// =============================================================================

#[derive(Debug, Deserialize)]
struct StripeCheckoutSessionResponse {
    id: String,
    #[serde(default)]
    url: Option<String>,
    #[serde(default)]
    expires_at: Option<i64>,
}

#[derive(Debug, Deserialize)]
struct StripeErrorResponse {
    error: StripeError,
}

#[derive(Debug, Deserialize)]
struct StripeError {
    message: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use checkout_core::{CartItem, CheckoutRequest, CheckoutUrls, SessionPolicy};
    use wiremock::matchers::{body_string_contains, header, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn params(cart: Vec<CartItem>) -> SessionParams {
        SessionParams::from_request(
            &CheckoutRequest { cart },
            &CheckoutUrls::new("https://raveremedy.netlify.app"),
            &SessionPolicy::default(),
        )
        .unwrap()
    }

    fn form_value<'a>(form: &'a [(String, String)], key: &str) -> Option<&'a str> {
        form.iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    fn strategy(server: &MockServer) -> StripeCheckoutStrategy {
        let config = StripeConfig::new("sk_test_123").with_api_base_url(server.uri());
        StripeCheckoutStrategy::new(config).unwrap()
    }

    #[test]
    fn test_build_form_session_policy() {
        let form = build_form(&params(vec![CartItem::new("Pack", 3995)]));

        assert_eq!(form_value(&form, "mode"), Some("payment"));
        assert_eq!(form_value(&form, "payment_method_types[0]"), Some("card"));
        assert_eq!(
            form_value(&form, "shipping_address_collection[allowed_countries][0]"),
            Some("AU")
        );
        assert_eq!(form_value(&form, "allow_promotion_codes"), Some("true"));
        assert_eq!(form_value(&form, "phone_number_collection[enabled]"), Some("true"));
        assert_eq!(form_value(&form, "customer_creation"), Some("always"));
        assert_eq!(form_value(&form, "billing_address_collection"), Some("required"));
        assert_eq!(
            form_value(&form, "success_url"),
            Some("https://raveremedy.netlify.app/success")
        );
        assert_eq!(
            form_value(&form, "cancel_url"),
            Some("https://raveremedy.netlify.app/cancel")
        );
    }

    #[test]
    fn test_build_form_line_items() {
        let form = build_form(&params(vec![
            CartItem::new("Pack", 3995)
                .with_quantity(2)
                .with_flavor("Berry")
                .with_description("Electrolytes")
                .with_image("https://cdn.example/pack.png"),
            CartItem::new("Tin", 1500),
        ]));

        assert_eq!(form_value(&form, "line_items[0][price_data][currency]"), Some("aud"));
        assert_eq!(form_value(&form, "line_items[0][price_data][unit_amount]"), Some("3995"));
        assert_eq!(form_value(&form, "line_items[0][quantity]"), Some("2"));
        assert_eq!(
            form_value(&form, "line_items[0][price_data][product_data][metadata][flavor]"),
            Some("Berry")
        );
        assert_eq!(
            form_value(&form, "line_items[0][price_data][product_data][images][0]"),
            Some("https://cdn.example/pack.png")
        );
        assert_eq!(
            form_value(&form, "line_items[0][price_data][product_data][description]"),
            Some("Electrolytes")
        );

        // Defaults for the second entry
        assert_eq!(form_value(&form, "line_items[1][quantity]"), Some("1"));
        assert_eq!(
            form_value(&form, "line_items[1][price_data][product_data][description]"),
            None
        );
        assert_eq!(
            form_value(&form, "line_items[1][price_data][product_data][metadata][flavor]"),
            Some("")
        );
    }

    #[test]
    fn test_build_form_shipping() {
        let paid = build_form(&params(vec![CartItem::new("Pack", 3995)]));
        let rate = "shipping_options[0][shipping_rate_data]";
        assert_eq!(form_value(&paid, &format!("{}[type]", rate)), Some("fixed_amount"));
        assert_eq!(
            form_value(&paid, &format!("{}[fixed_amount][amount]", rate)),
            Some("995")
        );
        assert_eq!(
            form_value(&paid, &format!("{}[display_name]", rate)),
            Some("Express Shipping")
        );
        assert_eq!(
            form_value(&paid, &format!("{}[delivery_estimate][minimum][value]", rate)),
            Some("2")
        );
        assert_eq!(
            form_value(&paid, &format!("{}[delivery_estimate][maximum][value]", rate)),
            Some("3")
        );

        let free = build_form(&params(vec![CartItem::new("Pack", 3995).with_quantity(2)]));
        assert_eq!(
            form_value(&free, &format!("{}[fixed_amount][amount]", rate)),
            Some("0")
        );
        assert_eq!(
            form_value(&free, &format!("{}[display_name]", rate)),
            Some("Free Express Shipping")
        );
    }

    #[test]
    fn test_build_form_metadata() {
        let form = build_form(&params(vec![CartItem::new("Pack", 3995).with_flavor("Lime")]));
        assert_eq!(
            form_value(&form, "metadata[cartItems]"),
            Some(r#"[{"name":"Pack","quantity":1,"flavor":"Lime"}]"#)
        );
    }

    #[tokio::test]
    async fn test_create_checkout_success() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v1/checkout/sessions"))
            .and(header("authorization", "Bearer sk_test_123"))
            .and(header("stripe-version", "2023-10-16"))
            .and(body_string_contains("customer_creation=always"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "id": "cs_test_123",
                "url": "https://checkout.stripe.com/c/pay/cs_test_123",
                "expires_at": 1_700_000_000
            })))
            .expect(1)
            .mount(&server)
            .await;

        let session = strategy(&server)
            .create_checkout(&params(vec![CartItem::new("Pack", 3995)]))
            .await
            .unwrap();

        assert_eq!(session.id, "cs_test_123");
        assert_eq!(session.url, "https://checkout.stripe.com/c/pay/cs_test_123");
        assert_eq!(session.provider, "stripe");
        assert_eq!(session.expires_at.map(|t| t.timestamp()), Some(1_700_000_000));
    }

    #[tokio::test]
    async fn test_create_checkout_provider_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v1/checkout/sessions"))
            .respond_with(ResponseTemplate::new(400).set_body_json(serde_json::json!({
                "error": { "type": "invalid_request_error", "message": "Invalid currency: xyz" }
            })))
            .mount(&server)
            .await;

        let err = strategy(&server)
            .create_checkout(&params(vec![CartItem::new("Pack", 3995)]))
            .await
            .unwrap_err();

        match err {
            PaymentError::ProviderError { provider, message } => {
                assert_eq!(provider, "stripe");
                assert_eq!(message, "Invalid currency: xyz");
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_create_checkout_unparseable_error_body() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v1/checkout/sessions"))
            .respond_with(ResponseTemplate::new(502).set_body_string("bad gateway"))
            .mount(&server)
            .await;

        let err = strategy(&server)
            .create_checkout(&params(vec![CartItem::new("Pack", 3995)]))
            .await
            .unwrap_err();

        assert!(err.to_string().contains("bad gateway"));
        assert_eq!(err.status_code(), 500);
    }

    #[tokio::test]
    async fn test_create_checkout_missing_url() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v1/checkout/sessions"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(serde_json::json!({ "id": "cs_test_9" })),
            )
            .mount(&server)
            .await;

        let err = strategy(&server)
            .create_checkout(&params(vec![CartItem::new("Pack", 3995)]))
            .await
            .unwrap_err();

        assert!(matches!(err, PaymentError::ProviderError { .. }));
    }

    #[tokio::test]
    async fn test_verify_connection() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/v1/charges"))
            .and(query_param("limit", "1"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(serde_json::json!({ "data": [] })),
            )
            .expect(1)
            .mount(&server)
            .await;

        assert!(strategy(&server).verify_connection().await.is_ok());
    }

    #[tokio::test]
    async fn test_verify_connection_rejected_key() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/v1/charges"))
            .respond_with(ResponseTemplate::new(401).set_body_json(serde_json::json!({
                "error": { "message": "Invalid API Key provided" }
            })))
            .mount(&server)
            .await;

        let err = strategy(&server).verify_connection().await.unwrap_err();
        assert!(err.to_string().contains("Invalid API Key provided"));
    }
}
