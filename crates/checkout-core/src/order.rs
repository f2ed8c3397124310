//! # Order Types
//!
//! Provider-neutral line items, shipping terms, session parameters and the
//! checkout session returned by a provider.

use crate::cart::{CartItem, CheckoutRequest, Currency};
use crate::error::{PaymentError, PaymentResult};
use crate::strategy::CheckoutUrls;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Flat shipping fee in minor units when the cart does not qualify for free shipping
pub const FLAT_SHIPPING_FEE: i64 = 995;

/// Per-item quantity at which shipping becomes free
pub const FREE_SHIPPING_QUANTITY: u32 = 2;

/// Metadata key holding the serialized cart summary
pub const CART_METADATA_KEY: &str = "cartItems";

/// A line item as handed to the payment provider
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LineItem {
    /// Product name
    pub name: String,

    /// Description (omitted when empty)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// Image URLs
    #[serde(default)]
    pub images: Vec<String>,

    /// Flavor, stored as product metadata (empty when unknown)
    #[serde(default)]
    pub flavor: String,

    /// Unit amount in minor units, passed through unchanged
    pub unit_amount: i64,

    pub currency: Currency,

    pub quantity: u32,
}

impl LineItem {
    /// Derive a line item from a cart entry
    pub fn from_cart_item(item: &CartItem, currency: Currency) -> Self {
        Self {
            name: item.name.clone(),
            description: item.description_text().map(String::from),
            images: item.image_urls().to_vec(),
            flavor: item.flavor_text().to_string(),
            unit_amount: item.unit_price,
            currency,
            quantity: item.effective_quantity(),
        }
    }

    /// Total amount for this line item, capped at `i64::MAX`
    pub fn total(&self) -> i64 {
        self.unit_amount.saturating_mul(i64::from(self.quantity))
    }
}

/// Delivery window in business days
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeliveryEstimate {
    pub min_business_days: u32,
    pub max_business_days: u32,
}

impl Default for DeliveryEstimate {
    fn default() -> Self {
        Self {
            min_business_days: 2,
            max_business_days: 3,
        }
    }
}

/// Fixed-amount shipping option offered on the checkout page
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShippingRate {
    /// Amount in minor units (0 when free)
    pub amount: i64,
    pub currency: Currency,
    pub display_name: String,
    pub delivery_estimate: DeliveryEstimate,
}

impl ShippingRate {
    /// Shipping terms for a cart.
    ///
    /// Free when any single entry has a quantity of at least two; quantities
    /// are not summed across entries.
    pub fn for_cart(cart: &[CartItem], currency: Currency) -> Self {
        if qualifies_for_free_shipping(cart) {
            Self {
                amount: 0,
                currency,
                display_name: "Free Express Shipping".to_string(),
                delivery_estimate: DeliveryEstimate::default(),
            }
        } else {
            Self {
                amount: FLAT_SHIPPING_FEE,
                currency,
                display_name: "Express Shipping".to_string(),
                delivery_estimate: DeliveryEstimate::default(),
            }
        }
    }

    pub fn is_free(&self) -> bool {
        self.amount == 0
    }
}

/// True if any single cart entry has an effective quantity of two or more
pub fn qualifies_for_free_shipping(cart: &[CartItem]) -> bool {
    cart.iter()
        .any(|item| item.effective_quantity() >= FREE_SHIPPING_QUANTITY)
}

/// Session settings that do not depend on the cart
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionPolicy {
    pub currency: Currency,
    pub payment_method_types: Vec<String>,
    /// ISO 3166-1 alpha-2 country codes accepted for shipping
    pub allowed_shipping_countries: Vec<String>,
    pub allow_promotion_codes: bool,
    pub collect_phone_number: bool,
    pub always_create_customer: bool,
    pub require_billing_address: bool,
}

impl Default for SessionPolicy {
    fn default() -> Self {
        Self {
            currency: Currency::AUD,
            payment_method_types: vec!["card".to_string()],
            allowed_shipping_countries: vec!["AU".to_string()],
            allow_promotion_codes: true,
            collect_phone_number: true,
            always_create_customer: true,
            require_billing_address: true,
        }
    }
}

/// Summary of one cart entry stored in session metadata
#[derive(Debug, Serialize)]
struct CartSummaryEntry<'a> {
    name: &'a str,
    quantity: u32,
    flavor: &'a str,
}

/// Serialize name/quantity/flavor of every cart entry as a JSON array string
pub fn cart_summary(cart: &[CartItem]) -> PaymentResult<String> {
    let entries: Vec<CartSummaryEntry<'_>> = cart
        .iter()
        .map(|item| CartSummaryEntry {
            name: &item.name,
            quantity: item.effective_quantity(),
            flavor: item.flavor_text(),
        })
        .collect();
    serde_json::to_string(&entries).map_err(|e| PaymentError::Serialization(e.to_string()))
}

/// Everything a provider needs to create a checkout session
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionParams {
    pub line_items: Vec<LineItem>,
    pub shipping: ShippingRate,
    pub success_url: String,
    pub cancel_url: String,
    #[serde(default)]
    pub metadata: BTreeMap<String, String>,
    pub policy: SessionPolicy,
}

impl SessionParams {
    /// Derive session parameters from a validated checkout request
    pub fn from_request(
        request: &CheckoutRequest,
        urls: &CheckoutUrls,
        policy: &SessionPolicy,
    ) -> PaymentResult<Self> {
        if request.is_empty() {
            return Err(PaymentError::InvalidCart);
        }

        let line_items = request
            .cart
            .iter()
            .map(|item| LineItem::from_cart_item(item, policy.currency))
            .collect();

        let mut metadata = BTreeMap::new();
        metadata.insert(CART_METADATA_KEY.to_string(), cart_summary(&request.cart)?);

        Ok(Self {
            line_items,
            shipping: ShippingRate::for_cart(&request.cart, policy.currency),
            success_url: urls.success_url(),
            cancel_url: urls.cancel_url(),
            metadata,
            policy: policy.clone(),
        })
    }

    /// Line items total in minor units, shipping included.
    ///
    /// Saturates rather than overflowing on absurd carts.
    pub fn total(&self) -> i64 {
        self.line_items
            .iter()
            .map(LineItem::total)
            .fold(self.shipping.amount, i64::saturating_add)
    }

    /// Total item count across line items
    pub fn item_count(&self) -> u32 {
        self.line_items
            .iter()
            .map(|i| i.quantity)
            .fold(0, u32::saturating_add)
    }
}

/// A checkout session created by a payment provider
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CheckoutSession {
    /// Provider's session ID
    pub id: String,

    /// URL to redirect the customer to for payment
    pub url: String,

    /// Provider name (e.g., "stripe")
    pub provider: String,

    /// When the session expires
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expires_at: Option<DateTime<Utc>>,
}

impl CheckoutSession {
    pub fn new(id: impl Into<String>, url: impl Into<String>, provider: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            url: url.into(),
            provider: provider.into(),
            expires_at: None,
        }
    }
}
