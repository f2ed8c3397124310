//! # Cart Types
//!
//! Cart items as sent by the storefront and the checkout request that wraps them.

use crate::error::{PaymentError, PaymentResult};
use serde::{Deserialize, Serialize};

/// Description used by the storefront when an item has none
pub const DEFAULT_DESCRIPTION: &str = "No description";

/// Flavor used by the storefront when an item has none
pub const DEFAULT_FLAVOR: &str = "Original";

/// Checkout currency (ISO 4217); the storefront sells in AUD only
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Currency {
    #[default]
    AUD,
}

impl Currency {
    /// Returns the ISO 4217 currency code
    pub fn as_str(&self) -> &'static str {
        match self {
            Currency::AUD => "aud",
        }
    }

    /// Format an amount in minor units for display (e.g., "A$9.95")
    pub fn display_amount(&self, amount: i64) -> String {
        let symbol = match self {
            Currency::AUD => "A$",
        };
        let sign = if amount < 0 { "-" } else { "" };
        let abs = amount.unsigned_abs();
        format!("{}{}{}.{:02}", sign, symbol, abs / 100, abs % 100)
    }
}

impl std::fmt::Display for Currency {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str().to_uppercase())
    }
}

/// One product line in the shopper's cart
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartItem {
    /// Product name
    pub name: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// Product image URLs
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub images: Option<Vec<String>>,

    /// Price per unit in minor currency units (cents)
    pub unit_price: i64,

    /// Quantity; absent or zero means 1
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub quantity: Option<u32>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub flavor: Option<String>,
}

impl CartItem {
    /// Create an item with only the required fields
    pub fn new(name: impl Into<String>, unit_price: i64) -> Self {
        Self {
            name: name.into(),
            description: None,
            images: None,
            unit_price,
            quantity: None,
            flavor: None,
        }
    }

    /// Builder: set quantity
    pub fn with_quantity(mut self, quantity: u32) -> Self {
        self.quantity = Some(quantity);
        self
    }

    /// Builder: set description
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Builder: set flavor
    pub fn with_flavor(mut self, flavor: impl Into<String>) -> Self {
        self.flavor = Some(flavor.into());
        self
    }

    /// Builder: add an image URL
    pub fn with_image(mut self, url: impl Into<String>) -> Self {
        self.images.get_or_insert_with(Vec::new).push(url.into());
        self
    }

    /// Quantity used for line items and shipping
    pub fn effective_quantity(&self) -> u32 {
        self.quantity.filter(|q| *q > 0).unwrap_or(1)
    }

    /// Description if present and non-empty
    pub fn description_text(&self) -> Option<&str> {
        self.description.as_deref().filter(|d| !d.is_empty())
    }

    /// Flavor, or the empty string when absent
    pub fn flavor_text(&self) -> &str {
        self.flavor.as_deref().unwrap_or("")
    }

    /// Image URLs, empty when absent
    pub fn image_urls(&self) -> &[String] {
        self.images.as_deref().unwrap_or(&[])
    }

    /// Copy with every optional field filled in with the storefront defaults.
    ///
    /// Empty strings count as absent.
    pub fn normalized(&self) -> Self {
        let non_empty = |s: &Option<String>| s.clone().filter(|v| !v.is_empty());
        Self {
            name: self.name.clone(),
            description: Some(
                non_empty(&self.description).unwrap_or_else(|| DEFAULT_DESCRIPTION.to_string()),
            ),
            images: Some(self.image_urls().to_vec()),
            unit_price: self.unit_price,
            quantity: Some(self.effective_quantity()),
            flavor: Some(non_empty(&self.flavor).unwrap_or_else(|| DEFAULT_FLAVOR.to_string())),
        }
    }
}

/// Body of a checkout request: `{ "cart": [...] }`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CheckoutRequest {
    pub cart: Vec<CartItem>,
}

impl CheckoutRequest {
    /// Build a request with every item normalized
    pub fn from_cart(cart: &[CartItem]) -> PaymentResult<Self> {
        if cart.is_empty() {
            return Err(PaymentError::InvalidCart);
        }
        Ok(Self {
            cart: cart.iter().map(CartItem::normalized).collect(),
        })
    }

    /// Parse and validate a raw request body.
    ///
    /// The body must be JSON with a non-empty `cart` array whose entries are
    /// cart items with a non-negative `unitPrice`.
    pub fn from_slice(body: &[u8]) -> PaymentResult<Self> {
        if body.is_empty() {
            return Err(PaymentError::MissingBody);
        }

        let value: serde_json::Value =
            serde_json::from_slice(body).map_err(|e| PaymentError::InvalidJson(e.to_string()))?;

        let entries = value
            .get("cart")
            .and_then(|c| c.as_array())
            .filter(|c| !c.is_empty())
            .ok_or(PaymentError::InvalidCart)?;

        let cart = entries
            .iter()
            .enumerate()
            .map(|(index, entry)| {
                let item: CartItem = serde_json::from_value(entry.clone()).map_err(|e| {
                    PaymentError::InvalidCartItem {
                        index,
                        reason: e.to_string(),
                    }
                })?;
                if item.unit_price < 0 {
                    return Err(PaymentError::InvalidCartItem {
                        index,
                        reason: "unitPrice must not be negative".to_string(),
                    });
                }
                Ok(item)
            })
            .collect::<PaymentResult<Vec<_>>>()?;

        Ok(Self { cart })
    }

    /// Number of entries in the cart
    pub fn len(&self) -> usize {
        self.cart.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cart.is_empty()
    }
}
