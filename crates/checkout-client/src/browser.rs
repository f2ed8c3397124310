//! # Browser Bindings
//!
//! `wasm32` glue: navigation through `window.location`, alerts through
//! `window.alert`, and a cart store backed by a JS callback.

use crate::checkout::{report_failure, CartStore, CheckoutClient, Navigator, Notifier};
use crate::config::ClientConfig;
use crate::error::{ClientError, ClientResult};
use checkout_core::CartItem;
use wasm_bindgen::prelude::*;

/// Navigates the current window
pub struct BrowserNavigator;

impl Navigator for BrowserNavigator {
    fn navigate(&self, url: &str) {
        if let Some(window) = web_sys::window() {
            if let Err(e) = window.location().set_href(url) {
                web_sys::console::error_1(&e);
            }
        }
    }
}

/// Shows `window.alert`
pub struct BrowserNotifier;

impl Notifier for BrowserNotifier {
    fn alert(&self, message: &str) {
        if let Some(window) = web_sys::window() {
            if let Err(e) = window.alert_with_message(message) {
                web_sys::console::error_1(&e);
            }
        }
    }
}

/// Cart handed over from JS; clearing calls back into the page's cart state
pub struct JsCartStore {
    items: Vec<CartItem>,
    on_clear: js_sys::Function,
}

impl JsCartStore {
    pub fn new(items: Vec<CartItem>, on_clear: js_sys::Function) -> Self {
        Self { items, on_clear }
    }
}

impl CartStore for JsCartStore {
    fn cart(&self) -> &[CartItem] {
        &self.items
    }

    fn clear_cart(&mut self) {
        self.items.clear();
        if let Err(e) = self.on_clear.call0(&JsValue::NULL) {
            web_sys::console::error_1(&e);
        }
    }
}

fn to_js(err: impl std::fmt::Display) -> JsValue {
    JsValue::from_str(&err.to_string())
}

type BrowserClient = CheckoutClient<BrowserNavigator, BrowserNotifier>;

/// Decode the JS cart and build a client for the current page's origin
fn prepare(
    cart: JsValue,
    clear_cart: js_sys::Function,
) -> ClientResult<(BrowserClient, JsCartStore)> {
    let items: Vec<CartItem> = if cart.is_null() || cart.is_undefined() {
        Vec::new()
    } else {
        serde_wasm_bindgen::from_value(cart)
            .map_err(|e| ClientError::InvalidCart(format!("Invalid cart items: {}", e)))?
    };

    let window = web_sys::window()
        .ok_or_else(|| ClientError::Configuration("No window available".to_string()))?;
    let origin = window.location().origin().map_err(|e| {
        ClientError::Configuration(
            e.as_string()
                .unwrap_or_else(|| "Unable to read page origin".to_string()),
        )
    })?;

    let config = ClientConfig::new(&origin)?;
    let client = CheckoutClient::new(config, BrowserNavigator, BrowserNotifier)?;

    Ok((client, JsCartStore::new(items, clear_cart)))
}

/// Check out the given cart from the current page.
///
/// `cart` is an array of cart items (or null/undefined for an empty cart);
/// `clear_cart` is called once the server has returned a checkout URL.
/// Resolves to the checkout URL the page is navigating to. Every failure,
/// including an undecodable cart, is alerted before the promise rejects.
#[wasm_bindgen]
pub async fn checkout(cart: JsValue, clear_cart: js_sys::Function) -> Result<String, JsValue> {
    let (client, mut store) = match prepare(cart, clear_cart) {
        Ok(parts) => parts,
        Err(e) => {
            report_failure(&BrowserNotifier, &e);
            return Err(to_js(e));
        }
    };

    client
        .handle_checkout(&mut store)
        .await
        .map(|redirect| redirect.url)
        .map_err(to_js)
}

/// Get library version
#[wasm_bindgen]
pub fn version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}
