//! # Cart Client
//!
//! Typed access to the session-scoped remote cart. Every call sends the
//! session id in the `x-session-id` header. Failures never escape this layer:
//! they are logged and reported as `false` or `None`.

use crate::clients::api::{HttpCore, SESSION_HEADER};
use crate::model::{CartResult, CartSnapshot, MenuItemId};
use crate::session::SessionIdentity;
use async_trait::async_trait;
use reqwest::Method;
use serde::Serialize;
use tracing::{debug, instrument, warn};

/// Remote cart operations the cart store depends on.
#[async_trait]
pub trait CartApi: Send + Sync {
    async fn add_item(&self, menu_id: &MenuItemId, quantity: u32) -> bool;

    async fn get_cart(&self) -> Option<CartSnapshot>;

    /// Raw `PUT /cart/updateCartItem`. Callers go through
    /// [`CartApi::update_item_quantity`], which never passes zero.
    async fn put_item_quantity(&self, menu_id: &MenuItemId, quantity: u32) -> bool;

    async fn remove_item(&self, menu_id: &MenuItemId) -> bool;

    /// Sets a line's quantity. Anything at or below zero is a removal.
    async fn update_item_quantity(&self, menu_id: &MenuItemId, quantity: i64) -> bool {
        if quantity <= 0 {
            debug!(%menu_id, quantity, "Non-positive quantity, removing instead");
            return self.remove_item(menu_id).await;
        }
        match u32::try_from(quantity) {
            Ok(quantity) => self.put_item_quantity(menu_id, quantity).await,
            Err(_) => {
                warn!(%menu_id, quantity, "Quantity out of range");
                false
            }
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ItemQuantity<'a> {
    menu_id: &'a str,
    quantity: u32,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ItemRef<'a> {
    menu_id: &'a str,
}

/// HTTP implementation of [`CartApi`].
#[derive(Clone)]
pub struct CartClient {
    http: HttpCore,
    session: SessionIdentity,
}

impl CartClient {
    pub fn new(http: HttpCore, session: SessionIdentity) -> Self {
        Self { http, session }
    }

    fn request(&self, method: Method, path: &str) -> reqwest::RequestBuilder {
        self.http
            .request(method, path)
            .header(SESSION_HEADER, self.session.get_or_create())
    }

    async fn write(&self, operation: &'static str, request: reqwest::RequestBuilder) -> bool {
        match self.http.acknowledge(request).await {
            Ok(()) => true,
            Err(e) => {
                warn!(operation, error = %e, "Cart write failed");
                false
            }
        }
    }
}

#[async_trait]
impl CartApi for CartClient {
    #[instrument(skip(self))]
    async fn add_item(&self, menu_id: &MenuItemId, quantity: u32) -> bool {
        let body = ItemQuantity {
            menu_id: menu_id.as_str(),
            quantity,
        };
        let request = self.request(Method::POST, "/cart/addToCartItem").json(&body);
        self.write("add", request).await
    }

    #[instrument(skip(self))]
    async fn get_cart(&self) -> Option<CartSnapshot> {
        let request = self.request(Method::GET, "/cart/getCartItems");
        match self.http.fetch::<CartResult>(request).await {
            Ok(result) => {
                let snapshot = CartSnapshot::from(result);
                debug!(lines = snapshot.lines.len(), "Cart fetched");
                Some(snapshot)
            }
            Err(e) => {
                warn!(error = %e, "Cart fetch failed");
                None
            }
        }
    }

    #[instrument(skip(self))]
    async fn put_item_quantity(&self, menu_id: &MenuItemId, quantity: u32) -> bool {
        let body = ItemQuantity {
            menu_id: menu_id.as_str(),
            quantity,
        };
        let request = self.request(Method::PUT, "/cart/updateCartItem").json(&body);
        self.write("update", request).await
    }

    #[instrument(skip(self))]
    async fn remove_item(&self, menu_id: &MenuItemId) -> bool {
        let body = ItemRef {
            menu_id: menu_id.as_str(),
        };
        let request = self.request(Method::PATCH, "/cart/removeCartItem").json(&body);
        self.write("remove", request).await
    }
}
