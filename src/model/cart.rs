//! Cart lines, the server-computed summary, and the authoritative snapshot.

use crate::model::{MenuItemId, MenuItemRef};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::warn;

/// One distinct menu item in the cart. `quantity` is always at least 1.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CartLine {
    pub item: MenuItemRef,
    pub quantity: u32,
}

impl CartLine {
    pub fn new(item: MenuItemRef, quantity: u32) -> Self {
        Self { item, quantity }
    }

    pub fn id(&self) -> &MenuItemId {
        &self.item.id
    }

    pub fn line_total(&self) -> Decimal {
        self.item.price * Decimal::from(self.quantity)
    }

    pub fn packaging_total(&self) -> Decimal {
        self.item.packaging_cost.unwrap_or_default() * Decimal::from(self.quantity)
    }
}

/// Totals as computed by the backend for the current cart.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CartSummary {
    pub subtotal: Decimal,
    pub gst: Decimal,
    pub delivery_charge: Decimal,
    pub packaging_total: Decimal,
    pub grand_total: Decimal,
}

impl CartSummary {
    /// Display value used before the first authoritative fetch resolves.
    ///
    /// Only the subtotal can be known locally; taxes and charges stay zero.
    pub fn placeholder(lines: &[CartLine]) -> Self {
        Self {
            subtotal: lines.iter().map(CartLine::line_total).sum(),
            ..Self::default()
        }
    }
}

/// The authoritative cart as returned by the backend.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CartSnapshot {
    pub lines: Vec<CartLine>,
    pub summary: CartSummary,
}

// ---------------------------------------------------------------------------
// Wire format of `GET /cart/getCartItems`
// ---------------------------------------------------------------------------

/// `result` object of the get-cart response.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartResult {
    #[serde(default)]
    pub total_price: Option<Decimal>,
    #[serde(default)]
    pub gst: Option<Decimal>,
    #[serde(default)]
    pub delivery_charge: Option<Decimal>,
    #[serde(default)]
    pub total_with_extras: Option<Decimal>,
    #[serde(default)]
    pub cart: Option<RemoteCart>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RemoteCart {
    #[serde(rename = "_id", default)]
    pub id: String,
    #[serde(default)]
    pub session_id: String,
    #[serde(default)]
    pub items: Vec<RemoteCartItem>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RemoteCartItem {
    /// Populated menu document; `null` once the item was deleted from the catalog.
    #[serde(default)]
    pub menu_id: Option<MenuItemRef>,
    #[serde(default)]
    pub quantity: u32,
}

impl From<CartResult> for CartSnapshot {
    fn from(result: CartResult) -> Self {
        let mut lines: Vec<CartLine> = Vec::new();
        let items = result.cart.map(|cart| cart.items).unwrap_or_default();

        for remote in items {
            let Some(item) = remote.menu_id else {
                warn!("Dropping cart line without a menu item");
                continue;
            };
            if remote.quantity == 0 {
                continue;
            }
            match lines.iter_mut().find(|line| line.item.id == item.id) {
                Some(existing) => {
                    warn!(menu_id = %item.id, "Merging duplicate cart line");
                    existing.quantity = existing.quantity.saturating_add(remote.quantity);
                }
                None => lines.push(CartLine::new(item, remote.quantity)),
            }
        }

        let packaging_total = lines.iter().map(CartLine::packaging_total).sum();
        let summary = CartSummary {
            subtotal: result.total_price.unwrap_or_default(),
            gst: result.gst.unwrap_or_default(),
            delivery_charge: result.delivery_charge.unwrap_or_default(),
            packaging_total,
            grand_total: result.total_with_extras.unwrap_or_default(),
        };

        Self { lines, summary }
    }
}
