//! # In-memory backend
//!
//! [`InMemoryBackend`] implements [`CartApi`] and [`OrderApi`] against a
//! process-local cart and order book so the cart store, checkout and status
//! resolution can be tested without a server.
//!
//! Every call is appended to a log ([`InMemoryBackend::calls`]) and each kind
//! of call can be made to fail. An optional delay on cart fetches lets tests
//! interleave mutations with in-flight refetches.
//!
//! ```rust
//! use canteen_storefront::clients::mock::{BackendCall, InMemoryBackend};
//! use canteen_storefront::clients::CartApi;
//! use canteen_storefront::model::{MenuItemId, MenuItemRef};
//! use rust_decimal::Decimal;
//!
//! #[tokio::main]
//! async fn main() {
//!     let backend = InMemoryBackend::new();
//!     backend.add_menu_item(MenuItemRef::new("a", "Roll", Decimal::from(100)));
//!
//!     let id = MenuItemId::from("a");
//!     assert!(backend.add_item(&id, 2).await);
//!     assert!(backend.update_item_quantity(&id, 0).await);
//!
//!     assert_eq!(
//!         backend.calls(),
//!         vec![BackendCall::Add(id.clone(), 2), BackendCall::Remove(id)]
//!     );
//! }
//! ```

use crate::clients::api::ApiError;
use crate::clients::{CartApi, OrderApi};
use crate::model::{
    CartLine, CartSnapshot, CartSummary, CreatedOrder, DeliverySettings, MenuItemId, MenuItemRef,
    Order, OrderDraft, OrderItem, OrderStatus, OrderType, PaymentAttempt, PaymentStatus,
};
use async_trait::async_trait;
use rust_decimal::Decimal;
use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::Duration;

/// A call received by the in-memory backend.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BackendCall {
    Add(MenuItemId, u32),
    GetCart,
    Put(MenuItemId, u32),
    Remove(MenuItemId),
    CreateOrder(OrderType),
    DeliverySettings,
    OrderDetails(String),
    PaymentAttempts(String),
}

/// Which calls should fail.
#[derive(Debug, Clone, Copy, Default)]
pub struct FailureSwitches {
    pub cart_writes: bool,
    pub cart_fetch: bool,
    pub create_order: bool,
    pub delivery_settings: bool,
    pub order_details: bool,
    pub payment_attempts: bool,
}

struct BackendState {
    catalog: HashMap<MenuItemId, MenuItemRef>,
    lines: Vec<CartLine>,
    delivery_charge: Decimal,
    delivery_enabled: bool,
    payment_session: Option<String>,
    orders: HashMap<String, Order>,
    attempts: HashMap<String, Vec<PaymentAttempt>>,
    next_order: u32,
    failures: FailureSwitches,
    fetch_delay: Option<Duration>,
    calls: Vec<BackendCall>,
}

pub struct InMemoryBackend {
    state: Mutex<BackendState>,
}

impl Default for InMemoryBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryBackend {
    pub fn new() -> Self {
        Self {
            state: Mutex::new(BackendState {
                catalog: HashMap::new(),
                lines: Vec::new(),
                delivery_charge: Decimal::ZERO,
                delivery_enabled: true,
                payment_session: Some("session_test".to_string()),
                orders: HashMap::new(),
                attempts: HashMap::new(),
                next_order: 1,
                failures: FailureSwitches::default(),
                fetch_delay: None,
                calls: Vec::new(),
            }),
        }
    }

    fn state(&self) -> MutexGuard<'_, BackendState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Makes an item known to the backend so it can be added to the cart.
    pub fn add_menu_item(&self, item: MenuItemRef) {
        self.state().catalog.insert(item.id.clone(), item);
    }

    /// Places a line directly in the remote cart, bypassing the call log.
    pub fn seed_line(&self, item: MenuItemRef, quantity: u32) {
        let mut state = self.state();
        state.catalog.insert(item.id.clone(), item.clone());
        state.lines.retain(|line| line.item.id != item.id);
        state.lines.push(CartLine::new(item, quantity));
    }

    pub fn set_failures(&self, failures: FailureSwitches) {
        self.state().failures = failures;
    }

    pub fn set_fetch_delay(&self, delay: Duration) {
        self.state().fetch_delay = Some(delay);
    }

    pub fn set_delivery_charge(&self, charge: Decimal) {
        self.state().delivery_charge = charge;
    }

    pub fn set_delivery_enabled(&self, enabled: bool) {
        self.state().delivery_enabled = enabled;
    }

    /// Payment session id handed out with the next created orders.
    pub fn set_payment_session(&self, session: Option<&str>) {
        self.state().payment_session = session.map(str::to_string);
    }

    /// Registers an order as if it had been created earlier.
    pub fn insert_order(&self, order: Order) {
        self.state().orders.insert(order.order_id.clone(), order);
    }

    pub fn set_payment_attempts(&self, order_id: &str, attempts: Vec<PaymentAttempt>) {
        self.state().attempts.insert(order_id.to_string(), attempts);
    }

    /// The remote cart as a fresh fetch would return it, without logging a call.
    pub fn remote_snapshot(&self) -> CartSnapshot {
        snapshot_of(&self.state())
    }

    pub fn calls(&self) -> Vec<BackendCall> {
        self.state().calls.clone()
    }

    pub fn clear_calls(&self) {
        self.state().calls.clear();
    }

    /// Number of logged calls matching `predicate`.
    pub fn count_calls(&self, predicate: impl Fn(&BackendCall) -> bool) -> usize {
        self.state().calls.iter().filter(|call| predicate(call)).count()
    }

    fn set_line(&self, menu_id: &MenuItemId, quantity: u32) -> bool {
        let mut state = self.state();
        if state.failures.cart_writes {
            return false;
        }
        let Some(item) = state.catalog.get(menu_id).cloned() else {
            return false;
        };
        match state.lines.iter_mut().find(|line| &line.item.id == menu_id) {
            Some(line) => line.quantity = quantity,
            None => state.lines.push(CartLine::new(item, quantity)),
        }
        true
    }
}

/// GST applied by the fake backend: 5%.
fn gst_rate() -> Decimal {
    Decimal::new(5, 2)
}

fn snapshot_of(state: &BackendState) -> CartSnapshot {
    let lines = state.lines.clone();
    let subtotal: Decimal = lines.iter().map(CartLine::line_total).sum();
    let packaging_total: Decimal = lines.iter().map(CartLine::packaging_total).sum();
    let gst = (subtotal * gst_rate()).round_dp(2);
    let delivery_charge = if lines.is_empty() {
        Decimal::ZERO
    } else {
        state.delivery_charge
    };
    let summary = CartSummary {
        subtotal,
        gst,
        delivery_charge,
        packaging_total,
        grand_total: subtotal + gst + delivery_charge + packaging_total,
    };
    CartSnapshot { lines, summary }
}

#[async_trait]
impl CartApi for InMemoryBackend {
    async fn add_item(&self, menu_id: &MenuItemId, quantity: u32) -> bool {
        self.state().calls.push(BackendCall::Add(menu_id.clone(), quantity));
        self.set_line(menu_id, quantity)
    }

    async fn get_cart(&self) -> Option<CartSnapshot> {
        let delay = {
            let mut state = self.state();
            state.calls.push(BackendCall::GetCart);
            state.fetch_delay
        };
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }
        let state = self.state();
        if state.failures.cart_fetch {
            return None;
        }
        Some(snapshot_of(&state))
    }

    async fn put_item_quantity(&self, menu_id: &MenuItemId, quantity: u32) -> bool {
        self.state().calls.push(BackendCall::Put(menu_id.clone(), quantity));
        self.set_line(menu_id, quantity)
    }

    async fn remove_item(&self, menu_id: &MenuItemId) -> bool {
        let mut state = self.state();
        state.calls.push(BackendCall::Remove(menu_id.clone()));
        if state.failures.cart_writes {
            return false;
        }
        let before = state.lines.len();
        state.lines.retain(|line| &line.item.id != menu_id);
        state.lines.len() != before
    }
}

#[async_trait]
impl OrderApi for InMemoryBackend {
    async fn create_order(&self, draft: &OrderDraft) -> Result<CreatedOrder, ApiError> {
        let mut state = self.state();
        state.calls.push(BackendCall::CreateOrder(draft.order_type()));
        if state.failures.create_order {
            return Err(ApiError::Service {
                status: 500,
                message: "Internal server error".to_string(),
            });
        }
        if state.lines.is_empty() {
            return Err(ApiError::Rejected("Cart is empty".to_string()));
        }

        let snapshot = snapshot_of(&state);
        let number = state.next_order;
        state.next_order += 1;

        let (delivery_details, dine_in_details) = match draft {
            OrderDraft::Delivery(details) => (Some(details.clone()), None),
            OrderDraft::DineIn(details) => (None, Some(details.clone())),
        };
        let order = Order {
            id: format!("oid-{number}"),
            order_id: format!("ORD-{number:04}"),
            items: snapshot
                .lines
                .iter()
                .map(|line| OrderItem {
                    menu_id: line.item.id.clone(),
                    name: line.item.name.clone(),
                    quantity: line.quantity,
                    price: line.item.price,
                })
                .collect(),
            total_amount: snapshot.summary.subtotal,
            delivery_charges: snapshot.summary.delivery_charge,
            gst_amount: snapshot.summary.gst,
            grand_total: snapshot.summary.grand_total,
            order_type: draft.order_type(),
            delivery_details,
            dine_in_details,
            is_paid: false,
            payment_status: PaymentStatus::Pending,
            status: OrderStatus::Pending,
            created_at: None,
            updated_at: None,
            payment_session_id: state.payment_session.clone(),
        };
        state.orders.insert(order.order_id.clone(), order.clone());
        Ok(CreatedOrder { order })
    }

    async fn delivery_settings(&self) -> Result<DeliverySettings, ApiError> {
        let mut state = self.state();
        state.calls.push(BackendCall::DeliverySettings);
        if state.failures.delivery_settings {
            return Err(ApiError::Network("connection refused".to_string()));
        }
        Ok(DeliverySettings {
            is_delivery_enabled: state.delivery_enabled,
        })
    }

    async fn order_details(&self, order_id: &str) -> Result<Order, ApiError> {
        let mut state = self.state();
        state.calls.push(BackendCall::OrderDetails(order_id.to_string()));
        if state.failures.order_details {
            return Err(ApiError::Network("connection refused".to_string()));
        }
        state
            .orders
            .get(order_id)
            .cloned()
            .ok_or_else(|| ApiError::Rejected("Order not found".to_string()))
    }

    async fn payment_attempts(&self, order_id: &str) -> Result<Vec<PaymentAttempt>, ApiError> {
        let mut state = self.state();
        state.calls.push(BackendCall::PaymentAttempts(order_id.to_string()));
        if state.failures.payment_attempts {
            return Err(ApiError::Service {
                status: 502,
                message: "Gateway unavailable".to_string(),
            });
        }
        Ok(state.attempts.get(order_id).cloned().unwrap_or_default())
    }
}
