//! # Order Client
//!
//! Order creation, delivery settings and the two read endpoints the status
//! page needs. Unlike the cart client, errors are returned to the caller.

use crate::clients::api::{ApiError, HttpCore, SESSION_HEADER};
use crate::model::{CreatedOrder, DeliverySettings, Order, OrderDraft, PaymentAttempt};
use crate::session::SessionIdentity;
use async_trait::async_trait;
use reqwest::Method;
use tracing::{debug, info, instrument};

#[async_trait]
pub trait OrderApi: Send + Sync {
    /// Creates an order from the session's cart.
    async fn create_order(&self, draft: &OrderDraft) -> Result<CreatedOrder, ApiError>;

    async fn delivery_settings(&self) -> Result<DeliverySettings, ApiError>;

    async fn order_details(&self, order_id: &str) -> Result<Order, ApiError>;

    /// Gateway payment attempts for an order, most recent first.
    async fn payment_attempts(&self, order_id: &str) -> Result<Vec<PaymentAttempt>, ApiError>;
}

#[derive(Clone)]
pub struct OrderClient {
    http: HttpCore,
    session: SessionIdentity,
}

impl OrderClient {
    pub fn new(http: HttpCore, session: SessionIdentity) -> Self {
        Self { http, session }
    }
}

#[async_trait]
impl OrderApi for OrderClient {
    #[instrument(skip(self, draft), fields(order_type = %draft.order_type()))]
    async fn create_order(&self, draft: &OrderDraft) -> Result<CreatedOrder, ApiError> {
        debug!(?draft, "create_order called");
        let request = self
            .http
            .request(Method::POST, "/order/createOrder")
            .header(SESSION_HEADER, self.session.get_or_create())
            .json(&draft.to_request());
        let created: CreatedOrder = self.http.fetch(request).await?;
        info!(order_id = %created.order.order_id, "Order created");
        Ok(created)
    }

    #[instrument(skip(self))]
    async fn delivery_settings(&self) -> Result<DeliverySettings, ApiError> {
        let request = self.http.request(Method::GET, "/order/getDeliverySettings");
        self.http.fetch(request).await
    }

    #[instrument(skip(self))]
    async fn order_details(&self, order_id: &str) -> Result<Order, ApiError> {
        let request = self
            .http
            .request_segments(Method::GET, &["order", "orderDetails", order_id])?;
        self.http.fetch(request).await
    }

    /// A successful response without attempts means the gateway has not
    /// reported anything yet.
    #[instrument(skip(self))]
    async fn payment_attempts(&self, order_id: &str) -> Result<Vec<PaymentAttempt>, ApiError> {
        let request = self
            .http
            .request_segments(Method::GET, &["order", "orderStatus", order_id])?;
        self.http.fetch_or_default(request).await
    }
}
