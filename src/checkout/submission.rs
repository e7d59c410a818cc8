use crate::cart_actor::CartHandle;
use crate::checkout::form::{CheckoutForm, ValidationErrors};
use crate::checkout::payment::{CheckoutOptions, PaymentError, PaymentGateway};
use crate::clients::{ApiError, OrderApi};
use crate::model::{Order, OrderType};
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, info, instrument, warn};

/// Why a checkout attempt stopped.
///
/// Every variant maps to a single customer-facing sentence via
/// [`CheckoutError::general_message`].
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CheckoutError {
    #[error("{0}")]
    Validation(#[from] ValidationErrors),
    #[error("cart is empty")]
    EmptyCart,
    #[error("order creation failed: {0}")]
    OrderCreation(#[source] ApiError),
    #[error("order {order_id} has no payment session")]
    MissingPaymentSession { order_id: String },
    /// The order exists on the backend but nothing was sent to the gateway.
    #[error("payment gateway not ready, order {order_id} left unpaid")]
    GatewayNotReady { order_id: String },
    #[error("payment initiation failed for order {order_id}: {source}")]
    PaymentInitiation {
        order_id: String,
        #[source]
        source: PaymentError,
    },
}

impl CheckoutError {
    pub fn general_message(&self) -> String {
        match self {
            CheckoutError::Validation(errors) => errors.general.clone(),
            CheckoutError::EmptyCart => "Your cart is empty. Add items before checking out.".into(),
            CheckoutError::OrderCreation(_) => "Failed to create order. Please try again.".into(),
            CheckoutError::GatewayNotReady { .. } => {
                "Payment gateway not available. Please try again later.".into()
            }
            CheckoutError::MissingPaymentSession { .. } | CheckoutError::PaymentInitiation { .. } => {
                "Failed to initialize payment. Please try again.".into()
            }
        }
    }

    /// Backend order left behind by a failure after creation, if any.
    pub fn dangling_order_id(&self) -> Option<&str> {
        match self {
            CheckoutError::MissingPaymentSession { order_id }
            | CheckoutError::GatewayNotReady { order_id }
            | CheckoutError::PaymentInitiation { order_id, .. } => Some(order_id.as_str()),
            _ => None,
        }
    }
}

/// Turns a filled-in checkout form into an order and a gateway hand-off.
#[derive(Clone)]
pub struct OrderSubmission {
    orders: Arc<dyn OrderApi>,
    gateway: Arc<dyn PaymentGateway>,
    cart: CartHandle,
}

impl OrderSubmission {
    pub fn new(orders: Arc<dyn OrderApi>, gateway: Arc<dyn PaymentGateway>, cart: CartHandle) -> Self {
        Self {
            orders,
            gateway,
            cart,
        }
    }

    /// Validates, creates the order and starts hosted checkout.
    ///
    /// Nothing is sent to the backend when validation fails or the cart is
    /// known to be empty. On success the returned order is awaiting payment and
    /// the customer is being redirected.
    #[instrument(skip(self, form), fields(order_type = %kind))]
    pub async fn submit(&self, kind: OrderType, form: &CheckoutForm) -> Result<Order, CheckoutError> {
        let draft = form.validate(kind)?;
        self.ensure_cart_not_empty().await?;

        let created = self
            .orders
            .create_order(&draft)
            .await
            .map_err(|e| {
                warn!(error = %e, "Order creation failed");
                CheckoutError::OrderCreation(e)
            })?;
        let order_id = created.order.order_id.clone();
        info!(%order_id, "Order created, starting payment");

        if !self.gateway.is_ready() {
            warn!(%order_id, "Payment gateway not ready");
            return Err(CheckoutError::GatewayNotReady { order_id });
        }

        let Some(session) = created.payment_session_id() else {
            warn!(%order_id, "Order has no payment session id");
            return Err(CheckoutError::MissingPaymentSession { order_id });
        };

        self.gateway
            .checkout(CheckoutOptions::same_tab(session))
            .await
            .map_err(|source| {
                warn!(%order_id, error = %source, "Payment initiation failed");
                CheckoutError::PaymentInitiation {
                    order_id: order_id.clone(),
                    source,
                }
            })?;

        info!(%order_id, "Payment initiated");
        Ok(created.order)
    }

    /// Whether delivery is currently offered. Unreachable settings read as off.
    #[instrument(skip(self))]
    pub async fn delivery_enabled(&self) -> bool {
        match self.orders.delivery_settings().await {
            Ok(settings) => settings.is_delivery_enabled,
            Err(e) => {
                warn!(error = %e, "Could not read delivery settings");
                false
            }
        }
    }

    async fn ensure_cart_not_empty(&self) -> Result<(), CheckoutError> {
        match self.cart.snapshot().await {
            // An empty cart that is still loading may just not be fetched yet.
            Ok(state) if state.is_empty() && !state.is_loading => Err(CheckoutError::EmptyCart),
            Ok(_) => Ok(()),
            Err(e) => {
                debug!(error = %e, "Cart unavailable, leaving the check to the backend");
                Ok(())
            }
        }
    }
}
