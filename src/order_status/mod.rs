//! # Order status
//!
//! After hosted checkout the gateway sends the customer back with the order id
//! in the return URL. [`OrderStatusResolver::resolve`] fetches the order and
//! its payment attempts concurrently and reduces them to a single
//! [`PaymentOutcome`].
//!
//! Only the most recent attempt counts. `SUCCESS` and `FAILED` (in any case)
//! are final; every other status, or no attempt at all, is pending.

use crate::clients::{ApiError, OrderApi};
use crate::model::{Order, PaymentAttempt, PaymentStatus};
use reqwest::Url;
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, info, instrument, warn};

pub const DECLINED_FALLBACK: &str = "Payment was declined by your bank.";

#[derive(Debug, Clone, PartialEq, Error)]
pub enum StatusError {
    #[error("no order id in return URL")]
    MissingOrderId,
    #[error("could not load order {order_id}: {source}")]
    Fetch {
        order_id: String,
        #[source]
        source: ApiError,
    },
}

impl StatusError {
    pub fn general_message(&self) -> String {
        match self {
            StatusError::MissingOrderId => "We could not find your order.".to_string(),
            StatusError::Fetch { source, .. } => source
                .backend_message()
                .map(str::to_string)
                .unwrap_or_else(|| "Failed to load order status. Please try again.".to_string()),
        }
    }
}

/// Follow-up the status view offers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RetryAction {
    /// Back to the menu to start over.
    OrderAgain,
    /// Back to checkout for another payment attempt.
    RetryPayment,
    /// Resolve the status again.
    RefreshStatus,
}

/// What the status page shows.
#[derive(Debug, Clone, PartialEq)]
pub enum PaymentOutcome {
    Success {
        order: Order,
        payment: PaymentAttempt,
    },
    Failed {
        order: Order,
        payment: PaymentAttempt,
    },
    Pending {
        order: Order,
        payment: Option<PaymentAttempt>,
    },
}

impl PaymentOutcome {
    pub fn order(&self) -> &Order {
        match self {
            PaymentOutcome::Success { order, .. }
            | PaymentOutcome::Failed { order, .. }
            | PaymentOutcome::Pending { order, .. } => order,
        }
    }

    pub fn payment(&self) -> Option<&PaymentAttempt> {
        match self {
            PaymentOutcome::Success { payment, .. } | PaymentOutcome::Failed { payment, .. } => {
                Some(payment)
            }
            PaymentOutcome::Pending { payment, .. } => payment.as_ref(),
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, PaymentOutcome::Success { .. })
    }

    /// Reason shown for a failed payment; `None` for other outcomes.
    pub fn failure_description(&self) -> Option<&str> {
        match self {
            PaymentOutcome::Failed { payment, .. } => {
                Some(payment.error_description().unwrap_or(DECLINED_FALLBACK))
            }
            _ => None,
        }
    }

    pub fn retry_actions(&self) -> &'static [RetryAction] {
        match self {
            PaymentOutcome::Success { .. } => &[RetryAction::OrderAgain],
            PaymentOutcome::Failed { .. } => &[RetryAction::RetryPayment, RetryAction::OrderAgain],
            PaymentOutcome::Pending { .. } => &[RetryAction::RefreshStatus],
        }
    }
}

/// Reduces an order and its payment attempts to one outcome.
pub fn select_outcome(order: Order, attempts: Vec<PaymentAttempt>) -> PaymentOutcome {
    let Some(latest) = attempts.into_iter().next() else {
        return PaymentOutcome::Pending {
            order,
            payment: None,
        };
    };
    match latest.status() {
        PaymentStatus::Success => PaymentOutcome::Success {
            order,
            payment: latest,
        },
        PaymentStatus::Failed => PaymentOutcome::Failed {
            order,
            payment: latest,
        },
        PaymentStatus::Pending | PaymentStatus::Unrecognized(_) => PaymentOutcome::Pending {
            order,
            payment: Some(latest),
        },
    }
}

/// Reads the `order_id` query parameter of a gateway return URL.
///
/// Relative URLs such as `/order-confirmed?order_id=X` are accepted.
pub fn order_id_from_return_url(url: &str) -> Option<String> {
    let parsed = Url::parse(url)
        .or_else(|_| Url::parse("http://localhost/")?.join(url))
        .ok()?;
    parsed
        .query_pairs()
        .find(|(key, _)| key == "order_id")
        .map(|(_, value)| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

#[derive(Clone)]
pub struct OrderStatusResolver {
    orders: Arc<dyn OrderApi>,
}

impl OrderStatusResolver {
    pub fn new(orders: Arc<dyn OrderApi>) -> Self {
        Self { orders }
    }

    #[instrument(skip(self))]
    pub async fn resolve(&self, order_id: &str) -> Result<PaymentOutcome, StatusError> {
        let order_id = order_id.trim();
        if order_id.is_empty() {
            return Err(StatusError::MissingOrderId);
        }

        let (order, attempts) = tokio::try_join!(
            self.orders.order_details(order_id),
            self.orders.payment_attempts(order_id),
        )
        .map_err(|source| {
            warn!(error = %source, "Order status lookup failed");
            StatusError::Fetch {
                order_id: order_id.to_string(),
                source,
            }
        })?;
        debug!(attempts = attempts.len(), "Order status fetched");

        let outcome = select_outcome(order, attempts);
        info!(success = outcome.is_success(), "Order status resolved");
        Ok(outcome)
    }

    /// Resolves straight from the gateway return URL.
    pub async fn resolve_return_url(&self, url: &str) -> Result<PaymentOutcome, StatusError> {
        let order_id = order_id_from_return_url(url).ok_or(StatusError::MissingOrderId)?;
        self.resolve(&order_id).await
    }
}
