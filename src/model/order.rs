//! Orders as drafted at checkout and as read back from the order API.
//!
//! Status strings from the backend and the gateway are parsed leniently:
//! unknown values are kept rather than rejected, so a new upstream status
//! never breaks deserialization of an otherwise valid order.

use crate::model::MenuItemId;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt::Display;

/// How the customer receives the order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum OrderType {
    #[serde(rename = "delivery")]
    Delivery,
    #[serde(rename = "dinein")]
    DineIn,
}

impl OrderType {
    pub fn as_str(&self) -> &'static str {
        match self {
            OrderType::Delivery => "delivery",
            OrderType::DineIn => "dinein",
        }
    }
}

impl Display for OrderType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeliveryDetails {
    pub first_name: String,
    pub last_name: String,
    pub hostel: String,
    pub room_number: String,
    pub floor: String,
    pub phone: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DineInDetails {
    pub first_name: String,
    pub last_name: String,
    pub table_number: String,
    pub phone: String,
}

/// A validated order about to be submitted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OrderDraft {
    Delivery(DeliveryDetails),
    DineIn(DineInDetails),
}

impl OrderDraft {
    pub fn order_type(&self) -> OrderType {
        match self {
            OrderDraft::Delivery(_) => OrderType::Delivery,
            OrderDraft::DineIn(_) => OrderType::DineIn,
        }
    }

    /// Body of `POST /order/createOrder`.
    pub fn to_request(&self) -> CreateOrderRequest<'_> {
        match self {
            OrderDraft::Delivery(details) => CreateOrderRequest {
                order_type: OrderType::Delivery,
                delivery_details: Some(details),
                dine_in_details: None,
            },
            OrderDraft::DineIn(details) => CreateOrderRequest {
                order_type: OrderType::DineIn,
                delivery_details: None,
                dine_in_details: Some(details),
            },
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateOrderRequest<'a> {
    pub order_type: OrderType,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub delivery_details: Option<&'a DeliveryDetails>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dine_in_details: Option<&'a DineInDetails>,
}

/// Colour family a status badge is rendered with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BadgeTone {
    Warning,
    Info,
    Progress,
    Positive,
    Negative,
    Neutral,
}

/// Payment state of an order or of a single gateway attempt.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(from = "String")]
pub enum PaymentStatus {
    #[default]
    Pending,
    Success,
    Failed,
    Unrecognized(String),
}

impl From<&str> for PaymentStatus {
    fn from(raw: &str) -> Self {
        if raw.eq_ignore_ascii_case("SUCCESS") {
            PaymentStatus::Success
        } else if raw.eq_ignore_ascii_case("FAILED") {
            PaymentStatus::Failed
        } else if raw.eq_ignore_ascii_case("PENDING") {
            PaymentStatus::Pending
        } else {
            PaymentStatus::Unrecognized(raw.to_string())
        }
    }
}

impl From<String> for PaymentStatus {
    fn from(raw: String) -> Self {
        PaymentStatus::from(raw.as_str())
    }
}

impl PaymentStatus {
    pub fn badge(&self) -> BadgeTone {
        match self {
            PaymentStatus::Success => BadgeTone::Positive,
            PaymentStatus::Pending => BadgeTone::Warning,
            PaymentStatus::Failed => BadgeTone::Negative,
            PaymentStatus::Unrecognized(_) => BadgeTone::Neutral,
        }
    }
}

/// Kitchen lifecycle of an order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(from = "String")]
pub enum OrderStatus {
    #[default]
    Pending,
    Confirmed,
    Preparing,
    Delivered,
    Cancelled,
    Unknown(String),
}

impl From<String> for OrderStatus {
    fn from(raw: String) -> Self {
        match raw.to_ascii_lowercase().as_str() {
            "pending" => OrderStatus::Pending,
            "confirmed" => OrderStatus::Confirmed,
            "preparing" => OrderStatus::Preparing,
            "delivered" => OrderStatus::Delivered,
            "cancelled" => OrderStatus::Cancelled,
            _ => OrderStatus::Unknown(raw),
        }
    }
}

impl OrderStatus {
    pub fn badge(&self) -> BadgeTone {
        match self {
            OrderStatus::Pending => BadgeTone::Warning,
            OrderStatus::Confirmed => BadgeTone::Info,
            OrderStatus::Preparing => BadgeTone::Progress,
            OrderStatus::Delivered => BadgeTone::Positive,
            OrderStatus::Cancelled => BadgeTone::Negative,
            OrderStatus::Unknown(_) => BadgeTone::Neutral,
        }
    }
}

/// A line captured on the order at creation time.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderItem {
    pub menu_id: MenuItemId,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub quantity: u32,
    #[serde(default)]
    pub price: Decimal,
}

/// Read-only projection of an order accepted by the backend.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    #[serde(rename = "_id")]
    pub id: String,
    #[serde(default)]
    pub order_id: String,
    #[serde(default)]
    pub items: Vec<OrderItem>,
    #[serde(default)]
    pub total_amount: Decimal,
    #[serde(default)]
    pub delivery_charges: Decimal,
    #[serde(default)]
    pub gst_amount: Decimal,
    #[serde(default)]
    pub grand_total: Decimal,
    pub order_type: OrderType,
    #[serde(default)]
    pub delivery_details: Option<DeliveryDetails>,
    #[serde(default)]
    pub dine_in_details: Option<DineInDetails>,
    #[serde(default)]
    pub is_paid: bool,
    #[serde(default)]
    pub payment_status: PaymentStatus,
    #[serde(default)]
    pub status: OrderStatus,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub payment_session_id: Option<String>,
}

impl Order {
    /// Name and phone of whoever placed the order, whichever detail block is present.
    pub fn customer(&self) -> Option<(String, &str)> {
        if let Some(d) = &self.delivery_details {
            return Some((format!("{} {}", d.first_name, d.last_name), d.phone.as_str()));
        }
        self.dine_in_details
            .as_ref()
            .map(|d| (format!("{} {}", d.first_name, d.last_name), d.phone.as_str()))
    }

    pub fn item_count(&self) -> u32 {
        self.items.iter().map(|item| item.quantity).sum()
    }
}

/// `result.order` of the create-order response.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct CreatedOrder {
    pub order: Order,
}

impl CreatedOrder {
    /// Handle the gateway needs to open hosted checkout, if the backend issued one.
    pub fn payment_session_id(&self) -> Option<&str> {
        self.order
            .payment_session_id
            .as_deref()
            .filter(|id| !id.trim().is_empty())
    }
}

/// Delivery availability switch maintained by the canteen.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeliverySettings {
    #[serde(default)]
    pub is_delivery_enabled: bool,
}

/// Failure detail attached to a declined gateway attempt.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct PaymentErrorDetails {
    #[serde(default)]
    pub error_code: Option<String>,
    #[serde(default)]
    pub error_description: Option<String>,
    #[serde(default)]
    pub error_reason: Option<String>,
    #[serde(default)]
    pub error_source: Option<String>,
}

/// One gateway-reported payment attempt. The API returns most recent first.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct PaymentAttempt {
    #[serde(rename = "cf_payment_id", default)]
    pub payment_id: Option<serde_json::Value>,
    #[serde(default)]
    pub order_id: Option<String>,
    #[serde(default)]
    pub payment_status: Option<String>,
    #[serde(default)]
    pub payment_amount: Option<Decimal>,
    #[serde(default)]
    pub order_amount: Option<Decimal>,
    #[serde(default)]
    pub payment_currency: Option<String>,
    #[serde(default)]
    pub payment_message: Option<String>,
    #[serde(default)]
    pub payment_group: Option<String>,
    #[serde(default)]
    pub bank_reference: Option<String>,
    #[serde(default)]
    pub payment_time: Option<String>,
    #[serde(default)]
    pub payment_completion_time: Option<String>,
    #[serde(default)]
    pub error_details: Option<PaymentErrorDetails>,
}

impl PaymentAttempt {
    pub fn status(&self) -> PaymentStatus {
        PaymentStatus::from(self.payment_status.as_deref().unwrap_or_default())
    }

    pub fn error_description(&self) -> Option<&str> {
        self.error_details
            .as_ref()
            .and_then(|details| details.error_description.as_deref())
            .filter(|description| !description.is_empty())
    }
}
