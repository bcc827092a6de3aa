use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;
use validator::Validate;

use crate::checkout::models::CartLineRequest;

/// Order status enum representing the lifecycle of an order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "text", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum OrderStatus {
    Pending,
    Preparing,
    Ready,
    Completed,
    Cancelled,
}

impl OrderStatus {
    /// Convert status to string representation
    pub fn as_str(&self) -> &'static str {
        match self {
            OrderStatus::Pending => "pending",
            OrderStatus::Preparing => "preparing",
            OrderStatus::Ready => "ready",
            OrderStatus::Completed => "completed",
            OrderStatus::Cancelled => "cancelled",
        }
    }
}

impl Default for OrderStatus {
    fn default() -> Self {
        OrderStatus::Pending
    }
}

impl std::fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Payment status enum representing the payment state of an order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "text", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum PaymentStatus {
    Unpaid,
    Paid,
    Refunded,
}

impl std::fmt::Display for PaymentStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            PaymentStatus::Unpaid => "unpaid",
            PaymentStatus::Paid => "paid",
            PaymentStatus::Refunded => "refunded",
        };
        write!(f, "{}", s)
    }
}

/// Where the order will be consumed; drives the service charge rule and
/// daily-offer eligibility
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "text", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum OrderType {
    DineIn,
    Takeaway,
}

impl std::fmt::Display for OrderType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            OrderType::DineIn => "dine_in",
            OrderType::Takeaway => "takeaway",
        };
        write!(f, "{}", s)
    }
}

/// Domain model representing an order in the database
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Order {
    pub id: Uuid,
    pub user_id: i32,
    pub status: OrderStatus,
    pub payment_status: PaymentStatus,
    pub order_type: OrderType,
    pub table_number: Option<i32>,
    pub subtotal: Decimal,
    pub discount_applied: Decimal,
    pub service_charge: Decimal,
    pub total_amount: Decimal,
    pub points_redeemed: i32,
    pub points_earned: i32,
    pub payment_ref: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Domain model representing an item snapshot within an order
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct OrderItem {
    pub id: i32,
    pub order_id: Uuid,
    pub menu_item_id: i32,
    pub name: String,
    pub base_price: Decimal,
    pub quantity: i32,
    pub unit_price: Decimal,
    pub line_total: Decimal,
    pub applied_daily_offer_id: Option<Uuid>,
}

/// Add-on snapshot attached to an order item
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct OrderItemAddon {
    pub id: i32,
    pub order_item_id: i32,
    pub addon_id: i32,
    pub name: String,
    pub price: Decimal,
}

/// Request DTO for placing an order
#[derive(Debug, Deserialize, Validate)]
pub struct PlaceOrderRequest {
    #[validate(length(min = 1, message = "Order must contain at least one item"))]
    pub items: Vec<CartLineRequest>,
    pub order_type: OrderType,
    /// Required for dine-in orders
    pub table_number: Option<i32>,
    /// Points to redeem against the total, 1 point = 1 currency unit
    #[serde(default)]
    pub points_to_redeem: i32,
}

/// Request DTO for updating order status (staff)
#[derive(Debug, Deserialize)]
pub struct UpdateStatusRequest {
    pub status: OrderStatus,
}

/// Response DTO for an order item with its add-ons
#[derive(Debug, Serialize)]
pub struct OrderItemResponse {
    pub id: i32,
    pub menu_item_id: i32,
    pub name: String,
    pub base_price: Decimal,
    pub quantity: i32,
    pub unit_price: Decimal,
    pub line_total: Decimal,
    pub applied_daily_offer_id: Option<Uuid>,
    pub addons: Vec<OrderItemAddonResponse>,
}

/// Response DTO for an order item add-on snapshot
#[derive(Debug, Serialize)]
pub struct OrderItemAddonResponse {
    pub addon_id: i32,
    pub name: String,
    pub price: Decimal,
}

impl From<OrderItemAddon> for OrderItemAddonResponse {
    fn from(addon: OrderItemAddon) -> Self {
        Self {
            addon_id: addon.addon_id,
            name: addon.name,
            price: addon.price,
        }
    }
}

/// Response DTO for a full order
#[derive(Debug, Serialize)]
pub struct OrderResponse {
    pub id: Uuid,
    pub user_id: i32,
    pub status: OrderStatus,
    pub payment_status: PaymentStatus,
    pub order_type: OrderType,
    pub table_number: Option<i32>,
    pub subtotal: Decimal,
    pub discount_applied: Decimal,
    pub service_charge: Decimal,
    pub total_amount: Decimal,
    pub points_redeemed: i32,
    pub points_earned: i32,
    pub items: Vec<OrderItemResponse>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
