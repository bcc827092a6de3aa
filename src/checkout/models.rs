use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::offers::resolver::AppliedOffer;
use crate::orders::models::OrderType;

/// A single cart line as sent by the client: a menu item, chosen add-ons,
/// and a quantity. Prices are never taken from the client.
#[derive(Debug, Clone, Deserialize, Serialize, Validate)]
pub struct CartLineRequest {
    pub menu_item_id: i32,
    #[serde(default)]
    pub addon_ids: Vec<i32>,
    #[validate(range(min = 1, message = "Quantity must be at least 1"))]
    pub quantity: i32,
}

/// An add-on snapshot priced into a cart line
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct PricedAddon {
    pub addon_id: i32,
    pub name: String,
    pub price: Decimal,
}

/// A cart line after server-side validation and pricing
#[derive(Debug, Clone, Serialize)]
pub struct PricedLine {
    pub menu_item_id: i32,
    pub name: String,
    /// Item base price before any offer discount
    pub base_price: Decimal,
    pub addons: Vec<PricedAddon>,
    pub quantity: i32,
    /// Post-offer item price plus add-on prices
    pub unit_price: Decimal,
    pub line_total: Decimal,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub applied_offer: Option<AppliedOffer>,
}

impl PricedLine {
    pub fn applied_offer_id(&self) -> Option<Uuid> {
        self.applied_offer.as_ref().map(|offer| offer.offer_id)
    }
}

/// Request DTO for pricing a single cart line
#[derive(Debug, Deserialize, Validate)]
pub struct PriceLineRequest {
    #[validate]
    pub line: CartLineRequest,
    pub order_type: OrderType,
}

/// Request DTO for a full checkout quote
#[derive(Debug, Deserialize, Validate)]
pub struct QuoteRequest {
    #[validate(length(min = 1, message = "Cart must contain at least one item"))]
    pub items: Vec<CartLineRequest>,
    pub order_type: OrderType,
    /// Points the customer wants to redeem, 1 point = 1 currency unit
    #[serde(default)]
    pub points_to_redeem: i32,
}

/// The full pricing breakdown for a cart, as shown on the checkout page and
/// persisted onto the order at settlement.
#[derive(Debug, Clone, Serialize)]
pub struct CheckoutQuote {
    pub lines: Vec<PricedLine>,
    /// Sum of line totals; daily-offer discounts are already baked in
    pub subtotal: Decimal,
    pub welcome_discount: Decimal,
    pub birthday_discount: Decimal,
    /// Effective discount taken off the subtotal
    pub discount_applied: Decimal,
    pub discounted_subtotal: Decimal,
    pub service_charge: Decimal,
    /// Final payable before points redemption
    pub cart_total: Decimal,
    pub points_redeemed: i32,
    /// What the payment gateway charges
    pub amount_due: Decimal,
    pub points_to_earn: i32,
    /// Set when a welcome discount was applied; settlement bumps order_count
    pub welcome_consumed: bool,
    /// Set when the one-shot birthday discount was applied
    pub birthday_consumed: bool,
}
