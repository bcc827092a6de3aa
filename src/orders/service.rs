// Order service - placement and fulfilment business logic

use chrono::Utc;

use crate::auth::repository::UserRepository;
use crate::checkout::{
    cart::CartPricer,
    handlers::profile_snapshot,
    payment::PaymentGateway,
    pricing,
};
use crate::orders::{
    error::OrderError,
    models::{
        Order, OrderItemResponse, OrderResponse, OrderStatus, OrderType, PlaceOrderRequest,
    },
    repository::OrdersRepository,
    status_machine::StatusMachine,
};
use uuid::Uuid;

/// Service for order business logic
#[derive(Clone)]
pub struct OrderService {
    orders_repo: OrdersRepository,
    user_repo: UserRepository,
    cart_pricer: CartPricer,
    payment_gateway: PaymentGateway,
}

impl OrderService {
    /// Create a new OrderService
    pub fn new(
        orders_repo: OrdersRepository,
        user_repo: UserRepository,
        cart_pricer: CartPricer,
        payment_gateway: PaymentGateway,
    ) -> Self {
        Self {
            orders_repo,
            user_repo,
            cart_pricer,
            payment_gateway,
        }
    }

    /// Place an order for the authenticated user.
    ///
    /// The cart is re-validated and re-priced server-side, the redemption is
    /// checked against the live balance, the gateway is charged for the
    /// amount due, and only then is the settlement transaction run. A
    /// declined charge aborts before any write; a failed settlement rolls
    /// everything back and the order is not placed.
    pub async fn place_order(
        &self,
        user_id: i32,
        request: PlaceOrderRequest,
    ) -> Result<OrderResponse, OrderError> {
        if request.items.is_empty() {
            return Err(OrderError::ValidationError(
                "Order must contain at least one item".to_string(),
            ));
        }

        let table_number = match request.order_type {
            OrderType::DineIn => match request.table_number {
                Some(table) if table > 0 => Some(table),
                _ => {
                    return Err(OrderError::ValidationError(
                        "Dine-in orders require a table number".to_string(),
                    ))
                }
            },
            OrderType::Takeaway => None,
        };

        let user = self
            .user_repo
            .find_by_id(user_id)
            .await
            .map_err(|e| OrderError::DatabaseError(e.to_string()))?
            .ok_or(OrderError::Unauthorized)?;

        let today = Utc::now().date_naive();

        let lines = self
            .cart_pricer
            .price_lines(&user, request.order_type, today, &request.items)
            .await?;

        let snapshot = profile_snapshot(&user);
        let quote = pricing::build_quote(
            lines,
            &snapshot,
            request.order_type,
            request.points_to_redeem,
            user.loyalty_points,
        )?;

        let outcome = self.payment_gateway.charge(quote.amount_due).await;
        if !outcome.success {
            return Err(OrderError::PaymentDeclined);
        }

        let order = self
            .orders_repo
            .settle(
                user_id,
                &quote,
                request.order_type,
                table_number,
                outcome.transaction_id.as_deref(),
                today,
            )
            .await?;

        tracing::info!(
            "Placed order {} for user {}: total {}, {} points earned, {} redeemed",
            order.id,
            user_id,
            order.total_amount,
            order.points_earned,
            order.points_redeemed
        );

        self.build_response(order).await
    }

    /// Get all orders for a user with optional status filter
    pub async fn get_user_orders(
        &self,
        user_id: i32,
        status: Option<OrderStatus>,
    ) -> Result<Vec<OrderResponse>, OrderError> {
        let orders = self.orders_repo.find_by_user_id(user_id, status).await?;

        let mut responses = Vec::with_capacity(orders.len());
        for order in orders {
            responses.push(self.build_response(order).await?);
        }

        Ok(responses)
    }

    /// Get all orders regardless of owner (staff view)
    pub async fn get_all_orders(
        &self,
        status: Option<OrderStatus>,
    ) -> Result<Vec<OrderResponse>, OrderError> {
        let orders = self.orders_repo.find_all(status).await?;

        let mut responses = Vec::with_capacity(orders.len());
        for order in orders {
            responses.push(self.build_response(order).await?);
        }

        Ok(responses)
    }

    /// Get a specific order; customers may only read their own
    pub async fn get_order_by_id(
        &self,
        order_id: Uuid,
        requester_id: i32,
        requester_is_staff: bool,
    ) -> Result<OrderResponse, OrderError> {
        let order = self
            .orders_repo
            .find_by_id(order_id)
            .await?
            .ok_or(OrderError::NotFound)?;

        if order.user_id != requester_id && !requester_is_staff {
            return Err(OrderError::Forbidden(
                "You do not have permission to access this order".to_string(),
            ));
        }

        self.build_response(order).await
    }

    /// Update order status (staff), enforcing the transition rules
    pub async fn update_order_status(
        &self,
        order_id: Uuid,
        new_status: OrderStatus,
    ) -> Result<OrderResponse, OrderError> {
        let order = self
            .orders_repo
            .find_by_id(order_id)
            .await?
            .ok_or(OrderError::NotFound)?;

        StatusMachine::transition(order.status, new_status)
            .map_err(OrderError::InvalidTransition)?;

        let updated = self.orders_repo.update_status(order_id, new_status).await?;

        tracing::info!("Order {} moved from {} to {}", order_id, order.status, new_status);

        self.build_response(updated).await
    }

    async fn build_response(&self, order: Order) -> Result<OrderResponse, OrderError> {
        let items = self.orders_repo.items_for_order(order.id).await?;

        let mut item_responses = Vec::with_capacity(items.len());
        for item in items {
            let addons = self.orders_repo.addons_for_item(item.id).await?;

            item_responses.push(OrderItemResponse {
                id: item.id,
                menu_item_id: item.menu_item_id,
                name: item.name,
                base_price: item.base_price,
                quantity: item.quantity,
                unit_price: item.unit_price,
                line_total: item.line_total,
                applied_daily_offer_id: item.applied_daily_offer_id,
                addons: addons.into_iter().map(|addon| addon.into()).collect(),
            });
        }

        Ok(OrderResponse {
            id: order.id,
            user_id: order.user_id,
            status: order.status,
            payment_status: order.payment_status,
            order_type: order.order_type,
            table_number: order.table_number,
            subtotal: order.subtotal,
            discount_applied: order.discount_applied,
            service_charge: order.service_charge,
            total_amount: order.total_amount,
            points_redeemed: order.points_redeemed,
            points_earned: order.points_earned,
            items: item_responses,
            created_at: order.created_at,
            updated_at: order.updated_at,
        })
    }
}
