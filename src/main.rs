mod auth;
mod checkout;
mod db;
mod error;
mod loyalty;
mod menu;
mod offers;
mod orders;
mod query;
mod users;
mod validation;

use std::sync::Arc;

use axum::{
    middleware::from_fn,
    routing::{delete, get, patch, post, put},
    Router,
};
use sqlx::PgPool;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use auth::{AuthService, RequireRole, TokenRepository, TokenService, UserRepository};
use checkout::{CartPricer, PaymentGateway};
use loyalty::{LoyaltyRepository, LoyaltyService};
use menu::MenuRepository;
use offers::OffersRepository;
use orders::{OrderService, OrdersRepository};
use users::UsersAdminRepository;

/// OpenAPI documentation for the public catalog surface
#[derive(OpenApi)]
#[openapi(
    paths(
        menu::handlers::get_menu_handler,
        menu::handlers::get_menu_item_handler,
        menu::handlers::list_categories_handler,
        menu::handlers::create_menu_item_handler,
    ),
    components(
        schemas(
            menu::models::MenuItem,
            menu::models::Category,
            menu::models::CreateMenuItem,
            menu::models::UpdateMenuItem,
            menu::models::AddonGroupRequest,
        )
    ),
    tags(
        (name = "menu", description = "Menu browsing endpoints"),
        (name = "admin", description = "Catalog management endpoints")
    ),
    info(
        title = "Steamsbury API",
        version = "1.0.0",
        description = "Cafe ordering, loyalty, and admin management backend"
    )
)]
struct ApiDoc;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub db: PgPool,
    pub auth_service: AuthService,
    pub user_repo: UserRepository,
    pub menu_repo: MenuRepository,
    pub offers_repo: OffersRepository,
    pub loyalty_repo: LoyaltyRepository,
    pub loyalty_service: LoyaltyService,
    pub cart_pricer: CartPricer,
    pub order_service: OrderService,
    pub users_admin_repo: UsersAdminRepository,
}

impl AppState {
    /// Wire repositories and services over a pool
    fn new(db: PgPool, jwt_secret: String) -> Self {
        let user_repo = UserRepository::new(db.clone());
        let token_repo = TokenRepository::new(db.clone());
        let token_service = Arc::new(TokenService::new(jwt_secret));
        let menu_repo = MenuRepository::new(db.clone());
        let offers_repo = OffersRepository::new(db.clone());
        let loyalty_repo = LoyaltyRepository::new(db.clone());
        let users_admin_repo = UsersAdminRepository::new(db.clone());

        let auth_service = AuthService::new(
            user_repo.clone(),
            token_repo,
            token_service,
            loyalty_repo.clone(),
        );
        let loyalty_service = LoyaltyService::new(loyalty_repo.clone());
        let cart_pricer = CartPricer::new(
            menu_repo.clone(),
            offers_repo.clone(),
            loyalty_repo.clone(),
        );
        let order_service = OrderService::new(
            OrdersRepository::new(db.clone()),
            user_repo.clone(),
            cart_pricer.clone(),
            PaymentGateway::new(),
        );

        Self {
            db,
            auth_service,
            user_repo,
            menu_repo,
            offers_repo,
            loyalty_repo,
            loyalty_service,
            cart_pricer,
            order_service,
            users_admin_repo,
        }
    }
}

/// Creates and configures the application router
/// Maps all API endpoints to their handlers, gates the staff/admin surfaces,
/// and adds CORS middleware
fn create_router(db: PgPool, jwt_secret: String) -> Router {
    use tower_http::cors::{Any, CorsLayer};

    let state = AppState::new(db, jwt_secret);

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    // Fulfilment surface: staff and admin
    let staff_gate = RequireRole::staff();
    let staff_routes = Router::new()
        .route("/api/admin/orders", get(orders::list_all_orders_handler))
        .route(
            "/api/admin/orders/:order_id/status",
            patch(orders::update_order_status_handler),
        )
        .layer(from_fn(
            move |req: axum::extract::Request, next: axum::middleware::Next| {
                let gate = staff_gate.clone();
                async move { gate.middleware(req, next).await }
            },
        ));

    // Management surface: admin only
    let admin_gate = RequireRole::admin();
    let admin_routes = Router::new()
        .route("/api/admin/menu-items", post(menu::create_menu_item_handler))
        .route("/api/admin/menu-items/:id", put(menu::update_menu_item_handler))
        .route("/api/admin/menu-items/:id", delete(menu::delete_menu_item_handler))
        .route("/api/admin/categories", post(menu::create_category_handler))
        .route("/api/admin/categories/:id", put(menu::update_category_handler))
        .route("/api/admin/categories/:id", delete(menu::delete_category_handler))
        .route("/api/admin/addon-categories", get(menu::list_addon_categories_handler))
        .route("/api/admin/addon-categories", post(menu::create_addon_category_handler))
        .route("/api/admin/addon-categories/:id", put(menu::update_addon_category_handler))
        .route("/api/admin/addon-categories/:id", delete(menu::delete_addon_category_handler))
        .route("/api/admin/addons", get(menu::list_addons_handler))
        .route("/api/admin/addons", post(menu::create_addon_handler))
        .route("/api/admin/addons/:id", put(menu::update_addon_handler))
        .route("/api/admin/addons/:id", delete(menu::delete_addon_handler))
        .route("/api/admin/offers", get(offers::handlers::list_offers_handler))
        .route("/api/admin/offers", post(offers::handlers::create_offer_handler))
        .route("/api/admin/offers/:id", get(offers::handlers::get_offer_handler))
        .route("/api/admin/offers/:id", put(offers::handlers::update_offer_handler))
        .route("/api/admin/offers/:id", delete(offers::handlers::delete_offer_handler))
        .route("/api/admin/loyalty-levels", post(loyalty::handlers::create_level_handler))
        .route("/api/admin/loyalty-levels/:id", put(loyalty::handlers::update_level_handler))
        .route("/api/admin/loyalty-levels/:id", delete(loyalty::handlers::delete_level_handler))
        .route("/api/admin/users", get(users::list_users_handler))
        .route("/api/admin/users/:id", get(users::get_user_handler))
        .route("/api/admin/users/:id/role", patch(users::update_role_handler))
        .route(
            "/api/admin/users/:id/birthday-discount",
            post(users::grant_birthday_discount_handler),
        )
        .route("/api/admin/users/:id/verify-email", post(users::verify_email_handler))
        .layer(from_fn(
            move |req: axum::extract::Request, next: axum::middleware::Next| {
                let gate = admin_gate.clone();
                async move { gate.middleware(req, next).await }
            },
        ));

    Router::new()
        // Swagger UI over the public catalog surface
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        // Auth
        .route("/api/auth/register", post(auth::handlers::register_handler))
        .route("/api/auth/login", post(auth::handlers::login_handler))
        .route("/api/auth/refresh", post(auth::handlers::refresh_handler))
        .route("/api/auth/me", get(auth::handlers::me_handler))
        // Public catalog
        .route("/api/menu", get(menu::get_menu_handler))
        .route("/api/menu/:id", get(menu::get_menu_item_handler))
        .route("/api/categories", get(menu::list_categories_handler))
        .route("/api/offers/active", get(offers::handlers::active_offers_handler))
        .route("/api/loyalty/levels", get(loyalty::handlers::list_levels_handler))
        // Customer loyalty
        .route("/api/loyalty/summary", get(loyalty::handlers::loyalty_summary_handler))
        .route(
            "/api/loyalty/transactions",
            get(loyalty::handlers::list_transactions_handler),
        )
        .route(
            "/api/loyalty/rewards/claim",
            post(loyalty::handlers::claim_reward_handler),
        )
        // Checkout
        .route("/api/checkout/price-line", post(checkout::handlers::price_line_handler))
        .route("/api/checkout/quote", post(checkout::handlers::quote_handler))
        // Orders
        .route("/api/orders", post(orders::place_order_handler))
        .route("/api/orders", get(orders::get_order_history_handler))
        .route("/api/orders/:order_id", get(orders::get_order_by_id_handler))
        // Gated surfaces
        .merge(staff_routes)
        .merge(admin_routes)
        .layer(cors)
        .with_state(state)
}

#[tokio::main]
async fn main() {
    // Load environment variables from .env file
    dotenv::dotenv().ok();

    // Initialize tracing subscriber for logging
    tracing_subscriber::fmt()
        .with_target(false)
        .with_level(true)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    tracing::info!("Steamsbury API - Starting...");

    // Get configuration from environment variables
    let database_url = std::env::var("DATABASE_URL")
        .expect("DATABASE_URL must be set in environment");
    let jwt_secret = std::env::var("JWT_SECRET")
        .expect("JWT_SECRET must be set in environment");
    let host = std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string());
    let port = std::env::var("PORT").unwrap_or_else(|_| "8080".to_string());

    // Create database connection pool
    tracing::info!("Connecting to database...");
    let db_pool = db::create_pool(&database_url)
        .await
        .expect("Failed to create database pool");

    // Run SQLx migrations on startup
    tracing::info!("Running database migrations...");
    sqlx::migrate!("./migrations")
        .run(&db_pool)
        .await
        .expect("Failed to run database migrations");
    tracing::info!("Migrations completed successfully");

    // Create the application router
    let app = create_router(db_pool, jwt_secret);

    // Start the Axum server
    let addr = format!("{}:{}", host, port);
    tracing::info!("Starting server on {}", addr);

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .expect("Failed to bind to address");

    tracing::info!("Steamsbury API is running on http://{}", addr);
    tracing::info!("Swagger UI available at http://{}/swagger-ui", addr);

    axum::serve(listener, app)
        .await
        .expect("Server error");
}

#[cfg(test)]
mod tests;
