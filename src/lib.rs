pub mod carts;
pub mod catalog;
pub mod config;
pub mod customers;
pub mod db;
pub mod error;
pub mod extract;
pub mod formatting;
pub mod notifications;
pub mod orders;
pub mod payments;
pub mod pricing;
pub mod quotes;
pub mod response;
pub mod validation;

use std::sync::Arc;

use axum::{
    routing::{delete, get, patch, post},
    Router,
};
use sqlx::PgPool;
use tower::ServiceBuilder;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use carts::CartService;
use config::PricingSettings;
use orders::OrderService;
use payments::PaymentService;
use quotes::QuoteService;

/// OpenAPI documentation structure
#[derive(OpenApi)]
#[openapi(
    paths(
        quotes::create_web_quote_handler,
        quotes::create_quote_handler,
        quotes::get_quote_handler,
        quotes::convert_quote_to_cart_handler,
        quotes::update_quote_status_handler,
        catalog::list_products_handler,
        catalog::get_product_handler,
        customers::create_customer_handler,
        customers::get_customer_handler,
        carts::get_cart_handler,
        carts::add_cart_item_handler,
        carts::remove_cart_item_handler,
        orders::checkout_cart_handler,
        orders::get_order_handler,
        orders::update_order_status_handler,
        payments::create_payment_preference_handler,
        notifications::list_notifications_handler,
        notifications::mark_notification_read_handler,
    ),
    components(
        schemas(
            quotes::WebQuoteRequest,
            quotes::WebQuoteItem,
            quotes::CreateQuoteRequest,
            quotes::QuoteContactRequest,
            quotes::QuoteItemRequest,
            quotes::UpdateQuoteStatusRequest,
            quotes::QuoteResponse,
            quotes::QuoteContactResponse,
            quotes::QuoteItemResponse,
            quotes::QuoteStatus,
            quotes::QuoteChannel,
            quotes::ConversionResult,
            catalog::ProductResponse,
            customers::Customer,
            customers::CreateCustomerRequest,
            carts::AddCartItemRequest,
            carts::CartResponse,
            carts::CartItemResponse,
            carts::CartStatus,
            orders::OrderResponse,
            orders::OrderItemResponse,
            orders::OrderStatus,
            orders::UpdateOrderStatusRequest,
            payments::Payment,
            payments::PaymentStatus,
            notifications::Notification,
            notifications::NotificationKind,
        )
    ),
    tags(
        (name = "quotes", description = "Quote intake, lookup and conversion"),
        (name = "catalog", description = "Product browsing"),
        (name = "customers", description = "Customer records"),
        (name = "carts", description = "Shopping carts"),
        (name = "orders", description = "Checkout and order lifecycle"),
        (name = "payments", description = "Payment preferences"),
        (name = "notifications", description = "CRM notification feed")
    ),
    info(
        title = "Commerce & CRM Quoting API",
        version = "1.0.0",
        description = "Quotes, carts, orders and CRM notifications for a building-supplies storefront"
    )
)]
pub struct ApiDoc;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub db: PgPool,
    pub quotes: QuoteService,
    pub carts: CartService,
    pub orders: OrderService,
    pub payments: PaymentService,
}

impl AppState {
    pub fn new(db: PgPool, settings: PricingSettings) -> Self {
        let settings = Arc::new(settings);
        Self {
            quotes: QuoteService::new(db.clone(), Arc::clone(&settings)),
            carts: CartService::new(db.clone(), Arc::clone(&settings)),
            orders: OrderService::new(db.clone(), settings),
            payments: PaymentService::new(db.clone()),
            db,
        }
    }
}

/// Creates and configures the application router
/// Maps all API endpoints to their handlers and adds CORS and request tracing
pub fn create_router(db: PgPool, settings: PricingSettings) -> Router {
    let state = AppState::new(db, settings);

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        // Public web form
        .route("/cotizaciones", post(quotes::create_web_quote_handler))
        // Storefront
        .route("/ecommerce/quotes", post(quotes::create_quote_handler))
        .route("/ecommerce/quotes/:id", get(quotes::get_quote_handler))
        .route(
            "/ecommerce/quotes/:id/convert-to-cart",
            post(quotes::convert_quote_to_cart_handler),
        )
        .route("/ecommerce/quotes/:id/status", patch(quotes::update_quote_status_handler))
        .route("/ecommerce/products", get(catalog::list_products_handler))
        .route("/ecommerce/products/:id", get(catalog::get_product_handler))
        .route("/ecommerce/customers", post(customers::create_customer_handler))
        .route("/ecommerce/customers/:id", get(customers::get_customer_handler))
        .route("/ecommerce/carts/:id", get(carts::get_cart_handler))
        .route("/ecommerce/carts/:id/items", post(carts::add_cart_item_handler))
        .route(
            "/ecommerce/carts/:id/items/:product_id",
            delete(carts::remove_cart_item_handler),
        )
        .route("/ecommerce/carts/:id/checkout", post(orders::checkout_cart_handler))
        .route("/ecommerce/orders/:id", get(orders::get_order_handler))
        .route("/ecommerce/orders/:id/status", patch(orders::update_order_status_handler))
        .route(
            "/ecommerce/orders/:id/payment-preference",
            post(payments::create_payment_preference_handler),
        )
        // CRM
        .route("/crm/notifications", get(notifications::list_notifications_handler))
        .route(
            "/crm/notifications/:id/read",
            patch(notifications::mark_notification_read_handler),
        )
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(cors),
        )
        .with_state(state)
}
