use axum::routing::{delete, get, post, put};
use axum::Router;
use checkout_service::config::AppConfig;
use checkout_service::gateways::razorpay::RazorpayGateway;
use checkout_service::http::auth::AuthContext;
use checkout_service::http::handlers::{cart, orders, payments};
use checkout_service::repo::cart_repo::CartRepo;
use checkout_service::repo::invoice_outbox_repo::InvoiceOutboxRepo;
use checkout_service::repo::orders_repo::OrdersRepo;
use checkout_service::repo::payments_repo::PaymentsRepo;
use checkout_service::service::checkout::CheckoutService;
use checkout_service::service::invoice_relay::InvoiceRelay;
use checkout_service::service::notifier::HttpInvoiceNotifier;
use checkout_service::service::orders::OrderService;
use checkout_service::service::verifier::PaymentVerifier;
use checkout_service::AppState;
use sqlx::postgres::PgPoolOptions;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let cfg = AppConfig::from_env();

    let pool = PgPoolOptions::new()
        .max_connections(10)
        .connect(&cfg.database_url)
        .await?;

    sqlx::migrate!("./migrations").run(&pool).await?;

    let cart_repo = Arc::new(CartRepo { pool: pool.clone() });
    let payments_repo = Arc::new(PaymentsRepo { pool: pool.clone() });
    let orders_repo = Arc::new(OrdersRepo { pool: pool.clone() });
    let invoice_outbox = Arc::new(InvoiceOutboxRepo { pool: pool.clone() });

    let gateway = Arc::new(RazorpayGateway {
        base_url: cfg.razorpay_base_url.clone(),
        key_id: cfg.razorpay_key_id.clone(),
        key_secret: cfg.razorpay_key_secret.clone(),
        timeout_ms: cfg.gateway_timeout_ms,
        callback_url: cfg.payment_callback_url.clone(),
        client: reqwest::Client::new(),
    });

    let notifier = Arc::new(HttpInvoiceNotifier {
        target_url: cfg.invoice_notify_url.clone(),
        secret: cfg.invoice_notify_secret.clone(),
        client: reqwest::Client::new(),
    });

    let relay = InvoiceRelay {
        outbox: invoice_outbox,
        notifier,
    };
    tokio::spawn(relay.run());

    let state = AppState {
        checkout: CheckoutService {
            cart_repo: cart_repo.clone(),
            payments_repo: payments_repo.clone(),
            gateway,
            currency: cfg.currency.clone(),
        },
        verifier: PaymentVerifier {
            payments_repo: payments_repo.clone(),
        },
        orders: OrderService { orders_repo },
        cart_repo,
        payments_repo,
        auth: AuthContext::new(&cfg.jwt_secret),
    };

    let app = Router::new()
        .route("/health", get(payments::health))
        .route(
            "/payment",
            post(payments::start_checkout)
                .get(payments::list_payments)
                .delete(payments::delete_payments),
        )
        .route("/payment/verify", get(payments::verify))
        .route(
            "/order",
            get(orders::list_orders).delete(orders::delete_all_orders),
        )
        .route("/order/cancel/:id", put(orders::cancel_order))
        .route("/order/:id", delete(orders::delete_order))
        .route("/carts", post(cart::add_item).get(cart::list_items))
        .route("/carts/:id", delete(cart::remove_item))
        .route("/carts/:id/quantity", put(cart::update_quantity))
        .with_state(state);

    let listener = tokio::net::TcpListener::bind(&cfg.bind_addr).await?;
    tracing::info!("listening on {}", cfg.bind_addr);
    axum::serve(listener, app).await?;
    Ok(())
}
