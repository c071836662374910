pub mod config;
pub mod domain {
    pub mod cart;
    pub mod order;
    pub mod payment;
}
pub mod error;
pub mod gateways;
pub mod http {
    pub mod auth;
    pub mod handlers {
        pub mod cart;
        pub mod orders;
        pub mod payments;
    }
}
pub mod repo {
    pub mod cart_repo;
    pub mod invoice_outbox_repo;
    pub mod memory;
    pub mod orders_repo;
    pub mod payments_repo;
    pub mod ports;
}
pub mod service {
    pub mod checkout;
    pub mod invoice_relay;
    pub mod notifier;
    pub mod orders;
    pub mod verifier;
}

use crate::http::auth::AuthContext;
use crate::repo::ports::{CartRepository, PaymentRepository};
use crate::service::checkout::CheckoutService;
use crate::service::orders::OrderService;
use crate::service::verifier::PaymentVerifier;
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub checkout: CheckoutService,
    pub verifier: PaymentVerifier,
    pub orders: OrderService,
    pub cart_repo: Arc<dyn CartRepository>,
    pub payments_repo: Arc<dyn PaymentRepository>,
    pub auth: AuthContext,
}
