//! Checkout backend for the PIX report funnel: transaction creation
//! against the payment gateway, webhook status ingestion, and the status
//! endpoint the funnel client polls.

use axum::routing::{get, post};
use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

pub mod catalog;
pub mod config;
pub mod error;
pub mod gateway;
pub mod handlers;
pub mod hooks;
pub mod models;
pub mod signature;
pub mod state;

use state::AppState;

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(handlers::health))
        .route("/api/create-payment", post(handlers::create_payment))
        .route("/api/webhook", post(handlers::webhook))
        .route("/api/payment-status", get(handlers::payment_status))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
