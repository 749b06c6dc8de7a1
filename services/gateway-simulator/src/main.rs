use std::sync::Arc;
use std::time::Duration;

use axum::extract::{Json, State};
use axum::http::{HeaderMap, StatusCode};
use axum::routing::{get, post};
use axum::Router;
use hmac::{Hmac, Mac};
use parking_lot::RwLock;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use sha2::Sha256;
use tracing::{error, info};
use uuid::Uuid;

// Mock PIX gateway for local development and end-to-end runs: accepts
// transaction creation, hands out a copy-and-paste code, and fires a
// signed PAID webhook back after a configurable delay.

type HmacSha256 = Hmac<Sha256>;

#[derive(Clone)]
struct AppState {
    transactions: Arc<RwLock<Vec<SimTransaction>>>,
    api_key: String,
    webhook_secret: Option<String>,
    webhook_delay: Duration,
}

#[derive(Clone, Debug, Serialize)]
struct SimTransaction {
    id: Uuid,
    external_id: String,
    status: String,
    total_amount: Decimal,
    created_at: String,
}

#[derive(Deserialize)]
struct CreateTransaction {
    external_id: String,
    total_amount: Decimal,
    webhook_url: String,
    customer: SimCustomer,
}

#[derive(Deserialize)]
struct SimCustomer {
    document: String,
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt::init();

    let state = AppState {
        transactions: Arc::new(RwLock::new(Vec::new())),
        api_key: std::env::var("SIM_API_KEY").unwrap_or_else(|_| "test-key".to_string()),
        webhook_secret: std::env::var("WEBHOOK_SECRET").ok(),
        webhook_delay: Duration::from_millis(
            std::env::var("WEBHOOK_DELAY_MS")
                .ok()
                .and_then(|ms| ms.parse().ok())
                .unwrap_or(2000),
        ),
    };

    let app = Router::new()
        .route("/health", get(health_check))
        .route("/v1/transactions", post(create_transaction))
        .route("/transactions", get(list_transactions))
        .route("/reset", post(reset_transactions))
        .with_state(state);

    let port = std::env::var("PORT").unwrap_or_else(|_| "4000".to_string());

    let listener = tokio::net::TcpListener::bind(format!("0.0.0.0:{}", port))
        .await
        .unwrap();

    info!("Gateway simulator listening on port {}", port);

    axum::serve(listener, app).await.unwrap();
}

async fn health_check() -> &'static str {
    "OK"
}

async fn create_transaction(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(payload): Json<CreateTransaction>,
) -> (StatusCode, Json<Value>) {
    let provided_key = headers
        .get("api-secret")
        .and_then(|value| value.to_str().ok())
        .unwrap_or_default();
    if provided_key != state.api_key {
        return (
            StatusCode::UNAUTHORIZED,
            Json(json!({ "hasError": true, "error": "invalid api-secret" })),
        );
    }

    if !is_valid_document(&payload.customer.document) {
        return (
            StatusCode::UNPROCESSABLE_ENTITY,
            Json(json!({ "hasError": true, "errorFields": ["customer.document"] })),
        );
    }

    let transaction = SimTransaction {
        id: Uuid::new_v4(),
        external_id: payload.external_id.clone(),
        status: "PENDING".to_string(),
        total_amount: payload.total_amount,
        created_at: chrono::Local::now().format("%Y-%m-%d %H:%M:%S%.3f").to_string(),
    };
    state.transactions.write().push(transaction.clone());

    info!(
        "Transaction accepted: {} (external_id {})",
        transaction.id, transaction.external_id
    );

    schedule_paid_webhook(&state, payload.external_id.clone(), payload.webhook_url);

    (
        StatusCode::OK,
        Json(json!({
            "id": transaction.id,
            "external_id": transaction.external_id,
            "status": "PENDING",
            "total_amount": transaction.total_amount,
            "pix": { "payload": pix_payload(&transaction.external_id) },
        })),
    )
}

fn schedule_paid_webhook(state: &AppState, external_id: String, webhook_url: String) {
    let transactions = state.transactions.clone();
    let secret = state.webhook_secret.clone();
    let delay = state.webhook_delay;

    tokio::spawn(async move {
        tokio::time::sleep(delay).await;

        let body = json!({ "external_id": external_id, "status": "PAID" }).to_string();
        let mut request = reqwest::Client::new()
            .post(&webhook_url)
            .header("content-type", "application/json")
            .timeout(Duration::from_secs(5));
        if let Some(secret) = &secret {
            request = request.header("x-signature", sign(secret, body.as_bytes()));
        }

        match request.body(body).send().await {
            Ok(response) => {
                info!(
                    "PAID webhook for {} answered {}",
                    external_id,
                    response.status()
                );
                let mut list = transactions.write();
                if let Some(tx) = list.iter_mut().find(|tx| tx.external_id == external_id) {
                    tx.status = "PAID".to_string();
                }
            }
            Err(err) => {
                error!("PAID webhook for {} failed: {}", external_id, err);
            }
        }
    });
}

async fn list_transactions(State(state): State<AppState>) -> Json<Vec<SimTransaction>> {
    Json(state.transactions.read().clone())
}

async fn reset_transactions(State(state): State<AppState>) -> (StatusCode, String) {
    state.transactions.write().clear();
    info!("Simulator state reset - all transactions cleared");
    (StatusCode::OK, "Transactions reset".to_string())
}

fn is_valid_document(document: &str) -> bool {
    document.len() == 11 && document.chars().all(|c| c.is_ascii_digit())
}

/// Synthetic PIX copy-and-paste code, recognizable but not a real EMV payload.
fn pix_payload(external_id: &str) -> String {
    format!("00020126580014br.gov.bcb.pix0136{external_id}5204000053039865802BR")
}

fn sign(secret: &str, body: &[u8]) -> String {
    let mut mac =
        HmacSha256::new_from_slice(secret.as_bytes()).expect("HMAC can take key of any size");
    mac.update(body);
    hex::encode(mac.finalize().into_bytes())
}
