//! HTTP endpoint handlers.

use std::collections::HashMap;
use std::net::SocketAddr;

use axum::body::Bytes;
use axum::extract::rejection::JsonRejection;
use axum::extract::{ConnectInfo, Query, State};
use axum::http::HeaderMap;
use axum::Json;
use chrono::Utc;
use serde_json::Value;
use tracing::{error, info, warn};

use crate::error::CheckoutError;
use crate::gateway::build_payment_request;
use crate::models::{
    CreatePaymentRequest, OrderRecord, StatusResponse, WebhookAck, WebhookNotification,
};
use crate::signature;
use crate::state::AppState;

pub async fn health() -> &'static str {
    "OK"
}

/// Create a PIX transaction for one checkout submission.
///
/// Validates and prices the order, calls the gateway, registers the order
/// for later status polling, and relays the gateway's response body with
/// the generated `external_id`.
pub async fn create_payment(
    State(state): State<AppState>,
    connect_info: Option<ConnectInfo<SocketAddr>>,
    headers: HeaderMap,
    payload: Result<Json<CreatePaymentRequest>, JsonRejection>,
) -> Result<Json<Value>, CheckoutError> {
    let Json(payload) = payload.map_err(|rejection| {
        CheckoutError::Validation(format!("Invalid request body: {}", rejection.body_text()))
    })?;

    // x-forwarded-for, else the peer address, else loopback.
    let socket_ip = connect_info.map(|ConnectInfo(addr)| addr.ip().to_string());
    let origin_ip = headers
        .get("x-forwarded-for")
        .and_then(|value| value.to_str().ok())
        .map(str::to_string)
        .or(socket_ip)
        .unwrap_or_else(|| "127.0.0.1".to_string());

    let request = build_payment_request(
        &payload.selected_bumps,
        &payload.customer,
        &state.config.webhook_url,
        &origin_ip,
    )?;

    let body = state.gateway.create_transaction(&request).await?;

    state.register_order(OrderRecord {
        external_id: request.external_id.to_string(),
        total_amount: request.total_amount,
        customer_email: request.customer.email.clone(),
        created_at: Utc::now(),
    });

    info!(
        "Transaction created: {} (total {})",
        request.external_id, request.total_amount
    );

    Ok(Json(body))
}

/// Receive an asynchronous status notification from the gateway.
///
/// The signature is checked before anything else when a secret is
/// configured. A recorded status is always acknowledged, even when the
/// paid-order side effects fail; the gateway would otherwise retry the
/// delivery forever.
pub async fn webhook(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Json<WebhookAck>, CheckoutError> {
    if let Some(secret) = &state.config.webhook_secret {
        let provided = headers
            .get(signature::SIGNATURE_HEADER)
            .and_then(|value| value.to_str().ok())
            .ok_or(CheckoutError::Unauthorized)?;
        if !signature::verify(secret, &body, provided) {
            warn!("Webhook rejected: signature verification failed");
            return Err(CheckoutError::Unauthorized);
        }
    }

    let notification: WebhookNotification = serde_json::from_slice(&body)
        .map_err(|_| CheckoutError::Validation("Malformed webhook payload".to_string()))?;

    let (Some(transaction_id), Some(status)) = (notification.external_id, notification.status)
    else {
        return Err(CheckoutError::Validation(
            "Webhook payload is missing external_id or status".to_string(),
        ));
    };
    if transaction_id.is_empty() || status.is_empty() {
        return Err(CheckoutError::Validation(
            "Webhook payload is missing external_id or status".to_string(),
        ));
    }

    state.set_status(&transaction_id, &status);
    info!("Webhook recorded: {} -> {}", transaction_id, status);

    if status == "PAID" {
        run_paid_hooks(&state, &transaction_id);
    }

    Ok(Json(WebhookAck { received: true }))
}

fn run_paid_hooks(state: &AppState, transaction_id: &str) {
    let Some(order) = state.order(transaction_id) else {
        warn!(
            "Paid notification for unknown order {}, skipping side effects",
            transaction_id
        );
        return;
    };

    // Failure isolation: each hook is attempted, failures only get logged.
    if let Err(err) = state.hooks.mark_order_paid(&order) {
        error!("mark_order_paid failed for {}: {}", order.external_id, err);
    }
    if let Err(err) = state.hooks.send_confirmation_email(&order.customer_email) {
        error!(
            "send_confirmation_email failed for {}: {}",
            order.external_id, err
        );
    }
    if let Err(err) = state.hooks.grant_access(&order) {
        error!("grant_access failed for {}: {}", order.external_id, err);
    }
}

/// Read the current payment status for a transaction.
pub async fn payment_status(
    State(state): State<AppState>,
    Query(params): Query<HashMap<String, String>>,
) -> Result<Json<StatusResponse>, CheckoutError> {
    let transaction_id = params
        .get("transactionId")
        .filter(|id| !id.is_empty())
        .ok_or_else(|| {
            CheckoutError::Validation("Missing transactionId query parameter".to_string())
        })?;

    if state.order(transaction_id).is_none() {
        return Err(CheckoutError::NotFound(format!("order {transaction_id}")));
    }

    Ok(Json(StatusResponse {
        status: state.status(transaction_id),
    }))
}
