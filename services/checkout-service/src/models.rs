//! Request/response bodies and the wire contract with the payment gateway.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Checkout submission from the funnel client.
#[derive(Debug, Deserialize)]
pub struct CreatePaymentRequest {
    #[serde(rename = "selectedBumps", default)]
    pub selected_bumps: Vec<String>,
    pub customer: Customer,
}

/// Customer identity as submitted by the checkout form.
///
/// `document` arrives formatted ("123.456.789-00"); it is sanitized before
/// anything is forwarded to the gateway.
#[derive(Clone, Debug, Deserialize)]
pub struct Customer {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub document: String,
    #[serde(default)]
    pub utm: Option<UtmParams>,
}

/// Campaign attribution fields, passed through untouched when present.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct UtmParams {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub utm_source: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub utm_medium: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub utm_campaign: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub utm_content: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub utm_term: Option<String>,
}

/// One order line as the gateway expects it.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct LineItem {
    pub id: String,
    pub title: String,
    pub description: String,
    pub price: Decimal,
    pub quantity: u32,
    pub is_physical: bool,
}

/// Customer object in the gateway's transaction payload.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct GatewayCustomer {
    pub name: String,
    pub email: String,
    pub document_type: String,
    /// Sanitized 11-digit CPF, never the raw form input.
    pub document: String,
}

/// Transaction-creation payload sent to the gateway.
///
/// `external_id` is the durable correlation key: the gateway echoes it in
/// webhook notifications and the client polls status under it.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct PaymentRequest {
    pub external_id: Uuid,
    pub total_amount: Decimal,
    pub payment_method: String,
    pub webhook_url: String,
    pub items: Vec<LineItem>,
    pub ip: String,
    pub customer: GatewayCustomer,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub utm: Option<UtmParams>,
}

/// Authoritative record of an order this service created.
///
/// Registered after the gateway accepts the transaction; the status poll
/// endpoint answers 404 for ids that were never registered here.
#[derive(Clone, Debug, Serialize)]
pub struct OrderRecord {
    pub external_id: String,
    pub total_amount: Decimal,
    pub customer_email: String,
    pub created_at: DateTime<Utc>,
}

/// Asynchronous status notification from the gateway.
///
/// The gateway sends more fields than these; everything else is ignored.
#[derive(Debug, Deserialize)]
pub struct WebhookNotification {
    #[serde(default)]
    pub external_id: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct WebhookAck {
    pub received: bool,
}

#[derive(Debug, Serialize)]
pub struct StatusResponse {
    pub status: String,
}
