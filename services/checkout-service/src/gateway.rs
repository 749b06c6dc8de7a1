//! Payment request assembly and the outbound gateway client.

use std::time::Duration;

use rust_decimal::Decimal;
use serde_json::{json, Value};
use tracing::{error, info, warn};
use uuid::Uuid;

use crate::catalog;
use crate::error::CheckoutError;
use crate::models::{Customer, GatewayCustomer, LineItem, PaymentRequest};

/// Strip every non-digit character from a document string.
pub fn sanitize_document(raw: &str) -> String {
    raw.chars().filter(char::is_ascii_digit).collect()
}

/// Build the gateway transaction payload for one checkout attempt.
///
/// Validates the customer, sanitizes the CPF, prices the selection against
/// the catalog (unknown add-on ids are silently dropped) and generates a
/// fresh `external_id`. Pure; the network call happens in [`GatewayClient`].
pub fn build_payment_request(
    selected_bumps: &[String],
    customer: &Customer,
    webhook_url: &str,
    origin_ip: &str,
) -> Result<PaymentRequest, CheckoutError> {
    if customer.name.trim().is_empty()
        || customer.email.trim().is_empty()
        || customer.document.trim().is_empty()
    {
        return Err(CheckoutError::Validation(
            "Customer data is incomplete: name, email and document are required".to_string(),
        ));
    }

    let document = sanitize_document(&customer.document);
    if document.len() != 11 {
        return Err(CheckoutError::Validation(
            "Invalid document format: a CPF has exactly 11 digits".to_string(),
        ));
    }

    let mut total: Decimal = catalog::base_price();
    let mut items = vec![LineItem {
        id: catalog::BASE_ITEM_ID.to_string(),
        title: catalog::BASE_ITEM_TITLE.to_string(),
        description: catalog::BASE_ITEM_DESCRIPTION.to_string(),
        price: catalog::base_price(),
        quantity: 1,
        is_physical: false,
    }];

    for bump_id in selected_bumps {
        if let Some(price) = catalog::addon_price(bump_id) {
            total += price;
            items.push(LineItem {
                id: bump_id.clone(),
                title: catalog::addon_title(bump_id),
                description: catalog::ADDON_DESCRIPTION.to_string(),
                price,
                quantity: 1,
                is_physical: false,
            });
        }
    }

    Ok(PaymentRequest {
        external_id: Uuid::new_v4(),
        total_amount: total.round_dp(2),
        payment_method: "PIX".to_string(),
        webhook_url: webhook_url.to_string(),
        items,
        ip: origin_ip.to_string(),
        customer: GatewayCustomer {
            name: customer.name.clone(),
            email: customer.email.clone(),
            document_type: "CPF".to_string(),
            document,
        },
        utm: customer.utm.clone(),
    })
}

const MAX_ATTEMPTS: u32 = 3;
const BACKOFF_BASE_MS: u64 = 250;

/// Client for the gateway's transaction-creation endpoint.
pub struct GatewayClient {
    http: reqwest::Client,
    base_url: String,
    api_key: Option<String>,
}

impl GatewayClient {
    pub fn new(base_url: String, api_key: Option<String>) -> Self {
        let http = reqwest::Client::builder()
            .connect_timeout(Duration::from_secs(5))
            .timeout(Duration::from_secs(15))
            .build()
            .expect("Failed to build HTTP client");
        Self {
            http,
            base_url,
            api_key,
        }
    }

    /// Create a PIX transaction at the gateway.
    ///
    /// Transport failures and 5xx answers are retried with exponential
    /// backoff; the same `external_id` is sent on every attempt so the
    /// gateway can deduplicate. Client-side rejections (4xx or a body with
    /// `hasError`) are terminal and relayed to the caller. On success the
    /// gateway body is returned verbatim, augmented with `external_id`.
    pub async fn create_transaction(
        &self,
        request: &PaymentRequest,
    ) -> Result<Value, CheckoutError> {
        let api_key = self.api_key.as_deref().ok_or_else(|| {
            CheckoutError::Configuration("GATEWAY_API_KEY is not set".to_string())
        })?;
        let url = format!("{}/v1/transactions", self.base_url);

        let mut attempt = 0;
        loop {
            attempt += 1;
            match self
                .http
                .post(&url)
                .header("api-secret", api_key)
                .json(request)
                .send()
                .await
            {
                Ok(response) => {
                    let status = response.status();
                    let text = response.text().await.unwrap_or_default();
                    let body: Value = serde_json::from_str(&text).unwrap_or(Value::Null);
                    let has_error = body
                        .get("hasError")
                        .and_then(Value::as_bool)
                        .unwrap_or(false);

                    if status.is_success() && !has_error {
                        let mut body = body;
                        if let Value::Object(map) = &mut body {
                            map.insert(
                                "external_id".to_string(),
                                json!(request.external_id),
                            );
                        }
                        info!(
                            "Gateway accepted transaction {} (attempt {})",
                            request.external_id, attempt
                        );
                        return Ok(body);
                    }

                    if status.is_server_error() && attempt < MAX_ATTEMPTS {
                        let backoff = backoff_ms(attempt);
                        warn!(
                            "Gateway answered {} for {}, retry {}/{} in {}ms",
                            status, request.external_id, attempt, MAX_ATTEMPTS, backoff
                        );
                        tokio::time::sleep(Duration::from_millis(backoff)).await;
                        continue;
                    }

                    let details = error_details(&body, &text);
                    error!(
                        "Gateway rejected transaction {}: {} ({})",
                        request.external_id, status, details
                    );
                    return Err(CheckoutError::Gateway {
                        status: status.as_u16(),
                        details,
                    });
                }
                Err(err) if attempt < MAX_ATTEMPTS => {
                    let backoff = backoff_ms(attempt);
                    warn!(
                        "Gateway request for {} failed ({}), retry {}/{} in {}ms",
                        request.external_id, err, attempt, MAX_ATTEMPTS, backoff
                    );
                    tokio::time::sleep(Duration::from_millis(backoff)).await;
                }
                Err(err) => {
                    error!(
                        "Gateway unreachable for {} after {} attempts: {}",
                        request.external_id, attempt, err
                    );
                    return Err(CheckoutError::Unexpected(format!(
                        "gateway request failed: {err}"
                    )));
                }
            }
        }
    }
}

fn backoff_ms(attempt: u32) -> u64 {
    BACKOFF_BASE_MS * 2u64.pow(attempt - 1)
}

/// Best-effort extraction of the gateway's error detail: the joined
/// `errorFields` list, else its `error` message, else the raw body.
fn error_details(body: &Value, raw: &str) -> String {
    if let Some(fields) = body.get("errorFields").and_then(Value::as_array) {
        let joined: Vec<&str> = fields.iter().filter_map(Value::as_str).collect();
        if !joined.is_empty() {
            return joined.join(", ");
        }
    }
    if let Some(message) = body.get("error").and_then(Value::as_str) {
        return message.to_string();
    }
    raw.to_string()
}
