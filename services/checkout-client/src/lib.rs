//! Funnel-side payment flow: submit the checkout form, then poll the
//! status endpoint on a fixed interval until the payment is confirmed.
//!
//! The poll loop is an explicit task bound to a handle; cancelling or
//! dropping the handle stops it, and an in-flight poll that races with
//! cancellation is discarded rather than acted on.

use std::time::Duration;

use serde::Serialize;
use serde_json::Value;
use thiserror::Error;
use tokio::sync::oneshot;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::{info, warn};

/// Default spacing between status polls.
pub const POLL_INTERVAL: Duration = Duration::from_secs(5);

#[derive(Debug, Error)]
pub enum FlowError {
    /// The server rejected the checkout; the message is shown inline.
    #[error("checkout rejected: {0}")]
    Rejected(String),

    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("malformed server response: {0}")]
    Malformed(&'static str),
}

#[derive(Clone, Debug, Serialize)]
pub struct CustomerForm {
    pub name: String,
    pub email: String,
    pub document: String,
}

/// Result of a successful checkout submission: everything the payment
/// screen needs to render the PIX code and start polling.
#[derive(Clone, Debug)]
pub struct CheckoutSession {
    pub transaction_id: String,
    pub pix_code: String,
}

/// Submit the checkout form to the payment-creation endpoint.
pub async fn submit_checkout(
    client: &reqwest::Client,
    base_url: &str,
    selected_bumps: &[String],
    customer: &CustomerForm,
) -> Result<CheckoutSession, FlowError> {
    let body = serde_json::json!({
        "selectedBumps": selected_bumps,
        "customer": customer,
    });

    let response = client
        .post(format!("{base_url}/api/create-payment"))
        .json(&body)
        .timeout(Duration::from_secs(10))
        .send()
        .await?;

    let status = response.status();
    let value: Value = response.json().await?;

    let has_error = value
        .get("hasError")
        .and_then(Value::as_bool)
        .unwrap_or(false);
    if !status.is_success() || has_error {
        let message = value
            .get("error")
            .and_then(Value::as_str)
            .unwrap_or("payment could not be created")
            .to_string();
        return Err(FlowError::Rejected(message));
    }

    let transaction_id = value
        .get("external_id")
        .and_then(Value::as_str)
        .ok_or(FlowError::Malformed("missing external_id"))?
        .to_string();
    let pix_code = value
        .pointer("/pix/payload")
        .and_then(Value::as_str)
        .ok_or(FlowError::Malformed("missing pix payload"))?
        .to_string();

    info!("Checkout accepted, transaction {}", transaction_id);

    Ok(CheckoutSession {
        transaction_id,
        pix_code,
    })
}

#[derive(Debug, PartialEq, Eq)]
pub enum PollOutcome {
    /// The status endpoint reported `PAID`.
    Confirmed,
    Cancelled,
}

/// Handle to a running poll loop. Dropping it cancels the loop.
pub struct StatusPoller {
    task: JoinHandle<PollOutcome>,
    shutdown: oneshot::Sender<()>,
}

impl StatusPoller {
    /// Start polling the status endpoint for a transaction.
    ///
    /// The first poll fires immediately, then every `interval`. A failed
    /// poll is logged and retried on the next tick; ticks never overlap,
    /// even when a request outlives the interval.
    pub fn spawn(
        client: reqwest::Client,
        base_url: String,
        transaction_id: String,
        interval: Duration,
    ) -> Self {
        let (shutdown, mut cancelled) = oneshot::channel::<()>();

        let task = tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

            loop {
                tokio::select! {
                    _ = &mut cancelled => return PollOutcome::Cancelled,
                    _ = ticker.tick() => {
                        // The in-flight request races the shutdown channel
                        // too: a response arriving after cancellation is
                        // dropped, never acted on.
                        tokio::select! {
                            _ = &mut cancelled => return PollOutcome::Cancelled,
                            result = poll_once(&client, &base_url, &transaction_id) => match result {
                                Ok(status) if status == "PAID" => {
                                    info!("Payment confirmed for {}", transaction_id);
                                    return PollOutcome::Confirmed;
                                }
                                Ok(status) => {
                                    info!("Payment for {} still {}", transaction_id, status);
                                }
                                Err(err) => {
                                    warn!("Status poll failed, retrying next tick: {}", err);
                                }
                            }
                        }
                    }
                }
            }
        });

        Self { task, shutdown }
    }

    /// Wait for the loop to finish.
    pub async fn wait(self) -> PollOutcome {
        self.task.await.unwrap_or(PollOutcome::Cancelled)
    }

    /// Stop the loop. Any poll still in flight is discarded.
    pub async fn cancel(self) -> PollOutcome {
        let _ = self.shutdown.send(());
        self.task.await.unwrap_or(PollOutcome::Cancelled)
    }
}

async fn poll_once(
    client: &reqwest::Client,
    base_url: &str,
    transaction_id: &str,
) -> Result<String, FlowError> {
    let value: Value = client
        .get(format!("{base_url}/api/payment-status"))
        .query(&[("transactionId", transaction_id)])
        .timeout(Duration::from_secs(10))
        .send()
        .await?
        .json()
        .await?;

    value
        .get("status")
        .and_then(Value::as_str)
        .map(str::to_string)
        .ok_or(FlowError::Malformed("missing status"))
}
