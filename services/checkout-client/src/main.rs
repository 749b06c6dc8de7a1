use tracing::info;

use checkout_client::{submit_checkout, CustomerForm, PollOutcome, StatusPoller, POLL_INTERVAL};

// Drives the whole funnel against a running checkout service: submit the
// form, print the PIX code, poll until the payment is confirmed, then
// report the confirmation redirect.

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt::init();

    let base_url =
        std::env::var("CHECKOUT_URL").unwrap_or_else(|_| "http://localhost:3001".to_string());

    let customer = CustomerForm {
        name: std::env::var("CUSTOMER_NAME").unwrap_or_else(|_| "Ana Silva".to_string()),
        email: std::env::var("CUSTOMER_EMAIL").unwrap_or_else(|_| "ana@x.com".to_string()),
        document: std::env::var("CUSTOMER_DOCUMENT")
            .unwrap_or_else(|_| "123.456.789-00".to_string()),
    };
    let selected_bumps: Vec<String> = std::env::var("SELECTED_BUMPS")
        .map(|raw| raw.split(',').map(str::to_string).collect())
        .unwrap_or_default();

    let client = reqwest::Client::new();

    let session = match submit_checkout(&client, &base_url, &selected_bumps, &customer).await {
        Ok(session) => session,
        Err(err) => {
            // The funnel surfaces this inline on the form.
            eprintln!("Payment could not be started: {err}");
            std::process::exit(1);
        }
    };

    println!("PIX copy-and-paste code:\n{}", session.pix_code);
    info!("Awaiting payment for {}", session.transaction_id);

    let poller = StatusPoller::spawn(
        client,
        base_url.clone(),
        session.transaction_id.clone(),
        POLL_INTERVAL,
    );

    match poller.wait().await {
        PollOutcome::Confirmed => {
            println!("Payment confirmed. Redirecting to {base_url}/obrigado");
        }
        PollOutcome::Cancelled => {
            eprintln!("Polling stopped before the payment was confirmed");
        }
    }
}
