use std::net::SocketAddr;

use tracing::{info, warn};

use checkout_service::config::Config;
use checkout_service::router;
use checkout_service::state::AppState;

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt::init();

    let config = Config::from_env();

    if config.gateway_api_key.is_none() {
        warn!("GATEWAY_API_KEY is not set; payment creation will fail until it is");
    }
    if config.webhook_secret.is_none() {
        warn!("WEBHOOK_SECRET is not set; webhook signature verification is disabled");
    }

    let port = config.port;
    let state = AppState::new(config);
    let app = router(state);

    let listener = tokio::net::TcpListener::bind(format!("0.0.0.0:{}", port))
        .await
        .expect("Failed to bind listener");

    info!("Checkout service listening on port {}", port);

    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .await
    .expect("Failed to start HTTP server");
}
