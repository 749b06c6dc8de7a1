//! Environment-driven configuration, read once at startup.

#[derive(Clone, Debug)]
pub struct Config {
    pub port: u16,
    /// Base URL of the payment gateway's API.
    pub gateway_url: String,
    /// Gateway credential. Optional at startup; the create-payment path
    /// answers with a configuration error while it is unset.
    pub gateway_api_key: Option<String>,
    /// Callback address advertised to the gateway on every transaction.
    pub webhook_url: String,
    /// Shared secret for webhook signature verification. When unset the
    /// webhook endpoint accepts unsigned notifications (local development).
    pub webhook_secret: Option<String>,
}

impl Config {
    pub fn from_env() -> Self {
        let port = std::env::var("PORT")
            .ok()
            .and_then(|p| p.parse().ok())
            .unwrap_or(3001);

        let gateway_url = std::env::var("GATEWAY_URL")
            .unwrap_or_else(|_| "https://api.lirapaybr.com".to_string());

        let webhook_url = std::env::var("WEBHOOK_URL")
            .unwrap_or_else(|_| format!("http://localhost:{}/api/webhook", port));

        Self {
            port,
            gateway_url,
            gateway_api_key: std::env::var("GATEWAY_API_KEY").ok(),
            webhook_url,
            webhook_secret: std::env::var("WEBHOOK_SECRET").ok(),
        }
    }
}
