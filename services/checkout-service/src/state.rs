//! Shared application state.
//!
//! Both maps are process-lifetime only and lost on restart; they stand in
//! for durable storage until an order database exists. Webhook deliveries
//! and status polls hit them concurrently, so access goes through RwLocks.

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::RwLock;

use crate::config::Config;
use crate::gateway::GatewayClient;
use crate::hooks::{LogHooks, PaidHooks};
use crate::models::OrderRecord;

/// Status reported for transactions the gateway has not called back about.
pub const DEFAULT_STATUS: &str = "PENDING";

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub gateway: Arc<GatewayClient>,
    pub hooks: Arc<dyn PaidHooks>,
    statuses: Arc<RwLock<HashMap<String, String>>>,
    orders: Arc<RwLock<HashMap<String, OrderRecord>>>,
}

impl AppState {
    pub fn new(config: Config) -> Self {
        let gateway = GatewayClient::new(
            config.gateway_url.clone(),
            config.gateway_api_key.clone(),
        );
        Self::with_hooks(config, gateway, Arc::new(LogHooks))
    }

    pub fn with_hooks(config: Config, gateway: GatewayClient, hooks: Arc<dyn PaidHooks>) -> Self {
        Self {
            config: Arc::new(config),
            gateway: Arc::new(gateway),
            hooks,
            statuses: Arc::new(RwLock::new(HashMap::new())),
            orders: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    /// Record a gateway status. Unconditional overwrite, last write wins.
    pub fn set_status(&self, transaction_id: &str, status: &str) {
        self.statuses
            .write()
            .insert(transaction_id.to_string(), status.to_string());
    }

    /// Current status for a transaction, `PENDING` when nothing was recorded.
    pub fn status(&self, transaction_id: &str) -> String {
        self.statuses
            .read()
            .get(transaction_id)
            .cloned()
            .unwrap_or_else(|| DEFAULT_STATUS.to_string())
    }

    pub fn register_order(&self, order: OrderRecord) {
        self.orders
            .write()
            .insert(order.external_id.clone(), order);
    }

    pub fn order(&self, external_id: &str) -> Option<OrderRecord> {
        self.orders.read().get(external_id).cloned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use rust_decimal_macros::dec;

    fn test_state() -> AppState {
        AppState::new(Config {
            port: 0,
            gateway_url: "http://localhost:9".to_string(),
            gateway_api_key: Some("k".to_string()),
            webhook_url: "http://localhost:9/api/webhook".to_string(),
            webhook_secret: None,
        })
    }

    #[test]
    fn unknown_transaction_defaults_to_pending() {
        let state = test_state();
        assert_eq!(state.status("never-seen"), "PENDING");
    }

    #[test]
    fn last_status_write_wins() {
        let state = test_state();
        state.set_status("tx-1", "PENDING");
        state.set_status("tx-1", "PAID");
        state.set_status("tx-1", "EXPIRED");
        assert_eq!(state.status("tx-1"), "EXPIRED");
    }

    #[test]
    fn orders_are_found_after_registration() {
        let state = test_state();
        assert!(state.order("tx-1").is_none());
        state.register_order(OrderRecord {
            external_id: "tx-1".to_string(),
            total_amount: dec!(47.00),
            customer_email: "ana@x.com".to_string(),
            created_at: Utc::now(),
        });
        let order = state.order("tx-1").unwrap();
        assert_eq!(order.customer_email, "ana@x.com");
    }
}
