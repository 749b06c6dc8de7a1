//! Side effects triggered when a payment is confirmed.
//!
//! Order persistence, email delivery and entitlement granting live in
//! external systems; this trait is the seam where they plug in. The
//! default implementation only logs. A hook failure must never prevent
//! the webhook acknowledgement, so callers log errors and move on.

use tracing::info;

use crate::error::CheckoutError;
use crate::models::OrderRecord;

pub trait PaidHooks: Send + Sync {
    fn mark_order_paid(&self, order: &OrderRecord) -> Result<(), CheckoutError>;
    fn send_confirmation_email(&self, email: &str) -> Result<(), CheckoutError>;
    fn grant_access(&self, order: &OrderRecord) -> Result<(), CheckoutError>;
}

/// Logging stand-in for the real collaborators.
pub struct LogHooks;

impl PaidHooks for LogHooks {
    fn mark_order_paid(&self, order: &OrderRecord) -> Result<(), CheckoutError> {
        info!("Marking order as paid: {}", order.external_id);
        Ok(())
    }

    fn send_confirmation_email(&self, email: &str) -> Result<(), CheckoutError> {
        info!("Sending confirmation email to {}", email);
        Ok(())
    }

    fn grant_access(&self, order: &OrderRecord) -> Result<(), CheckoutError> {
        info!("Granting report access for order {}", order.external_id);
        Ok(())
    }
}
