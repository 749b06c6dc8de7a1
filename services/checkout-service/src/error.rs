//! Error taxonomy for the HTTP surface.
//!
//! Every failure a handler can produce is one of these variants, and each
//! maps to a status code and a structured JSON body. Nothing on a request
//! path panics.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CheckoutError {
    /// Bad or missing client input. User-correctable.
    #[error("{0}")]
    Validation(String),

    /// Missing server secret or similar operator mistake.
    #[error("server configuration incomplete: {0}")]
    Configuration(String),

    /// The gateway rejected or failed the transaction. The upstream status
    /// code is relayed to the caller together with the gateway's detail.
    #[error("payment gateway rejected the transaction: {details}")]
    Gateway { status: u16, details: String },

    /// Unknown order on the status poll.
    #[error("{0} not found")]
    NotFound(String),

    /// Webhook signature missing or invalid while a secret is configured.
    #[error("invalid webhook signature")]
    Unauthorized,

    /// Transport failures and anything else unforeseen.
    #[error("unexpected error: {0}")]
    Unexpected(String),
}

impl CheckoutError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::Validation(_) => StatusCode::BAD_REQUEST,
            Self::Configuration(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::Gateway { status, .. } => {
                StatusCode::from_u16(*status).unwrap_or(StatusCode::BAD_GATEWAY)
            }
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Unauthorized => StatusCode::UNAUTHORIZED,
            Self::Unexpected(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for CheckoutError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let body = match &self {
            Self::Gateway { details, .. } => json!({
                "error": "Failed to create the transaction at the payment gateway",
                "details": details,
            }),
            Self::Unexpected(details) => json!({
                "error": "An unexpected server error occurred",
                "details": details,
            }),
            other => json!({ "error": other.to_string() }),
        };
        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_codes_match_taxonomy() {
        assert_eq!(
            CheckoutError::Validation("bad".into()).status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            CheckoutError::Configuration("no key".into()).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(
            CheckoutError::NotFound("order x".into()).status_code(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            CheckoutError::Unauthorized.status_code(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            CheckoutError::Unexpected("boom".into()).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn gateway_errors_relay_the_upstream_status() {
        let err = CheckoutError::Gateway {
            status: 422,
            details: "customer.document".into(),
        };
        assert_eq!(err.status_code(), StatusCode::UNPROCESSABLE_ENTITY);

        // An unmappable status falls back to 502 rather than panicking.
        let err = CheckoutError::Gateway {
            status: 42,
            details: String::new(),
        };
        assert_eq!(err.status_code(), StatusCode::BAD_GATEWAY);
    }
}
