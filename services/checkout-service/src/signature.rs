//! HMAC-SHA256 webhook signatures.
//!
//! The gateway signs the raw notification body with a shared secret and
//! sends the hex digest in the `x-signature` header. Verification happens
//! before the body is parsed or any state is touched.

use hmac::{Hmac, Mac};
use sha2::Sha256;

type HmacSha256 = Hmac<Sha256>;

/// Header carrying the hex-encoded signature.
pub const SIGNATURE_HEADER: &str = "x-signature";

pub fn sign(secret: &str, body: &[u8]) -> String {
    let mut mac =
        HmacSha256::new_from_slice(secret.as_bytes()).expect("HMAC can take key of any size");
    mac.update(body);
    hex::encode(mac.finalize().into_bytes())
}

/// Constant-time check of a hex signature against the body.
pub fn verify(secret: &str, body: &[u8], signature_hex: &str) -> bool {
    let Ok(expected) = hex::decode(signature_hex) else {
        return false;
    };
    let mut mac =
        HmacSha256::new_from_slice(secret.as_bytes()).expect("HMAC can take key of any size");
    mac.update(body);
    mac.verify_slice(&expected).is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn valid_signature_verifies() {
        let body = br#"{"external_id":"abc","status":"PAID"}"#;
        let sig = sign("topsecret", body);
        assert!(verify("topsecret", body, &sig));
    }

    #[test]
    fn tampered_body_is_rejected() {
        let sig = sign("topsecret", b"original");
        assert!(!verify("topsecret", b"tampered", &sig));
    }

    #[test]
    fn wrong_secret_is_rejected() {
        let body = b"payload";
        let sig = sign("topsecret", body);
        assert!(!verify("othersecret", body, &sig));
    }

    #[test]
    fn garbage_signature_is_rejected() {
        assert!(!verify("topsecret", b"payload", "not-hex-at-all"));
        assert!(!verify("topsecret", b"payload", ""));
    }
}
