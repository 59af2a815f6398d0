//! Webhook signature verification.
//!
//! LINE signs every webhook delivery with
//! base64(HMAC-SHA256(channel_secret, raw_body)) in the
//! `x-line-signature` header. Verification must run over the raw
//! request bytes, before any JSON parsing.

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use hmac::{Hmac, Mac};
use sha2::Sha256;

type HmacSha256 = Hmac<Sha256>;

/// Check a webhook signature against the raw body.
///
/// Comparison happens inside `verify_slice`, which is constant-time.
/// Any malformed input (undecodable base64, wrong length) is simply an
/// invalid signature.
pub fn verify_signature(channel_secret: &str, body: &[u8], signature: &str) -> bool {
    let Ok(mut mac) = HmacSha256::new_from_slice(channel_secret.as_bytes()) else {
        return false;
    };
    mac.update(body);
    let Ok(claimed) = STANDARD.decode(signature) else {
        return false;
    };
    mac.verify_slice(&claimed).is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    // RFC 4231 test case 2, digest re-encoded as base64.
    const SECRET: &str = "Jefe";
    const BODY: &[u8] = b"what do ya want for nothing?";
    const SIGNATURE: &str = "W9zBRr9gdU5qBCQmCJV1x1oAPwidJzmDnexYuWTsOEM=";

    #[test]
    fn accepts_a_valid_signature() {
        assert!(verify_signature(SECRET, BODY, SIGNATURE));
    }

    #[test]
    fn rejects_a_tampered_body() {
        assert!(!verify_signature(SECRET, b"what do ya want for free?", SIGNATURE));
    }

    #[test]
    fn rejects_the_wrong_secret() {
        assert!(!verify_signature("NotJefe", BODY, SIGNATURE));
    }

    #[test]
    fn rejects_garbage_signatures() {
        assert!(!verify_signature(SECRET, BODY, "not base64 !!!"));
        assert!(!verify_signature(SECRET, BODY, ""));
        // Valid base64, wrong length.
        assert!(!verify_signature(SECRET, BODY, "AAAA"));
    }
}
