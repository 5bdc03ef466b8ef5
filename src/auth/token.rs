//! Client-side bearer credential inspection.
//!
//! These helpers only look inside the credential to decide whether it is
//! worth sending: no signature verification happens here and nothing in
//! this module is a trust decision. The server remains the sole authority
//! on whether a credential is actually accepted.

use base64::Engine;
use base64::engine::general_purpose::{STANDARD_NO_PAD, URL_SAFE_NO_PAD};
use chrono::Utc;
use serde::Deserialize;
use tracing::debug;

#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct Claims {
    #[serde(default)]
    pub sub: Option<String>,
    /// Expiry as a unix timestamp in seconds.
    #[serde(default)]
    pub exp: Option<i64>,
    #[serde(default)]
    pub premium: Option<bool>,
}

/// Decodes the claims segment of a bearer credential.
///
/// Returns `None` on any malformed input: wrong segment count, invalid
/// base64, or a payload that is not a JSON object. Never panics.
pub fn decode(token: &str) -> Option<Claims> {
    let mut segments = token.split('.');
    let (Some(_header), Some(payload), Some(_signature), None) = (
        segments.next(),
        segments.next(),
        segments.next(),
        segments.next(),
    ) else {
        debug!("Credential does not have three segments");
        return None;
    };

    let bytes = decode_segment(payload)?;
    match serde_json::from_slice(&bytes) {
        Ok(claims) => Some(claims),
        Err(e) => {
            debug!("Credential payload is not valid claims JSON: {e}");
            None
        }
    }
}

/// Advisory validity check: false when the credential cannot be decoded or
/// declares an expiry in the past, true otherwise (including credentials
/// without an `exp` claim).
pub fn is_valid(token: &str) -> bool {
    match decode(token) {
        Some(claims) => match claims.exp {
            Some(exp) => exp > Utc::now().timestamp(),
            None => true,
        },
        None => false,
    }
}

// Tokens are base64url without padding, but some issuers pad and a few use
// the standard alphabet. Strip padding first, then try both alphabets.
fn decode_segment(segment: &str) -> Option<Vec<u8>> {
    let trimmed = segment.trim_end_matches('=');
    URL_SAFE_NO_PAD
        .decode(trimmed)
        .or_else(|_| STANDARD_NO_PAD.decode(trimmed))
        .ok()
}

#[cfg(test)]
pub(crate) fn encode_test_token(claims: &serde_json::Value) -> String {
    let header = URL_SAFE_NO_PAD.encode(br#"{"alg":"HS256","typ":"JWT"}"#);
    let payload = URL_SAFE_NO_PAD.encode(claims.to_string().as_bytes());
    format!("{header}.{payload}.signature")
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_decode_well_formed_token() {
        let token = encode_test_token(&json!({
            "sub": "user-1",
            "exp": 4102444800i64,
            "premium": true
        }));

        let claims = decode(&token).expect("should decode");
        assert_eq!(claims.sub.as_deref(), Some("user-1"));
        assert_eq!(claims.exp, Some(4102444800));
        assert_eq!(claims.premium, Some(true));
    }

    #[test]
    fn test_decode_wrong_segment_count() {
        assert!(decode("onlyonesegment").is_none());
        assert!(decode("two.segments").is_none());
        assert!(decode("a.b.c.d").is_none());
        assert!(decode("").is_none());
    }

    #[test]
    fn test_decode_invalid_base64() {
        assert!(decode("head.!!!not-base64!!!.sig").is_none());
    }

    #[test]
    fn test_decode_payload_not_claims() {
        let payload = URL_SAFE_NO_PAD.encode(b"[1, 2, 3]");
        assert!(decode(&format!("h.{payload}.s")).is_none());

        let payload = URL_SAFE_NO_PAD.encode(b"plain text");
        assert!(decode(&format!("h.{payload}.s")).is_none());
    }

    #[test]
    fn test_decode_tolerates_padded_payload() {
        use base64::engine::general_purpose::URL_SAFE;
        let payload = URL_SAFE.encode(json!({"sub": "x"}).to_string().as_bytes());
        let claims = decode(&format!("h.{payload}.s")).expect("padded payload should decode");
        assert_eq!(claims.sub.as_deref(), Some("x"));
    }

    #[test]
    fn test_is_valid_expiry_boundaries() {
        let past = Utc::now().timestamp() - 1;
        let future = Utc::now().timestamp() + 1;

        let expired = encode_test_token(&json!({"exp": past}));
        assert!(!is_valid(&expired));

        let fresh = encode_test_token(&json!({"exp": future}));
        assert!(is_valid(&fresh));
    }

    #[test]
    fn test_is_valid_without_exp_claim() {
        let token = encode_test_token(&json!({"sub": "user-1"}));
        assert!(is_valid(&token));
    }

    #[test]
    fn test_is_valid_malformed_is_false() {
        assert!(!is_valid("not-a-token"));
        assert!(!is_valid("a.%%%.c"));
    }
}
