//! Expiry inspection for SDK-issued bearer tokens.
//!
//! OAuth logins store a JWT-shaped token issued by the identity SDK. These
//! helpers read the `exp` claim without verifying the token; verification
//! belongs to the remote service.

use base64::Engine;

use crate::utils::time::now_secs;

/// Expiration time (seconds since UNIX epoch) of a JWT-shaped token.
pub fn expiration(token: &str) -> Option<u64> {
    let parts: Vec<&str> = token.split('.').collect();
    if parts.len() != 3 {
        return None;
    }

    let payload = decode_segment(parts[1])?;
    let payload_str = String::from_utf8(payload).ok()?;
    let payload: serde_json::Value = serde_json::from_str(&payload_str).ok()?;
    payload.get("exp")?.as_u64()
}

/// Whether a JWT-shaped token has expired. Tokens without a readable `exp`
/// claim count as expired.
pub fn is_expired(token: &str) -> bool {
    match expiration(token) {
        Some(exp) => now_secs() >= exp,
        None => true,
    }
}

fn decode_segment(segment: &str) -> Option<Vec<u8>> {
    // Standard alphabet with restored padding first, then the base64url
    // alphabet most issuers actually use.
    let padded = match segment.len() % 4 {
        2 => format!("{}==", segment),
        3 => format!("{}=", segment),
        _ => segment.to_string(),
    };
    base64::engine::general_purpose::STANDARD
        .decode(&padded)
        .ok()
        .or_else(|| {
            base64::engine::general_purpose::URL_SAFE_NO_PAD
                .decode(segment)
                .ok()
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    // {"sub":"test","iat":1623976400,"exp":9999999999}
    const FUTURE_TOKEN: &str = "eyJ0eXAiOiJKV1QiLCJhbGciOiJIUzI1NiJ9.eyJzdWIiOiJ0ZXN0IiwiaWF0IjoxNjIzOTc2NDAwLCJleHAiOjk5OTk5OTk5OTl9.test";
    // {"sub":"test","iat":1623976400,"exp":1623976400}
    const EXPIRED_TOKEN: &str = "eyJ0eXAiOiJKV1QiLCJhbGciOiJIUzI1NiJ9.eyJzdWIiOiJ0ZXN0IiwiaWF0IjoxNjIzOTc2NDAwLCJleHAiOjE2MjM5NzY0MDB9.test";

    #[test]
    fn test_expiration_parsing() {
        assert_eq!(expiration(FUTURE_TOKEN), Some(9999999999));
        assert_eq!(expiration(EXPIRED_TOKEN), Some(1623976400));
    }

    #[test]
    fn test_expiry_check() {
        assert!(!is_expired(FUTURE_TOKEN));
        assert!(is_expired(EXPIRED_TOKEN));
    }

    #[test]
    fn test_opaque_tokens_count_as_expired() {
        assert!(is_expired("0xdeadbeef"));
        assert!(is_expired("one.two"));
        assert!(expiration("not-a-jwt").is_none());
    }
}
