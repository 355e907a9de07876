//! Access-token claim decoding.
//!
//! The client holds no verification key; tokens are decoded without
//! signature validation purely to recover the identity claims, and the
//! backend remains the authority on whether a token is actually accepted.

use explanner_model::AccessClaims;
use jsonwebtoken::{Algorithm, DecodingKey, Validation, decode};

use super::errors::TokenError;

/// Refresh this many seconds before the access token actually expires, so a
/// request started just before the deadline still carries a live token.
pub const EXPIRY_BUFFER_SECONDS: i64 = 60;

/// Decodes the identity claims from an access token.
///
/// Expired tokens still decode; expiry is a scheduling input here, not a
/// validity check. Tokens without an `exp` claim are rejected as malformed.
pub fn decode_access_claims(access_token: &str) -> Result<AccessClaims, TokenError> {
    let mut validation = Validation::new(Algorithm::HS256);
    validation.insecure_disable_signature_validation();
    validation.validate_exp = false;
    validation.validate_aud = false;

    decode::<AccessClaims>(
        access_token,
        &DecodingKey::from_secret(b"unused"),
        &validation,
    )
    .map(|data| data.claims)
    .map_err(|e| {
        log::warn!("Failed to decode access token: {}", e);
        TokenError::InvalidFormat
    })
}

/// Seconds until the token's expiry claim; negative once past it.
pub fn seconds_until_expiry(claims: &AccessClaims) -> i64 {
    claims.exp - chrono::Utc::now().timestamp()
}

/// Whether the token is expired or close enough that a dependent request
/// could outlive it.
pub fn is_within_expiry_buffer(claims: &AccessClaims) -> bool {
    seconds_until_expiry(claims) <= EXPIRY_BUFFER_SECONDS
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use jsonwebtoken::{EncodingKey, Header, encode};
    use serde::Serialize;

    #[derive(Serialize)]
    struct TestClaims {
        sub: String,
        exp: i64,
        iat: i64,
    }

    pub(crate) fn jwt_with_expiry(sub: &str, seconds_from_now: i64) -> String {
        let now = chrono::Utc::now().timestamp();
        let claims = TestClaims {
            sub: sub.into(),
            exp: now + seconds_from_now,
            iat: now,
        };
        encode(
            &Header::new(Algorithm::HS256),
            &claims,
            &EncodingKey::from_secret(b"secret"),
        )
        .expect("encode jwt")
    }

    #[test]
    fn decodes_claims_without_a_verification_key() {
        let token = jwt_with_expiry("staff01", 300);
        let claims = decode_access_claims(&token).unwrap();
        assert_eq!(claims.sub.as_deref(), Some("staff01"));
        assert!(claims.iat.is_some());
        assert!(!is_within_expiry_buffer(&claims));
    }

    #[test]
    fn expired_tokens_still_decode() {
        let token = jwt_with_expiry("staff01", -120);
        let claims = decode_access_claims(&token).unwrap();
        assert!(seconds_until_expiry(&claims) < 0);
        assert!(is_within_expiry_buffer(&claims));
    }

    #[test]
    fn token_inside_the_buffer_counts_as_expiring() {
        let token = jwt_with_expiry("staff01", 30);
        let claims = decode_access_claims(&token).unwrap();
        assert!(is_within_expiry_buffer(&claims));
    }

    #[test]
    fn garbage_is_rejected_as_malformed() {
        assert!(matches!(
            decode_access_claims("not-a-jwt"),
            Err(TokenError::InvalidFormat)
        ));
        assert!(matches!(
            decode_access_claims("a.b.c"),
            Err(TokenError::InvalidFormat)
        ));
    }
}
