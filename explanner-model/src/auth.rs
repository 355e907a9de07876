//! Authentication wire types.

use serde::{Deserialize, Serialize};

/// The access/refresh token pair issued by `token/` and rotated by
/// `token/refresh/`.
///
/// The two tokens are issued together and replaced together; a pair is never
/// split. The serialized form is exactly the backend's response body, which
/// also makes it the persisted-record format on disk.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CredentialPair {
    /// Short-lived signed token proving identity on each API call.
    pub access: String,
    /// Longer-lived token exchanged for a fresh pair without a password.
    pub refresh: String,
}

/// Claims decoded from the access token.
///
/// The backend issues simplejwt-style tokens; every field is optional on the
/// wire except `exp`, which the client relies on to schedule proactive
/// refresh. Decoding happens without signature verification -- the client
/// has no verification key and trusts the transport.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccessClaims {
    /// Subject identifier (the staff username).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sub: Option<String>,
    /// Expiry as a Unix timestamp.
    pub exp: i64,
    /// Issued-at as a Unix timestamp.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub iat: Option<i64>,
    /// Numeric user id, when the backend includes one.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_id: Option<i64>,
}

/// Body for `POST token/`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginRequest {
    /// Username, lowercased by the caller before submission.
    pub username: String,
    /// Plain text password (verified against a hash server-side).
    pub password: String,
}

/// Body for `POST token/refresh/`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RefreshRequest {
    pub refresh: String,
}

/// Error body the backend attaches to non-200 token responses.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ErrorBody {
    /// Human-readable rejection reason, e.g. "No active account found".
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
}
