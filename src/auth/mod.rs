//! Identity plumbing: password hashing, opaque bearer tokens, and the
//! request extractor that resolves `Authorization: Bearer` to a user id.
//!
//! Handlers trust the resolved `Identity` unconditionally — all ownership
//! checks downstream are expressed against `identity.user_id`.

use axum::{extract::FromRequestParts, http::header::AUTHORIZATION, http::request::Parts};
use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine as _};
use chrono::{Duration, Utc};
use hmac::{Hmac, Mac};
use rand_core::{OsRng, RngCore};
use sha2::Sha256;
use std::sync::Arc;

use crate::{error::ApiError, AppContext};

type HmacSha256 = Hmac<Sha256>;

/// Token purposes stored in the `auth_tokens.purpose` column.
pub const PURPOSE_SESSION: &str = "session";
pub const PURPOSE_VERIFY: &str = "verify";
pub const PURPOSE_RESET: &str = "reset";

const SESSION_TTL_DAYS: i64 = 30;
const VERIFY_TTL_HOURS: i64 = 48;
const RESET_TTL_HOURS: i64 = 1;

/// Generate a fresh random salt, hex-encoded.
pub fn generate_salt() -> String {
    let mut bytes = [0u8; 16];
    OsRng.fill_bytes(&mut bytes);
    hex::encode(bytes)
}

/// Salted HMAC-SHA256 password hash, hex-encoded. The salt is the HMAC key.
pub fn hash_password(password: &str, salt_hex: &str) -> String {
    let key = hex::decode(salt_hex).unwrap_or_else(|_| salt_hex.as_bytes().to_vec());
    let mut mac = HmacSha256::new_from_slice(&key).expect("HMAC accepts any key length");
    mac.update(password.as_bytes());
    hex::encode(mac.finalize().into_bytes())
}

/// Constant-time password check against a stored hash.
pub fn verify_password(password: &str, salt_hex: &str, stored_hash_hex: &str) -> bool {
    let key = hex::decode(salt_hex).unwrap_or_else(|_| salt_hex.as_bytes().to_vec());
    let Ok(stored) = hex::decode(stored_hash_hex) else {
        return false;
    };
    let mut mac = HmacSha256::new_from_slice(&key).expect("HMAC accepts any key length");
    mac.update(password.as_bytes());
    mac.verify_slice(&stored).is_ok()
}

/// Opaque bearer token: 32 random bytes, url-safe base64.
pub fn generate_token() -> String {
    let mut bytes = [0u8; 32];
    OsRng.fill_bytes(&mut bytes);
    URL_SAFE_NO_PAD.encode(bytes)
}

/// Expiry timestamp (RFC 3339) for a token of the given purpose.
pub fn expiry_for(purpose: &str) -> String {
    let ttl = match purpose {
        PURPOSE_SESSION => Duration::days(SESSION_TTL_DAYS),
        PURPOSE_VERIFY => Duration::hours(VERIFY_TTL_HOURS),
        _ => Duration::hours(RESET_TTL_HOURS),
    };
    (Utc::now() + ttl).to_rfc3339()
}

// ─── Request extractor ────────────────────────────────────────────────────────

/// Verified caller identity, resolved from the session token.
#[derive(Debug, Clone)]
pub struct Identity {
    pub user_id: String,
}

impl FromRequestParts<Arc<AppContext>> for Identity {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &Arc<AppContext>,
    ) -> Result<Self, Self::Rejection> {
        let header = parts
            .headers
            .get(AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .ok_or(ApiError::Unauthorized)?;
        let token = header.strip_prefix("Bearer ").ok_or(ApiError::Unauthorized)?;

        let row = state
            .storage
            .get_token(token, PURPOSE_SESSION)
            .await
            .map_err(ApiError::Internal)?
            .ok_or(ApiError::Unauthorized)?;

        Ok(Identity {
            user_id: row.user_id,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_roundtrip() {
        let salt = generate_salt();
        let hash = hash_password("s3cret", &salt);
        assert!(verify_password("s3cret", &salt, &hash));
        assert!(!verify_password("wrong", &salt, &hash));
    }

    #[test]
    fn test_salt_changes_hash() {
        let a = hash_password("s3cret", &generate_salt());
        let b = hash_password("s3cret", &generate_salt());
        assert_ne!(a, b);
    }

    #[test]
    fn test_token_entropy() {
        let a = generate_token();
        let b = generate_token();
        assert_ne!(a, b);
        assert!(a.len() >= 40);
    }
}
