//! Time-limited signed tokens for password reset links.
//!
//! Format: `base64url(claims_json) "." base64url(hmac_sha256(secret, encoded_claims))`,
//! both parts unpadded. The claims carry the user id and a unix expiry.

use base64::{Engine as _, engine::general_purpose::URL_SAFE_NO_PAD};
use chrono::{DateTime, Utc};
use hmac::{Hmac, Mac};
use serde::{Deserialize, Serialize};
use sha2::Sha256;
use thiserror::Error;

use super::UserId;

type HmacSha256 = Hmac<Sha256>;

/// Reasons a token fails verification. Kept distinct so callers can tell an
/// expired link from a forged or truncated one.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TokenError {
    #[error("Token is malformed")]
    Malformed,

    #[error("Token signature does not match")]
    BadSignature,

    #[error("Token has expired")]
    Expired,
}

#[derive(Debug, Serialize, Deserialize)]
struct ResetClaims {
    reset_password: i32,
    exp: i64,
}

#[derive(Clone)]
pub struct TokenSigner {
    secret: Vec<u8>,
    ttl_seconds: i64,
}

impl std::fmt::Debug for TokenSigner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenSigner")
            .field("ttl_seconds", &self.ttl_seconds)
            .finish_non_exhaustive()
    }
}

impl TokenSigner {
    #[must_use]
    pub fn new(secret: impl Into<Vec<u8>>, ttl_seconds: u64) -> Self {
        Self {
            secret: secret.into(),
            ttl_seconds: i64::try_from(ttl_seconds).unwrap_or(i64::MAX),
        }
    }

    #[must_use]
    pub fn issue_reset(&self, user: UserId) -> String {
        self.issue_reset_at(user, Utc::now())
    }

    #[must_use]
    pub fn issue_reset_at(&self, user: UserId, now: DateTime<Utc>) -> String {
        let claims = ResetClaims {
            reset_password: user.value(),
            exp: now.timestamp().saturating_add(self.ttl_seconds),
        };

        // A two-field struct of integers always serializes.
        let json = serde_json::to_vec(&claims).unwrap_or_default();
        let payload = URL_SAFE_NO_PAD.encode(json);
        let signature = URL_SAFE_NO_PAD.encode(self.sign(payload.as_bytes()));

        format!("{payload}.{signature}")
    }

    /// Returns the user id a reset token was issued for.
    ///
    /// # Errors
    ///
    /// [`TokenError::Malformed`] if the token cannot be decoded,
    /// [`TokenError::BadSignature`] if it was not signed with this secret,
    /// [`TokenError::Expired`] if its expiry is in the past.
    pub fn verify_reset(&self, token: &str) -> Result<UserId, TokenError> {
        self.verify_reset_at(token, Utc::now())
    }

    pub fn verify_reset_at(&self, token: &str, now: DateTime<Utc>) -> Result<UserId, TokenError> {
        let (payload, signature) = token.trim().split_once('.').ok_or(TokenError::Malformed)?;

        let signature = URL_SAFE_NO_PAD
            .decode(signature)
            .map_err(|_| TokenError::Malformed)?;

        let mut mac = self.mac();
        mac.update(payload.as_bytes());
        mac.verify_slice(&signature)
            .map_err(|_| TokenError::BadSignature)?;

        let json = URL_SAFE_NO_PAD
            .decode(payload)
            .map_err(|_| TokenError::Malformed)?;
        let claims: ResetClaims =
            serde_json::from_slice(&json).map_err(|_| TokenError::Malformed)?;

        if claims.exp <= now.timestamp() {
            return Err(TokenError::Expired);
        }

        Ok(UserId::new(claims.reset_password))
    }

    fn mac(&self) -> HmacSha256 {
        // HMAC accepts keys of any length.
        <HmacSha256 as Mac>::new_from_slice(&self.secret)
            .unwrap_or_else(|_| unreachable!("HMAC keys have no length limit"))
    }

    fn sign(&self, data: &[u8]) -> Vec<u8> {
        let mut mac = self.mac();
        mac.update(data);
        mac.finalize().into_bytes().to_vec()
    }
}
