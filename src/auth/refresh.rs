//! Refresh-token values and their lifecycle state.
//!
//! A refresh token is 32 bytes from the thread-local CSPRNG rendered as 64
//! lowercase hex characters. Ledgers persist only its SHA-256 digest.

use crate::types::{AppError, Result};
use chrono::{DateTime, Duration, Utc};
use rand::RngCore;
use sha2::{Digest, Sha256};
use uuid::Uuid;

/// Bytes of randomness per token.
pub const TOKEN_BYTES: usize = 32;

/// A freshly issued refresh token. `token` is the only copy of the secret.
#[derive(Debug, Clone)]
pub struct RefreshToken {
    pub token: String,
    pub user_id: Uuid,
    pub issued_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
}

/// What a ledger knows about a presented refresh token.
#[derive(Debug, Clone, PartialEq)]
pub struct RefreshTokenRecord {
    pub user_id: Uuid,
    pub issued_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
    pub revoked_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RefreshTokenState {
    Active,
    Expired,
    Revoked,
}

impl RefreshTokenRecord {
    /// Revocation wins over expiry; both are terminal.
    pub fn state_at(&self, now: DateTime<Utc>) -> RefreshTokenState {
        if self.revoked_at.is_some() {
            RefreshTokenState::Revoked
        } else if self.expires_at <= now {
            RefreshTokenState::Expired
        } else {
            RefreshTokenState::Active
        }
    }

    pub fn is_active_at(&self, now: DateTime<Utc>) -> bool {
        self.state_at(now) == RefreshTokenState::Active
    }
}

/// Generates a new random refresh-token string.
pub fn generate_token() -> String {
    let mut bytes = [0u8; TOKEN_BYTES];
    rand::rng().fill_bytes(&mut bytes);
    hex::encode(bytes)
}

/// `issued_at + ttl`, or `Internal` if that is not a representable time.
pub fn expiry_after(issued_at: DateTime<Utc>, ttl: Duration) -> Result<DateTime<Utc>> {
    issued_at
        .checked_add_signed(ttl)
        .ok_or_else(|| AppError::Internal(format!("Refresh token lifetime out of range: {}", ttl)))
}

/// Hashes a token using SHA256 for storage.
pub fn hash_token(token: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(token.as_bytes());
    hex::encode(hasher.finalize())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(expires_in: Duration, revoked: bool) -> (RefreshTokenRecord, DateTime<Utc>) {
        let now = Utc::now();
        (
            RefreshTokenRecord {
                user_id: Uuid::new_v4(),
                issued_at: now,
                expires_at: now + expires_in,
                revoked_at: revoked.then_some(now),
            },
            now,
        )
    }

    #[test]
    fn test_generated_token_shape() {
        let token = generate_token();

        assert_eq!(token.len(), 64);
        assert!(token
            .chars()
            .all(|c| c.is_ascii_digit() || ('a'..='f').contains(&c)));
    }

    #[test]
    fn test_generated_tokens_differ() {
        assert_ne!(generate_token(), generate_token());
    }

    #[test]
    fn test_hash_token() {
        let hash1 = hash_token("some-refresh-token");
        let hash2 = hash_token("some-refresh-token");

        assert_eq!(hash1, hash2, "same token should hash to same value");
        assert_eq!(hash1.len(), 64);
        assert_ne!(hash1, hash_token("other-refresh-token"));
    }

    #[test]
    fn test_state_active() {
        let (rec, now) = record(Duration::minutes(1), false);
        assert_eq!(rec.state_at(now), RefreshTokenState::Active);
        assert!(rec.is_active_at(now));
    }

    #[test]
    fn test_state_expired_at_boundary() {
        let (rec, now) = record(Duration::seconds(1), false);
        assert!(rec.is_active_at(now));
        assert_eq!(
            rec.state_at(now + Duration::seconds(1)),
            RefreshTokenState::Expired
        );
    }

    #[test]
    fn test_state_revoked_wins() {
        let (rec, now) = record(Duration::minutes(-1), true);
        assert_eq!(rec.state_at(now), RefreshTokenState::Revoked);
    }

    #[test]
    fn test_expiry_after() {
        let now = Utc::now();
        assert_eq!(
            expiry_after(now, Duration::days(60)).unwrap(),
            now + Duration::days(60)
        );
        assert!(matches!(
            expiry_after(now, Duration::MAX),
            Err(AppError::Internal(_))
        ));
    }
}
