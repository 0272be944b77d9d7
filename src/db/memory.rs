use super::traits::{AccountStore, ChirpStore, RefreshTokenLedger};
use crate::auth::clock::Clock;
use crate::auth::refresh::{
    expiry_after, generate_token, hash_token, RefreshToken, RefreshTokenRecord,
};
use crate::types::{Account, AppError, Chirp, Result, SortOrder};
use async_trait::async_trait;
use chrono::Duration;
use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::Arc;
use uuid::Uuid;

/// In-process store for tests and `:memory:` deployments.
///
/// Every operation takes the relevant lock once, which gives `revoke` the
/// same single read-modify-write guarantee as the SQL adapter.
pub struct MemoryStore {
    clock: Arc<dyn Clock>,
    accounts: RwLock<HashMap<String, Account>>,
    refresh_tokens: RwLock<HashMap<String, RefreshTokenRecord>>,
    chirps: RwLock<Vec<Chirp>>,
}

impl MemoryStore {
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        Self {
            clock,
            accounts: RwLock::new(HashMap::new()),
            refresh_tokens: RwLock::new(HashMap::new()),
            chirps: RwLock::new(Vec::new()),
        }
    }
}

#[async_trait]
impl RefreshTokenLedger for MemoryStore {
    async fn issue(&self, user_id: Uuid, ttl: Duration) -> Result<RefreshToken> {
        let issued_at = self.clock.now();
        let expires_at = expiry_after(issued_at, ttl)?;
        let token = generate_token();

        self.refresh_tokens.write().insert(
            hash_token(&token),
            RefreshTokenRecord {
                user_id,
                issued_at,
                expires_at,
                revoked_at: None,
            },
        );

        Ok(RefreshToken {
            token,
            user_id,
            issued_at,
            expires_at,
        })
    }

    async fn resolve(&self, token: &str) -> Result<RefreshTokenRecord> {
        self.refresh_tokens
            .read()
            .get(&hash_token(token))
            .cloned()
            .ok_or_else(|| AppError::NotFound("Refresh token not found".to_string()))
    }

    async fn revoke(&self, token: &str) -> Result<()> {
        let now = self.clock.now();
        let mut tokens = self.refresh_tokens.write();
        let record = tokens
            .get_mut(&hash_token(token))
            .ok_or_else(|| AppError::NotFound("Refresh token not found".to_string()))?;

        record.revoked_at.get_or_insert(now);
        Ok(())
    }
}

#[async_trait]
impl AccountStore for MemoryStore {
    async fn create_account(&self, email: &str, password_hash: &str) -> Result<Account> {
        let mut accounts = self.accounts.write();
        if accounts.contains_key(email) {
            return Err(AppError::Conflict("User already exists".to_string()));
        }

        let now = self.clock.now();
        let account = Account {
            id: Uuid::new_v4(),
            email: email.to_string(),
            password_hash: password_hash.to_string(),
            created_at: now,
            updated_at: now,
        };
        accounts.insert(email.to_string(), account.clone());

        Ok(account)
    }

    async fn lookup_by_email(&self, email: &str) -> Result<Account> {
        self.accounts
            .read()
            .get(email)
            .cloned()
            .ok_or_else(|| AppError::NotFound("User not found".to_string()))
    }
}

#[async_trait]
impl ChirpStore for MemoryStore {
    async fn create_chirp(&self, body: &str, user_id: Uuid) -> Result<Chirp> {
        let now = self.clock.now();
        let chirp = Chirp {
            id: Uuid::new_v4(),
            created_at: now,
            updated_at: now,
            body: body.to_string(),
            user_id,
        };
        self.chirps.write().push(chirp.clone());

        Ok(chirp)
    }

    async fn get_chirp(&self, id: Uuid) -> Result<Chirp> {
        self.chirps
            .read()
            .iter()
            .find(|c| c.id == id)
            .cloned()
            .ok_or_else(|| AppError::NotFound("Chirp not found".to_string()))
    }

    async fn list_chirps(&self, author_id: Option<Uuid>, sort: SortOrder) -> Result<Vec<Chirp>> {
        let mut chirps: Vec<Chirp> = self
            .chirps
            .read()
            .iter()
            .filter(|c| author_id.is_none_or(|author| c.user_id == author))
            .cloned()
            .collect();

        // Insertion order already breaks ties between equal timestamps.
        chirps.sort_by_key(|c| c.created_at);
        if sort == SortOrder::Desc {
            chirps.reverse();
        }

        Ok(chirps)
    }

    async fn delete_chirp(&self, id: Uuid) -> Result<()> {
        let mut chirps = self.chirps.write();
        let before = chirps.len();
        chirps.retain(|c| c.id != id);

        if chirps.len() == before {
            return Err(AppError::NotFound("Chirp not found".to_string()));
        }
        Ok(())
    }
}
