//! Persistence contracts
//!
//! The core never talks to a concrete database. It depends on three narrow
//! capabilities, each implemented by [`TursoClient`](super::turso::TursoClient)
//! (libsql) and [`MemoryStore`](super::memory::MemoryStore) (in-process).
//!
//! # Example
//!
//! ```rust,ignore
//! use chirpy::db::{DatabaseProvider, RefreshTokenLedger};
//!
//! let stores = DatabaseProvider::Memory.create_stores(clock).await?;
//! let issued = stores.ledger.issue(user_id, Duration::days(60)).await?;
//! ```

use crate::auth::refresh::{RefreshToken, RefreshTokenRecord};
use crate::types::{Account, Chirp, Result, SortOrder};
use async_trait::async_trait;
use chrono::Duration;
use uuid::Uuid;

/// Refresh-token persistence.
///
/// Implementations store the token under its digest and must make `revoke`
/// a single read-modify-write so concurrent revocations stay idempotent.
#[async_trait]
pub trait RefreshTokenLedger: Send + Sync {
    /// Generate and store a new token expiring `ttl` from now.
    async fn issue(&self, user_id: Uuid, ttl: Duration) -> Result<RefreshToken>;

    /// Look up a presented token. Unknown tokens are `NotFound`.
    async fn resolve(&self, token: &str) -> Result<RefreshTokenRecord>;

    /// Set `revoked_at` if unset. Unknown tokens are `NotFound`.
    async fn revoke(&self, token: &str) -> Result<()>;
}

/// Account lookup and creation.
#[async_trait]
pub trait AccountStore: Send + Sync {
    /// Create a new account. Duplicate emails are `Conflict`.
    async fn create_account(&self, email: &str, password_hash: &str) -> Result<Account>;

    /// Get an account by email. Unknown emails are `NotFound`.
    async fn lookup_by_email(&self, email: &str) -> Result<Account>;
}

/// Owned resources (chirps).
#[async_trait]
pub trait ChirpStore: Send + Sync {
    /// Create a chirp owned by `user_id`.
    async fn create_chirp(&self, body: &str, user_id: Uuid) -> Result<Chirp>;

    /// Get a chirp by id. Unknown ids are `NotFound`.
    async fn get_chirp(&self, id: Uuid) -> Result<Chirp>;

    /// List chirps by creation time, optionally for a single author.
    async fn list_chirps(&self, author_id: Option<Uuid>, sort: SortOrder) -> Result<Vec<Chirp>>;

    /// Delete a chirp. Unknown ids are `NotFound`.
    async fn delete_chirp(&self, id: Uuid) -> Result<()>;
}
