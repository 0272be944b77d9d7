//! Persistence adapters.
//!
//! This module provides the storage contracts the core depends on and two
//! interchangeable implementations:
//! - **Turso/SQLite** ([`TursoClient`]): libsql, local file or remote Turso
//! - **Memory** ([`MemoryStore`]): process-local maps, used by tests and `:memory:`

pub mod memory;
pub mod traits;
pub mod turso;

pub use memory::MemoryStore;
pub use traits::{AccountStore, ChirpStore, RefreshTokenLedger};
pub use turso::TursoClient;

use crate::auth::clock::Clock;
use crate::types::Result;
use std::sync::Arc;

/// Database provider configuration
#[derive(Debug, Clone, Default, PartialEq)]
pub enum DatabaseProvider {
    /// In-process store (ephemeral, lost on restart)
    #[default]
    Memory,
    /// File-based SQLite database
    SQLite {
        /// Path to the SQLite database file
        path: String,
    },
    /// Remote Turso database
    Turso {
        /// The Turso database URL (e.g., `libsql://your-db.turso.io`)
        url: String,
        /// Authentication token for the Turso database
        auth_token: String,
    },
}

/// The three storage capabilities, usually backed by one adapter.
#[derive(Clone)]
pub struct Stores {
    pub ledger: Arc<dyn RefreshTokenLedger>,
    pub accounts: Arc<dyn AccountStore>,
    pub chirps: Arc<dyn ChirpStore>,
}

impl Stores {
    pub fn from_adapter<T>(adapter: Arc<T>) -> Self
    where
        T: RefreshTokenLedger + AccountStore + ChirpStore + 'static,
    {
        Self {
            ledger: adapter.clone(),
            accounts: adapter.clone(),
            chirps: adapter,
        }
    }
}

impl DatabaseProvider {
    /// Pick a provider from a configured URL.
    ///
    /// `:memory:` selects the in-process store, `libsql://`/`https://` a
    /// remote Turso database, anything else a local SQLite path.
    pub fn from_url(url: &str, auth_token: Option<String>) -> Self {
        if url == ":memory:" {
            DatabaseProvider::Memory
        } else if url.starts_with("libsql://") || url.starts_with("https://") {
            DatabaseProvider::Turso {
                url: url.to_string(),
                auth_token: auth_token.unwrap_or_default(),
            }
        } else {
            DatabaseProvider::SQLite {
                path: url.to_string(),
            }
        }
    }

    /// Create the stores for this provider.
    pub async fn create_stores(&self, clock: Arc<dyn Clock>) -> Result<Stores> {
        match self {
            DatabaseProvider::Memory => Ok(Stores::from_adapter(Arc::new(MemoryStore::new(clock)))),
            DatabaseProvider::SQLite { path } => {
                let client = TursoClient::new_local(path, clock).await?;
                Ok(Stores::from_adapter(Arc::new(client)))
            }
            DatabaseProvider::Turso { url, auth_token } => {
                let client =
                    TursoClient::new_remote(url.clone(), auth_token.clone(), clock).await?;
                Ok(Stores::from_adapter(Arc::new(client)))
            }
        }
    }
}
