//! # Chirpy
//!
//! A small social-posting API server. Its core is the authentication and
//! session-lifecycle subsystem:
//!
//! - Argon2id password hashing ([`auth::password`])
//! - stateless, HS256-signed access tokens of at most one hour ([`auth::jwt`])
//! - stateful, revocable refresh tokens ([`db::RefreshTokenLedger`])
//! - `Authorization: Bearer` parsing ([`auth::bearer`])
//! - login / refresh / revoke flows ([`auth::SessionService`])
//! - owner-only mutation of posts ([`auth::ownership`])
//!
//! ## Quick Start (Library Usage)
//!
//! ```rust,ignore
//! use chirpy::{auth::SystemClock, db::DatabaseProvider, AppState, ChirpyConfig};
//! use std::sync::Arc;
//!
//! let clock = Arc::new(SystemClock);
//! let config = ChirpyConfig::load("chirpy.toml")?;
//! let stores = DatabaseProvider::Memory.create_stores(clock.clone()).await?;
//! let state = AppState::new(&config, b"signing-secret", stores, clock)?;
//! let app = chirpy::api::routes::create_router(state);
//! ```
//!
//! ## Modules
//!
//! - [`auth`] - Credentials, tokens and session flows
//! - [`api`] - REST API handlers and routes
//! - [`db`] - Storage contracts and adapters (libsql, in-memory)
//! - [`types`] - Common types and error handling
//! - [`utils`] - TOML configuration

#![cfg_attr(docsrs, feature(doc_cfg))]
#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

/// HTTP API handlers and routes.
#[allow(missing_docs)]
pub mod api;
/// Authentication and session lifecycle.
#[allow(missing_docs)]
pub mod auth;
/// Command-line interface.
pub mod cli;
/// Storage contracts and adapters.
#[allow(missing_docs)]
pub mod db;
/// Core types (requests, responses, errors).
#[allow(missing_docs)]
pub mod types;
/// Configuration utilities (TOML).
#[allow(missing_docs)]
pub mod utils;

// Re-export commonly used types
pub use auth::{AccessTokenCodec, Clock, PasswordHasher, SessionService};
pub use db::{DatabaseProvider, Stores};
pub use types::{AppError, Result};
pub use utils::toml_config::{ChirpyConfig, ConfigError};

use chrono::Duration;
use db::ChirpStore;
use std::sync::Arc;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    /// Login, refresh and revocation
    pub session: Arc<SessionService>,
    /// Chirp persistence
    pub chirps: Arc<dyn ChirpStore>,
}

impl AppState {
    /// Wire the core together from configuration, the signing secret and
    /// a set of stores.
    ///
    /// Token lifetimes that do not fit a `Duration` are `InvalidInput`.
    pub fn new(
        config: &ChirpyConfig,
        jwt_secret: &[u8],
        stores: Stores,
        clock: Arc<dyn Clock>,
    ) -> Result<Self> {
        let argon = &config.auth.argon2;
        let hasher = PasswordHasher::new(argon.memory_kib, argon.iterations, argon.parallelism)?;
        let codec = AccessTokenCodec::new(jwt_secret, clock.clone());

        let access_ttl = ttl_from_secs("access_token_ttl_secs", config.auth.access_token_ttl_secs)?;
        let refresh_ttl =
            ttl_from_secs("refresh_token_ttl_secs", config.auth.refresh_token_ttl_secs)?;

        let session = SessionService::new(stores.accounts, stores.ledger, hasher, codec, clock)
            .with_access_ttl(access_ttl)
            .with_refresh_ttl(refresh_ttl);

        Ok(Self {
            session: Arc::new(session),
            chirps: stores.chirps,
        })
    }
}

fn ttl_from_secs(name: &str, secs: i64) -> Result<Duration> {
    Duration::try_seconds(secs)
        .ok_or_else(|| AppError::InvalidInput(format!("auth.{} out of range: {}", name, secs)))
}
