//! Authentication and session lifecycle
//!
//! This module owns every credential the server hands out or accepts.
//!
//! # Module Structure
//!
//! - [`auth::password`](crate::auth::password) - Argon2id password hashing
//! - [`auth::jwt`](crate::auth::jwt) - HS256 access-token issue/verify
//! - [`auth::bearer`](crate::auth::bearer) - `Authorization: Bearer` parsing
//! - [`auth::refresh`](crate::auth::refresh) - refresh-token values and state
//! - [`auth::session`](crate::auth::session) - login, refresh, revoke
//! - [`auth::ownership`](crate::auth::ownership) - owner-only mutation check
//! - [`auth::middleware`](crate::auth::middleware) - Axum layer and extractor
//!
//! # Tokens
//!
//! - **Access tokens** are stateless JWTs (`iss = "chirpy"`, `sub = user id`)
//!   valid for at most one hour. They cannot be revoked one by one; rotating
//!   the signing secret invalidates all of them.
//! - **Refresh tokens** are 64 hex characters of randomness stored (as a
//!   SHA-256 digest) in a [`RefreshTokenLedger`](crate::db::RefreshTokenLedger).
//!   They are exchanged for access tokens until revoked or expired.
//!
//! # Usage
//!
//! ```ignore
//! let session = SessionService::new(accounts, ledger, hasher, codec, clock);
//! let outcome = session.login("a@example.com", "hunter2", None).await?;
//! let grant = session.refresh(Some(&format!("Bearer {}", outcome.refresh_token))).await?;
//! ```

/// `Authorization: Bearer` header parsing.
pub mod bearer;
/// Injectable time source.
pub mod clock;
/// JWT access-token codec.
pub mod jwt;
/// Authentication middleware and extractors for protected routes.
pub mod middleware;
/// Resource ownership checks.
pub mod ownership;
/// Argon2id password hashing.
pub mod password;
/// Refresh-token generation and lifecycle state.
pub mod refresh;
/// Login, refresh and revocation flows.
pub mod session;

pub use clock::{Clock, ManualClock, SystemClock};
pub use jwt::AccessTokenCodec;
pub use password::PasswordHasher;
pub use session::SessionService;
