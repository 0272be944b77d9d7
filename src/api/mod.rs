//! HTTP API Handlers and Routes
//!
//! A thin Axum layer over [`SessionService`](crate::auth::SessionService) and
//! the chirp store.
//!
//! # API Endpoints
//!
//! ## Accounts and sessions
//! - `POST /api/users` - Register (`{email, password}`)
//! - `POST /api/login` - Login, returns an access token and a refresh token
//! - `POST /api/refresh` - Exchange a refresh token for a new access token
//! - `POST /api/revoke` - Revoke a refresh token
//!
//! ## Chirps
//! - `GET /api/chirps` - List chirps (`?author_id=<uuid>&sort=asc|desc`)
//! - `GET /api/chirps/{id}` - Get one chirp
//! - `POST /api/chirps` - Create a chirp (access token required)
//! - `DELETE /api/chirps/{id}` - Delete your own chirp (access token required)
//!
//! ## Health
//! - `GET /api/healthz` - Health check endpoint
//!
//! # Authentication
//!
//! Refresh, revoke and the protected chirp routes read the `Authorization`
//! header:
//! ```text
//! Authorization: Bearer <token>
//! ```
//! The route decides whether `<token>` is an access token or a refresh token.

/// Request and response handlers for all API endpoints.
pub mod handlers;
/// Router configuration and route definitions.
pub mod routes;
