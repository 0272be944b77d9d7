//! API request handlers.
//!
//! This module contains all HTTP request handlers organized by functionality.

/// Registration, login, refresh and revoke handlers.
pub mod auth;
/// Chirp CRUD handlers.
pub mod chirps;

/// Liveness check
pub async fn healthz() -> &'static str {
    "OK"
}
