//! `Authorization: Bearer <token>` parsing.

use crate::types::{AppError, Result};
use axum::http::{header, HeaderMap};

const SCHEME: &str = "Bearer";

/// Extracts the token from a raw `Authorization` header value.
///
/// The value must be exactly `Bearer <token>`: case-sensitive scheme, a
/// single space, and a non-empty token containing no whitespace.
pub fn extract_bearer(header_value: Option<&str>) -> Result<&str> {
    let value = match header_value {
        Some(v) if !v.is_empty() => v,
        _ => return Err(AppError::MissingCredential),
    };

    let (scheme, token) = value
        .split_once(' ')
        .ok_or(AppError::MalformedCredential)?;

    if scheme != SCHEME || token.is_empty() || token.contains(char::is_whitespace) {
        return Err(AppError::MalformedCredential);
    }

    Ok(token)
}

/// Raw `Authorization` value. Present but non-UTF-8 is malformed, not missing.
pub fn authorization_value(headers: &HeaderMap) -> Result<Option<&str>> {
    headers
        .get(header::AUTHORIZATION)
        .map(|v| v.to_str().map_err(|_| AppError::MalformedCredential))
        .transpose()
}
