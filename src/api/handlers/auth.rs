use crate::{
    auth::bearer::authorization_value,
    types::{LoginRequest, LoginResponse, RegisterRequest, Result, TokenResponse, UserResponse},
    AppState,
};
use axum::{
    extract::State,
    http::{HeaderMap, StatusCode},
    Json,
};
use chrono::Duration;

/// Register a new user
pub async fn register(
    State(state): State<AppState>,
    Json(payload): Json<RegisterRequest>,
) -> Result<(StatusCode, Json<UserResponse>)> {
    let account = state
        .session
        .register(&payload.email, &payload.password)
        .await?;

    Ok((StatusCode::CREATED, Json(UserResponse::from(&account))))
}

/// Login with email and password
pub async fn login(
    State(state): State<AppState>,
    Json(payload): Json<LoginRequest>,
) -> Result<Json<LoginResponse>> {
    let outcome = state
        .session
        .login(
            &payload.email,
            &payload.password,
            // Values too large for a Duration get the ceiling
            payload.expires_in_seconds.and_then(Duration::try_seconds),
        )
        .await?;

    Ok(Json(LoginResponse {
        user: UserResponse::from(&outcome.account),
        token: outcome.access_token,
        refresh_token: outcome.refresh_token,
    }))
}

/// Exchange a refresh token for a new access token
pub async fn refresh(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Json<TokenResponse>> {
    let grant = state.session.refresh(authorization_value(&headers)?).await?;

    Ok(Json(TokenResponse {
        token: grant.access_token,
    }))
}

/// Revoke a refresh token
pub async fn revoke(State(state): State<AppState>, headers: HeaderMap) -> Result<StatusCode> {
    state.session.revoke(authorization_value(&headers)?).await?;

    Ok(StatusCode::NO_CONTENT)
}
