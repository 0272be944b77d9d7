use crate::{
    auth::{middleware::AuthUser, ownership::require_owner},
    types::{AppError, Chirp, CreateChirpRequest, ListChirpsQuery, Result},
    AppState,
};
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use uuid::Uuid;

/// Longest accepted chirp body, in characters.
pub const MAX_CHIRP_LENGTH: usize = 140;

/// Words masked out of chirp bodies, matched case-insensitively.
const BANNED_WORDS: [&str; 3] = ["kerfuffle", "sharbert", "fornax"];

const MASK: &str = "****";

/// Masks banned words. Words are split on single spaces, so a banned word
/// with punctuation attached is left alone.
pub fn clean_body(body: &str) -> String {
    body.split(' ')
        .map(|word| {
            let lowered = word.to_lowercase();
            if BANNED_WORDS.contains(&lowered.as_str()) {
                MASK
            } else {
                word
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// Create a chirp owned by the authenticated user
pub async fn create_chirp(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Json(payload): Json<CreateChirpRequest>,
) -> Result<(StatusCode, Json<Chirp>)> {
    if payload.body.chars().count() > MAX_CHIRP_LENGTH {
        return Err(AppError::InvalidInput("Chirp is too long".to_string()));
    }

    let chirp = state
        .chirps
        .create_chirp(&clean_body(&payload.body), user_id)
        .await?;

    Ok((StatusCode::CREATED, Json(chirp)))
}

/// List chirps, optionally filtered by author
pub async fn list_chirps(
    State(state): State<AppState>,
    Query(query): Query<ListChirpsQuery>,
) -> Result<Json<Vec<Chirp>>> {
    let chirps = state.chirps.list_chirps(query.author_id, query.sort).await?;
    Ok(Json(chirps))
}

/// Get a single chirp
pub async fn get_chirp(
    State(state): State<AppState>,
    Path(chirp_id): Path<Uuid>,
) -> Result<Json<Chirp>> {
    let chirp = state.chirps.get_chirp(chirp_id).await?;
    Ok(Json(chirp))
}

/// Delete a chirp; only its author may do so
pub async fn delete_chirp(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Path(chirp_id): Path<Uuid>,
) -> Result<StatusCode> {
    let chirp = state.chirps.get_chirp(chirp_id).await?;
    require_owner(user_id, chirp.user_id)?;

    state.chirps.delete_chirp(chirp_id).await?;
    tracing::info!(%chirp_id, %user_id, "chirp deleted");

    Ok(StatusCode::NO_CONTENT)
}
