//! Database integration tests
//!
//! These tests verify the TursoClient functionality against a throwaway
//! SQLite file.

use chirpy::auth::{Clock, ManualClock};
use chirpy::db::{AccountStore, ChirpStore, RefreshTokenLedger, TursoClient};
use chirpy::types::{AppError, SortOrder};
use chrono::Duration;
use std::sync::Arc;
use tempfile::TempDir;
use uuid::Uuid;

/// Test helper to create a TursoClient backed by a temporary file.
///
/// The `TempDir` must outlive the client.
async fn create_test_client() -> (TursoClient, Arc<ManualClock>, TempDir) {
    let dir = TempDir::new().expect("Failed to create temp dir");
    let path = dir.path().join("chirpy.db");
    let clock = Arc::new(ManualClock::starting_now());

    let client = TursoClient::new_local(path.to_str().unwrap(), clock.clone())
        .await
        .expect("Failed to create local database");

    (client, clock, dir)
}

#[tokio::test]
async fn test_create_local_client() {
    let (client, _clock, _dir) = create_test_client().await;
    assert!(client.connection().is_ok());
}

#[tokio::test]
async fn test_schema_is_idempotent() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("chirpy.db");
    let path = path.to_str().unwrap();
    let clock = Arc::new(ManualClock::starting_now());

    let first = TursoClient::new_local(path, clock.clone()).await.unwrap();
    first.create_account("a@example.com", "hash").await.unwrap();
    drop(first);

    let reopened = TursoClient::new_local(path, clock).await.unwrap();
    let account = reopened.lookup_by_email("a@example.com").await.unwrap();
    assert_eq!(account.password_hash, "hash");
}

// ============= Accounts =============

#[tokio::test]
async fn test_create_and_lookup_account() {
    let (client, clock, _dir) = create_test_client().await;

    let created = client
        .create_account("test@example.com", "$argon2id$v=19$stub")
        .await
        .unwrap();
    assert_eq!(created.created_at, clock.now());

    let found = client.lookup_by_email("test@example.com").await.unwrap();
    assert_eq!(found.id, created.id);
    assert_eq!(found.password_hash, "$argon2id$v=19$stub");
}

#[tokio::test]
async fn test_create_duplicate_account_fails() {
    let (client, _clock, _dir) = create_test_client().await;

    client
        .create_account("test@example.com", "hash1")
        .await
        .unwrap();

    let result = client.create_account("test@example.com", "hash2").await;
    assert!(matches!(result, Err(AppError::Conflict(_))));
}

#[tokio::test]
async fn test_lookup_unknown_email() {
    let (client, _clock, _dir) = create_test_client().await;

    let result = client.lookup_by_email("nobody@example.com").await;
    assert!(matches!(result, Err(AppError::NotFound(_))));
}

// ============= Refresh Tokens =============

#[tokio::test]
async fn test_issue_and_resolve_refresh_token() {
    let (client, clock, _dir) = create_test_client().await;
    let user_id = Uuid::new_v4();

    let issued = client.issue(user_id, Duration::days(60)).await.unwrap();
    assert_eq!(issued.token.len(), 64);
    assert_eq!(issued.issued_at, clock.now());
    assert_eq!(issued.expires_at, clock.now() + Duration::days(60));

    let record = client.resolve(&issued.token).await.unwrap();
    assert_eq!(record.user_id, user_id);
    assert_eq!(record.expires_at, issued.expires_at);
    assert!(record.revoked_at.is_none());
    assert!(record.is_active_at(clock.now()));
}

#[tokio::test]
async fn test_token_stored_as_digest() {
    let (client, _clock, _dir) = create_test_client().await;
    let issued = client.issue(Uuid::new_v4(), Duration::days(1)).await.unwrap();

    let conn = client.connection().unwrap();
    let mut rows = conn
        .query("SELECT token_hash FROM refresh_tokens", ())
        .await
        .unwrap();
    let row = rows.next().await.unwrap().unwrap();
    let stored: String = row.get(0).unwrap();

    assert_ne!(stored, issued.token);
    assert_eq!(stored, chirpy::auth::refresh::hash_token(&issued.token));
}

#[tokio::test]
async fn test_resolve_unknown_token() {
    let (client, _clock, _dir) = create_test_client().await;

    let result = client.resolve(&"ab".repeat(32)).await;
    assert!(matches!(result, Err(AppError::NotFound(_))));
}

#[tokio::test]
async fn test_revoke_is_idempotent() {
    let (client, clock, _dir) = create_test_client().await;
    let issued = client.issue(Uuid::new_v4(), Duration::days(60)).await.unwrap();
    let revoked_at = clock.now();

    client.revoke(&issued.token).await.unwrap();

    clock.advance(Duration::minutes(5));
    client.revoke(&issued.token).await.unwrap();

    let record = client.resolve(&issued.token).await.unwrap();
    assert_eq!(record.revoked_at, Some(revoked_at));
    assert!(!record.is_active_at(clock.now()));
}

#[tokio::test]
async fn test_revoke_unknown_token() {
    let (client, _clock, _dir) = create_test_client().await;

    let result = client.revoke("not-a-token").await;
    assert!(matches!(result, Err(AppError::NotFound(_))));
}

#[tokio::test]
async fn test_refresh_token_expires_with_clock() {
    let (client, clock, _dir) = create_test_client().await;
    let issued = client.issue(Uuid::new_v4(), Duration::hours(1)).await.unwrap();

    clock.advance(Duration::hours(1));

    let record = client.resolve(&issued.token).await.unwrap();
    assert!(!record.is_active_at(clock.now()));
}

// ============= Chirps =============

#[tokio::test]
async fn test_chirp_lifecycle() {
    let (client, clock, _dir) = create_test_client().await;
    let author = client.create_account("author@example.com", "h").await.unwrap();
    let other = client.create_account("other@example.com", "h").await.unwrap();

    let first = client.create_chirp("first", author.id).await.unwrap();
    clock.advance(Duration::seconds(1));
    client.create_chirp("second", other.id).await.unwrap();
    clock.advance(Duration::seconds(1));
    let third = client.create_chirp("third", author.id).await.unwrap();

    let asc = client.list_chirps(None, SortOrder::Asc).await.unwrap();
    assert_eq!(
        asc.iter().map(|c| c.body.as_str()).collect::<Vec<_>>(),
        vec!["first", "second", "third"]
    );

    let desc = client.list_chirps(None, SortOrder::Desc).await.unwrap();
    assert_eq!(desc[0].id, third.id);

    let mine = client
        .list_chirps(Some(author.id), SortOrder::Asc)
        .await
        .unwrap();
    assert_eq!(mine.len(), 2);
    assert!(mine.iter().all(|c| c.user_id == author.id));

    assert_eq!(client.get_chirp(first.id).await.unwrap(), first);

    client.delete_chirp(first.id).await.unwrap();
    assert!(matches!(
        client.get_chirp(first.id).await,
        Err(AppError::NotFound(_))
    ));
    assert!(matches!(
        client.delete_chirp(first.id).await,
        Err(AppError::NotFound(_))
    ));
}
