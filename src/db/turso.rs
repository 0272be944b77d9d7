use super::traits::{AccountStore, ChirpStore, RefreshTokenLedger};
use crate::auth::clock::Clock;
use crate::auth::refresh::{
    expiry_after, generate_token, hash_token, RefreshToken, RefreshTokenRecord,
};
use crate::types::{Account, AppError, Chirp, Result, SortOrder};
use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use libsql::{Builder, Connection, Database, Row, Value};
use std::sync::Arc;
use uuid::Uuid;

pub struct TursoClient {
    db: Database,
    clock: Arc<dyn Clock>,
}

impl TursoClient {
    /// Connect to a remote Turso database.
    pub async fn new_remote(url: String, auth_token: String, clock: Arc<dyn Clock>) -> Result<Self> {
        let db = Builder::new_remote(url, auth_token)
            .build()
            .await
            .map_err(|e| AppError::Database(format!("Failed to connect to Turso: {}", e)))?;

        let client = Self { db, clock };
        client.initialize_schema().await?;

        Ok(client)
    }

    /// Open (or create) a local SQLite file.
    pub async fn new_local(path: &str, clock: Arc<dyn Clock>) -> Result<Self> {
        let db = Builder::new_local(path)
            .build()
            .await
            .map_err(|e| AppError::Database(format!("Failed to open database {}: {}", path, e)))?;

        let client = Self { db, clock };
        client.initialize_schema().await?;

        Ok(client)
    }

    pub fn connection(&self) -> Result<Connection> {
        self.db
            .connect()
            .map_err(|e| AppError::Database(format!("Failed to get connection: {}", e)))
    }

    async fn initialize_schema(&self) -> Result<()> {
        let conn = self.connection()?;

        // Users table
        conn.execute(
            "CREATE TABLE IF NOT EXISTS users (
                id TEXT PRIMARY KEY,
                email TEXT UNIQUE NOT NULL,
                hashed_password TEXT NOT NULL,
                created_at INTEGER NOT NULL,
                updated_at INTEGER NOT NULL
            )",
            (),
        )
        .await
        .map_err(|e| AppError::Database(format!("Failed to create users table: {}", e)))?;

        // Refresh tokens table (keyed by SHA-256 of the token)
        conn.execute(
            "CREATE TABLE IF NOT EXISTS refresh_tokens (
                token_hash TEXT PRIMARY KEY,
                user_id TEXT NOT NULL,
                created_at INTEGER NOT NULL,
                updated_at INTEGER NOT NULL,
                expires_at INTEGER NOT NULL,
                revoked_at INTEGER,
                FOREIGN KEY (user_id) REFERENCES users(id) ON DELETE CASCADE
            )",
            (),
        )
        .await
        .map_err(|e| {
            AppError::Database(format!("Failed to create refresh_tokens table: {}", e))
        })?;

        // Chirps table
        conn.execute(
            "CREATE TABLE IF NOT EXISTS chirps (
                id TEXT PRIMARY KEY,
                body TEXT NOT NULL,
                user_id TEXT NOT NULL,
                created_at INTEGER NOT NULL,
                updated_at INTEGER NOT NULL,
                FOREIGN KEY (user_id) REFERENCES users(id) ON DELETE CASCADE
            )",
            (),
        )
        .await
        .map_err(|e| AppError::Database(format!("Failed to create chirps table: {}", e)))?;

        Ok(())
    }

    async fn first_row(&self, sql: &str, param: String) -> Result<Option<Row>> {
        let conn = self.connection()?;
        let mut rows = conn
            .query(sql, [param])
            .await
            .map_err(|e| AppError::Database(format!("Query failed: {}", e)))?;

        rows.next()
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }
}

fn timestamp(secs: i64) -> Result<DateTime<Utc>> {
    DateTime::from_timestamp(secs, 0)
        .ok_or_else(|| AppError::Database(format!("Invalid timestamp: {}", secs)))
}

fn uuid_column(row: &Row, idx: i32) -> Result<Uuid> {
    let raw: String = row.get(idx).map_err(|e| AppError::Database(e.to_string()))?;
    Uuid::parse_str(&raw).map_err(|e| AppError::Database(format!("Invalid UUID {}: {}", raw, e)))
}

fn time_column(row: &Row, idx: i32) -> Result<DateTime<Utc>> {
    let secs: i64 = row.get(idx).map_err(|e| AppError::Database(e.to_string()))?;
    timestamp(secs)
}

fn optional_time_column(row: &Row, idx: i32) -> Result<Option<DateTime<Utc>>> {
    match row
        .get_value(idx)
        .map_err(|e| AppError::Database(e.to_string()))?
    {
        Value::Null => Ok(None),
        Value::Integer(secs) => timestamp(secs).map(Some),
        other => Err(AppError::Database(format!(
            "Unexpected timestamp value: {:?}",
            other
        ))),
    }
}

fn account_from_row(row: &Row) -> Result<Account> {
    Ok(Account {
        id: uuid_column(row, 0)?,
        email: row.get(1).map_err(|e| AppError::Database(e.to_string()))?,
        password_hash: row.get(2).map_err(|e| AppError::Database(e.to_string()))?,
        created_at: time_column(row, 3)?,
        updated_at: time_column(row, 4)?,
    })
}

fn chirp_from_row(row: &Row) -> Result<Chirp> {
    Ok(Chirp {
        id: uuid_column(row, 0)?,
        body: row.get(1).map_err(|e| AppError::Database(e.to_string()))?,
        user_id: uuid_column(row, 2)?,
        created_at: time_column(row, 3)?,
        updated_at: time_column(row, 4)?,
    })
}

#[async_trait]
impl RefreshTokenLedger for TursoClient {
    async fn issue(&self, user_id: Uuid, ttl: Duration) -> Result<RefreshToken> {
        let conn = self.connection()?;
        let token = generate_token();
        let issued_at = timestamp(self.clock.now().timestamp())?;
        let expires_at = expiry_after(issued_at, ttl)?;

        conn.execute(
            "INSERT INTO refresh_tokens (token_hash, user_id, created_at, updated_at, expires_at, revoked_at)
             VALUES (?, ?, ?, ?, ?, NULL)",
            (
                hash_token(&token),
                user_id.to_string(),
                issued_at.timestamp(),
                issued_at.timestamp(),
                expires_at.timestamp(),
            ),
        )
        .await
        .map_err(|e| AppError::Database(format!("Failed to store refresh token: {}", e)))?;

        Ok(RefreshToken {
            token,
            user_id,
            issued_at,
            expires_at,
        })
    }

    async fn resolve(&self, token: &str) -> Result<RefreshTokenRecord> {
        let row = self
            .first_row(
                "SELECT user_id, created_at, expires_at, revoked_at
                 FROM refresh_tokens WHERE token_hash = ?",
                hash_token(token),
            )
            .await?
            .ok_or_else(|| AppError::NotFound("Refresh token not found".to_string()))?;

        Ok(RefreshTokenRecord {
            user_id: uuid_column(&row, 0)?,
            issued_at: time_column(&row, 1)?,
            expires_at: time_column(&row, 2)?,
            revoked_at: optional_time_column(&row, 3)?,
        })
    }

    async fn revoke(&self, token: &str) -> Result<()> {
        let conn = self.connection()?;
        let now = self.clock.now().timestamp();

        let changed = conn
            .execute(
                "UPDATE refresh_tokens
                 SET revoked_at = COALESCE(revoked_at, ?), updated_at = ?
                 WHERE token_hash = ?",
                (now, now, hash_token(token)),
            )
            .await
            .map_err(|e| AppError::Database(format!("Failed to revoke refresh token: {}", e)))?;

        if changed == 0 {
            return Err(AppError::NotFound("Refresh token not found".to_string()));
        }
        Ok(())
    }
}

#[async_trait]
impl AccountStore for TursoClient {
    async fn create_account(&self, email: &str, password_hash: &str) -> Result<Account> {
        let conn = self.connection()?;
        let now = timestamp(self.clock.now().timestamp())?;
        let account = Account {
            id: Uuid::new_v4(),
            email: email.to_string(),
            password_hash: password_hash.to_string(),
            created_at: now,
            updated_at: now,
        };

        conn.execute(
            "INSERT INTO users (id, email, hashed_password, created_at, updated_at)
             VALUES (?, ?, ?, ?, ?)",
            (
                account.id.to_string(),
                email,
                password_hash,
                now.timestamp(),
                now.timestamp(),
            ),
        )
        .await
        .map_err(|e| {
            let msg = e.to_string();
            if msg.contains("UNIQUE constraint failed") {
                AppError::Conflict("User already exists".to_string())
            } else {
                AppError::Database(format!("Failed to create user: {}", msg))
            }
        })?;

        Ok(account)
    }

    async fn lookup_by_email(&self, email: &str) -> Result<Account> {
        let row = self
            .first_row(
                "SELECT id, email, hashed_password, created_at, updated_at
                 FROM users WHERE email = ?",
                email.to_string(),
            )
            .await?
            .ok_or_else(|| AppError::NotFound("User not found".to_string()))?;

        account_from_row(&row)
    }
}

#[async_trait]
impl ChirpStore for TursoClient {
    async fn create_chirp(&self, body: &str, user_id: Uuid) -> Result<Chirp> {
        let conn = self.connection()?;
        let now = timestamp(self.clock.now().timestamp())?;
        let chirp = Chirp {
            id: Uuid::new_v4(),
            created_at: now,
            updated_at: now,
            body: body.to_string(),
            user_id,
        };

        conn.execute(
            "INSERT INTO chirps (id, body, user_id, created_at, updated_at)
             VALUES (?, ?, ?, ?, ?)",
            (
                chirp.id.to_string(),
                body,
                user_id.to_string(),
                now.timestamp(),
                now.timestamp(),
            ),
        )
        .await
        .map_err(|e| AppError::Database(format!("Failed to create chirp: {}", e)))?;

        Ok(chirp)
    }

    async fn get_chirp(&self, id: Uuid) -> Result<Chirp> {
        let row = self
            .first_row(
                "SELECT id, body, user_id, created_at, updated_at FROM chirps WHERE id = ?",
                id.to_string(),
            )
            .await?
            .ok_or_else(|| AppError::NotFound("Chirp not found".to_string()))?;

        chirp_from_row(&row)
    }

    async fn list_chirps(&self, author_id: Option<Uuid>, sort: SortOrder) -> Result<Vec<Chirp>> {
        let conn = self.connection()?;
        let order = match sort {
            SortOrder::Asc => "ASC",
            SortOrder::Desc => "DESC",
        };

        let mut rows = match author_id {
            Some(author) => {
                let sql = format!(
                    "SELECT id, body, user_id, created_at, updated_at FROM chirps
                     WHERE user_id = ? ORDER BY created_at {order}, rowid {order}"
                );
                conn.query(&sql, [author.to_string()]).await
            }
            None => {
                let sql = format!(
                    "SELECT id, body, user_id, created_at, updated_at FROM chirps
                     ORDER BY created_at {order}, rowid {order}"
                );
                conn.query(&sql, ()).await
            }
        }
        .map_err(|e| AppError::Database(format!("Failed to list chirps: {}", e)))?;

        let mut chirps = Vec::new();
        while let Some(row) = rows
            .next()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?
        {
            chirps.push(chirp_from_row(&row)?);
        }

        Ok(chirps)
    }

    async fn delete_chirp(&self, id: Uuid) -> Result<()> {
        let conn = self.connection()?;

        let changed = conn
            .execute("DELETE FROM chirps WHERE id = ?", [id.to_string()])
            .await
            .map_err(|e| AppError::Database(format!("Failed to delete chirp: {}", e)))?;

        if changed == 0 {
            return Err(AppError::NotFound("Chirp not found".to_string()));
        }
        Ok(())
    }
}
