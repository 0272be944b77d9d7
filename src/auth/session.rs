use crate::auth::bearer::extract_bearer;
use crate::auth::clock::Clock;
use crate::auth::jwt::{AccessTokenCodec, ACCESS_TOKEN_TTL};
use crate::auth::password::PasswordHasher;
use crate::db::{AccountStore, RefreshTokenLedger};
use crate::types::{Account, AppError, Result};
use chrono::Duration;
use std::sync::Arc;
use tracing::{debug, error, info};
use uuid::Uuid;

/// Default refresh-token lifetime.
pub const REFRESH_TOKEN_TTL: Duration = Duration::days(60);

/// Result of a successful login.
#[derive(Debug, Clone)]
pub struct LoginOutcome {
    pub account: Account,
    pub access_token: String,
    pub refresh_token: String,
    /// Access-token lifetime in seconds.
    pub expires_in: i64,
}

/// A freshly issued access token.
#[derive(Debug, Clone)]
pub struct AccessGrant {
    pub access_token: String,
    pub expires_in: i64,
}

/// Login, refresh and revocation over the account store and refresh ledger.
///
/// Each refresh token is `Active` until it expires or is revoked; neither
/// terminal state can be left. Refreshing never rotates the refresh token.
pub struct SessionService {
    accounts: Arc<dyn AccountStore>,
    ledger: Arc<dyn RefreshTokenLedger>,
    hasher: PasswordHasher,
    codec: AccessTokenCodec,
    clock: Arc<dyn Clock>,
    access_ttl: Duration,
    refresh_ttl: Duration,
}

impl SessionService {
    pub fn new(
        accounts: Arc<dyn AccountStore>,
        ledger: Arc<dyn RefreshTokenLedger>,
        hasher: PasswordHasher,
        codec: AccessTokenCodec,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            accounts,
            ledger,
            hasher,
            codec,
            clock,
            access_ttl: ACCESS_TOKEN_TTL,
            refresh_ttl: REFRESH_TOKEN_TTL,
        }
    }

    /// Overrides the default login access-token lifetime (clamped to one hour).
    pub fn with_access_ttl(mut self, ttl: Duration) -> Self {
        self.access_ttl = clamp_ttl(Some(ttl), ACCESS_TOKEN_TTL);
        self
    }

    pub fn with_refresh_ttl(mut self, ttl: Duration) -> Self {
        self.refresh_ttl = ttl;
        self
    }

    pub fn codec(&self) -> &AccessTokenCodec {
        &self.codec
    }

    /// Creates an account with a hashed password.
    pub async fn register(&self, email: &str, password: &str) -> Result<Account> {
        if email.trim().is_empty() || password.is_empty() {
            return Err(AppError::InvalidInput(
                "Email and password are required".to_string(),
            ));
        }

        let hasher = self.hasher.clone();
        let password = password.to_string();
        let password_hash = tokio::task::spawn_blocking(move || hasher.hash(&password))
            .await
            .map_err(|e| AppError::Internal(format!("Hashing task failed: {}", e)))??;

        let account = self.accounts.create_account(email, &password_hash).await?;
        info!(user_id = %account.id, "registered user");

        Ok(account)
    }

    /// Checks email and password, then issues an access and a refresh token.
    ///
    /// Unknown email, wrong password and an unreadable stored hash are
    /// indistinguishable to the caller.
    /// `requested_ttl` may shorten the access token but never extend it past
    /// the configured lifetime.
    pub async fn login(
        &self,
        email: &str,
        password: &str,
        requested_ttl: Option<Duration>,
    ) -> Result<LoginOutcome> {
        let account = match self.accounts.lookup_by_email(email).await {
            Ok(account) => account,
            Err(AppError::NotFound(_)) => {
                debug!("login rejected: unknown email");
                return Err(AppError::InvalidCredentials);
            }
            Err(e) => return Err(e),
        };

        let hasher = self.hasher.clone();
        let candidate = password.to_string();
        let stored = account.password_hash.clone();
        let verified = tokio::task::spawn_blocking(move || hasher.verify(&candidate, &stored))
            .await
            .map_err(|e| AppError::Internal(format!("Verification task failed: {}", e)))?;

        match verified {
            Ok(true) => {}
            Ok(false) => {
                debug!(user_id = %account.id, "login rejected: wrong password");
                return Err(AppError::InvalidCredentials);
            }
            Err(e) => {
                error!(user_id = %account.id, error = %e, "stored password hash unusable");
                return Err(AppError::InvalidCredentials);
            }
        }

        let ttl = clamp_ttl(requested_ttl, self.access_ttl);
        let access_token = self.codec.issue(account.id, ttl)?;
        let refresh = self.ledger.issue(account.id, self.refresh_ttl).await?;

        info!(user_id = %account.id, "user logged in");

        Ok(LoginOutcome {
            account,
            access_token,
            refresh_token: refresh.token,
            expires_in: ttl.num_seconds(),
        })
    }

    /// Exchanges a valid refresh token for a new one-hour access token.
    pub async fn refresh(&self, authorization: Option<&str>) -> Result<AccessGrant> {
        let token = extract_bearer(authorization)?;
        let user_id = self.resolve_active(token).await?;

        let access_token = self.codec.issue(user_id, ACCESS_TOKEN_TTL)?;

        Ok(AccessGrant {
            access_token,
            expires_in: ACCESS_TOKEN_TTL.num_seconds(),
        })
    }

    /// Revokes a currently valid refresh token.
    ///
    /// Unknown, expired or already revoked tokens are `Unauthorized`.
    pub async fn revoke(&self, authorization: Option<&str>) -> Result<()> {
        let token = extract_bearer(authorization)?;
        let user_id = self.resolve_active(token).await?;

        match self.ledger.revoke(token).await {
            Ok(()) => {
                info!(%user_id, "refresh token revoked");
                Ok(())
            }
            Err(AppError::NotFound(_)) => Err(AppError::Unauthorized),
            Err(e) => Err(e),
        }
    }

    /// Resolves an access token from an `Authorization` header to its subject.
    pub fn authenticate(&self, authorization: Option<&str>) -> Result<Uuid> {
        let token = extract_bearer(authorization)?;
        self.codec.verify(token)
    }

    async fn resolve_active(&self, token: &str) -> Result<Uuid> {
        let record = match self.ledger.resolve(token).await {
            Ok(record) => record,
            Err(AppError::NotFound(_)) => {
                debug!("refresh token unknown");
                return Err(AppError::Unauthorized);
            }
            Err(e) => return Err(e),
        };

        let now = self.clock.now();
        if !record.is_active_at(now) {
            debug!(state = ?record.state_at(now), "refresh token not active");
            return Err(AppError::Unauthorized);
        }

        Ok(record.user_id)
    }
}

/// Requested lifetimes above `ceiling` are clamped to it; missing or
/// non-positive requests get the ceiling.
fn clamp_ttl(requested: Option<Duration>, ceiling: Duration) -> Duration {
    match requested {
        Some(ttl) if ttl > Duration::zero() => ttl.min(ceiling),
        _ => ceiling,
    }
}
