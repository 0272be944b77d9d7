//! TOML-based configuration for Chirpy
//!
//! Infrastructure settings (listen address, token lifetimes, Argon2 cost,
//! database location) live in `chirpy.toml`. Secrets do not: the file names
//! the environment variables that hold them.

use crate::auth::password::{DEFAULT_ITERATIONS, DEFAULT_MEMORY_KIB, DEFAULT_PARALLELISM};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Access tokens may never live longer than this.
pub const MAX_ACCESS_TOKEN_TTL_SECS: i64 = 3600;

/// Upper bound for refresh-token lifetime (ten years).
pub const MAX_REFRESH_TOKEN_TTL_SECS: i64 = 10 * 365 * 24 * 60 * 60;

/// Root configuration structure loaded from chirpy.toml
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ChirpyConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub auth: AuthConfig,
    #[serde(default)]
    pub database: DatabaseConfig,
}

// ============= Server Configuration =============

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,

    #[serde(default = "default_log_level")]
    pub log_level: String,
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    8080
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            log_level: default_log_level(),
        }
    }
}

// ============= Authentication Configuration =============

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthConfig {
    /// Environment variable name containing the JWT signing secret
    #[serde(default = "default_jwt_secret_env")]
    pub jwt_secret_env: String,

    #[serde(default = "default_access_token_ttl")]
    pub access_token_ttl_secs: i64,

    #[serde(default = "default_refresh_token_ttl")]
    pub refresh_token_ttl_secs: i64,

    #[serde(default)]
    pub argon2: Argon2Config,
}

fn default_jwt_secret_env() -> String {
    "JWT_SECRET".to_string()
}

fn default_access_token_ttl() -> i64 {
    MAX_ACCESS_TOKEN_TTL_SECS
}

fn default_refresh_token_ttl() -> i64 {
    60 * 24 * 60 * 60
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            jwt_secret_env: default_jwt_secret_env(),
            access_token_ttl_secs: default_access_token_ttl(),
            refresh_token_ttl_secs: default_refresh_token_ttl(),
            argon2: Argon2Config::default(),
        }
    }
}

/// Argon2id cost parameters used for new hashes.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Argon2Config {
    #[serde(default = "default_memory_kib")]
    pub memory_kib: u32,

    #[serde(default = "default_iterations")]
    pub iterations: u32,

    #[serde(default = "default_parallelism")]
    pub parallelism: u32,
}

fn default_memory_kib() -> u32 {
    DEFAULT_MEMORY_KIB
}

fn default_iterations() -> u32 {
    DEFAULT_ITERATIONS
}

fn default_parallelism() -> u32 {
    DEFAULT_PARALLELISM
}

impl Default for Argon2Config {
    fn default() -> Self {
        Self {
            memory_kib: default_memory_kib(),
            iterations: default_iterations(),
            parallelism: default_parallelism(),
        }
    }
}

// ============= Database Configuration =============

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    /// `:memory:`, a local SQLite path, or a `libsql://` Turso URL
    #[serde(default = "default_database_url")]
    pub url: String,

    /// Environment variable for the Turso auth token
    pub turso_token_env: Option<String>,
}

fn default_database_url() -> String {
    "./data/chirpy.db".to_string()
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: default_database_url(),
            turso_token_env: None,
        }
    }
}

// ============= Configuration Loading & Validation =============

/// Errors that can occur during configuration loading
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Configuration file not found: {0}")]
    FileNotFound(PathBuf),

    #[error("Failed to read configuration file: {0}")]
    ReadError(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    ParseError(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("Environment variable '{0}' referenced in config is not set")]
    MissingEnvVar(String),
}

impl ChirpyConfig {
    /// Load and validate configuration from a TOML file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();

        if !path.exists() {
            return Err(ConfigError::FileNotFound(path.to_path_buf()));
        }

        let content = fs::read_to_string(path)?;
        let config: ChirpyConfig = toml::from_str(&content)?;

        config.validate()?;

        Ok(config)
    }

    /// Validate token lifetimes and hashing cost
    pub fn validate(&self) -> Result<(), ConfigError> {
        let auth = &self.auth;

        if auth.access_token_ttl_secs <= 0 || auth.access_token_ttl_secs > MAX_ACCESS_TOKEN_TTL_SECS
        {
            return Err(ConfigError::ValidationError(format!(
                "auth.access_token_ttl_secs must be between 1 and {}, got {}",
                MAX_ACCESS_TOKEN_TTL_SECS, auth.access_token_ttl_secs
            )));
        }

        if auth.refresh_token_ttl_secs <= 0
            || auth.refresh_token_ttl_secs > MAX_REFRESH_TOKEN_TTL_SECS
        {
            return Err(ConfigError::ValidationError(format!(
                "auth.refresh_token_ttl_secs must be between 1 and {}, got {}",
                MAX_REFRESH_TOKEN_TTL_SECS, auth.refresh_token_ttl_secs
            )));
        }

        argon2::Params::new(
            auth.argon2.memory_kib,
            auth.argon2.iterations,
            auth.argon2.parallelism,
            None,
        )
        .map_err(|e| ConfigError::ValidationError(format!("auth.argon2: {}", e)))?;

        if self.database.url.is_empty() {
            return Err(ConfigError::ValidationError(
                "database.url must not be empty".to_string(),
            ));
        }

        Ok(())
    }

    /// Get a resolved value from an env var reference
    pub fn resolve_env(&self, env_name: &str) -> Option<String> {
        std::env::var(env_name).ok().filter(|v| !v.is_empty())
    }

    /// Get the JWT signing secret from the environment
    pub fn jwt_secret(&self) -> Result<String, ConfigError> {
        self.resolve_env(&self.auth.jwt_secret_env)
            .ok_or_else(|| ConfigError::MissingEnvVar(self.auth.jwt_secret_env.clone()))
    }

    /// Get the Turso auth token, if one is configured
    pub fn turso_token(&self) -> Result<Option<String>, ConfigError> {
        match &self.database.turso_token_env {
            None => Ok(None),
            Some(env) => self
                .resolve_env(env)
                .map(Some)
                .ok_or_else(|| ConfigError::MissingEnvVar(env.clone())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults() {
        let config: ChirpyConfig = toml::from_str("").expect("empty config is valid");

        assert_eq!(config.server.host, "127.0.0.1");
        assert_eq!(config.server.port, 8080);
        assert_eq!(config.auth.jwt_secret_env, "JWT_SECRET");
        assert_eq!(config.auth.access_token_ttl_secs, 3600);
        assert_eq!(config.auth.refresh_token_ttl_secs, 5_184_000);
        assert_eq!(config.auth.argon2.memory_kib, DEFAULT_MEMORY_KIB);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_parse_config() {
        let content = r#"
[server]
host = "0.0.0.0"
port = 9000
log_level = "debug"

[auth]
jwt_secret_env = "CHIRPY_TEST_SECRET"
access_token_ttl_secs = 900
refresh_token_ttl_secs = 86400

[auth.argon2]
memory_kib = 8192
iterations = 3

[database]
url = ":memory:"
"#;

        let config: ChirpyConfig = toml::from_str(content).expect("Failed to parse config");

        assert_eq!(config.server.port, 9000);
        assert_eq!(config.auth.access_token_ttl_secs, 900);
        assert_eq!(config.auth.argon2.memory_kib, 8192);
        assert_eq!(config.auth.argon2.iterations, 3);
        assert_eq!(config.auth.argon2.parallelism, DEFAULT_PARALLELISM);
        assert_eq!(config.database.url, ":memory:");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validation_access_ttl_ceiling() {
        let mut config = ChirpyConfig::default();

        config.auth.access_token_ttl_secs = 7200;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::ValidationError(_))
        ));

        config.auth.access_token_ttl_secs = 0;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::ValidationError(_))
        ));
    }

    #[test]
    fn test_validation_refresh_ttl() {
        let mut config = ChirpyConfig::default();
        config.auth.refresh_token_ttl_secs = -1;

        assert!(matches!(
            config.validate(),
            Err(ConfigError::ValidationError(_))
        ));

        config.auth.refresh_token_ttl_secs = MAX_REFRESH_TOKEN_TTL_SECS;
        assert!(config.validate().is_ok());

        for too_long in [MAX_REFRESH_TOKEN_TTL_SECS + 1, 10_000_000_000_000, i64::MAX] {
            config.auth.refresh_token_ttl_secs = too_long;
            assert!(matches!(
                config.validate(),
                Err(ConfigError::ValidationError(_))
            ));
        }
    }

    #[test]
    fn test_validation_argon2_params() {
        let mut config = ChirpyConfig::default();
        config.auth.argon2.iterations = 0;

        assert!(matches!(
            config.validate(),
            Err(ConfigError::ValidationError(_))
        ));
    }

    #[test]
    fn test_load_missing_file() {
        let result = ChirpyConfig::load("/definitely/not/here/chirpy.toml");
        assert!(matches!(result, Err(ConfigError::FileNotFound(_))));
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().expect("temp file");
        writeln!(file, "[server]\nport = 7777").unwrap();

        let config = ChirpyConfig::load(file.path()).expect("should load");
        assert_eq!(config.server.port, 7777);
    }

    #[test]
    fn test_jwt_secret_env() {
        let mut config = ChirpyConfig::default();
        config.auth.jwt_secret_env = "CHIRPY_TEST_JWT_SECRET_UNSET".to_string();

        assert!(matches!(
            config.jwt_secret(),
            Err(ConfigError::MissingEnvVar(_))
        ));
        assert!(matches!(config.turso_token(), Ok(None)));
    }
}
