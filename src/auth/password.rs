use crate::types::{AppError, Result};
use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher as _, PasswordVerifier, SaltString},
    Algorithm, Argon2, Params, Version,
};

/// Default Argon2id memory cost in KiB (19 MiB).
pub const DEFAULT_MEMORY_KIB: u32 = 19_456;
/// Default number of Argon2id passes.
pub const DEFAULT_ITERATIONS: u32 = 2;
/// Default Argon2id lane count.
pub const DEFAULT_PARALLELISM: u32 = 1;
/// Digest length in bytes.
pub const OUTPUT_LEN: usize = 32;

/// Argon2id password hashing with fixed cost parameters.
///
/// Hashes are PHC strings, so verification always uses the salt and
/// parameters embedded in the stored hash rather than the hasher's own.
#[derive(Debug, Clone)]
pub struct PasswordHasher {
    params: Params,
}

impl PasswordHasher {
    /// Creates a hasher with explicit Argon2id cost parameters.
    pub fn new(memory_kib: u32, iterations: u32, parallelism: u32) -> Result<Self> {
        let params = Params::new(memory_kib, iterations, parallelism, Some(OUTPUT_LEN))
            .map_err(|e| AppError::HashingFailure(format!("Invalid Argon2 parameters: {}", e)))?;
        Ok(Self { params })
    }

    fn argon2(&self) -> Argon2<'static> {
        Argon2::new(Algorithm::Argon2id, Version::V0x13, self.params.clone())
    }

    /// Hashes a password with a fresh random salt.
    pub fn hash(&self, password: &str) -> Result<String> {
        let salt = SaltString::generate(&mut OsRng);

        self.argon2()
            .hash_password(password.as_bytes(), &salt)
            .map(|hash| hash.to_string())
            .map_err(|e| AppError::HashingFailure(format!("Failed to hash password: {}", e)))
    }

    /// Verifies a candidate password against a stored PHC hash.
    ///
    /// A mismatch is `Ok(false)`; a hash that cannot be parsed is an error.
    pub fn verify(&self, candidate: &str, stored_hash: &str) -> Result<bool> {
        let parsed_hash = PasswordHash::new(stored_hash)
            .map_err(|e| AppError::HashingFailure(format!("Invalid password hash: {}", e)))?;

        match self
            .argon2()
            .verify_password(candidate.as_bytes(), &parsed_hash)
        {
            Ok(()) => Ok(true),
            Err(argon2::password_hash::Error::Password) => Ok(false),
            Err(e) => Err(AppError::HashingFailure(format!(
                "Failed to verify password: {}",
                e
            ))),
        }
    }
}

impl Default for PasswordHasher {
    fn default() -> Self {
        Self {
            params: Params::new(
                DEFAULT_MEMORY_KIB,
                DEFAULT_ITERATIONS,
                DEFAULT_PARALLELISM,
                Some(OUTPUT_LEN),
            )
            .unwrap_or_default(),
        }
    }
}
