use crate::auth::clock::Clock;
use crate::types::{AppError, Claims, Result};
use chrono::Duration;
use jsonwebtoken::{
    decode, encode, errors::ErrorKind, Algorithm, DecodingKey, EncodingKey, Header, Validation,
};
use std::sync::Arc;
use uuid::Uuid;

/// `iss` claim stamped on and required from every access token.
pub const ISSUER: &str = "chirpy";

/// Upper bound (and default) for access-token lifetime.
pub const ACCESS_TOKEN_TTL: Duration = Duration::hours(1);

/// Issues and verifies HS256 access tokens.
///
/// Verification is a pure function of the token, the signing secret and the
/// injected clock: no persistence is consulted, so access tokens cannot be
/// revoked individually. Rotating the secret invalidates all of them.
#[derive(Clone)]
pub struct AccessTokenCodec {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    clock: Arc<dyn Clock>,
}

impl AccessTokenCodec {
    /// Creates a codec signing with `secret`.
    pub fn new(secret: &[u8], clock: Arc<dyn Clock>) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(secret),
            decoding_key: DecodingKey::from_secret(secret),
            clock,
        }
    }

    /// Issues a token asserting `identity` valid for `ttl` from now.
    pub fn issue(&self, identity: Uuid, ttl: Duration) -> Result<String> {
        let now = self.clock.now().timestamp();
        let claims = Claims {
            iss: ISSUER.to_string(),
            sub: identity.to_string(),
            iat: now,
            exp: now + ttl.num_seconds(),
        };

        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
            .map_err(|e| AppError::Internal(format!("Failed to generate token: {}", e)))
    }

    /// Verifies signature, issuer and expiry, returning the subject.
    pub fn verify(&self, token: &str) -> Result<Uuid> {
        let claims = self.decode_claims(token)?;

        if claims.exp <= self.clock.now().timestamp() {
            return Err(AppError::Expired);
        }

        Uuid::parse_str(&claims.sub).map_err(|_| AppError::Malformed)
    }

    /// Decodes and checks everything except expiry, which is compared
    /// against the injected clock instead of the system time.
    fn decode_claims(&self, token: &str) -> Result<Claims> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = false;
        validation.leeway = 0;
        validation.set_issuer(&[ISSUER]);
        validation.set_required_spec_claims(&["exp", "iat", "iss", "sub"]);

        decode::<Claims>(token, &self.decoding_key, &validation)
            .map(|data| data.claims)
            .map_err(|e| match e.kind() {
                ErrorKind::InvalidSignature => AppError::InvalidSignature,
                ErrorKind::ExpiredSignature => AppError::Expired,
                _ => AppError::Malformed,
            })
    }
}
