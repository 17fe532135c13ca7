use std::sync::OnceLock;

use argon2::{password_hash::SaltString, Argon2, PasswordHash, PasswordHasher, PasswordVerifier};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Validation};
use rand::rngs::OsRng;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use time::{Duration, OffsetDateTime};

use crate::core::config::SecuritySettings;

#[cfg(not(test))]
const ARGON2_MEMORY_KIB: u32 = 19_456;
#[cfg(not(test))]
const ARGON2_TIME: u32 = 2;
// Unoptimized test builds would spend seconds per hash otherwise.
#[cfg(test)]
const ARGON2_MEMORY_KIB: u32 = 1_024;
#[cfg(test)]
const ARGON2_TIME: u32 = 1;
const ARGON2_PARALLELISM: u32 = 1;

#[derive(Debug, Error)]
pub(crate) enum SecurityError {
    #[error("password hashing failed")]
    Hashing,
    #[error("password verification failed")]
    Verification,
    #[error("jwt encoding failed")]
    JwtEncoding,
    #[error("jwt decoding failed")]
    JwtDecoding,
    #[error("unsupported jwt algorithm: {0}")]
    UnsupportedAlgorithm(String),
}

/// Token claims. `sub` is the session id, never a username, so logging out
/// does not require revoking the token itself.
#[derive(Debug, Serialize, Deserialize)]
pub(crate) struct Claims {
    pub(crate) sub: String,
    pub(crate) iat: i64,
    pub(crate) exp: i64,
}

fn hasher() -> Result<Argon2<'static>, SecurityError> {
    let params = argon2::Params::new(ARGON2_MEMORY_KIB, ARGON2_TIME, ARGON2_PARALLELISM, None)
        .map_err(|_| SecurityError::Hashing)?;
    Ok(Argon2::new(argon2::Algorithm::Argon2id, argon2::Version::V0x13, params))
}

/// Argon2id with a fresh random salt; the PHC string carries salt and params.
pub(crate) fn hash_password(password: &str) -> Result<String, SecurityError> {
    let salt = SaltString::generate(&mut OsRng);

    let hash = hasher()?
        .hash_password(password.as_bytes(), &salt)
        .map_err(|_| SecurityError::Hashing)?
        .to_string();

    Ok(hash)
}

pub(crate) fn verify_password(password: &str, hash: &str) -> Result<bool, SecurityError> {
    let parsed = PasswordHash::new(hash).map_err(|_| SecurityError::Verification)?;

    match hasher()?.verify_password(password.as_bytes(), &parsed) {
        Ok(_) => Ok(true),
        Err(argon2::password_hash::Error::Password) => Ok(false),
        Err(_) => Err(SecurityError::Verification),
    }
}

/// Spends the same work as a real verification so an unknown username
/// cannot be told apart from a wrong password by timing.
pub(crate) fn verify_against_dummy(password: &str) {
    static DUMMY_HASH: OnceLock<Option<String>> = OnceLock::new();
    let dummy = DUMMY_HASH.get_or_init(|| hash_password("dummy-password-for-timing").ok());
    if let Some(hash) = dummy {
        let _ = verify_password(password, hash);
    }
}

pub(crate) fn create_session_token(
    session_id: &str,
    security: &SecuritySettings,
    expires_in: Option<Duration>,
) -> Result<String, SecurityError> {
    let algorithm = algorithm_from_settings(security)?;
    let now = OffsetDateTime::now_utc();
    let expire = now + expires_in.unwrap_or_else(|| security.token_lifetime());

    let claims = Claims {
        sub: session_id.to_string(),
        iat: now.unix_timestamp(),
        exp: expire.unix_timestamp(),
    };

    encode(
        &jsonwebtoken::Header::new(algorithm),
        &claims,
        &EncodingKey::from_secret(security.secret_key.as_bytes()),
    )
    .map_err(|_| SecurityError::JwtEncoding)
}

pub(crate) fn verify_session_token(
    token: &str,
    security: &SecuritySettings,
) -> Result<Claims, SecurityError> {
    let algorithm = algorithm_from_settings(security)?;
    let mut validation = Validation::new(algorithm);
    validation.validate_exp = true;
    validation.required_spec_claims.insert("exp".to_string());
    validation.required_spec_claims.insert("sub".to_string());

    decode::<Claims>(
        token,
        &DecodingKey::from_secret(security.secret_key.as_bytes()),
        &validation,
    )
    .map(|data| data.claims)
    .map_err(|_| SecurityError::JwtDecoding)
}

fn algorithm_from_settings(security: &SecuritySettings) -> Result<Algorithm, SecurityError> {
    match security.algorithm.as_str() {
        "HS256" => Ok(Algorithm::HS256),
        "HS384" => Ok(Algorithm::HS384),
        "HS512" => Ok(Algorithm::HS512),
        other => Err(SecurityError::UnsupportedAlgorithm(other.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn security() -> SecuritySettings {
        SecuritySettings {
            secret_key: "test-secret".to_string(),
            access_token_expire_minutes: 60,
            algorithm: "HS256".to_string(),
        }
    }

    #[test]
    fn password_hash_roundtrip() {
        let hash = hash_password("correct-horse-battery-staple").expect("hash");
        assert!(verify_password("correct-horse-battery-staple", &hash).unwrap());
        assert!(!verify_password("wrong-password", &hash).unwrap());
    }

    #[test]
    fn same_password_gets_distinct_salts() {
        let first = hash_password("admin").expect("hash");
        let second = hash_password("admin").expect("hash");
        assert_ne!(first, second);
        assert!(first.starts_with("$argon2id$"));
        assert!(!first.contains("admin"));
    }

    #[test]
    fn malformed_hash_is_an_error_not_a_mismatch() {
        assert!(matches!(
            verify_password("admin", "8c6976e5b5410415bde908bd4dee15df"),
            Err(SecurityError::Verification)
        ));
    }

    #[test]
    fn session_token_roundtrip() {
        let token = create_session_token("session-123", &security(), Some(Duration::minutes(1)))
            .expect("token");
        let claims = verify_session_token(&token, &security()).expect("claims");
        assert_eq!(claims.sub, "session-123");
    }

    #[test]
    fn expired_or_foreign_tokens_are_rejected() {
        let expired = create_session_token("s", &security(), Some(Duration::minutes(-10)))
            .expect("token");
        assert!(verify_session_token(&expired, &security()).is_err());

        let mut other = security();
        other.secret_key = "another-secret".to_string();
        let foreign = create_session_token("s", &other, None).expect("token");
        assert!(verify_session_token(&foreign, &security()).is_err());
    }

    #[test]
    fn unsupported_algorithm_is_reported() {
        let mut settings = security();
        settings.algorithm = "RS256".to_string();
        assert!(matches!(
            create_session_token("s", &settings, None),
            Err(SecurityError::UnsupportedAlgorithm(_))
        ));
    }
}
