pub mod password;
pub mod validate;

use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::config::SecurityConfig;

pub use password::{hash_password, verify_password};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Claims {
    pub user_id: i32,
    pub username: String,
    pub email: String,
    pub exp: i64,
    pub iat: i64,
}

impl Claims {
    pub fn new(user_id: i32, username: String, email: String, expiry_hours: u64) -> Self {
        let now = Utc::now();
        let exp = (now + Duration::hours(expiry_hours as i64)).timestamp();

        Self {
            user_id,
            username,
            email,
            exp,
            iat: now.timestamp(),
        }
    }
}

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("JWT secret not configured")]
    MissingSecret,

    #[error("JWT generation error: {0}")]
    TokenGeneration(String),

    #[error("Invalid or expired token")]
    InvalidToken,

    #[error("Password hashing failed: {0}")]
    PasswordHash(String),
}

pub fn generate_jwt(claims: &Claims, security: &SecurityConfig) -> Result<String, AuthError> {
    if security.jwt_secret.is_empty() {
        return Err(AuthError::MissingSecret);
    }

    let encoding_key = EncodingKey::from_secret(security.jwt_secret.as_bytes());
    encode(&Header::default(), claims, &encoding_key).map_err(|e| AuthError::TokenGeneration(e.to_string()))
}

/// Decode a token and check its signature and expiry.
pub fn validate_jwt(token: &str, security: &SecurityConfig) -> Result<Claims, AuthError> {
    if security.jwt_secret.is_empty() {
        return Err(AuthError::MissingSecret);
    }

    let decoding_key = DecodingKey::from_secret(security.jwt_secret.as_bytes());
    let token_data = decode::<Claims>(token, &decoding_key, &Validation::default()).map_err(|e| {
        tracing::debug!("Rejected JWT: {}", e);
        AuthError::InvalidToken
    })?;

    Ok(token_data.claims)
}

/// Token for a freshly registered or logged-in user.
pub fn issue_token(user_id: i32, username: &str, email: &str, security: &SecurityConfig) -> Result<String, AuthError> {
    let claims = Claims::new(user_id, username.to_string(), email.to_string(), security.jwt_expiry_hours);
    generate_jwt(&claims, security)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AppConfig;

    #[test]
    fn token_round_trips_claims() {
        let security = AppConfig::for_tests().security;
        let token = issue_token(7, "alice", "alice@example.com", &security).unwrap();
        let claims = validate_jwt(&token, &security).unwrap();

        assert_eq!(claims.user_id, 7);
        assert_eq!(claims.username, "alice");
        assert!(claims.exp > claims.iat);
    }

    #[test]
    fn rejects_token_signed_with_other_secret() {
        let security = AppConfig::for_tests().security;
        let token = issue_token(7, "alice", "alice@example.com", &security).unwrap();

        let mut other = security.clone();
        other.jwt_secret = "another-secret".into();
        assert!(matches!(validate_jwt(&token, &other), Err(AuthError::InvalidToken)));
    }

    #[test]
    fn rejects_expired_token() {
        let security = AppConfig::for_tests().security;
        let mut claims = Claims::new(1, "bob".into(), "bob@example.com".into(), 1);
        claims.iat -= 7200;
        claims.exp = claims.iat + 60;
        let token = generate_jwt(&claims, &security).unwrap();
        assert!(validate_jwt(&token, &security).is_err());
    }

    #[test]
    fn empty_secret_is_an_error() {
        let mut security = AppConfig::for_tests().security;
        security.jwt_secret.clear();
        assert!(matches!(issue_token(1, "a", "a@b.c", &security), Err(AuthError::MissingSecret)));
    }

    #[test]
    fn claims_use_camel_case() {
        let claims = Claims::new(3, "c".into(), "c@d.e".into(), 1);
        let value = serde_json::to_value(&claims).unwrap();
        assert_eq!(value["userId"], 3);
    }
}
