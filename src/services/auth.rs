use actix_web::dev::Payload;
use actix_web::http::{header, StatusCode};
use actix_web::{error, web, FromRequest, HttpRequest, HttpResponse};
use argon2::password_hash::{rand_core::OsRng, SaltString};
use argon2::{Argon2, PasswordHash, PasswordHasher, PasswordVerifier};
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use std::future::{ready, Ready};
use thiserror::Error;

use crate::models::ErrorResponse;

/// Errors raised by the token layer and the extractors
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("Missing credentials: {0}")]
    MissingCredentials(String),

    #[error("Invalid token: {0}")]
    InvalidToken(String),

    #[error("Email address or password is incorrect")]
    InvalidCredentials,

    #[error("Password hashing failed: {0}")]
    HashError(String),
}

impl error::ResponseError for AuthError {
    fn status_code(&self) -> StatusCode {
        match self {
            AuthError::HashError(_) => StatusCode::INTERNAL_SERVER_ERROR,
            _ => StatusCode::UNAUTHORIZED,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let status = self.status_code();
        HttpResponse::build(status).json(ErrorResponse {
            error: "Authentication failed".to_string(),
            message: self.to_string(),
            status_code: status.as_u16(),
        })
    }
}

/// Bearer token claims
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String,
    pub iat: i64,
    pub exp: i64,
}

/// Issues and verifies the bearer tokens that carry the current user id
///
/// Identity internals stay out of scope; this is only the thin layer that
/// lets handlers read an authenticated user id from the request context.
#[derive(Clone)]
pub struct TokenManager {
    encoding: EncodingKey,
    decoding: DecodingKey,
    ttl_secs: i64,
}

impl TokenManager {
    pub fn new(secret: &str, ttl_secs: i64) -> Self {
        Self {
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
            ttl_secs,
        }
    }

    /// Issue a token for the given user id
    pub fn issue(&self, user_id: &str) -> Result<String, AuthError> {
        let now = Utc::now();
        let claims = Claims {
            sub: user_id.to_string(),
            iat: now.timestamp(),
            exp: (now + Duration::seconds(self.ttl_secs)).timestamp(),
        };

        encode(&Header::default(), &claims, &self.encoding)
            .map_err(|e| AuthError::InvalidToken(e.to_string()))
    }

    /// Verify a token and return the user id it carries
    pub fn verify(&self, token: &str) -> Result<String, AuthError> {
        decode::<Claims>(token, &self.decoding, &Validation::default())
            .map(|data| data.claims.sub)
            .map_err(|e| AuthError::InvalidToken(e.to_string()))
    }
}

/// Hash a password for storage
pub fn hash_password(password: &str) -> Result<String, AuthError> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| AuthError::HashError(e.to_string()))
}

/// Check a password against a stored hash
pub fn verify_password(password: &str, hash: &str) -> Result<bool, AuthError> {
    let parsed = PasswordHash::new(hash).map_err(|e| AuthError::HashError(e.to_string()))?;
    Ok(Argon2::default()
        .verify_password(password.as_bytes(), &parsed)
        .is_ok())
}

fn extract_user_id(req: &HttpRequest) -> Result<Option<String>, AuthError> {
    let header_value = match req.headers().get(header::AUTHORIZATION) {
        Some(value) => value,
        None => return Ok(None),
    };

    let value = header_value
        .to_str()
        .map_err(|_| AuthError::InvalidToken("Malformed authorization header".to_string()))?;

    let token = value
        .strip_prefix("Bearer ")
        .ok_or_else(|| AuthError::InvalidToken("Expected a bearer token".to_string()))?;

    let tokens = req
        .app_data::<web::Data<TokenManager>>()
        .ok_or_else(|| AuthError::InvalidToken("Token manager not configured".to_string()))?;

    tokens.verify(token).map(Some)
}

/// Extractor for handlers that require an authenticated user
pub struct CurrentUser {
    pub user_id: String,
}

impl FromRequest for CurrentUser {
    type Error = AuthError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        let result = match extract_user_id(req) {
            Ok(Some(user_id)) => Ok(CurrentUser { user_id }),
            Ok(None) => Err(AuthError::MissingCredentials(
                "Authorization header is required".to_string(),
            )),
            Err(e) => Err(e),
        };
        ready(result)
    }
}

/// Extractor for handlers where an anonymous caller is acceptable
///
/// A missing header yields `None`; a header that is present but invalid is
/// still rejected.
pub struct MaybeUser(pub Option<String>);

impl FromRequest for MaybeUser {
    type Error = AuthError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        ready(extract_user_id(req).map(MaybeUser))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_token_round_trip() {
        let tokens = TokenManager::new("unit-test-secret", 3600);
        let token = tokens.issue("user-123").expect("issue should succeed");
        let user_id = tokens.verify(&token).expect("verify should succeed");
        assert_eq!(user_id, "user-123");
    }

    #[test]
    fn test_token_rejects_other_secret() {
        let issuer = TokenManager::new("secret-a", 3600);
        let verifier = TokenManager::new("secret-b", 3600);
        let token = issuer.issue("user-123").expect("issue should succeed");
        assert!(verifier.verify(&token).is_err());
    }
}
