use crate::error::AppError;
use chrono::{Duration, Utc};
use jsonwebtoken::{
    decode, encode, errors::ErrorKind, Algorithm, DecodingKey, EncodingKey, Header, Validation,
};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Represents the claims encoded within a JWT (JSON Web Token).
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct Claims {
    /// Subject of the token: the user's email address.
    pub sub: String,
    /// Expiration timestamp (seconds since epoch) for the token.
    pub exp: usize,
}

/// Reasons a token failed validation. Never surfaced to clients as-is; the
/// `From<TokenError> for AppError` conversion collapses both into one
/// generic 401.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenError {
    /// The signature did not verify, the payload was malformed, or the
    /// subject claim is absent.
    InvalidToken,
    /// The token's expiry timestamp has passed.
    ExpiredToken,
}

impl fmt::Display for TokenError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            TokenError::InvalidToken => write!(f, "invalid token"),
            TokenError::ExpiredToken => write!(f, "expired token"),
        }
    }
}

/// Issues and validates signed, time-limited bearer tokens.
///
/// Constructed once at startup from the configured secret, algorithm, and
/// validity window, with the encoding and decoding keys pre-computed. Shared
/// across workers as `web::Data<TokenService>`; cloning is cheap enough for
/// the app factory. Validation is stateless: a token is valid iff its
/// signature verifies and its expiry has not passed.
#[derive(Clone)]
pub struct TokenService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    header: Header,
    validation: Validation,
    validity: Duration,
}

impl TokenService {
    pub fn new(secret: &str, algorithm: Algorithm, validity_minutes: i64) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            header: Header::new(algorithm),
            validation: Validation::new(algorithm),
            validity: Duration::minutes(validity_minutes),
        }
    }

    /// Builds and signs a token for the given subject (user email), expiring
    /// after the configured validity window.
    pub fn issue(&self, subject: &str) -> Result<String, AppError> {
        let expiration = Utc::now()
            .checked_add_signed(self.validity)
            .ok_or_else(|| AppError::InternalServerError("Token expiry out of range".into()))?
            .timestamp() as usize;

        let claims = Claims {
            sub: subject.to_owned(),
            exp: expiration,
        };

        encode(&self.header, &claims, &self.encoding_key)
            .map_err(|e| AppError::InternalServerError(format!("Failed to generate token: {}", e)))
    }

    /// Verifies a token's signature and expiry and decodes its claims.
    ///
    /// Returns `TokenError::ExpiredToken` when the expiry has passed and
    /// `TokenError::InvalidToken` for every other failure, including a
    /// missing subject claim.
    pub fn validate(&self, token: &str) -> Result<Claims, TokenError> {
        decode::<Claims>(token, &self.decoding_key, &self.validation)
            .map(|data| data.claims)
            .map_err(|e| match e.kind() {
                ErrorKind::ExpiredSignature => TokenError::ExpiredToken,
                _ => TokenError::InvalidToken,
            })
    }
}
