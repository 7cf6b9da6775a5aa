pub mod extractors;
pub mod middleware;
pub mod password;
pub mod token;

use serde::{Deserialize, Serialize};

// Re-export necessary items
pub use extractors::AuthenticatedUser;
pub use middleware::AuthMiddleware;
pub use password::{hash_password, verify_password};
pub use token::{Claims, TokenError, TokenService};

/// Represents the payload for a login request.
///
/// Submitted as form data to `POST /auth/token`. The `username` field carries
/// the account's email address; the name follows the OAuth2 password-grant
/// form convention.
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    /// User's email address.
    pub username: String,
    /// User's password.
    pub password: String,
}

/// Response structure after successful authentication.
/// Contains the JWT access token and its type.
#[derive(Debug, Serialize, Deserialize)]
pub struct TokenResponse {
    /// The JWT (JSON Web Token) presented as a bearer credential.
    pub access_token: String,
    /// Always `"bearer"`.
    pub token_type: String,
}

impl TokenResponse {
    pub fn bearer(access_token: String) -> Self {
        Self {
            access_token,
            token_type: "bearer".to_string(),
        }
    }
}
