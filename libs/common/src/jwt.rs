//! JWT service for token generation and validation
//!
//! Tokens are HS256-signed with a shared secret so the auth service can issue
//! them and the API service can verify them. Verification checks signature
//! and expiry only; there is no revocation list.

use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use std::time::{SystemTime, UNIX_EPOCH};
use thiserror::Error;

/// Default lifetime of a user session token (7 days)
pub const DEFAULT_USER_TOKEN_EXPIRY: u64 = 7 * 24 * 60 * 60;
/// Default lifetime of an admin session token (1 day)
pub const DEFAULT_ADMIN_TOKEN_EXPIRY: u64 = 24 * 60 * 60;

/// Errors raised while configuring, issuing or validating tokens
#[derive(Debug, Error)]
pub enum JwtError {
    /// No signing secret configured
    #[error("JWT_SECRET environment variable not set")]
    MissingSecret,

    /// Token could not be signed
    #[error("Failed to sign token: {0}")]
    Encoding(#[source] jsonwebtoken::errors::Error),

    /// Signature, expiry or structure check failed
    #[error("Invalid token: {0}")]
    Invalid(#[source] jsonwebtoken::errors::Error),

    /// Token is valid but was issued for another kind of principal
    #[error("Token is not a {expected:?} token")]
    WrongTokenType { expected: TokenType },

    /// System clock is before the unix epoch
    #[error("Failed to get current time")]
    Clock,
}

/// JWT configuration
#[derive(Debug, Clone)]
pub struct JwtConfig {
    /// Shared HMAC secret for signing and verifying tokens
    pub secret: String,
    /// User token expiration time in seconds (default: 7 days)
    pub user_token_expiry: u64,
    /// Admin token expiration time in seconds (default: 1 day)
    pub admin_token_expiry: u64,
}

impl JwtConfig {
    /// Create a new JwtConfig from environment variables
    ///
    /// # Environment Variables
    /// - `JWT_SECRET`: Signing secret (required, must not be blank)
    /// - `JWT_USER_TOKEN_EXPIRY`: User token expiry in seconds (default: 604800)
    /// - `JWT_ADMIN_TOKEN_EXPIRY`: Admin token expiry in seconds (default: 86400)
    pub fn from_env() -> Result<Self, JwtError> {
        let secret = std::env::var("JWT_SECRET").map_err(|_| JwtError::MissingSecret)?;
        if secret.trim().is_empty() {
            return Err(JwtError::MissingSecret);
        }

        let user_token_expiry = std::env::var("JWT_USER_TOKEN_EXPIRY")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(DEFAULT_USER_TOKEN_EXPIRY);

        let admin_token_expiry = std::env::var("JWT_ADMIN_TOKEN_EXPIRY")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(DEFAULT_ADMIN_TOKEN_EXPIRY);

        Ok(JwtConfig {
            secret,
            user_token_expiry,
            admin_token_expiry,
        })
    }
}

/// Kind of principal a token was issued to
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum TokenType {
    /// End user who logged in with a password
    User,
    /// Admin who logged in with an emailed one-time code
    Admin,
}

/// JWT claims structure
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Claims {
    /// User id or admin id, depending on `token_type`
    pub sub: i64,
    /// Email of the principal
    pub email: String,
    /// Display name (user tokens only)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Issued at time
    pub iat: u64,
    /// Expiration time
    pub exp: u64,
    /// Principal kind
    pub token_type: TokenType,
}

/// JWT service
#[derive(Clone)]
pub struct JwtService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
    config: JwtConfig,
}

impl JwtService {
    /// Initialize a new JWT service
    pub fn new(config: JwtConfig) -> Result<Self, JwtError> {
        if config.secret.trim().is_empty() {
            return Err(JwtError::MissingSecret);
        }

        let encoding_key = EncodingKey::from_secret(config.secret.as_bytes());
        let decoding_key = DecodingKey::from_secret(config.secret.as_bytes());
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = true;

        Ok(JwtService {
            encoding_key,
            decoding_key,
            validation,
            config,
        })
    }

    /// Issue a session token for an end user
    pub fn issue_user_token(&self, user_id: i64, email: &str, name: &str) -> Result<String, JwtError> {
        let now = unix_now()?;
        self.sign(&Claims {
            sub: user_id,
            email: email.to_string(),
            name: Some(name.to_string()),
            iat: now,
            exp: now + self.config.user_token_expiry,
            token_type: TokenType::User,
        })
    }

    /// Issue a session token for an admin
    pub fn issue_admin_token(&self, admin_id: i64, email: &str) -> Result<String, JwtError> {
        let now = unix_now()?;
        self.sign(&Claims {
            sub: admin_id,
            email: email.to_string(),
            name: None,
            iat: now,
            exp: now + self.config.admin_token_expiry,
            token_type: TokenType::Admin,
        })
    }

    /// Validate a token and return the claims
    pub fn validate_token(&self, token: &str) -> Result<Claims, JwtError> {
        let token_data =
            decode::<Claims>(token, &self.decoding_key, &self.validation).map_err(JwtError::Invalid)?;
        Ok(token_data.claims)
    }

    /// Validate a token and require it to belong to the given principal kind
    pub fn validate_token_of(&self, token: &str, expected: TokenType) -> Result<Claims, JwtError> {
        let claims = self.validate_token(token)?;
        if claims.token_type != expected {
            return Err(JwtError::WrongTokenType { expected });
        }
        Ok(claims)
    }

    fn sign(&self, claims: &Claims) -> Result<String, JwtError> {
        encode(&Header::new(Algorithm::HS256), claims, &self.encoding_key)
            .map_err(JwtError::Encoding)
    }
}

fn unix_now() -> Result<u64, JwtError> {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .map_err(|_| JwtError::Clock)
}
