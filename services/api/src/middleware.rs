//! Bearer token authentication
//!
//! Principals are resolved per request by extractors. A handler that takes an
//! [`AuthUser`] only runs for a valid user token, one that takes an
//! [`AuthAdmin`] only for a valid admin token. Anything else is a 401.

use axum::{
    extract::{FromRef, FromRequestParts},
    http::{header::AUTHORIZATION, request::Parts},
};
use common::jwt::{Claims, JwtService, TokenType};
use tracing::warn;

use crate::error::ApiError;

/// Authenticated end user
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub id: i64,
    pub email: String,
}

/// Authenticated admin
#[derive(Debug, Clone)]
pub struct AuthAdmin {
    pub admin_id: i64,
    pub email: String,
}

#[axum::async_trait]
impl<S> FromRequestParts<S> for AuthUser
where
    JwtService: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let claims = authenticate(parts, &JwtService::from_ref(state), TokenType::User)?;
        Ok(AuthUser {
            id: claims.sub,
            email: claims.email,
        })
    }
}

#[axum::async_trait]
impl<S> FromRequestParts<S> for AuthAdmin
where
    JwtService: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let claims = authenticate(parts, &JwtService::from_ref(state), TokenType::Admin)?;
        Ok(AuthAdmin {
            admin_id: claims.sub,
            email: claims.email,
        })
    }
}

fn authenticate(parts: &Parts, jwt_service: &JwtService, expected: TokenType) -> Result<Claims, ApiError> {
    // Extract the Authorization header
    let auth_header = parts
        .headers
        .get(AUTHORIZATION)
        .and_then(|header| header.to_str().ok())
        .ok_or(ApiError::Unauthorized)?;

    // Check if it's a Bearer token
    let token = auth_header
        .strip_prefix("Bearer ")
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .ok_or(ApiError::Unauthorized)?;

    jwt_service.validate_token_of(token, expected).map_err(|e| {
        warn!("Rejected bearer token: {}", e);
        ApiError::Unauthorized
    })
}
