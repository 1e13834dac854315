//! Error type for the authentication endpoints

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use common::validation::ValidationErrors;
use serde_json::json;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error(transparent)]
    Validation(#[from] ValidationErrors),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Internal server error")]
    InternalServerError,
}

impl AuthError {
    pub fn bad_request(message: impl Into<String>) -> Self {
        AuthError::BadRequest(message.into())
    }

    pub fn unauthorized(message: impl Into<String>) -> Self {
        AuthError::Unauthorized(message.into())
    }
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        let (status, body) = match self {
            AuthError::BadRequest(message) => (StatusCode::BAD_REQUEST, json!({ "error": message })),
            AuthError::Validation(errors) => (
                StatusCode::BAD_REQUEST,
                json!({ "error": "Validation failed", "fields": errors }),
            ),
            AuthError::Unauthorized(message) => {
                (StatusCode::UNAUTHORIZED, json!({ "error": message }))
            }
            AuthError::Forbidden(message) => (StatusCode::FORBIDDEN, json!({ "error": message })),
            AuthError::NotFound(message) => (StatusCode::NOT_FOUND, json!({ "error": message })),
            AuthError::InternalServerError => (
                StatusCode::INTERNAL_SERVER_ERROR,
                json!({ "error": "Internal server error" }),
            ),
        };

        (status, Json(body)).into_response()
    }
}
