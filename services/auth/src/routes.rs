//! Authentication service routes

use axum::{
    Json, Router,
    extract::{State, rejection::JsonRejection},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
};
use axum_extra::{
    TypedHeader,
    headers::{Authorization, authorization::Bearer},
};
use chrono::Utc;
use common::jwt::TokenType;
use serde::Serialize;
use serde_json::json;
use tower_http::trace::TraceLayer;
use tracing::{error, info, warn};

use crate::{
    AppState,
    error::AuthError,
    mailer::OtpPurpose,
    models::{Admin, AdminAuthRequest, LoginCredentials, PublicUser, SignupRequest},
    otp::OtpCheck,
    repositories::CreateUser,
    validation::{normalize_email, validate_login, validate_signup},
};

/// Response for user login
#[derive(Serialize)]
pub struct LoginResponse {
    pub token: String,
    pub user: PublicUser,
}

/// Response for a verified admin code
#[derive(Serialize)]
pub struct AdminLoginResponse {
    pub message: &'static str,
    pub token: String,
    pub admin: Admin,
}

/// Create the router for the authentication service
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .route("/auth/signup", post(signup))
        .route("/auth/login", post(login))
        .route("/auth/me", get(me))
        .route("/auth/admin", post(admin_auth))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Health check endpoint
pub async fn health_check() -> impl IntoResponse {
    Json(json!({
        "status": "ok",
        "service": "auth-service"
    }))
}

fn json_body<T>(payload: Result<Json<T>, JsonRejection>) -> Result<T, AuthError> {
    payload.map(|Json(body)| body).map_err(|rejection| {
        warn!("Rejected request body: {}", rejection);
        AuthError::bad_request("Invalid JSON body")
    })
}

/// User signup endpoint
pub async fn signup(
    State(state): State<AppState>,
    payload: Result<Json<SignupRequest>, JsonRejection>,
) -> Result<impl IntoResponse, AuthError> {
    let new_user = validate_signup(json_body(payload)?)?;
    info!("Signup attempt for: {}", new_user.email);

    let outcome = state.user_repository.create(&new_user).await.map_err(|e| {
        error!("Failed to create user: {}", e);
        AuthError::InternalServerError
    })?;

    match outcome {
        CreateUser::Created(user) => {
            info!(user_id = user.id, "User signed up");
            Ok((
                StatusCode::CREATED,
                Json(json!({ "message": "Signup successful" })),
            ))
        }
        CreateUser::EmailTaken => Err(AuthError::bad_request("User already exists")),
    }
}

/// User login endpoint
pub async fn login(
    State(state): State<AppState>,
    payload: Result<Json<LoginCredentials>, JsonRejection>,
) -> Result<impl IntoResponse, AuthError> {
    let (email, password) = validate_login(json_body(payload)?)?;
    info!("Login attempt for user: {}", email);

    let user = state
        .user_repository
        .find_by_email(&email)
        .await
        .map_err(|e| {
            error!("Failed to look up user: {}", e);
            AuthError::InternalServerError
        })?
        .ok_or_else(|| AuthError::unauthorized("Invalid credentials"))?;

    let valid = state
        .user_repository
        .verify_password(&user, &password)
        .map_err(|e| {
            error!("Failed to verify password: {}", e);
            AuthError::InternalServerError
        })?;
    if !valid {
        return Err(AuthError::unauthorized("Invalid credentials"));
    }

    let token = state
        .jwt_service
        .issue_user_token(user.id, &user.email, &user.name)
        .map_err(|e| {
            error!("Failed to generate user token: {}", e);
            AuthError::InternalServerError
        })?;

    Ok((
        StatusCode::OK,
        Json(LoginResponse {
            token,
            user: PublicUser::from(&user),
        }),
    ))
}

/// Current user for a bearer user token
pub async fn me(
    State(state): State<AppState>,
    bearer: Option<TypedHeader<Authorization<Bearer>>>,
) -> Result<impl IntoResponse, AuthError> {
    let TypedHeader(Authorization(bearer)) =
        bearer.ok_or_else(|| AuthError::unauthorized("Unauthorized"))?;

    let claims = state
        .jwt_service
        .validate_token_of(bearer.token(), TokenType::User)
        .map_err(|e| {
            warn!("Rejected token on /auth/me: {}", e);
            AuthError::unauthorized("Unauthorized")
        })?;

    let user = state
        .user_repository
        .find_by_email(&claims.email)
        .await
        .map_err(|e| {
            error!("Failed to look up user: {}", e);
            AuthError::InternalServerError
        })?
        .ok_or_else(|| AuthError::unauthorized("Unauthorized"))?;

    Ok(Json(PublicUser::from(&user)))
}

/// Admin email-code login: `send-otp`, `verify-otp` and `resend-otp`
pub async fn admin_auth(
    State(state): State<AppState>,
    payload: Result<Json<AdminAuthRequest>, JsonRejection>,
) -> Result<axum::response::Response, AuthError> {
    let request = json_body(payload)?;

    let Some(action) = request.action.as_deref().map(str::trim).filter(|a| !a.is_empty()) else {
        return Err(AuthError::bad_request("Action is required"));
    };

    match action {
        "send-otp" => send_otp(&state, request.email, OtpPurpose::Login)
            .await
            .map(IntoResponse::into_response),
        "resend-otp" => send_otp(&state, request.email, OtpPurpose::Resend)
            .await
            .map(IntoResponse::into_response),
        "verify-otp" => verify_otp(&state, request.email, request.otp)
            .await
            .map(IntoResponse::into_response),
        _ => Err(AuthError::bad_request("Invalid action")),
    }
}

async fn send_otp(
    state: &AppState,
    email: Option<String>,
    purpose: OtpPurpose,
) -> Result<Json<serde_json::Value>, AuthError> {
    let email = normalize_email(email);
    if email.is_empty() {
        return Err(AuthError::bad_request("Email is required"));
    }

    let admin = state
        .admin_repository
        .find_by_email(&email)
        .await
        .map_err(|e| {
            error!("Failed to look up admin: {}", e);
            AuthError::InternalServerError
        })?
        .ok_or_else(|| {
            warn!("OTP requested for non-admin email: {}", email);
            AuthError::Forbidden("Unauthorized email. Admin access only.".to_string())
        })?;

    let code = state
        .otp_store
        .issue(&email, Utc::now())
        .await
        .map_err(|e| {
            error!("Failed to store OTP: {}", e);
            AuthError::InternalServerError
        })?;

    state
        .mailer
        .send_otp(
            &email,
            admin.admin_name.as_deref(),
            &code,
            purpose,
            state.otp_store.ttl_seconds(),
        )
        .await
        .map_err(|e| {
            error!("Failed to send OTP email: {}", e);
            AuthError::InternalServerError
        })?;

    let message = match purpose {
        OtpPurpose::Login => "OTP sent to admin email",
        OtpPurpose::Resend => "OTP resent successfully",
    };
    Ok(Json(json!({ "message": message })))
}

async fn verify_otp(
    state: &AppState,
    email: Option<String>,
    otp: Option<String>,
) -> Result<Json<AdminLoginResponse>, AuthError> {
    let email = normalize_email(email);
    let otp = otp.map(|o| o.trim().to_string()).unwrap_or_default();
    if email.is_empty() || otp.is_empty() {
        return Err(AuthError::bad_request("Email and OTP are required"));
    }

    let check = state
        .otp_store
        .verify(&email, &otp, Utc::now())
        .await
        .map_err(|e| {
            error!("Failed to verify OTP: {}", e);
            AuthError::InternalServerError
        })?;

    match check {
        OtpCheck::Verified => {}
        OtpCheck::NotFound => return Err(AuthError::unauthorized("OTP not found or expired")),
        OtpCheck::Expired => return Err(AuthError::unauthorized("OTP expired")),
        OtpCheck::Mismatch => return Err(AuthError::unauthorized("Invalid OTP")),
    }

    let admin = state
        .admin_repository
        .find_by_email(&email)
        .await
        .map_err(|e| {
            error!("Failed to look up admin: {}", e);
            AuthError::InternalServerError
        })?
        .ok_or_else(|| AuthError::NotFound("Admin not found".to_string()))?;

    let token = state
        .jwt_service
        .issue_admin_token(admin.admin_id, &admin.email)
        .map_err(|e| {
            error!("Failed to generate admin token: {}", e);
            AuthError::InternalServerError
        })?;

    info!(admin_id = admin.admin_id, "Admin authenticated");
    Ok(Json(AdminLoginResponse {
        message: "Admin authenticated successfully",
        token,
        admin,
    }))
}
