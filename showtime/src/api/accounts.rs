//! Account endpoints.
//!
//! - POST /api/register - Create an account and log in
//! - POST /api/login - Exchange credentials for a session token
//! - POST /api/logout - End the current session (requires auth)

use crate::accounts::Registration;
use crate::server::state::AppState;
use crate::session::SessionUser;
use axum::{Json, extract::State};
use serde::{Deserialize, Serialize};
use showtime_core::types::UserId;
use showtime_web::{ApiJson, AppError};

/// Registration request. `username` defaults to the local part of `email`.
#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    /// Optional display name
    pub username: Option<String>,
    /// Login email
    #[serde(default)]
    pub email: String,
    /// Password
    #[serde(default)]
    pub password: String,
}

/// Response after registering.
#[derive(Debug, Serialize)]
pub struct RegisterResponse {
    /// Always `registered`
    pub message: &'static str,
    /// New user id
    pub user_id: UserId,
    /// Session token for the new account
    pub token: String,
}

/// Login request.
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    /// Login email
    #[serde(default)]
    pub email: String,
    /// Password
    #[serde(default)]
    pub password: String,
}

/// Response after logging in.
#[derive(Debug, Serialize)]
pub struct LoginResponse {
    /// Always `logged in`
    pub message: &'static str,
    /// Session token for `Authorization: Bearer`
    pub token: String,
}

/// Plain acknowledgement.
#[derive(Debug, Serialize)]
pub struct MessageResponse {
    /// What happened
    pub message: &'static str,
}

/// Register a new account.
///
/// # Example
///
/// ```bash
/// curl -X POST http://localhost:8080/api/register \
///   -H "Content-Type: application/json" \
///   -d '{"email": "priya@example.com", "password": "secret"}'
/// ```
///
/// # Errors
///
/// 400 `All fields required.` or `Email already registered.`
pub async fn register(
    State(state): State<AppState>,
    ApiJson(request): ApiJson<RegisterRequest>,
) -> Result<Json<RegisterResponse>, AppError> {
    let user = state
        .accounts
        .register(Registration {
            username: request.username,
            email: request.email,
            password: request.password,
        })
        .await?;
    let token = state.sessions.issue(user.id).await;

    Ok(Json(RegisterResponse {
        message: "registered",
        user_id: user.id,
        token,
    }))
}

/// Log in.
///
/// # Errors
///
/// 400 `Invalid email or password.`
pub async fn login(
    State(state): State<AppState>,
    ApiJson(request): ApiJson<LoginRequest>,
) -> Result<Json<LoginResponse>, AppError> {
    let user = state
        .accounts
        .login(&request.email, &request.password)
        .await?;
    let token = state.sessions.issue(user.id).await;
    tracing::info!(user_id = %user.id, "Logged in");

    Ok(Json(LoginResponse {
        message: "logged in",
        token,
    }))
}

/// Log out, invalidating the presented token.
pub async fn logout(
    session: SessionUser,
    State(state): State<AppState>,
) -> Json<MessageResponse> {
    state.sessions.revoke(&session.token).await;
    tracing::info!(user_id = %session.user_id, "Logged out");
    Json(MessageResponse {
        message: "logged out",
    })
}
