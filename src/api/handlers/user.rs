//! User registration, login, and token renewal

use axum::{Json, extract::State};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::auth;
use crate::store::models::User;
use crate::store::queries;

use super::super::error::{ApiError, ErrorResponse};
use super::super::state::AppState;

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateUserRequest {
    #[validate(length(min = 3, max = 32))]
    pub username: String,
    #[validate(length(min = 6))]
    pub password: String,
    #[validate(length(min = 1))]
    pub full_name: String,
    #[validate(email)]
    pub email: String,
}

/// User data safe to return; never carries the password hash
#[derive(Debug, Serialize, ToSchema)]
pub struct UserInfoResponse {
    pub username: String,
    pub full_name: String,
    pub email: String,
    pub created_at: DateTime<Utc>,
}

impl From<User> for UserInfoResponse {
    fn from(user: User) -> Self {
        Self {
            username: user.username,
            full_name: user.full_name,
            email: user.email,
            created_at: user.created_at,
        }
    }
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct LoginRequest {
    #[validate(length(min = 1))]
    pub username: String,
    #[validate(length(min = 1))]
    pub password: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct LoginResponse {
    pub session_id: Uuid,
    pub user: UserInfoResponse,
    pub access_token: String,
    pub access_token_expires_at: DateTime<Utc>,
    pub refresh_token: String,
    pub refresh_token_expires_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct RenewAccessTokenRequest {
    pub refresh_token: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct RenewAccessTokenResponse {
    pub access_token: String,
    pub access_token_expires_at: DateTime<Utc>,
}

/// Register a new user
#[utoipa::path(
    post,
    path = "/users",
    request_body = CreateUserRequest,
    responses(
        (status = 200, description = "User created", body = UserInfoResponse),
        (status = 400, description = "Invalid request", body = ErrorResponse),
        (status = 409, description = "Username or email taken", body = ErrorResponse)
    ),
    tag = "users"
)]
pub async fn create_user(
    State(state): State<Arc<AppState>>,
    Json(req): Json<CreateUserRequest>,
) -> Result<Json<UserInfoResponse>, ApiError> {
    req.validate()
        .map_err(|e| ApiError::bad_request(e.to_string()))?;

    let hashed = auth::hash_password(&req.password)?;
    let user = queries::create_user(
        state.store.pool(),
        &req.username,
        &hashed,
        &req.full_name,
        &req.email,
    )
    .await?;

    tracing::info!(username = %user.username, "user registered");
    Ok(Json(user.into()))
}

/// Log in: verify the password, mint an access and a refresh token, and
/// persist a session keyed by the refresh token's id
#[utoipa::path(
    post,
    path = "/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Logged in", body = LoginResponse),
        (status = 401, description = "Bad credentials", body = ErrorResponse),
        (status = 404, description = "Unknown user", body = ErrorResponse)
    ),
    tag = "users"
)]
pub async fn login(
    State(state): State<Arc<AppState>>,
    Json(req): Json<LoginRequest>,
) -> Result<Json<LoginResponse>, ApiError> {
    req.validate()
        .map_err(|e| ApiError::bad_request(e.to_string()))?;

    let user = queries::get_user(state.store.pool(), &req.username).await?;
    auth::verify_password(&req.password, &user.hashed_password)?;

    let (access_token, access_claims) = state
        .tokens
        .create_token(&user.username, state.auth.access_token_ttl_secs)?;
    let (refresh_token, refresh_claims) = state
        .tokens
        .create_token(&user.username, state.auth.refresh_token_ttl_secs)?;

    let session = queries::create_session(
        state.store.pool(),
        refresh_claims.token_id()?,
        &user.username,
        &refresh_token,
        refresh_claims.expires_at(),
    )
    .await?;

    tracing::info!(username = %user.username, session_id = %session.id, "login");
    Ok(Json(LoginResponse {
        session_id: session.id,
        user: user.into(),
        access_token,
        access_token_expires_at: access_claims.expires_at(),
        refresh_token,
        refresh_token_expires_at: refresh_claims.expires_at(),
    }))
}

/// Issue a fresh access token from a valid refresh token
#[utoipa::path(
    post,
    path = "/tokens/renew",
    request_body = RenewAccessTokenRequest,
    responses(
        (status = 200, description = "Token renewed", body = RenewAccessTokenResponse),
        (status = 401, description = "Invalid refresh token or session", body = ErrorResponse)
    ),
    tag = "users"
)]
pub async fn renew_access_token(
    State(state): State<Arc<AppState>>,
    Json(req): Json<RenewAccessTokenRequest>,
) -> Result<Json<RenewAccessTokenResponse>, ApiError> {
    let claims = state.tokens.verify_token(&req.refresh_token)?;
    let session = queries::get_session(state.store.pool(), claims.token_id()?).await?;

    if session.is_blocked {
        return Err(ApiError::unauthorized("session is blocked"));
    }
    if session.username != claims.sub {
        return Err(ApiError::unauthorized("session user mismatch"));
    }
    if session.refresh_token != req.refresh_token {
        return Err(ApiError::unauthorized("refresh token mismatch"));
    }
    if Utc::now() > session.expires_at {
        return Err(ApiError::unauthorized("session expired"));
    }

    let (access_token, access_claims) = state
        .tokens
        .create_token(&session.username, state.auth.access_token_ttl_secs)?;

    Ok(Json(RenewAccessTokenResponse {
        access_token,
        access_token_expires_at: access_claims.expires_at(),
    }))
}
