//! Bearer-token authentication middleware

use axum::{
    body::Body,
    extract::State,
    http::{Request, header},
    middleware::Next,
    response::Response,
};
use std::sync::Arc;

use super::error::ApiError;
use super::state::AppState;

/// Verify the `Authorization: Bearer <token>` header and inject the claims
/// into request extensions for handlers to pick up
pub async fn bearer_auth(
    State(state): State<Arc<AppState>>,
    mut request: Request<Body>,
    next: Next,
) -> Result<Response, ApiError> {
    let auth_header = request
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .ok_or_else(|| ApiError::unauthorized("missing authorization header"))?;

    let token = auth_header
        .strip_prefix("Bearer ")
        .or_else(|| auth_header.strip_prefix("bearer "))
        .ok_or_else(|| ApiError::unauthorized("invalid authorization header format"))?;

    let claims = state
        .tokens
        .verify_token(token)
        .map_err(|_| ApiError::unauthorized("invalid or expired token"))?;

    request.extensions_mut().insert(claims);
    Ok(next.run(request).await)
}
