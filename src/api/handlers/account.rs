//! Account endpoints

use axum::{
    Extension, Json,
    extract::{Path, Query, State},
};
use serde::Deserialize;
use std::sync::Arc;
use utoipa::ToSchema;
use validator::Validate;

use crate::auth::Claims;
use crate::currency;
use crate::store::models::Account;
use crate::store::queries;

use super::super::error::{ApiError, ErrorResponse};
use super::super::state::AppState;

#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateAccountRequest {
    pub currency: String,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct ListAccountsQuery {
    #[validate(range(min = 1, max = 10))]
    pub page_size: i64,
    #[validate(range(min = 1))]
    pub page_number: i64,
}

/// Open an account for the authenticated user. One account per
/// owner+currency pair; the opening balance is zero.
#[utoipa::path(
    post,
    path = "/accounts",
    request_body = CreateAccountRequest,
    responses(
        (status = 200, description = "Account created", body = Account),
        (status = 400, description = "Unsupported currency", body = ErrorResponse),
        (status = 409, description = "Account already exists for this currency", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "accounts"
)]
pub async fn create_account(
    State(state): State<Arc<AppState>>,
    Extension(claims): Extension<Claims>,
    Json(req): Json<CreateAccountRequest>,
) -> Result<Json<Account>, ApiError> {
    if !currency::is_supported(&req.currency) {
        return Err(ApiError::bad_request(format!(
            "unsupported currency: {}",
            req.currency
        )));
    }

    let account =
        queries::create_account(state.store.pool(), &claims.sub, 0, &req.currency).await?;

    tracing::info!(account_id = account.id, owner = %account.owner, currency = %account.currency, "account created");
    Ok(Json(account))
}

/// Fetch one of the authenticated user's accounts
#[utoipa::path(
    get,
    path = "/accounts/{id}",
    params(("id" = i64, Path, description = "Account id")),
    responses(
        (status = 200, description = "The account", body = Account),
        (status = 403, description = "Account belongs to another user", body = ErrorResponse),
        (status = 404, description = "No such account", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "accounts"
)]
pub async fn get_account(
    State(state): State<Arc<AppState>>,
    Extension(claims): Extension<Claims>,
    Path(id): Path<i64>,
) -> Result<Json<Account>, ApiError> {
    let account = queries::get_account(state.store.pool(), id).await?;

    if account.owner != claims.sub {
        return Err(ApiError::forbidden("account belongs to another user"));
    }

    Ok(Json(account))
}

/// List the authenticated user's accounts, paginated
#[utoipa::path(
    get,
    path = "/accounts",
    params(
        ("page_size" = i64, Query, description = "Accounts per page (1-10)"),
        ("page_number" = i64, Query, description = "1-based page number")
    ),
    responses(
        (status = 200, description = "Accounts", body = [Account]),
        (status = 400, description = "Invalid pagination", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "accounts"
)]
pub async fn list_accounts(
    State(state): State<Arc<AppState>>,
    Extension(claims): Extension<Claims>,
    Query(query): Query<ListAccountsQuery>,
) -> Result<Json<Vec<Account>>, ApiError> {
    query
        .validate()
        .map_err(|e| ApiError::bad_request(e.to_string()))?;

    let accounts = queries::list_accounts(
        state.store.pool(),
        &claims.sub,
        query.page_size,
        (query.page_number - 1) * query.page_size,
    )
    .await?;

    Ok(Json(accounts))
}
