//! Funds transfer endpoint
//!
//! The HTTP layer is the validating caller the engine assumes: it checks
//! that both accounts exist and carry the requested currency, that the
//! source belongs to the authenticated user, and that source and
//! destination differ, before handing the ids to the ledger engine.

use axum::{Extension, Json, extract::State};
use serde::Deserialize;
use std::sync::Arc;
use utoipa::ToSchema;
use validator::Validate;

use crate::auth::Claims;
use crate::currency;
use crate::store::models::Account;
use crate::store::queries;
use crate::store::{TransferTxParams, TransferTxResult};

use super::super::error::{ApiError, ErrorResponse};
use super::super::state::AppState;

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct TransferRequest {
    pub from_account_id: i64,
    pub to_account_id: i64,
    /// Positive, in the minor unit of the shared currency
    #[validate(range(min = 1))]
    pub amount: i64,
    pub currency: String,
}

/// Move funds between two accounts of the same currency
#[utoipa::path(
    post,
    path = "/transfers",
    request_body = TransferRequest,
    responses(
        (status = 200, description = "Transfer committed", body = TransferTxResult),
        (status = 400, description = "Invalid request or currency mismatch", body = ErrorResponse),
        (status = 403, description = "Source account belongs to another user", body = ErrorResponse),
        (status = 404, description = "Unknown account", body = ErrorResponse),
        (status = 409, description = "Concurrency conflict, safe to retry", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "transfers"
)]
pub async fn create_transfer(
    State(state): State<Arc<AppState>>,
    Extension(claims): Extension<Claims>,
    Json(req): Json<TransferRequest>,
) -> Result<Json<TransferTxResult>, ApiError> {
    req.validate()
        .map_err(|e| ApiError::bad_request(e.to_string()))?;

    if req.from_account_id == req.to_account_id {
        return Err(ApiError::bad_request(
            "source and destination account must differ",
        ));
    }
    if !currency::is_supported(&req.currency) {
        return Err(ApiError::bad_request(format!(
            "unsupported currency: {}",
            req.currency
        )));
    }

    let from_account = validate_currency(&state, req.from_account_id, &req.currency).await?;
    if from_account.owner != claims.sub {
        return Err(ApiError::forbidden(
            "from account belongs to another user",
        ));
    }
    validate_currency(&state, req.to_account_id, &req.currency).await?;

    let result = state
        .store
        .transfer_tx(TransferTxParams {
            from_account_id: req.from_account_id,
            to_account_id: req.to_account_id,
            amount: req.amount,
        })
        .await?;

    tracing::info!(
        transfer_id = result.transfer.id,
        from = req.from_account_id,
        to = req.to_account_id,
        amount = req.amount,
        "transfer committed"
    );
    Ok(Json(result))
}

async fn validate_currency(
    state: &AppState,
    account_id: i64,
    wanted: &str,
) -> Result<Account, ApiError> {
    let account = queries::get_account(state.store.pool(), account_id).await?;
    if account.currency != wanted {
        return Err(ApiError::bad_request(format!(
            "account {} holds {}, transfer is in {}",
            account_id, account.currency, wanted
        )));
    }
    Ok(account)
}
