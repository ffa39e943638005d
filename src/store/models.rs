//! Ledger row types

use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;

/// A bank account: one owner, one currency, integer balance in minor units.
///
/// The balance is only ever mutated through a relative adjustment inside a
/// transaction scope (`add_account_balance`).
#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
pub struct Account {
    pub id: i64,
    pub owner: String,
    pub balance: i64,
    pub currency: String,
    pub created_at: DateTime<Utc>,
}

/// An immutable ledger line: one signed amount against one account.
/// Positive is a credit, negative a debit. Entries are append-only.
#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
pub struct Entry {
    pub id: i64,
    pub account_id: i64,
    pub amount: i64,
    pub created_at: DateTime<Utc>,
}

/// Record of one funds movement between two accounts. Append-only;
/// the amount is always positive.
#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
pub struct Transfer {
    pub id: i64,
    pub from_account_id: i64,
    pub to_account_id: i64,
    pub amount: i64,
    pub created_at: DateTime<Utc>,
}

/// A registered user; accounts are keyed to the username.
#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
pub struct User {
    pub username: String,
    #[serde(skip_serializing)]
    pub hashed_password: String,
    pub full_name: String,
    pub email: String,
    pub created_at: DateTime<Utc>,
}

/// A refresh-token session. The id is the refresh token's token id claim.
#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
pub struct Session {
    pub id: Uuid,
    pub username: String,
    #[serde(skip_serializing)]
    pub refresh_token: String,
    pub is_blocked: bool,
    pub expires_at: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
}
