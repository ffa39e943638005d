//! Single-statement ledger primitives
//!
//! Each function runs exactly one SQL statement against the executor it is
//! given: the pool for standalone reads and writes, or a transaction-bound
//! connection inside [`Store::exec_tx`](super::Store::exec_tx). Writes use
//! `RETURNING` so the caller always gets the row as stored.

use chrono::{DateTime, Utc};
use sqlx::PgExecutor;
use uuid::Uuid;

use super::error::StoreError;
use super::models::{Account, Entry, Session, Transfer, User};

// === Accounts ===

pub async fn create_account(
    db: impl PgExecutor<'_>,
    owner: &str,
    balance: i64,
    currency: &str,
) -> Result<Account, StoreError> {
    let account = sqlx::query_as::<_, Account>(
        r#"INSERT INTO accounts (owner, balance, currency)
           VALUES ($1, $2, $3)
           RETURNING id, owner, balance, currency, created_at"#,
    )
    .bind(owner)
    .bind(balance)
    .bind(currency)
    .fetch_one(db)
    .await?;

    Ok(account)
}

pub async fn get_account(db: impl PgExecutor<'_>, id: i64) -> Result<Account, StoreError> {
    let account = sqlx::query_as::<_, Account>(
        r#"SELECT id, owner, balance, currency, created_at
           FROM accounts WHERE id = $1"#,
    )
    .bind(id)
    .fetch_one(db)
    .await?;

    Ok(account)
}

pub async fn list_accounts(
    db: impl PgExecutor<'_>,
    owner: &str,
    limit: i64,
    offset: i64,
) -> Result<Vec<Account>, StoreError> {
    let accounts = sqlx::query_as::<_, Account>(
        r#"SELECT id, owner, balance, currency, created_at
           FROM accounts
           WHERE owner = $1
           ORDER BY id
           LIMIT $2 OFFSET $3"#,
    )
    .bind(owner)
    .bind(limit)
    .bind(offset)
    .fetch_all(db)
    .await?;

    Ok(accounts)
}

/// Overwrite an account balance. Administrative; transfers never use this -
/// they go through [`add_account_balance`].
pub async fn update_account(
    db: impl PgExecutor<'_>,
    id: i64,
    balance: i64,
) -> Result<Account, StoreError> {
    let account = sqlx::query_as::<_, Account>(
        r#"UPDATE accounts SET balance = $2
           WHERE id = $1
           RETURNING id, owner, balance, currency, created_at"#,
    )
    .bind(id)
    .bind(balance)
    .fetch_one(db)
    .await?;

    Ok(account)
}

/// Atomic relative balance adjustment. The read-add-write happens inside the
/// one UPDATE statement, so concurrent adjustments to the same account
/// serialize on the row lock and no update is lost.
pub async fn add_account_balance(
    db: impl PgExecutor<'_>,
    id: i64,
    delta: i64,
) -> Result<Account, StoreError> {
    let account = sqlx::query_as::<_, Account>(
        r#"UPDATE accounts SET balance = balance + $2
           WHERE id = $1
           RETURNING id, owner, balance, currency, created_at"#,
    )
    .bind(id)
    .bind(delta)
    .fetch_one(db)
    .await?;

    Ok(account)
}

pub async fn delete_account(db: impl PgExecutor<'_>, id: i64) -> Result<(), StoreError> {
    let result = sqlx::query("DELETE FROM accounts WHERE id = $1")
        .bind(id)
        .execute(db)
        .await?;

    if result.rows_affected() == 0 {
        return Err(StoreError::NotFound);
    }
    Ok(())
}

// === Entries ===

pub async fn create_entry(
    db: impl PgExecutor<'_>,
    account_id: i64,
    amount: i64,
) -> Result<Entry, StoreError> {
    let entry = sqlx::query_as::<_, Entry>(
        r#"INSERT INTO entries (account_id, amount)
           VALUES ($1, $2)
           RETURNING id, account_id, amount, created_at"#,
    )
    .bind(account_id)
    .bind(amount)
    .fetch_one(db)
    .await?;

    Ok(entry)
}

pub async fn get_entry(db: impl PgExecutor<'_>, id: i64) -> Result<Entry, StoreError> {
    let entry = sqlx::query_as::<_, Entry>(
        r#"SELECT id, account_id, amount, created_at FROM entries WHERE id = $1"#,
    )
    .bind(id)
    .fetch_one(db)
    .await?;

    Ok(entry)
}

pub async fn list_entries(
    db: impl PgExecutor<'_>,
    account_id: i64,
    limit: i64,
    offset: i64,
) -> Result<Vec<Entry>, StoreError> {
    let entries = sqlx::query_as::<_, Entry>(
        r#"SELECT id, account_id, amount, created_at
           FROM entries
           WHERE account_id = $1
           ORDER BY id
           LIMIT $2 OFFSET $3"#,
    )
    .bind(account_id)
    .bind(limit)
    .bind(offset)
    .fetch_all(db)
    .await?;

    Ok(entries)
}

// === Transfers ===

pub async fn create_transfer(
    db: impl PgExecutor<'_>,
    from_account_id: i64,
    to_account_id: i64,
    amount: i64,
) -> Result<Transfer, StoreError> {
    let transfer = sqlx::query_as::<_, Transfer>(
        r#"INSERT INTO transfers (from_account_id, to_account_id, amount)
           VALUES ($1, $2, $3)
           RETURNING id, from_account_id, to_account_id, amount, created_at"#,
    )
    .bind(from_account_id)
    .bind(to_account_id)
    .bind(amount)
    .fetch_one(db)
    .await?;

    Ok(transfer)
}

pub async fn get_transfer(db: impl PgExecutor<'_>, id: i64) -> Result<Transfer, StoreError> {
    let transfer = sqlx::query_as::<_, Transfer>(
        r#"SELECT id, from_account_id, to_account_id, amount, created_at
           FROM transfers WHERE id = $1"#,
    )
    .bind(id)
    .fetch_one(db)
    .await?;

    Ok(transfer)
}

// === Users ===

pub async fn create_user(
    db: impl PgExecutor<'_>,
    username: &str,
    hashed_password: &str,
    full_name: &str,
    email: &str,
) -> Result<User, StoreError> {
    let user = sqlx::query_as::<_, User>(
        r#"INSERT INTO users (username, hashed_password, full_name, email)
           VALUES ($1, $2, $3, $4)
           RETURNING username, hashed_password, full_name, email, created_at"#,
    )
    .bind(username)
    .bind(hashed_password)
    .bind(full_name)
    .bind(email)
    .fetch_one(db)
    .await?;

    Ok(user)
}

pub async fn get_user(db: impl PgExecutor<'_>, username: &str) -> Result<User, StoreError> {
    let user = sqlx::query_as::<_, User>(
        r#"SELECT username, hashed_password, full_name, email, created_at
           FROM users WHERE username = $1"#,
    )
    .bind(username)
    .fetch_one(db)
    .await?;

    Ok(user)
}

// === Sessions ===

pub async fn create_session(
    db: impl PgExecutor<'_>,
    id: Uuid,
    username: &str,
    refresh_token: &str,
    expires_at: DateTime<Utc>,
) -> Result<Session, StoreError> {
    let session = sqlx::query_as::<_, Session>(
        r#"INSERT INTO sessions (id, username, refresh_token, expires_at)
           VALUES ($1, $2, $3, $4)
           RETURNING id, username, refresh_token, is_blocked, expires_at, created_at"#,
    )
    .bind(id)
    .bind(username)
    .bind(refresh_token)
    .bind(expires_at)
    .fetch_one(db)
    .await?;

    Ok(session)
}

pub async fn get_session(db: impl PgExecutor<'_>, id: Uuid) -> Result<Session, StoreError> {
    let session = sqlx::query_as::<_, Session>(
        r#"SELECT id, username, refresh_token, is_blocked, expires_at, created_at
           FROM sessions WHERE id = $1"#,
    )
    .bind(id)
    .fetch_one(db)
    .await?;

    Ok(session)
}
