//! Embedded PostgreSQL schema
//!
//! Statements are idempotent so `init_schema` can run on every startup and
//! in test setup.

use super::Store;
use super::error::StoreError;

const CREATE_USERS_TABLE: &str = r#"
CREATE TABLE IF NOT EXISTS users (
    username        varchar PRIMARY KEY,
    hashed_password varchar NOT NULL,
    full_name       varchar NOT NULL,
    email           varchar NOT NULL UNIQUE,
    created_at      timestamptz NOT NULL DEFAULT now()
)
"#;

const CREATE_ACCOUNTS_TABLE: &str = r#"
CREATE TABLE IF NOT EXISTS accounts (
    id         bigserial PRIMARY KEY,
    owner      varchar NOT NULL REFERENCES users (username),
    balance    bigint NOT NULL,
    currency   varchar NOT NULL,
    created_at timestamptz NOT NULL DEFAULT now(),
    UNIQUE (owner, currency)
)
"#;

const CREATE_ENTRIES_TABLE: &str = r#"
CREATE TABLE IF NOT EXISTS entries (
    id         bigserial PRIMARY KEY,
    account_id bigint NOT NULL REFERENCES accounts (id),
    amount     bigint NOT NULL,
    created_at timestamptz NOT NULL DEFAULT now()
)
"#;

const CREATE_TRANSFERS_TABLE: &str = r#"
CREATE TABLE IF NOT EXISTS transfers (
    id              bigserial PRIMARY KEY,
    from_account_id bigint NOT NULL REFERENCES accounts (id),
    to_account_id   bigint NOT NULL REFERENCES accounts (id),
    amount          bigint NOT NULL,
    created_at      timestamptz NOT NULL DEFAULT now(),
    CHECK (amount > 0)
)
"#;

const CREATE_SESSIONS_TABLE: &str = r#"
CREATE TABLE IF NOT EXISTS sessions (
    id            uuid PRIMARY KEY,
    username      varchar NOT NULL REFERENCES users (username),
    refresh_token varchar NOT NULL,
    is_blocked    boolean NOT NULL DEFAULT false,
    expires_at    timestamptz NOT NULL,
    created_at    timestamptz NOT NULL DEFAULT now()
)
"#;

const CREATE_ENTRIES_ACCOUNT_IDX: &str =
    "CREATE INDEX IF NOT EXISTS entries_account_id_idx ON entries (account_id)";

const CREATE_TRANSFERS_FROM_IDX: &str =
    "CREATE INDEX IF NOT EXISTS transfers_from_account_id_idx ON transfers (from_account_id)";

const CREATE_TRANSFERS_TO_IDX: &str =
    "CREATE INDEX IF NOT EXISTS transfers_to_account_id_idx ON transfers (to_account_id)";

impl Store {
    /// Create all ledger tables and indexes if they do not exist yet
    pub async fn init_schema(&self) -> Result<(), StoreError> {
        tracing::info!("Initializing ledger schema");

        for statement in [
            CREATE_USERS_TABLE,
            CREATE_ACCOUNTS_TABLE,
            CREATE_ENTRIES_TABLE,
            CREATE_TRANSFERS_TABLE,
            CREATE_SESSIONS_TABLE,
            CREATE_ENTRIES_ACCOUNT_IDX,
            CREATE_TRANSFERS_FROM_IDX,
            CREATE_TRANSFERS_TO_IDX,
        ] {
            sqlx::query(statement).execute(self.pool()).await?;
        }

        tracing::info!("Ledger schema ready");
        Ok(())
    }
}
