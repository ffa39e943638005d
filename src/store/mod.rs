//! Ledger storage
//!
//! [`Store`] wraps the PostgreSQL connection pool and owns the two pieces
//! the rest of the system builds on:
//!
//! - [`Store::exec_tx`] - the transaction scope: runs a unit of work inside
//!   one read-committed read-write transaction and commits or rolls back as
//!   a whole.
//! - [`Store::transfer_tx`] - the funds transfer orchestrator built on top
//!   of it.
//!
//! The single-statement primitives live in [`queries`] and run against
//! either the pool or a transaction-bound connection.

pub mod error;
pub mod models;
pub mod queries;
pub mod schema;
pub mod transfer_tx;

#[cfg(test)]
mod integration_tests;

pub use error::StoreError;
pub use models::{Account, Entry, Session, Transfer, User};
pub use transfer_tx::{TransferTxParams, TransferTxResult};

use futures::future::BoxFuture;
use sqlx::PgConnection;
use sqlx::postgres::{PgPool, PgPoolOptions};
use std::time::Duration;

/// PostgreSQL-backed ledger store
#[derive(Clone)]
pub struct Store {
    pool: PgPool,
}

impl Store {
    /// Create a store with a fresh connection pool
    pub async fn connect(database_url: &str) -> Result<Self, StoreError> {
        let pool = PgPoolOptions::new()
            .max_connections(10)
            .acquire_timeout(Duration::from_secs(5))
            .connect(database_url)
            .await?;

        tracing::info!("PostgreSQL connection pool established");
        Ok(Self { pool })
    }

    /// Wrap an existing pool (tests)
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Get a reference to the connection pool
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Check database health
    pub async fn health_check(&self) -> Result<(), StoreError> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }

    /// Run a unit of work inside one database transaction.
    ///
    /// The transaction is opened read-committed and read-write; every
    /// primitive the unit of work performs through the supplied connection
    /// is visible only inside it until commit. On `Ok` the transaction is
    /// committed (a commit failure surfaces as a storage error); on `Err`
    /// it is rolled back, and if the rollback itself fails the returned
    /// error carries both causes. Either all writes become visible or none.
    ///
    /// No retries happen here; retry policy belongs to the caller. If the
    /// returned future is dropped before commit, the transaction is rolled
    /// back when the connection is released.
    pub async fn exec_tx<T, F>(&self, work: F) -> Result<T, StoreError>
    where
        F: for<'c> FnOnce(&'c mut PgConnection) -> BoxFuture<'c, Result<T, StoreError>>,
    {
        let mut tx = self.pool.begin().await.map_err(StoreError::from)?;

        sqlx::query("SET TRANSACTION ISOLATION LEVEL READ COMMITTED READ WRITE")
            .execute(&mut *tx)
            .await?;

        match work(&mut *tx).await {
            Ok(value) => {
                tx.commit().await.map_err(StoreError::from)?;
                Ok(value)
            }
            Err(err) => {
                if let Err(rollback_err) = tx.rollback().await {
                    return Err(StoreError::RollbackFailed {
                        cause: Box::new(err),
                        rollback: rollback_err.to_string(),
                    });
                }
                Err(err)
            }
        }
    }
}
