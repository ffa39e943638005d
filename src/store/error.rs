//! Storage error taxonomy
//!
//! Every primitive failure aborts the enclosing transaction scope and
//! propagates to the caller unchanged. `ConcurrencyConflict` is the one
//! class a caller may safely retry: the aborted attempt left no durable
//! trace.

use thiserror::Error;

/// Errors surfaced by the ledger storage layer
#[derive(Error, Debug)]
pub enum StoreError {
    /// Referenced row does not exist (missing record, or a foreign-key
    /// target absent at insert time)
    #[error("record not found")]
    NotFound,

    /// Uniqueness or check constraint violated
    #[error("constraint violation: {0}")]
    Conflict(String),

    /// PostgreSQL aborted the transaction to resolve a serialization
    /// failure or deadlock; the call can be resubmitted as-is
    #[error("concurrency conflict (retryable): {0}")]
    ConcurrencyConflict(String),

    /// Connection-level failure: connection loss, pool exhaustion, TLS
    #[error("storage transport failure: {0}")]
    Transport(String),

    /// Any other database error
    #[error("database error: {0}")]
    Database(String),

    /// The unit of work failed and the rollback failed too; both causes
    /// are preserved
    #[error("{cause}; rollback failed: {rollback}")]
    RollbackFailed {
        cause: Box<StoreError>,
        rollback: String,
    },
}

impl StoreError {
    /// True when the caller may resubmit the identical call
    pub fn is_retryable(&self) -> bool {
        matches!(self, StoreError::ConcurrencyConflict(_))
    }
}

// SQLSTATE classes:
//   40001 serialization_failure, 40P01 deadlock_detected
//   23503 foreign_key_violation, 23505 unique_violation
pub(crate) fn classify_sqlstate(code: &str, message: &str) -> StoreError {
    match code {
        "40001" | "40P01" => StoreError::ConcurrencyConflict(message.to_string()),
        "23503" => StoreError::NotFound,
        code if code.starts_with("23") => StoreError::Conflict(message.to_string()),
        _ => StoreError::Database(message.to_string()),
    }
}

impl From<sqlx::Error> for StoreError {
    fn from(e: sqlx::Error) -> Self {
        match &e {
            sqlx::Error::RowNotFound => StoreError::NotFound,
            sqlx::Error::Database(db) => match db.code() {
                Some(code) => classify_sqlstate(&code, db.message()),
                None => StoreError::Database(db.message().to_string()),
            },
            sqlx::Error::Io(_)
            | sqlx::Error::Tls(_)
            | sqlx::Error::Protocol(_)
            | sqlx::Error::PoolTimedOut
            | sqlx::Error::PoolClosed
            | sqlx::Error::WorkerCrashed => StoreError::Transport(e.to_string()),
            _ => StoreError::Database(e.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_serialization_failure() {
        let err = classify_sqlstate("40001", "could not serialize access");
        assert!(matches!(err, StoreError::ConcurrencyConflict(_)));
        assert!(err.is_retryable());
    }

    #[test]
    fn test_classify_deadlock() {
        let err = classify_sqlstate("40P01", "deadlock detected");
        assert!(matches!(err, StoreError::ConcurrencyConflict(_)));
        assert!(err.is_retryable());
    }

    #[test]
    fn test_classify_unique_violation() {
        let err = classify_sqlstate("23505", "duplicate key value");
        assert!(matches!(err, StoreError::Conflict(_)));
        assert!(!err.is_retryable());
    }

    #[test]
    fn test_classify_foreign_key_violation() {
        // Inserting an entry for a nonexistent account surfaces as NotFound
        let err = classify_sqlstate("23503", "violates foreign key constraint");
        assert!(matches!(err, StoreError::NotFound));
    }

    #[test]
    fn test_classify_unknown_code() {
        let err = classify_sqlstate("57014", "canceling statement");
        assert!(matches!(err, StoreError::Database(_)));
    }

    #[test]
    fn test_rollback_failure_reports_both_causes() {
        let err = StoreError::RollbackFailed {
            cause: Box::new(StoreError::NotFound),
            rollback: "connection reset".to_string(),
        };
        let msg = err.to_string();
        assert!(msg.contains("record not found"));
        assert!(msg.contains("connection reset"));
    }
}
