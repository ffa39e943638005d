//! Funds transfer orchestrator
//!
//! One transfer is five writes in one transaction scope: the transfer row,
//! a debit entry, a credit entry, and the two balance adjustments. The
//! adjustments always lock account rows in ascending id order, whichever
//! direction the money moves; two concurrent transfers over the same pair
//! of accounts therefore never wait on each other in a cycle.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::Store;
use super::error::StoreError;
use super::models::{Account, Entry, Transfer};
use super::queries;

/// Inputs for one funds movement. The caller has already validated that the
/// accounts exist, share a currency, and that `from_account_id !=
/// to_account_id`; `amount` is positive, in minor currency units.
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct TransferTxParams {
    pub from_account_id: i64,
    pub to_account_id: i64,
    pub amount: i64,
}

/// Everything a committed transfer produced, with post-adjustment balances
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct TransferTxResult {
    pub transfer: Transfer,
    pub from_account: Account,
    pub to_account: Account,
    pub from_entry: Entry,
    pub to_entry: Entry,
}

/// The two balance legs of a transfer, ordered by ascending account id.
///
/// Lock acquisition on `accounts` follows this order in every transfer,
/// regardless of which side is the source, so no two transfers can hold one
/// row lock each while waiting for the other's.
fn balance_update_order(from_account_id: i64, to_account_id: i64, amount: i64) -> [(i64, i64); 2] {
    if from_account_id < to_account_id {
        [(from_account_id, -amount), (to_account_id, amount)]
    } else {
        [(to_account_id, amount), (from_account_id, -amount)]
    }
}

impl Store {
    /// Move `amount` from one account to another as a single atomic unit.
    ///
    /// Inserts the transfer record and both ledger entries, then applies the
    /// two balance deltas in ascending account-id order. Any failure aborts
    /// the scope; nothing is persisted. A [`StoreError::ConcurrencyConflict`]
    /// left no durable trace and may be resubmitted by the caller - this
    /// method never retries internally.
    pub async fn transfer_tx(
        &self,
        params: TransferTxParams,
    ) -> Result<TransferTxResult, StoreError> {
        self.exec_tx(move |conn| {
            Box::pin(async move {
                let transfer = queries::create_transfer(
                    &mut *conn,
                    params.from_account_id,
                    params.to_account_id,
                    params.amount,
                )
                .await?;

                let from_entry =
                    queries::create_entry(&mut *conn, params.from_account_id, -params.amount)
                        .await?;

                let to_entry =
                    queries::create_entry(&mut *conn, params.to_account_id, params.amount).await?;

                let legs = balance_update_order(
                    params.from_account_id,
                    params.to_account_id,
                    params.amount,
                );
                let first = queries::add_account_balance(&mut *conn, legs[0].0, legs[0].1).await?;
                let second = queries::add_account_balance(&mut *conn, legs[1].0, legs[1].1).await?;

                let (from_account, to_account) = if first.id == params.from_account_id {
                    (first, second)
                } else {
                    (second, first)
                };

                Ok(TransferTxResult {
                    transfer,
                    from_account,
                    to_account,
                    from_entry,
                    to_entry,
                })
            })
        })
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_order_ascending_when_source_is_lower() {
        let legs = balance_update_order(1, 2, 50);
        assert_eq!(legs, [(1, -50), (2, 50)]);
    }

    #[test]
    fn test_order_ascending_when_source_is_higher() {
        // Opposite direction, same lock order
        let legs = balance_update_order(2, 1, 50);
        assert_eq!(legs, [(1, 50), (2, -50)]);
    }

    #[test]
    fn test_opposing_transfers_lock_in_same_order() {
        let a_to_b = balance_update_order(7, 3, 10);
        let b_to_a = balance_update_order(3, 7, 10);
        assert_eq!(a_to_b[0].0, b_to_a[0].0);
        assert_eq!(a_to_b[1].0, b_to_a[1].0);
    }

    #[test]
    fn test_legs_sum_to_zero() {
        for (from, to) in [(1i64, 9i64), (9, 1), (4, 4)] {
            let legs = balance_update_order(from, to, 25);
            assert_eq!(legs[0].1 + legs[1].1, 0);
        }
    }
}
