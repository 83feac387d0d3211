//! Nervos DAO interest and transaction fees
//!
//! A withdrawing cell's interest is the externally computed maximum
//! withdrawable amount minus the original deposit capacity. The oracle
//! answering that question is a slow, fallible RPC; a failed lookup counts
//! the cell at zero interest instead of aborting the batch, and the
//! fallback is logged so callers can still observe it.

use crate::types::{Byte32, Capacity, OutPoint};
use crate::Result;
use async_trait::async_trait;
use futures::future::join_all;
use tracing::warn;

/// A DAO withdrawing cell, as supplied by the persistence layer
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WithdrawingCell {
    /// Input index of this cell within the transaction that generated it
    pub cell_index: u32,
    /// Hash of the block containing the withdrawing cell
    pub block_hash: Byte32,
}

/// The deposit cell a withdrawal originates from
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DepositCell {
    pub out_point: OutPoint,
    pub capacity: Capacity,
}

/// Resolves a withdrawing cell back to its originating deposit
///
/// Implemented over the persistence layer: the deposit is the input at the
/// same index of the transaction that generated the withdrawing cell.
pub trait DepositResolver: Send + Sync {
    fn resolve_deposit(&self, withdrawing: &WithdrawingCell) -> Result<DepositCell>;
}

/// External maximum-withdraw oracle
///
/// A potentially slow, retryable node call; retry and timeout policy belong
/// to the implementation, not to the interest calculation.
#[async_trait]
pub trait WithdrawOracle: Send + Sync {
    async fn max_withdraw(
        &self,
        deposit: &OutPoint,
        withdrawing_block_hash: &Byte32,
    ) -> Result<Capacity>;
}

/// Interest accrued by one withdrawing cell
///
/// Deposit-resolution failures propagate; oracle failures are recovered
/// locally to zero interest, excluding the cell from reward accounting
/// rather than failing the whole batch.
pub async fn withdrawal_interest(
    withdrawing: &WithdrawingCell,
    deposits: &dyn DepositResolver,
    oracle: &dyn WithdrawOracle,
) -> Result<Capacity> {
    let deposit = deposits.resolve_deposit(withdrawing)?;

    match oracle
        .max_withdraw(&deposit.out_point, &withdrawing.block_hash)
        .await
    {
        Ok(max_withdraw) => {
            if max_withdraw < deposit.capacity {
                warn!(
                    max_withdraw = max_withdraw.value(),
                    deposit = deposit.capacity.value(),
                    "maximum withdraw below deposit capacity"
                );
            }
            Ok(max_withdraw.saturating_sub(deposit.capacity))
        }
        Err(err) => {
            warn!(
                error = %err,
                category = err.category(),
                "maximum-withdraw lookup failed, counting zero interest"
            );
            Ok(Capacity::zero())
        }
    }
}

/// Capacity totals and DAO inputs of one transaction
#[derive(Debug, Clone, Default)]
pub struct TransactionSummary {
    /// Sum of all input capacities
    pub input_capacity: Capacity,
    /// Sum of all output capacities
    pub output_capacity: Capacity,
    /// DAO withdrawing cells among the inputs, if any
    pub withdrawing_cells: Vec<WithdrawingCell>,
}

impl TransactionSummary {
    /// Whether the transaction withdraws from the DAO
    pub fn is_dao_withdrawal(&self) -> bool {
        !self.withdrawing_cells.is_empty()
    }
}

/// Fee of an ordinary transaction
///
/// Signed: a negative fee means outputs exceed inputs, an anomaly that is
/// surfaced rather than hidden.
pub fn normal_transaction_fee(input_capacity: Capacity, output_capacity: Capacity) -> i64 {
    input_capacity.value() as i64 - output_capacity.value() as i64
}

/// Fee of a DAO-withdrawal transaction: inputs plus accrued interest minus
/// outputs
pub async fn dao_withdraw_transaction_fee(
    summary: &TransactionSummary,
    deposits: &dyn DepositResolver,
    oracle: &dyn WithdrawOracle,
) -> Result<i64> {
    let interests = join_all(
        summary
            .withdrawing_cells
            .iter()
            .map(|cell| withdrawal_interest(cell, deposits, oracle)),
    )
    .await;

    let mut total_interest: i64 = 0;
    for interest in interests {
        total_interest += interest?.value() as i64;
    }

    Ok(summary.input_capacity.value() as i64 + total_interest
        - summary.output_capacity.value() as i64)
}

/// Fee of a transaction, dispatching on whether it withdraws from the DAO
pub async fn transaction_fee(
    summary: &TransactionSummary,
    deposits: &dyn DepositResolver,
    oracle: &dyn WithdrawOracle,
) -> Result<i64> {
    if summary.is_dao_withdrawal() {
        dao_withdraw_transaction_fee(summary, deposits, oracle).await
    } else {
        Ok(normal_transaction_fee(
            summary.input_capacity,
            summary.output_capacity,
        ))
    }
}
