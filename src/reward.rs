//! Epoch reward calculation
//!
//! The per-epoch reward constant rarely divides the epoch length evenly;
//! the leftover shannons are paid one extra each to the first blocks of the
//! epoch so the epoch's total payout is exact.

use crate::types::{Capacity, EpochInfo, RewardBreakdown};
use crate::Result;
use async_trait::async_trait;
use tracing::warn;

/// Blocks below this height predate reward finalization and earn nothing
pub const EARLIEST_REWARD_BLOCK: u64 = 12;

// Packed epoch header field, from low to high bits:
// 24-bit epoch number | 16-bit block index | 16-bit epoch length
const EPOCH_NUMBER_MASK: u64 = 0x00ff_ffff;
const BLOCK_INDEX_SHIFT: u32 = 24;
const BLOCK_INDEX_MASK: u64 = 0xffff;
const EPOCH_LENGTH_SHIFT: u32 = 40;
const EPOCH_LENGTH_MASK: u64 = 0xffff;

/// Source of epoch parameters for blocks whose header cannot supply them
#[async_trait]
pub trait EpochProvider: Send + Sync {
    /// Fetch epoch parameters by epoch number
    async fn get_epoch_by_number(&self, number: u64) -> Result<EpochInfo>;
}

/// Base block subsidy for a block in the given epoch
///
/// The epoch reward is floor-divided across the epoch; blocks within the
/// first `epoch_reward % length` positions receive one extra shannon.
pub fn base_reward(block_number: u64, epoch: &EpochInfo, epoch_reward: u64) -> Capacity {
    if block_number < EARLIEST_REWARD_BLOCK {
        return Capacity::zero();
    }
    if epoch.length == 0 {
        warn!(epoch = epoch.number, "epoch reports zero length, no base reward");
        return Capacity::zero();
    }

    let base = epoch_reward / epoch.length;
    let remainder = epoch_reward % epoch.length;
    if block_number >= epoch.start_number && block_number < epoch.start_number + remainder {
        Capacity::shannons(base + 1)
    } else {
        Capacity::shannons(base)
    }
}

/// Primary issuance earned by a block's miner
pub fn primary_reward(block_number: u64, details: &RewardBreakdown) -> Capacity {
    if block_number == 0 {
        Capacity::zero()
    } else {
        details.primary
    }
}

/// Secondary issuance earned by a block's miner
pub fn secondary_reward(block_number: u64, details: &RewardBreakdown) -> Capacity {
    if block_number == 0 {
        Capacity::zero()
    } else {
        details.secondary
    }
}

/// Total issuance reward for a block
pub fn block_reward(block_number: u64, details: &RewardBreakdown) -> Capacity {
    Capacity::shannons(
        primary_reward(block_number, details).value()
            + secondary_reward(block_number, details).value(),
    )
}

/// Unpack the epoch header field of a block
///
/// Returns `None` for a zero field (the genesis block's header carries no
/// epoch parameters); callers fall back to an [`EpochProvider`] there. The
/// bitfields are extracted by masking and shifting, never by slicing a
/// formatted representation.
pub fn parse_epoch_info(epoch_field: u64, block_number: u64) -> Option<EpochInfo> {
    if epoch_field == 0 {
        return None;
    }

    let number = epoch_field & EPOCH_NUMBER_MASK;
    let block_index = (epoch_field >> BLOCK_INDEX_SHIFT) & BLOCK_INDEX_MASK;
    let length = (epoch_field >> EPOCH_LENGTH_SHIFT) & EPOCH_LENGTH_MASK;

    Some(EpochInfo {
        number,
        length,
        start_number: block_number.saturating_sub(block_index),
    })
}
