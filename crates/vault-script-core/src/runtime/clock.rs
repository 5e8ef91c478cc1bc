// crates/vault-script-core/src/runtime/clock.rs
// ============================================================================
// Module: Vault Script Time Advancement
// Description: Forward clock jumps for `wait:` lines.
// Purpose: Move ledger time and confirm it before the next line runs.
// Dependencies: crate::{core, interfaces, runtime}
// ============================================================================

//! ## Overview
//! A jump reads the latest block timestamp, moves the clock to
//! `latest + duration` and then mines one more block so time-gated reads
//! (reward vesting, cooldown expiry) observe the new time. Time never moves
//! backward; a zero duration only mines.

// ============================================================================
// SECTION: Imports
// ============================================================================

use crate::core::time::WaitDuration;
use crate::interfaces::TimeControl;
use crate::interfaces::TxReceipt;
use crate::runtime::error::ScriptError;

// ============================================================================
// SECTION: Advance
// ============================================================================

/// Advances `clock` by `duration` and mines a confirmation block.
///
/// # Errors
///
/// Returns [`ScriptError::TimeOverflow`] when the target time does not fit
/// in `u64`, or [`ScriptError::Ledger`] when the clock rejects the jump.
pub async fn advance<C>(clock: &C, duration: WaitDuration) -> Result<TxReceipt, ScriptError>
where
    C: TimeControl + ?Sized,
{
    let overflow = || ScriptError::TimeOverflow {
        seconds_label: duration.to_string(),
    };
    let seconds = duration.as_secs().ok_or_else(overflow)?;
    if seconds > 0 {
        let latest = clock.latest_timestamp().await?;
        let target = latest.checked_add(seconds).ok_or_else(overflow)?;
        clock.increase_time_to(target).await?;
    }
    Ok(clock.force_mine().await?)
}
