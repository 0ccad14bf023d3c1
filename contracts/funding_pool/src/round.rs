use soroban_sdk::contracttype;

use crate::error::Error;
use crate::storage::{RoundConfig, SECONDS_PER_DAY};

/// Round lifecycle, derived from the stored flags rather than persisted.
///
/// ```text
/// Open -> TargetReached -> DistributionReady
/// Open -> Expired -> Refunded
/// ```
#[contracttype]
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum RoundState {
    /// Accepting investments
    Open = 0,
    /// Total raised equals the target, waiting for the bond price
    TargetReached = 1,
    /// Deadline passed below target, investors may exit
    Expired = 2,
    /// Expired and every investor has exited
    Refunded = 3,
    /// Bond price fixed, registry frozen for distribution
    DistributionReady = 4,
}

/// Snapshot of the flags the round state is computed from.
pub struct RoundFlags {
    pub price_set: bool,
    pub now: u64,
    pub deadline: u64,
    pub total_invested: i128,
    pub target_amount: i128,
    pub investor_count: u32,
}

pub fn derive_state(flags: &RoundFlags) -> RoundState {
    if flags.price_set {
        return RoundState::DistributionReady;
    }

    if flags.total_invested >= flags.target_amount {
        return RoundState::TargetReached;
    }

    if flags.now >= flags.deadline {
        if flags.investor_count == 0 {
            return RoundState::Refunded;
        }
        return RoundState::Expired;
    }

    RoundState::Open
}

/// Withdrawals and refunds are only allowed once the round expired below target.
pub fn ensure_exit_allowed(state: RoundState) -> Result<(), Error> {
    match state {
        RoundState::Expired | RoundState::Refunded => Ok(()),
        RoundState::Open => Err(Error::PeriodOngoing),
        RoundState::TargetReached => Err(Error::TargetAlreadyReached),
        RoundState::DistributionReady => Err(Error::DistributionStarted),
    }
}

/// Reject an investment that would push the round total above the target.
pub fn ensure_capacity(
    total_invested: i128,
    amount: i128,
    target_amount: i128,
) -> Result<(), Error> {
    let new_total = total_invested
        .checked_add(amount)
        .ok_or(Error::InvalidAmount)?;

    if new_total > target_amount {
        return Err(Error::TargetExceeded);
    }
    Ok(())
}

/// Minimum ticket gates becoming an investor; top-ups are gated only when
/// `min_ticket_on_top_ups` is set.
pub fn ensure_ticket(
    amount: i128,
    current_amount: i128,
    config: &RoundConfig,
) -> Result<(), Error> {
    if amount <= 0 {
        return Err(Error::InvalidAmount);
    }

    let applies = current_amount == 0 || config.min_ticket_on_top_ups;
    if applies && amount < config.minimum_ticket {
        return Err(Error::BelowMinimum);
    }
    Ok(())
}

/// Whale status is judged on the cumulative amount, so several smaller
/// investments qualify the same way as one large one.
pub fn qualifies_as_whale(cumulative_amount: i128, whale_threshold: i128) -> bool {
    cumulative_amount >= whale_threshold
}

pub fn extended_deadline(deadline: u64, days: u32) -> Result<u64, Error> {
    if days == 0 {
        return Err(Error::InvalidDeadlineExtension);
    }

    (days as u64)
        .checked_mul(SECONDS_PER_DAY)
        .and_then(|seconds| deadline.checked_add(seconds))
        .ok_or(Error::InvalidDeadlineExtension)
}
