//! # Funding Pool
//!
//! Ledger for one fixed-size funding round. Investors commit a settlement
//! token toward `target_amount` before `deadline`. Once the round closes the
//! pool either:
//!
//! - reaches its target, and the admin fixes a bond price that hands the
//!   frozen investor registry over to the bond distribution contract, or
//! - expires below target, and every investor recovers their principal
//!   through `withdraw` or the admin's bounded `refund_batch`.
//!
//! Every entry point runs as one Soroban invocation, so an operation either
//! commits all of its transfers, registry writes and events or none of them.
//! At every observation point the sum of the registry equals the pool's
//! settlement balance.

#![no_std]

#[cfg(test)]
extern crate std;

mod error;
mod events;
mod registry;
mod rewards;
mod round;
mod storage;

#[cfg(test)]
mod test_props;

pub use error::Error;
use events::*;
pub use rewards::RewardTier;
pub use round::RoundState;
use round::{
    derive_state, ensure_capacity, ensure_exit_allowed, ensure_ticket, extended_deadline,
    qualifies_as_whale, RoundFlags,
};
pub use storage::{InvestorRecord, RoundConfig};
use storage::{DataKey, DEFAULT_MAX_REFUND_BATCH, DEFAULT_WHALE_THRESHOLD};

use soroban_sdk::{contract, contractimpl, log, token, Address, Env};

#[contract]
pub struct FundingPool;

#[contractimpl]
impl FundingPool {
    // ============================================
    // INITIALIZATION & ADMIN
    // ============================================

    /// Initialize the round
    ///
    /// Whale threshold, refund batch bound and the top-up ticket rule start at
    /// their defaults and can be changed with the admin setters.
    ///
    /// # Errors
    /// - `AlreadyInitialized`: Contract already initialized
    /// - `InvalidAmount`: Minimum ticket and target must be positive
    /// - `InvalidDeadline`: Deadline must be in the future
    pub fn initialize(
        env: Env,
        admin: Address,
        settlement_asset: Address,
        minimum_ticket: i128,
        target_amount: i128,
        deadline: u64,
    ) -> Result<(), Error> {
        if env.storage().instance().has(&DataKey::Initialized) {
            return Err(Error::AlreadyInitialized);
        }

        admin.require_auth();

        if minimum_ticket <= 0 || target_amount <= 0 {
            return Err(Error::InvalidAmount);
        }

        if deadline <= env.ledger().timestamp() {
            return Err(Error::InvalidDeadline);
        }

        let config = RoundConfig {
            settlement_asset,
            minimum_ticket,
            target_amount,
            deadline,
            whale_threshold: DEFAULT_WHALE_THRESHOLD,
            max_refund_batch: DEFAULT_MAX_REFUND_BATCH,
            min_ticket_on_top_ups: false,
        };

        env.storage().instance().set(&DataKey::Initialized, &true);
        env.storage().instance().set(&DataKey::Admin, &admin);
        env.storage().instance().set(&DataKey::Paused, &false);
        storage::set_config(&env, &config);

        Ok(())
    }

    /// Pause investing and exits (emergency). Admin setters keep working.
    ///
    /// # Errors
    /// - `NotInitialized`: Contract not initialized
    pub fn pause(env: Env) -> Result<(), Error> {
        storage::require_admin(&env)?;
        env.storage().instance().set(&DataKey::Paused, &true);
        Ok(())
    }

    /// Unpause contract
    ///
    /// # Errors
    /// - `NotInitialized`: Contract not initialized
    pub fn unpause(env: Env) -> Result<(), Error> {
        storage::require_admin(&env)?;
        env.storage().instance().set(&DataKey::Paused, &false);
        Ok(())
    }

    /// Set the contract issuing OG and Whale credentials.
    /// The pool must be registered as an operator there.
    ///
    /// # Errors
    /// - `NotInitialized`: Contract not initialized
    pub fn set_reward_issuer(env: Env, issuer: Address) -> Result<(), Error> {
        storage::require_admin(&env)?;
        env.storage().instance().set(&DataKey::RewardIssuer, &issuer);
        Ok(())
    }

    // ============================================
    // FLOW 1: INVESTOR COMMITS FUNDS
    // ============================================

    /// Invest `amount` of the settlement asset. Returns the investor's new
    /// cumulative amount.
    ///
    /// The first investment issues the OG credential; crossing the whale
    /// threshold (cumulatively) issues the Whale credential. Each is issued
    /// at most once per address.
    ///
    /// # Errors
    /// - `Paused`: Contract is paused
    /// - `NotInitialized`: Contract not initialized
    /// - `DistributionStarted`: Bond price already fixed
    /// - `PeriodFinished`: Deadline passed
    /// - `InvalidAmount`: Amount must be positive
    /// - `TargetExceeded`: Would raise the total above the target
    /// - `BelowMinimum`: Below the minimum ticket
    /// - `RewardIssuerUnset`: No issuer configured, or the issuer rejected
    /// - `InsufficientCallerBalance`: Investor cannot fund the transfer
    pub fn invest(env: Env, investor: Address, amount: i128) -> Result<i128, Error> {
        Self::check_not_paused(&env)?;

        investor.require_auth();

        let config = storage::get_config(&env)?;

        if storage::get_bond_price(&env).is_some() {
            return Err(Error::DistributionStarted);
        }

        if env.ledger().timestamp() >= config.deadline {
            return Err(Error::PeriodFinished);
        }

        if amount <= 0 {
            return Err(Error::InvalidAmount);
        }

        // A full round rejects everything as TargetExceeded, whatever the ticket size
        ensure_capacity(registry::total_invested(&env), amount, config.target_amount)?;

        let current_amount = registry::amount_of(&env, &investor);
        ensure_ticket(amount, current_amount, &config)?;

        let issuer = storage::get_reward_issuer(&env).ok_or(Error::RewardIssuerUnset)?;

        // Pull funds from the investor
        let settlement = token::Client::new(&env, &config.settlement_asset);
        let balance = settlement.balance(&investor);
        if balance < amount {
            log!(
                &env,
                "invest rejected: insufficient balance",
                balance,
                amount
            );
            return Err(Error::InsufficientCallerBalance);
        }

        match settlement.try_transfer(&investor, &env.current_contract_address(), &amount) {
            Ok(Ok(())) => {}
            _ => return Err(Error::InsufficientCallerBalance),
        }

        let investor_total = registry::upsert(&env, &investor, amount)?;

        if current_amount == 0 {
            rewards::grant(&env, &issuer, RewardTier::Og, &investor)?;
        }

        if qualifies_as_whale(investor_total, config.whale_threshold) {
            rewards::grant(&env, &issuer, RewardTier::Whale, &investor)?;
        }

        emit_investment_made(&env, investor, amount, investor_total);

        Ok(investor_total)
    }

    // ============================================
    // FLOW 2: ROUND EXPIRED - INVESTORS EXIT
    // ============================================

    /// Withdraw the full principal after the round expired below target.
    /// Returns the refunded amount.
    ///
    /// # Errors
    /// - `Paused`: Contract is paused
    /// - `NotInitialized`: Contract not initialized
    /// - `PeriodOngoing`: Deadline not yet passed
    /// - `TargetAlreadyReached`: Round succeeded, funds are locked
    /// - `DistributionStarted`: Bond price already fixed
    /// - `NoRegisteredFunds`: Investor has nothing to withdraw
    /// - `TransferFailed`: Settlement transfer out failed
    pub fn withdraw(env: Env, investor: Address) -> Result<i128, Error> {
        Self::check_not_paused(&env)?;

        investor.require_auth();

        let config = storage::get_config(&env)?;
        ensure_exit_allowed(Self::current_state(&env, &config))?;

        let amount = Self::pay_out(&env, &config.settlement_asset, &investor)?;

        emit_withdrawal_made(&env, investor, amount);

        Ok(amount)
    }

    /// Refund up to `count` investors from the tail of the registry.
    /// Returns the number of investors refunded.
    ///
    /// # Errors
    /// - `Paused`: Contract is paused
    /// - `NotInitialized`: Contract not initialized
    /// - `PeriodOngoing` / `TargetAlreadyReached` / `DistributionStarted`:
    ///   Round is not refundable
    /// - `NoEligibleRefunds`: `count` is zero
    /// - `RefundBatchTooLarge`: `count` exceeds the active investors or the
    ///   configured batch bound
    /// - `TransferFailed`: Settlement transfer out failed
    pub fn refund_batch(env: Env, count: u32) -> Result<u32, Error> {
        Self::check_not_paused(&env)?;

        storage::require_admin(&env)?;

        let config = storage::get_config(&env)?;
        ensure_exit_allowed(Self::current_state(&env, &config))?;

        if count == 0 {
            return Err(Error::NoEligibleRefunds);
        }

        if count > registry::count(&env) || count > config.max_refund_batch {
            return Err(Error::RefundBatchTooLarge);
        }

        let mut refunded: i128 = 0;
        for _ in 0..count {
            let tail = registry::count(&env) - 1;
            let investor = registry::investor_at(&env, tail).ok_or(Error::NoRegisteredFunds)?;

            let amount = Self::pay_out(&env, &config.settlement_asset, &investor)?;
            refunded = refunded.checked_add(amount).ok_or(Error::InvalidAmount)?;

            emit_withdrawal_made(&env, investor, amount);
        }

        let remaining = registry::count(&env);
        log!(&env, "refund batch processed", count, refunded, remaining);
        emit_refunded_investors(&env, count, refunded, remaining);

        Ok(count)
    }

    // ============================================
    // FLOW 3: TARGET REACHED - FIX BOND PRICE
    // ============================================

    /// Fix the bond price and freeze the registry for distribution.
    ///
    /// One-way: afterwards `invest`, `withdraw` and `refund_batch` all fail
    /// with `DistributionStarted`, and the bond distribution contract may
    /// allocate `invested_amount / price` to each investor.
    ///
    /// # Errors
    /// - `NotInitialized`: Contract not initialized
    /// - `InvalidPrice`: Price must be positive
    /// - `BondPriceAlreadySet`: Price already fixed
    /// - `TargetNotReached`: Round has not reached its target
    pub fn set_bond_price(env: Env, price: i128) -> Result<(), Error> {
        storage::require_admin(&env)?;

        if price <= 0 {
            return Err(Error::InvalidPrice);
        }

        if storage::get_bond_price(&env).is_some() {
            return Err(Error::BondPriceAlreadySet);
        }

        let config = storage::get_config(&env)?;
        if Self::current_state(&env, &config) != RoundState::TargetReached {
            return Err(Error::TargetNotReached);
        }

        env.storage().instance().set(&DataKey::BondPrice, &price);
        storage::bump_instance(&env);

        emit_bond_price_set(
            &env,
            price,
            registry::total_invested(&env),
            registry::count(&env),
        );

        Ok(())
    }

    // ============================================
    // ROUND CONFIGURATION (ADMIN, NOT PAUSABLE)
    // ============================================

    /// Push the deadline back by whole days while the round is open.
    /// Returns the new deadline.
    ///
    /// # Errors
    /// - `NotInitialized`: Contract not initialized
    /// - `PeriodFinished`: Deadline already passed
    /// - `TargetAlreadyReached`: Round already filled
    /// - `DistributionStarted`: Bond price already fixed
    /// - `InvalidDeadlineExtension`: `days` is zero or overflows
    pub fn increment_deadline(env: Env, days: u32) -> Result<u64, Error> {
        storage::require_admin(&env)?;

        let mut config = storage::get_config(&env)?;
        match Self::current_state(&env, &config) {
            RoundState::Open => {}
            RoundState::TargetReached => return Err(Error::TargetAlreadyReached),
            RoundState::DistributionReady => return Err(Error::DistributionStarted),
            RoundState::Expired | RoundState::Refunded => return Err(Error::PeriodFinished),
        }

        let old_deadline = config.deadline;
        config.deadline = extended_deadline(old_deadline, days)?;
        storage::set_config(&env, &config);

        emit_deadline_extended(&env, old_deadline, config.deadline, days);

        Ok(config.deadline)
    }

    /// Change the round target. The new target must stay above the amount
    /// already raised.
    ///
    /// # Errors
    /// - `NotInitialized`: Contract not initialized
    /// - `TargetTooSmall`: `new_target` is not above the total invested
    pub fn set_target_amount(env: Env, new_target: i128) -> Result<(), Error> {
        storage::require_admin(&env)?;

        let mut config = storage::get_config(&env)?;
        if new_target <= registry::total_invested(&env) {
            return Err(Error::TargetTooSmall);
        }

        let old_target = config.target_amount;
        config.target_amount = new_target;
        storage::set_config(&env, &config);

        emit_target_amount_changed(&env, old_target, new_target);

        Ok(())
    }

    /// # Errors
    /// - `NotInitialized`: Contract not initialized
    /// - `InvalidAmount`: Minimum must be positive
    pub fn set_minimum_ticket(env: Env, new_minimum: i128) -> Result<(), Error> {
        storage::require_admin(&env)?;

        if new_minimum <= 0 {
            return Err(Error::InvalidAmount);
        }

        let mut config = storage::get_config(&env)?;
        let old_minimum = config.minimum_ticket;
        config.minimum_ticket = new_minimum;
        storage::set_config(&env, &config);

        emit_minimum_ticket_changed(&env, old_minimum, new_minimum);

        Ok(())
    }

    /// # Errors
    /// - `NotInitialized`: Contract not initialized
    /// - `InvalidAmount`: Threshold must be positive
    pub fn set_whale_threshold(env: Env, threshold: i128) -> Result<(), Error> {
        storage::require_admin(&env)?;

        if threshold <= 0 {
            return Err(Error::InvalidAmount);
        }

        let mut config = storage::get_config(&env)?;
        config.whale_threshold = threshold;
        storage::set_config(&env, &config);

        Ok(())
    }

    /// # Errors
    /// - `NotInitialized`: Contract not initialized
    /// - `InvalidBatchLimit`: Limit must be positive
    pub fn set_max_refund_batch(env: Env, limit: u32) -> Result<(), Error> {
        storage::require_admin(&env)?;

        if limit == 0 {
            return Err(Error::InvalidBatchLimit);
        }

        let mut config = storage::get_config(&env)?;
        config.max_refund_batch = limit;
        storage::set_config(&env, &config);

        Ok(())
    }

    /// Whether the minimum ticket also applies to top-ups by existing investors.
    ///
    /// # Errors
    /// - `NotInitialized`: Contract not initialized
    pub fn set_min_ticket_on_top_ups(env: Env, enabled: bool) -> Result<(), Error> {
        storage::require_admin(&env)?;

        let mut config = storage::get_config(&env)?;
        config.min_ticket_on_top_ups = enabled;
        storage::set_config(&env, &config);

        Ok(())
    }

    // ============================================
    // VIEW FUNCTIONS
    // ============================================

    /// Active investment of `investor`, 0 if none
    pub fn amount_of(env: Env, investor: Address) -> i128 {
        registry::amount_of(&env, &investor)
    }

    pub fn total_invested(env: Env) -> i128 {
        registry::total_invested(&env)
    }

    pub fn investor_count(env: Env) -> u32 {
        registry::count(&env)
    }

    /// Investor occupying registry `slot`, if the slot is active
    pub fn investor_at(env: Env, slot: u32) -> Option<Address> {
        registry::investor_at(&env, slot)
    }

    pub fn get_investor(env: Env, investor: Address) -> Option<InvestorRecord> {
        registry::record_of(&env, &investor)
    }

    pub fn target_amount(env: Env) -> Result<i128, Error> {
        Ok(storage::get_config(&env)?.target_amount)
    }

    pub fn deadline(env: Env) -> Result<u64, Error> {
        Ok(storage::get_config(&env)?.deadline)
    }

    pub fn minimum_ticket(env: Env) -> Result<i128, Error> {
        Ok(storage::get_config(&env)?.minimum_ticket)
    }

    pub fn get_config(env: Env) -> Result<RoundConfig, Error> {
        storage::get_config(&env)
    }

    /// Current round state, derived from the stored flags
    pub fn state(env: Env) -> Result<RoundState, Error> {
        let config = storage::get_config(&env)?;
        Ok(Self::current_state(&env, &config))
    }

    pub fn is_price_set(env: Env) -> bool {
        storage::get_bond_price(&env).is_some()
    }

    pub fn bond_price(env: Env) -> Option<i128> {
        storage::get_bond_price(&env)
    }

    pub fn is_paused(env: Env) -> bool {
        storage::is_paused(&env)
    }

    pub fn reward_issuer(env: Env) -> Option<Address> {
        storage::get_reward_issuer(&env)
    }

    // ============================================
    // INTERNAL HELPERS
    // ============================================

    fn check_not_paused(env: &Env) -> Result<(), Error> {
        if storage::is_paused(env) {
            return Err(Error::Paused);
        }
        Ok(())
    }

    fn current_state(env: &Env, config: &RoundConfig) -> RoundState {
        derive_state(&RoundFlags {
            price_set: storage::get_bond_price(env).is_some(),
            now: env.ledger().timestamp(),
            deadline: config.deadline,
            total_invested: registry::total_invested(env),
            target_amount: config.target_amount,
            investor_count: registry::count(env),
        })
    }

    /// Remove `investor` from the registry and send its principal back.
    fn pay_out(env: &Env, settlement_asset: &Address, investor: &Address) -> Result<i128, Error> {
        let amount = registry::remove(env, investor)?;

        let settlement = token::Client::new(env, settlement_asset);
        match settlement.try_transfer(&env.current_contract_address(), investor, &amount) {
            Ok(Ok(())) => Ok(amount),
            _ => Err(Error::TransferFailed),
        }
    }
}
