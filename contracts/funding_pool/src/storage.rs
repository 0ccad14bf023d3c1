use soroban_sdk::{contracttype, Address, Env};

use crate::error::Error;

// Constants
pub const SECONDS_PER_DAY: u64 = 86_400;
/// 5,000 units of a 6-decimal stablecoin
pub const DEFAULT_WHALE_THRESHOLD: i128 = 5_000 * 1_000_000;
pub const DEFAULT_MAX_REFUND_BATCH: u32 = 50;

// Approximate ledgers per day (~5 seconds per ledger).
const DAY_IN_LEDGERS: u32 = 17_280;
const INSTANCE_BUMP_AMOUNT: u32 = 7 * DAY_IN_LEDGERS;
const INSTANCE_LIFETIME_THRESHOLD: u32 = DAY_IN_LEDGERS;
pub const PERSISTENT_BUMP_AMOUNT: u32 = 30 * DAY_IN_LEDGERS;
pub const PERSISTENT_LIFETIME_THRESHOLD: u32 = 7 * DAY_IN_LEDGERS;

/// Round parameters, fixed at initialization and changed only through the
/// admin setters.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct RoundConfig {
    /// Token contract holding the pooled funds
    pub settlement_asset: Address,
    /// Smallest accepted first investment
    pub minimum_ticket: i128,
    /// Ceiling on the total raised
    pub target_amount: i128,
    /// Ledger timestamp after which no investment is accepted
    pub deadline: u64,
    /// Cumulative investment that earns the Whale credential
    pub whale_threshold: i128,
    /// Upper bound on investors refunded by one `refund_batch` call
    pub max_refund_batch: u32,
    /// Apply `minimum_ticket` to top-ups as well as first investments
    pub min_ticket_on_top_ups: bool,
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct InvestorRecord {
    pub address: Address,
    pub invested_amount: i128,
    /// Position in the dense registry; changes when the record is moved by a swap-remove
    pub slot: u32,
}

#[contracttype]
#[derive(Clone)]
pub enum DataKey {
    Admin,
    RewardIssuer,
    Config,
    BondPrice,
    TotalInvested,
    InvestorCount,
    InvestorSlot(u32),  // slot -> Address
    Investor(Address),  // Address -> InvestorRecord
    Initialized,
    Paused,
}

pub fn bump_instance(env: &Env) {
    env.storage()
        .instance()
        .extend_ttl(INSTANCE_LIFETIME_THRESHOLD, INSTANCE_BUMP_AMOUNT);
}

pub fn get_admin(env: &Env) -> Result<Address, Error> {
    env.storage()
        .instance()
        .get(&DataKey::Admin)
        .ok_or(Error::NotInitialized)
}

/// Load the admin and require its signature.
pub fn require_admin(env: &Env) -> Result<Address, Error> {
    let admin = get_admin(env)?;
    admin.require_auth();
    Ok(admin)
}

pub fn get_config(env: &Env) -> Result<RoundConfig, Error> {
    env.storage()
        .instance()
        .get(&DataKey::Config)
        .ok_or(Error::NotInitialized)
}

pub fn set_config(env: &Env, config: &RoundConfig) {
    env.storage().instance().set(&DataKey::Config, config);
    bump_instance(env);
}

pub fn get_bond_price(env: &Env) -> Option<i128> {
    env.storage().instance().get(&DataKey::BondPrice)
}

pub fn get_reward_issuer(env: &Env) -> Option<Address> {
    env.storage().instance().get(&DataKey::RewardIssuer)
}

pub fn is_paused(env: &Env) -> bool {
    env.storage()
        .instance()
        .get::<DataKey, bool>(&DataKey::Paused)
        .unwrap_or(false)
}
