use soroban_sdk::{contracttype, Address, Env};

use crate::error::Error;

/// Investor tiers a credential can be issued for.
#[contracttype]
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum Tier {
    /// Any address that made a qualifying first investment
    Og = 0,
    /// Addresses whose cumulative investment crossed the whale threshold
    Whale = 1,
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Credential {
    pub token_id: u64,
    pub tier: Tier,
    pub owner: Address,
    pub issued_at: u64,
}

#[contracttype]
#[derive(Clone)]
pub enum DataKey {
    Admin,
    Operators(Address),
    NextTokenId,
    Issued(Tier, Address), // (tier, owner) -> token_id
    Credential(u64),       // token_id -> Credential
    TierSupply(Tier),
    Initialized,
}

// Approximate ledgers per day (~5 seconds per ledger).
const DAY_IN_LEDGERS: u32 = 17_280;

/// Credentials live in persistent storage: bump by 30 days when below 7 days remaining.
pub const PERSISTENT_BUMP_AMOUNT: u32 = 30 * DAY_IN_LEDGERS;
pub const PERSISTENT_LIFETIME_THRESHOLD: u32 = 7 * DAY_IN_LEDGERS;

/// Load the admin and require its signature.
pub fn require_admin(env: &Env) -> Result<Address, Error> {
    let admin: Address = env
        .storage()
        .instance()
        .get(&DataKey::Admin)
        .ok_or(Error::NotInitialized)?;
    admin.require_auth();
    Ok(admin)
}
