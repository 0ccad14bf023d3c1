use soroban_sdk::{contracttype, Address, Env};

use crate::error::Error;

/// Fixed-point scale of the bond price: `BOND_SCALE` means one settlement
/// unit per bond unit.
pub const BOND_SCALE: i128 = 10_000_000;

/// Upper bound on investors visited by one `distribute_batch` call
pub const MAX_DISTRIBUTION_BATCH: u32 = 50;

pub(crate) const DAY_IN_LEDGERS: u32 = 17_280;
pub(crate) const PERSISTENT_BUMP_AMOUNT: u32 = 30 * DAY_IN_LEDGERS;
pub(crate) const PERSISTENT_LIFETIME_THRESHOLD: u32 = 7 * DAY_IN_LEDGERS;

#[contracttype]
#[derive(Clone)]
pub enum DataKey {
    Admin,
    Pool,
    Allocation(Address), // Investor → bonds allocated
    TotalDistributed,
    Initialized,
    Paused,
}

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
