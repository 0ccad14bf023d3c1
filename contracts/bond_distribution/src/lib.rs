#![no_std]

mod allocation;
mod error;
mod events;
mod storage;

#[cfg(test)]
mod test;

use allocation::calculate_bond_allocation;
pub use error::Error;
use events::*;
pub use storage::{BOND_SCALE, MAX_DISTRIBUTION_BATCH};
use storage::{DataKey, PERSISTENT_BUMP_AMOUNT, PERSISTENT_LIFETIME_THRESHOLD};

use soroban_sdk::{contract, contractimpl, log, vec, Address, Env, IntoVal, Symbol};

#[contract]
pub struct BondDistribution;

#[contractimpl]
impl BondDistribution {
    // ============================================
    // INITIALIZATION & ADMIN
    // ============================================

    /// Bind the distribution to the funding pool whose frozen registry it reads.
    pub fn initialize(env: Env, admin: Address, pool: Address) -> Result<(), Error> {
        if env.storage().instance().has(&DataKey::Initialized) {
            return Err(Error::AlreadyInitialized);
        }

        admin.require_auth();

        env.storage().instance().set(&DataKey::Initialized, &true);
        env.storage().instance().set(&DataKey::Admin, &admin);
        env.storage().instance().set(&DataKey::Pool, &pool);
        env.storage().instance().set(&DataKey::TotalDistributed, &0i128);
        env.storage().instance().set(&DataKey::Paused, &false);

        Ok(())
    }

    pub fn pause(env: Env) -> Result<(), Error> {
        storage::require_admin(&env)?;

        env.storage().instance().set(&DataKey::Paused, &true);
        Ok(())
    }

    pub fn unpause(env: Env) -> Result<(), Error> {
        storage::require_admin(&env)?;

        env.storage().instance().set(&DataKey::Paused, &false);
        Ok(())
    }

    // ============================================
    // FLOW 1: INVESTOR CLAIMS BONDS
    // ============================================

    /// Bonds `investor` would receive at the pool's fixed price.
    ///
    /// # Errors
    /// - `NotInitialized`: Contract not initialized
    /// - `DistributionNotStarted`: Pool price not fixed
    /// - `NothingToClaim`: Investor holds no allocation in the pool
    pub fn preview_allocation(env: Env, investor: Address) -> Result<i128, Error> {
        let pool = Self::get_pool(&env)?;
        let price = Self::fixed_price(&env, &pool)?;
        let invested = Self::invested_in(&env, &pool, &investor);

        calculate_bond_allocation(invested, price).ok_or(Error::NothingToClaim)
    }

    /// Record the investor's bond allocation. Returns the bonds allocated.
    ///
    /// # Errors
    /// - `ContractPaused`: Contract is paused
    /// - `NotInitialized`: Contract not initialized
    /// - `DistributionNotStarted`: Pool price not fixed
    /// - `AlreadyClaimed`: Allocation already recorded
    /// - `NothingToClaim`: Investor holds no allocation in the pool
    pub fn claim(env: Env, investor: Address) -> Result<i128, Error> {
        Self::check_not_paused(&env)?;

        investor.require_auth();

        let pool = Self::get_pool(&env)?;
        let price = Self::fixed_price(&env, &pool)?;

        if Self::is_claimed(env.clone(), investor.clone()) {
            return Err(Error::AlreadyClaimed);
        }

        let bonds = Self::allocate(&env, &pool, &investor, price)?;
        if bonds == 0 {
            return Err(Error::NothingToClaim);
        }

        Ok(bonds)
    }

    // ============================================
    // FLOW 2: ADMIN PUSHES ALLOCATIONS
    // ============================================

    /// Allocate bonds to up to `limit` investors starting at registry slot
    /// `from_slot`, skipping those that already claimed. Returns the number of
    /// investors allocated in this batch.
    ///
    /// # Errors
    /// - `ContractPaused`: Contract is paused
    /// - `NotInitialized`: Contract not initialized
    /// - `InvalidBatchLimit`: `limit` is zero or above `MAX_DISTRIBUTION_BATCH`
    /// - `DistributionNotStarted`: Pool price not fixed
    pub fn distribute_batch(env: Env, from_slot: u32, limit: u32) -> Result<u32, Error> {
        Self::check_not_paused(&env)?;

        storage::require_admin(&env)?;

        if limit == 0 || limit > MAX_DISTRIBUTION_BATCH {
            return Err(Error::InvalidBatchLimit);
        }

        let pool = Self::get_pool(&env)?;
        let price = Self::fixed_price(&env, &pool)?;

        let investor_count: u32 =
            env.invoke_contract(&pool, &Symbol::new(&env, "investor_count"), vec![&env]);
        let end = from_slot.saturating_add(limit).min(investor_count);

        let mut allocated = 0u32;
        for slot in from_slot..end {
            let investor: Option<Address> = env.invoke_contract(
                &pool,
                &Symbol::new(&env, "investor_at"),
                vec![&env, slot.into_val(&env)],
            );
            let Some(investor) = investor else {
                continue;
            };

            if Self::is_claimed(env.clone(), investor.clone()) {
                continue;
            }

            if Self::allocate(&env, &pool, &investor, price)? > 0 {
                allocated += 1;
            }
        }

        log!(
            &env,
            "distribution batch processed",
            from_slot,
            end,
            allocated
        );

        Ok(allocated)
    }

    // ============================================
    // VIEW FUNCTIONS
    // ============================================

    /// Bonds allocated to `investor`, 0 if none
    pub fn bonds_of(env: Env, investor: Address) -> i128 {
        env.storage()
            .persistent()
            .get(&DataKey::Allocation(investor))
            .unwrap_or(0)
    }

    pub fn is_claimed(env: Env, investor: Address) -> bool {
        env.storage()
            .persistent()
            .has(&DataKey::Allocation(investor))
    }

    pub fn total_distributed(env: Env) -> i128 {
        env.storage()
            .instance()
            .get(&DataKey::TotalDistributed)
            .unwrap_or(0)
    }

    pub fn pool(env: Env) -> Result<Address, Error> {
        Self::get_pool(&env)
    }

    // ============================================
    // INTERNAL HELPERS
    // ============================================

    fn check_not_paused(env: &Env) -> Result<(), Error> {
        let paused = env
            .storage()
            .instance()
            .get::<DataKey, bool>(&DataKey::Paused)
            .unwrap_or(false);

        if paused {
            return Err(Error::ContractPaused);
        }
        Ok(())
    }

    fn get_pool(env: &Env) -> Result<Address, Error> {
        env.storage()
            .instance()
            .get(&DataKey::Pool)
            .ok_or(Error::NotInitialized)
    }

    fn fixed_price(env: &Env, pool: &Address) -> Result<i128, Error> {
        let price: Option<i128> =
            env.invoke_contract(pool, &Symbol::new(env, "bond_price"), vec![env]);
        price.ok_or(Error::DistributionNotStarted)
    }

    fn invested_in(env: &Env, pool: &Address, investor: &Address) -> i128 {
        env.invoke_contract(
            pool,
            &Symbol::new(env, "amount_of"),
            vec![env, investor.to_val()],
        )
    }

    /// Record the allocation for `investor` at `price`. Investors whose
    /// allocation rounds down to zero are left unrecorded.
    fn allocate(env: &Env, pool: &Address, investor: &Address, price: i128) -> Result<i128, Error> {
        let invested = Self::invested_in(env, pool, investor);
        if invested <= 0 {
            return Err(Error::NothingToClaim);
        }

        let bonds = calculate_bond_allocation(invested, price).ok_or(Error::InvalidAmount)?;
        if bonds == 0 {
            return Ok(0);
        }

        let key = DataKey::Allocation(investor.clone());
        env.storage().persistent().set(&key, &bonds);
        env.storage()
            .persistent()
            .extend_ttl(&key, PERSISTENT_LIFETIME_THRESHOLD, PERSISTENT_BUMP_AMOUNT);

        let total = Self::total_distributed(env.clone())
            .checked_add(bonds)
            .ok_or(Error::InvalidAmount)?;
        env.storage().instance().set(&DataKey::TotalDistributed, &total);

        emit_bonds_allocated(env, investor.clone(), invested, bonds, price);

        Ok(bonds)
    }
}
