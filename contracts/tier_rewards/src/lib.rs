#![no_std]

mod error;
mod events;
mod storage;

pub use error::Error;
use events::emit_credential_issued;
pub use storage::{Credential, Tier};
use storage::{DataKey, PERSISTENT_BUMP_AMOUNT, PERSISTENT_LIFETIME_THRESHOLD};

use soroban_sdk::{contract, contractimpl, Address, Env};

#[contract]
pub struct TierRewards;

#[contractimpl]
impl TierRewards {
    /// Initialize the credential issuer
    ///
    /// # Errors
    /// - `AlreadyInitialized`: Contract already initialized
    pub fn initialize(env: Env, admin: Address) -> Result<(), Error> {
        if env.storage().instance().has(&DataKey::Initialized) {
            return Err(Error::AlreadyInitialized);
        }

        admin.require_auth();

        env.storage().instance().set(&DataKey::Initialized, &true);
        env.storage().instance().set(&DataKey::Admin, &admin);
        env.storage().instance().set(&DataKey::NextTokenId, &1u64);

        Ok(())
    }

    /// Add an operator (a funding pool allowed to issue credentials)
    ///
    /// # Errors
    /// - `NotInitialized`: Contract not initialized
    pub fn add_operator(env: Env, operator: Address) -> Result<(), Error> {
        storage::require_admin(&env)?;

        env.storage()
            .instance()
            .set(&DataKey::Operators(operator), &true);

        Ok(())
    }

    /// Remove an operator
    ///
    /// # Errors
    /// - `NotInitialized`: Contract not initialized
    pub fn remove_operator(env: Env, operator: Address) -> Result<(), Error> {
        storage::require_admin(&env)?;

        env.storage()
            .instance()
            .remove(&DataKey::Operators(operator));

        Ok(())
    }

    /// Issue the `tier` credential to `to`. Returns the new token id.
    ///
    /// # Errors
    /// - `NotInitialized`: Contract not initialized
    /// - `NotOperator`: `operator` is not registered
    /// - `AlreadyIssued`: `to` already holds a credential of this tier
    pub fn issue(env: Env, operator: Address, tier: Tier, to: Address) -> Result<u64, Error> {
        if !env.storage().instance().has(&DataKey::Initialized) {
            return Err(Error::NotInitialized);
        }

        if !Self::is_operator(env.clone(), operator.clone()) {
            return Err(Error::NotOperator);
        }
        operator.require_auth();

        let issued_key = DataKey::Issued(tier, to.clone());
        if env.storage().persistent().has(&issued_key) {
            return Err(Error::AlreadyIssued);
        }

        let token_id: u64 = env
            .storage()
            .instance()
            .get(&DataKey::NextTokenId)
            .unwrap_or(1);

        let credential = Credential {
            token_id,
            tier,
            owner: to.clone(),
            issued_at: env.ledger().timestamp(),
        };

        let credential_key = DataKey::Credential(token_id);
        env.storage().persistent().set(&credential_key, &credential);
        env.storage().persistent().extend_ttl(
            &credential_key,
            PERSISTENT_LIFETIME_THRESHOLD,
            PERSISTENT_BUMP_AMOUNT,
        );
        env.storage().persistent().set(&issued_key, &token_id);
        env.storage().persistent().extend_ttl(
            &issued_key,
            PERSISTENT_LIFETIME_THRESHOLD,
            PERSISTENT_BUMP_AMOUNT,
        );

        env.storage()
            .instance()
            .set(&DataKey::NextTokenId, &(token_id + 1));

        let supply = Self::total_issued(env.clone(), tier);
        env.storage()
            .instance()
            .set(&DataKey::TierSupply(tier), &(supply + 1));

        emit_credential_issued(&env, token_id, tier, to, operator);

        Ok(token_id)
    }

    /// Whether `owner` already holds the `tier` credential
    pub fn has_issued(env: Env, tier: Tier, owner: Address) -> bool {
        env.storage()
            .persistent()
            .has(&DataKey::Issued(tier, owner))
    }

    /// Token id of the `tier` credential held by `owner`, if any
    pub fn token_of(env: Env, tier: Tier, owner: Address) -> Option<u64> {
        env.storage()
            .persistent()
            .get(&DataKey::Issued(tier, owner))
    }

    /// Get a credential by token id
    pub fn credential(env: Env, token_id: u64) -> Result<Credential, Error> {
        env.storage()
            .persistent()
            .get(&DataKey::Credential(token_id))
            .ok_or(Error::CredentialNotFound)
    }

    /// Number of credentials issued for `tier`
    pub fn total_issued(env: Env, tier: Tier) -> u32 {
        env.storage()
            .instance()
            .get::<DataKey, u32>(&DataKey::TierSupply(tier))
            .unwrap_or(0)
    }

    /// Check if address is an operator
    pub fn is_operator(env: Env, address: Address) -> bool {
        env.storage()
            .instance()
            .get::<DataKey, bool>(&DataKey::Operators(address))
            .unwrap_or(false)
    }
}
