//! # Investor registry
//!
//! Dense, order-agnostic set of active investors kept in contract storage.
//!
//! | Key                  | Tier       | Type             |
//! |----------------------|------------|------------------|
//! | `InvestorCount`      | Instance   | `u32`            |
//! | `TotalInvested`      | Instance   | `i128`           |
//! | `InvestorSlot(slot)` | Persistent | `Address`        |
//! | `Investor(address)`  | Persistent | `InvestorRecord` |
//!
//! Active records occupy slots `[0, count)` with no gaps, and
//! `InvestorSlot(record.slot) == record.address` for every record. Removal
//! moves the tail record into the vacated slot, so insert, lookup and remove
//! each touch a constant number of entries. Investor order is not preserved
//! across removals.
//!
//! `TotalInvested` is maintained on every mutation and always equals the sum
//! of the active records' `invested_amount`.

use soroban_sdk::{Address, Env};

use crate::error::Error;
use crate::storage::{
    bump_instance, DataKey, InvestorRecord, PERSISTENT_BUMP_AMOUNT, PERSISTENT_LIFETIME_THRESHOLD,
};

fn bump_persistent(env: &Env, key: &DataKey) {
    env.storage()
        .persistent()
        .extend_ttl(key, PERSISTENT_LIFETIME_THRESHOLD, PERSISTENT_BUMP_AMOUNT);
}

fn save_record(env: &Env, record: &InvestorRecord) {
    let key = DataKey::Investor(record.address.clone());
    env.storage().persistent().set(&key, record);
    bump_persistent(env, &key);
}

fn save_slot(env: &Env, slot: u32, address: &Address) {
    let key = DataKey::InvestorSlot(slot);
    env.storage().persistent().set(&key, address);
    bump_persistent(env, &key);
}

fn set_count(env: &Env, count: u32) {
    env.storage().instance().set(&DataKey::InvestorCount, &count);
}

fn set_total(env: &Env, total: i128) {
    env.storage().instance().set(&DataKey::TotalInvested, &total);
}

/// Number of active investors.
pub fn count(env: &Env) -> u32 {
    env.storage()
        .instance()
        .get(&DataKey::InvestorCount)
        .unwrap_or(0)
}

/// Sum of all active investments.
pub fn total_invested(env: &Env) -> i128 {
    env.storage()
        .instance()
        .get(&DataKey::TotalInvested)
        .unwrap_or(0)
}

pub fn record_of(env: &Env, investor: &Address) -> Option<InvestorRecord> {
    env.storage()
        .persistent()
        .get(&DataKey::Investor(investor.clone()))
}

/// Active amount for `investor`, 0 when absent.
pub fn amount_of(env: &Env, investor: &Address) -> i128 {
    record_of(env, investor)
        .map(|record| record.invested_amount)
        .unwrap_or(0)
}

pub fn investor_at(env: &Env, slot: u32) -> Option<Address> {
    if slot >= count(env) {
        return None;
    }
    env.storage().persistent().get(&DataKey::InvestorSlot(slot))
}

/// Add `delta` to `investor`, appending a new record at the tail if absent.
/// Returns the investor's new cumulative amount.
pub fn upsert(env: &Env, investor: &Address, delta: i128) -> Result<i128, Error> {
    if delta <= 0 {
        return Err(Error::InvalidAmount);
    }

    let new_total = total_invested(env)
        .checked_add(delta)
        .ok_or(Error::InvalidAmount)?;

    let record = match record_of(env, investor) {
        Some(mut record) => {
            record.invested_amount = record
                .invested_amount
                .checked_add(delta)
                .ok_or(Error::InvalidAmount)?;
            record
        }
        None => {
            let slot = count(env);
            save_slot(env, slot, investor);
            set_count(env, slot + 1);
            InvestorRecord {
                address: investor.clone(),
                invested_amount: delta,
                slot,
            }
        }
    };

    save_record(env, &record);
    set_total(env, new_total);
    bump_instance(env);

    Ok(record.invested_amount)
}

/// Remove `investor` and return the amount it held.
///
/// The record at the last slot is moved into the vacated slot. When the
/// removed record already is the last one, only the tail is dropped.
pub fn remove(env: &Env, investor: &Address) -> Result<i128, Error> {
    let record = record_of(env, investor).ok_or(Error::NoRegisteredFunds)?;
    if record.invested_amount == 0 {
        return Err(Error::NoRegisteredFunds);
    }

    let last = count(env)
        .checked_sub(1)
        .ok_or(Error::NoRegisteredFunds)?;

    if record.slot != last {
        let moved_address: Address = env
            .storage()
            .persistent()
            .get(&DataKey::InvestorSlot(last))
            .ok_or(Error::NoRegisteredFunds)?;
        let mut moved = record_of(env, &moved_address).ok_or(Error::NoRegisteredFunds)?;

        moved.slot = record.slot;
        save_slot(env, record.slot, &moved_address);
        save_record(env, &moved);
    }

    env.storage().persistent().remove(&DataKey::InvestorSlot(last));
    env.storage()
        .persistent()
        .remove(&DataKey::Investor(investor.clone()));
    set_count(env, last);
    set_total(env, total_invested(env) - record.invested_amount);
    bump_instance(env);

    Ok(record.invested_amount)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::FundingPool;
    use soroban_sdk::{testutils::Address as _, Address, Env};

    fn with_registry<F: FnOnce(&Env)>(f: F) {
        let env = Env::default();
        let contract_id = env.register(FundingPool, ());
        env.as_contract(&contract_id, || f(&env));
    }

    /// Every slot in `[0, count)` points at a record that points back at it.
    fn assert_bijection(env: &Env) {
        let mut sum = 0i128;
        for slot in 0..count(env) {
            let address = investor_at(env, slot).unwrap();
            let record = record_of(env, &address).unwrap();
            assert_eq!(record.slot, slot);
            assert_eq!(record.address, address);
            assert!(record.invested_amount > 0);
            sum += record.invested_amount;
        }
        assert_eq!(sum, total_invested(env));
        assert_eq!(investor_at(env, count(env)), None);
    }

    #[test]
    fn test_upsert_appends_then_accumulates() {
        with_registry(|env| {
            let a = Address::generate(env);
            let b = Address::generate(env);

            assert_eq!(upsert(env, &a, 100).unwrap(), 100);
            assert_eq!(upsert(env, &b, 50).unwrap(), 50);
            assert_eq!(upsert(env, &a, 25).unwrap(), 125);

            assert_eq!(count(env), 2);
            assert_eq!(total_invested(env), 175);
            assert_eq!(record_of(env, &a).unwrap().slot, 0);
            assert_eq!(record_of(env, &b).unwrap().slot, 1);
            assert_bijection(env);
        });
    }

    #[test]
    fn test_upsert_rejects_non_positive_delta() {
        with_registry(|env| {
            let a = Address::generate(env);
            assert_eq!(upsert(env, &a, 0), Err(Error::InvalidAmount));
            assert_eq!(upsert(env, &a, -5), Err(Error::InvalidAmount));
            assert_eq!(count(env), 0);
            assert_eq!(amount_of(env, &a), 0);
        });
    }

    #[test]
    fn test_remove_middle_moves_tail() {
        with_registry(|env| {
            let a = Address::generate(env);
            let b = Address::generate(env);
            let c = Address::generate(env);
            upsert(env, &a, 10).unwrap();
            upsert(env, &b, 20).unwrap();
            upsert(env, &c, 30).unwrap();

            assert_eq!(remove(env, &b).unwrap(), 20);

            assert_eq!(count(env), 2);
            assert_eq!(amount_of(env, &b), 0);
            assert_eq!(investor_at(env, 0), Some(a.clone()));
            assert_eq!(investor_at(env, 1), Some(c.clone()));
            assert_eq!(record_of(env, &a).unwrap().slot, 0);
            assert_eq!(record_of(env, &c).unwrap().slot, 1);
            assert_eq!(total_invested(env), 40);
            assert_bijection(env);
        });
    }

    #[test]
    fn test_remove_first_moves_last_to_front() {
        with_registry(|env| {
            let a = Address::generate(env);
            let b = Address::generate(env);
            let c = Address::generate(env);
            upsert(env, &a, 10).unwrap();
            upsert(env, &b, 20).unwrap();
            upsert(env, &c, 30).unwrap();

            remove(env, &a).unwrap();

            assert_eq!(investor_at(env, 0), Some(c.clone()));
            assert_eq!(investor_at(env, 1), Some(b));
            assert_eq!(record_of(env, &c).unwrap().slot, 0);
            assert_bijection(env);
        });
    }

    #[test]
    fn test_remove_last_and_only() {
        with_registry(|env| {
            let a = Address::generate(env);
            let b = Address::generate(env);
            upsert(env, &a, 10).unwrap();
            upsert(env, &b, 20).unwrap();

            remove(env, &b).unwrap();
            assert_eq!(count(env), 1);
            assert_eq!(investor_at(env, 0), Some(a.clone()));
            assert_bijection(env);

            remove(env, &a).unwrap();
            assert_eq!(count(env), 0);
            assert_eq!(total_invested(env), 0);
            assert_eq!(investor_at(env, 0), None);
        });
    }

    #[test]
    fn test_remove_twice_fails() {
        with_registry(|env| {
            let a = Address::generate(env);
            upsert(env, &a, 10).unwrap();

            remove(env, &a).unwrap();
            assert_eq!(remove(env, &a), Err(Error::NoRegisteredFunds));

            let stranger = Address::generate(env);
            assert_eq!(remove(env, &stranger), Err(Error::NoRegisteredFunds));
        });
    }

    #[test]
    fn test_reinsert_after_remove_gets_tail_slot() {
        with_registry(|env| {
            let a = Address::generate(env);
            let b = Address::generate(env);
            upsert(env, &a, 10).unwrap();
            upsert(env, &b, 20).unwrap();

            remove(env, &a).unwrap();
            upsert(env, &a, 5).unwrap();

            assert_eq!(record_of(env, &b).unwrap().slot, 0);
            assert_eq!(record_of(env, &a).unwrap().slot, 1);
            assert_eq!(amount_of(env, &a), 5);
            assert_bijection(env);
        });
    }
}
