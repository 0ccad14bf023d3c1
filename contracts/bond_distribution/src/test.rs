use soroban_sdk::{
    testutils::{storage::Persistent as _, Address as _, Events, Ledger},
    token, vec, Address, Env, IntoVal, Symbol, TryIntoVal,
};

use funding_pool::{FundingPool, FundingPoolClient};
use tier_rewards::{TierRewards, TierRewardsClient};

use crate::events::BondsAllocatedEvent;
use crate::storage::{
    DataKey, DAY_IN_LEDGERS, PERSISTENT_BUMP_AMOUNT, PERSISTENT_LIFETIME_THRESHOLD,
};
use crate::{BondDistribution, BondDistributionClient, Error, BOND_SCALE, MAX_DISTRIBUTION_BATCH};

const USDC: i128 = 1_000_000;
const START: u64 = 1_000;
const DEADLINE: u64 = START + 30 * 86_400;

struct Round {
    env: Env,
    admin: Address,
    pool: FundingPoolClient<'static>,
    distribution: BondDistributionClient<'static>,
    token_admin: token::StellarAssetClient<'static>,
}

impl Round {
    fn investor(&self, amount: i128) -> Address {
        let investor = Address::generate(&self.env);
        self.token_admin.mint(&investor, &amount);
        self.pool.invest(&investor, &amount);
        investor
    }
}

/// A 1,000 USDC round wired to a reward issuer and a distribution contract.
fn setup() -> Round {
    let env = Env::default();
    env.mock_all_auths();
    env.ledger().set_timestamp(START);

    let admin = Address::generate(&env);

    let asset = env.register_stellar_asset_contract_v2(admin.clone());
    let token_admin = token::StellarAssetClient::new(&env, &asset.address());

    let rewards_id = env.register(TierRewards, ());
    let rewards = TierRewardsClient::new(&env, &rewards_id);
    rewards.initialize(&admin);

    let pool_id = env.register(FundingPool, ());
    let pool = FundingPoolClient::new(&env, &pool_id);
    pool.initialize(&admin, &asset.address(), &USDC, &(1_000 * USDC), &DEADLINE);
    rewards.add_operator(&pool_id);
    pool.set_reward_issuer(&rewards_id);

    let distribution_id = env.register(BondDistribution, ());
    let distribution = BondDistributionClient::new(&env, &distribution_id);
    distribution.initialize(&admin, &pool_id);

    Round {
        env,
        admin,
        pool,
        distribution,
        token_admin,
    }
}

#[test]
fn test_initialize() {
    let round = setup();
    assert_eq!(round.distribution.pool(), round.pool.address);
    assert_eq!(round.distribution.total_distributed(), 0);

    let admin = Address::generate(&round.env);
    let result = round.distribution.try_initialize(&admin, &round.pool.address);
    assert_eq!(result, Err(Ok(Error::AlreadyInitialized)));
}

#[test]
fn test_nothing_before_price_is_fixed() {
    let round = setup();
    let a = round.investor(600 * USDC);
    round.investor(400 * USDC);

    assert_eq!(
        round.distribution.try_preview_allocation(&a),
        Err(Ok(Error::DistributionNotStarted))
    );
    assert_eq!(
        round.distribution.try_claim(&a),
        Err(Ok(Error::DistributionNotStarted))
    );
    assert_eq!(
        round.distribution.try_distribute_batch(&0, &10),
        Err(Ok(Error::DistributionNotStarted))
    );
}

#[test]
fn test_claim_after_price_fixed() {
    let round = setup();
    let a = round.investor(600 * USDC);
    let b = round.investor(400 * USDC);
    round.pool.set_bond_price(&(2 * BOND_SCALE));

    assert_eq!(round.distribution.preview_allocation(&a), 300 * USDC);
    assert_eq!(round.distribution.preview_allocation(&b), 200 * USDC);

    let bonds = round.distribution.claim(&a);
    let last_event = round.env.events().all().last().expect("No events found");

    assert_eq!(bonds, 300 * USDC);
    assert_eq!(round.distribution.bonds_of(&a), 300 * USDC);
    assert!(round.distribution.is_claimed(&a));
    assert_eq!(round.distribution.total_distributed(), 300 * USDC);

    assert_eq!(last_event.0, round.distribution.address);
    let expected_topics = vec![
        &round.env,
        Symbol::new(&round.env, "bonds_allocated").into_val(&round.env),
        a.into_val(&round.env),
    ];
    assert_eq!(last_event.1, expected_topics);
    let event_data: BondsAllocatedEvent = last_event.2.try_into_val(&round.env).unwrap();
    assert_eq!(
        event_data,
        BondsAllocatedEvent {
            investor: a.clone(),
            invested: 600 * USDC,
            bonds: 300 * USDC,
            price: 2 * BOND_SCALE,
        }
    );

    assert_eq!(
        round.distribution.try_claim(&a),
        Err(Ok(Error::AlreadyClaimed))
    );

    let stranger = Address::generate(&round.env);
    assert_eq!(
        round.distribution.try_claim(&stranger),
        Err(Ok(Error::NothingToClaim))
    );
    assert_eq!(
        round.distribution.try_preview_allocation(&stranger),
        Err(Ok(Error::NothingToClaim))
    );
}

#[test]
fn test_distribute_batch_skips_claimed() {
    let round = setup();
    let a = round.investor(500 * USDC);
    let b = round.investor(300 * USDC);
    let c = round.investor(200 * USDC);
    round.pool.set_bond_price(&BOND_SCALE);

    round.distribution.claim(&b);

    let allocated = round.distribution.distribute_batch(&0, &1);
    assert_eq!(allocated, 1);
    assert_eq!(round.distribution.bonds_of(&a), 500 * USDC);
    assert_eq!(round.distribution.bonds_of(&c), 0);

    // Slot 1 (b) already claimed, slot 2 (c) is allocated
    let allocated = round.distribution.distribute_batch(&1, &MAX_DISTRIBUTION_BATCH);
    assert_eq!(allocated, 1);
    assert_eq!(round.distribution.bonds_of(&c), 200 * USDC);
    assert_eq!(round.distribution.total_distributed(), 1_000 * USDC);

    // Everything allocated, a re-run is a no-op
    assert_eq!(round.distribution.distribute_batch(&0, &10), 0);
    assert_eq!(round.distribution.distribute_batch(&50, &10), 0);
    assert_eq!(round.distribution.total_distributed(), 1_000 * USDC);
}

#[test]
fn test_distribute_batch_limit_bounds() {
    let round = setup();
    round.investor(1_000 * USDC);
    round.pool.set_bond_price(&BOND_SCALE);

    assert_eq!(
        round.distribution.try_distribute_batch(&0, &0),
        Err(Ok(Error::InvalidBatchLimit))
    );
    assert_eq!(
        round.distribution.try_distribute_batch(&0, &(MAX_DISTRIBUTION_BATCH + 1)),
        Err(Ok(Error::InvalidBatchLimit))
    );
}

#[test]
fn test_pause_blocks_distribution() {
    let round = setup();
    let a = round.investor(1_000 * USDC);
    round.pool.set_bond_price(&BOND_SCALE);

    round.distribution.pause();
    assert_eq!(
        round.distribution.try_claim(&a),
        Err(Ok(Error::ContractPaused))
    );
    assert_eq!(
        round.distribution.try_distribute_batch(&0, &1),
        Err(Ok(Error::ContractPaused))
    );

    // Preview stays readable
    assert_eq!(round.distribution.preview_allocation(&a), 1_000 * USDC);

    round.distribution.unpause();
    assert_eq!(round.distribution.claim(&a), 1_000 * USDC);
}

#[test]
fn test_registry_frozen_after_distribution() {
    let round = setup();
    let a = round.investor(1_000 * USDC);
    round.pool.set_bond_price(&BOND_SCALE);
    round.distribution.claim(&a);

    // The pool refuses to release allocated funds
    round.env.ledger().set_timestamp(DEADLINE + 1);
    assert_eq!(
        round.pool.try_withdraw(&a),
        Err(Ok(funding_pool::Error::DistributionStarted))
    );
    assert_eq!(round.pool.amount_of(&a), 1_000 * USDC);
}

#[test]
fn test_admin_entry_points_require_admin() {
    let round = setup();

    round.distribution.pause();
    let auths = round.env.auths();
    assert_eq!(auths.len(), 1);
    assert_eq!(auths[0].0, round.admin);

    round.distribution.unpause();
    assert_eq!(round.env.auths()[0].0, round.admin);

    let unbound_id = round.env.register(BondDistribution, ());
    let unbound = BondDistributionClient::new(&round.env, &unbound_id);
    assert_eq!(unbound.try_pause(), Err(Ok(Error::NotInitialized)));
    assert_eq!(
        unbound.try_distribute_batch(&0, &1),
        Err(Ok(Error::NotInitialized))
    );
}

#[test]
fn test_allocation_ttl_extended() {
    let round = setup();
    let a = round.investor(1_000 * USDC);
    round.pool.set_bond_price(&BOND_SCALE);
    round.distribution.claim(&a);

    let ttl = round.env.as_contract(&round.distribution.address, || {
        round
            .env
            .storage()
            .persistent()
            .get_ttl(&DataKey::Allocation(a.clone()))
    });
    assert_eq!(ttl, PERSISTENT_BUMP_AMOUNT);
    assert_eq!(PERSISTENT_LIFETIME_THRESHOLD, 7 * DAY_IN_LEDGERS);
}
