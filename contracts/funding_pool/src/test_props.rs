use proptest::prelude::*;
use std::vec::Vec;

use soroban_sdk::Address;
use tier_rewards::Tier;

use crate::test::{setup_with, TestContext, UNIT};
use crate::RoundState;

const WHALE: i128 = 5_000 * UNIT;

/// Invest `amounts` in order from one fresh address and report whether the
/// Whale credential was held after each step.
fn whale_after_each(amounts: &[i128]) -> (TestContext, Address, Vec<bool>) {
    let ctx = setup_with(1, 1_000_000 * UNIT);
    let investor = ctx.funded_investor(amounts.iter().sum());

    let mut seen = Vec::new();
    for amount in amounts {
        ctx.pool.invest(&investor, amount);
        seen.push(ctx.rewards.has_issued(&Tier::Whale, &investor));
    }
    (ctx, investor, seen)
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(16))]

    /// Crossing the threshold in either order issues exactly one OG and one
    /// Whale credential.
    #[test]
    fn prop_whale_issued_once_in_either_order(
        small in 1i128..2_500,
        extra in 0i128..1_000,
    ) {
        let small = small * UNIT;
        let large = WHALE - small + extra * UNIT;

        for order in [[large, small], [small, large]] {
            let (ctx, investor, seen) = whale_after_each(&order);

            prop_assert_eq!(seen[0], order[0] >= WHALE);
            prop_assert!(seen[1]);
            prop_assert_eq!(ctx.rewards.total_issued(&Tier::Og), 1);
            prop_assert_eq!(ctx.rewards.total_issued(&Tier::Whale), 1);
            prop_assert_eq!(ctx.pool.amount_of(&investor), WHALE + extra * UNIT);
        }
    }

    /// Under any mix of investments, withdrawals and refund batches, the
    /// registry stays dense and its sum matches the pool's token balance.
    #[test]
    fn prop_registry_matches_balance(
        amounts in prop::collection::vec(1i128..1_000, 1..8),
        exits in prop::collection::vec(any::<bool>(), 8),
        batch in 1u32..4,
    ) {
        let ctx = setup_with(1, 1_000_000 * UNIT);

        let mut investors = Vec::new();
        for amount in &amounts {
            let investor = ctx.funded_investor(amount * UNIT);
            ctx.pool.invest(&investor, &(amount * UNIT));
            ctx.assert_ledger_consistent();
            investors.push(investor);
        }

        ctx.expire();
        prop_assert_eq!(ctx.pool.state(), RoundState::Expired);

        for (investor, exit) in investors.iter().zip(exits.iter()) {
            if *exit {
                ctx.pool.withdraw(investor);
                prop_assert_eq!(ctx.pool.amount_of(investor), 0);
                ctx.assert_ledger_consistent();
            }
        }

        while ctx.pool.investor_count() > 0 {
            let n = batch.min(ctx.pool.investor_count());
            prop_assert_eq!(ctx.pool.refund_batch(&n), n);
            ctx.assert_ledger_consistent();
        }

        prop_assert_eq!(ctx.pool.state(), RoundState::Refunded);
        prop_assert_eq!(ctx.token.balance(&ctx.pool.address), 0);
        for (investor, amount) in investors.iter().zip(amounts.iter()) {
            prop_assert_eq!(ctx.token.balance(investor), amount * UNIT);
        }
    }
}
