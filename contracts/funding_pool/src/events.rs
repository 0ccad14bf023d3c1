use soroban_sdk::{contracttype, Address, Env, Symbol};

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct InvestmentMadeEvent {
    pub investor: Address,
    pub amount: i128,
    /// Investor's cumulative amount after this investment
    pub investor_total: i128,
    pub timestamp: u64,
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct WithdrawalMadeEvent {
    pub investor: Address,
    pub amount: i128,
    pub timestamp: u64,
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct RefundedInvestorsEvent {
    pub count: u32,
    pub amount: i128,
    pub remaining: u32,
    pub timestamp: u64,
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct TargetAmountChangedEvent {
    pub old_target: i128,
    pub new_target: i128,
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct DeadlineExtendedEvent {
    pub old_deadline: u64,
    pub new_deadline: u64,
    pub days: u32,
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct MinimumTicketChangedEvent {
    pub old_minimum: i128,
    pub new_minimum: i128,
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct BondPriceSetEvent {
    pub price: i128,
    pub total_invested: i128,
    pub investor_count: u32,
    pub timestamp: u64,
}

pub fn emit_investment_made(env: &Env, investor: Address, amount: i128, investor_total: i128) {
    env.events().publish(
        (Symbol::new(env, "investment_made"), investor.clone()),
        InvestmentMadeEvent {
            investor,
            amount,
            investor_total,
            timestamp: env.ledger().timestamp(),
        },
    );
}

pub fn emit_withdrawal_made(env: &Env, investor: Address, amount: i128) {
    env.events().publish(
        (Symbol::new(env, "withdrawal_made"), investor.clone()),
        WithdrawalMadeEvent {
            investor,
            amount,
            timestamp: env.ledger().timestamp(),
        },
    );
}

pub fn emit_refunded_investors(env: &Env, count: u32, amount: i128, remaining: u32) {
    env.events().publish(
        (Symbol::new(env, "refunded_investors"),),
        RefundedInvestorsEvent {
            count,
            amount,
            remaining,
            timestamp: env.ledger().timestamp(),
        },
    );
}

pub fn emit_target_amount_changed(env: &Env, old_target: i128, new_target: i128) {
    env.events().publish(
        (Symbol::new(env, "target_amount_changed"),),
        TargetAmountChangedEvent {
            old_target,
            new_target,
        },
    );
}

pub fn emit_deadline_extended(env: &Env, old_deadline: u64, new_deadline: u64, days: u32) {
    env.events().publish(
        (Symbol::new(env, "deadline_extended"),),
        DeadlineExtendedEvent {
            old_deadline,
            new_deadline,
            days,
        },
    );
}

pub fn emit_minimum_ticket_changed(env: &Env, old_minimum: i128, new_minimum: i128) {
    env.events().publish(
        (Symbol::new(env, "minimum_ticket_changed"),),
        MinimumTicketChangedEvent {
            old_minimum,
            new_minimum,
        },
    );
}

pub fn emit_bond_price_set(env: &Env, price: i128, total_invested: i128, investor_count: u32) {
    env.events().publish(
        (Symbol::new(env, "bond_price_set"),),
        BondPriceSetEvent {
            price,
            total_invested,
            investor_count,
            timestamp: env.ledger().timestamp(),
        },
    );
}
