use soroban_sdk::{contracttype, Address, Env, Symbol};

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct BondsAllocatedEvent {
    pub investor: Address,
    pub invested: i128,
    pub bonds: i128,
    pub price: i128,
}

pub fn emit_bonds_allocated(
    env: &Env,
    investor: Address,
    invested: i128,
    bonds: i128,
    price: i128,
) {
    env.events().publish(
        (Symbol::new(env, "bonds_allocated"), investor.clone()),
        BondsAllocatedEvent {
            investor,
            invested,
            bonds,
            price,
        },
    );
}
