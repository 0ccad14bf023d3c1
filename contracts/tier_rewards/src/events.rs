use soroban_sdk::{contracttype, Address, Env, Symbol};

use crate::storage::Tier;

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct CredentialIssuedEvent {
    pub token_id: u64,
    pub tier: Tier,
    pub owner: Address,
    pub operator: Address,
}

pub fn emit_credential_issued(
    env: &Env,
    token_id: u64,
    tier: Tier,
    owner: Address,
    operator: Address,
) {
    env.events().publish(
        (Symbol::new(env, "credential_issued"), tier, owner.clone()),
        CredentialIssuedEvent {
            token_id,
            tier,
            owner,
            operator,
        },
    );
}
