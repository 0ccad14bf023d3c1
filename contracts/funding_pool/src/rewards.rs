use soroban_sdk::{contracttype, log, vec, Address, Env, IntoVal, Symbol};

use crate::error::Error;

/// Credential tiers, encoded as the issuer contract's `Tier`.
#[contracttype]
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum RewardTier {
    Og = 0,
    Whale = 1,
}

fn has_issued(
    env: &Env,
    issuer: &Address,
    tier: RewardTier,
    investor: &Address,
) -> Result<bool, Error> {
    let result = env.try_invoke_contract::<bool, soroban_sdk::Error>(
        issuer,
        &Symbol::new(env, "has_issued"),
        vec![env, tier.into_val(env), investor.to_val()],
    );

    match result {
        Ok(Ok(issued)) => Ok(issued),
        _ => Err(Error::RewardIssuerUnset),
    }
}

/// Issue `tier` to `investor` unless it already holds one.
/// Returns whether a new credential was issued.
///
/// Any issuer failure surfaces as `RewardIssuerUnset`, which aborts the
/// calling operation as a whole.
pub fn grant(
    env: &Env,
    issuer: &Address,
    tier: RewardTier,
    investor: &Address,
) -> Result<bool, Error> {
    if has_issued(env, issuer, tier, investor)? {
        return Ok(false);
    }

    let result = env.try_invoke_contract::<u64, soroban_sdk::Error>(
        issuer,
        &Symbol::new(env, "issue"),
        vec![
            env,
            env.current_contract_address().to_val(),
            tier.into_val(env),
            investor.to_val(),
        ],
    );

    match result {
        Ok(Ok(_token_id)) => Ok(true),
        _ => {
            log!(
                env,
                "reward issuer rejected issuance",
                tier,
                investor.clone()
            );
            Err(Error::RewardIssuerUnset)
        }
    }
}
