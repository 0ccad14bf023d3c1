use crate::storage::BOND_SCALE;

/// Calculate the bonds owed for a recorded investment
///
/// Formula: bonds = invested × BOND_SCALE / price, rounded down
///
/// Example:
/// - invested: 600 USDC (6 decimals)
/// - price: 2.0 (2 × BOND_SCALE)
/// - bonds: 600 / 2.0 = 300
pub fn calculate_bond_allocation(invested: i128, price: i128) -> Option<i128> {
    if invested <= 0 || price <= 0 {
        return None;
    }

    invested.checked_mul(BOND_SCALE)?.checked_div(price)
}
