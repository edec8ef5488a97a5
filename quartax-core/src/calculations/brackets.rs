//! Generic marginal bracket accumulation.
//!
//! Every supported jurisdiction reduces to this one algorithm over a
//! [`BracketTable`]; the per-country differences (allowances, rebates,
//! surcharges, table choice) are applied around it in
//! [`countries`](crate::calculations::countries).

use rust_decimal::Decimal;

use crate::BracketTable;

/// Evaluates marginal tax over `income` for a validated bracket table.
///
/// Walks the brackets in ascending order, taxing only the slice of income
/// falling inside each band. Accumulation stops as soon as the income is
/// fully covered; the final unbounded bracket absorbs all remaining income
/// at the top marginal rate.
///
/// Income at or below zero yields exactly zero.
pub fn marginal_tax(
    income: Decimal,
    table: &BracketTable,
) -> Decimal {
    let mut tax = Decimal::ZERO;
    let mut previous_limit = Decimal::ZERO;

    for bracket in table.brackets() {
        if income <= previous_limit {
            break;
        }
        match bracket.upper_bound {
            Some(upper) => {
                let income_in_bracket = income.min(upper) - previous_limit;
                tax += income_in_bracket * bracket.rate;
                previous_limit = upper;
            }
            None => {
                // Unbounded top bracket: everything left is taxed here.
                tax += (income - previous_limit) * bracket.rate;
                break;
            }
        }
    }

    tax
}
