use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A single marginal bracket: income up to `upper_bound` (exclusive of what
/// earlier brackets already covered) is taxed at `rate`.
///
/// `upper_bound` of `None` means unbounded; only the last bracket of a table
/// may be unbounded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaxBracket {
    pub upper_bound: Option<Decimal>,
    pub rate: Decimal,
}

/// Errors reported by [`BracketTable::new`] when a table violates the
/// bracket invariants.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum BracketTableError {
    #[error("bracket table must contain at least one bracket")]
    Empty,

    #[error("bracket {index} upper bound {bound} does not exceed the previous bound")]
    NonAscendingBound { index: usize, bound: Decimal },

    #[error("bracket {index} is unbounded but is not the last bracket")]
    UnboundedBeforeLast { index: usize },

    #[error("last bracket must be unbounded (no upper bound)")]
    BoundedLast,

    #[error("bracket {index} rate {rate} is outside [0, 1]")]
    RateOutOfRange { index: usize, rate: Decimal },
}

/// A validated, immutable sequence of marginal brackets in ascending order.
///
/// Construction enforces the invariants the accumulation algorithm relies
/// on: upper bounds strictly increase, exactly the final bracket is
/// unbounded, and every rate is a fraction in `[0, 1]`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BracketTable {
    brackets: Vec<TaxBracket>,
}

impl BracketTable {
    pub fn new(brackets: Vec<TaxBracket>) -> Result<Self, BracketTableError> {
        if brackets.is_empty() {
            return Err(BracketTableError::Empty);
        }

        let last = brackets.len() - 1;
        let mut previous_bound: Option<Decimal> = None;
        for (index, bracket) in brackets.iter().enumerate() {
            if bracket.rate < Decimal::ZERO || bracket.rate > Decimal::ONE {
                return Err(BracketTableError::RateOutOfRange {
                    index,
                    rate: bracket.rate,
                });
            }
            match bracket.upper_bound {
                Some(bound) => {
                    if index == last {
                        return Err(BracketTableError::BoundedLast);
                    }
                    if previous_bound.is_some_and(|prev| bound <= prev) {
                        return Err(BracketTableError::NonAscendingBound { index, bound });
                    }
                    previous_bound = Some(bound);
                }
                None => {
                    if index != last {
                        return Err(BracketTableError::UnboundedBeforeLast { index });
                    }
                }
            }
        }

        Ok(Self { brackets })
    }

    pub fn brackets(&self) -> &[TaxBracket] {
        &self.brackets
    }

    pub fn len(&self) -> usize {
        self.brackets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.brackets.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    use super::*;

    fn bounded(upper: Decimal, rate: Decimal) -> TaxBracket {
        TaxBracket {
            upper_bound: Some(upper),
            rate,
        }
    }

    fn unbounded(rate: Decimal) -> TaxBracket {
        TaxBracket {
            upper_bound: None,
            rate,
        }
    }

    #[test]
    fn new_accepts_valid_table() {
        let table = BracketTable::new(vec![
            bounded(dec!(10000), dec!(0.10)),
            bounded(dec!(50000), dec!(0.20)),
            unbounded(dec!(0.30)),
        ])
        .expect("valid table");

        assert_eq!(table.len(), 3);
    }

    #[test]
    fn new_accepts_single_unbounded_bracket() {
        let table = BracketTable::new(vec![unbounded(dec!(0.15))]).expect("valid table");

        assert_eq!(table.len(), 1);
        assert_eq!(table.brackets()[0].upper_bound, None);
    }

    #[test]
    fn new_rejects_empty_table() {
        let result = BracketTable::new(vec![]);

        assert_eq!(result, Err(BracketTableError::Empty));
    }

    #[test]
    fn new_rejects_bounded_last_bracket() {
        let result = BracketTable::new(vec![
            bounded(dec!(10000), dec!(0.10)),
            bounded(dec!(50000), dec!(0.20)),
        ]);

        assert_eq!(result, Err(BracketTableError::BoundedLast));
    }

    #[test]
    fn new_rejects_unbounded_bracket_before_last() {
        let result = BracketTable::new(vec![unbounded(dec!(0.10)), unbounded(dec!(0.20))]);

        assert_eq!(result, Err(BracketTableError::UnboundedBeforeLast { index: 0 }));
    }

    #[test]
    fn new_rejects_non_ascending_bounds() {
        let result = BracketTable::new(vec![
            bounded(dec!(50000), dec!(0.10)),
            bounded(dec!(10000), dec!(0.20)),
            unbounded(dec!(0.30)),
        ]);

        assert_eq!(
            result,
            Err(BracketTableError::NonAscendingBound {
                index: 1,
                bound: dec!(10000),
            })
        );
    }

    #[test]
    fn new_rejects_equal_bounds() {
        let result = BracketTable::new(vec![
            bounded(dec!(10000), dec!(0.10)),
            bounded(dec!(10000), dec!(0.20)),
            unbounded(dec!(0.30)),
        ]);

        assert_eq!(
            result,
            Err(BracketTableError::NonAscendingBound {
                index: 1,
                bound: dec!(10000),
            })
        );
    }

    #[test]
    fn new_rejects_negative_rate() {
        let result = BracketTable::new(vec![bounded(dec!(10000), dec!(-0.10)), unbounded(dec!(0.30))]);

        assert_eq!(
            result,
            Err(BracketTableError::RateOutOfRange {
                index: 0,
                rate: dec!(-0.10),
            })
        );
    }

    #[test]
    fn new_rejects_rate_above_one() {
        let result = BracketTable::new(vec![unbounded(dec!(1.04))]);

        assert_eq!(
            result,
            Err(BracketTableError::RateOutOfRange {
                index: 0,
                rate: dec!(1.04),
            })
        );
    }

    #[test]
    fn new_accepts_zero_rate_bracket() {
        // Several statutory tables open with a 0% band.
        let table = BracketTable::new(vec![
            bounded(dec!(18200), dec!(0)),
            unbounded(dec!(0.45)),
        ])
        .expect("valid table");

        assert_eq!(table.brackets()[0].rate, dec!(0));
    }
}
