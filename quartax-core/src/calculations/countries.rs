//! Statutory bracket tables and per-country adjustments.
//!
//! Each supported jurisdiction runs the same marginal accumulation from
//! [`brackets`](crate::calculations::brackets); what differs is the table
//! and a small pre/post adjustment:
//!
//! | Country   | Adjustment |
//! |-----------|------------|
//! | India     | Full rebate at or below 700,000; 4% cess on the slab tax above it |
//! | USA       | Table chosen by filing status (married vs everyone else) |
//! | UK        | Personal allowance 12,570 subtracted first; thresholds are allowance-relative |
//! | Canada    | Basic personal amount 15,705 subtracted first |
//! | Germany   | Basic allowance 11,604 subtracted first; thresholds pre-adjusted |
//! | Australia, France, Japan | None |
//!
//! The UK/Germany tables deliberately carry thresholds already shifted by
//! the allowance so the generic evaluator applies unchanged; the absolute
//! statutory numbers appear in the table comments. An unrecognized country
//! is not an error: it takes a flat 15% rate and is flagged on the result
//! so callers can surface the approximation.
//!
//! Tables are built once on first use and never recomputed per call.

use std::collections::HashMap;
use std::sync::LazyLock;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::calculations::brackets::marginal_tax;
use crate::calculations::common::max;
use crate::{BracketTable, Country, FilingStatus, TaxBracket};

/// Flat rate applied when the country has no bracket table: 15%.
static FLAT_FALLBACK_RATE: LazyLock<Decimal> = LazyLock::new(|| Decimal::new(15, 2));

/// India: slab tax is waived entirely at or below this income.
static INDIA_REBATE_LIMIT: LazyLock<Decimal> = LazyLock::new(|| Decimal::from(700_000));
/// India: 4% health-and-education cess multiplier applied above the rebate limit.
static INDIA_CESS_FACTOR: LazyLock<Decimal> = LazyLock::new(|| Decimal::new(104, 2));

static UK_PERSONAL_ALLOWANCE: LazyLock<Decimal> = LazyLock::new(|| Decimal::from(12_570));
static CANADA_BASIC_PERSONAL_AMOUNT: LazyLock<Decimal> = LazyLock::new(|| Decimal::from(15_705));
static GERMANY_BASIC_ALLOWANCE: LazyLock<Decimal> = LazyLock::new(|| Decimal::from(11_604));

fn up_to(
    upper: i64,
    rate: Decimal,
) -> TaxBracket {
    TaxBracket {
        upper_bound: Some(Decimal::from(upper)),
        rate,
    }
}

fn top(rate: Decimal) -> TaxBracket {
    TaxBracket {
        upper_bound: None,
        rate,
    }
}

fn statutory(brackets: Vec<TaxBracket>) -> BracketTable {
    BracketTable::new(brackets).expect("statutory bracket table must satisfy bracket invariants")
}

static INDIA_NEW_REGIME: LazyLock<BracketTable> = LazyLock::new(|| {
    statutory(vec![
        up_to(300_000, Decimal::ZERO),
        up_to(600_000, Decimal::new(5, 2)),
        up_to(900_000, Decimal::new(10, 2)),
        up_to(1_200_000, Decimal::new(15, 2)),
        up_to(1_500_000, Decimal::new(20, 2)),
        top(Decimal::new(30, 2)),
    ])
});

static USA_SINGLE: LazyLock<BracketTable> = LazyLock::new(|| {
    statutory(vec![
        up_to(11_600, Decimal::new(10, 2)),
        up_to(47_150, Decimal::new(12, 2)),
        up_to(100_525, Decimal::new(22, 2)),
        up_to(191_950, Decimal::new(24, 2)),
        up_to(243_725, Decimal::new(32, 2)),
        up_to(609_350, Decimal::new(35, 2)),
        top(Decimal::new(37, 2)),
    ])
});

static USA_MARRIED_FILING_JOINTLY: LazyLock<BracketTable> = LazyLock::new(|| {
    statutory(vec![
        up_to(23_200, Decimal::new(10, 2)),
        up_to(94_300, Decimal::new(12, 2)),
        up_to(201_050, Decimal::new(22, 2)),
        up_to(383_900, Decimal::new(24, 2)),
        up_to(487_450, Decimal::new(32, 2)),
        up_to(731_200, Decimal::new(35, 2)),
        top(Decimal::new(37, 2)),
    ])
});

// Thresholds relative to post-allowance income; 112,570 is the statutory
// 125,140 minus the 12,570 personal allowance.
static UK: LazyLock<BracketTable> = LazyLock::new(|| {
    statutory(vec![
        up_to(37_700, Decimal::new(20, 2)),
        up_to(112_570, Decimal::new(40, 2)),
        top(Decimal::new(45, 2)),
    ])
});

static CANADA: LazyLock<BracketTable> = LazyLock::new(|| {
    statutory(vec![
        up_to(55_867, Decimal::new(15, 2)),
        up_to(111_733, Decimal::new(205, 3)),
        up_to(173_205, Decimal::new(26, 2)),
        up_to(246_752, Decimal::new(29, 2)),
        top(Decimal::new(33, 2)),
    ])
});

static AUSTRALIA: LazyLock<BracketTable> = LazyLock::new(|| {
    statutory(vec![
        up_to(18_200, Decimal::ZERO),
        up_to(45_000, Decimal::new(19, 2)),
        up_to(120_000, Decimal::new(325, 3)),
        up_to(180_000, Decimal::new(37, 2)),
        top(Decimal::new(45, 2)),
    ])
});

// 55,156 and 266,221 are the statutory 66,760 and 277,825 minus the 11,604
// basic allowance.
static GERMANY: LazyLock<BracketTable> = LazyLock::new(|| {
    statutory(vec![
        up_to(55_156, Decimal::new(14, 2)),
        up_to(266_221, Decimal::new(42, 2)),
        top(Decimal::new(45, 2)),
    ])
});

static FRANCE: LazyLock<BracketTable> = LazyLock::new(|| {
    statutory(vec![
        up_to(11_294, Decimal::ZERO),
        up_to(28_797, Decimal::new(11, 2)),
        up_to(82_341, Decimal::new(30, 2)),
        up_to(177_106, Decimal::new(41, 2)),
        top(Decimal::new(45, 2)),
    ])
});

static JAPAN: LazyLock<BracketTable> = LazyLock::new(|| {
    statutory(vec![
        up_to(1_950_000, Decimal::new(5, 2)),
        up_to(3_300_000, Decimal::new(10, 2)),
        up_to(6_950_000, Decimal::new(20, 2)),
        up_to(9_000_000, Decimal::new(23, 2)),
        up_to(18_000_000, Decimal::new(33, 2)),
        up_to(40_000_000, Decimal::new(40, 2)),
        top(Decimal::new(45, 2)),
    ])
});

/// Identifies one replaceable bracket table.
///
/// The USA carries two tables, so table identity is finer-grained than
/// [`Country`]. These ids double as the `table` column values in override
/// CSV files.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TableId {
    India,
    UsaSingle,
    UsaMarried,
    Uk,
    Canada,
    Australia,
    Germany,
    France,
    Japan,
}

impl TableId {
    pub const ALL: [TableId; 9] = [
        TableId::India,
        TableId::UsaSingle,
        TableId::UsaMarried,
        TableId::Uk,
        TableId::Canada,
        TableId::Australia,
        TableId::Germany,
        TableId::France,
        TableId::Japan,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::India => "india",
            Self::UsaSingle => "usa-single",
            Self::UsaMarried => "usa-married",
            Self::Uk => "uk",
            Self::Canada => "canada",
            Self::Australia => "australia",
            Self::Germany => "germany",
            Self::France => "france",
            Self::Japan => "japan",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "india" => Some(Self::India),
            "usa-single" => Some(Self::UsaSingle),
            "usa-married" => Some(Self::UsaMarried),
            "uk" => Some(Self::Uk),
            "canada" => Some(Self::Canada),
            "australia" => Some(Self::Australia),
            "germany" => Some(Self::Germany),
            "france" => Some(Self::France),
            "japan" => Some(Self::Japan),
            _ => None,
        }
    }
}

fn builtin(id: TableId) -> &'static BracketTable {
    match id {
        TableId::India => &INDIA_NEW_REGIME,
        TableId::UsaSingle => &USA_SINGLE,
        TableId::UsaMarried => &USA_MARRIED_FILING_JOINTLY,
        TableId::Uk => &UK,
        TableId::Canada => &CANADA,
        TableId::Australia => &AUSTRALIA,
        TableId::Germany => &GERMANY,
        TableId::France => &FRANCE,
        TableId::Japan => &JAPAN,
    }
}

/// Result of an annual tax estimate dispatched on raw country input.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnnualTax {
    pub amount: Decimal,

    /// True when the country had no bracket table and the flat 15% rate was
    /// used. Callers should surface this: the flat rate can silently under-
    /// or over-estimate the real liability.
    pub fallback_rate_applied: bool,
}

/// Bracket table set used by the estimator.
///
/// Starts out backed by the built-in statutory tables; individual tables
/// can be replaced (e.g. when a new tax year's figures are loaded from
/// CSV). Allowances, the India rebate, and the cess factor are fixed by
/// the calculation and are not part of the replaceable data.
#[derive(Debug, Clone, Default)]
pub struct CountryTables {
    overrides: HashMap<TableId, BracketTable>,
}

impl CountryTables {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the table for `id`. The table has already passed
    /// [`BracketTable::new`] validation by construction.
    pub fn set_table(
        &mut self,
        id: TableId,
        table: BracketTable,
    ) {
        self.overrides.insert(id, table);
    }

    pub fn table(
        &self,
        id: TableId,
    ) -> &BracketTable {
        self.overrides.get(&id).unwrap_or_else(|| builtin(id))
    }

    /// Estimates annual tax for a supported country.
    ///
    /// `annual_taxable_income` at or below zero yields exactly zero for
    /// every country; the check runs before any per-country adjustment.
    pub fn annual_tax(
        &self,
        country: Country,
        annual_taxable_income: Decimal,
        filing_status: FilingStatus,
    ) -> Decimal {
        if annual_taxable_income <= Decimal::ZERO {
            return Decimal::ZERO;
        }

        match country {
            Country::India => self.india_tax(annual_taxable_income),
            Country::Usa => self.usa_tax(annual_taxable_income, filing_status),
            Country::Uk => self.allowance_tax(
                TableId::Uk,
                annual_taxable_income,
                *UK_PERSONAL_ALLOWANCE,
            ),
            Country::Canada => self.allowance_tax(
                TableId::Canada,
                annual_taxable_income,
                *CANADA_BASIC_PERSONAL_AMOUNT,
            ),
            Country::Germany => self.allowance_tax(
                TableId::Germany,
                annual_taxable_income,
                *GERMANY_BASIC_ALLOWANCE,
            ),
            Country::Australia => marginal_tax(annual_taxable_income, self.table(TableId::Australia)),
            Country::France => marginal_tax(annual_taxable_income, self.table(TableId::France)),
            Country::Japan => marginal_tax(annual_taxable_income, self.table(TableId::Japan)),
        }
    }

    /// Estimates annual tax from raw country input.
    ///
    /// A country that does not parse takes the flat 15% rate; the result is
    /// flagged and a warning is logged so partially-supported jurisdictions
    /// show up in monitoring rather than failing the request.
    pub fn annual_tax_for(
        &self,
        raw_country: &str,
        annual_taxable_income: Decimal,
        filing_status: FilingStatus,
    ) -> AnnualTax {
        match Country::parse(raw_country) {
            Some(country) => AnnualTax {
                amount: self.annual_tax(country, annual_taxable_income, filing_status),
                fallback_rate_applied: false,
            },
            None => {
                warn!(
                    country = raw_country,
                    "no bracket table for country, using flat fallback rate"
                );
                let amount = if annual_taxable_income <= Decimal::ZERO {
                    Decimal::ZERO
                } else {
                    annual_taxable_income * *FLAT_FALLBACK_RATE
                };
                AnnualTax {
                    amount,
                    fallback_rate_applied: true,
                }
            }
        }
    }

    /// Rebate check runs before the cess: income at or below the limit owes
    /// nothing, income above it pays the full slab tax times 1.04. The
    /// ordering is carried over from the source data as-is.
    fn india_tax(
        &self,
        income: Decimal,
    ) -> Decimal {
        if income <= *INDIA_REBATE_LIMIT {
            return Decimal::ZERO;
        }
        marginal_tax(income, self.table(TableId::India)) * *INDIA_CESS_FACTOR
    }

    /// Married filing jointly gets its own table; single and head of
    /// household both use the single table.
    fn usa_tax(
        &self,
        income: Decimal,
        filing_status: FilingStatus,
    ) -> Decimal {
        let id = match filing_status {
            FilingStatus::MarriedFilingJointly => TableId::UsaMarried,
            FilingStatus::Single | FilingStatus::HeadOfHousehold => TableId::UsaSingle,
        };
        marginal_tax(income, self.table(id))
    }

    /// Subtract the allowance (floored at zero), then evaluate a table whose
    /// thresholds are already allowance-relative.
    fn allowance_tax(
        &self,
        id: TableId,
        income: Decimal,
        allowance: Decimal,
    ) -> Decimal {
        let taxable = max(income - allowance, Decimal::ZERO);
        marginal_tax(taxable, self.table(id))
    }
}
