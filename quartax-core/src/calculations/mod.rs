//! Tax calculation modules for the quarterly self-employment estimator.
//!
//! `brackets` holds the generic marginal accumulation algorithm, `countries`
//! the statutory tables and per-country adjustments layered on top of it,
//! and `worksheet` the quarterly estimate flow that the request layer calls.

pub mod brackets;
pub mod common;
pub mod countries;
pub mod worksheet;

pub use countries::{AnnualTax, CountryTables, TableId};
pub use worksheet::{QuarterlyWorksheet, TaxEstimateResult, TaxRequest, WorksheetError};
