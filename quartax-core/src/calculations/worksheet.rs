//! Quarterly estimate worksheet.
//!
//! This is the flow the request layer drives once a quarter: net the four
//! deduction categories off gross quarterly income, annualize, compute the
//! annual tax for the requested country, and de-annualize. Bracket tables
//! are defined on annual income, so the annualize → tax → de-annualize
//! ordering is load-bearing: applying brackets to a quarterly figure
//! directly would misstate the marginal rates.
//!
//! # Example
//!
//! ```
//! use rust_decimal_macros::dec;
//! use quartax_core::calculations::{CountryTables, QuarterlyWorksheet, TaxRequest};
//!
//! let tables = CountryTables::new();
//! let worksheet = QuarterlyWorksheet::new(&tables);
//! let request = TaxRequest {
//!     gross_income: dec!(40000),
//!     business_expenses: dec!(0),
//!     retirement_contributions: dec!(0),
//!     health_insurance_premiums: dec!(0),
//!     home_office_deduction: dec!(0),
//!     quarter: "Q1-2024".to_string(),
//!     country: "USA".to_string(),
//!     state_province: String::new(),
//!     filing_status: "single".to_string(),
//! };
//!
//! let result = worksheet.calculate(&request).unwrap();
//! assert_eq!(result.annual_taxable_income, dec!(160000));
//! assert_eq!(result.quarterly_tax, dec!(7860.625));
//! ```

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::calculations::common::max;
use crate::calculations::countries::CountryTables;
use crate::{FilingStatus, NewTaxEstimate};

/// Four quarters per year; used both to annualize taxable income and to
/// de-annualize the resulting tax.
const QUARTERS_PER_YEAR: u32 = 4;

/// Errors reported when a request fails validation.
///
/// These are the checks the original request layer performed before
/// invoking the calculator; they live here because the HTTP layer itself
/// is out of scope.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum WorksheetError {
    #[error("{field} cannot be negative, got {value}")]
    NegativeAmount { field: &'static str, value: Decimal },

    #[error("quarter label is required")]
    MissingQuarter,

    #[error("country is required")]
    MissingCountry,
}

/// A validated-shape quarterly estimate request.
///
/// Amounts must be non-negative; `calculate` rejects the request otherwise.
/// `country` and `filing_status` are free text and are interpreted by the
/// calculation layer; `state_province` is recorded but never used in the
/// calculation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaxRequest {
    pub gross_income: Decimal,
    pub business_expenses: Decimal,
    pub retirement_contributions: Decimal,
    pub health_insurance_premiums: Decimal,
    pub home_office_deduction: Decimal,
    pub quarter: String,
    pub country: String,
    pub state_province: String,
    pub filing_status: String,
}

/// Result of a quarterly estimate.
///
/// Values are exact decimals; format with
/// [`to_currency_string`](crate::calculations::common::to_currency_string)
/// at the presentation boundary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaxEstimateResult {
    pub quarterly_taxable_income: Decimal,
    pub annual_taxable_income: Decimal,
    pub annual_tax: Decimal,
    pub quarterly_tax: Decimal,
    pub total_deductions: Decimal,

    pub country_used: String,
    pub state_province_used: String,
    pub filing_status_used: FilingStatus,

    /// True when the country had no bracket table and the flat fallback
    /// rate was applied.
    pub fallback_rate_applied: bool,
}

impl TaxEstimateResult {
    /// Builds the history record for this result, keyed by user and quarter.
    pub fn to_record(
        &self,
        user_id: i64,
        request: &TaxRequest,
    ) -> NewTaxEstimate {
        NewTaxEstimate {
            user_id,
            quarter: request.quarter.clone(),
            country: self.country_used.clone(),
            state_province: self.state_province_used.clone(),
            filing_status: self.filing_status_used.as_str().to_string(),
            gross_income: request.gross_income,
            business_expenses: request.business_expenses,
            retirement_contributions: request.retirement_contributions,
            health_insurance_premiums: request.health_insurance_premiums,
            home_office_deduction: request.home_office_deduction,
            total_deductions: self.total_deductions,
            quarterly_taxable_income: self.quarterly_taxable_income,
            annual_taxable_income: self.annual_taxable_income,
            annual_tax: self.annual_tax,
            estimated_quarterly_tax: self.quarterly_tax,
        }
    }
}

/// Calculator for the quarterly estimate worksheet.
#[derive(Debug, Clone)]
pub struct QuarterlyWorksheet<'a> {
    tables: &'a CountryTables,
}

impl<'a> QuarterlyWorksheet<'a> {
    pub fn new(tables: &'a CountryTables) -> Self {
        Self { tables }
    }

    /// Runs the full worksheet for one request.
    ///
    /// # Errors
    ///
    /// Returns [`WorksheetError`] when an amount is negative or the quarter
    /// or country label is blank. An unsupported country is not an error;
    /// it is reported via [`TaxEstimateResult::fallback_rate_applied`].
    pub fn calculate(
        &self,
        request: &TaxRequest,
    ) -> Result<TaxEstimateResult, WorksheetError> {
        self.validate(request)?;

        let filing_status = FilingStatus::from_input(&request.filing_status);
        let total_deductions = self.total_deductions(request);
        let quarterly_taxable_income =
            max(request.gross_income - total_deductions, Decimal::ZERO);
        let annual_taxable_income =
            quarterly_taxable_income * Decimal::from(QUARTERS_PER_YEAR);

        let annual = self.tables.annual_tax_for(
            &request.country,
            annual_taxable_income,
            filing_status,
        );
        let quarterly_tax = max(
            annual.amount / Decimal::from(QUARTERS_PER_YEAR),
            Decimal::ZERO,
        );

        Ok(TaxEstimateResult {
            quarterly_taxable_income,
            annual_taxable_income,
            annual_tax: annual.amount,
            quarterly_tax,
            total_deductions,
            country_used: request.country.trim().to_string(),
            state_province_used: request.state_province.trim().to_string(),
            filing_status_used: filing_status,
            fallback_rate_applied: annual.fallback_rate_applied,
        })
    }

    fn validate(
        &self,
        request: &TaxRequest,
    ) -> Result<(), WorksheetError> {
        for (field, value) in [
            ("gross_income", request.gross_income),
            ("business_expenses", request.business_expenses),
            ("retirement_contributions", request.retirement_contributions),
            (
                "health_insurance_premiums",
                request.health_insurance_premiums,
            ),
            ("home_office_deduction", request.home_office_deduction),
        ] {
            if value < Decimal::ZERO {
                return Err(WorksheetError::NegativeAmount { field, value });
            }
        }

        if request.quarter.trim().is_empty() {
            return Err(WorksheetError::MissingQuarter);
        }
        if request.country.trim().is_empty() {
            return Err(WorksheetError::MissingCountry);
        }

        Ok(())
    }

    fn total_deductions(
        &self,
        request: &TaxRequest,
    ) -> Decimal {
        request.business_expenses
            + request.retirement_contributions
            + request.health_insurance_premiums
            + request.home_office_deduction
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    use super::*;
    use crate::calculations::common::to_currency_string;

    fn test_request() -> TaxRequest {
        TaxRequest {
            gross_income: dec!(40000),
            business_expenses: dec!(0),
            retirement_contributions: dec!(0),
            health_insurance_premiums: dec!(0),
            home_office_deduction: dec!(0),
            quarter: "Q1-2024".to_string(),
            country: "USA".to_string(),
            state_province: String::new(),
            filing_status: "single".to_string(),
        }
    }

    #[test]
    fn usa_single_concrete_scenario() {
        let tables = CountryTables::new();
        let worksheet = QuarterlyWorksheet::new(&tables);

        let result = worksheet.calculate(&test_request()).unwrap();

        assert_eq!(result.quarterly_taxable_income, dec!(40000));
        assert_eq!(result.annual_taxable_income, dec!(160000));
        assert_eq!(result.annual_tax, dec!(31442.50));
        assert_eq!(result.quarterly_tax, dec!(7860.625));
        assert_eq!(result.total_deductions, dec!(0));
        assert!(!result.fallback_rate_applied);
        assert_eq!(result.filing_status_used, FilingStatus::Single);
    }

    #[test]
    fn deductions_reduce_quarterly_taxable_income() {
        let tables = CountryTables::new();
        let worksheet = QuarterlyWorksheet::new(&tables);
        let mut request = test_request();
        request.business_expenses = dec!(5000);
        request.retirement_contributions = dec!(2000);
        request.health_insurance_premiums = dec!(1500);
        request.home_office_deduction = dec!(500);

        let result = worksheet.calculate(&request).unwrap();

        assert_eq!(result.total_deductions, dec!(9000));
        assert_eq!(result.quarterly_taxable_income, dec!(31000));
        assert_eq!(result.annual_taxable_income, dec!(124000));
    }

    #[test]
    fn deductions_exceeding_income_floor_at_zero() {
        let tables = CountryTables::new();
        let worksheet = QuarterlyWorksheet::new(&tables);
        let mut request = test_request();
        request.business_expenses = dec!(50000);

        let result = worksheet.calculate(&request).unwrap();

        assert_eq!(result.quarterly_taxable_income, dec!(0));
        assert_eq!(result.annual_taxable_income, dec!(0));
        assert_eq!(result.annual_tax, dec!(0));
        assert_eq!(result.quarterly_tax, dec!(0));
    }

    #[test]
    fn quarterly_tax_is_annual_tax_over_four() {
        let tables = CountryTables::new();
        let worksheet = QuarterlyWorksheet::new(&tables);
        let mut request = test_request();
        request.country = "Canada".to_string();
        request.gross_income = dec!(25000);

        let result = worksheet.calculate(&request).unwrap();

        assert_eq!(result.annual_taxable_income, dec!(100000));
        assert_eq!(result.quarterly_tax * dec!(4), result.annual_tax);
    }

    #[test]
    fn married_filing_status_flows_through_to_usa_dispatch() {
        let tables = CountryTables::new();
        let worksheet = QuarterlyWorksheet::new(&tables);
        let mut married = test_request();
        married.filing_status = "Married Filing Jointly".to_string();

        let single_tax = worksheet.calculate(&test_request()).unwrap().quarterly_tax;
        let married_result = worksheet.calculate(&married).unwrap();

        assert_eq!(
            married_result.filing_status_used,
            FilingStatus::MarriedFilingJointly
        );
        assert!(married_result.quarterly_tax <= single_tax);
    }

    #[test]
    fn unsupported_country_is_flagged_not_rejected() {
        let tables = CountryTables::new();
        let worksheet = QuarterlyWorksheet::new(&tables);
        let mut request = test_request();
        request.country = "Brazil".to_string();

        let result = worksheet.calculate(&request).unwrap();

        assert!(result.fallback_rate_applied);
        // 160,000 * 0.15 / 4
        assert_eq!(result.quarterly_tax, dec!(6000.00));
    }

    #[test]
    fn negative_amount_is_rejected() {
        let tables = CountryTables::new();
        let worksheet = QuarterlyWorksheet::new(&tables);
        let mut request = test_request();
        request.retirement_contributions = dec!(-1);

        let result = worksheet.calculate(&request);

        assert_eq!(
            result,
            Err(WorksheetError::NegativeAmount {
                field: "retirement_contributions",
                value: dec!(-1),
            })
        );
    }

    #[test]
    fn blank_quarter_is_rejected() {
        let tables = CountryTables::new();
        let worksheet = QuarterlyWorksheet::new(&tables);
        let mut request = test_request();
        request.quarter = "  ".to_string();

        assert_eq!(
            worksheet.calculate(&request),
            Err(WorksheetError::MissingQuarter)
        );
    }

    #[test]
    fn blank_country_is_rejected() {
        let tables = CountryTables::new();
        let worksheet = QuarterlyWorksheet::new(&tables);
        let mut request = test_request();
        request.country = String::new();

        assert_eq!(
            worksheet.calculate(&request),
            Err(WorksheetError::MissingCountry)
        );
    }

    #[test]
    fn result_formats_as_currency_at_the_boundary() {
        let tables = CountryTables::new();
        let worksheet = QuarterlyWorksheet::new(&tables);

        let result = worksheet.calculate(&test_request()).unwrap();

        assert_eq!(to_currency_string(result.quarterly_tax), "7860.63");
        assert_eq!(to_currency_string(result.annual_tax), "31442.50");
    }

    #[test]
    fn to_record_captures_inputs_and_derived_values() {
        let tables = CountryTables::new();
        let worksheet = QuarterlyWorksheet::new(&tables);
        let request = test_request();

        let result = worksheet.calculate(&request).unwrap();
        let record = result.to_record(7, &request);

        assert_eq!(record.user_id, 7);
        assert_eq!(record.quarter, "Q1-2024");
        assert_eq!(record.country, "USA");
        assert_eq!(record.filing_status, "S");
        assert_eq!(record.gross_income, dec!(40000));
        assert_eq!(record.total_deductions, dec!(0));
        assert_eq!(record.estimated_quarterly_tax, dec!(7860.625));
        assert_eq!(record.annual_tax, dec!(31442.50));
    }
}
