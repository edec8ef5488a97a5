use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A stored quarterly estimate, one row of a user's history.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaxEstimate {
    pub id: i64,
    pub user_id: i64,
    pub quarter: String,

    // Request echo
    pub country: String,
    pub state_province: String,
    pub filing_status: String,

    // Inputs
    pub gross_income: Decimal,
    pub business_expenses: Decimal,
    pub retirement_contributions: Decimal,
    pub health_insurance_premiums: Decimal,
    pub home_office_deduction: Decimal,

    // Derived values
    pub total_deductions: Decimal,
    pub quarterly_taxable_income: Decimal,
    pub annual_taxable_income: Decimal,
    pub annual_tax: Decimal,
    pub estimated_quarterly_tax: Decimal,

    pub created_at: DateTime<Utc>,
}

/// For creating new history records (no id or timestamp).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewTaxEstimate {
    pub user_id: i64,
    pub quarter: String,
    pub country: String,
    pub state_province: String,
    pub filing_status: String,
    pub gross_income: Decimal,
    pub business_expenses: Decimal,
    pub retirement_contributions: Decimal,
    pub health_insurance_premiums: Decimal,
    pub home_office_deduction: Decimal,
    pub total_deductions: Decimal,
    pub quarterly_taxable_income: Decimal,
    pub annual_taxable_income: Decimal,
    pub annual_tax: Decimal,
    pub estimated_quarterly_tax: Decimal,
}
