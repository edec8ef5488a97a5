use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use quartax_core::{EstimateRepository, NewTaxEstimate, RepositoryError, TaxEstimate};
use sqlx::{Row, sqlite::SqlitePool};

use crate::decimal::{decimal_to_f64, get_decimal};

const ESTIMATE_COLUMNS: &str = "id, user_id, quarter, country, state_province, filing_status,
        gross_income, business_expenses, retirement_contributions,
        health_insurance_premiums, home_office_deduction, total_deductions,
        quarterly_taxable_income, annual_taxable_income, annual_tax,
        estimated_quarterly_tax, created_at";

pub struct SqliteRepository {
    pool: SqlitePool,
}

impl SqliteRepository {
    pub async fn new(database_url: &str) -> Result<Self> {
        let pool = SqlitePool::connect(database_url)
            .await
            .with_context(|| format!("Failed to connect to database: {}", database_url))?;
        Ok(Self { pool })
    }

    pub async fn new_with_pool(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn run_migrations(&self) -> Result<()> {
        sqlx::migrate!("./migrations")
            .run(&self.pool)
            .await
            .context("Failed to run database migrations")?;
        Ok(())
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }
}

fn row_to_tax_estimate(row: &sqlx::sqlite::SqliteRow) -> Result<TaxEstimate, RepositoryError> {
    Ok(TaxEstimate {
        id: row
            .try_get("id")
            .map_err(|e| RepositoryError::Database(e.to_string()))?,
        user_id: row
            .try_get("user_id")
            .map_err(|e| RepositoryError::Database(e.to_string()))?,
        quarter: row
            .try_get("quarter")
            .map_err(|e| RepositoryError::Database(e.to_string()))?,
        country: row
            .try_get("country")
            .map_err(|e| RepositoryError::Database(e.to_string()))?,
        state_province: row
            .try_get("state_province")
            .map_err(|e| RepositoryError::Database(e.to_string()))?,
        filing_status: row
            .try_get("filing_status")
            .map_err(|e| RepositoryError::Database(e.to_string()))?,
        gross_income: get_decimal(row, "gross_income")?,
        business_expenses: get_decimal(row, "business_expenses")?,
        retirement_contributions: get_decimal(row, "retirement_contributions")?,
        health_insurance_premiums: get_decimal(row, "health_insurance_premiums")?,
        home_office_deduction: get_decimal(row, "home_office_deduction")?,
        total_deductions: get_decimal(row, "total_deductions")?,
        quarterly_taxable_income: get_decimal(row, "quarterly_taxable_income")?,
        annual_taxable_income: get_decimal(row, "annual_taxable_income")?,
        annual_tax: get_decimal(row, "annual_tax")?,
        estimated_quarterly_tax: get_decimal(row, "estimated_quarterly_tax")?,
        created_at: row
            .try_get::<DateTime<Utc>, _>("created_at")
            .map_err(|e| RepositoryError::Database(format!("Failed to get created_at: {}", e)))?,
    })
}

#[async_trait]
impl EstimateRepository for SqliteRepository {
    async fn create_estimate(
        &self,
        estimate: NewTaxEstimate,
    ) -> Result<TaxEstimate, RepositoryError> {
        let now = Utc::now();

        let result = sqlx::query(
            "INSERT INTO tax_estimates (
                user_id, quarter, country, state_province, filing_status,
                gross_income, business_expenses, retirement_contributions,
                health_insurance_premiums, home_office_deduction, total_deductions,
                quarterly_taxable_income, annual_taxable_income, annual_tax,
                estimated_quarterly_tax, created_at
            ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(estimate.user_id)
        .bind(&estimate.quarter)
        .bind(&estimate.country)
        .bind(&estimate.state_province)
        .bind(&estimate.filing_status)
        .bind(decimal_to_f64(estimate.gross_income))
        .bind(decimal_to_f64(estimate.business_expenses))
        .bind(decimal_to_f64(estimate.retirement_contributions))
        .bind(decimal_to_f64(estimate.health_insurance_premiums))
        .bind(decimal_to_f64(estimate.home_office_deduction))
        .bind(decimal_to_f64(estimate.total_deductions))
        .bind(decimal_to_f64(estimate.quarterly_taxable_income))
        .bind(decimal_to_f64(estimate.annual_taxable_income))
        .bind(decimal_to_f64(estimate.annual_tax))
        .bind(decimal_to_f64(estimate.estimated_quarterly_tax))
        .bind(now)
        .execute(&self.pool)
        .await
        .map_err(|e| RepositoryError::Database(e.to_string()))?;

        let id = result.last_insert_rowid();
        self.get_estimate(id).await
    }

    async fn get_estimate(
        &self,
        id: i64,
    ) -> Result<TaxEstimate, RepositoryError> {
        let row = sqlx::query(&format!(
            "SELECT {} FROM tax_estimates WHERE id = ?",
            ESTIMATE_COLUMNS
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| RepositoryError::Database(e.to_string()))?
        .ok_or(RepositoryError::NotFound)?;

        row_to_tax_estimate(&row)
    }

    async fn list_estimates(
        &self,
        user_id: i64,
    ) -> Result<Vec<TaxEstimate>, RepositoryError> {
        let rows = sqlx::query(&format!(
            "SELECT {} FROM tax_estimates
             WHERE user_id = ?
             ORDER BY created_at DESC, id DESC",
            ESTIMATE_COLUMNS
        ))
        .bind(user_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| RepositoryError::Database(e.to_string()))?;

        rows.iter().map(row_to_tax_estimate).collect()
    }

    async fn list_estimates_for_quarter(
        &self,
        user_id: i64,
        quarter: &str,
    ) -> Result<Vec<TaxEstimate>, RepositoryError> {
        let rows = sqlx::query(&format!(
            "SELECT {} FROM tax_estimates
             WHERE user_id = ? AND quarter = ?
             ORDER BY created_at DESC, id DESC",
            ESTIMATE_COLUMNS
        ))
        .bind(user_id)
        .bind(quarter)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| RepositoryError::Database(e.to_string()))?;

        rows.iter().map(row_to_tax_estimate).collect()
    }

    async fn delete_estimate(
        &self,
        id: i64,
    ) -> Result<(), RepositoryError> {
        let result = sqlx::query("DELETE FROM tax_estimates WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| RepositoryError::Database(e.to_string()))?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }

        Ok(())
    }
}
