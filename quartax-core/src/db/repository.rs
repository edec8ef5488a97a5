use async_trait::async_trait;
use thiserror::Error;

use crate::models::{NewTaxEstimate, TaxEstimate};

#[derive(Debug, Error, PartialEq, Eq)]
pub enum RepositoryError {
    #[error("Record not found")]
    NotFound,

    #[error("Database error: {0}")]
    Database(String),

    #[error("Connection error: {0}")]
    Connection(String),
}

/// Storage for a user's estimate history.
///
/// Records are write-once: they are created when an estimate is computed
/// and read back for history display; the only mutation is deletion.
#[async_trait]
pub trait EstimateRepository: Send + Sync {
    async fn create_estimate(
        &self,
        estimate: NewTaxEstimate,
    ) -> Result<TaxEstimate, RepositoryError>;

    async fn get_estimate(&self, id: i64) -> Result<TaxEstimate, RepositoryError>;

    /// All of a user's estimates, newest first.
    async fn list_estimates(&self, user_id: i64) -> Result<Vec<TaxEstimate>, RepositoryError>;

    /// A user's estimates for one quarter label, newest first.
    async fn list_estimates_for_quarter(
        &self,
        user_id: i64,
        quarter: &str,
    ) -> Result<Vec<TaxEstimate>, RepositoryError>;

    async fn delete_estimate(&self, id: i64) -> Result<(), RepositoryError>;
}
