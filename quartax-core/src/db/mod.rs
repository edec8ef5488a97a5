pub mod repository;

pub use repository::{EstimateRepository, RepositoryError};
