pub mod calculations;
pub mod db;
pub mod models;

pub use db::repository::{EstimateRepository, RepositoryError};
pub use models::*;
