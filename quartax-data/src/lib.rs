mod loader;

pub use loader::{BracketTableLoader, BracketTableRecord, TableLoaderError};
