mod country;
mod filing_status;
mod tax_bracket;
mod tax_estimate;

pub use country::Country;
pub use filing_status::FilingStatus;
pub use tax_bracket::{BracketTable, BracketTableError, TaxBracket};
pub use tax_estimate::{NewTaxEstimate, TaxEstimate};
