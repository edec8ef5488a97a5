use std::collections::HashMap;
use std::io::Read;

use quartax_core::calculations::{CountryTables, TableId};
use quartax_core::{BracketTable, BracketTableError, TaxBracket};
use rust_decimal::Decimal;
use serde::Deserialize;
use thiserror::Error;

/// Errors that can occur when loading bracket-table override data.
#[derive(Debug, Error)]
pub enum TableLoaderError {
    #[error("CSV parse error: {0}")]
    CsvParse(String),

    #[error("Unknown table id '{0}'")]
    UnknownTable(String),

    #[error("Invalid bracket table '{table}': {source}")]
    InvalidTable {
        table: &'static str,
        #[source]
        source: BracketTableError,
    },
}

impl From<csv::Error> for TableLoaderError {
    fn from(err: csv::Error) -> Self {
        TableLoaderError::CsvParse(err.to_string())
    }
}

/// A single row from a bracket-table override CSV file.
///
/// The CSV format:
/// - `table`: the table id (`india`, `usa-single`, `usa-married`, `uk`,
///   `canada`, `australia`, `germany`, `france`, `japan`)
/// - `upper_bound`: the bracket's upper income bound (empty for unbounded;
///   only valid on a table's final row)
/// - `rate`: the marginal rate as a fraction (e.g. 0.22 for 22%)
///
/// Rows for one table must appear in ascending bound order; the UK and
/// Germany tables must carry allowance-relative bounds, matching the
/// built-in tables they replace.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct BracketTableRecord {
    pub table: String,
    #[serde(deserialize_with = "deserialize_optional_decimal")]
    pub upper_bound: Option<Decimal>,
    pub rate: Decimal,
}

fn deserialize_optional_decimal<'de, D>(deserializer: D) -> Result<Option<Decimal>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let s: Option<String> = Option::deserialize(deserializer)?;
    match s {
        Some(s) if s.trim().is_empty() => Ok(None),
        Some(s) => s
            .trim()
            .parse::<Decimal>()
            .map(Some)
            .map_err(serde::de::Error::custom),
        None => Ok(None),
    }
}

/// Loader for bracket-table overrides from CSV.
///
/// Statutory tables change every tax year; this loader turns a CSV of
/// replacement tables into a [`CountryTables`] set, re-validating every
/// table through [`BracketTable::new`] before it can be used. Tables not
/// present in the file keep their built-in data.
pub struct BracketTableLoader;

impl BracketTableLoader {
    /// Parse bracket records from a CSV reader.
    pub fn parse<R: Read>(reader: R) -> Result<Vec<BracketTableRecord>, TableLoaderError> {
        let mut csv_reader = csv::Reader::from_reader(reader);
        let mut records = Vec::new();

        for result in csv_reader.deserialize() {
            let record: BracketTableRecord = result?;
            records.push(record);
        }

        Ok(records)
    }

    /// Build a [`CountryTables`] set from parsed records.
    ///
    /// Rows are grouped by table id in file order, so each table's rows
    /// must already be ascending; a table violating the bracket invariants
    /// is rejected as a whole.
    pub fn build(records: &[BracketTableRecord]) -> Result<CountryTables, TableLoaderError> {
        let mut groups: HashMap<TableId, Vec<TaxBracket>> = HashMap::new();

        for record in records {
            let id = TableId::parse(&record.table)
                .ok_or_else(|| TableLoaderError::UnknownTable(record.table.clone()))?;
            groups.entry(id).or_default().push(TaxBracket {
                upper_bound: record.upper_bound,
                rate: record.rate,
            });
        }

        let mut tables = CountryTables::new();
        for (id, brackets) in groups {
            let table = BracketTable::new(brackets).map_err(|source| {
                TableLoaderError::InvalidTable {
                    table: id.as_str(),
                    source,
                }
            })?;
            tables.set_table(id, table);
        }

        Ok(tables)
    }

    /// Parse and build in one step.
    pub fn load<R: Read>(reader: R) -> Result<CountryTables, TableLoaderError> {
        let records = Self::parse(reader)?;
        Self::build(&records)
    }
}
