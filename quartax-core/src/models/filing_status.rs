use serde::{Deserialize, Serialize};

/// Filing status for USA bracket selection.
///
/// Only the USA calculation looks at this; every other jurisdiction ignores
/// it. Head of household is tracked for display but taxed on the single
/// table, matching the bracket data we carry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FilingStatus {
    Single,
    MarriedFilingJointly,
    HeadOfHousehold,
}

impl FilingStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Single => "S",
            Self::MarriedFilingJointly => "MFJ",
            Self::HeadOfHousehold => "HOH",
        }
    }

    /// Parses a stored status code.
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "S" => Some(Self::Single),
            "MFJ" => Some(Self::MarriedFilingJointly),
            "HOH" => Some(Self::HeadOfHousehold),
            _ => None,
        }
    }

    /// Derives a status from free-text request input.
    ///
    /// Any input containing "married" (case-insensitive) selects married
    /// filing jointly; "head" selects head of household; everything else,
    /// including empty input, defaults to single.
    pub fn from_input(s: &str) -> Self {
        let lower = s.to_lowercase();
        if lower.contains("married") {
            Self::MarriedFilingJointly
        } else if lower.contains("head") {
            Self::HeadOfHousehold
        } else {
            Self::Single
        }
    }
}
