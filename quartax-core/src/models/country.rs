use serde::{Deserialize, Serialize};

/// A jurisdiction with a built-in statutory bracket table.
///
/// Free-text country input from the request layer is matched with
/// [`Country::parse`]; anything that does not map to one of these variants
/// takes the flat-rate fallback path in the calculation layer instead of
/// failing the request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Country {
    India,
    Usa,
    Uk,
    Canada,
    Australia,
    Germany,
    France,
    Japan,
}

impl Country {
    /// All supported jurisdictions, in display order.
    pub const ALL: [Country; 8] = [
        Country::India,
        Country::Usa,
        Country::Uk,
        Country::Canada,
        Country::Australia,
        Country::Germany,
        Country::France,
        Country::Japan,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::India => "India",
            Self::Usa => "USA",
            Self::Uk => "UK",
            Self::Canada => "Canada",
            Self::Australia => "Australia",
            Self::Germany => "Germany",
            Self::France => "France",
            Self::Japan => "Japan",
        }
    }

    /// Parses free-text country input, trimming whitespace and ignoring case.
    ///
    /// `"usa"`/`"united states"` and `"uk"`/`"united kingdom"` are accepted as
    /// synonyms. Returns `None` for anything else.
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "india" => Some(Self::India),
            "usa" | "united states" => Some(Self::Usa),
            "uk" | "united kingdom" => Some(Self::Uk),
            "canada" => Some(Self::Canada),
            "australia" => Some(Self::Australia),
            "germany" => Some(Self::Germany),
            "france" => Some(Self::France),
            "japan" => Some(Self::Japan),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn parse_accepts_synonyms() {
        assert_eq!(Country::parse("usa"), Some(Country::Usa));
        assert_eq!(Country::parse("United States"), Some(Country::Usa));
        assert_eq!(Country::parse("uk"), Some(Country::Uk));
        assert_eq!(Country::parse("united kingdom"), Some(Country::Uk));
    }

    #[test]
    fn parse_trims_and_ignores_case() {
        assert_eq!(Country::parse("  InDiA  "), Some(Country::India));
        assert_eq!(Country::parse("JAPAN"), Some(Country::Japan));
    }

    #[test]
    fn parse_rejects_unsupported() {
        assert_eq!(Country::parse("Brazil"), None);
        assert_eq!(Country::parse(""), None);
    }

    #[test]
    fn all_variants_round_trip_through_as_str() {
        for country in Country::ALL {
            assert_eq!(Country::parse(country.as_str()), Some(country));
        }
    }
}
