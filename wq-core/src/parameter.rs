use serde::{Deserialize, Serialize};
use std::fmt;

/// Name of the timestamp column in the input CSV.
pub const TIMESTAMP_COLUMN: &str = "timestamp";

/// Every column a row must carry, in canonical header order.
pub const REQUIRED_COLUMNS: [&str; 6] = [
    TIMESTAMP_COLUMN,
    "pH",
    "turbidity_NTU",
    "free_chlorine_mg_L",
    "tds_mg_L",
    "nitrate_mg_L",
];

/// One of the five measured water-quality parameters.
///
/// The serialized form is the CSV column name (e.g. `"turbidity_NTU"`), which
/// is also the parameter identifier used by the classifier and reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Parameter {
    #[serde(rename = "pH")]
    Ph,
    #[serde(rename = "turbidity_NTU")]
    Turbidity,
    #[serde(rename = "free_chlorine_mg_L")]
    FreeChlorine,
    #[serde(rename = "tds_mg_L")]
    Tds,
    #[serde(rename = "nitrate_mg_L")]
    Nitrate,
}

impl Parameter {
    /// All parameters in column order.
    pub const ALL: [Parameter; 5] = [
        Parameter::Ph,
        Parameter::Turbidity,
        Parameter::FreeChlorine,
        Parameter::Tds,
        Parameter::Nitrate,
    ];

    /// The parameter identifier, identical to its CSV column name.
    pub fn id(&self) -> &'static str {
        match self {
            Parameter::Ph => "pH",
            Parameter::Turbidity => "turbidity_NTU",
            Parameter::FreeChlorine => "free_chlorine_mg_L",
            Parameter::Tds => "tds_mg_L",
            Parameter::Nitrate => "nitrate_mg_L",
        }
    }

    /// Look up a parameter by identifier. Matching is exact and case-sensitive.
    pub fn from_id(id: &str) -> Option<Parameter> {
        Parameter::ALL.into_iter().find(|p| p.id() == id)
    }
}

impl fmt::Display for Parameter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ids_match_columns() {
        for (parameter, column) in Parameter::ALL.iter().zip(&REQUIRED_COLUMNS[1..]) {
            assert_eq!(parameter.id(), *column);
            assert_eq!(Parameter::from_id(column), Some(*parameter));
        }
    }

    #[test]
    fn test_from_id_is_exact() {
        assert_eq!(Parameter::from_id("ph"), None);
        assert_eq!(Parameter::from_id(" pH"), None);
        assert_eq!(Parameter::from_id("conductivity_mS_m"), None);
    }

    #[test]
    fn test_serializes_as_column_name() {
        let json = serde_json::to_string(&Parameter::FreeChlorine).unwrap();
        assert_eq!(json, "\"free_chlorine_mg_L\"");
    }
}
