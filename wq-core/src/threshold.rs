//! SANS 241:2015 drinking water thresholds.
//!
//! The table is a `static` built at compile time and handed out by shared
//! reference; there is no way to change it at runtime.

use crate::parameter::Parameter;
use serde::Serialize;

/// Acceptance rule for a single parameter.
#[derive(Debug, PartialEq, Clone, Copy, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ThresholdRule {
    /// Closed interval: `min <= v <= max`.
    Range { min: f64, max: f64 },
    /// One-sided ceiling: `v <= max`.
    Ceiling { max: f64 },
}

impl ThresholdRule {
    /// Whether `value` falls inside the acceptable range. NaN is never admitted.
    pub fn admits(&self, value: f64) -> bool {
        match *self {
            ThresholdRule::Range { min, max } => min <= value && value <= max,
            ThresholdRule::Ceiling { max } => value <= max,
        }
    }
}

/// A threshold entry: the rule plus the strings a presentation layer shows.
#[derive(Debug, PartialEq, Clone, Serialize)]
pub struct Threshold {
    pub parameter: Parameter,
    pub rule: ThresholdRule,
    /// Human-readable good range, e.g. "5.0–9.5" or "≤5".
    pub range_text: &'static str,
    pub label: &'static str,
    pub unit: &'static str,
}

/// The fixed threshold table, one entry per [`Parameter`] in column order.
#[derive(Debug, PartialEq, Serialize)]
pub struct ThresholdTable {
    entries: [Threshold; 5],
}

static SANS_241: ThresholdTable = ThresholdTable {
    entries: [
        Threshold {
            parameter: Parameter::Ph,
            rule: ThresholdRule::Range { min: 5.0, max: 9.5 },
            range_text: "5.0–9.5",
            label: "pH",
            unit: "pH units",
        },
        Threshold {
            parameter: Parameter::Turbidity,
            rule: ThresholdRule::Ceiling { max: 5.0 },
            range_text: "≤5",
            label: "Turbidity",
            unit: "NTU",
        },
        Threshold {
            parameter: Parameter::FreeChlorine,
            rule: ThresholdRule::Range { min: 0.2, max: 5.0 },
            range_text: "0.2–5.0",
            label: "Free Chlorine",
            unit: "mg/L",
        },
        Threshold {
            parameter: Parameter::Tds,
            rule: ThresholdRule::Ceiling { max: 1200.0 },
            range_text: "≤1200",
            label: "Total Dissolved Solids",
            unit: "mg/L",
        },
        Threshold {
            parameter: Parameter::Nitrate,
            rule: ThresholdRule::Ceiling { max: 11.0 },
            range_text: "≤11",
            label: "Nitrate",
            unit: "mg/L",
        },
    ],
};

impl ThresholdTable {
    /// The process-wide SANS 241:2015 table.
    pub fn sans_241() -> &'static ThresholdTable {
        &SANS_241
    }

    /// Entry for a known parameter.
    pub fn get(&self, parameter: Parameter) -> &Threshold {
        // entries are stored in Parameter::ALL order
        &self.entries[parameter as usize]
    }

    /// Entry for a parameter identifier, or `None` if the id is not one of the five.
    pub fn lookup(&self, parameter_id: &str) -> Option<&Threshold> {
        Parameter::from_id(parameter_id).map(|p| self.get(p))
    }

    /// Rule for a parameter identifier, or `None` if the id is not recognized.
    pub fn rule_for(&self, parameter_id: &str) -> Option<&ThresholdRule> {
        self.lookup(parameter_id).map(|t| &t.rule)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Threshold> {
        self.entries.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_entries_are_in_parameter_order() {
        let table = ThresholdTable::sans_241();
        for parameter in Parameter::ALL {
            assert_eq!(table.get(parameter).parameter, parameter);
        }
    }

    #[test]
    fn test_rule_for() {
        let table = ThresholdTable::sans_241();
        assert_eq!(
            table.rule_for("pH"),
            Some(&ThresholdRule::Range { min: 5.0, max: 9.5 })
        );
        assert_eq!(
            table.rule_for("tds_mg_L"),
            Some(&ThresholdRule::Ceiling { max: 1200.0 })
        );
        assert_eq!(table.rule_for("colour_Pt_Co"), None);
        assert_eq!(table.rule_for(""), None);
    }

    #[test]
    fn test_range_text() {
        let table = ThresholdTable::sans_241();
        let texts: Vec<&str> = table.iter().map(|t| t.range_text).collect();
        assert_eq!(texts, vec!["5.0–9.5", "≤5", "0.2–5.0", "≤1200", "≤11"]);
    }

    #[test]
    fn test_range_rule_is_closed() {
        let rule = ThresholdRule::Range { min: 0.2, max: 5.0 };
        assert!(rule.admits(0.2));
        assert!(rule.admits(5.0));
        assert!(!rule.admits(0.19));
        assert!(!rule.admits(5.01));
        assert!(!rule.admits(f64::NAN));
    }

    #[test]
    fn test_ceiling_rule() {
        let rule = ThresholdRule::Ceiling { max: 11.0 };
        assert!(rule.admits(0.0));
        assert!(rule.admits(11.0));
        assert!(!rule.admits(11.001));
        assert!(!rule.admits(f64::NAN));
    }
}
