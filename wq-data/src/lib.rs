//! Statistics, classification and reporting over water quality datasets.
//!
//! This crate turns a validated [`Dataset`](wq_core::dataset::Dataset) into
//! the per-parameter summaries, verdicts and time series a presentation
//! layer renders.

pub mod report;

/// Min / max / mean over one parameter.
pub mod statistics {
    use serde::Serialize;
    use wq_core::{dataset::Dataset, parameter::Parameter};

    /// Aggregate of one parameter over a dataset.
    ///
    /// An empty dataset summarizes to all zeros.
    #[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
    pub struct ParameterSummary {
        pub min: f64,
        pub max: f64,
        pub mean: f64,
    }

    /// Compute min, max and arithmetic mean of `parameter` over `dataset`.
    pub fn summarize(dataset: &Dataset, parameter: Parameter) -> ParameterSummary {
        if dataset.is_empty() {
            return ParameterSummary::default();
        }
        let (min, max, mean, _) = dataset.values(parameter).fold(
            (f64::INFINITY, f64::NEG_INFINITY, 0.0, 0usize),
            |(min, max, mean, n), v| {
                let n = n + 1;
                // divide before subtracting so extreme values cannot overflow
                let mean = mean + (v / n as f64 - mean / n as f64);
                (min.min(v), max.max(v), mean, n)
            },
        );
        // rounding in the running mean can still step just past an extreme
        ParameterSummary {
            min,
            max,
            mean: mean.clamp(min, max),
        }
    }

    /// Like [`summarize`] but keyed by parameter id; `None` for an unknown id.
    pub fn summarize_id(dataset: &Dataset, parameter_id: &str) -> Option<ParameterSummary> {
        Parameter::from_id(parameter_id).map(|p| summarize(dataset, p))
    }

}

/// Good / Warning classification against the threshold table.
pub mod status {
    use serde::Serialize;
    use std::fmt;
    use wq_core::threshold::ThresholdTable;

    /// Outcome of checking a value against its parameter's rule.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
    pub enum Verdict {
        Good,
        Warning,
        /// The parameter id is not in the threshold table.
        Unknown,
    }

    impl fmt::Display for Verdict {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            let s = match self {
                Verdict::Good => "Good",
                Verdict::Warning => "Warning",
                Verdict::Unknown => "Unknown",
            };
            f.write_str(s)
        }
    }

    /// Classifier bound to a threshold table.
    #[derive(Debug, Clone, Copy)]
    pub struct StatusClassifier<'a> {
        table: &'a ThresholdTable,
    }

    impl<'a> StatusClassifier<'a> {
        pub fn new(table: &'a ThresholdTable) -> Self {
            StatusClassifier { table }
        }

        pub fn classify(&self, parameter_id: &str, value: f64) -> Verdict {
            match self.table.rule_for(parameter_id) {
                None => Verdict::Unknown,
                Some(rule) if rule.admits(value) => Verdict::Good,
                Some(_) => Verdict::Warning,
            }
        }
    }

    impl Default for StatusClassifier<'static> {
        fn default() -> Self {
            StatusClassifier::new(ThresholdTable::sans_241())
        }
    }

    /// Classify against the SANS 241:2015 table.
    pub fn classify(parameter_id: &str, value: f64) -> Verdict {
        StatusClassifier::default().classify(parameter_id, value)
    }

}

/// Chart-ready time series.
pub mod series {
    use chrono::NaiveDateTime;
    use serde::Serialize;
    use wq_core::{dataset::Dataset, parameter::Parameter};

    /// A single (timestamp, value) pair used for line chart data points.
    #[derive(Debug, Clone, Serialize, PartialEq)]
    pub struct TimeValue {
        pub timestamp: NaiveDateTime,
        pub value: f64,
    }

    /// One parameter's values in dataset order.
    pub fn series(dataset: &Dataset, parameter: Parameter) -> Vec<TimeValue> {
        dataset
            .iter()
            .map(|r| TimeValue {
                timestamp: r.timestamp(),
                value: r.value(parameter),
            })
            .collect()
    }

}
