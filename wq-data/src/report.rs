//! The structure handed to the presentation layer.
//!
//! A [`Report`] always covers all five parameters; a caller's selection is
//! applied afterwards with [`Report::select`]. Verdicts are taken from the
//! mean over the reported window, not from individual readings. Entries are
//! keyed by parameter id, so a selected id outside the threshold table still
//! gets an entry, with an `Unknown` verdict and no summary.

use crate::{
    statistics::{summarize_id, ParameterSummary},
    status::{StatusClassifier, Verdict},
};
use chrono::NaiveDateTime;
use serde::{Serialize, Serializer};
use wq_core::{dataset::Dataset, parameter::Parameter, threshold::ThresholdTable};

/// Summary, verdict and display strings for one parameter id.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ParameterReport {
    pub parameter: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub label: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub unit: Option<&'static str>,
    /// `None` when the id is not a known parameter.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub summary: Option<ParameterSummary>,
    pub verdict: Verdict,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub range_text: Option<&'static str>,
    /// Individual readings that fail the rule.
    pub exceedances: usize,
}

impl ParameterReport {
    fn for_id(
        parameter_id: &str,
        readings: &Dataset,
        table: &ThresholdTable,
        classifier: &StatusClassifier<'_>,
    ) -> ParameterReport {
        let threshold = table.lookup(parameter_id);
        let summary = summarize_id(readings, parameter_id);
        let mean = summary.map_or(0.0, |s| s.mean);
        let exceedances = threshold.map_or(0, |t| {
            readings
                .values(t.parameter)
                .filter(|v| !t.rule.admits(*v))
                .count()
        });
        ParameterReport {
            parameter: parameter_id.to_string(),
            label: threshold.map(|t| t.label),
            unit: threshold.map(|t| t.unit),
            summary,
            verdict: classifier.classify(parameter_id, mean),
            range_text: threshold.map(|t| t.range_text),
            exceedances,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct Report {
    pub window_start: Option<NaiveDateTime>,
    pub window_end: Option<NaiveDateTime>,
    /// Serialized as a map from parameter id to its entry, in entry order.
    #[serde(serialize_with = "serialize_by_id")]
    pub parameters: Vec<ParameterReport>,
    pub readings: Dataset,
}

fn serialize_by_id<S: Serializer>(
    entries: &[ParameterReport],
    serializer: S,
) -> Result<S::Ok, S::Error> {
    serializer.collect_map(entries.iter().map(|r| (r.parameter.as_str(), r)))
}

impl Report {
    /// Report over the whole dataset.
    pub fn build(dataset: &Dataset, table: &ThresholdTable) -> Report {
        Report::build_windowed(dataset, None, None, table)
    }

    /// Report over the readings in `[start, end]`.
    pub fn build_windowed(
        dataset: &Dataset,
        start: Option<NaiveDateTime>,
        end: Option<NaiveDateTime>,
        table: &ThresholdTable,
    ) -> Report {
        let readings = dataset.window(start, end);
        let classifier = StatusClassifier::new(table);
        let parameters = Parameter::ALL
            .iter()
            .map(|p| ParameterReport::for_id(p.id(), &readings, table, &classifier))
            .collect();
        log::debug!(
            "report: {} of {} readings in window",
            readings.len(),
            dataset.len()
        );
        Report {
            window_start: start,
            window_end: end,
            parameters,
            readings,
        }
    }

    /// Keep only the selected parameter ids, in selection order.
    ///
    /// Ids outside the threshold table get an `Unknown` entry. An empty
    /// selection keeps everything.
    pub fn select<S: AsRef<str>>(self, ids: &[S], table: &ThresholdTable) -> Report {
        if ids.is_empty() {
            return self;
        }
        let classifier = StatusClassifier::new(table);
        let Report {
            window_start,
            window_end,
            mut parameters,
            readings,
        } = self;

        let mut selected: Vec<ParameterReport> = Vec::with_capacity(ids.len());
        for id in ids.iter().map(|id| id.as_ref()) {
            if selected.iter().any(|r| r.parameter == id) {
                continue;
            }
            let entry = match parameters.iter().position(|r| r.parameter == id) {
                Some(index) => parameters.swap_remove(index),
                None => ParameterReport::for_id(id, &readings, table, &classifier),
            };
            selected.push(entry);
        }
        Report {
            window_start,
            window_end,
            parameters: selected,
            readings,
        }
    }

    pub fn get(&self, parameter_id: &str) -> Option<&ParameterReport> {
        self.parameters.iter().find(|r| r.parameter == parameter_id)
    }

    /// True when any reported parameter's verdict is not Good.
    pub fn has_warnings(&self) -> bool {
        self.parameters.iter().any(|r| r.verdict != Verdict::Good)
    }
}
