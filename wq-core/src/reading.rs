use crate::parameter::{Parameter, REQUIRED_COLUMNS, TIMESTAMP_COLUMN};
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use thiserror::Error;
use wq_utils::dates::parse_timestamp;

/// One raw CSV row: column name to trimmed, unquoted cell text.
pub type RawRecord = HashMap<String, String>;

/// How the row parser treats a numeric cell that does not parse.
#[derive(Debug, Default, PartialEq, Eq, Clone, Copy, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NumericPolicy {
    /// Substitute `0.0` for an unparseable or non-finite value and keep the row.
    #[default]
    Lenient,
    /// Reject the whole row.
    Strict,
}

/// Why a raw record did not become a [`Reading`].
///
/// Rejections never leave the dataset builder; they exist for debug logging.
#[derive(Error, Debug, PartialEq, Clone)]
pub enum RowRejection {
    #[error("missing or empty field '{0}'")]
    MissingField(&'static str),

    #[error("invalid timestamp: {0}")]
    InvalidTimestamp(String),

    #[error("non-numeric value '{value}' in '{field}'")]
    NonNumeric { field: &'static str, value: String },

    #[error("non-finite value in '{0}'")]
    NonFinite(&'static str),
}

/// A single validated sensor sample.
///
/// Fields are private so a `Reading` cannot be altered after validation.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Reading {
    timestamp: NaiveDateTime,
    #[serde(rename = "pH")]
    ph: f64,
    #[serde(rename = "turbidity_NTU")]
    turbidity_ntu: f64,
    #[serde(rename = "free_chlorine_mg_L")]
    free_chlorine_mg_l: f64,
    #[serde(rename = "tds_mg_L")]
    tds_mg_l: f64,
    #[serde(rename = "nitrate_mg_L")]
    nitrate_mg_l: f64,
}

impl Reading {
    /// Build a reading from values in [`Parameter::ALL`] order.
    ///
    /// Returns `None` if any value is NaN or infinite.
    pub fn new(timestamp: NaiveDateTime, values: [f64; 5]) -> Option<Reading> {
        if !values.iter().all(|v| v.is_finite()) {
            return None;
        }
        let [ph, turbidity_ntu, free_chlorine_mg_l, tds_mg_l, nitrate_mg_l] = values;
        Some(Reading {
            timestamp,
            ph,
            turbidity_ntu,
            free_chlorine_mg_l,
            tds_mg_l,
            nitrate_mg_l,
        })
    }

    pub fn timestamp(&self) -> NaiveDateTime {
        self.timestamp
    }

    pub fn value(&self, parameter: Parameter) -> f64 {
        match parameter {
            Parameter::Ph => self.ph,
            Parameter::Turbidity => self.turbidity_ntu,
            Parameter::FreeChlorine => self.free_chlorine_mg_l,
            Parameter::Tds => self.tds_mg_l,
            Parameter::Nitrate => self.nitrate_mg_l,
        }
    }

    /// Parse one raw record.
    ///
    /// All six columns must be present and non-empty and the timestamp must
    /// parse. Numeric cells are handled according to `policy`.
    pub fn from_record(record: &RawRecord, policy: NumericPolicy) -> Result<Reading, RowRejection> {
        for column in REQUIRED_COLUMNS {
            field(record, column)?;
        }

        let timestamp = parse_timestamp(field(record, TIMESTAMP_COLUMN)?)
            .map_err(|e| RowRejection::InvalidTimestamp(e.0))?;

        let mut values = [0f64; 5];
        for (slot, parameter) in values.iter_mut().zip(Parameter::ALL) {
            *slot = parse_value(parameter.id(), field(record, parameter.id())?, policy)?;
        }

        Reading::new(timestamp, values).ok_or_else(|| {
            let index = values.iter().position(|v| !v.is_finite()).unwrap_or(0);
            RowRejection::NonFinite(Parameter::ALL[index].id())
        })
    }
}

impl TryFrom<&RawRecord> for Reading {
    type Error = RowRejection;

    fn try_from(value: &RawRecord) -> Result<Self, Self::Error> {
        Reading::from_record(value, NumericPolicy::default())
    }
}

fn field<'a>(record: &'a RawRecord, column: &'static str) -> Result<&'a str, RowRejection> {
    match record.get(column).map(|s| s.trim()) {
        Some(s) if !s.is_empty() => Ok(s),
        _ => Err(RowRejection::MissingField(column)),
    }
}

fn parse_value(field: &'static str, text: &str, policy: NumericPolicy) -> Result<f64, RowRejection> {
    match (text.parse::<f64>(), policy) {
        (Ok(v), _) if v.is_finite() => Ok(v),
        (_, NumericPolicy::Lenient) => Ok(0.0),
        (Ok(_), NumericPolicy::Strict) => Err(RowRejection::NonFinite(field)),
        (Err(_), NumericPolicy::Strict) => Err(RowRejection::NonNumeric {
            field,
            value: text.to_string(),
        }),
    }
}
