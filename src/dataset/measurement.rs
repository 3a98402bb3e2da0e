//! Scalar-or-replicate measurement values.
//!
//! Benchmark files store a metric either as a single number, as a list of
//! per-image replicates, or occasionally as a numeric string or a placeholder
//! such as `"N/A"`. [`Measurement`] decodes all of these once, at ingestion,
//! so scoring code only ever sees finite numbers.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use crate::stats;

/// A metric value as stored in a benchmark record.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Measurement {
    /// A single finite value.
    Scalar(f64),
    /// Replicate values. Only finite entries are kept; may be empty.
    Replicates(Vec<f64>),
    /// Present in the record but not numeric (null, "N/A", objects, NaN).
    Invalid,
}

impl Measurement {
    /// Decode a JSON value.
    #[must_use]
    pub fn from_json(value: &Value) -> Self {
        match value {
            Value::Array(items) => {
                Self::Replicates(items.iter().filter_map(parse_number).collect())
            }
            other => parse_number(other).map_or(Self::Invalid, Self::Scalar),
        }
    }

    /// Arithmetic mean of the valid values.
    ///
    /// Returns `None` for [`Measurement::Invalid`] and for replicate lists with
    /// no valid entries, so that missing data never turns into a zero.
    #[must_use]
    pub fn mean(&self) -> Option<f64> {
        match self {
            Self::Scalar(v) => Some(*v),
            Self::Replicates(values) if values.is_empty() => None,
            Self::Replicates(values) => Some(stats::mean(values)),
            Self::Invalid => None,
        }
    }

    /// The valid values as a slice.
    #[must_use]
    pub fn values(&self) -> &[f64] {
        match self {
            Self::Scalar(v) => std::slice::from_ref(v),
            Self::Replicates(values) => values,
            Self::Invalid => &[],
        }
    }

    /// Whether this measurement came from a JSON list.
    #[must_use]
    pub fn is_replicates(&self) -> bool {
        matches!(self, Self::Replicates(_))
    }
}

impl<'de> Deserialize<'de> for Measurement {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = Value::deserialize(deserializer)?;
        Ok(Self::from_json(&value))
    }
}

/// Parse a JSON number or numeric string into a finite `f64`.
pub(crate) fn parse_number(value: &Value) -> Option<f64> {
    let number = match value {
        Value::Number(n) => n.as_f64()?,
        Value::String(s) => s.trim().parse::<f64>().ok()?,
        _ => return None,
    };
    number.is_finite().then_some(number)
}
