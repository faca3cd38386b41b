//! Time series data types.

use serde::{Deserialize, Serialize};

/// Record as read from a series file.
///
/// Both fields are kept as text; see [`normalize`] for the conversion.
#[derive(Debug, Clone, Deserialize)]
pub struct RawRecord {
    pub year: String,
    pub avg_temp: String,
}

/// Observation of a time series.
///
/// A field is `None` when its source text is not a number.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Sample {
    pub year: Option<f64>,
    pub value: Option<f64>,
}

/// Observation together with the trailing moving average ending at it.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WindowedSample {
    pub year: Option<f64>,
    pub value: Option<f64>,

    /// Only defined when the whole window ending here has recorded values.
    pub moving_average: Option<f64>,
}

/// Convert a raw record into a [`Sample`].
///
/// Fields that fail to parse, or parse to a non-finite number, become `None`.
pub fn normalize(raw: &RawRecord) -> Sample {
    Sample {
        year: parse_field(&raw.year),
        value: parse_field(&raw.avg_temp),
    }
}

fn parse_field(field: &str) -> Option<f64> {
    field
        .trim()
        .parse::<f64>()
        .ok()
        .filter(|val| val.is_finite())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raw(year: &str, avg_temp: &str) -> RawRecord {
        RawRecord {
            year: year.to_string(),
            avg_temp: avg_temp.to_string(),
        }
    }

    #[test]
    fn normalize_parses_numbers() {
        let sample = normalize(&raw("1850", " 7.9 "));
        assert_eq!(sample.year, Some(1850.0));
        assert_eq!(sample.value, Some(7.9));
    }

    #[test]
    fn normalize_keeps_zero_readings() {
        let sample = normalize(&raw("1900", "0"));
        assert_eq!(sample.value, Some(0.0));
    }

    #[test]
    fn normalize_marks_garbage_as_missing() {
        let sample = normalize(&raw("1750", "NaN-like-garbage"));
        assert_eq!(sample.year, Some(1750.0));
        assert_eq!(sample.value, None);

        let sample = normalize(&raw("", ""));
        assert_eq!(sample.year, None);
        assert_eq!(sample.value, None);
    }

    #[test]
    fn normalize_rejects_non_finite_numbers() {
        assert_eq!(normalize(&raw("1800", "NaN")).value, None);
        assert_eq!(normalize(&raw("inf", "1.0")).year, None);
    }
}
