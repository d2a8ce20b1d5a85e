//! Daily weather observations.
//!
//! Input is a JSON array of records with `date` (`%Y-%m-%d`), `temperatureMin`
//! and `temperatureMax`; other keys are ignored. Records missing any of the
//! three, or with an unparseable date or non-numeric temperature, are counted
//! and skipped.

use std::io;
use std::path::Path;

use chrono::{Datelike, NaiveDate};
use serde_json::Value;

use crate::error::{Error, Result};

/// Leap year onto which every observation is projected for day-of-year coloring.
pub const REFERENCE_YEAR: i32 = 2000;

/// Days in the reference year.
pub const DAYS_IN_REFERENCE_YEAR: f32 = 366.0;

/// One day of observations (temperatures in °F).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Observation {
    /// Calendar day.
    pub date: NaiveDate,
    /// Daily minimum temperature.
    pub temperature_min: f64,
    /// Daily maximum temperature.
    pub temperature_max: f64,
}

impl Observation {
    /// Zero-based day of the date projected onto [`REFERENCE_YEAR`].
    ///
    /// January 1 is `0.0` and December 31 is `365.0`.
    #[must_use]
    pub fn reference_day(&self) -> f32 {
        reference_day(self.date)
    }
}

/// Zero-based day of `date` projected onto [`REFERENCE_YEAR`].
#[must_use]
pub fn reference_day(date: NaiveDate) -> f32 {
    date.with_year(REFERENCE_YEAR).unwrap_or(date).ordinal0() as f32
}

/// Calendar date in [`REFERENCE_YEAR`] for a (possibly out of range) day offset.
///
/// Offsets before January 1 or after December 31 land in the neighbouring years.
#[must_use]
pub fn date_for_reference_day(day: f32) -> NaiveDate {
    let start = NaiveDate::from_ymd_opt(REFERENCE_YEAR, 1, 1).unwrap_or_default();
    chrono::Duration::try_days(day.floor() as i64)
        .and_then(|offset| start.checked_add_signed(offset))
        .unwrap_or(start)
}

/// Parsed observation set.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct WeatherData {
    /// Valid observations in input order.
    pub observations: Vec<Observation>,
    /// Records rejected as malformed.
    pub skipped: usize,
}

impl WeatherData {
    /// Wrap already-validated observations.
    #[must_use]
    pub fn new(observations: Vec<Observation>) -> Self {
        Self { observations, skipped: 0 }
    }

    /// Parse a JSON array from a reader.
    ///
    /// # Errors
    ///
    /// Returns an error if the input is not valid JSON or not an array.
    pub fn from_reader<R: io::Read>(reader: R) -> Result<Self> {
        Self::from_value(serde_json::from_reader(reader)?)
    }

    /// Parse JSON text.
    ///
    /// # Errors
    ///
    /// See [`WeatherData::from_reader`].
    pub fn from_json_str(text: &str) -> Result<Self> {
        Self::from_value(serde_json::from_str(text)?)
    }

    /// Load a JSON file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be opened or parsed.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let file = std::fs::File::open(path)?;
        Self::from_reader(io::BufReader::new(file))
    }

    /// Number of valid observations.
    #[must_use]
    pub fn len(&self) -> usize {
        self.observations.len()
    }

    /// Whether there are no valid observations.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.observations.is_empty()
    }

    fn from_value(value: Value) -> Result<Self> {
        let Value::Array(records) = value else {
            return Err(Error::MalformedData("weather data must be a JSON array".to_string()));
        };

        let mut data = Self::default();
        for (i, record) in records.iter().enumerate() {
            match parse_observation(record) {
                Some(observation) => data.observations.push(observation),
                None => {
                    data.skipped += 1;
                    tracing::warn!(record = i, "skipping malformed weather record");
                }
            }
        }
        tracing::info!(
            observations = data.observations.len(),
            skipped = data.skipped,
            "loaded weather data"
        );
        Ok(data)
    }
}

fn parse_observation(record: &Value) -> Option<Observation> {
    let date = NaiveDate::parse_from_str(record.get("date")?.as_str()?, "%Y-%m-%d").ok()?;
    let temperature_min = record.get("temperatureMin")?.as_f64()?;
    let temperature_max = record.get("temperatureMax")?.as_f64()?;
    Some(Observation { date, temperature_min, temperature_max })
}
