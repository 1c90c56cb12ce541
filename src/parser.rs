//! Row projection for the flights CSV.
//!
//! Only the five columns the report needs are extracted. Numbers are parsed
//! leniently: an empty or unparseable field becomes `None` and the row is
//! dropped later by the partial aggregator. The airline code is kept
//! verbatim so the filter matches it exactly.

use csv::StringRecord;

use crate::error::SourceError;

pub const AIRLINE: &str = "AIRLINE";
pub const YEAR: &str = "YEAR";
pub const MONTH: &str = "MONTH";
pub const DAY: &str = "DAY";
pub const ARRIVAL_DELAY: &str = "ARRIVAL_DELAY";

pub const REQUIRED_COLUMNS: [&str; 5] = [AIRLINE, YEAR, MONTH, DAY, ARRIVAL_DELAY];

/// One flight row restricted to the report columns.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FlightRecord {
    pub airline: Option<String>,
    /// Date parts are kept signed and unchecked; impossible values such as
    /// month `-1` become an undated row later, not a dropped one.
    pub year: Option<i64>,
    pub month: Option<i64>,
    pub day: Option<i64>,
    /// Arrival delay in minutes; negative for early arrivals.
    pub arrival_delay: Option<i32>,
}

impl FlightRecord {
    pub fn new(airline: &str, year: i64, month: i64, day: i64, arrival_delay: Option<i32>) -> Self {
        FlightRecord {
            airline: Some(airline.to_string()),
            year: Some(year),
            month: Some(month),
            day: Some(day),
            arrival_delay,
        }
    }
}

/// Positions of the required columns within a header row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColumnIndex {
    airline: usize,
    year: usize,
    month: usize,
    day: usize,
    arrival_delay: usize,
}

impl ColumnIndex {
    /// Locates every required column, reporting all missing names at once.
    pub fn from_headers(headers: &StringRecord) -> Result<Self, SourceError> {
        let position = |name: &str| headers.iter().position(|h| h.trim() == name);

        let found: Vec<Option<usize>> = REQUIRED_COLUMNS.iter().map(|c| position(*c)).collect();
        let missing: Vec<String> = REQUIRED_COLUMNS
            .iter()
            .zip(&found)
            .filter(|(_, idx)| idx.is_none())
            .map(|(name, _)| name.to_string())
            .collect();

        match found[..] {
            [Some(airline), Some(year), Some(month), Some(day), Some(arrival_delay)] => {
                Ok(ColumnIndex {
                    airline,
                    year,
                    month,
                    day,
                    arrival_delay,
                })
            }
            _ => Err(SourceError::Format { missing }),
        }
    }

    pub fn project(&self, record: &StringRecord) -> FlightRecord {
        FlightRecord {
            airline: parse_code(record.get(self.airline)),
            year: parse_int(record.get(self.year)),
            month: parse_int(record.get(self.month)),
            day: parse_int(record.get(self.day)),
            arrival_delay: parse_int(record.get(self.arrival_delay)),
        }
    }
}

/// Only a fully empty field is missing; padding is preserved.
fn parse_code(field: Option<&str>) -> Option<String> {
    match field? {
        "" => None,
        value => Some(value.to_string()),
    }
}

/// Parses an integer field, also accepting integral floats such as `"2015.0"`.
fn parse_int<T: TryFrom<i64>>(field: Option<&str>) -> Option<T> {
    let value = field?.trim();
    if value.is_empty() {
        return None;
    }

    let wide = match value.parse::<i64>() {
        Ok(v) => v,
        Err(_) => {
            let f = value.parse::<f64>().ok()?;
            if !f.is_finite() || f.fract() != 0.0 || f.abs() > i64::MAX as f64 {
                return None;
            }
            f as i64
        }
    };

    T::try_from(wide).ok()
}
