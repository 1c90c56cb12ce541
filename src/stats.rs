//! Per-batch delay counts.

use std::collections::{BTreeSet, HashMap};

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::parser::FlightRecord;

/// Arrivals later than this many minutes count as delayed.
pub const DELAY_THRESHOLD_MINUTES: i32 = 10;

/// The set of airline codes to aggregate. Matching is exact and case-sensitive.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<String>", into = "Vec<String>")]
pub struct AirlineFilter(pub(crate) BTreeSet<String>);

impl AirlineFilter {
    pub fn new<I, S>(codes: I) -> Result<Self, ConfigError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let codes: BTreeSet<String> = codes.into_iter().map(Into::into).collect();
        if codes.is_empty() {
            return Err(ConfigError::EmptyAirlineFilter);
        }
        if codes.iter().any(|c| c.trim().is_empty()) {
            return Err(ConfigError::BlankAirline);
        }
        Ok(AirlineFilter(codes))
    }

    pub fn contains(&self, airline: &str) -> bool {
        self.0.contains(airline)
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl TryFrom<Vec<String>> for AirlineFilter {
    type Error = ConfigError;

    fn try_from(codes: Vec<String>) -> Result<Self, Self::Error> {
        AirlineFilter::new(codes)
    }
}

impl From<AirlineFilter> for Vec<String> {
    fn from(filter: AirlineFilter) -> Self {
        filter.0.into_iter().collect()
    }
}

/// Grouping key shared by partial and final statistics.
///
/// Field order gives the final table its (airline, year, month, day) sort.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct DayKey {
    pub airline: String,
    pub year: i64,
    pub month: i64,
    pub day: i64,
}

impl DayKey {
    pub fn new(airline: &str, year: i64, month: i64, day: i64) -> Self {
        DayKey {
            airline: airline.to_string(),
            year,
            month,
            day,
        }
    }
}

/// Qualifying flights and how many of them arrived late.
///
/// Invariant: `delayed <= total`.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct DelayCounts {
    pub total: u64,
    pub delayed: u64,
}

impl DelayCounts {
    pub fn record(&mut self, arrival_delay: i32) {
        self.total += 1;
        if arrival_delay > DELAY_THRESHOLD_MINUTES {
            self.delayed += 1;
        }
    }

    pub fn add(&mut self, other: DelayCounts) {
        self.total += other.total;
        self.delayed += other.delayed;
    }
}

/// Delay counts for one batch of rows, keyed by day and airline.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct PartialStats {
    pub groups: HashMap<DayKey, DelayCounts>,
    pub rows_read: usize,
    pub rows_qualified: usize,
}

impl PartialStats {
    /// Counts the rows of `batch` that belong to a filtered airline and have
    /// a delay value and a complete year/month/day. Other rows are skipped.
    pub fn from_batch(batch: &[FlightRecord], filter: &AirlineFilter) -> Self {
        let mut s = PartialStats {
            rows_read: batch.len(),
            ..Default::default()
        };

        for row in batch {
            let Some(airline) = row.airline.as_deref() else {
                continue;
            };
            if !filter.contains(airline) {
                continue;
            }
            let (Some(delay), Some(year), Some(month), Some(day)) =
                (row.arrival_delay, row.year, row.month, row.day)
            else {
                continue;
            };

            s.rows_qualified += 1;
            s.groups
                .entry(DayKey::new(airline, year, month, day))
                .or_default()
                .record(delay);
        }

        s
    }

    pub fn get(&self, key: &DayKey) -> Option<DelayCounts> {
        self.groups.get(key).copied()
    }

    pub fn len(&self) -> usize {
        self.groups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }
}
