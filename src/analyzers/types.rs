//! Data types produced by the combining stage.

use chrono::NaiveDate;
use serde::Serialize;

use crate::stats::DayKey;

/// Final delay statistics for one airline on one day.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DailyStat {
    pub airline: String,
    pub year: i64,
    pub month: i64,
    pub day: i64,
    /// `None` when year/month/day is not a real calendar date.
    pub date: Option<NaiveDate>,
    pub total: u64,
    pub delayed: u64,
    /// `delayed / total`, always within `[0, 1]`.
    pub delay_fraction: f64,
}

impl DailyStat {
    pub fn key(&self) -> DayKey {
        DayKey::new(&self.airline, self.year, self.month, self.day)
    }
}
