use std::collections::HashMap;

use chrono::{Datelike, Month, NaiveDate};
use tracing::debug;

use crate::analyzers::types::DailyStat;

/// Column headers for a Sunday-first week.
pub const WEEKDAY_LABELS: [&str; 7] = ["S", "M", "T", "W", "T", "F", "S"];

/// Date to delay fraction for a single airline.
#[derive(Debug, Clone, Default)]
pub struct DelayLookup {
    airline: String,
    by_date: HashMap<NaiveDate, f64>,
    undated: usize,
}

impl DelayLookup {
    /// Selects the rows of `stats` for `airline`. Rows without a valid date
    /// cannot be placed on a calendar and are skipped.
    pub fn for_airline(stats: &[DailyStat], airline: &str) -> Self {
        let mut lookup = DelayLookup {
            airline: airline.to_string(),
            ..Default::default()
        };

        for stat in stats.iter().filter(|s| s.airline == airline) {
            match stat.date {
                Some(date) => {
                    lookup.by_date.insert(date, stat.delay_fraction);
                }
                None => lookup.undated += 1,
            }
        }

        if lookup.undated > 0 {
            debug!(airline, skipped = lookup.undated, "Skipping rows with invalid dates");
        }

        lookup
    }

    pub fn airline(&self) -> &str {
        &self.airline
    }

    pub fn get(&self, date: NaiveDate) -> Option<f64> {
        self.by_date.get(&date).copied()
    }

    /// Number of plottable days.
    pub fn len(&self) -> usize {
        self.by_date.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_date.is_empty()
    }

    /// Rows for this airline whose year/month/day was not a real date.
    pub fn undated(&self) -> usize {
        self.undated
    }
}

/// One month as rows of Sunday-first weeks.
///
/// Cells before the 1st and after the last day are `None`, as are days with
/// no value.
#[derive(Debug, Clone, PartialEq)]
pub struct MonthGrid {
    pub year: i32,
    pub month: u32,
    pub weeks: Vec<[Option<f64>; 7]>,
}

impl MonthGrid {
    pub fn name(&self) -> &'static str {
        u8::try_from(self.month)
            .ok()
            .and_then(|m| Month::try_from(m).ok())
            .map(|m| m.name())
            .unwrap_or("")
    }

    /// Cells that carry a value.
    pub fn filled(&self) -> usize {
        self.weeks.iter().flatten().filter(|c| c.is_some()).count()
    }
}

/// Lays out `month` of `year`, filling each day with `value(date)`.
///
/// Returns `None` if `month` is not in `1..=12`.
pub fn month_grid<F>(year: i32, month: u32, value: F) -> Option<MonthGrid>
where
    F: Fn(NaiveDate) -> Option<f64>,
{
    let first = NaiveDate::from_ymd_opt(year, month, 1)?;
    let offset = first.weekday().num_days_from_sunday() as usize;
    let days = days_in_month(first);

    let mut weeks = vec![[None; 7]; (offset + days).div_ceil(7)];
    for (i, date) in first.iter_days().take(days).enumerate() {
        let slot = offset + i;
        weeks[slot / 7][slot % 7] = value(date);
    }

    Some(MonthGrid { year, month, weeks })
}

/// All twelve months of `year`.
pub fn year_grids(year: i32, lookup: &DelayLookup) -> Vec<MonthGrid> {
    (1..=12)
        .filter_map(|month| month_grid(year, month, |d| lookup.get(d)))
        .collect()
}

fn days_in_month(first: NaiveDate) -> usize {
    let next = if first.month() == 12 {
        NaiveDate::from_ymd_opt(first.year() + 1, 1, 1)
    } else {
        NaiveDate::from_ymd_opt(first.year(), first.month() + 1, 1)
    };
    next.map(|n| (n - first).num_days() as usize).unwrap_or(31)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analyzers::utility::calendar_date;

    fn stat(airline: &str, year: i64, month: i64, day: i64, frac: f64) -> DailyStat {
        DailyStat {
            airline: airline.to_string(),
            year,
            month,
            day,
            date: calendar_date(year, month, day),
            total: 10,
            delayed: (frac * 10.0) as u64,
            delay_fraction: frac,
        }
    }

    #[test]
    fn test_january_2015_starts_on_thursday() {
        let grid = month_grid(2015, 1, |_| Some(0.5)).unwrap();

        assert_eq!(grid.weeks.len(), 5);
        assert_eq!(grid.weeks[0][..4], [None::<f64>; 4]);
        assert_eq!(grid.weeks[0][4], Some(0.5));
        // Jan 31st 2015 is a Saturday.
        assert_eq!(grid.weeks[4][6], Some(0.5));
        assert_eq!(grid.filled(), 31);
        assert_eq!(grid.name(), "January");
    }

    #[test]
    fn test_february_2015_fits_four_weeks() {
        // Feb 1st 2015 is a Sunday and the month has 28 days.
        let grid = month_grid(2015, 2, |_| Some(0.1)).unwrap();
        assert_eq!(grid.weeks.len(), 4);
        assert_eq!(grid.filled(), 28);
    }

    #[test]
    fn test_six_week_month() {
        // Aug 1st 2015 is a Saturday; 31 days spill into a sixth week.
        let grid = month_grid(2015, 8, |_| Some(0.1)).unwrap();
        assert_eq!(grid.weeks.len(), 6);
        assert_eq!(grid.weeks[0][6], Some(0.1));
        assert_eq!(grid.weeks[5][1], Some(0.1));
        assert_eq!(grid.weeks[5][2], None);
    }

    #[test]
    fn test_days_without_data_are_none_not_zero() {
        let stats = vec![stat("AA", 2015, 3, 2, 0.0), stat("AA", 2015, 3, 3, 0.4)];
        let lookup = DelayLookup::for_airline(&stats, "AA");
        let grid = month_grid(2015, 3, |d| lookup.get(d)).unwrap();

        // Mar 1st 2015 is a Sunday.
        assert_eq!(grid.weeks[0][0], None);
        assert_eq!(grid.weeks[0][1], Some(0.0));
        assert_eq!(grid.weeks[0][2], Some(0.4));
        assert_eq!(grid.filled(), 2);
    }

    #[test]
    fn test_lookup_selects_airline_and_skips_undated() {
        let mut bad = stat("AA", 2015, 1, 1, 0.2);
        bad.month = 13;
        bad.date = None;
        let stats = vec![stat("AA", 2015, 1, 1, 0.2), stat("DL", 2015, 1, 2, 0.3), bad];

        let lookup = DelayLookup::for_airline(&stats, "AA");
        assert_eq!(lookup.len(), 1);
        assert_eq!(lookup.undated(), 1);
        assert_eq!(lookup.get(NaiveDate::from_ymd_opt(2015, 1, 2).unwrap()), None);
    }

    #[test]
    fn test_other_years_never_match() {
        let stats = vec![stat("AA", 2014, 6, 1, 0.2)];
        let lookup = DelayLookup::for_airline(&stats, "AA");

        let grids = year_grids(2015, &lookup);
        assert_eq!(grids.len(), 12);
        assert!(grids.iter().all(|g| g.filled() == 0));
    }

    #[test]
    fn test_invalid_month_has_no_grid() {
        assert!(month_grid(2015, 0, |_| None).is_none());
        assert!(month_grid(2015, 13, |_| None).is_none());
    }

    #[test]
    fn test_leap_february() {
        let grid = month_grid(2016, 2, |_| Some(1.0)).unwrap();
        assert_eq!(grid.filled(), 29);
    }
}
