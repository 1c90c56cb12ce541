use chrono::NaiveDate;

/// Returns `part / total`, or `None` when `total` is zero.
pub fn fraction(part: u64, total: u64) -> Option<f64> {
    if total == 0 {
        return None;
    }
    Some(part as f64 / total as f64)
}

/// Converts a year/month/day triple into a date. Impossible combinations
/// (month 13, month -1, February 30th, ...) yield `None`.
pub fn calendar_date(year: i64, month: i64, day: i64) -> Option<NaiveDate> {
    NaiveDate::from_ymd_opt(
        i32::try_from(year).ok()?,
        u32::try_from(month).ok()?,
        u32::try_from(day).ok()?,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fraction_zero_total() {
        assert_eq!(fraction(0, 0), None);
    }

    #[test]
    fn test_fraction_normal_values() {
        assert_eq!(fraction(1, 4), Some(0.25));
        assert_eq!(fraction(3, 3), Some(1.0));
    }

    #[test]
    fn test_calendar_date_rejects_impossible_days() {
        assert!(calendar_date(2015, 13, 1).is_none());
        assert!(calendar_date(2015, 1, 32).is_none());
        assert!(calendar_date(2015, 2, 29).is_none());
        assert!(calendar_date(2016, 2, 29).is_some());
        assert!(calendar_date(2015, 0, 10).is_none());
        assert!(calendar_date(2015, -1, 5).is_none());
        assert!(calendar_date(2015, 1, -5).is_none());
        assert!(calendar_date(i64::MAX, 1, 1).is_none());
    }
}
