use crate::analyzers::types::DailyStat;
use crate::analyzers::utility::{calendar_date, fraction};
use crate::stats::{DayKey, DelayCounts, PartialStats};
use std::collections::HashMap;

/// Running totals across every batch merged so far.
///
/// Counts are summed per key and only divided in [`DailyAggregator::finish`],
/// so the result does not depend on how rows were split into batches or in
/// which order the batches arrive.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct DailyAggregator {
    totals: HashMap<DayKey, DelayCounts>,
    batches_merged: usize,
}

impl DailyAggregator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Folds one batch's partial counts into the running totals.
    pub fn merge(&mut self, partial: PartialStats) {
        for (key, counts) in partial.groups {
            self.totals.entry(key).or_default().add(counts);
        }
        self.batches_merged += 1;
    }

    /// Folds another aggregator (e.g. built from a different slice of the
    /// input) into this one.
    pub fn absorb(&mut self, other: DailyAggregator) {
        for (key, counts) in other.totals {
            self.totals.entry(key).or_default().add(counts);
        }
        self.batches_merged += other.batches_merged;
    }

    pub fn counts(&self, key: &DayKey) -> Option<DelayCounts> {
        self.totals.get(key).copied()
    }

    /// Number of distinct (airline, day) keys seen.
    pub fn len(&self) -> usize {
        self.totals.len()
    }

    pub fn is_empty(&self) -> bool {
        self.totals.is_empty()
    }

    pub fn batches_merged(&self) -> usize {
        self.batches_merged
    }

    /// Produces the final table sorted by airline, year, month and day.
    pub fn finish(self) -> Vec<DailyStat> {
        let mut rows: Vec<(DayKey, DelayCounts)> = self.totals.into_iter().collect();
        rows.sort_unstable_by(|a, b| a.0.cmp(&b.0));

        rows.into_iter()
            .filter_map(|(key, counts)| {
                // Keys only exist once a qualifying row was counted.
                let delay_fraction = fraction(counts.delayed, counts.total)?;
                Some(DailyStat {
                    date: calendar_date(key.year, key.month, key.day),
                    airline: key.airline,
                    year: key.year,
                    month: key.month,
                    day: key.day,
                    total: counts.total,
                    delayed: counts.delayed,
                    delay_fraction,
                })
            })
            .collect()
    }
}

impl Extend<PartialStats> for DailyAggregator {
    fn extend<I: IntoIterator<Item = PartialStats>>(&mut self, iter: I) {
        for partial in iter {
            self.merge(partial);
        }
    }
}

impl FromIterator<PartialStats> for DailyAggregator {
    fn from_iter<I: IntoIterator<Item = PartialStats>>(iter: I) -> Self {
        let mut agg = DailyAggregator::new();
        agg.extend(iter);
        agg
    }
}

/// Merges partial tables from any number of batches into the final table.
pub fn compute_stats<I>(partials: I) -> Vec<DailyStat>
where
    I: IntoIterator<Item = PartialStats>,
{
    partials.into_iter().collect::<DailyAggregator>().finish()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::FlightRecord;
    use crate::stats::AirlineFilter;
    use rand::rngs::StdRng;
    use rand::seq::SliceRandom;
    use rand::{Rng, SeedableRng};

    fn filter() -> AirlineFilter {
        AirlineFilter::new(["AA", "DL"]).unwrap()
    }

    fn partials_of(batches: &[Vec<FlightRecord>]) -> Vec<PartialStats> {
        batches
            .iter()
            .map(|b| PartialStats::from_batch(b, &filter()))
            .collect()
    }

    fn random_rows(rng: &mut StdRng, n: usize) -> Vec<FlightRecord> {
        let airlines = ["AA", "DL", "UA"];
        (0..n)
            .map(|_| {
                let airline = airlines[rng.gen_range(0..airlines.len())];
                let delay = if rng.gen_bool(0.1) {
                    None
                } else {
                    Some(rng.gen_range(-30..90))
                };
                FlightRecord::new(airline, 2015, rng.gen_range(1..=2), rng.gen_range(1..=4), delay)
            })
            .collect()
    }

    fn random_partition(rng: &mut StdRng, rows: &[FlightRecord]) -> Vec<Vec<FlightRecord>> {
        let mut batches = Vec::new();
        let mut start = 0;
        while start < rows.len() {
            let len = rng.gen_range(1..=rows.len() - start);
            batches.push(rows[start..start + len].to_vec());
            start += len;
        }
        batches.shuffle(rng);
        batches
    }

    #[test]
    fn test_three_batch_example() {
        let batches = vec![
            vec![FlightRecord::new("AA", 2015, 1, 5, Some(20))],
            vec![FlightRecord::new("AA", 2015, 1, 5, Some(5))],
            vec![FlightRecord::new("AA", 2015, 1, 5, Some(15))],
        ];
        let stats = compute_stats(partials_of(&batches));

        assert_eq!(stats.len(), 1);
        let s = &stats[0];
        assert_eq!(s.airline, "AA");
        assert_eq!(s.date, chrono::NaiveDate::from_ymd_opt(2015, 1, 5));
        assert_eq!((s.total, s.delayed), (3, 2));
        assert_eq!(s.delay_fraction, 2.0 / 3.0);
    }

    #[test]
    fn test_sum_then_divide_not_mean_of_fractions() {
        // 1 of 1 delayed in the first batch, 0 of 3 in the second.
        let batches = vec![
            vec![FlightRecord::new("AA", 2015, 3, 1, Some(40))],
            vec![
                FlightRecord::new("AA", 2015, 3, 1, Some(0)),
                FlightRecord::new("AA", 2015, 3, 1, Some(1)),
                FlightRecord::new("AA", 2015, 3, 1, Some(2)),
            ],
        ];
        let stats = compute_stats(partials_of(&batches));

        let mean_of_fractions = (1.0 + 0.0) / 2.0;
        assert_eq!(stats[0].delay_fraction, 0.25);
        assert_ne!(stats[0].delay_fraction, mean_of_fractions);
    }

    #[test]
    fn test_partitioning_does_not_change_result() {
        let mut rng = StdRng::seed_from_u64(7);

        for _ in 0..25 {
            let n = rng.gen_range(1..300);
            let rows = random_rows(&mut rng, n);
            let unchunked = compute_stats(partials_of(std::slice::from_ref(&rows)));

            for _ in 0..5 {
                let batches = random_partition(&mut rng, &rows);
                assert_eq!(compute_stats(partials_of(&batches)), unchunked);
            }
        }
    }

    #[test]
    fn test_absorb_matches_single_fold() {
        let mut rng = StdRng::seed_from_u64(11);
        let rows = random_rows(&mut rng, 200);
        let batches = random_partition(&mut rng, &rows);
        let (left, right) = batches.split_at(batches.len() / 2);

        let mut a: DailyAggregator = partials_of(left).into_iter().collect();
        let b: DailyAggregator = partials_of(right).into_iter().collect();
        a.absorb(b);

        assert_eq!(a.batches_merged(), batches.len());
        assert_eq!(a.finish(), compute_stats(partials_of(&batches)));
    }

    #[test]
    fn test_totals_are_sum_across_batches() {
        let mut rng = StdRng::seed_from_u64(3);
        let rows = random_rows(&mut rng, 500);
        let batches = random_partition(&mut rng, &rows);
        let stats = compute_stats(partials_of(&batches));

        for s in &stats {
            let expected = rows
                .iter()
                .filter(|r| r.airline.as_deref() == Some(s.airline.as_str()))
                .filter(|r| r.month == Some(s.month) && r.day == Some(s.day))
                .filter(|r| r.arrival_delay.is_some())
                .count() as u64;
            assert_eq!(s.total, expected);
            assert!(s.delayed <= s.total);
            assert!((0.0..=1.0).contains(&s.delay_fraction));
        }
        assert!(stats.iter().all(|s| s.airline != "UA"));
    }

    #[test]
    fn test_invalid_date_yields_undefined_marker() {
        let batches = vec![vec![
            FlightRecord::new("AA", 2015, 13, 1, Some(40)),
            FlightRecord::new("AA", 2015, 1, 32, Some(0)),
            FlightRecord::new("AA", 2015, -1, 5, Some(20)),
            FlightRecord::new("AA", 2015, 1, 31, Some(0)),
        ]];
        let stats = compute_stats(partials_of(&batches));

        assert_eq!(stats.len(), 4);
        let undefined: Vec<_> = stats.iter().filter(|s| s.date.is_none()).collect();
        assert_eq!(undefined.len(), 3);
        let negative = stats.iter().find(|s| s.month == -1).unwrap();
        assert_eq!((negative.total, negative.delayed, negative.date), (1, 1, None));
        let valid = stats.iter().find(|s| s.date.is_some()).unwrap();
        assert_eq!((valid.month, valid.day), (1, 31));
    }

    #[test]
    fn test_finish_is_sorted_by_key() {
        let batches = vec![vec![
            FlightRecord::new("DL", 2015, 1, 1, Some(0)),
            FlightRecord::new("AA", 2015, 2, 1, Some(0)),
            FlightRecord::new("AA", 2015, 1, 9, Some(0)),
        ]];
        let keys: Vec<DayKey> = compute_stats(partials_of(&batches))
            .iter()
            .map(DailyStat::key)
            .collect();

        assert_eq!(
            keys,
            vec![
                DayKey::new("AA", 2015, 1, 9),
                DayKey::new("AA", 2015, 2, 1),
                DayKey::new("DL", 2015, 1, 1),
            ]
        );
    }

    #[test]
    fn test_empty_input() {
        assert!(compute_stats(Vec::new()).is_empty());
    }
}
