use crate::analyzers::aggregate::DailyAggregator;
use crate::analyzers::types::DailyStat;
use crate::error::SourceError;
use crate::parser::FlightRecord;
use crate::source::FlightArchive;
use crate::stats::{AirlineFilter, PartialStats};
use std::num::NonZeroUsize;
use std::path::Path;
use tracing::{debug, info};

/// Streams the archive batch by batch and returns the per-day delay table.
///
/// The archive is closed before the final table is built, whether the
/// stream finished or failed.
#[tracing::instrument(skip(filter), fields(archive = %path.display(), batch_size = batch_size.get()))]
pub fn collect_daily_stats(
    path: &Path,
    batch_size: NonZeroUsize,
    delimiter: u8,
    filter: &AirlineFilter,
) -> Result<Vec<DailyStat>, SourceError> {
    let (aggregator, rows_read) = {
        let mut archive = FlightArchive::open(path)?;
        let mut batches = archive.batches(batch_size, delimiter)?;
        let aggregator = aggregate_batches(&mut batches, filter)?;
        let (batches_read, rows_read) = (batches.batches_read(), batches.rows_read());
        drop(batches);

        debug!(
            archive = %archive.path().display(),
            entry = archive.entry_name(),
            batches_read,
            rows_read,
            "Closing archive"
        );
        (aggregator, rows_read)
    };

    info!(
        rows = rows_read,
        batches = aggregator.batches_merged(),
        days = aggregator.len(),
        "Combined batch statistics"
    );

    Ok(aggregator.finish())
}

/// Folds a stream of row batches into running totals, stopping at the first
/// read error.
pub fn aggregate_batches<I>(batches: I, filter: &AirlineFilter) -> Result<DailyAggregator, SourceError>
where
    I: IntoIterator<Item = Result<Vec<FlightRecord>, SourceError>>,
{
    let mut aggregator = DailyAggregator::new();

    for batch in batches {
        let batch = batch?;
        let partial = PartialStats::from_batch(&batch, filter);
        debug!(
            rows = partial.rows_read,
            qualified = partial.rows_qualified,
            groups = partial.len(),
            "Aggregated batch"
        );
        aggregator.merge(partial);
    }

    Ok(aggregator)
}
