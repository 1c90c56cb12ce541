use std::io::Read;
use std::iter::FusedIterator;
use std::num::NonZeroUsize;

use csv::StringRecord;
use tracing::debug;

use crate::error::SourceError;
use crate::parser::{ColumnIndex, FlightRecord};

/// Upper bound for the initial allocation of a batch buffer.
const MAX_PREALLOCATED_ROWS: usize = 16_384;

/// Lifecycle of a [`Batches`] stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BatchState {
    Open,
    Exhausted,
    Failed,
}

/// Lazy, single-pass sequence of row batches over a CSV stream.
///
/// Each batch holds at most `batch_size` projected rows. The underlying
/// reader is dropped as soon as the stream is exhausted or fails, and no
/// further batches are produced afterwards.
pub struct Batches<'a> {
    reader: Option<csv::Reader<Box<dyn Read + 'a>>>,
    columns: ColumnIndex,
    record: StringRecord,
    batch_size: usize,
    state: BatchState,
    batches_read: usize,
    rows_read: u64,
}

impl<'a> Batches<'a> {
    /// Wraps any CSV byte stream, reading and validating its header row.
    ///
    /// Rows shorter than the header are accepted; their trailing fields are
    /// treated as missing.
    pub fn from_reader(
        reader: impl Read + 'a,
        batch_size: NonZeroUsize,
        delimiter: u8,
    ) -> Result<Self, SourceError> {
        let boxed: Box<dyn Read + 'a> = Box::new(reader);
        let mut reader = csv::ReaderBuilder::new()
            .delimiter(delimiter)
            .flexible(true)
            .from_reader(boxed);

        let columns = ColumnIndex::from_headers(reader.headers()?)?;

        Ok(Batches {
            reader: Some(reader),
            columns,
            record: StringRecord::new(),
            batch_size: batch_size.get(),
            state: BatchState::Open,
            batches_read: 0,
            rows_read: 0,
        })
    }

    pub fn state(&self) -> BatchState {
        self.state
    }

    pub fn batches_read(&self) -> usize {
        self.batches_read
    }

    pub fn rows_read(&self) -> u64 {
        self.rows_read
    }

    fn close(&mut self, state: BatchState) {
        self.state = state;
        self.reader = None;
    }
}

impl Iterator for Batches<'_> {
    type Item = Result<Vec<FlightRecord>, SourceError>;

    fn next(&mut self) -> Option<Self::Item> {
        let reader = self.reader.as_mut()?;
        let mut batch = Vec::with_capacity(self.batch_size.min(MAX_PREALLOCATED_ROWS));

        while batch.len() < self.batch_size {
            match reader.read_record(&mut self.record) {
                Ok(true) => batch.push(self.columns.project(&self.record)),
                Ok(false) => {
                    self.close(BatchState::Exhausted);
                    break;
                }
                Err(e) => {
                    self.close(BatchState::Failed);
                    return Some(Err(e.into()));
                }
            }
        }

        if batch.is_empty() {
            return None;
        }

        self.batches_read += 1;
        self.rows_read += batch.len() as u64;
        debug!(
            batch = self.batches_read,
            rows = batch.len(),
            total_rows = self.rows_read,
            "Read row batch"
        );

        Some(Ok(batch))
    }
}

impl FusedIterator for Batches<'_> {}
