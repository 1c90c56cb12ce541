//! Combining per-batch counts into the final per-day table.
//!
//! Batches are folded into a running [`aggregate::DailyAggregator`] as they
//! are read; the finished table carries one [`types::DailyStat`] per airline
//! and day.

pub mod aggregate;
pub mod analyzer;
pub mod types;
pub mod utility;
