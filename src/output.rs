//! Printing of the final per-day table.
//!
//! Supports debug logging, a text table, JSON and CSV. Nothing here writes
//! to disk; callers pass stdout or an in-memory buffer.

use std::io::Write;

use anyhow::Result;
use clap::ValueEnum;
use csv::WriterBuilder;
use tracing::debug;

use crate::analyzers::types::DailyStat;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum TableFormat {
    Pretty,
    Json,
    Csv,
}

/// Logs every row using Rust's debug pretty-print format.
pub fn print_debug(stats: &[DailyStat]) {
    for stat in stats {
        debug!("{:#?}", stat);
    }
}

pub fn write_table<W: Write>(out: W, stats: &[DailyStat], format: TableFormat) -> Result<()> {
    match format {
        TableFormat::Pretty => write_pretty(out, stats),
        TableFormat::Json => write_json(out, stats),
        TableFormat::Csv => write_csv(out, stats),
    }
}

/// Aligned text table; undefined dates print as `-`.
pub fn write_pretty<W: Write>(mut out: W, stats: &[DailyStat]) -> Result<()> {
    writeln!(out, "{:<8} {:<10} {:>7} {:>7} {:>8}", "AIRLINE", "DATE", "FLIGHTS", "DELAYED", "PCT")?;
    for s in stats {
        let date = s
            .date
            .map(|d| d.to_string())
            .unwrap_or_else(|| "-".to_string());
        writeln!(
            out,
            "{:<8} {:<10} {:>7} {:>7} {:>7.2}%",
            s.airline,
            date,
            s.total,
            s.delayed,
            s.delay_fraction * 100.0
        )?;
    }
    Ok(())
}

pub fn write_json<W: Write>(mut out: W, stats: &[DailyStat]) -> Result<()> {
    serde_json::to_writer_pretty(&mut out, stats)?;
    writeln!(out)?;
    Ok(())
}

pub fn write_csv<W: Write>(out: W, stats: &[DailyStat]) -> Result<()> {
    let mut writer = WriterBuilder::new().has_headers(true).from_writer(out);
    for s in stats {
        writer.serialize(s)?;
    }
    writer.flush()?;
    Ok(())
}
