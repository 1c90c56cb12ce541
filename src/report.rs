//! End-to-end report: aggregate the archive, then draw one calendar per airline.

use std::path::PathBuf;

use anyhow::{Context, Result};
use tracing::info;

use crate::analyzers::analyzer::collect_daily_stats;
use crate::analyzers::types::DailyStat;
use crate::calendar::{DelayLookup, render_calendar};
use crate::config::ReportConfig;

/// One written calendar.
#[derive(Debug, Clone, PartialEq)]
pub struct ChartOutput {
    pub airline: String,
    pub path: PathBuf,
    /// Days of the target year with a colored cell.
    pub days_plotted: usize,
}

/// Runs the aggregation pipeline described by `config`.
pub fn daily_stats(config: &ReportConfig) -> Result<Vec<DailyStat>> {
    config.validate()?;
    let stats = collect_daily_stats(
        &config.archive_path,
        config.batch_size,
        config.delimiter_byte()?,
        &config.airline_filter,
    )?;
    Ok(stats)
}

/// Aggregates the archive and renders a calendar for every airline in the
/// filter. Fails before writing any chart if the archive cannot be read.
#[tracing::instrument(skip(config), fields(archive = %config.archive_path.display(), year = config.target_year))]
pub fn run(config: &ReportConfig) -> Result<Vec<ChartOutput>> {
    let stats = daily_stats(config)?;

    std::fs::create_dir_all(&config.output_dir).with_context(|| {
        format!("creating output directory {}", config.output_dir.display())
    })?;

    let scale = config.color_scale();
    let mut charts = Vec::with_capacity(config.airline_filter.len());

    for airline in config.airline_filter.iter() {
        let lookup = DelayLookup::for_airline(&stats, airline);
        let path = config.chart_path(airline);
        let days_plotted = render_calendar(&path, config.target_year, &lookup, &scale)
            .with_context(|| format!("rendering {}", path.display()))?;

        info!(airline, path = %path.display(), days_plotted, "Chart ready");
        charts.push(ChartOutput {
            airline: airline.to_string(),
            path,
            days_plotted,
        });
    }

    Ok(charts)
}
