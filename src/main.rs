//! CLI entry point for the flight delay calendar.
//!
//! Provides subcommands for rendering per-airline calendar heatmaps and for
//! printing the aggregated per-day table.

use anyhow::{Result, bail};
use clap::{Args, Parser, Subcommand};
use flight_delay_calendar::{
    config::ReportConfig,
    output::{TableFormat, print_debug, write_table},
    report,
    stats::AirlineFilter,
};
use std::ffi::OsStr;
use std::num::NonZeroUsize;
use std::path::{Path, PathBuf};
use tracing::info;
use tracing_subscriber::{
    EnvFilter, Layer,
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
};

#[derive(Parser)]
#[command(name = "delay-calendar")]
#[command(about = "Daily share of delayed flight arrivals as a calendar heatmap", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Aggregate the archive and write one SVG calendar per airline
    Render {
        #[command(flatten)]
        source: SourceArgs,

        /// Directory to write the SVG files to
        #[arg(short, long)]
        output_dir: Option<PathBuf>,

        /// Delay share mapped to the top of the color scale
        #[arg(long)]
        scale_max: Option<f64>,
    },
    /// Aggregate the archive and print the per-day table to stdout
    Stats {
        #[command(flatten)]
        source: SourceArgs,

        /// Table format
        #[arg(short, long, value_enum, default_value_t = TableFormat::Pretty)]
        format: TableFormat,
    },
}

#[derive(Args)]
struct SourceArgs {
    /// JSON config file; the flags below override its values
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Zipped or gzipped flights CSV
    #[arg(short, long, value_name = "ARCHIVE")]
    archive: Option<PathBuf>,

    /// Airline code to include (repeatable)
    #[arg(short = 'l', long = "airline")]
    airlines: Vec<String>,

    /// Year shown on the calendar
    #[arg(short, long)]
    year: Option<i32>,

    /// Rows read per batch
    #[arg(short, long)]
    batch_size: Option<NonZeroUsize>,

    /// CSV field delimiter
    #[arg(long)]
    delimiter: Option<char>,
}

impl SourceArgs {
    fn into_config(self) -> Result<ReportConfig> {
        let mut config = match (&self.config, &self.archive) {
            (Some(path), _) => ReportConfig::load(path)?,
            (None, Some(archive)) => ReportConfig::new(archive),
            (None, None) => bail!("either --archive or --config is required"),
        };

        if let Some(archive) = self.archive {
            config.archive_path = archive;
        }
        if !self.airlines.is_empty() {
            config.airline_filter = AirlineFilter::new(self.airlines)?;
        }
        if let Some(year) = self.year {
            config.target_year = year;
        }
        if let Some(batch_size) = self.batch_size {
            config.batch_size = batch_size;
        }
        if let Some(delimiter) = self.delimiter {
            config.delimiter = delimiter;
        }

        Ok(config)
    }
}

fn main() -> Result<()> {
    dotenvy::dotenv().ok(); // Load .env file

    // Logging setup: colored stderr + JSON rolling log file
    let log_file_path = std::env::var("LOG_FILE_PATH")
        .unwrap_or_else(|_| "logs/delay_calendar.log".to_string());
    let log_dir = Path::new(&log_file_path)
        .parent()
        .unwrap_or(Path::new("logs"));
    let log_file_name = Path::new(&log_file_path)
        .file_name()
        .unwrap_or(OsStr::new("delay_calendar.log"));

    let file_appender = tracing_appender::rolling::daily(log_dir, log_file_name);
    let (non_blocking_file, _file_guard) = tracing_appender::non_blocking(file_appender);

    let stderr_layer = fmt::layer()
        .with_target(true)
        .with_span_events(FmtSpan::CLOSE)
        .with_ansi(true)
        .with_writer(std::io::stderr)
        .with_filter(EnvFilter::from_env("RUST_LOG").add_directive("info".parse()?));

    let json_layer = fmt::layer()
        .json()
        .with_current_span(true)
        .with_span_list(true)
        .with_writer(non_blocking_file)
        .with_filter(EnvFilter::from_env("RUST_LOG_JSON").add_directive("debug".parse()?));

    tracing_subscriber::registry()
        .with(stderr_layer)
        .with(json_layer)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Render {
            source,
            output_dir,
            scale_max,
        } => {
            let mut config = source.into_config()?;
            if let Some(dir) = output_dir {
                config.output_dir = dir;
            }
            if let Some(max) = scale_max {
                config.scale_max = max;
            }

            let charts = report::run(&config)?;
            for chart in &charts {
                info!(
                    airline = %chart.airline,
                    path = %chart.path.display(),
                    days = chart.days_plotted,
                    "Calendar"
                );
            }
            info!(charts = charts.len(), "Report complete");
        }
        Commands::Stats { source, format } => {
            let config = source.into_config()?;
            let stats = report::daily_stats(&config)?;
            print_debug(&stats);

            let stdout = std::io::stdout();
            write_table(stdout.lock(), &stats, format)?;
            info!(rows = stats.len(), "Table printed");
        }
    }

    Ok(())
}
