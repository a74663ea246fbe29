//! CLI entry point for the media intelligence dashboard.

use anyhow::{Result, anyhow};
use clap::Parser;
use dotenv::dotenv;
use media_intel::{
    DashboardConfig, DashboardSession, FilterCriteria, FilterOptions, parse_iso_date,
    render_text, write_cleaned_csv,
};
use std::path::Path;
use tracing::{info, warn};

#[derive(Parser, Debug)]
#[command(
    version,
    about = "Media Intelligence Dashboard",
    long_about = "Cleans a CSV export of social-media mentions, applies filters and prints \
                  the five dashboard panels.\n\n\
                  EXAMPLES:\n  \
                  # Full dashboard\n  \
                  media-intel -i mentions.csv\n\n  \
                  # Only positive Twitter mentions in January\n  \
                  media-intel -i mentions.csv --platform Twitter --sentiment Positive \\\n    \
                  --start-date 2024-01-01 --end-date 2024-01-31\n\n  \
                  # Machine-readable output\n  \
                  media-intel -i mentions.csv --json | jq .panels.top_locations"
)]
struct Args {
    /// Path to the CSV file to analyze
    #[arg(short, long)]
    input: String,

    /// Keep only this platform
    #[arg(long)]
    platform: Option<String>,

    /// Keep only this sentiment (Positive, Neutral, Negative)
    #[arg(long)]
    sentiment: Option<String>,

    /// Keep only this media type
    #[arg(long)]
    media_type: Option<String>,

    /// Keep only this location
    #[arg(long)]
    location: Option<String>,

    /// First day of the date range (YYYY-MM-DD, inclusive)
    #[arg(long, value_parser = parse_iso_date)]
    start_date: Option<chrono::NaiveDate>,

    /// Last day of the date range (YYYY-MM-DD, inclusive)
    #[arg(long, value_parser = parse_iso_date)]
    end_date: Option<chrono::NaiveDate>,

    /// Number of locations in the top-locations panel
    #[arg(long, default_value = "5")]
    top_n: usize,

    /// Number of cleaned rows in the preview table (0 hides it)
    #[arg(long, default_value = "5")]
    preview_rows: usize,

    /// Print the render model as JSON instead of text
    ///
    /// Disables all logs so stdout only carries the JSON document.
    #[arg(long)]
    json: bool,

    /// Print the available filter options and exit
    #[arg(long)]
    options: bool,

    /// Write the cleaned table to this CSV path
    #[arg(long)]
    export_cleaned: Option<String>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, default_value = "info")]
    log_level: String,

    /// Only show warnings and errors
    #[arg(short, long)]
    quiet: bool,
}

impl Args {
    fn criteria(&self) -> FilterCriteria {
        FilterCriteria {
            platform: self.platform.clone(),
            sentiment: self.sentiment.clone(),
            media_type: self.media_type.clone(),
            location: self.location.clone(),
            start_date: self.start_date,
            end_date: self.end_date,
        }
    }
}

/// Initialize the tracing subscriber.
///
/// With `json_output` set no subscriber is installed, keeping stdout clean.
fn init_logging(level: &str, quiet: bool, json_output: bool) {
    if json_output {
        return;
    }

    use tracing_subscriber::EnvFilter;

    let effective_level = if quiet { "warn" } else { level };

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(effective_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();
}

fn main() -> Result<()> {
    dotenv().ok();

    let args = Args::parse();
    init_logging(&args.log_level, args.quiet, args.json);

    if !Path::new(&args.input).exists() {
        return Err(anyhow!("Input file not found: {}", args.input));
    }

    let config = DashboardConfig::builder()
        .top_n(args.top_n)
        .preview_rows(args.preview_rows)
        .build()?;
    let session = DashboardSession::new(config)?;

    info!("Loading dataset from: {}", args.input);
    let upload = session.upload_path(&args.input)?;
    let report = &upload.cleaning;
    info!(
        "Cleaned {} rows: {} kept, {} dropped",
        report.rows_in, report.rows_kept, report.rows_dropped
    );
    if report.rows_kept == 0 {
        warn!("No rows survived cleaning; check the Date column");
    }

    if let Some(path) = &args.export_cleaned {
        let table = session.cleaned()?;
        write_cleaned_csv(&table, path)?;
    }

    if args.options {
        return print_options(&session.options()?, args.json);
    }

    let model = session.apply_filters(args.criteria())?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&model)?);
    } else {
        print!("{}", render_text(&model));
    }

    Ok(())
}

/// Print the selector choices for the loaded file.
fn print_options(options: &FilterOptions, json: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(options)?);
        return Ok(());
    }

    let list = |values: &[String]| {
        if values.is_empty() {
            "(column not present)".to_string()
        } else {
            values.join(", ")
        }
    };

    println!("Platforms:   {}", list(&options.platforms));
    println!("Sentiments:  {}", list(&options.sentiments));
    println!("Media types: {}", list(&options.media_types));
    println!("Locations:   {}", list(&options.locations));
    match (options.min_date, options.max_date) {
        (Some(min), Some(max)) => println!("Date range:  {} .. {}", min, max),
        _ => println!("Date range:  (no dated records)"),
    }
    Ok(())
}
