//! CLI entry point for the bikeshare statistics explorer.
//!
//! Runs an interactive session by default, or prints a single report or the
//! raw records for a filter given on the command line.

mod prompt;

use std::ffi::OsStr;
use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use bikeshare_stats::config::DataConfig;
use bikeshare_stats::error::BikeshareError;
use bikeshare_stats::filter::filter;
use bikeshare_stats::filters::FilterSpec;
use bikeshare_stats::loader::{self, Dataset};
use bikeshare_stats::output::{self, RAW_PAGE_SIZE};
use clap::{Args, Parser, Subcommand};
use tracing::{error, info};
use tracing_subscriber::{
    EnvFilter, Layer,
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
};

use crate::prompt::Prompter;

#[derive(Parser)]
#[command(name = "bikeshare_stats")]
#[command(about = "Explore US bikeshare trip data", long_about = None)]
struct Cli {
    /// Directory containing the city CSV files (overrides BIKESHARE_DATA_DIR)
    #[arg(long, global = true, value_name = "DIR")]
    data_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Interactively choose filters and browse statistics (default)
    Explore,
    /// Print the statistics report for one filter
    Report(FilterArgs),
    /// Print the filtered trip records as JSON
    Records {
        #[command(flatten)]
        filter: FilterArgs,

        /// Stop after this many records
        #[arg(short, long)]
        limit: Option<usize>,
    },
}

#[derive(Args)]
struct FilterArgs {
    /// Chicago, New York City or Washington
    #[arg(short, long)]
    city: String,

    /// January..June, 0..6, or all
    #[arg(short, long, default_value = "all")]
    month: String,

    /// Monday..Sunday, mon/tue/wed/th/fri/sat/sun, or all
    #[arg(short, long, default_value = "all")]
    day: String,
}

impl FilterArgs {
    fn spec(&self) -> Result<FilterSpec> {
        Ok(FilterSpec::parse(&self.city, &self.month, &self.day)?)
    }
}

fn main() -> Result<()> {
    dotenvy::dotenv().ok(); // Load .env file

    // Logging setup: colored stderr + JSON rolling log file
    let log_file_path =
        std::env::var("LOG_FILE_PATH").unwrap_or_else(|_| "logs/bikeshare_stats.log".to_string());
    let log_dir = Path::new(&log_file_path)
        .parent()
        .unwrap_or(Path::new("logs"));
    let log_file_name = Path::new(&log_file_path)
        .file_name()
        .unwrap_or(OsStr::new("bikeshare_stats.log"));

    let file_appender = tracing_appender::rolling::daily(log_dir, log_file_name);
    let (non_blocking_file, _file_guard) = tracing_appender::non_blocking(file_appender);

    // stderr stays quiet by default so it does not interleave with prompts
    let stderr_layer = fmt::layer()
        .with_target(true)
        .with_span_events(FmtSpan::CLOSE)
        .with_ansi(true)
        .with_writer(std::io::stderr)
        .with_filter(EnvFilter::from_env("RUST_LOG").add_directive("warn".parse()?));

    let json_layer = fmt::layer()
        .json()
        .with_current_span(true)
        .with_span_list(true)
        .with_span_events(FmtSpan::CLOSE)
        .with_writer(non_blocking_file)
        .with_filter(EnvFilter::from_env("RUST_LOG_JSON").add_directive("debug".parse()?));

    tracing_subscriber::registry()
        .with(stderr_layer)
        .with(json_layer)
        .init();

    let cli = Cli::parse();
    let config = match cli.data_dir {
        Some(dir) => DataConfig::new(dir),
        None => DataConfig::from_env(),
    };
    info!(data_dir = %config.data_dir().display(), "Using data directory");

    match cli.command.unwrap_or(Commands::Explore) {
        Commands::Explore => {
            let stdin = io::stdin();
            let mut prompter = Prompter::new(stdin.lock(), io::stdout());
            explore(&mut prompter, &config)?;
        }
        Commands::Report(args) => {
            let spec = args.spec()?;
            let dataset = load(&config, &spec)?;
            let view = filter(&dataset, spec.month, spec.weekday);
            output::write_report(&mut io::stdout().lock(), &view, &spec)?;
        }
        Commands::Records { filter: args, limit } => {
            let spec = args.spec()?;
            let dataset = load(&config, &spec)?;
            let view = filter(&dataset, spec.month, spec.weekday);

            let mut out = io::stdout().lock();
            let mut shown = 0usize;
            for record in view.iter().take(limit.unwrap_or(usize::MAX)) {
                let json = output::record_json(&dataset, record);
                writeln!(out, "{}", output::to_pretty_json(&json)?)?;
                shown += 1;
            }
            writeln!(out, "total: {shown}")?;
        }
    }

    Ok(())
}

fn load(config: &DataConfig, spec: &FilterSpec) -> Result<Dataset> {
    loader::load(spec.city, config).with_context(|| format!("failed to load {} data", spec.city))
}

/// The interactive loop: choose filters, read the report, optionally browse
/// the matching records, then start over or quit.
fn explore<R: BufRead, W: Write>(
    prompter: &mut Prompter<R, W>,
    config: &DataConfig,
) -> Result<()> {
    writeln!(prompter.output(), "Hello! Let's explore some US bikeshare data!")?;

    // The last loaded dataset is reused while the city stays the same.
    let mut loaded: Option<Dataset> = None;

    loop {
        let city = prompter.city()?;
        let month = prompter.month()?;
        let weekday = prompter.weekday()?;
        let spec = FilterSpec::new(city, month, weekday);

        let out = prompter.output();
        let chosen = spec.to_string();
        writeln!(
            out,
            "Chosen {}",
            chosen.trim_start_matches('(').trim_end_matches(')')
        )?;
        writeln!(
            out,
            "\n > > > NOTE: Outputs are made to fit within {} characters. Make sure to have a wide enough terminal window! < < <\n",
            output::DIVIDER_LENGTH
        )?;
        writeln!(out, "{}", output::divider())?;

        if loaded.as_ref().is_none_or(|d| d.city() != city) {
            match loader::load(city, config) {
                Ok(dataset) => loaded = Some(dataset),
                Err(e @ BikeshareError::SourceUnavailable { .. })
                | Err(e @ BikeshareError::DataError { .. }) => {
                    error!(error = %e, city = %city, "Load failed");
                    writeln!(prompter.output(), "Could not load {city} data: {e}")?;
                    continue;
                }
                Err(e) => return Err(e.into()),
            }
        }
        let Some(dataset) = loaded.as_ref() else {
            continue;
        };

        let view = filter(dataset, spec.month, spec.weekday);
        info!(records = view.len(), filter = %spec, "Filter applied");
        output::write_report(prompter.output(), &view, &spec)?;

        if prompter.confirm(&format!(
            "\nWould you like to view all individual trips? Enter yes (y) or no (n).\n(WARNING: this may print {} records)",
            view.len()
        ))? {
            let out = prompter.output();
            for record in view.iter() {
                let json = output::record_json(dataset, record);
                writeln!(out, "{}", output::to_pretty_json(&json)?)?;
            }
            writeln!(out, "total: {}", view.len())?;
            writeln!(out, "{}", output::divider())?;
        }

        if prompter.confirm("\nWould you like to view raw data? Enter yes (y) or no (n).")? {
            writeln!(
                prompter.output(),
                "The program will display raw data in chunks of {RAW_PAGE_SIZE} rows."
            )?;
            let mut start = 0;
            while start < view.len() {
                for line in output::format_raw_page(&view, start, RAW_PAGE_SIZE) {
                    writeln!(prompter.output(), "{line}")?;
                }
                start += RAW_PAGE_SIZE;
                if start >= view.len()
                    || !prompter.more("Press enter to see the next rows or any key to exit.")?
                {
                    break;
                }
            }
        }

        if !prompter.confirm("\nWould you like to restart? Enter yes (y) or no (n).")? {
            break;
        }
    }

    Ok(())
}
