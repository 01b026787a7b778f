//! Command implementations for the water quality CLI.
//!
//! Provides subcommands for summarizing sensor CSV data against the
//! SANS 241:2015 thresholds, extracting chart series and generating
//! synthetic test data.

use clap::Subcommand;

pub mod generate;
pub mod series;
pub mod source;
pub mod summarize;

use source::InputArgs;

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Ingest sensor readings and report min/max/mean and status per parameter
    Summarize {
        #[command(flatten)]
        input: InputArgs,

        /// Parameters to report, comma separated (default: all)
        #[arg(short = 'p', long, value_delimiter = ',')]
        parameters: Vec<String>,

        /// Emit the full report (including readings) as JSON
        #[arg(long)]
        json: bool,
    },

    /// Print one parameter's readings as a time series
    Series {
        #[command(flatten)]
        input: InputArgs,

        /// Parameter id, e.g. pH or turbidity_NTU
        #[arg(short = 'p', long)]
        parameter: String,

        /// Emit the points as JSON instead of CSV
        #[arg(long)]
        json: bool,
    },

    /// Print the SANS 241:2015 threshold table
    Thresholds,

    /// Write a synthetic sensor CSV with injected anomaly events
    Generate {
        /// Output path for the generated CSV
        #[arg(short = 'o', long)]
        output: String,

        /// First timestamp (default 2025-06-01 00:00:00)
        #[arg(long)]
        start: Option<String>,

        /// Number of days to simulate
        #[arg(long, default_value_t = 60)]
        days: u32,

        /// Minutes between readings
        #[arg(long, default_value_t = 30)]
        interval_minutes: u32,

        /// Seed for reproducible output
        #[arg(long)]
        seed: Option<u64>,
    },
}

pub async fn run(command: Command) -> anyhow::Result<()> {
    match command {
        Command::Summarize {
            input,
            parameters,
            json,
        } => summarize::run_summarize(&input, &parameters, json).await,
        Command::Series {
            input,
            parameter,
            json,
        } => series::run_series(&input, &parameter, json).await,
        Command::Thresholds => {
            let table = wq_core::threshold::ThresholdTable::sans_241();
            print!("{}", summarize::format_thresholds(table));
            Ok(())
        }
        Command::Generate {
            output,
            start,
            days,
            interval_minutes,
            seed,
        } => {
            let mut config = generate::GeneratorConfig {
                days,
                interval_minutes,
                seed,
                ..Default::default()
            };
            if let Some(start) = start {
                config.start = wq_utils::dates::parse_timestamp(&start)?;
            }
            generate::run_generate(&output, &config)
        }
    }
}
