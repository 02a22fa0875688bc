//! Command-line parsing for the price projection tool.
//!
//! The goal of this module is to keep **argument parsing** and **command dispatch**
//! separate from the pipeline/math code.

use std::path::PathBuf;

use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand};

use crate::domain::{DEFAULT_HORIZON, DuplicatePolicy, InputOrder};
use crate::models::ModelPreset;

/// Top-level CLI.
#[derive(Debug, Parser)]
#[command(
    name = "nlb",
    version,
    about = "Regression projections (NLB / PLC) over a daily price history"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

/// CLI subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Fit the models and print coefficients, today's bands and the outlook tables.
    Summary(SummaryArgs),
    /// Write the projected series to CSV, or the whole dataset to JSON.
    Export(ExportArgs),
}

/// Options shared by every command that builds a dataset.
#[derive(Debug, Args, Clone)]
pub struct SeriesArgs {
    /// Price history: a `.json` array of {date, price, localHigh?} or a `.csv`
    /// with a `date,price[,local_high]` header.
    #[arg(value_name = "INPUT")]
    pub input: PathBuf,

    /// Number of days to project, counted from the first observation.
    #[arg(long, env = "NLB_HORIZON", default_value_t = DEFAULT_HORIZON)]
    pub horizon: usize,

    /// Ordering of the input records.
    #[arg(long, env = "NLB_ORDER", value_enum, default_value_t = InputOrder::Auto)]
    pub order: InputOrder,

    /// How to treat records that share a calendar day.
    #[arg(long, value_enum, default_value_t = DuplicatePolicy::Reject)]
    pub duplicates: DuplicatePolicy,

    /// Model to fit (repeatable). Defaults to all built-in models.
    #[arg(long = "model", value_enum)]
    pub models: Vec<ModelPreset>,
}

/// Options for `nlb summary`.
#[derive(Debug, Args, Clone)]
pub struct SummaryArgs {
    #[command(flatten)]
    pub series: SeriesArgs,

    /// Date used as "today" for the band table (defaults to the local date).
    #[arg(long, value_name = "YYYY-MM-DD")]
    pub as_of: Option<NaiveDate>,

    /// Model used for the yearly outlook and magnitude tables.
    #[arg(long, value_enum, default_value_t = ModelPreset::Nlb)]
    pub focus: ModelPreset,

    /// Number of New Year's days to list in the outlook.
    #[arg(long, default_value_t = 5)]
    pub years: u32,
}

/// Options for `nlb export`.
#[derive(Debug, Args, Clone)]
pub struct ExportArgs {
    #[command(flatten)]
    pub series: SeriesArgs,

    /// Output path; `.csv` writes the projected series, `.json` the full dataset.
    #[arg(long, value_name = "PATH")]
    pub out: PathBuf,
}
