//! Top-level application orchestration.
//!
//! `src/main.rs` is intentionally tiny; this module is the "real main" that:
//! - loads `.env` and installs logging
//! - parses CLI arguments
//! - loads the raw series and builds the dataset
//! - prints reports or writes exports

use chrono::{Datelike, Local};
use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::cli::{Command, ExportArgs, SeriesArgs, SummaryArgs};
use crate::dataset::{ChartDataset, DEFAULT_MAGNITUDES};
use crate::domain::PipelineConfig;
use crate::error::AppError;
use crate::models::{ModelPreset, default_specs};

pub mod pipeline;

/// Entry point for the `nlb` binary.
pub fn run() -> Result<(), AppError> {
    dotenvy::dotenv().ok();
    init_tracing();

    // `nlb prices.json` behaves like `nlb summary prices.json`.
    let argv = rewrite_args(std::env::args().collect());
    let cli = crate::cli::Cli::parse_from(argv);

    match cli.command {
        Command::Summary(args) => handle_summary(args),
        Command::Export(args) => handle_export(args),
    }
}

fn init_tracing() {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("nlb_curves=info"));
    // Reports go to stdout; keep logs on stderr.
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn handle_summary(args: SummaryArgs) -> Result<(), AppError> {
    let dataset = load_dataset(&args.series)?;
    let as_of = args.as_of.unwrap_or_else(|| Local::now().date_naive());

    println!("{}", crate::report::format_dataset_summary(&dataset));
    println!("{}", crate::report::format_bands(&dataset, as_of));
    let focus = args.focus.name();
    let outlook = dataset.yearly_outlook(focus, as_of.year(), args.years);
    println!("{}", crate::report::format_outlook(outlook.as_deref(), focus));
    let crossings = dataset.magnitude_crossings(focus, &DEFAULT_MAGNITUDES);
    println!("{}", crate::report::format_magnitudes(crossings.as_deref(), focus));
    let residuals = crate::report::compute_residuals(&dataset, focus);
    println!("{}", crate::report::format_residuals(residuals.as_deref(), focus));
    Ok(())
}

fn handle_export(args: ExportArgs) -> Result<(), AppError> {
    let dataset = load_dataset(&args.series)?;
    crate::io::export::write_export(&args.out, &dataset)?;
    info!(path = %args.out.display(), "export written");
    Ok(())
}

fn load_dataset(args: &SeriesArgs) -> Result<ChartDataset, AppError> {
    let config = pipeline_config_from_args(args);
    let raw = crate::io::ingest::load_raw_points(&args.input)?;
    Ok(pipeline::build_dataset(&raw, &config)?)
}

pub fn pipeline_config_from_args(args: &SeriesArgs) -> PipelineConfig {
    let models = if args.models.is_empty() {
        default_specs()
    } else {
        let mut presets: Vec<ModelPreset> = Vec::with_capacity(args.models.len());
        for p in &args.models {
            if !presets.contains(p) {
                presets.push(*p);
            }
        }
        presets.iter().map(|p| p.spec()).collect()
    };

    PipelineConfig {
        horizon: args.horizon,
        order: args.order,
        duplicates: args.duplicates,
        models,
    }
}

/// Rewrite argv so `nlb` defaults to `nlb summary`.
///
/// Rules:
/// - `nlb prices.json ...`      -> `nlb summary prices.json ...`
/// - `nlb --horizon 5000 ...`   -> `nlb summary --horizon 5000 ...`
/// - `nlb --help/--version/-h`  -> unchanged (show top-level help/version)
fn rewrite_args(mut argv: Vec<String>) -> Vec<String> {
    let Some(arg1) = argv.get(1).cloned() else {
        return argv;
    };

    let is_top_level_help_or_version = matches!(
        arg1.as_str(),
        "-h" | "--help" | "-V" | "--version" | "help"
    );
    if is_top_level_help_or_version {
        return argv;
    }

    let is_subcommand = matches!(arg1.as_str(), "summary" | "export");
    if is_subcommand {
        return argv;
    }

    argv.insert(1, "summary".to_string());
    argv
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::Cli;

    fn args(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn bare_input_defaults_to_summary() {
        assert_eq!(rewrite_args(args(&["nlb", "p.json"])), args(&["nlb", "summary", "p.json"]));
        assert_eq!(
            rewrite_args(args(&["nlb", "--horizon", "10", "p.json"])),
            args(&["nlb", "summary", "--horizon", "10", "p.json"])
        );
        assert_eq!(rewrite_args(args(&["nlb", "--help"])), args(&["nlb", "--help"]));
        assert_eq!(
            rewrite_args(args(&["nlb", "export", "p.json"])),
            args(&["nlb", "export", "p.json"])
        );
    }

    #[test]
    fn config_from_args_defaults_to_all_models() {
        let cli = Cli::parse_from(["nlb", "summary", "p.json"]);
        let Command::Summary(summary) = cli.command else {
            panic!("expected summary");
        };
        let config = pipeline_config_from_args(&summary.series);
        assert_eq!(config.models, default_specs());

        let cli = Cli::parse_from(["nlb", "summary", "p.json", "--model", "plc", "--model", "plc"]);
        let Command::Summary(summary) = cli.command else {
            panic!("expected summary");
        };
        let config = pipeline_config_from_args(&summary.series);
        assert_eq!(config.models, vec![ModelPreset::Plc.spec()]);
    }
}
