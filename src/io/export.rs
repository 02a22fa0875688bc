//! Export the projected series to CSV, or the whole dataset to JSON.
//!
//! The CSV is meant to be easy to consume in spreadsheets or chart scripts: one row
//! per projected day, one `regression_<model>` column per fitted model. Absent values
//! are empty cells.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use serde::Serialize;

use crate::dataset::ChartDataset;
use crate::error::AppError;

/// Write `dataset` to `path`, choosing the format from the extension.
pub fn write_export(path: &Path, dataset: &ChartDataset) -> Result<(), AppError> {
    match path.extension().and_then(|e| e.to_str()).map(str::to_ascii_lowercase).as_deref() {
        Some("csv") => write_projected_csv(path, dataset),
        Some("json") => write_dataset_json(path, dataset),
        _ => Err(AppError::new(
            2,
            format!(
                "Unsupported export extension for '{}'. Expected .csv or .json.",
                path.display()
            ),
        )),
    }
}

/// Write the projected series to a CSV file.
pub fn write_projected_csv(path: &Path, dataset: &ChartDataset) -> Result<(), AppError> {
    let file = File::create(path).map_err(|e| {
        AppError::new(2, format!("Failed to create export CSV '{}': {e}", path.display()))
    })?;
    let mut out = BufWriter::new(file);
    write_projected(&mut out, dataset)
        .and_then(|_| out.flush())
        .map_err(|e| AppError::new(2, format!("Failed to write export CSV: {e}")))
}

fn write_projected(out: &mut impl Write, dataset: &ChartDataset) -> std::io::Result<()> {
    let names: Vec<&str> = dataset.model_names().collect();

    write!(out, "index,date,sqrt_days_passed,price,forward_minimum_price")?;
    for name in &names {
        write!(out, ",regression_{name}")?;
    }
    writeln!(out)?;

    for p in dataset.projected() {
        write!(
            out,
            "{},{},{:.10},{},{}",
            p.index,
            p.date,
            p.sqrt_days_passed,
            p.price.map(|v| v.to_string()).unwrap_or_default(),
            p.forward_minimum_price.map(|v| v.to_string()).unwrap_or_default(),
        )?;
        for name in &names {
            let cell = p.regression(name).map(|v| format!("{v:.10}")).unwrap_or_default();
            write!(out, ",{cell}")?;
        }
        writeln!(out)?;
    }
    Ok(())
}

#[derive(Serialize)]
struct DatasetFile<'a> {
    tool: &'static str,
    dataset: &'a ChartDataset,
}

/// Write the full dataset (observed, projected, models, skipped) as JSON.
pub fn write_dataset_json(path: &Path, dataset: &ChartDataset) -> Result<(), AppError> {
    let file = File::create(path).map_err(|e| {
        AppError::new(2, format!("Failed to create export JSON '{}': {e}", path.display()))
    })?;
    let doc = DatasetFile { tool: "nlb", dataset };
    serde_json::to_writer_pretty(BufWriter::new(file), &doc)
        .map_err(|e| AppError::new(2, format!("Failed to write export JSON: {e}")))
}
