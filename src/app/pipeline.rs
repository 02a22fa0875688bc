//! Shared "dataset pipeline" logic used by every front-end command.
//!
//! Keeping this in one place avoids duplicating the core workflow:
//! parse -> expand -> fit (+ dispersion) -> annotate -> extrapolate -> dataset
//!
//! Commands can then focus on presentation (printing vs exporting).

use std::collections::HashSet;

use tracing::info;

use crate::dataset::ChartDataset;
use crate::domain::{PipelineConfig, RawPoint};
use crate::error::PipelineError;
use crate::fit::fit_models;
use crate::io::ingest::parse_series;
use crate::project::extrapolate;
use crate::series::{annotate, expand};

/// Build a `ChartDataset` from raw records.
///
/// Parse and domain failures refuse the whole dataset. A model that cannot be
/// fitted is left out of the dataset and listed in `ChartDataset::skipped`.
pub fn build_dataset(
    raw: &[RawPoint],
    config: &PipelineConfig,
) -> Result<ChartDataset, PipelineError> {
    validate_config(config)?;

    let parsed = parse_series(raw, config.order, config.duplicates)?;
    let expanded = expand(&parsed)?;
    info!(
        points = expanded.len(),
        first = ?expanded.first().map(|p| p.date),
        last = ?expanded.last().map(|p| p.date),
        "expanded series"
    );

    let fits = fit_models(&config.models, &expanded);
    let points = annotate(expanded, &fits.fitted);
    let projected = extrapolate(&points, &fits.fitted, config.horizon)?;
    info!(
        horizon = projected.len(),
        fitted = fits.fitted.len(),
        skipped = fits.skipped.len(),
        "built chart dataset"
    );

    Ok(ChartDataset::new(points, projected, fits))
}

fn validate_config(config: &PipelineConfig) -> Result<(), PipelineError> {
    if config.horizon == 0 {
        return Err(PipelineError::InvalidConfig("horizon must be at least 1 day".to_string()));
    }
    let mut seen = HashSet::new();
    for spec in &config.models {
        if !seen.insert(spec.name.as_str()) {
            return Err(PipelineError::InvalidConfig(format!(
                "model name '{}' is configured more than once",
                spec.name
            )));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ModelPreset;

    fn raw() -> Vec<RawPoint> {
        vec![
            RawPoint::new("2021-01-04", "4"),
            RawPoint::new("2021-01-03", "3"),
            RawPoint::new("2021-01-02", "2"),
            RawPoint::new("2021-01-01", "1"),
        ]
    }

    #[test]
    fn rejects_zero_horizon() {
        let config = PipelineConfig {
            horizon: 0,
            ..PipelineConfig::default()
        };
        assert!(matches!(build_dataset(&raw(), &config), Err(PipelineError::InvalidConfig(_))));
    }

    #[test]
    fn rejects_duplicate_model_names() {
        let config = PipelineConfig {
            models: vec![ModelPreset::Nlb.spec(), ModelPreset::Nlb.spec()],
            ..PipelineConfig::default()
        };
        assert!(matches!(build_dataset(&raw(), &config), Err(PipelineError::InvalidConfig(_))));
    }

    #[test]
    fn every_point_carries_every_fitted_model() {
        let ds = build_dataset(&raw(), &PipelineConfig::default()).unwrap();
        for p in ds.points() {
            for name in ds.model_names() {
                assert!(p.regression(name).is_some(), "{name} missing at {}", p.index);
            }
            assert!(p.regression("plc-top").is_none());
        }
        assert_eq!(ds.horizon(), crate::domain::DEFAULT_HORIZON);
    }

    #[test]
    fn malformed_input_produces_no_dataset() {
        let mut input = raw();
        input[2].price = "n/a".to_string();
        assert!(matches!(
            build_dataset(&input, &PipelineConfig::default()),
            Err(PipelineError::Parse { record: 3, .. })
        ));
    }
}
