//! Fitting a declarative list of models over the expanded series.
//!
//! For each `ModelSpec` we:
//! - select the points its filter accepts
//! - project them to `(x, y)` with the model's axes
//! - solve the closed-form OLS line
//! - compute the RMS residual over the same pairs
//!
//! Each model is independent. A degenerate fit (e.g. no local highs flagged)
//! removes only that model; the others are still returned.

use serde::Serialize;
use tracing::{info, warn};

use crate::domain::{ModelSpec, Point};
use crate::error::PipelineError;
use crate::math::{fit_line, rms_residual};
use crate::models::RegressionModel;

/// A successfully fitted model.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FittedModel {
    pub spec: ModelSpec,
    pub model: RegressionModel,
    /// RMS residual over the fitted pairs; `None` if it could not be computed.
    pub dispersion: Option<f64>,
    /// Number of points the model was fitted against.
    pub n: usize,
}

/// A model that could not be fitted, and why.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SkippedModel {
    pub name: String,
    pub reason: String,
}

/// Output of fitting every configured model.
#[derive(Debug, Clone, Default)]
pub struct FitSet {
    pub fitted: Vec<FittedModel>,
    pub skipped: Vec<SkippedModel>,
}

/// Fit one model spec.
pub fn fit_spec(spec: &ModelSpec, points: &[Point]) -> Result<FittedModel, PipelineError> {
    let (xs, ys): (Vec<f64>, Vec<f64>) = points
        .iter()
        .filter(|p| spec.filter.accepts(p))
        .map(|p| (spec.x.of(p), spec.y.of(p)))
        .unzip();

    let model = fit_line(&xs, &ys).map_err(|e| match e {
        PipelineError::DegenerateFit(msg) => {
            PipelineError::degenerate(format!("model '{}': {msg}", spec.name))
        }
        other => other,
    })?;

    let predicted: Vec<f64> = xs.iter().map(|&x| model.predict(x)).collect();
    let dispersion = match rms_residual(&ys, &predicted) {
        Ok(sd) => Some(sd),
        Err(e) => {
            warn!(model = %spec.name, error = %e, "dispersion unavailable");
            None
        }
    };

    Ok(FittedModel {
        spec: spec.clone(),
        model,
        dispersion,
        n: xs.len(),
    })
}

/// Fit every model spec, isolating per-model failures.
///
/// Domain/parse failures cannot occur here (the series is already validated), so
/// every error is recorded as a skipped model rather than propagated.
pub fn fit_models(specs: &[ModelSpec], points: &[Point]) -> FitSet {
    let mut out = FitSet::default();
    for spec in specs {
        match fit_spec(spec, points) {
            Ok(fitted) => {
                info!(
                    model = %spec.name,
                    n = fitted.n,
                    intercept = fitted.model.intercept(),
                    slope = fitted.model.slope(),
                    dispersion = ?fitted.dispersion,
                    "fitted model"
                );
                out.fitted.push(fitted);
            }
            Err(e) => {
                warn!(model = %spec.name, error = %e, "model skipped");
                out.skipped.push(SkippedModel {
                    name: spec.name.clone(),
                    reason: e.to_string(),
                });
            }
        }
    }
    out
}
