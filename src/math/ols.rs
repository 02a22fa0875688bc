//! Closed-form simple linear regression and residual dispersion.
//!
//! For paired samples `(x_i, y_i)` with `n = len`, `Sx = Σx`, `Sy = Σy`,
//! `Sxx = Σx²`, `Sxy = Σxy`:
//!
//! ```text
//! b = (n·Sxy − Sx·Sy) / (n·Sxx − Sx²)
//! a = ȳ − b·x̄
//! ```
//!
//! The denominator is `n²·Var(x)`, so it vanishes when every `x` is identical
//! (including the single-sample case). We treat it as zero when it is below a
//! tiny fraction of `n·Sxx`, which also catches rounding residue for constant
//! irrational inputs such as a column of `sqrt(2)`.

use crate::error::PipelineError;
use crate::models::RegressionModel;

/// Relative threshold for the OLS denominator.
const DENOM_REL_EPS: f64 = 1e-12;

/// Fit `y = a + b·x` by ordinary least squares.
pub fn fit_line(xs: &[f64], ys: &[f64]) -> Result<RegressionModel, PipelineError> {
    if xs.len() != ys.len() {
        return Err(PipelineError::degenerate(format!(
            "mismatched sample lengths (x={}, y={})",
            xs.len(),
            ys.len()
        )));
    }
    if xs.is_empty() {
        return Err(PipelineError::degenerate("no samples to fit"));
    }

    let n = xs.len() as f64;
    let sx: f64 = xs.iter().sum();
    let sy: f64 = ys.iter().sum();
    let sxx: f64 = xs.iter().map(|x| x * x).sum();
    let sxy: f64 = xs.iter().zip(ys).map(|(x, y)| x * y).sum();

    let denom = n * sxx - sx * sx;
    if !(denom.abs() > DENOM_REL_EPS * (n * sxx).abs()) {
        return Err(PipelineError::degenerate(format!(
            "all {} x values are identical (n·Sxx − Sx² = {denom})",
            xs.len()
        )));
    }

    let slope = (n * sxy - sx * sy) / denom;
    let intercept = sy / n - slope * (sx / n);

    if !(slope.is_finite() && intercept.is_finite()) {
        return Err(PipelineError::degenerate("non-finite regression coefficients"));
    }

    Ok(RegressionModel::new(intercept, slope))
}

/// Root-mean-square residual between observed and predicted values.
pub fn rms_residual(actual: &[f64], predicted: &[f64]) -> Result<f64, PipelineError> {
    if actual.len() != predicted.len() {
        return Err(PipelineError::degenerate(format!(
            "mismatched sample lengths (actual={}, predicted={})",
            actual.len(),
            predicted.len()
        )));
    }
    if actual.is_empty() {
        return Err(PipelineError::degenerate("no samples for dispersion"));
    }

    let sse: f64 = actual
        .iter()
        .zip(predicted)
        .map(|(a, p)| (a - p).powi(2))
        .sum();
    Ok((sse / actual.len() as f64).sqrt())
}
