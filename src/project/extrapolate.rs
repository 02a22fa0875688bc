//! Extrapolated series generation.
//!
//! For each synthetic day offset `i` in `0..horizon`:
//!
//! - `date = first_observed_date + i days` (calendar arithmetic)
//! - `sqrt_days_passed = sqrt(i)`
//! - `price` / `forward_minimum_price` are copied from observed point `i` when `i < n`
//! - each fitted model is evaluated at its own x coordinate for offset `i`
//!
//! Observed values are aligned by position, not by date. For a series with one
//! point per calendar day the two coincide.

use chrono::Days;
use tracing::{debug, warn};

use crate::domain::{Point, ProjectedPoint};
use crate::error::PipelineError;
use crate::fit::FittedModel;

/// Generate exactly `horizon` projected points.
pub fn extrapolate(
    points: &[Point],
    models: &[FittedModel],
    horizon: usize,
) -> Result<Vec<ProjectedPoint>, PipelineError> {
    let first = points.first().ok_or(PipelineError::EmptySeries)?;

    if horizon < points.len() {
        warn!(
            horizon,
            observed = points.len(),
            "horizon is shorter than the observed series; later observations are not projected"
        );
    }
    let gaps = count_calendar_gaps(points);
    if gaps > 0 {
        debug!(gaps, "observed series skips calendar days; observed values align by position");
    }

    (0..horizon)
        .map(|i| {
            let date = first
                .date
                .checked_add_days(Days::new(i as u64))
                .ok_or_else(|| PipelineError::domain(i, "projected date is out of range"))?;
            let observed = points.get(i);

            let regressions = models
                .iter()
                .map(|f| (f.spec.name.clone(), f.model.predict(f.spec.x.at(i))))
                .collect();

            Ok(ProjectedPoint {
                index: i,
                date,
                sqrt_days_passed: (i as f64).sqrt(),
                price: observed.map(|p| p.price),
                forward_minimum_price: observed.map(|p| p.forward_minimum_price),
                regressions,
            })
        })
        .collect()
}

fn count_calendar_gaps(points: &[Point]) -> usize {
    points
        .windows(2)
        .filter(|w| (w[1].date - w[0].date).num_days() != 1)
        .count()
}
