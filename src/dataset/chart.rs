//! The `ChartDataset` aggregate.

use chrono::NaiveDate;
use serde::Serialize;

use crate::domain::{Point, ProjectedPoint, ValueScale};
use crate::fit::{FitSet, FittedModel, SkippedModel};
use crate::models::RegressionModel;

/// Everything presentation code needs to draw projection charts.
///
/// Built once per raw series and never mutated afterwards: all accessors take
/// `&self` and hand out shared references, so one dataset can back any number of
/// concurrent readers.
#[derive(Debug, Clone, Serialize)]
pub struct ChartDataset {
    points: Vec<Point>,
    projected: Vec<ProjectedPoint>,
    models: Vec<FittedModel>,
    skipped: Vec<SkippedModel>,
}

impl ChartDataset {
    pub(crate) fn new(points: Vec<Point>, projected: Vec<ProjectedPoint>, fits: FitSet) -> Self {
        Self {
            points,
            projected,
            models: fits.fitted,
            skipped: fits.skipped,
        }
    }

    /// Observed, expanded series (oldest first), with regression values attached.
    pub fn points(&self) -> &[Point] {
        &self.points
    }

    /// Projected series, one entry per day offset in `[0, horizon)`.
    pub fn projected(&self) -> &[ProjectedPoint] {
        &self.projected
    }

    pub fn horizon(&self) -> usize {
        self.projected.len()
    }

    /// Date of the first observation (projected offset 0).
    pub fn first_date(&self) -> Option<NaiveDate> {
        self.points.first().map(|p| p.date)
    }

    pub fn last_observed(&self) -> Option<&Point> {
        self.points.last()
    }

    /// Successfully fitted models, in configuration order.
    pub fn fitted_models(&self) -> &[FittedModel] {
        &self.models
    }

    /// Models that could not be fitted, with the reason.
    pub fn skipped(&self) -> &[SkippedModel] {
        &self.skipped
    }

    pub fn model_names(&self) -> impl Iterator<Item = &str> {
        self.models.iter().map(|m| m.spec.name.as_str())
    }

    pub fn fitted(&self, name: &str) -> Option<&FittedModel> {
        self.models.iter().find(|m| m.spec.name == name)
    }

    /// The fitted line for `name`, or `None` if that model is absent.
    pub fn model(&self, name: &str) -> Option<&RegressionModel> {
        self.fitted(name).map(|m| &m.model)
    }

    /// RMS residual of `name`, or `None` if the model or its dispersion is absent.
    pub fn dispersion(&self, name: &str) -> Option<f64> {
        self.fitted(name).and_then(|m| m.dispersion)
    }

    pub fn value_scale(&self, name: &str) -> Option<ValueScale> {
        self.fitted(name).map(|m| m.spec.y.value_scale())
    }
}
