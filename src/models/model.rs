//! Fitted regression lines and the built-in model presets.
//!
//! The pipeline relies on one primitive operation: `predict(x)` on an immutable
//! `y = a + b·x` line. Presets describe which `(x, y, filter)` transform each
//! named model is fitted over.

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

use crate::domain::{ModelSpec, PointFilter, XAxis, YAxis};

/// An immutable fitted line `y = intercept + slope·x`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RegressionModel {
    intercept: f64,
    slope: f64,
}

impl RegressionModel {
    pub fn new(intercept: f64, slope: f64) -> Self {
        Self { intercept, slope }
    }

    pub fn intercept(&self) -> f64 {
        self.intercept
    }

    pub fn slope(&self) -> f64 {
        self.slope
    }

    /// Evaluate the line at `x`.
    ///
    /// `x` may lie outside the fitted domain; judging whether such an
    /// extrapolation is meaningful is left to the caller.
    pub fn predict(&self, x: f64) -> f64 {
        self.intercept + self.slope * x
    }
}

/// Built-in models selectable from the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum ModelPreset {
    /// Linear trend: day index -> price.
    Price,
    /// Normalized lower bound: sqrt(days) -> log10(forward minimum price).
    Nlb,
    /// Price log curve: sqrt(days) -> log10(price).
    Plc,
    /// Upper envelope: sqrt(days) -> log10(price), local highs only.
    PlcTop,
}

impl ModelPreset {
    pub const ALL: [ModelPreset; 4] = [
        ModelPreset::Price,
        ModelPreset::Nlb,
        ModelPreset::Plc,
        ModelPreset::PlcTop,
    ];

    /// Name under which the model's values are stored.
    pub fn name(self) -> &'static str {
        match self {
            ModelPreset::Price => "price",
            ModelPreset::Nlb => "nlb",
            ModelPreset::Plc => "plc",
            ModelPreset::PlcTop => "plc-top",
        }
    }

    pub fn spec(self) -> ModelSpec {
        let (x, y, filter) = match self {
            ModelPreset::Price => (XAxis::Index, YAxis::Price, PointFilter::All),
            ModelPreset::Nlb => (
                XAxis::SqrtDaysPassed,
                YAxis::Log10ForwardMinimumPrice,
                PointFilter::All,
            ),
            ModelPreset::Plc => (XAxis::SqrtDaysPassed, YAxis::Log10Price, PointFilter::All),
            ModelPreset::PlcTop => (
                XAxis::SqrtDaysPassed,
                YAxis::Log10Price,
                PointFilter::LocalHighOnly,
            ),
        };
        ModelSpec::new(self.name(), x, y, filter)
    }
}

/// The four built-in models, in display order.
pub fn default_specs() -> Vec<ModelSpec> {
    ModelPreset::ALL.iter().map(|p| p.spec()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn predict_extrapolates_freely() {
        let m = RegressionModel::new(-1.0, 0.5);
        assert_eq!(m.predict(0.0), -1.0);
        assert_eq!(m.predict(1e6), -1.0 + 0.5e6);
    }

    #[test]
    fn default_specs_have_unique_names() {
        let specs = default_specs();
        assert_eq!(specs.len(), 4);
        let mut names: Vec<&str> = specs.iter().map(|s| s.name.as_str()).collect();
        names.dedup();
        assert_eq!(names, vec!["price", "nlb", "plc", "plc-top"]);
        assert_eq!(specs[3].filter, PointFilter::LocalHighOnly);
    }
}
