//! Read-only lookups over a `ChartDataset`.
//!
//! These answer the questions chart and table code asks: the projected value on
//! a given day, the dispersion band around it, the value on upcoming New Year's
//! days, when a model first crosses a price magnitude, and what a view showing
//! the first `N` days contains.

use chrono::NaiveDate;
use serde::Serialize;

use super::ChartDataset;
use crate::domain::ProjectedPoint;

/// Default magnitude thresholds (`10^3` through `10^7`).
pub const DEFAULT_MAGNITUDES: [f64; 5] = [1e3, 1e4, 1e5, 1e6, 1e7];

/// A model value with its symmetric dispersion band, in price space.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Band {
    pub date: NaiveDate,
    pub expected: f64,
    pub lower: f64,
    pub upper: f64,
}

/// Projected price-space value on January 1st of a year.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct YearValue {
    pub year: i32,
    pub date: NaiveDate,
    pub value: f64,
}

/// First projected day on which a model exceeds `threshold`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct MagnitudeCrossing {
    pub threshold: f64,
    pub date: Option<NaiveDate>,
}

/// The first `visible_days + 1` projected days plus their scale-domain inputs.
#[derive(Debug, Clone)]
pub struct ViewWindow<'a> {
    pub points: &'a [ProjectedPoint],
    /// Highest observed price inside the window, if any observation falls in it.
    pub max_observed_price: Option<f64>,
    /// Each model's price-space value on the last day of the window.
    pub end_values: Vec<(&'a str, f64)>,
}

impl ChartDataset {
    /// The projected point whose date equals `date` exactly.
    ///
    /// `None` outside `[first_date, first_date + horizon)`.
    pub fn find_by_date(&self, date: NaiveDate) -> Option<&ProjectedPoint> {
        let first = self.first_date()?;
        let offset = usize::try_from((date - first).num_days()).ok()?;
        self.at_offset(offset).filter(|p| p.date == date)
    }

    /// The projected point at day offset `offset < horizon`.
    pub fn at_offset(&self, offset: usize) -> Option<&ProjectedPoint> {
        self.projected().get(offset)
    }

    /// Model `name` on `date` converted to price space.
    pub fn price_value(&self, name: &str, date: NaiveDate) -> Option<f64> {
        let scale = self.value_scale(name)?;
        let v = self.find_by_date(date)?.regression(name)?;
        Some(scale.to_price(v))
    }

    /// Expected value and `±1` dispersion band of model `name` on `date`.
    ///
    /// For log-scale models the band is applied in log space:
    /// `10^(v - σ) .. 10^(v + σ)`.
    pub fn band(&self, name: &str, date: NaiveDate) -> Option<Band> {
        let scale = self.value_scale(name)?;
        let sd = self.dispersion(name)?;
        let v = self.find_by_date(date)?.regression(name)?;
        Some(Band {
            date,
            expected: scale.to_price(v),
            lower: scale.to_price(v - sd),
            upper: scale.to_price(v + sd),
        })
    }

    /// Model `name` on January 1st of `start_year .. start_year + years`.
    ///
    /// Years whose New Year's day lies outside the horizon are left out. `None` if
    /// the model is absent from the dataset.
    pub fn yearly_outlook(
        &self,
        name: &str,
        start_year: i32,
        years: u32,
    ) -> Option<Vec<YearValue>> {
        self.fitted(name)?;
        Some(
            (0..years)
                .filter_map(|k| {
                    let year = start_year.checked_add(i32::try_from(k).ok()?)?;
                    let date = NaiveDate::from_ymd_opt(year, 1, 1)?;
                    let value = self.price_value(name, date)?;
                    Some(YearValue { year, date, value })
                })
                .collect(),
        )
    }

    /// First projected date on which model `name` exceeds each threshold.
    ///
    /// A crossing with no date lies beyond the horizon. `None` if the model is
    /// absent from the dataset.
    pub fn magnitude_crossings(
        &self,
        name: &str,
        thresholds: &[f64],
    ) -> Option<Vec<MagnitudeCrossing>> {
        let scale = self.value_scale(name)?;
        Some(
            thresholds
                .iter()
                .map(|&threshold| {
                    let date = self
                        .projected()
                        .iter()
                        .find(|p| p.regression(name).is_some_and(|v| scale.to_price(v) > threshold))
                        .map(|p| p.date);
                    MagnitudeCrossing { threshold, date }
                })
                .collect(),
        )
    }

    /// Projected days `0..=visible_days`, clamped to the horizon.
    pub fn window(&self, visible_days: usize) -> Option<ViewWindow<'_>> {
        let last = visible_days.min(self.horizon().checked_sub(1)?);
        let points = &self.projected()[..=last];
        let end = &points[last];

        let max_observed_price = points
            .iter()
            .filter_map(|p| p.price)
            .fold(None, |acc: Option<f64>, v| Some(acc.map_or(v, |a| a.max(v))));

        let end_values = self
            .fitted_models()
            .iter()
            .filter_map(|m| {
                let v = end.regression(&m.spec.name)?;
                Some((m.spec.name.as_str(), m.spec.y.value_scale().to_price(v)))
            })
            .collect();

        Some(ViewWindow {
            points,
            max_observed_price,
            end_values,
        })
    }
}
