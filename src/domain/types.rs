//! Shared domain types.
//!
//! These types are intentionally kept lightweight and serializable so they can be:
//!
//! - used in-memory by the pipeline
//! - exported to JSON/CSV
//! - handed to presentation code as plain read-only data

use std::collections::BTreeMap;

use chrono::NaiveDate;
use clap::ValueEnum;
use serde::{Deserialize, Deserializer, Serialize};

/// Default number of synthetic days generated by the extrapolator.
pub const DEFAULT_HORIZON: usize = 10_000;

/// A price record as received from a feed.
///
/// `price` is kept as text because feeds commonly quote it with grouping
/// separators (`"12,345.67"`). JSON inputs that carry a bare number are accepted
/// and converted to text so that parsing stays in one place.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct RawPoint {
    pub date: String,
    #[serde(deserialize_with = "text_or_number")]
    pub price: String,
    #[serde(default, alias = "localHigh")]
    pub local_high: Option<bool>,
}

impl RawPoint {
    pub fn new(date: impl Into<String>, price: impl Into<String>) -> Self {
        Self {
            date: date.into(),
            price: price.into(),
            local_high: None,
        }
    }

    pub fn with_local_high(mut self, local_high: bool) -> Self {
        self.local_high = Some(local_high);
        self
    }
}

fn text_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum TextOrNumber {
        Text(String),
        Number(f64),
    }

    Ok(match TextOrNumber::deserialize(deserializer)? {
        TextOrNumber::Text(s) => s,
        TextOrNumber::Number(v) => v.to_string(),
    })
}

/// A parsed record: typed date and price, in chronological position.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PricePoint {
    pub date: NaiveDate,
    pub price: f64,
    pub local_high: bool,
}

/// A fully expanded observation.
///
/// Every field except `regressions` is fixed by the expander; `regressions`
/// holds one predicted value per successfully fitted model, keyed by model name.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Point {
    pub date: NaiveDate,
    pub price: f64,
    pub local_high: bool,
    /// Zero-based position in chronological order (oldest = 0).
    pub index: usize,
    pub sqrt_days_passed: f64,
    /// Minimum price over this point and every later point.
    pub forward_minimum_price: f64,
    pub log10_price: f64,
    pub log10_forward_minimum_price: f64,
    pub regressions: BTreeMap<String, f64>,
}

impl Point {
    /// Fitted value of the named model at this point, if that model exists.
    pub fn regression(&self, name: &str) -> Option<f64> {
        self.regressions.get(name).copied()
    }
}

/// One day of the extrapolated series.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectedPoint {
    pub index: usize,
    pub date: NaiveDate,
    pub sqrt_days_passed: f64,
    /// Observed price when the offset falls inside the observed range.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub price: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub forward_minimum_price: Option<f64>,
    /// Missing key means "no value for that model", never zero.
    pub regressions: BTreeMap<String, f64>,
}

impl ProjectedPoint {
    pub fn regression(&self, name: &str) -> Option<f64> {
        self.regressions.get(name).copied()
    }
}

/// Ordering of the incoming raw records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ValueEnum, Default)]
#[serde(rename_all = "kebab-case")]
pub enum InputOrder {
    /// Compare the first and last dates to decide.
    #[default]
    Auto,
    NewestFirst,
    OldestFirst,
}

/// What to do when two records share a calendar day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ValueEnum, Default)]
#[serde(rename_all = "kebab-case")]
pub enum DuplicatePolicy {
    /// Fail with a parse error naming the duplicate record.
    #[default]
    Reject,
    /// Keep the chronologically first occurrence.
    KeepFirst,
    /// Keep the chronologically last occurrence.
    KeepLast,
}

/// Regression input coordinate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum XAxis {
    Index,
    SqrtDaysPassed,
}

impl XAxis {
    pub fn of(self, point: &Point) -> f64 {
        self.at(point.index)
    }

    /// Coordinate for a day offset (observed or synthetic).
    pub fn at(self, offset: usize) -> f64 {
        match self {
            XAxis::Index => offset as f64,
            XAxis::SqrtDaysPassed => (offset as f64).sqrt(),
        }
    }
}

/// Regression output coordinate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum YAxis {
    Price,
    Log10Price,
    Log10ForwardMinimumPrice,
}

impl YAxis {
    pub fn of(self, point: &Point) -> f64 {
        match self {
            YAxis::Price => point.price,
            YAxis::Log10Price => point.log10_price,
            YAxis::Log10ForwardMinimumPrice => point.log10_forward_minimum_price,
        }
    }

    pub fn value_scale(self) -> ValueScale {
        match self {
            YAxis::Price => ValueScale::Linear,
            YAxis::Log10Price | YAxis::Log10ForwardMinimumPrice => ValueScale::Log10,
        }
    }
}

/// How a model's output relates to a price.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ValueScale {
    Linear,
    Log10,
}

impl ValueScale {
    pub fn to_price(self, value: f64) -> f64 {
        match self {
            ValueScale::Linear => value,
            ValueScale::Log10 => 10f64.powf(value),
        }
    }
}

/// Which observations a model is fitted against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum PointFilter {
    All,
    LocalHighOnly,
}

impl PointFilter {
    pub fn accepts(self, point: &Point) -> bool {
        match self {
            PointFilter::All => true,
            PointFilter::LocalHighOnly => point.local_high,
        }
    }
}

/// Declarative description of one regression over the expanded series.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModelSpec {
    pub name: String,
    pub x: XAxis,
    pub y: YAxis,
    pub filter: PointFilter,
}

impl ModelSpec {
    pub fn new(name: impl Into<String>, x: XAxis, y: YAxis, filter: PointFilter) -> Self {
        Self {
            name: name.into(),
            x,
            y,
            filter,
        }
    }
}

/// A full pipeline configuration.
///
/// This is derived from CLI flags (plus defaults) by the binary; library callers
/// usually start from `PipelineConfig::default()`.
#[derive(Debug, Clone, PartialEq)]
pub struct PipelineConfig {
    /// Number of projected days (`ProjectedPoint`s) to generate.
    pub horizon: usize,
    pub order: InputOrder,
    pub duplicates: DuplicatePolicy,
    pub models: Vec<ModelSpec>,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            horizon: DEFAULT_HORIZON,
            order: InputOrder::Auto,
            duplicates: DuplicatePolicy::Reject,
            models: crate::models::default_specs(),
        }
    }
}
