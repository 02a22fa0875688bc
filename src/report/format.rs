//! Formatted terminal output.
//!
//! We keep formatting code in one place so:
//! - the pipeline code stays clean and testable
//! - output changes are localized

use chrono::NaiveDate;

use super::Residual;
use crate::dataset::{ChartDataset, MagnitudeCrossing, YearValue};

/// Placeholder shown wherever a model has no value.
const NOT_AVAILABLE: &str = "n/a";
const NO_PROJECTION: &str = "  (no projection available)\n";

/// Format the dataset overview (series stats + fitted/skipped models).
pub fn format_dataset_summary(ds: &ChartDataset) -> String {
    let mut out = String::new();

    out.push_str("=== nlb - price projection curves ===\n");
    if let (Some(first), Some(last)) = (ds.points().first(), ds.last_observed()) {
        out.push_str(&format!(
            "Observed: n={} | {} .. {} | last={} | forward-min={}\n",
            ds.points().len(),
            first.date,
            last.date,
            format_money(last.price),
            format_money(first.forward_minimum_price),
        ));
    }
    if let (Some(first), Some(end)) = (ds.first_date(), ds.projected().last()) {
        out.push_str(&format!("Projection: {} days | {} .. {}\n", ds.horizon(), first, end.date));
    }

    out.push_str("\nModels:\n");
    for m in ds.fitted_models() {
        out.push_str(&format!(
            "  {:<10} n={:<6} a={:<14.8} b={:<14.8} sd={}\n",
            m.spec.name,
            m.n,
            m.model.intercept(),
            m.model.slope(),
            m.dispersion
                .map(|sd| format!("{sd:.6}"))
                .unwrap_or_else(|| NOT_AVAILABLE.to_string()),
        ));
    }
    for s in ds.skipped() {
        out.push_str(&format!("  (skipped {}) {}\n", s.name, s.reason));
    }

    out
}

/// Format each model's expected value and dispersion band on `date`.
pub fn format_bands(ds: &ChartDataset, date: NaiveDate) -> String {
    let mut out = String::new();
    out.push_str(&format!("Bands on {date}:\n"));
    out.push_str(&format!(
        "  {:<10} {:>16} {:>16} {:>16}\n",
        "model", "lower", "expected", "upper"
    ));

    for m in ds.fitted_models() {
        let name = m.spec.name.as_str();
        let row = match (ds.band(name, date), ds.price_value(name, date)) {
            (Some(b), _) => format!(
                "  {:<10} {:>16} {:>16} {:>16}\n",
                name,
                format_money(b.lower),
                format_money(b.expected),
                format_money(b.upper)
            ),
            (None, Some(v)) => format!(
                "  {:<10} {:>16} {:>16} {:>16}\n",
                name,
                NOT_AVAILABLE,
                format_money(v),
                NOT_AVAILABLE
            ),
            (None, None) => format!("  {name:<10} (outside projection horizon)\n"),
        };
        out.push_str(&row);
    }
    for s in ds.skipped() {
        out.push_str(&format!("  {:<10} (no projection available)\n", s.name));
    }
    out
}

/// Format the New Year's outlook for one model.
///
/// `rows` is `None` when the model is absent from the dataset.
pub fn format_outlook(rows: Option<&[YearValue]>, model: &str) -> String {
    let mut out = format!("Outlook ({model}):\n");
    let Some(rows) = rows else {
        out.push_str(NO_PROJECTION);
        return out;
    };
    if rows.is_empty() {
        out.push_str("  (every requested year is beyond the horizon)\n");
        return out;
    }
    for r in rows {
        out.push_str(&format!("  {} {:>16}\n", r.year, format_money(r.value)));
    }
    out
}

/// Format the first projected date each magnitude is exceeded.
pub fn format_magnitudes(rows: Option<&[MagnitudeCrossing]>, model: &str) -> String {
    let mut out = format!("Magnitudes ({model}):\n");
    let Some(rows) = rows else {
        out.push_str(NO_PROJECTION);
        return out;
    };
    for r in rows {
        let when = r
            .date
            .map(|d| d.format("%b %-d, %Y").to_string())
            .unwrap_or_else(|| "beyond horizon".to_string());
        out.push_str(&format!("  {:>16} {when}\n", format_money(r.threshold)));
    }
    out
}

/// Format the latest and the largest residual of one model, in model coordinates.
pub fn format_residuals(rows: Option<&[Residual]>, model: &str) -> String {
    let mut out = format!("Residuals ({model}):\n");
    let Some(rows) = rows else {
        out.push_str(NO_PROJECTION);
        return out;
    };
    let largest = rows
        .iter()
        .max_by(|a, b| a.residual.abs().total_cmp(&b.residual.abs()));
    if let (Some(last), Some(largest)) = (rows.last(), largest) {
        out.push_str(&format!(
            "  latest   i={:<6} actual={:<14.6} fitted={:<14.6} residual={:+.6}\n",
            last.index, last.actual, last.fitted, last.residual
        ));
        out.push_str(&format!(
            "  largest  i={:<6} actual={:<14.6} fitted={:<14.6} residual={:+.6}\n",
            largest.index, largest.actual, largest.fitted, largest.residual
        ));
    }
    out
}

/// Format a price as dollars with `,` grouping.
///
/// Values of 1,000 and above are rounded to whole dollars; smaller values keep cents.
pub fn format_money(v: f64) -> String {
    if !v.is_finite() {
        return NOT_AVAILABLE.to_string();
    }
    let sign = if v < 0.0 { "-" } else { "" };
    let abs = v.abs();
    if abs >= 1000.0 {
        format!("{sign}${}", group_thousands(&format!("{:.0}", abs.round())))
    } else {
        format!("{sign}${abs:.2}")
    }
}

fn group_thousands(digits: &str) -> String {
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}
