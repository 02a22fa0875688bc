//! Series expansion.
//!
//! Given an oldest-first list of `PricePoint`s, compute for each position `i`:
//!
//! ```text
//! index                        = i
//! sqrt_days_passed             = sqrt(i)
//! forward_minimum_price        = min(price[j] for j in i..n)
//! log10_price                  = log10(price)
//! log10_forward_minimum_price  = log10(forward_minimum_price)
//! ```
//!
//! The forward minimum is a suffix minimum, computed with a single right-to-left
//! running-minimum scan: `fmin[n-1] = price[n-1]`, `fmin[i] = min(price[i], fmin[i+1])`.

use std::collections::BTreeMap;

use crate::domain::{Point, PricePoint};
use crate::error::PipelineError;
use crate::fit::FittedModel;

/// Expand parsed points into fully derived `Point`s.
///
/// Fails with a domain error if any price (and hence any forward minimum) is not
/// strictly positive, since its logarithm would be undefined.
pub fn expand(points: &[PricePoint]) -> Result<Vec<Point>, PipelineError> {
    if let Some((index, p)) = points.iter().enumerate().find(|(_, p)| !(p.price > 0.0)) {
        return Err(PipelineError::domain(
            index,
            format!("price {} on {} must be > 0 to take its logarithm", p.price, p.date),
        ));
    }

    let forward_minimum = suffix_minimum(points.iter().map(|p| p.price));

    Ok(points
        .iter()
        .zip(forward_minimum)
        .enumerate()
        .map(|(index, (p, fmin))| Point {
            date: p.date,
            price: p.price,
            local_high: p.local_high,
            index,
            sqrt_days_passed: (index as f64).sqrt(),
            forward_minimum_price: fmin,
            log10_price: p.price.log10(),
            log10_forward_minimum_price: fmin.log10(),
            regressions: BTreeMap::new(),
        })
        .collect())
}

fn suffix_minimum(values: impl DoubleEndedIterator<Item = f64> + ExactSizeIterator) -> Vec<f64> {
    let mut out = vec![0.0; values.len()];
    let mut running = f64::INFINITY;
    for (slot, v) in out.iter_mut().rev().zip(values.rev()) {
        running = running.min(v);
        *slot = running;
    }
    out
}

/// Attach each model's prediction to every point.
///
/// Consumes the expanded series so that the result is the only copy; after this
/// step the points are never modified again.
pub fn annotate(mut points: Vec<Point>, models: &[FittedModel]) -> Vec<Point> {
    for point in &mut points {
        for fitted in models {
            let x = fitted.spec.x.of(point);
            point
                .regressions
                .insert(fitted.spec.name.clone(), fitted.model.predict(x));
        }
    }
    points
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Days, NaiveDate};

    fn series(prices: &[f64]) -> Vec<PricePoint> {
        let start = NaiveDate::from_ymd_opt(2020, 1, 1).unwrap();
        prices
            .iter()
            .enumerate()
            .map(|(i, &price)| PricePoint {
                date: start.checked_add_days(Days::new(i as u64)).unwrap(),
                price,
                local_high: false,
            })
            .collect()
    }

    fn naive_forward_minimum(prices: &[f64]) -> Vec<f64> {
        (0..prices.len())
            .map(|i| prices[i..].iter().copied().fold(f64::INFINITY, f64::min))
            .collect()
    }

    #[test]
    fn forward_minimum_follows_recurrence() {
        let prices = [5.0, 3.0, 4.0, 1.0, 2.0, 6.0, 2.5];
        let points = expand(&series(&prices)).unwrap();
        let n = points.len();

        assert_eq!(points[n - 1].forward_minimum_price, prices[n - 1]);
        for i in 0..n - 1 {
            let expected = points[i].price.min(points[i + 1].forward_minimum_price);
            assert_eq!(points[i].forward_minimum_price, expected);
            assert!(points[i].forward_minimum_price <= points[i].price);
        }
    }

    #[test]
    fn running_scan_matches_naive_scan() {
        let prices = [9.5, 12.0, 7.25, 7.25, 30.0, 8.0, 100.0, 99.0, 101.0];
        let points = expand(&series(&prices)).unwrap();
        let naive = naive_forward_minimum(&prices);
        let fast: Vec<f64> = points.iter().map(|p| p.forward_minimum_price).collect();
        assert_eq!(fast, naive);
    }

    #[test]
    fn derived_fields() {
        let points = expand(&series(&[1.0, 2.0, 3.0, 1000.0])).unwrap();
        let idx: Vec<usize> = points.iter().map(|p| p.index).collect();
        assert_eq!(idx, vec![0, 1, 2, 3]);
        assert_eq!(points[0].sqrt_days_passed, 0.0);
        assert_eq!(points[1].sqrt_days_passed, 1.0);
        assert!((points[2].sqrt_days_passed - 2f64.sqrt()).abs() < 1e-15);
        assert!((points[3].log10_price - 3.0).abs() < 1e-12);

        for p in &points {
            assert_eq!(p.log10_forward_minimum_price, p.forward_minimum_price.log10());
            let back = 10f64.powf(p.log10_forward_minimum_price);
            assert!((back - p.forward_minimum_price).abs() < 1e-9 * p.forward_minimum_price);
            assert!(p.regressions.is_empty());
        }
    }

    #[test]
    fn non_positive_price_is_a_domain_error() {
        let err = expand(&series(&[1.0, 0.0, 2.0])).unwrap_err();
        assert!(matches!(err, PipelineError::Domain { index: 1, .. }));

        let err = expand(&series(&[1.0, -3.0])).unwrap_err();
        assert!(matches!(err, PipelineError::Domain { index: 1, .. }));
    }
}
