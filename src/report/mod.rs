//! Reporting utilities: residuals and formatted terminal output.

pub mod format;

pub use format::*;

use crate::dataset::ChartDataset;

/// Observed-minus-fitted value at one observation, in the model's own coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Residual {
    pub index: usize,
    pub actual: f64,
    pub fitted: f64,
    pub residual: f64,
}

/// Residuals of model `name` over the points it was fitted against.
///
/// `None` if the model is absent from the dataset.
pub fn compute_residuals(ds: &ChartDataset, name: &str) -> Option<Vec<Residual>> {
    let fitted = ds.fitted(name)?;
    Some(
        ds.points()
            .iter()
            .filter(|p| fitted.spec.filter.accepts(p))
            .filter_map(|p| {
                let fit = p.regression(name)?;
                let actual = fitted.spec.y.of(p);
                Some(Residual {
                    index: p.index,
                    actual,
                    fitted: fit,
                    residual: actual - fit,
                })
            })
            .collect(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::pipeline::build_dataset;
    use crate::domain::{PipelineConfig, RawPoint};
    use crate::math::rms_residual;

    #[test]
    fn residuals_reproduce_dispersion() {
        let raw: Vec<RawPoint> = [5.0, 3.0, 4.0, 8.0, 6.0, 9.0, 7.5]
            .iter()
            .enumerate()
            .map(|(i, p)| RawPoint::new(format!("2022-03-{:02}", i + 1), p.to_string()))
            .collect();
        let config = PipelineConfig {
            horizon: 10,
            ..PipelineConfig::default()
        };
        let ds = build_dataset(&raw, &config).unwrap();

        let res = compute_residuals(&ds, "nlb").unwrap();
        assert_eq!(res.len(), 7);
        let actual: Vec<f64> = res.iter().map(|r| r.actual).collect();
        let fitted: Vec<f64> = res.iter().map(|r| r.fitted).collect();
        let sd = rms_residual(&actual, &fitted).unwrap();
        assert!((sd - ds.dispersion("nlb").unwrap()).abs() < 1e-12);

        assert!(compute_residuals(&ds, "plc-top").is_none());
    }
}
