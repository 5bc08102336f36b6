//! Descriptive statistics over the radial metrics of a run.

use std::fmt::{self, Display, Formatter};

use itertools::Itertools;
use serde::Serialize;
use thiserror::Error;

use crate::analysis::{PointMetrics, METRIC_NAMES};
use crate::geom::NucleusEllipse;

pub const DEFAULT_BINS: usize = 15;

#[derive(Debug, Error, PartialEq)]
pub enum SummaryError {
    #[error("Histogram needs at least one bin")]
    NoBins,

    #[error("Cannot bin non-finite value {0}")]
    NonFiniteValue(f64),
}

/// Count, moments and quartiles of one sample. Quartiles interpolate linearly between order
/// statistics; `std` uses the n-1 denominator.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Describe {
    pub count: usize,
    pub mean: Option<f64>,
    pub std: Option<f64>,
    pub min: Option<f64>,
    pub q25: Option<f64>,
    pub median: Option<f64>,
    pub q75: Option<f64>,
    pub max: Option<f64>,
}

impl Describe {
    pub fn new(values: &[f64]) -> Self {
        let count = values.len();
        if count == 0 {
            return Self {
                count,
                mean: None,
                std: None,
                min: None,
                q25: None,
                median: None,
                q75: None,
                max: None,
            };
        }

        let n = count as f64;
        let mean = values.iter().sum::<f64>() / n;
        let std = (count > 1).then(|| {
            let ss: f64 = values.iter().map(|v| (v - mean).powi(2)).sum();
            (ss / (n - 1.0)).sqrt()
        });

        let sorted = values.iter().copied().sorted_by(f64::total_cmp).collect_vec();

        Self {
            count,
            mean: Some(mean),
            std,
            min: sorted.first().copied(),
            q25: Some(quantile(&sorted, 0.25)),
            median: Some(quantile(&sorted, 0.5)),
            q75: Some(quantile(&sorted, 0.75)),
            max: sorted.last().copied(),
        }
    }
}

fn quantile(sorted: &[f64], q: f64) -> f64 {
    let pos = q * (sorted.len() - 1) as f64;
    let lo = pos.floor() as usize;
    let hi = pos.ceil() as usize;
    sorted[lo] + (sorted[hi] - sorted[lo]) * (pos - lo as f64)
}

/// Equal-width histogram; `edges` has one more entry than `counts`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Histogram {
    pub edges: Vec<f64>,
    pub counts: Vec<usize>,
}

impl Histogram {
    /// Bins span `[min, max]` of the values with the last bin closed on the right. A constant
    /// sample is widened to `[v - 0.5, v + 0.5]`, an empty one spans `[0, 1]`.
    pub fn new(values: &[f64], bins: usize) -> Result<Self, SummaryError> {
        if bins == 0 {
            return Err(SummaryError::NoBins);
        }
        if let Some(&bad) = values.iter().find(|v| !v.is_finite()) {
            return Err(SummaryError::NonFiniteValue(bad));
        }

        let (lo, hi) = match values.iter().copied().minmax_by(f64::total_cmp).into_option() {
            None => (0.0, 1.0),
            Some((lo, hi)) if lo == hi => (lo - 0.5, hi + 0.5),
            Some(range) => range,
        };

        let width = (hi - lo) / bins as f64;
        let edges = (0..=bins).map(|i| lo + width * i as f64).collect_vec();

        let mut counts = vec![0; bins];
        for v in values {
            let idx = (((v - lo) / width) as usize).min(bins - 1);
            counts[idx] += 1;
        }

        Ok(Self { edges, counts })
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct MetricSummary {
    pub name: &'static str,
    pub describe: Describe,
    pub histogram: Histogram,
}

/// Everything reported about a run besides the per-point table.
#[derive(Debug, Clone, Serialize)]
pub struct MetricsSummary {
    pub points: usize,
    pub inside: usize,
    pub ellipse_area: f64,
    pub metrics: Vec<MetricSummary>,
}

impl MetricsSummary {
    pub fn new(
        ellipse: &NucleusEllipse<f64>,
        metrics: &[PointMetrics<f64>],
        bins: usize,
    ) -> Result<Self, SummaryError> {
        let columns: Vec<[f64; 4]> = metrics.iter().map(|&m| m.into()).collect();

        let metrics_summary = METRIC_NAMES
            .iter()
            .enumerate()
            .map(|(i, &name)| -> Result<MetricSummary, SummaryError> {
                let values = columns.iter().map(|row| row[i]).collect_vec();
                Ok(MetricSummary {
                    name,
                    describe: Describe::new(&values),
                    histogram: Histogram::new(&values, bins)?,
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            points: metrics.len(),
            inside: metrics.iter().filter(|m| m.is_inside()).count(),
            ellipse_area: ellipse.area(),
            metrics: metrics_summary,
        })
    }

    pub fn get(&self, name: &str) -> Option<&MetricSummary> {
        self.metrics.iter().find(|m| m.name == name)
    }
}

impl Display for MetricsSummary {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "{} points, {} inside nucleus (area {:.3})",
            self.points, self.inside, self.ellipse_area
        )?;

        write!(f, "{:>7}", "")?;
        for m in &self.metrics {
            write!(f, " {:>24}", m.name)?;
        }
        writeln!(f)?;

        let rows: [(&str, fn(&Describe) -> Option<f64>); 8] = [
            ("count", |d| Some(d.count as f64)),
            ("mean", |d| d.mean),
            ("std", |d| d.std),
            ("min", |d| d.min),
            ("25%", |d| d.q25),
            ("50%", |d| d.median),
            ("75%", |d| d.q75),
            ("max", |d| d.max),
        ];
        for (label, field) in rows {
            write!(f, "{label:>7}")?;
            for m in &self.metrics {
                match field(&m.describe) {
                    Some(v) => write!(f, " {v:>24.6}")?,
                    None => write!(f, " {:>24}", "NaN")?,
                }
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::compute_metrics;
    use anyhow::Result;
    use approx::assert_relative_eq;
    use nalgebra as na;

    #[test]
    fn test_describe_empty() {
        let d = Describe::new(&[]);
        assert_eq!(d.count, 0);
        assert_eq!(d.mean, None);
        assert_eq!(d.max, None);
    }

    #[test]
    fn test_describe_single_value_has_no_std() {
        let d = Describe::new(&[3.5]);
        assert_eq!(d.count, 1);
        assert_eq!(d.mean, Some(3.5));
        assert_eq!(d.std, None);
        assert_eq!(d.q25, Some(3.5));
        assert_eq!(d.q75, Some(3.5));
    }

    #[test]
    fn test_describe_quartiles_interpolate() {
        let d = Describe::new(&[4.0, 1.0, 3.0, 2.0]);
        assert_eq!(d.min, Some(1.0));
        assert_eq!(d.max, Some(4.0));
        assert_relative_eq!(d.mean.unwrap(), 2.5);
        assert_relative_eq!(d.q25.unwrap(), 1.75);
        assert_relative_eq!(d.median.unwrap(), 2.5);
        assert_relative_eq!(d.q75.unwrap(), 3.25);
        // sample std of 1..4
        assert_relative_eq!(d.std.unwrap(), (5.0f64 / 3.0).sqrt());
    }

    #[test]
    fn test_histogram_counts() -> Result<()> {
        let h = Histogram::new(&[0.0, 0.1, 0.5, 0.9, 1.0], 2)?;
        assert_eq!(h.edges, vec![0.0, 0.5, 1.0]);
        // max lands in the last bin
        assert_eq!(h.counts, vec![2, 3]);
        Ok(())
    }

    #[test]
    fn test_histogram_constant_sample() -> Result<()> {
        let h = Histogram::new(&[2.0, 2.0, 2.0], 4)?;
        assert_eq!(h.edges.first(), Some(&1.5));
        assert_eq!(h.edges.last(), Some(&2.5));
        assert_eq!(h.counts.iter().sum::<usize>(), 3);
        Ok(())
    }

    #[test]
    fn test_histogram_empty_and_errors() -> Result<()> {
        let h = Histogram::new(&[], 3)?;
        assert_eq!(h.counts, vec![0, 0, 0]);
        assert_eq!(h.edges.len(), 4);

        assert_eq!(Histogram::new(&[1.0], 0), Err(SummaryError::NoBins));
        assert!(matches!(
            Histogram::new(&[1.0, f64::NAN], 3),
            Err(SummaryError::NonFiniteValue(_))
        ));
        Ok(())
    }

    #[test]
    fn test_metrics_summary() -> Result<()> {
        let ellipse = NucleusEllipse::new(na::Point2::new(0.0, 0.0), 10.0, 5.0, 0.0)?;
        let points = [
            na::Point2::new(5.0, 0.0),
            na::Point2::new(0.0, 2.5),
            na::Point2::new(20.0, 0.0),
        ];
        let metrics = compute_metrics(&ellipse, &points);
        let summary = MetricsSummary::new(&ellipse, &metrics, DEFAULT_BINS)?;

        assert_eq!(summary.points, 3);
        assert_eq!(summary.inside, 2);
        assert_eq!(summary.metrics.len(), 4);

        let ratio = summary.get("Distance_Ratio").unwrap();
        assert_eq!(ratio.histogram.counts.len(), DEFAULT_BINS);
        assert_relative_eq!(ratio.describe.min.unwrap(), 0.5, epsilon = 1e-12);
        assert_relative_eq!(ratio.describe.max.unwrap(), 2.0, epsilon = 1e-12);

        let text = summary.to_string();
        assert!(text.contains("Distance_to_Periphery"));
        assert!(text.contains("75%"));
        Ok(())
    }
}
