//! CDF computation and summary statistics for latency series

use crate::{
    error::{AppError, Result},
    models::{CdfPoint, LatencySeries},
};
use serde::{Deserialize, Serialize};

/// Percentiles reported in the latency summary
pub const SUMMARY_PERCENTILES: [f64; 4] = [50.0, 90.0, 95.0, 99.0];

/// Compute the empirical CDF of a series
///
/// Values are sorted ascending and the point at rank `i` (1-based) gets
/// fraction `i / N`. An empty series has no CDF.
pub fn compute_cdf(series: &LatencySeries) -> Result<Vec<CdfPoint>> {
    cdf_from_values(&series.sorted_values())
}

/// Compute the CDF of values that are already sorted ascending
pub fn cdf_from_values(sorted: &[f64]) -> Result<Vec<CdfPoint>> {
    if sorted.is_empty() {
        return Err(AppError::empty_result(
            "cannot compute a CDF over zero latency measurements",
        ));
    }

    let n = sorted.len() as f64;
    Ok(sorted
        .iter()
        .enumerate()
        .map(|(i, &latency_ms)| CdfPoint {
            latency_ms,
            fraction: (i + 1) as f64 / n,
        })
        .collect())
}

/// Expand CDF points into a post-step path
///
/// Each fraction holds from its own x value until the next x value, where
/// the path rises vertically.
pub fn step_points(cdf: &[CdfPoint]) -> Vec<(f64, f64)> {
    let mut points = Vec::with_capacity(cdf.len() * 2);

    for (i, point) in cdf.iter().enumerate() {
        if i > 0 {
            points.push((point.latency_ms, cdf[i - 1].fraction));
        }
        points.push((point.latency_ms, point.fraction));
    }

    points
}

/// Percentile with linear interpolation between closest ranks
pub fn percentile(sorted: &[f64], percentile: f64) -> Option<f64> {
    if sorted.is_empty() {
        return None;
    }

    let index = (percentile.clamp(0.0, 100.0) / 100.0) * (sorted.len() as f64 - 1.0);
    let lower_index = index.floor() as usize;
    let upper_index = index.ceil() as usize;

    if lower_index == upper_index {
        Some(sorted[lower_index])
    } else {
        let lower_value = sorted[lower_index];
        let upper_value = sorted[upper_index];
        let weight = index - lower_index as f64;
        Some(lower_value + weight * (upper_value - lower_value))
    }
}

/// A named percentile value
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PercentileValue {
    /// Percentile rank, 0..=100
    pub percentile: f64,
    /// Latency at that rank in milliseconds
    pub latency_ms: f64,
}

impl PercentileValue {
    /// Label such as `p50` or `p99.9`
    pub fn label(&self) -> String {
        if self.percentile.fract() == 0.0 {
            format!("p{:.0}", self.percentile)
        } else {
            format!("p{}", self.percentile)
        }
    }
}

/// Descriptive statistics of one latency series
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LatencySummary {
    /// Number of measurements
    pub count: usize,
    /// Smallest latency in milliseconds
    pub min_ms: f64,
    /// Largest latency in milliseconds
    pub max_ms: f64,
    /// Arithmetic mean in milliseconds
    pub mean_ms: f64,
    /// Population standard deviation in milliseconds
    pub std_dev_ms: f64,
    /// Percentiles from [`SUMMARY_PERCENTILES`]
    pub percentiles: Vec<PercentileValue>,
}

impl LatencySummary {
    /// Summarize a series; an empty series is an error
    pub fn from_series(series: &LatencySeries) -> Result<Self> {
        Self::from_sorted(&series.sorted_values())
    }

    /// Summarize values already sorted ascending
    pub fn from_sorted(sorted: &[f64]) -> Result<Self> {
        if sorted.is_empty() {
            return Err(AppError::empty_result(
                "cannot summarize zero latency measurements",
            ));
        }

        let count = sorted.len();
        let count_f64 = count as f64;
        let mean_ms = sorted.iter().sum::<f64>() / count_f64;
        let variance = sorted
            .iter()
            .map(|&x| {
                let diff = x - mean_ms;
                diff * diff
            })
            .sum::<f64>()
            / count_f64;

        let percentiles = SUMMARY_PERCENTILES
            .iter()
            .filter_map(|&p| {
                percentile(sorted, p).map(|latency_ms| PercentileValue {
                    percentile: p,
                    latency_ms,
                })
            })
            .collect();

        Ok(Self {
            count,
            min_ms: sorted[0],
            max_ms: sorted[count - 1],
            mean_ms,
            std_dev_ms: variance.sqrt(),
            percentiles,
        })
    }

    /// Look up a reported percentile
    pub fn percentile(&self, percentile: f64) -> Option<f64> {
        self.percentiles
            .iter()
            .find(|p| p.percentile == percentile)
            .map(|p| p.latency_ms)
    }
}
