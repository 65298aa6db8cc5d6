//! Latency measurement and series data models

use crate::types::PatternKind;
use serde::{Deserialize, Serialize};

/// Microseconds per millisecond, used for every unit conversion
pub const MICROS_PER_MILLI: f64 = 1000.0;

/// A single latency value extracted from one log line
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LatencyMeasurement {
    /// Latency in milliseconds
    pub latency_ms: f64,

    /// 1-based line number in the input log
    pub line_number: usize,

    /// Recognizer that produced the value
    pub pattern: PatternKind,
}

impl LatencyMeasurement {
    /// Create a measurement from a raw microsecond count
    pub fn from_micros(micros: u64, line_number: usize, pattern: PatternKind) -> Self {
        Self {
            latency_ms: micros as f64 / MICROS_PER_MILLI,
            line_number,
            pattern,
        }
    }
}

/// Ordered latency values, in file order on construction
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LatencySeries {
    measurements: Vec<LatencyMeasurement>,
}

impl LatencySeries {
    /// Create an empty series
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a measurement, keeping insertion order
    pub fn push(&mut self, measurement: LatencyMeasurement) {
        self.measurements.push(measurement);
    }

    /// Number of measurements
    pub fn len(&self) -> usize {
        self.measurements.len()
    }

    /// Whether no measurement was extracted
    pub fn is_empty(&self) -> bool {
        self.measurements.is_empty()
    }

    /// Measurements in file order
    pub fn measurements(&self) -> &[LatencyMeasurement] {
        &self.measurements
    }

    /// Latency values in file order
    pub fn values(&self) -> Vec<f64> {
        self.measurements.iter().map(|m| m.latency_ms).collect()
    }

    /// Latency values sorted ascending; the series itself keeps file order
    pub fn sorted_values(&self) -> Vec<f64> {
        let mut values = self.values();
        values.sort_by(f64::total_cmp);
        values
    }

    /// Number of measurements produced by a given recognizer
    pub fn count_for(&self, pattern: PatternKind) -> usize {
        self.measurements.iter().filter(|m| m.pattern == pattern).count()
    }
}

impl FromIterator<LatencyMeasurement> for LatencySeries {
    fn from_iter<I: IntoIterator<Item = LatencyMeasurement>>(iter: I) -> Self {
        Self {
            measurements: iter.into_iter().collect(),
        }
    }
}

/// One step of the empirical CDF
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CdfPoint {
    /// Latency in milliseconds
    pub latency_ms: f64,

    /// Fraction of samples less than or equal to `latency_ms` at this rank
    pub fraction: f64,
}

/// Outcome of scanning one log file
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ExtractionReport {
    /// Extracted values in file order
    pub series: LatencySeries,

    /// Number of lines read from the input
    pub lines_read: usize,
}

impl ExtractionReport {
    /// Lines that produced no measurement
    pub fn skipped_lines(&self) -> usize {
        self.lines_read - self.series.len()
    }

    /// Percentage of lines that produced a measurement
    pub fn match_rate(&self) -> f64 {
        if self.lines_read == 0 {
            0.0
        } else {
            (self.series.len() as f64 / self.lines_read as f64) * 100.0
        }
    }
}
