//! Latency extraction from benchmark log text
//!
//! Every line is offered to an ordered list of recognizers; the first one
//! that yields a value wins. Lines nothing recognizes are skipped silently.
//! Only failing to read the input file is an error.

pub mod recognizers;

pub use recognizers::{LineRecognizer, SemicolonSuffixRecognizer, TookRecognizer};

use crate::{
    error::{ErrorContext, Result},
    models::{ExtractionReport, LatencyMeasurement, LatencySeries},
};
use std::fs;
use std::path::Path;

/// Converts raw log text into a latency series in milliseconds
pub struct LatencyExtractor {
    recognizers: Vec<Box<dyn LineRecognizer>>,
}

impl LatencyExtractor {
    /// Create an extractor with the `took` recognizer first, then the semicolon suffix
    pub fn new() -> Self {
        Self::with_recognizers(vec![
            Box::new(TookRecognizer),
            Box::new(SemicolonSuffixRecognizer),
        ])
    }

    /// Create an extractor with a custom, ordered recognizer list
    pub fn with_recognizers(recognizers: Vec<Box<dyn LineRecognizer>>) -> Self {
        Self { recognizers }
    }

    /// Number of configured recognizers
    pub fn recognizer_count(&self) -> usize {
        self.recognizers.len()
    }

    /// Extract a measurement from one line, first matching recognizer wins
    pub fn extract_line(&self, line: &str, line_number: usize) -> Option<LatencyMeasurement> {
        self.recognizers.iter().find_map(|recognizer| {
            recognizer
                .recognize(line)
                .map(|micros| LatencyMeasurement::from_micros(micros, line_number, recognizer.kind()))
        })
    }

    /// Extract measurements from a sequence of lines, preserving their order
    pub fn extract_lines<'a, I>(&self, lines: I) -> ExtractionReport
    where
        I: IntoIterator<Item = &'a str>,
    {
        let mut series = LatencySeries::new();
        let mut lines_read = 0;

        for (index, line) in lines.into_iter().enumerate() {
            lines_read += 1;
            if let Some(measurement) = self.extract_line(line, index + 1) {
                series.push(measurement);
            }
        }

        ExtractionReport { series, lines_read }
    }

    /// Extract measurements from an in-memory log
    pub fn extract_text(&self, text: &str) -> ExtractionReport {
        self.extract_lines(text.lines())
    }

    /// Read the whole log file once and extract measurements from it
    ///
    /// Invalid UTF-8 is replaced rather than rejected; affected lines simply
    /// fail to match.
    pub fn extract_file(&self, path: &Path) -> Result<ExtractionReport> {
        let bytes = fs::read(path)
            .with_context(|| format!("Cannot read input log '{}'", path.display()))?;
        let text = String::from_utf8_lossy(&bytes);
        Ok(self.extract_text(&text))
    }
}

impl Default for LatencyExtractor {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AppError;
    use crate::types::PatternKind;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_extract_took_lines_with_noise() {
        let extractor = LatencyExtractor::new();
        let report = extractor.extract_lines(["req took 100 us", "noise", "req took 200 us"]);

        assert_eq!(report.series.values(), vec![0.1, 0.2]);
        assert_eq!(report.lines_read, 3);
        assert_eq!(report.skipped_lines(), 1);

        let line_numbers: Vec<usize> = report.series.measurements().iter().map(|m| m.line_number).collect();
        assert_eq!(line_numbers, vec![1, 3]);
    }

    #[test]
    fn test_extract_semicolon_suffix() {
        let extractor = LatencyExtractor::new();
        let report = extractor.extract_lines(["a;b;5000"]);
        assert_eq!(report.series.values(), vec![5.0]);
        assert_eq!(report.series.measurements()[0].pattern, PatternKind::SemicolonSuffix);
    }

    #[test]
    fn test_extract_unparseable_took_is_skipped() {
        let extractor = LatencyExtractor::new();
        let report = extractor.extract_lines(["took 50us no space"]);
        assert!(report.series.is_empty());
        assert_eq!(report.lines_read, 1);
    }

    #[test]
    fn test_extract_empty_input() {
        let extractor = LatencyExtractor::new();
        let report = extractor.extract_text("");
        assert!(report.series.is_empty());
        assert_eq!(report.lines_read, 0);
    }

    #[test]
    fn test_took_wins_over_suffix() {
        let extractor = LatencyExtractor::new();
        let measurement = extractor.extract_line("op took 300 us;9000", 1).unwrap();
        assert_eq!(measurement.pattern, PatternKind::Took);
        assert_eq!(measurement.latency_ms, 0.3);
    }

    #[test]
    fn test_failed_took_falls_through_to_suffix() {
        let extractor = LatencyExtractor::new();
        let measurement = extractor.extract_line("took too long;4000", 7).unwrap();
        assert_eq!(measurement.pattern, PatternKind::SemicolonSuffix);
        assert_eq!(measurement.latency_ms, 4.0);
        assert_eq!(measurement.line_number, 7);
    }

    #[test]
    fn test_crlf_line_endings() {
        let extractor = LatencyExtractor::new();
        let report = extractor.extract_text("x;1500\r\nreq took 2500 us\r\n");
        assert_eq!(report.series.values(), vec![1.5, 2.5]);
    }

    #[test]
    fn test_custom_recognizer_order() {
        let extractor = LatencyExtractor::with_recognizers(vec![Box::new(SemicolonSuffixRecognizer)]);
        assert_eq!(extractor.recognizer_count(), 1);
        let report = extractor.extract_lines(["req took 100 us", "a;2000"]);
        assert_eq!(report.series.values(), vec![2.0]);
    }

    #[test]
    fn test_extract_file() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "starting benchmark").unwrap();
        writeln!(file, "PostReview took 1200 us").unwrap();
        writeln!(file, "GetDetail;restaurant7;800").unwrap();
        file.flush().unwrap();

        let report = LatencyExtractor::new().extract_file(file.path()).unwrap();
        assert_eq!(report.series.values(), vec![1.2, 0.8]);
        assert_eq!(report.lines_read, 3);
    }

    #[test]
    fn test_extract_file_invalid_utf8_is_tolerated() {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(b"\xff\xfe garbage\nreq took 400 us\n").unwrap();
        file.flush().unwrap();

        let report = LatencyExtractor::new().extract_file(file.path()).unwrap();
        assert_eq!(report.series.values(), vec![0.4]);
        assert_eq!(report.lines_read, 2);
    }

    #[test]
    fn test_missing_file_is_fatal() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("missing.log");

        let error = LatencyExtractor::new().extract_file(&missing).unwrap_err();
        assert!(matches!(error, AppError::Io(_)));
        assert!(error.to_string().contains("missing.log"));
    }
}
