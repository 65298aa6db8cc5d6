//! Output formatting for the latency summary
//!
//! The summary is written to stdout in plain, colored or JSON form. Warnings
//! and errors use the same formatters but go to stderr.

mod colored;
mod formatter;

pub use self::colored::{ColorScheme, ColoredFormatter, PerformanceLevel};
pub use formatter::{
    Alignment,
    Column,
    FormattingOptions,
    JsonFormatter,
    OutputFormatter,
    PlainFormatter,
    RowData,
    TableFormat,
};

use crate::{
    models::ExtractionReport,
    stats::LatencySummary,
    types::{PatternKind, SummaryFormat},
};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Everything printed by `--summary`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SummaryReport {
    /// Log that was read
    pub input_path: String,
    /// Image that was written
    pub output_path: String,
    /// Lines read from the log
    pub lines_read: usize,
    /// Lines that produced no measurement
    pub skipped_lines: usize,
    /// Measurements from `took <N> us` lines
    pub took_matches: usize,
    /// Measurements from `;<N>` lines
    pub suffix_matches: usize,
    /// Latency statistics in milliseconds
    pub summary: LatencySummary,
}

impl SummaryReport {
    /// Combine extraction counts and statistics into one report
    pub fn new(input: &Path, output: &Path, report: &ExtractionReport, summary: LatencySummary) -> Self {
        Self {
            input_path: input.display().to_string(),
            output_path: output.display().to_string(),
            lines_read: report.lines_read,
            skipped_lines: report.skipped_lines(),
            took_matches: report.series.count_for(PatternKind::Took),
            suffix_matches: report.series.count_for(PatternKind::SemicolonSuffix),
            summary,
        }
    }
}

/// Output formatting factory for creating appropriate formatters
pub struct OutputFormatterFactory;

impl OutputFormatterFactory {
    /// Create a text formatter based on color support and preferences
    pub fn create_formatter(enable_color: bool, verbose: bool) -> Box<dyn OutputFormatter> {
        let options = FormattingOptions {
            enable_color,
            verbose_mode: verbose,
            ..FormattingOptions::default()
        };

        if enable_color {
            Box::new(ColoredFormatter::new(options))
        } else {
            Box::new(PlainFormatter::new(options))
        }
    }

    /// Create the formatter for a summary format
    pub fn for_summary_format(format: SummaryFormat, enable_color: bool, verbose: bool) -> Box<dyn OutputFormatter> {
        match format {
            SummaryFormat::Text => Self::create_formatter(enable_color, verbose),
            SummaryFormat::Json => Box::new(JsonFormatter::new(true)),
        }
    }

    /// Create a plain text formatter for scripts/logs
    pub fn create_plain_formatter() -> Box<dyn OutputFormatter> {
        Self::create_formatter(false, false)
    }
}
