//! Core formatting traits and implementations
//!
//! This module defines the output formatting interface and provides
//! plain text and JSON implementations.

use super::SummaryReport;
use crate::error::{AppError, Result};
use std::fmt::Write as _;

/// Main trait for output formatting
pub trait OutputFormatter {
    /// Format a header section
    fn format_header(&self, title: &str) -> Result<String>;

    /// Format the latency summary of one run
    fn format_summary(&self, report: &SummaryReport) -> Result<String>;

    /// Format error messages
    fn format_error(&self, error: &str) -> Result<String>;

    /// Format warning messages
    fn format_warning(&self, warning: &str) -> Result<String>;

    /// Format success messages
    fn format_success(&self, message: &str) -> Result<String>;
}

/// Configuration options for formatting
#[derive(Debug, Clone)]
pub struct FormattingOptions {
    /// Enable colored output
    pub enable_color: bool,
    /// Enable verbose mode with detailed information
    pub verbose_mode: bool,
    /// Show table borders
    pub table_borders: bool,
    /// Digits after the decimal point for millisecond values
    pub precision: usize,
}

impl Default for FormattingOptions {
    fn default() -> Self {
        Self {
            enable_color: true,
            verbose_mode: false,
            table_borders: true,
            precision: 3,
        }
    }
}

/// Table formatting configuration
#[derive(Debug, Clone)]
pub struct TableFormat {
    /// Column definitions
    pub columns: Vec<Column>,
    /// Show borders around table
    pub show_borders: bool,
    /// Show header row
    pub show_header: bool,
}

/// Column definition for table formatting
#[derive(Debug, Clone)]
pub struct Column {
    /// Column header
    pub header: String,
    /// Column alignment
    pub alignment: Alignment,
    /// Minimum width
    pub min_width: usize,
}

impl Column {
    pub fn new(header: &str, alignment: Alignment) -> Self {
        Self {
            header: header.to_string(),
            alignment,
            min_width: 0,
        }
    }
}

/// Text alignment options
#[derive(Debug, Clone)]
pub enum Alignment {
    Left,
    Right,
    Center,
}

/// Row data for table formatting
pub type RowData = Vec<String>;

/// Plain text formatter implementation
pub struct PlainFormatter {
    options: FormattingOptions,
}

impl PlainFormatter {
    /// Create a new plain formatter with options
    pub fn new(options: FormattingOptions) -> Self {
        Self { options }
    }

    /// Statistic rows shown in the summary table: name, value in ms
    pub(crate) fn summary_rows(&self, report: &SummaryReport) -> Vec<(String, f64)> {
        let summary = &report.summary;
        let mut rows = vec![
            ("min".to_string(), summary.min_ms),
            ("mean".to_string(), summary.mean_ms),
        ];
        rows.extend(summary.percentiles.iter().map(|p| (p.label(), p.latency_ms)));
        rows.push(("max".to_string(), summary.max_ms));
        if self.options.verbose_mode {
            rows.push(("std dev".to_string(), summary.std_dev_ms));
        }
        rows
    }

    /// Format a millisecond value with the configured precision
    pub(crate) fn format_ms(&self, value_ms: f64) -> String {
        format!("{:.*}", self.options.precision, value_ms)
    }

    /// Lines describing where the data came from
    pub(crate) fn source_lines(&self, report: &SummaryReport) -> Vec<String> {
        let mut lines = vec![
            format!("Input:        {}", report.input_path),
            format!("Plot:         {}", report.output_path),
            format!("Measurements: {} of {} lines", report.summary.count, report.lines_read),
        ];
        if self.options.verbose_mode {
            lines.push(format!("  took <N> us: {}", report.took_matches));
            lines.push(format!("  ;<N> suffix: {}", report.suffix_matches));
            lines.push(format!("  skipped:     {}", report.skipped_lines));
        }
        lines
    }

    /// Create a table with the given format and data
    pub(crate) fn create_table(&self, format: &TableFormat, rows: &[RowData]) -> String {
        if rows.is_empty() {
            return String::new();
        }

        let column_widths = self.calculate_column_widths(format, rows);
        let show_borders = format.show_borders && self.options.table_borders;

        let mut output = String::new();

        if format.show_header && !format.columns.is_empty() {
            if show_borders {
                output.push_str(&self.create_horizontal_border(&column_widths));
                output.push('\n');
            }

            let headers: Vec<String> = format.columns.iter().map(|c| c.header.clone()).collect();
            output.push_str(&self.create_row(&headers, &column_widths, format, show_borders));
            output.push('\n');

            if show_borders {
                output.push_str(&self.create_horizontal_border(&column_widths));
                output.push('\n');
            }
        }

        for row in rows {
            output.push_str(&self.create_row(row, &column_widths, format, show_borders));
            output.push('\n');
        }

        if show_borders {
            output.push_str(&self.create_horizontal_border(&column_widths));
        }

        output.trim_end().to_string()
    }

    fn calculate_column_widths(&self, format: &TableFormat, rows: &[RowData]) -> Vec<usize> {
        let num_columns = format.columns.len().max(
            rows.iter().map(|r| r.len()).max().unwrap_or(0)
        );

        (0..num_columns)
            .map(|col_idx| {
                let header_width = format
                    .columns
                    .get(col_idx)
                    .map(|c| c.min_width.max(c.header.chars().count()))
                    .unwrap_or(0);

                rows.iter()
                    .filter_map(|row| row.get(col_idx))
                    .map(|cell| cell.chars().count())
                    .fold(header_width, usize::max)
            })
            .collect()
    }

    fn create_row(&self, data: &[String], widths: &[usize], format: &TableFormat, show_borders: bool) -> String {
        let mut row = String::new();

        if show_borders {
            row.push('|');
        }

        for (idx, (cell, &width)) in data.iter().zip(widths.iter()).enumerate() {
            let alignment = format
                .columns
                .get(idx)
                .map(|c| &c.alignment)
                .unwrap_or(&Alignment::Left);

            if show_borders {
                row.push(' ');
            }
            row.push_str(&self.align_text(cell, width, alignment));
            if show_borders {
                row.push_str(" |");
            } else {
                row.push_str("  ");
            }
        }

        row.trim_end().to_string()
    }

    fn create_horizontal_border(&self, widths: &[usize]) -> String {
        let mut border = String::new();

        if !widths.is_empty() {
            border.push('+');
            for &width in widths {
                border.push_str(&"-".repeat(width + 2));
                border.push('+');
            }
        }

        border
    }

    /// Align text within specified width
    fn align_text(&self, text: &str, width: usize, alignment: &Alignment) -> String {
        let len = text.chars().count();
        if len >= width {
            return text.to_string();
        }

        let padding = width - len;
        match alignment {
            Alignment::Left => format!("{}{}", text, " ".repeat(padding)),
            Alignment::Right => format!("{}{}", " ".repeat(padding), text),
            Alignment::Center => {
                let left_pad = padding / 2;
                let right_pad = padding - left_pad;
                format!("{}{}{}", " ".repeat(left_pad), text, " ".repeat(right_pad))
            }
        }
    }

    pub(crate) fn summary_table_format() -> TableFormat {
        TableFormat {
            columns: vec![
                Column::new("Statistic", Alignment::Left),
                Column::new("Latency (ms)", Alignment::Right),
            ],
            show_borders: true,
            show_header: true,
        }
    }
}

impl OutputFormatter for PlainFormatter {
    fn format_header(&self, title: &str) -> Result<String> {
        let mut output = String::new();
        let border = "=".repeat(title.chars().count() + 4);

        writeln!(output, "{}", border)
            .map_err(|e| AppError::internal(format!("Failed to format header: {}", e)))?;
        writeln!(output, "  {}  ", title)
            .map_err(|e| AppError::internal(format!("Failed to format header: {}", e)))?;
        write!(output, "{}", border)
            .map_err(|e| AppError::internal(format!("Failed to format header: {}", e)))?;

        Ok(output)
    }

    fn format_summary(&self, report: &SummaryReport) -> Result<String> {
        let mut output = self.format_header("Latency Summary")?;
        output.push('\n');

        for line in self.source_lines(report) {
            output.push_str(&line);
            output.push('\n');
        }
        output.push('\n');

        let rows: Vec<RowData> = self
            .summary_rows(report)
            .into_iter()
            .map(|(name, value)| vec![name, self.format_ms(value)])
            .collect();
        output.push_str(&self.create_table(&Self::summary_table_format(), &rows));

        Ok(output)
    }

    fn format_error(&self, error: &str) -> Result<String> {
        Ok(format!("Error: {}", error))
    }

    fn format_warning(&self, warning: &str) -> Result<String> {
        Ok(format!("Warning: {}", warning))
    }

    fn format_success(&self, message: &str) -> Result<String> {
        Ok(message.to_string())
    }
}

/// JSON formatter for machine-readable summaries
pub struct JsonFormatter {
    pretty: bool,
}

impl JsonFormatter {
    pub fn new(pretty: bool) -> Self {
        Self { pretty }
    }

    fn message(&self, level: &str, message: &str) -> Result<String> {
        let value = serde_json::json!({ "level": level, "message": message });
        Ok(value.to_string())
    }
}

impl OutputFormatter for JsonFormatter {
    fn format_header(&self, _title: &str) -> Result<String> {
        Ok(String::new())
    }

    fn format_summary(&self, report: &SummaryReport) -> Result<String> {
        let json = if self.pretty {
            serde_json::to_string_pretty(report)?
        } else {
            serde_json::to_string(report)?
        };
        Ok(json)
    }

    fn format_error(&self, error: &str) -> Result<String> {
        self.message("error", error)
    }

    fn format_warning(&self, warning: &str) -> Result<String> {
        self.message("warning", warning)
    }

    fn format_success(&self, message: &str) -> Result<String> {
        self.message("info", message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::output::tests::sample_report;

    fn plain(verbose: bool) -> PlainFormatter {
        PlainFormatter::new(FormattingOptions {
            enable_color: false,
            verbose_mode: verbose,
            ..FormattingOptions::default()
        })
    }

    #[test]
    fn test_header() {
        let header = plain(false).format_header("Latency Summary").unwrap();
        assert_eq!(header, "===================\n  Latency Summary  \n===================");
    }

    #[test]
    fn test_plain_summary_table() {
        let output = plain(false).format_summary(&sample_report()).unwrap();

        assert!(output.contains("Input:        bench.log"));
        assert!(output.contains("Measurements: 4 of 6 lines"));
        assert!(output.contains("| Statistic | Latency (ms) |"));
        assert!(output.contains("| min       |        1.000 |"));
        assert!(output.contains("| p50       |"));
        assert!(output.contains("| max       |        4.000 |"));
        assert!(!output.contains("std dev"));
        assert!(!output.contains("skipped"));
    }

    #[test]
    fn test_plain_summary_verbose() {
        let output = plain(true).format_summary(&sample_report()).unwrap();
        assert!(output.contains("std dev"));
        assert!(output.contains("took <N> us: 3"));
        assert!(output.contains(";<N> suffix: 1"));
        assert!(output.contains("skipped:     2"));
    }

    #[test]
    fn test_table_without_borders() {
        let formatter = PlainFormatter::new(FormattingOptions {
            table_borders: false,
            ..FormattingOptions::default()
        });
        let rows = vec![vec!["p99".to_string(), "12.500".to_string()]];
        let table = formatter.create_table(&PlainFormatter::summary_table_format(), &rows);

        assert!(!table.contains('|'));
        assert!(!table.contains('+'));
        assert!(table.contains("p99"));
        assert!(formatter.create_table(&PlainFormatter::summary_table_format(), &[]).is_empty());
    }

    #[test]
    fn test_align_text() {
        let formatter = plain(false);
        assert_eq!(formatter.align_text("ab", 4, &Alignment::Left), "ab  ");
        assert_eq!(formatter.align_text("ab", 4, &Alignment::Right), "  ab");
        assert_eq!(formatter.align_text("ab", 5, &Alignment::Center), " ab  ");
        assert_eq!(formatter.align_text("abcdef", 3, &Alignment::Left), "abcdef");
    }

    #[test]
    fn test_json_summary() {
        let output = JsonFormatter::new(false).format_summary(&sample_report()).unwrap();
        let value: serde_json::Value = serde_json::from_str(&output).unwrap();

        assert_eq!(value["input_path"], "bench.log");
        assert_eq!(value["summary"]["count"], 4);
        assert_eq!(value["summary"]["min_ms"], 1.0);
        assert_eq!(value["summary"]["percentiles"][0]["percentile"], 50.0);
        assert_eq!(value["took_matches"], 3);
    }

    #[test]
    fn test_json_messages() {
        let formatter = JsonFormatter::new(true);
        let warning = formatter.format_warning("font missing").unwrap();
        let value: serde_json::Value = serde_json::from_str(&warning).unwrap();
        assert_eq!(value["level"], "warning");
        assert_eq!(value["message"], "font missing");
        assert!(formatter.format_header("ignored").unwrap().is_empty());
    }
}
