//! Colored formatter implementation with terminal color support

use super::formatter::{FormattingOptions, OutputFormatter, PlainFormatter, RowData};
use super::SummaryReport;
use crate::error::Result;
use colored::*;

/// Latency classification for color coding
#[derive(Debug, Clone, PartialEq)]
pub enum PerformanceLevel {
    Excellent,  // < 1ms
    Good,       // 1-10ms
    Fair,       // 10-100ms
    Poor,       // 100-1000ms
    VeryPoor,   // > 1000ms
}

impl PerformanceLevel {
    /// Determine level from a latency in milliseconds
    pub fn from_latency(latency_ms: f64) -> Self {
        if latency_ms < 1.0 {
            Self::Excellent
        } else if latency_ms < 10.0 {
            Self::Good
        } else if latency_ms < 100.0 {
            Self::Fair
        } else if latency_ms < 1000.0 {
            Self::Poor
        } else {
            Self::VeryPoor
        }
    }

    /// Get color for this performance level
    pub fn color(&self) -> Color {
        match self {
            Self::Excellent => Color::Green,
            Self::Good => Color::Cyan,
            Self::Fair => Color::Yellow,
            Self::Poor => Color::Magenta,
            Self::VeryPoor => Color::Red,
        }
    }

    /// Get descriptive text
    pub fn description(&self) -> &'static str {
        match self {
            Self::Excellent => "Excellent",
            Self::Good => "Good",
            Self::Fair => "Fair",
            Self::Poor => "Poor",
            Self::VeryPoor => "Very Poor",
        }
    }
}

/// Color scheme configuration
#[derive(Debug, Clone)]
pub struct ColorScheme {
    pub header: Color,
    pub success: Color,
    pub warning: Color,
    pub error: Color,
    pub muted: Color,
}

impl Default for ColorScheme {
    fn default() -> Self {
        Self {
            header: Color::Blue,
            success: Color::Green,
            warning: Color::Yellow,
            error: Color::Red,
            muted: Color::BrightBlack,
        }
    }
}

/// Colored formatter implementation
pub struct ColoredFormatter {
    plain_formatter: PlainFormatter,
    options: FormattingOptions,
    color_scheme: ColorScheme,
}

impl ColoredFormatter {
    /// Create a new colored formatter with options
    pub fn new(options: FormattingOptions) -> Self {
        Self::with_color_scheme(options, ColorScheme::default())
    }

    /// Create a colored formatter with custom color scheme
    pub fn with_color_scheme(options: FormattingOptions, color_scheme: ColorScheme) -> Self {
        let plain_formatter = PlainFormatter::new(options.clone());
        Self {
            plain_formatter,
            options,
            color_scheme,
        }
    }

    /// Apply color to text if colors are enabled
    fn colorize(&self, text: &str, color: Color) -> ColoredString {
        if self.options.enable_color {
            text.color(color)
        } else {
            text.normal()
        }
    }

    /// Apply bold formatting if colors are enabled
    fn bold(&self, text: &str) -> ColoredString {
        if self.options.enable_color {
            text.bold()
        } else {
            text.normal()
        }
    }

    /// Bold and colored if colors are enabled
    fn emphasize(&self, text: &str, color: Color) -> ColoredString {
        if self.options.enable_color {
            text.color(color).bold()
        } else {
            text.normal()
        }
    }

    /// Pad first, then color, so ANSI codes do not break the table layout
    fn format_latency_cell(&self, latency_ms: f64, width: usize) -> String {
        let text = format!("{:>width$}", self.plain_formatter.format_ms(latency_ms), width = width);
        let level = PerformanceLevel::from_latency(latency_ms);
        self.colorize(&text, level.color()).to_string()
    }
}

impl OutputFormatter for ColoredFormatter {
    fn format_header(&self, title: &str) -> Result<String> {
        let border = "═".repeat(title.chars().count() + 4);
        Ok(format!(
            "{}\n  {}  \n{}",
            self.colorize(&border, self.color_scheme.header),
            self.bold(title),
            self.colorize(&border, self.color_scheme.header)
        ))
    }

    fn format_summary(&self, report: &SummaryReport) -> Result<String> {
        let mut output = self.format_header("Latency Summary")?;
        output.push('\n');

        for line in self.plain_formatter.source_lines(report) {
            match line.split_once(':') {
                Some((label, rest)) => output.push_str(&format!(
                    "{}:{}\n",
                    self.colorize(label, self.color_scheme.muted),
                    rest
                )),
                None => {
                    output.push_str(&line);
                    output.push('\n');
                }
            }
        }
        output.push('\n');

        let rows = self.plain_formatter.summary_rows(report);
        let value_width = rows
            .iter()
            .map(|(_, v)| self.plain_formatter.format_ms(*v).len())
            .max()
            .unwrap_or(0)
            .max("Latency (ms)".len());
        let name_width = rows
            .iter()
            .map(|(name, _)| name.len())
            .max()
            .unwrap_or(0)
            .max("Statistic".len());

        let header: RowData = vec![
            format!("{:<width$}", "Statistic", width = name_width),
            format!("{:>width$}", "Latency (ms)", width = value_width),
        ];
        output.push_str(&format!(
            "  {}  {}\n",
            self.bold(&header[0]),
            self.bold(&header[1])
        ));
        output.push_str(&format!(
            "  {}\n",
            self.colorize(&"─".repeat(name_width + value_width + 2), self.color_scheme.muted)
        ));

        for (name, value) in rows {
            output.push_str(&format!(
                "  {:<width$}  {}\n",
                name,
                self.format_latency_cell(value, value_width),
                width = name_width
            ));
        }

        Ok(output.trim_end().to_string())
    }

    fn format_error(&self, error: &str) -> Result<String> {
        Ok(format!(
            "{} {}",
            self.emphasize("✗ Error:", self.color_scheme.error),
            error
        ))
    }

    fn format_warning(&self, warning: &str) -> Result<String> {
        Ok(format!(
            "{} {}",
            self.emphasize("⚠ Warning:", self.color_scheme.warning),
            warning
        ))
    }

    fn format_success(&self, message: &str) -> Result<String> {
        Ok(format!(
            "{} {}",
            self.colorize("✓", self.color_scheme.success),
            message
        ))
    }
}
