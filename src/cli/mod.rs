//! Command-line interface module with topic help

pub mod help;

pub use help::{HelpSystem, HELP_TOPICS};

use crate::types::SummaryFormat;
use clap::Parser;
use std::path::PathBuf;

/// latplot - plot the latency CDF of a benchmark log
#[derive(Parser, Debug, Clone)]
#[command(name = "latplot")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Benchmark log to read latencies from
    #[arg(value_name = "INPUT")]
    pub input: Option<PathBuf>,

    /// Image path (default: <INPUT>.png)
    #[arg(short, long, value_name = "PATH")]
    pub output: Option<PathBuf>,

    /// Image width in pixels
    #[arg(long, value_parser = parse_dimension, default_value_t = crate::defaults::DEFAULT_WIDTH)]
    pub width: u32,

    /// Image height in pixels
    #[arg(long, value_parser = parse_dimension, default_value_t = crate::defaults::DEFAULT_HEIGHT)]
    pub height: u32,

    /// Chart caption
    #[arg(long, value_name = "TEXT")]
    pub title: Option<String>,

    /// TrueType/OpenType font for caption and axis labels
    #[arg(long, value_name = "PATH")]
    pub font: Option<PathBuf>,

    /// Print a latency summary to stdout after plotting
    #[arg(short, long)]
    pub summary: bool,

    /// Summary format (text, json)
    #[arg(long, value_parser = parse_summary_format, default_value_t = SummaryFormat::Text)]
    pub format: SummaryFormat,

    /// Force colored output
    #[arg(long)]
    pub color: bool,

    /// Disable colored output
    #[arg(long)]
    pub no_color: bool,

    /// Enable verbose output
    #[arg(long)]
    pub verbose: bool,

    /// Enable debug output
    #[arg(long)]
    pub debug: bool,

    /// Show help for specific topic (patterns, output, examples)
    #[arg(long, value_name = "TOPIC")]
    pub help_topic: Option<String>,
}

impl Cli {
    /// Validate CLI arguments for conflicts and requirements
    pub fn validate(&self) -> Result<(), String> {
        if self.color && self.no_color {
            return Err("Cannot specify both --color and --no-color".to_string());
        }

        if self.input.is_none() && self.help_topic.is_none() {
            return Err("Missing INPUT: pass the benchmark log to plot".to_string());
        }

        if self.format != SummaryFormat::Text && !self.summary {
            return Err("--format only applies together with --summary".to_string());
        }

        Ok(())
    }

    /// Check if help should be displayed for a specific topic
    pub fn should_show_topic_help(&self) -> bool {
        self.help_topic.is_some()
    }

    /// Get the help topic if specified
    pub fn get_help_topic(&self) -> Option<&str> {
        self.help_topic.as_deref()
    }

    /// Check if colors should be enabled
    pub fn use_colors(&self) -> bool {
        if self.color {
            true
        } else if self.no_color {
            false
        } else {
            supports_color()
        }
    }

    /// Display help for the specified topic or main help
    pub fn display_help(&self) -> String {
        let help_system = HelpSystem::new();
        let use_colors = self.use_colors();

        if let Some(topic) = &self.help_topic {
            help_system.display_topic_help(topic, use_colors)
                .unwrap_or_else(|| {
                    format!("Unknown help topic: '{}'\n\nAvailable topics: {}\n\n{}",
                        topic, HELP_TOPICS.join(", "), help_system.display_main_help(use_colors))
                })
        } else {
            help_system.display_main_help(use_colors)
        }
    }
}

/// Parse an image dimension in pixels
fn parse_dimension(s: &str) -> Result<u32, String> {
    if s.starts_with('+') || s.starts_with("0x") || s.starts_with("0X") {
        return Err(format!("Invalid pixel size: {}", s));
    }

    let min = crate::defaults::MIN_IMAGE_DIMENSION;
    let max = crate::defaults::MAX_IMAGE_DIMENSION;

    s.parse::<u32>()
        .map_err(|_| format!("Invalid pixel size: {}", s))
        .and_then(|px| {
            if px < min {
                Err(format!("Pixel size must be at least {}", min))
            } else if px > max {
                Err(format!("Pixel size cannot exceed {}", max))
            } else {
                Ok(px)
            }
        })
}

fn parse_summary_format(s: &str) -> Result<SummaryFormat, String> {
    s.parse::<SummaryFormat>().map_err(|e| e.to_string())
}

/// Check if the terminal supports color output
pub fn supports_color() -> bool {
    if let Ok(term) = std::env::var("TERM") {
        if term == "dumb" {
            return false;
        }
    }

    if std::env::var_os("NO_COLOR").is_some() {
        return false;
    }

    #[cfg(unix)]
    {
        true
    }
    #[cfg(not(unix))]
    {
        false
    }
}
