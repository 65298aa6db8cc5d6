//! Latency CDF plotter
//!
//! Reads a benchmark log, extracts per-request latencies from `took <N> us`
//! and `;<N>` lines, and renders their cumulative distribution as a PNG.

pub mod app;
pub mod cli;
pub mod config;
pub mod error;
pub mod extract;
pub mod logging;
pub mod models;
pub mod output;
pub mod plot;
pub mod stats;
pub mod types;

// Re-export commonly used types
pub use error::{AppError, Result};
pub use extract::LatencyExtractor;
pub use models::{CdfPoint, Config, ExtractionReport, LatencyMeasurement, LatencySeries};
pub use output::{OutputFormatter, OutputFormatterFactory, SummaryReport};
pub use plot::{PlotOptions, PlotRenderer, RenderOutcome};
pub use stats::{compute_cdf, LatencySummary};

/// Application version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const PKG_NAME: &str = env!("CARGO_PKG_NAME");
pub const BUILD_TIME: &str = env!("BUILD_TIME");
pub const GIT_COMMIT: &str = env!("GIT_COMMIT");

/// Default configuration values
pub mod defaults {
    pub const DEFAULT_WIDTH: u32 = 1000;
    pub const DEFAULT_HEIGHT: u32 = 600;
    pub const DEFAULT_TITLE: &str = "Cumulative Distribution Function of Latency (ms)";
    pub const DEFAULT_ENABLE_COLOR: bool = true;
    pub const MIN_IMAGE_DIMENSION: u32 = 100;
    pub const MAX_IMAGE_DIMENSION: u32 = 10_000;
}
