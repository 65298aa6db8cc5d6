//! Data models and structures for the latency CDF plotter

pub mod config;
pub mod latency;

// Re-export main model types
pub use config::Config;
pub use latency::{CdfPoint, ExtractionReport, LatencyMeasurement, LatencySeries};
