//! Configuration data model and validation

use crate::types::{AppError, Result, SummaryFormat};
use serde::{Deserialize, Serialize};
use std::ffi::OsString;
use std::path::{Path, PathBuf};

/// Main application configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Log file to extract latencies from
    pub input_path: PathBuf,

    /// Explicit image path; `<input_path>.png` when unset
    #[serde(default)]
    pub output_path: Option<PathBuf>,

    /// Image width in pixels
    #[serde(default = "default_width")]
    pub width: u32,

    /// Image height in pixels
    #[serde(default = "default_height")]
    pub height: u32,

    /// Chart caption
    #[serde(default = "default_title")]
    pub title: String,

    /// TrueType/OpenType font used for captions and axis labels
    #[serde(default)]
    pub font_path: Option<PathBuf>,

    /// Print the latency summary after rendering
    #[serde(default)]
    pub show_summary: bool,

    /// Summary output format
    #[serde(default)]
    pub summary_format: SummaryFormat,

    /// Enable colored terminal output
    #[serde(default = "default_enable_color")]
    pub enable_color: bool,

    /// Enable verbose output
    #[serde(default)]
    pub verbose: bool,

    /// Enable debug output
    #[serde(default)]
    pub debug: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            input_path: PathBuf::new(),
            output_path: None,
            width: default_width(),
            height: default_height(),
            title: default_title(),
            font_path: None,
            show_summary: false,
            summary_format: SummaryFormat::default(),
            enable_color: default_enable_color(),
            verbose: false,
            debug: false,
        }
    }
}

impl Config {
    /// Create a configuration for the given input log with default values
    pub fn for_input<P: Into<PathBuf>>(input_path: P) -> Self {
        Self {
            input_path: input_path.into(),
            ..Self::default()
        }
    }

    /// Path the plot image is written to
    pub fn resolved_output_path(&self) -> PathBuf {
        match &self.output_path {
            Some(path) => path.clone(),
            None => png_path_for(&self.input_path),
        }
    }

    /// Validate the configuration and return any errors
    pub fn validate(&self) -> Result<()> {
        if self.input_path.as_os_str().is_empty() {
            return Err(AppError::config("Input log path cannot be empty"));
        }

        let size_range = crate::defaults::MIN_IMAGE_DIMENSION..=crate::defaults::MAX_IMAGE_DIMENSION;
        if !size_range.contains(&self.width) {
            return Err(AppError::validation(format!(
                "Image width {} is outside {}..={}",
                self.width,
                size_range.start(),
                size_range.end()
            )));
        }

        if !size_range.contains(&self.height) {
            return Err(AppError::validation(format!(
                "Image height {} is outside {}..={}",
                self.height,
                size_range.start(),
                size_range.end()
            )));
        }

        if self.title.trim().is_empty() {
            return Err(AppError::validation("Plot title cannot be empty"));
        }

        if let Some(output) = &self.output_path {
            if output.as_os_str().is_empty() {
                return Err(AppError::config("Output path cannot be empty"));
            }
            if same_location(output, &self.input_path) {
                return Err(AppError::config(format!(
                    "Output path '{}' would overwrite the input log",
                    output.display()
                )));
            }
        }

        Ok(())
    }
}

/// Whether two paths name the same file once `.`, `..` and symlinks are resolved
///
/// The output may not exist yet, so only its directory is resolved and the
/// file name is appended. Paths that cannot be resolved compare literally.
fn same_location(output: &Path, input: &Path) -> bool {
    if output == input {
        return true;
    }

    let Ok(input) = input.canonicalize() else {
        return false;
    };

    match output.canonicalize() {
        Ok(output) => output == input,
        Err(_) => {
            let Some(name) = output.file_name() else {
                return false;
            };
            let parent = match output.parent() {
                Some(parent) if !parent.as_os_str().is_empty() => parent,
                _ => Path::new("."),
            };
            parent
                .canonicalize()
                .map(|dir| dir.join(name) == input)
                .unwrap_or(false)
        }
    }
}

/// Append `.png` to the full path, keeping any existing extension
pub fn png_path_for(input: &Path) -> PathBuf {
    let mut raw: OsString = input.as_os_str().to_owned();
    raw.push(".png");
    PathBuf::from(raw)
}

fn default_width() -> u32 {
    crate::defaults::DEFAULT_WIDTH
}

fn default_height() -> u32 {
    crate::defaults::DEFAULT_HEIGHT
}

fn default_title() -> String {
    crate::defaults::DEFAULT_TITLE.to_string()
}

fn default_enable_color() -> bool {
    crate::defaults::DEFAULT_ENABLE_COLOR
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::for_input("bench.log");
        assert_eq!(config.width, 1000);
        assert_eq!(config.height, 600);
        assert_eq!(config.title, "Cumulative Distribution Function of Latency (ms)");
        assert_eq!(config.summary_format, SummaryFormat::Text);
        assert!(!config.show_summary);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_output_path_appends_png() {
        let config = Config::for_input("runs/bench.log");
        assert_eq!(config.resolved_output_path(), PathBuf::from("runs/bench.log.png"));

        let config = Config::for_input("latencies");
        assert_eq!(config.resolved_output_path(), PathBuf::from("latencies.png"));
    }

    #[test]
    fn test_explicit_output_path() {
        let mut config = Config::for_input("bench.log");
        config.output_path = Some(PathBuf::from("plots/cdf.png"));
        assert_eq!(config.resolved_output_path(), PathBuf::from("plots/cdf.png"));
    }

    #[test]
    fn test_validation_errors() {
        let config = Config::default();
        assert!(config.validate().unwrap_err().to_string().contains("Input log path"));

        let mut config = Config::for_input("bench.log");
        config.width = 50;
        assert!(matches!(config.validate(), Err(AppError::Validation(_))));

        let mut config = Config::for_input("bench.log");
        config.height = 20_000;
        assert!(matches!(config.validate(), Err(AppError::Validation(_))));

        let mut config = Config::for_input("bench.log");
        config.title = "   ".to_string();
        assert!(config.validate().is_err());

        let mut config = Config::for_input("bench.log");
        config.output_path = Some(PathBuf::from("bench.log"));
        assert!(config.validate().unwrap_err().to_string().contains("overwrite the input"));
    }

    #[test]
    fn test_config_deserialization_defaults() {
        let config: Config = serde_json::from_str(r#"{"input_path": "bench.log"}"#).unwrap();
        assert_eq!(config, Config::for_input("bench.log"));
    }
}
