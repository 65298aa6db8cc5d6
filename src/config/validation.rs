//! Configuration validation utilities and rules

use crate::{error::Result, models::Config};
use colored::*;

/// Pixel count above which rendering gets noticeably slow
const LARGE_IMAGE_PIXELS: u64 = 16_000_000;

/// Configuration validator with non-fatal checks on top of [`Config::validate`]
pub struct ConfigValidator;

impl ConfigValidator {
    /// Validate configuration and collect warnings
    pub fn validate_comprehensive(config: &Config) -> Result<Vec<ValidationWarning>> {
        let mut warnings = Vec::new();

        config.validate()?;

        warnings.extend(Self::validate_input(config));
        warnings.extend(Self::validate_output(config));
        warnings.extend(Self::validate_image_size(config));
        warnings.extend(Self::validate_font(config));

        Ok(warnings)
    }

    fn validate_input(config: &Config) -> Vec<ValidationWarning> {
        let mut warnings = Vec::new();

        if config.input_path.is_dir() {
            warnings.push(ValidationWarning::new(
                ValidationLevel::Error,
                format!("Input '{}' is a directory, not a log file", config.input_path.display()),
            ));
        }

        warnings
    }

    fn validate_output(config: &Config) -> Vec<ValidationWarning> {
        let mut warnings = Vec::new();
        let output = config.resolved_output_path();

        let is_png = output
            .extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| ext.eq_ignore_ascii_case("png"))
            .unwrap_or(false);

        if !is_png {
            warnings.push(ValidationWarning::new(
                ValidationLevel::Warning,
                format!("Output '{}' does not end in .png but will contain PNG data", output.display()),
            ));
        }

        if output.exists() {
            warnings.push(ValidationWarning::new(
                ValidationLevel::Info,
                format!("Output '{}' exists and will be overwritten", output.display()),
            ));
        }

        warnings
    }

    fn validate_image_size(config: &Config) -> Vec<ValidationWarning> {
        let mut warnings = Vec::new();
        let pixels = config.width as u64 * config.height as u64;

        if pixels > LARGE_IMAGE_PIXELS {
            warnings.push(ValidationWarning::new(
                ValidationLevel::Warning,
                format!(
                    "Image of {}x{} ({} megapixels) will be slow to render and large on disk",
                    config.width,
                    config.height,
                    pixels / 1_000_000
                ),
            ));
        }

        let ratio = config.width as f64 / config.height as f64;
        if !(0.25..=8.0).contains(&ratio) {
            warnings.push(ValidationWarning::new(
                ValidationLevel::Info,
                format!("Unusual aspect ratio {}x{} may make the curve hard to read", config.width, config.height),
            ));
        }

        warnings
    }

    fn validate_font(config: &Config) -> Vec<ValidationWarning> {
        let mut warnings = Vec::new();

        if let Some(font) = &config.font_path {
            if !font.is_file() {
                warnings.push(ValidationWarning::new(
                    ValidationLevel::Warning,
                    format!(
                        "Font '{}' not found, falling back to system fonts",
                        font.display()
                    ),
                ));
            }
        }

        warnings
    }
}

/// Validation warning levels
#[derive(Debug, Clone, PartialEq)]
pub enum ValidationLevel {
    Info,
    Warning,
    Error,
}

impl ValidationLevel {
    /// Get display string for level
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Info => "INFO",
            Self::Warning => "WARNING",
            Self::Error => "ERROR",
        }
    }

    /// Get color for terminal display
    pub fn color(&self) -> Color {
        match self {
            Self::Info => Color::Blue,
            Self::Warning => Color::Yellow,
            Self::Error => Color::Red,
        }
    }
}

/// Configuration validation warning
#[derive(Debug, Clone)]
pub struct ValidationWarning {
    pub level: ValidationLevel,
    pub message: String,
}

impl ValidationWarning {
    /// Create a new validation warning
    pub fn new(level: ValidationLevel, message: String) -> Self {
        Self { level, message }
    }

    /// Format warning for display
    pub fn format(&self, use_color: bool) -> String {
        if use_color {
            format!(
                "[{}] {}",
                self.level.as_str().color(self.level.color()).bold(),
                self.message
            )
        } else {
            format!("[{}] {}", self.level.as_str(), self.message)
        }
    }
}

/// Convenience function for comprehensive configuration validation
pub fn validate_config(config: &Config) -> Result<Vec<ValidationWarning>> {
    ConfigValidator::validate_comprehensive(config)
}
