//! Configuration parsing from CLI arguments

use crate::{
    cli::Cli,
    error::{AppError, Result},
    models::Config,
};

/// Builds a [`Config`] from parsed CLI arguments
pub struct ConfigParser {
    cli: Cli,
}

impl ConfigParser {
    /// Create a new configuration parser with CLI arguments
    pub fn new(cli: Cli) -> Self {
        Self { cli }
    }

    /// Parse and build the complete configuration
    pub fn parse(&self) -> Result<Config> {
        let mut config = Config::default();

        self.apply_cli_overrides(&mut config)?;

        config.validate()?;

        Ok(config)
    }

    /// Apply CLI argument overrides to configuration
    fn apply_cli_overrides(&self, config: &mut Config) -> Result<()> {
        self.cli.validate().map_err(AppError::config)?;

        config.input_path = self
            .cli
            .input
            .clone()
            .ok_or_else(|| AppError::config("No input log given"))?;
        config.output_path = self.cli.output.clone();
        config.width = self.cli.width;
        config.height = self.cli.height;

        if let Some(title) = &self.cli.title {
            config.title = title.clone();
        }

        config.font_path = self.cli.font.clone();
        config.show_summary = self.cli.summary;
        config.summary_format = self.cli.format;
        config.enable_color = self.cli.use_colors();

        // CLI-only flags
        config.verbose = self.cli.verbose;
        config.debug = self.cli.debug;

        Ok(())
    }
}

/// Convenience function to load complete configuration from CLI arguments
pub fn load_config(cli: Cli) -> Result<Config> {
    ConfigParser::new(cli).parse()
}

/// Display configuration summary for debug purposes
pub fn display_config_summary(config: &Config) -> String {
    let mut summary = Vec::new();

    summary.push(format!("Input: {}", config.input_path.display()));
    summary.push(format!("Output: {}", config.resolved_output_path().display()));
    summary.push(format!("Image Size: {}x{}", config.width, config.height));
    summary.push(format!("Title: {}", config.title));
    summary.push(format!(
        "Font: {}",
        config
            .font_path
            .as_ref()
            .map(|p| p.display().to_string())
            .unwrap_or_else(|| "auto".to_string())
    ));
    summary.push(format!(
        "Summary: {}",
        if config.show_summary { config.summary_format.to_string() } else { "off".to_string() }
    ));
    summary.push(format!("Color Output: {}", config.enable_color));
    summary.push(format!("Verbose: {}", config.verbose));
    summary.push(format!("Debug: {}", config.debug));

    summary.join("\n")
}
