//! Main application orchestration and execution

use crate::{
    cli::Cli,
    config::{display_config_summary, load_config, validate_config, ValidationWarning},
    error::{AppError, Result},
    extract::LatencyExtractor,
    logging::{ErrorEventLogger, Logger, LoggerFactory, PerformanceLogger},
    models::{Config, ExtractionReport},
    output::{OutputFormatterFactory, SummaryReport},
    plot::{PlotRenderer, RenderOutcome},
    stats::{compute_cdf, LatencySummary},
};
use std::io::{self, Write};

/// What a successful run produced
#[derive(Debug, Clone)]
pub struct RunReport {
    /// Non-fatal configuration warnings
    pub warnings: Vec<ValidationWarning>,
    /// Lines read and measurements extracted
    pub extraction: ExtractionReport,
    /// Statistics over the extracted series
    pub summary: LatencySummary,
    /// Written image and the font used
    pub render: RenderOutcome,
}

impl RunReport {
    /// Summary in the shape printed by `--summary`
    pub fn summary_report(&self, config: &Config) -> SummaryReport {
        SummaryReport::new(
            &config.input_path,
            &self.render.output_path,
            &self.extraction,
            self.summary.clone(),
        )
    }
}

/// Main application struct that coordinates all components
pub struct App {
    config: Config,
    logger: Logger,
    perf: PerformanceLogger,
    errors: ErrorEventLogger,
}

impl App {
    /// Create a new application instance from a validated configuration
    pub fn new(config: Config) -> Self {
        let factory = LoggerFactory::new(config.clone());
        let logger = factory.create_logger("APP");
        logger.add_context_field("input".to_string(), config.input_path.display().to_string());

        Self {
            perf: factory.create_performance_logger(),
            errors: factory.create_error_logger(),
            logger,
            config,
        }
    }

    /// Build configuration from CLI arguments and create the application
    pub fn from_cli(cli: Cli) -> Result<Self> {
        Ok(Self::new(load_config(cli)?))
    }

    /// Active configuration
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Run the pipeline and print the summary if requested
    pub fn run(&mut self) -> Result<RunReport> {
        let correlation_id = self.logger.start_operation("plot");

        match self.execute() {
            Ok(report) => {
                self.logger.end_operation(&correlation_id, "plot", true);
                if self.config.show_summary {
                    let summary = self.format_summary(&report)?;
                    let mut stdout = io::stdout().lock();
                    writeln!(stdout, "{}", summary)?;
                }
                Ok(report)
            }
            Err(e) => {
                self.errors.log_error(&e, Some("Plotting failed"), Some(&correlation_id));
                self.logger.end_operation(&correlation_id, "plot", false);
                Err(e)
            }
        }
    }

    /// Read, extract, compute and render without printing the summary
    pub fn execute(&mut self) -> Result<RunReport> {
        crate::log_info!(
            self.logger,
            "{} v{} ({}, built {})",
            crate::PKG_NAME,
            crate::VERSION,
            crate::GIT_COMMIT,
            crate::BUILD_TIME
        );

        let warnings = validate_config(&self.config)?;
        self.report_warnings(&warnings);

        if self.logger.would_log(crate::logging::LogLevel::Debug) {
            for line in display_config_summary(&self.config).lines() {
                crate::log_debug!(self.logger, "config {}", line);
            }
        }

        self.perf.start_timing("extract");
        let extraction = LatencyExtractor::new().extract_file(&self.config.input_path)?;
        self.perf.end_timing("extract");
        self.perf.log_extraction(&extraction);

        if extraction.series.is_empty() {
            return Err(AppError::empty_result(format!(
                "no latency found in '{}' ({} lines read, none matched 'took <N> us' or ';<N>')",
                self.config.input_path.display(),
                extraction.lines_read
            )));
        }

        self.perf.start_timing("cdf");
        let cdf = compute_cdf(&extraction.series)?;
        let summary = LatencySummary::from_series(&extraction.series)?;
        self.perf.end_timing("cdf");

        let output = self.config.resolved_output_path();
        self.perf.start_timing("render");
        let render = PlotRenderer::from_config(&self.config).render_cdf(&cdf, &output)?;
        self.perf.end_timing("render");
        self.perf.log_render(&render);

        if let Some(reason) = &render.font_warning {
            self.errors.log_fallback("font", reason, None);
        }

        Ok(RunReport {
            warnings,
            extraction,
            summary,
            render,
        })
    }

    /// Render the summary in the configured format
    pub fn format_summary(&self, report: &RunReport) -> Result<String> {
        let formatter = OutputFormatterFactory::for_summary_format(
            self.config.summary_format,
            self.config.enable_color,
            self.config.verbose,
        );
        formatter.format_summary(&report.summary_report(&self.config))
    }

    fn report_warnings(&self, warnings: &[ValidationWarning]) {
        for warning in warnings {
            eprintln!("{}", warning.format(self.config.enable_color));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::SummaryFormat;
    use std::fs;
    use tempfile::TempDir;

    fn config_for(dir: &TempDir, name: &str, contents: &str) -> Config {
        let input = dir.path().join(name);
        fs::write(&input, contents).unwrap();
        let mut config = Config::for_input(input);
        config.width = 320;
        config.height = 240;
        config.enable_color = false;
        config
    }

    #[test]
    fn test_run_writes_png_next_to_input() {
        let dir = TempDir::new().unwrap();
        let config = config_for(&dir, "bench.log", "req took 100 us\nnoise\nreq took 200 us\n");

        let report = App::new(config).execute().unwrap();

        let expected = dir.path().join("bench.log.png");
        assert_eq!(report.render.output_path, expected);
        assert!(expected.is_file());
        assert_eq!(report.extraction.series.values(), vec![0.1, 0.2]);
        assert_eq!(report.summary.count, 2);
        assert_eq!(report.summary.max_ms, 0.2);
    }

    #[test]
    fn test_empty_log_is_empty_result() {
        let dir = TempDir::new().unwrap();
        let config = config_for(&dir, "empty.log", "");

        let error = App::new(config).execute().unwrap_err();
        assert!(matches!(error, AppError::EmptyResult(_)));
        assert_eq!(error.exit_code(), 6);
        assert!(!dir.path().join("empty.log.png").exists());
    }

    #[test]
    fn test_missing_input_is_io_error() {
        let dir = TempDir::new().unwrap();
        let config = Config::for_input(dir.path().join("absent.log"));

        let error = App::new(config).run().unwrap_err();
        assert!(matches!(error, AppError::Io(_)));
        assert_eq!(error.exit_code(), 5);
    }

    #[test]
    fn test_json_summary_format() {
        let dir = TempDir::new().unwrap();
        let mut config = config_for(&dir, "mixed.log", "a;b;5000\nGetDetail took 1000 us\n");
        config.summary_format = SummaryFormat::Json;
        config.output_path = Some(dir.path().join("chart.png"));

        let mut app = App::new(config);
        let report = app.execute().unwrap();
        let json = app.format_summary(&report).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();

        assert_eq!(value["summary"]["count"], 2);
        assert_eq!(value["summary"]["min_ms"], 1.0);
        assert_eq!(value["summary"]["max_ms"], 5.0);
        assert_eq!(value["took_matches"], 1);
        assert_eq!(value["suffix_matches"], 1);
        assert!(value["output_path"].as_str().unwrap().ends_with("chart.png"));
    }

    #[test]
    fn test_from_cli_rejects_bad_arguments() {
        use clap::Parser;
        let cli = Cli::parse_from(["latplot", "a.log", "--color", "--no-color"]);
        assert!(matches!(App::from_cli(cli), Err(AppError::Config(_))));
    }
}
