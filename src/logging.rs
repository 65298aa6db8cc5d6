//! Structured logging for the latency CDF plotter
//!
//! Loggers created by one [`LoggerFactory`] share a session: the session id,
//! context fields and the correlation id of the running operation are
//! attached to every entry any of them writes.
//!
//! Everything goes to stderr. Stdout is reserved for the summary.

use crate::error::{AppError, Result};
use crate::models::{Config, ExtractionReport};
use crate::plot::RenderOutcome;
use crate::types::PatternKind;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::io::{self, Write};
use std::sync::{Arc, RwLock};
use std::time::{Duration, Instant};
use uuid::Uuid;

/// Severity of a log entry, ordered from chattiest to most severe
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum LogLevel {
    Trace,
    Debug,
    Info,
    Warn,
    Error,
    Fatal,
}

impl LogLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Trace => "TRACE",
            Self::Debug => "DEBUG",
            Self::Info => "INFO",
            Self::Warn => "WARN",
            Self::Error => "ERROR",
            Self::Fatal => "FATAL",
        }
    }

    /// ANSI escape that starts this level's color
    pub fn color_code(&self) -> &'static str {
        match self {
            Self::Trace => "\x1b[37m",
            Self::Debug => "\x1b[36m",
            Self::Info => "\x1b[32m",
            Self::Warn => "\x1b[33m",
            Self::Error => "\x1b[31m",
            Self::Fatal => "\x1b[35m",
        }
    }

    pub fn reset_code() -> &'static str {
        "\x1b[0m"
    }

    /// Threshold implied by `--verbose` and `--debug`
    pub fn for_config(config: &Config) -> Self {
        match (config.debug, config.verbose) {
            (true, _) => Self::Debug,
            (false, true) => Self::Info,
            (false, false) => Self::Warn,
        }
    }
}

impl std::str::FromStr for LogLevel {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self> {
        let level = match s.to_ascii_lowercase().as_str() {
            "trace" => Self::Trace,
            "debug" => Self::Debug,
            "info" => Self::Info,
            "warn" | "warning" => Self::Warn,
            "error" => Self::Error,
            "fatal" => Self::Fatal,
            _ => return Err(AppError::parse(format!("Invalid log level: {}", s))),
        };
        Ok(level)
    }
}

/// One structured log record
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogEntry {
    pub timestamp: DateTime<Utc>,
    pub level: LogLevel,
    /// Component that wrote the entry, e.g. `APP` or `PERF`
    pub component: String,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub correlation_id: Option<String>,
    /// Structured fields, sorted by key
    #[serde(default)]
    pub fields: BTreeMap<String, serde_json::Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<LogLocation>,
}

/// Where in the source an entry was written
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogLocation {
    pub file: String,
    pub line: u32,
    pub module: Option<String>,
}

/// How entries are rendered
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    /// `timestamp LEVEL [component] message [corr] k=v ...`
    Console,
    /// One JSON object per line
    Json,
}

/// State shared by every logger of one session
#[derive(Debug, Default)]
struct SessionContext {
    session_id: Option<String>,
    operation_id: Option<String>,
    fields: BTreeMap<String, serde_json::Value>,
}

type SharedContext = Arc<RwLock<SessionContext>>;

/// Writes structured entries to stderr
pub struct Logger {
    component: String,
    min_level: LogLevel,
    format: LogFormat,
    use_color: bool,
    with_location: bool,
    context: SharedContext,
}

impl Logger {
    /// Info-level console logger with its own session
    pub fn new(component: String) -> Self {
        Self {
            component,
            min_level: LogLevel::Info,
            format: LogFormat::Console,
            use_color: true,
            with_location: false,
            context: SharedContext::default(),
        }
    }

    /// Logger configured from the run flags: Warn by default, Info when
    /// verbose, Debug as JSON with source locations when debugging
    pub fn with_config(component: String, config: &Config) -> Self {
        Self::in_session(component, config, SharedContext::default())
    }

    fn in_session(component: String, config: &Config, context: SharedContext) -> Self {
        Self {
            component,
            min_level: LogLevel::for_config(config),
            format: if config.debug { LogFormat::Json } else { LogFormat::Console },
            use_color: config.enable_color,
            with_location: config.debug,
            context,
        }
    }

    pub fn set_level(&mut self, level: LogLevel) {
        self.min_level = level;
    }

    pub fn set_format(&mut self, format: LogFormat) {
        self.format = format;
    }

    pub fn set_color(&mut self, use_color: bool) {
        self.use_color = use_color;
    }

    pub fn name(&self) -> &str {
        &self.component
    }

    /// Attach `key=value` to every later entry of this session
    pub fn add_context_field<T: Serialize>(&self, key: String, value: T) {
        let Ok(value) = serde_json::to_value(value) else {
            return;
        };
        if let Ok(mut context) = self.context.write() {
            context.fields.insert(key, value);
        }
    }

    /// Begin an operation; entries written until it ends carry its id
    pub fn start_operation(&self, operation: &str) -> String {
        let operation_id = Uuid::new_v4().to_string();
        if let Ok(mut context) = self.context.write() {
            context.operation_id = Some(operation_id.clone());
        }

        self.info(&format!("{} started", operation))
            .field("operation", operation)
            .log();

        operation_id
    }

    /// Finish the operation started under `operation_id`
    pub fn end_operation(&self, operation_id: &str, operation: &str, success: bool) {
        let level = if success { LogLevel::Info } else { LogLevel::Warn };
        self.log(level, &format!("{} {}", operation, if success { "finished" } else { "failed" }))
            .field("operation", operation)
            .field("success", success)
            .log();

        if let Ok(mut context) = self.context.write() {
            if context.operation_id.as_deref() == Some(operation_id) {
                context.operation_id = None;
            }
        }
    }

    pub fn log(&self, level: LogLevel, message: &str) -> LogEntryBuilder<'_> {
        LogEntryBuilder {
            logger: self,
            entry: LogEntry {
                timestamp: Utc::now(),
                level,
                component: self.component.clone(),
                message: message.to_string(),
                correlation_id: None,
                fields: BTreeMap::new(),
                location: None,
            },
        }
    }

    pub fn trace(&self, message: &str) -> LogEntryBuilder<'_> {
        self.log(LogLevel::Trace, message)
    }

    pub fn debug(&self, message: &str) -> LogEntryBuilder<'_> {
        self.log(LogLevel::Debug, message)
    }

    pub fn info(&self, message: &str) -> LogEntryBuilder<'_> {
        self.log(LogLevel::Info, message)
    }

    pub fn warn(&self, message: &str) -> LogEntryBuilder<'_> {
        self.log(LogLevel::Warn, message)
    }

    pub fn error(&self, message: &str) -> LogEntryBuilder<'_> {
        self.log(LogLevel::Error, message)
    }

    pub fn fatal(&self, message: &str) -> LogEntryBuilder<'_> {
        self.log(LogLevel::Fatal, message)
    }

    pub fn would_log(&self, level: LogLevel) -> bool {
        level >= self.min_level
    }

    /// Merge session state into `entry` and render it, unless it is filtered out
    fn render_entry(&self, mut entry: LogEntry) -> Option<String> {
        if !self.would_log(entry.level) {
            return None;
        }
        if !self.with_location {
            entry.location = None;
        }

        if let Ok(context) = self.context.read() {
            for (key, value) in &context.fields {
                entry.fields.entry(key.clone()).or_insert_with(|| value.clone());
            }
            if let Some(session_id) = &context.session_id {
                entry.fields.insert("session_id".to_string(), session_id.clone().into());
            }
            if entry.correlation_id.is_none() {
                entry.correlation_id = context.operation_id.clone();
            }
        }

        Some(match self.format {
            LogFormat::Console => self.format_console(&entry),
            LogFormat::Json => Self::format_json(&entry),
        })
    }

    fn write_entry(&self, entry: LogEntry) {
        if let Some(line) = self.render_entry(entry) {
            let _ = writeln!(io::stderr().lock(), "{}", line);
        }
    }

    fn format_console(&self, entry: &LogEntry) -> String {
        let level = if self.use_color {
            format!("{}{:>5}{}", entry.level.color_code(), entry.level.as_str(), LogLevel::reset_code())
        } else {
            format!("{:>5}", entry.level.as_str())
        };

        let mut line = format!(
            "{} {} [{}] {}",
            entry.timestamp.format("%H:%M:%S%.3f"),
            level,
            entry.component,
            entry.message
        );

        if let Some(id) = &entry.correlation_id {
            let short: String = id.chars().take(8).collect();
            line.push_str(&format!(" [{}]", short));
        }

        for (key, value) in &entry.fields {
            line.push_str(&format!(" {}={}", key, value));
        }

        if let Some(location) = &entry.location {
            line.push_str(&format!(" @ {}:{}", location.file, location.line));
        }

        line
    }

    fn format_json(entry: &LogEntry) -> String {
        serde_json::to_string(entry).unwrap_or_else(|e| {
            serde_json::json!({
                "level": entry.level,
                "message": entry.message,
                "serialization_error": e.to_string(),
            })
            .to_string()
        })
    }
}

/// Adds fields to an entry before writing it
pub struct LogEntryBuilder<'a> {
    logger: &'a Logger,
    entry: LogEntry,
}

impl<'a> LogEntryBuilder<'a> {
    pub fn correlation_id(mut self, id: &str) -> Self {
        self.entry.correlation_id = Some(id.to_string());
        self
    }

    /// Add a field; values that fail to serialize are dropped
    pub fn field<T: Serialize>(mut self, key: &str, value: T) -> Self {
        if let Ok(value) = serde_json::to_value(value) {
            self.entry.fields.insert(key.to_string(), value);
        }
        self
    }

    /// Record the call site; only kept when the logger shows locations
    pub fn location(mut self, file: &str, line: u32, module: Option<&str>) -> Self {
        self.entry.location = Some(LogLocation {
            file: file.to_string(),
            line,
            module: module.map(str::to_string),
        });
        self
    }

    /// Per-pattern counts of an extraction pass
    pub fn extraction(self, report: &ExtractionReport) -> Self {
        self.field("lines_read", report.lines_read)
            .field("measurements", report.series.len())
            .field("skipped_lines", report.skipped_lines())
            .field("took_matches", report.series.count_for(PatternKind::Took))
            .field("suffix_matches", report.series.count_for(PatternKind::SemicolonSuffix))
    }

    pub fn error_info(self, error: &AppError) -> Self {
        self.field("error_category", error.category())
            .field("exit_code", error.exit_code())
    }

    pub fn log(self) {
        self.logger.write_entry(self.entry);
    }

    /// The line that `log` would write, or `None` below the threshold
    pub fn render(self) -> Option<String> {
        self.logger.render_entry(self.entry)
    }
}

/// Times the phases of a run (read and extract, CDF, render)
pub struct PerformanceLogger {
    logger: Logger,
    started: HashMap<String, Instant>,
    active: Vec<String>,
}

impl PerformanceLogger {
    pub fn new(config: &Config) -> Self {
        Self::with_logger(Logger::with_config("PERF".to_string(), config))
    }

    fn with_logger(logger: Logger) -> Self {
        Self {
            logger,
            started: HashMap::new(),
            active: Vec::new(),
        }
    }

    pub fn start_timing(&mut self, phase: &str) {
        self.started.insert(phase.to_string(), Instant::now());
        self.active.push(phase.to_string());
        self.logger.trace(&format!("{} started", phase)).log();
    }

    /// Stop timing `phase` and log how long it took
    pub fn end_timing(&mut self, phase: &str) -> Option<Duration> {
        let Some(started) = self.started.remove(phase) else {
            self.logger.warn(&format!("no timer running for phase '{}'", phase)).log();
            return None;
        };

        let elapsed = started.elapsed();
        self.active.retain(|p| p != phase);

        let elapsed_ms = elapsed.as_secs_f64() * 1000.0;
        self.logger
            .debug(&format!("{} took {:.3}ms", phase, elapsed_ms))
            .field("phase", phase)
            .field("elapsed_ms", elapsed_ms)
            .log();

        Some(elapsed)
    }

    pub fn log_extraction(&self, report: &ExtractionReport) {
        self.logger
            .info(&format!(
                "extracted {} latencies from {} lines ({:.1}% matched)",
                report.series.len(),
                report.lines_read,
                report.match_rate()
            ))
            .extraction(report)
            .log();
    }

    pub fn log_render(&self, outcome: &RenderOutcome) {
        self.logger
            .info(&format!("plot written to {}", outcome.output_path.display()))
            .field("output", outcome.output_path.display().to_string())
            .field("labels_drawn", outcome.labels_drawn())
            .field("font", outcome.font.as_ref().map(|p| p.display().to_string()))
            .log();
    }

    /// Phases started but not yet ended, in start order
    pub fn active_operations(&self) -> &[String] {
        &self.active
    }
}

/// Logs failures and degraded steps
pub struct ErrorEventLogger {
    logger: Logger,
}

impl ErrorEventLogger {
    pub fn new(config: &Config) -> Self {
        Self {
            logger: Logger::with_config("ERR".to_string(), config),
        }
    }

    pub fn log_error(&self, error: &AppError, context: Option<&str>, correlation_id: Option<&str>) {
        let message = match context {
            Some(ctx) => format!("{}: {}", ctx, error),
            None => error.to_string(),
        };

        let mut builder = self.logger.error(&message).error_info(error);
        if let Some(id) = correlation_id {
            builder = builder.correlation_id(id);
        }
        builder.log();
    }

    /// A step that still succeeded, but in a reduced form
    pub fn log_fallback(&self, component: &str, reason: &str, correlation_id: Option<&str>) {
        let mut builder = self
            .logger
            .warn(&format!("{}: {}", component, reason))
            .field("fallback", component);
        if let Some(id) = correlation_id {
            builder = builder.correlation_id(id);
        }
        builder.log();
    }
}

/// Hands out loggers that share one session
pub struct LoggerFactory {
    config: Config,
    session_id: String,
    context: SharedContext,
}

impl LoggerFactory {
    pub fn new(config: Config) -> Self {
        let session_id = Uuid::new_v4().to_string();
        let context = SharedContext::default();
        if let Ok(mut shared) = context.write() {
            shared.session_id = Some(session_id.clone());
        }

        Self {
            config,
            session_id,
            context,
        }
    }

    pub fn create_logger(&self, component: &str) -> Logger {
        Logger::in_session(component.to_string(), &self.config, Arc::clone(&self.context))
    }

    pub fn create_performance_logger(&self) -> PerformanceLogger {
        PerformanceLogger::with_logger(self.create_logger("PERF"))
    }

    pub fn create_error_logger(&self) -> ErrorEventLogger {
        ErrorEventLogger {
            logger: self.create_logger("ERR"),
        }
    }

    pub fn session_id(&self) -> &str {
        &self.session_id
    }
}

#[doc(hidden)]
#[macro_export]
macro_rules! __log_at {
    ($method:ident, $logger:expr, $($arg:tt)*) => {
        $logger
            .$method(&format!($($arg)*))
            .location(file!(), line!(), Some(module_path!()))
            .log()
    };
}

/// Log at debug level with the call site attached
#[macro_export]
macro_rules! log_debug {
    ($logger:expr, $($arg:tt)*) => { $crate::__log_at!(debug, $logger, $($arg)*) };
}

#[macro_export]
macro_rules! log_info {
    ($logger:expr, $($arg:tt)*) => { $crate::__log_at!(info, $logger, $($arg)*) };
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::LatencyMeasurement;
    use std::path::PathBuf;

    fn json_logger() -> Logger {
        let mut logger = Logger::new("TEST".to_string());
        logger.set_format(LogFormat::Json);
        logger
    }

    fn parse(line: &str) -> serde_json::Value {
        serde_json::from_str(line).unwrap()
    }

    #[test]
    fn test_level_parsing_and_order() {
        assert_eq!("DEBUG".parse::<LogLevel>().unwrap(), LogLevel::Debug);
        assert_eq!("warning".parse::<LogLevel>().unwrap(), LogLevel::Warn);
        assert!("loud".parse::<LogLevel>().is_err());

        assert!(LogLevel::Trace < LogLevel::Debug);
        assert!(LogLevel::Warn < LogLevel::Error);
        assert!(LogLevel::Error < LogLevel::Fatal);
    }

    #[test]
    fn test_threshold_follows_flags() {
        assert_eq!(LogLevel::for_config(&Config::default()), LogLevel::Warn);
        assert_eq!(LogLevel::for_config(&Config { verbose: true, ..Config::default() }), LogLevel::Info);
        assert_eq!(
            LogLevel::for_config(&Config { verbose: true, debug: true, ..Config::default() }),
            LogLevel::Debug
        );

        let debug = Logger::with_config("T".to_string(), &Config { debug: true, ..Config::default() });
        assert_eq!(debug.format, LogFormat::Json);
        assert!(debug.with_location);
    }

    #[test]
    fn test_entries_below_threshold_are_dropped() {
        let mut logger = json_logger();
        logger.set_level(LogLevel::Error);

        assert!(!logger.would_log(LogLevel::Warn));
        assert!(logger.info("hidden").render().is_none());
        assert!(logger.fatal("shown").render().is_some());
    }

    #[test]
    fn test_json_entry_shape() {
        let logger = json_logger();
        let value = parse(&logger.warn("slow render").field("elapsed_ms", 12.5).render().unwrap());

        assert_eq!(value["level"], "WARN");
        assert_eq!(value["component"], "TEST");
        assert_eq!(value["message"], "slow render");
        assert_eq!(value["fields"]["elapsed_ms"], 12.5);
        assert!(value.get("correlation_id").is_none());
        assert!(value.get("location").is_none());
    }

    #[test]
    fn test_console_line() {
        let mut logger = Logger::new("APP".to_string());
        logger.set_color(false);

        let line = logger
            .info("plot written")
            .correlation_id("0123456789abcdef")
            .field("width", 1000)
            .field("font", "DejaVuSans.ttf")
            .render()
            .unwrap();

        assert!(line.contains(" INFO [APP] plot written [01234567]"));
        assert!(line.ends_with(" font=\"DejaVuSans.ttf\" width=1000"));
    }

    #[test]
    fn test_location_only_in_debug() {
        let plain = Logger::new("T".to_string());
        let line = plain.info("x").location("src/app.rs", 7, None).render().unwrap();
        assert!(!line.contains("src/app.rs"));

        let mut debug = Logger::with_config("T".to_string(), &Config { debug: true, ..Config::default() });
        debug.set_format(LogFormat::Console);
        let line = debug.info("x").location("src/app.rs", 7, None).render().unwrap();
        assert!(line.ends_with("@ src/app.rs:7"));
    }

    #[test]
    fn test_operation_id_attached_until_end() {
        let logger = json_logger();
        let id = logger.start_operation("plot");

        let during = parse(&logger.info("reading").render().unwrap());
        assert_eq!(during["correlation_id"], id.as_str());

        logger.end_operation(&id, "plot", true);
        let after = parse(&logger.info("done").render().unwrap());
        assert!(after.get("correlation_id").is_none());
    }

    #[test]
    fn test_factory_loggers_share_session() {
        let factory = LoggerFactory::new(Config { verbose: true, ..Config::default() });
        let app = factory.create_logger("APP");
        let mut other = factory.create_logger("PLOT");
        other.set_format(LogFormat::Json);

        app.add_context_field("input".to_string(), "bench.log");
        let id = app.start_operation("plot");

        let value = parse(&other.info("from another component").render().unwrap());
        assert_eq!(value["fields"]["session_id"], factory.session_id());
        assert_eq!(value["fields"]["input"], "bench.log");
        assert_eq!(value["correlation_id"], id.as_str());
        assert_eq!(value["component"], "PLOT");
    }

    #[test]
    fn test_extraction_and_error_fields() {
        let logger = json_logger();
        let report = ExtractionReport {
            series: vec![
                LatencyMeasurement::from_micros(100, 1, PatternKind::Took),
                LatencyMeasurement::from_micros(200, 3, PatternKind::SemicolonSuffix),
                LatencyMeasurement::from_micros(300, 4, PatternKind::Took),
            ]
            .into_iter()
            .collect(),
            lines_read: 5,
        };

        let value = parse(&logger.info("extracted").extraction(&report).render().unwrap());
        assert_eq!(value["fields"]["measurements"], 3);
        assert_eq!(value["fields"]["skipped_lines"], 2);
        assert_eq!(value["fields"]["took_matches"], 2);
        assert_eq!(value["fields"]["suffix_matches"], 1);

        let error = AppError::empty_result("no lines matched");
        let value = parse(&logger.error("failed").error_info(&error).render().unwrap());
        assert_eq!(value["fields"]["error_category"], "EMPTY");
        assert_eq!(value["fields"]["exit_code"], 6);
    }

    #[test]
    fn test_phase_timing() {
        let mut perf = PerformanceLogger::new(&Config::default());

        perf.start_timing("extract");
        perf.start_timing("render");
        assert_eq!(perf.active_operations(), ["extract".to_string(), "render".to_string()]);

        assert!(perf.end_timing("extract").is_some());
        assert_eq!(perf.active_operations(), ["render".to_string()]);
        assert!(perf.end_timing("extract").is_none());
    }

    #[test]
    fn test_event_loggers_do_not_panic() {
        let factory = LoggerFactory::new(Config::default());
        let perf = factory.create_performance_logger();
        perf.log_render(&RenderOutcome {
            output_path: PathBuf::from("bench.log.png"),
            font: None,
            font_warning: Some("no system font found".to_string()),
        });

        let errors = factory.create_error_logger();
        errors.log_error(&AppError::io("cannot read bench.log"), Some("Reading input"), Some("abc"));
        errors.log_fallback("font", "no system font found", None);
    }

    #[test]
    fn test_entry_roundtrip_keeps_level_names() {
        let logger = json_logger();
        let line = logger.error("boom").render().unwrap();
        let entry: LogEntry = serde_json::from_str(&line).unwrap();
        assert_eq!(entry.level, LogLevel::Error);
        assert_eq!(entry.component, "TEST");
    }
}
