//! Error handling for the latency CDF plotter

use thiserror::Error;

/// Custom error types for the latency CDF plotter
#[derive(Error, Debug)]
pub enum AppError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// Validation errors
    #[error("Validation error: {0}")]
    Validation(String),

    /// I/O errors (input log, output image)
    #[error("I/O error: {0}")]
    Io(String),

    /// Parsing errors (CLI values, JSON, etc.)
    #[error("Parsing error: {0}")]
    Parse(String),

    /// No latency measurement could be extracted from the input
    #[error("Empty result: {0}")]
    EmptyResult(String),

    /// Plot rendering errors
    #[error("Render error: {0}")]
    Render(String),

    /// Generic internal errors
    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    /// Create a new configuration error
    pub fn config<S: Into<String>>(message: S) -> Self {
        Self::Config(message.into())
    }

    /// Create a new validation error
    pub fn validation<S: Into<String>>(message: S) -> Self {
        Self::Validation(message.into())
    }

    /// Create a new I/O error
    pub fn io<S: Into<String>>(message: S) -> Self {
        Self::Io(message.into())
    }

    /// Create a new parsing error
    pub fn parse<S: Into<String>>(message: S) -> Self {
        Self::Parse(message.into())
    }

    /// Create a new empty result error
    pub fn empty_result<S: Into<String>>(message: S) -> Self {
        Self::EmptyResult(message.into())
    }

    /// Create a new render error
    pub fn render<S: Into<String>>(message: S) -> Self {
        Self::Render(message.into())
    }

    /// Create a new internal error
    pub fn internal<S: Into<String>>(message: S) -> Self {
        Self::Internal(message.into())
    }

    /// Rewrite the message, keeping the variant
    fn map_message(self, f: impl FnOnce(String) -> String) -> Self {
        match self {
            Self::Config(msg) => Self::Config(f(msg)),
            Self::Validation(msg) => Self::Validation(f(msg)),
            Self::Io(msg) => Self::Io(f(msg)),
            Self::Parse(msg) => Self::Parse(f(msg)),
            Self::EmptyResult(msg) => Self::EmptyResult(f(msg)),
            Self::Render(msg) => Self::Render(f(msg)),
            Self::Internal(msg) => Self::Internal(f(msg)),
        }
    }

    /// Get error category for logging and reporting
    pub fn category(&self) -> &'static str {
        match self {
            Self::Config(_) => "CONFIG",
            Self::Validation(_) => "VALIDATION",
            Self::Io(_) => "IO",
            Self::Parse(_) => "PARSE",
            Self::EmptyResult(_) => "EMPTY",
            Self::Render(_) => "RENDER",
            Self::Internal(_) => "INTERNAL",
        }
    }

    /// Get user-friendly error message with suggestions
    pub fn user_friendly_message(&self) -> String {
        match self {
            Self::Config(msg) => {
                format!("Configuration problem: {}\n\nSuggestion: Check your command line arguments (see --help).", msg)
            }
            Self::Validation(msg) => {
                format!("Invalid input: {}\n\nSuggestion: Check the image size, title and output path values.", msg)
            }
            Self::Io(msg) => {
                format!("File operation failed: {}\n\nSuggestion: Check that the log file exists, is readable, and that the output directory is writable.", msg)
            }
            Self::Parse(msg) => {
                format!("Failed to parse data: {}\n\nSuggestion: Check the format of your command line values.", msg)
            }
            Self::EmptyResult(msg) => {
                format!("No latency data: {}\n\nSuggestion: The log needs lines like 'request took 1234 us' or lines ending in ';1234'. See --help-topic patterns.", msg)
            }
            Self::Render(msg) => {
                format!("Plot rendering failed: {}\n\nSuggestion: Try a different image size or font with --width/--height/--font.", msg)
            }
            Self::Internal(msg) => {
                format!("Internal error: {}\n\nThis is likely a bug. Please report this issue with the error details.", msg)
            }
        }
    }

    /// Get exit code for this error type
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::Config(_) | Self::Validation(_) | Self::Parse(_) => 1,  // Invalid configuration/usage
            Self::Io(_) => 5,
            Self::EmptyResult(_) => 6,
            Self::Render(_) => 7,
            Self::Internal(_) => 99,
        }
    }

    /// Format error for console display with color coding
    pub fn format_for_console(&self, use_color: bool) -> String {
        let category = self.category();
        let message = self.to_string();

        if use_color {
            use colored::Colorize;
            match self {
                Self::Config(_) | Self::Validation(_) | Self::Parse(_) => {
                    format!("[{}] {}", category.red().bold(), message.red())
                }
                Self::EmptyResult(_) => {
                    format!("[{}] {}", category.yellow().bold(), message.yellow())
                }
                Self::Io(_) | Self::Render(_) => {
                    format!("[{}] {}", category.cyan().bold(), message.cyan())
                }
                Self::Internal(_) => {
                    format!("[{}] {}", category.bright_red().bold(), message.bright_red())
                }
            }
        } else {
            format!("[{}] {}", category, message)
        }
    }
}

impl From<std::io::Error> for AppError {
    fn from(error: std::io::Error) -> Self {
        Self::io(error.to_string())
    }
}

impl From<serde_json::Error> for AppError {
    fn from(error: serde_json::Error) -> Self {
        Self::parse(format!("JSON parse error: {}", error))
    }
}

impl From<anyhow::Error> for AppError {
    fn from(error: anyhow::Error) -> Self {
        // `{:#}` keeps the whole context chain on one line
        Self::internal(format!("{:#}", error))
    }
}

/// Custom Result type for the application
pub type Result<T> = std::result::Result<T, AppError>;

/// Error context trait for adding context to errors
pub trait ErrorContext<T> {
    /// Add context to an error, keeping its category
    fn with_context<F>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> String;

    /// Add static context to an error
    fn context(self, message: &'static str) -> Result<T>;
}

impl<T, E> ErrorContext<T> for std::result::Result<T, E>
where
    E: Into<AppError>,
{
    fn with_context<F>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> String,
    {
        self.map_err(|e| {
            let context = f();
            let error: AppError = e.into();
            error.map_message(|msg| format!("{}: {}", context, msg))
        })
    }

    fn context(self, message: &'static str) -> Result<T> {
        self.with_context(|| message.to_string())
    }
}

/// Error reporter for user feedback on stderr
pub struct ErrorReporter {
    pub use_color: bool,
    pub verbose: bool,
}

impl ErrorReporter {
    /// Create a new error reporter
    pub fn new(use_color: bool, verbose: bool) -> Self {
        Self { use_color, verbose }
    }

    /// Render the report for an error without printing it
    pub fn format_report(&self, error: &AppError) -> String {
        let mut report = error.format_for_console(self.use_color);
        if self.verbose {
            report.push_str("\n\n");
            report.push_str(&error.user_friendly_message());
        }
        report
    }

    /// Report an error to the user
    pub fn report_error(&self, error: &AppError) {
        eprintln!("{}", self.format_report(error));
    }
}

impl Default for ErrorReporter {
    fn default() -> Self {
        Self::new(true, false)
    }
}
