//! Configuration management module

pub mod parser;
pub mod validation;

pub use parser::{ConfigParser, load_config, display_config_summary};
pub use validation::{ConfigValidator, ValidationLevel, ValidationWarning, validate_config};

// Re-export from models for convenience
pub use crate::models::Config;
