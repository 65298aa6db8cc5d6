//! Type definitions and aliases

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

// Re-export commonly used types
pub use crate::error::{AppError, Result};

/// Line formats a latency value can be recognised from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PatternKind {
    /// `... took <N> us ...`
    Took,
    /// `field;field;<N>` at end of line
    SemicolonSuffix,
}

impl PatternKind {
    /// Get a short name for this pattern
    pub fn name(&self) -> &'static str {
        match self {
            PatternKind::Took => "took",
            PatternKind::SemicolonSuffix => "semicolon-suffix",
        }
    }
}

impl fmt::Display for PatternKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Output format for the latency summary
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SummaryFormat {
    /// Human-readable table
    #[default]
    Text,
    /// Single JSON document
    Json,
}

impl FromStr for SummaryFormat {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "text" | "table" => Ok(SummaryFormat::Text),
            "json" => Ok(SummaryFormat::Json),
            _ => Err(AppError::parse(format!("Invalid summary format '{}' (expected text or json)", s))),
        }
    }
}

impl fmt::Display for SummaryFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SummaryFormat::Text => f.write_str("text"),
            SummaryFormat::Json => f.write_str("json"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pattern_names() {
        assert_eq!(PatternKind::Took.to_string(), "took");
        assert_eq!(PatternKind::SemicolonSuffix.to_string(), "semicolon-suffix");
    }

    #[test]
    fn test_summary_format_parsing() {
        assert_eq!("text".parse::<SummaryFormat>().unwrap(), SummaryFormat::Text);
        assert_eq!("JSON".parse::<SummaryFormat>().unwrap(), SummaryFormat::Json);
        assert_eq!("table".parse::<SummaryFormat>().unwrap(), SummaryFormat::Text);
        assert!("yaml".parse::<SummaryFormat>().is_err());
    }

    #[test]
    fn test_pattern_kind_serialization() {
        let json = serde_json::to_string(&PatternKind::SemicolonSuffix).unwrap();
        assert_eq!(json, "\"semicolon_suffix\"");
    }
}
