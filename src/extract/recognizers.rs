//! Line recognizers for the supported latency log formats

use crate::types::PatternKind;

const TOOK_MARKER: &str = "took";
const MICROS_MARKER: &str = "us";

/// Recognizes one textual latency format and yields the raw microsecond count
pub trait LineRecognizer {
    /// Which pattern this recognizer implements
    fn kind(&self) -> PatternKind;

    /// Extract the latency in microseconds, or `None` if the line does not match
    fn recognize(&self, line: &str) -> Option<u64>;
}

/// Matches `... took <N> us ...`
///
/// Only the text between the first `took` and the next `us` after it is
/// considered. It must be whitespace, digits, whitespace; anything else
/// (`took 50us`, `took abc us`, a missing `us`) is a non-match.
#[derive(Debug, Default, Clone, Copy)]
pub struct TookRecognizer;

impl LineRecognizer for TookRecognizer {
    fn kind(&self) -> PatternKind {
        PatternKind::Took
    }

    fn recognize(&self, line: &str) -> Option<u64> {
        let (_, after_took) = line.split_once(TOOK_MARKER)?;
        let (segment, _) = after_took.split_once(MICROS_MARKER)?;

        if !segment.starts_with(char::is_whitespace) || !segment.ends_with(char::is_whitespace) {
            return None;
        }

        parse_micros(segment.trim())
    }
}

/// Matches lines ending in `;<digits>`, taking the last `;`-separated field
#[derive(Debug, Default, Clone, Copy)]
pub struct SemicolonSuffixRecognizer;

impl LineRecognizer for SemicolonSuffixRecognizer {
    fn kind(&self) -> PatternKind {
        PatternKind::SemicolonSuffix
    }

    fn recognize(&self, line: &str) -> Option<u64> {
        let (_, last) = line.rsplit_once(';')?;
        parse_micros(last)
    }
}

/// Parse an unsigned decimal microsecond count; overflow is a non-match
fn parse_micros(digits: &str) -> Option<u64> {
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    digits.parse::<u64>().ok()
}
