//! Error types for the scanner

use crate::rules::RuleCategory;
use thiserror::Error;

/// Failure to obtain a usable rule set. Fatal to the current attempt.
#[derive(Error, Debug)]
pub enum RuleLoadError {
    /// Local asset could not be read
    #[error("failed to read rule asset {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// Transport failure while fetching a remote asset
    #[error("failed to fetch rule asset: {0}")]
    Http(#[from] reqwest::Error),

    /// Remote asset answered with a non-success status
    #[error("rule asset request returned status {0}")]
    Status(u16),

    /// Fetch did not complete within the configured timeout
    #[error("rule asset fetch timed out after {0}s")]
    Timeout(u64),

    /// Asset URL could not be parsed
    #[error("invalid rule asset url '{url}': {source}")]
    InvalidUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },

    /// Not valid JSON, or missing `scam_patterns` / `safe_patterns`
    #[error("malformed rule asset: {0}")]
    Malformed(#[from] serde_json::Error),
}

/// A single rule whose pattern does not compile. Recovered by skipping the rule.
#[derive(Error, Debug, Clone)]
#[error("{category} rule #{index} has invalid pattern '{pattern}': {source}")]
pub struct PatternCompileError {
    pub category: RuleCategory,
    pub index: usize,
    pub pattern: String,
    #[source]
    pub source: regex::Error,
}

/// Unexpected failure inside matching or scoring. Never reaches callers of
/// `Scanner::analyze`; it is converted to the fallback result.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum AnalysisFault {
    #[error("analysis panicked: {0}")]
    Panicked(String),
}

/// Caller-side input validation, done before the core runs.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum InputError {
    #[error("message text is empty")]
    EmptyMessage,

    #[error("sender must be selected")]
    EmptySender,

    #[error("unknown sender '{0}' (expected one of: unknown, whatsapp_group, friend, family, official, social_media)")]
    UnknownSender(String),

    #[error("screenshot '{0}' not found")]
    ScreenshotMissing(String),

    #[error("screenshot '{0}' is not a supported image type")]
    ScreenshotType(String),
}
