use crate::error::RuleLoadError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;
use std::time::Duration;
use url::Url;

/// Rule asset shipped with the binary
const EMBEDDED_RULES: &str = include_str!("../rules/default_rules.json");

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RuleCategory {
    Scam,
    Safe,
}

impl fmt::Display for RuleCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RuleCategory::Scam => write!(f, "scam"),
            RuleCategory::Safe => write!(f, "safe"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RulePattern {
    pub pattern: String,
    pub reason: String,
}

/// A pattern-to-reason mapping together with the collection it came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rule {
    pub pattern: String,
    pub reason: String,
    pub category: RuleCategory,
}

/// On-disk/over-the-wire layout of the rule asset.
#[derive(Debug, Deserialize)]
struct RuleAsset {
    #[serde(default)]
    version: Option<String>,
    scam_patterns: Vec<RulePattern>,
    safe_patterns: Vec<RulePattern>,
}

/// Immutable, ordered collection of scam- and safe-indicating rules.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuleSet {
    version: Option<String>,
    scam_patterns: Vec<Rule>,
    safe_patterns: Vec<Rule>,
}

impl RuleSet {
    pub fn new(scam_patterns: Vec<RulePattern>, safe_patterns: Vec<RulePattern>) -> Self {
        let tag = |category: RuleCategory| {
            move |p: RulePattern| Rule {
                pattern: p.pattern,
                reason: p.reason,
                category,
            }
        };

        Self {
            version: None,
            scam_patterns: scam_patterns
                .into_iter()
                .map(tag(RuleCategory::Scam))
                .collect(),
            safe_patterns: safe_patterns
                .into_iter()
                .map(tag(RuleCategory::Safe))
                .collect(),
        }
    }

    pub fn from_json_str(content: &str) -> Result<Self, RuleLoadError> {
        let asset: RuleAsset = serde_json::from_str(content)?;
        let mut rules = Self::new(asset.scam_patterns, asset.safe_patterns);
        rules.version = asset.version;
        Ok(rules)
    }

    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, RuleLoadError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| RuleLoadError::Io {
            path: path.display().to_string(),
            source,
        })?;
        let rules = Self::from_json_str(&content)?;
        rules.log_loaded(&path.display().to_string());
        Ok(rules)
    }

    /// Fetch the asset over HTTP. The whole request, body included, is bounded by
    /// `timeout`; expiry always surfaces as `RuleLoadError::Timeout`.
    pub async fn fetch(url: &str, timeout: Duration) -> Result<Self, RuleLoadError> {
        let parsed = Url::parse(url).map_err(|source| RuleLoadError::InvalidUrl {
            url: url.to_string(),
            source,
        })?;

        log::debug!("Fetching rule asset from {parsed}");
        let client = reqwest::Client::new();

        let body = tokio::time::timeout(timeout, async {
            let response = client.get(parsed.clone()).send().await?;
            let status = response.status();
            if !status.is_success() {
                return Err(RuleLoadError::Status(status.as_u16()));
            }
            Ok::<_, RuleLoadError>(response.text().await?)
        })
        .await
        .map_err(|_| RuleLoadError::Timeout(timeout.as_secs()))??;

        let rules = Self::from_json_str(&body)?;
        rules.log_loaded(parsed.as_str());
        Ok(rules)
    }

    /// The rule asset compiled into the binary.
    pub fn embedded() -> Result<Self, RuleLoadError> {
        let rules = Self::from_json_str(EMBEDDED_RULES)?;
        rules.log_loaded("embedded asset");
        Ok(rules)
    }

    fn log_loaded(&self, origin: &str) {
        log::info!(
            "Loaded rule set {} from {}: {} scam patterns, {} safe patterns",
            self.version.as_deref().unwrap_or("(unversioned)"),
            origin,
            self.scam_patterns.len(),
            self.safe_patterns.len()
        );
    }

    pub fn version(&self) -> Option<&str> {
        self.version.as_deref()
    }

    pub fn scam_patterns(&self) -> &[Rule] {
        &self.scam_patterns
    }

    pub fn safe_patterns(&self) -> &[Rule] {
        &self.safe_patterns
    }

    pub fn len(&self) -> usize {
        self.scam_patterns.len() + self.safe_patterns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Where a rule set comes from. Loaded once per session; the caller keeps the result.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RuleSource {
    Embedded,
    File(String),
    Url { url: String, timeout: Duration },
}

impl RuleSource {
    pub async fn load(&self) -> Result<RuleSet, RuleLoadError> {
        match self {
            RuleSource::Embedded => RuleSet::embedded(),
            RuleSource::File(path) => RuleSet::from_file(path),
            RuleSource::Url { url, timeout } => RuleSet::fetch(url, *timeout).await,
        }
    }
}

impl fmt::Display for RuleSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RuleSource::Embedded => write!(f, "embedded rules"),
            RuleSource::File(path) => write!(f, "{path}"),
            RuleSource::Url { url, .. } => write!(f, "{url}"),
        }
    }
}
