use crate::rules::RuleSource;
use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::time::Duration;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScannerConfig {
    pub rules: RulesConfig,
    pub analysis: AnalysisConfig,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RulesConfig {
    /// Local rule asset (JSON)
    pub path: Option<String>,
    /// Remote rule asset, fetched once at startup
    pub url: Option<String>,
    pub fetch_timeout_seconds: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisConfig {
    /// Artificial pause before results are shown
    pub simulated_delay_ms: u64,
    /// Messages longer than this get a warning in the report
    pub long_message_chars: usize,
}

impl Default for RulesConfig {
    fn default() -> Self {
        Self {
            path: None,
            url: None,
            fetch_timeout_seconds: 10,
        }
    }
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            simulated_delay_ms: 0,
            long_message_chars: 1000,
        }
    }
}

impl ScannerConfig {
    pub fn from_file(path: &str) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read configuration file: {path}"))?;
        let config: ScannerConfig = serde_yaml::from_str(&content)
            .with_context(|| format!("Failed to parse configuration file: {path}"))?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_file(&self, path: &str) -> anyhow::Result<()> {
        let content = serde_yaml::to_string(self)?;
        std::fs::write(path, content)
            .with_context(|| format!("Failed to write configuration file: {path}"))?;
        Ok(())
    }

    pub fn validate(&self) -> anyhow::Result<()> {
        if self.rules.fetch_timeout_seconds == 0 {
            anyhow::bail!("rules.fetch_timeout_seconds must be greater than zero");
        }
        if self.rules.path.is_some() && self.rules.url.is_some() {
            anyhow::bail!("rules.path and rules.url are mutually exclusive");
        }
        Ok(())
    }

    pub fn fetch_timeout(&self) -> Duration {
        Duration::from_secs(self.rules.fetch_timeout_seconds)
    }

    /// Configured rule source; a remote url wins over a local path, and the
    /// embedded asset is used when neither is set.
    pub fn rule_source(&self) -> RuleSource {
        if let Some(url) = &self.rules.url {
            RuleSource::Url {
                url: url.clone(),
                timeout: self.fetch_timeout(),
            }
        } else if let Some(path) = &self.rules.path {
            RuleSource::File(path.clone())
        } else {
            RuleSource::Embedded
        }
    }
}
