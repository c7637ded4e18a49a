use crate::error::PatternCompileError;
use crate::rules::{Rule, RuleCategory, RuleSet};
use regex::{Regex, RegexBuilder};
use serde::Serialize;

/// Reasons produced by matching one message against a rule set.
///
/// Reason lists keep rule order and hold each reason once. The hit counts are
/// per matching rule, taken before deduplication.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct MatchResult {
    pub scam_reasons: Vec<String>,
    pub safe_reasons: Vec<String>,
    pub scam_rule_hits: usize,
    pub safe_rule_hits: usize,
}

impl MatchResult {
    pub fn total_rule_hits(&self) -> usize {
        self.scam_rule_hits + self.safe_rule_hits
    }

    pub fn has_scam_signal(&self) -> bool {
        !self.scam_reasons.is_empty()
    }

    fn record(&mut self, category: RuleCategory, reason: &str) {
        let (reasons, hits) = match category {
            RuleCategory::Scam => (&mut self.scam_reasons, &mut self.scam_rule_hits),
            RuleCategory::Safe => (&mut self.safe_reasons, &mut self.safe_rule_hits),
        };
        *hits += 1;
        if !reasons.iter().any(|r| r == reason) {
            reasons.push(reason.to_string());
        }
    }
}

struct CompiledRule {
    regex: Regex,
    reason: String,
    category: RuleCategory,
}

/// Rule set with every valid pattern compiled once.
pub struct PatternMatcher {
    scam_rules: Vec<CompiledRule>,
    safe_rules: Vec<CompiledRule>,
    skipped: Vec<PatternCompileError>,
}

impl PatternMatcher {
    pub fn new(rules: &RuleSet) -> Self {
        let mut skipped = Vec::new();
        let scam_rules = Self::compile_rules(rules.scam_patterns(), &mut skipped);
        let safe_rules = Self::compile_rules(rules.safe_patterns(), &mut skipped);

        log::debug!(
            "Compiled {} scam and {} safe patterns ({} skipped)",
            scam_rules.len(),
            safe_rules.len(),
            skipped.len()
        );

        Self {
            scam_rules,
            safe_rules,
            skipped,
        }
    }

    fn compile_rules(rules: &[Rule], skipped: &mut Vec<PatternCompileError>) -> Vec<CompiledRule> {
        let mut compiled = Vec::with_capacity(rules.len());
        for (index, rule) in rules.iter().enumerate() {
            match RegexBuilder::new(&rule.pattern)
                .case_insensitive(true)
                .build()
            {
                Ok(regex) => compiled.push(CompiledRule {
                    regex,
                    reason: rule.reason.clone(),
                    category: rule.category,
                }),
                Err(source) => {
                    let err = PatternCompileError {
                        category: rule.category,
                        index,
                        pattern: rule.pattern.clone(),
                        source,
                    };
                    log::warn!("Skipping rule: {err}");
                    skipped.push(err);
                }
            }
        }
        compiled
    }

    /// Rules dropped because their pattern did not compile
    pub fn skipped(&self) -> &[PatternCompileError] {
        &self.skipped
    }

    pub fn active_rules(&self) -> usize {
        self.scam_rules.len() + self.safe_rules.len()
    }

    pub fn match_text(&self, text: &str) -> MatchResult {
        let normalized = normalize(text);
        let mut result = MatchResult::default();

        for rule in self.scam_rules.iter().chain(self.safe_rules.iter()) {
            if rule.regex.is_match(&normalized) {
                log::debug!("Matched {} rule: {}", rule.category, rule.reason);
                result.record(rule.category, &rule.reason);
            }
        }

        result
    }
}

/// Trim and lower-case message text before matching
pub fn normalize(text: &str) -> String {
    text.trim().to_lowercase()
}
