use crate::context::SenderTag;
use crate::error::{AnalysisFault, PatternCompileError};
use crate::matcher::PatternMatcher;
use crate::rules::RuleSet;
use crate::scoring;
use serde::Serialize;
use std::panic::{self, AssertUnwindSafe};

pub const FALLBACK_RISK_SCORE: u8 = 50;
pub const FALLBACK_CONFIDENCE: u8 = 25;
pub const FALLBACK_REASON: &str = "Unable to complete full analysis - please verify manually";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AnalysisKind {
    Complete,
    /// Matching or scoring failed; the values are the fixed fallback
    Fallback,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AnalysisResult {
    pub kind: AnalysisKind,
    pub risk_score: u8,
    pub confidence: u8,
    pub scam_reasons: Vec<String>,
    pub safe_reasons: Vec<String>,
}

impl AnalysisResult {
    pub fn fallback() -> Self {
        Self {
            kind: AnalysisKind::Fallback,
            risk_score: FALLBACK_RISK_SCORE,
            confidence: FALLBACK_CONFIDENCE,
            scam_reasons: vec![FALLBACK_REASON.to_string()],
            safe_reasons: Vec::new(),
        }
    }

    pub fn is_fallback(&self) -> bool {
        self.kind == AnalysisKind::Fallback
    }
}

/// A loaded rule set with its patterns compiled, ready to score messages.
///
/// Immutable after construction, so one scanner can be shared across threads.
pub struct Scanner {
    rules: RuleSet,
    matcher: PatternMatcher,
}

impl Scanner {
    pub fn new(rules: RuleSet) -> Self {
        let matcher = PatternMatcher::new(&rules);
        Self { rules, matcher }
    }

    pub fn rules(&self) -> &RuleSet {
        &self.rules
    }

    pub fn skipped_rules(&self) -> &[PatternCompileError] {
        self.matcher.skipped()
    }

    /// Rules that compiled and take part in matching
    pub fn active_rules(&self) -> usize {
        self.matcher.active_rules()
    }

    /// Score a message. Always returns a result; internal faults produce
    /// `AnalysisResult::fallback()`.
    pub fn analyze(&self, text: &str, sender: SenderTag) -> AnalysisResult {
        recover(|| self.run(text, sender))
    }

    pub fn try_analyze(&self, text: &str, sender: SenderTag) -> Result<AnalysisResult, AnalysisFault> {
        catch_fault(|| self.run(text, sender))
    }

    fn run(&self, text: &str, sender: SenderTag) -> AnalysisResult {
        let matches = self.matcher.match_text(text);
        let score = scoring::score(&matches, sender, text);

        log::debug!(
            "Analyzed {} chars from {sender}: risk {} confidence {} ({} scam, {} safe reasons)",
            text.chars().count(),
            score.risk_score,
            score.confidence,
            matches.scam_reasons.len(),
            matches.safe_reasons.len()
        );

        AnalysisResult {
            kind: AnalysisKind::Complete,
            risk_score: score.risk_score,
            confidence: score.confidence,
            scam_reasons: matches.scam_reasons,
            safe_reasons: matches.safe_reasons,
        }
    }
}

fn catch_fault(f: impl FnOnce() -> AnalysisResult) -> Result<AnalysisResult, AnalysisFault> {
    panic::catch_unwind(AssertUnwindSafe(f)).map_err(|payload| {
        let message = payload
            .downcast_ref::<&str>()
            .map(|s| s.to_string())
            .or_else(|| payload.downcast_ref::<String>().cloned())
            .unwrap_or_else(|| "unknown panic".to_string());
        AnalysisFault::Panicked(message)
    })
}

fn recover(f: impl FnOnce() -> AnalysisResult) -> AnalysisResult {
    match catch_fault(f) {
        Ok(result) => result,
        Err(e) => {
            log::warn!("Falling back to manual-verification result: {e}");
            AnalysisResult::fallback()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rules::RulePattern;
    use crate::verdict::{classify, VerdictTier};
    use std::sync::Arc;

    fn pattern(pattern: &str, reason: &str) -> RulePattern {
        RulePattern {
            pattern: pattern.to_string(),
            reason: reason.to_string(),
        }
    }

    fn test_rules() -> RuleSet {
        RuleSet::new(
            vec![
                pattern(r"\b(pin|otp|password)\b", "Requests credentials"),
                pattern(r"\b(urgent|now|suspend(ed)?)\b", "Creates urgency"),
                pattern(r"\b(mpesa|send money)\b", "Requests money"),
                pattern(r"\bsend money\b", "Requests money"),
            ],
            vec![pattern(r"\b(lunch|dinner)\b", "Everyday plans")],
        )
    }

    fn scanner() -> Scanner {
        Scanner::new(test_rules())
    }

    #[test]
    fn test_scenario_credential_and_urgency() {
        let text = "Send your OTP now or your account will be suspended";
        let result = scanner().analyze(text, SenderTag::Unknown);

        assert_eq!(result.kind, AnalysisKind::Complete);
        assert!(result.scam_reasons.len() >= 2);
        assert!(result.scam_reasons.contains(&"Requests credentials".to_string()));
        assert!(result.scam_reasons.contains(&"Creates urgency".to_string()));
        assert!(result.risk_score >= 70);
        assert_eq!(VerdictTier::classify(result.risk_score), VerdictTier::HighRisk);
    }

    #[test]
    fn test_scenario_friend_lunch() {
        let text = "Hey, are we still meeting for lunch?";
        let result = scanner().analyze(text, SenderTag::Friend);

        assert!(result.scam_reasons.is_empty());
        assert!(result.risk_score < 40);
        let verdict = classify(result.risk_score, SenderTag::Friend);
        assert_eq!(verdict.tier, VerdictTier::LowRisk);
        assert!(verdict.guidance.iter().any(|tip| tip.contains("trusted contact")));
    }

    #[test]
    fn test_scenario_neutral_unknown_sender() {
        let result = scanner().analyze("Please see the attached report", SenderTag::Unknown);

        assert!(result.scam_reasons.is_empty());
        assert!(result.safe_reasons.is_empty());
        assert_eq!(result.risk_score, 50);
        assert_eq!(VerdictTier::classify(result.risk_score), VerdictTier::MediumRisk);
    }

    #[test]
    fn test_scenario_kenyan_terms_from_unknown_sender() {
        // mpesa, ksh and safaricom are Kenyan terms; "send money" is the scam match
        let text = "Send money to my Safaricom line, ksh 2000 via mpesa. This is a long enough message body.";
        let scanner = scanner();
        let matches = scanner.matcher.match_text(text);
        assert_eq!(matches.scam_reasons, vec!["Requests money"]);

        let breakdown = scoring::breakdown(&matches, SenderTag::Unknown, text);
        assert_eq!(breakdown.base, 65 + 8);
        assert_eq!(breakdown.sender_adjustment, 20);
        assert_eq!(breakdown.locale_boost, 15);
        assert_eq!(breakdown.raw_risk, 73 + 20 + 15);

        let result = scanner.analyze(text, SenderTag::Unknown);
        assert_eq!(result.risk_score, 100);
    }

    #[test]
    fn test_malformed_asset_fails_before_scoring() {
        let err = RuleSet::from_json_str(r#"{"scam_patterns": []}"#).unwrap_err();
        assert!(matches!(err, crate::error::RuleLoadError::Malformed(_)));
    }

    #[test]
    fn test_duplicate_reason_appears_once() {
        let result = scanner().analyze("please send money today", SenderTag::Unspecified);
        assert_eq!(result.scam_reasons, vec!["Requests money"]);
        // two rules hit: confidence counts both
        assert_eq!(result.confidence, 50 + 30 + 10);
    }

    #[test]
    fn test_deterministic() {
        let scanner = scanner();
        let text = "URGENT: your PIN is needed, send money via mpesa";
        let first = scanner.analyze(text, SenderTag::WhatsappGroup);
        for _ in 0..5 {
            assert_eq!(scanner.analyze(text, SenderTag::WhatsappGroup), first);
        }
    }

    #[test]
    fn test_family_never_scores_above_unknown() {
        let scanner = scanner();
        for text in [
            "send your pin",
            "Urgent! send money now via mpesa, password required",
            "otp please, dinner later",
        ] {
            let family = scanner.analyze(text, SenderTag::Family);
            let unknown = scanner.analyze(text, SenderTag::Unknown);
            assert!(family.risk_score <= unknown.risk_score, "{text}");
        }
    }

    #[test]
    fn test_bounds_hold_for_extreme_inputs() {
        let scanner = scanner();
        let long_scam = "urgent pin otp password send money mpesa ksh safaricom tuma haraka ".repeat(40);
        for (text, sender) in [
            ("", SenderTag::Family),
            ("lunch dinner", SenderTag::Family),
            (long_scam.as_str(), SenderTag::Unknown),
        ] {
            let result = scanner.analyze(text, sender);
            assert!(result.risk_score <= 100);
            assert!(result.confidence <= 100);
        }
        assert_eq!(scanner.analyze(&long_scam, SenderTag::Unknown).risk_score, 100);
    }

    #[test]
    fn test_fallback_result() {
        let fallback = AnalysisResult::fallback();
        assert!(fallback.is_fallback());
        assert_eq!(fallback.risk_score, 50);
        assert_eq!(fallback.confidence, 25);
        assert_eq!(fallback.scam_reasons, vec![FALLBACK_REASON]);
        assert!(fallback.safe_reasons.is_empty());
    }

    #[test]
    fn test_panic_during_analysis_yields_fallback() {
        let result = recover(|| panic!("matcher blew up"));
        assert_eq!(result, AnalysisResult::fallback());
        assert_eq!(result.kind, AnalysisKind::Fallback);
        assert_eq!(result.risk_score, FALLBACK_RISK_SCORE);
        assert_eq!(result.confidence, FALLBACK_CONFIDENCE);
        assert_eq!(result.scam_reasons, vec![FALLBACK_REASON]);
    }

    #[test]
    fn test_panic_payload_is_kept() {
        let err = catch_fault(|| panic!("static message")).unwrap_err();
        assert_eq!(err, AnalysisFault::Panicked("static message".to_string()));

        let index = 7;
        let err = catch_fault(|| panic!("rule {index} failed")).unwrap_err();
        assert_eq!(err, AnalysisFault::Panicked("rule 7 failed".to_string()));

        let err = catch_fault(|| std::panic::panic_any(42_u32)).unwrap_err();
        assert_eq!(err, AnalysisFault::Panicked("unknown panic".to_string()));
    }

    #[test]
    fn test_recover_passes_complete_results_through() {
        let scanner = scanner();
        let expected = scanner.try_analyze("send your pin", SenderTag::Unknown).unwrap();
        let result = recover(|| scanner.run("send your pin", SenderTag::Unknown));
        assert_eq!(result, expected);
        assert_eq!(result.kind, AnalysisKind::Complete);
    }

    #[test]
    fn test_invalid_rule_does_not_abort_analysis() {
        let rules = RuleSet::new(
            vec![pattern("(broken", "Broken"), pattern("otp", "Requests credentials")],
            vec![],
        );
        let scanner = Scanner::new(rules);
        assert_eq!(scanner.skipped_rules().len(), 1);
        assert_eq!(scanner.active_rules(), 1);

        let result = scanner.analyze("send otp", SenderTag::Unknown);
        assert_eq!(result.kind, AnalysisKind::Complete);
        assert_eq!(result.scam_reasons, vec!["Requests credentials"]);
    }

    #[test]
    fn test_shared_across_threads() {
        let scanner = Arc::new(scanner());
        let expected = scanner.analyze("send your pin now", SenderTag::Unknown);

        let handles: Vec<_> = (0..4)
            .map(|_| {
                let scanner = Arc::clone(&scanner);
                std::thread::spawn(move || scanner.analyze("send your pin now", SenderTag::Unknown))
            })
            .collect();

        for handle in handles {
            assert_eq!(handle.join().unwrap(), expected);
        }
    }

    #[test]
    fn test_embedded_rules_scenarios() {
        let scanner = Scanner::new(RuleSet::embedded().unwrap());
        assert!(scanner.skipped_rules().is_empty());

        let scam = scanner.analyze(
            "Send your OTP now or your account will be suspended",
            SenderTag::Unknown,
        );
        assert!(scam.scam_reasons.len() >= 2);
        assert!(scam.risk_score >= 70);

        let chat = scanner.analyze("Hey, are we still meeting for lunch?", SenderTag::Friend);
        assert!(chat.scam_reasons.is_empty());
        assert!(chat.risk_score < 40);
    }
}
