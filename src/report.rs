use crate::context::SenderTag;
use crate::scanner::AnalysisResult;
use crate::verdict::{classify, Verdict};
use serde::Serialize;
use std::fmt::Write;

const NO_WARNING_SIGNS: &str = "No major warning signs detected";
const BAR_WIDTH: usize = 20;

/// Everything the presentation layer shows for one analysis.
#[derive(Debug, Clone, Serialize)]
pub struct Report {
    pub sender: SenderTag,
    pub verdict: Verdict,
    pub result: AnalysisResult,
    pub text: String,
    pub warnings: Vec<String>,
}

impl Report {
    pub fn new(
        text: &str,
        sender: SenderTag,
        result: AnalysisResult,
        long_message_chars: usize,
    ) -> Self {
        let mut warnings = Vec::new();
        let chars = text.chars().count();
        if chars > long_message_chars {
            warnings.push(format!(
                "Message is {chars} characters long (over {long_message_chars})"
            ));
        }
        if result.is_fallback() {
            warnings.push("Analysis was incomplete; treat this verdict with caution".to_string());
        }

        Self {
            sender,
            verdict: classify(result.risk_score, sender),
            result,
            text: text.to_string(),
            warnings,
        }
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }

    pub fn render_text(&self) -> String {
        let mut out = String::new();
        let _ = writeln!(out, "{}  [{}]", self.verdict.label, self.verdict.icon);
        let _ = writeln!(
            out,
            "Risk score: {} {}%",
            score_bar(self.result.risk_score),
            self.result.risk_score
        );
        let _ = writeln!(out, "Confidence: {}%", self.result.confidence);
        let _ = writeln!(out, "Sender: {}", self.sender);
        out.push('\n');

        out.push_str("Warning signs:\n");
        if self.result.scam_reasons.is_empty() {
            let _ = writeln!(out, "  ✓ {NO_WARNING_SIGNS}");
        } else {
            for reason in &self.result.scam_reasons {
                let _ = writeln!(out, "  • {reason}");
            }
        }

        if !self.result.safe_reasons.is_empty() {
            out.push_str("Positive indicators:\n");
            for reason in &self.result.safe_reasons {
                let _ = writeln!(out, "  • {reason}");
            }
        }
        out.push('\n');

        out.push_str("Safety tips:\n");
        for tip in &self.verdict.guidance {
            let _ = writeln!(out, "  • {tip}");
        }

        for warning in &self.warnings {
            let _ = writeln!(out, "\n⚠️  {warning}");
        }

        let _ = write!(out, "\nAnalyzed message:\n{}\n", self.text);
        out
    }
}

fn score_bar(score: u8) -> String {
    let filled = usize::from(score) * BAR_WIDTH / 100;
    format!("[{}{}]", "█".repeat(filled), "░".repeat(BAR_WIDTH - filled))
}
