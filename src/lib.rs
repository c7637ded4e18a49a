pub mod config;
pub mod context;
pub mod error;
pub mod input;
pub mod language;
pub mod matcher;
pub mod report;
pub mod rules;
pub mod scanner;
pub mod scoring;
pub mod verdict;

pub use config::ScannerConfig;
pub use context::SenderTag;
pub use error::{AnalysisFault, InputError, PatternCompileError, RuleLoadError};
pub use input::AnalysisInput;
pub use matcher::{MatchResult, PatternMatcher};
pub use report::Report;
pub use rules::{Rule, RuleCategory, RuleSet, RuleSource};
pub use scanner::{AnalysisKind, AnalysisResult, Scanner};
pub use verdict::{Verdict, VerdictTier};

/// Score `text` against an already-loaded rule set.
///
/// Compiles the rule set on every call; keep a `Scanner` around when
/// analyzing more than one message.
pub fn analyze(rules: &RuleSet, text: &str, sender: SenderTag) -> AnalysisResult {
    Scanner::new(rules.clone()).analyze(text, sender)
}
