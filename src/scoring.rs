use crate::context::{context_adjustment, SenderTag};
use crate::matcher::{normalize, MatchResult};
use lazy_static::lazy_static;
use regex::{Regex, RegexBuilder};

/// Words that add weight to a message already flagged by a scam rule
pub const HIGH_RISK_WORDS: &[&str] = &["pin", "otp", "password", "urgent", "winner", "claim"];

lazy_static! {
    static ref HIGH_RISK_WORD: Regex =
        RegexBuilder::new(&format!(r"\b({})\b", HIGH_RISK_WORDS.join("|")))
            .case_insensitive(true)
            .build()
            .expect("high-risk word list is a valid alternation");
}

const SCAM_BASE: i32 = 65;
const SCAM_REASON_WEIGHT: i32 = 8;
const HIGH_RISK_WORD_WEIGHT: i32 = 5;
const SAFE_BASE: i32 = 25;
const SAFE_REASON_WEIGHT: i32 = 4;
const SAFE_FLOOR: i32 = 5;
const NEUTRAL_BASE: i32 = 30;

const SHORT_MESSAGE_CHARS: usize = 20;
const SHORT_MESSAGE_BONUS: i32 = 10;
const LONG_MESSAGE_CHARS: usize = 500;
const LONG_MESSAGE_BONUS: i32 = 5;

const CONFIDENCE_BASE: i32 = 50;
const CONFIDENCE_PER_HIT: i32 = 15;
const CONFIDENCE_HIT_CAP: i32 = 40;
const DETAILED_MESSAGE_CHARS: usize = 100;
const DETAILED_MESSAGE_BONUS: i32 = 10;
const SIGNAL_BONUS: i32 = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Score {
    pub risk_score: u8,
    pub confidence: u8,
}

/// Intermediate values behind a `Score`, kept for debug logging and tests.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ScoreBreakdown {
    pub base: i32,
    pub high_risk_words: usize,
    pub length_bonus: i32,
    pub sender_adjustment: i32,
    pub locale_boost: i32,
    pub raw_risk: i32,
    pub raw_confidence: i32,
}

impl ScoreBreakdown {
    pub fn score(&self) -> Score {
        Score {
            risk_score: clamp_percent(self.raw_risk),
            confidence: clamp_percent(self.raw_confidence),
        }
    }
}

pub fn clamp_percent(value: i32) -> u8 {
    value.clamp(0, 100) as u8
}

/// Whitespace tokens of the normalized text containing a high-risk word on
/// word boundaries (`pin:1234`, `otp/pin`). Each token counts at most once.
pub fn count_high_risk_words(text: &str) -> usize {
    normalize(text)
        .split_whitespace()
        .filter(|token| HIGH_RISK_WORD.is_match(token))
        .count()
}

fn base_score(matches: &MatchResult, text: &str, breakdown: &mut ScoreBreakdown) -> i32 {
    let scam = matches.scam_reasons.len() as i32;
    let safe = matches.safe_reasons.len() as i32;

    if scam > 0 {
        breakdown.high_risk_words = count_high_risk_words(text);
        SCAM_BASE + SCAM_REASON_WEIGHT * scam
            + HIGH_RISK_WORD_WEIGHT * breakdown.high_risk_words as i32
    } else if safe > 0 {
        (SAFE_BASE - SAFE_REASON_WEIGHT * safe).max(SAFE_FLOOR)
    } else {
        NEUTRAL_BASE
    }
}

fn length_bonus(matches: &MatchResult, length: usize) -> i32 {
    if !matches.has_scam_signal() {
        return 0;
    }
    let mut bonus = 0;
    if length < SHORT_MESSAGE_CHARS {
        bonus += SHORT_MESSAGE_BONUS;
    }
    if length > LONG_MESSAGE_CHARS {
        bonus += LONG_MESSAGE_BONUS;
    }
    bonus
}

fn confidence(matches: &MatchResult, length: usize) -> i32 {
    let hits = matches.total_rule_hits() as i32;
    let mut confidence =
        CONFIDENCE_BASE + CONFIDENCE_PER_HIT.saturating_mul(hits).min(CONFIDENCE_HIT_CAP);

    if hits > 0 {
        if length > DETAILED_MESSAGE_CHARS {
            confidence += DETAILED_MESSAGE_BONUS;
        }
        confidence += SIGNAL_BONUS;
    }
    confidence
}

pub fn breakdown(matches: &MatchResult, sender: SenderTag, text: &str) -> ScoreBreakdown {
    let length = normalize(text).chars().count();
    let mut breakdown = ScoreBreakdown::default();

    let base = base_score(matches, text, &mut breakdown);
    breakdown.base = base;
    breakdown.length_bonus = length_bonus(matches, length);

    let context = context_adjustment(text, sender);
    breakdown.sender_adjustment = context.sender;
    breakdown.locale_boost = context.locale;

    breakdown.raw_risk = breakdown.base + breakdown.length_bonus + context.total();
    breakdown.raw_confidence = confidence(matches, length);
    breakdown
}

/// Risk score and confidence, both clamped to [0, 100].
pub fn score(matches: &MatchResult, sender: SenderTag, text: &str) -> Score {
    let breakdown = breakdown(matches, sender, text);
    log::debug!("Score breakdown for sender {sender}: {breakdown:?}");
    breakdown.score()
}
