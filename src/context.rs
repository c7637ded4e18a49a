use crate::error::InputError;
use crate::language::{LocaleDetector, LocaleHits};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Purported origin of a message, as selected by the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SenderTag {
    Unknown,
    WhatsappGroup,
    Friend,
    Family,
    Official,
    SocialMedia,
    #[default]
    #[serde(rename = "")]
    Unspecified,
}

impl SenderTag {
    pub const ALL: [SenderTag; 6] = [
        SenderTag::Unknown,
        SenderTag::WhatsappGroup,
        SenderTag::Friend,
        SenderTag::Family,
        SenderTag::Official,
        SenderTag::SocialMedia,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            SenderTag::Unknown => "unknown",
            SenderTag::WhatsappGroup => "whatsapp_group",
            SenderTag::Friend => "friend",
            SenderTag::Family => "family",
            SenderTag::Official => "official",
            SenderTag::SocialMedia => "social_media",
            SenderTag::Unspecified => "",
        }
    }

    /// Additive score adjustment for this sender
    pub fn adjustment(&self) -> i32 {
        match self {
            SenderTag::Friend => -20,
            SenderTag::Family => -25,
            SenderTag::Official => -10,
            SenderTag::Unknown => 20,
            SenderTag::WhatsappGroup => 10,
            SenderTag::SocialMedia => 5,
            SenderTag::Unspecified => 0,
        }
    }

    pub fn is_trusted_contact(&self) -> bool {
        matches!(self, SenderTag::Friend | SenderTag::Family)
    }
}

impl fmt::Display for SenderTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SenderTag::Unspecified => write!(f, "unspecified"),
            other => write!(f, "{}", other.as_str()),
        }
    }
}

impl FromStr for SenderTag {
    type Err = InputError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "" => Ok(SenderTag::Unspecified),
            "unknown" => Ok(SenderTag::Unknown),
            "whatsapp_group" => Ok(SenderTag::WhatsappGroup),
            "friend" => Ok(SenderTag::Friend),
            "family" => Ok(SenderTag::Family),
            "official" => Ok(SenderTag::Official),
            "social_media" => Ok(SenderTag::SocialMedia),
            other => Err(InputError::UnknownSender(other.to_string())),
        }
    }
}

/// Boost when many Kenyan financial terms arrive from an unknown sender
pub const KENYAN_UNKNOWN_SENDER_BOOST: i32 = 15;
/// Boost when Swahili and Kenyan financial vocabulary appear together
pub const SWAHILI_FINANCIAL_BOOST: i32 = 10;

/// Adjustments applied on top of the base score, before clamping.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ContextAdjustment {
    pub sender: i32,
    pub locale: i32,
    pub hits: LocaleHits,
}

impl ContextAdjustment {
    pub fn total(&self) -> i32 {
        self.sender + self.locale
    }
}

pub fn context_adjustment(text: &str, sender: SenderTag) -> ContextAdjustment {
    let hits = LocaleDetector::detect(text);
    let mut locale = 0;

    if hits.kenyan > 2 && sender == SenderTag::Unknown {
        locale += KENYAN_UNKNOWN_SENDER_BOOST;
    }
    if hits.swahili > 1 && hits.kenyan > 1 {
        locale += SWAHILI_FINANCIAL_BOOST;
    }

    ContextAdjustment {
        sender: sender.adjustment(),
        locale,
        hits,
    }
}

/// Base score with sender and locale adjustments applied. Unclamped.
pub fn apply_context(text: &str, sender: SenderTag, base_score: i32) -> i32 {
    base_score + context_adjustment(text, sender).total()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sender_table() {
        assert_eq!(apply_context("", SenderTag::Friend, 50), 30);
        assert_eq!(apply_context("", SenderTag::Family, 50), 25);
        assert_eq!(apply_context("", SenderTag::Official, 50), 40);
        assert_eq!(apply_context("", SenderTag::Unknown, 50), 70);
        assert_eq!(apply_context("", SenderTag::WhatsappGroup, 50), 60);
        assert_eq!(apply_context("", SenderTag::SocialMedia, 50), 55);
        assert_eq!(apply_context("", SenderTag::Unspecified, 50), 50);
    }

    #[test]
    fn test_parse_sender() {
        assert_eq!("whatsapp_group".parse::<SenderTag>(), Ok(SenderTag::WhatsappGroup));
        assert_eq!(" Family ".parse::<SenderTag>(), Ok(SenderTag::Family));
        assert_eq!("".parse::<SenderTag>(), Ok(SenderTag::Unspecified));
        assert_eq!(
            "stranger".parse::<SenderTag>(),
            Err(InputError::UnknownSender("stranger".to_string()))
        );
        for tag in SenderTag::ALL {
            assert_eq!(tag.as_str().parse::<SenderTag>(), Ok(tag));
        }
    }

    #[test]
    fn test_kenyan_boost_requires_unknown_sender() {
        let text = "mpesa ksh safaricom";
        let unknown = context_adjustment(text, SenderTag::Unknown);
        assert_eq!(unknown.locale, KENYAN_UNKNOWN_SENDER_BOOST);

        let group = context_adjustment(text, SenderTag::WhatsappGroup);
        assert_eq!(group.locale, 0);
    }

    #[test]
    fn test_kenyan_boost_needs_more_than_two_terms() {
        let adj = context_adjustment("mpesa ksh", SenderTag::Unknown);
        assert_eq!(adj.locale, 0);
    }

    #[test]
    fn test_boosts_are_cumulative() {
        // kenyan: mpesa, ksh, safaricom; swahili: tuma, haraka
        let adj = context_adjustment("Tuma mpesa ksh haraka to safaricom", SenderTag::Unknown);
        assert_eq!(adj.locale, KENYAN_UNKNOWN_SENDER_BOOST + SWAHILI_FINANCIAL_BOOST);
        assert_eq!(adj.total(), 20 + 25);
    }

    #[test]
    fn test_swahili_boost_independent_of_sender() {
        // kenyan: mpesa, ksh; swahili: tuma, pesa (inside "mpesa"), sasa
        let adj = context_adjustment("tuma mpesa ksh sasa", SenderTag::Friend);
        assert_eq!(adj.locale, SWAHILI_FINANCIAL_BOOST);
        assert_eq!(adj.total(), -20 + SWAHILI_FINANCIAL_BOOST);
    }

    #[test]
    fn test_trusted_contacts() {
        assert!(SenderTag::Friend.is_trusted_contact());
        assert!(SenderTag::Family.is_trusted_contact());
        assert!(!SenderTag::Official.is_trusted_contact());
    }
}
