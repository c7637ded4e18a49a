use crate::context::SenderTag;
use serde::{Deserialize, Serialize};

pub const HIGH_RISK_THRESHOLD: u8 = 70;
pub const MEDIUM_RISK_THRESHOLD: u8 = 40;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum VerdictTier {
    LowRisk,
    MediumRisk,
    HighRisk,
}

impl VerdictTier {
    pub fn classify(risk_score: u8) -> Self {
        match risk_score {
            score if score >= HIGH_RISK_THRESHOLD => VerdictTier::HighRisk,
            score if score >= MEDIUM_RISK_THRESHOLD => VerdictTier::MediumRisk,
            _ => VerdictTier::LowRisk,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            VerdictTier::HighRisk => "🚨 HIGH RISK - Likely Scam",
            VerdictTier::MediumRisk => "⚠️ MEDIUM RISK - Be Cautious",
            VerdictTier::LowRisk => "✅ LOW RISK - Appears Safe",
        }
    }

    pub fn icon(&self) -> &'static str {
        match self {
            VerdictTier::HighRisk => "alert-octagon",
            VerdictTier::MediumRisk => "alert-triangle",
            VerdictTier::LowRisk => "check-circle",
        }
    }

    /// Safety tips for this tier. Only the low-risk wording depends on the sender.
    pub fn guidance(&self, sender: SenderTag) -> Vec<&'static str> {
        match self {
            VerdictTier::HighRisk => vec![
                "Never share your PIN, OTP or password with anyone",
                "Do not click links or send money in response to this message",
                "Contact the organization directly through official channels",
                "Report this message to your provider or the authorities",
            ],
            VerdictTier::MediumRisk => vec![
                "Verify the sender through an official channel before acting",
                "Be cautious with any request for money or personal details",
                "Double-check all links before clicking",
                "Trust your instincts",
            ],
            VerdictTier::LowRisk if sender.is_trusted_contact() => vec![
                "Message from a trusted contact appears legitimate",
                "If they ask for money unexpectedly, call them to confirm it is really them",
                "Accounts of trusted contacts can be hijacked, so stay alert",
            ],
            VerdictTier::LowRisk => vec![
                "Message appears legitimate",
                "Still verify the sender if unsure",
                "Always practice safe online habits",
                "Report any suspicious activity",
            ],
        }
    }
}

/// Tier plus the presentation strings chosen for it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Verdict {
    pub tier: VerdictTier,
    pub label: &'static str,
    pub icon: &'static str,
    pub guidance: Vec<&'static str>,
}

pub fn classify(risk_score: u8, sender: SenderTag) -> Verdict {
    let tier = VerdictTier::classify(risk_score);
    Verdict {
        tier,
        label: tier.label(),
        icon: tier.icon(),
        guidance: tier.guidance(sender),
    }
}
