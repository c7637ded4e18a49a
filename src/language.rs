/// Kenyan mobile-money, lending and statutory-fund vocabulary
pub const KENYAN_FINANCIAL_TERMS: &[&str] = &[
    "mpesa",
    "m-pesa",
    "safaricom",
    "airtel money",
    "ksh",
    "shillings",
    "loan approved",
    "crb",
    "hustler fund",
    "helb",
    "nssf",
    "nhif",
];

/// Swahili words common in money and urgency requests
pub const SWAHILI_FINANCIAL_TERMS: &[&str] = &[
    "tuma", "pesa", "haraka", "sasa", "leo", "mkopo", "riba", "malipo",
];

/// Counts of locale-specific vocabulary found in a message.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LocaleHits {
    pub kenyan: usize,
    pub swahili: usize,
}

pub struct LocaleDetector;

impl LocaleDetector {
    /// Plain substring matching on lower-cased text; each listed term counts once.
    /// Repeats of a term are not counted, so "mpesa mpesa mpesa" is one Kenyan hit.
    pub fn detect(text: &str) -> LocaleHits {
        let text_lower = text.to_lowercase();
        LocaleHits {
            kenyan: Self::count_terms(&text_lower, KENYAN_FINANCIAL_TERMS),
            swahili: Self::count_terms(&text_lower, SWAHILI_FINANCIAL_TERMS),
        }
    }

    fn count_terms(text_lower: &str, terms: &[&str]) -> usize {
        terms.iter().filter(|term| text_lower.contains(*term)).count()
    }
}
