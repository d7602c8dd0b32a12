//! Default rule set.
//!
//! Weights follow one convention: generic indicators sit between 0.15 and
//! 0.30, critical ones (direct requests for codes, card data, or approval of
//! a collect request) at 0.40 or above.

use super::model::{EntitySpec, GroupSpec, IndicatorSpec, PatternCatalog, ScamCategory};
use crate::error::Result;

const fn generic(label: &'static str, pattern: &'static str, weight: f64) -> IndicatorSpec {
    IndicatorSpec {
        label,
        pattern,
        weight,
        critical: false,
    }
}

const fn critical(label: &'static str, pattern: &'static str, weight: f64) -> IndicatorSpec {
    IndicatorSpec {
        label,
        pattern,
        weight,
        critical: true,
    }
}

const URGENCY: &[IndicatorSpec] = &[
    generic("blocked today", r"\bblocked\s*(?:today|now|immediately)\b", 0.25),
    generic("will be blocked", r"\bwill\s+be\s+(?:blocked|suspended|deactivated|closed)\b", 0.25),
    generic("urgent", r"\burgent(?:ly)?\b", 0.20),
    generic("immediately", r"\bimmediately\b", 0.15),
    generic("right now", r"\bright\s+now\b", 0.15),
    generic("hurry", r"\bhurry\b", 0.20),
    generic("expires soon", r"\bexpir(?:es|ing|y)\s+(?:today|soon|in\s+\d+)", 0.20),
    generic("last chance", r"\blast\s+chance\b", 0.20),
    generic("final notice", r"\bfinal\s+(?:notice|warning)\b", 0.20),
    generic("account suspended", r"\baccount\s+(?:is\s+|has\s+been\s+)?suspended\b", 0.25),
    generic("verify now", r"\bverify\s+(?:now|immediately|today)\b", 0.25),
];

const BANK_FRAUD: &[IndicatorSpec] = &[
    generic(
        "bank name",
        r"\b(?:sbi|hdfc|icici|axis|pnb|kotak|canara|union\s+bank|bank\s+of\s+baroda)\b",
        0.20,
    ),
    generic("bank account", r"\bbank\s+account\b", 0.20),
    generic("debit card", r"\b(?:debit|credit|atm)\s+card\b", 0.25),
    generic("kyc update", r"\bkyc\s*(?:update|verification|expired|pending)", 0.30),
    generic("account verification", r"\baccount\s+verification\b", 0.25),
    generic("suspicious activity", r"\b(?:suspicious|unusual)\s+(?:activity|transaction)", 0.25),
    generic("transaction failed", r"\btransaction\s+(?:failed|declined|on\s+hold)\b", 0.20),
    critical("card details", r"\b(?:card\s+number|cvv|expiry\s+date)\b", 0.45),
];

const UPI_FRAUD: &[IndicatorSpec] = &[
    generic("upi", r"\bupi\b", 0.20),
    generic("payment app", r"\b(?:paytm|phonepe|gpay|google\s+pay|bhim)\b", 0.20),
    generic("qr code", r"\bqr\s+code\b", 0.25),
    generic("collect request", r"\bcollect\s+request\b", 0.30),
    generic(
        "send money",
        r"\b(?:send|transfer|pay)\s+(?:the\s+)?(?:money|amount|fee|rs\.?|inr)",
        0.25,
    ),
    generic(
        "upi handle",
        r"@(?:paytm|phonepe|ybl|oksbi|okhdfcbank|okicici|okaxis|ibl|axl|upi)\b",
        0.30,
    ),
    critical(
        "approve request",
        r"\b(?:approve|accept)\s+(?:the\s+)?(?:payment\s+|collect\s+)?request\b",
        0.45,
    ),
];

const PHISHING: &[IndicatorSpec] = &[
    generic(
        "click link",
        r"\b(?:click|tap)\s+(?:here|on\s+(?:the\s+|this\s+)?link|the\s+link|this\s+link)",
        0.30,
    ),
    critical(
        "credential link",
        r"https?://\S*(?:verify|secure|login|update|kyc|confirm)",
        0.40,
    ),
    generic(
        "short link",
        r"\b(?:bit\.ly|tinyurl\.com|t\.co|short\.link|goo\.gl|cutt\.ly)/",
        0.30,
    ),
    generic("verify account", r"\bverify\s+(?:your\s+)?(?:account|identity|details)\b", 0.30),
    generic(
        "update details",
        r"\bupdate\s+(?:your\s+)?(?:kyc|details|information|address)\b",
        0.25,
    ),
    generic("login to", r"\blog\s*in\s+to\b", 0.20),
];

const FAKE_OFFER: &[IndicatorSpec] = &[
    generic("won prize money", r"\bwon\s+(?:rs\.?|₹|inr)?\s*[\d,]+", 0.30),
    generic("congratulations you won", r"\bcongratulations!*\s+you\s+(?:have\s+)?won\b", 0.30),
    generic("lucky draw", r"\blucky\s+(?:draw|winner|prize)\b", 0.30),
    generic("lottery", r"\blottery\b", 0.30),
    generic("cash prize", r"\bcash\s*(?:prize|back|reward)\b", 0.20),
    generic(
        "large amount",
        r"(?:\brs\.?|₹|\binr)\s*[\d,]+\s*(?:lakhs?|crores?|000)",
        0.20,
    ),
    generic("claim now", r"\bclaim\s+(?:your|the|now)\b", 0.25),
    generic("gift pending", r"\bgift\s+(?:is\s+)?(?:waiting|pending|ready)\b", 0.20),
];

const OTP_HARVESTING: &[IndicatorSpec] = &[
    generic("otp", r"\botp\b", 0.25),
    generic("pin", r"\b(?:upi\s+|atm\s+)?pin\b", 0.25),
    generic("one time password", r"\bone[-\s]?time[-\s]?password\b", 0.25),
    generic("verification code", r"\b(?:verification|security)\s+code\b", 0.25),
    critical(
        "share otp",
        r"\b(?:share|send|tell|give|provide|forward)\s+(?:me\s+|us\s+)?(?:your\s+|the\s+)?(?:otp|pin|code|password)\b",
        0.50,
    ),
    critical(
        "enter otp",
        r"\benter\s+(?:the\s+|your\s+)?(?:otp|pin|code|password)\b",
        0.45,
    ),
];

const SUSPICIOUS_TERMS: &[IndicatorSpec] = &[
    generic("processing fee", r"\bprocessing\s+(?:fee|charge)s?\b", 0.25),
    generic("advance payment", r"\badvance\s+(?:payment|fee)\b", 0.25),
    generic("gst charges", r"\bgst\s+(?:charges?|fee)\b", 0.20),
    generic("tax payment", r"\btax\s+payment\b", 0.15),
    generic("refund pending", r"\brefund\s+(?:is\s+)?(?:pending|processing|initiated)\b", 0.20),
    generic("insurance claim", r"\binsurance\s+claim\b", 0.15),
    generic("package delivery", r"\b(?:package|parcel)\s+delivery\b", 0.15),
    generic("customs duty", r"\bcustoms?\s+duty\b", 0.20),
];

/// Indicator groups of the default catalog.
pub const DEFAULT_GROUPS: &[GroupSpec] = &[
    GroupSpec {
        name: "urgency",
        category: None,
        tactic: "urgency framing",
        indicators: URGENCY,
    },
    GroupSpec {
        name: "bank_fraud",
        category: Some(ScamCategory::BankFraud),
        tactic: "impersonation of a financial institution",
        indicators: BANK_FRAUD,
    },
    GroupSpec {
        name: "upi_fraud",
        category: Some(ScamCategory::UpiFraud),
        tactic: "payment-identifier solicitation",
        indicators: UPI_FRAUD,
    },
    GroupSpec {
        name: "phishing",
        category: Some(ScamCategory::Phishing),
        tactic: "credential-phishing links",
        indicators: PHISHING,
    },
    GroupSpec {
        name: "fake_offer",
        category: Some(ScamCategory::FakeOffer),
        tactic: "fabricated prize or reward offers",
        indicators: FAKE_OFFER,
    },
    GroupSpec {
        name: "otp_harvesting",
        category: Some(ScamCategory::OtpHarvesting),
        tactic: "one-time-password harvesting",
        indicators: OTP_HARVESTING,
    },
    GroupSpec {
        name: "suspicious_terms",
        category: None,
        tactic: "advance-fee or processing-charge demands",
        indicators: SUSPICIOUS_TERMS,
    },
];

/// Extraction rules of the default catalog.
pub const DEFAULT_ENTITIES: EntitySpec = EntitySpec {
    bank_account_labelled: &[
        r"(?i)\b(?:account|a/c|acct)\.?\s*(?:number|no\.?|num)?\s*[:#-]?\s*(\d{9,18}|\d{2,6}(?:[\s-]\d{2,6})+)\b",
    ],
    bank_account_bare: &[r"\b\d{11,18}\b"],
    ifsc: &[
        r"\b([A-Z]{4}0[A-Z0-9]{6})\b",
        r"(?i)\bifsc(?:\s+code)?\s*[:-]?\s*([a-z]{4}0[a-z0-9]{6})\b",
    ],
    upi_generic: &[r"(?i)\b([a-z0-9][a-z0-9._-]{1,63})@([a-z][a-z0-9]{1,31})\b"],
    upi_labelled: &[r"(?i)\bupi(?:\s+id)?\s*[:-]?\s*([a-z0-9][a-z0-9._-]{1,63})@([a-z][a-z0-9]{1,31})\b"],
    phone: &[
        r"(?:\+91[\s-]?)?\b([6-9]\d{4}[\s-]?\d{5})\b",
        r"\b91([6-9]\d{9})\b",
        r"\b0([6-9]\d{9})\b",
    ],
    phone_labelled: &[
        r"(?i)\b(?:mobile|phone|contact|call|whatsapp)(?:\s+(?:no\.?|number|me|us))?\s*(?:at|on)?\s*[:-]?\s*(\+\d[\d\s-]{9,16}\d)",
    ],
    link: &[
        r#"(?i)\bhttps?://[^\s<>"'{}|\\^`\[\]]+"#,
        r#"(?i)\bwww\.[^\s<>"'{}|\\^`\[\]]+"#,
    ],
    upi_providers: &[
        "paytm", "phonepe", "ybl", "ibl", "axl", "upi", "apl", "oksbi", "okhdfcbank",
        "okicici", "okaxis", "airtel", "freecharge", "icici", "sbi", "hdfcbank", "axisbank",
        "kotak", "pnb", "barodampay", "jio", "waaxis", "wahdfcbank", "wasbi",
    ],
    legitimate_domains: &[
        "google.com",
        "gmail.com",
        "youtube.com",
        "facebook.com",
        "instagram.com",
        "twitter.com",
        "x.com",
        "linkedin.com",
        "whatsapp.com",
        "telegram.org",
        "amazon.in",
        "amazon.com",
        "flipkart.com",
        "paytm.com",
        "phonepe.com",
        "sbi.co.in",
        "onlinesbi.sbi",
        "hdfcbank.com",
        "icicibank.com",
        "axisbank.com",
        "pnbindia.in",
        "bankofbaroda.in",
        "rbi.org.in",
        "npci.org.in",
        "india.gov.in",
    ],
    brand_tokens: &[
        "sbi", "hdfc", "icici", "axis", "paytm", "phonepe", "amazon", "flipkart", "google",
        "rbi", "npci", "whatsapp",
    ],
    suspicious_tlds: &[
        ".tk", ".ml", ".ga", ".cf", ".gq", ".top", ".xyz", ".club", ".online", ".site",
        ".live", ".buzz",
    ],
    shorteners: &[
        "bit.ly",
        "tinyurl.com",
        "t.co",
        "short.link",
        "goo.gl",
        "cutt.ly",
        "rb.gy",
        "is.gd",
    ],
    credential_keywords: &["verify", "secure", "login", "update", "kyc", "confirm", "validate"],
    keyword_vocabulary: &[
        "account blocked",
        "verify now",
        "urgent",
        "immediately",
        "hurry up",
        "last chance",
        "expires today",
        "final notice",
        "suspended",
        "limited time",
        "act now",
        "kyc",
        "otp",
        "lottery",
        "processing fee",
        "refund",
    ],
};

/// Compiles the default catalog.
pub fn default_catalog() -> Result<PatternCatalog> {
    PatternCatalog::compile(DEFAULT_GROUPS, &DEFAULT_ENTITIES)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_default_catalog_compiles() {
        let catalog = default_catalog().expect("default patterns must compile");
        assert_eq!(catalog.groups().len(), DEFAULT_GROUPS.len());
        assert!(catalog.group("urgency").is_some());
        assert!(catalog.entities().is_known_upi_provider("paytm"));
    }

    #[test]
    fn test_indicator_labels_unique() {
        let mut seen = HashSet::new();
        for group in DEFAULT_GROUPS {
            for indicator in group.indicators {
                assert!(seen.insert(indicator.label), "duplicate label {}", indicator.label);
            }
        }
    }

    #[test]
    fn test_category_defaults_to_unknown() {
        assert_eq!(ScamCategory::default(), ScamCategory::Unknown);
        assert_eq!(ScamCategory::OtpHarvesting.to_string(), "otp_harvesting");
    }

    #[test]
    fn test_every_category_has_a_group() {
        for category in ScamCategory::SELECTION_PRIORITY {
            assert!(
                DEFAULT_GROUPS.iter().any(|g| g.category == Some(category)),
                "no group for {}",
                category
            );
        }
    }

    #[test]
    fn test_critical_indicators_outweigh_generic() {
        let max_generic = DEFAULT_GROUPS
            .iter()
            .flat_map(|g| g.indicators.iter())
            .filter(|i| !i.critical)
            .map(|i| i.weight)
            .fold(0.0, f64::max);
        for indicator in DEFAULT_GROUPS.iter().flat_map(|g| g.indicators.iter()) {
            if indicator.critical {
                assert!(indicator.weight > max_generic, "{}", indicator.label);
            }
        }
    }

    #[test]
    fn test_weights_follow_convention() {
        for indicator in DEFAULT_GROUPS.iter().flat_map(|g| g.indicators.iter()) {
            if indicator.critical {
                assert!(indicator.weight >= 0.40, "{}", indicator.label);
            } else {
                assert!(
                    (0.15..=0.30).contains(&indicator.weight),
                    "{} has weight {}",
                    indicator.label,
                    indicator.weight
                );
            }
        }
    }

    #[test]
    fn test_subdomain_of_legitimate_host() {
        let catalog = default_catalog().unwrap();
        let rules = catalog.entities();
        assert!(rules.is_legitimate_host("retail.onlinesbi.sbi"));
        assert!(rules.is_legitimate_host("sbi.co.in"));
        assert!(!rules.is_legitimate_host("sbi-verify-fake.com"));
    }
}
