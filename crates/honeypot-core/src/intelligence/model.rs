//! Extracted intelligence types.

use crate::catalog::EntityKind;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use strum::Display;

/// Entity kinds the strategy engine actively prompts for, in preference order.
pub const TARGETABLE_KINDS: [EntityKind; 4] = [
    EntityKind::UpiId,
    EntityKind::BankAccount,
    EntityKind::PhoneNumber,
    EntityKind::PhishingLink,
];

/// Aggregate of normalized artifacts harvested from counterpart text.
///
/// Every set only ever grows: merging never removes a value, and inserting a
/// value already present leaves the set unchanged.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExtractedIntelligence {
    pub bank_accounts: BTreeSet<String>,
    pub ifsc_codes: BTreeSet<String>,
    pub upi_ids: BTreeSet<String>,
    pub phishing_links: BTreeSet<String>,
    pub phone_numbers: BTreeSet<String>,
    pub suspicious_keywords: BTreeSet<String>,
}

impl ExtractedIntelligence {
    /// Merges `other` into `self`. Returns true if any set grew.
    pub fn merge(&mut self, other: &ExtractedIntelligence) -> bool {
        let before = self.total();
        self.bank_accounts.extend(other.bank_accounts.iter().cloned());
        self.ifsc_codes.extend(other.ifsc_codes.iter().cloned());
        self.upi_ids.extend(other.upi_ids.iter().cloned());
        self.phishing_links.extend(other.phishing_links.iter().cloned());
        self.phone_numbers.extend(other.phone_numbers.iter().cloned());
        self.suspicious_keywords
            .extend(other.suspicious_keywords.iter().cloned());
        self.total() > before
    }

    /// True if any actionable artifact has been captured. Keywords alone do
    /// not count.
    pub fn has_intelligence(&self) -> bool {
        TARGETABLE_KINDS
            .iter()
            .chain(std::iter::once(&EntityKind::IfscCode))
            .any(|kind| self.contains(*kind))
    }

    pub fn contains(&self, kind: EntityKind) -> bool {
        !self.values(kind).is_empty()
    }

    pub fn values(&self, kind: EntityKind) -> &BTreeSet<String> {
        match kind {
            EntityKind::BankAccount => &self.bank_accounts,
            EntityKind::IfscCode => &self.ifsc_codes,
            EntityKind::UpiId => &self.upi_ids,
            EntityKind::PhoneNumber => &self.phone_numbers,
            EntityKind::PhishingLink => &self.phishing_links,
        }
    }

    pub(crate) fn values_mut(&mut self, kind: EntityKind) -> &mut BTreeSet<String> {
        match kind {
            EntityKind::BankAccount => &mut self.bank_accounts,
            EntityKind::IfscCode => &mut self.ifsc_codes,
            EntityKind::UpiId => &mut self.upi_ids,
            EntityKind::PhoneNumber => &mut self.phone_numbers,
            EntityKind::PhishingLink => &mut self.phishing_links,
        }
    }

    /// Targetable kinds with no captured value yet.
    pub fn missing_kinds(&self) -> Vec<EntityKind> {
        TARGETABLE_KINDS
            .iter()
            .copied()
            .filter(|kind| !self.contains(*kind))
            .collect()
    }

    pub fn is_empty(&self) -> bool {
        self.total() == 0
    }

    /// Short human summary, e.g. `"1 UPI ID(s), 1 phone number(s)"`.
    pub fn summary(&self) -> String {
        let parts: Vec<String> = [
            (self.bank_accounts.len(), "bank account(s)"),
            (self.ifsc_codes.len(), "IFSC code(s)"),
            (self.upi_ids.len(), "UPI ID(s)"),
            (self.phone_numbers.len(), "phone number(s)"),
            (self.phishing_links.len(), "suspicious link(s)"),
        ]
        .into_iter()
        .filter(|(count, _)| *count > 0)
        .map(|(count, label)| format!("{} {}", count, label))
        .collect();

        if parts.is_empty() {
            "no actionable intelligence".to_string()
        } else {
            parts.join(", ")
        }
    }

    fn total(&self) -> usize {
        self.bank_accounts.len()
            + self.ifsc_codes.len()
            + self.upi_ids.len()
            + self.phishing_links.len()
            + self.phone_numbers.len()
            + self.suspicious_keywords.len()
    }
}

/// Why a retained link looks malicious.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, Display,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum LinkFlag {
    SuspiciousTld,
    Shortener,
    LookalikeDomain,
    CredentialKeyword,
}

/// Result of extracting one message.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Extraction {
    pub intelligence: ExtractedIntelligence,
    /// Flags per retained link.
    pub link_flags: BTreeMap<String, BTreeSet<LinkFlag>>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn with_upi(value: &str) -> ExtractedIntelligence {
        let mut intel = ExtractedIntelligence::default();
        intel.upi_ids.insert(value.to_string());
        intel
    }

    #[test]
    fn test_merge_is_monotone() {
        let mut aggregate = with_upi("winner@paytm");
        assert!(!aggregate.merge(&with_upi("winner@paytm")));
        assert_eq!(aggregate.upi_ids.len(), 1);

        assert!(aggregate.merge(&with_upi("other@ybl")));
        assert_eq!(aggregate.upi_ids.len(), 2);

        assert!(!aggregate.merge(&ExtractedIntelligence::default()));
        assert_eq!(aggregate.upi_ids.len(), 2);
    }

    #[test]
    fn test_keywords_are_not_actionable() {
        let mut intel = ExtractedIntelligence::default();
        intel.suspicious_keywords.insert("urgent".into());
        assert!(!intel.has_intelligence());
        assert!(!intel.is_empty());

        intel.ifsc_codes.insert("SBIN0001234".into());
        assert!(intel.has_intelligence());
    }

    #[test]
    fn test_missing_kinds() {
        let mut intel = with_upi("winner@paytm");
        intel.phone_numbers.insert("+919876543210".into());
        assert_eq!(
            intel.missing_kinds(),
            vec![EntityKind::BankAccount, EntityKind::PhishingLink]
        );
    }

    #[test]
    fn test_summary() {
        let mut intel = with_upi("winner@paytm");
        intel.phone_numbers.insert("+919876543210".into());
        assert_eq!(intel.summary(), "1 UPI ID(s), 1 phone number(s)");
        assert_eq!(
            ExtractedIntelligence::default().summary(),
            "no actionable intelligence"
        );
    }

    #[test]
    fn test_camel_case_wire_names() {
        let json = serde_json::to_value(with_upi("winner@paytm")).unwrap();
        assert_eq!(json["upiIds"][0], "winner@paytm");
        assert!(json.get("suspiciousKeywords").is_some());
        assert!(json.get("phishingLinks").is_some());
    }
}
