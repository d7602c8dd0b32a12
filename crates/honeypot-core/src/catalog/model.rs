//! Pattern catalog domain model.
//!
//! The catalog is compiled once at startup from static rule specs and is then
//! shared read-only (behind an `Arc`) by the detector and the extractor.

use crate::error::{HoneypotError, Result};
use regex::{Regex, RegexBuilder};
use serde::{Deserialize, Serialize};
use strum::Display;

/// Enumerated solicitation tactic a conversation is classified into.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Serialize,
    Deserialize,
    Default,
    Display,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum ScamCategory {
    UpiFraud,
    BankFraud,
    Phishing,
    FakeOffer,
    OtpHarvesting,
    #[default]
    Unknown,
}

impl ScamCategory {
    /// Tie-break order for category selection, most preferred first.
    pub const SELECTION_PRIORITY: [ScamCategory; 5] = [
        ScamCategory::UpiFraud,
        ScamCategory::BankFraud,
        ScamCategory::Phishing,
        ScamCategory::FakeOffer,
        ScamCategory::OtpHarvesting,
    ];

    /// Position in [`Self::SELECTION_PRIORITY`]; `Unknown` sorts last.
    pub fn priority(self) -> usize {
        Self::SELECTION_PRIORITY
            .iter()
            .position(|c| *c == self)
            .unwrap_or(Self::SELECTION_PRIORITY.len())
    }

    /// Human-readable description used in agent notes.
    pub fn describe(self) -> &'static str {
        match self {
            ScamCategory::UpiFraud => "UPI payment fraud",
            ScamCategory::BankFraud => "bank account fraud",
            ScamCategory::Phishing => "phishing",
            ScamCategory::FakeOffer => "a fake prize or offer",
            ScamCategory::OtpHarvesting => "OTP/PIN harvesting",
            ScamCategory::Unknown => "an unclassified solicitation",
        }
    }
}

/// Kinds of actionable artifacts the extractor harvests.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Serialize,
    Deserialize,
    Display,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum EntityKind {
    BankAccount,
    IfscCode,
    UpiId,
    PhoneNumber,
    PhishingLink,
}

/// Declarative form of a detection indicator.
#[derive(Debug, Clone, Copy)]
pub struct IndicatorSpec {
    /// Human term reported as a suspicious keyword when this indicator fires.
    pub label: &'static str,
    pub pattern: &'static str,
    pub weight: f64,
    pub critical: bool,
}

/// Declarative form of an indicator group.
#[derive(Debug, Clone, Copy)]
pub struct GroupSpec {
    pub name: &'static str,
    /// `None` for tactic-only groups (urgency, fee demands) that add
    /// confidence but never become the selected category.
    pub category: Option<ScamCategory>,
    /// Phrase describing the tactic in agent notes.
    pub tactic: &'static str,
    pub indicators: &'static [IndicatorSpec],
}

/// A compiled, weighted indicator.
#[derive(Debug, Clone)]
pub struct Indicator {
    pub label: String,
    pub weight: f64,
    pub critical: bool,
    pattern: Regex,
}

impl Indicator {
    pub fn is_match(&self, text: &str) -> bool {
        self.pattern.is_match(text)
    }

    /// The first fragment of `text` this indicator matches.
    pub fn find<'t>(&self, text: &'t str) -> Option<&'t str> {
        self.pattern.find(text).map(|m| m.as_str())
    }
}

/// A compiled group of indicators sharing a category.
#[derive(Debug, Clone)]
pub struct IndicatorGroup {
    pub name: String,
    pub category: Option<ScamCategory>,
    pub tactic: String,
    pub indicators: Vec<Indicator>,
}

/// Declarative form of the extraction rules.
#[derive(Debug, Clone, Copy)]
pub struct EntitySpec {
    pub bank_account_labelled: &'static [&'static str],
    pub bank_account_bare: &'static [&'static str],
    pub ifsc: &'static [&'static str],
    pub upi_generic: &'static [&'static str],
    pub upi_labelled: &'static [&'static str],
    pub phone: &'static [&'static str],
    pub phone_labelled: &'static [&'static str],
    pub link: &'static [&'static str],
    pub upi_providers: &'static [&'static str],
    pub legitimate_domains: &'static [&'static str],
    pub brand_tokens: &'static [&'static str],
    pub suspicious_tlds: &'static [&'static str],
    pub shorteners: &'static [&'static str],
    pub credential_keywords: &'static [&'static str],
    pub keyword_vocabulary: &'static [&'static str],
}

/// A curated vocabulary term with its compiled word-boundary matcher.
#[derive(Debug, Clone)]
pub struct VocabularyTerm {
    pub term: String,
    pattern: Regex,
}

impl VocabularyTerm {
    pub fn is_match(&self, text: &str) -> bool {
        self.pattern.is_match(text)
    }
}

/// Compiled extraction rules, keyed by entity kind.
#[derive(Debug, Clone)]
pub struct EntityRules {
    pub bank_account_labelled: Vec<Regex>,
    pub bank_account_bare: Vec<Regex>,
    pub ifsc: Vec<Regex>,
    pub upi_generic: Vec<Regex>,
    pub upi_labelled: Vec<Regex>,
    pub phone: Vec<Regex>,
    pub phone_labelled: Vec<Regex>,
    pub link: Vec<Regex>,
    pub upi_providers: Vec<String>,
    pub legitimate_domains: Vec<String>,
    pub brand_tokens: Vec<String>,
    pub suspicious_tlds: Vec<String>,
    pub shorteners: Vec<String>,
    pub credential_keywords: Vec<String>,
    pub vocabulary: Vec<VocabularyTerm>,
}

impl EntityRules {
    pub fn is_known_upi_provider(&self, provider: &str) -> bool {
        self.upi_providers.iter().any(|p| p == provider)
    }

    /// True if `host` is, or is a subdomain of, an allow-listed domain.
    pub fn is_legitimate_host(&self, host: &str) -> bool {
        self.legitimate_domains
            .iter()
            .any(|d| host == d || host.ends_with(&format!(".{}", d)))
    }
}

/// The immutable rule set shared by the detector and the extractor.
#[derive(Debug, Clone)]
pub struct PatternCatalog {
    groups: Vec<IndicatorGroup>,
    entities: EntityRules,
}

impl PatternCatalog {
    /// Compiles group and entity specs into a catalog.
    ///
    /// # Errors
    ///
    /// Returns a config error if any pattern fails to compile or a weight
    /// lies outside `(0, 1)`.
    pub fn compile(groups: &[GroupSpec], entities: &EntitySpec) -> Result<Self> {
        let mut compiled_groups = Vec::with_capacity(groups.len());
        for group in groups {
            let mut indicators = Vec::with_capacity(group.indicators.len());
            for spec in group.indicators {
                if !(spec.weight > 0.0 && spec.weight < 1.0) {
                    return Err(HoneypotError::config(format!(
                        "indicator '{}' in group '{}' has weight {} outside (0, 1)",
                        spec.label, group.name, spec.weight
                    )));
                }
                indicators.push(Indicator {
                    label: spec.label.to_string(),
                    weight: spec.weight,
                    critical: spec.critical,
                    pattern: case_insensitive(spec.pattern)?,
                });
            }
            compiled_groups.push(IndicatorGroup {
                name: group.name.to_string(),
                category: group.category,
                tactic: group.tactic.to_string(),
                indicators,
            });
        }

        let vocabulary = entities
            .keyword_vocabulary
            .iter()
            .map(|term| {
                Ok(VocabularyTerm {
                    term: term.to_string(),
                    pattern: case_insensitive(&format!(r"\b{}\b", regex::escape(term)))?,
                })
            })
            .collect::<Result<Vec<_>>>()?;

        let entity_rules = EntityRules {
            bank_account_labelled: compile_all(entities.bank_account_labelled)?,
            bank_account_bare: compile_all(entities.bank_account_bare)?,
            ifsc: compile_all(entities.ifsc)?,
            upi_generic: compile_all(entities.upi_generic)?,
            upi_labelled: compile_all(entities.upi_labelled)?,
            phone: compile_all(entities.phone)?,
            phone_labelled: compile_all(entities.phone_labelled)?,
            link: compile_all(entities.link)?,
            upi_providers: to_owned(entities.upi_providers),
            legitimate_domains: to_owned(entities.legitimate_domains),
            brand_tokens: to_owned(entities.brand_tokens),
            suspicious_tlds: to_owned(entities.suspicious_tlds),
            shorteners: to_owned(entities.shorteners),
            credential_keywords: to_owned(entities.credential_keywords),
            vocabulary,
        };

        Ok(Self {
            groups: compiled_groups,
            entities: entity_rules,
        })
    }

    pub fn groups(&self) -> &[IndicatorGroup] {
        &self.groups
    }

    pub fn entities(&self) -> &EntityRules {
        &self.entities
    }

    /// Finds a group by name.
    pub fn group(&self, name: &str) -> Option<&IndicatorGroup> {
        self.groups.iter().find(|g| g.name == name)
    }
}

fn case_insensitive(pattern: &str) -> Result<Regex> {
    Ok(RegexBuilder::new(pattern).case_insensitive(true).build()?)
}

fn compile_all(patterns: &[&str]) -> Result<Vec<Regex>> {
    patterns
        .iter()
        .map(|p| Regex::new(p).map_err(HoneypotError::from))
        .collect()
}

fn to_owned(values: &[&str]) -> Vec<String> {
    values.iter().map(|v| v.to_string()).collect()
}
