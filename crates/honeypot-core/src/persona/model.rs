//! Persona domain model.

use crate::catalog::{EntityKind, ScamCategory};
use serde::{Deserialize, Serialize};
use std::fmt;
use strum::Display;

/// Behavioral profile the honeypot adopts for a session.
///
/// Assigned at first engagement and never changed afterwards.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum Persona {
    Confused,
    Cooperative,
    Skeptical,
    Curious,
}

impl Persona {
    /// Fallback assignment order for categories without a dedicated persona.
    pub const FALLBACK_ORDER: [Persona; 4] = [
        Persona::Confused,
        Persona::Cooperative,
        Persona::Skeptical,
        Persona::Curious,
    ];

    /// The persona assigned when a session first engages on `category`.
    pub fn for_category(category: ScamCategory) -> Self {
        match category {
            ScamCategory::BankFraud => Persona::Skeptical,
            ScamCategory::UpiFraud => Persona::Confused,
            ScamCategory::FakeOffer => Persona::Curious,
            ScamCategory::Phishing => Persona::Cooperative,
            ScamCategory::OtpHarvesting | ScamCategory::Unknown => Self::FALLBACK_ORDER[0],
        }
    }

    /// One-line description of the profile, used in agent notes.
    pub fn describe(self) -> &'static str {
        match self {
            Persona::Confused => "a hesitant, easily confused account holder",
            Persona::Cooperative => "an eager, compliant account holder",
            Persona::Skeptical => "a wary account holder who asks for proof",
            Persona::Curious => "an excited, inquisitive recipient",
        }
    }

    /// Whether this persona naturally leans towards `strategy`.
    pub fn has_affinity(self, strategy: StrategyClass) -> bool {
        matches!(
            (self, strategy),
            (Persona::Confused, StrategyClass::Stall)
                | (Persona::Cooperative, StrategyClass::TargetedExtraction(_))
                | (Persona::Cooperative, StrategyClass::AskClarifyingQuestion)
                | (Persona::Skeptical, StrategyClass::RequestProof)
                | (Persona::Curious, StrategyClass::AskClarifyingQuestion)
        )
    }
}

/// Kind of reply produced on an engaged turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "class", content = "target")]
pub enum StrategyClass {
    Stall,
    ExpressConcern,
    RequestProof,
    AskClarifyingQuestion,
    TargetedExtraction(EntityKind),
}

impl StrategyClass {
    /// The non-targeted classes, in a fixed order.
    pub const GENERAL: [StrategyClass; 4] = [
        StrategyClass::AskClarifyingQuestion,
        StrategyClass::Stall,
        StrategyClass::ExpressConcern,
        StrategyClass::RequestProof,
    ];

    /// True if both values are the same class, ignoring any target kind.
    pub fn same_class(self, other: StrategyClass) -> bool {
        std::mem::discriminant(&self) == std::mem::discriminant(&other)
    }

    pub fn target(self) -> Option<EntityKind> {
        match self {
            StrategyClass::TargetedExtraction(kind) => Some(kind),
            _ => None,
        }
    }
}

impl fmt::Display for StrategyClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StrategyClass::Stall => write!(f, "stall"),
            StrategyClass::ExpressConcern => write!(f, "express_concern"),
            StrategyClass::RequestProof => write!(f, "request_proof"),
            StrategyClass::AskClarifyingQuestion => write!(f, "ask_clarifying_question"),
            StrategyClass::TargetedExtraction(kind) => write!(f, "targeted_extraction({})", kind),
        }
    }
}
