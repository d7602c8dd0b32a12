//! Reply template presets.
//!
//! Templates are plain text. They never mention detection, never name a real
//! person or organization as the speaker, and never threaten the counterpart.

use super::model::{Persona, StrategyClass};
use crate::catalog::EntityKind;

/// Replies used while confidence is below the engagement threshold.
pub const NEUTRAL_REPLIES: &[&str] = &[
    "Sorry, who is this? What is this regarding?",
    "Hi, I think I missed something. Which account are you talking about?",
    "Sorry, I don't follow. Can you tell me what this is about?",
    "Who gave you my number? What is this message for?",
];

/// Replies once a session is complete. They wind the exchange down without
/// asking for anything.
pub const CLOSING_REPLIES: &[&str] = &[
    "Okay, I have to go now. I will check this later.",
    "My son is here, I will ask him to look at it. Bye for now.",
    "I am busy right now. I will get back to you.",
];

const CONFUSED_STALL: &[&str] = &[
    "Wait, wait. I am not good with these phone things. Give me a minute to find my glasses.",
    "One second please, someone is at the door. Don't go anywhere.",
    "Sorry, my phone is very slow today. Let me try to open the app again.",
];

const COOPERATIVE_STALL: &[&str] = &[
    "Okay, I am doing it. The app is still loading, please hold on.",
    "Just a moment, I am stepping out of a meeting so I can do this properly.",
];

const SKEPTICAL_STALL: &[&str] = &[
    "Hold on. I want to check my last statement before I do anything.",
    "Give me a few minutes, I need to look at my passbook first.",
];

const CURIOUS_STALL: &[&str] = &[
    "Really? Let me sit down for this. Give me a second.",
    "Wow, okay. My battery is low, let me plug in the charger first.",
];

const CONFUSED_CONCERN: &[&str] = &[
    "Oh no, I am getting worried now. Will I lose my money?",
    "This is making me nervous. Is my pension safe?",
];

const COOPERATIVE_CONCERN: &[&str] = &[
    "I really don't want any problem with my account. Please help me fix this quickly.",
    "That sounds serious. I will do whatever is needed, just tell me it will be okay.",
];

const SKEPTICAL_CONCERN: &[&str] = &[
    "I have never had a problem before. Why is this happening now?",
    "This worries me. Nobody from my branch mentioned anything like this.",
];

const CURIOUS_CONCERN: &[&str] = &[
    "I am excited but also a bit nervous. Nothing bad will happen, right?",
    "Is there any risk if I go ahead? I have never won anything before.",
];

const CONFUSED_PROOF: &[&str] = &[
    "My son says I should always ask. Can you show me some ID first?",
    "How do I know you are really from the office? Can you send something?",
];

const COOPERATIVE_PROOF: &[&str] = &[
    "Sure, I just need some reference number for my records. What is it?",
    "Can you send me an official message first so I have it in writing?",
];

const SKEPTICAL_PROOF: &[&str] = &[
    "Before I do anything, tell me your employee ID and branch address.",
    "Send me an official notice with a reference number. Then we can talk.",
    "How can I verify you are authorized? Give me a number I can check.",
];

const CURIOUS_PROOF: &[&str] = &[
    "Is there a certificate or letter for this prize? I want to show my family.",
    "Can you send me proof of the winning? It sounds too good to believe.",
];

const CONFUSED_CLARIFY: &[&str] = &[
    "I don't understand. What exactly do I have to do?",
    "Can you explain again slowly? Which app should I open?",
];

const COOPERATIVE_CLARIFY: &[&str] = &[
    "Okay, I want to help. What are the steps?",
    "Understood. What do you need from me first?",
];

const SKEPTICAL_CLARIFY: &[&str] = &[
    "Which department are you calling from, and why did you contact me on this number?",
    "What is the exact problem with my account? Give me the details.",
];

const CURIOUS_CLARIFY: &[&str] = &[
    "How did I get selected? What happens next?",
    "That is amazing! How will I receive the amount?",
];

const UPI_REQUESTS: &[&str] = &[
    "Which UPI ID should I send it to? Please type it exactly.",
    "My payment app is asking for the receiver's UPI ID. What is yours?",
    "Can you give me the UPI ID again? I want to copy it correctly.",
];

const BANK_REQUESTS: &[&str] = &[
    "Can I do a bank transfer instead? Send me the account number and IFSC code.",
    "My app works better with bank details. What is the account number and IFSC?",
];

const PHONE_REQUESTS: &[&str] = &[
    "Is there a number I can call you back on? Messaging is hard for me.",
    "Can you share your phone number? I will call after I reach home.",
];

const LINK_REQUESTS: &[&str] = &[
    "Where do I have to do this? Can you send me the link again?",
    "I can't find the page. Please share the website link.",
];

/// Persona lead-ins prepended to targeted requests.
const CONFUSED_LEADS: &[&str] = &["Okay okay.", "Alright, I think I understand now."];
const COOPERATIVE_LEADS: &[&str] = &["Sure, I am ready.", "Okay, let's finish this."];
const SKEPTICAL_LEADS: &[&str] = &["Fine.", "Alright, but I will note this down."];
const CURIOUS_LEADS: &[&str] = &["Great!", "Oh nice."];

/// Phrasing variants for a general strategy class and persona.
pub fn general_templates(persona: Persona, class: StrategyClass) -> &'static [&'static str] {
    match (class, persona) {
        (StrategyClass::Stall, Persona::Confused) => CONFUSED_STALL,
        (StrategyClass::Stall, Persona::Cooperative) => COOPERATIVE_STALL,
        (StrategyClass::Stall, Persona::Skeptical) => SKEPTICAL_STALL,
        (StrategyClass::Stall, Persona::Curious) => CURIOUS_STALL,
        (StrategyClass::ExpressConcern, Persona::Confused) => CONFUSED_CONCERN,
        (StrategyClass::ExpressConcern, Persona::Cooperative) => COOPERATIVE_CONCERN,
        (StrategyClass::ExpressConcern, Persona::Skeptical) => SKEPTICAL_CONCERN,
        (StrategyClass::ExpressConcern, Persona::Curious) => CURIOUS_CONCERN,
        (StrategyClass::RequestProof, Persona::Confused) => CONFUSED_PROOF,
        (StrategyClass::RequestProof, Persona::Cooperative) => COOPERATIVE_PROOF,
        (StrategyClass::RequestProof, Persona::Skeptical) => SKEPTICAL_PROOF,
        (StrategyClass::RequestProof, Persona::Curious) => CURIOUS_PROOF,
        (StrategyClass::AskClarifyingQuestion, Persona::Confused) => CONFUSED_CLARIFY,
        (StrategyClass::AskClarifyingQuestion, Persona::Cooperative) => COOPERATIVE_CLARIFY,
        (StrategyClass::AskClarifyingQuestion, Persona::Skeptical) => SKEPTICAL_CLARIFY,
        (StrategyClass::AskClarifyingQuestion, Persona::Curious) => CURIOUS_CLARIFY,
        (StrategyClass::TargetedExtraction(_), _) => NEUTRAL_REPLIES,
    }
}

/// Phrasing variants asking for one entity kind.
pub fn request_templates(kind: EntityKind) -> &'static [&'static str] {
    match kind {
        EntityKind::UpiId => UPI_REQUESTS,
        EntityKind::BankAccount | EntityKind::IfscCode => BANK_REQUESTS,
        EntityKind::PhoneNumber => PHONE_REQUESTS,
        EntityKind::PhishingLink => LINK_REQUESTS,
    }
}

pub fn lead_ins(persona: Persona) -> &'static [&'static str] {
    match persona {
        Persona::Confused => CONFUSED_LEADS,
        Persona::Cooperative => COOPERATIVE_LEADS,
        Persona::Skeptical => SKEPTICAL_LEADS,
        Persona::Curious => CURIOUS_LEADS,
    }
}

/// Every template in this module, for content checks.
pub fn all_templates() -> Vec<&'static str> {
    let mut all: Vec<&'static str> = NEUTRAL_REPLIES.to_vec();
    all.extend_from_slice(CLOSING_REPLIES);
    for persona in Persona::FALLBACK_ORDER {
        for class in StrategyClass::GENERAL {
            all.extend_from_slice(general_templates(persona, class));
        }
        all.extend_from_slice(lead_ins(persona));
    }
    for kind in crate::intelligence::TARGETABLE_KINDS {
        all.extend_from_slice(request_templates(kind));
    }
    all
}

#[cfg(test)]
mod tests {
    use super::*;

    const FORBIDDEN: &[&str] = &[
        "scam", "fraud", "honeypot", "police", "arrest", "cyber cell", "report you", "jail",
        "detected",
    ];

    #[test]
    fn test_templates_never_disclose_or_threaten() {
        for template in all_templates() {
            let lower = template.to_lowercase();
            for word in FORBIDDEN {
                assert!(!lower.contains(word), "'{}' contains '{}'", template, word);
            }
        }
    }

    #[test]
    fn test_every_combination_has_variants() {
        for persona in Persona::FALLBACK_ORDER {
            for class in StrategyClass::GENERAL {
                assert!(!general_templates(persona, class).is_empty());
            }
            assert!(!lead_ins(persona).is_empty());
        }
        for kind in crate::intelligence::TARGETABLE_KINDS {
            assert!(request_templates(kind).len() >= 2);
        }
    }

    #[test]
    fn test_neutral_replies_are_questions() {
        for reply in NEUTRAL_REPLIES {
            assert!(reply.ends_with('?'), "{}", reply);
        }
    }
}
