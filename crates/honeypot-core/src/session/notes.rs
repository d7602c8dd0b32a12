//! Agent notes summarizing an engagement.

use super::model::Session;
use crate::catalog::PatternCatalog;

/// Builds the free-text notes attached to a session's report.
pub fn agent_notes(session: &Session, catalog: &PatternCatalog) -> String {
    let mut notes = Vec::new();

    notes.push(format!(
        "Counterpart on {} classified as {} (confidence {:.2}).",
        session.metadata.channel,
        session.category.describe(),
        session.confidence
    ));

    let tactics: Vec<&str> = session
        .matched_groups
        .iter()
        .filter_map(|name| catalog.group(name))
        .map(|group| group.tactic.as_str())
        .collect();
    if !tactics.is_empty() {
        notes.push(format!("Tactics observed: {}.", tactics.join("; ")));
    }

    match (session.persona(), session.engaged_at_turn) {
        (Some(persona), Some(engaged_at)) => {
            let engaged_turns = session.counterpart_turns().saturating_sub(engaged_at) + 1;
            notes.push(format!(
                "Engaged as {} ({}) for {} counterpart turn(s).",
                persona.describe(),
                persona,
                engaged_turns
            ));
        }
        _ => notes.push("Conversation was never engaged.".to_string()),
    }

    notes.push(format!("Captured {}.", session.intelligence.summary()));

    let flagged: Vec<String> = session
        .link_flags
        .iter()
        .filter(|(_, flags)| !flags.is_empty())
        .map(|(link, flags)| {
            let flags: Vec<String> = flags.iter().map(|f| f.to_string()).collect();
            format!("{} [{}]", link, flags.join(", "))
        })
        .collect();
    if !flagged.is_empty() {
        notes.push(format!("Flagged links: {}.", flagged.join("; ")));
    }

    notes.join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{ScamCategory, default_catalog};
    use crate::intelligence::LinkFlag;
    use crate::persona::Persona;
    use crate::detection::DetectionResult;
    use crate::intelligence::Extraction;
    use crate::session::{Message, MessageMetadata};

    #[test]
    fn test_notes_describe_engagement() {
        let catalog = default_catalog().unwrap();
        let mut session = Session::new("s1", MessageMetadata::default());
        for i in 0..3 {
            session.record_counterpart(
                Message::counterpart("x", i),
                DetectionResult::none(),
                Extraction::default(),
            );
        }
        session.category = ScamCategory::UpiFraud;
        session.confidence = 0.75;
        session.matched_groups.insert("urgency".into());
        session.matched_groups.insert("upi_fraud".into());
        session.assign_persona(Persona::Confused);
        session.engaged_at_turn = Some(1);
        session.intelligence.upi_ids.insert("winner@paytm".into());
        session
            .link_flags
            .entry("http://paytm-win.xyz".into())
            .or_default()
            .insert(LinkFlag::SuspiciousTld);

        let notes = agent_notes(&session, &catalog);
        assert!(notes.contains("SMS"), "{}", notes);
        assert!(notes.contains("UPI payment fraud"));
        assert!(notes.contains("urgency framing"));
        assert!(notes.contains("payment-identifier solicitation"));
        assert!(notes.contains("for 3 counterpart turn(s)"));
        assert!(notes.contains("1 UPI ID(s)"));
        assert!(notes.contains("http://paytm-win.xyz [suspicious_tld]"));
    }

    #[test]
    fn test_notes_for_unengaged_session() {
        let catalog = default_catalog().unwrap();
        let session = Session::new("s1", MessageMetadata::default());
        let notes = agent_notes(&session, &catalog);
        assert!(notes.contains("never engaged"));
        assert!(notes.contains("no actionable intelligence"));
    }
}
