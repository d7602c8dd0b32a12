//! Rule-based entity extraction.
//!
//! Each entity kind has its own pass over the raw text. Candidates are
//! validated and normalized before they are kept, so the same artifact always
//! produces the same string regardless of how it was formatted.

use super::model::{ExtractedIntelligence, Extraction, LinkFlag};
use crate::catalog::{EntityKind, EntityRules, PatternCatalog};
use crate::detection::DetectionResult;
use regex::Regex;
use std::collections::BTreeSet;
use std::sync::Arc;
use url::Url;

const MAX_PER_KIND: usize = 5;
const MAX_LINKS: usize = 10;
const MAX_KEYWORDS: usize = 15;

/// Minimum handle length of a payment identifier.
const MIN_UPI_HANDLE: usize = 3;

/// Characters stripped from the end of a matched link.
const TRAILING_PUNCTUATION: &[char] = &['.', ',', ';', ':', '!', '?', ')', '\'', '"'];

/// Harvests bank accounts, IFSC codes, payment ids, phone numbers, links and
/// suspicious keywords from counterpart text.
#[derive(Debug, Clone)]
pub struct Extractor {
    catalog: Arc<PatternCatalog>,
}

impl Extractor {
    pub fn new(catalog: Arc<PatternCatalog>) -> Self {
        Self { catalog }
    }

    /// Extracts entities from `text`.
    ///
    /// `detection` contributes its matched indicator terms to the keyword set.
    /// Running the same input twice yields the same result.
    pub fn extract(&self, text: &str, detection: &DetectionResult) -> Extraction {
        let rules = self.catalog.entities();
        let mut intelligence = ExtractedIntelligence::default();

        *intelligence.values_mut(EntityKind::BankAccount) = bank_accounts(rules, text);
        *intelligence.values_mut(EntityKind::IfscCode) = ifsc_codes(rules, text);
        *intelligence.values_mut(EntityKind::UpiId) = upi_ids(rules, text);
        *intelligence.values_mut(EntityKind::PhoneNumber) = phone_numbers(rules, text);

        let links = links(rules, text);
        intelligence.phishing_links = links.iter().map(|(link, _)| link.clone()).collect();
        intelligence.suspicious_keywords = keywords(rules, text, detection);

        if !intelligence.is_empty() {
            tracing::debug!("[Extractor] {}", intelligence.summary());
        }

        Extraction {
            intelligence,
            link_flags: links.into_iter().collect(),
        }
    }
}

fn capture_or_whole<'t>(caps: &regex::Captures<'t>) -> &'t str {
    caps.get(1)
        .or_else(|| caps.get(0))
        .map(|m| m.as_str())
        .unwrap_or_default()
}

fn digits(value: &str) -> String {
    value.chars().filter(|c| c.is_ascii_digit()).collect()
}

/// Digit runs that are really Indian mobile numbers written with a country or
/// trunk prefix.
fn is_phone_shaped(run: &str) -> bool {
    let bytes = run.as_bytes();
    match run.len() {
        12 => run.starts_with("91") && is_mobile_lead(bytes[2]),
        11 => run.starts_with('0') && is_mobile_lead(bytes[1]),
        _ => false,
    }
}

/// A bare 10-digit mobile number.
fn is_bare_mobile(run: &str) -> bool {
    run.len() == 10 && is_mobile_lead(run.as_bytes()[0])
}

fn is_mobile_lead(b: u8) -> bool {
    (b'6'..=b'9').contains(&b)
}

fn bank_accounts(rules: &EntityRules, text: &str) -> BTreeSet<String> {
    let mut found = BTreeSet::new();

    for pattern in &rules.bank_account_labelled {
        for caps in pattern.captures_iter(text) {
            let account = digits(capture_or_whole(&caps));
            if (9..=18).contains(&account.len())
                && !is_phone_shaped(&account)
                && !is_bare_mobile(&account)
            {
                found.insert(account);
            }
        }
    }

    for pattern in &rules.bank_account_bare {
        for m in pattern.find_iter(text) {
            let preceded_by_plus = text[..m.start()].ends_with('+');
            if preceded_by_plus || is_phone_shaped(m.as_str()) {
                continue;
            }
            found.insert(m.as_str().to_string());
        }
    }

    cap(found, MAX_PER_KIND)
}

fn ifsc_codes(rules: &EntityRules, text: &str) -> BTreeSet<String> {
    let found = collect_matches(&rules.ifsc, text, |raw| {
        let code = raw.trim().to_ascii_uppercase();
        let valid = code.len() == 11
            && code.as_bytes()[4] == b'0'
            && code[..4].chars().all(|c| c.is_ascii_alphabetic());
        valid.then_some(code)
    });
    cap(found, MAX_PER_KIND)
}

fn upi_ids(rules: &EntityRules, text: &str) -> BTreeSet<String> {
    let mut found = BTreeSet::new();

    for pattern in &rules.upi_generic {
        for caps in pattern.captures_iter(text) {
            let (Some(whole), Some(handle), Some(provider)) = (caps.get(0), caps.get(1), caps.get(2))
            else {
                continue;
            };
            let provider = provider.as_str().to_ascii_lowercase();
            if !rules.is_known_upi_provider(&provider) || is_email_domain(text, whole.end()) {
                continue;
            }
            if let Some(id) = normalize_upi(handle.as_str(), &provider) {
                found.insert(id);
            }
        }
    }

    for pattern in &rules.upi_labelled {
        for caps in pattern.captures_iter(text) {
            let (Some(whole), Some(handle), Some(provider)) = (caps.get(0), caps.get(1), caps.get(2))
            else {
                continue;
            };
            if is_email_domain(text, whole.end()) {
                continue;
            }
            if let Some(id) = normalize_upi(handle.as_str(), provider.as_str()) {
                found.insert(id);
            }
        }
    }

    cap(found, MAX_PER_KIND)
}

/// A provider followed by `.` and a letter is an e-mail domain, not a payment id.
fn is_email_domain(text: &str, provider_end: usize) -> bool {
    let mut rest = text[provider_end..].chars();
    matches!(
        (rest.next(), rest.next()),
        (Some('.'), Some(c)) if c.is_ascii_alphabetic()
    )
}

fn normalize_upi(handle: &str, provider: &str) -> Option<String> {
    (handle.len() >= MIN_UPI_HANDLE)
        .then(|| format!("{}@{}", handle, provider).to_ascii_lowercase())
}

fn phone_numbers(rules: &EntityRules, text: &str) -> BTreeSet<String> {
    let mut found = collect_matches(&rules.phone, text, |raw| {
        let number = digits(raw);
        match number.len() {
            10 if matches!(number.as_bytes()[0], b'6'..=b'9') => Some(format!("+91{}", number)),
            12 if number.starts_with("91") => Some(format!("+{}", number)),
            11 if number.starts_with('0') => Some(format!("+91{}", &number[1..])),
            _ => None,
        }
    });

    found.extend(collect_matches(&rules.phone_labelled, text, |raw| {
        let number = digits(raw);
        (10..=15)
            .contains(&number.len())
            .then(|| format!("+{}", number))
    }));

    cap(found, MAX_PER_KIND)
}

fn links(rules: &EntityRules, text: &str) -> Vec<(String, BTreeSet<LinkFlag>)> {
    let mut retained: Vec<(String, BTreeSet<LinkFlag>)> = Vec::new();

    for pattern in &rules.link {
        for m in pattern.find_iter(text) {
            if text[..m.start()].ends_with("://") {
                continue;
            }
            let link = m.as_str().trim_end_matches(TRAILING_PUNCTUATION);
            if link.len() <= 4 || retained.iter().any(|(l, _)| l == link) {
                continue;
            }
            if let Some(flags) = assess_link(rules, link) {
                retained.push((link.to_string(), flags));
            }
        }
    }

    retained.truncate(MAX_LINKS);
    retained
}

/// Returns `None` for allow-listed links, otherwise the link's risk flags.
fn assess_link(rules: &EntityRules, link: &str) -> Option<BTreeSet<LinkFlag>> {
    let parseable = if link.to_ascii_lowercase().starts_with("www.") {
        format!("http://{}", link)
    } else {
        link.to_string()
    };

    let Ok(url) = Url::parse(&parseable) else {
        return Some(BTreeSet::new());
    };
    let Some(host) = url.host_str() else {
        return Some(BTreeSet::new());
    };
    let host = host.to_ascii_lowercase();
    let host = host.strip_prefix("www.").unwrap_or(&host);

    if rules.is_legitimate_host(host) {
        return None;
    }

    let mut flags = BTreeSet::new();
    if rules.suspicious_tlds.iter().any(|tld| host.ends_with(tld.as_str())) {
        flags.insert(LinkFlag::SuspiciousTld);
    }
    if rules
        .shorteners
        .iter()
        .any(|s| host == s || host.ends_with(&format!(".{}", s)))
    {
        flags.insert(LinkFlag::Shortener);
    }
    if rules.brand_tokens.iter().any(|b| host.contains(b.as_str())) {
        flags.insert(LinkFlag::LookalikeDomain);
    }
    let path = url.path().to_ascii_lowercase();
    if rules
        .credential_keywords
        .iter()
        .any(|k| host.contains(k.as_str()) || path.contains(k.as_str()))
    {
        flags.insert(LinkFlag::CredentialKeyword);
    }
    Some(flags)
}

fn keywords(rules: &EntityRules, text: &str, detection: &DetectionResult) -> BTreeSet<String> {
    let mut found: BTreeSet<String> = rules
        .vocabulary
        .iter()
        .filter(|v| v.is_match(text))
        .map(|v| v.term.clone())
        .collect();
    // Links and payment handles belong to their own sets.
    found.extend(
        detection
            .matched_terms
            .iter()
            .filter(|term| !term.contains(['/', '@']))
            .cloned(),
    );
    cap(found, MAX_KEYWORDS)
}

fn collect_matches<F>(patterns: &[Regex], text: &str, normalize: F) -> BTreeSet<String>
where
    F: Fn(&str) -> Option<String>,
{
    patterns
        .iter()
        .flat_map(|pattern| pattern.captures_iter(text))
        .filter_map(|caps| normalize(capture_or_whole(&caps)))
        .collect()
}

fn cap(values: BTreeSet<String>, max: usize) -> BTreeSet<String> {
    values.into_iter().take(max).collect()
}
