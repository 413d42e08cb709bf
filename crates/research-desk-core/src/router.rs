//! Intent routing: narrow a matched document to the section a query asks for.
//!
//! The router never fails. A query that names no intent, or names intents
//! whose sections are missing (or empty) in the matched summary, falls back
//! to the full summary.

use crate::catalog::IntentCatalog;
use crate::models::{Answer, MatchHit};
use crate::sections::SectionMap;

/// Route a relevant match to either one section or the full summary.
///
/// Intents are tried in catalog order; the first one with a non-empty
/// section in `sections` wins.
pub fn route(query: &str, hit: MatchHit, sections: &SectionMap, intents: &IntentCatalog) -> Answer {
    for intent in intents.detect(query) {
        match sections.lookup(intent.labels.as_slice()) {
            Some(text) if !text.is_empty() => {
                tracing::debug!(
                    intent = %intent.key,
                    label = intent.canonical_label(),
                    "routed to section"
                );
                return Answer::Section {
                    label: intent.canonical_label().to_string(),
                    text: text.to_string(),
                    hit,
                };
            }
            _ => {
                tracing::debug!(intent = %intent.key, "section not present, trying next intent");
            }
        }
    }

    Answer::FullSummary { hit }
}
