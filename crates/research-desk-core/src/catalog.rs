//! Section labels and query intents.
//!
//! Two fixed tables drive section extraction:
//!
//! - [`SectionCatalog`]: the labels that open a section inside a summary
//!   (`"Impacts:"`, `"Knowledge Gaps:"`, ...). Every catalog label also acts
//!   as a stop marker that ends the previous section.
//! - [`IntentCatalog`]: an ordered list of [`Intent`]s. Each intent pairs a
//!   lowercase key that is looked for inside the query (`"impact"`) with the
//!   section labels that answer it (`["Impacts", "Impact"]`).
//!
//! # Evaluation Order
//!
//! A query can contain several intent keys ("impact of the results").
//! Intents are evaluated in catalog order and the first one whose section
//! exists in the matched document wins. The default order is:
//!
//! | # | Key | Labels |
//! |---|-----|--------|
//! | 1 | `impact` | `Impacts`, `Impact` |
//! | 2 | `result` | `Results`, `Result` |
//! | 3 | `knowledge` | `Knowledge Gaps` |
//! | 4 | `progress` | `Areas_of Scientific Progress` |
//! | 5 | `consensus` | `Areas_of Consensus or Disagreement` |
//! | 6 | `insight` | `Actionable Insights to Mission Planners` |
//!
//! Labels are literal strings. The underscores in `Areas_of ...` are part of
//! the corpus format and must stay.

use anyhow::{bail, Result};
use serde::{Deserialize, Serialize};

/// Section labels recognized as boundaries in a summary, in display order.
pub const DEFAULT_SECTION_LABELS: &[&str] = &[
    "Impacts",
    "Results",
    "Areas_of Scientific Progress",
    "Knowledge Gaps",
    "Areas_of Consensus or Disagreement",
    "Actionable Insights to Mission Planners",
];

const DEFAULT_INTENTS: &[(&str, &[&str])] = &[
    ("impact", &["Impacts", "Impact"]),
    ("result", &["Results", "Result"]),
    ("knowledge", &["Knowledge Gaps"]),
    ("progress", &["Areas_of Scientific Progress"]),
    ("consensus", &["Areas_of Consensus or Disagreement"]),
    ("insight", &["Actionable Insights to Mission Planners"]),
];

/// Boundary labels used to split a summary into sections.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SectionCatalog {
    labels: Vec<String>,
}

impl SectionCatalog {
    /// Build a catalog from explicit labels.
    ///
    /// # Errors
    ///
    /// Fails if the list is empty or contains a blank label.
    pub fn new(labels: Vec<String>) -> Result<Self> {
        if labels.is_empty() {
            bail!("section catalog must contain at least one label");
        }
        if labels.iter().any(|l| l.trim().is_empty()) {
            bail!("section labels must not be blank");
        }
        Ok(Self { labels })
    }

    pub fn labels(&self) -> &[String] {
        &self.labels
    }
}

impl Default for SectionCatalog {
    fn default() -> Self {
        Self {
            labels: DEFAULT_SECTION_LABELS
                .iter()
                .map(|l| l.to_string())
                .collect(),
        }
    }
}

/// A query intent: a keyword and the section labels that answer it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Intent {
    /// Lowercase substring looked for in the lowercased query.
    pub key: String,
    /// Section label synonyms, in priority order. The first one is the
    /// canonical label shown in answer titles.
    pub labels: Vec<String>,
}

impl Intent {
    pub fn new(key: impl Into<String>, labels: &[&str]) -> Self {
        Self {
            key: key.into(),
            labels: labels.iter().map(|l| l.to_string()).collect(),
        }
    }

    /// The label used in answer titles.
    pub fn canonical_label(&self) -> &str {
        self.labels.first().map(String::as_str).unwrap_or(&self.key)
    }
}

/// Ordered intent table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IntentCatalog {
    intents: Vec<Intent>,
}

impl IntentCatalog {
    /// Build a catalog from explicit intents, keeping their order.
    ///
    /// # Errors
    ///
    /// Fails on a blank or non-lowercase key, a duplicate key, or an intent
    /// without labels.
    pub fn new(intents: Vec<Intent>) -> Result<Self> {
        for (i, intent) in intents.iter().enumerate() {
            if intent.key.trim().is_empty() {
                bail!("intent #{} has a blank key", i + 1);
            }
            if intent.key != intent.key.to_lowercase() {
                bail!("intent key '{}' must be lowercase", intent.key);
            }
            if intents[..i].iter().any(|prev| prev.key == intent.key) {
                bail!("duplicate intent key '{}'", intent.key);
            }
            if intent.labels.is_empty() || intent.labels.iter().any(|l| l.trim().is_empty()) {
                bail!("intent '{}' needs at least one non-blank label", intent.key);
            }
        }
        Ok(Self { intents })
    }

    pub fn intents(&self) -> &[Intent] {
        &self.intents
    }

    /// Intents whose key occurs in `query`, in evaluation order.
    ///
    /// Matching is a plain substring test on the lowercased query, so
    /// `"impact"` also fires for `"impacts"` and `"impactful"`.
    pub fn detect(&self, query: &str) -> Vec<&Intent> {
        let query = query.to_lowercase();
        self.intents
            .iter()
            .filter(|intent| query.contains(intent.key.as_str()))
            .collect()
    }

    /// Every label mentioned by any intent, in catalog order.
    pub fn labels(&self) -> impl Iterator<Item = &str> {
        self.intents
            .iter()
            .flat_map(|intent| intent.labels.iter().map(String::as_str))
    }
}

impl Default for IntentCatalog {
    fn default() -> Self {
        Self {
            intents: DEFAULT_INTENTS
                .iter()
                .map(|(key, labels)| Intent::new(*key, labels))
                .collect(),
        }
    }
}
