//! Section parsing for loosely structured summaries.
//!
//! Summaries embed section labels followed by a colon:
//!
//! ```text
//! Results: Bone loss observed. Impacts: Mission duration limits.
//! ```
//!
//! A section starts after the first `<label>:` occurrence (case-insensitive)
//! and runs until the next `<boundary>:` where `<boundary>` is any label of
//! the [`SectionCatalog`], or until the end of the text. Section text is
//! trimmed.
//!
//! Summaries are parsed once into a [`SectionMap`] when the index is built,
//! so per-query extraction is a lookup. [`extract_section`] runs the same
//! parser on arbitrary text.

use anyhow::{Context, Result};
use regex::{Regex, RegexBuilder};

use crate::catalog::SectionCatalog;

/// One labeled section of a summary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Section {
    /// The label as written in the catalog (not as written in the text).
    pub label: String,
    /// Byte offset of the label's first occurrence in the summary.
    pub offset: usize,
    pub text: String,
}

/// Pre-parsed sections of one summary, ordered by offset.
///
/// Holds at most one entry per recognized label: its first occurrence.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SectionMap {
    sections: Vec<Section>,
}

/// Compiled label patterns for one catalog.
///
/// Build once and reuse for every summary of the corpus.
#[derive(Debug, Clone)]
pub struct SectionParser {
    openers: Vec<LabelPattern>,
    /// Any catalog label followed by a colon. `None` for an empty catalog.
    boundary: Option<Regex>,
}

#[derive(Debug, Clone)]
struct LabelPattern {
    label: String,
    pattern: Regex,
}

impl SectionParser {
    /// Compile the catalog's boundary labels plus any `extra` labels (e.g.
    /// intent synonyms such as `"Impact"`).
    ///
    /// Extra labels can open a section but do not end one; only catalog
    /// labels are stop markers.
    pub fn new<'a>(
        catalog: &SectionCatalog,
        extra: impl IntoIterator<Item = &'a str>,
    ) -> Result<Self> {
        let stops: Vec<&str> = catalog
            .labels()
            .iter()
            .map(String::as_str)
            .filter(|l| !l.is_empty())
            .collect();

        let mut labels: Vec<&str> = Vec::new();
        for label in stops.iter().copied() {
            push_label(&mut labels, label);
        }
        for label in extra {
            push_label(&mut labels, label);
        }

        let openers = labels
            .into_iter()
            .map(|label| {
                Ok(LabelPattern {
                    label: label.to_string(),
                    pattern: label_pattern(&[label])?,
                })
            })
            .collect::<Result<Vec<_>>>()?;

        let boundary = if stops.is_empty() {
            None
        } else {
            Some(label_pattern(&stops)?)
        };

        Ok(Self { openers, boundary })
    }

    /// Split `text` into its labeled sections.
    pub fn parse(&self, text: &str) -> SectionMap {
        let mut sections: Vec<Section> = self
            .openers
            .iter()
            .filter_map(|opener| {
                let hit = opener.pattern.find(text)?;
                let body_start = hit.end();
                let end = self
                    .boundary
                    .as_ref()
                    .and_then(|b| b.find_at(text, body_start))
                    .map(|m| m.start())
                    .unwrap_or(text.len());
                Some(Section {
                    label: opener.label.clone(),
                    offset: hit.start(),
                    text: text[body_start..end].trim().to_string(),
                })
            })
            .collect();
        sections.sort_by_key(|s| s.offset);

        SectionMap { sections }
    }
}

impl SectionMap {
    /// One-off parse of `text`. Prefer a shared [`SectionParser`] when
    /// parsing many summaries against the same catalog.
    pub fn parse<'a>(
        text: &str,
        catalog: &SectionCatalog,
        extra: impl IntoIterator<Item = &'a str>,
    ) -> Result<Self> {
        Ok(SectionParser::new(catalog, extra)?.parse(text))
    }

    /// Text of the earliest section opened by any of `candidates`.
    ///
    /// Candidates are compared to parsed labels case-insensitively. Labels
    /// that were not known at parse time are never found.
    pub fn lookup<S: AsRef<str>>(&self, candidates: &[S]) -> Option<&str> {
        self.sections
            .iter()
            .find(|s| {
                candidates
                    .iter()
                    .any(|c| labels_equal(c.as_ref(), &s.label))
            })
            .map(|s| s.text.as_str())
    }

    pub fn sections(&self) -> &[Section] {
        &self.sections
    }

    pub fn is_empty(&self) -> bool {
        self.sections.is_empty()
    }
}

/// Extract the section opened by the earliest of `candidates` in `text`.
///
/// Returns `Ok(None)` when no candidate occurs as a colon-terminated label.
/// A label present with nothing after it yields `Some("")`.
pub fn extract_section<S: AsRef<str>>(
    text: &str,
    candidates: &[S],
    catalog: &SectionCatalog,
) -> Result<Option<String>> {
    let map = SectionMap::parse(text, catalog, candidates.iter().map(|c| c.as_ref()))?;
    Ok(map.lookup(candidates).map(str::to_string))
}

/// Label equality as used by the parser: case-insensitive, otherwise literal.
pub fn labels_equal(a: &str, b: &str) -> bool {
    a == b || a.to_lowercase() == b.to_lowercase()
}

fn push_label<'a>(labels: &mut Vec<&'a str>, label: &'a str) {
    if !label.is_empty() && !labels.iter().any(|l| labels_equal(l, label)) {
        labels.push(label);
    }
}

/// `(?i)(?:label1|label2|...):` with every label escaped.
fn label_pattern(labels: &[&str]) -> Result<Regex> {
    let alternation = labels
        .iter()
        .map(|l| regex::escape(l))
        .collect::<Vec<_>>()
        .join("|");
    RegexBuilder::new(&format!("(?:{}):", alternation))
        .case_insensitive(true)
        .build()
        .with_context(|| format!("invalid section label pattern for {:?}", labels))
}
