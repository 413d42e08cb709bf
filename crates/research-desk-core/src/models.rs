//! Core data models shared by the matcher, router, and front ends.
//!
//! A [`Document`] is one research summary from the corpus. Every request
//! resolves to exactly one [`Answer`], which front ends turn into the
//! `{ title, summary }` wire shape via [`AnswerResponse`].

use serde::{Deserialize, Serialize};

/// User-facing message for an empty or whitespace-only query.
pub const EMPTY_QUERY_MESSAGE: &str = "Please enter a question.";

/// User-facing message when no document clears the relevance threshold.
pub const NO_MATCH_MESSAGE: &str = "No relevant summary found.";

/// Separator between a document title and a section label in sectioned answers.
pub const SECTION_TITLE_SEPARATOR: &str = " — ";

/// One research summary as stored in the corpus file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Document {
    pub title: String,
    pub summary: String,
}

impl Document {
    pub fn new(title: impl Into<String>, summary: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            summary: summary.into(),
        }
    }
}

/// The best-scoring document for a query.
#[derive(Debug, Clone, PartialEq)]
pub struct MatchHit {
    /// Position of the document in the corpus.
    pub position: usize,
    /// Cosine similarity between the query and the document summary.
    pub score: f32,
    pub document: Document,
}

/// Outcome of a single `ask` call.
///
/// Every variant is a normal result; none of them is an error.
#[derive(Debug, Clone, PartialEq)]
pub enum Answer {
    /// The query was empty after trimming. Nothing was embedded.
    EmptyQuery,
    /// The best candidate scored below the relevance threshold.
    NoMatch {
        /// Best candidate, kept for diagnostics. `None` for an empty index.
        best: Option<MatchHit>,
    },
    /// A relevant document was found and no section was requested or found.
    FullSummary { hit: MatchHit },
    /// A relevant document was found and narrowed to one section.
    Section {
        hit: MatchHit,
        /// Canonical display label of the requested intent.
        label: String,
        text: String,
    },
}

impl Answer {
    /// The matched document, when the query passed the relevance gate.
    pub fn hit(&self) -> Option<&MatchHit> {
        match self {
            Answer::FullSummary { hit } | Answer::Section { hit, .. } => Some(hit),
            Answer::EmptyQuery | Answer::NoMatch { .. } => None,
        }
    }

    /// Converts the answer into the `{ title, summary }` response shape.
    pub fn to_response(&self) -> AnswerResponse {
        match self {
            Answer::EmptyQuery => AnswerResponse::sentinel(EMPTY_QUERY_MESSAGE),
            Answer::NoMatch { .. } => AnswerResponse::sentinel(NO_MATCH_MESSAGE),
            Answer::FullSummary { hit } => AnswerResponse {
                title: hit.document.title.clone(),
                summary: hit.document.summary.clone(),
            },
            Answer::Section { hit, label, text } => AnswerResponse {
                title: format!(
                    "{}{}{}",
                    hit.document.title, SECTION_TITLE_SEPARATOR, label
                ),
                summary: text.clone(),
            },
        }
    }
}

/// Wire shape of an answer, as consumed by the response layer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnswerResponse {
    pub title: String,
    pub summary: String,
}

impl AnswerResponse {
    fn sentinel(message: &str) -> Self {
        Self {
            title: String::new(),
            summary: message.to_string(),
        }
    }
}
