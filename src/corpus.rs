//! Corpus loading.
//!
//! The corpus is a JSON array of `{ "title": ..., "summary": ... }` objects,
//! read once at startup. Any problem with the file is fatal: a desk serving
//! from a half-loaded corpus would answer every question wrong.

use anyhow::{bail, Context, Result};
use sha2::{Digest, Sha256};
use std::path::Path;

use research_desk_core::models::Document;

/// Read and validate the corpus file.
///
/// # Errors
///
/// Fails if the file is missing or unreadable, is not a JSON array of
/// documents, or contains no documents.
pub fn load_corpus(path: &Path) -> Result<Vec<Document>> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read corpus file: {}", path.display()))?;

    let documents: Vec<Document> = serde_json::from_str(&content)
        .with_context(|| format!("Failed to parse corpus file: {}", path.display()))?;

    if documents.is_empty() {
        bail!("corpus file {} contains no documents", path.display());
    }

    tracing::info!(
        documents = documents.len(),
        path = %path.display(),
        "loaded research summaries"
    );

    Ok(documents)
}

/// SHA-256 over every title and summary, in corpus order.
///
/// Two corpora with the same fingerprint produce the same index for the
/// same model.
pub fn fingerprint(documents: &[Document]) -> String {
    let mut hasher = Sha256::new();
    for doc in documents {
        hasher.update(doc.title.as_bytes());
        hasher.update([0u8]);
        hasher.update(doc.summary.as_bytes());
        hasher.update([0u8]);
    }
    hex::encode(hasher.finalize())
}
