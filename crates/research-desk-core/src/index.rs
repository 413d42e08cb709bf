//! Immutable similarity index over the corpus.
//!
//! Built once at startup: every summary is embedded exactly once and parsed
//! into its [`SectionMap`]. After construction the index is read-only and can
//! be shared across concurrent requests without locking.
//!
//! # Matching
//!
//! [`SimilarityIndex::best_match`] scores a query vector against every
//! document vector with cosine similarity and returns the argmax. The scan
//! runs left to right and only replaces the current best on a strictly
//! greater score, so ties go to the earliest document.

use anyhow::{bail, Result};

use crate::catalog::{IntentCatalog, SectionCatalog};
use crate::embedding::{cosine_similarity, EmbeddingProvider};
use crate::models::{Document, MatchHit};
use crate::sections::{SectionMap, SectionParser};

/// A corpus document with its precomputed vector and sections.
#[derive(Debug, Clone)]
pub struct IndexedDocument {
    pub document: Document,
    pub vector: Vec<f32>,
    pub sections: SectionMap,
}

/// Corpus documents paired 1:1, in order, with their summary embeddings.
#[derive(Debug, Clone)]
pub struct SimilarityIndex {
    entries: Vec<IndexedDocument>,
    dims: usize,
}

impl SimilarityIndex {
    /// Embed every summary with `provider` and build the index.
    ///
    /// # Errors
    ///
    /// Fails if the provider fails, or returns a vector count or
    /// dimensionality that does not line up with the corpus.
    pub async fn build(
        provider: &dyn EmbeddingProvider,
        corpus: Vec<Document>,
        catalog: &SectionCatalog,
        intents: &IntentCatalog,
    ) -> Result<Self> {
        let summaries: Vec<String> = corpus.iter().map(|d| d.summary.clone()).collect();
        let vectors = if summaries.is_empty() {
            Vec::new()
        } else {
            provider.embed(&summaries).await?
        };
        let index = Self::from_vectors(corpus, vectors, catalog, intents)?;
        tracing::info!(
            documents = index.len(),
            dims = index.dims(),
            model = provider.model_name(),
            "similarity index ready"
        );
        Ok(index)
    }

    /// Assemble an index from precomputed vectors.
    ///
    /// `vectors[i]` must be the embedding of `corpus[i].summary`.
    pub fn from_vectors(
        corpus: Vec<Document>,
        vectors: Vec<Vec<f32>>,
        catalog: &SectionCatalog,
        intents: &IntentCatalog,
    ) -> Result<Self> {
        if corpus.len() != vectors.len() {
            bail!(
                "embedding count mismatch: {} documents but {} vectors",
                corpus.len(),
                vectors.len()
            );
        }

        let dims = vectors.first().map(Vec::len).unwrap_or(0);
        if let Some(pos) = vectors.iter().position(|v| v.len() != dims || v.is_empty()) {
            bail!(
                "embedding for document #{} has {} dimensions, expected {}",
                pos,
                vectors[pos].len(),
                dims
            );
        }

        let parser = SectionParser::new(catalog, intents.labels())?;
        let entries = corpus
            .into_iter()
            .zip(vectors)
            .map(|(document, vector)| {
                let sections = parser.parse(&document.summary);
                IndexedDocument {
                    document,
                    vector,
                    sections,
                }
            })
            .collect();

        Ok(Self { entries, dims })
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Vector dimensionality (`0` for an empty index).
    pub fn dims(&self) -> usize {
        self.dims
    }

    pub fn get(&self, position: usize) -> Option<&IndexedDocument> {
        self.entries.get(position)
    }

    pub fn entries(&self) -> &[IndexedDocument] {
        &self.entries
    }

    /// Cosine similarity of `query_vec` against every document, in corpus order.
    pub fn scores(&self, query_vec: &[f32]) -> Vec<f32> {
        self.entries
            .iter()
            .map(|e| cosine_similarity(query_vec, &e.vector))
            .collect()
    }

    /// The highest-scoring document, earliest first on ties.
    ///
    /// Returns `Ok(None)` only for an empty index. No relevance threshold is
    /// applied here.
    ///
    /// # Errors
    ///
    /// Fails if the query vector's dimensionality differs from the index.
    pub fn best_match(&self, query_vec: &[f32]) -> Result<Option<MatchHit>> {
        if !self.is_empty() && query_vec.len() != self.dims {
            bail!(
                "query embedding has {} dimensions, index has {}",
                query_vec.len(),
                self.dims
            );
        }

        let mut best: Option<(usize, f32)> = None;
        for (position, score) in self.scores(query_vec).into_iter().enumerate() {
            let better = match best {
                None => !score.is_nan(),
                Some((_, top)) => score > top,
            };
            if better {
                best = Some((position, score));
            }
        }

        Ok(best.map(|(position, score)| MatchHit {
            position,
            score,
            document: self.entries[position].document.clone(),
        }))
    }
}
