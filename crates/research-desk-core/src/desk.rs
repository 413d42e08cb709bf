//! The question-answering service.
//!
//! A [`Desk`] owns everything needed to answer a query: the embedding
//! provider, the prebuilt [`SimilarityIndex`], the intent catalog, and the
//! relevance threshold. It is constructed explicitly once and is immutable
//! afterwards, so a single instance can be shared (behind an `Arc`) by any
//! number of concurrent callers.
//!
//! # Request Path
//!
//! ```text
//! query ──▶ trim ──▶ empty? ──yes──▶ EmptyQuery
//!                      │no
//!                      ▼
//!               embed + argmax ──▶ score < threshold? ──yes──▶ NoMatch
//!                                        │no
//!                                        ▼
//!                                 route by intent ──▶ Section | FullSummary
//! ```

use std::sync::Arc;

use anyhow::{bail, Result};

use crate::catalog::{IntentCatalog, SectionCatalog};
use crate::embedding::{embed_one, EmbeddingProvider};
use crate::index::SimilarityIndex;
use crate::models::{Answer, Document};
use crate::router::route;

/// Minimum cosine similarity for a match to count as relevant.
pub const DEFAULT_RELEVANCE_THRESHOLD: f32 = 0.30;

/// Tuning and catalog data for a [`Desk`].
#[derive(Debug, Clone)]
pub struct DeskOptions {
    /// Matches scoring strictly below this value are rejected.
    pub relevance_threshold: f32,
    pub sections: SectionCatalog,
    pub intents: IntentCatalog,
}

impl Default for DeskOptions {
    fn default() -> Self {
        Self {
            relevance_threshold: DEFAULT_RELEVANCE_THRESHOLD,
            sections: SectionCatalog::default(),
            intents: IntentCatalog::default(),
        }
    }
}

/// Immutable query service over one corpus and one embedding model.
pub struct Desk {
    provider: Arc<dyn EmbeddingProvider>,
    index: SimilarityIndex,
    options: DeskOptions,
}

impl Desk {
    /// Embed the corpus and build the service.
    ///
    /// # Errors
    ///
    /// Fails on an invalid threshold or if the index cannot be built. Both
    /// are startup failures: a desk with a broken index must not serve.
    pub async fn build(
        provider: Arc<dyn EmbeddingProvider>,
        corpus: Vec<Document>,
        options: DeskOptions,
    ) -> Result<Self> {
        validate_threshold(options.relevance_threshold)?;
        let index =
            SimilarityIndex::build(provider.as_ref(), corpus, &options.sections, &options.intents)
                .await?;
        Ok(Self {
            provider,
            index,
            options,
        })
    }

    /// Wrap an already-built index.
    pub fn from_index(
        provider: Arc<dyn EmbeddingProvider>,
        index: SimilarityIndex,
        options: DeskOptions,
    ) -> Result<Self> {
        validate_threshold(options.relevance_threshold)?;
        Ok(Self {
            provider,
            index,
            options,
        })
    }

    /// Answer one query.
    ///
    /// Rejections ([`Answer::EmptyQuery`], [`Answer::NoMatch`]) are values.
    /// Errors are reserved for provider failures and a query vector that
    /// does not fit the index.
    pub async fn ask(&self, query: &str) -> Result<Answer> {
        let query = query.trim();
        if query.is_empty() {
            return Ok(Answer::EmptyQuery);
        }

        let query_vec = embed_one(self.provider.as_ref(), query).await?;
        let best = self.index.best_match(&query_vec)?;

        let hit = match best {
            Some(hit) if hit.score >= self.options.relevance_threshold => hit,
            best => {
                if let Some(hit) = &best {
                    tracing::info!(
                        title = %hit.document.title,
                        score = format_args!("{:.3}", hit.score),
                        threshold = self.options.relevance_threshold,
                        "best match below relevance threshold"
                    );
                }
                return Ok(Answer::NoMatch { best });
            }
        };

        tracing::info!(
            title = %hit.document.title,
            score = format_args!("{:.3}", hit.score),
            "best match"
        );

        let entry = match self.index.get(hit.position) {
            Some(entry) => entry,
            None => bail!("index entry #{} disappeared", hit.position),
        };
        Ok(route(query, hit, &entry.sections, &self.options.intents))
    }

    pub fn index(&self) -> &SimilarityIndex {
        &self.index
    }

    pub fn options(&self) -> &DeskOptions {
        &self.options
    }

    pub fn provider(&self) -> &dyn EmbeddingProvider {
        self.provider.as_ref()
    }
}

fn validate_threshold(threshold: f32) -> Result<()> {
    if !(-1.0..=1.0).contains(&threshold) {
        bail!(
            "relevance threshold must be in [-1.0, 1.0], got {}",
            threshold
        );
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::AnswerResponse;
    use async_trait::async_trait;
    use std::collections::HashMap;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Maps known texts to fixed vectors; everything else to a fallback.
    struct ScriptedProvider {
        vectors: HashMap<String, Vec<f32>>,
        fallback: Vec<f32>,
        calls: AtomicUsize,
    }

    impl ScriptedProvider {
        fn new(pairs: &[(&str, Vec<f32>)], fallback: Vec<f32>) -> Self {
            Self {
                vectors: pairs
                    .iter()
                    .map(|(t, v)| (t.to_string(), v.clone()))
                    .collect(),
                fallback,
                calls: AtomicUsize::new(0),
            }
        }
    }

    #[async_trait]
    impl EmbeddingProvider for ScriptedProvider {
        fn model_name(&self) -> &str {
            "scripted"
        }
        fn dims(&self) -> usize {
            self.fallback.len()
        }
        async fn embed(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(texts
                .iter()
                .map(|t| self.vectors.get(t).cloned().unwrap_or_else(|| self.fallback.clone()))
                .collect())
        }
    }

    const BONE: &str = "Results: Bone loss observed. Impacts: Mission duration limits.";

    /// Unit vector whose cosine against `[1, 0]` is `score`.
    fn at_score(score: f32) -> Vec<f32> {
        vec![score, (1.0 - score * score).sqrt()]
    }

    async fn bone_desk(queries: &[(&str, Vec<f32>)]) -> (Desk, Arc<ScriptedProvider>) {
        let mut pairs = vec![(BONE, vec![1.0, 0.0])];
        pairs.extend(queries.iter().cloned());
        let provider = Arc::new(ScriptedProvider::new(&pairs, vec![0.0, 1.0]));
        let desk = Desk::build(
            provider.clone(),
            vec![Document::new("Bone Density Study", BONE)],
            DeskOptions::default(),
        )
        .await
        .unwrap();
        (desk, provider)
    }

    #[tokio::test]
    async fn test_section_answer_end_to_end() {
        let (desk, _) = bone_desk(&[("what are the results", at_score(0.85))]).await;
        let resp = desk.ask("what are the results").await.unwrap().to_response();
        assert_eq!(
            resp,
            AnswerResponse {
                title: "Bone Density Study — Results".to_string(),
                summary: "Bone loss observed.".to_string(),
            }
        );
    }

    #[tokio::test]
    async fn test_low_score_is_no_match() {
        let (desk, _) = bone_desk(&[("tell me about plants", at_score(0.12))]).await;
        let answer = desk.ask("tell me about plants").await.unwrap();
        assert!(matches!(answer, Answer::NoMatch { best: Some(_) }));
        let resp = answer.to_response();
        assert_eq!(resp.title, "");
        assert_eq!(resp.summary, "No relevant summary found.");
    }

    #[tokio::test]
    async fn test_no_match_ignores_intent_keywords() {
        let (desk, _) = bone_desk(&[("results of plant impacts", at_score(0.29))]).await;
        let answer = desk.ask("results of plant impacts").await.unwrap();
        assert!(matches!(answer, Answer::NoMatch { .. }));
    }

    #[tokio::test]
    async fn test_threshold_is_inclusive() {
        let provider = Arc::new(ScriptedProvider::new(
            &[(BONE, vec![1.0, 0.0]), ("exact", vec![0.5, 0.5])],
            vec![0.0, 1.0],
        ));
        let options = DeskOptions {
            relevance_threshold: crate::embedding::cosine_similarity(&[0.5, 0.5], &[1.0, 0.0]),
            ..DeskOptions::default()
        };
        let desk = Desk::build(
            provider,
            vec![Document::new("Bone Density Study", BONE)],
            options,
        )
        .await
        .unwrap();
        assert!(desk.ask("exact").await.unwrap().hit().is_some());
    }

    #[tokio::test]
    async fn test_empty_query_skips_embedding() {
        let (desk, provider) = bone_desk(&[]).await;
        let before = provider.calls.load(Ordering::SeqCst);

        for query in ["", "   ", "\n\t"] {
            let answer = desk.ask(query).await.unwrap();
            assert_eq!(answer, Answer::EmptyQuery);
            assert_eq!(answer.to_response().summary, "Please enter a question.");
            assert_eq!(answer.to_response().title, "");
        }
        assert_eq!(provider.calls.load(Ordering::SeqCst), before);
    }

    #[tokio::test]
    async fn test_full_summary_without_intent() {
        let (desk, _) = bone_desk(&[("bone density in space", at_score(0.9))]).await;
        let resp = desk.ask("bone density in space").await.unwrap().to_response();
        assert_eq!(resp.title, "Bone Density Study");
        assert_eq!(resp.summary, BONE);
    }

    #[tokio::test]
    async fn test_query_is_trimmed_before_embedding() {
        let (desk, _) = bone_desk(&[("what are the results", at_score(0.85))]).await;
        let answer = desk.ask("  what are the results \n").await.unwrap();
        assert!(matches!(answer, Answer::Section { .. }));
    }

    #[tokio::test]
    async fn test_tied_documents_pick_earliest() {
        let provider = Arc::new(ScriptedProvider::new(
            &[
                ("first", vec![1.0, 0.0]),
                ("second", vec![1.0, 0.0]),
                ("q", vec![1.0, 0.0]),
            ],
            vec![0.0, 1.0],
        ));
        let desk = Desk::build(
            provider,
            vec![Document::new("A", "first"), Document::new("B", "second")],
            DeskOptions::default(),
        )
        .await
        .unwrap();
        let answer = desk.ask("q").await.unwrap();
        assert_eq!(answer.hit().unwrap().position, 0);
        assert_eq!(answer.to_response().title, "A");
    }

    #[tokio::test]
    async fn test_repeated_queries_are_identical() {
        let (desk, _) = bone_desk(&[("impacts", at_score(0.7))]).await;
        let a = desk.ask("impacts").await.unwrap();
        let b = desk.ask("impacts").await.unwrap();
        assert_eq!(a, b);
    }

    #[tokio::test]
    async fn test_rejects_out_of_range_threshold() {
        let provider = Arc::new(ScriptedProvider::new(&[], vec![1.0]));
        let options = DeskOptions {
            relevance_threshold: 1.5,
            ..DeskOptions::default()
        };
        assert!(Desk::build(provider, vec![], options).await.is_err());
    }

    #[tokio::test]
    async fn test_from_index_serves_precomputed_vectors() {
        let options = DeskOptions::default();
        let index = SimilarityIndex::from_vectors(
            vec![Document::new("Bone Density Study", BONE)],
            vec![vec![1.0, 0.0]],
            &options.sections,
            &options.intents,
        )
        .unwrap();
        let provider = Arc::new(ScriptedProvider::new(
            &[("impacts?", at_score(0.9))],
            vec![0.0, 1.0],
        ));
        let desk = Desk::from_index(provider.clone(), index, options).unwrap();

        let resp = desk.ask("impacts?").await.unwrap().to_response();
        assert_eq!(resp.title, "Bone Density Study — Impacts");
        assert_eq!(resp.summary, "Mission duration limits.");
        // Only the query was embedded; the corpus vectors were supplied.
        assert_eq!(provider.calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_from_index_rejects_out_of_range_threshold() {
        let options = DeskOptions {
            relevance_threshold: -2.0,
            ..DeskOptions::default()
        };
        let index =
            SimilarityIndex::from_vectors(vec![], vec![], &options.sections, &options.intents)
                .unwrap();
        let provider = Arc::new(ScriptedProvider::new(&[], vec![1.0]));
        assert!(Desk::from_index(provider, index, options).is_err());
    }

    #[test]
    fn test_desk_is_send_and_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<Desk>();
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_shared_desk_answers_concurrent_queries() {
        let (desk, provider) = bone_desk(&[("what are the results", at_score(0.85))]).await;
        let desk = Arc::new(desk);

        let handles: Vec<_> = (0..8)
            .map(|_| {
                let desk = Arc::clone(&desk);
                tokio::spawn(async move { desk.ask("what are the results").await })
            })
            .collect();

        let expected = desk.ask("what are the results").await.unwrap();
        for handle in handles {
            assert_eq!(handle.await.unwrap().unwrap(), expected);
        }
        assert_eq!(expected.to_response().title, "Bone Density Study — Results");
        // One corpus embedding plus nine queries.
        assert_eq!(provider.calls.load(Ordering::SeqCst), 10);
    }
}
