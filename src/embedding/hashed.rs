//! Feature-hashing embedding provider.
//!
//! Produces deterministic dense vectors by hashing lowercase terms into
//! fixed-dimension buckets (FNV-1a) weighted by term frequency. Far less
//! semantic than a neural model, but it needs no model files and no network,
//! which makes it usable in air-gapped setups and in tests.

use std::collections::HashMap;

use anyhow::Result;
use async_trait::async_trait;

use research_desk_core::embedding::EmbeddingProvider;

pub struct HashedProvider {
    dims: usize,
}

impl HashedProvider {
    pub fn new(dims: usize) -> Self {
        Self { dims: dims.max(1) }
    }

    fn bucket(term: &str, dims: usize) -> usize {
        let mut h: u64 = 0xcbf29ce484222325;
        for b in term.as_bytes() {
            h ^= *b as u64;
            h = h.wrapping_mul(0x100000001b3);
        }
        (h % dims as u64) as usize
    }

    fn tokenize(text: &str) -> impl Iterator<Item = String> + '_ {
        text.split(|c: char| !c.is_alphanumeric())
            .filter(|s| s.chars().count() >= 2)
            .map(|s| s.to_lowercase())
    }

    fn vector(&self, text: &str) -> Vec<f32> {
        let mut tf: HashMap<String, f32> = HashMap::new();
        let mut total = 0.0f32;
        for term in Self::tokenize(text) {
            *tf.entry(term).or_default() += 1.0;
            total += 1.0;
        }

        let mut vec = vec![0.0f32; self.dims];
        if total == 0.0 {
            return vec;
        }

        for (term, count) in &tf {
            // Longer terms carry more meaning than short function words.
            let weight = 1.0 + (term.chars().count() as f32).ln();
            vec[Self::bucket(term, self.dims)] += (count / total) * weight;
        }

        let norm: f32 = vec.iter().map(|x| x * x).sum::<f32>().sqrt();
        if norm > f32::EPSILON {
            for v in &mut vec {
                *v /= norm;
            }
        }
        vec
    }
}

#[async_trait]
impl EmbeddingProvider for HashedProvider {
    fn model_name(&self) -> &str {
        "hashed"
    }

    fn dims(&self) -> usize {
        self.dims
    }

    async fn embed(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
        Ok(texts.iter().map(|t| self.vector(t)).collect())
    }
}
