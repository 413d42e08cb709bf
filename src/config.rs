//! TOML configuration.
//!
//! ```toml
//! [corpus]
//! path = "./data/summaries.json"
//!
//! [embedding]
//! provider = "local"            # local | openai | ollama | hashed
//! model = "all-minilm-l12-v2"
//!
//! [retrieval]
//! relevance_threshold = 0.30
//!
//! [catalog]
//! labels = ["Impacts", "Results"]
//!
//! [[catalog.intents]]
//! key = "impact"
//! labels = ["Impacts", "Impact"]
//! ```
//!
//! Relative corpus paths are resolved against the config file's directory.

use anyhow::{bail, Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};

use research_desk_core::catalog::{Intent, IntentCatalog, SectionCatalog};
use research_desk_core::desk::{DeskOptions, DEFAULT_RELEVANCE_THRESHOLD};

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub corpus: CorpusConfig,
    #[serde(default)]
    pub embedding: EmbeddingConfig,
    #[serde(default)]
    pub retrieval: RetrievalConfig,
    #[serde(default)]
    pub catalog: CatalogConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct CorpusConfig {
    pub path: PathBuf,
}

#[derive(Debug, Deserialize, Clone)]
pub struct EmbeddingConfig {
    #[serde(default = "default_provider")]
    pub provider: String,
    #[serde(default)]
    pub model: Option<String>,
    #[serde(default)]
    pub dims: Option<usize>,
    #[serde(default = "default_batch_size")]
    pub batch_size: usize,
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    /// Base URL for the Ollama provider.
    #[serde(default)]
    pub url: Option<String>,
}

impl Default for EmbeddingConfig {
    fn default() -> Self {
        Self {
            provider: default_provider(),
            model: None,
            dims: None,
            batch_size: default_batch_size(),
            max_retries: default_max_retries(),
            timeout_secs: default_timeout_secs(),
            url: None,
        }
    }
}

fn default_provider() -> String {
    "local".to_string()
}
fn default_batch_size() -> usize {
    64
}
fn default_max_retries() -> u32 {
    5
}
fn default_timeout_secs() -> u64 {
    30
}

#[derive(Debug, Deserialize, Clone)]
pub struct RetrievalConfig {
    #[serde(default = "default_relevance_threshold")]
    pub relevance_threshold: f32,
}

impl Default for RetrievalConfig {
    fn default() -> Self {
        Self {
            relevance_threshold: default_relevance_threshold(),
        }
    }
}

fn default_relevance_threshold() -> f32 {
    DEFAULT_RELEVANCE_THRESHOLD
}

/// Optional overrides for the section and intent tables.
///
/// Each list replaces the built-in default when present.
#[derive(Debug, Deserialize, Clone, Default)]
pub struct CatalogConfig {
    #[serde(default)]
    pub labels: Option<Vec<String>>,
    #[serde(default)]
    pub intents: Option<Vec<Intent>>,
}

impl Config {
    /// Section catalog, intent catalog, and threshold for the desk.
    pub fn desk_options(&self) -> Result<DeskOptions> {
        let sections = match &self.catalog.labels {
            Some(labels) => SectionCatalog::new(labels.clone()).context("invalid [catalog] labels")?,
            None => SectionCatalog::default(),
        };
        let intents = match &self.catalog.intents {
            Some(intents) => {
                IntentCatalog::new(intents.clone()).context("invalid [[catalog.intents]]")?
            }
            None => IntentCatalog::default(),
        };
        Ok(DeskOptions {
            relevance_threshold: self.retrieval.relevance_threshold,
            sections,
            intents,
        })
    }
}

pub fn load_config(path: &Path) -> Result<Config> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {}", path.display()))?;

    let mut config: Config =
        toml::from_str(&content).with_context(|| "Failed to parse config file")?;

    if config.corpus.path.is_relative() {
        if let Some(dir) = path.parent() {
            config.corpus.path = dir.join(&config.corpus.path);
        }
    }

    validate(&config)?;
    Ok(config)
}

fn validate(config: &Config) -> Result<()> {
    let threshold = config.retrieval.relevance_threshold;
    if !(-1.0..=1.0).contains(&threshold) {
        bail!("retrieval.relevance_threshold must be in [-1.0, 1.0]");
    }

    if config.embedding.batch_size == 0 {
        bail!("embedding.batch_size must be > 0");
    }

    match config.embedding.provider.as_str() {
        "local" => {}
        "openai" | "ollama" | "hashed" => {
            if config.embedding.dims.is_none() || config.embedding.dims == Some(0) {
                bail!(
                    "embedding.dims must be > 0 when provider is '{}'",
                    config.embedding.provider
                );
            }
            if config.embedding.provider != "hashed" && config.embedding.model.is_none() {
                bail!(
                    "embedding.model must be specified when provider is '{}'",
                    config.embedding.provider
                );
            }
        }
        other => bail!(
            "Unknown embedding provider: '{}'. Must be local, openai, ollama, or hashed.",
            other
        ),
    }

    // Surface catalog errors at load time rather than at first use.
    config.desk_options()?;

    Ok(())
}
