//! Service bootstrap.
//!
//! Turns a [`Config`] into a ready [`Desk`]: load the corpus, create the
//! embedding provider, and embed every summary. Each step is fatal on
//! failure; nothing here is retried or skipped.

use anyhow::{Context, Result};

use research_desk_core::desk::Desk;

use crate::config::Config;
use crate::corpus;
use crate::embedding;

/// Build the query service described by `config`.
pub async fn open_desk(config: &Config) -> Result<Desk> {
    let options = config.desk_options()?;
    let documents = corpus::load_corpus(&config.corpus.path)?;
    let provider = embedding::create_provider(&config.embedding)
        .await
        .context("Failed to initialize embedding provider")?;

    Desk::build(provider, documents, options)
        .await
        .context("Failed to build similarity index")
}
