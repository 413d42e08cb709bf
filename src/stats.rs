//! Corpus and index overview.
//!
//! `desk stats` builds the full index (so it doubles as a smoke test of the
//! configured embedding provider) and prints what was loaded: document
//! count, corpus fingerprint, model, and how many summaries carry each
//! section label.

use anyhow::Result;

use research_desk_core::desk::Desk;
use research_desk_core::models::Document;
use research_desk_core::sections::labels_equal;

use crate::config::Config;
use crate::corpus;
use crate::service::open_desk;

/// Per-label coverage across the corpus.
struct LabelCoverage {
    label: String,
    documents: usize,
}

/// Run the stats command: build the desk and print a summary.
pub async fn run_stats(config: &Config) -> Result<()> {
    let desk = open_desk(config).await?;
    let documents: Vec<Document> = desk
        .index()
        .entries()
        .iter()
        .map(|e| e.document.clone())
        .collect();

    println!("Research Desk — Corpus Stats");
    println!("============================");
    println!();
    println!("  Corpus:      {}", config.corpus.path.display());
    println!("  Documents:   {}", documents.len());
    println!("  Fingerprint: {}", corpus::fingerprint(&documents));
    println!();
    println!("  Provider:    {}", config.embedding.provider);
    println!("  Model:       {}", desk.provider().model_name());
    println!("  Dimensions:  {}", desk.index().dims());
    println!("  Threshold:   {:.2}", desk.options().relevance_threshold);

    let coverage = label_coverage(&desk);
    if !coverage.is_empty() {
        println!();
        println!("  {:<44} {:>6}", "SECTION", "DOCS");
        println!("  {}", "-".repeat(51));
        for c in &coverage {
            println!("  {:<44} {:>6}", c.label, c.documents);
        }
    }

    let unstructured = desk
        .index()
        .entries()
        .iter()
        .filter(|e| e.sections.is_empty())
        .count();
    println!();
    println!("  Without sections: {}", unstructured);

    Ok(())
}

/// Count documents per label, for catalog labels then intent-only labels.
fn label_coverage(desk: &Desk) -> Vec<LabelCoverage> {
    let options = desk.options();
    let mut labels: Vec<&str> = options.sections.labels().iter().map(String::as_str).collect();
    for label in options.intents.labels() {
        if !labels.iter().any(|l| labels_equal(l, label)) {
            labels.push(label);
        }
    }

    labels
        .into_iter()
        .map(|label| LabelCoverage {
            label: label.to_string(),
            documents: desk
                .index()
                .entries()
                .iter()
                .filter(|e| e.sections.lookup(&[label]).is_some())
                .count(),
        })
        .collect()
}
