//! Catalog and section inspection.
//!
//! `desk sections` shows how each summary splits into labeled sections and
//! `desk intents` prints the intent table in evaluation order. Neither
//! command loads an embedding model.

use anyhow::{bail, Result};

use research_desk_core::catalog::IntentCatalog;
use research_desk_core::models::Document;
use research_desk_core::sections::{SectionMap, SectionParser};

use crate::config::Config;
use crate::corpus;

/// CLI entry point for `desk sections [<position>]`.
pub fn run_sections(config: &Config, position: Option<usize>) -> Result<()> {
    let options = config.desk_options()?;
    let documents = corpus::load_corpus(&config.corpus.path)?;

    let selected: Vec<(usize, &Document)> = match position {
        Some(pos) => match documents.get(pos) {
            Some(doc) => vec![(pos, doc)],
            None => bail!(
                "no document at position {} (corpus has {})",
                pos,
                documents.len()
            ),
        },
        None => documents.iter().enumerate().collect(),
    };

    let parser = SectionParser::new(&options.sections, options.intents.labels())?;
    for (pos, doc) in selected {
        print!("{}", render_sections(pos, doc, &parser.parse(&doc.summary)));
    }
    Ok(())
}

fn render_sections(position: usize, doc: &Document, map: &SectionMap) -> String {
    let mut out = format!("[{}] {}\n", position, doc.title);
    if map.is_empty() {
        out.push_str("    (no labeled sections)\n");
    }
    for section in map.sections() {
        out.push_str(&format!("    {}: {}\n", section.label, section.text));
    }
    out.push('\n');
    out
}

/// CLI entry point for `desk intents`.
pub fn run_intents(config: &Config) -> Result<()> {
    let options = config.desk_options()?;
    print!("{}", render_intents(&options.intents));
    Ok(())
}

fn render_intents(intents: &IntentCatalog) -> String {
    let mut out = format!("  {:<4} {:<12} {}\n", "#", "KEY", "LABELS");
    out.push_str(&format!("  {}\n", "-".repeat(60)));
    for (i, intent) in intents.intents().iter().enumerate() {
        out.push_str(&format!(
            "  {:<4} {:<12} {}\n",
            i + 1,
            intent.key,
            intent.labels.join(", ")
        ));
    }
    out
}
