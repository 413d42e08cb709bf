//! Question answering from the command line.
//!
//! # Usage
//!
//! ```bash
//! desk ask "what are the results of the bone density study"
//! desk ask "knowledge gaps in plant biology" --json
//! ```
//!
//! Text output is a title line followed by the summary with one sentence
//! per line. `--raw` keeps the summary exactly as stored; `--json` prints
//! the `{ "title", "summary" }` response shape.

use anyhow::Result;

use research_desk_core::desk::Desk;
use research_desk_core::models::{Answer, AnswerResponse};

use crate::config::Config;
use crate::service::open_desk;

/// How `desk ask` prints its answer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    /// Title line plus sentence-per-line summary.
    Text,
    /// Title line plus the summary verbatim.
    Raw,
    Json,
}

/// Answer one question against a built desk.
pub async fn answer(desk: &Desk, query: &str) -> Result<AnswerResponse> {
    let answer = desk.ask(query).await?;
    if let Answer::NoMatch { best: Some(best) } = &answer {
        tracing::debug!(
            title = %best.document.title,
            score = best.score,
            "rejected closest document"
        );
    }
    Ok(answer.to_response())
}

/// CLI entry point for `desk ask <query>`.
pub async fn run_ask(config: &Config, query: &str, format: OutputFormat) -> Result<()> {
    // Empty queries never need the index; skip the model load entirely.
    let response = if query.trim().is_empty() {
        Answer::EmptyQuery.to_response()
    } else {
        let desk = open_desk(config).await?;
        answer(&desk, query).await?
    };

    print!("{}", render(&response, format)?);
    Ok(())
}

/// Render a response for the terminal.
pub fn render(response: &AnswerResponse, format: OutputFormat) -> Result<String> {
    let out = match format {
        OutputFormat::Json => format!("{}\n", serde_json::to_string_pretty(response)?),
        OutputFormat::Raw => render_text(&response.title, &response.summary),
        OutputFormat::Text => render_text(&response.title, &split_sentences(&response.summary)),
    };
    Ok(out)
}

fn render_text(title: &str, body: &str) -> String {
    if title.is_empty() {
        format!("{}\n", body)
    } else {
        format!("{}\n{}\n\n{}\n", title, "=".repeat(title.chars().count()), body)
    }
}

/// Put each sentence on its own line by breaking after every `". "`.
pub fn split_sentences(text: &str) -> String {
    text.replace(". ", ".\n")
}
