//! # Research Desk
//!
//! Semantic question answering over a small, fixed corpus of research
//! summaries.
//!
//! A question is embedded with a sentence-embedding model and compared to
//! every summary by cosine similarity. The single best summary is returned
//! if it clears a relevance threshold. When the question asks about a
//! specific part of a study ("what were the impacts?") and the summary has a
//! matching labeled section, only that section is returned.
//!
//! ## Architecture
//!
//! ```text
//! ┌────────────┐   ┌──────────────┐   ┌──────────────────┐
//! │ corpus.json│──▶│  Embedding   │──▶│ SimilarityIndex  │
//! │ title+sum. │   │  provider    │   │ vectors+sections │
//! └────────────┘   └──────────────┘   └────────┬─────────┘
//!                                              │
//!                  query ──▶ Desk::ask ◀───────┘
//!                               │
//!                   ┌───────────┴───────────┐
//!                   ▼                       ▼
//!             relevance gate          intent router
//!             (NoMatch)               (Section | FullSummary)
//! ```
//!
//! The matching and extraction logic lives in the `research-desk-core`
//! crate. This crate adds configuration, corpus loading, the concrete
//! embedding providers, and the `desk` CLI.
//!
//! ## Modules
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`config`] | TOML configuration parsing |
//! | [`corpus`] | Corpus file loading and fingerprinting |
//! | [`embedding`] | Local, OpenAI, Ollama, and hashed embedding providers |
//! | [`service`] | Builds a ready [`Desk`](research_desk_core::desk::Desk) from config |
//! | [`ask`] | `desk ask` and answer rendering |
//! | [`inspect`] | `desk sections` and `desk intents` |
//! | [`stats`] | `desk stats` |

pub mod ask;
pub mod config;
pub mod corpus;
pub mod embedding;
pub mod inspect;
pub mod service;
pub mod stats;

pub use research_desk_core as core;
