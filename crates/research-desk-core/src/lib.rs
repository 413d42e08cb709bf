//! # Research Desk Core
//!
//! Pure matching and extraction logic for Research Desk: corpus models,
//! section catalogs, section parsing, the similarity index, intent routing,
//! and the [`desk::Desk`] service that ties them together.
//!
//! This crate contains no tokio, no filesystem I/O, and no network code.
//! Embedding backends are plugged in through the
//! [`embedding::EmbeddingProvider`] trait.

pub mod catalog;
pub mod desk;
pub mod embedding;
pub mod index;
pub mod models;
pub mod router;
pub mod sections;
