//! # docdex
//!
//! Semantic retrieval over plain-text reference documentation.
//!
//! docdex ingests a tree of plain-text docs (underline-style section
//! headers), splits each document into retrieval-sized chunks with
//! provenance metadata, embeds the chunks, and answers natural-language
//! queries by exact nearest-neighbor search over the embeddings.
//!
//! ```text
//! docs/*.txt ──▶ section splitter ──▶ chunk builder ──▶ embedding
//!                                                          │
//!                          query ──▶ embedding ──▶ vector store ──▶ results
//! ```
//!
//! ## Quick Start
//!
//! ```bash
//! docdex ingest                  # build and save the vector store
//! docdex search "list methods"   # semantic search
//! docdex stats                   # store summary
//! docdex inspect --sample 5      # eyeball chunk quality
//! ```
//!
//! ## Modules
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`config`] | TOML configuration parsing |
//! | [`models`] | Core data types |
//! | [`loader`] | Filesystem document loading |
//! | [`section`] | Underline-header section splitting |
//! | [`chunk`] | Section-aware chunk building |
//! | [`tokens`] | cl100k_base token counting |
//! | [`embedding`] | Embedding provider gateway |
//! | [`store`] | Exact-search vector store and persistence |
//! | [`ingest`] | Ingestion pipeline command |
//! | [`query`] | Search command |
//! | [`inspect`] | Stats and chunk inspection commands |

pub mod chunk;
pub mod config;
pub mod embedding;
pub mod ingest;
pub mod inspect;
pub mod loader;
pub mod models;
pub mod query;
pub mod section;
pub mod store;
pub mod tokens;
