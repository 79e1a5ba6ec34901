//! Core data models for the ingestion and retrieval pipeline.
//!
//! Metadata is kept as a string-to-string map whose shape matches the
//! persisted `chunks_metadata.json` exactly; integer-valued fields like
//! `token_count` are stringified at chunk construction time. `BTreeMap`
//! keeps key order deterministic across serialization.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Metadata attached to documents and chunks.
pub type Metadata = BTreeMap<String, String>;

/// A loaded document. Immutable after load; metadata carries at minimum
/// `source`, `filename`, and `relative_path` for provenance.
#[derive(Debug, Clone)]
pub struct Document {
    pub content: String,
    pub metadata: Metadata,
}

/// A structurally delimited region of a document. Transient — produced by
/// the section splitter, consumed by the chunk builder, never persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Section {
    pub title: String,
    pub body: String,
}

/// Sentinel title for content that precedes the first detected header.
pub const INTRO_TITLE: &str = "Introduction";

/// The atomic unit of indexing and retrieval: a bounded-size piece of
/// document text plus inherited provenance metadata, `section_title`,
/// `token_count`, and `chunk_index` (both string-encoded integers).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Chunk {
    pub text: String,
    pub metadata: Metadata,
}

impl Chunk {
    /// String-encoded `token_count`, parsed; 0 if missing or malformed.
    pub fn token_count(&self) -> usize {
        self.metadata
            .get("token_count")
            .and_then(|v| v.parse().ok())
            .unwrap_or(0)
    }

    /// String-encoded `chunk_index`, parsed; 0 if missing or malformed.
    pub fn chunk_index(&self) -> usize {
        self.metadata
            .get("chunk_index")
            .and_then(|v| v.parse().ok())
            .unwrap_or(0)
    }
}
