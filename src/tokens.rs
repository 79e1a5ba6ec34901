//! Token counting via tiktoken's `cl100k_base` encoding.
//!
//! All chunk sizing decisions reference this one counter so that ingestion
//! and any later re-ingestion measure text the same way. The encoder is
//! built once per process.

use std::sync::OnceLock;
use tiktoken_rs::{cl100k_base, CoreBPE};

static ENCODER: OnceLock<CoreBPE> = OnceLock::new();

fn encoder() -> &'static CoreBPE {
    ENCODER.get_or_init(|| cl100k_base().expect("cl100k_base encoding is bundled"))
}

/// Count tokens in `text` under cl100k_base.
pub fn count_tokens(text: &str) -> usize {
    if text.is_empty() {
        return 0;
    }
    encoder().encode_with_special_tokens(text).len()
}
