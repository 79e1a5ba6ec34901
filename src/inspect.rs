//! Store inspection commands: summary statistics and chunk sampling.
//!
//! Sampling is deterministic (evenly spaced rows rather than random) so
//! repeated inspections of the same store print the same chunks.

use anyhow::{Context, Result};
use std::collections::BTreeSet;

use crate::config::Config;
use crate::store::VectorStore;

pub fn run_stats(config: &Config) -> Result<()> {
    let store = load_store(config)?;

    let token_counts: Vec<usize> = store.chunks().iter().map(|c| c.token_count()).collect();
    let sources: BTreeSet<&str> = store
        .chunks()
        .iter()
        .filter_map(|c| c.metadata.get("relative_path").map(String::as_str))
        .collect();

    println!("store: {}", config.store.dir.display());
    println!("  chunks: {}", store.len());
    println!("  embedding dimension: {}", store.embedding_dim());
    println!("  source files: {}", sources.len());
    if !token_counts.is_empty() {
        let total: usize = token_counts.iter().sum();
        let min = token_counts.iter().min().unwrap();
        let max = token_counts.iter().max().unwrap();
        println!(
            "  tokens per chunk: min {min}, max {max}, avg {:.0}",
            total as f64 / token_counts.len() as f64
        );
    }

    Ok(())
}

pub fn run_inspect(config: &Config, sample: usize) -> Result<()> {
    let store = load_store(config)?;

    if store.is_empty() {
        println!("store is empty");
        return Ok(());
    }

    let indices = sample_indices(store.len(), sample);
    println!(
        "showing {} of {} chunks from {}",
        indices.len(),
        store.len(),
        config.store.dir.display()
    );

    for (n, &i) in indices.iter().enumerate() {
        let chunk = &store.chunks()[i];
        println!();
        println!("==== chunk {} (row {}) ====", n + 1, i);
        println!(
            "source:  {}",
            chunk
                .metadata
                .get("relative_path")
                .map(String::as_str)
                .unwrap_or("unknown")
        );
        println!(
            "section: {}",
            chunk
                .metadata
                .get("section_title")
                .map(String::as_str)
                .unwrap_or("(untitled)")
        );
        println!(
            "index: {}  tokens: {}",
            chunk
                .metadata
                .get("chunk_index")
                .map(String::as_str)
                .unwrap_or("?"),
            chunk
                .metadata
                .get("token_count")
                .map(String::as_str)
                .unwrap_or("?"),
        );
        println!("----");
        println!("{}", chunk.text);
    }

    Ok(())
}

fn load_store(config: &Config) -> Result<VectorStore> {
    VectorStore::load(&config.store.dir).with_context(|| {
        format!(
            "Failed to load vector store from {} (run `docdex ingest` first)",
            config.store.dir.display()
        )
    })
}

/// Up to `sample` evenly spaced row indices over `len` rows, in order.
fn sample_indices(len: usize, sample: usize) -> Vec<usize> {
    let n = sample.min(len).max(1);
    (0..n).map(|i| i * len / n).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sample_covers_small_stores_entirely() {
        assert_eq!(sample_indices(3, 5), vec![0, 1, 2]);
    }

    #[test]
    fn sample_is_evenly_spaced_and_in_bounds() {
        let idx = sample_indices(100, 5);
        assert_eq!(idx, vec![0, 20, 40, 60, 80]);
        assert!(idx.iter().all(|&i| i < 100));
    }

    #[test]
    fn sample_zero_still_shows_one() {
        assert_eq!(sample_indices(10, 0), vec![0]);
    }
}
