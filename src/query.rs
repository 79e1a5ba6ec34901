//! Query command: embed the query, search the store, print ranked results.

use anyhow::{Context, Result};

use crate::config::Config;
use crate::embedding;
use crate::store::VectorStore;

const PREVIEW_CHARS: usize = 300;

pub async fn run_search(config: &Config, query: &str, k: usize) -> Result<()> {
    if query.trim().is_empty() {
        println!("No results.");
        return Ok(());
    }

    let store = VectorStore::load(&config.store.dir).with_context(|| {
        format!(
            "Failed to load vector store from {} (run `docdex ingest` first)",
            config.store.dir.display()
        )
    })?;

    let query_vector = embedding::embed_query(&config.embedding, query).await?;
    let results = store.search(&query_vector, k)?;

    if results.is_empty() {
        println!("No results.");
        return Ok(());
    }

    println!("query: {query}");
    println!("top {} of {} chunks:", results.len(), store.len());
    println!();

    for (i, (chunk, distance)) in results.iter().enumerate() {
        // Squared L2 over unit vectors; map into a (0, 1] similarity for display.
        let similarity = 1.0 / (1.0 + *distance as f64);

        println!(
            "{}. [{:.3}] {} / {}",
            i + 1,
            similarity,
            chunk
                .metadata
                .get("relative_path")
                .map(String::as_str)
                .unwrap_or("unknown"),
            chunk
                .metadata
                .get("section_title")
                .map(String::as_str)
                .unwrap_or("(untitled)"),
        );
        println!(
            "    distance: {:.4}  tokens: {}  chunk: {}",
            distance,
            chunk
                .metadata
                .get("token_count")
                .map(String::as_str)
                .unwrap_or("?"),
            chunk
                .metadata
                .get("chunk_index")
                .map(String::as_str)
                .unwrap_or("?"),
        );
        println!("    excerpt: \"{}\"", preview(&chunk.text));
        println!();
    }

    Ok(())
}

/// First `PREVIEW_CHARS` characters on one line, with an ellipsis when cut.
fn preview(text: &str) -> String {
    let flat = text.replace('\n', " ");
    let flat = flat.trim();
    if flat.chars().count() <= PREVIEW_CHARS {
        flat.to_string()
    } else {
        let cut: String = flat.chars().take(PREVIEW_CHARS).collect();
        format!("{cut}...")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn short_text_is_untouched() {
        assert_eq!(preview("hello world"), "hello world");
    }

    #[test]
    fn newlines_are_flattened() {
        assert_eq!(preview("line one\nline two"), "line one line two");
    }

    #[test]
    fn long_text_is_cut_at_char_boundary() {
        let text = "é".repeat(400);
        let p = preview(&text);
        assert!(p.ends_with("..."));
        assert_eq!(p.chars().count(), PREVIEW_CHARS + 3);
    }
}
