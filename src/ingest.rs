//! Ingestion pipeline orchestration.
//!
//! Runs the full flow: document loading → section-aware chunking →
//! batched embedding → vector store build → save. Each stage reports
//! progress; dry runs stop after chunking and print what would happen.

use anyhow::{bail, Result};

use crate::chunk::SemanticChunker;
use crate::config::Config;
use crate::embedding;
use crate::loader;
use crate::store::VectorStore;

pub async fn run_ingest(config: &Config, dry_run: bool, limit: Option<usize>) -> Result<()> {
    println!(
        "[1/4] loading documents from {}",
        config.docs.root.display()
    );
    let mut documents = loader::load_documents(&config.docs)?;
    if let Some(lim) = limit {
        documents.truncate(lim);
    }
    println!("  documents: {}", documents.len());

    println!("[2/4] chunking");
    let chunker = SemanticChunker::new(
        config.chunking.target_chunk_size,
        config.chunking.max_chunk_size,
        config.chunking.overlap_size,
    );
    let chunks = chunker.chunk_documents(&documents);
    let avg_tokens = if chunks.is_empty() {
        0.0
    } else {
        chunks.iter().map(|c| c.token_count()).sum::<usize>() as f64 / chunks.len() as f64
    };
    println!("  chunks: {}", chunks.len());
    println!("  average chunk size: {avg_tokens:.0} tokens");

    if dry_run {
        println!("ingest (dry-run) — stopping before embedding");
        return Ok(());
    }
    if chunks.is_empty() {
        bail!("No chunks produced; nothing to index");
    }

    let provider = embedding::create_provider(&config.embedding)?;
    println!(
        "[3/4] embedding with {} ({} dims)",
        provider.model_name(),
        provider.dims()
    );
    let mut vectors = Vec::with_capacity(chunks.len());
    for batch in chunks.chunks(config.embedding.batch_size) {
        let texts: Vec<String> = batch.iter().map(|c| c.text.clone()).collect();
        let batch_vectors = embedding::embed_texts(&config.embedding, &texts).await?;
        vectors.extend(batch_vectors);
        println!("  embedded {}/{}", vectors.len(), chunks.len());
    }

    println!("[4/4] building vector store");
    let mut store = VectorStore::new(provider.dims());
    store.add_chunks(chunks, vectors)?;
    store.save(&config.store.dir)?;
    println!(
        "  saved {} vectors to {}",
        store.len(),
        config.store.dir.display()
    );
    println!("ok");

    Ok(())
}
