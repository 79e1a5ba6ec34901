//! Section-aware chunk builder.
//!
//! Sections that fit within the target token size become a single chunk.
//! Oversized sections are split on paragraph boundaries (`\n\n`) into
//! chunks bounded by `max_chunk_size`, with a short sentence-tail overlap
//! carried from each chunk into its successor so local context survives
//! the split. One known boundary case: a single paragraph larger than
//! `max_chunk_size` is emitted as its own oversized chunk rather than
//! being split mid-paragraph.
//!
//! Every chunk's `token_count` metadata is recomputed from its final text,
//! never taken from the running accumulator, so the recorded count always
//! matches what the counter says about the stored text.

use crate::models::{Chunk, Document, Metadata, Section};
use crate::section::split_sections;
use crate::tokens;

/// Token counting function used for all sizing decisions.
pub type TokenCounter = fn(&str) -> usize;

/// Splits documents into bounded-size chunks along section structure.
pub struct SemanticChunker {
    target_chunk_size: usize,
    max_chunk_size: usize,
    /// Configured overlap budget in tokens. The current overlap strategy
    /// is sentence-based (see [`overlap_tail`]) and does not consume this
    /// value; it is carried so configs stay stable if the strategy changes.
    #[allow(dead_code)]
    overlap_size: usize,
    counter: TokenCounter,
}

impl SemanticChunker {
    /// Chunker using the production token counter (tiktoken cl100k_base).
    pub fn new(target_chunk_size: usize, max_chunk_size: usize, overlap_size: usize) -> Self {
        Self::with_counter(
            target_chunk_size,
            max_chunk_size,
            overlap_size,
            tokens::count_tokens,
        )
    }

    /// Chunker with an explicit token counter. Sizing decisions always go
    /// through this counter; tests substitute a cheap deterministic one.
    pub fn with_counter(
        target_chunk_size: usize,
        max_chunk_size: usize,
        overlap_size: usize,
        counter: TokenCounter,
    ) -> Self {
        Self {
            target_chunk_size,
            max_chunk_size,
            overlap_size,
            counter,
        }
    }

    /// Chunk a batch of documents in order.
    pub fn chunk_documents(&self, documents: &[Document]) -> Vec<Chunk> {
        documents
            .iter()
            .flat_map(|doc| self.chunk_document(doc))
            .collect()
    }

    /// Split one document into sections and chunk each section.
    pub fn chunk_document(&self, document: &Document) -> Vec<Chunk> {
        split_sections(&document.content)
            .iter()
            .flat_map(|section| self.chunk_section(section, &document.metadata))
            .collect()
    }

    /// Chunk a single section, inheriting the document's metadata.
    pub fn chunk_section(&self, section: &Section, doc_metadata: &Metadata) -> Vec<Chunk> {
        let total = (self.counter)(&section.body);

        // Fits in the target size: the whole section is one chunk.
        if total <= self.target_chunk_size {
            return vec![self.make_chunk(&section.body, &section.title, doc_metadata, 0)];
        }

        let paragraphs: Vec<&str> = section
            .body
            .split("\n\n")
            .map(str::trim)
            .filter(|p| !p.is_empty())
            .collect();

        let mut chunks = Vec::new();
        let mut buf = String::new();
        let mut buf_tokens = 0usize;
        let mut index = 0usize;

        for para in paragraphs {
            let para_tokens = (self.counter)(para);

            if buf_tokens + para_tokens > self.max_chunk_size && !buf.is_empty() {
                chunks.push(self.make_chunk(&buf, &section.title, doc_metadata, index));

                // Seed the next chunk with the tail of the one just closed.
                let tail = overlap_tail(&buf);
                buf = if tail.is_empty() {
                    para.to_string()
                } else {
                    format!("{tail}\n\n{para}")
                };
                buf_tokens = (self.counter)(&buf);
                index += 1;
            } else {
                if !buf.is_empty() {
                    buf.push_str("\n\n");
                }
                buf.push_str(para);
                buf_tokens += para_tokens;
            }
        }

        if !buf.is_empty() {
            chunks.push(self.make_chunk(&buf, &section.title, doc_metadata, index));
        }

        chunks
    }

    fn make_chunk(
        &self,
        text: &str,
        section_title: &str,
        doc_metadata: &Metadata,
        index: usize,
    ) -> Chunk {
        let text = text.trim().to_string();
        let token_count = (self.counter)(&text);

        let mut metadata = doc_metadata.clone();
        metadata.insert("section_title".to_string(), section_title.to_string());
        metadata.insert("token_count".to_string(), token_count.to_string());
        metadata.insert("chunk_index".to_string(), index.to_string());

        Chunk { text, metadata }
    }
}

/// Overlap prefix for the chunk following `text`: its last two
/// `". "`-delimited fragments, or empty when there are two or fewer.
///
/// This is a naive string-pattern heuristic, not sentence segmentation —
/// abbreviations and decimal numbers will split it in the wrong place.
/// It is kept behind this function boundary so a real sentence tokenizer
/// can replace it without touching the chunking loop.
pub fn overlap_tail(text: &str) -> String {
    let fragments: Vec<&str> = text.split(". ").collect();
    if fragments.len() <= 2 {
        return String::new();
    }
    fragments[fragments.len() - 2..].join(". ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::INTRO_TITLE;

    /// Deterministic counter for tests: one token per whitespace word.
    fn word_count(text: &str) -> usize {
        text.split_whitespace().count()
    }

    fn doc_meta() -> Metadata {
        let mut m = Metadata::new();
        m.insert("source".to_string(), "docs/tutorial/intro.txt".to_string());
        m.insert("relative_path".to_string(), "tutorial/intro.txt".to_string());
        m
    }

    fn section(title: &str, body: &str) -> Section {
        Section {
            title: title.to_string(),
            body: body.to_string(),
        }
    }

    fn words(n: usize, sentence_len: usize) -> String {
        // n words arranged into period-terminated sentences.
        let mut out = String::new();
        for i in 0..n {
            if i > 0 {
                out.push(' ');
            }
            out.push_str(&format!("w{i}"));
            if (i + 1) % sentence_len == 0 {
                out.push('.');
            }
        }
        out
    }

    #[test]
    fn small_section_is_one_chunk() {
        let chunker = SemanticChunker::with_counter(10, 20, 2, word_count);
        let sec = section("Lists", "five words fit right here");
        let chunks = chunker.chunk_section(&sec, &doc_meta());

        assert_eq!(chunks.len(), 1);
        assert_eq!(chunks[0].metadata["chunk_index"], "0");
        assert_eq!(chunks[0].metadata["token_count"], "5");
        assert_eq!(chunks[0].metadata["section_title"], "Lists");
        assert_eq!(chunks[0].metadata["source"], "docs/tutorial/intro.txt");
    }

    #[test]
    fn oversized_section_splits_with_overlap() {
        // Three paragraphs of 9 + 9 + 8 words against target=10, max=20:
        // p1 and p2 share a chunk (18 <= 20), p3 overflows and starts the
        // second chunk seeded with the first chunk's sentence tail.
        let chunker = SemanticChunker::with_counter(10, 20, 2, word_count);
        let p1 = "one two three. four five six. seven eight nine.";
        let p2 = "ten eleven twelve. thirteen fourteen fifteen. sixteen seventeen eighteen.";
        let p3 = "alpha beta gamma delta epsilon zeta eta theta";
        let body = format!("{p1}\n\n{p2}\n\n{p3}");
        let chunks = chunker.chunk_section(&section("Lists", &body), &doc_meta());

        assert_eq!(chunks.len(), 2);
        assert_eq!(chunks[0].metadata["chunk_index"], "0");
        assert_eq!(chunks[1].metadata["chunk_index"], "1");

        let tail = overlap_tail(&chunks[0].text);
        assert!(!tail.is_empty());
        assert!(chunks[1].text.starts_with(&tail));
        assert!(chunks[1].text.ends_with(p3));
    }

    #[test]
    fn token_count_is_recomputed_from_final_text() {
        let chunker = SemanticChunker::with_counter(10, 20, 2, word_count);
        let p1 = "one two three. four five six. seven eight nine.";
        let p2 = "ten eleven twelve. thirteen fourteen fifteen. sixteen seventeen eighteen.";
        let p3 = "alpha beta gamma delta epsilon zeta eta theta";
        let body = format!("{p1}\n\n{p2}\n\n{p3}");
        let chunks = chunker.chunk_section(&section("Lists", &body), &doc_meta());

        for chunk in &chunks {
            assert_eq!(chunk.token_count(), word_count(&chunk.text));
        }
    }

    #[test]
    fn every_chunk_within_max_unless_single_oversized_paragraph() {
        let chunker = SemanticChunker::with_counter(4, 8, 2, word_count);
        let body = (0..6)
            .map(|i| format!("para {i} has five words."))
            .collect::<Vec<_>>()
            .join("\n\n");
        let chunks = chunker.chunk_section(&section("S", &body), &doc_meta());

        assert!(chunks.len() > 1);
        for chunk in &chunks {
            // Each source paragraph fits under max, so every chunk must.
            assert!(chunk.token_count() <= 8, "chunk over max: {:?}", chunk.text);
        }
    }

    #[test]
    fn single_paragraph_over_max_is_one_oversized_chunk() {
        // Accepted boundary case: nothing to split a lone paragraph on.
        let chunker = SemanticChunker::with_counter(4, 8, 2, word_count);
        let body = words(25, 5);
        let chunks = chunker.chunk_section(&section("S", &body), &doc_meta());

        assert_eq!(chunks.len(), 1);
        assert!(chunks[0].token_count() > 8);
    }

    #[test]
    fn overlap_tail_needs_more_than_two_fragments() {
        assert_eq!(overlap_tail("only one sentence."), "");
        assert_eq!(overlap_tail("first one. second one."), "");
        let tail = overlap_tail("first. second. third. fourth.");
        assert_eq!(tail, "third. fourth.");
    }

    #[test]
    fn chunk_document_covers_all_sections() {
        let chunker = SemanticChunker::with_counter(50, 100, 2, word_count);
        let doc = Document {
            content: "leading text\n\nLists\n=====\nabout lists".to_string(),
            metadata: doc_meta(),
        };
        let chunks = chunker.chunk_document(&doc);

        assert_eq!(chunks.len(), 2);
        assert_eq!(chunks[0].metadata["section_title"], INTRO_TITLE);
        assert_eq!(chunks[1].metadata["section_title"], "Lists");
        assert_eq!(chunks[1].metadata["chunk_index"], "0");
    }
}
