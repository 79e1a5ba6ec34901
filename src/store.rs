//! Exact-search vector store with parallel chunk records.
//!
//! Vectors and chunks live in two append-only sequences kept in lock-step:
//! row `i` of the vector array and `chunks[i]` describe the same logical
//! unit, and that position is the unit's permanent identifier within the
//! store. The only mutator is [`VectorStore::add_chunks`], which validates
//! everything before touching either sequence, so a failed add leaves the
//! store exactly as it was.
//!
//! Search is exact squared-Euclidean distance over every stored row.
//! All vectors are held as `f32`. Fixing one numeric precision is a
//! correctness requirement of the exact-search backend — distances must
//! be bit-for-bit reproducible across save/load — not a performance knob.
//! Because the embedding gateway L2-normalizes every vector, ascending
//! squared distance orders results identically to descending cosine
//! similarity. Exact ties keep insertion order.
//!
//! On disk a store is one directory with two files:
//! - `faiss_index.bin`: `dim` as `u32` LE, `count` as `u64` LE, then
//!   `dim × count` `f32` LE values in row order.
//! - `chunks_metadata.json`: a JSON array of `{ "text", "metadata" }`
//!   objects whose array index matches the vector row.

use std::fs;
use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::models::Chunk;

/// Binary vector file inside a store directory.
pub const INDEX_FILE: &str = "faiss_index.bin";
/// Chunk records file inside a store directory.
pub const CHUNKS_FILE: &str = "chunks_metadata.json";

const HEADER_LEN: usize = 4 + 8;

/// Errors raised by vector store operations.
#[derive(Debug, Error)]
pub enum StoreError {
    /// An expected store file is missing at load time.
    #[error("store file not found: {0}")]
    NotFound(PathBuf),
    /// Vector/chunk count or vector width disagreement on add or search.
    #[error("dimension mismatch: {0}")]
    DimensionMismatch(String),
    /// A store file exists but cannot be decoded.
    #[error("corrupt store: {0}")]
    Corrupt(String),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, StoreError>;

/// Flat exact-search index: a row-major `f32` matrix scanned in full for
/// every query.
#[derive(Debug, Clone)]
struct FlatIndex {
    dim: usize,
    data: Vec<f32>,
}

impl FlatIndex {
    fn new(dim: usize) -> Self {
        Self {
            dim,
            data: Vec::new(),
        }
    }

    fn ntotal(&self) -> usize {
        if self.dim == 0 {
            0
        } else {
            self.data.len() / self.dim
        }
    }

    /// Append pre-validated rows.
    fn append(&mut self, rows: &[Vec<f32>]) {
        for row in rows {
            debug_assert_eq!(row.len(), self.dim);
            self.data.extend_from_slice(row);
        }
    }

    /// Exact k-nearest rows by squared Euclidean distance, ascending.
    /// Ties keep row order. Returns `(row, distance)` pairs; fewer than
    /// `k` when the index holds fewer rows.
    fn search(&self, query: &[f32], k: usize) -> Result<Vec<(usize, f32)>> {
        if query.len() != self.dim {
            return Err(StoreError::DimensionMismatch(format!(
                "query has {} dimensions, index expects {}",
                query.len(),
                self.dim
            )));
        }
        if self.dim == 0 {
            return Ok(Vec::new());
        }

        let mut hits: Vec<(usize, f32)> = self
            .data
            .chunks_exact(self.dim)
            .map(|row| {
                row.iter()
                    .zip(query)
                    .map(|(a, b)| {
                        let d = a - b;
                        d * d
                    })
                    .sum::<f32>()
            })
            .enumerate()
            .collect();

        hits.sort_by(|a, b| {
            a.1.partial_cmp(&b.1)
                .unwrap_or(std::cmp::Ordering::Equal)
                .then(a.0.cmp(&b.0))
        });
        hits.truncate(k);
        Ok(hits)
    }
}

/// Append-only store of chunks and their embedding vectors.
#[derive(Debug, Clone)]
pub struct VectorStore {
    index: FlatIndex,
    chunks: Vec<Chunk>,
}

impl VectorStore {
    /// Empty store for vectors of the given dimension.
    pub fn new(embedding_dim: usize) -> Self {
        Self {
            index: FlatIndex::new(embedding_dim),
            chunks: Vec::new(),
        }
    }

    pub fn embedding_dim(&self) -> usize {
        self.index.dim
    }

    pub fn len(&self) -> usize {
        self.chunks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.chunks.is_empty()
    }

    /// All stored chunks in insertion (row) order.
    pub fn chunks(&self) -> &[Chunk] {
        &self.chunks
    }

    /// Append chunks and their vectors in lock-step.
    ///
    /// The whole call is rejected — and the store left unmodified — if the
    /// counts disagree or any vector has the wrong width. This is the only
    /// mutation the store supports; there is no update or delete.
    pub fn add_chunks(&mut self, chunks: Vec<Chunk>, embeddings: Vec<Vec<f32>>) -> Result<()> {
        if embeddings.len() != chunks.len() {
            return Err(StoreError::DimensionMismatch(format!(
                "{} embeddings for {} chunks",
                embeddings.len(),
                chunks.len()
            )));
        }
        for (i, row) in embeddings.iter().enumerate() {
            if row.len() != self.index.dim {
                return Err(StoreError::DimensionMismatch(format!(
                    "embedding {} has {} dimensions, store expects {}",
                    i,
                    row.len(),
                    self.index.dim
                )));
            }
        }

        self.index.append(&embeddings);
        self.chunks.extend(chunks);
        Ok(())
    }

    /// Up to `k` `(chunk, distance)` pairs, ascending by squared Euclidean
    /// distance. With fewer than `k` stored entries, every entry is
    /// returned exactly once.
    pub fn search(&self, query: &[f32], k: usize) -> Result<Vec<(&Chunk, f32)>> {
        let hits = self.index.search(query, k)?;
        Ok(hits
            .into_iter()
            .map(|(row, dist)| (&self.chunks[row], dist))
            .collect())
    }

    /// Write the store into `dir` (created if missing).
    pub fn save(&self, dir: &Path) -> Result<()> {
        fs::create_dir_all(dir)?;

        let mut bytes = Vec::with_capacity(HEADER_LEN + self.index.data.len() * 4);
        bytes.extend_from_slice(&(self.index.dim as u32).to_le_bytes());
        bytes.extend_from_slice(&(self.index.ntotal() as u64).to_le_bytes());
        for v in &self.index.data {
            bytes.extend_from_slice(&v.to_le_bytes());
        }
        fs::write(dir.join(INDEX_FILE), bytes)?;

        let json = serde_json::to_string_pretty(&self.chunks)?;
        fs::write(dir.join(CHUNKS_FILE), json)?;
        Ok(())
    }

    /// Read a store back from `dir`. The result is observationally
    /// identical to the saved store: same chunk order and content, same
    /// vector bits, same search results.
    pub fn load(dir: &Path) -> Result<Self> {
        let index_path = dir.join(INDEX_FILE);
        if !index_path.exists() {
            return Err(StoreError::NotFound(index_path));
        }
        let chunks_path = dir.join(CHUNKS_FILE);
        if !chunks_path.exists() {
            return Err(StoreError::NotFound(chunks_path));
        }

        let bytes = fs::read(&index_path)?;
        if bytes.len() < HEADER_LEN {
            return Err(StoreError::Corrupt(format!(
                "{INDEX_FILE} header truncated ({} bytes)",
                bytes.len()
            )));
        }
        let dim = u32::from_le_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]) as usize;
        let count = u64::from_le_bytes([
            bytes[4], bytes[5], bytes[6], bytes[7], bytes[8], bytes[9], bytes[10], bytes[11],
        ]) as usize;

        if dim == 0 {
            return Err(StoreError::Corrupt(format!(
                "{INDEX_FILE} declares zero-dimensional vectors"
            )));
        }
        let expected = dim
            .checked_mul(count)
            .and_then(|n| n.checked_mul(4))
            .and_then(|n| n.checked_add(HEADER_LEN))
            .ok_or_else(|| StoreError::Corrupt(format!("{INDEX_FILE} header overflows")))?;
        if bytes.len() != expected {
            return Err(StoreError::Corrupt(format!(
                "{INDEX_FILE} holds {} bytes, header implies {}",
                bytes.len(),
                expected
            )));
        }

        let data: Vec<f32> = bytes[HEADER_LEN..]
            .chunks_exact(4)
            .map(|b| f32::from_le_bytes([b[0], b[1], b[2], b[3]]))
            .collect();

        let chunks: Vec<Chunk> = serde_json::from_slice(&fs::read(&chunks_path)?)?;
        if chunks.len() != count {
            return Err(StoreError::Corrupt(format!(
                "{CHUNKS_FILE} holds {} chunks, {INDEX_FILE} holds {} vectors",
                chunks.len(),
                count
            )));
        }

        Ok(Self {
            index: FlatIndex { dim, data },
            chunks,
        })
    }
}
