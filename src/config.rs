use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub docs: DocsConfig,
    #[serde(default)]
    pub chunking: ChunkingConfig,
    #[serde(default)]
    pub embedding: EmbeddingConfig,
    #[serde(default)]
    pub store: StoreConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct DocsConfig {
    pub root: PathBuf,
    #[serde(default = "default_include_globs")]
    pub include_globs: Vec<String>,
    #[serde(default)]
    pub exclude_globs: Vec<String>,
    #[serde(default)]
    pub follow_symlinks: bool,
}

fn default_include_globs() -> Vec<String> {
    vec!["**/*.txt".to_string(), "**/*.rst".to_string()]
}

#[derive(Debug, Deserialize, Clone)]
pub struct ChunkingConfig {
    #[serde(default = "default_target_chunk_size")]
    pub target_chunk_size: usize,
    #[serde(default = "default_max_chunk_size")]
    pub max_chunk_size: usize,
    #[serde(default = "default_overlap_size")]
    pub overlap_size: usize,
}

impl Default for ChunkingConfig {
    fn default() -> Self {
        Self {
            target_chunk_size: default_target_chunk_size(),
            max_chunk_size: default_max_chunk_size(),
            overlap_size: default_overlap_size(),
        }
    }
}

fn default_target_chunk_size() -> usize {
    512
}
fn default_max_chunk_size() -> usize {
    1024
}
fn default_overlap_size() -> usize {
    128
}

#[derive(Debug, Deserialize, Clone)]
pub struct EmbeddingConfig {
    #[serde(default = "default_provider")]
    pub provider: String,
    #[serde(default)]
    pub model: Option<String>,
    #[serde(default)]
    pub dims: Option<usize>,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default = "default_batch_size")]
    pub batch_size: usize,
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for EmbeddingConfig {
    fn default() -> Self {
        Self {
            provider: default_provider(),
            model: None,
            dims: None,
            url: None,
            batch_size: default_batch_size(),
            max_retries: default_max_retries(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

fn default_provider() -> String {
    "local".to_string()
}
fn default_batch_size() -> usize {
    32
}
fn default_max_retries() -> u32 {
    5
}
fn default_timeout_secs() -> u64 {
    30
}

#[derive(Debug, Deserialize, Clone)]
pub struct StoreConfig {
    #[serde(default = "default_store_dir")]
    pub dir: PathBuf,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            dir: default_store_dir(),
        }
    }
}

fn default_store_dir() -> PathBuf {
    PathBuf::from("data/vector_store")
}

pub fn load_config(path: &Path) -> Result<Config> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {}", path.display()))?;

    let config: Config = toml::from_str(&content).with_context(|| "Failed to parse config file")?;

    if config.chunking.target_chunk_size == 0 {
        anyhow::bail!("chunking.target_chunk_size must be > 0");
    }
    if config.chunking.max_chunk_size < config.chunking.target_chunk_size {
        anyhow::bail!("chunking.max_chunk_size must be >= chunking.target_chunk_size");
    }

    match config.embedding.provider.as_str() {
        "local" | "openai" | "ollama" => {}
        other => anyhow::bail!(
            "Unknown embedding provider: '{}'. Must be local, openai, or ollama.",
            other
        ),
    }
    if config.embedding.provider != "local"
        && (config.embedding.model.is_none() || config.embedding.dims.is_none())
    {
        anyhow::bail!(
            "embedding.model and embedding.dims must be set when provider is '{}'",
            config.embedding.provider
        );
    }

    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_config(content: &str) -> (tempfile::TempDir, PathBuf) {
        let tmp = tempfile::TempDir::new().unwrap();
        let path = tmp.path().join("docdex.toml");
        let mut f = std::fs::File::create(&path).unwrap();
        f.write_all(content.as_bytes()).unwrap();
        (tmp, path)
    }

    #[test]
    fn minimal_config_gets_defaults() {
        let (_tmp, path) = write_config("[docs]\nroot = \"./docs\"\n");
        let config = load_config(&path).unwrap();
        assert_eq!(config.chunking.target_chunk_size, 512);
        assert_eq!(config.chunking.max_chunk_size, 1024);
        assert_eq!(config.chunking.overlap_size, 128);
        assert_eq!(config.embedding.provider, "local");
        assert_eq!(config.store.dir, PathBuf::from("data/vector_store"));
    }

    #[test]
    fn max_below_target_is_rejected() {
        let (_tmp, path) = write_config(
            "[docs]\nroot = \"./docs\"\n[chunking]\ntarget_chunk_size = 512\nmax_chunk_size = 256\n",
        );
        assert!(load_config(&path).is_err());
    }

    #[test]
    fn http_provider_requires_model_and_dims() {
        let (_tmp, path) =
            write_config("[docs]\nroot = \"./docs\"\n[embedding]\nprovider = \"ollama\"\n");
        assert!(load_config(&path).is_err());
    }

    #[test]
    fn unknown_provider_is_rejected() {
        let (_tmp, path) =
            write_config("[docs]\nroot = \"./docs\"\n[embedding]\nprovider = \"magic\"\n");
        assert!(load_config(&path).is_err());
    }
}
