//! Filesystem document loader.
//!
//! Walks the configured docs root, keeps files matching the include globs
//! (minus excludes), and reads each as text. Files are decoded as UTF-8
//! with a single Latin-1 retry; loading is best-effort per file — an
//! unreadable file is reported and skipped, never aborting the batch.

use anyhow::Result;
use globset::{Glob, GlobSet, GlobSetBuilder};
use std::path::Path;
use walkdir::WalkDir;

use crate::config::DocsConfig;
use crate::models::{Document, Metadata};

pub fn load_documents(config: &DocsConfig) -> Result<Vec<Document>> {
    let root = &config.root;
    if !root.exists() {
        anyhow::bail!("Docs root does not exist: {}", root.display());
    }

    let include_set = build_globset(&config.include_globs)?;
    let exclude_set = build_globset(&config.exclude_globs)?;

    let mut documents = Vec::new();
    let mut skipped = 0usize;

    let walker = WalkDir::new(root).follow_links(config.follow_symlinks);
    for entry in walker {
        let entry = entry?;
        if !entry.file_type().is_file() {
            continue;
        }

        let path = entry.path();
        let relative = path.strip_prefix(root).unwrap_or(path);
        let rel_str = relative.to_string_lossy().to_string();

        if exclude_set.is_match(&rel_str) || !include_set.is_match(&rel_str) {
            continue;
        }

        match load_file(path, &rel_str) {
            Ok(doc) => documents.push(doc),
            Err(e) => {
                eprintln!("warning: skipping {}: {}", path.display(), e);
                skipped += 1;
            }
        }
    }

    if skipped > 0 {
        eprintln!("warning: skipped {skipped} unreadable file(s)");
    }

    // Deterministic corpus ordering regardless of walk order.
    documents.sort_by(|a, b| a.metadata["relative_path"].cmp(&b.metadata["relative_path"]));

    Ok(documents)
}

fn load_file(path: &Path, relative_path: &str) -> Result<Document> {
    let bytes = std::fs::read(path)?;
    let content = decode_text(&bytes);

    let mut metadata = Metadata::new();
    metadata.insert("source".to_string(), path.display().to_string());
    metadata.insert(
        "filename".to_string(),
        path.file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_default(),
    );
    metadata.insert("relative_path".to_string(), relative_path.to_string());

    Ok(Document { content, metadata })
}

/// Decode file bytes as UTF-8, retrying once as Latin-1.
///
/// Latin-1 maps every byte to the code point of the same value, so the
/// fallback cannot fail; it exists for legacy doc exports with stray
/// high bytes.
fn decode_text(bytes: &[u8]) -> String {
    match std::str::from_utf8(bytes) {
        Ok(s) => s.to_string(),
        Err(_) => bytes.iter().map(|&b| b as char).collect(),
    }
}

fn build_globset(patterns: &[String]) -> Result<GlobSet> {
    let mut builder = GlobSetBuilder::new();
    for pattern in patterns {
        builder.add(Glob::new(pattern)?);
    }
    Ok(builder.build()?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn docs_config(root: &Path) -> DocsConfig {
        DocsConfig {
            root: root.to_path_buf(),
            include_globs: vec!["**/*.txt".to_string()],
            exclude_globs: vec![],
            follow_symlinks: false,
        }
    }

    #[test]
    fn loads_matching_files_sorted() {
        let tmp = tempfile::TempDir::new().unwrap();
        fs::create_dir_all(tmp.path().join("sub")).unwrap();
        fs::write(tmp.path().join("b.txt"), "second").unwrap();
        fs::write(tmp.path().join("sub/a.txt"), "first").unwrap();
        fs::write(tmp.path().join("ignored.md"), "not text docs").unwrap();

        let docs = load_documents(&docs_config(tmp.path())).unwrap();
        assert_eq!(docs.len(), 2);
        assert_eq!(docs[0].metadata["relative_path"], "b.txt");
        assert_eq!(docs[1].metadata["relative_path"], "sub/a.txt");
        assert_eq!(docs[0].content, "second");
    }

    #[test]
    fn excludes_take_precedence() {
        let tmp = tempfile::TempDir::new().unwrap();
        fs::write(tmp.path().join("keep.txt"), "keep").unwrap();
        fs::write(tmp.path().join("drop.txt"), "drop").unwrap();

        let mut cfg = docs_config(tmp.path());
        cfg.exclude_globs = vec!["drop.txt".to_string()];
        let docs = load_documents(&cfg).unwrap();
        assert_eq!(docs.len(), 1);
        assert_eq!(docs[0].metadata["filename"], "keep.txt");
    }

    #[test]
    fn latin1_bytes_decode_via_fallback() {
        let tmp = tempfile::TempDir::new().unwrap();
        // 0xE9 is 'é' in Latin-1 and invalid standalone UTF-8.
        fs::write(tmp.path().join("legacy.txt"), [b'c', b'a', b'f', 0xE9]).unwrap();

        let docs = load_documents(&docs_config(tmp.path())).unwrap();
        assert_eq!(docs.len(), 1);
        assert_eq!(docs[0].content, "café");
    }

    #[test]
    fn missing_root_is_an_error() {
        let tmp = tempfile::TempDir::new().unwrap();
        let cfg = docs_config(&tmp.path().join("nope"));
        assert!(load_documents(&cfg).is_err());
    }
}
