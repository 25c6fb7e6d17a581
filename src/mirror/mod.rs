// src/mirror/mod.rs
// =============================================================================
// This module decides where a resource lives on disk and writes it there.
//
// Mapping rules:
// - The URL path, without its leading '/', is appended to the output root
// - An empty path (the site root) becomes "index.html"
// - A path ending in '/' is a directory index: "docs/" -> "docs/index.html"
// - The query string is not part of the local path
//
// Two different URLs can map to the same file (e.g. "/a?x=1" and "/a?x=2").
// The later write wins.
// =============================================================================

use crate::error::PersistError;
use serde::Serialize;
use std::path::{Path, PathBuf};
use url::Url;

pub const DEFAULT_FILE_NAME: &str = "index.html";

/// One resource that made it to disk
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MirrorEntry {
    pub url: String,
    pub path: PathBuf,
    pub bytes: usize,
}

// Maps a resource URL to its local file path under output_root
//
// Examples (output_root = "out"):
//   http://site.test/            -> out/index.html
//   http://site.test/a           -> out/a
//   http://site.test/img/x.png   -> out/img/x.png
//   http://site.test/docs/       -> out/docs/index.html
pub fn map_path(url: &Url, output_root: &Path) -> PathBuf {
    let relative = url.path().trim_start_matches('/');

    let mut path = output_root.to_path_buf();
    // url::Url has already removed "." and ".." segments, so every
    // segment here is a plain name and cannot climb out of output_root
    for segment in relative.split('/').filter(|s| !s.is_empty()) {
        path.push(segment);
    }

    if relative.is_empty() || relative.ends_with('/') {
        path.push(DEFAULT_FILE_NAME);
    }

    path
}

/// Writes fetched bytes into the mirror tree
#[derive(Debug, Clone)]
pub struct MirrorWriter {
    output_root: PathBuf,
}

impl MirrorWriter {
    pub fn new(output_root: impl Into<PathBuf>) -> Self {
        Self {
            output_root: output_root.into(),
        }
    }

    pub fn output_root(&self) -> &Path {
        &self.output_root
    }

    // Creates any missing parent directories, then writes the file
    //
    // create_dir_all succeeds when the directory already exists, so two
    // tasks creating the same parent at once is fine.
    pub async fn persist(&self, url: &Url, bytes: &[u8]) -> Result<MirrorEntry, PersistError> {
        let path = map_path(url, &self.output_root);

        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|source| PersistError::CreateDir {
                    path: parent.to_path_buf(),
                    source,
                })?;
        }

        tokio::fs::write(&path, bytes)
            .await
            .map_err(|source| PersistError::Write {
                path: path.clone(),
                source,
            })?;

        Ok(MirrorEntry {
            url: url.to_string(),
            path,
            bytes: bytes.len(),
        })
    }
}
