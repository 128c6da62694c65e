//! Fragment directory merging.

use std::fs;
use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::fragment::ContentFragment;

/// The consolidated data artifact: every fragment, sorted by name.
#[derive(Debug, Serialize)]
pub struct ContentBundle {
    /// Fragments in ascending name order
    pub items: Vec<ContentFragment>,
}

/// Errors that can occur while merging fragments.
#[derive(Debug, thiserror::Error)]
pub enum MergeError {
    #[error("Failed to read content directory {path}: {source}")]
    ReadDir {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to read fragment {path}: {source}")]
    ReadFragment {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to parse fragment {path}: {message}")]
    ParseFragment { path: PathBuf, message: String },

    #[error("Failed to write bundle {path}: {source}")]
    WriteBundle {
        path: PathBuf,
        source: std::io::Error,
    },
}

/// Merge every `*.json` fragment in `content_dir` into one bundle written
/// to `output_path`, returning the number of merged fragments.
///
/// All-or-nothing: a single malformed fragment aborts the merge before
/// anything is written, so a partial bundle can never ship.
pub fn merge_dir(content_dir: &Path, output_path: &Path) -> Result<usize, MergeError> {
    let entries = fs::read_dir(content_dir).map_err(|e| MergeError::ReadDir {
        path: content_dir.to_path_buf(),
        source: e,
    })?;

    // An unreadable entry aborts the merge; skipping it would silently
    // produce an incomplete bundle.
    let mut paths = Vec::new();
    for entry in entries {
        let entry = entry.map_err(|e| MergeError::ReadDir {
            path: content_dir.to_path_buf(),
            source: e,
        })?;

        let path = entry.path();
        if path.is_file() && path.extension().and_then(|e| e.to_str()) == Some("json") {
            paths.push(path);
        }
    }

    // Deterministic enumeration order, so sort ties are stable across platforms
    paths.sort();

    let mut items = Vec::with_capacity(paths.len());
    for path in &paths {
        let text = fs::read_to_string(path).map_err(|e| MergeError::ReadFragment {
            path: path.clone(),
            source: e,
        })?;

        let fragment: ContentFragment =
            serde_json::from_str(&text).map_err(|e| MergeError::ParseFragment {
                path: path.clone(),
                message: e.to_string(),
            })?;

        items.push(fragment);
    }

    // Stable sort: equal keys keep enumeration order
    items.sort_by_key(ContentFragment::sort_key);

    let bundle = ContentBundle { items };
    let count = bundle.items.len();

    let json = serde_json::to_string_pretty(&bundle).map_err(|e| MergeError::WriteBundle {
        path: output_path.to_path_buf(),
        source: std::io::Error::other(e),
    })?;

    if let Some(parent) = output_path.parent() {
        fs::create_dir_all(parent).map_err(|e| MergeError::WriteBundle {
            path: output_path.to_path_buf(),
            source: e,
        })?;
    }

    fs::write(output_path, json).map_err(|e| MergeError::WriteBundle {
        path: output_path.to_path_buf(),
        source: e,
    })?;

    tracing::debug!("Merged {} fragments into {}", count, output_path.display());

    Ok(count)
}
