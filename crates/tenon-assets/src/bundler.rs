//! External script bundler invocation.
//!
//! Production builds shell out to an esbuild-compatible CLI for a
//! code-split, minified bundle with content-hashed names; the dev server
//! re-runs the same CLI per request for a single in-memory module.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use tokio::process::Command;

/// Errors that can occur while bundling scripts.
#[derive(Debug, thiserror::Error)]
pub enum BundleError {
    #[error("Script entry not found: {0}")]
    EntryNotFound(PathBuf),

    #[error("Failed to run bundler '{command}': {source}")]
    Spawn {
        command: String,
        source: std::io::Error,
    },

    #[error("Bundler failed:\n{0}")]
    Compile(String),

    #[error("Failed to read bundle metafile {path}: {message}")]
    Metafile { path: PathBuf, message: String },

    #[error("Bundler produced no entry chunk for {0}")]
    NoEntryChunk(PathBuf),
}

/// One production bundle: the entry chunk plus every emitted output.
#[derive(Debug, Clone)]
pub struct BundleOutput {
    /// File name of the chunk flagged as the entry point
    pub entry_file: String,

    /// File names of all emitted chunks (entry included)
    pub outputs: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct Metafile {
    outputs: BTreeMap<String, MetaOutput>,
}

#[derive(Debug, Deserialize)]
struct MetaOutput {
    #[serde(rename = "entryPoint")]
    entry_point: Option<String>,
}

/// Invokes the external script bundler against one entry module.
#[derive(Debug, Clone)]
pub struct ScriptBundler {
    /// Bundler binary (e.g. `esbuild`)
    pub command: String,

    /// Application entry module
    pub entry: PathBuf,
}

impl ScriptBundler {
    pub fn new(command: impl Into<String>, entry: impl Into<PathBuf>) -> Self {
        Self {
            command: command.into(),
            entry: entry.into(),
        }
    }

    /// Production bundle into `outdir` with content-hashed chunk names.
    ///
    /// The entry chunk is identified by the metafile's entry-point flag,
    /// never by filename pattern; exactly one output must carry it.
    pub async fn bundle(&self, outdir: &Path) -> Result<BundleOutput, BundleError> {
        if !self.entry.exists() {
            return Err(BundleError::EntryNotFound(self.entry.clone()));
        }

        let meta_path = outdir.join("meta.json");

        let args = [
            self.entry.display().to_string(),
            "--bundle".to_string(),
            "--minify".to_string(),
            "--splitting".to_string(),
            "--format=esm".to_string(),
            "--sourcemap".to_string(),
            format!("--outdir={}", outdir.display()),
            "--entry-names=[name]-[hash]".to_string(),
            "--chunk-names=[name]-[hash]".to_string(),
            format!("--metafile={}", meta_path.display()),
            r#"--define:process.env.NODE_ENV="production""#.to_string(),
        ];

        tracing::debug!("Running {} {}", self.command, args.join(" "));

        let result = Command::new(&self.command)
            .args(&args)
            .output()
            .await
            .map_err(|e| BundleError::Spawn {
                command: self.command.clone(),
                source: e,
            })?;

        if !result.status.success() {
            return Err(BundleError::Compile(
                String::from_utf8_lossy(&result.stderr).into_owned(),
            ));
        }

        let meta_text =
            std::fs::read_to_string(&meta_path).map_err(|e| BundleError::Metafile {
                path: meta_path.clone(),
                message: e.to_string(),
            })?;

        // The metafile is a build-time artifact, not a shippable asset
        let _ = std::fs::remove_file(&meta_path);

        parse_metafile(&meta_text, &self.entry, &meta_path)
    }

    /// Development bundle: compile the entry to an in-memory module with
    /// inline source maps. Failures carry the bundler diagnostics and are
    /// the caller's per-request problem.
    pub async fn bundle_dev(&self) -> Result<String, BundleError> {
        if !self.entry.exists() {
            return Err(BundleError::EntryNotFound(self.entry.clone()));
        }

        let args = [
            self.entry.display().to_string(),
            "--bundle".to_string(),
            "--format=esm".to_string(),
            "--sourcemap=inline".to_string(),
            r#"--define:process.env.NODE_ENV="development""#.to_string(),
        ];

        let result = Command::new(&self.command)
            .args(&args)
            .output()
            .await
            .map_err(|e| BundleError::Spawn {
                command: self.command.clone(),
                source: e,
            })?;

        if !result.status.success() {
            return Err(BundleError::Compile(
                String::from_utf8_lossy(&result.stderr).into_owned(),
            ));
        }

        Ok(String::from_utf8_lossy(&result.stdout).into_owned())
    }
}

/// Find the entry-flagged chunk among the metafile outputs.
fn parse_metafile(
    text: &str,
    entry: &Path,
    meta_path: &Path,
) -> Result<BundleOutput, BundleError> {
    let meta: Metafile = serde_json::from_str(text).map_err(|e| BundleError::Metafile {
        path: meta_path.to_path_buf(),
        message: e.to_string(),
    })?;

    let entry_str = entry.display().to_string();
    let mut entry_file = None;
    let mut outputs = Vec::new();

    for (path, output) in &meta.outputs {
        if !path.ends_with(".js") {
            continue;
        }

        let file = Path::new(path)
            .file_name()
            .and_then(|f| f.to_str())
            .unwrap_or(path)
            .to_string();

        if output.entry_point.as_deref() == Some(entry_str.as_str()) {
            entry_file = Some(file.clone());
        }

        outputs.push(file);
    }

    match entry_file {
        Some(entry_file) => Ok(BundleOutput {
            entry_file,
            outputs,
        }),
        None => Err(BundleError::NoEntryChunk(entry.to_path_buf())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const META: &str = r#"{
        "outputs": {
            "dist/assets/chunk-ABC123.js": {},
            "dist/assets/chunk-ABC123.js.map": {},
            "dist/assets/main-XYZ789.js": { "entryPoint": "src/main.tsx" },
            "dist/assets/main-XYZ789.js.map": {}
        }
    }"#;

    #[test]
    fn finds_entry_chunk_by_flag() {
        let out =
            parse_metafile(META, Path::new("src/main.tsx"), Path::new("meta.json")).unwrap();

        assert_eq!(out.entry_file, "main-XYZ789.js");
        assert_eq!(out.outputs, vec!["chunk-ABC123.js", "main-XYZ789.js"]);
    }

    #[test]
    fn missing_entry_flag_is_fatal() {
        let meta = r#"{ "outputs": { "dist/assets/chunk-ABC.js": {} } }"#;

        let result = parse_metafile(meta, Path::new("src/main.tsx"), Path::new("meta.json"));

        assert!(matches!(result, Err(BundleError::NoEntryChunk(_))));
    }

    #[test]
    fn source_maps_are_not_chunks() {
        let out =
            parse_metafile(META, Path::new("src/main.tsx"), Path::new("meta.json")).unwrap();

        assert!(out.outputs.iter().all(|o| !o.ends_with(".map")));
    }

    #[test]
    fn malformed_metafile_is_an_error() {
        let result =
            parse_metafile("not json", Path::new("src/main.tsx"), Path::new("meta.json"));

        assert!(matches!(result, Err(BundleError::Metafile { .. })));
    }

    #[tokio::test]
    async fn nonexistent_entry_fails_fast() {
        let bundler = ScriptBundler::new("esbuild", "no/such/entry.tsx");

        let result = bundler.bundle(Path::new("dist/assets")).await;

        assert!(matches!(result, Err(BundleError::EntryNotFound(_))));
    }

    #[tokio::test]
    async fn dev_bundle_of_nonexistent_entry_fails_fast() {
        let bundler = ScriptBundler::new("esbuild", "no/such/entry.tsx");

        let result = bundler.bundle_dev().await;

        assert!(matches!(result, Err(BundleError::EntryNotFound(_))));
    }
}
