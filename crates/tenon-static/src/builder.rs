//! Production site builder.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Instant;

use walkdir::WalkDir;

use tenon_assets::{
    html, BundleError, RewriteError, ScriptBundler, StyleCompiler, StyleError,
};
use tenon_content::MergeError;

/// Configuration for a production build.
#[derive(Debug, Clone)]
pub struct BuildConfig {
    /// Directory of content fragments
    pub content_dir: PathBuf,

    /// Where the merged data bundle is written (inside the source tree,
    /// so the script bundle picks it up)
    pub data_output: PathBuf,

    /// CSS compiler binary
    pub style_command: String,

    /// Entry stylesheet
    pub style_entry: PathBuf,

    /// Script bundler binary
    pub script_command: String,

    /// Application entry module
    pub script_entry: PathBuf,

    /// HTML shell template
    pub template: PathBuf,

    /// Static assets copied verbatim into the output root
    pub public_dir: PathBuf,

    /// Output directory, deleted and recreated every build
    pub output_dir: PathBuf,
}

impl Default for BuildConfig {
    fn default() -> Self {
        Self {
            content_dir: PathBuf::from("content"),
            data_output: PathBuf::from("src/data/content.json"),
            style_command: "tailwindcss".to_string(),
            style_entry: PathBuf::from("src/styles/main.css"),
            script_command: "esbuild".to_string(),
            script_entry: PathBuf::from("src/main.tsx"),
            template: PathBuf::from("index.html"),
            public_dir: PathBuf::from("public"),
            output_dir: PathBuf::from("dist"),
        }
    }
}

/// Result of one production build.
#[derive(Debug)]
pub struct BuildSummary {
    /// Number of merged content fragments
    pub fragments: usize,

    /// Number of emitted script chunks
    pub chunks: usize,

    /// Total build time in milliseconds
    pub duration_ms: u64,

    /// Output directory
    pub output_dir: PathBuf,
}

/// Errors that can occur during a production build.
#[derive(Debug, thiserror::Error)]
pub enum BuildError {
    #[error(transparent)]
    Merge(#[from] MergeError),

    #[error(transparent)]
    Style(#[from] StyleError),

    #[error(transparent)]
    Bundle(#[from] BundleError),

    #[error(transparent)]
    Rewrite(#[from] RewriteError),

    #[error("Failed to read template {path}: {source}")]
    ReadTemplate {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to stage output: {0}")]
    Stage(std::io::Error),
}

/// Production site builder.
pub struct SiteBuilder {
    config: BuildConfig,
}

impl SiteBuilder {
    pub fn new(config: BuildConfig) -> Self {
        Self { config }
    }

    /// Run the full production pipeline against a clean output directory.
    ///
    /// Stages run strictly in sequence: each stage's output is the next
    /// stage's input. Any failure propagates immediately, so a non-zero
    /// exit is the only way a half-populated directory is left behind.
    pub async fn build(&self) -> Result<BuildSummary, BuildError> {
        let start = Instant::now();
        let assets_dir = self.config.output_dir.join("assets");

        clean_output(&self.config.output_dir).map_err(BuildError::Stage)?;
        fs::create_dir_all(&assets_dir).map_err(BuildError::Stage)?;

        // 1. Merge content fragments into the bundle the app imports
        let fragments = tenon_content::merge_dir(&self.config.content_dir, &self.config.data_output)?;
        tracing::info!("Merged {} content fragments", fragments);

        // 2. Compile styles, minified
        let styles = StyleCompiler::new(&self.config.style_command, &self.config.style_entry);
        styles.compile(&assets_dir.join("styles.css"), true).await?;
        tracing::info!("Compiled styles");

        // 3. Bundle scripts with hashed chunk names
        let bundler = ScriptBundler::new(&self.config.script_command, &self.config.script_entry);
        let bundle = bundler.bundle(&assets_dir).await?;
        tracing::info!(
            "Bundled {} chunks (entry {})",
            bundle.outputs.len(),
            bundle.entry_file
        );

        // 4. Rewrite the HTML shell against the resolved entry chunk
        let template =
            fs::read_to_string(&self.config.template).map_err(|e| BuildError::ReadTemplate {
                path: self.config.template.clone(),
                source: e,
            })?;

        let entry_rel = self.config.script_entry.display().to_string();
        let html = html::rewrite(
            &template,
            &entry_rel,
            &format!("/assets/{}", bundle.entry_file),
            "/assets/styles.css",
        )?;

        fs::write(self.config.output_dir.join("index.html"), html).map_err(BuildError::Stage)?;

        // 5. Copy static assets verbatim; absence is a no-op
        if self.config.public_dir.exists() {
            copy_dir(&self.config.public_dir, &self.config.output_dir)
                .map_err(BuildError::Stage)?;
        }

        Ok(BuildSummary {
            fragments,
            chunks: bundle.outputs.len(),
            duration_ms: start.elapsed().as_millis() as u64,
            output_dir: self.config.output_dir.clone(),
        })
    }
}

/// Delete and recreate the output directory so no stale artifact survives.
fn clean_output(output_dir: &Path) -> Result<(), std::io::Error> {
    if output_dir.exists() {
        fs::remove_dir_all(output_dir)?;
    }
    fs::create_dir_all(output_dir)
}

/// Copy `src`'s contents into `dst`, preserving the relative layout.
fn copy_dir(src: &Path, dst: &Path) -> Result<(), std::io::Error> {
    for entry in WalkDir::new(src).follow_links(true) {
        let entry = entry.map_err(std::io::Error::other)?;
        let relative = entry
            .path()
            .strip_prefix(src)
            .map_err(std::io::Error::other)?;

        if relative.as_os_str().is_empty() {
            continue;
        }

        let target = dst.join(relative);
        if entry.file_type().is_dir() {
            fs::create_dir_all(&target)?;
        } else {
            if let Some(parent) = target.parent() {
                fs::create_dir_all(parent)?;
            }
            fs::copy(entry.path(), &target)?;
        }
    }

    Ok(())
}
