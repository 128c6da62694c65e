//! Production build command.

use std::path::PathBuf;

use anyhow::Result;
use tenon_static::{BuildConfig, SiteBuilder};

use crate::config::ConfigFile;

/// Run the build command.
pub async fn run(config: &ConfigFile, output: Option<PathBuf>) -> Result<()> {
    tracing::info!("Building production site...");

    let build_config = BuildConfig {
        content_dir: PathBuf::from(&config.content.dir),
        data_output: PathBuf::from(&config.content.output),
        style_command: config.styles.command.clone(),
        style_entry: PathBuf::from(&config.styles.entry),
        script_command: config.scripts.command.clone(),
        script_entry: PathBuf::from(&config.scripts.entry),
        template: PathBuf::from(&config.site.template),
        public_dir: PathBuf::from(&config.site.public_dir),
        output_dir: output.unwrap_or_else(|| PathBuf::from(&config.site.output)),
    };

    let summary = SiteBuilder::new(build_config).build().await?;

    tracing::info!(
        "Built {} fragments and {} script chunks in {}ms",
        summary.fragments,
        summary.chunks,
        summary.duration_ms
    );

    tracing::info!("Output: {}", summary.output_dir.display());

    Ok(())
}
