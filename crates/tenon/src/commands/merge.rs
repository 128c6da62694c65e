//! Standalone content merge command.

use std::path::Path;

use anyhow::Result;

use crate::config::ConfigFile;

/// Run the merge command.
pub async fn run(config: &ConfigFile) -> Result<()> {
    let count = tenon_content::merge_dir(
        Path::new(&config.content.dir),
        Path::new(&config.content.output),
    )?;

    tracing::info!(
        "Merged {} content fragments into {}",
        count,
        config.content.output
    );

    Ok(())
}
