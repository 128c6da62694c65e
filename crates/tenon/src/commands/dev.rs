//! Development server command.

use std::path::PathBuf;

use anyhow::Result;
use tenon_server::{DevServer, DevServerConfig};

use crate::config::ConfigFile;

/// Run the dev server.
pub async fn run(config: &ConfigFile, port: Option<u16>, open: bool) -> Result<()> {
    let server_config = DevServerConfig {
        public_dir: PathBuf::from(&config.site.public_dir),
        template: PathBuf::from(&config.site.template),
        style_command: config.styles.command.clone(),
        style_entry: PathBuf::from(&config.styles.entry),
        style_dir: PathBuf::from(&config.styles.dir),
        script_command: config.scripts.command.clone(),
        script_entry: PathBuf::from(&config.scripts.entry),
        port: port.unwrap_or(config.dev.port),
        open,
        ..Default::default()
    };

    tracing::info!("Starting development server on port {}", server_config.port);

    DevServer::new(server_config).start().await?;

    Ok(())
}
