//! Configuration file loading (tenon.toml).

use std::fs;
use std::path::Path;

use anyhow::Result;
use serde::Deserialize;

/// Configuration file structure (tenon.toml).
#[derive(Debug, Deserialize, Default)]
pub struct ConfigFile {
    #[serde(default)]
    pub content: ContentConfig,
    #[serde(default)]
    pub styles: StylesConfig,
    #[serde(default)]
    pub scripts: ScriptsConfig,
    #[serde(default)]
    pub site: SiteConfig,
    #[serde(default)]
    pub dev: DevConfig,
}

#[derive(Debug, Deserialize)]
pub struct ContentConfig {
    /// Directory of content fragments
    #[serde(default = "default_content_dir")]
    pub dir: String,
    /// Where the merged bundle is written
    #[serde(default = "default_content_output")]
    pub output: String,
}

#[derive(Debug, Deserialize)]
pub struct StylesConfig {
    /// CSS compiler binary
    #[serde(default = "default_style_command")]
    pub command: String,
    /// Entry stylesheet
    #[serde(default = "default_style_entry")]
    pub entry: String,
    /// Style source tree watched in dev
    #[serde(default = "default_style_dir")]
    pub dir: String,
}

#[derive(Debug, Deserialize)]
pub struct ScriptsConfig {
    /// Script bundler binary
    #[serde(default = "default_script_command")]
    pub command: String,
    /// Application entry module
    #[serde(default = "default_script_entry")]
    pub entry: String,
}

#[derive(Debug, Deserialize)]
pub struct SiteConfig {
    /// HTML shell template
    #[serde(default = "default_template")]
    pub template: String,
    /// Static assets directory
    #[serde(default = "default_public_dir")]
    pub public_dir: String,
    /// Production output directory
    #[serde(default = "default_output")]
    pub output: String,
}

#[derive(Debug, Deserialize)]
pub struct DevConfig {
    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for ContentConfig {
    fn default() -> Self {
        Self {
            dir: default_content_dir(),
            output: default_content_output(),
        }
    }
}

impl Default for StylesConfig {
    fn default() -> Self {
        Self {
            command: default_style_command(),
            entry: default_style_entry(),
            dir: default_style_dir(),
        }
    }
}

impl Default for ScriptsConfig {
    fn default() -> Self {
        Self {
            command: default_script_command(),
            entry: default_script_entry(),
        }
    }
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            template: default_template(),
            public_dir: default_public_dir(),
            output: default_output(),
        }
    }
}

impl Default for DevConfig {
    fn default() -> Self {
        Self {
            port: default_port(),
        }
    }
}

fn default_content_dir() -> String {
    "content".to_string()
}
fn default_content_output() -> String {
    "src/data/content.json".to_string()
}
fn default_style_command() -> String {
    "tailwindcss".to_string()
}
fn default_style_entry() -> String {
    "src/styles/main.css".to_string()
}
fn default_style_dir() -> String {
    "src/styles".to_string()
}
fn default_script_command() -> String {
    "esbuild".to_string()
}
fn default_script_entry() -> String {
    "src/main.tsx".to_string()
}
fn default_template() -> String {
    "index.html".to_string()
}
fn default_public_dir() -> String {
    "public".to_string()
}
fn default_output() -> String {
    "dist".to_string()
}
fn default_port() -> u16 {
    3000
}

/// Load configuration from the given path if it exists.
/// Returns an error if the config file exists but is malformed.
pub fn load(path: &Path) -> Result<ConfigFile> {
    if path.exists() {
        let content = fs::read_to_string(path)
            .map_err(|e| anyhow::anyhow!("Failed to read {}: {}", path.display(), e))?;
        let config: ConfigFile = toml::from_str(&content)
            .map_err(|e| anyhow::anyhow!("Failed to parse {}: {}", path.display(), e))?;
        tracing::info!("Loaded config from {}", path.display());
        return Ok(config);
    }
    Ok(ConfigFile::default())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use tempfile::tempdir;

    #[test]
    fn absent_file_yields_defaults() {
        let temp = tempdir().unwrap();

        let config = load(&temp.path().join("tenon.toml")).unwrap();

        assert_eq!(config.content.dir, "content");
        assert_eq!(config.scripts.entry, "src/main.tsx");
        assert_eq!(config.dev.port, 3000);
    }

    #[test]
    fn partial_file_keeps_remaining_defaults() {
        let temp = tempdir().unwrap();
        let path = temp.path().join("tenon.toml");
        fs::write(&path, "[dev]\nport = 8080\n\n[content]\ndir = \"concepts\"\n").unwrap();

        let config = load(&path).unwrap();

        assert_eq!(config.dev.port, 8080);
        assert_eq!(config.content.dir, "concepts");
        assert_eq!(config.site.output, "dist");
    }

    #[test]
    fn malformed_file_is_an_error() {
        let temp = tempdir().unwrap();
        let path = temp.path().join("tenon.toml");
        fs::write(&path, "not = [valid").unwrap();

        assert!(load(&path).is_err());
    }
}
