//! External CSS toolchain invocation.

use std::path::{Path, PathBuf};

use tokio::process::Command;

/// Errors that can occur while compiling styles.
#[derive(Debug, thiserror::Error)]
pub enum StyleError {
    #[error("Failed to run CSS compiler '{command}': {source}")]
    Spawn {
        command: String,
        source: std::io::Error,
    },

    #[error("CSS compiler exited with {status}: {stderr}")]
    Failed { status: String, stderr: String },
}

/// Invokes the external CSS compiler against one entry stylesheet.
#[derive(Debug, Clone)]
pub struct StyleCompiler {
    /// CSS compiler binary (e.g. `tailwindcss`)
    pub command: String,

    /// Entry stylesheet path
    pub entry: PathBuf,
}

impl StyleCompiler {
    pub fn new(command: impl Into<String>, entry: impl Into<PathBuf>) -> Self {
        Self {
            command: command.into(),
            entry: entry.into(),
        }
    }

    /// Compile the entry stylesheet to `output`, blocking the calling
    /// stage until the compiler exits. Production builds pass `minify`.
    pub async fn compile(&self, output: &Path, minify: bool) -> Result<(), StyleError> {
        let args = self.build_args(output, minify);

        tracing::debug!("Running {} {}", self.command, args.join(" "));

        let result = Command::new(&self.command)
            .args(&args)
            .output()
            .await
            .map_err(|e| StyleError::Spawn {
                command: self.command.clone(),
                source: e,
            })?;

        if !result.status.success() {
            return Err(StyleError::Failed {
                status: result.status.to_string(),
                stderr: String::from_utf8_lossy(&result.stderr).into_owned(),
            });
        }

        Ok(())
    }

    fn build_args(&self, output: &Path, minify: bool) -> Vec<String> {
        let mut args = vec![
            "-i".to_string(),
            self.entry.display().to_string(),
            "-o".to_string(),
            output.display().to_string(),
        ];

        if minify {
            args.push("--minify".to_string());
        }

        args
    }
}
