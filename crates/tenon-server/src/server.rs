//! Development server implementation.

use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use axum::{
    extract::State,
    http::{header, StatusCode, Uri},
    response::{Html, IntoResponse, Response},
    Router,
};

use tenon_assets::{html, ScriptBundler, StyleCompiler, StyleError};

use crate::routes::{content_type, Route, RouteTable};
use crate::watcher::StyleWatcher;

/// Request path of the dev-compiled stylesheet.
const CSS_ROUTE: &str = "styles.css";

/// Scratch directory for dev artifacts; no output directory is persisted.
const SCRATCH_DIR: &str = ".tenon";

/// Configuration for the development server.
#[derive(Debug, Clone)]
pub struct DevServerConfig {
    /// Project root (source tree fallthrough)
    pub root: PathBuf,

    /// Static assets directory
    pub public_dir: PathBuf,

    /// HTML shell template
    pub template: PathBuf,

    /// CSS compiler binary
    pub style_command: String,

    /// Entry stylesheet
    pub style_entry: PathBuf,

    /// Style source tree observed by the watcher
    pub style_dir: PathBuf,

    /// Script bundler binary
    pub script_command: String,

    /// Application entry module
    pub script_entry: PathBuf,

    /// Port to listen on
    pub port: u16,

    /// Host to bind to
    pub host: String,

    /// Open browser on start
    pub open: bool,
}

impl Default for DevServerConfig {
    fn default() -> Self {
        Self {
            root: PathBuf::from("."),
            public_dir: PathBuf::from("public"),
            template: PathBuf::from("index.html"),
            style_command: "tailwindcss".to_string(),
            style_entry: PathBuf::from("src/styles/main.css"),
            style_dir: PathBuf::from("src/styles"),
            script_command: "esbuild".to_string(),
            script_entry: PathBuf::from("src/main.tsx"),
            port: 3000,
            host: "127.0.0.1".to_string(),
            open: true,
        }
    }
}

/// Errors that can occur with the server.
#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    #[error("Invalid listen address {0}: {1}")]
    Address(String, String),

    #[error("Failed to bind to {0}: {1}")]
    Bind(SocketAddr, String),

    #[error("File watch error: {0}")]
    Watch(String),

    #[error("Failed to prepare scratch directory: {0}")]
    Scratch(std::io::Error),

    #[error(transparent)]
    Style(#[from] StyleError),
}

/// Shared read-only state; requests are independent stateless events
/// against it.
struct RouterState {
    table: RouteTable,
    template: PathBuf,
    css_path: PathBuf,
    bundler: ScriptBundler,
}

/// Development server.
pub struct DevServer {
    config: DevServerConfig,
}

impl DevServer {
    /// Create a new development server.
    pub fn new(config: DevServerConfig) -> Self {
        Self { config }
    }

    /// Start the development server.
    ///
    /// Compiles styles once before accepting connections (fatal on
    /// failure), then serves until interrupted; the watcher handle is
    /// dropped after the serve loop exits so no watch outlives the
    /// process.
    pub async fn start(self) -> Result<(), ServerError> {
        let addr_text = format!("{}:{}", self.config.host, self.config.port);
        let addr: SocketAddr = addr_text
            .parse()
            .map_err(|e: std::net::AddrParseError| ServerError::Address(addr_text, e.to_string()))?;

        let css_path = self.config.root.join(SCRATCH_DIR).join(CSS_ROUTE);
        std::fs::create_dir_all(self.config.root.join(SCRATCH_DIR))
            .map_err(ServerError::Scratch)?;

        // Initial compile is one-shot and blocking; a broken stylesheet
        // aborts startup before the listener binds.
        let styles = StyleCompiler::new(&self.config.style_command, &self.config.style_entry);
        styles.compile(&css_path, false).await?;

        let watcher = self.spawn_style_watcher(&styles, &css_path)?;

        let state = Arc::new(RouterState {
            table: RouteTable {
                root: self.config.root.clone(),
                public_dir: self.config.public_dir.clone(),
                css_route: CSS_ROUTE.to_string(),
                script_entry: self.config.script_entry.display().to_string(),
            },
            template: self.config.template.clone(),
            css_path,
            bundler: ScriptBundler::new(&self.config.script_command, &self.config.script_entry),
        });

        let app = Router::new().fallback(handle_request).with_state(state);

        tracing::info!("Starting dev server at http://{}", addr);

        if self.config.open {
            let url = format!("http://{}", addr);
            let _ = open::that(&url);
        }

        let listener = tokio::net::TcpListener::bind(addr)
            .await
            .map_err(|e| ServerError::Bind(addr, e.to_string()))?;

        axum::serve(listener, app)
            .with_graceful_shutdown(shutdown_signal())
            .await
            .map_err(|e| ServerError::Bind(addr, e.to_string()))?;

        // Closes the filesystem watch before the process exits
        drop(watcher);

        Ok(())
    }

    /// Start the background style watcher, recompiling on stylesheet
    /// changes outside the request path.
    fn spawn_style_watcher(
        &self,
        styles: &StyleCompiler,
        css_path: &std::path::Path,
    ) -> Result<Option<StyleWatcher>, ServerError> {
        if !self.config.style_dir.exists() {
            tracing::warn!(
                "Style directory {} not found; live recompilation disabled",
                self.config.style_dir.display()
            );
            return Ok(None);
        }

        let (watcher, mut rx) = StyleWatcher::new(&self.config.style_dir)
            .map_err(|e| ServerError::Watch(e.to_string()))?;

        let styles = styles.clone();
        let css_path = css_path.to_path_buf();

        tokio::spawn(async move {
            while let Some(changed) = rx.recv().await {
                tracing::info!("Stylesheet changed: {}", changed.display());

                let styles = styles.clone();
                let out = css_path.clone();

                // Fire-and-forget: overlapping recompiles race on the
                // output file and the last writer wins.
                tokio::spawn(async move {
                    if let Err(e) = styles.compile(&out, false).await {
                        tracing::warn!("Style recompile failed: {}", e);
                    }
                });
            }
        });

        Ok(Some(watcher))
    }
}

/// Resolve and serve one request through the fallback chain.
async fn handle_request(State(state): State<Arc<RouterState>>, uri: Uri) -> Response {
    match state.table.resolve(uri.path()) {
        Route::Shell => serve_shell(&state).await,
        Route::Static(path) | Route::Source(path) => serve_file(&path).await,
        Route::CompiledCss => serve_css(&state).await,
        Route::ScriptEntry => serve_script(&state).await,
        Route::NotFound => (StatusCode::NOT_FOUND, "Not Found").into_response(),
    }
}

/// Serve the HTML shell with the dev stylesheet link injected.
async fn serve_shell(state: &RouterState) -> Response {
    let template = match tokio::fs::read_to_string(&state.template).await {
        Ok(text) => text,
        Err(e) => {
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                format!("Failed to read template: {}", e),
            )
                .into_response();
        }
    };

    match html::inject_dev_head(&template, &format!("/{}", CSS_ROUTE)) {
        Ok(shell) => Html(shell).into_response(),
        Err(e) => (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()).into_response(),
    }
}

/// Serve a static or source file verbatim with its natural content type.
async fn serve_file(path: &std::path::Path) -> Response {
    match tokio::fs::read(path).await {
        Ok(bytes) => (
            StatusCode::OK,
            [(header::CONTENT_TYPE, content_type(path))],
            bytes,
        )
            .into_response(),
        Err(_) => (StatusCode::NOT_FOUND, "Not Found").into_response(),
    }
}

/// Serve the dev-compiled stylesheet. The watcher may be rewriting it
/// concurrently; a stale read is accepted.
async fn serve_css(state: &RouterState) -> Response {
    match tokio::fs::read(&state.css_path).await {
        Ok(bytes) => (
            StatusCode::OK,
            [(header::CONTENT_TYPE, "text/css; charset=utf-8")],
            bytes,
        )
            .into_response(),
        Err(_) => (StatusCode::NOT_FOUND, "Not Found").into_response(),
    }
}

/// Compile and serve the entry module. Compile failures are isolated to
/// this response; the server keeps running.
async fn serve_script(state: &RouterState) -> Response {
    match state.bundler.bundle_dev().await {
        Ok(js) => (
            StatusCode::OK,
            [(header::CONTENT_TYPE, "application/javascript; charset=utf-8")],
            js,
        )
            .into_response(),
        Err(e) => (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()).into_response(),
    }
}

async fn shutdown_signal() {
    match tokio::signal::ctrl_c().await {
        Ok(()) => tracing::info!("Interrupt received, shutting down"),
        Err(e) => {
            // With no handler installed there is no shutdown trigger;
            // keep serving rather than exiting right after startup.
            tracing::error!("Failed to install interrupt handler: {}", e);
            std::future::pending::<()>().await;
        }
    }
}
