//! Request-path resolution.
//!
//! The dev server resolves every request through one ordered, first-match
//! fallback chain: shell routes, static overrides, generated dev assets,
//! then raw source fallthrough. The chain is an explicit resolution
//! function so its precedence can be tested in isolation.

use std::path::{Component, Path, PathBuf};

/// Where a request resolves to.
#[derive(Debug, Clone, PartialEq)]
pub enum Route {
    /// The HTML shell (root or any extension-less path)
    Shell,

    /// A file under the public directory, served verbatim
    Static(PathBuf),

    /// The dev-compiled stylesheet
    CompiledCss,

    /// The script entry module, compiled per request
    ScriptEntry,

    /// A file under the project source tree, served verbatim
    Source(PathBuf),

    /// Nothing matched
    NotFound,
}

/// Read-only routing config shared by all requests.
#[derive(Debug, Clone)]
pub struct RouteTable {
    /// Project root (source tree fallthrough)
    pub root: PathBuf,

    /// Static assets directory (wins over generated and source files)
    pub public_dir: PathBuf,

    /// Request path of the dev-compiled stylesheet, e.g. `styles.css`
    pub css_route: String,

    /// Request path of the script entry module, e.g. `src/main.tsx`
    pub script_entry: String,
}

impl RouteTable {
    /// Resolve a request path through the fallback chain, first match wins:
    /// shell route, static asset, compiled CSS, script entry, raw source,
    /// not found.
    pub fn resolve(&self, request_path: &str) -> Route {
        let rel = request_path.trim_start_matches('/');

        if has_traversal(rel) {
            return Route::NotFound;
        }

        // Root and extension-less paths are application routes; the SPA
        // router takes over client-side.
        if rel.is_empty() || Path::new(rel).extension().is_none() {
            return Route::Shell;
        }

        let static_path = self.public_dir.join(rel);
        if static_path.is_file() {
            return Route::Static(static_path);
        }

        if rel == self.css_route {
            return Route::CompiledCss;
        }

        if rel == self.script_entry {
            return Route::ScriptEntry;
        }

        let source_path = self.root.join(rel);
        if source_path.is_file() {
            return Route::Source(source_path);
        }

        Route::NotFound
    }
}

fn has_traversal(rel: &str) -> bool {
    Path::new(rel)
        .components()
        .any(|c| matches!(c, Component::ParentDir))
}

/// Content type for a served file, from its extension.
pub fn content_type(path: &Path) -> &'static str {
    match path.extension().and_then(|e| e.to_str()).unwrap_or("") {
        "html" => "text/html; charset=utf-8",
        "css" => "text/css; charset=utf-8",
        "js" | "mjs" | "jsx" | "ts" | "tsx" => "application/javascript; charset=utf-8",
        "json" | "map" => "application/json",
        "svg" => "image/svg+xml",
        "png" => "image/png",
        "jpg" | "jpeg" => "image/jpeg",
        "gif" => "image/gif",
        "webp" => "image/webp",
        "ico" => "image/x-icon",
        "woff" => "font/woff",
        "woff2" => "font/woff2",
        "txt" => "text/plain; charset=utf-8",
        "wasm" => "application/wasm",
        _ => "application/octet-stream",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::fs;
    use tempfile::tempdir;

    fn table(root: &Path) -> RouteTable {
        RouteTable {
            root: root.to_path_buf(),
            public_dir: root.join("public"),
            css_route: "styles.css".to_string(),
            script_entry: "src/main.tsx".to_string(),
        }
    }

    #[test]
    fn root_and_extensionless_paths_are_shell_routes() {
        let temp = tempdir().unwrap();
        let table = table(temp.path());

        assert_eq!(table.resolve("/"), Route::Shell);
        assert_eq!(table.resolve("/concepts"), Route::Shell);
        assert_eq!(table.resolve("/concepts/anchoring"), Route::Shell);
    }

    #[test]
    fn static_assets_win_over_source_files() {
        let temp = tempdir().unwrap();
        fs::create_dir_all(temp.path().join("public")).unwrap();
        fs::write(temp.path().join("public/logo.svg"), "public").unwrap();
        fs::write(temp.path().join("logo.svg"), "source").unwrap();

        let route = table(temp.path()).resolve("/logo.svg");

        assert_eq!(
            route,
            Route::Static(temp.path().join("public/logo.svg"))
        );
    }

    #[test]
    fn compiled_css_route_matches_exactly() {
        let temp = tempdir().unwrap();

        assert_eq!(table(temp.path()).resolve("/styles.css"), Route::CompiledCss);
    }

    #[test]
    fn static_override_beats_compiled_css() {
        let temp = tempdir().unwrap();
        fs::create_dir_all(temp.path().join("public")).unwrap();
        fs::write(temp.path().join("public/styles.css"), "override").unwrap();

        let route = table(temp.path()).resolve("/styles.css");

        assert!(matches!(route, Route::Static(_)));
    }

    #[test]
    fn script_entry_is_compiled_per_request() {
        let temp = tempdir().unwrap();

        assert_eq!(
            table(temp.path()).resolve("/src/main.tsx"),
            Route::ScriptEntry
        );
    }

    #[test]
    fn source_files_fall_through() {
        let temp = tempdir().unwrap();
        fs::create_dir_all(temp.path().join("src")).unwrap();
        fs::write(temp.path().join("src/app.tsx"), "export {}").unwrap();

        let route = table(temp.path()).resolve("/src/app.tsx");

        assert_eq!(route, Route::Source(temp.path().join("src/app.tsx")));
    }

    #[test]
    fn unmatched_paths_are_not_found() {
        let temp = tempdir().unwrap();

        assert_eq!(table(temp.path()).resolve("/nonexistent.xyz"), Route::NotFound);
    }

    #[test]
    fn traversal_is_rejected_before_the_chain() {
        let temp = tempdir().unwrap();

        assert_eq!(
            table(temp.path()).resolve("/../secrets.json"),
            Route::NotFound
        );
        assert_eq!(
            table(temp.path()).resolve("/src/../../etc/passwd.txt"),
            Route::NotFound
        );
    }

    #[test]
    fn content_types_cover_common_web_assets() {
        assert_eq!(content_type(Path::new("a.css")), "text/css; charset=utf-8");
        assert_eq!(content_type(Path::new("a.svg")), "image/svg+xml");
        assert_eq!(content_type(Path::new("a.bin")), "application/octet-stream");
    }
}
