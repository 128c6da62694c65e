//! Development server with on-demand compilation for tenon sites.
//!
//! Serves the HTML shell, static assets, freshly compiled CSS and a
//! per-request script bundle through an ordered fallback chain, with a
//! background watcher recompiling styles on change.

pub mod routes;
pub mod server;
pub mod watcher;

pub use routes::{Route, RouteTable};
pub use server::{DevServer, DevServerConfig, ServerError};
pub use watcher::StyleWatcher;
