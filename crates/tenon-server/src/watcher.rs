//! Style source watching.
//!
//! Observes the style source tree and reports changed stylesheets so the
//! server can recompile outside the request path. Rapid changes may
//! produce overlapping recompiles; the last writer wins.

use std::path::{Path, PathBuf};
use std::sync::mpsc;

use notify::{RecommendedWatcher, RecursiveMode, Watcher};
use tokio::sync::mpsc as async_mpsc;

/// Watches a style directory for stylesheet changes.
///
/// Dropping the watcher closes the underlying filesystem watch.
pub struct StyleWatcher {
    _watcher: RecommendedWatcher,
}

impl StyleWatcher {
    /// Watch `style_dir` recursively.
    ///
    /// Returns the watcher and a channel yielding the path of each
    /// changed stylesheet.
    pub fn new(style_dir: &Path) -> Result<(Self, async_mpsc::Receiver<PathBuf>), std::io::Error> {
        let (sync_tx, sync_rx) = mpsc::channel();
        let (async_tx, async_rx) = async_mpsc::channel(100);

        let mut watcher = notify::recommended_watcher(move |res: Result<notify::Event, _>| {
            if let Ok(event) = res {
                let _ = sync_tx.send(event);
            }
        })
        .map_err(std::io::Error::other)?;

        watcher
            .watch(style_dir, RecursiveMode::Recursive)
            .map_err(std::io::Error::other)?;

        // Bridge the notify callback thread into the async runtime
        std::thread::spawn(move || {
            while let Ok(event) = sync_rx.recv() {
                for path in event.paths {
                    if is_stylesheet(&path) {
                        let _ = async_tx.blocking_send(path);
                    }
                }
            }
        });

        Ok((Self { _watcher: watcher }, async_rx))
    }
}

/// Only stylesheet changes trigger recompilation.
fn is_stylesheet(path: &Path) -> bool {
    path.extension().and_then(|e| e.to_str()) == Some("css")
}
