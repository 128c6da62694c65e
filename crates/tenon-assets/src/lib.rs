//! External toolchain integration for tenon.
//!
//! Wraps the CSS compiler and script bundler CLIs behind typed Rust
//! errors, and rewrites the HTML shell to reference their outputs.

pub mod bundler;
pub mod html;
pub mod styles;

pub use bundler::{BundleError, BundleOutput, ScriptBundler};
pub use html::{inject_dev_head, rewrite, RewriteError};
pub use styles::{StyleCompiler, StyleError};
