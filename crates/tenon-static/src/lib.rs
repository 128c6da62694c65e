//! Production build staging for tenon sites.
//!
//! Sequences content aggregation, style compilation, script bundling, and
//! HTML rewriting into one deterministic build against a clean output
//! directory.

pub mod builder;

pub use builder::{BuildConfig, BuildError, BuildSummary, SiteBuilder};
