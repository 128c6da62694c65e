//! Content fragment aggregation for tenon sites.
//!
//! Merges a directory of individually authored JSON fragments into the
//! single data bundle the application imports at build time.

pub mod bundle;
pub mod fragment;

pub use bundle::{merge_dir, ContentBundle, MergeError};
pub use fragment::ContentFragment;
