pub mod build;
pub mod dev;
pub mod merge;
pub mod preview;
