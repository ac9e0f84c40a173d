//! filetundra: a searchable, browsable index of one directory tree
//!
//! - A crawler mirrors the tree into a persistent Tantivy index, recording
//!   sniffed MIME types, archive member names and audio tags
//! - Incremental update passes re-index only entries whose modification time moved
//! - An HTTP service lists directories, runs fuzzy searches and serves
//!   range-aware downloads straight from disk

pub mod config;
pub mod crawl;
pub mod extract;
pub mod http;
pub mod index;
pub mod lifecycle;
pub mod types;

pub use config::Config;
pub use types::*;
