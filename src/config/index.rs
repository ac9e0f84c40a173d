//! Index location and crawl configuration

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Persistent index configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IndexConfig {
    /// Index directory; defaults to a subpath of the user cache directory
    #[serde(default)]
    pub dir: Option<PathBuf>,
    /// Memory budget for the index writer
    #[serde(default = "default_writer_heap_bytes")]
    pub writer_heap_bytes: usize,
}

fn default_writer_heap_bytes() -> usize {
    50_000_000
}

impl IndexConfig {
    /// Smallest writer budget Tantivy accepts for a single thread
    pub const MIN_WRITER_HEAP_BYTES: usize = 15_000_000;

    /// Configured directory, or `<cache dir>/filetundra/filetundra.tantivy`
    pub fn resolve_dir(&self) -> Result<PathBuf> {
        if let Some(dir) = &self.dir {
            return Ok(dir.clone());
        }
        let base = directories::BaseDirs::new().context("Could not determine the user cache directory")?;
        Ok(base.cache_dir().join("filetundra").join("filetundra.tantivy"))
    }
}

impl Default for IndexConfig {
    fn default() -> Self {
        Self {
            dir: None,
            writer_heap_bytes: default_writer_heap_bytes(),
        }
    }
}

/// Crawl behaviour at startup
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CrawlConfig {
    /// Run an update pass before serving when an index already exists
    #[serde(default)]
    pub update_on_start: bool,
}
