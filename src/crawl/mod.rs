//! Crawler keeping the index in step with the directory tree
//!
//! A pass walks every entry below the root, builds records for new or
//! modified entries and commits them in one batch once the walk is complete.
//! Any error aborts the pass before anything is written.

mod decision;
mod document;

pub use decision::{decide, Decision};
pub use document::build_record;

use std::path::PathBuf;
use std::time::Instant;

use serde::Serialize;
use thiserror::Error;
use tracing::{debug, info};
use walkdir::WalkDir;

use crate::index::{Batch, FileIndex, IndexError};

/// Errors that abort a crawl pass
#[derive(Debug, Error)]
pub enum CrawlError {
    #[error("Directory walk failed: {0}")]
    Walk(#[from] walkdir::Error),
    #[error("Failed to stat {path}: {source}")]
    Stat {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Failed to detect type of {path}: {source}")]
    Sniff {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Index lookup for {path} failed: {source}")]
    Lookup {
        path: PathBuf,
        #[source]
        source: IndexError,
    },
    #[error("Index error: {0}")]
    Index(#[from] IndexError),
}

/// Kind of crawl pass
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CrawlMode {
    /// Insert every entry without consulting the index
    Initial,
    /// Insert new entries and update modified ones
    Update,
}

/// Counters for one pass
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct CrawlStats {
    /// Entries visited below the root
    pub visited: usize,
    pub inserted: usize,
    pub updated: usize,
    /// Entries already indexed and unchanged
    pub skipped: usize,
}

/// Walks one root and writes into one index
pub struct Crawler<'a> {
    index: &'a FileIndex,
    root: PathBuf,
}

impl<'a> Crawler<'a> {
    pub fn new(index: &'a FileIndex, root: impl Into<PathBuf>) -> Self {
        Self {
            index,
            root: root.into(),
        }
    }

    /// Run one pass. Nothing is committed unless the whole walk succeeds.
    pub fn run(&self, mode: CrawlMode) -> Result<CrawlStats, CrawlError> {
        let started = Instant::now();
        info!("Starting {:?} crawl of {}", mode, self.root.display());

        // Update passes compare against the index as it was when the pass began
        let snapshot = match mode {
            CrawlMode::Initial => None,
            CrawlMode::Update => Some(self.index.snapshot()),
        };

        let mut batch = Batch::new();
        let mut stats = CrawlStats::default();

        for entry in WalkDir::new(&self.root).min_depth(1) {
            let entry = entry?;
            let path = entry.path();
            stats.visited += 1;

            let decision = match &snapshot {
                Some(snapshot) => decide(snapshot, path)?,
                None => Decision::Insert,
            };
            if decision == Decision::Skip {
                stats.skipped += 1;
                continue;
            }

            // A symlink to a directory is recorded as a directory but not descended into
            let is_directory =
                entry.file_type().is_dir() || (entry.path_is_symlink() && path.is_dir());
            let record = build_record(path, is_directory)?;
            debug!("{:?} {}", decision, record.id);

            match decision {
                Decision::Insert => batch.insert(record),
                Decision::Update => batch.update(record),
                Decision::Skip => {}
            }
        }

        let committed = self.index.commit(batch)?;
        stats.inserted = committed.inserted;
        stats.updated = committed.updated;

        info!(
            "Crawl finished in {:.2}s: {} visited, {} inserted, {} updated, {} skipped",
            started.elapsed().as_secs_f64(),
            stats.visited,
            stats.inserted,
            stats.updated,
            stats.skipped
        );
        Ok(stats)
    }
}
