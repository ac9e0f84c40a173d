//! Persistent file index backed by Tantivy
//!
//! Single writer, many readers. Writes go through [`Batch`] and land in one
//! commit; reads go through an [`IndexSnapshot`], a point-in-time view that
//! stays consistent while a commit happens underneath it.

mod batch;
mod mapper;
mod query;
mod schema;
pub mod varint;

pub use batch::{Batch, BatchOp, CommitStats};
pub use mapper::{document_to_record, record_to_document};
pub use query::{dirname_query, id_query, search_query, Matches};
pub use schema::{build_schema, filename_analyzer, FileFields, FILENAME_TOKENIZER};

use std::path::{Path, PathBuf};

use tantivy::directory::MmapDirectory;
use tantivy::{Index, IndexReader, ReloadPolicy, Searcher};
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::config::IndexConfig;
use crate::types::FileRecord;

/// Errors from the persistent index
#[derive(Debug, Error)]
pub enum IndexError {
    #[error("Failed to open index at {path}: {source}")]
    Open {
        path: PathBuf,
        #[source]
        source: tantivy::TantivyError,
    },
    #[error("Index schema mismatch: {0}")]
    Schema(String),
    #[error("Query failed: {0}")]
    Query(#[source] tantivy::TantivyError),
    #[error("Failed to read stored document: {0}")]
    Document(#[source] tantivy::TantivyError),
    #[error("Index write failed: {0}")]
    Write(#[source] tantivy::TantivyError),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// The persistent index of file records
pub struct FileIndex {
    index: Index,
    reader: IndexReader,
    fields: FileFields,
    writer_heap_bytes: usize,
}

impl FileIndex {
    /// Open the index in `dir`, creating it when the directory does not exist.
    ///
    /// The returned flag is `true` when a fresh index was created.
    pub fn open_or_create(dir: &Path, config: &IndexConfig) -> Result<(Self, bool), IndexError> {
        if dir.exists() {
            Ok((Self::open(dir, config)?, false))
        } else {
            Ok((Self::create(dir, config)?, true))
        }
    }

    /// Open an existing on-disk index
    pub fn open(dir: &Path, config: &IndexConfig) -> Result<Self, IndexError> {
        let open_err = |source: tantivy::TantivyError| IndexError::Open {
            path: dir.to_path_buf(),
            source,
        };
        let mmap = MmapDirectory::open(dir).map_err(|e| open_err(e.into()))?;
        let index = Index::open(mmap).map_err(open_err)?;
        info!("Opened index at {}", dir.display());
        Self::from_index(index, config.writer_heap_bytes, dir)
    }

    /// Create a new on-disk index
    pub fn create(dir: &Path, config: &IndexConfig) -> Result<Self, IndexError> {
        std::fs::create_dir_all(dir)?;
        let index = Index::create_in_dir(dir, build_schema()).map_err(|source| IndexError::Open {
            path: dir.to_path_buf(),
            source,
        })?;
        info!("Created index at {}", dir.display());
        Self::from_index(index, config.writer_heap_bytes, dir)
    }

    /// Create an index held entirely in memory
    pub fn in_memory() -> Result<Self, IndexError> {
        let index = Index::create_in_ram(build_schema());
        Self::from_index(index, IndexConfig::default().writer_heap_bytes, Path::new(":memory:"))
    }

    fn from_index(index: Index, writer_heap_bytes: usize, path: &Path) -> Result<Self, IndexError> {
        let fields = FileFields::from_schema(&index.schema())?;
        schema::register_analyzers(&index)?;

        let reader = index
            .reader_builder()
            .reload_policy(ReloadPolicy::OnCommitWithDelay)
            .try_into()
            .map_err(|source| IndexError::Open {
                path: path.to_path_buf(),
                source,
            })?;

        Ok(Self {
            index,
            reader,
            fields,
            writer_heap_bytes,
        })
    }

    /// Point-in-time read view
    pub fn snapshot(&self) -> IndexSnapshot {
        IndexSnapshot {
            searcher: self.reader.searcher(),
            index: self.index.clone(),
            fields: self.fields,
        }
    }

    /// Number of records visible to new snapshots
    pub fn num_records(&self) -> u64 {
        self.reader.searcher().num_docs()
    }

    /// Apply every operation in `batch` as one write transaction.
    ///
    /// The writer is acquired here and released before returning, whether the
    /// commit succeeds or not. On failure nothing from the batch is visible.
    pub fn commit(&self, batch: Batch) -> Result<CommitStats, IndexError> {
        let stats = batch.apply(&self.index, &self.fields, self.writer_heap_bytes)?;
        // Make the commit visible to the next snapshot without waiting on the reload delay
        if let Err(e) = self.reader.reload() {
            warn!("Reader reload after commit failed: {}", e);
        }
        debug!(
            "Committed batch: {} inserted, {} updated",
            stats.inserted, stats.updated
        );
        Ok(stats)
    }
}

/// A consistent read view of the index
pub struct IndexSnapshot {
    searcher: Searcher,
    index: Index,
    fields: FileFields,
}

impl IndexSnapshot {
    /// Exact match on the record id
    pub fn lookup_by_id(&self, id: &str) -> Result<Matches<'_>, IndexError> {
        self.execute(&id_query(&self.fields, id))
    }

    /// Exact match on the parent directory
    pub fn lookup_by_dirname(&self, dirname: &str) -> Result<Matches<'_>, IndexError> {
        self.execute(&dirname_query(&self.fields, dirname))
    }

    /// Free-text search across basename, directory and archive members
    pub fn search(&self, text: &str) -> Result<Matches<'_>, IndexError> {
        let query = search_query(&self.index, &self.fields, text)?;
        self.execute(query.as_ref())
    }

    /// First record whose id is `id`, if any
    pub fn find_by_id(&self, id: &str) -> Result<Option<FileRecord>, IndexError> {
        self.lookup_by_id(id)?.next().transpose()
    }

    pub fn num_records(&self) -> u64 {
        self.searcher.num_docs()
    }

    fn execute(&self, query: &dyn tantivy::query::Query) -> Result<Matches<'_>, IndexError> {
        Matches::collect(&self.searcher, &self.fields, query)
    }
}
