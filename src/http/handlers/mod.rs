//! HTTP request handlers

mod assets;
mod browse;
mod download;
mod search;

use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::index::{FileIndex, IndexError, IndexSnapshot};
use crate::types::FileRecord;

use super::error::HttpError;

pub use assets::static_asset;
pub use browse::{browse, browse_root};
pub use download::download;
pub use search::{search, SearchForm};

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    index: Arc<FileIndex>,
    root: Arc<PathBuf>,
}

impl AppState {
    /// `root` must be the canonical root the index was crawled from
    pub fn new(index: Arc<FileIndex>, root: PathBuf) -> Self {
        Self {
            index,
            root: Arc::new(root),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Record whose id is `id`
    pub async fn find_record(&self, id: String) -> Result<Option<FileRecord>, HttpError> {
        self.with_snapshot(move |snapshot| snapshot.find_by_id(&id))
            .await
    }

    /// Every record whose parent directory is `dirname`
    pub async fn list_directory(&self, dirname: String) -> Result<Vec<FileRecord>, HttpError> {
        self.with_snapshot(move |snapshot| snapshot.lookup_by_dirname(&dirname)?.collect())
            .await
    }

    /// Every record matching the free-text query
    pub async fn search(&self, text: String) -> Result<Vec<FileRecord>, HttpError> {
        self.with_snapshot(move |snapshot| snapshot.search(&text)?.collect())
            .await
    }

    /// Run a read against a fresh snapshot on the blocking pool
    async fn with_snapshot<T, F>(&self, read: F) -> Result<T, HttpError>
    where
        F: FnOnce(&IndexSnapshot) -> Result<T, IndexError> + Send + 'static,
        T: Send + 'static,
    {
        let index = self.index.clone();
        tokio::task::spawn_blocking(move || read(&index.snapshot()))
            .await
            .map_err(|e| HttpError::Internal(format!("Index task failed: {}", e)))?
            .map_err(HttpError::from)
    }
}
