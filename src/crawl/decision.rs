//! Insert/update/skip decision for an entry seen during an update pass

use std::path::Path;

use crate::index::IndexSnapshot;
use crate::types::{path_to_id, unix_seconds};

use super::CrawlError;

/// What an update pass does with one entry
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    /// Indexed and not modified since
    Skip,
    /// Not indexed yet
    Insert,
    /// Indexed, but modified on disk after the stored time
    Update,
}

/// Compare `path` against its stored record, if any.
///
/// Only a strictly newer on-disk modification time (whole seconds) triggers
/// an update.
pub fn decide(snapshot: &IndexSnapshot, path: &Path) -> Result<Decision, CrawlError> {
    let existing = snapshot
        .find_by_id(&path_to_id(path))
        .map_err(|source| CrawlError::Lookup {
            path: path.to_path_buf(),
            source,
        })?;

    let Some(existing) = existing else {
        return Ok(Decision::Insert);
    };

    let modified = std::fs::metadata(path)
        .and_then(|m| m.modified())
        .map_err(|source| CrawlError::Stat {
            path: path.to_path_buf(),
            source,
        })?;

    if unix_seconds(modified) > existing.modified_time {
        Ok(Decision::Update)
    } else {
        Ok(Decision::Skip)
    }
}
