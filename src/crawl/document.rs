//! Building a [`FileRecord`] from a path on disk

use std::path::Path;

use tracing::{debug, warn};

use crate::extract::{extract, ContainerKind};
use crate::types::{path_to_id, split_basename, unix_seconds, FileRecord, DIRECTORY_MIME, FALLBACK_MIME};

use super::CrawlError;

/// Build the record for `path`.
///
/// Stat and sniff failures are returned; extractor failures are logged and
/// the record is kept with whatever metadata was gathered.
pub fn build_record(path: &Path, is_directory: bool) -> Result<FileRecord, CrawlError> {
    let metadata = std::fs::metadata(path).map_err(|source| CrawlError::Stat {
        path: path.to_path_buf(),
        source,
    })?;
    let modified = metadata.modified().map_err(|source| CrawlError::Stat {
        path: path.to_path_buf(),
        source,
    })?;

    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    let (bare_basename, extname) = split_basename(&name);

    let mut record = FileRecord {
        id: path_to_id(path),
        size: metadata.len(),
        modified_time: unix_seconds(modified),
        bare_basename,
        extname,
        dirname: path.parent().map(path_to_id).unwrap_or_default(),
        ..Default::default()
    };

    if is_directory {
        record.mime_type = DIRECTORY_MIME.to_string();
        return Ok(record);
    }

    let mime = sniff_mime(path)?;
    if let Some(kind) = ContainerKind::from_mime(&mime) {
        match extract(path, kind) {
            Ok(extracted) => {
                record.archive_filenames = extracted.archive_filenames;
                record.audio_artist = extracted.audio.artist;
                record.audio_album = extracted.audio.album;
                record.audio_title = extracted.audio.title;
            }
            Err(e) => warn!("Failed to read {:?} metadata from {}: {}", kind, path.display(), e),
        }
    }
    record.mime_type = mime;

    Ok(record)
}

/// MIME type from the file's header bytes
fn sniff_mime(path: &Path) -> Result<String, CrawlError> {
    let detected = infer::get_from_path(path).map_err(|source| CrawlError::Sniff {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(match detected {
        Some(kind) => kind.mime_type().to_string(),
        None => {
            debug!("No signature match for {}", path.display());
            FALLBACK_MIME.to_string()
        }
    })
}
