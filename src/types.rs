//! Core data types for filetundra

use std::path::Path;
use std::time::{SystemTime, UNIX_EPOCH};

use serde::{Deserialize, Serialize};

/// MIME type recorded for every directory entry
pub const DIRECTORY_MIME: &str = "inode/directory";

/// MIME type used when sniffing yields nothing for a regular file
pub const FALLBACK_MIME: &str = "application/octet-stream";

/// Stored field names in the persistent index
pub mod fields {
    pub const ID: &str = "_id";
    pub const BARE_BASENAME: &str = "basename";
    pub const EXTNAME: &str = "extname";
    pub const DIRNAME: &str = "dirname";
    pub const MIME_TYPE: &str = "mimetype";
    pub const ARCHIVE_FILENAME: &str = "archive.filename";
    pub const AUDIO_ARTIST: &str = "audio.artist";
    pub const AUDIO_ALBUM: &str = "audio.album";
    pub const AUDIO_TITLE: &str = "audio.title";
    pub const SIZE: &str = "size";
    pub const MODIFIED_TIME: &str = "modtime";
}

/// One indexed filesystem entry, keyed by its absolute path
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileRecord {
    /// Absolute path; primary key
    pub id: String,
    /// Byte count at build time
    pub size: u64,
    /// Modification time, seconds since the Unix epoch
    pub modified_time: i64,
    /// File name with the extension stripped
    pub bare_basename: String,
    /// Extension including the leading dot
    pub extname: Option<String>,
    /// Absolute parent directory
    pub dirname: String,
    pub mime_type: String,
    /// Member names of a recognized archive, in archive order
    #[serde(default)]
    pub archive_filenames: Vec<String>,
    pub audio_artist: Option<String>,
    pub audio_album: Option<String>,
    pub audio_title: Option<String>,
}

impl FileRecord {
    /// File name as it appears on disk
    pub fn display_name(&self) -> String {
        match &self.extname {
            Some(ext) => format!("{}{}", self.bare_basename, ext),
            None => self.bare_basename.clone(),
        }
    }

    pub fn is_directory(&self) -> bool {
        self.mime_type == DIRECTORY_MIME
    }
}

/// Split a file name into its bare name and extension.
///
/// The extension starts at the final `.` of the name, so `archive.tar.gz`
/// yields `("archive.tar", Some(".gz"))` and a dotfile such as `.profile`
/// is all extension.
pub fn split_basename(name: &str) -> (String, Option<String>) {
    match name.rfind('.') {
        Some(pos) => (name[..pos].to_string(), Some(name[pos..].to_string())),
        None => (name.to_string(), None),
    }
}

/// Convert a path to the string form used as a record id
pub fn path_to_id(path: &Path) -> String {
    path.to_string_lossy().into_owned()
}

/// Whole seconds between the Unix epoch and `time`; negative before 1970
pub fn unix_seconds(time: SystemTime) -> i64 {
    match time.duration_since(UNIX_EPOCH) {
        Ok(d) => d.as_secs() as i64,
        Err(e) => -(e.duration().as_secs() as i64),
    }
}
