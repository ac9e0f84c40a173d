//! Type-specific metadata extraction
//!
//! Detected MIME types map onto a closed set of container kinds. Each kind
//! routes to exactly one extractor; everything else gets no extra metadata.

mod archive;
mod audio;
#[cfg(test)]
pub(crate) mod fixtures;

pub use archive::list_zip_members;
pub use audio::{read_audio_tags, AudioTags};

use std::path::Path;

use thiserror::Error;

/// Errors raised while reading container metadata.
///
/// These never abort a crawl: callers log them and keep the record.
#[derive(Debug, Error)]
pub enum ExtractError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Archive error: {0}")]
    Archive(#[from] zip::result::ZipError),
    #[error("Audio tag error: {0}")]
    Audio(#[from] lofty::error::LoftyError),
}

/// Containers with a dedicated extractor
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContainerKind {
    Zip,
    Flac,
    Mp3,
    Ogg,
    M4a,
}

impl ContainerKind {
    /// Map a sniffed MIME type onto a supported container
    pub fn from_mime(mime: &str) -> Option<Self> {
        match mime {
            "application/zip" => Some(Self::Zip),
            "audio/x-flac" | "audio/flac" => Some(Self::Flac),
            "audio/mpeg" => Some(Self::Mp3),
            "audio/ogg" => Some(Self::Ogg),
            "audio/m4a" | "audio/mp4" | "audio/x-m4a" => Some(Self::M4a),
            _ => None,
        }
    }
}

/// Metadata pulled out of a container
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Extracted {
    pub archive_filenames: Vec<String>,
    pub audio: AudioTags,
}

/// Run the extractor matching `kind`.
pub fn extract(path: &Path, kind: ContainerKind) -> Result<Extracted, ExtractError> {
    match kind {
        ContainerKind::Zip => Ok(Extracted {
            archive_filenames: list_zip_members(path)?,
            ..Default::default()
        }),
        ContainerKind::Flac | ContainerKind::Mp3 | ContainerKind::Ogg | ContainerKind::M4a => {
            Ok(Extracted {
                audio: read_audio_tags(path, kind)?,
                ..Default::default()
            })
        }
    }
}
