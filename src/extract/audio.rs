//! Audio tag extraction

use std::borrow::Cow;
use std::fs::File;
use std::io::Cursor;
use std::path::Path;

use lofty::config::ParseOptions;
use lofty::file::AudioFile;
use lofty::flac::FlacFile;
use lofty::mp4::Mp4File;
use lofty::mpeg::MpegFile;
use lofty::ogg::VorbisFile;
use lofty::tag::Accessor;
use tracing::debug;

use super::{ContainerKind, ExtractError};

/// Artist, album and title tags; empty values are dropped
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AudioTags {
    pub artist: Option<String>,
    pub album: Option<String>,
    pub title: Option<String>,
}

impl AudioTags {
    fn from_accessor<T: Accessor + ?Sized>(tag: &T) -> Self {
        Self {
            artist: non_empty(tag.artist()),
            album: non_empty(tag.album()),
            title: non_empty(tag.title()),
        }
    }
}

fn non_empty(value: Option<Cow<'_, str>>) -> Option<String> {
    value.map(Cow::into_owned).filter(|s| !s.is_empty())
}

/// Only tags are needed, never stream properties
fn parse_options() -> ParseOptions {
    ParseOptions::new().read_properties(false)
}

/// Read tags with the reader for `kind`.
///
/// MP3 prefers the ID3v2 tag and falls back to ID3v1. Non-audio kinds yield
/// no tags.
pub fn read_audio_tags(path: &Path, kind: ContainerKind) -> Result<AudioTags, ExtractError> {
    let mut file = File::open(path)?;

    let tags = match kind {
        ContainerKind::Flac => FlacFile::read_from(&mut file, parse_options())?
            .vorbis_comments()
            .map(AudioTags::from_accessor)
            .unwrap_or_default(),
        ContainerKind::Mp3 => read_mpeg_tags(path, &mut file)?,
        ContainerKind::Ogg => AudioTags::from_accessor(
            VorbisFile::read_from(&mut file, parse_options())?.vorbis_comments(),
        ),
        ContainerKind::M4a => Mp4File::read_from(&mut file, parse_options())?
            .ilst()
            .map(AudioTags::from_accessor)
            .unwrap_or_default(),
        ContainerKind::Zip => AudioTags::default(),
    };
    Ok(tags)
}

/// ID3v2 when present and readable, ID3v1 otherwise.
///
/// An unreadable ID3v2 tag fails the whole MPEG parse, so the file is parsed
/// again without its leading tag and only the ID3v1 trailer is used. The
/// original error is returned when that yields no ID3v1 tag either.
fn read_mpeg_tags(path: &Path, file: &mut File) -> Result<AudioTags, ExtractError> {
    let err = match MpegFile::read_from(file, parse_options()) {
        Ok(mpeg) => {
            return Ok(match (mpeg.id3v2(), mpeg.id3v1()) {
                (Some(v2), _) => AudioTags::from_accessor(v2),
                (None, Some(v1)) => AudioTags::from_accessor(v1),
                (None, None) => AudioTags::default(),
            });
        }
        Err(e) => e,
    };

    let bytes = std::fs::read(path)?;
    let Some(rest) = skip_id3v2(&bytes) else {
        return Err(err.into());
    };
    match MpegFile::read_from(&mut Cursor::new(rest), parse_options()) {
        Ok(mpeg) => match mpeg.id3v1() {
            Some(v1) => {
                debug!("Unreadable ID3v2 tag in {}, using ID3v1: {}", path.display(), err);
                Ok(AudioTags::from_accessor(v1))
            }
            None => Err(err.into()),
        },
        Err(_) => Err(err.into()),
    }
}

const ID3V2_HEADER_LEN: usize = 10;

/// The bytes following a leading ID3v2 tag, using only its header.
///
/// `None` when there is no ID3v2 header or its size field is not syncsafe.
fn skip_id3v2(bytes: &[u8]) -> Option<&[u8]> {
    if bytes.len() < ID3V2_HEADER_LEN || &bytes[..3] != b"ID3" {
        return None;
    }
    let size = bytes[6..ID3V2_HEADER_LEN]
        .iter()
        .try_fold(0usize, |acc, &b| (b < 0x80).then_some((acc << 7) | b as usize))?;
    let footer = if bytes[5] & 0x10 != 0 {
        ID3V2_HEADER_LEN
    } else {
        0
    };
    bytes.get(ID3V2_HEADER_LEN + size + footer..)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extract::fixtures;

    #[test]
    fn test_non_empty_drops_blank_values() {
        assert_eq!(non_empty(Some(Cow::Borrowed(""))), None);
        assert_eq!(non_empty(Some(Cow::Borrowed("Band"))), Some("Band".to_string()));
        assert_eq!(non_empty(None), None);
    }

    #[test]
    fn test_garbage_flac_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("fake.flac");
        std::fs::write(&path, b"fLaC\x00\x00\x00\x01garbage").unwrap();

        assert!(read_audio_tags(&path, ContainerKind::Flac).is_err());
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let result = read_audio_tags(&dir.path().join("absent.mp3"), ContainerKind::Mp3);
        assert!(matches!(result, Err(ExtractError::Io(_))));
    }

    fn write(dir: &tempfile::TempDir, name: &str, parts: &[Vec<u8>]) -> std::path::PathBuf {
        let path = dir.path().join(name);
        std::fs::write(&path, parts.concat()).unwrap();
        path
    }

    // ============ MP3 TESTS ============

    #[test]
    fn test_mp3_id3v2_tags() {
        let dir = tempfile::tempdir().unwrap();
        let path = write(
            &dir,
            "song.mp3",
            &[
                fixtures::id3v2(&[("TPE1", "The Band"), ("TALB", "Live"), ("TIT2", "Opener")]),
                fixtures::mpeg_frames(8),
            ],
        );

        let tags = read_audio_tags(&path, ContainerKind::Mp3).unwrap();
        assert_eq!(tags.artist.as_deref(), Some("The Band"));
        assert_eq!(tags.album.as_deref(), Some("Live"));
        assert_eq!(tags.title.as_deref(), Some("Opener"));
    }

    #[test]
    fn test_mp3_prefers_id3v2_over_id3v1() {
        let dir = tempfile::tempdir().unwrap();
        let path = write(
            &dir,
            "both.mp3",
            &[
                fixtures::id3v2(&[("TIT2", "Primary")]),
                fixtures::mpeg_frames(8),
                fixtures::id3v1("Fallback", "", ""),
            ],
        );

        let tags = read_audio_tags(&path, ContainerKind::Mp3).unwrap();
        assert_eq!(tags.title.as_deref(), Some("Primary"));
    }

    #[test]
    fn test_mp3_id3v1_only() {
        let dir = tempfile::tempdir().unwrap();
        let path = write(
            &dir,
            "old.mp3",
            &[fixtures::mpeg_frames(8), fixtures::id3v1("Fallback", "Someone", "")],
        );

        let tags = read_audio_tags(&path, ContainerKind::Mp3).unwrap();
        assert_eq!(tags.title.as_deref(), Some("Fallback"));
        assert_eq!(tags.artist.as_deref(), Some("Someone"));
        assert_eq!(tags.album, None);
    }

    #[test]
    fn test_mp3_unreadable_id3v2_falls_back_to_id3v1() {
        let dir = tempfile::tempdir().unwrap();
        let path = write(
            &dir,
            "broken.mp3",
            &[
                fixtures::unsupported_id3v2(),
                fixtures::mpeg_frames(8),
                fixtures::id3v1("Fallback", "", ""),
            ],
        );

        let tags = read_audio_tags(&path, ContainerKind::Mp3).unwrap();
        assert_eq!(tags.title.as_deref(), Some("Fallback"));
    }

    #[test]
    fn test_mp3_unreadable_id3v2_without_id3v1_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = write(
            &dir,
            "broken.mp3",
            &[fixtures::unsupported_id3v2(), fixtures::mpeg_frames(8)],
        );

        assert!(matches!(
            read_audio_tags(&path, ContainerKind::Mp3),
            Err(ExtractError::Audio(_))
        ));
    }

    #[test]
    fn test_skip_id3v2() {
        let tag = fixtures::unsupported_id3v2();
        let mut bytes = tag.clone();
        bytes.extend_from_slice(b"rest");
        assert_eq!(skip_id3v2(&bytes), Some(&b"rest"[..]));
        assert_eq!(skip_id3v2(b"rest"), None);

        let mut bad_size = tag;
        bad_size[9] = 0x80;
        assert_eq!(skip_id3v2(&bad_size), None);
    }

    // ============ FLAC TESTS ============

    #[test]
    fn test_flac_vorbis_comments_drop_empty_values() {
        let dir = tempfile::tempdir().unwrap();
        let path = write(
            &dir,
            "track.flac",
            &[fixtures::flac(&[("ARTIST", "Quartet"), ("ALBUM", ""), ("TITLE", "Adagio")])],
        );

        let tags = read_audio_tags(&path, ContainerKind::Flac).unwrap();
        assert_eq!(
            tags,
            AudioTags {
                artist: Some("Quartet".to_string()),
                album: None,
                title: Some("Adagio".to_string()),
            }
        );
    }
}
