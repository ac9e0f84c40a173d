//! Conversion between `FileRecord` and stored index documents

use tantivy::schema::Value;
use tantivy::TantivyDocument;

use crate::types::FileRecord;

use super::varint;
use super::FileFields;

/// Build the index document for `record`. Absent optional fields are omitted.
pub fn record_to_document(fields: &FileFields, record: &FileRecord) -> TantivyDocument {
    let mut doc = TantivyDocument::new();
    doc.add_text(fields.id, &record.id);
    doc.add_bytes(fields.size, varint::encode(record.size as i64));
    doc.add_bytes(fields.modified_time, varint::encode(record.modified_time));
    doc.add_text(fields.bare_basename, &record.bare_basename);
    if let Some(ext) = &record.extname {
        doc.add_text(fields.extname, ext);
    }
    doc.add_text(fields.dirname, &record.dirname);
    doc.add_text(fields.mime_type, &record.mime_type);
    for name in &record.archive_filenames {
        doc.add_text(fields.archive_filename, name);
    }
    for (field, value) in [
        (fields.audio_artist, &record.audio_artist),
        (fields.audio_album, &record.audio_album),
        (fields.audio_title, &record.audio_title),
    ] {
        if let Some(value) = value {
            doc.add_text(field, value);
        }
    }
    doc
}

/// Reconstruct a record from the stored values of a matched document.
///
/// Numeric fields whose varint decodes to nothing stay at zero.
pub fn document_to_record(fields: &FileFields, doc: &TantivyDocument) -> FileRecord {
    let text = |field| {
        doc.get_first(field)
            .and_then(|v| v.as_str())
            .map(str::to_string)
    };
    let number = |field| {
        doc.get_first(field)
            .and_then(|v| v.as_bytes())
            .and_then(varint::decode)
            .map(|(value, _)| value)
    };

    FileRecord {
        id: text(fields.id).unwrap_or_default(),
        size: number(fields.size).map(|n| n.max(0) as u64).unwrap_or_default(),
        modified_time: number(fields.modified_time).unwrap_or_default(),
        bare_basename: text(fields.bare_basename).unwrap_or_default(),
        extname: text(fields.extname),
        dirname: text(fields.dirname).unwrap_or_default(),
        mime_type: text(fields.mime_type).unwrap_or_default(),
        archive_filenames: doc
            .get_all(fields.archive_filename)
            .filter_map(|v| v.as_str())
            .map(str::to_string)
            .collect(),
        audio_artist: text(fields.audio_artist),
        audio_album: text(fields.audio_album),
        audio_title: text(fields.audio_title),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::index::build_schema;

    fn fields() -> FileFields {
        FileFields::from_schema(&build_schema()).unwrap()
    }

    #[test]
    fn test_full_record_survives_mapping() {
        let fields = fields();
        let record = FileRecord {
            id: "/music/band/track.flac".to_string(),
            size: 31_337,
            modified_time: 1_650_000_000,
            bare_basename: "track".to_string(),
            extname: Some(".flac".to_string()),
            dirname: "/music/band".to_string(),
            mime_type: "audio/x-flac".to_string(),
            archive_filenames: Vec::new(),
            audio_artist: Some("Band".to_string()),
            audio_album: Some("Album".to_string()),
            audio_title: Some("Track".to_string()),
        };

        let doc = record_to_document(&fields, &record);
        assert_eq!(document_to_record(&fields, &doc), record);
    }

    #[test]
    fn test_archive_members_keep_order() {
        let fields = fields();
        let record = FileRecord {
            id: "/a.zip".to_string(),
            archive_filenames: vec!["z".to_string(), "a".to_string(), "m".to_string()],
            ..Default::default()
        };
        let doc = record_to_document(&fields, &record);
        assert_eq!(document_to_record(&fields, &doc).archive_filenames, vec!["z", "a", "m"]);
    }

    #[test]
    fn test_empty_numeric_field_maps_to_zero() {
        let fields = fields();
        let mut doc = TantivyDocument::new();
        doc.add_text(fields.id, "/x");
        doc.add_bytes(fields.size, Vec::<u8>::new());
        doc.add_bytes(fields.modified_time, vec![0x80u8]);

        let record = document_to_record(&fields, &doc);
        assert_eq!(record.id, "/x");
        assert_eq!(record.size, 0);
        assert_eq!(record.modified_time, 0);
    }

    #[test]
    fn test_missing_extension_stays_absent() {
        let fields = fields();
        let record = FileRecord {
            id: "/README".to_string(),
            bare_basename: "README".to_string(),
            ..Default::default()
        };
        let doc = record_to_document(&fields, &record);
        assert_eq!(document_to_record(&fields, &doc).extname, None);
    }
}
