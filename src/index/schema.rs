//! Index schema and the filename analyzer

use tantivy::schema::{
    Field, IndexRecordOption, Schema, TextFieldIndexing, TextOptions, STORED, STRING, TEXT,
};
use tantivy::tokenizer::{
    Language, LowerCaser, RemoveLongFilter, SimpleTokenizer, Stemmer, StopWordFilter, TextAnalyzer,
};
use tantivy::Index;

use crate::types::fields;

use super::IndexError;

/// Name under which the filename analyzer is registered
pub const FILENAME_TOKENIZER: &str = "filename";

/// Handles to every field of the file schema
#[derive(Debug, Clone, Copy)]
pub struct FileFields {
    pub id: Field,
    pub bare_basename: Field,
    pub extname: Field,
    pub dirname: Field,
    pub mime_type: Field,
    pub archive_filename: Field,
    pub audio_artist: Field,
    pub audio_album: Field,
    pub audio_title: Field,
    pub size: Field,
    pub modified_time: Field,
}

impl FileFields {
    /// Resolve field handles against an opened index schema
    pub fn from_schema(schema: &Schema) -> Result<Self, IndexError> {
        let get = |name: &str| {
            schema
                .get_field(name)
                .map_err(|_| IndexError::Schema(format!("missing field '{}'", name)))
        };
        Ok(Self {
            id: get(fields::ID)?,
            bare_basename: get(fields::BARE_BASENAME)?,
            extname: get(fields::EXTNAME)?,
            dirname: get(fields::DIRNAME)?,
            mime_type: get(fields::MIME_TYPE)?,
            archive_filename: get(fields::ARCHIVE_FILENAME)?,
            audio_artist: get(fields::AUDIO_ARTIST)?,
            audio_album: get(fields::AUDIO_ALBUM)?,
            audio_title: get(fields::AUDIO_TITLE)?,
            size: get(fields::SIZE)?,
            modified_time: get(fields::MODIFIED_TIME)?,
        })
    }
}

pub fn build_schema() -> Schema {
    let mut builder = Schema::builder();

    let filename_text = TextOptions::default()
        .set_indexing_options(
            TextFieldIndexing::default()
                .set_tokenizer(FILENAME_TOKENIZER)
                .set_index_option(IndexRecordOption::WithFreqsAndPositions),
        )
        .set_stored();

    builder.add_text_field(fields::ID, STRING | STORED);
    builder.add_text_field(fields::BARE_BASENAME, filename_text);
    builder.add_text_field(fields::EXTNAME, STRING | STORED);
    builder.add_text_field(fields::DIRNAME, STRING | STORED);
    builder.add_text_field(fields::MIME_TYPE, STRING | STORED);
    builder.add_text_field(fields::ARCHIVE_FILENAME, TEXT | STORED);
    builder.add_text_field(fields::AUDIO_ARTIST, TEXT | STORED);
    builder.add_text_field(fields::AUDIO_ALBUM, TEXT | STORED);
    builder.add_text_field(fields::AUDIO_TITLE, TEXT | STORED);
    builder.add_bytes_field(fields::SIZE, STORED);
    builder.add_bytes_field(fields::MODIFIED_TIME, STORED);

    builder.build()
}

/// English analyzer over alphanumeric runs
pub fn filename_analyzer() -> Result<TextAnalyzer, IndexError> {
    let stop_words = StopWordFilter::new(Language::English)
        .ok_or_else(|| IndexError::Schema("no English stop word list".to_string()))?;

    Ok(TextAnalyzer::builder(SimpleTokenizer::default())
        .filter(RemoveLongFilter::limit(40))
        .filter(LowerCaser)
        .filter(stop_words)
        .filter(Stemmer::new(Language::English))
        .build())
}

/// Tokenizers are not persisted with the index; register on every open.
pub fn register_analyzers(index: &Index) -> Result<(), IndexError> {
    index
        .tokenizers()
        .register(FILENAME_TOKENIZER, filename_analyzer()?);
    Ok(())
}
