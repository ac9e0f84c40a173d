//! Query composition and match iteration

use tantivy::collector::DocSetCollector;
use tantivy::query::{BooleanQuery, FuzzyTermQuery, Occur, Query, TermQuery};
use tantivy::schema::IndexRecordOption;
use tantivy::{DocAddress, Index, Searcher, TantivyDocument, Term};

use crate::types::FileRecord;

use super::mapper::document_to_record;
use super::{FileFields, IndexError};

/// Edit distance for fuzzy matches
const FUZZY_DISTANCE: u8 = 1;

/// Exact match on the record id
pub fn id_query(fields: &FileFields, id: &str) -> TermQuery {
    TermQuery::new(
        Term::from_field_text(fields.id, id),
        IndexRecordOption::Basic,
    )
}

/// Exact match on the parent directory
pub fn dirname_query(fields: &FileFields, dirname: &str) -> TermQuery {
    TermQuery::new(
        Term::from_field_text(fields.dirname, dirname),
        IndexRecordOption::Basic,
    )
}

/// Multi-field free-text query.
///
/// Logical OR of an analyzed match on the basename plus fuzzy matches on the
/// basename, the directory and the archive member names. Blank input yields a
/// query with no clauses, which matches nothing.
pub fn search_query(
    index: &Index,
    fields: &FileFields,
    text: &str,
) -> Result<Box<dyn Query>, IndexError> {
    let text = text.trim();
    let mut clauses: Vec<(Occur, Box<dyn Query>)> = Vec::new();
    if text.is_empty() {
        return Ok(Box::new(BooleanQuery::new(clauses)));
    }

    let mut analyzer = index
        .tokenizer_for_field(fields.bare_basename)
        .map_err(IndexError::Query)?;
    let mut stream = analyzer.token_stream(text);
    stream.process(&mut |token| {
        let term = Term::from_field_text(fields.bare_basename, &token.text);
        clauses.push((
            Occur::Should,
            Box::new(TermQuery::new(term, IndexRecordOption::Basic)),
        ));
    });

    // Analyzed fields hold lowercase terms; the keyword dirname holds the raw path
    let lowered = text.to_lowercase();
    for (field, value) in [
        (fields.bare_basename, lowered.as_str()),
        (fields.dirname, text),
        (fields.archive_filename, lowered.as_str()),
    ] {
        clauses.push((
            Occur::Should,
            Box::new(FuzzyTermQuery::new(
                Term::from_field_text(field, value),
                FUZZY_DISTANCE,
                true,
            )),
        ));
    }

    Ok(Box::new(BooleanQuery::new(clauses)))
}

/// Unordered matches of one executed query.
///
/// Yields records one at a time; each stored document is fetched lazily.
pub struct Matches<'a> {
    searcher: &'a Searcher,
    fields: &'a FileFields,
    addresses: std::vec::IntoIter<DocAddress>,
}

impl<'a> Matches<'a> {
    pub(super) fn collect(
        searcher: &'a Searcher,
        fields: &'a FileFields,
        query: &dyn Query,
    ) -> Result<Self, IndexError> {
        let addresses: Vec<DocAddress> = searcher
            .search(query, &DocSetCollector)
            .map_err(IndexError::Query)?
            .into_iter()
            .collect();
        Ok(Self {
            searcher,
            fields,
            addresses: addresses.into_iter(),
        })
    }
}

impl Iterator for Matches<'_> {
    type Item = Result<FileRecord, IndexError>;

    fn next(&mut self) -> Option<Self::Item> {
        let address = self.addresses.next()?;
        Some(
            self.searcher
                .doc::<TantivyDocument>(address)
                .map(|doc| document_to_record(self.fields, &doc))
                .map_err(IndexError::Document),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::super::{Batch, FileIndex};
    use crate::types::FileRecord;

    fn record(dirname: &str, name: &str, members: &[&str]) -> FileRecord {
        let (bare_basename, extname) = crate::types::split_basename(name);
        FileRecord {
            id: format!("{}/{}", dirname, name),
            bare_basename,
            extname,
            dirname: dirname.to_string(),
            mime_type: crate::types::FALLBACK_MIME.to_string(),
            archive_filenames: members.iter().map(|m| m.to_string()).collect(),
            ..Default::default()
        }
    }

    fn index_with(records: Vec<FileRecord>) -> FileIndex {
        let index = FileIndex::in_memory().unwrap();
        let mut batch = Batch::new();
        for r in records {
            batch.insert(r);
        }
        index.commit(batch).unwrap();
        index
    }

    fn search(index: &FileIndex, text: &str) -> Vec<String> {
        let snapshot = index.snapshot();
        let mut ids: Vec<String> = snapshot
            .search(text)
            .unwrap()
            .map(|r| r.unwrap().id)
            .collect();
        ids.sort();
        ids
    }

    #[test]
    fn test_blank_query_matches_nothing() {
        let index = index_with(vec![record("/srv", "notes.txt", &[])]);
        assert!(search(&index, "").is_empty());
        assert!(search(&index, "   ").is_empty());
    }

    #[test]
    fn test_fuzzy_basename_is_case_insensitive() {
        let index = index_with(vec![record("/srv", "Ledger.pdf", &[])]);
        assert_eq!(search(&index, "LEDGER"), vec!["/srv/Ledger.pdf"]);
        assert_eq!(search(&index, "ledgr"), vec!["/srv/Ledger.pdf"]);
    }

    #[test]
    fn test_archive_member_match() {
        let index = index_with(vec![
            record("/srv", "bundle.zip", &["readme.md"]),
            record("/srv", "other.zip", &["license"]),
        ]);
        assert_eq!(search(&index, "readme"), vec!["/srv/bundle.zip"]);
    }

    #[test]
    fn test_dirname_lookup_is_exact() {
        let index = index_with(vec![
            record("/srv/a", "one.txt", &[]),
            record("/srv/ab", "two.txt", &[]),
        ]);
        let snapshot = index.snapshot();
        let ids: Vec<String> = snapshot
            .lookup_by_dirname("/srv/a")
            .unwrap()
            .map(|r| r.unwrap().id)
            .collect();
        assert_eq!(ids, vec!["/srv/a/one.txt"]);
    }
}
