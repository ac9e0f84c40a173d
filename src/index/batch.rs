//! Batched insert/update operations committed as one transaction

use std::collections::HashMap;

use tantivy::{Index, IndexWriter, Term};
use tracing::{debug, warn};

use crate::types::FileRecord;

use super::mapper::record_to_document;
use super::{FileFields, IndexError};

/// A single pending write, keyed by the record id
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BatchOp {
    Insert(FileRecord),
    Update(FileRecord),
}

impl BatchOp {
    pub fn record(&self) -> &FileRecord {
        match self {
            Self::Insert(record) | Self::Update(record) => record,
        }
    }
}

/// Outcome of a committed batch
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CommitStats {
    pub inserted: usize,
    pub updated: usize,
}

/// Operations accumulated over one crawl pass.
///
/// Holds at most one operation per id; a later operation for the same id
/// replaces the earlier one in place.
#[derive(Debug, Default)]
pub struct Batch {
    ops: Vec<BatchOp>,
    positions: HashMap<String, usize>,
}

impl Batch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, record: FileRecord) {
        self.push(BatchOp::Insert(record));
    }

    pub fn update(&mut self, record: FileRecord) {
        self.push(BatchOp::Update(record));
    }

    fn push(&mut self, op: BatchOp) {
        let id = op.record().id.clone();
        match self.positions.get(&id) {
            Some(&pos) => {
                warn!("Duplicate batch operation for {}, keeping the latest", id);
                self.ops[pos] = op;
            }
            None => {
                self.positions.insert(id, self.ops.len());
                self.ops.push(op);
            }
        }
    }

    pub fn len(&self) -> usize {
        self.ops.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ops.is_empty()
    }

    pub fn ops(&self) -> &[BatchOp] {
        &self.ops
    }

    /// Stage every operation on a fresh writer and commit.
    ///
    /// The writer lives only inside this call. If staging or the commit fails
    /// the staged operations are discarded.
    pub(super) fn apply(
        self,
        index: &Index,
        fields: &FileFields,
        writer_heap_bytes: usize,
    ) -> Result<CommitStats, IndexError> {
        if self.is_empty() {
            debug!("Empty batch, nothing to commit");
            return Ok(CommitStats::default());
        }

        let mut writer: IndexWriter = index.writer(writer_heap_bytes).map_err(IndexError::Write)?;

        let stats = match self.stage(&mut writer, fields) {
            Ok(stats) => stats,
            Err(e) => {
                if let Err(rollback_err) = writer.rollback() {
                    warn!("Rollback after failed batch also failed: {}", rollback_err);
                }
                return Err(e);
            }
        };

        writer.commit().map_err(IndexError::Write)?;
        Ok(stats)
    }

    fn stage(&self, writer: &mut IndexWriter, fields: &FileFields) -> Result<CommitStats, IndexError> {
        let mut stats = CommitStats::default();
        for op in &self.ops {
            let record = op.record();
            if let BatchOp::Update(_) = op {
                writer.delete_term(Term::from_field_text(fields.id, &record.id));
                stats.updated += 1;
            } else {
                stats.inserted += 1;
            }
            writer
                .add_document(record_to_document(fields, record))
                .map_err(IndexError::Write)?;
        }
        Ok(stats)
    }
}
