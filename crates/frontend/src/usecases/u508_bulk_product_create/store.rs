use contracts::usecases::u508_bulk_product_create::FieldKey;
use rand::Rng;
use thiserror::Error;

use super::generator;
use super::row::{Attachment, DraftRow, RowId, RowStatus};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    #[error("Limit reached: max {max} products at a time.")]
    RowLimitReached { max: usize },
}

/// What `remove` did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Removal {
    NotFound,
    Removed,
    /// The last row was removed and a fresh empty row took its place
    Replaced,
}

/// Aggregate counters shown above the table.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BulkStats {
    pub total: usize,
    pub draft: usize,
    pub submitting: usize,
    pub done: usize,
    pub failed: usize,
    /// Rows with a title but no image; images do not survive a reload
    pub missing_images: usize,
}

impl BulkStats {
    pub fn from_rows(rows: &[DraftRow]) -> Self {
        let mut stats = BulkStats {
            total: rows.len(),
            ..Default::default()
        };
        for row in rows {
            match row.status {
                RowStatus::Draft => stats.draft += 1,
                RowStatus::Submitting => stats.submitting += 1,
                RowStatus::Done => stats.done += 1,
                RowStatus::Failed => stats.failed += 1,
            }
            if row.attachment.is_none() && !row.fields.title.trim().is_empty() {
                stats.missing_images += 1;
            }
        }
        stats
    }

    pub fn progress_percent(&self) -> u32 {
        if self.total == 0 {
            return 0;
        }
        ((self.done * 100) / self.total) as u32
    }

    /// Rows a new run would pick up
    pub fn pending(&self) -> usize {
        self.draft + self.failed
    }
}

/// Ordered in-memory collection of draft rows.
///
/// Never empty: every path that would leave no rows puts one fresh
/// empty row in place.
#[derive(Debug, Clone)]
pub struct RowStore {
    rows: Vec<DraftRow>,
    max_rows: usize,
}

impl RowStore {
    pub fn new(max_rows: usize) -> Self {
        Self::from_rows(Vec::new(), max_rows)
    }

    /// Rows are taken as-is; an empty list becomes one fresh row.
    pub fn from_rows(rows: Vec<DraftRow>, max_rows: usize) -> Self {
        let mut store = Self {
            rows,
            max_rows: max_rows.max(1),
        };
        store.ensure_not_empty();
        store
    }

    pub fn rows(&self) -> &[DraftRow] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn max_rows(&self) -> usize {
        self.max_rows
    }

    pub fn get(&self, id: &RowId) -> Option<&DraftRow> {
        self.rows.iter().find(|row| &row.id == id)
    }

    pub(crate) fn get_mut(&mut self, id: &RowId) -> Option<&mut DraftRow> {
        self.rows.iter_mut().find(|row| &row.id == id)
    }

    pub fn position(&self, id: &RowId) -> Option<usize> {
        self.rows.iter().position(|row| &row.id == id)
    }

    /// Appends an empty draft.
    pub fn create(&mut self) -> Result<RowId, StoreError> {
        if self.rows.len() >= self.max_rows {
            return Err(StoreError::RowLimitReached { max: self.max_rows });
        }
        let row = DraftRow::empty();
        let id = row.id.clone();
        self.rows.push(row);
        Ok(id)
    }

    /// Writes one field of an editable row, clearing declared dependents.
    /// Unknown ids and rows that are uploading or done are left alone.
    pub fn update(&mut self, id: &RowId, key: FieldKey, value: impl Into<String>) -> bool {
        match self.get_mut(id) {
            Some(row) if row.status.is_editable() => row.fields.set(key, value),
            _ => false,
        }
    }

    pub fn set_attachment(&mut self, id: &RowId, attachment: Option<Attachment>) -> bool {
        match self.get_mut(id) {
            Some(row) if row.status.is_editable() => {
                row.attachment = attachment;
                true
            }
            _ => false,
        }
    }

    pub fn remove(&mut self, id: &RowId) -> Removal {
        let Some(index) = self.position(id) else {
            return Removal::NotFound;
        };
        self.rows.remove(index);
        if self.ensure_not_empty() {
            Removal::Replaced
        } else {
            Removal::Removed
        }
    }

    /// Drops every `done` row. Returns how many were removed.
    pub fn clear_completed(&mut self) -> usize {
        let before = self.rows.len();
        self.rows.retain(|row| row.status != RowStatus::Done);
        let removed = before - self.rows.len();
        self.ensure_not_empty();
        removed
    }

    /// Replaces everything with a single empty row.
    pub fn clear_all(&mut self) {
        self.rows.clear();
        self.ensure_not_empty();
    }

    /// Adds up to `count` generated drafts. A store holding exactly one
    /// blank row has that row replaced instead of appended after.
    /// Returns how many rows were generated.
    pub fn generate<R: Rng + ?Sized>(&mut self, count: usize, rng: &mut R) -> usize {
        if count == 0 {
            return 0;
        }
        let replace_blank = self.rows.len() == 1 && self.rows[0].is_blank();
        let kept = if replace_blank { 0 } else { self.rows.len() };
        let count = count.min(self.max_rows.saturating_sub(kept));
        if count == 0 {
            return 0;
        }
        if replace_blank {
            self.rows.clear();
        }
        self.rows
            .extend((0..count).map(|_| DraftRow::with_fields(generator::sample_fields(rng))));
        count
    }

    /// Ids of rows a run may pick, in table order.
    pub fn eligible_ids(&self) -> Vec<RowId> {
        self.rows
            .iter()
            .filter(|row| row.status.is_eligible())
            .map(|row| row.id.clone())
            .collect()
    }

    pub fn all_done(&self) -> bool {
        !self.rows.is_empty() && self.rows.iter().all(|row| row.status == RowStatus::Done)
    }

    pub fn stats(&self) -> BulkStats {
        BulkStats::from_rows(&self.rows)
    }

    /// Returns true when a fresh row had to be synthesized.
    fn ensure_not_empty(&mut self) -> bool {
        if self.rows.is_empty() {
            self.rows.push(DraftRow::empty());
            true
        } else {
            false
        }
    }
}
