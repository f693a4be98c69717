//! Durable snapshot of the staged rows.
//!
//! The whole collection is written under one key as a JSON array,
//! overwriting the previous snapshot. Attachments are never written.
//! Storage failures are logged and swallowed: the in-memory rows stay
//! authoritative for the session.

use contracts::usecases::u508_bulk_product_create::ProductFields;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use super::row::{DraftRow, RowId, RowStatus};

/// String key-value storage (localStorage in the browser).
pub trait DraftStorage {
    fn get(&self, key: &str) -> Result<Option<String>, String>;
    fn set(&self, key: &str, value: &str) -> Result<(), String>;
    fn remove(&self, key: &str) -> Result<(), String>;
}

/// One-shot timer. Dropping the handle cancels the callback.
pub trait DebounceTimer {
    type Handle;

    fn schedule(&self, delay_ms: u32, callback: Box<dyn FnOnce()>) -> Self::Handle;
}

/// Row as it appears in the snapshot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PersistedRow {
    pub id: RowId,
    pub fields: ProductFields,
    pub status: RowStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_error: Option<String>,
}

impl From<&DraftRow> for PersistedRow {
    /// `submitting` exists only in memory; an in-flight row is written as
    /// the draft it will fall back to if the page dies mid-upload.
    fn from(row: &DraftRow) -> Self {
        let status = match row.status {
            RowStatus::Submitting => RowStatus::Draft,
            other => other,
        };
        Self {
            id: row.id.clone(),
            fields: row.fields.clone(),
            status,
            last_error: row.last_error.clone(),
        }
    }
}

impl PersistedRow {
    /// Applies the recovery rules: an in-flight row comes back as a
    /// draft, stale errors are dropped, the attachment is always gone.
    fn into_row(self) -> (DraftRow, bool) {
        let mut row = DraftRow {
            id: self.id,
            fields: self.fields,
            attachment: None,
            status: self.status,
            last_error: self.last_error,
        };
        let recovered = row.recover();
        if row.status != RowStatus::Failed {
            row.last_error = None;
        }
        (row, recovered)
    }
}

pub fn encode_snapshot(rows: &[DraftRow]) -> Result<String, String> {
    let persisted: Vec<PersistedRow> = rows.iter().map(PersistedRow::from).collect();
    serde_json::to_string(&persisted).map_err(|e| e.to_string())
}

/// Result of reading the snapshot at startup.
#[derive(Debug, Default)]
pub struct Hydration {
    /// Empty when there was nothing usable
    pub rows: Vec<DraftRow>,
    /// Rows moved from `submitting` back to `draft`
    pub recovered: usize,
    /// Entries that could not be decoded or repeated an id
    pub dropped: usize,
}

/// Decodes a snapshot row by row. Returns `None` when the text is not a
/// JSON array at all.
pub fn decode_snapshot(raw: &str) -> Option<Hydration> {
    let entries: Vec<serde_json::Value> = serde_json::from_str(raw).ok()?;
    let mut hydration = Hydration::default();
    let mut seen = HashSet::new();

    for entry in entries {
        let persisted = match serde_json::from_value::<PersistedRow>(entry) {
            Ok(persisted) => persisted,
            Err(e) => {
                log::warn!("Dropping undecodable draft row: {}", e);
                hydration.dropped += 1;
                continue;
            }
        };
        if !seen.insert(persisted.id.clone()) {
            log::warn!("Dropping duplicate draft row {}", persisted.id);
            hydration.dropped += 1;
            continue;
        }
        let (row, recovered) = persisted.into_row();
        if recovered {
            hydration.recovered += 1;
        }
        hydration.rows.push(row);
    }

    Some(hydration)
}

fn write_snapshot<S: DraftStorage>(storage: &S, key: &str, payload: &str) {
    match storage.set(key, payload) {
        Ok(()) => log::debug!("Draft snapshot saved ({} bytes)", payload.len()),
        Err(e) => log::warn!("Failed to save draft snapshot: {}", e),
    }
}

/// Debounced / forced writer over a [`DraftStorage`].
pub struct DraftPersistence<S, T: DebounceTimer> {
    storage: S,
    timer: T,
    key: String,
    debounce_ms: u32,
    pending: Option<T::Handle>,
}

impl<S, T> DraftPersistence<S, T>
where
    S: DraftStorage + Clone + 'static,
    T: DebounceTimer,
{
    pub fn new(storage: S, timer: T, key: impl Into<String>, debounce_ms: u32) -> Self {
        Self {
            storage,
            timer,
            key: key.into(),
            debounce_ms,
            pending: None,
        }
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    /// Startup read. Missing, unreadable or unparsable snapshots give an
    /// empty hydration.
    pub fn load(&self) -> Hydration {
        let raw = match self.storage.get(&self.key) {
            Ok(Some(raw)) => raw,
            Ok(None) => return Hydration::default(),
            Err(e) => {
                log::warn!("Failed to read draft snapshot: {}", e);
                return Hydration::default();
            }
        };
        match decode_snapshot(&raw) {
            Some(hydration) => {
                if hydration.recovered > 0 {
                    log::info!(
                        "Recovered {} interrupted upload(s) as drafts",
                        hydration.recovered
                    );
                }
                hydration
            }
            None => {
                log::warn!("Draft snapshot is not valid JSON, starting fresh");
                Hydration::default()
            }
        }
    }

    /// Writes the rows. `immediate` writes synchronously; otherwise the
    /// write happens once no further flush arrives for the debounce
    /// window. Either way any earlier pending write is discarded.
    pub fn flush(&mut self, rows: &[DraftRow], immediate: bool) {
        self.pending = None;
        let payload = match encode_snapshot(rows) {
            Ok(payload) => payload,
            Err(e) => {
                log::warn!("Failed to encode draft snapshot: {}", e);
                return;
            }
        };

        if immediate {
            write_snapshot(&self.storage, &self.key, &payload);
            return;
        }

        let storage = self.storage.clone();
        let key = self.key.clone();
        let handle = self.timer.schedule(
            self.debounce_ms,
            Box::new(move || write_snapshot(&storage, &key, &payload)),
        );
        self.pending = Some(handle);
    }

    /// Removes the snapshot. A pending debounced write is discarded first
    /// so it cannot bring the snapshot back.
    pub fn erase(&mut self) {
        self.pending = None;
        match self.storage.remove(&self.key) {
            Ok(()) => log::info!("Draft snapshot cleared"),
            Err(e) => log::warn!("Failed to clear draft snapshot: {}", e),
        }
    }

    pub fn has_pending_write(&self) -> bool {
        self.pending.is_some()
    }
}
