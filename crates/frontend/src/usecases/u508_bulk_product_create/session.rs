//! The editing session: one row store plus the persistence that mirrors it.
//!
//! Every user command and every engine transition goes through here so the
//! snapshot rules live in one place: field edits are debounced, structural
//! changes and upload results are written at once.

use contracts::usecases::u508_bulk_product_create::{validate, FieldKey, ProductFields};
use rand::Rng;
use std::cell::RefCell;
use std::rc::Rc;

use super::config::BulkEditorConfig;
use super::persistence::{DebounceTimer, DraftPersistence, DraftStorage};
use super::row::{Attachment, DraftRow, RowId};
use super::store::{BulkStats, Removal, RowStore, StoreError};

type Listener = Rc<dyn Fn(&[DraftRow])>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Flush {
    Skip,
    Debounced,
    Immediate,
}

struct SessionState<S, T: DebounceTimer> {
    store: RowStore,
    persistence: DraftPersistence<S, T>,
    running: bool,
}

/// How the engine's request to start a row was answered.
#[derive(Debug)]
pub(crate) enum AttemptStart {
    /// Row was deleted or is no longer draft/failed
    Skipped,
    /// Failed local validation; the row is now `failed`
    Rejected(String),
    Ready {
        fields: ProductFields,
        attachment: Option<Attachment>,
    },
}

/// Final word on one attempt, already reduced to done / failed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum AttemptResult {
    Created { warning: Option<String> },
    Failed(String),
}

/// Cheap handle; clones share the same session.
pub struct BulkSession<S, T: DebounceTimer> {
    state: Rc<RefCell<SessionState<S, T>>>,
    listener: Rc<RefCell<Option<Listener>>>,
}

impl<S, T: DebounceTimer> Clone for BulkSession<S, T> {
    fn clone(&self) -> Self {
        Self {
            state: self.state.clone(),
            listener: self.listener.clone(),
        }
    }
}

impl<S, T> BulkSession<S, T>
where
    S: DraftStorage + Clone + 'static,
    T: DebounceTimer,
{
    /// Restores the previous snapshot (if any) and starts the session.
    pub fn open(storage: S, timer: T, config: &BulkEditorConfig) -> Self {
        let persistence =
            DraftPersistence::new(storage, timer, config.storage_key.clone(), config.debounce_ms);
        let hydration = persistence.load();
        if !hydration.rows.is_empty() {
            log::info!(
                "Restored {} draft row(s) from {}",
                hydration.rows.len(),
                persistence.key()
            );
        }
        let store = RowStore::from_rows(hydration.rows, config.max_rows);

        Self {
            state: Rc::new(RefCell::new(SessionState {
                store,
                persistence,
                running: false,
            })),
            listener: Rc::new(RefCell::new(None)),
        }
    }

    /// Called with the full row list after every change. Runs with no
    /// borrow held, so it may read the session again.
    pub fn set_listener(&self, listener: impl Fn(&[DraftRow]) + 'static) {
        *self.listener.borrow_mut() = Some(Rc::new(listener));
    }

    pub fn rows(&self) -> Vec<DraftRow> {
        self.state.borrow().store.rows().to_vec()
    }

    pub fn row(&self, id: &RowId) -> Option<DraftRow> {
        self.state.borrow().store.get(id).cloned()
    }

    pub fn stats(&self) -> BulkStats {
        self.state.borrow().store.stats()
    }

    pub fn max_rows(&self) -> usize {
        self.state.borrow().store.max_rows()
    }

    pub fn is_running(&self) -> bool {
        self.state.borrow().running
    }

    pub fn has_pending_write(&self) -> bool {
        self.state.borrow().persistence.has_pending_write()
    }

    pub fn create(&self) -> Result<RowId, StoreError> {
        let id = self.state.borrow_mut().store.create()?;
        self.commit(Flush::Debounced);
        Ok(id)
    }

    /// Returns false when nothing changed (unknown id, locked row or the
    /// same value).
    pub fn update(&self, id: &RowId, key: FieldKey, value: impl Into<String>) -> bool {
        let changed = self.state.borrow_mut().store.update(id, key, value);
        if changed {
            self.commit(Flush::Debounced);
        }
        changed
    }

    /// Attachments are not part of the snapshot, so nothing is written.
    pub fn set_attachment(&self, id: &RowId, attachment: Option<Attachment>) -> bool {
        let changed = self.state.borrow_mut().store.set_attachment(id, attachment);
        if changed {
            self.commit(Flush::Skip);
        }
        changed
    }

    pub fn remove(&self, id: &RowId) -> Removal {
        let removal = self.state.borrow_mut().store.remove(id);
        match removal {
            Removal::NotFound => {}
            Removal::Removed => self.commit(Flush::Debounced),
            // The fresh row must be on disk before the page can go away
            Removal::Replaced => self.commit(Flush::Immediate),
        }
        removal
    }

    pub fn clear_completed(&self) -> usize {
        let removed = self.state.borrow_mut().store.clear_completed();
        if removed > 0 {
            log::info!("Cleared {} completed row(s)", removed);
            self.commit(Flush::Immediate);
        }
        removed
    }

    pub fn clear_all(&self) {
        self.state.borrow_mut().store.clear_all();
        log::info!("All rows cleared");
        self.commit(Flush::Immediate);
    }

    pub fn generate<R: Rng + ?Sized>(&self, count: usize, rng: &mut R) -> usize {
        let generated = self.state.borrow_mut().store.generate(count, rng);
        if generated > 0 {
            log::info!("Generated {} sample row(s)", generated);
            self.commit(Flush::Immediate);
        }
        generated
    }

    pub(crate) fn eligible_ids(&self) -> Vec<RowId> {
        self.state.borrow().store.eligible_ids()
    }

    /// Claims the single run slot. False when a run is already active.
    pub(crate) fn try_begin_run(&self) -> bool {
        let mut state = self.state.borrow_mut();
        if state.running {
            return false;
        }
        state.running = true;
        drop(state);
        self.commit(Flush::Skip);
        true
    }

    /// Releases the run slot. When every row is done the snapshot is
    /// removed; returns whether that happened.
    pub(crate) fn end_run(&self) -> bool {
        let all_done = {
            let mut state = self.state.borrow_mut();
            state.running = false;
            let all_done = state.store.all_done();
            if all_done {
                state.persistence.erase();
            }
            all_done
        };
        self.commit(Flush::Skip);
        all_done
    }

    /// Re-checks the row at dispatch time, validates it and moves it to
    /// `submitting`.
    pub(crate) fn begin_attempt(&self, id: &RowId) -> AttemptStart {
        let start = {
            let mut state = self.state.borrow_mut();
            let Some(row) = state.store.get_mut(id) else {
                return AttemptStart::Skipped;
            };
            if !row.status.is_eligible() {
                return AttemptStart::Skipped;
            }
            match validate(&row.fields) {
                Err(e) => {
                    let message = e.to_string();
                    row.reject(message.clone());
                    AttemptStart::Rejected(message)
                }
                Ok(()) => {
                    row.begin_attempt();
                    AttemptStart::Ready {
                        fields: row.fields.clone(),
                        attachment: row.attachment.clone(),
                    }
                }
            }
        };
        match &start {
            AttemptStart::Rejected(_) => self.commit(Flush::Immediate),
            _ => self.commit(Flush::Skip),
        }
        start
    }

    /// Applies the result and writes the snapshot at once. Results for
    /// rows deleted meanwhile are dropped. Returns false in that case.
    pub(crate) fn finish_attempt(&self, id: &RowId, result: &AttemptResult) -> bool {
        let applied = {
            let mut state = self.state.borrow_mut();
            match state.store.get_mut(id) {
                None => false,
                Some(row) => match result {
                    AttemptResult::Created { .. } => row.mark_done(),
                    AttemptResult::Failed(message) => row.mark_failed(message.clone()),
                },
            }
        };
        if !applied {
            log::warn!("Dropping upload result for row {} that is no longer in flight", id);
            return false;
        }
        self.commit(Flush::Immediate);
        true
    }

    fn commit(&self, flush: Flush) {
        let listener = self.listener.borrow().clone();
        let rows = {
            let mut state = self.state.borrow_mut();
            let SessionState {
                store, persistence, ..
            } = &mut *state;
            match flush {
                Flush::Skip => {}
                Flush::Debounced => persistence.flush(store.rows(), false),
                Flush::Immediate => persistence.flush(store.rows(), true),
            }
            listener.as_ref().map(|_| store.rows().to_vec())
        };
        if let (Some(listener), Some(rows)) = (listener, rows) {
            listener(&rows);
        }
    }
}
