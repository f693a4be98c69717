//! Upload queue: pushes every draft/failed row through the create-record
//! service with at most `pool_width` calls in flight.
//!
//! Rows are taken in table order and dispatched in batches; the next batch
//! starts only once every attempt of the previous one has settled. Each
//! settled attempt is written to storage before the run moves on, so a
//! page that dies mid-run loses at most the rows that were in flight.

use contracts::usecases::u508_bulk_product_create::{CreateProductResponse, ProductFields};
use futures::future::join_all;

use super::persistence::{DebounceTimer, DraftStorage};
use super::row::{Attachment, RowId};
use super::session::{AttemptResult, AttemptStart, BulkSession};

pub const UNKNOWN_SERVER_ERROR: &str = "Unknown server error";

/// The create-record service as seen from the browser.
///
/// `Err` means the request never produced a response (network failure,
/// unreadable body); a response with `success: false` is a remote failure.
#[allow(async_fn_in_trait)]
pub trait CreateProductApi {
    async fn create_product(
        &self,
        fields: ProductFields,
        attachment: Option<Attachment>,
    ) -> Result<CreateProductResponse, String>;
}

/// Counters of one finished run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunSummary {
    /// Calls actually sent
    pub attempted: usize,
    pub succeeded: usize,
    pub failed: usize,
    /// Stopped by local validation, never sent
    pub rejected: usize,
    /// Picked at start but gone or changed before their turn
    pub skipped: usize,
    /// Created rows whose follow-up step reported a problem
    pub warnings: Vec<(RowId, String)>,
    /// Every row ended `done` and the snapshot was removed
    pub all_done: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunOutcome {
    /// No draft or failed rows; nothing was touched
    NothingToSubmit,
    /// Another run holds the slot
    AlreadyRunning,
    Finished(RunSummary),
}

enum AttemptOutcome {
    Skipped,
    Rejected,
    Sent(RowId, AttemptResult),
}

/// Reduces a service answer to the row's next state.
pub(crate) fn interpret(result: Result<CreateProductResponse, String>) -> AttemptResult {
    match result {
        Ok(response) if response.success => AttemptResult::Created {
            warning: response.error,
        },
        Ok(response) => AttemptResult::Failed(
            response
                .error
                .filter(|e| !e.trim().is_empty())
                .unwrap_or_else(|| UNKNOWN_SERVER_ERROR.to_string()),
        ),
        Err(e) => AttemptResult::Failed(format!("Network error: {}", e)),
    }
}

pub struct SubmissionEngine<A> {
    api: A,
    pool_width: usize,
}

impl<A: CreateProductApi> SubmissionEngine<A> {
    pub fn new(api: A, pool_width: usize) -> Self {
        Self {
            api,
            pool_width: pool_width.max(1),
        }
    }

    pub fn pool_width(&self) -> usize {
        self.pool_width
    }

    pub fn api(&self) -> &A {
        &self.api
    }

    pub async fn run<S, T>(&self, session: &BulkSession<S, T>) -> RunOutcome
    where
        S: DraftStorage + Clone + 'static,
        T: DebounceTimer,
    {
        let eligible = session.eligible_ids();
        if eligible.is_empty() {
            log::debug!("Upload requested with nothing to submit");
            return RunOutcome::NothingToSubmit;
        }
        if !session.try_begin_run() {
            log::warn!("Upload requested while a run is already active");
            return RunOutcome::AlreadyRunning;
        }

        log::info!(
            "Uploading {} row(s), {} at a time",
            eligible.len(),
            self.pool_width
        );
        let mut summary = RunSummary::default();

        for (index, batch) in eligible.chunks(self.pool_width).enumerate() {
            log::debug!("Batch {}: {} row(s)", index + 1, batch.len());
            let outcomes = join_all(batch.iter().map(|id| self.attempt(session, id))).await;
            for outcome in outcomes {
                match outcome {
                    AttemptOutcome::Skipped => summary.skipped += 1,
                    AttemptOutcome::Rejected => summary.rejected += 1,
                    AttemptOutcome::Sent(id, result) => {
                        summary.attempted += 1;
                        match result {
                            AttemptResult::Created { warning } => {
                                summary.succeeded += 1;
                                if let Some(warning) = warning {
                                    summary.warnings.push((id, warning));
                                }
                            }
                            AttemptResult::Failed(_) => summary.failed += 1,
                        }
                    }
                }
            }
        }

        summary.all_done = session.end_run();
        log::info!(
            "Upload finished: {} created, {} failed, {} rejected",
            summary.succeeded,
            summary.failed,
            summary.rejected
        );
        RunOutcome::Finished(summary)
    }

    async fn attempt<S, T>(&self, session: &BulkSession<S, T>, id: &RowId) -> AttemptOutcome
    where
        S: DraftStorage + Clone + 'static,
        T: DebounceTimer,
    {
        let (fields, attachment) = match session.begin_attempt(id) {
            AttemptStart::Skipped => {
                log::debug!("Row {} is no longer eligible, skipping", id);
                return AttemptOutcome::Skipped;
            }
            AttemptStart::Rejected(message) => {
                log::warn!("Row {} rejected: {}", id, message);
                return AttemptOutcome::Rejected;
            }
            AttemptStart::Ready { fields, attachment } => (fields, attachment),
        };

        let result = interpret(self.api.create_product(fields, attachment).await);
        match &result {
            AttemptResult::Created { warning: None } => log::debug!("Row {} created", id),
            AttemptResult::Created {
                warning: Some(warning),
            } => log::warn!("Row {} created with warning: {}", id, warning),
            AttemptResult::Failed(message) => log::warn!("Row {} failed: {}", id, message),
        }
        session.finish_attempt(id, &result);
        AttemptOutcome::Sent(id.clone(), result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::usecases::u508_bulk_product_create::config::BulkEditorConfig;
    use crate::usecases::u508_bulk_product_create::row::RowStatus;
    use crate::usecases::u508_bulk_product_create::testing::{
        ManualTimer, MemoryStorage, ScriptedApi,
    };
    use contracts::usecases::u508_bulk_product_create::FieldKey;
    use futures::executor::block_on;
    use rand::rngs::SmallRng;
    use rand::SeedableRng;
    use std::cell::RefCell;
    use std::rc::Rc;

    type Session = BulkSession<MemoryStorage, ManualTimer>;

    fn key() -> String {
        BulkEditorConfig::default().storage_key
    }

    fn open(storage: &MemoryStorage) -> Session {
        BulkSession::open(storage.clone(), ManualTimer::default(), &BulkEditorConfig::default())
    }

    /// Session holding `titles.len()` valid drafts, snapshot already written.
    fn with_drafts(storage: &MemoryStorage, titles: &[&str]) -> Session {
        let session = open(storage);
        session.generate(titles.len(), &mut SmallRng::seed_from_u64(11));
        for (row, title) in session.rows().iter().zip(titles) {
            session.update(&row.id, FieldKey::Title, *title);
        }
        session
    }

    fn finished(outcome: RunOutcome) -> RunSummary {
        match outcome {
            RunOutcome::Finished(summary) => summary,
            other => panic!("expected a finished run, got {other:?}"),
        }
    }

    #[test]
    fn test_interpret_results() {
        assert_eq!(
            interpret(Ok(CreateProductResponse::created("gid://1"))),
            AttemptResult::Created { warning: None }
        );
        assert_eq!(
            interpret(Ok(CreateProductResponse::failed("rate limited"))),
            AttemptResult::Failed("rate limited".into())
        );
        assert_eq!(
            interpret(Ok(CreateProductResponse::default())),
            AttemptResult::Failed(UNKNOWN_SERVER_ERROR.into())
        );
        assert_eq!(
            interpret(Err("connection reset".into())),
            AttemptResult::Failed("Network error: connection reset".into())
        );
    }

    #[test]
    fn test_all_succeed_erases_snapshot() {
        let storage = MemoryStorage::default();
        let session = with_drafts(&storage, &["A", "B"]);
        let engine = SubmissionEngine::new(ScriptedApi::default(), 3);

        let summary = finished(block_on(engine.run(&session)));
        assert_eq!(summary.succeeded, 2);
        assert!(summary.all_done);
        assert!(session.rows().iter().all(|row| row.status == RowStatus::Done));
        assert_eq!(storage.value(&key()), None);
        assert!(!session.is_running());
    }

    #[test]
    fn test_failing_storage_does_not_stop_the_run() {
        let storage = MemoryStorage::default();
        let session = with_drafts(&storage, &["A", "B", "C", "D"]);
        storage.fail_writes(true);
        let engine = SubmissionEngine::new(ScriptedApi::slow(1), 2);

        let summary = finished(block_on(engine.run(&session)));
        assert_eq!(summary.attempted, 4);
        assert_eq!(summary.succeeded, 4);
        assert!(summary.all_done);
        assert!(session.rows().iter().all(|row| row.status == RowStatus::Done));
        assert!(!session.is_running());
    }

    #[test]
    fn test_uncategorized_row_is_submitted() {
        let storage = MemoryStorage::default();
        let session = with_drafts(&storage, &["Koi"]);
        let id = session.rows()[0].id.clone();
        session.update(&id, FieldKey::MainCategory, "");
        let engine = SubmissionEngine::new(ScriptedApi::default(), 3);

        let summary = finished(block_on(engine.run(&session)));
        assert_eq!(summary.rejected, 0);
        assert_eq!(summary.succeeded, 1);
        assert_eq!(engine.api().titles(), vec!["Koi".to_string()]);
    }

    #[test]
    fn test_one_failure_keeps_both_rows_in_snapshot() {
        let storage = MemoryStorage::default();
        let session = with_drafts(&storage, &["A", "B"]);
        let api = ScriptedApi::default()
            .answer("B", Ok(CreateProductResponse::failed("rate limited")));
        let engine = SubmissionEngine::new(api, 3);

        let summary = finished(block_on(engine.run(&session)));
        assert_eq!((summary.succeeded, summary.failed), (1, 1));
        assert!(!summary.all_done);

        let rows = session.rows();
        assert_eq!(rows[0].status, RowStatus::Done);
        assert_eq!(rows[1].status, RowStatus::Failed);
        assert_eq!(rows[1].last_error.as_deref(), Some("rate limited"));

        let snapshot: serde_json::Value = serde_json::from_str(&storage.value(&key()).unwrap()).unwrap();
        assert_eq!(snapshot[0]["status"], "done");
        assert_eq!(snapshot[1]["status"], "failed");
        assert_eq!(snapshot[1]["lastError"], "rate limited");
    }

    #[test]
    fn test_network_error_marks_row_failed() {
        let storage = MemoryStorage::default();
        let session = with_drafts(&storage, &["A"]);
        let api = ScriptedApi::default().answer("A", Err("offline".into()));
        let engine = SubmissionEngine::new(api, 3);

        finished(block_on(engine.run(&session)));
        let row = &session.rows()[0];
        assert_eq!(row.status, RowStatus::Failed);
        assert_eq!(row.last_error.as_deref(), Some("Network error: offline"));
    }

    #[test]
    fn test_nothing_eligible_is_a_no_op() {
        let storage = MemoryStorage::default();
        storage.put(
            &key(),
            r#"[{"id":"a","fields":{"title":"A"},"status":"done"}]"#,
        );
        let session = open(&storage);
        let before_rows = session.rows();
        let before_saved = storage.value(&key());
        let engine = SubmissionEngine::new(ScriptedApi::default(), 3);

        assert_eq!(block_on(engine.run(&session)), RunOutcome::NothingToSubmit);
        assert_eq!(session.rows(), before_rows);
        assert_eq!(storage.value(&key()), before_saved);
        assert!(engine.api().titles().is_empty());
    }

    #[test]
    fn test_pool_width_bounds_in_flight_calls() {
        let storage = MemoryStorage::default();
        let titles: Vec<String> = (0..10).map(|i| format!("Koi {i}")).collect();
        let title_refs: Vec<&str> = titles.iter().map(String::as_str).collect();
        let session = with_drafts(&storage, &title_refs);
        let engine = SubmissionEngine::new(ScriptedApi::slow(2), 3);

        let summary = finished(block_on(engine.run(&session)));
        assert_eq!(summary.attempted, 10);
        assert_eq!(engine.api().max_in_flight(), 3);
        assert_eq!(engine.api().titles(), titles, "rows go out in table order");
    }

    #[test]
    fn test_finished_batch_is_on_disk_before_next_batch() {
        let storage = MemoryStorage::default();
        let session = with_drafts(&storage, &["A", "B", "C"]);
        let seen = Rc::new(RefCell::new(None));

        let probe_storage = storage.clone();
        let probe = seen.clone();
        let api = ScriptedApi::default().on_call(move |title| {
            if title == "C" {
                *probe.borrow_mut() = probe_storage.value(&key());
            }
        });
        let engine = SubmissionEngine::new(api, 2);
        finished(block_on(engine.run(&session)));

        let raw = seen.borrow().clone().unwrap();
        let snapshot: serde_json::Value = serde_json::from_str(&raw).unwrap();
        assert_eq!(snapshot[0]["status"], "done");
        assert_eq!(snapshot[1]["status"], "done");
        assert_eq!(snapshot[2]["status"], "draft", "in-flight row is stored as a draft");
    }

    #[test]
    fn test_invalid_rows_are_rejected_without_a_call() {
        let storage = MemoryStorage::default();
        let session = with_drafts(&storage, &["A", "B"]);
        let second = session.rows()[1].id.clone();
        session.update(&second, FieldKey::Price, "free");
        let engine = SubmissionEngine::new(ScriptedApi::default(), 3);

        let summary = finished(block_on(engine.run(&session)));
        assert_eq!(summary.rejected, 1);
        assert_eq!(summary.attempted, 1);
        assert_eq!(engine.api().titles(), vec!["A".to_string()]);

        let row = session.row(&second).unwrap();
        assert_eq!(row.status, RowStatus::Failed);
        assert_eq!(row.last_error.as_deref(), Some("Valid price is required."));
    }

    #[test]
    fn test_retry_picks_failed_rows_only() {
        let storage = MemoryStorage::default();
        let session = with_drafts(&storage, &["A", "B"]);
        let first = SubmissionEngine::new(
            ScriptedApi::default().answer("B", Err("timeout".into())),
            3,
        );
        finished(block_on(first.run(&session)));

        let retry = SubmissionEngine::new(ScriptedApi::default(), 3);
        let summary = finished(block_on(retry.run(&session)));
        assert_eq!(retry.api().titles(), vec!["B".to_string()]);
        assert!(summary.all_done);
        assert_eq!(storage.value(&key()), None);
    }

    #[test]
    fn test_second_run_while_active_is_refused() {
        let storage = MemoryStorage::default();
        let session = with_drafts(&storage, &["A"]);
        assert!(session.try_begin_run());
        let engine = SubmissionEngine::new(ScriptedApi::default(), 3);

        assert_eq!(block_on(engine.run(&session)), RunOutcome::AlreadyRunning);
        assert_eq!(session.rows()[0].status, RowStatus::Draft);
    }

    #[test]
    fn test_warning_still_counts_as_created() {
        let storage = MemoryStorage::default();
        let session = with_drafts(&storage, &["A"]);
        let api = ScriptedApi::default().answer(
            "A",
            Ok(CreateProductResponse::created("gid://1")
                .with_warning("Product created but price failed: bad price")),
        );
        let engine = SubmissionEngine::new(api, 3);

        let summary = finished(block_on(engine.run(&session)));
        assert_eq!(summary.succeeded, 1);
        assert_eq!(summary.warnings.len(), 1);
        assert_eq!(session.rows()[0].status, RowStatus::Done);
        assert_eq!(session.rows()[0].last_error, None);
    }

    #[test]
    fn test_row_deleted_before_its_turn_is_skipped() {
        let storage = MemoryStorage::default();
        let session = with_drafts(&storage, &["A", "B"]);
        let victim = session.rows()[1].id.clone();

        let remover = session.clone();
        let api = ScriptedApi::default().on_call(move |_| {
            remover.remove(&victim);
        });
        let engine = SubmissionEngine::new(api, 1);

        let summary = finished(block_on(engine.run(&session)));
        assert_eq!(summary.attempted, 1);
        assert_eq!(summary.skipped, 1);
        assert_eq!(session.rows().len(), 1);
    }

    #[test]
    fn test_generate_then_submit_creates_everything() {
        let storage = MemoryStorage::default();
        let session = open(&storage);
        session.generate(5, &mut SmallRng::seed_from_u64(5));
        assert_eq!(session.stats().missing_images, 5);

        let engine = SubmissionEngine::new(ScriptedApi::slow(1), 3);
        let summary = finished(block_on(engine.run(&session)));
        assert_eq!(summary.succeeded, 5);
        assert_eq!(engine.api().max_in_flight(), 3);
        assert!(engine.api().with_images().iter().all(|image| !image));
        assert_eq!(storage.value(&key()), None);
    }
}
