//! u508: staging product drafts in the browser and creating them in the
//! shop through a bounded upload queue.
//!
//! Everything except `storage`, `api` and `view` is free of browser APIs.

pub mod api;
pub mod config;
pub mod engine;
pub mod generator;
pub mod persistence;
pub mod row;
pub mod session;
pub mod storage;
pub mod store;
pub mod view;

pub use config::BulkEditorConfig;
pub use engine::{CreateProductApi, RunOutcome, RunSummary, SubmissionEngine};
pub use row::{Attachment, DraftRow, RowId, RowStatus};
pub use session::BulkSession;
pub use store::{BulkStats, RowStore, StoreError};
pub use view::BulkProductEditor;

#[cfg(test)]
pub(crate) mod testing;
