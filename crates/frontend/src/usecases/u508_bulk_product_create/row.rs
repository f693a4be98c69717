use contracts::usecases::u508_bulk_product_create::ProductFields;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

/// Stable identity of a staged row. Never reused after deletion.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RowId(String);

impl RowId {
    pub fn generate() -> Self {
        Self(uuid::Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for RowId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl fmt::Display for RowId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Submission status of a row.
///
/// ```text
/// draft ──┐                 ┌──> done
///         ├──> submitting ──┤
/// failed ─┘                 └──> failed
/// ```
/// `submitting -> draft` exists only as the startup recovery step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RowStatus {
    Draft,
    Submitting,
    Done,
    Failed,
}

impl RowStatus {
    /// May be picked by a submission run
    pub fn is_eligible(self) -> bool {
        matches!(self, RowStatus::Draft | RowStatus::Failed)
    }

    /// Accepts field edits
    pub fn is_editable(self) -> bool {
        matches!(self, RowStatus::Draft | RowStatus::Failed)
    }

    pub fn label(self) -> &'static str {
        match self {
            RowStatus::Draft => "Draft",
            RowStatus::Submitting => "Uploading",
            RowStatus::Done => "Done",
            RowStatus::Failed => "Error",
        }
    }
}

/// Image picked for a row. Lives in memory only.
#[derive(Clone, PartialEq, Eq)]
pub struct Attachment {
    pub file_name: String,
    pub mime_type: String,
    pub bytes: Arc<[u8]>,
}

impl Attachment {
    pub fn new(file_name: impl Into<String>, mime_type: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            file_name: file_name.into(),
            mime_type: mime_type.into(),
            bytes: Arc::from(bytes),
        }
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

impl fmt::Debug for Attachment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Attachment")
            .field("file_name", &self.file_name)
            .field("mime_type", &self.mime_type)
            .field("len", &self.bytes.len())
            .finish()
    }
}

/// One staged product draft with its submission state.
#[derive(Debug, Clone, PartialEq)]
pub struct DraftRow {
    pub id: RowId,
    pub fields: ProductFields,
    pub attachment: Option<Attachment>,
    pub status: RowStatus,
    /// Set only while `status == Failed`
    pub last_error: Option<String>,
}

impl DraftRow {
    pub fn empty() -> Self {
        Self::with_fields(ProductFields::default())
    }

    pub fn with_fields(fields: ProductFields) -> Self {
        Self {
            id: RowId::generate(),
            fields,
            attachment: None,
            status: RowStatus::Draft,
            last_error: None,
        }
    }

    /// No field text and no attachment
    pub fn is_blank(&self) -> bool {
        self.attachment.is_none() && self.fields.is_empty()
    }

    /// `draft | failed -> submitting`. Returns false when the row is not
    /// eligible, in which case nothing changes.
    pub fn begin_attempt(&mut self) -> bool {
        if !self.status.is_eligible() {
            return false;
        }
        self.status = RowStatus::Submitting;
        self.last_error = None;
        true
    }

    /// `submitting -> done`
    pub fn mark_done(&mut self) -> bool {
        if self.status != RowStatus::Submitting {
            return false;
        }
        self.status = RowStatus::Done;
        self.last_error = None;
        true
    }

    /// `submitting -> failed`
    pub fn mark_failed(&mut self, message: impl Into<String>) -> bool {
        if self.status != RowStatus::Submitting {
            return false;
        }
        self.status = RowStatus::Failed;
        self.last_error = Some(message.into());
        true
    }

    /// Validation rejection: `draft | failed -> failed` without ever
    /// entering `submitting`.
    pub fn reject(&mut self, message: impl Into<String>) -> bool {
        if !self.status.is_eligible() {
            return false;
        }
        self.status = RowStatus::Failed;
        self.last_error = Some(message.into());
        true
    }

    /// Startup-only `submitting -> draft`.
    pub(crate) fn recover(&mut self) -> bool {
        if self.status != RowStatus::Submitting {
            return false;
        }
        self.status = RowStatus::Draft;
        self.last_error = None;
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ids_are_unique() {
        let a = DraftRow::empty();
        let b = DraftRow::empty();
        assert_ne!(a.id, b.id);
    }

    #[test]
    fn test_attempt_lifecycle() {
        let mut row = DraftRow::empty();
        assert!(row.begin_attempt());
        assert_eq!(row.status, RowStatus::Submitting);
        assert!(!row.begin_attempt(), "a row in flight cannot be picked twice");

        assert!(row.mark_failed("rate limited"));
        assert_eq!(row.status, RowStatus::Failed);
        assert_eq!(row.last_error.as_deref(), Some("rate limited"));

        assert!(row.begin_attempt());
        assert_eq!(row.last_error, None, "retry clears the previous error");
        assert!(row.mark_done());
        assert_eq!(row.status, RowStatus::Done);
        assert!(!row.begin_attempt(), "done is terminal");
    }

    #[test]
    fn test_results_only_apply_in_flight() {
        let mut row = DraftRow::empty();
        assert!(!row.mark_done());
        assert!(!row.mark_failed("x"));
        assert_eq!(row.status, RowStatus::Draft);
    }

    #[test]
    fn test_reject_skips_submitting() {
        let mut row = DraftRow::empty();
        assert!(row.reject("Title is required."));
        assert_eq!(row.status, RowStatus::Failed);

        row.begin_attempt();
        assert!(!row.reject("late"), "in-flight rows are not rejected");
    }

    #[test]
    fn test_recover_only_touches_in_flight() {
        let mut row = DraftRow::empty();
        row.begin_attempt();
        assert!(row.recover());
        assert_eq!(row.status, RowStatus::Draft);

        let mut done = DraftRow::empty();
        done.begin_attempt();
        done.mark_done();
        assert!(!done.recover());
        assert_eq!(done.status, RowStatus::Done);
    }

    #[test]
    fn test_status_wire_names() {
        assert_eq!(serde_json::to_string(&RowStatus::Submitting).unwrap(), "\"submitting\"");
        let status: RowStatus = serde_json::from_str("\"failed\"").unwrap();
        assert_eq!(status, RowStatus::Failed);
    }

    #[test]
    fn test_attachment_debug_hides_bytes() {
        let attachment = Attachment::new("koi.png", "image/png", vec![1, 2, 3]);
        let debug = format!("{attachment:?}");
        assert!(debug.contains("len: 3"));
        assert!(!debug.contains("[1, 2, 3]"));
    }
}
