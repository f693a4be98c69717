/// Tunables of the bulk editor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BulkEditorConfig {
    /// Maximum simultaneous create calls
    pub pool_width: usize,
    /// Quiet period before an edit is written to storage
    pub debounce_ms: u32,
    /// Upper bound on staged rows
    pub max_rows: usize,
    /// localStorage key holding the draft snapshot
    pub storage_key: String,
    /// Pre-filled value of the "generate" counter
    pub generate_default_count: usize,
}

pub const DEFAULT_POOL_WIDTH: usize = 3;
pub const DEFAULT_DEBOUNCE_MS: u32 = 1000;
pub const DEFAULT_MAX_ROWS: usize = 50;
pub const DEFAULT_STORAGE_KEY: &str = "bulk-product-drafts";

impl Default for BulkEditorConfig {
    fn default() -> Self {
        Self {
            pool_width: DEFAULT_POOL_WIDTH,
            debounce_ms: DEFAULT_DEBOUNCE_MS,
            max_rows: DEFAULT_MAX_ROWS,
            storage_key: DEFAULT_STORAGE_KEY.to_string(),
            generate_default_count: 5,
        }
    }
}

impl BulkEditorConfig {
    /// Pool width never drops below one, otherwise a run could not progress.
    pub fn effective_pool_width(&self) -> usize {
        self.pool_width.max(1)
    }

    pub fn with_pool_width(mut self, pool_width: usize) -> Self {
        self.pool_width = pool_width;
        self
    }

    pub fn with_max_rows(mut self, max_rows: usize) -> Self {
        self.max_rows = max_rows;
        self
    }
}
