//! Browser implementations of the persistence ports.

use gloo_timers::callback::Timeout;
use web_sys::window;

use super::persistence::{DebounceTimer, DraftStorage};

fn get_local_storage() -> Result<web_sys::Storage, String> {
    window()
        .ok_or("No window object")?
        .local_storage()
        .map_err(|e| format!("localStorage unavailable: {:?}", e))?
        .ok_or_else(|| "localStorage unavailable".to_string())
}

/// `window.localStorage`. Every call looks the storage up again so a
/// page without storage degrades to in-memory editing.
#[derive(Debug, Clone, Copy, Default)]
pub struct BrowserStorage;

impl DraftStorage for BrowserStorage {
    fn get(&self, key: &str) -> Result<Option<String>, String> {
        get_local_storage()?
            .get_item(key)
            .map_err(|e| format!("Failed to read {}: {:?}", key, e))
    }

    fn set(&self, key: &str, value: &str) -> Result<(), String> {
        get_local_storage()?
            .set_item(key, value)
            .map_err(|e| format!("Failed to write {}: {:?}", key, e))
    }

    fn remove(&self, key: &str) -> Result<(), String> {
        get_local_storage()?
            .remove_item(key)
            .map_err(|e| format!("Failed to remove {}: {:?}", key, e))
    }
}

/// `setTimeout` through gloo; dropping the `Timeout` clears it.
#[derive(Debug, Clone, Copy, Default)]
pub struct BrowserTimer;

impl DebounceTimer for BrowserTimer {
    type Handle = Timeout;

    fn schedule(&self, delay_ms: u32, callback: Box<dyn FnOnce()>) -> Timeout {
        Timeout::new(delay_ms, callback)
    }
}
