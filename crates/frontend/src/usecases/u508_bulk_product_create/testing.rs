//! In-memory stand-ins for browser storage, timers and the upload service.

use contracts::usecases::u508_bulk_product_create::{CreateProductResponse, ProductFields};
use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::future::Future;
use std::pin::Pin;
use std::rc::Rc;
use std::task::{Context, Poll};

use super::engine::CreateProductApi;
use super::persistence::{DebounceTimer, DraftStorage};
use super::row::Attachment;

#[derive(Default)]
struct StorageState {
    values: HashMap<String, String>,
    fail_reads: bool,
    fail_writes: bool,
}

/// Shared map; clones see the same contents.
#[derive(Clone, Default)]
pub struct MemoryStorage {
    state: Rc<RefCell<StorageState>>,
}

impl MemoryStorage {
    pub fn put(&self, key: &str, value: &str) {
        self.state
            .borrow_mut()
            .values
            .insert(key.to_string(), value.to_string());
    }

    pub fn value(&self, key: &str) -> Option<String> {
        self.state.borrow().values.get(key).cloned()
    }

    pub fn fail_reads(&self, fail: bool) {
        self.state.borrow_mut().fail_reads = fail;
    }

    pub fn fail_writes(&self, fail: bool) {
        self.state.borrow_mut().fail_writes = fail;
    }
}

impl DraftStorage for MemoryStorage {
    fn get(&self, key: &str) -> Result<Option<String>, String> {
        let state = self.state.borrow();
        if state.fail_reads {
            return Err("storage unavailable".into());
        }
        Ok(state.values.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), String> {
        let mut state = self.state.borrow_mut();
        if state.fail_writes {
            return Err("quota exceeded".into());
        }
        state.values.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), String> {
        let mut state = self.state.borrow_mut();
        if state.fail_writes {
            return Err("storage unavailable".into());
        }
        state.values.remove(key);
        Ok(())
    }
}

struct Scheduled {
    delay_ms: u32,
    cancelled: Rc<Cell<bool>>,
    callback: Option<Box<dyn FnOnce()>>,
}

/// Timer that only fires when told to.
#[derive(Clone, Default)]
pub struct ManualTimer {
    scheduled: Rc<RefCell<Vec<Scheduled>>>,
}

pub struct ManualHandle {
    cancelled: Rc<Cell<bool>>,
}

impl Drop for ManualHandle {
    fn drop(&mut self) {
        self.cancelled.set(true);
    }
}

impl ManualTimer {
    /// Runs every callback whose handle is still alive. Returns how many ran.
    pub fn fire_all(&self) -> usize {
        let due: Vec<Scheduled> = self.scheduled.borrow_mut().drain(..).collect();
        let mut fired = 0;
        for mut entry in due {
            if entry.cancelled.get() {
                continue;
            }
            if let Some(callback) = entry.callback.take() {
                callback();
                fired += 1;
            }
        }
        fired
    }

    pub fn last_delay(&self) -> Option<u32> {
        self.scheduled.borrow().last().map(|entry| entry.delay_ms)
    }

    /// Callbacks scheduled and not yet cancelled
    pub fn live(&self) -> usize {
        self.scheduled
            .borrow()
            .iter()
            .filter(|entry| !entry.cancelled.get())
            .count()
    }
}

impl DebounceTimer for ManualTimer {
    type Handle = ManualHandle;

    fn schedule(&self, delay_ms: u32, callback: Box<dyn FnOnce()>) -> ManualHandle {
        let cancelled = Rc::new(Cell::new(false));
        self.scheduled.borrow_mut().push(Scheduled {
            delay_ms,
            cancelled: cancelled.clone(),
            callback: Some(callback),
        });
        ManualHandle { cancelled }
    }
}

/// Returns `Pending` once so sibling futures get polled in between.
pub struct YieldNow(bool);

pub fn yield_now() -> YieldNow {
    YieldNow(false)
}

impl Future for YieldNow {
    type Output = ();

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<()> {
        if self.0 {
            return Poll::Ready(());
        }
        self.0 = true;
        cx.waker().wake_by_ref();
        Poll::Pending
    }
}

/// Upload service fake. Answers by title; unknown titles succeed.
#[derive(Default)]
pub struct ScriptedApi {
    answers: RefCell<HashMap<String, Result<CreateProductResponse, String>>>,
    calls: RefCell<Vec<(String, bool)>>,
    in_flight: Cell<usize>,
    max_in_flight: Cell<usize>,
    yields: usize,
    on_call: Option<Box<dyn Fn(&str)>>,
}

impl ScriptedApi {
    /// Each call stays unresolved for `yields` polls.
    pub fn slow(yields: usize) -> Self {
        Self {
            yields,
            ..Default::default()
        }
    }

    pub fn answer(self, title: &str, answer: Result<CreateProductResponse, String>) -> Self {
        self.answers.borrow_mut().insert(title.to_string(), answer);
        self
    }

    /// Runs `hook` with the row title at the start of every call.
    pub fn on_call(mut self, hook: impl Fn(&str) + 'static) -> Self {
        self.on_call = Some(Box::new(hook));
        self
    }

    /// Titles in call order
    pub fn titles(&self) -> Vec<String> {
        self.calls.borrow().iter().map(|(title, _)| title.clone()).collect()
    }

    /// Whether each call carried an image, in call order
    pub fn with_images(&self) -> Vec<bool> {
        self.calls.borrow().iter().map(|(_, image)| *image).collect()
    }

    pub fn max_in_flight(&self) -> usize {
        self.max_in_flight.get()
    }
}

impl CreateProductApi for ScriptedApi {
    async fn create_product(
        &self,
        fields: ProductFields,
        attachment: Option<Attachment>,
    ) -> Result<CreateProductResponse, String> {
        let title = fields.title.clone();
        self.calls
            .borrow_mut()
            .push((title.clone(), attachment.is_some()));
        if let Some(hook) = &self.on_call {
            hook(&title);
        }

        self.in_flight.set(self.in_flight.get() + 1);
        self.max_in_flight
            .set(self.max_in_flight.get().max(self.in_flight.get()));
        for _ in 0..self.yields {
            yield_now().await;
        }
        self.in_flight.set(self.in_flight.get() - 1);

        self.answers
            .borrow()
            .get(&title)
            .cloned()
            .unwrap_or_else(|| Ok(CreateProductResponse::created(format!("gid://shopify/Product/{title}"))))
    }
}
