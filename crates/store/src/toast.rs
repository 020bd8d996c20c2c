//! Toast notification queue.
//!
//! Transient, fire-and-forget user feedback. The queue is never persisted
//! and starts empty every run. Each message schedules its own removal after
//! a fixed delay; the timer closes over the message id, not a list index,
//! so expiry stays correct however many toasts come and go in between.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tokio::task::JoinHandle;

use farine_core::ToastId;

/// How long a toast stays visible.
pub const TOAST_TTL: Duration = Duration::from_millis(3000);

/// Visual flavor of a toast.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ToastKind {
    #[default]
    Default,
    Success,
    Error,
}

/// One queued notification.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToastMessage {
    /// Unique id, assigned from a process-local counter.
    pub id: ToastId,
    /// Message text.
    pub text: String,
    /// Visual flavor.
    pub kind: ToastKind,
}

#[derive(Default)]
struct Inner {
    toasts: Vec<ToastMessage>,
    timers: HashMap<u64, JoinHandle<()>>,
}

/// Ephemeral notification queue with per-message auto-expiry.
///
/// Cloning is cheap and clones share the same queue; timers run on the
/// ambient tokio runtime, so the store must be used from async context.
#[derive(Clone, Default)]
pub struct ToastStore {
    inner: Arc<Mutex<Inner>>,
    next_id: Arc<AtomicU64>,
}

impl ToastStore {
    /// Create an empty queue.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a toast and schedule its removal after [`TOAST_TTL`].
    /// Returns the assigned id.
    pub fn show(&self, text: impl Into<String>, kind: ToastKind) -> ToastId {
        let id = ToastId::new(self.next_id.fetch_add(1, Ordering::Relaxed));
        let message = ToastMessage {
            id,
            text: text.into(),
            kind,
        };

        let inner = Arc::clone(&self.inner);
        let timer = tokio::spawn(async move {
            tokio::time::sleep(TOAST_TTL).await;
            let mut inner = inner.lock().unwrap_or_else(std::sync::PoisonError::into_inner);
            inner.toasts.retain(|t| t.id != id);
            inner.timers.remove(&id.as_u64());
        });

        let mut inner = self
            .inner
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner);
        inner.toasts.push(message);
        inner.timers.insert(id.as_u64(), timer);
        id
    }

    /// Queue a success toast.
    pub fn success(&self, text: impl Into<String>) -> ToastId {
        self.show(text, ToastKind::Success)
    }

    /// Queue an error toast.
    pub fn error(&self, text: impl Into<String>) -> ToastId {
        self.show(text, ToastKind::Error)
    }

    /// Remove a toast before its delay elapses, cancelling its timer.
    /// No-op if the toast already expired.
    pub fn dismiss(&self, id: ToastId) {
        let mut inner = self
            .inner
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner);
        inner.toasts.retain(|t| t.id != id);
        if let Some(timer) = inner.timers.remove(&id.as_u64()) {
            timer.abort();
        }
    }

    /// Snapshot of the currently visible toasts, in creation order.
    #[must_use]
    pub fn active(&self) -> Vec<ToastMessage> {
        self.inner
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .toasts
            .clone()
    }
}
