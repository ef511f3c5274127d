//! Transient notification queue.
//!
//! Newest toast first. Each toast records when it expires so the queue can be
//! pruned deterministically; the Leptos layer (`util::toast`) owns the actual
//! browser timers and keeps at most one per toast.

#[cfg(test)]
#[path = "toast_test.rs"]
mod toast_test;

use std::collections::HashMap;

use uuid::Uuid;

pub const DEFAULT_TOAST_DURATION_MS: u32 = 4000;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ToastKind {
    Success,
    Error,
    #[default]
    Info,
    Warning,
}

impl ToastKind {
    pub fn css_class(self) -> &'static str {
        match self {
            Self::Success => "toast toast--success",
            Self::Error => "toast toast--error",
            Self::Info => "toast toast--info",
            Self::Warning => "toast toast--warning",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ToastOptions {
    pub kind: ToastKind,
    /// `0` keeps the toast until it is removed explicitly.
    pub duration_ms: u32,
}

impl Default for ToastOptions {
    fn default() -> Self {
        Self { kind: ToastKind::Info, duration_ms: DEFAULT_TOAST_DURATION_MS }
    }
}

impl ToastOptions {
    pub fn kind(kind: ToastKind) -> Self {
        Self { kind, ..Self::default() }
    }

    pub fn persistent(kind: ToastKind) -> Self {
        Self { kind, duration_ms: 0 }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Toast {
    pub id: Uuid,
    pub message: String,
    pub kind: ToastKind,
    pub duration_ms: u32,
    /// Absolute expiry in milliseconds; `None` for persistent toasts.
    pub expires_at_ms: Option<f64>,
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct ToastQueue {
    toasts: Vec<Toast>,
}

impl ToastQueue {
    /// Prepend a toast and return its id. Identical messages are not merged.
    pub fn push(&mut self, message: impl Into<String>, options: ToastOptions, now_ms: f64) -> Uuid {
        let id = Uuid::new_v4();
        let expires_at_ms = (options.duration_ms > 0).then(|| now_ms + f64::from(options.duration_ms));
        self.toasts.insert(
            0,
            Toast { id, message: message.into(), kind: options.kind, duration_ms: options.duration_ms, expires_at_ms },
        );
        id
    }

    /// Remove by id. Returns whether a toast was removed.
    pub fn remove(&mut self, id: Uuid) -> bool {
        let before = self.toasts.len();
        self.toasts.retain(|t| t.id != id);
        self.toasts.len() != before
    }

    /// Drop every toast whose expiry is at or before `now_ms`, returning their
    /// ids.
    pub fn prune(&mut self, now_ms: f64) -> Vec<Uuid> {
        let expired: Vec<Uuid> = self
            .toasts
            .iter()
            .filter(|t| t.expires_at_ms.is_some_and(|at| at <= now_ms))
            .map(|t| t.id)
            .collect();
        self.toasts.retain(|t| !expired.contains(&t.id));
        expired
    }

    pub fn get(&self, id: Uuid) -> Option<&Toast> {
        self.toasts.iter().find(|t| t.id == id)
    }

    pub fn toasts(&self) -> &[Toast] {
        &self.toasts
    }

    pub fn len(&self) -> usize {
        self.toasts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.toasts.is_empty()
    }
}

/// One pending timer handle per toast.
///
/// Handles cancel on drop (as `gloo_timers` timeouts do), so `cancel` only has
/// to hand the handle back for the caller to drop. `fire` takes the handle for
/// a timer that is running its callback; a second `fire` for the same id, or
/// one after `cancel`, returns `None`.
#[derive(Debug)]
pub struct ToastTimers<H> {
    handles: HashMap<Uuid, H>,
}

impl<H> Default for ToastTimers<H> {
    fn default() -> Self {
        Self { handles: HashMap::new() }
    }
}

impl<H> ToastTimers<H> {
    /// Track the timer for `id`, returning any handle it replaces.
    pub fn arm(&mut self, id: Uuid, handle: H) -> Option<H> {
        self.handles.insert(id, handle)
    }

    /// Stop tracking the timer for a toast removed before it expired.
    pub fn cancel(&mut self, id: Uuid) -> Option<H> {
        self.handles.remove(&id)
    }

    /// Claim the timer for an expiring toast.
    pub fn fire(&mut self, id: Uuid) -> Option<H> {
        self.handles.remove(&id)
    }

    pub fn is_armed(&self, id: Uuid) -> bool {
        self.handles.contains_key(&id)
    }

    pub fn len(&self) -> usize {
        self.handles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.handles.is_empty()
    }
}
