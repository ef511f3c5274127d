//! Toast context with browser timers.
//!
//! SYSTEM CONTEXT
//! ==============
//! `state::toast::ToastQueue` holds the list; `Toaster` wraps it in a signal
//! and keeps one `gloo_timers` timeout per timed toast in a
//! `state::toast::ToastTimers`. Removing a toast drops its timeout, which
//! cancels it.

use leptos::prelude::*;
use uuid::Uuid;

use crate::state::toast::{Toast, ToastKind, ToastOptions, ToastQueue};
#[cfg(feature = "hydrate")]
use crate::state::toast::ToastTimers;

#[cfg(feature = "hydrate")]
type Timers = ToastTimers<gloo_timers::callback::Timeout>;

fn now_ms() -> f64 {
    #[cfg(feature = "hydrate")]
    {
        js_sys::Date::now()
    }
    #[cfg(not(feature = "hydrate"))]
    {
        0.0
    }
}

/// Copyable handle provided through context by `App`.
#[derive(Clone, Copy)]
pub struct Toaster {
    queue: RwSignal<ToastQueue>,
    #[cfg(feature = "hydrate")]
    timers: StoredValue<Timers, LocalStorage>,
}

impl Toaster {
    pub fn new() -> Self {
        Self {
            queue: RwSignal::new(ToastQueue::default()),
            #[cfg(feature = "hydrate")]
            timers: StoredValue::new_local(Timers::default()),
        }
    }

    /// Current toasts, newest first.
    pub fn toasts(&self) -> Vec<Toast> {
        self.queue.with(|q| q.toasts().to_vec())
    }

    pub fn push(&self, message: impl Into<String>, options: ToastOptions) -> Uuid {
        let mut id = Uuid::nil();
        let message = message.into();
        self.queue.update(|q| id = q.push(message, options, now_ms()));

        #[cfg(feature = "hydrate")]
        if options.duration_ms > 0 {
            let toaster = *self;
            let timer = gloo_timers::callback::Timeout::new(options.duration_ms, move || toaster.expire(id));
            self.timers.update_value(|timers| drop(timers.arm(id, timer)));
        }
        id
    }

    /// Remove a toast and cancel its timer.
    pub fn remove(&self, id: Uuid) {
        #[cfg(feature = "hydrate")]
        drop(self.timers.try_update_value(|timers| timers.cancel(id)));
        self.queue.update(|q| {
            q.remove(id);
        });
    }

    #[cfg(feature = "hydrate")]
    fn expire(&self, id: Uuid) {
        // The timeout is running its own callback; dropping it here would free
        // the closure mid-call.
        let Some(Some(timer)) = self.timers.try_update_value(|timers| timers.fire(id)) else {
            return;
        };
        let _ = timer.forget();
        self.queue.update(|q| {
            q.remove(id);
            q.prune(now_ms());
        });
    }

    pub fn success(&self, message: impl Into<String>) -> Uuid {
        self.push(message, ToastOptions::kind(ToastKind::Success))
    }

    pub fn error(&self, message: impl Into<String>) -> Uuid {
        self.push(message, ToastOptions::kind(ToastKind::Error))
    }

    pub fn info(&self, message: impl Into<String>) -> Uuid {
        self.push(message, ToastOptions::kind(ToastKind::Info))
    }

    pub fn warning(&self, message: impl Into<String>) -> Uuid {
        self.push(message, ToastOptions::kind(ToastKind::Warning))
    }
}

impl Default for Toaster {
    fn default() -> Self {
        Self::new()
    }
}

pub fn use_toaster() -> Toaster {
    expect_context::<Toaster>()
}
