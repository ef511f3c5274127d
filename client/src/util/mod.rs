//! Utility helpers shared across client UI modules.
//!
//! SYSTEM CONTEXT
//! ==============
//! Utility modules bind pure state to Leptos context and browser timers, and
//! hold form checks that run before anything is sent.

pub mod auth;
pub mod toast;
pub mod validation;
