//! Client-side state models.
//!
//! SYSTEM CONTEXT
//! ==============
//! Plain data and pure transitions. Pages wrap these in `RwSignal`s provided
//! through Leptos context; everything here is testable without a browser.

pub mod auth;
pub mod classroom;
pub mod table;
pub mod toast;
