//! Reusable UI component modules.
//!
//! SYSTEM CONTEXT
//! ==============
//! Components render shared chrome (header, toasts), the data table and the
//! classroom stage while reading shared state from Leptos context providers.

pub mod classroom_view;
pub mod data_table;
pub mod site_header;
pub mod stat_card;
pub mod toast_host;
