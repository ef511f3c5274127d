//! Campus web client: a Leptos app rendered on the server and hydrated in the
//! browser.
//!
//! ARCHITECTURE
//! ============
//! `net` talks to the REST backend, `state` holds pure models, `util` binds
//! them to Leptos context, `classroom` bridges the video SDK, and `pages` /
//! `components` render. `routes` owns the access rules.

pub mod app;
pub mod classroom;
pub mod components;
pub mod config;
pub mod net;
pub mod pages;
pub mod routes;
pub mod state;
pub mod util;

/// WASM entry point: attach to the server-rendered document.
#[cfg(feature = "hydrate")]
#[wasm_bindgen::prelude::wasm_bindgen]
pub fn hydrate() {
    console_error_panic_hook::set_once();
    if console_log::init_with_level(log::Level::Info).is_err() {
        leptos::logging::warn!("console logger already installed");
    }
    leptos::mount::hydrate_body(app::App);
}
