//! Client configuration resolved at build time.
//!
//! The WASM bundle has no process environment, so values are baked in from
//! `CAMPUS_*` variables when the crate is compiled and fall back to local
//! development defaults.

#[cfg(test)]
#[path = "config_test.rs"]
mod config_test;

use crate::state::table::DEFAULT_PAGE_SIZE;

pub const DEFAULT_API_BASE_URL: &str = "http://localhost:5000/api";
pub const DEFAULT_LIVEKIT_URL: &str = "ws://localhost:7880";
pub const DEFAULT_REQUEST_TIMEOUT_MS: u32 = 30_000;
pub const DEFAULT_LIVEKIT_SDK_URL: &str = "https://cdn.jsdelivr.net/npm/livekit-client/dist/livekit-client.umd.min.js";

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AppConfig {
    /// REST API root, without trailing slash.
    pub api_base_url: String,
    /// Signaling URL for the live-classroom video service.
    pub livekit_url: String,
    /// Script loaded the first time a classroom is entered.
    pub livekit_sdk_url: String,
    /// Fixed per-request timeout applied by `net::http`.
    pub request_timeout_ms: u32,
    pub default_page_size: usize,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self::from_values(None, None, None)
    }
}

impl AppConfig {
    /// Read `CAMPUS_API_BASE_URL`, `CAMPUS_LIVEKIT_URL`,
    /// `CAMPUS_REQUEST_TIMEOUT_MS` and `CAMPUS_LIVEKIT_SDK_URL` as captured at
    /// compile time.
    pub fn from_build_env() -> Self {
        let mut config = Self::from_values(
            option_env!("CAMPUS_API_BASE_URL"),
            option_env!("CAMPUS_LIVEKIT_URL"),
            option_env!("CAMPUS_REQUEST_TIMEOUT_MS"),
        );
        if let Some(url) = option_env!("CAMPUS_LIVEKIT_SDK_URL").map(str::trim).filter(|s| !s.is_empty()) {
            url.clone_into(&mut config.livekit_sdk_url);
        }
        config
    }

    pub fn from_values(api_base_url: Option<&str>, livekit_url: Option<&str>, timeout_ms: Option<&str>) -> Self {
        let non_blank: fn(Option<&str>) -> Option<&str> = |v| v.map(str::trim).filter(|s| !s.is_empty());

        Self {
            api_base_url: non_blank(api_base_url)
                .unwrap_or(DEFAULT_API_BASE_URL)
                .trim_end_matches('/')
                .to_owned(),
            livekit_url: non_blank(livekit_url).unwrap_or(DEFAULT_LIVEKIT_URL).to_owned(),
            livekit_sdk_url: DEFAULT_LIVEKIT_SDK_URL.to_owned(),
            request_timeout_ms: non_blank(timeout_ms)
                .and_then(|v| v.parse::<u32>().ok())
                .filter(|ms| *ms > 0)
                .unwrap_or(DEFAULT_REQUEST_TIMEOUT_MS),
            default_page_size: DEFAULT_PAGE_SIZE,
        }
    }
}
