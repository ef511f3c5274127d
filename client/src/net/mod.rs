//! Networking modules for the backend REST API.
//!
//! SYSTEM CONTEXT
//! ==============
//! `http` is the single request path (token header, envelope, errors),
//! `storage` persists the token, `auth`/`api`/`payments`/`classroom` are the flows built on
//! top, and `types` holds the few typed records.

pub mod api;
pub mod auth;
pub mod classroom;
pub mod error;
pub mod http;
pub mod payments;
pub mod storage;
#[cfg(test)]
pub(crate) mod test_support;
pub mod types;
