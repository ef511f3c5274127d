//! Page modules for route-level screens.
//!
//! ARCHITECTURE
//! ============
//! Each page owns route-scoped orchestration (guards, fetches, navigation) and
//! delegates rendering details to `components`.

pub mod classroom;
pub mod dashboard;
pub mod home;
pub mod login;
pub mod payment_callback;
pub mod register;
