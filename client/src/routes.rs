//! Route table access rules and navigation targets.
//!
//! SYSTEM CONTEXT
//! ==============
//! `app::App` declares the Leptos routes; this module decides who may see
//! them. Pages call `guard` through `util::auth::install_route_guard` so the
//! redirect rules live in one place and stay testable without a router.

#[cfg(test)]
#[path = "routes_test.rs"]
mod routes_test;

use crate::net::types::Role;
use crate::state::auth::{AuthPhase, AuthState};

pub const HOME: &str = "/";
pub const LOGIN: &str = "/login";
pub const REGISTER: &str = "/register";
pub const DASHBOARD: &str = "/dashboard";
pub const PAYMENT_CALLBACK: &str = "/payment/callback";
pub const CLASSROOM_PREFIX: &str = "/classroom/";

/// Who may open a route.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Access {
    Public,
    Authenticated,
    Role(Role),
}

/// Access level for a concrete path (query string ignored).
pub fn access_for(path: &str) -> Access {
    let path = path.split(['?', '#']).next().unwrap_or_default().trim_end_matches('/');
    match path {
        "/dashboard/admin" => Access::Role(Role::Admin),
        "/dashboard/lecturer" => Access::Role(Role::Lecturer),
        "/dashboard/student" => Access::Role(Role::Student),
        DASHBOARD => Access::Authenticated,
        p if p.starts_with(CLASSROOM_PREFIX) => Access::Authenticated,
        _ => Access::Public,
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum GuardDecision {
    Allow,
    /// Stored session still being checked; render a placeholder.
    Wait,
    Redirect(String),
}

pub fn guard(access: Access, auth: &AuthState, current_path: &str) -> GuardDecision {
    if access == Access::Public {
        return GuardDecision::Allow;
    }
    match auth.phase() {
        AuthPhase::Loading => GuardDecision::Wait,
        AuthPhase::Anonymous => GuardDecision::Redirect(login_redirect(current_path)),
        AuthPhase::Authenticated => match (access, auth.role()) {
            (Access::Role(required), Some(actual)) if required != actual => {
                GuardDecision::Redirect(actual.dashboard_path().to_owned())
            }
            _ => GuardDecision::Allow,
        },
    }
}

/// Path plus query string of the current page, for returning after login.
pub fn return_path(pathname: &str, search: &str) -> String {
    let search = search.trim_start_matches('?');
    if search.is_empty() { pathname.to_owned() } else { format!("{pathname}?{search}") }
}

/// `/login?redirect=<path>` so the user comes back after signing in.
pub fn login_redirect(return_to: &str) -> String {
    if return_to.is_empty() || return_to == HOME {
        return LOGIN.to_owned();
    }
    format!("{LOGIN}?redirect={}", urlencoding::encode(return_to))
}

/// Only same-origin absolute paths are followed.
pub fn is_safe_redirect(target: &str) -> bool {
    target.starts_with('/') && !target.starts_with("//") && !target.contains('\\') && !target.contains("://")
}

/// Where to go once signed in: the requested page when it is safe and not an
/// auth page, otherwise the role's dashboard.
pub fn post_login_target(redirect: Option<&str>, role: Role) -> String {
    redirect
        .map(str::trim)
        .filter(|target| is_safe_redirect(target))
        .filter(|target| !target.starts_with(LOGIN) && !target.starts_with(REGISTER))
        .map_or_else(|| role.dashboard_path().to_owned(), str::to_owned)
}

pub fn classroom_path(class_id: &str) -> String {
    format!("{CLASSROOM_PREFIX}{}", urlencoding::encode(class_id))
}
