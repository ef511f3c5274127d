//! Auth-session state for the current browser user.
//!
//! SYSTEM CONTEXT
//! ==============
//! Used by route guards and user-aware components to coordinate login redirects
//! and identity-dependent rendering. The token itself lives in `SessionStore`;
//! this state mirrors it so views can react to sign-in and sign-out.

#[cfg(test)]
#[path = "auth_test.rs"]
mod auth_test;

use crate::net::types::{Role, Session, User};

/// Coarse auth lifecycle.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AuthPhase {
    /// No token.
    Anonymous,
    /// Token present, profile not loaded yet.
    Loading,
    /// Profile loaded.
    Authenticated,
}

/// Authentication state tracking the current user and loading status.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct AuthState {
    pub user: Option<User>,
    pub token: Option<String>,
    pub loading: bool,
}

impl AuthState {
    /// State before the stored token has been checked.
    pub fn pending() -> Self {
        Self { user: None, token: None, loading: true }
    }

    pub fn phase(&self) -> AuthPhase {
        match (&self.user, self.loading) {
            (Some(_), _) if self.token.is_some() => AuthPhase::Authenticated,
            (_, true) => AuthPhase::Loading,
            _ => AuthPhase::Anonymous,
        }
    }

    pub fn is_authenticated(&self) -> bool {
        self.phase() == AuthPhase::Authenticated
    }

    pub fn role(&self) -> Option<Role> {
        self.user.as_ref().map(|u| u.role)
    }

    /// A stored token was found and its profile fetch is starting.
    pub fn restoring(&mut self, token: String) {
        self.token = Some(token);
        self.user = None;
        self.loading = true;
    }

    pub fn signed_in(&mut self, session: Session) {
        self.token = Some(session.token);
        self.user = Some(session.user);
        self.loading = false;
    }

    /// Logout, missing token, or rejected token.
    pub fn signed_out(&mut self) {
        self.token = None;
        self.user = None;
        self.loading = false;
    }
}
