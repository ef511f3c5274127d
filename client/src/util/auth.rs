//! Shared auth UI helpers.
//!
//! SYSTEM CONTEXT
//! ==============
//! Route components should apply identical unauthenticated redirect behavior,
//! and every sign-in path (login, registration, restore) must leave the
//! `RwSignal<AuthState>` context and the stored token in agreement.

#[cfg(test)]
#[path = "auth_test.rs"]
mod auth_test;

use leptos::prelude::*;
use leptos_router::NavigateOptions;
use leptos_router::hooks::use_location;

use crate::net::auth::{self as auth_api, RestoreOutcome};
use crate::net::http::ApiClient;
use crate::net::types::Session;
use crate::routes::{self, Access, GuardDecision};
use crate::state::auth::AuthState;

/// Fold a restore result into auth state.
pub fn apply_restore(state: &mut AuthState, outcome: RestoreOutcome) {
    match outcome {
        RestoreOutcome::Authenticated(session) => state.signed_in(session),
        RestoreOutcome::Expired(_) | RestoreOutcome::Anonymous => state.signed_out(),
    }
}

/// Check the stored token once, in the browser. Server renders keep the
/// pending state so hydration matches.
pub fn restore_session(auth: RwSignal<AuthState>, api: ApiClient) {
    #[cfg(feature = "hydrate")]
    leptos::task::spawn_local(async move {
        if let Some(token) = api.session().token() {
            auth.update(|state| state.restoring(token));
        }
        let outcome = auth_api::restore(&api).await;
        auth.update(|state| apply_restore(state, outcome));
    });
    #[cfg(not(feature = "hydrate"))]
    {
        let _ = (auth, api);
    }
}

pub fn sign_in(auth: RwSignal<AuthState>, session: Session) {
    auth.update(|state| state.signed_in(session));
}

/// Best-effort server logout; local state is always cleared.
pub async fn sign_out(auth: RwSignal<AuthState>, api: &ApiClient) {
    auth_api::logout(api).await;
    auth.update(AuthState::signed_out);
}

/// Redirect away from the current route whenever `routes::guard` says so.
///
/// Returns the live decision so the page can render a placeholder while the
/// session is still restoring.
pub fn install_route_guard<F>(auth: RwSignal<AuthState>, access: Access, navigate: F) -> Memo<GuardDecision>
where
    F: Fn(&str, NavigateOptions) + Clone + 'static,
{
    let location = use_location();
    let decision = Memo::new(move |_| {
        let current = routes::return_path(&location.pathname.get(), &location.search.get());
        routes::guard(access, &auth.get(), &current)
    });
    Effect::new(move || {
        if let GuardDecision::Redirect(target) = decision.get() {
            navigate(&target, NavigateOptions { replace: true, ..NavigateOptions::default() });
        }
    });
    decision
}
