//! Email + password sign-in.
//!
//! SYSTEM CONTEXT
//! ==============
//! Signing in updates the auth context; a single effect then navigates to the
//! `redirect` query target or the user's dashboard. Visiting this page while
//! already signed in takes the same path.

#[cfg(test)]
#[path = "login_test.rs"]
mod login_test;

use leptos::prelude::*;
use leptos_router::NavigateOptions;
use leptos_router::hooks::{use_navigate, use_query_map};

use crate::net::error::{ApiError, format_api_error};
use crate::net::http::ApiClient;
use crate::net::types::Session;
use crate::routes;
use crate::state::auth::AuthState;
use crate::util::toast::{Toaster, use_toaster};
use crate::util::validation::validate_login;

pub fn welcome_message(session: &Session) -> String {
    format!("Welcome back, {}", session.user.display_name())
}

/// Show a backend failure as an error toast and under the form.
pub fn report_auth_failure(toaster: Toaster, error: RwSignal<Option<String>>, err: &ApiError, fallback: &str) {
    let message = format_api_error(Some(err), fallback);
    toaster.error(message.clone());
    error.set(Some(message));
}

/// Navigate signed-in users away from an auth form.
pub(crate) fn install_signed_in_redirect(auth: RwSignal<AuthState>) {
    let navigate = use_navigate();
    let query = use_query_map();
    Effect::new(move || {
        let state = auth.get();
        let Some(role) = state.role().filter(|_| state.is_authenticated()) else {
            return;
        };
        let redirect = query.with_untracked(|q| q.get("redirect"));
        let target = routes::post_login_target(redirect.as_deref(), role);
        navigate(&target, NavigateOptions { replace: true, ..NavigateOptions::default() });
    });
}

#[component]
pub fn LoginPage() -> impl IntoView {
    let api = expect_context::<ApiClient>();
    let auth = expect_context::<RwSignal<AuthState>>();
    let toaster = use_toaster();
    let email = RwSignal::new(String::new());
    let password = RwSignal::new(String::new());
    let error = RwSignal::new(None::<String>);
    let busy = RwSignal::new(false);

    install_signed_in_redirect(auth);

    let on_submit = move |ev: leptos::ev::SubmitEvent| {
        ev.prevent_default();
        if busy.get_untracked() {
            return;
        }
        let (email_value, password_value) = match validate_login(&email.get_untracked(), &password.get_untracked()) {
            Ok(credentials) => credentials,
            Err(err) => {
                error.set(Some(err.to_string()));
                return;
            }
        };
        error.set(None);
        busy.set(true);

        let api = api.clone();
        #[cfg(feature = "hydrate")]
        leptos::task::spawn_local(async move {
            match crate::net::auth::login(&api, &email_value, &password_value).await {
                Ok(session) => {
                    toaster.success(welcome_message(&session));
                    crate::util::auth::sign_in(auth, session);
                }
                Err(err) => {
                    report_auth_failure(toaster, error, &err, "Sign in failed");
                }
            }
            busy.set(false);
        });
        #[cfg(not(feature = "hydrate"))]
        {
            let _ = (api, email_value, password_value, toaster);
        }
    };

    view! {
        <div class="auth-page">
            <div class="auth-card">
                <h1>"Sign in"</h1>
                <form class="auth-form" on:submit=on_submit>
                    <label class="auth-form__field">
                        "Email"
                        <input
                            type="email"
                            autocomplete="email"
                            prop:value=move || email.get()
                            on:input=move |ev| email.set(event_target_value(&ev))
                        />
                    </label>
                    <label class="auth-form__field">
                        "Password"
                        <input
                            type="password"
                            autocomplete="current-password"
                            prop:value=move || password.get()
                            on:input=move |ev| password.set(event_target_value(&ev))
                        />
                    </label>
                    <Show when=move || error.get().is_some()>
                        <p class="auth-form__error">{move || error.get().unwrap_or_default()}</p>
                    </Show>
                    <button class="btn btn--primary" type="submit" disabled=move || busy.get()>
                        {move || if busy.get() { "Signing in..." } else { "Sign in" }}
                    </button>
                </form>
                <p class="auth-card__switch">
                    "New here? "
                    <a href=routes::REGISTER>"Create a student account"</a>
                </p>
            </div>
        </div>
    }
}
