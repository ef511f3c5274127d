//! Public landing page with the program catalogue.
//!
//! SYSTEM CONTEXT
//! ==============
//! Programs load once on mount; a failed fetch shows the empty state. Enrolling
//! requires a session: anonymous visitors go to login and come back here.
//! Signed-in users start a hosted checkout and leave the app for the gateway.

#[cfg(test)]
#[path = "home_test.rs"]
mod home_test;

use leptos::prelude::*;
use leptos::tachys::view::any_view::IntoAny;
use serde_json::Value;

use crate::components::data_table::{Column, DataTable};
use crate::config::AppConfig;
use crate::net::api::record_id;
use crate::net::http::ApiClient;
use crate::routes;
use crate::state::auth::AuthState;
use crate::util::toast::use_toaster;

/// Group the integer part of a numeric amount in thousands.
pub fn format_amount(value: &Value) -> String {
    let amount = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    };
    let Some(amount) = amount.filter(|a| a.is_finite() && *a >= 0.0) else {
        return String::new();
    };
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    let whole = amount.round() as u64;
    let digits = whole.to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    grouped
}

/// What clicking "Enroll" should do for the current visitor.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum EnrollAction {
    SignIn(String),
    Checkout(String),
    Unavailable,
}

pub fn enroll_action(auth: &AuthState, program: &Value) -> EnrollAction {
    let Some(program_id) = record_id(program) else {
        return EnrollAction::Unavailable;
    };
    if auth.is_authenticated() {
        EnrollAction::Checkout(program_id)
    } else {
        EnrollAction::SignIn(routes::login_redirect(routes::HOME))
    }
}

#[component]
pub fn HomePage() -> impl IntoView {
    let api = expect_context::<ApiClient>();
    let auth = expect_context::<RwSignal<AuthState>>();
    let toaster = use_toaster();
    let page_size = expect_context::<AppConfig>().default_page_size;
    let programs = RwSignal::new(Vec::<Value>::new());
    let loading = RwSignal::new(true);

    #[cfg(feature = "hydrate")]
    {
        let api = api.clone();
        leptos::task::spawn_local(async move {
            programs.set(crate::net::api::list_or_empty(&api, crate::net::api::Resource::Programs).await);
            loading.set(false);
        });
    }

    let enroll = move |program: &Value| {
        match enroll_action(&auth.get_untracked(), program) {
            EnrollAction::SignIn(target) => {
                toaster.info("Sign in to enroll");
                #[cfg(feature = "hydrate")]
                if let Some(window) = web_sys::window() {
                    let _ = window.location().set_href(&target);
                }
                #[cfg(not(feature = "hydrate"))]
                let _ = target;
            }
            EnrollAction::Checkout(program_id) => {
                let api = api.clone();
                #[cfg(feature = "hydrate")]
                leptos::task::spawn_local(async move {
                    match crate::net::payments::initialize(&api, &program_id).await {
                        Ok(init) => {
                            if let Some(window) = web_sys::window() {
                                let _ = window.location().set_href(&init.authorization_url);
                            }
                        }
                        Err(err) => {
                            toaster.error(crate::net::error::format_api_error(Some(&err), "Could not start payment"));
                        }
                    }
                });
                #[cfg(not(feature = "hydrate"))]
                let _ = (api, program_id);
            }
            EnrollAction::Unavailable => {
                toaster.warning("This program cannot be enrolled in yet");
            }
        }
    };
    let enroll = std::sync::Arc::new(enroll);

    let columns = vec![
        Column::new("title", "Program").render(|value, row| {
            let title = value.as_str().or_else(|| row.get("name").and_then(Value::as_str)).unwrap_or("Untitled");
            view! { <strong>{title.to_owned()}</strong> }.into_any()
        }),
        Column::new("duration", "Duration"),
        Column::new("fee", "Fee").render(|value, _| format_amount(value).into_any()),
        Column::new("id", "").render(move |_, row| {
            let enroll = enroll.clone();
            let row = row.clone();
            view! {
                <button class="btn btn--primary" on:click=move |_| enroll(&row)>
                    "Enroll"
                </button>
            }
            .into_any()
        }),
    ];

    view! {
        <div class="home-page">
            <section class="home-page__hero">
                <h1>"Learn with Campus"</h1>
                <p>"Browse programs, enroll online and join live classes from your browser."</p>
            </section>
            <section class="home-page__programs">
                <h2>"Programs"</h2>
                <Show when=move || !loading.get() fallback=|| view! { <p>"Loading programs..."</p> }>
                    <DataTable
                        columns=columns.clone()
                        data=programs
                        page_size=page_size
                        empty_message="No programs available"
                    />
                </Show>
            </section>
        </div>
    }
}
