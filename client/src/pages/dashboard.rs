//! Role dashboards.
//!
//! SYSTEM CONTEXT
//! ==============
//! `/dashboard` only forwards to the signed-in user's role dashboard. Each role
//! route is guarded by `routes::guard`, so a user who opens another role's
//! dashboard lands on their own. Data loads once the guard allows: counters
//! settle concurrently and a failed fetch shows an empty table.

#[cfg(test)]
#[path = "dashboard_test.rs"]
mod dashboard_test;

use leptos::prelude::*;
use leptos::tachys::view::any_view::IntoAny;
use leptos_router::NavigateOptions;
use leptos_router::hooks::use_navigate;
use serde_json::Value;

use crate::components::data_table::{Column, DataTable};
use crate::components::stat_card::StatCard;
use crate::config::AppConfig;
use crate::net::api::{Resource, StatCard as Stat, record_id};
use crate::net::http::ApiClient;
use crate::net::types::Role;
use crate::routes::{self, Access, GuardDecision};
use crate::state::auth::AuthState;
use crate::util::auth::install_route_guard;

pub fn dashboard_heading(role: Role) -> String {
    format!("{} dashboard", role.label())
}

/// Collection listed in the dashboard table.
pub fn primary_resource(role: Role) -> Resource {
    match role {
        Role::Admin => Resource::Users,
        Role::Lecturer | Role::Student => Resource::Classes,
    }
}

/// `name`, else `firstName lastName` in either casing.
pub fn person_name(row: &Value) -> String {
    if let Some(name) = row.get("name").and_then(Value::as_str).filter(|n| !n.trim().is_empty()) {
        return name.trim().to_owned();
    }
    let part = |keys: [&str; 2]| {
        keys.iter()
            .find_map(|k| row.get(*k).and_then(Value::as_str))
            .map(str::trim)
            .unwrap_or_default()
            .to_owned()
    };
    let first = part(["firstName", "first_name"]);
    let last = part(["lastName", "last_name"]);
    format!("{first} {last}").trim().to_owned()
}

/// Classroom route for a class record.
pub fn class_link(row: &Value) -> Option<String> {
    record_id(row).map(|id| routes::classroom_path(&id))
}

fn join_column(label: &'static str) -> Column {
    Column::new("id", "").render(move |_, row| match class_link(row) {
        Some(href) => view! { <a class="btn btn--primary" href=href>{label}</a> }.into_any(),
        None => ().into_any(),
    })
}

pub fn dashboard_columns(role: Role) -> Vec<Column> {
    match role {
        Role::Admin => vec![
            Column::new("name", "Name").render(|_, row| person_name(row).into_any()),
            Column::new("email", "Email"),
            Column::new("role", "Role"),
        ],
        Role::Lecturer => vec![
            Column::new("title", "Class"),
            Column::new("course", "Course"),
            Column::new("schedule", "Schedule"),
            join_column("Start class"),
        ],
        Role::Student => vec![
            Column::new("title", "Class"),
            Column::new("course", "Course"),
            Column::new("schedule", "Schedule"),
            join_column("Join"),
        ],
    }
}

/// `/dashboard`: forward to the role dashboard once the session is known.
#[component]
pub fn DashboardPage() -> impl IntoView {
    let auth = expect_context::<RwSignal<AuthState>>();
    let navigate = use_navigate();
    let decision = install_route_guard(auth, Access::Authenticated, navigate.clone());

    Effect::new(move || {
        if decision.get() != GuardDecision::Allow {
            return;
        }
        let role = auth.with(|a| a.role().unwrap_or_default());
        navigate(role.dashboard_path(), NavigateOptions { replace: true, ..NavigateOptions::default() });
    });

    view! { <p class="dashboard__loading">"Loading dashboard..."</p> }
}

#[component]
pub fn RoleDashboard(role: Role) -> impl IntoView {
    let api = expect_context::<ApiClient>();
    let auth = expect_context::<RwSignal<AuthState>>();
    let page_size = expect_context::<AppConfig>().default_page_size;
    let decision = install_route_guard(auth, Access::Role(role), use_navigate());
    let stats = RwSignal::new(Vec::<Stat>::new());
    let rows = RwSignal::new(Vec::<Value>::new());
    let loading = RwSignal::new(true);
    let requested = RwSignal::new(false);

    Effect::new(move || {
        if decision.get() != GuardDecision::Allow || requested.get_untracked() {
            return;
        }
        requested.set(true);
        #[cfg(feature = "hydrate")]
        {
            let api = api.clone();
            leptos::task::spawn_local(async move {
                let (counts, records) = futures::join!(
                    crate::net::api::fetch_dashboard_stats(&api, role),
                    crate::net::api::list_or_empty(&api, primary_resource(role)),
                );
                stats.set(counts);
                rows.set(records);
                loading.set(false);
            });
        }
        #[cfg(not(feature = "hydrate"))]
        let _ = &api;
    });

    let greeting = move || {
        auth.with(|a| a.user.as_ref().map(|u| format!("Welcome, {}", u.display_name())))
            .unwrap_or_default()
    };

    view! {
        <Show
            when=move || decision.get() == GuardDecision::Allow
            fallback=|| view! { <p class="dashboard__loading">"Loading dashboard..."</p> }
        >
            <div class="dashboard">
                <header class="dashboard__header">
                    <h1>{dashboard_heading(role)}</h1>
                    <p>{greeting}</p>
                </header>
                <section class="dashboard__stats">
                    <For each=move || stats.get() key=|stat| stat.resource let:stat>
                        <StatCard stat=stat />
                    </For>
                </section>
                <section class="dashboard__table">
                    <h2>{primary_resource(role).label()}</h2>
                    <Show when=move || !loading.get() fallback=|| view! { <p>"Loading..."</p> }>
                        <DataTable columns=dashboard_columns(role) data=rows page_size=page_size />
                    </Show>
                </section>
            </div>
        </Show>
    }
}
