//! Dashboard count tile for one backend resource.

use leptos::prelude::*;

use crate::net::api::StatCard as Stat;

#[component]
pub fn StatCard(stat: Stat) -> impl IntoView {
    view! {
        <div class="stat-card">
            <span class="stat-card__count">{stat.count}</span>
            <span class="stat-card__label">{stat.resource.label()}</span>
        </div>
    }
}
