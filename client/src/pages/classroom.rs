//! Live classroom route (`/classroom/:id`).

use leptos::prelude::*;
use leptos::tachys::view::any_view::IntoAny;
use leptos_router::hooks::{use_navigate, use_params_map};

use crate::components::classroom_view::ClassroomView;
use crate::routes::{Access, GuardDecision};
use crate::state::auth::AuthState;
use crate::util::auth::install_route_guard;

#[component]
pub fn ClassroomPage() -> impl IntoView {
    let auth = expect_context::<RwSignal<AuthState>>();
    let params = use_params_map();
    let decision = install_route_guard(auth, Access::Authenticated, use_navigate());
    let class_id = move || params.with(|p| p.get("id")).filter(|id| !id.trim().is_empty());

    view! {
        <div class="classroom-page">
            {move || match (decision.get(), class_id()) {
                (GuardDecision::Allow, Some(id)) => view! { <ClassroomView class_id=id /> }.into_any(),
                (GuardDecision::Allow, None) => view! { <p>"Class not found."</p> }.into_any(),
                _ => view! { <p>"Loading classroom..."</p> }.into_any(),
            }}
        </div>
    }
}
