//! Top navigation with auth-aware links and logout.

use leptos::prelude::*;

use crate::net::http::ApiClient;
use crate::routes;
use crate::state::auth::AuthState;

#[component]
pub fn SiteHeader() -> impl IntoView {
    let auth = expect_context::<RwSignal<AuthState>>();
    let api = expect_context::<ApiClient>();

    let dashboard_href = move || auth.get().role().unwrap_or_default().dashboard_path();
    let display_name = move || auth.get().user.map(|u| u.display_name()).unwrap_or_default();

    // Full reload so no page keeps data fetched under the old session.
    let on_logout = move |_| {
        let api = api.clone();
        #[cfg(feature = "hydrate")]
        leptos::task::spawn_local(async move {
            crate::util::auth::sign_out(auth, &api).await;
            if let Some(window) = web_sys::window() {
                let _ = window.location().set_href(routes::HOME);
            }
        });
        #[cfg(not(feature = "hydrate"))]
        {
            let _ = api;
        }
    };

    view! {
        <header class="site-header">
            <a class="site-header__brand" href=routes::HOME>
                "Campus"
            </a>
            <nav class="site-header__nav">
                <a href=routes::HOME>"Programs"</a>
                <Show
                    when=move || auth.get().is_authenticated()
                    fallback=move || {
                        view! {
                            <a href=routes::LOGIN>"Sign in"</a>
                            <a class="btn btn--primary" href=routes::REGISTER>
                                "Apply"
                            </a>
                        }
                    }
                >
                    <a href=dashboard_href>"Dashboard"</a>
                    <span class="site-header__user">{display_name}</span>
                    <button class="btn site-header__logout" on:click=on_logout.clone()>
                        "Logout"
                    </button>
                </Show>
            </nav>
        </header>
    }
}
