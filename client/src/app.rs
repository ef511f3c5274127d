//! Root component, HTML shell and route table.
//!
//! SYSTEM CONTEXT
//! ==============
//! `App` provides the shared contexts (`AppConfig`, `ApiClient`, the auth
//! signal and `Toaster`) before any page mounts, then starts session restore.
//! Access rules for the routes below live in `routes`.

use leptos::prelude::*;
use leptos_meta::{MetaTags, Stylesheet, Title, provide_meta_context};
use leptos_router::components::{Route, Router, Routes};
use leptos_router::{ParamSegment, StaticSegment};

use crate::components::site_header::SiteHeader;
use crate::components::toast_host::ToastHost;
use crate::config::AppConfig;
use crate::net::http::ApiClient;
use crate::net::types::Role;
use crate::pages::classroom::ClassroomPage;
use crate::pages::dashboard::{DashboardPage, RoleDashboard};
use crate::pages::home::HomePage;
use crate::pages::login::LoginPage;
use crate::pages::payment_callback::PaymentCallbackPage;
use crate::pages::register::RegisterPage;
use crate::state::auth::AuthState;
use crate::util::auth::restore_session;
use crate::util::toast::Toaster;

/// Document shell rendered by the server around `App`.
pub fn shell(options: LeptosOptions) -> impl IntoView {
    view! {
        <!DOCTYPE html>
        <html lang="en">
            <head>
                <meta charset="utf-8" />
                <meta name="viewport" content="width=device-width, initial-scale=1" />
                <AutoReload options=options.clone() />
                <HydrationScripts options />
                <MetaTags />
            </head>
            <body>
                <App />
            </body>
        </html>
    }
}

#[component]
pub fn App() -> impl IntoView {
    provide_meta_context();

    let config = AppConfig::from_build_env();
    let api = ApiClient::for_browser(&config);
    let auth = RwSignal::new(AuthState::pending());

    provide_context(config);
    provide_context(api.clone());
    provide_context(auth);
    provide_context(Toaster::new());

    restore_session(auth, api);

    view! {
        <Stylesheet id="leptos" href="/pkg/campus.css" />
        <Title text="Campus" />
        <Router>
            <SiteHeader />
            <main class="app-main">
                <Routes fallback=|| view! { <p class="not-found">"Page not found."</p> }>
                    <Route path=StaticSegment("") view=HomePage />
                    <Route path=StaticSegment("login") view=LoginPage />
                    <Route path=StaticSegment("register") view=RegisterPage />
                    <Route path=StaticSegment("dashboard") view=DashboardPage />
                    <Route
                        path=(StaticSegment("dashboard"), StaticSegment("admin"))
                        view=|| view! { <RoleDashboard role=Role::Admin /> }
                    />
                    <Route
                        path=(StaticSegment("dashboard"), StaticSegment("lecturer"))
                        view=|| view! { <RoleDashboard role=Role::Lecturer /> }
                    />
                    <Route
                        path=(StaticSegment("dashboard"), StaticSegment("student"))
                        view=|| view! { <RoleDashboard role=Role::Student /> }
                    />
                    <Route path=(StaticSegment("classroom"), ParamSegment("id")) view=ClassroomPage />
                    <Route path=(StaticSegment("payment"), StaticSegment("callback")) view=PaymentCallbackPage />
                </Routes>
            </main>
            <ToastHost />
        </Router>
    }
}
