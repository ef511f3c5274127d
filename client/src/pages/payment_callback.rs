//! Gateway return page (`/payment/callback`).
//!
//! SYSTEM CONTEXT
//! ==============
//! The gateway redirects here with `reference` (or `trxref`) in the query.
//! `net::payments::verify_pending` settles the payment; a persistent toast
//! covers the request and is replaced by the verdict before navigating on.

#[cfg(test)]
#[path = "payment_callback_test.rs"]
mod payment_callback_test;

use leptos::prelude::*;
use leptos_router::hooks::use_query_map;

use crate::net::payments::VerifyOutcome;
use crate::routes;
use crate::state::auth::AuthState;
use crate::state::toast::ToastKind;

pub const VERIFYING_MESSAGE: &str = "Verifying payment...";

/// `reference` wins over the gateway's `trxref` alias.
pub fn callback_reference(reference: Option<String>, trxref: Option<String>) -> Option<String> {
    reference
        .into_iter()
        .chain(trxref)
        .map(|r| r.trim().to_owned())
        .find(|r| !r.is_empty())
}

pub fn outcome_notice(outcome: &VerifyOutcome) -> (ToastKind, String) {
    match outcome {
        VerifyOutcome::Verified { .. } => (ToastKind::Success, "Payment verified. You are now enrolled.".to_owned()),
        VerifyOutcome::Failed { message, .. } => (ToastKind::Error, message.clone()),
        VerifyOutcome::NothingPending => (ToastKind::Info, "No pending payment to verify".to_owned()),
    }
}

/// Where to go once the verdict is shown.
pub fn outcome_target(outcome: &VerifyOutcome, auth: &AuthState) -> String {
    match outcome {
        VerifyOutcome::Verified { .. } => match auth.role() {
            Some(role) => role.dashboard_path().to_owned(),
            None => routes::DASHBOARD.to_owned(),
        },
        VerifyOutcome::Failed { .. } | VerifyOutcome::NothingPending => routes::HOME.to_owned(),
    }
}

#[component]
pub fn PaymentCallbackPage() -> impl IntoView {
    let query = use_query_map();
    let reference = query.with_untracked(|q| callback_reference(q.get("reference"), q.get("trxref")));

    #[cfg(feature = "hydrate")]
    {
        use crate::state::toast::ToastOptions;

        let api = expect_context::<crate::net::http::ApiClient>();
        let auth = expect_context::<RwSignal<AuthState>>();
        let toaster = crate::util::toast::use_toaster();
        let navigate = leptos_router::hooks::use_navigate();
        leptos::task::spawn_local(async move {
            let pending = toaster.push(VERIFYING_MESSAGE, ToastOptions::persistent(ToastKind::Info));
            let outcome = crate::net::payments::verify_pending(&api, reference.as_deref()).await;
            toaster.remove(pending);

            let (kind, message) = outcome_notice(&outcome);
            toaster.push(message, ToastOptions::kind(kind));
            let target = auth.with_untracked(|a| outcome_target(&outcome, a));
            navigate(&target, leptos_router::NavigateOptions { replace: true, ..Default::default() });
        });
    }
    #[cfg(not(feature = "hydrate"))]
    let _ = reference;

    view! {
        <div class="payment-callback">
            <p>{VERIFYING_MESSAGE}</p>
        </div>
    }
}
