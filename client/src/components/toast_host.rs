//! Fixed-position stack rendering the toast context.

use leptos::prelude::*;

use crate::util::toast::use_toaster;

#[component]
pub fn ToastHost() -> impl IntoView {
    let toaster = use_toaster();

    view! {
        <div class="toast-host" role="status" aria-live="polite">
            <For each=move || toaster.toasts() key=|toast| toast.id let:toast>
                <div class=toast.kind.css_class()>
                    <span class="toast__message">{toast.message.clone()}</span>
                    <button
                        class="toast__close"
                        title="Dismiss"
                        aria-label="Dismiss"
                        on:click=move |_| toaster.remove(toast.id)
                    >
                        "✕"
                    </button>
                </div>
            </For>
        </div>
    }
}
