//! Student self-registration.

use leptos::prelude::*;

use crate::net::http::ApiClient;
use crate::routes;
use crate::state::auth::AuthState;
use crate::util::toast::use_toaster;
use crate::util::validation::{RegistrationForm, validate_registration};

type Getter = fn(&RegistrationForm) -> String;
type Setter = fn(&mut RegistrationForm, String);

fn form_field(
    form: RwSignal<RegistrationForm>,
    label: &'static str,
    kind: &'static str,
    get: Getter,
    set: Setter,
) -> impl IntoView {
    view! {
        <label class="auth-form__field">
            {label}
            <input
                type=kind
                prop:value=move || form.with(get)
                on:input=move |ev| {
                    let value = event_target_value(&ev);
                    form.update(|f| set(f, value));
                }
            />
        </label>
    }
}

#[component]
pub fn RegisterPage() -> impl IntoView {
    let api = expect_context::<ApiClient>();
    let auth = expect_context::<RwSignal<AuthState>>();
    let toaster = use_toaster();
    let form = RwSignal::new(RegistrationForm::default());
    let error = RwSignal::new(None::<String>);
    let busy = RwSignal::new(false);

    super::login::install_signed_in_redirect(auth);

    let on_submit = move |ev: leptos::ev::SubmitEvent| {
        ev.prevent_default();
        if busy.get_untracked() {
            return;
        }
        let registration = match form.with_untracked(validate_registration) {
            Ok(registration) => registration,
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
            match crate::net::auth::register_student(&api, &registration).await {
                Ok(session) => {
                    toaster.success("Account created");
                    crate::util::auth::sign_in(auth, session);
                }
                Err(err) => {
                    super::login::report_auth_failure(toaster, error, &err, "Registration failed");
                }
            }
            busy.set(false);
        });
        #[cfg(not(feature = "hydrate"))]
        {
            let _ = (api, registration, toaster);
        }
    };

    view! {
        <div class="auth-page">
            <div class="auth-card">
                <h1>"Create a student account"</h1>
                <form class="auth-form" on:submit=on_submit>
                    {form_field(form, "First name", "text", |f| f.first_name.clone(), |f, v| f.first_name = v)}
                    {form_field(form, "Last name", "text", |f| f.last_name.clone(), |f, v| f.last_name = v)}
                    {form_field(form, "Email", "email", |f| f.email.clone(), |f, v| f.email = v)}
                    {form_field(form, "Phone (optional)", "tel", |f| f.phone.clone(), |f, v| f.phone = v)}
                    {form_field(form, "Password", "password", |f| f.password.clone(), |f, v| f.password = v)}
                    {form_field(
                        form,
                        "Confirm password",
                        "password",
                        |f| f.confirm_password.clone(),
                        |f, v| f.confirm_password = v,
                    )}
                    <Show when=move || error.get().is_some()>
                        <p class="auth-form__error">{move || error.get().unwrap_or_default()}</p>
                    </Show>
                    <button class="btn btn--primary" type="submit" disabled=move || busy.get()>
                        {move || if busy.get() { "Creating account..." } else { "Create account" }}
                    </button>
                </form>
                <p class="auth-card__switch">
                    "Already registered? "
                    <a href=routes::LOGIN>"Sign in"</a>
                </p>
            </div>
        </div>
    }
}
