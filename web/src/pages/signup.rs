//! Signup page.

use leptos::*;
use leptos_router::*;

use crate::components::guard::GuestOnly;
use crate::components::notice::ErrorNotice;
use crate::session::{signup, use_session};

/// Client-side check before the provider is asked.
fn confirm_error(password: &str, confirm: &str) -> Option<&'static str> {
    (password != confirm).then_some("Passwords do not match")
}

#[component]
pub fn SignupPage() -> impl IntoView {
    let session = use_session();
    let (email, set_email) = create_signal(String::new());
    let (password, set_password) = create_signal(String::new());
    let (confirm, set_confirm) = create_signal(String::new());
    let (pending, set_pending) = create_signal(false);
    let (error_msg, set_error_msg) = create_signal::<Option<String>>(None);

    let on_submit = move |ev: ev::SubmitEvent| {
        ev.prevent_default();
        if pending.get_untracked() {
            return;
        }
        let password = password.get_untracked();
        if let Some(msg) = confirm_error(&password, &confirm.get_untracked()) {
            set_error_msg.set(Some(msg.into()));
            return;
        }
        set_error_msg.set(None);
        set_pending.set(true);
        let email = email.get_untracked();
        spawn_local(async move {
            match signup(email, password).await {
                Ok(Ok(user)) => session.sign_in(user),
                Ok(Err(e)) => set_error_msg.set(Some(e.to_string())),
                Err(e) => set_error_msg.set(Some(format!("Sign-up failed: {e}"))),
            }
            set_pending.set(false);
        });
    };

    view! {
        <GuestOnly>
            <div class="auth-page">
                <form class="card auth-card" on:submit=on_submit>
                    <h1>"Create your account"</h1>
                    <p class="subtitle">"Start making data-driven farming decisions"</p>

                    {move || error_msg.get().map(|msg| view! { <ErrorNotice message=msg/> })}

                    <label>
                        "Email"
                        <input
                            type="email"
                            required
                            autocomplete="email"
                            prop:value=move || email.get()
                            on:input=move |ev| set_email.set(event_target_value(&ev))
                        />
                    </label>
                    <label>
                        "Password"
                        <input
                            type="password"
                            required
                            minlength="6"
                            autocomplete="new-password"
                            prop:value=move || password.get()
                            on:input=move |ev| set_password.set(event_target_value(&ev))
                        />
                    </label>
                    <label>
                        "Confirm password"
                        <input
                            type="password"
                            required
                            autocomplete="new-password"
                            prop:value=move || confirm.get()
                            on:input=move |ev| set_confirm.set(event_target_value(&ev))
                        />
                    </label>

                    <button type="submit" class="btn btn-primary" disabled=move || pending.get()>
                        {move || if pending.get() { "Creating account…" } else { "Sign Up" }}
                    </button>
                    <p class="auth-switch">
                        "Already have an account? " <A href="/login">"Sign in"</A>
                    </p>
                </form>
            </div>
        </GuestOnly>
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_confirm_error() {
        assert_eq!(confirm_error("secret1", "secret1"), None);
        assert_eq!(confirm_error("secret1", "secret2"), Some("Passwords do not match"));
    }
}
