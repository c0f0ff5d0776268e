//! Login page.

use leptos::*;
use leptos_router::*;

use crate::components::guard::GuestOnly;
use crate::components::notice::ErrorNotice;
use crate::session::{login, use_session};

#[component]
pub fn LoginPage() -> impl IntoView {
    let session = use_session();
    let (email, set_email) = create_signal(String::new());
    let (password, set_password) = create_signal(String::new());
    let (pending, set_pending) = create_signal(false);
    let (error_msg, set_error_msg) = create_signal::<Option<String>>(None);

    let on_submit = move |ev: ev::SubmitEvent| {
        ev.prevent_default();
        if pending.get_untracked() {
            return;
        }
        set_error_msg.set(None);
        set_pending.set(true);
        let (email, password) = (email.get_untracked(), password.get_untracked());
        spawn_local(async move {
            match login(email, password).await {
                // The guard takes a signed-in user on to the dashboard.
                Ok(Ok(user)) => session.sign_in(user),
                Ok(Err(e)) => set_error_msg.set(Some(e.to_string())),
                Err(e) => set_error_msg.set(Some(format!("Login failed: {e}"))),
            }
            set_pending.set(false);
        });
    };

    view! {
        <GuestOnly>
            <div class="auth-page">
                <form class="card auth-card" on:submit=on_submit>
                    <h1>"Welcome back"</h1>
                    <p class="subtitle">"Sign in to your AgriScience account"</p>

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
                            autocomplete="current-password"
                            prop:value=move || password.get()
                            on:input=move |ev| set_password.set(event_target_value(&ev))
                        />
                    </label>

                    <button type="submit" class="btn btn-primary" disabled=move || pending.get()>
                        {move || if pending.get() { "Signing in…" } else { "Sign In" }}
                    </button>
                    <p class="auth-switch">
                        "Don't have an account? " <A href="/signup">"Sign up"</A>
                    </p>
                </form>
            </div>
        </GuestOnly>
    }
}
