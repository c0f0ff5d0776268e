//! Top navigation bar component.

use leptos::*;
use leptos_router::*;

use crate::session::{logout, use_session};

/// Navigation bar shown on the signed-in pages.
#[component]
pub fn Nav() -> impl IntoView {
    let session = use_session();
    let navigate = use_navigate();
    let (menu_open, set_menu_open) = create_signal(false);

    let on_logout = move |_| {
        let navigate = navigate.clone();
        spawn_local(async move {
            if let Err(e) = logout().await {
                logging::warn!("Logout failed: {e}");
            }
            // Leave /app first so the guard does not bounce to the login page.
            navigate("/", Default::default());
            session.sign_out();
        });
    };

    view! {
        <nav class="nav-bar">
            <div class="nav-brand">
                <A href="/app/dashboard" class="nav-logo">"🌾 AgriScience"</A>
            </div>
            <button
                class="nav-toggle"
                on:click=move |_| set_menu_open.update(|open| *open = !*open)
            >
                "☰"
            </button>
            <div class="nav-links" class:open=move || menu_open.get()>
                <A href="/app/dashboard" class="nav-link">"Dashboard"</A>
                <A href="/app/crop" class="nav-link">"Crop Recommendation"</A>
                <A href="/app/disease" class="nav-link">"Disease Detection"</A>
                <A href="/app/settings" class="nav-link">"Settings"</A>
                <button class="btn btn-outline nav-logout" on:click=on_logout>
                    "Logout"
                </button>
            </div>
        </nav>
    }
}
