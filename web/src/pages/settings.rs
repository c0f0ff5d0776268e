//! Settings – profile, FAQ and logout.

use leptos::*;
use leptos_router::*;

use crate::session::{logout, use_session};

static FAQS: [(&str, &str); 6] = [
    (
        "What does this app do?",
        "AgriScience helps farmers and agriculture enthusiasts detect plant diseases from \
         leaf images and get crop recommendations based on soil conditions and \
         environmental factors.",
    ),
    (
        "Is my data stored securely?",
        "Accounts are managed by the identity provider. Uploaded images are only \
         forwarded to the analysis service and are not stored.",
    ),
    (
        "How accurate are the AI models?",
        "The models are accurate on their test sets, but can make mistakes. Consult \
         agricultural experts for critical decisions.",
    ),
    (
        "Can I trust the AI predictions?",
        "Use them as a supporting tool alongside professional agricultural advice. \
         Always consider local conditions and expert guidance.",
    ),
    (
        "What image formats are supported?",
        "All common image formats including JPG, PNG, WEBP and GIF. For best results \
         use clear, well-lit images of individual leaves.",
    ),
    (
        "How do I get better crop recommendations?",
        "Provide accurate soil test data and environmental conditions. The more precise \
         your input data, the better the recommendations.",
    ),
];

#[component]
pub fn SettingsPage() -> impl IntoView {
    let session = use_session();
    let navigate = use_navigate();
    let (open_faq, set_open_faq) = create_signal::<Option<usize>>(None);
    let (confirming, set_confirming) = create_signal(false);
    let (leaving, set_leaving) = create_signal(false);

    let display_name = move || {
        session
            .user()
            .map(|u| u.display_name())
            .unwrap_or_else(|| "User".into())
    };
    let email = move || session.user().map(|u| u.email).unwrap_or_default();

    let on_confirm = move |_| {
        let navigate = navigate.clone();
        set_leaving.set(true);
        spawn_local(async move {
            if let Err(e) = logout().await {
                logging::warn!("Logout failed: {e}");
            }
            navigate("/", Default::default());
            session.sign_out();
        });
    };

    view! {
        <div class="settings-page">
            <h1>"Settings"</h1>
            <p class="subtitle">"Manage your profile and get help"</p>

            <section class="card profile">
                <h2>"Profile"</h2>
                <dl>
                    <dt>"Name"</dt>
                    <dd>{display_name}</dd>
                    <dt>"Email"</dt>
                    <dd>{email}</dd>
                </dl>
            </section>

            <section class="card faq">
                <h2>"FAQ"</h2>
                {FAQS
                    .iter()
                    .enumerate()
                    .map(|(i, &(question, answer))| {
                        let is_open = move || open_faq.get() == Some(i);
                        view! {
                            <div class="faq-item" class:open=is_open>
                                <button
                                    class="faq-question"
                                    on:click=move |_| {
                                        set_open_faq.update(|o| {
                                            *o = if *o == Some(i) { None } else { Some(i) }
                                        })
                                    }
                                >
                                    {question}
                                    <span class="faq-caret">{move || if is_open() { "−" } else { "+" }}</span>
                                </button>
                                <Show when=is_open>
                                    <p class="faq-answer">{answer}</p>
                                </Show>
                            </div>
                        }
                    })
                    .collect_view()}
            </section>

            <section class="card">
                <button class="btn btn-danger" on:click=move |_| set_confirming.set(true)>
                    "Logout"
                </button>
            </section>

            <Show when=move || confirming.get()>
                <div class="modal-backdrop">
                    <div class="modal">
                        <h3>"Confirm Logout"</h3>
                        <p>"Are you sure you want to logout?"</p>
                        <div class="modal-actions">
                            <button
                                class="btn btn-outline"
                                on:click=move |_| set_confirming.set(false)
                                disabled=move || leaving.get()
                            >
                                "Cancel"
                            </button>
                            <button
                                class="btn btn-danger"
                                on:click=on_confirm.clone()
                                disabled=move || leaving.get()
                            >
                                {move || if leaving.get() { "Logging out…" } else { "Logout" }}
                            </button>
                        </div>
                    </div>
                </div>
            </Show>
        </div>
    }
}
