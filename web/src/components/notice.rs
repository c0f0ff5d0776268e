//! Banners shared by the analysis pages.

use leptos::*;

/// Marks a result as demo data so it is never mistaken for an inference.
#[component]
pub fn PlaceholderNotice(#[prop(into)] reason: String) -> impl IntoView {
    view! {
        <div class="notice notice-demo">
            <strong>"Demo data"</strong>
            " – the analysis service could not be reached, so these values are "
            "illustrative only. "
            <span class="notice-reason">"(" {reason} ")"</span>
        </div>
    }
}

#[component]
pub fn ErrorNotice(#[prop(into)] message: String) -> impl IntoView {
    view! { <div class="notice notice-error">{message}</div> }
}
