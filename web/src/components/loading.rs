use leptos::*;

#[component]
pub fn LoadingSpinner(#[prop(into)] message: String) -> impl IntoView {
    view! {
        <div class="loading">
            <span class="spinner"></span>
            <p>{message}</p>
        </div>
    }
}
