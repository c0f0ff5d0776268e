//! Root Leptos application component with routing.

use leptos::*;
use leptos_meta::*;
use leptos_router::*;

use crate::components::guard::RequireSession;
use crate::pages::{
    crop::CropPage, dashboard::DashboardPage, disease::DiseasePage, landing::LandingPage,
    login::LoginPage, settings::SettingsPage, signup::SignupPage,
};
use crate::session::provide_session;

/// Server-side application state, provided as Leptos context for server functions.
#[derive(Clone)]
#[cfg(feature = "ssr")]
pub struct AppState {
    pub config: agro_common::config::Config,
    pub analyzer: agro_client::inference::Analyzer,
    pub auth: std::sync::Arc<dyn agro_client::auth::AuthProvider>,
    pub sessions: agro_client::sessions::SessionStore,
    pub leptos_options: leptos::LeptosOptions,
}

/// Dummy state for the client – never actually constructed on WASM, but the
/// type must exist so server functions can reference it in their signatures.
#[derive(Clone, Debug)]
#[cfg(not(feature = "ssr"))]
pub struct AppState;

/// The root `<App/>` component.
#[component]
pub fn App() -> impl IntoView {
    provide_meta_context();
    provide_session();

    view! {
        <Stylesheet id="leptos" href="/pkg/agro-web.css"/>
        <Title text="AgriScience – Smart Farming Assistant"/>
        <Meta name="viewport" content="width=device-width, initial-scale=1"/>
        <Meta name="description" content="Crop recommendation and plant disease detection"/>

        <Router>
            <main class="main-content">
                <Routes>
                    <Route path="/" view=LandingPage/>
                    <Route path="/login" view=LoginPage/>
                    <Route path="/signup" view=SignupPage/>
                    <Route path="/app" view=RequireSession>
                        <Route path="" view=|| view! { <Redirect path="/app/dashboard"/> }/>
                        <Route path="dashboard" view=DashboardPage/>
                        <Route path="crop" view=CropPage/>
                        <Route path="disease" view=DiseasePage/>
                        <Route path="settings" view=SettingsPage/>
                    </Route>
                </Routes>
            </main>
        </Router>
    }
}
