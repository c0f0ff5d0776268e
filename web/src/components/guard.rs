//! Route guards.

use leptos::*;
use leptos_router::*;

use agro_common::session::{guard, RouteDecision};

use crate::components::loading::LoadingSpinner;
use crate::components::nav::Nav;
use crate::session::use_session;

/// Layout for everything under `/app`: only rendered for a signed-in user,
/// anyone else is sent to the login page.
#[component]
pub fn RequireSession() -> impl IntoView {
    let session = use_session();
    let location = use_location();

    view! {
        <Suspense fallback=move || view! { <LoadingSpinner message="Checking your session…"/> }>
            {move || session.current().map(|state| {
                match guard(&state, &location.pathname.get_untracked()) {
                    RouteDecision::Allow => view! {
                        <Nav/>
                        <div class="app-content">
                            <Outlet/>
                        </div>
                    }.into_view(),
                    RouteDecision::Redirect(to) => view! { <Redirect path=to/> }.into_view(),
                }
            })}
        </Suspense>
    }
}

/// Wraps the login and signup forms: a signed-in user goes to the dashboard.
#[component]
pub fn GuestOnly(children: ChildrenFn) -> impl IntoView {
    let session = use_session();
    let location = use_location();
    let children = store_value(children);

    view! {
        <Suspense fallback=move || view! { <LoadingSpinner message="Loading…"/> }>
            {move || session.current().map(|state| {
                match guard(&state, &location.pathname.get_untracked()) {
                    RouteDecision::Allow => children.with_value(|c| c()).into_view(),
                    RouteDecision::Redirect(to) => view! { <Redirect path=to/> }.into_view(),
                }
            })}
        </Suspense>
    }
}
