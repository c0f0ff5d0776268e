//! Server-only glue between server functions and the `agro-client` services.

pub mod report;
pub mod session;

use leptos::*;

use crate::app::AppState;

/// The [`AppState`] provided to every request.
pub fn app_state() -> Result<AppState, ServerFnError> {
    use_context::<AppState>().ok_or_else(|| ServerFnError::new("Missing AppState"))
}
