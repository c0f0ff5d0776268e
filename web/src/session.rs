//! Session context shared by every page, and the server functions behind it.

use leptos::*;

use agro_common::session::{SessionState, SessionUser};

use crate::model::AuthOutcome;

// ─── Server functions ────────────────────────────────────────────────────────

#[server(GetSession, "/api")]
pub async fn get_session() -> Result<SessionState, ServerFnError> {
    use crate::server::{app_state, session::current_user};

    let state = app_state()?;
    Ok(match current_user(&state).await? {
        Some(user) => SessionState::SignedIn(user),
        None => SessionState::SignedOut,
    })
}

#[server(Login, "/api")]
pub async fn login(email: String, password: String) -> Result<AuthOutcome, ServerFnError> {
    use crate::server::{app_state, session::set_session_cookie};

    let state = app_state()?;
    match state.auth.sign_in(&email, &password).await {
        Ok(provider) => {
            let user = provider.user.clone();
            let token = state.sessions.create(provider).await;
            set_session_cookie(token)?;
            tracing::info!("User {} signed in", user.user_id);
            Ok(Ok(user))
        }
        Err(e) => {
            tracing::info!("Sign-in rejected: {e}");
            Ok(Err(e))
        }
    }
}

#[server(Signup, "/api")]
pub async fn signup(email: String, password: String) -> Result<AuthOutcome, ServerFnError> {
    use crate::server::{app_state, session::set_session_cookie};

    let state = app_state()?;
    match state.auth.sign_up(&email, &password).await {
        Ok(provider) => {
            let user = provider.user.clone();
            let token = state.sessions.create(provider).await;
            set_session_cookie(token)?;
            tracing::info!("Account {} created", user.user_id);
            Ok(Ok(user))
        }
        Err(e) => {
            tracing::info!("Sign-up rejected: {e}");
            Ok(Err(e))
        }
    }
}

#[server(Logout, "/api")]
pub async fn logout() -> Result<(), ServerFnError> {
    use crate::server::{app_state, session::clear_session_cookie, session::request_token};

    let state = app_state()?;
    if let Some(token) = request_token().await? {
        state.sessions.remove(&token).await;
    }
    clear_session_cookie()
}

// ─── Client-side handle ──────────────────────────────────────────────────────

/// Session as seen by the UI: the state the server reported on first load,
/// overridden by any sign-in or sign-out made since.
#[derive(Clone, Copy)]
pub struct SessionHandle {
    initial: Resource<(), Result<SessionState, ServerFnError>>,
    local: RwSignal<Option<SessionState>>,
}

impl SessionHandle {
    /// `None` while the initial lookup is still in flight.
    pub fn current(&self) -> Option<SessionState> {
        if let Some(state) = self.local.get() {
            return Some(state);
        }
        self.initial.get().map(|r| r.unwrap_or_default())
    }

    pub fn user(&self) -> Option<SessionUser> {
        self.current().and_then(|s| s.user().cloned())
    }

    pub fn sign_in(&self, user: SessionUser) {
        let mut state = SessionState::default();
        state.sign_in(user);
        self.local.set(Some(state));
    }

    pub fn sign_out(&self) {
        self.local.set(Some(SessionState::SignedOut));
    }
}

/// Create the session context.  Called once, from the root component.
pub fn provide_session() -> SessionHandle {
    let handle = SessionHandle {
        initial: create_resource(|| (), |_| async { get_session().await }),
        local: create_rw_signal(None),
    };
    provide_context(handle);
    handle
}

pub fn use_session() -> SessionHandle {
    expect_context::<SessionHandle>()
}
