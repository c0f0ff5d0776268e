//! Signed-in state and the route guard built on it.

use serde::{Deserialize, Serialize};

pub const LOGIN_PATH: &str = "/login";
pub const SIGNUP_PATH: &str = "/signup";
pub const APP_PREFIX: &str = "/app";
pub const DASHBOARD_PATH: &str = "/app/dashboard";

/// The identity the provider vouched for.
///
/// The provider's ID token never leaves the server, so it is not part of
/// this type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionUser {
    pub user_id: String,
    pub email: String,
}

impl SessionUser {
    /// Local part of the email, or `"User"`.
    pub fn display_name(&self) -> String {
        self.email
            .split('@')
            .next()
            .filter(|s| !s.is_empty())
            .unwrap_or("User")
            .to_string()
    }
}

/// `SignedOut → SignedIn → SignedOut`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum SessionState {
    #[default]
    SignedOut,
    SignedIn(SessionUser),
}

impl SessionState {
    pub fn user(&self) -> Option<&SessionUser> {
        match self {
            SessionState::SignedOut => None,
            SessionState::SignedIn(user) => Some(user),
        }
    }

    pub fn is_signed_in(&self) -> bool {
        matches!(self, SessionState::SignedIn(_))
    }

    /// Replaces any previous user.
    pub fn sign_in(&mut self, user: SessionUser) {
        *self = SessionState::SignedIn(user);
    }

    pub fn sign_out(&mut self) {
        *self = SessionState::SignedOut;
    }
}

/// What the router should do with a navigation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RouteDecision {
    Allow,
    Redirect(&'static str),
}

/// Gate `path` on the session.
///
/// Everything under `/app` needs a signed-in user; the login and signup
/// pages bounce a signed-in user to the dashboard, as does `/app` itself.
pub fn guard(state: &SessionState, path: &str) -> RouteDecision {
    let path = match path.trim_end_matches('/') {
        "" => "/",
        p => p,
    };
    let protected = path == APP_PREFIX || path.starts_with("/app/");

    match (state.is_signed_in(), path) {
        (false, _) if protected => RouteDecision::Redirect(LOGIN_PATH),
        (true, LOGIN_PATH | SIGNUP_PATH | APP_PREFIX) => RouteDecision::Redirect(DASHBOARD_PATH),
        _ => RouteDecision::Allow,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn alice() -> SessionUser {
        SessionUser {
            user_id: "u1".into(),
            email: "alice@farm.example".into(),
        }
    }

    #[test]
    fn test_lifecycle() {
        let mut state = SessionState::default();
        assert!(!state.is_signed_in());
        state.sign_in(alice());
        assert_eq!(state.user().map(|u| u.display_name()), Some("alice".into()));
        state.sign_out();
        assert_eq!(state, SessionState::SignedOut);
    }

    #[test]
    fn test_signed_out_is_redirected_from_app() {
        let state = SessionState::SignedOut;
        for path in ["/app", "/app/", "/app/crop", "/app/disease", "/app/settings"] {
            assert_eq!(guard(&state, path), RouteDecision::Redirect(LOGIN_PATH), "{path}");
        }
        assert_eq!(guard(&state, "/"), RouteDecision::Allow);
        assert_eq!(guard(&state, "/login"), RouteDecision::Allow);
        assert_eq!(guard(&state, "/application"), RouteDecision::Allow);
    }

    #[test]
    fn test_signed_in_skips_login() {
        let state = SessionState::SignedIn(alice());
        assert_eq!(guard(&state, "/app/crop"), RouteDecision::Allow);
        assert_eq!(guard(&state, "/login"), RouteDecision::Redirect(DASHBOARD_PATH));
        assert_eq!(guard(&state, "/app"), RouteDecision::Redirect(DASHBOARD_PATH));
        assert_eq!(guard(&state, "/"), RouteDecision::Allow);
    }

    #[test]
    fn test_display_name_fallback() {
        let user = SessionUser {
            user_id: "u2".into(),
            email: "".into(),
        };
        assert_eq!(user.display_name(), "User");
    }
}
