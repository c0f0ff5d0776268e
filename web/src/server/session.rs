//! Cookie handling for server functions.

use axum::http::{header, HeaderValue};
use axum_extra::extract::cookie::{Cookie, CookieJar};
use leptos::*;
use leptos_axum::ResponseOptions;

use agro_client::sessions::{removal_cookie, session_cookie, token_from_jar};
use agro_common::session::SessionUser;

use crate::app::AppState;

/// Session token from the request's cookies, if any.
pub async fn request_token() -> Result<Option<String>, ServerFnError> {
    let jar: CookieJar = leptos_axum::extract().await?;
    Ok(token_from_jar(&jar))
}

/// The signed-in user for this request, if the cookie names a live session.
pub async fn current_user(state: &AppState) -> Result<Option<SessionUser>, ServerFnError> {
    let Some(token) = request_token().await? else {
        return Ok(None);
    };
    Ok(state.sessions.get(&token).await.map(|s| s.user))
}

/// Like [`current_user`] but fails the call for anonymous requests.
pub async fn require_user(state: &AppState) -> Result<SessionUser, ServerFnError> {
    current_user(state)
        .await?
        .ok_or_else(|| ServerFnError::new("Not signed in"))
}

pub fn set_session_cookie(token: String) -> Result<(), ServerFnError> {
    append_set_cookie(session_cookie(token))
}

pub fn clear_session_cookie() -> Result<(), ServerFnError> {
    append_set_cookie(removal_cookie())
}

fn append_set_cookie(cookie: Cookie<'static>) -> Result<(), ServerFnError> {
    let response = expect_context::<ResponseOptions>();
    let value = HeaderValue::from_str(&cookie.to_string())
        .map_err(|e| ServerFnError::new(format!("Bad cookie: {e}")))?;
    response.append_header(header::SET_COOKIE, value);
    Ok(())
}
