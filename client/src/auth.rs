//! Identity provider clients.
//!
//! The web server only needs two operations from the provider: exchange an
//! email/password for a verified identity, and create an account.  Sign-out
//! is local (the server forgets its session), so it is not part of the trait.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use anyhow::{Context, Result};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use agro_common::config::{AuthMode, Config};
use agro_common::error::AuthError;
use agro_common::session::SessionUser;

/// A verified identity plus the provider's bearer token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProviderSession {
    pub user: SessionUser,
    pub id_token: String,
}

#[async_trait]
pub trait AuthProvider: Send + Sync {
    async fn sign_in(&self, email: &str, password: &str) -> Result<ProviderSession, AuthError>;

    async fn sign_up(&self, email: &str, password: &str) -> Result<ProviderSession, AuthError>;
}

/// Pick the provider named by `AUTH_MODE`.
pub fn from_config(config: &Config) -> Result<Arc<dyn AuthProvider>> {
    match config.auth_mode {
        AuthMode::Firebase => {
            let key = config
                .firebase_api_key
                .clone()
                .context("AUTH_MODE=firebase requires FIREBASE_API_KEY")?;
            let http = reqwest::Client::builder()
                .timeout(config.request_timeout())
                .build()
                .context("Cannot create HTTP client")?;
            Ok(Arc::new(FirebaseAuth::new(http, key)))
        }
        AuthMode::Memory => {
            warn!("Using in-memory accounts – do not use in production");
            Ok(Arc::new(MemoryAuth::default()))
        }
    }
}

// ─── Firebase Identity Toolkit ───────────────────────────────────────────────

pub const IDENTITY_TOOLKIT_URL: &str = "https://identitytoolkit.googleapis.com/v1";

/// Email/password auth over the Identity Toolkit REST API.
pub struct FirebaseAuth {
    http: reqwest::Client,
    api_key: String,
    endpoint: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct PasswordRequest<'a> {
    email: &'a str,
    password: &'a str,
    return_secure_token: bool,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct PasswordResponse {
    local_id: String,
    email: String,
    id_token: String,
}

#[derive(Deserialize)]
struct ErrorEnvelope {
    error: ErrorBody,
}

#[derive(Deserialize)]
struct ErrorBody {
    message: String,
}

impl FirebaseAuth {
    pub fn new(http: reqwest::Client, api_key: String) -> Self {
        Self::with_endpoint(http, api_key, IDENTITY_TOOLKIT_URL)
    }

    pub fn with_endpoint(http: reqwest::Client, api_key: String, endpoint: &str) -> Self {
        FirebaseAuth {
            http,
            api_key,
            endpoint: endpoint.trim_end_matches('/').to_string(),
        }
    }

    async fn password_call(
        &self,
        method: &str,
        email: &str,
        password: &str,
    ) -> Result<ProviderSession, AuthError> {
        let url = format!("{}/accounts:{method}?key={}", self.endpoint, self.api_key);
        let resp = self
            .http
            .post(&url)
            .json(&PasswordRequest {
                email,
                password,
                return_secure_token: true,
            })
            .send()
            .await
            .map_err(|e| AuthError::Provider(e.to_string()))?;

        if !resp.status().is_success() {
            let status = resp.status();
            let code = resp
                .json::<ErrorEnvelope>()
                .await
                .map(|env| env.error.message)
                .unwrap_or_else(|_| format!("HTTP {status}"));
            warn!("Identity provider {method} failed: {code}");
            return Err(AuthError::from_provider_code(&code));
        }

        let body: PasswordResponse = resp
            .json()
            .await
            .map_err(|e| AuthError::Provider(e.to_string()))?;
        info!("Identity provider {method} ok for {}", body.email);
        Ok(ProviderSession {
            user: SessionUser {
                user_id: body.local_id,
                email: body.email,
            },
            id_token: body.id_token,
        })
    }
}

#[async_trait]
impl AuthProvider for FirebaseAuth {
    async fn sign_in(&self, email: &str, password: &str) -> Result<ProviderSession, AuthError> {
        self.password_call("signInWithPassword", email, password).await
    }

    async fn sign_up(&self, email: &str, password: &str) -> Result<ProviderSession, AuthError> {
        self.password_call("signUp", email, password).await
    }
}

// ─── In-memory accounts ──────────────────────────────────────────────────────

/// Process-local accounts with the provider's validation rules.
#[derive(Default)]
pub struct MemoryAuth {
    /// email → (password, user id)
    accounts: Mutex<HashMap<String, (String, String)>>,
}

const MIN_PASSWORD_LEN: usize = 6;

fn normalise_email(email: &str) -> Result<String, AuthError> {
    let email = email.trim().to_lowercase();
    match email.split_once('@') {
        Some((local, domain)) if !local.is_empty() && domain.contains('.') => Ok(email),
        _ => Err(AuthError::InvalidEmail),
    }
}

#[async_trait]
impl AuthProvider for MemoryAuth {
    async fn sign_in(&self, email: &str, password: &str) -> Result<ProviderSession, AuthError> {
        let email = normalise_email(email)?;
        let accounts = self
            .accounts
            .lock()
            .map_err(|_| AuthError::Provider("account table poisoned".into()))?;
        match accounts.get(&email) {
            Some((stored, user_id)) if stored == password => Ok(ProviderSession {
                user: SessionUser {
                    user_id: user_id.clone(),
                    email,
                },
                id_token: uuid::Uuid::new_v4().to_string(),
            }),
            _ => Err(AuthError::InvalidCredentials),
        }
    }

    async fn sign_up(&self, email: &str, password: &str) -> Result<ProviderSession, AuthError> {
        let email = normalise_email(email)?;
        if password.chars().count() < MIN_PASSWORD_LEN {
            return Err(AuthError::WeakPassword(format!(
                "Password should be at least {MIN_PASSWORD_LEN} characters"
            )));
        }
        let mut accounts = self
            .accounts
            .lock()
            .map_err(|_| AuthError::Provider("account table poisoned".into()))?;
        if accounts.contains_key(&email) {
            return Err(AuthError::EmailExists);
        }
        let user_id = uuid::Uuid::new_v4().simple().to_string();
        accounts.insert(email.clone(), (password.to_string(), user_id.clone()));
        info!("Created in-memory account for {email}");
        Ok(ProviderSession {
            user: SessionUser { user_id, email },
            id_token: uuid::Uuid::new_v4().to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use axum::extract::{Path, Query};
    use axum::http::StatusCode;
    use axum::response::IntoResponse;
    use axum::routing::post;
    use axum::{Json, Router};
    use serde_json::{json, Value};

    async fn spawn_stub(router: Router) -> String {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, router).await.unwrap();
        });
        format!("http://{addr}")
    }

    async fn toolkit(
        Path(method): Path<String>,
        Query(q): Query<HashMap<String, String>>,
        Json(body): Json<Value>,
    ) -> axum::response::Response {
        assert_eq!(q.get("key").map(String::as_str), Some("test-key"));
        assert_eq!(body["returnSecureToken"], json!(true));
        match (method.as_str(), body["password"].as_str()) {
            ("accounts:signInWithPassword", Some("hunter22")) => Json(json!({
                "localId": "abc123",
                "email": body["email"],
                "idToken": "token-1",
                "refreshToken": "r",
                "expiresIn": "3600"
            }))
            .into_response(),
            ("accounts:signInWithPassword", _) => (
                StatusCode::BAD_REQUEST,
                Json(json!({"error": {"code": 400, "message": "INVALID_LOGIN_CREDENTIALS"}})),
            )
                .into_response(),
            _ => (
                StatusCode::BAD_REQUEST,
                Json(json!({"error": {"code": 400, "message": "EMAIL_EXISTS"}})),
            )
                .into_response(),
        }
    }

    async fn firebase() -> FirebaseAuth {
        let router = Router::new().route("/:method", post(toolkit));
        let base = spawn_stub(router).await;
        FirebaseAuth::with_endpoint(reqwest::Client::new(), "test-key".into(), &base)
    }

    #[tokio::test]
    async fn test_firebase_sign_in() {
        let auth = firebase().await;
        let session = auth.sign_in("grower@farm.example", "hunter22").await.unwrap();
        assert_eq!(session.user.user_id, "abc123");
        assert_eq!(session.user.email, "grower@farm.example");
        assert_eq!(session.id_token, "token-1");
    }

    #[tokio::test]
    async fn test_firebase_error_codes() {
        let auth = firebase().await;
        assert_eq!(
            auth.sign_in("grower@farm.example", "wrong").await.unwrap_err(),
            AuthError::InvalidCredentials
        );
        assert_eq!(
            auth.sign_up("grower@farm.example", "hunter22").await.unwrap_err(),
            AuthError::EmailExists
        );
    }

    #[tokio::test]
    async fn test_memory_sign_up_then_in() {
        let auth = MemoryAuth::default();
        let created = auth.sign_up("Grower@Farm.example", "secret1").await.unwrap();
        assert_eq!(created.user.email, "grower@farm.example");

        let session = auth.sign_in("grower@farm.example", "secret1").await.unwrap();
        assert_eq!(session.user.user_id, created.user.user_id);

        assert_eq!(
            auth.sign_in("grower@farm.example", "nope").await.unwrap_err(),
            AuthError::InvalidCredentials
        );
        assert_eq!(
            auth.sign_up("grower@farm.example", "secret1").await.unwrap_err(),
            AuthError::EmailExists
        );
    }

    #[tokio::test]
    async fn test_memory_validation() {
        let auth = MemoryAuth::default();
        assert_eq!(
            auth.sign_up("not-an-email", "secret1").await.unwrap_err(),
            AuthError::InvalidEmail
        );
        assert!(matches!(
            auth.sign_up("a@b.example", "123").await.unwrap_err(),
            AuthError::WeakPassword(_)
        ));
    }
}
