//! HTTP clients for the FinPay platform services.
//!
//! All traffic goes through the API gateway; each backend service owns a path
//! prefix:
//! - `/auth-services` — registration, login, user listing
//! - `/accounts`      — account lookup, creation, debit/credit
//! - `/transactions`  — transfer history and submission
//! - `/frauds`        — fraud checks and stored outcomes
//!
//! ## Design
//! - One `ApiClient` (reqwest) shared by the account/transaction/fraud
//!   endpoints; it attaches the bearer token from the session store when a
//!   session exists.
//! - Authentication endpoints live on a separate `HttpAuthBackend` so the
//!   session core can be constructed before any authenticated client.
//! - A rejected response never mutates the session; token validity is
//!   discovered lazily and the operator re-runs `login`.

use crate::config::Config;
use crate::session::SessionStore;
use std::sync::Arc;
use std::time::Duration;

pub mod accounts;
pub mod auth;
pub mod fraud;
pub mod transactions;

pub use auth::{AuthBackend, AuthResponse, HttpAuthBackend, LoginRequest, RegisterRequest, UserRecord};

// ── Error taxonomy ───────────────────────────────────────────────

/// Failures surfaced by the platform clients.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// Bad credentials, or the backend responded without a token.
    #[error("authentication failed: {0}")]
    Authentication(String),

    /// The backend rejected new-account creation (e.g. duplicate username).
    #[error("registration rejected: {0}")]
    Registration(String),

    /// Network failure, unreachable backend, or any other rejection the
    /// client does not distinguish further.
    #[error("transport failure: {0}")]
    Transport(String),
}

impl From<reqwest::Error> for ApiError {
    fn from(err: reqwest::Error) -> Self {
        Self::Transport(err.to_string())
    }
}

/// Drain a rejected response into a readable failure message.
pub(crate) async fn reject_body(resp: reqwest::Response) -> String {
    let status = resp.status();
    let body = resp.text().await.unwrap_or_default();
    if body.is_empty() {
        format!("({status})")
    } else {
        format!("({status}): {body}")
    }
}

/// Build the shared HTTP client with an explicit request timeout.
pub(crate) fn http_client(timeout_secs: u64) -> Result<reqwest::Client, ApiError> {
    Ok(reqwest::Client::builder()
        .timeout(Duration::from_secs(timeout_secs))
        .build()?)
}

// ── Shared platform client ───────────────────────────────────────

/// HTTP client for the authenticated platform endpoints.
pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
    session: Arc<SessionStore>,
}

impl ApiClient {
    /// Create a client against the configured gateway.
    pub fn new(config: &Config, session: Arc<SessionStore>) -> Result<Self, ApiError> {
        Ok(Self {
            http: http_client(config.request_timeout_secs)?,
            base_url: config.api_base_url.trim_end_matches('/').to_string(),
            session,
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Attach `Authorization: Bearer <token>` when a session exists.
    fn authorize(&self, request: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match self.session.token() {
            Some(token) => request.header("Authorization", format!("Bearer {token}")),
            None => request,
        }
    }

    pub(crate) async fn get_json<T: serde::de::DeserializeOwned>(
        &self,
        path: &str,
    ) -> Result<T, ApiError> {
        let resp = self.authorize(self.http.get(self.url(path))).send().await?;
        if !resp.status().is_success() {
            return Err(ApiError::Transport(format!(
                "GET {path} failed {}",
                reject_body(resp).await
            )));
        }
        Ok(resp.json().await?)
    }

    pub(crate) async fn post_json<T, B>(&self, path: &str, body: &B) -> Result<T, ApiError>
    where
        T: serde::de::DeserializeOwned,
        B: serde::Serialize + ?Sized,
    {
        let resp = self
            .authorize(self.http.post(self.url(path)).json(body))
            .send()
            .await?;
        if !resp.status().is_success() {
            return Err(ApiError::Transport(format!(
                "POST {path} failed {}",
                reject_body(resp).await
            )));
        }
        Ok(resp.json().await?)
    }
}

// ── Test helpers ─────────────────────────────────────────────────


// ── Tests ────────────────────────────────────────────────────────
