//! Authentication endpoints (`/auth-services`).
//!
//! The session core talks to the backend exclusively through the
//! `AuthBackend` trait so tests can script the two-step register/login
//! protocol without a network.

use super::{http_client, reject_body, ApiError};
use crate::config::Config;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

// ── Wire models ──────────────────────────────────────────────────

/// Login credentials.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

/// New-account profile submitted on registration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub username: String,
    pub password: String,
    pub role: String,
    pub location: String,
}

/// Login response. The token is optional on the wire: a 200 without a token
/// is still an authentication failure and the caller must treat it as one.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthResponse {
    #[serde(default)]
    pub token: Option<String>,
}

/// User record as returned by the auth service. Authoritative for username
/// and role after registration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserRecord {
    #[serde(default)]
    pub id: Option<i64>,
    pub username: String,
    #[serde(default)]
    pub email: Option<String>,
    pub role: String,
    /// Creation timestamp as sent by the backend. Kept opaque: the auth
    /// service emits local date-times without an offset, so it is displayed
    /// verbatim rather than parsed.
    #[serde(default)]
    pub created_at: Option<String>,
}

// ── Backend seam ─────────────────────────────────────────────────

/// Remote authentication service.
#[async_trait]
pub trait AuthBackend: Send + Sync {
    /// Create an account. Registration alone does not establish a session.
    async fn register(&self, profile: &RegisterRequest) -> Result<UserRecord, ApiError>;

    /// Exchange credentials for a bearer token.
    async fn authenticate(&self, credentials: &LoginRequest) -> Result<AuthResponse, ApiError>;
}

// ── HTTP implementation ──────────────────────────────────────────

/// `AuthBackend` implementation against the FinPay gateway.
pub struct HttpAuthBackend {
    http: reqwest::Client,
    base_url: String,
}

impl HttpAuthBackend {
    pub fn new(config: &Config) -> Result<Self, ApiError> {
        Ok(Self {
            http: http_client(config.request_timeout_secs)?,
            base_url: config.api_base_url.trim_end_matches('/').to_string(),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }
}

#[async_trait]
impl AuthBackend for HttpAuthBackend {
    async fn register(&self, profile: &RegisterRequest) -> Result<UserRecord, ApiError> {
        tracing::debug!(username = %profile.username, "registering account");
        let resp = self
            .http
            .post(self.url("/auth-services/users"))
            .json(profile)
            .send()
            .await?;

        if !resp.status().is_success() {
            return Err(ApiError::Registration(reject_body(resp).await));
        }
        Ok(resp.json().await?)
    }

    async fn authenticate(&self, credentials: &LoginRequest) -> Result<AuthResponse, ApiError> {
        tracing::debug!(username = %credentials.username, "authenticating");
        let resp = self
            .http
            .post(self.url("/auth-services/login"))
            .json(credentials)
            .send()
            .await?;

        if !resp.status().is_success() {
            return Err(ApiError::Authentication(reject_body(resp).await));
        }
        Ok(resp.json().await?)
    }
}

// ── Admin user listing ───────────────────────────────────────────

impl super::ApiClient {
    /// List all registered users (admin view).
    pub async fn list_users(&self) -> Result<Vec<UserRecord>, ApiError> {
        self.get_json("/auth-services/users").await
    }
}

// ── Tests ────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{body_json, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn backend(server: &MockServer) -> HttpAuthBackend {
        let config = Config {
            api_base_url: server.uri(),
            ..Config::default()
        };
        HttpAuthBackend::new(&config).unwrap()
    }

    fn carol_profile() -> RegisterRequest {
        RegisterRequest {
            first_name: "Carol".into(),
            last_name: "Ngozi".into(),
            email: "carol@finpay.io".into(),
            username: "carol".into(),
            password: "p4ssw0rd!".into(),
            role: "ADMIN".into(),
            location: "Lagos".into(),
        }
    }

    #[tokio::test]
    async fn authenticate_returns_token() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/auth-services/login"))
            .and(body_json(json!({"username": "alice", "password": "secret"})))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"token": "T"})))
            .mount(&server)
            .await;

        let response = backend(&server)
            .authenticate(&LoginRequest {
                username: "alice".into(),
                password: "secret".into(),
            })
            .await
            .unwrap();

        assert_eq!(response.token.as_deref(), Some("T"));
    }

    #[tokio::test]
    async fn authenticate_rejection_is_authentication_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/auth-services/login"))
            .respond_with(ResponseTemplate::new(401).set_body_string("bad credentials"))
            .mount(&server)
            .await;

        let err = backend(&server)
            .authenticate(&LoginRequest {
                username: "alice".into(),
                password: "wrong".into(),
            })
            .await
            .unwrap_err();

        assert!(matches!(err, ApiError::Authentication(_)));
        assert!(err.to_string().contains("bad credentials"));
    }

    #[tokio::test]
    async fn authenticate_tolerates_body_without_token() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/auth-services/login"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
            .mount(&server)
            .await;

        // Token presence is the session core's contract to enforce; the
        // transport layer just reports what the backend sent.
        let response = backend(&server)
            .authenticate(&LoginRequest {
                username: "alice".into(),
                password: "secret".into(),
            })
            .await
            .unwrap();

        assert_eq!(response.token, None);
    }

    #[tokio::test]
    async fn register_returns_backend_record() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/auth-services/users"))
            .respond_with(ResponseTemplate::new(201).set_body_json(json!({
                "id": 7,
                "username": "carol",
                "email": "carol@finpay.io",
                "role": "ADMIN",
            })))
            .mount(&server)
            .await;

        let record = backend(&server).register(&carol_profile()).await.unwrap();

        assert_eq!(record.username, "carol");
        assert_eq!(record.role, "ADMIN");
        assert_eq!(record.id, Some(7));
    }

    #[tokio::test]
    async fn user_record_accepts_offsetless_created_at() {
        // The auth service serializes LocalDateTime without a zone offset;
        // the field must survive deserialization as-is.
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/auth-services/users"))
            .respond_with(ResponseTemplate::new(201).set_body_json(json!({
                "username": "carol",
                "role": "ADMIN",
                "createdAt": "2026-08-23T10:15:30",
            })))
            .mount(&server)
            .await;

        let record = backend(&server).register(&carol_profile()).await.unwrap();

        assert_eq!(record.created_at.as_deref(), Some("2026-08-23T10:15:30"));
    }

    #[tokio::test]
    async fn register_rejection_is_registration_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/auth-services/users"))
            .respond_with(ResponseTemplate::new(409).set_body_string("username taken"))
            .mount(&server)
            .await;

        let err = backend(&server).register(&carol_profile()).await.unwrap_err();

        assert!(matches!(err, ApiError::Registration(_)));
    }

    #[tokio::test]
    async fn unreachable_backend_is_transport_error() {
        // Nothing listens on this port.
        let config = Config {
            api_base_url: "http://127.0.0.1:9".into(),
            ..Config::default()
        };
        let backend = HttpAuthBackend::new(&config).unwrap();

        let err = backend
            .authenticate(&LoginRequest {
                username: "alice".into(),
                password: "secret".into(),
            })
            .await
            .unwrap_err();

        assert!(matches!(err, ApiError::Transport(_)));
    }

    #[test]
    fn register_request_uses_camel_case_on_the_wire() {
        let json = serde_json::to_string(&carol_profile()).unwrap();
        assert!(json.contains("firstName"));
        assert!(json.contains("lastName"));
        assert!(!json.contains("first_name"));
    }
}
