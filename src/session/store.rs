//! Durable session store: token lifecycle and the authorization view the
//! rest of the CLI consumes.
//!
//! The store owns the session triple for the lifetime of the process and is
//! the single writer of the three persisted slots. Consumers read `token`,
//! `username`, `role`, and `is_authenticated()` at any time; mutation happens
//! only through `login`, `register`, and `logout`.

use crate::api::auth::{AuthBackend, AuthResponse, LoginRequest, RegisterRequest};
use crate::api::ApiError;
use crate::store::KeyValueStore;
use parking_lot::Mutex;
use std::sync::Arc;

/// Persisted slot names. Three independent keys, matching the layout every
/// deployed client already wrote; a crash between writes can leave a torn
/// triple on disk (accepted gap, single-key migration would be invisible to
/// readers but would strand old state).
const KEY_TOKEN: &str = "token";
const KEY_USERNAME: &str = "username";
const KEY_ROLE: &str = "role";

/// Role assigned on a plain login. Registration takes the backend's role.
const DEFAULT_ROLE: &str = "USER";

/// The in-memory session triple. The three fields are set and cleared
/// together; `token` present implies the other two are present.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Session {
    pub token: Option<String>,
    pub username: Option<String>,
    pub role: Option<String>,
}

impl Session {
    /// Whether a user is currently authenticated.
    pub fn is_authenticated(&self) -> bool {
        self.token.is_some()
    }
}

/// Failures surfaced by session operations.
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    #[error(transparent)]
    Api(#[from] ApiError),

    #[error("session storage failure: {0}")]
    Storage(#[from] anyhow::Error),
}

/// Owner of the local session state.
///
/// `login` and `register` suspend on the backend calls; overlapping calls to
/// them are serialized by an internal guard. `logout` is synchronous and
/// excluded instead by the state lock, which every commit and clear holds
/// across both the in-memory swap and the persisted writes — so a torn
/// triple (token from one call, username from another) can never be
/// observed or persisted.
pub struct SessionStore {
    backend: Arc<dyn AuthBackend>,
    store: Arc<dyn KeyValueStore>,
    state: Mutex<Session>,
    op_guard: tokio::sync::Mutex<()>,
}

impl SessionStore {
    /// Construct the store, rehydrating any persisted session. Missing slots
    /// load as `None`; the restored token is not validated against the
    /// backend.
    pub fn open(
        backend: Arc<dyn AuthBackend>,
        store: Arc<dyn KeyValueStore>,
    ) -> Result<Self, SessionError> {
        let session = Session {
            token: store.get(KEY_TOKEN)?,
            username: store.get(KEY_USERNAME)?,
            role: store.get(KEY_ROLE)?,
        };
        tracing::debug!(
            authenticated = session.is_authenticated(),
            username = session.username.as_deref().unwrap_or(""),
            "session state restored"
        );

        Ok(Self {
            backend,
            store,
            state: Mutex::new(session),
            op_guard: tokio::sync::Mutex::new(()),
        })
    }

    // ── Read contract ────────────────────────────────────────────

    /// Snapshot of the current session.
    pub fn current(&self) -> Session {
        self.state.lock().clone()
    }

    pub fn token(&self) -> Option<String> {
        self.state.lock().token.clone()
    }

    pub fn username(&self) -> Option<String> {
        self.state.lock().username.clone()
    }

    pub fn role(&self) -> Option<String> {
        self.state.lock().role.clone()
    }

    pub fn is_authenticated(&self) -> bool {
        self.state.lock().is_authenticated()
    }

    // ── Mutating operations ──────────────────────────────────────

    /// Authenticate and establish a session.
    ///
    /// On success the session holds the returned token, the *input* username
    /// (not re-derived from the backend), and the `"USER"` role, and all
    /// three slots are persisted. On failure the session is untouched.
    pub async fn login(&self, credentials: &LoginRequest) -> Result<(), SessionError> {
        let _guard = self.op_guard.lock().await;
        tracing::info!(username = %credentials.username, "logging in");

        let response = self.backend.authenticate(credentials).await?;
        let token = require_token(response)?;

        self.commit(&token, &credentials.username, DEFAULT_ROLE)?;
        tracing::info!(username = %credentials.username, "login successful");
        Ok(())
    }

    /// Create an account, then authenticate to establish a session.
    ///
    /// The username and role of the established session come from the
    /// registration record (the backend is authoritative post-registration),
    /// the token from the follow-up authenticate call. If registration fails
    /// the authenticate step never runs. If the authenticate step fails the
    /// account exists at the backend but no local session is established;
    /// the caller decides what to do (typically: prompt for a manual login).
    pub async fn register(&self, profile: &RegisterRequest) -> Result<(), SessionError> {
        let _guard = self.op_guard.lock().await;
        tracing::info!(username = %profile.username, "registering");

        let record = self.backend.register(profile).await?;

        let credentials = LoginRequest {
            username: profile.username.clone(),
            password: profile.password.clone(),
        };
        let response = self.backend.authenticate(&credentials).await?;
        let token = require_token(response)?;

        self.commit(&token, &record.username, &record.role)?;
        tracing::info!(username = %record.username, role = %record.role, "registration successful");
        Ok(())
    }

    /// Clear the session locally and remove the persisted slots.
    ///
    /// Unconditional and idempotent. No backend call: the token remains
    /// valid remotely until natural expiry. The state lock is held across
    /// the clear and all three deletes, so a concurrent `commit` sees the
    /// slots either all present or all absent.
    pub fn logout(&self) -> Result<(), SessionError> {
        let mut state = self.state.lock();
        *state = Session::default();

        self.store.delete(KEY_TOKEN)?;
        self.store.delete(KEY_USERNAME)?;
        self.store.delete(KEY_ROLE)?;
        tracing::info!("session cleared");
        Ok(())
    }

    /// Persist the triple, then switch the in-memory state. Persisting first
    /// keeps the success guarantee: a reported success is always durable, and
    /// a storage failure leaves the in-memory session unchanged. The state
    /// lock is taken before the first write and held through the swap:
    /// `logout` deletes the slots under the same lock, so the persisted
    /// triple can never end up half written by an interleaving. Everything
    /// under the lock is synchronous.
    fn commit(&self, token: &str, username: &str, role: &str) -> Result<(), SessionError> {
        let mut state = self.state.lock();

        self.store.set(KEY_TOKEN, token)?;
        self.store.set(KEY_USERNAME, username)?;
        self.store.set(KEY_ROLE, role)?;

        *state = Session {
            token: Some(token.to_string()),
            username: Some(username.to_string()),
            role: Some(role.to_string()),
        };
        Ok(())
    }
}

/// A successful HTTP exchange without a token is still an authentication
/// failure, distinct from a transport error.
fn require_token(response: AuthResponse) -> Result<String, SessionError> {
    match response.token {
        Some(token) if !token.is_empty() => Ok(token),
        _ => Err(ApiError::Authentication("backend response carried no token".into()).into()),
    }
}

// ── Tests ────────────────────────────────────────────────────────
