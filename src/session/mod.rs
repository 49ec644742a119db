//! Local session management for the operator CLI.
//!
//! Provides:
//! - The in-memory session triple (token, username, role)
//! - Durable persistence across process restarts via a key-value store
//! - `login` / `register` / `logout` lifecycle against the auth backend
//!
//! ## Design Decisions
//! - Logout is purely local: the bearer token is never revoked remotely and
//!   stays valid at the backend until natural expiry. That matches the
//!   platform's contract, so clients must not "improve" on it.
//! - A restored token is not validated at startup; an expired token is
//!   discovered lazily when the first authenticated call is rejected.

pub mod store;

pub use store::{Session, SessionError, SessionStore};
