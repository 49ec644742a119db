//! Administrative client for the FinPay payments platform.
//!
//! The library is organized around one owned [`session::SessionStore`]
//! instance, constructed once at startup and shared by handle with every
//! API client. Components read the session; only `login`, `register`, and
//! `logout` mutate it.

pub mod api;
pub mod cli;
pub mod config;
pub mod session;
pub mod store;
