//! Client library for the WorkHub HR platform's admin backend.
//!
//! Everything the console does goes through one shared [`api::AdminClient`]:
//! it attaches the session's bearer token to outgoing requests, recovers
//! from access-token expiry with a single refresh-and-replay, and reports
//! an irrecoverably expired session as [`api::ApiError::SessionExpired`]
//! so the shell can route the operator back to login.
//!
//! Sessions live behind the swappable [`auth::SessionStore`] trait
//! (in-memory, file-backed, or OS keychain). Listing responses can be
//! snapshotted through [`cache::CacheManager`] for offline use.

pub mod api;
pub mod auth;
pub mod cache;
pub mod config;
pub mod models;

pub use api::{AdminClient, ApiError, Notice, NoticeSink};
pub use auth::{SessionStore, SessionUser};
pub use config::Config;
