//! REST API client module for the WorkHub admin backend.
//!
//! This module provides the `AdminClient` shared by every console surface,
//! the `ApiError` taxonomy, and the advisory notice types.
//!
//! The backend uses short-lived JWT access tokens with a refresh-token
//! rotation endpoint; the client recovers from access-token expiry
//! transparently (one refresh, one replay) and reports an expired session
//! as a distinguished error for the shell to act on.

pub mod client;
pub mod error;
pub mod notify;

pub use client::AdminClient;
pub use error::ApiError;
pub use notify::{LogNotices, Notice, NoticeSink};
