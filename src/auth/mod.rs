//! Session credential management.
//!
//! This module provides:
//! - `SessionStore`: swappable durable storage for the token pair and cached user
//! - `MemoryStore` / `FileStore`: in-memory and file-backed implementations
//! - `KeyringStore`: secure OS-level storage via keyring
//!
//! Tokens are minted at login, the access token is overwritten on refresh,
//! and everything is purged together on logout or refresh failure.

pub mod credentials;
pub mod session;

pub use credentials::KeyringStore;
pub use session::{
    FileStore, MemoryStore, SessionStore, SessionUser, ACCESS_TOKEN_KEY, REFRESH_TOKEN_KEY,
    SESSION_KEYS, USER_KEY,
};
