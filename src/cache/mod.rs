//! Offline response cache.
//!
//! Listing responses are snapshotted to disk so the console can render
//! recent data while offline. Mutations invalidate their resource key,
//! forcing a re-fetch on the next read.

pub mod manager;

pub use manager::{CacheManager, CachedData};
