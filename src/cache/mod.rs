//! Cache module for storing API responses to disk
//!
//! This module provides a cache manager that persists API responses to the filesystem,
//! stamped with the time they were written. Readers pass the maximum age they accept
//! and get expired entries back flagged with `is_expired`, which lets the API client
//! fall back to cached data when the analysis service is unreachable.

mod manager;

pub use manager::{CacheManager, CachedData};
