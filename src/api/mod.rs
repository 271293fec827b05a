//! Client for the swing analysis service
//!
//! `ApiClient` issues the HTTP calls and decides, per endpoint, whether responses are
//! written to and read back from the on-disk cache. Every cacheable call reports where
//! its data came from through [`Fetched`].

mod client;
mod error;

pub use client::{ApiClient, CACHE_KEY_ANALYSIS, CACHE_KEY_FEATURED, CACHE_KEY_LIBRARY_PREFIX};
pub use error::ApiError;

use chrono::{DateTime, Utc};

/// Where a response was served from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DataSource {
    /// Fetched from the service just now
    Network,
    /// Read from the local cache
    Cache {
        cached_at: DateTime<Utc>,
        is_expired: bool,
    },
}

/// A response together with its origin
#[derive(Debug, Clone, PartialEq)]
pub struct Fetched<T> {
    pub data: T,
    pub source: DataSource,
}

impl<T> Fetched<T> {
    /// Wraps data that was just fetched from the service
    pub fn from_network(data: T) -> Self {
        Self {
            data,
            source: DataSource::Network,
        }
    }

    /// True when the data came from the cache rather than the service
    pub fn is_cached(&self) -> bool {
        matches!(self.source, DataSource::Cache { .. })
    }

    /// Transforms the data while keeping its source
    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Fetched<U> {
        Fetched {
            data: f(self.data),
            source: self.source,
        }
    }
}
