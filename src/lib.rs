//! swingcoach library
//!
//! Client for the swing analysis service: submits athlete measurements, returns the
//! biomechanics report and serves the drill video library, with an on-disk response
//! cache for offline use.

pub mod api;
pub mod cache;
pub mod cli;
pub mod config;
pub mod data;
pub mod output;

pub use api::{ApiClient, ApiError, DataSource, Fetched};
pub use config::{ClientConfig, FetchPolicy};
