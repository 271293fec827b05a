//! Client configuration
//!
//! Values come from built-in defaults, then `SWINGCOACH_*` environment variables,
//! then command-line flags applied through the `with_*` setters.

use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::cache::CacheManager;

/// Where the analysis service listens when nothing else is configured
pub const DEFAULT_BASE_URL: &str = "http://127.0.0.1:8002";

const ENV_API_URL: &str = "SWINGCOACH_API_URL";
const ENV_TIMEOUT_SECS: &str = "SWINGCOACH_TIMEOUT_SECS";
const ENV_HEALTH_TIMEOUT_SECS: &str = "SWINGCOACH_HEALTH_TIMEOUT_SECS";
const ENV_CACHE_TTL_SECS: &str = "SWINGCOACH_CACHE_TTL_SECS";
const ENV_CACHE_DIR: &str = "SWINGCOACH_CACHE_DIR";
const ENV_SERVE_STALE: &str = "SWINGCOACH_SERVE_STALE";

/// Order in which the network and the cache are consulted
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FetchPolicy {
    /// Always call the service; read the cache only when the call fails
    #[default]
    NetworkFirst,
    /// Serve a fresh cache entry without calling the service
    CacheFirst,
}

/// Settings for [`crate::api::ApiClient`]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClientConfig {
    /// Base URL of the analysis service
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Timeout for regular requests in seconds
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,

    /// Timeout for the health probe in seconds
    #[serde(default = "default_health_timeout")]
    pub health_timeout_secs: u64,

    /// How long a cached response counts as fresh, in seconds
    #[serde(default = "default_cache_ttl")]
    pub cache_ttl_secs: u64,

    /// Cache location; the XDG cache directory when unset
    #[serde(default)]
    pub cache_dir: Option<PathBuf>,

    /// Disables the response cache entirely
    #[serde(default)]
    pub no_cache: bool,

    #[serde(default)]
    pub policy: FetchPolicy,

    /// Serve expired cache entries when the service is unreachable
    #[serde(default)]
    pub serve_stale: bool,
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

fn default_timeout() -> u64 {
    30
}

fn default_health_timeout() -> u64 {
    5
}

fn default_cache_ttl() -> u64 {
    3600
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            timeout_secs: default_timeout(),
            health_timeout_secs: default_health_timeout(),
            cache_ttl_secs: default_cache_ttl(),
            cache_dir: None,
            no_cache: false,
            policy: FetchPolicy::default(),
            serve_stale: false,
        }
    }
}

impl ClientConfig {
    /// Create config from environment variables.
    ///
    /// | Variable | Description |
    /// |----------|-------------|
    /// | `SWINGCOACH_API_URL` | Service base URL |
    /// | `SWINGCOACH_TIMEOUT_SECS` | Request timeout |
    /// | `SWINGCOACH_HEALTH_TIMEOUT_SECS` | Health probe timeout |
    /// | `SWINGCOACH_CACHE_TTL_SECS` | Cache freshness window |
    /// | `SWINGCOACH_CACHE_DIR` | Cache directory |
    /// | `SWINGCOACH_SERVE_STALE` | Serve expired cache when offline (`1`/`true`) |
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as [`ClientConfig::from_env`] with a custom variable source
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();
        Self {
            base_url: lookup(ENV_API_URL)
                .filter(|url| !url.trim().is_empty())
                .unwrap_or(defaults.base_url),
            timeout_secs: parse_timeout_secs(&lookup, ENV_TIMEOUT_SECS, defaults.timeout_secs),
            health_timeout_secs: parse_timeout_secs(
                &lookup,
                ENV_HEALTH_TIMEOUT_SECS,
                defaults.health_timeout_secs,
            ),
            cache_ttl_secs: parse_secs(&lookup, ENV_CACHE_TTL_SECS, defaults.cache_ttl_secs),
            cache_dir: lookup(ENV_CACHE_DIR)
                .filter(|dir| !dir.trim().is_empty())
                .map(PathBuf::from),
            no_cache: false,
            policy: FetchPolicy::default(),
            serve_stale: lookup(ENV_SERVE_STALE)
                .map(|v| v == "1" || v.eq_ignore_ascii_case("true"))
                .unwrap_or(false),
        }
    }

    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    /// Sets the request timeout; zero is ignored
    pub fn with_timeout_secs(mut self, secs: u64) -> Self {
        if secs == 0 {
            warn!(current = self.timeout_secs, "ignoring zero request timeout");
        } else {
            self.timeout_secs = secs;
        }
        self
    }

    pub fn with_cache_ttl_secs(mut self, secs: u64) -> Self {
        self.cache_ttl_secs = secs;
        self
    }

    pub fn with_cache_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.cache_dir = Some(dir.into());
        self
    }

    pub fn without_cache(mut self) -> Self {
        self.no_cache = true;
        self
    }

    pub fn with_policy(mut self, policy: FetchPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn with_serve_stale(mut self, serve_stale: bool) -> Self {
        self.serve_stale = serve_stale;
        self
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    pub fn health_timeout(&self) -> Duration {
        Duration::from_secs(self.health_timeout_secs)
    }

    /// Freshness window as a chrono duration, the unit the cache compares ages in
    ///
    /// Values beyond what chrono can represent saturate to [`chrono::Duration::MAX`].
    pub fn cache_ttl(&self) -> chrono::Duration {
        i64::try_from(self.cache_ttl_secs)
            .ok()
            .and_then(chrono::Duration::try_seconds)
            .unwrap_or(chrono::Duration::MAX)
    }

    /// Builds the cache this configuration points at, if caching is enabled
    pub fn cache_manager(&self) -> Option<CacheManager> {
        if self.no_cache {
            return None;
        }
        match &self.cache_dir {
            Some(dir) => Some(CacheManager::with_dir(dir.clone())),
            None => CacheManager::new(),
        }
    }
}

fn parse_secs(lookup: &impl Fn(&str) -> Option<String>, key: &str, default: u64) -> u64 {
    match lookup(key) {
        None => default,
        Some(raw) => raw.trim().parse().unwrap_or_else(|_| {
            warn!(variable = key, value = %raw, "ignoring invalid number, using {}", default);
            default
        }),
    }
}

/// Like [`parse_secs`], but a zero timeout is rejected too
fn parse_timeout_secs(lookup: &impl Fn(&str) -> Option<String>, key: &str, default: u64) -> u64 {
    match parse_secs(lookup, key, default) {
        0 => {
            warn!(variable = key, "ignoring zero timeout, using {}", default);
            default
        }
        secs => secs,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| vars.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = ClientConfig::default();
        assert_eq!(config.base_url, DEFAULT_BASE_URL);
        assert_eq!(config.timeout(), Duration::from_secs(30));
        assert_eq!(config.health_timeout(), Duration::from_secs(5));
        assert_eq!(config.cache_ttl(), chrono::Duration::hours(1));
        assert_eq!(config.policy, FetchPolicy::NetworkFirst);
        assert!(!config.serve_stale);
    }

    #[test]
    fn test_empty_environment_matches_defaults() {
        let config = ClientConfig::from_lookup(lookup_from(&[]));
        assert_eq!(config, ClientConfig::default());
    }

    #[test]
    fn test_environment_overrides() {
        let config = ClientConfig::from_lookup(lookup_from(&[
            ("SWINGCOACH_API_URL", "https://analysis.example.com"),
            ("SWINGCOACH_TIMEOUT_SECS", "10"),
            ("SWINGCOACH_CACHE_TTL_SECS", "60"),
            ("SWINGCOACH_CACHE_DIR", "/tmp/swingcoach-test"),
            ("SWINGCOACH_SERVE_STALE", "TRUE"),
        ]));

        assert_eq!(config.base_url, "https://analysis.example.com");
        assert_eq!(config.timeout_secs, 10);
        assert_eq!(config.cache_ttl_secs, 60);
        assert_eq!(config.cache_dir, Some(PathBuf::from("/tmp/swingcoach-test")));
        assert!(config.serve_stale);
    }

    #[test]
    fn test_invalid_numbers_fall_back_to_defaults() {
        let config = ClientConfig::from_lookup(lookup_from(&[
            ("SWINGCOACH_TIMEOUT_SECS", "soon"),
            ("SWINGCOACH_HEALTH_TIMEOUT_SECS", "-1"),
        ]));

        assert_eq!(config.timeout_secs, 30);
        assert_eq!(config.health_timeout_secs, 5);
    }

    #[test]
    fn test_zero_timeouts_fall_back_to_defaults() {
        let config = ClientConfig::from_lookup(lookup_from(&[
            ("SWINGCOACH_TIMEOUT_SECS", "0"),
            ("SWINGCOACH_HEALTH_TIMEOUT_SECS", "0"),
            ("SWINGCOACH_CACHE_TTL_SECS", "0"),
        ]));

        assert_eq!(config.timeout_secs, 30);
        assert_eq!(config.health_timeout_secs, 5);
        assert_eq!(config.cache_ttl_secs, 0);
    }

    #[test]
    fn test_with_zero_timeout_keeps_current_value() {
        let config = ClientConfig::default().with_timeout_secs(12).with_timeout_secs(0);
        assert_eq!(config.timeout(), Duration::from_secs(12));
    }

    #[test]
    fn test_huge_cache_ttl_saturates() {
        let config = ClientConfig::default().with_cache_ttl_secs(u64::MAX);
        assert_eq!(config.cache_ttl(), chrono::Duration::MAX);

        let config = ClientConfig::default().with_cache_ttl_secs(i64::MAX as u64);
        assert_eq!(config.cache_ttl(), chrono::Duration::MAX);
    }

    #[test]
    fn test_without_cache_disables_manager() {
        let config = ClientConfig::default()
            .with_cache_dir("/tmp/unused")
            .without_cache();
        assert!(config.cache_manager().is_none());
    }

    #[test]
    fn test_cache_dir_is_used_for_manager() {
        let config = ClientConfig::default().with_cache_dir("/tmp/swingcoach-cache");
        let cache = config.cache_manager().expect("cache should be enabled");
        assert_eq!(cache.dir(), std::path::Path::new("/tmp/swingcoach-cache"));
    }

    #[test]
    fn test_config_deserializes_with_partial_fields() {
        let config: ClientConfig =
            serde_json::from_str(r#"{"base_url": "http://localhost:9000", "policy": "cache_first"}"#)
                .unwrap();

        assert_eq!(config.base_url, "http://localhost:9000");
        assert_eq!(config.policy, FetchPolicy::CacheFirst);
        assert_eq!(config.timeout_secs, 30);
    }
}
