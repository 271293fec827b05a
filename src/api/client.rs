//! HTTP client with write-through caching and offline fallback

use std::future::Future;
use std::time::Duration;

use reqwest::header::{HeaderMap, HeaderValue, CONTENT_TYPE, USER_AGENT};
use reqwest::{Client, RequestBuilder, StatusCode, Url};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use tracing::{debug, warn};

use super::{ApiError, DataSource, Fetched};
use crate::cache::{CacheManager, CachedData};
use crate::config::{ClientConfig, FetchPolicy};
use crate::data::{
    AnalysisEnvelope, AnalysisReport, AnalysisRequest, CorrectionPlanVideos, SwingInput, TagList,
    Video, VideoCategory, VideoList, VideoQuery,
};

/// Cache key for the most recent analysis
pub const CACHE_KEY_ANALYSIS: &str = "analysis_results";

/// Cache key for the featured videos
pub const CACHE_KEY_FEATURED: &str = "featured_videos";

/// Prefix of the per-page video library cache keys
pub const CACHE_KEY_LIBRARY_PREFIX: &str = "video_library";

const USER_AGENT_VALUE: &str = concat!("swingcoach/", env!("CARGO_PKG_VERSION"));

/// A cached report stored next to the request that produced it
#[derive(Debug, Serialize, Deserialize)]
struct AnalysisRecord {
    request: AnalysisRequest,
    report: AnalysisReport,
}

/// Client for the analysis service
///
/// Cacheable endpoints write successful responses through to the cache. When a call
/// fails, a cached entry younger than the configured TTL is returned instead of the
/// error (older entries too when `serve_stale` is set).
#[derive(Debug, Clone)]
pub struct ApiClient {
    http: Client,
    base_url: Url,
    health_timeout: Duration,
    cache: Option<CacheManager>,
    cache_ttl: chrono::Duration,
    policy: FetchPolicy,
    serve_stale: bool,
}

impl ApiClient {
    /// Creates a client using the cache described by `config`
    pub fn new(config: &ClientConfig) -> Result<Self, ApiError> {
        Self::with_cache(config, config.cache_manager())
    }

    /// Creates a client with an explicit cache (or none)
    pub fn with_cache(
        config: &ClientConfig,
        cache: Option<CacheManager>,
    ) -> Result<Self, ApiError> {
        let invalid = |reason: String| ApiError::InvalidBaseUrl {
            url: config.base_url.clone(),
            reason,
        };

        let base_url = Url::parse(config.base_url.trim().trim_end_matches('/'))
            .map_err(|e| invalid(e.to_string()))?;
        if base_url.cannot_be_a_base() {
            return Err(invalid("URL cannot carry a path".to_string()));
        }

        let mut default_headers = HeaderMap::new();
        default_headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        default_headers.insert(USER_AGENT, HeaderValue::from_static(USER_AGENT_VALUE));

        let http = Client::builder()
            .timeout(config.timeout())
            .default_headers(default_headers)
            .build()?;

        Ok(Self {
            http,
            base_url,
            health_timeout: config.health_timeout(),
            cache,
            cache_ttl: config.cache_ttl(),
            policy: config.policy,
            serve_stale: config.serve_stale,
        })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Submits the athlete form to `POST /analyze/enhanced`
    ///
    /// A cached report is only ever returned for the exact same request.
    pub async fn analyze_swing(
        &self,
        input: &SwingInput,
    ) -> Result<Fetched<AnalysisReport>, ApiError> {
        input.validate()?;
        let request = AnalysisRequest::from(input);

        let fetch = async {
            let report = self.post_analysis(&request).await?;
            Ok::<_, ApiError>(AnalysisRecord {
                request: request.clone(),
                report,
            })
        };

        let record = self
            .cached(CACHE_KEY_ANALYSIS, fetch, |record: &AnalysisRecord| {
                record.request == request
            })
            .await?;

        Ok(record.map(|record| record.report))
    }

    async fn post_analysis(&self, request: &AnalysisRequest) -> Result<AnalysisReport, ApiError> {
        let url = self.endpoint(&["analyze", "enhanced"]);
        debug!(%url, "POST");

        let envelope: AnalysisEnvelope = self.send(self.http.post(url).json(request)).await?;
        if !envelope.status.eq_ignore_ascii_case("success") {
            return Err(ApiError::Rejected(
                envelope
                    .message
                    .unwrap_or_else(|| format!("status '{}'", envelope.status)),
            ));
        }

        envelope
            .data
            .ok_or_else(|| ApiError::Rejected("response contained no report".to_string()))
    }

    /// Featured videos, cached
    pub async fn featured_videos(&self) -> Result<Fetched<VideoList>, ApiError> {
        let fetch = self.get(&["videos", "featured"], &[]);
        self.cached(CACHE_KEY_FEATURED, fetch, |_: &VideoList| true)
            .await
    }

    /// One page of the full library, cached per page
    pub async fn all_videos(
        &self,
        limit: usize,
        offset: usize,
    ) -> Result<Fetched<VideoList>, ApiError> {
        let key = format!("{}_{}_{}", CACHE_KEY_LIBRARY_PREFIX, limit, offset);
        let params = [("limit", limit.to_string()), ("offset", offset.to_string())];
        let fetch = self.get(&["videos"], &params);
        self.cached(&key, fetch, |_: &VideoList| true).await
    }

    pub async fn search_videos(&self, query: &VideoQuery) -> Result<VideoList, ApiError> {
        self.get(&["videos", "search"], &query.to_params()).await
    }

    /// Every video in one category
    pub async fn videos_by_category(&self, category: VideoCategory) -> Result<VideoList, ApiError> {
        self.get(&["videos", "by-category", category.as_str()], &[]).await
    }

    pub async fn video(&self, video_id: &str) -> Result<Video, ApiError> {
        self.get(&["videos", video_id], &[]).await
    }

    /// Videos demonstrating one drill; the service answers 404 when there are none
    pub async fn videos_for_drill(&self, drill_id: &str) -> Result<VideoList, ApiError> {
        self.get(&["videos", "for-drill", drill_id], &[]).await
    }

    /// Videos for every drill of a correction plan in one call
    pub async fn videos_for_correction_plan(
        &self,
        drill_ids: &[String],
    ) -> Result<CorrectionPlanVideos, ApiError> {
        let ids: Vec<&str> = drill_ids
            .iter()
            .map(|id| id.trim())
            .filter(|id| !id.is_empty())
            .collect();
        if ids.is_empty() {
            return Ok(CorrectionPlanVideos::default());
        }

        let params = [("drill_ids", ids.join(","))];
        self.get(&["videos", "for-correction-plan"], &params).await
    }

    pub async fn video_tags(&self) -> Result<TagList, ApiError> {
        self.get(&["videos", "tags"], &[]).await
    }

    /// Records a view of a video; failures are logged and otherwise ignored
    pub async fn increment_video_view(&self, video_id: &str) {
        let url = self.endpoint(&["videos", video_id, "view"]);
        debug!(%url, "POST");

        match self.http.post(url).send().await {
            Ok(response) if response.status().is_success() => {}
            Ok(response) => {
                warn!(video_id, status = %response.status(), "view was not recorded");
            }
            Err(e) => {
                warn!(video_id, error = %e, "view was not recorded");
            }
        }
    }

    /// Deletes every cached response and returns how many entries were removed
    pub fn clear_cache(&self) -> usize {
        let Some(cache) = &self.cache else {
            return 0;
        };

        match cache.clear() {
            Ok(removed) => removed,
            Err(e) => {
                warn!(dir = %cache.dir().display(), error = %e, "failed to clear cache");
                0
            }
        }
    }

    /// Probes `GET /health` with the short health timeout
    pub async fn is_online(&self) -> bool {
        let url = self.endpoint(&["health"]);

        match self.http.get(url).timeout(self.health_timeout).send().await {
            Ok(response) => response.status() == StatusCode::OK,
            Err(e) => {
                debug!(error = %e, "health check failed");
                false
            }
        }
    }

    /// Appends percent-encoded path segments to the base URL
    fn endpoint(&self, segments: &[&str]) -> Url {
        let mut url = self.base_url.clone();
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }

    async fn get<T: DeserializeOwned>(
        &self,
        segments: &[&str],
        query: &[(&str, String)],
    ) -> Result<T, ApiError> {
        let url = self.endpoint(segments);
        debug!(%url, "GET");

        let mut request = self.http.get(url);
        if !query.is_empty() {
            request = request.query(query);
        }
        self.send(request).await
    }

    async fn send<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<T, ApiError> {
        let response = request.send().await?;
        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            return Err(ApiError::from_status(status, &body));
        }

        Ok(serde_json::from_str(&body)?)
    }

    /// Runs `fetch` under the configured policy, writing successes through to the cache
    /// and falling back to an acceptable cached entry on failure.
    async fn cached<T, F>(
        &self,
        key: &str,
        fetch: F,
        accept: impl Fn(&T) -> bool,
    ) -> Result<Fetched<T>, ApiError>
    where
        T: Serialize + DeserializeOwned,
        F: Future<Output = Result<T, ApiError>>,
    {
        let Some(cache) = &self.cache else {
            return fetch.await.map(Fetched::from_network);
        };

        if self.policy == FetchPolicy::CacheFirst {
            if let Some(cached) = self.read_cached(cache, key, &accept) {
                if !cached.is_expired {
                    debug!(key, "serving fresh cache entry");
                    return Ok(into_fetched(cached));
                }
            }
        }

        match fetch.await {
            Ok(data) => {
                if let Err(e) = cache.write(key, &data) {
                    warn!(key, error = %e, "failed to write cache entry");
                }
                Ok(Fetched::from_network(data))
            }
            Err(err) => match self.read_cached(cache, key, &accept) {
                Some(cached) if !cached.is_expired || self.serve_stale => {
                    warn!(
                        key,
                        error = %err,
                        cached_at = %cached.cached_at,
                        "request failed, serving cached data"
                    );
                    Ok(into_fetched(cached))
                }
                _ => Err(err),
            },
        }
    }

    fn read_cached<T: DeserializeOwned>(
        &self,
        cache: &CacheManager,
        key: &str,
        accept: &impl Fn(&T) -> bool,
    ) -> Option<CachedData<T>> {
        cache
            .read::<T>(key, self.cache_ttl)
            .filter(|cached| accept(&cached.data))
    }
}

fn into_fetched<T>(cached: CachedData<T>) -> Fetched<T> {
    Fetched {
        data: cached.data,
        source: DataSource::Cache {
            cached_at: cached.cached_at,
            is_expired: cached.is_expired,
        },
    }
}
