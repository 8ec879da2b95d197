//! Image lookup capability: `lookup(name) -> url`, possibly empty.
//!
//! [`UnsplashClient`] searches Unsplash for `recipe <name>`, landscape
//! orientation, one result, and returns its `urls.full`. An empty access
//! key disables lookups; they then resolve to an empty string without a
//! network call.

use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;
use thiserror::Error;
use tracing::{debug, instrument, warn};

#[derive(Debug, Error)]
pub enum ImageLookupError {
    #[error("[Image Lookup] transport error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("[Image Lookup] HTTP {status} from image search: {snippet}")]
    HttpStatus {
        status: reqwest::StatusCode,
        snippet: String,
    },
}

#[async_trait]
pub trait ImageLookup: Send + Sync {
    /// URL of an image for `name`; empty when nothing was found.
    async fn lookup(&self, name: &str) -> Result<String, ImageLookupError>;
}

/// Lookup that never finds anything.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoImageLookup;

#[async_trait]
impl ImageLookup for NoImageLookup {
    async fn lookup(&self, _name: &str) -> Result<String, ImageLookupError> {
        Ok(String::new())
    }
}

#[derive(Debug, Clone)]
pub struct UnsplashConfig {
    /// API base, e.g. `https://api.unsplash.com`.
    pub base_url: String,
    /// Access key sent as `client_id`; empty disables lookups.
    pub access_key: String,
    pub timeout_secs: u64,
}

impl UnsplashConfig {
    /// Reads `UNSPLASH_URL` (default `https://api.unsplash.com`) and
    /// `UNSPLASH_ACCESS_KEY` (default empty).
    pub fn from_env() -> Self {
        let var = |k: &str| std::env::var(k).ok().map(|v| v.trim().to_string());
        Self {
            base_url: var("UNSPLASH_URL")
                .filter(|v| !v.is_empty())
                .unwrap_or_else(|| "https://api.unsplash.com".into()),
            access_key: var("UNSPLASH_ACCESS_KEY").unwrap_or_default(),
            timeout_secs: 10,
        }
    }
}

#[derive(Deserialize)]
struct SearchResponse {
    #[serde(default)]
    results: Vec<Photo>,
}

#[derive(Deserialize)]
struct Photo {
    #[serde(default)]
    urls: PhotoUrls,
}

#[derive(Deserialize, Default)]
struct PhotoUrls {
    #[serde(default)]
    full: Option<String>,
}

pub struct UnsplashClient {
    http: reqwest::Client,
    cfg: UnsplashConfig,
}

impl UnsplashClient {
    pub fn new(cfg: UnsplashConfig) -> Result<Self, ImageLookupError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(cfg.timeout_secs))
            .build()?;
        if cfg.access_key.is_empty() {
            warn!(target: "services::image_lookup", "UNSPLASH_ACCESS_KEY is empty; image lookup disabled");
        }
        Ok(Self { http, cfg })
    }

    fn search_url(&self, name: &str) -> String {
        format!(
            "{}/search/photos?page=1&query={}&client_id={}&orientation=landscape&per_page=1",
            self.cfg.base_url.trim_end_matches('/'),
            urlencoding::encode(&format!("recipe {}", name.trim())),
            urlencoding::encode(&self.cfg.access_key),
        )
    }
}

#[async_trait]
impl ImageLookup for UnsplashClient {
    #[instrument(target = "services::image_lookup", skip(self))]
    async fn lookup(&self, name: &str) -> Result<String, ImageLookupError> {
        if self.cfg.access_key.is_empty() || name.trim().is_empty() {
            return Ok(String::new());
        }

        let resp = self.http.get(self.search_url(name)).send().await?;
        if !resp.status().is_success() {
            let status = resp.status();
            let text = resp.text().await.unwrap_or_default();
            return Err(ImageLookupError::HttpStatus {
                status,
                snippet: text.trim().chars().take(240).collect(),
            });
        }

        let body: SearchResponse = resp.json().await?;
        // The last result wins; with `per_page=1` there is at most one.
        let url = body
            .results
            .into_iter()
            .filter_map(|p| p.urls.full)
            .last()
            .unwrap_or_default();
        debug!(target: "services::image_lookup", found = !url.is_empty(), "image search done");
        Ok(url)
    }
}
