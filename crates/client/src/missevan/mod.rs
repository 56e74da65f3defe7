//! Missevan (猫耳FM) API client.
//!
//! Provides a client for the public drama and sound endpoints with rate
//! limiting and response decoding.
//!
//! ### Endpoints
//!
//! - `/dramaapi/filter`: paged listing of every drama, newest first
//! - `/dramaapi/search`: dramas whose name matches a series title
//! - `/sound/getsearch`: sounds (episodes) matching a keyword
//! - `/sound/getdm`: danmaku XML for one sound
//!
//! Requests are spaced by at least `min_interval`; the platform answers bursts
//! with 418/429.

pub mod error;
pub mod models;

pub use error::MissevanError;
pub use models::{ApiEnvelope, DramaSummary, PAID_PAY_TYPE, SoundSummary};

use std::sync::Arc;
use std::time::{Duration, Instant};

use jidanjia_core::{AppConfig, ListingId};
use reqwest::header;
use serde::de::DeserializeOwned;
use tokio::sync::Mutex;

use crate::crawl::DramaSource;
use crate::danmaku::SoundSource;

/// Default API origin.
pub const DEFAULT_BASE_URL: &str = "https://www.missevan.com";

/// Missevan client configuration.
#[derive(Debug, Clone)]
pub struct MissevanConfig {
    /// API origin (default: https://www.missevan.com).
    pub base_url: String,
    /// Request timeout (default: 10s).
    pub timeout: Duration,
    /// User-agent string. The platform rejects empty agents.
    pub user_agent: String,
    /// Minimum spacing between two requests.
    pub min_interval: Duration,
}

impl Default for MissevanConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout: Duration::from_secs(10),
            user_agent: "Mozilla/5.0".to_string(),
            min_interval: Duration::from_millis(300),
        }
    }
}

impl From<&AppConfig> for MissevanConfig {
    fn from(config: &AppConfig) -> Self {
        Self {
            base_url: config.api_base.clone(),
            timeout: config.timeout(),
            user_agent: config.user_agent.clone(),
            min_interval: config.item_delay(),
        }
    }
}

/// Rate limiter to enforce request intervals.
#[derive(Debug)]
struct RateLimiter {
    last_request: Mutex<Instant>,
    min_interval: Duration,
}

impl RateLimiter {
    fn new(min_interval: Duration) -> Self {
        Self {
            last_request: Mutex::new(Instant::now().checked_sub(min_interval).unwrap_or_else(Instant::now)),
            min_interval,
        }
    }

    /// Wait until `min_interval` has passed since the previous request.
    async fn acquire(&self) {
        let mut last = self.last_request.lock().await;
        let elapsed = last.elapsed();
        if elapsed < self.min_interval {
            tokio::time::sleep(self.min_interval - elapsed).await;
        }
        *last = Instant::now();
    }
}

/// Missevan API client.
#[derive(Debug, Clone)]
pub struct MissevanClient {
    http: reqwest::Client,
    config: MissevanConfig,
    rate_limiter: Arc<RateLimiter>,
}

impl MissevanClient {
    /// Create a new client with the given configuration.
    pub fn new(config: MissevanConfig) -> Result<Self, MissevanError> {
        let base = url::Url::parse(&config.base_url).map_err(|e| MissevanError::InvalidBase(e.to_string()))?;
        if !matches!(base.scheme(), "http" | "https") {
            return Err(MissevanError::InvalidBase(format!("unsupported scheme: {}", base.scheme())));
        }

        let http = reqwest::Client::builder()
            .timeout(config.timeout)
            .user_agent(&config.user_agent)
            .use_rustls_tls()
            .gzip(true)
            .brotli(true)
            .deflate(true)
            .build()
            .map_err(|e| MissevanError::Network(Arc::new(e)))?;

        let rate_limiter = Arc::new(RateLimiter::new(config.min_interval));
        Ok(Self { http, config, rate_limiter })
    }

    /// Create a client from the application configuration.
    pub fn from_app_config(config: &AppConfig) -> Result<Self, MissevanError> {
        Self::new(MissevanConfig::from(config))
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}{}", self.config.base_url.trim_end_matches('/'), path)
    }

    async fn get_bytes(&self, path: &str, query: &[(&str, String)]) -> Result<Vec<u8>, MissevanError> {
        self.rate_limiter.acquire().await;

        let start = Instant::now();
        let url = self.endpoint(path);

        let response = self
            .http
            .get(&url)
            .header(header::ACCEPT, "application/json, text/xml")
            .query(query)
            .send()
            .await?;

        let status = response.status();
        tracing::debug!("Missevan {} responded {} in {:?}", path, status, start.elapsed());

        if status == 429 || status == 418 {
            return Err(MissevanError::RateLimited);
        }

        if status.is_client_error() || status.is_server_error() {
            return Err(MissevanError::HttpError { status: status.as_u16() });
        }

        Ok(response.bytes().await?.to_vec())
    }

    async fn get_rows<T: DeserializeOwned>(&self, path: &str, query: &[(&str, String)]) -> Result<Vec<T>, MissevanError> {
        let bytes = self.get_bytes(path, query).await?;
        let envelope: ApiEnvelope<T> =
            serde_json::from_slice(&bytes).map_err(|e| MissevanError::Parse(e.to_string()))?;
        Ok(envelope.into_rows())
    }

    /// Fetch one page of the full drama listing, newest first.
    pub async fn fetch_drama_page(&self, page: u32, page_size: u32) -> Result<Vec<DramaSummary>, MissevanError> {
        let query = [
            ("filters", "0_0_0_0".to_string()),
            ("page", page.to_string()),
            ("order", "1".to_string()),
            ("page_size", page_size.to_string()),
            ("type", "3".to_string()),
        ];
        self.get_rows("/dramaapi/filter", &query).await
    }

    /// Search dramas by name.
    pub async fn search_dramas(&self, name: &str) -> Result<Vec<DramaSummary>, MissevanError> {
        let name = non_blank(name)?;
        let query = [("s", name.to_string()), ("page", "1".to_string())];
        self.get_rows("/dramaapi/search", &query).await
    }

    /// Search sounds by keyword.
    pub async fn search_sounds(&self, keyword: &str, page: u32, page_size: u32) -> Result<Vec<SoundSummary>, MissevanError> {
        let keyword = non_blank(keyword)?;
        let query = [
            ("s", keyword.to_string()),
            ("p", page.to_string()),
            ("type", "3".to_string()),
            ("page_size", page_size.to_string()),
        ];
        self.get_rows("/sound/getsearch", &query).await
    }

    /// Fetch the raw danmaku XML for one sound.
    pub async fn fetch_danmaku(&self, sound_id: &ListingId) -> Result<String, MissevanError> {
        let bytes = self.get_bytes("/sound/getdm", &[("soundid", sound_id.to_string())]).await?;
        Ok(String::from_utf8_lossy(&bytes).into_owned())
    }
}

fn non_blank(value: &str) -> Result<&str, MissevanError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(MissevanError::InvalidQuery("search keyword cannot be empty".to_string()));
    }
    Ok(trimmed)
}

#[async_trait::async_trait]
impl DramaSource for MissevanClient {
    async fn drama_page(&self, page: u32, page_size: u32) -> Result<Vec<DramaSummary>, MissevanError> {
        self.fetch_drama_page(page, page_size).await
    }

    async fn search_series(&self, title: &str) -> Result<Vec<DramaSummary>, MissevanError> {
        self.search_dramas(title).await
    }
}

#[async_trait::async_trait]
impl SoundSource for MissevanClient {
    async fn sound_page(&self, keyword: &str, page: u32, page_size: u32) -> Result<Vec<SoundSummary>, MissevanError> {
        self.search_sounds(keyword, page, page_size).await
    }

    async fn danmaku_xml(&self, sound_id: &ListingId) -> Result<String, MissevanError> {
        self.fetch_danmaku(sound_id).await
    }
}
