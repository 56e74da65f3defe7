//! Application configuration with layered loading.
//!
//! This module provides configuration management using figment for layered
//! configuration loading from multiple sources:
//!
//! 1. Environment variables (JIDANJIA_*)
//! 2. TOML config file (if JIDANJIA_CONFIG_FILE set)
//! 3. Built-in defaults

use std::path::{Path, PathBuf};
use std::time::Duration;

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};

mod validation;

pub use validation::ConfigError;

/// Application configuration with layered loading.
///
/// Loading precedence (highest wins):
/// 1. Environment variables (JIDANJIA_*)
/// 2. TOML config file (if JIDANJIA_CONFIG_FILE set)
/// 3. Built-in defaults
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Origin of the Missevan API.
    ///
    /// Set via JIDANJIA_API_BASE environment variable.
    #[serde(default = "default_api_base")]
    pub api_base: String,

    /// User-Agent string for HTTP requests.
    ///
    /// Set via JIDANJIA_USER_AGENT environment variable.
    #[serde(default = "default_user_agent")]
    pub user_agent: String,

    /// HTTP request timeout in milliseconds.
    ///
    /// Set via JIDANJIA_TIMEOUT_MS environment variable.
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,

    /// Maximum number of drama list pages to crawl.
    #[serde(default = "default_max_pages")]
    pub max_pages: u32,

    /// Page size for the drama list endpoint.
    #[serde(default = "default_page_size")]
    pub page_size: u32,

    /// Page size for the sound search endpoint (danmaku collection).
    #[serde(default = "default_sound_page_size")]
    pub sound_page_size: u32,

    /// Pause between drama list pages, in milliseconds.
    #[serde(default = "default_page_delay_ms")]
    pub page_delay_ms: u64,

    /// Pause between listings, in milliseconds.
    #[serde(default = "default_item_delay_ms")]
    pub item_delay_ms: u64,

    /// Worker bound for batch analysis.
    #[serde(default = "default_max_concurrency")]
    pub max_concurrency: usize,

    /// Where `crawl` writes its CSV export.
    ///
    /// Set via JIDANJIA_OUTPUT_PATH environment variable.
    #[serde(default = "default_output_path")]
    pub output_path: PathBuf,
}

fn default_api_base() -> String {
    "https://www.missevan.com".into()
}

fn default_user_agent() -> String {
    "Mozilla/5.0".into()
}

fn default_timeout_ms() -> u64 {
    10_000
}

fn default_max_pages() -> u32 {
    100
}

fn default_page_size() -> u32 {
    20
}

fn default_sound_page_size() -> u32 {
    30
}

fn default_page_delay_ms() -> u64 {
    500
}

fn default_item_delay_ms() -> u64 {
    300
}

fn default_max_concurrency() -> usize {
    4
}

fn default_output_path() -> PathBuf {
    PathBuf::from("全部付费广播剧_集均价统计.csv")
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            api_base: default_api_base(),
            user_agent: default_user_agent(),
            timeout_ms: default_timeout_ms(),
            max_pages: default_max_pages(),
            page_size: default_page_size(),
            sound_page_size: default_sound_page_size(),
            page_delay_ms: default_page_delay_ms(),
            item_delay_ms: default_item_delay_ms(),
            max_concurrency: default_max_concurrency(),
            output_path: default_output_path(),
        }
    }
}

impl AppConfig {
    /// Timeout as Duration for use with reqwest/tokio.
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    pub fn page_delay(&self) -> Duration {
        Duration::from_millis(self.page_delay_ms)
    }

    pub fn item_delay(&self) -> Duration {
        Duration::from_millis(self.item_delay_ms)
    }

    /// Load configuration from all sources with layered precedence.
    ///
    /// Priority (highest wins):
    /// 1. Environment variables prefixed with `JIDANJIA_`
    /// 2. TOML file from `JIDANJIA_CONFIG_FILE` (if set)
    /// 3. Built-in defaults via `Default::default()`
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if:
    /// - Configuration file cannot be read
    /// - Environment variables cannot be parsed
    /// - Validation fails after loading
    pub fn load() -> Result<Self, ConfigError> {
        let file = std::env::var("JIDANJIA_CONFIG_FILE").ok().map(PathBuf::from);
        Self::load_from(file.as_deref())
    }

    /// Load configuration with an explicit TOML file in place of `JIDANJIA_CONFIG_FILE`.
    ///
    /// Environment variables still take precedence over the file.
    pub fn load_from(file: Option<&Path>) -> Result<Self, ConfigError> {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));

        if let Some(path) = file {
            if !path.exists() {
                return Err(ConfigError::LoadFailed(format!("config file not found: {}", path.display())));
            }
            figment = figment.merge(Toml::file(path));
        }

        figment = figment.merge(
            Env::prefixed("JIDANJIA_")
                .ignore(&["CONFIG_FILE"])
                .map(|key| key.as_str().to_lowercase().into())
                .split("__"),
        );

        let config: Self = figment.extract().map_err(|e| ConfigError::LoadFailed(e.to_string()))?;

        config.validate()?;

        Ok(config)
    }
}
