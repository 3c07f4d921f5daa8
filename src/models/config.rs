//! Application configuration structures.

use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use url::Url;

use crate::error::{AppError, Result};

/// Environment variable carrying the feed username.
pub const FEED_USER_ENV: &str = "FEEDSYNC_FEED_USER";

/// Environment variable carrying the feed password.
pub const FEED_PASS_ENV: &str = "FEEDSYNC_FEED_PASS";

/// Root application configuration.
///
/// Constructed once at process start and passed by reference into each
/// pipeline step; nothing reads ambient global state after that.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Remote feed location and transfer behavior
    #[serde(default)]
    pub feed: FeedConfig,

    /// Local file locations
    #[serde(default)]
    pub paths: PathsConfig,

    /// Product image URL construction
    #[serde(default)]
    pub images: ImageConfig,

    /// Tagging of generated rows
    #[serde(default)]
    pub tags: TagConfig,
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        Ok(toml::from_str(&content)?)
    }

    /// Load configuration or return default if loading fails.
    pub fn load_or_default(path: impl AsRef<Path>) -> Self {
        Self::load(&path).unwrap_or_else(|e| {
            log::warn!(
                "Config load failed from {:?}: {}. Using defaults.",
                path.as_ref(),
                e
            );
            Self::default()
        })
    }

    /// Validate configuration values for basic sanity.
    pub fn validate(&self) -> Result<()> {
        if self.feed.base_url.trim().is_empty() {
            return Err(AppError::validation("feed.base_url is empty"));
        }
        if Url::parse(&self.feed.base_url).is_err() {
            return Err(AppError::validation("feed.base_url is not a valid URL"));
        }
        if !self.feed.base_url.ends_with('/') {
            return Err(AppError::validation(
                "feed.base_url must end with '/' so file paths resolve under it",
            ));
        }
        if self.feed.user_agent.trim().is_empty() {
            return Err(AppError::validation("feed.user_agent is empty"));
        }
        if self.feed.timeout_secs == 0 {
            return Err(AppError::validation("feed.timeout_secs must be > 0"));
        }
        for (name, value) in [
            ("feed.pricing_path", &self.feed.pricing_path),
            ("feed.products_path", &self.feed.products_path),
            ("feed.availability_path", &self.feed.availability_path),
        ] {
            if value.trim().is_empty() {
                return Err(AppError::validation(format!("{} is empty", name)));
            }
        }
        if self.images.base_url.trim().is_empty() {
            return Err(AppError::validation("images.base_url is empty"));
        }
        if self.tags.source.trim().is_empty() {
            return Err(AppError::validation("tags.source is empty"));
        }
        Ok(())
    }

    /// Local landing path for a remote feed file (basename under data_dir).
    pub fn download_path(&self, remote_path: &str) -> PathBuf {
        let name = remote_path.rsplit('/').next().unwrap_or(remote_path);
        self.paths.data_dir.join(name)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            feed: FeedConfig::default(),
            paths: PathsConfig::default(),
            images: ImageConfig::default(),
            tags: TagConfig::default(),
        }
    }
}

/// Remote feed location and transfer behavior.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeedConfig {
    /// Base URL of the feed host; file paths are resolved against it
    #[serde(default = "defaults::base_url")]
    pub base_url: String,

    /// Remote path of the pricing table
    #[serde(default = "defaults::pricing_path")]
    pub pricing_path: String,

    /// Remote path of the product export workbook
    #[serde(default = "defaults::products_path")]
    pub products_path: String,

    /// Remote path of the stock availability table
    #[serde(default = "defaults::availability_path")]
    pub availability_path: String,

    /// User-Agent header for transfer requests
    #[serde(default = "defaults::user_agent")]
    pub user_agent: String,

    /// Request timeout in seconds
    #[serde(default = "defaults::timeout")]
    pub timeout_secs: u64,
}

impl Default for FeedConfig {
    fn default() -> Self {
        Self {
            base_url: defaults::base_url(),
            pricing_path: defaults::pricing_path(),
            products_path: defaults::products_path(),
            availability_path: defaults::availability_path(),
            user_agent: defaults::user_agent(),
            timeout_secs: defaults::timeout(),
        }
    }
}

/// Local file locations.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PathsConfig {
    /// Directory the fetched feed files land in
    #[serde(default = "defaults::data_dir")]
    pub data_dir: PathBuf,

    /// Generated import file
    #[serde(default = "defaults::output_file")]
    pub output_file: PathBuf,

    /// Baseline document (known SKUs + last-updated timestamp)
    #[serde(default = "defaults::baseline_file")]
    pub baseline_file: PathBuf,
}

impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            data_dir: defaults::data_dir(),
            output_file: defaults::output_file(),
            baseline_file: defaults::baseline_file(),
        }
    }
}

/// Product image URL construction.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImageConfig {
    /// Prefix for image URLs
    #[serde(default = "defaults::image_base_url")]
    pub base_url: String,

    /// File extension appended to the image stem
    #[serde(default = "defaults::image_extension")]
    pub extension: String,
}

impl Default for ImageConfig {
    fn default() -> Self {
        Self {
            base_url: defaults::image_base_url(),
            extension: defaults::image_extension(),
        }
    }
}

/// Tagging of generated rows.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TagConfig {
    /// Marker tag identifying the feed source, applied to every row
    #[serde(default = "defaults::source_tag")]
    pub source: String,

    /// Review tag applied to products not yet in the baseline
    #[serde(default = "defaults::new_import_tag")]
    pub new_import: String,
}

impl Default for TagConfig {
    fn default() -> Self {
        Self {
            source: defaults::source_tag(),
            new_import: defaults::new_import_tag(),
        }
    }
}

/// Feed credentials, resolved from the environment at process start and
/// passed by reference into the transfer step only. Never persisted,
/// never defaulted.
#[derive(Clone)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

impl Credentials {
    /// Read credentials from the environment.
    pub fn from_env() -> Result<Self> {
        let username = env::var(FEED_USER_ENV)
            .map_err(|_| AppError::config(format!("{} is not set", FEED_USER_ENV)))?;
        let password = env::var(FEED_PASS_ENV)
            .map_err(|_| AppError::config(format!("{} is not set", FEED_PASS_ENV)))?;
        Self::from_parts(username, password)
    }

    fn from_parts(username: String, password: String) -> Result<Self> {
        if username.trim().is_empty() {
            return Err(AppError::config("feed username is empty"));
        }
        Ok(Self { username, password })
    }
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

mod defaults {
    use std::path::PathBuf;

    // Feed defaults
    pub fn base_url() -> String {
        "https://feed.toolbank.com/".into()
    }
    pub fn pricing_path() -> String {
        "pricing.csv".into()
    }
    pub fn products_path() -> String {
        "Data/ProductExport.xlsx".into()
    }
    pub fn availability_path() -> String {
        "UnitData-01/Availability01D.csv".into()
    }
    pub fn user_agent() -> String {
        "feedsync/0.1".into()
    }
    pub fn timeout() -> u64 {
        30
    }

    // Path defaults
    pub fn data_dir() -> PathBuf {
        "data".into()
    }
    pub fn output_file() -> PathBuf {
        "output/import.csv".into()
    }
    pub fn baseline_file() -> PathBuf {
        "baseline.json".into()
    }

    // Image defaults
    pub fn image_base_url() -> String {
        "https://www.toolbank.com/productimages/".into()
    }
    pub fn image_extension() -> String {
        ".jpg".into()
    }

    // Tag defaults
    pub fn source_tag() -> String {
        "Toolbank".into()
    }
    pub fn new_import_tag() -> String {
        "New-Import".into()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validate_default_config_ok() {
        assert!(Config::default().validate().is_ok());
    }

    #[test]
    fn validate_rejects_empty_user_agent() {
        let mut config = Config::default();
        config.feed.user_agent = "  ".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn validate_rejects_zero_timeout() {
        let mut config = Config::default();
        config.feed.timeout_secs = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn validate_rejects_base_url_without_trailing_slash() {
        let mut config = Config::default();
        config.feed.base_url = "https://feed.toolbank.com".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn validate_rejects_empty_remote_path() {
        let mut config = Config::default();
        config.feed.products_path = String::new();
        assert!(config.validate().is_err());
    }

    #[test]
    fn partial_toml_fills_defaults() {
        let config: Config = toml::from_str(
            r#"
            [tags]
            source = "Acme"
            "#,
        )
        .unwrap();
        assert_eq!(config.tags.source, "Acme");
        assert_eq!(config.tags.new_import, "New-Import");
        assert_eq!(config.feed.timeout_secs, 30);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn download_path_uses_basename() {
        let config = Config::default();
        assert_eq!(
            config.download_path("Data/ProductExport.xlsx"),
            PathBuf::from("data/ProductExport.xlsx")
        );
        assert_eq!(
            config.download_path("pricing.csv"),
            PathBuf::from("data/pricing.csv")
        );
    }

    #[test]
    fn credentials_reject_empty_username() {
        assert!(Credentials::from_parts("  ".into(), "pw".into()).is_err());
        assert!(Credentials::from_parts("user".into(), "pw".into()).is_ok());
    }

    #[test]
    fn credentials_debug_redacts_password() {
        let creds = Credentials::from_parts("user".into(), "hunter2".into()).unwrap();
        let rendered = format!("{:?}", creds);
        assert!(rendered.contains("user"));
        assert!(!rendered.contains("hunter2"));
    }
}
