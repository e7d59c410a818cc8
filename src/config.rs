//! Runtime configuration.
//!
//! Everything has a working default so a storefront can start without any
//! environment. Values are read once at startup by [`StorefrontConfig::from_env`].

use std::env;
use std::fmt::Display;
use std::path::PathBuf;
use std::str::FromStr;
use thiserror::Error;
use tracing::{info, warn};

pub const DEFAULT_API_BASE_URL: &str = "https://api.orderfood.coffee/api/v1";

#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("Invalid {key} value: {reason}")]
    InvalidValue { key: &'static str, reason: String },
}

/// Which gateway environment hosted checkout runs against.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum CheckoutMode {
    #[default]
    Production,
    Sandbox,
}

impl FromStr for CheckoutMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "production" => Ok(CheckoutMode::Production),
            "sandbox" => Ok(CheckoutMode::Sandbox),
            other => Err(format!("unknown checkout mode '{other}'")),
        }
    }
}

impl Display for CheckoutMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CheckoutMode::Production => f.write_str("production"),
            CheckoutMode::Sandbox => f.write_str("sandbox"),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct StorefrontConfig {
    /// Base of every backend path, without a trailing slash.
    pub api_base_url: String,
    /// Directory holding the persisted session id. `None` means no persistent
    /// storage, in which case the session id is empty.
    pub session_dir: Option<PathBuf>,
    /// Hosts that absolute image URLs may point at.
    pub image_hosts: Vec<String>,
    pub checkout_mode: CheckoutMode,
}

impl Default for StorefrontConfig {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
            session_dir: None,
            image_hosts: vec!["images.unsplash.com".to_string()],
            checkout_mode: CheckoutMode::Production,
        }
    }
}

impl StorefrontConfig {
    /// Reads configuration from the environment.
    ///
    /// - `STOREFRONT_API_BASE_URL`: backend base URL
    /// - `STOREFRONT_SESSION_DIR`: directory for the session id file
    /// - `STOREFRONT_IMAGE_HOSTS`: comma-separated image host allowlist
    /// - `STOREFRONT_CHECKOUT_MODE`: `production` or `sandbox`
    pub fn from_env() -> Result<Self, ConfigError> {
        let defaults = Self::default();

        let api_base_url = var("STOREFRONT_API_BASE_URL")
            .map(|url| url.trim_end_matches('/').to_string())
            .unwrap_or(defaults.api_base_url);

        let session_dir = var("STOREFRONT_SESSION_DIR").map(PathBuf::from);

        let image_hosts = var("STOREFRONT_IMAGE_HOSTS")
            .map(|hosts| {
                hosts
                    .split(',')
                    .map(str::trim)
                    .filter(|host| !host.is_empty())
                    .map(str::to_string)
                    .collect()
            })
            .unwrap_or(defaults.image_hosts);

        let checkout_mode = try_load("STOREFRONT_CHECKOUT_MODE", defaults.checkout_mode)?;

        let config = Self {
            api_base_url,
            session_dir,
            image_hosts,
            checkout_mode,
        };
        info!(api = %config.api_base_url, mode = %config.checkout_mode, "Configuration loaded");
        Ok(config)
    }

    pub fn with_api_base_url(mut self, url: impl Into<String>) -> Self {
        self.api_base_url = url.into().trim_end_matches('/').to_string();
        self
    }

    pub fn with_session_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.session_dir = Some(dir.into());
        self
    }

    pub fn with_image_host(mut self, host: impl Into<String>) -> Self {
        self.image_hosts.push(host.into());
        self
    }

    pub fn with_checkout_mode(mut self, mode: CheckoutMode) -> Self {
        self.checkout_mode = mode;
        self
    }
}

fn var(key: &str) -> Option<String> {
    match env::var(key) {
        Ok(value) if !value.trim().is_empty() => Some(value),
        _ => {
            info!("{key} not set, using default");
            None
        }
    }
}

fn try_load<T>(key: &'static str, default: T) -> Result<T, ConfigError>
where
    T: FromStr + Display,
    T::Err: Display,
{
    match var(key) {
        Some(raw) => raw.parse().map_err(|e: T::Err| {
            warn!("Invalid {key} value: {e}");
            ConfigError::InvalidValue {
                key,
                reason: e.to_string(),
            }
        }),
        None => Ok(default),
    }
}
