// Application configuration - built-in defaults, user file, environment

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::debug;

use crate::downloader::errors::DownloadError;
use crate::downloader::extractors::{
    ResolverConfig, DEFAULT_CAROUSEL_PROBABILITY, DEFAULT_LATENCY_MS, DEFAULT_PLACEHOLDER_BASE,
};
use crate::downloader::traits::NotificationDurations;

pub const DEFAULT_CONFIG: &str = include_str!("../config/default.toml");

const ENV_LATENCY_MS: &str = "POST_DOWNLOADER_LATENCY_MS";
const ENV_OUTPUT_DIR: &str = "POST_DOWNLOADER_OUTPUT_DIR";
const ENV_PROXY: &str = "POST_DOWNLOADER_PROXY";

/// Top-level application configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub resolver: ResolverSection,
    pub notifications: NotificationSection,
    pub download: DownloadSection,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ResolverSection {
    pub latency_ms: u64,
    pub carousel_probability: f64,
    pub placeholder_base: String,
}

impl Default for ResolverSection {
    fn default() -> Self {
        Self {
            latency_ms: DEFAULT_LATENCY_MS,
            carousel_probability: DEFAULT_CAROUSEL_PROBABILITY,
            placeholder_base: DEFAULT_PLACEHOLDER_BASE.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NotificationSection {
    pub default_duration_ms: u64,
    pub success_duration_ms: u64,
}

impl Default for NotificationSection {
    fn default() -> Self {
        let durations = NotificationDurations::default();
        Self {
            default_duration_ms: durations.default_ms,
            success_duration_ms: durations.success_ms,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DownloadSection {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub output_dir: Option<PathBuf>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub proxy: Option<String>,
    pub timeout_secs: u64,
}

impl Default for DownloadSection {
    fn default() -> Self {
        Self {
            output_dir: None,
            proxy: None,
            timeout_secs: 30,
        }
    }
}

impl AppConfig {
    /// Load the user config file (if present) and apply environment overrides.
    pub fn load() -> Result<Self, DownloadError> {
        let path = Self::config_path();
        let mut config = if path.exists() {
            Self::load_from(&path)?
        } else {
            debug!(path = %path.display(), "no user config, using defaults");
            Self::default()
        };
        config.apply_env(|key| std::env::var(key).ok());
        config.validate()?;
        Ok(config)
    }

    /// Load an explicit file. Missing keys fall back to the built-in defaults.
    pub fn load_from(path: &Path) -> Result<Self, DownloadError> {
        let raw = std::fs::read_to_string(path)
            .map_err(|e| DownloadError::Config(format!("{}: {}", path.display(), e)))?;
        let config: AppConfig = toml::from_str(&raw)?;
        config.validate()?;
        debug!(path = %path.display(), "loaded config");
        Ok(config)
    }

    /// Path to the user config file.
    pub fn config_path() -> PathBuf {
        dirs::config_dir()
            .map(|d| d.join("post-downloader").join("config.toml"))
            .unwrap_or_else(|| PathBuf::from("config.toml"))
    }

    /// Apply `POST_DOWNLOADER_*` overrides read through `lookup`.
    /// Unparseable latency values are ignored.
    pub fn apply_env<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(ms) = lookup(ENV_LATENCY_MS).and_then(|v| v.trim().parse().ok()) {
            self.resolver.latency_ms = ms;
        }
        if let Some(dir) = lookup(ENV_OUTPUT_DIR).filter(|v| !v.trim().is_empty()) {
            self.download.output_dir = Some(PathBuf::from(dir));
        }
        if let Some(proxy) = lookup(ENV_PROXY).filter(|v| !v.trim().is_empty()) {
            self.download.proxy = Some(proxy);
        }
    }

    pub fn validate(&self) -> Result<(), DownloadError> {
        let p = self.resolver.carousel_probability;
        if !(0.0..=1.0).contains(&p) {
            return Err(DownloadError::Config(format!(
                "resolver.carousel_probability must be within [0, 1], got {}",
                p
            )));
        }
        if self.resolver.placeholder_base.trim().is_empty() {
            return Err(DownloadError::Config(
                "resolver.placeholder_base must not be empty".to_string(),
            ));
        }
        Ok(())
    }

    pub fn resolver_config(&self) -> ResolverConfig {
        ResolverConfig::default()
            .with_latency(Duration::from_millis(self.resolver.latency_ms))
            .with_carousel_probability(self.resolver.carousel_probability)
            .with_placeholder_base(self.resolver.placeholder_base.clone())
    }

    pub fn durations(&self) -> NotificationDurations {
        NotificationDurations {
            default_ms: self.notifications.default_duration_ms,
            success_ms: self.notifications.success_duration_ms,
        }
    }

    /// Where downloads are written: configured dir, system download dir, or `.`
    pub fn output_dir(&self) -> PathBuf {
        self.download
            .output_dir
            .clone()
            .or_else(dirs::download_dir)
            .unwrap_or_else(|| PathBuf::from("."))
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.download.timeout_secs)
    }
}
