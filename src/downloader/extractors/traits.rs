// MediaResolver trait and common types

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;

use crate::downloader::errors::DownloadError;
use crate::downloader::models::{MediaResult, Platform};

pub const DEFAULT_LATENCY_MS: u64 = 2000;
pub const DEFAULT_CAROUSEL_PROBABILITY: f64 = 0.3;
pub const DEFAULT_PLACEHOLDER_BASE: &str = "https://via.placeholder.com";
pub const SAMPLE_VIDEO_URL: &str =
    "https://sample-videos.com/zip/10/mp4/SampleVideo_1280x720_1mb.mp4";

/// Configuration for mock resolution
#[derive(Debug, Clone)]
pub struct ResolverConfig {
    /// Artificial round-trip delay before a payload is produced
    pub latency: Duration,
    /// Chance that a regular post resolves to a carousel
    pub carousel_probability: f64,
    /// Base of the placeholder image service
    pub placeholder_base: String,
    /// Video served for reels and long-form posts
    pub sample_video_url: String,
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            latency: Duration::from_millis(DEFAULT_LATENCY_MS),
            carousel_probability: DEFAULT_CAROUSEL_PROBABILITY,
            placeholder_base: DEFAULT_PLACEHOLDER_BASE.to_string(),
            sample_video_url: SAMPLE_VIDEO_URL.to_string(),
        }
    }
}

impl ResolverConfig {
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = latency;
        self
    }

    pub fn with_carousel_probability(mut self, probability: f64) -> Self {
        self.carousel_probability = probability.clamp(0.0, 1.0);
        self
    }

    pub fn with_placeholder_base(mut self, base: impl Into<String>) -> Self {
        self.placeholder_base = base.into().trim_end_matches('/').to_string();
        self
    }

    pub fn with_sample_video_url(mut self, url: impl Into<String>) -> Self {
        self.sample_video_url = url.into();
        self
    }

    /// 640x640 brand-coloured placeholder carrying `text`
    pub fn placeholder_url(&self, text: &str) -> String {
        format!(
            "{}/640x640/E4405F/FFFFFF?text={}",
            self.placeholder_base.trim_end_matches('/'),
            text
        )
    }
}

/// Post subtype encoded in the URL path
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PostSubtype {
    /// `/p/<id>`: single image or carousel
    Post,
    /// `/reel/<id>`
    Reel,
    /// `/tv/<id>`: long-form video
    Tv,
}

impl PostSubtype {
    pub fn is_video(&self) -> bool {
        matches!(self, Self::Reel | Self::Tv)
    }
}

impl fmt::Display for PostSubtype {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Post => write!(f, "p"),
            Self::Reel => write!(f, "reel"),
            Self::Tv => write!(f, "tv"),
        }
    }
}

/// Identifier and subtype pulled out of a post URL
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PostRef {
    pub subtype: PostSubtype,
    pub id: String,
}

/// Trait for platform resolvers
#[async_trait]
pub trait MediaResolver: Send + Sync {
    /// Name of the resolver (for logging)
    fn name(&self) -> &'static str;

    /// Platform this resolver handles
    fn platform(&self) -> Platform;

    /// Resolve a classified URL into media. May fail; callers decide how to degrade.
    async fn resolve(&self, url: &str) -> Result<MediaResult, DownloadError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_placeholder_url_format() {
        let config = ResolverConfig::default();
        assert_eq!(
            config.placeholder_url("Instagram+Post+ABC"),
            "https://via.placeholder.com/640x640/E4405F/FFFFFF?text=Instagram+Post+ABC"
        );
    }

    #[test]
    fn test_builder_normalizes_inputs() {
        let config = ResolverConfig::default()
            .with_carousel_probability(1.7)
            .with_placeholder_base("http://localhost:9000/");
        assert_eq!(config.carousel_probability, 1.0);
        assert_eq!(
            config.placeholder_url("x"),
            "http://localhost:9000/640x640/E4405F/FFFFFF?text=x"
        );
    }
}
