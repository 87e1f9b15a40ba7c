// Instagram resolver - mock payloads, no calls to the platform
//
// Reels and /tv/ posts become a video with a thumbnail. Regular posts
// become a single image or a three-item carousel, decided by one coin draw.

use async_trait::async_trait;
use regex::Regex;
use std::sync::Arc;
use tracing::debug;

use super::coin::Coin;
use super::traits::{MediaResolver, PostRef, PostSubtype, ResolverConfig};
use crate::downloader::errors::DownloadError;
use crate::downloader::models::{
    CarouselMedia, ImageMedia, MediaResult, Platform, VideoForm, VideoMedia,
};

const CAROUSEL_SIZE: usize = 3;

lazy_static::lazy_static! {
    static ref POST_RE: Regex = Regex::new(r"/(p|reel|tv)/([A-Za-z0-9_-]+)").unwrap();
}

/// Pull the subtype and identifier out of a post URL
pub fn parse_post_url(url: &str) -> Result<PostRef, DownloadError> {
    let caps = POST_RE
        .captures(url)
        .ok_or_else(|| DownloadError::InvalidFormat(url.to_string()))?;

    let subtype = match &caps[1] {
        "reel" => PostSubtype::Reel,
        "tv" => PostSubtype::Tv,
        _ => PostSubtype::Post,
    };

    Ok(PostRef {
        subtype,
        id: caps[2].to_string(),
    })
}

pub struct InstagramResolver {
    config: ResolverConfig,
    coin: Arc<dyn Coin>,
}

impl InstagramResolver {
    pub fn new(config: ResolverConfig, coin: Arc<dyn Coin>) -> Self {
        Self { config, coin }
    }

    fn video(&self, id: &str) -> Result<MediaResult, DownloadError> {
        let thumbnail = self
            .config
            .placeholder_url(&format!("Instagram+Reel+{}", id));
        Ok(VideoMedia::new(self.config.sample_video_url.clone())?
            .with_thumbnail(thumbnail)
            .with_caption("Sample Instagram reel caption")
            .with_description(format!("Instagram Reel - {}", id))
            .with_form(VideoForm::Reel)
            .into())
    }

    fn carousel(&self, id: &str) -> Result<MediaResult, DownloadError> {
        let urls = (1..=CAROUSEL_SIZE).map(|n| {
            self.config
                .placeholder_url(&format!("Instagram+Image+{}+{}", n, id))
        });
        Ok(CarouselMedia::from_urls(urls)?
            .with_caption("Sample Instagram carousel post")
            .with_description(format!("Instagram Carousel - {}", id))
            .into())
    }

    fn image(&self, id: &str) -> Result<MediaResult, DownloadError> {
        let url = self.config.placeholder_url(&format!("Instagram+Post+{}", id));
        Ok(ImageMedia::new(url)?
            .with_caption("Sample Instagram post caption")
            .with_description(format!("Instagram Image - {}", id))
            .into())
    }

    /// Carousel iff the draw lands in the top `carousel_probability` of `[0, 1)`
    fn is_carousel(&self) -> bool {
        self.coin.draw() > 1.0 - self.config.carousel_probability
    }
}

#[async_trait]
impl MediaResolver for InstagramResolver {
    fn name(&self) -> &'static str {
        "instagram-mock"
    }

    fn platform(&self) -> Platform {
        Platform::Instagram
    }

    async fn resolve(&self, url: &str) -> Result<MediaResult, DownloadError> {
        let post = parse_post_url(url)?;
        debug!(id = %post.id, subtype = %post.subtype, "parsed post url");

        // Emulated network round-trip
        if !self.config.latency.is_zero() {
            tokio::time::sleep(self.config.latency).await;
        }

        if post.subtype.is_video() {
            self.video(&post.id)
        } else if self.is_carousel() {
            self.carousel(&post.id)
        } else {
            self.image(&post.id)
        }
    }
}
