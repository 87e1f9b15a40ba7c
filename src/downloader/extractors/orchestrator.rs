// Resolver orchestrator - platform dispatch and the never-fail guarantee
//
// Every failure below this point (unknown platform, unparseable post path,
// invalid payload) is logged and turned into a placeholder image, so callers
// always receive a MediaResult.

use std::sync::Arc;
use tracing::{info, warn};

use super::coin::{Coin, SystemCoin};
use super::instagram::InstagramResolver;
use super::traits::{MediaResolver, ResolverConfig};
use crate::downloader::errors::DownloadError;
use crate::downloader::models::{ImageMedia, MediaResult, Platform};

/// Orchestrator that owns one resolver per platform
pub struct ResolverOrchestrator {
    resolvers: Vec<Box<dyn MediaResolver>>,
    config: ResolverConfig,
}

impl ResolverOrchestrator {
    /// Orchestrator with no resolvers; every call degrades
    pub fn empty(config: ResolverConfig) -> Self {
        Self {
            resolvers: Vec::new(),
            config,
        }
    }

    /// Default resolvers with an injected randomness source
    pub fn with_coin(config: ResolverConfig, coin: Arc<dyn Coin>) -> Self {
        let mut orchestrator = Self::empty(config.clone());
        orchestrator.add_resolver(Box::new(InstagramResolver::new(config, coin)));
        orchestrator
    }

    pub fn new(config: ResolverConfig) -> Self {
        Self::with_coin(config, Arc::new(SystemCoin))
    }

    /// Register a resolver; a later registration for the same platform wins
    pub fn add_resolver(&mut self, resolver: Box<dyn MediaResolver>) {
        let platform = resolver.platform();
        self.resolvers.retain(|r| r.platform() != platform);
        self.resolvers.push(resolver);
    }

    pub fn config(&self) -> &ResolverConfig {
        &self.config
    }

    /// Resolve without degradation, for callers that want the raw error
    pub async fn try_resolve(
        &self,
        url: &str,
        platform: Platform,
    ) -> Result<MediaResult, DownloadError> {
        let resolver = self
            .resolvers
            .iter()
            .find(|r| r.platform() == platform)
            .ok_or_else(|| DownloadError::UnsupportedPlatform(platform.to_string()))?;

        info!(resolver = resolver.name(), %platform, url, "resolving media");
        resolver.resolve(url).await
    }

    /// Resolve a classified URL. Never fails.
    pub async fn resolve(&self, url: &str, platform: Platform) -> MediaResult {
        match self.try_resolve(url, platform).await {
            Ok(media) => {
                info!(kind = %media.kind(), "resolved media");
                media
            }
            Err(e) => {
                warn!(error = %e, url, "resolution failed, using placeholder");
                self.fallback_media()
            }
        }
    }

    /// Generic placeholder returned when resolution fails
    pub fn fallback_media(&self) -> MediaResult {
        ImageMedia::placeholder(self.config.placeholder_url("Instagram+Image"))
            .with_description("Instagram Image (Failed to load)")
            .into()
    }
}

impl Default for ResolverOrchestrator {
    fn default() -> Self {
        Self::new(ResolverConfig::default())
    }
}
