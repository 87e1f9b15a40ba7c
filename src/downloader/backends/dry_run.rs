// Offline collaborators: log instead of touching the network

use async_trait::async_trait;
use tracing::info;

use crate::downloader::errors::DownloadError;
use crate::downloader::models::AssetKind;
use crate::downloader::traits::{AssetProbe, LinkTrigger};

/// Logs each download it is asked to start
pub struct DryRunLinkTrigger;

#[async_trait]
impl LinkTrigger for DryRunLinkTrigger {
    fn name(&self) -> &'static str {
        "dry-run"
    }

    async fn trigger(&self, source_url: &str, suggested_filename: &str) -> Result<(), DownloadError> {
        info!(url = source_url, filename = suggested_filename, "dry run: download not performed");
        Ok(())
    }
}

/// Treats every preview asset as loaded
pub struct AssumeLoaded;

#[async_trait]
impl AssetProbe for AssumeLoaded {
    async fn load(&self, _url: &str, _kind: AssetKind) -> Result<(), DownloadError> {
        Ok(())
    }
}
