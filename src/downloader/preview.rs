// Preview overlay - enlarged view of a result or of one carousel item
//
// Closed -> Open -> Closed. Re-opening replaces the content. Assets are loaded
// through an AssetProbe before the overlay is shown; a failed load keeps the
// overlay closed and raises an error notification.

use serde::Serialize;
use std::sync::Arc;
use tracing::{debug, warn};

use super::errors::DownloadError;
use super::models::{AssetKind, MediaResult};
use super::presentation::PreviewTarget;
use super::traits::{AssetProbe, NotificationDurations, Notifier};

/// Embedded player state
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct Playback {
    pub playing: bool,
    pub position_secs: f64,
}

impl Playback {
    fn reset(&mut self) {
        self.playing = false;
        self.position_secs = 0.0;
    }
}

/// What the overlay is currently showing
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OpenPreview {
    pub title: String,
    pub target: PreviewTarget,
    /// Whether the footer download button is visible
    pub show_download: bool,
}

pub struct PreviewOverlay {
    current: Option<OpenPreview>,
    playback: Playback,
    probe: Arc<dyn AssetProbe>,
    notifier: Arc<dyn Notifier>,
    durations: NotificationDurations,
}

impl PreviewOverlay {
    pub fn new(probe: Arc<dyn AssetProbe>, notifier: Arc<dyn Notifier>) -> Self {
        Self {
            current: None,
            playback: Playback::default(),
            probe,
            notifier,
            durations: NotificationDurations::default(),
        }
    }

    pub fn with_durations(mut self, durations: NotificationDurations) -> Self {
        self.durations = durations;
        self
    }

    pub fn is_open(&self) -> bool {
        self.current.is_some()
    }

    pub fn current(&self) -> Option<&OpenPreview> {
        self.current.as_ref()
    }

    pub fn playback(&self) -> Playback {
        self.playback
    }

    /// Show `target`, replacing whatever is displayed
    pub async fn open(
        &mut self,
        title: impl Into<String>,
        target: PreviewTarget,
        show_download: bool,
    ) -> Result<(), DownloadError> {
        let title = title.into();

        if let Some((url, kind)) = target.asset() {
            let loaded = self.probe.load(url, kind).await;
            if let Err(e) = loaded {
                warn!(error = %e, url, "preview asset failed to load");
                self.close();
                let message = match kind {
                    AssetKind::Image => "Failed to load image preview",
                    AssetKind::Video => "Failed to load video preview",
                };
                self.notifier.notify(self.durations.error(message));
                return Err(DownloadError::AssetLoadFailure(url.to_string()));
            }
        }

        debug!(%title, show_download, "preview opened");
        // A new player element starts paused at zero
        self.playback.reset();
        self.current = Some(OpenPreview {
            title,
            target,
            show_download,
        });
        Ok(())
    }

    /// Drill into item `index` (0-based) of the displayed carousel
    pub async fn open_item(&mut self, index: usize) -> Result<(), DownloadError> {
        let (url, show_download) = match &self.current {
            Some(OpenPreview {
                target: PreviewTarget::Media(MediaResult::Carousel(carousel)),
                show_download,
                ..
            }) => {
                let item = carousel.items().get(index).ok_or_else(|| {
                    DownloadError::InvalidMedia(format!(
                        "carousel has {} items, no item {}",
                        carousel.items().len(),
                        index + 1
                    ))
                })?;
                (item.url().to_string(), *show_download)
            }
            _ => {
                return Err(DownloadError::InvalidMedia(
                    "no carousel is being previewed".to_string(),
                ))
            }
        };

        self.open(
            format!("Image {}", index + 1),
            PreviewTarget::Item {
                url,
                kind: AssetKind::Image,
            },
            show_download,
        )
        .await
    }

    /// Hide the overlay. Always pauses and rewinds playback.
    pub fn close(&mut self) {
        self.playback.reset();
        if self.current.take().is_some() {
            debug!("preview closed");
        }
    }

    /// Start the embedded player; false when no video is shown
    pub fn play(&mut self) -> bool {
        if !self.showing_video() {
            return false;
        }
        self.playback.playing = true;
        true
    }

    pub fn pause(&mut self) {
        self.playback.playing = false;
    }

    /// Move the playhead; negative positions clamp to zero
    pub fn seek(&mut self, position_secs: f64) -> bool {
        if !self.showing_video() {
            return false;
        }
        self.playback.position_secs = position_secs.max(0.0);
        true
    }

    fn showing_video(&self) -> bool {
        self.current
            .as_ref()
            .map(|c| c.target.is_video())
            .unwrap_or(false)
    }
}
