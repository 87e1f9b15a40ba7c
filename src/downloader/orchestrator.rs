// Downloader facade - fetch, preview and download flows
//
// Each fetch produces a Session (platform + resolved media) that the caller
// threads into later preview and download calls. Nothing is kept between
// fetches here; surfaces decide how to hold the latest session.

use serde::Serialize;
use std::sync::Arc;
use tracing::{info, warn};

use super::classifier::classify;
use super::errors::DownloadError;
use super::extractors::ResolverOrchestrator;
use super::models::{DownloadProgress, MediaResult, Platform};
use super::presentation::{preview_title, Action, DownloadTarget, PresentationSelector, PreviewTarget};
use super::preview::PreviewOverlay;
use super::traits::{LinkTrigger, NotificationDurations, Notifier};

/// Result of one fetch, valid until the next one replaces it
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Session {
    platform: Platform,
    source_url: String,
    media: MediaResult,
}

impl Session {
    pub fn new(platform: Platform, source_url: impl Into<String>, media: MediaResult) -> Self {
        Self {
            platform,
            source_url: source_url.into(),
            media,
        }
    }

    pub fn platform(&self) -> Platform {
        self.platform
    }

    pub fn source_url(&self) -> &str {
        &self.source_url
    }

    pub fn media(&self) -> &MediaResult {
        &self.media
    }

    /// Download options for this session's media
    pub fn actions(&self) -> Vec<Action> {
        PresentationSelector::select(&self.media, self.platform)
    }

    pub fn preview_title(&self) -> String {
        preview_title(&self.media, self.platform)
    }
}

pub struct Downloader {
    resolver: ResolverOrchestrator,
    notifier: Arc<dyn Notifier>,
    links: Arc<dyn LinkTrigger>,
    durations: NotificationDurations,
}

impl Downloader {
    pub fn new(
        resolver: ResolverOrchestrator,
        notifier: Arc<dyn Notifier>,
        links: Arc<dyn LinkTrigger>,
    ) -> Self {
        Self {
            resolver,
            notifier,
            links,
            durations: NotificationDurations::default(),
        }
    }

    pub fn with_durations(mut self, durations: NotificationDurations) -> Self {
        self.durations = durations;
        self
    }

    pub fn durations(&self) -> NotificationDurations {
        self.durations
    }

    pub fn notifier(&self) -> Arc<dyn Notifier> {
        self.notifier.clone()
    }

    pub fn resolver(&self) -> &ResolverOrchestrator {
        &self.resolver
    }

    /// Classify the input, reporting a blocking validation message on failure
    pub fn validate(&self, input: &str) -> Result<Platform, DownloadError> {
        classify(input).map_err(|e| {
            self.notifier.notify(self.durations.error(e.user_message()));
            e
        })
    }

    /// "Fetch and show download options": validate, resolve, report progress
    pub async fn fetch(&self, input: &str) -> Result<Session, DownloadError> {
        let platform = self.validate(input)?;
        let url = input.trim();

        self.notifier
            .notify(self.durations.info(format!("Processing {} URL...", platform)));
        self.progress(20.0, "Processing");
        self.progress(40.0, "Fetching media");

        let media = self.resolver.resolve(url, platform).await;

        self.progress(80.0, "Preparing download options");
        self.progress(100.0, "Done");
        self.notifier.notify(
            self.durations
                .success(format!("Successfully processed {}!", media.kind())),
        );

        info!(%platform, kind = %media.kind(), url, "fetch complete");
        Ok(Session::new(platform, url, media))
    }

    /// "Preview only": resolve and open the overlay with a download footer.
    ///
    /// A preview asset that fails to load is reported by the overlay and
    /// leaves it closed; the session is still returned.
    pub async fn preview(
        &self,
        input: &str,
        overlay: &mut PreviewOverlay,
    ) -> Result<Session, DownloadError> {
        let platform = self.validate(input)?;
        let url = input.trim();

        self.notifier
            .notify(self.durations.info(format!("Loading preview for {}...", platform)));

        let media = self.resolver.resolve(url, platform).await;
        let session = Session::new(platform, url, media);

        match overlay
            .open(
                session.preview_title(),
                PreviewTarget::Media(session.media().clone()),
                true,
            )
            .await
        {
            Ok(()) => self
                .notifier
                .notify(self.durations.brief_success("Preview loaded successfully!")),
            Err(e) => warn!(error = %e, "preview could not be shown"),
        }

        Ok(session)
    }

    /// The overlay's download button: hide the preview, list download options
    pub fn download_options(&self, session: &Session, overlay: &mut PreviewOverlay) -> Vec<Action> {
        overlay.close();
        self.notifier.notify(self.durations.success(format!(
            "Download options ready for {}!",
            session.media().kind()
        )));
        session.actions()
    }

    /// Trigger one download and confirm it with `notice`
    pub async fn download(&self, target: &DownloadTarget, notice: &str) -> Result<(), DownloadError> {
        match self.trigger(target).await {
            Ok(()) => {
                self.notifier.notify(self.durations.brief_success(notice));
                Ok(())
            }
            Err(e) => {
                self.notifier.notify(self.durations.error(e.user_message()));
                Err(e)
            }
        }
    }

    /// Trigger every target in order; failures do not stop the remaining ones
    pub async fn download_all(&self, targets: &[DownloadTarget]) -> Result<(), DownloadError> {
        let mut failed = Vec::new();
        for target in targets {
            if let Err(e) = self.trigger(target).await {
                failed.push(format!("{}: {}", target.filename, e));
            }
        }

        if failed.is_empty() {
            self.notifier
                .notify(self.durations.brief_success("All downloads started!"));
            return Ok(());
        }

        let message = format!("{} of {} downloads failed", failed.len(), targets.len());
        self.notifier.notify(self.durations.error(message.clone()));
        Err(DownloadError::Transport(format!("{} ({})", message, failed.join("; "))))
    }

    /// Carry out an action from the list returned by `Session::actions`
    pub async fn run(&self, action: &Action, overlay: &mut PreviewOverlay) -> Result<(), DownloadError> {
        match action {
            Action::Preview { title, target, .. } => {
                overlay.open(title.clone(), target.clone(), false).await
            }
            Action::PreviewAll { title, media, .. } => {
                overlay
                    .open(title.clone(), PreviewTarget::Media(media.clone()), false)
                    .await
            }
            Action::Download { target, notice, .. } => self.download(target, notice).await,
            Action::DownloadAll { targets, .. } => self.download_all(targets).await,
            Action::Info { .. } => Ok(()),
        }
    }

    async fn trigger(&self, target: &DownloadTarget) -> Result<(), DownloadError> {
        info!(
            trigger = self.links.name(),
            url = %target.source_url,
            filename = %target.filename,
            "triggering download"
        );
        self.links
            .trigger(&target.source_url, &target.filename)
            .await
            .map_err(|e| {
                warn!(error = %e, filename = %target.filename, "download failed");
                e
            })
    }

    fn progress(&self, percent: f32, status: &str) {
        self.notifier.progress(DownloadProgress {
            percent,
            status: status.to_string(),
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::downloader::extractors::{FixedCoin, ResolverConfig};
    use crate::downloader::models::{AssetKind, MediaKind, Notification, Severity};
    use crate::downloader::traits::AssetProbe;
    use async_trait::async_trait;
    use std::sync::Mutex;
    use std::time::Duration;

    #[derive(Default)]
    struct Recorder {
        notes: Mutex<Vec<Notification>>,
        progress: Mutex<Vec<f32>>,
    }

    impl Recorder {
        fn messages(&self) -> Vec<String> {
            self.notes.lock().unwrap().iter().map(|n| n.message.clone()).collect()
        }
    }

    impl Notifier for Recorder {
        fn notify(&self, notification: Notification) {
            self.notes.lock().unwrap().push(notification);
        }

        fn progress(&self, progress: DownloadProgress) {
            self.progress.lock().unwrap().push(progress.percent);
        }
    }

    #[derive(Default)]
    struct Links {
        fail_on: Option<String>,
        seen: Mutex<Vec<String>>,
    }

    #[async_trait]
    impl LinkTrigger for Links {
        fn name(&self) -> &'static str {
            "test"
        }

        async fn trigger(&self, _source_url: &str, filename: &str) -> Result<(), DownloadError> {
            self.seen.lock().unwrap().push(filename.to_string());
            if self.fail_on.as_deref() == Some(filename) {
                return Err(DownloadError::Transport("connection reset".to_string()));
            }
            Ok(())
        }
    }

    struct Loaded;

    #[async_trait]
    impl AssetProbe for Loaded {
        async fn load(&self, _url: &str, _kind: AssetKind) -> Result<(), DownloadError> {
            Ok(())
        }
    }

    struct Unreachable;

    #[async_trait]
    impl AssetProbe for Unreachable {
        async fn load(&self, url: &str, _kind: AssetKind) -> Result<(), DownloadError> {
            Err(DownloadError::AssetLoadFailure(url.to_string()))
        }
    }

    fn downloader(draw: f64, links: Arc<Links>) -> (Downloader, Arc<Recorder>) {
        let config = ResolverConfig::default().with_latency(Duration::ZERO);
        let resolver = ResolverOrchestrator::with_coin(config, Arc::new(FixedCoin(draw)));
        let recorder = Arc::new(Recorder::default());
        (Downloader::new(resolver, recorder.clone(), links), recorder)
    }

    #[tokio::test]
    async fn test_fetch_reports_progress_and_kind() {
        let (d, rec) = downloader(0.0, Arc::new(Links::default()));
        let session = d.fetch(" https://instagram.com/p/ABC123 ").await.unwrap();

        assert_eq!(session.source_url(), "https://instagram.com/p/ABC123");
        assert_eq!(session.media().kind(), MediaKind::Image);
        assert_eq!(*rec.progress.lock().unwrap(), [20.0, 40.0, 80.0, 100.0]);
        assert_eq!(
            rec.messages(),
            ["Processing instagram URL...", "Successfully processed image!"]
        );
    }

    #[tokio::test]
    async fn test_fetch_rejects_invalid_input_without_resolving() {
        let (d, rec) = downloader(0.0, Arc::new(Links::default()));

        assert!(d.fetch("").await.is_err());
        assert!(d.fetch("https://example.com/p/A").await.is_err());

        assert_eq!(
            rec.messages(),
            ["Please enter a URL", "Please enter a valid Instagram URL"]
        );
        assert!(rec.progress.lock().unwrap().is_empty());
        assert!(rec.notes.lock().unwrap().iter().all(|n| n.severity == Severity::Error));
    }

    #[tokio::test]
    async fn test_preview_then_download_options() {
        let (d, rec) = downloader(0.99, Arc::new(Links::default()));
        let mut overlay = PreviewOverlay::new(Arc::new(Loaded), d.notifier());

        let session = d.preview("https://instagram.com/p/XYZ", &mut overlay).await.unwrap();
        let open = overlay.current().unwrap();
        assert_eq!(open.title, "Instagram Carousel");
        assert!(open.show_download);

        let actions = d.download_options(&session, &mut overlay);
        assert!(!overlay.is_open());
        assert_eq!(actions.len(), 2 * 3 + 3);
        assert_eq!(
            rec.messages(),
            [
                "Loading preview for instagram...",
                "Preview loaded successfully!",
                "Download options ready for carousel!",
            ]
        );
    }

    #[tokio::test]
    async fn test_preview_with_unloadable_asset_still_returns_session() {
        let (d, rec) = downloader(0.0, Arc::new(Links::default()));
        let mut overlay = PreviewOverlay::new(Arc::new(Unreachable), d.notifier());

        let session = d
            .preview("https://instagram.com/reel/R1", &mut overlay)
            .await
            .unwrap();
        assert_eq!(session.media().kind(), MediaKind::Reel);
        assert!(!overlay.is_open());
        assert_eq!(
            rec.messages(),
            ["Loading preview for instagram...", "Failed to load video preview"]
        );
        let last = rec.notes.lock().unwrap().last().cloned().unwrap();
        assert_eq!(last.severity, Severity::Error);

        // The session can still switch to download options
        let actions = d.download_options(&session, &mut overlay);
        assert!(actions.iter().any(|a| a.label() == "Download Video"));
    }

    #[tokio::test]
    async fn test_download_all_continues_after_failure() {
        let links = Arc::new(Links {
            fail_on: Some("instagram_image_2.jpg".to_string()),
            ..Links::default()
        });
        let (d, rec) = downloader(0.99, links.clone());
        let session = d.fetch("https://instagram.com/p/XYZ").await.unwrap();
        let all = session
            .actions()
            .into_iter()
            .find(|a| matches!(a, Action::DownloadAll { .. }))
            .unwrap();

        let mut overlay = PreviewOverlay::new(Arc::new(Loaded), d.notifier());
        let err = d.run(&all, &mut overlay).await.unwrap_err();
        assert!(matches!(err, DownloadError::Transport(_)));

        assert_eq!(
            *links.seen.lock().unwrap(),
            ["instagram_image_1.jpg", "instagram_image_2.jpg", "instagram_image_3.jpg"]
        );
        let last = rec.notes.lock().unwrap().last().cloned().unwrap();
        assert_eq!(last.message, "1 of 3 downloads failed");
        assert_eq!(last.severity, Severity::Error);
    }

    #[tokio::test]
    async fn test_single_download_notice() {
        let (d, rec) = downloader(0.0, Arc::new(Links::default()));
        let session = d.fetch("https://instagram.com/reel/R1").await.unwrap();
        let thumb = session
            .actions()
            .into_iter()
            .find(|a| a.label() == "Download Thumbnail")
            .unwrap();

        let mut overlay = PreviewOverlay::new(Arc::new(Loaded), d.notifier());
        d.run(&thumb, &mut overlay).await.unwrap();

        let last = rec.notes.lock().unwrap().last().cloned().unwrap();
        assert_eq!(last.message, "Thumbnail download started!");
        assert_eq!(last.duration_ms, 2000);
    }
}
