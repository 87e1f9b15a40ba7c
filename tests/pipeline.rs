// End-to-end tests: classify -> resolve -> select -> preview/download

use async_trait::async_trait;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use post_downloader_lib::downloader::backends::AssumeLoaded;
use post_downloader_lib::downloader::{
    classify, Action, DownloadError, DownloadProgress, Downloader, FixedCoin, LinkTrigger,
    MediaKind, MediaResult, Notification, Notifier, Platform, PreviewOverlay, ResolverConfig,
    ResolverOrchestrator, Severity,
};

#[derive(Default)]
struct RecordingNotifier {
    notes: Mutex<Vec<Notification>>,
    progress: Mutex<Vec<f32>>,
}

impl RecordingNotifier {
    fn messages(&self) -> Vec<String> {
        self.notes.lock().unwrap().iter().map(|n| n.message.clone()).collect()
    }
}

impl Notifier for RecordingNotifier {
    fn notify(&self, notification: Notification) {
        self.notes.lock().unwrap().push(notification);
    }

    fn progress(&self, progress: DownloadProgress) {
        self.progress.lock().unwrap().push(progress.percent);
    }
}

#[derive(Default)]
struct RecordingLinks {
    triggered: Mutex<Vec<(String, String)>>,
}

#[async_trait]
impl LinkTrigger for RecordingLinks {
    fn name(&self) -> &'static str {
        "recording"
    }

    async fn trigger(&self, source_url: &str, suggested_filename: &str) -> Result<(), DownloadError> {
        self.triggered
            .lock()
            .unwrap()
            .push((source_url.to_string(), suggested_filename.to_string()));
        Ok(())
    }
}

struct Harness {
    downloader: Downloader,
    overlay: PreviewOverlay,
    notifier: Arc<RecordingNotifier>,
    links: Arc<RecordingLinks>,
}

fn harness(draw: f64) -> Harness {
    let config = ResolverConfig::default().with_latency(Duration::ZERO);
    let notifier = Arc::new(RecordingNotifier::default());
    let links = Arc::new(RecordingLinks::default());
    let downloader = Downloader::new(
        ResolverOrchestrator::with_coin(config, Arc::new(FixedCoin(draw))),
        notifier.clone(),
        links.clone(),
    );
    let overlay = PreviewOverlay::new(Arc::new(AssumeLoaded), notifier.clone());
    Harness {
        downloader,
        overlay,
        notifier,
        links,
    }
}

const ABC123: &str = "https://instagram.com/p/ABC123";

#[tokio::test]
async fn test_abc123_single_image() {
    let h = harness(0.1);
    assert_eq!(classify(ABC123), Ok(Platform::Instagram));

    let session = h.downloader.fetch(ABC123).await.unwrap();
    let MediaResult::Image(image) = session.media() else {
        panic!("expected image, got {:?}", session.media());
    };
    assert!(image.url().contains("ABC123"));
    assert_eq!(session.media().caption(), Some("Sample Instagram post caption"));

    let labels: Vec<String> = session.actions().iter().map(Action::label).collect();
    assert_eq!(labels, ["Preview", "Download Image", "Media Info"]);
}

#[tokio::test]
async fn test_abc123_carousel() {
    let h = harness(0.95);
    let session = h.downloader.fetch(ABC123).await.unwrap();

    let MediaResult::Carousel(carousel) = session.media() else {
        panic!("expected carousel, got {:?}", session.media());
    };
    assert_eq!(carousel.items().len(), 3);
    assert!(carousel.items().iter().all(|i| i.url().contains("ABC123")));

    let labels: Vec<String> = session.actions().iter().map(Action::label).collect();
    assert_eq!(
        labels,
        [
            "Preview All Images",
            "Preview",
            "Download Image 1",
            "Preview",
            "Download Image 2",
            "Preview",
            "Download Image 3",
            "Download All",
            "Media Info",
        ]
    );
}

#[tokio::test]
async fn test_download_all_triggers_in_order() {
    let mut h = harness(0.95);
    let session = h.downloader.fetch(ABC123).await.unwrap();
    let all = session
        .actions()
        .into_iter()
        .find(|a| matches!(a, Action::DownloadAll { .. }))
        .unwrap();

    h.downloader.run(&all, &mut h.overlay).await.unwrap();

    let names: Vec<String> = h
        .links
        .triggered
        .lock()
        .unwrap()
        .iter()
        .map(|(_, name)| name.clone())
        .collect();
    assert_eq!(
        names,
        ["instagram_image_1.jpg", "instagram_image_2.jpg", "instagram_image_3.jpg"]
    );
    let last = h.notifier.notes.lock().unwrap().last().cloned().unwrap();
    assert_eq!(last.message, "All downloads started!");
    assert_eq!(last.severity, Severity::Success);
}

#[tokio::test]
async fn test_reel_preview_close_resets_playback() {
    let mut h = harness(0.0);
    let session = h
        .downloader
        .preview("https://www.instagram.com/reel/Cx_9-a/", &mut h.overlay)
        .await
        .unwrap();

    assert_eq!(session.media().kind(), MediaKind::Reel);
    assert!(session.media().description().unwrap().contains("Cx_9-a"));
    assert_eq!(h.overlay.current().unwrap().title, "Instagram Reel");

    assert!(h.overlay.play());
    assert!(h.overlay.seek(3.0));
    h.overlay.close();

    let playback = h.overlay.playback();
    assert!(!playback.playing);
    assert_eq!(playback.position_secs, 0.0);
}

#[tokio::test]
async fn test_unparseable_post_degrades_to_placeholder() {
    let h = harness(0.0);
    let session = h
        .downloader
        .fetch("https://instagram.com/stories/someone/123")
        .await
        .unwrap();

    assert_eq!(session.media().kind(), MediaKind::Image);
    assert_eq!(session.media().description(), Some("Instagram Image (Failed to load)"));
    assert_eq!(
        h.notifier.messages().last().map(String::as_str),
        Some("Successfully processed image!")
    );
}

#[tokio::test]
async fn test_invalid_input_never_resolves() {
    let h = harness(0.0);
    for input in ["", "instagram", "https://facebook.com/p/ABC123"] {
        assert!(matches!(
            h.downloader.fetch(input).await,
            Err(DownloadError::InvalidUrl(_))
        ));
    }
    assert!(h.notifier.progress.lock().unwrap().is_empty());
    assert!(h.links.triggered.lock().unwrap().is_empty());
}

#[tokio::test(start_paused = true)]
async fn test_fetch_waits_for_configured_latency() {
    let notifier = Arc::new(RecordingNotifier::default());
    let downloader = Downloader::new(
        ResolverOrchestrator::with_coin(ResolverConfig::default(), Arc::new(FixedCoin(0.0))),
        notifier,
        Arc::new(RecordingLinks::default()),
    );

    let start = tokio::time::Instant::now();
    downloader.fetch(ABC123).await.unwrap();
    assert!(start.elapsed() >= Duration::from_millis(2000));
}
