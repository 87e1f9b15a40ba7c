// Downloader module - classify, resolve, present, preview, download

pub mod backends;
pub mod classifier;
pub mod errors;
pub mod extractors;
pub mod models;
pub mod orchestrator;
pub mod presentation;
pub mod preview;
pub mod traits;
pub mod utils;

pub use classifier::{classify, looks_supported};
pub use errors::DownloadError;
pub use extractors::{Coin, FixedCoin, MediaResolver, ResolverConfig, ResolverOrchestrator, SystemCoin};
pub use models::{
    AssetKind, CarouselMedia, DownloadProgress, ImageMedia, MediaItem, MediaKind, MediaResult,
    Notification, Platform, Severity, VideoForm, VideoMedia,
};
pub use orchestrator::{Downloader, Session};
pub use presentation::{preview_title, Action, DownloadTarget, PresentationSelector, PreviewTarget};
pub use preview::{OpenPreview, Playback, PreviewOverlay};
pub use traits::{AssetProbe, LinkTrigger, NotificationDurations, Notifier};
