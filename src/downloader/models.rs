// Common data models for the resolve/present pipeline

use serde::{Deserialize, Serialize};
use std::fmt;

use super::errors::DownloadError;

/// Recognized source platform
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Platform {
    Instagram,
}

impl Platform {
    pub const ALL: [Platform; 1] = [Platform::Instagram];

    /// Lowercase tag, used in download filenames
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Instagram => "instagram",
        }
    }

    /// Capitalized name for titles
    pub fn label(&self) -> &'static str {
        match self {
            Self::Instagram => "Instagram",
        }
    }

    /// Host substring that identifies the platform
    pub fn host_marker(&self) -> &'static str {
        match self {
            Self::Instagram => "instagram.com",
        }
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Discriminant of a resolved result
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MediaKind {
    Image,
    Video,
    Reel,
    Carousel,
}

impl MediaKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Image => "image",
            Self::Video => "video",
            Self::Reel => "reel",
            Self::Carousel => "carousel",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Image => "Image",
            Self::Video => "Video",
            Self::Reel => "Reel",
            Self::Carousel => "Carousel",
        }
    }
}

impl fmt::Display for MediaKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Reels and long-form videos share one shape; the form only changes labels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VideoForm {
    #[default]
    Video,
    Reel,
}

fn non_empty(value: impl Into<String>, what: &str) -> Result<String, DownloadError> {
    let value = value.into();
    if value.trim().is_empty() {
        return Err(DownloadError::InvalidMedia(format!("{} must not be empty", what)));
    }
    Ok(value)
}

/// `value` unless it is missing or whitespace only
pub(crate) fn present(value: Option<&str>) -> Option<&str> {
    value.filter(|s| !s.trim().is_empty())
}

/// Single carousel entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MediaItem {
    url: String,
}

impl MediaItem {
    pub fn new(url: impl Into<String>) -> Result<Self, DownloadError> {
        Ok(Self {
            url: non_empty(url, "carousel item url")?,
        })
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ImageMedia {
    url: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    caption: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    description: Option<String>,
}

impl ImageMedia {
    pub fn new(url: impl Into<String>) -> Result<Self, DownloadError> {
        Ok(Self {
            url: non_empty(url, "image url")?,
            caption: None,
            description: None,
        })
    }

    /// Image built from a url the caller knows to be non-empty
    pub(crate) fn placeholder(url: String) -> Self {
        debug_assert!(!url.trim().is_empty());
        Self {
            url,
            caption: None,
            description: None,
        }
    }

    pub fn with_caption(mut self, caption: impl Into<String>) -> Self {
        self.caption = Some(caption.into());
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VideoMedia {
    video_url: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    thumbnail_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    caption: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    description: Option<String>,
    form: VideoForm,
}

impl VideoMedia {
    pub fn new(video_url: impl Into<String>) -> Result<Self, DownloadError> {
        Ok(Self {
            video_url: non_empty(video_url, "video url")?,
            thumbnail_url: None,
            caption: None,
            description: None,
            form: VideoForm::Video,
        })
    }

    /// Attach a thumbnail; blank urls are dropped
    pub fn with_thumbnail(mut self, thumbnail_url: impl Into<String>) -> Self {
        let thumbnail_url = thumbnail_url.into();
        self.thumbnail_url = Some(thumbnail_url).filter(|s| !s.trim().is_empty());
        self
    }

    pub fn with_caption(mut self, caption: impl Into<String>) -> Self {
        self.caption = Some(caption.into());
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_form(mut self, form: VideoForm) -> Self {
        self.form = form;
        self
    }

    pub fn video_url(&self) -> &str {
        &self.video_url
    }

    pub fn thumbnail_url(&self) -> Option<&str> {
        self.thumbnail_url.as_deref()
    }

    pub fn form(&self) -> VideoForm {
        self.form
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CarouselMedia {
    items: Vec<MediaItem>,
    #[serde(skip_serializing_if = "Option::is_none")]
    caption: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    description: Option<String>,
}

impl CarouselMedia {
    pub fn new(items: Vec<MediaItem>) -> Result<Self, DownloadError> {
        if items.is_empty() {
            return Err(DownloadError::InvalidMedia(
                "carousel needs at least one item".to_string(),
            ));
        }
        Ok(Self {
            items,
            caption: None,
            description: None,
        })
    }

    /// Build from raw urls, validating every entry
    pub fn from_urls<I, S>(urls: I) -> Result<Self, DownloadError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let items = urls
            .into_iter()
            .map(MediaItem::new)
            .collect::<Result<Vec<_>, _>>()?;
        Self::new(items)
    }

    pub fn with_caption(mut self, caption: impl Into<String>) -> Self {
        self.caption = Some(caption.into());
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn items(&self) -> &[MediaItem] {
        &self.items
    }
}

/// Resolved, typed description of a fetched post
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum MediaResult {
    Image(ImageMedia),
    Video(VideoMedia),
    Carousel(CarouselMedia),
}

impl MediaResult {
    pub fn kind(&self) -> MediaKind {
        match self {
            Self::Image(_) => MediaKind::Image,
            Self::Video(v) => match v.form {
                VideoForm::Video => MediaKind::Video,
                VideoForm::Reel => MediaKind::Reel,
            },
            Self::Carousel(_) => MediaKind::Carousel,
        }
    }

    pub fn caption(&self) -> Option<&str> {
        match self {
            Self::Image(m) => m.caption.as_deref(),
            Self::Video(m) => m.caption.as_deref(),
            Self::Carousel(m) => m.caption.as_deref(),
        }
    }

    pub fn description(&self) -> Option<&str> {
        match self {
            Self::Image(m) => m.description.as_deref(),
            Self::Video(m) => m.description.as_deref(),
            Self::Carousel(m) => m.description.as_deref(),
        }
    }

    /// True when there is a non-blank caption or description to show
    pub fn has_info(&self) -> bool {
        present(self.caption()).is_some() || present(self.description()).is_some()
    }

    /// Url of the main asset (first item for carousels)
    pub fn primary_url(&self) -> &str {
        match self {
            Self::Image(m) => &m.url,
            Self::Video(m) => &m.video_url,
            // CarouselMedia::new guarantees at least one item
            Self::Carousel(m) => m.items.first().map(|i| i.url()).unwrap_or_default(),
        }
    }
}

impl From<ImageMedia> for MediaResult {
    fn from(m: ImageMedia) -> Self {
        Self::Image(m)
    }
}

impl From<VideoMedia> for MediaResult {
    fn from(m: VideoMedia) -> Self {
        Self::Video(m)
    }
}

impl From<CarouselMedia> for MediaResult {
    fn from(m: CarouselMedia) -> Self {
        Self::Carousel(m)
    }
}

/// How a single asset is rendered in the preview
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AssetKind {
    Image,
    Video,
}

impl AssetKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Image => "image",
            Self::Video => "video",
        }
    }
}

/// Notification severity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Info,
    Success,
    Error,
}

/// Fire-and-forget message for the notification surface
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notification {
    pub message: String,
    pub severity: Severity,
    pub duration_ms: u64,
}

/// Fetch progress information
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DownloadProgress {
    pub percent: f32,
    pub status: String,
}
