// Presentation selector - turns a MediaResult into user-facing actions
//
// Strategy per kind:
// - Video/reel: preview + download, plus a thumbnail pair when present
// - Carousel: preview-all, one indexed pair per item, download-all
// - Image: preview + download
// An info action closes the list when there is caption or description text.

use serde::Serialize;

use super::models::{present, AssetKind, MediaKind, MediaResult, Platform};

/// What the preview overlay should display
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PreviewTarget {
    /// The whole result (carousels render as a grid)
    Media(MediaResult),
    /// One asset: a carousel item or a video thumbnail
    Item { url: String, kind: AssetKind },
}

impl PreviewTarget {
    /// Asset to load before showing, `None` for carousel grids
    pub fn asset(&self) -> Option<(&str, AssetKind)> {
        match self {
            Self::Media(MediaResult::Image(m)) => Some((m.url(), AssetKind::Image)),
            Self::Media(MediaResult::Video(m)) => Some((m.video_url(), AssetKind::Video)),
            Self::Media(MediaResult::Carousel(_)) => None,
            Self::Item { url, kind } => Some((url.as_str(), *kind)),
        }
    }

    pub fn is_video(&self) -> bool {
        matches!(self.asset(), Some((_, AssetKind::Video)))
    }
}

/// Source and suggested filename for one download
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DownloadTarget {
    pub source_url: String,
    pub filename: String,
}

/// User-facing affordance
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum Action {
    Preview {
        label: String,
        title: String,
        target: PreviewTarget,
    },
    Download {
        label: String,
        /// Confirmation shown once the download has been triggered
        notice: String,
        target: DownloadTarget,
    },
    PreviewAll {
        label: String,
        title: String,
        media: MediaResult,
    },
    DownloadAll {
        label: String,
        targets: Vec<DownloadTarget>,
    },
    Info {
        kind: MediaKind,
        #[serde(skip_serializing_if = "Option::is_none")]
        caption: Option<String>,
        #[serde(skip_serializing_if = "Option::is_none")]
        description: Option<String>,
    },
}

impl Action {
    pub fn label(&self) -> String {
        match self {
            Self::Preview { label, .. }
            | Self::Download { label, .. }
            | Self::PreviewAll { label, .. }
            | Self::DownloadAll { label, .. } => label.clone(),
            Self::Info { .. } => "Media Info".to_string(),
        }
    }

    pub fn is_download(&self) -> bool {
        matches!(self, Self::Download { .. } | Self::DownloadAll { .. })
    }
}

/// `{platform}_{kind}.{ext}` or `{platform}_{kind}_{index}.{ext}` (1-based)
pub fn download_filename(platform: Platform, kind: &str, index: Option<usize>, ext: &str) -> String {
    match index {
        Some(i) => format!("{}_{}_{}.{}", platform, kind, i, ext),
        None => format!("{}_{}.{}", platform, kind, ext),
    }
}

/// Title for the preview-only flow, e.g. "Instagram Reel"
pub fn preview_title(media: &MediaResult, platform: Platform) -> String {
    format!("{} {}", platform.label(), media.kind().label())
}

/// Presentation selector
pub struct PresentationSelector;

impl PresentationSelector {
    /// Ordered actions for a resolved result
    pub fn select(media: &MediaResult, platform: Platform) -> Vec<Action> {
        let mut actions = match media {
            MediaResult::Video(video) => {
                let mut actions = vec![
                    Action::Preview {
                        label: "Preview".to_string(),
                        title: format!("{} Video", platform.label()),
                        target: PreviewTarget::Media(media.clone()),
                    },
                    Action::Download {
                        label: "Download Video".to_string(),
                        notice: "Download started!".to_string(),
                        target: DownloadTarget {
                            source_url: video.video_url().to_string(),
                            filename: download_filename(platform, "video", None, "mp4"),
                        },
                    },
                ];

                if let Some(thumbnail) = video.thumbnail_url() {
                    actions.push(Action::Preview {
                        label: "Preview Thumbnail".to_string(),
                        title: "Video Thumbnail".to_string(),
                        target: PreviewTarget::Item {
                            url: thumbnail.to_string(),
                            kind: AssetKind::Image,
                        },
                    });
                    actions.push(Action::Download {
                        label: "Download Thumbnail".to_string(),
                        notice: "Thumbnail download started!".to_string(),
                        target: DownloadTarget {
                            source_url: thumbnail.to_string(),
                            filename: download_filename(platform, "thumbnail", None, "jpg"),
                        },
                    });
                }
                actions
            }
            MediaResult::Carousel(carousel) => {
                let targets: Vec<DownloadTarget> = carousel
                    .items()
                    .iter()
                    .enumerate()
                    .map(|(i, item)| DownloadTarget {
                        source_url: item.url().to_string(),
                        filename: download_filename(platform, "image", Some(i + 1), "jpg"),
                    })
                    .collect();

                let mut actions = vec![Action::PreviewAll {
                    label: "Preview All Images".to_string(),
                    title: format!("{} Carousel", platform.label()),
                    media: media.clone(),
                }];

                for (i, target) in targets.iter().enumerate() {
                    let n = i + 1;
                    actions.push(Action::Preview {
                        label: "Preview".to_string(),
                        title: format!("Image {}", n),
                        target: PreviewTarget::Item {
                            url: target.source_url.clone(),
                            kind: AssetKind::Image,
                        },
                    });
                    actions.push(Action::Download {
                        label: format!("Download Image {}", n),
                        notice: format!("Image {} download started!", n),
                        target: target.clone(),
                    });
                }

                actions.push(Action::DownloadAll {
                    label: "Download All".to_string(),
                    targets,
                });
                actions
            }
            MediaResult::Image(image) => vec![
                Action::Preview {
                    label: "Preview".to_string(),
                    title: format!("{} Image", platform.label()),
                    target: PreviewTarget::Media(media.clone()),
                },
                Action::Download {
                    label: "Download Image".to_string(),
                    notice: "Download started!".to_string(),
                    target: DownloadTarget {
                        source_url: image.url().to_string(),
                        filename: download_filename(platform, "image", None, "jpg"),
                    },
                },
            ],
        };

        if media.has_info() {
            actions.push(Action::Info {
                kind: media.kind(),
                caption: present(media.caption()).map(str::to_string),
                description: present(media.description()).map(str::to_string),
            });
        }

        actions
    }
}
