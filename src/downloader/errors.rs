// Error types for the resolve/present pipeline

use serde::Serialize;

/// Reason carried by `InvalidUrl` when the field was left blank
pub const EMPTY_INPUT: &str = "empty input";

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DownloadError {
    /// Input is not an absolute URL or the host is not a supported platform
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    /// The post path did not match the expected `/p/`, `/reel/` or `/tv/` pattern
    #[error("Invalid post URL format: {0}")]
    InvalidFormat(String),

    /// A payload broke a media invariant (empty url, empty carousel)
    #[error("Invalid media payload: {0}")]
    InvalidMedia(String),

    /// No resolver is registered for the platform
    #[error("Unsupported platform: {0}")]
    UnsupportedPlatform(String),

    /// Preview asset could not be loaded
    #[error("Failed to load {0}")]
    AssetLoadFailure(String),

    /// Download transport failed
    #[error("Download failed: {0}")]
    Transport(String),

    /// Configuration could not be read or parsed
    #[error("Config error: {0}")]
    Config(String),

    /// Filesystem error while writing a download
    #[error("I/O error: {0}")]
    Io(String),
}

impl DownloadError {
    /// Whether this error is handled inside the resolver and never reaches the caller
    pub fn is_recovered_by_resolver(&self) -> bool {
        matches!(
            self,
            Self::InvalidFormat(_) | Self::InvalidMedia(_) | Self::UnsupportedPlatform(_)
        )
    }

    /// Message suitable for the notification surface
    pub fn user_message(&self) -> String {
        match self {
            Self::InvalidUrl(reason) if reason == EMPTY_INPUT => "Please enter a URL".to_string(),
            Self::InvalidUrl(_) => "Please enter a valid Instagram URL".to_string(),
            Self::AssetLoadFailure(what) => format!("Failed to load {}", what),
            Self::Transport(_) | Self::Io(_) => "Download failed. Please try again.".to_string(),
            other => other.to_string(),
        }
    }
}

impl From<std::io::Error> for DownloadError {
    fn from(e: std::io::Error) -> Self {
        Self::Io(e.to_string())
    }
}

impl From<reqwest::Error> for DownloadError {
    fn from(e: reqwest::Error) -> Self {
        Self::Transport(e.to_string())
    }
}

impl From<toml::de::Error> for DownloadError {
    fn from(e: toml::de::Error) -> Self {
        Self::Config(e.to_string())
    }
}

// Tauri commands return errors to the web view as plain strings
impl Serialize for DownloadError {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}
