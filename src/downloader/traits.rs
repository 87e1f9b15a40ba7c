// Collaborator traits: notification surface, download trigger, asset loading

use async_trait::async_trait;

use super::errors::DownloadError;
use super::models::{AssetKind, DownloadProgress, Notification, Severity};

/// Fire-and-forget notification surface
pub trait Notifier: Send + Sync {
    fn notify(&self, notification: Notification);

    /// Progress bar updates during a fetch. Ignored by default.
    fn progress(&self, _progress: DownloadProgress) {}
}

/// Capability to start a browser-style file download
#[async_trait]
pub trait LinkTrigger: Send + Sync {
    /// Name of the trigger (for logging)
    fn name(&self) -> &'static str;

    async fn trigger(&self, source_url: &str, suggested_filename: &str) -> Result<(), DownloadError>;
}

/// Loads a preview asset before the overlay is shown
#[async_trait]
pub trait AssetProbe: Send + Sync {
    async fn load(&self, url: &str, kind: AssetKind) -> Result<(), DownloadError>;
}

/// Default and short durations for notifications
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NotificationDurations {
    pub default_ms: u64,
    pub success_ms: u64,
}

impl Default for NotificationDurations {
    fn default() -> Self {
        Self {
            default_ms: 3000,
            success_ms: 2000,
        }
    }
}

impl NotificationDurations {
    pub fn info(&self, message: impl Into<String>) -> Notification {
        self.build(message, Severity::Info, self.default_ms)
    }

    pub fn success(&self, message: impl Into<String>) -> Notification {
        self.build(message, Severity::Success, self.default_ms)
    }

    /// Success toast for quick confirmations ("Download started!")
    pub fn brief_success(&self, message: impl Into<String>) -> Notification {
        self.build(message, Severity::Success, self.success_ms)
    }

    pub fn error(&self, message: impl Into<String>) -> Notification {
        self.build(message, Severity::Error, self.default_ms)
    }

    fn build(&self, message: impl Into<String>, severity: Severity, duration_ms: u64) -> Notification {
        Notification {
            message: message.into(),
            severity,
            duration_ms,
        }
    }
}
