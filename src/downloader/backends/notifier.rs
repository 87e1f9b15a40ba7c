// Notifier that forwards notifications to the tracing subscriber

use tracing::{error, info};

use crate::downloader::models::{DownloadProgress, Notification, Severity};
use crate::downloader::traits::Notifier;

pub struct TracingNotifier;

impl Notifier for TracingNotifier {
    fn notify(&self, n: Notification) {
        match n.severity {
            Severity::Error => error!(duration_ms = n.duration_ms, "{}", n.message),
            Severity::Info | Severity::Success => {
                info!(severity = ?n.severity, duration_ms = n.duration_ms, "{}", n.message)
            }
        }
    }

    fn progress(&self, p: DownloadProgress) {
        info!(percent = p.percent, status = %p.status, "progress");
    }
}
