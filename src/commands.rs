// Desktop shell - Tauri commands over the downloader
//
// The web view holds no media state of its own: the latest session lives in
// AppState and each fetch or preview overwrites it (last write wins).

use serde::Serialize;
use std::sync::Arc;
use tauri::{AppHandle, Emitter, State};
use tokio::sync::Mutex;
use tracing::info;

use crate::config::AppConfig;
use crate::downloader::backends::{AssumeLoaded, HttpLinkTrigger};
use crate::downloader::{
    classify, Action, DownloadError, DownloadProgress, DownloadTarget, Downloader, Notification,
    Notifier, OpenPreview, Platform, PreviewOverlay, ResolverOrchestrator, Session,
};

/// Forwards notifications and fetch progress to the web view as events
pub struct EventNotifier {
    app_handle: AppHandle,
}

impl EventNotifier {
    pub fn new(app_handle: AppHandle) -> Self {
        Self { app_handle }
    }
}

impl Notifier for EventNotifier {
    fn notify(&self, notification: Notification) {
        let _ = self.app_handle.emit("notification", notification);
    }

    fn progress(&self, progress: DownloadProgress) {
        let _ = self.app_handle.emit("download-progress", progress);
    }
}

pub struct AppState {
    downloader: Downloader,
    session: Mutex<Option<Session>>,
    overlay: Mutex<PreviewOverlay>,
}

impl AppState {
    pub fn new(app_handle: AppHandle, config: &AppConfig) -> Result<Self, DownloadError> {
        let notifier: Arc<dyn Notifier> = Arc::new(EventNotifier::new(app_handle));
        let links = HttpLinkTrigger::new(
            config.output_dir(),
            config.download.proxy.as_deref(),
            config.timeout(),
        )?;
        let downloader = Downloader::new(
            ResolverOrchestrator::new(config.resolver_config()),
            notifier.clone(),
            Arc::new(links),
        )
        .with_durations(config.durations());
        // The web view renders the asset itself and reports load errors
        let overlay =
            PreviewOverlay::new(Arc::new(AssumeLoaded), notifier).with_durations(config.durations());

        Ok(Self {
            downloader,
            session: Mutex::new(None),
            overlay: Mutex::new(overlay),
        })
    }

    async fn current_session(&self) -> Result<Session, DownloadError> {
        self.session
            .lock()
            .await
            .clone()
            .ok_or_else(|| DownloadError::InvalidMedia("nothing has been fetched yet".to_string()))
    }

    async fn action(&self, index: usize) -> Result<Action, DownloadError> {
        let actions = self.current_session().await?.actions();
        let count = actions.len();
        actions
            .into_iter()
            .nth(index)
            .ok_or_else(|| DownloadError::InvalidMedia(format!("no action {} of {}", index, count)))
    }
}

#[derive(Debug, Serialize)]
pub struct FetchResponse {
    pub session: Session,
    pub actions: Vec<Action>,
}

#[tauri::command]
pub fn classify_url(url: String) -> Result<Platform, DownloadError> {
    classify(&url)
}

/// "Download" button: resolve and list download options
#[tauri::command]
pub async fn fetch_media(url: String, state: State<'_, AppState>) -> Result<FetchResponse, DownloadError> {
    let session = state.downloader.fetch(&url).await?;
    let actions = session.actions();
    *state.session.lock().await = Some(session.clone());
    Ok(FetchResponse { session, actions })
}

/// "Preview" button: resolve and open the overlay with a download footer
#[tauri::command]
pub async fn preview_media(
    url: String,
    state: State<'_, AppState>,
) -> Result<Option<OpenPreview>, DownloadError> {
    let mut overlay = state.overlay.lock().await;
    let session = state.downloader.preview(&url, &mut overlay).await?;
    *state.session.lock().await = Some(session);
    Ok(overlay.current().cloned())
}

/// Open the preview behind action `index` of the current session
#[tauri::command]
pub async fn open_preview(index: usize, state: State<'_, AppState>) -> Result<OpenPreview, DownloadError> {
    let action = state.action(index).await?;
    if !matches!(action, Action::Preview { .. } | Action::PreviewAll { .. }) {
        return Err(DownloadError::InvalidMedia(format!("action {} is not a preview", index)));
    }

    let mut overlay = state.overlay.lock().await;
    state.downloader.run(&action, &mut overlay).await?;
    overlay
        .current()
        .cloned()
        .ok_or_else(|| DownloadError::AssetLoadFailure("preview".to_string()))
}

/// Drill into one item of the carousel being previewed
#[tauri::command]
pub async fn open_preview_item(index: usize, state: State<'_, AppState>) -> Result<OpenPreview, DownloadError> {
    let mut overlay = state.overlay.lock().await;
    overlay.open_item(index).await?;
    overlay
        .current()
        .cloned()
        .ok_or_else(|| DownloadError::AssetLoadFailure("preview".to_string()))
}

#[tauri::command]
pub async fn close_preview(state: State<'_, AppState>) -> Result<(), DownloadError> {
    state.overlay.lock().await.close();
    Ok(())
}

/// Overlay footer button: close the preview and list download options
#[tauri::command]
pub async fn download_from_preview(state: State<'_, AppState>) -> Result<Vec<Action>, DownloadError> {
    let session = state.current_session().await?;
    let mut overlay = state.overlay.lock().await;
    Ok(state.downloader.download_options(&session, &mut overlay))
}

/// Run action `index` of the current session (downloads and download-all)
#[tauri::command]
pub async fn run_action(index: usize, state: State<'_, AppState>) -> Result<(), DownloadError> {
    let action = state.action(index).await?;
    let mut overlay = state.overlay.lock().await;
    state.downloader.run(&action, &mut overlay).await
}

#[tauri::command]
pub async fn trigger_download(
    source_url: String,
    filename: String,
    state: State<'_, AppState>,
) -> Result<(), DownloadError> {
    info!(%filename, "download requested from web view");
    let target = DownloadTarget { source_url, filename };
    state.downloader.download(&target, "Download started!").await
}
