pub mod config;
pub mod downloader;
pub mod logging;

#[cfg(feature = "desktop")]
mod commands;

#[cfg(feature = "desktop")]
#[cfg_attr(mobile, tauri::mobile_entry_point)]
pub fn run() {
    use tauri::Manager;
    use tracing::error;

    if let Err(e) = logging::init(0) {
        eprintln!("warning: {}", e);
    }

    let result = tauri::Builder::default()
        .setup(|app| {
            let config = config::AppConfig::load()?;
            let state = commands::AppState::new(app.handle().clone(), &config)?;
            app.manage(state);
            Ok(())
        })
        .invoke_handler(tauri::generate_handler![
            commands::classify_url,
            commands::fetch_media,
            commands::preview_media,
            commands::open_preview,
            commands::open_preview_item,
            commands::close_preview,
            commands::download_from_preview,
            commands::run_action,
            commands::trigger_download,
        ])
        .run(tauri::generate_context!());

    if let Err(e) = result {
        error!(error = %e, "error while running tauri application");
    }
}
