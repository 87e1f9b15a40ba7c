// Helper functions for collaborator implementations

use std::path::{Path, PathBuf};
use std::time::Duration;

use super::errors::DownloadError;

/// Build an HTTP client with an optional proxy (http, https or socks5 urls)
pub fn build_http_client(proxy: Option<&str>, timeout: Duration) -> Result<reqwest::Client, DownloadError> {
    let mut builder = reqwest::Client::builder()
        .timeout(timeout)
        .user_agent(concat!("post-downloader/", env!("CARGO_PKG_VERSION")));

    if let Some(proxy_url) = proxy.map(str::trim).filter(|p| !p.is_empty()) {
        let proxy = reqwest::Proxy::all(proxy_url)
            .map_err(|e| DownloadError::Config(format!("invalid proxy {}: {}", proxy_url, e)))?;
        builder = builder.proxy(proxy);
    }

    builder
        .build()
        .map_err(|e| DownloadError::Transport(format!("failed to build HTTP client: {}", e)))
}

/// Reduce a suggested filename to a safe single path component
pub fn sanitize_filename(name: &str) -> String {
    let cleaned: String = name
        .trim()
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-') {
                c
            } else {
                '_'
            }
        })
        .collect();
    let cleaned = cleaned.trim_start_matches('.');

    if cleaned.is_empty() {
        "download".to_string()
    } else {
        cleaned.to_string()
    }
}

/// First free path for `filename` in `dir`, adding ` (n)` before the extension
/// the way browsers do for repeated downloads
pub fn unique_path(dir: &Path, filename: &str) -> PathBuf {
    let candidate = dir.join(filename);
    if !candidate.exists() {
        return candidate;
    }

    let (stem, ext) = match filename.rsplit_once('.') {
        Some((stem, ext)) if !stem.is_empty() => (stem, Some(ext)),
        _ => (filename, None),
    };

    (1..)
        .map(|n| match ext {
            Some(ext) => dir.join(format!("{} ({}).{}", stem, n, ext)),
            None => dir.join(format!("{} ({})", stem, n)),
        })
        .find(|p| !p.exists())
        .unwrap_or(candidate)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sanitize_filename() {
        assert_eq!(sanitize_filename("instagram_image_1.jpg"), "instagram_image_1.jpg");
        assert_eq!(sanitize_filename("../../etc/passwd"), "_.._etc_passwd");
        assert_eq!(sanitize_filename("a b?.mp4"), "a_b_.mp4");
        assert_eq!(sanitize_filename("   "), "download");
        assert_eq!(sanitize_filename("..."), "download");
    }

    #[test]
    fn test_unique_path_appends_counter() {
        let dir = tempfile::tempdir().unwrap();
        let first = unique_path(dir.path(), "instagram_video.mp4");
        assert_eq!(first, dir.path().join("instagram_video.mp4"));

        std::fs::write(&first, b"x").unwrap();
        let second = unique_path(dir.path(), "instagram_video.mp4");
        assert_eq!(second, dir.path().join("instagram_video (1).mp4"));

        std::fs::write(&second, b"x").unwrap();
        assert_eq!(
            unique_path(dir.path(), "instagram_video.mp4"),
            dir.path().join("instagram_video (2).mp4")
        );
    }

    #[test]
    fn test_proxy_validation() {
        assert!(build_http_client(None, Duration::from_secs(5)).is_ok());
        assert!(build_http_client(Some("socks5h://127.0.0.1:1080"), Duration::from_secs(5)).is_ok());
        assert!(matches!(
            build_http_client(Some("ftp://127.0.0.1:21"), Duration::from_secs(5)),
            Err(DownloadError::Config(_))
        ));
    }
}
