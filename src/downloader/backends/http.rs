// HTTP collaborators: file download into a directory, preview asset probe

use async_trait::async_trait;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tokio::io::AsyncWriteExt;
use tracing::{debug, info, warn};

use crate::downloader::errors::DownloadError;
use crate::downloader::models::AssetKind;
use crate::downloader::traits::{AssetProbe, LinkTrigger};
use crate::downloader::utils::{build_http_client, sanitize_filename, unique_path};

/// Saves each triggered download into `output_dir` under its suggested name
pub struct HttpLinkTrigger {
    client: reqwest::Client,
    output_dir: PathBuf,
}

impl HttpLinkTrigger {
    pub fn new(
        output_dir: impl Into<PathBuf>,
        proxy: Option<&str>,
        timeout: Duration,
    ) -> Result<Self, DownloadError> {
        Ok(Self {
            client: build_http_client(proxy, timeout)?,
            output_dir: output_dir.into(),
        })
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    /// Download `source_url` and return the path written
    pub async fn fetch_to_file(
        &self,
        source_url: &str,
        suggested_filename: &str,
    ) -> Result<PathBuf, DownloadError> {
        let mut response = self
            .client
            .get(source_url)
            .send()
            .await?
            .error_for_status()?;

        tokio::fs::create_dir_all(&self.output_dir).await?;
        let path = unique_path(&self.output_dir, &sanitize_filename(suggested_filename));

        // create_new: never truncate a file that appeared after unique_path looked
        let mut file = tokio::fs::OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&path)
            .await?;

        let written = match stream_body(&mut response, &mut file).await {
            Ok(written) => written,
            Err(e) => {
                drop(file);
                if let Err(rm) = tokio::fs::remove_file(&path).await {
                    warn!(path = %path.display(), error = %rm, "could not remove partial download");
                }
                return Err(e);
            }
        };

        info!(path = %path.display(), bytes = written, "download saved");
        Ok(path)
    }
}

async fn stream_body(
    response: &mut reqwest::Response,
    file: &mut tokio::fs::File,
) -> Result<u64, DownloadError> {
    let mut written: u64 = 0;
    while let Some(chunk) = response.chunk().await? {
        file.write_all(&chunk).await?;
        written += chunk.len() as u64;
    }
    file.flush().await?;
    Ok(written)
}

#[async_trait]
impl LinkTrigger for HttpLinkTrigger {
    fn name(&self) -> &'static str {
        "http"
    }

    async fn trigger(&self, source_url: &str, suggested_filename: &str) -> Result<(), DownloadError> {
        self.fetch_to_file(source_url, suggested_filename).await.map(|_| ())
    }
}

/// Checks that a preview asset is reachable and has a matching content type
pub struct HttpAssetProbe {
    client: reqwest::Client,
}

impl HttpAssetProbe {
    pub fn new(proxy: Option<&str>, timeout: Duration) -> Result<Self, DownloadError> {
        Ok(Self {
            client: build_http_client(proxy, timeout)?,
        })
    }
}

#[async_trait]
impl AssetProbe for HttpAssetProbe {
    async fn load(&self, url: &str, kind: AssetKind) -> Result<(), DownloadError> {
        let failure = |reason: String| {
            DownloadError::AssetLoadFailure(format!("{} preview ({})", kind.as_str(), reason))
        };

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| failure(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(failure(format!("HTTP {}", status)));
        }

        // Servers that omit the header get the benefit of the doubt
        let content_type = response
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(str::to_ascii_lowercase);
        if let Some(ct) = content_type {
            let expected = format!("{}/", kind.as_str());
            if !ct.starts_with(&expected) && !ct.starts_with("application/octet-stream") {
                return Err(failure(format!("unexpected content type {}", ct)));
            }
        }

        debug!(url, kind = kind.as_str(), "preview asset loaded");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::io::AsyncReadExt;
    use tokio::net::TcpListener;

    /// Serves the same canned response to every connection
    async fn serve(status: &'static str, content_type: &'static str, body: &'static [u8]) -> String {
        serve_declaring(status, content_type, body, body.len()).await
    }

    /// Like `serve`, but announces `content_length` whatever the body size
    async fn serve_declaring(
        status: &'static str,
        content_type: &'static str,
        body: &'static [u8],
        content_length: usize,
    ) -> String {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();

        tokio::spawn(async move {
            loop {
                let Ok((mut stream, _)) = listener.accept().await else {
                    break;
                };
                tokio::spawn(async move {
                    let mut buf = [0u8; 4096];
                    let _ = stream.read(&mut buf).await;
                    let head = format!(
                        "HTTP/1.1 {}\r\nContent-Type: {}\r\nContent-Length: {}\r\nConnection: close\r\n\r\n",
                        status,
                        content_type,
                        content_length
                    );
                    let _ = stream.write_all(head.as_bytes()).await;
                    let _ = stream.write_all(body).await;
                    let _ = stream.shutdown().await;
                });
            }
        });

        format!("http://{}", addr)
    }

    #[tokio::test]
    async fn test_download_writes_suggested_filename() {
        let base = serve("200 OK", "image/jpeg", b"jpegbytes").await;
        let dir = tempfile::tempdir().unwrap();
        let trigger = HttpLinkTrigger::new(dir.path(), None, Duration::from_secs(5)).unwrap();

        let first = trigger
            .fetch_to_file(&format!("{}/img.jpg", base), "instagram_image_1.jpg")
            .await
            .unwrap();
        assert_eq!(first, dir.path().join("instagram_image_1.jpg"));
        assert_eq!(std::fs::read(&first).unwrap(), b"jpegbytes");

        let second = trigger
            .fetch_to_file(&format!("{}/img.jpg", base), "instagram_image_1.jpg")
            .await
            .unwrap();
        assert_eq!(second, dir.path().join("instagram_image_1 (1).jpg"));
    }

    #[tokio::test]
    async fn test_download_http_error_is_transport() {
        let base = serve("404 Not Found", "text/plain", b"missing").await;
        let dir = tempfile::tempdir().unwrap();
        let trigger = HttpLinkTrigger::new(dir.path(), None, Duration::from_secs(5)).unwrap();

        let err = trigger.trigger(&base, "instagram_video.mp4").await.unwrap_err();
        assert!(matches!(err, DownloadError::Transport(_)));
        assert!(!dir.path().join("instagram_video.mp4").exists());
    }

    #[tokio::test]
    async fn test_truncated_body_leaves_no_file() {
        let base = serve_declaring("200 OK", "image/jpeg", b"partial bytes", 100_000).await;
        let dir = tempfile::tempdir().unwrap();
        let trigger = HttpLinkTrigger::new(dir.path(), None, Duration::from_secs(5)).unwrap();

        let result = trigger.trigger(&base, "instagram_image_1.jpg").await;
        assert!(result.is_err());
        assert!(!dir.path().join("instagram_image_1.jpg").exists());
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
    }

    #[tokio::test]
    async fn test_probe_checks_content_type() {
        let probe = HttpAssetProbe::new(None, Duration::from_secs(5)).unwrap();

        let image = serve("200 OK", "image/png", b"png").await;
        assert!(probe.load(&image, AssetKind::Image).await.is_ok());

        let err = probe.load(&image, AssetKind::Video).await.unwrap_err();
        assert!(matches!(err, DownloadError::AssetLoadFailure(_)));
    }

    #[tokio::test]
    async fn test_probe_reports_http_failure() {
        let probe = HttpAssetProbe::new(None, Duration::from_secs(5)).unwrap();
        let gone = serve("500 Internal Server Error", "text/html", b"boom").await;
        let err = probe.load(&gone, AssetKind::Image).await.unwrap_err();
        assert_eq!(
            err.to_string(),
            "Failed to load image preview (HTTP 500 Internal Server Error)"
        );
    }
}
