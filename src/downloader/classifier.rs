// URL classifier - maps user input to a supported platform

use tracing::debug;
use url::Url;

use super::errors::{DownloadError, EMPTY_INPUT};
use super::models::Platform;

/// Classify raw input from the URL field.
///
/// The input must parse as an absolute URL whose host contains a known
/// platform marker. Surrounding whitespace is ignored.
pub fn classify(input: &str) -> Result<Platform, DownloadError> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Err(DownloadError::InvalidUrl(EMPTY_INPUT.to_string()));
    }

    let parsed = Url::parse(trimmed)
        .map_err(|e| DownloadError::InvalidUrl(format!("{}: {}", trimmed, e)))?;

    let host = parsed
        .host_str()
        .ok_or_else(|| DownloadError::InvalidUrl(format!("{}: missing host", trimmed)))?
        .to_ascii_lowercase();

    match Platform::ALL
        .iter()
        .copied()
        .find(|p| host.contains(p.host_marker()))
    {
        Some(platform) => {
            debug!(%platform, host = %host, "classified url");
            Ok(platform)
        }
        None => Err(DownloadError::InvalidUrl(format!(
            "{}: unsupported host {}",
            trimmed, host
        ))),
    }
}

/// Cheap check for pre-filling the input field (e.g. from the clipboard)
pub fn looks_supported(text: &str) -> bool {
    classify(text).is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_instagram_hosts() {
        for url in [
            "https://instagram.com/p/ABC123",
            "https://www.instagram.com/reel/xyz/",
            "http://m.instagram.com/tv/q1",
            "  https://instagram.com/p/ABC123  ",
            "https://WWW.INSTAGRAM.COM/p/A",
        ] {
            assert_eq!(classify(url), Ok(Platform::Instagram), "{}", url);
        }
    }

    #[test]
    fn test_rejects_other_hosts() {
        let err = classify("https://youtube.com/watch?v=1").unwrap_err();
        assert!(matches!(err, DownloadError::InvalidUrl(_)));
    }

    #[test]
    fn test_rejects_malformed_input() {
        for input in ["", "   ", "instagram.com/p/ABC", "not a url", "https://"] {
            assert!(classify(input).is_err(), "{:?}", input);
        }
    }

    #[test]
    fn test_marker_must_be_in_host() {
        assert!(classify("https://example.com/instagram.com/p/ABC").is_err());
        assert!(classify("https://example.com/?u=instagram.com").is_err());
    }

    #[test]
    fn test_looks_supported() {
        assert!(looks_supported("https://instagram.com/p/ABC"));
        assert!(!looks_supported("hello"));
    }
}
