use std::path::PathBuf;

use url::Url;

use crate::domain::AppError;

const DEFAULT_FOLDER_NAME: &str = "YoutubeDownloads";

/// Parse user input as an absolute http(s) URL
pub fn parse_video_url(input: &str) -> Result<Url, AppError> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Err(AppError::InvalidUrl);
    }

    let url = Url::parse(trimmed).map_err(|_| AppError::InvalidUrl)?;
    match url.scheme() {
        "http" | "https" if url.host_str().is_some_and(|h| !h.is_empty()) => Ok(url),
        _ => Err(AppError::InvalidUrl),
    }
}

/// Default download location: `<user downloads>/YoutubeDownloads`
pub fn default_download_dir() -> PathBuf {
    dirs::download_dir()
        .or_else(dirs::home_dir)
        .unwrap_or_else(|| PathBuf::from("."))
        .join(DEFAULT_FOLDER_NAME)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_video_url() {
        let url = parse_video_url("  https://example.com/watch?v=abc ").unwrap();
        assert_eq!(url.host_str(), Some("example.com"));
        assert!(parse_video_url("http://youtu.be/abc").is_ok());
    }

    #[test]
    fn test_parse_video_url_rejects_malformed() {
        for input in ["", "   ", "not-a-url", "ftp://example.com/v.mp4", "http//x", "https://", "mailto:me@x.org"] {
            assert_eq!(parse_video_url(input), Err(AppError::InvalidUrl), "{input:?}");
        }
    }

    #[test]
    fn test_default_download_dir() {
        assert!(default_download_dir().ends_with(DEFAULT_FOLDER_NAME));
    }
}
