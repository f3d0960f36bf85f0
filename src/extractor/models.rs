use std::path::PathBuf;

use serde::Deserialize;

/// Progress record printed by yt-dlp through `--progress-template`
#[derive(Debug, Clone, Deserialize)]
pub struct RawProgress {
    pub status: String,
    #[serde(default)]
    pub downloaded_bytes: Option<f64>,
    #[serde(default)]
    pub total_bytes: Option<f64>,
    #[serde(default)]
    pub total_bytes_estimate: Option<f64>,
}

impl RawProgress {
    pub fn total(&self) -> u64 {
        self.total_bytes
            .or(self.total_bytes_estimate)
            .map(|v| v as u64)
            .unwrap_or(0)
    }

    pub fn downloaded(&self) -> u64 {
        self.downloaded_bytes.map(|v| v as u64).unwrap_or(0)
    }
}

/// Configuration for the yt-dlp client
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractorConfig {
    pub binary: PathBuf,
    pub format: String,
}

impl Default for ExtractorConfig {
    fn default() -> Self {
        Self {
            binary: PathBuf::from(if cfg!(target_os = "windows") {
                "yt-dlp.exe"
            } else {
                "yt-dlp"
            }),
            format: "best".to_string(),
        }
    }
}

impl ExtractorConfig {
    /// Defaults overridden by `YTDLP_BIN` and `YTDLP_FORMAT` when set.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = Self::default();
        if let Some(binary) = lookup("YTDLP_BIN").filter(|v| !v.trim().is_empty()) {
            config.binary = PathBuf::from(binary.trim());
        }
        if let Some(format) = lookup("YTDLP_FORMAT").filter(|v| !v.trim().is_empty()) {
            config.format = format.trim().to_string();
        }
        config
    }
}
