use std::path::{Path, PathBuf};

use url::Url;

use super::AppError;

/// Placeholder pattern the extractor expands into `<title>.<ext>` at save time.
pub const OUTPUT_FILE_PATTERN: &str = "%(title)s.%(ext)s";

/// One validated download, built fresh from user input for every run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DownloadRequest {
    pub url: Url,
    pub destination_directory: PathBuf,
}

impl DownloadRequest {
    /// Validates `raw_url` and pairs it with the directory captured at trigger time.
    pub fn new(raw_url: &str, destination_directory: impl Into<PathBuf>) -> Result<Self, AppError> {
        Ok(Self {
            url: crate::utils::parse_video_url(raw_url)?,
            destination_directory: destination_directory.into(),
        })
    }

    pub fn output_template(&self) -> String {
        output_template_for(&self.destination_directory)
    }
}

pub fn output_template_for(directory: &Path) -> String {
    directory.join(OUTPUT_FILE_PATTERN).to_string_lossy().into_owned()
}

/// Status reports emitted by an extraction client while it works.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProgressEvent {
    Downloading {
        downloaded_bytes: u64,
        total_bytes: u64,
    },
    Finished,
    /// Any status the coordinator does not act on (e.g. `error`, post-processing).
    Other(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    Transport,
    Extraction,
    Unclassified,
}

/// Terminal result of a run, produced exactly once.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DownloadOutcome {
    Success { title: String },
    Failure { kind: FailureKind, message: String },
}

impl DownloadOutcome {
    pub fn failure(error: AppError) -> Self {
        let kind = match error {
            AppError::Transport(_) => FailureKind::Transport,
            AppError::Extraction(_) => FailureKind::Extraction,
            _ => FailureKind::Unclassified,
        };
        Self::Failure {
            kind,
            message: error.to_string(),
        }
    }
}
