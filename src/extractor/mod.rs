mod client;
mod models;

pub use client::YtDlpClient;
pub use models::ExtractorConfig;

use thiserror::Error;
use url::Url;

use crate::domain::{AppError, ProgressEvent};

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ExtractError {
    #[error("{0}")]
    Transport(String),

    #[error("{0}")]
    Extraction(String),

    #[error("{0}")]
    Other(String),
}

impl From<ExtractError> for AppError {
    fn from(error: ExtractError) -> Self {
        match error {
            ExtractError::Transport(message) => AppError::Transport(message),
            ExtractError::Extraction(message) => AppError::Extraction(message),
            ExtractError::Other(message) => AppError::Unclassified(message),
        }
    }
}

pub type Result<T> = std::result::Result<T, ExtractError>;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractedMedia {
    pub title: String,
}

/// Fetches the media behind `url` into `output_template`, blocking the calling
/// thread until done. `on_progress` is invoked synchronously from that thread.
pub trait ExtractionClient: Send + Sync + 'static {
    fn extract(
        &self,
        url: &Url,
        output_template: &str,
        on_progress: &mut dyn FnMut(ProgressEvent),
    ) -> Result<ExtractedMedia>;
}
