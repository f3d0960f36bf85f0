use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AppError {
    #[error("Please enter a valid video URL")]
    InvalidUrl,

    #[error("A download is already running")]
    Busy,

    #[error("Download error: {0}")]
    Transport(String),

    #[error("Extractor error: {0}")]
    Extraction(String),

    #[error("An unexpected error occurred: {0}")]
    Unclassified(String),

    #[error("Filesystem error: {0}")]
    Filesystem(String),
}
