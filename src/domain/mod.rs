pub mod error;
pub mod model;

pub use error::AppError;
pub use model::{DownloadOutcome, DownloadRequest, FailureKind, ProgressEvent};
