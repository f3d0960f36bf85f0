pub mod download_coordinator;
pub mod location;
pub mod progress;

pub use download_coordinator::DownloadCoordinator;
pub use location::{DirectoryStatus, DownloadLocation};
pub use progress::{ProgressPoller, POLL_INTERVAL};
