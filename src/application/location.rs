use std::future::Future;
use std::path::{Path, PathBuf};
use rfd::{AsyncFileDialog, AsyncMessageDialog, MessageButtons, MessageDialogResult, MessageLevel};
use tokio::process::Command;

use crate::domain::{AppError, DownloadRequest};

/// The directory new downloads are saved into.
///
/// Each request copies the directory at trigger time, so replacing it never
/// touches a run that is already in flight.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DownloadLocation {
    directory: PathBuf,
}

impl Default for DownloadLocation {
    fn default() -> Self {
        Self::new(crate::utils::default_download_dir())
    }
}

impl DownloadLocation {
    pub fn new(directory: impl Into<PathBuf>) -> Self {
        Self {
            directory: directory.into(),
        }
    }

    pub fn directory(&self) -> &Path {
        &self.directory
    }

    /// Applies a picker result. Returns whether the location changed.
    pub fn replace(&mut self, selected: Option<PathBuf>) -> bool {
        match selected {
            Some(path) if !path.as_os_str().is_empty() => {
                log::info!("download location set to {}", path.display());
                self.directory = path;
                true
            }
            _ => false,
        }
    }

    pub fn request_for(&self, raw_url: &str) -> Result<DownloadRequest, AppError> {
        DownloadRequest::new(raw_url, self.directory.clone())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DirectoryStatus {
    Existing,
    Created,
    Declined,
}

pub async fn select_directory(current: PathBuf) -> Option<PathBuf> {
    AsyncFileDialog::new()
        .set_title("Download Location")
        .set_directory(&current)
        .pick_folder()
        .await
        .map(|handle| handle.path().to_path_buf())
}

/// Makes sure `path` is a directory, asking `confirm` before creating it.
pub async fn ensure_directory<F, Fut>(path: &Path, confirm: F) -> Result<DirectoryStatus, AppError>
where
    F: FnOnce(PathBuf) -> Fut,
    Fut: Future<Output = bool>,
{
    if let Ok(metadata) = tokio::fs::metadata(path).await {
        if metadata.is_dir() {
            return Ok(DirectoryStatus::Existing);
        }
    }

    if !confirm(path.to_path_buf()).await {
        return Ok(DirectoryStatus::Declined);
    }

    tokio::fs::create_dir_all(path).await.map_err(|e| {
        log::warn!("could not create {}: {}", path.display(), e);
        AppError::Filesystem(format!("Could not create the directory: {}", e))
    })?;

    log::info!("created download location {}", path.display());
    Ok(DirectoryStatus::Created)
}

/// Show `path` in the platform file browser.
pub async fn reveal(path: &Path) -> Result<(), AppError> {
    let opener = if cfg!(target_os = "windows") {
        "explorer"
    } else if cfg!(target_os = "macos") {
        "open"
    } else {
        "xdg-open"
    };
    run_opener(opener, path).await
}

/// Run `opener` on `path` and reap it once it exits.
///
/// `explorer` exits non-zero even when the window opened, so the exit code is
/// only logged.
async fn run_opener(opener: &str, path: &Path) -> Result<(), AppError> {
    let status = Command::new(opener)
        .arg(path)
        .status()
        .await
        .map_err(|e| AppError::Filesystem(format!("Could not open {}: {}", path.display(), e)))?;

    if !status.success() {
        log::warn!("{} {} exited with {}", opener, path.display(), status);
    }
    Ok(())
}

/// Open the download location, offering to create it when it is missing.
pub async fn open(path: PathBuf) -> Result<DirectoryStatus, AppError> {
    let status = ensure_directory(&path, confirm_create).await?;

    if status == DirectoryStatus::Created {
        AsyncMessageDialog::new()
            .set_level(MessageLevel::Info)
            .set_title("Success")
            .set_description(format!(
                "The location '{}' has been created.",
                path.display()
            ))
            .set_buttons(MessageButtons::Ok)
            .show()
            .await;
    }
    if status != DirectoryStatus::Declined {
        reveal(&path).await?;
    }
    Ok(status)
}

async fn confirm_create(path: PathBuf) -> bool {
    let answer = AsyncMessageDialog::new()
        .set_level(MessageLevel::Warning)
        .set_title("Location Not Found")
        .set_description(format!(
            "The download location '{}' does not exist. Do you want to create it?",
            path.display()
        ))
        .set_buttons(MessageButtons::YesNo)
        .show()
        .await;
    answer == MessageDialogResult::Yes
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_replace_ignores_empty_selection() {
        let mut location = DownloadLocation::new("/tmp/videos");

        assert!(!location.replace(None));
        assert!(!location.replace(Some(PathBuf::new())));
        assert_eq!(location.directory(), Path::new("/tmp/videos"));

        assert!(location.replace(Some(PathBuf::from("/tmp/other"))));
        assert_eq!(location.directory(), Path::new("/tmp/other"));
    }

    #[test]
    fn test_request_captures_current_directory() {
        let mut location = DownloadLocation::new("/tmp/videos");
        let request = location.request_for("https://example.com/v/1").unwrap();

        location.replace(Some(PathBuf::from("/tmp/other")));
        assert_eq!(request.destination_directory, PathBuf::from("/tmp/videos"));
        assert_eq!(location.request_for("nope"), Err(AppError::InvalidUrl));
    }

    #[tokio::test]
    async fn test_existing_directory_skips_confirmation() {
        let dir = tempfile::tempdir().unwrap();
        let mut asked = false;

        let status = ensure_directory(dir.path(), |_| {
            asked = true;
            async { true }
        })
        .await;
        assert_eq!(status, Ok(DirectoryStatus::Existing));
        assert!(!asked);
    }

    #[tokio::test]
    async fn test_missing_directory_created_on_confirmation() {
        let dir = tempfile::tempdir().unwrap();
        let target = dir.path().join("nested").join("downloads");

        let status = ensure_directory(&target, |asked| {
            let expected = target.clone();
            async move { asked == expected }
        })
        .await;
        assert_eq!(status, Ok(DirectoryStatus::Created));
        assert!(target.is_dir());
    }

    #[tokio::test]
    async fn test_declined_creation_leaves_disk_untouched() {
        let dir = tempfile::tempdir().unwrap();
        let target = dir.path().join("downloads");

        let status = ensure_directory(&target, |_| async { false }).await;
        assert_eq!(status, Ok(DirectoryStatus::Declined));
        assert!(!target.exists());
    }

    #[tokio::test]
    async fn test_creation_failure_is_a_filesystem_error() {
        let dir = tempfile::tempdir().unwrap();
        let blocker = dir.path().join("blocker");
        std::fs::write(&blocker, b"not a directory").unwrap();

        let status = ensure_directory(&blocker.join("downloads"), |_| async { true }).await;
        assert!(matches!(status, Err(AppError::Filesystem(m)) if m.starts_with("Could not create")));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_opener_has_exited_when_reveal_returns() {
        let dir = tempfile::tempdir().unwrap();
        let marker = dir.path().join("opened");

        assert_eq!(run_opener("touch", &marker).await, Ok(()));
        assert!(marker.exists());
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_failing_opener_is_not_an_error() {
        let dir = tempfile::tempdir().unwrap();
        assert_eq!(run_opener("false", dir.path()).await, Ok(()));
    }

    #[tokio::test]
    async fn test_missing_opener_is_a_filesystem_error() {
        let dir = tempfile::tempdir().unwrap();
        let result = run_opener("no-such-file-browser-xyz", dir.path()).await;
        assert!(matches!(result, Err(AppError::Filesystem(m)) if m.starts_with("Could not open")));
    }
}
