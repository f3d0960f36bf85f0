use std::path::PathBuf;
use std::sync::Arc;

use iced::{Subscription, Task};
use rfd::{AsyncMessageDialog, MessageButtons, MessageLevel};

use crate::application::{
    location, DirectoryStatus, DownloadCoordinator, DownloadLocation, ProgressPoller, POLL_INTERVAL,
};
use crate::domain::{AppError, DownloadOutcome, FailureKind};
use crate::extractor::{ExtractionClient, ExtractorConfig, YtDlpClient};
use crate::ui::{DownloadMessage, DownloadView};

const ABOUT_TEXT: &str = "Video Downloader v1.0\nDownloads videos through yt-dlp.";

pub struct DownloadApp {
    view: DownloadView,
    coordinator: DownloadCoordinator,
    poller: ProgressPoller,
    location: DownloadLocation,
}

impl Default for DownloadApp {
    fn default() -> Self {
        Self::new(ExtractorConfig::from_env(), DownloadLocation::default())
    }
}

impl DownloadApp {
    pub fn new(config: ExtractorConfig, location: DownloadLocation) -> Self {
        Self::with_client(Arc::new(YtDlpClient::new(config)), location)
    }

    fn with_client(client: Arc<dyn ExtractionClient>, location: DownloadLocation) -> Self {
        let mut view = DownloadView::default();
        view.show_location(location.directory());

        let coordinator = DownloadCoordinator::new(client);
        let poller = ProgressPoller::new(coordinator.progress().clone());

        Self {
            view,
            coordinator,
            poller,
            location,
        }
    }
}

#[derive(Debug, Clone)]
pub enum Message {
    UiMessage(DownloadMessage),
    /// Progress poll while a run is active
    Tick,
    LocationSelected(Option<PathBuf>),
    LocationOpened(Result<DirectoryStatus, AppError>),
    DialogClosed,
}

pub fn update(app: &mut DownloadApp, message: Message) -> Task<Message> {
    match message {
        Message::UiMessage(ui_msg) => {
            app.view.update(ui_msg.clone());

            match ui_msg {
                DownloadMessage::DownloadPressed => return start_download(app),
                DownloadMessage::LocationPressed => {
                    return Task::perform(
                        location::select_directory(app.location.directory().to_path_buf()),
                        Message::LocationSelected,
                    );
                }
                DownloadMessage::OpenLocationPressed => {
                    return Task::perform(
                        location::open(app.location.directory().to_path_buf()),
                        Message::LocationOpened,
                    );
                }
                DownloadMessage::AboutPressed => {
                    return show_dialog(MessageLevel::Info, "About", ABOUT_TEXT.to_string());
                }
                DownloadMessage::ExitPressed => return iced::exit(),
                DownloadMessage::UrlChanged(_) | DownloadMessage::ClearPressed => {}
            }
        }
        Message::Tick => {
            if let Some(DownloadOutcome::Failure { kind, message }) = poll_run(app) {
                let title = match kind {
                    FailureKind::Transport => "Download Error",
                    FailureKind::Extraction => "Extractor Error",
                    FailureKind::Unclassified => "Error",
                };
                return show_dialog(MessageLevel::Error, title, format!("Error: {}", message));
            }
        }
        Message::LocationSelected(selected) => {
            if app.location.replace(selected) {
                app.view.show_location(app.location.directory());
            }
        }
        Message::LocationOpened(result) => match result {
            Ok(status) => log::debug!("opened download location ({:?})", status),
            Err(e) => return show_dialog(MessageLevel::Error, "Error", e.to_string()),
        },
        Message::DialogClosed => {}
    }
    Task::none()
}

/// One poll tick. The outcome is collected before progress is sampled: the
/// worker's last progress write happens before it sends the outcome, so the
/// final render of a finished run is never stale.
fn poll_run(app: &mut DownloadApp) -> Option<DownloadOutcome> {
    let outcome = app.coordinator.poll_outcome();

    if let Some(percentage) = app.poller.tick() {
        app.view.set_progress(percentage);
    }
    if let Some(outcome) = &outcome {
        app.view.finish_run(outcome);
    }
    outcome
}

fn start_download(app: &mut DownloadApp) -> Task<Message> {
    let started = app
        .location
        .request_for(&app.view.url_input)
        .and_then(|request| app.coordinator.start(request));

    match started {
        Ok(()) => {
            app.view.begin_run();
            Task::none()
        }
        // The button is disabled while running; a stray press is simply dropped
        Err(AppError::Busy) => Task::none(),
        Err(e) => show_dialog(MessageLevel::Warning, "Warning", e.to_string()),
    }
}

fn show_dialog(level: MessageLevel, title: &str, description: String) -> Task<Message> {
    let title = title.to_string();
    Task::perform(
        async move {
            AsyncMessageDialog::new()
                .set_level(level)
                .set_title(title)
                .set_description(description)
                .set_buttons(MessageButtons::Ok)
                .show()
                .await;
        },
        |_| Message::DialogClosed,
    )
}

/// Poll progress only while a run is active.
pub fn subscription(app: &DownloadApp) -> Subscription<Message> {
    if app.coordinator.is_running() {
        iced::time::every(POLL_INTERVAL).map(|_| Message::Tick)
    } else {
        Subscription::none()
    }
}

pub fn view(app: &DownloadApp) -> iced::Element<'_, Message> {
    app.view.view().map(Message::UiMessage)
}
