use std::path::Path;

use iced::{
    widget::{button, column, progress_bar, row, text, text_input, Space},
    Element, Length,
};

use crate::domain::DownloadOutcome;

/// Main view state
pub struct DownloadView {
    pub url_input: String,
    pub location_text: String,
    pub progress: f32,
    pub progress_label: String,
    pub status_message: String,
    pub is_downloading: bool,
}

impl Default for DownloadView {
    fn default() -> Self {
        Self {
            url_input: String::new(),
            location_text: String::new(),
            progress: 0.0,
            progress_label: "0%".to_string(),
            status_message: String::new(),
            is_downloading: false,
        }
    }
}

#[derive(Debug, Clone)]
pub enum DownloadMessage {
    UrlChanged(String),
    DownloadPressed,
    LocationPressed,
    ClearPressed,
    OpenLocationPressed,
    ExitPressed,
    AboutPressed,
}

impl DownloadView {
    pub fn update(&mut self, message: DownloadMessage) {
        match message {
            DownloadMessage::UrlChanged(url) => {
                self.url_input = url;
            }
            DownloadMessage::ClearPressed => {
                self.url_input.clear();
                self.status_message.clear();
                self.set_progress(0);
            }
            _ => {
                // Will be handled by the app
            }
        }
    }

    pub fn show_location(&mut self, directory: &Path) {
        self.location_text = format!("Current download location: {}", directory.display());
    }

    pub fn set_progress(&mut self, percentage: u8) {
        self.progress = f32::from(percentage.min(100));
        self.progress_label = format!("{}%", percentage.min(100));
    }

    pub fn begin_run(&mut self) {
        self.is_downloading = true;
        self.status_message.clear();
        self.set_progress(0);
    }

    pub fn finish_run(&mut self, outcome: &DownloadOutcome) {
        self.is_downloading = false;
        self.status_message = match outcome {
            DownloadOutcome::Success { title } => format!("\"{}\" downloaded!", title),
            DownloadOutcome::Failure { .. } => "Error!".to_string(),
        };
    }

    pub fn view(&self) -> Element<'_, DownloadMessage> {
        let download = button("Download")
            .on_press_maybe((!self.is_downloading).then_some(DownloadMessage::DownloadPressed))
            .padding([10, 20]);

        column![
            text("Enter video URL").size(16),
            row![
                text_input("https://...", &self.url_input)
                    .on_input(DownloadMessage::UrlChanged)
                    .padding(10),
                button("Download Location")
                    .on_press(DownloadMessage::LocationPressed)
                    .padding([10, 20]),
            ]
            .spacing(10),
            text(&self.location_text).size(14),
            Space::new().height(Length::Fixed(10.0)),
            row![
                progress_bar(0.0..=100.0, self.progress),
                text(&self.progress_label).size(14),
            ]
            .spacing(10),
            text(&self.status_message).size(14),
            Space::new().height(Length::Fixed(10.0)),
            row![
                download,
                button("Clear")
                    .on_press(DownloadMessage::ClearPressed)
                    .padding([10, 20]),
                button("Open Location")
                    .on_press(DownloadMessage::OpenLocationPressed)
                    .padding([10, 20]),
                button("Exit")
                    .on_press(DownloadMessage::ExitPressed)
                    .padding([10, 20]),
                button("About")
                    .on_press(DownloadMessage::AboutPressed)
                    .padding([10, 20]),
            ]
            .spacing(10),
        ]
        .padding(20)
        .spacing(10)
        .into()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::FailureKind;

    #[test]
    fn test_run_lifecycle_labels() {
        let mut view = DownloadView::default();
        view.begin_run();
        assert!(view.is_downloading);

        view.set_progress(42);
        assert_eq!(view.progress_label, "42%");

        view.finish_run(&DownloadOutcome::Success {
            title: "Demo".to_string(),
        });
        assert!(!view.is_downloading);
        assert_eq!(view.status_message, "\"Demo\" downloaded!");

        view.finish_run(&DownloadOutcome::Failure {
            kind: FailureKind::Transport,
            message: "Download error: timeout".to_string(),
        });
        assert_eq!(view.status_message, "Error!");
    }

    #[test]
    fn test_clear_resets_display() {
        let mut view = DownloadView::default();
        view.update(DownloadMessage::UrlChanged("https://example.com".to_string()));
        view.set_progress(77);
        view.status_message = "\"Demo\" downloaded!".to_string();

        view.update(DownloadMessage::ClearPressed);
        assert!(view.url_input.is_empty());
        assert!(view.status_message.is_empty());
        assert_eq!(view.progress, 0.0);
        assert_eq!(view.progress_label, "0%");
    }
}
