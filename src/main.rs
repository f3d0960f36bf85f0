mod app;
mod application;
mod domain;
mod extractor;
mod logging;
mod ui;
mod utils;

use iced::{window, Size};

fn main() -> iced::Result {
    logging::initialize();
    log::info!("starting video downloader");

    iced::application(app::DownloadApp::default, app::update, app::view)
        .title("Video Downloader")
        .subscription(app::subscription)
        .window(window::Settings {
            size: Size::new(760.0, 340.0),
            ..Default::default()
        })
        .run()
}
