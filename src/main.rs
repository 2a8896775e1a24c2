mod api;
mod app;
mod application;
mod domain;
mod ui;
mod utils;

use iced::window;
use tracing_subscriber::EnvFilter;

fn main() -> iced::Result {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .init();

    iced::application(app::DownloadApp::default, app::update, app::view)
        .title("InstaTube Downloader")
        .subscription(app::subscription)
        .window(window::Settings {
            size: iced::Size::new(640.0, 760.0),
            ..Default::default()
        })
        .run()
}
