use std::time::Duration;

use futures::StreamExt;
use iced::{Subscription, Task};

use crate::api::{ApiClient, ApiConfig};
use crate::application::{DownloadCoordinator, DownloadEvent};
use crate::domain::{request_params_for, AppError, CheckedMedia, DownloadPhase};
use crate::ui::{DownloadMessage, DownloadView};

const PROGRESS_TICK: Duration = Duration::from_millis(200);
const BUTTON_RESET_DELAY: Duration = Duration::from_millis(1500);

pub struct DownloadApp {
    view: DownloadView,
    coordinator: DownloadCoordinator,
}

impl Default for DownloadApp {
    fn default() -> Self {
        Self::new()
    }
}

impl DownloadApp {
    pub fn new() -> Self {
        Self::with_config(ApiConfig::from_env())
    }

    pub fn with_config(config: ApiConfig) -> Self {
        tracing::info!("Using media service at {}", config.base_url);
        let api_client = ApiClient::new(config);

        Self {
            view: DownloadView::default(),
            coordinator: DownloadCoordinator::new(api_client),
        }
    }
}

#[derive(Debug, Clone)]
pub enum Message {
    UiMessage(DownloadMessage),
    CheckCompleted(Result<CheckedMedia, AppError>),
    Download(DownloadEvent),
    /// Advances the simulated progress bar
    ProgressTick,
    /// Carries the download generation that scheduled it
    ResetDownloadButton(u64),
    AlertClosed,
}

pub fn update(app: &mut DownloadApp, message: Message) -> Task<Message> {
    match message {
        Message::UiMessage(DownloadMessage::CheckPressed) => {
            if !app.view.can_check() {
                return Task::none();
            }

            let Some(url) = crate::utils::normalize_url(&app.view.url) else {
                return report_error(app, AppError::EmptyUrl);
            };

            tracing::info!("Checking {}", url);
            app.view.is_checking = true;
            app.view.status_message = format!("Checking: {}", url);

            let coordinator = app.coordinator.clone();
            return Task::perform(
                async move { coordinator.check(url).await },
                Message::CheckCompleted,
            );
        }
        Message::UiMessage(DownloadMessage::DownloadPressed) => {
            if !app.view.can_download() {
                return Task::none();
            }

            let Some(url) = crate::utils::normalize_url(&app.view.url) else {
                return report_error(app, AppError::EmptyUrl);
            };

            let params = request_params_for(&app.view.selection, &url);
            tracing::info!("Downloading {} as {}", params.url, params.format.as_str());

            app.view.download_phase = DownloadPhase::Downloading;
            app.view.download_generation += 1;
            app.view.progress.reset();
            app.view.status_message = format!("Requesting {}", params.url);

            return Task::stream(
                app.coordinator
                    .download_stream(params)
                    .map(Message::Download),
            );
        }
        Message::UiMessage(ui_msg) => {
            app.view.update(ui_msg);
        }
        Message::CheckCompleted(result) => {
            app.view.is_checking = false;
            match result {
                Ok(media) => {
                    tracing::info!("Check succeeded: {} ({})", media.title, media.duration);
                    app.view.status_message = format!("Ready: {}", media.title);
                    app.view.set_media(media);
                }
                Err(e) => return report_error(app, e),
            }
        }
        Message::Download(event) => match event {
            DownloadEvent::Started { filename } => {
                app.view.status_message = format!("Please select save location for {}", filename);
            }
            DownloadEvent::Saving(path) => {
                app.view.status_message = format!("Downloading to: {}", path.display());
            }
            DownloadEvent::Progress(Some(fraction)) => {
                app.view.progress.report(fraction);
                app.view.status_message = format!("Downloading: {:.1}%", fraction * 100.0);
            }
            DownloadEvent::Progress(None) => {}
            DownloadEvent::Completed(path) => {
                tracing::info!("Saved {}", path.display());
                app.view.download_phase = DownloadPhase::Completed;
                app.view.progress.finish();
                app.view.status_message = format!("Saved: {}", path.display());
                return reset_download_button_later(app.view.download_generation);
            }
            DownloadEvent::Cancelled => {
                tracing::info!("Save dialog dismissed");
                app.view.download_phase = DownloadPhase::Idle;
                app.view.progress.reset();
                app.view.status_message = "Download cancelled".to_string();
            }
            DownloadEvent::Failed(e) => {
                app.view.download_phase = DownloadPhase::Failed;
                app.view.progress.reset();
                let generation = app.view.download_generation;
                return Task::batch([
                    report_error(app, e),
                    reset_download_button_later(generation),
                ]);
            }
        },
        Message::ProgressTick => {
            if app.view.is_downloading() && app.view.progress.is_simulated() {
                app.view.progress.tick();
            }
        }
        Message::ResetDownloadButton(generation) => {
            let finished = matches!(
                app.view.download_phase,
                DownloadPhase::Completed | DownloadPhase::Failed
            );
            if finished && generation == app.view.download_generation {
                app.view.download_phase = DownloadPhase::Idle;
                app.view.progress.reset();
            }
        }
        Message::AlertClosed => {}
    }
    Task::none()
}

/// Log the error, show it in the status line and pop up a message dialog.
fn report_error(app: &mut DownloadApp, error: AppError) -> Task<Message> {
    tracing::error!("{}", error);
    app.view.status_message = error.to_string();

    Task::perform(
        async move {
            rfd::AsyncMessageDialog::new()
                .set_level(rfd::MessageLevel::Error)
                .set_title(error.title())
                .set_description(error.to_string())
                .set_buttons(rfd::MessageButtons::Ok)
                .show()
                .await
        },
        |_| Message::AlertClosed,
    )
}

fn reset_download_button_later(generation: u64) -> Task<Message> {
    Task::perform(
        async { tokio::time::sleep(BUTTON_RESET_DELAY).await },
        move |_| Message::ResetDownloadButton(generation),
    )
}

pub fn subscription(app: &DownloadApp) -> Subscription<Message> {
    if app.view.is_downloading() {
        iced::time::every(PROGRESS_TICK).map(|_| Message::ProgressTick)
    } else {
        Subscription::none()
    }
}

pub fn view(app: &DownloadApp) -> iced::Element<'_, Message> {
    app.view.view().map(Message::UiMessage)
}
