pub mod progress;

use iced::{
    widget::{button, column, progress_bar, text, text_input, Column, Row, Space},
    Element, Length,
};

use crate::domain::{
    action_label_for, placeholder_for, CheckedMedia, ContentType, DownloadPhase, InstagramContent,
    OutputFormat, Platform, SelectionState, YouTubeContent,
};
use progress::ProgressIndicator;

/// Metadata of the last successful check, ready to render
pub struct MediaPanel {
    pub media: CheckedMedia,
    pub preview: Option<iced::widget::image::Handle>,
}

/// Main view state
pub struct DownloadView {
    pub selection: SelectionState,
    pub url: String,
    pub status_message: String,
    pub is_checking: bool,
    pub media: Option<MediaPanel>,
    pub download_phase: DownloadPhase,
    /// Bumped on every download so stale reset timers can be ignored
    pub download_generation: u64,
    pub progress: ProgressIndicator,
}

impl Default for DownloadView {
    fn default() -> Self {
        Self {
            selection: SelectionState::default(),
            url: String::new(),
            status_message: "Paste a link and press Check Media".to_string(),
            is_checking: false,
            media: None,
            download_phase: DownloadPhase::Idle,
            download_generation: 0,
            progress: ProgressIndicator::default(),
        }
    }
}

#[derive(Debug, Clone)]
pub enum DownloadMessage {
    PlatformSelected(Platform),
    InstagramContentSelected(InstagramContent),
    YouTubeContentSelected(YouTubeContent),
    FormatSelected(OutputFormat),
    UrlChanged(String),
    CheckPressed,
    DownloadPressed,
}

impl DownloadView {
    pub fn update(&mut self, message: DownloadMessage) {
        match message {
            DownloadMessage::PlatformSelected(platform) => self.selection.select_platform(platform),
            DownloadMessage::InstagramContentSelected(content) => {
                self.selection.select_instagram(content)
            }
            DownloadMessage::YouTubeContentSelected(content) => {
                self.selection.select_youtube(content)
            }
            DownloadMessage::FormatSelected(format) => self.selection.select_format(format),
            DownloadMessage::UrlChanged(url) => {
                self.url = url;
            }
            DownloadMessage::CheckPressed | DownloadMessage::DownloadPressed => {
                // Will be handled by the app
            }
        }
    }

    pub fn set_media(&mut self, media: CheckedMedia) {
        let preview = media.thumbnail.as_ref().map(|thumb| {
            iced::widget::image::Handle::from_rgba(thumb.width, thumb.height, thumb.pixels.clone())
        });
        self.media = Some(MediaPanel { media, preview });
    }

    pub fn is_downloading(&self) -> bool {
        self.download_phase == DownloadPhase::Downloading
    }

    pub fn can_check(&self) -> bool {
        !self.is_checking && !self.is_downloading()
    }

    /// Download is unlocked by a successful check.
    pub fn can_download(&self) -> bool {
        self.media.is_some() && !self.is_checking && !self.is_downloading()
    }

    pub fn check_label(&self) -> &'static str {
        if self.is_checking {
            "Checking..."
        } else {
            "Check Media"
        }
    }

    pub fn download_label(&self) -> String {
        match self.download_phase {
            DownloadPhase::Idle => action_label_for(&self.selection),
            DownloadPhase::Downloading => "Downloading...".to_string(),
            DownloadPhase::Completed => "Download Complete!".to_string(),
            DownloadPhase::Failed => "Download Failed".to_string(),
        }
    }

    pub fn view(&self) -> Element<'_, DownloadMessage> {
        let platforms = Row::with_children(Platform::ALL.iter().map(|&platform| {
            selector(
                platform.label(),
                platform == self.selection.platform(),
                DownloadMessage::PlatformSelected(platform),
            )
        }))
        .spacing(10);

        let content_types = match self.selection.platform() {
            Platform::Instagram => Row::with_children(InstagramContent::ALL.iter().map(|&content| {
                selector(
                    content.label(),
                    self.selection.content() == ContentType::Instagram(content),
                    DownloadMessage::InstagramContentSelected(content),
                )
            })),
            Platform::YouTube => Row::with_children(YouTubeContent::ALL.iter().map(|&content| {
                selector(
                    content.label(),
                    self.selection.content() == ContentType::YouTube(content),
                    DownloadMessage::YouTubeContentSelected(content),
                )
            })),
        }
        .spacing(6);

        let formats = Row::with_children(OutputFormat::ALL.iter().map(|&format| {
            selector(
                format.label(),
                format == self.selection.format(),
                DownloadMessage::FormatSelected(format),
            )
        }))
        .spacing(10);

        let mut layout = column![
            text("InstaTube Downloader").size(32),
            Space::new().height(Length::Fixed(10.0)),
            platforms,
            content_types,
            Space::new().height(Length::Fixed(10.0)),
            text("URL:").size(16),
            text_input(placeholder_for(&self.selection), &self.url)
                .on_input(DownloadMessage::UrlChanged)
                .on_submit(DownloadMessage::CheckPressed)
                .padding(10),
            formats,
            button(self.check_label())
                .on_press_maybe(self.can_check().then_some(DownloadMessage::CheckPressed))
                .padding([10, 20]),
        ]
        .padding(20)
        .spacing(10);

        if let Some(panel) = &self.media {
            layout = layout.push(media_panel(panel));
        }

        if self.is_downloading() {
            layout = layout.push(progress_bar(0.0..=1.0, self.progress.value()));
        }

        layout
            .push(text(&self.status_message).size(14))
            .push(
                button(text(self.download_label()))
                    .on_press_maybe(self.can_download().then_some(DownloadMessage::DownloadPressed))
                    .padding([10, 20]),
            )
            .into()
    }
}

fn selector(label: &str, active: bool, on_press: DownloadMessage) -> Element<'_, DownloadMessage> {
    button(text(label))
        .on_press(on_press)
        .padding([6, 14])
        .style(if active {
            button::primary
        } else {
            button::secondary
        })
        .into()
}

fn media_panel(panel: &MediaPanel) -> Element<'_, DownloadMessage> {
    let mut details = Column::new()
        .spacing(4)
        .push(text(&panel.media.title).size(18))
        .push(text(format!("Duration: {}", panel.media.duration)).size(14))
        .push(text(format!("Quality: {}", panel.media.quality)).size(14));

    if let Some(handle) = &panel.preview {
        details = details.push(
            iced::widget::image::<iced::widget::image::Handle>(handle.clone())
                .width(Length::Fixed(320.0)),
        );
    }

    details.into()
}
