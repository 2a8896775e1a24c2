use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Platform {
    #[default]
    Instagram,
    YouTube,
}

impl Platform {
    pub const ALL: [Platform; 2] = [Platform::Instagram, Platform::YouTube];

    pub fn label(self) -> &'static str {
        match self {
            Platform::Instagram => "Instagram",
            Platform::YouTube => "YouTube",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum InstagramContent {
    #[default]
    Post,
    Story,
    Reel,
    Highlight,
    Profile,
    Image,
}

impl InstagramContent {
    pub const ALL: [InstagramContent; 6] = [
        InstagramContent::Post,
        InstagramContent::Story,
        InstagramContent::Reel,
        InstagramContent::Highlight,
        InstagramContent::Profile,
        InstagramContent::Image,
    ];

    pub fn label(self) -> &'static str {
        match self {
            InstagramContent::Post => "Posts",
            InstagramContent::Story => "Stories",
            InstagramContent::Reel => "Reels",
            InstagramContent::Highlight => "Highlights",
            InstagramContent::Profile => "Profile",
            InstagramContent::Image => "Images",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum YouTubeContent {
    #[default]
    RegularVideo,
    Shorts,
}

impl YouTubeContent {
    pub const ALL: [YouTubeContent; 2] = [YouTubeContent::RegularVideo, YouTubeContent::Shorts];

    pub fn label(self) -> &'static str {
        match self {
            YouTubeContent::RegularVideo => "Regular Video",
            YouTubeContent::Shorts => "Shorts",
        }
    }
}

/// Content sub-type of the active platform.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContentType {
    Instagram(InstagramContent),
    YouTube(YouTubeContent),
}

/// Output format sent to the download endpoint as `mp4` / `mp3`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub enum OutputFormat {
    #[default]
    #[serde(rename = "mp4")]
    Video,
    #[serde(rename = "mp3")]
    Audio,
}

impl OutputFormat {
    pub const ALL: [OutputFormat; 2] = [OutputFormat::Video, OutputFormat::Audio];

    /// Wire value and file extension.
    pub fn as_str(self) -> &'static str {
        match self {
            OutputFormat::Video => "mp4",
            OutputFormat::Audio => "mp3",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            OutputFormat::Video => "MP4",
            OutputFormat::Audio => "MP3",
        }
    }
}

/// Everything the user has picked in the selector rows.
///
/// Each platform remembers its own sub-type, so the active content type
/// always belongs to the active platform.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SelectionState {
    platform: Platform,
    instagram: InstagramContent,
    youtube: YouTubeContent,
    format: OutputFormat,
}

impl SelectionState {
    pub fn platform(&self) -> Platform {
        self.platform
    }

    pub fn format(&self) -> OutputFormat {
        self.format
    }

    pub fn content(&self) -> ContentType {
        match self.platform {
            Platform::Instagram => ContentType::Instagram(self.instagram),
            Platform::YouTube => ContentType::YouTube(self.youtube),
        }
    }

    pub fn select_platform(&mut self, platform: Platform) {
        self.platform = platform;
    }

    pub fn select_instagram(&mut self, content: InstagramContent) {
        self.instagram = content;
    }

    pub fn select_youtube(&mut self, content: YouTubeContent) {
        self.youtube = content;
    }

    pub fn select_format(&mut self, format: OutputFormat) {
        self.format = format;
    }
}

/// Form fields posted to `/download`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RequestParams {
    pub url: String,
    pub format: OutputFormat,
}

/// Metadata from `/check` together with the decoded preview, if any.
#[derive(Debug, Clone)]
pub struct CheckedMedia {
    pub title: String,
    pub duration: String,
    pub quality: String,
    pub thumbnail: Option<Thumbnail>,
}

/// RGBA pixels of a downscaled preview image.
#[derive(Debug, Clone)]
pub struct Thumbnail {
    pub width: u32,
    pub height: u32,
    pub pixels: bytes::Bytes,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DownloadPhase {
    #[default]
    Idle,
    Downloading,
    Completed,
    Failed,
}
