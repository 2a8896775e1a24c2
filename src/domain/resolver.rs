//! Maps a [`SelectionState`] to the text shown in the form and the
//! parameters sent to the service. No side effects.

use super::model::{
    ContentType, InstagramContent, OutputFormat, RequestParams, SelectionState, YouTubeContent,
};

/// Example URL shown in the empty input field.
pub fn placeholder_for(state: &SelectionState) -> &'static str {
    match state.content() {
        ContentType::Instagram(InstagramContent::Post | InstagramContent::Image) => {
            "https://www.instagram.com/p/..."
        }
        ContentType::Instagram(InstagramContent::Story) => "https://www.instagram.com/stories/...",
        ContentType::Instagram(InstagramContent::Reel) => "https://www.instagram.com/reels/...",
        ContentType::Instagram(InstagramContent::Highlight) => {
            "https://www.instagram.com/stories/highlights/..."
        }
        ContentType::Instagram(InstagramContent::Profile) => "https://www.instagram.com/username/",
        ContentType::YouTube(YouTubeContent::RegularVideo) => "https://www.youtube.com/watch?v=...",
        ContentType::YouTube(YouTubeContent::Shorts) => "https://www.youtube.com/shorts/...",
    }
}

/// Idle label of the download button.
pub fn action_label_for(state: &SelectionState) -> String {
    format!("Download {}", action_noun(state))
}

fn action_noun(state: &SelectionState) -> &'static str {
    use OutputFormat::{Audio, Video};

    match (state.content(), state.format()) {
        (ContentType::Instagram(InstagramContent::Profile), _) => "Profile Picture",
        (ContentType::Instagram(InstagramContent::Image), _) => "Image",
        (ContentType::Instagram(InstagramContent::Post), Audio) => "Post Audio",
        (ContentType::Instagram(InstagramContent::Post), Video) => "Post Video",
        (ContentType::Instagram(InstagramContent::Story), Audio) => "Story Audio",
        (ContentType::Instagram(InstagramContent::Story), Video) => "Story",
        (ContentType::Instagram(InstagramContent::Reel), Audio) => "Reel Audio",
        (ContentType::Instagram(InstagramContent::Reel), Video) => "Reel",
        (ContentType::Instagram(InstagramContent::Highlight), Audio) => "Highlight Audio",
        (ContentType::Instagram(InstagramContent::Highlight), Video) => "Highlight",
        (ContentType::YouTube(YouTubeContent::Shorts), Audio) => "Shorts Audio",
        (ContentType::YouTube(YouTubeContent::Shorts), Video) => "Shorts Video",
        (ContentType::YouTube(YouTubeContent::RegularVideo), Audio) => "Audio",
        (ContentType::YouTube(YouTubeContent::RegularVideo), Video) => "Video",
    }
}

/// Form fields for `/download`. `url` must already be trimmed and non-empty.
pub fn request_params_for(state: &SelectionState, url: &str) -> RequestParams {
    RequestParams {
        url: url.to_string(),
        format: state.format(),
    }
}
