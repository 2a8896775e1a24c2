use regex::Regex;

use crate::domain::Thumbnail;

/// Longest edge bounds of the preview image.
const THUMBNAIL_WIDTH: u32 = 320;
const THUMBNAIL_HEIGHT: u32 = 180;

/// Trim user input, rejecting empty or whitespace-only URLs
pub fn normalize_url(input: &str) -> Option<String> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

/// Sanitize filename to remove invalid characters
pub fn sanitize_filename(filename: &str) -> String {
    filename
        .chars()
        .map(|c| match c {
            '<' | '>' | ':' | '"' | '/' | '\\' | '|' | '?' | '*' => '_',
            c if c.is_control() => '_',
            _ => c,
        })
        .collect::<String>()
        .trim()
        .to_string()
}

/// Extract `filename="..."` from a Content-Disposition header value
pub fn filename_from_content_disposition(header: &str) -> Option<String> {
    let re = Regex::new(r#"filename="(.+)""#).ok()?;
    let caps = re.captures(header)?;
    Some(caps[1].to_string())
}

/// Name offered in the save dialog for a download
pub fn download_filename(content_disposition: Option<&str>, extension: &str) -> String {
    let fallback = format!("media.{}", extension);
    let name = content_disposition
        .and_then(filename_from_content_disposition)
        .map(|name| {
            sanitize_filename(&name)
                .trim_matches(|c| c == '.' || c == ' ')
                .to_string()
        })
        .unwrap_or_default();

    if name.is_empty() {
        fallback
    } else {
        name
    }
}

/// Format a duration in seconds as `m:ss`
pub fn format_duration(seconds: f64) -> String {
    let total = if seconds.is_finite() && seconds > 0.0 {
        seconds.floor() as u64
    } else {
        0
    };
    format!("{}:{:02}", total / 60, total % 60)
}

/// Decode an image and shrink it to fit the preview area.
/// Images that already fit keep their size.
pub fn decode_thumbnail(data: &[u8]) -> Option<Thumbnail> {
    let img = image::load_from_memory(data).ok()?;
    let img = if img.width() > THUMBNAIL_WIDTH || img.height() > THUMBNAIL_HEIGHT {
        img.thumbnail(THUMBNAIL_WIDTH, THUMBNAIL_HEIGHT)
    } else {
        img
    };
    let rgba = img.to_rgba8();
    let (width, height) = rgba.dimensions();

    Some(Thumbnail {
        width,
        height,
        pixels: bytes::Bytes::from(rgba.into_raw()),
    })
}
