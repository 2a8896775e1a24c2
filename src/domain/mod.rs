pub mod error;
pub mod model;
pub mod resolver;

pub use error::AppError;
pub use model::{
    CheckedMedia, ContentType, DownloadPhase, InstagramContent, OutputFormat, Platform,
    RequestParams, SelectionState, Thumbnail, YouTubeContent,
};
pub use resolver::{action_label_for, placeholder_for, request_params_for};
