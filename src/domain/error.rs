use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AppError {
    #[error("Please enter a valid URL")]
    EmptyUrl,

    #[error("{0}")]
    Check(String),

    #[error("Failed to download: {0}")]
    Download(String),

    #[error("I/O error: {0}")]
    Io(String),
}

impl AppError {
    /// Title of the dialog that reports this error.
    pub fn title(&self) -> &'static str {
        match self {
            AppError::EmptyUrl => "Missing URL",
            AppError::Check(_) => "Check failed",
            AppError::Download(_) | AppError::Io(_) => "Download failed",
        }
    }
}
