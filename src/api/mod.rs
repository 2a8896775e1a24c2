pub mod client;
pub mod models;

pub use client::{ApiClient, MediaDownload, Result};
pub use models::ApiConfig;
