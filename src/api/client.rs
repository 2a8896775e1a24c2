use futures::stream::BoxStream;
use futures::{StreamExt, TryStreamExt};
use reqwest::header::CONTENT_DISPOSITION;
use reqwest::{Client, Response};
use thiserror::Error;
use url::Url;

use super::models::{ApiConfig, CheckResponse, ErrorResponse, MediaInfo};
use crate::domain::RequestParams;
use crate::utils::download_filename;

const CHECK_FAILED: &str = "Failed to check media";

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("HTTP request failed: {0}")]
    RequestError(#[from] reqwest::Error),

    #[error("{0}")]
    CheckFailed(String),

    #[error("Download failed: {0}")]
    DownloadFailed(String),

    #[error("Invalid response format: {0}")]
    InvalidResponse(String),

    #[error("Invalid endpoint URL: {0}")]
    InvalidUrl(#[from] url::ParseError),
}

pub type Result<T> = std::result::Result<T, ApiError>;

/// An accepted /download response whose body has not been read yet
pub struct MediaDownload {
    pub filename: String,
    pub total_size: Option<u64>,
    pub stream: BoxStream<'static, Result<bytes::Bytes>>,
}

#[derive(Clone)]
pub struct ApiClient {
    config: ApiConfig,
    http: Client,
}

impl ApiClient {
    pub fn new(config: ApiConfig) -> Self {
        let http = Client::builder()
            .connect_timeout(config.connect_timeout)
            .build()
            .unwrap_or_else(|e| {
                tracing::warn!("Falling back to default HTTP client: {}", e);
                Client::default()
            });

        Self { config, http }
    }

    fn endpoint(&self, path: &str) -> Result<Url> {
        Ok(self.config.base_url.join(path)?)
    }

    /// Look up metadata for a URL without downloading it
    pub async fn check(&self, url: &str) -> Result<MediaInfo> {
        let endpoint = self.endpoint("check")?;
        tracing::info!("POST {} url={}", endpoint, url);

        let response = self
            .http
            .post(endpoint)
            .timeout(self.config.check_timeout)
            .form(&[("url", url)])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let message = response
                .json::<ErrorResponse>()
                .await
                .ok()
                .map(|body| body.error)
                .filter(|error| !error.trim().is_empty())
                .unwrap_or_else(|| CHECK_FAILED.to_string());
            tracing::warn!("Check rejected with {}: {}", status, message);
            return Err(ApiError::CheckFailed(message));
        }

        let body: CheckResponse = response
            .json()
            .await
            .map_err(|e| ApiError::InvalidResponse(format!("JSON decode error: {}", e)))?;

        match body {
            CheckResponse::Failure(ErrorResponse { error }) => {
                let message = if error.trim().is_empty() {
                    CHECK_FAILED.to_string()
                } else {
                    error
                };
                Err(ApiError::CheckFailed(message))
            }
            CheckResponse::Success(info) => {
                tracing::debug!("Check succeeded: {:?}", info);
                Ok(info)
            }
        }
    }

    /// Request the media file. The body is returned as a stream so the
    /// caller can pick a save location before reading it.
    pub async fn download(&self, params: &RequestParams) -> Result<MediaDownload> {
        let endpoint = self.endpoint("download")?;
        tracing::info!(
            "POST {} url={} format={}",
            endpoint,
            params.url,
            params.format.as_str()
        );

        let response = self.http.post(endpoint).form(params).send().await?;

        let status = response.status();
        if !status.is_success() {
            let status_text = status
                .canonical_reason()
                .map(str::to_string)
                .unwrap_or_else(|| status.as_str().to_string());
            return Err(ApiError::DownloadFailed(status_text));
        }

        let filename = download_filename(content_disposition(&response), params.format.as_str());
        let total_size = response.content_length();
        let stream = response
            .bytes_stream()
            .map_err(ApiError::RequestError)
            .boxed();

        Ok(MediaDownload {
            filename,
            total_size,
            stream,
        })
    }

    /// Fetch the raw bytes of a preview image
    pub async fn fetch_thumbnail(&self, url: &str) -> Result<bytes::Bytes> {
        let response = self
            .http
            .get(url)
            .timeout(self.config.check_timeout)
            .send()
            .await?
            .error_for_status()?;

        Ok(response.bytes().await?)
    }
}

fn content_disposition(response: &Response) -> Option<&str> {
    response
        .headers()
        .get(CONTENT_DISPOSITION)
        .and_then(|value| value.to_str().ok())
}
