use std::time::Duration;

use serde::Deserialize;
use url::Url;

const DEFAULT_BASE_URL: &str = "http://127.0.0.1:5000/";
const BASE_URL_ENV: &str = "INSTATUBE_BASE_URL";
const CHECK_TIMEOUT_ENV: &str = "INSTATUBE_CHECK_TIMEOUT_SECS";

/// Successful response from the /check endpoint.
/// The service omits or nulls fields it cannot determine.
#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
pub struct MediaInfo {
    #[serde(default)]
    pub title: Option<String>,
    /// Seconds
    #[serde(default)]
    pub duration: Option<f64>,
    #[serde(default)]
    pub quality: Option<String>,
    #[serde(default)]
    pub thumbnail: Option<String>,
}

impl MediaInfo {
    pub fn display_title(&self) -> String {
        non_empty(&self.title).unwrap_or("Unknown Title").to_string()
    }

    pub fn display_quality(&self) -> String {
        non_empty(&self.quality).unwrap_or("Unknown Quality").to_string()
    }

    pub fn thumbnail_url(&self) -> Option<&str> {
        non_empty(&self.thumbnail)
    }
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|s| !s.trim().is_empty())
}

/// Error body returned by either endpoint
#[derive(Debug, Clone, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}

/// Body of a 2xx /check response, which may still carry an error
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum CheckResponse {
    Failure(ErrorResponse),
    Success(MediaInfo),
}

/// Configuration for the API client
#[derive(Debug, Clone)]
pub struct ApiConfig {
    pub base_url: Url,
    pub check_timeout: Duration,
    pub connect_timeout: Duration,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: Url::parse(DEFAULT_BASE_URL).expect("default base URL is valid"),
            check_timeout: Duration::from_secs(30),
            connect_timeout: Duration::from_secs(10),
        }
    }
}

impl ApiConfig {
    /// Build the configuration from `INSTATUBE_*` environment variables,
    /// falling back to defaults for anything missing or malformed.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = Self::default();

        if let Some(raw) = lookup(BASE_URL_ENV) {
            match parse_base_url(&raw) {
                Ok(url) => config.base_url = url,
                Err(e) => tracing::warn!(
                    "Ignoring {}={:?}: {}; using {}",
                    BASE_URL_ENV,
                    raw,
                    e,
                    config.base_url
                ),
            }
        }

        if let Some(raw) = lookup(CHECK_TIMEOUT_ENV) {
            match raw.trim().parse::<u64>() {
                Ok(secs) if secs > 0 => config.check_timeout = Duration::from_secs(secs),
                _ => tracing::warn!("Ignoring {}={:?}", CHECK_TIMEOUT_ENV, raw),
            }
        }

        config
    }
}

/// Parse a base URL, making sure endpoint joins append rather than replace
/// the last path segment.
fn parse_base_url(raw: &str) -> Result<Url, url::ParseError> {
    let mut url = Url::parse(raw.trim())?;
    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }
    Ok(url)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lookup(pairs: &'static [(&'static str, &'static str)]) -> impl Fn(&str) -> Option<String> {
        move |key: &str| {
            pairs
                .iter()
                .find(|(k, _)| *k == key)
                .map(|(_, v)| v.to_string())
        }
    }

    #[test]
    fn test_config_defaults() {
        let config = ApiConfig::from_lookup(lookup(&[]));
        assert_eq!(config.base_url.as_str(), "http://127.0.0.1:5000/");
        assert_eq!(config.check_timeout, Duration::from_secs(30));
    }

    #[test]
    fn test_config_overrides() {
        let config = ApiConfig::from_lookup(lookup(&[
            ("INSTATUBE_BASE_URL", "https://media.example.com/api"),
            ("INSTATUBE_CHECK_TIMEOUT_SECS", "5"),
        ]));
        assert_eq!(config.base_url.as_str(), "https://media.example.com/api/");
        assert_eq!(
            config.base_url.join("check").unwrap().as_str(),
            "https://media.example.com/api/check"
        );
        assert_eq!(config.check_timeout, Duration::from_secs(5));
    }

    #[test]
    fn test_config_ignores_malformed_values() {
        let config = ApiConfig::from_lookup(lookup(&[
            ("INSTATUBE_BASE_URL", "not a url"),
            ("INSTATUBE_CHECK_TIMEOUT_SECS", "0"),
        ]));
        assert_eq!(config.base_url.as_str(), "http://127.0.0.1:5000/");
        assert_eq!(config.check_timeout, Duration::from_secs(30));
    }

    #[test]
    fn test_check_response_variants() {
        let ok: CheckResponse = serde_json::from_str(
            r#"{"title":"Clip","duration":65,"quality":"1920x1080","thumbnail":"https://i.ytimg.com/x.jpg"}"#,
        )
        .unwrap();
        match ok {
            CheckResponse::Success(info) => {
                assert_eq!(info.display_title(), "Clip");
                assert_eq!(info.duration, Some(65.0));
            }
            CheckResponse::Failure(_) => panic!("expected success"),
        }

        let err: CheckResponse = serde_json::from_str(r#"{"error":"Story not found"}"#).unwrap();
        assert!(matches!(err, CheckResponse::Failure(ErrorResponse { error }) if error == "Story not found"));
    }

    #[test]
    fn test_media_info_fallbacks() {
        let info: MediaInfo =
            serde_json::from_str(r#"{"title":null,"duration":null,"quality":"","thumbnail":""}"#).unwrap();
        assert_eq!(info.display_title(), "Unknown Title");
        assert_eq!(info.display_quality(), "Unknown Quality");
        assert_eq!(info.thumbnail_url(), None);
    }
}
