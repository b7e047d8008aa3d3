//! Client configuration read from the process environment.
//!
//! Every value is optional in the environment; missing ones fall back to the defaults below
//! and the result is validated once, at startup.

use std::time::Duration;

use serde::Deserialize;

use crate::error::ConfigError;

const DEFAULT_API_BASE_URL: &str = "http://localhost:3010";
const DEFAULT_MEDIA_LIST_ENDPOINT: &str = "get_media.php";
/// Message the storage collaborator emits when an upload is rejected as already stored.
pub const DEFAULT_DUPLICATE_SIGNAL: &str = "Ảnh hoặc video đã tồn tại";
const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;
const DEFAULT_UPLOAD_CHUNK_SIZE: usize = 64 * 1024;

/// Explicit configuration handed to the API client and controllers at construction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BusinessConfig {
    pub api_base_url: String,
    /// Listing endpoint. `get_media.php` for the photo+video backend, `get_photos.php` for
    /// the photo-only one.
    pub media_list_endpoint: String,
    pub duplicate_signal: String,
    pub request_timeout: Duration,
    /// Granularity of upload progress reports, in bytes.
    pub upload_chunk_size: usize,
}

// Intermediate struct for deserializing environment variables where everything is optional.
#[derive(Debug, Default, Deserialize)]
struct RawConfig {
    api_base_url: Option<String>,
    media_list_endpoint: Option<String>,
    duplicate_signal: Option<String>,
    request_timeout_secs: Option<u64>,
    upload_chunk_size: Option<usize>,
}

impl BusinessConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            api_base_url: base_url.into(),
            ..Self::default()
        }
    }

    /// Reads `API_BASE_URL`, `MEDIA_LIST_ENDPOINT`, `DUPLICATE_SIGNAL`,
    /// `REQUEST_TIMEOUT_SECS` and `UPLOAD_CHUNK_SIZE` from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_vars(std::env::vars())
    }

    pub fn from_vars<I, K, V>(vars: I) -> Result<Self, ConfigError>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        let pairs = vars
            .into_iter()
            .map(|(k, v)| (k.as_ref().to_string(), v.as_ref().to_string()));
        let raw: RawConfig =
            serde_env::from_iter(pairs).map_err(|e| ConfigError::Env(e.to_string()))?;
        Self::from_raw(raw)
    }

    fn from_raw(raw: RawConfig) -> Result<Self, ConfigError> {
        let api_base_url = raw
            .api_base_url
            .filter(|url| !url.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_API_BASE_URL.to_string());
        let api_base_url = api_base_url.trim().trim_end_matches('/').to_string();
        if !(api_base_url.starts_with("http://") || api_base_url.starts_with("https://")) {
            return Err(ConfigError::InvalidBaseUrl(api_base_url));
        }

        let request_timeout_secs = raw
            .request_timeout_secs
            .unwrap_or(DEFAULT_REQUEST_TIMEOUT_SECS);
        if request_timeout_secs == 0 {
            return Err(ConfigError::NotPositive("REQUEST_TIMEOUT_SECS"));
        }

        let upload_chunk_size = raw.upload_chunk_size.unwrap_or(DEFAULT_UPLOAD_CHUNK_SIZE);
        if upload_chunk_size == 0 {
            return Err(ConfigError::NotPositive("UPLOAD_CHUNK_SIZE"));
        }

        Ok(Self {
            api_base_url,
            media_list_endpoint: raw
                .media_list_endpoint
                .unwrap_or_else(|| DEFAULT_MEDIA_LIST_ENDPOINT.to_string()),
            duplicate_signal: raw
                .duplicate_signal
                .unwrap_or_else(|| DEFAULT_DUPLICATE_SIGNAL.to_string()),
            request_timeout: Duration::from_secs(request_timeout_secs),
            upload_chunk_size,
        })
    }

    /// Absolute URL of a collaborator endpoint such as `upload.php`.
    pub fn endpoint(&self, name: &str) -> String {
        format!(
            "{}/{}",
            self.api_base_url.trim_end_matches('/'),
            name.trim_start_matches('/')
        )
    }

    /// Absolute URL of a stored asset (thumbnail or full file). Absolute paths pass through.
    pub fn asset_url(&self, path: &str) -> String {
        if path.starts_with("http://") || path.starts_with("https://") {
            path.to_string()
        } else {
            self.endpoint(path)
        }
    }

    pub fn media_list_url(&self) -> String {
        self.endpoint(&self.media_list_endpoint)
    }
}

impl Default for BusinessConfig {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
            media_list_endpoint: DEFAULT_MEDIA_LIST_ENDPOINT.to_string(),
            duplicate_signal: DEFAULT_DUPLICATE_SIGNAL.to_string(),
            request_timeout: Duration::from_secs(DEFAULT_REQUEST_TIMEOUT_SECS),
            upload_chunk_size: DEFAULT_UPLOAD_CHUNK_SIZE,
        }
    }
}
