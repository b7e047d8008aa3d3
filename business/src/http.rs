//! Session-aware HTTP client.
//!
//! The storage collaborator authenticates with a cookie session, so every request must go
//! through one shared `reqwest::Client` with a cookie store. Responses are reduced to a plain
//! [`Response`] holding only owned data, which keeps the API futures `Send`.
//!
//! Upload bodies can be streamed in fixed-size chunks with a progress callback, see
//! [`progress_body`].

use std::collections::HashMap;
use std::time::Duration;

use futures_util::StreamExt as _;

use crate::error::HttpError;

/// HTTP method for requests.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Get,
    Post,
}

/// A simplified HTTP response that contains only Send-safe data.
#[derive(Debug, Clone)]
pub struct Response {
    /// HTTP status code
    pub status: u16,
    /// Response body as bytes
    pub body: Vec<u8>,
}

impl Response {
    /// Returns true if the status code is in the 2xx range.
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// Attempt to deserialize the body as JSON.
    pub fn json<T: serde::de::DeserializeOwned>(&self) -> Result<T, serde_json::Error> {
        serde_json::from_slice(&self.body)
    }
}

/// Result type for HTTP operations.
pub type HttpResult<T> = Result<T, HttpError>;

/// Reports `(loaded_bytes, total_bytes)` while a body is being sent.
pub type ProgressFn = Box<dyn FnMut(u64, u64) + Send + Sync>;

enum Body {
    Bytes(Vec<u8>),
    Multipart(reqwest::multipart::Form),
}

/// A builder for constructing HTTP requests.
pub struct RequestBuilder {
    client: reqwest::Client,
    method: Method,
    url: String,
    headers: HashMap<String, String>,
    body: Option<Body>,
}

impl std::fmt::Debug for RequestBuilder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RequestBuilder")
            .field("method", &self.method)
            .field("url", &self.url)
            .field("headers", &self.headers)
            .field("has_body", &self.body.is_some())
            .finish()
    }
}

impl RequestBuilder {
    fn new(client: reqwest::Client, method: Method, url: impl Into<String>) -> Self {
        Self {
            client,
            method,
            url: url.into(),
            headers: HashMap::new(),
            body: None,
        }
    }

    /// Set the request body as JSON.
    pub fn json<T: serde::Serialize>(mut self, value: &T) -> Result<Self, serde_json::Error> {
        let json_bytes = serde_json::to_vec(value)?;
        self.body = Some(Body::Bytes(json_bytes));
        self.headers
            .insert("content-type".to_string(), "application/json".to_string());
        Ok(self)
    }

    /// Set a multipart form body. The content type (with boundary) is set by reqwest.
    pub fn multipart(mut self, form: reqwest::multipart::Form) -> Self {
        self.body = Some(Body::Multipart(form));
        self
    }

    pub async fn send(self) -> HttpResult<Response> {
        let mut request = match self.method {
            Method::Get => self.client.get(&self.url),
            Method::Post => self.client.post(&self.url),
        };

        for (name, value) in &self.headers {
            request = request.header(name, value);
        }

        request = match self.body {
            Some(Body::Bytes(bytes)) => request.body(bytes),
            Some(Body::Multipart(form)) => request.multipart(form),
            None => request,
        };

        let response = request.send().await?;

        // Status must be read before the body consumes the response.
        let status = response.status().as_u16();
        let body = response.bytes().await?.to_vec();

        Ok(Response { status, body })
    }
}

/// HTTP client sharing one cookie jar across all requests.
#[derive(Debug, Clone)]
pub struct Client {
    inner: reqwest::Client,
}

impl Client {
    pub fn new(timeout: Duration) -> HttpResult<Self> {
        let inner = reqwest::Client::builder()
            .cookie_store(true)
            .timeout(timeout)
            .build()?;
        Ok(Self { inner })
    }

    /// Create a GET request.
    pub fn get(&self, url: impl Into<String>) -> RequestBuilder {
        RequestBuilder::new(self.inner.clone(), Method::Get, url)
    }

    /// Create a POST request.
    pub fn post(&self, url: impl Into<String>) -> RequestBuilder {
        RequestBuilder::new(self.inner.clone(), Method::Post, url)
    }
}

/// Wraps `bytes` in a streaming body that calls `on_progress` after each chunk is handed to
/// the transport.
pub fn progress_body(
    bytes: Vec<u8>,
    chunk_size: usize,
    mut on_progress: ProgressFn,
) -> reqwest::Body {
    let total = bytes.len() as u64;
    let chunks: Vec<Vec<u8>> = bytes
        .chunks(chunk_size.max(1))
        .map(<[u8]>::to_vec)
        .collect();

    let mut loaded = 0u64;
    let stream = futures_util::stream::iter(chunks).map(move |chunk| {
        loaded += chunk.len() as u64;
        on_progress(loaded, total);
        Ok::<_, std::io::Error>(chunk)
    });

    reqwest::Body::wrap_stream(stream)
}
