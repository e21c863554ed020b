use std::sync::{
    atomic::{AtomicUsize, Ordering},
    Arc,
};
use std::time::Duration;

use futures_util::StreamExt;
use reader_logging::reader_debug;
use reqwest::header::CONTENT_TYPE;

use crate::text::decode_text;
use crate::{FailureKind, FetchError};

#[derive(Debug, Clone)]
pub struct FetchSettings {
    pub connect_timeout: Duration,
    pub request_timeout: Duration,
    pub redirect_limit: usize,
    pub max_bytes: u64,
    /// Accepted media types; an empty list accepts any.
    pub allowed_content_types: Vec<String>,
}

impl Default for FetchSettings {
    fn default() -> Self {
        Self {
            connect_timeout: Duration::from_secs(10),
            request_timeout: Duration::from_secs(30),
            redirect_limit: 5,
            max_bytes: 5 * 1024 * 1024,
            allowed_content_types: [
                "application/rss+xml",
                "application/atom+xml",
                "application/rdf+xml",
                "application/xml",
                "text/xml",
                // Some hosts serve raw feed files as plain text.
                "text/plain",
                "application/feed+json",
                "application/json",
            ]
            .into_iter()
            .map(str::to_string)
            .collect(),
        }
    }
}

/// Transport seam: retrieves a feed document as text. Must be callable concurrently.
#[async_trait::async_trait]
pub trait DocumentFetcher: Send + Sync {
    async fn fetch_document(&self, url: &str) -> Result<String, FetchError>;
}

#[derive(Debug, Clone)]
pub struct ReqwestFetcher {
    settings: FetchSettings,
}

impl ReqwestFetcher {
    pub fn new(settings: FetchSettings) -> Self {
        Self { settings }
    }

    fn build_client(
        &self,
        url: &str,
        redirect_counter: Arc<AtomicUsize>,
    ) -> Result<reqwest::Client, FetchError> {
        let redirect_limit = self.settings.redirect_limit;
        let policy = reqwest::redirect::Policy::custom(move |attempt| {
            let count = attempt.previous().len();
            redirect_counter.store(count, Ordering::Relaxed);
            if count >= redirect_limit {
                attempt.error("redirect limit exceeded")
            } else {
                attempt.follow()
            }
        });

        reqwest::Client::builder()
            .connect_timeout(self.settings.connect_timeout)
            .timeout(self.settings.request_timeout)
            .redirect(policy)
            .build()
            .map_err(|err| FetchError::new(url, FailureKind::Network, err.to_string()))
    }

    fn is_content_type_allowed(&self, content_type: &str) -> bool {
        if self.settings.allowed_content_types.is_empty() {
            return true;
        }
        let ct = content_type.split(';').next().unwrap_or(content_type).trim();
        self.settings
            .allowed_content_types
            .iter()
            .any(|allowed| allowed.eq_ignore_ascii_case(ct))
    }

    fn too_large(&self, url: &str, actual: u64) -> FetchError {
        FetchError::new(
            url,
            FailureKind::TooLarge {
                max_bytes: self.settings.max_bytes,
                actual: Some(actual),
            },
            "response too large",
        )
    }
}

#[async_trait::async_trait]
impl DocumentFetcher for ReqwestFetcher {
    async fn fetch_document(&self, url: &str) -> Result<String, FetchError> {
        let parsed = reqwest::Url::parse(url)
            .map_err(|err| FetchError::new(url, FailureKind::InvalidUrl, err.to_string()))?;
        let redirect_counter = Arc::new(AtomicUsize::new(0));
        let client = self.build_client(url, redirect_counter.clone())?;

        let response = client
            .get(parsed)
            .send()
            .await
            .map_err(|err| map_reqwest_error(url, err))?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::new(
                url,
                FailureKind::HttpStatus(status.as_u16()),
                status.to_string(),
            ));
        }

        if let Some(content_len) = response.content_length() {
            if content_len > self.settings.max_bytes {
                return Err(self.too_large(url, content_len));
            }
        }

        let final_url = response.url().to_string();
        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .map(|value| value.to_string());

        if let Some(ct) = content_type.as_deref() {
            if !self.is_content_type_allowed(ct) {
                return Err(FetchError::new(
                    url,
                    FailureKind::UnsupportedContentType {
                        content_type: ct.to_string(),
                    },
                    "unsupported content type",
                ));
            }
        }

        let mut bytes = Vec::new();
        let mut stream = response.bytes_stream();
        while let Some(chunk) = stream.next().await {
            let chunk = chunk.map_err(|err| map_reqwest_error(url, err))?;
            let next_len = bytes.len() as u64 + chunk.len() as u64;
            if next_len > self.settings.max_bytes {
                return Err(self.too_large(url, next_len));
            }
            bytes.extend_from_slice(&chunk);
        }

        let decoded = decode_text(&bytes, content_type.as_deref()).map_err(|err| {
            let encoding = match &err {
                crate::TextDecodeError::DecodeFailure { encoding, .. } => encoding.clone(),
            };
            FetchError::new(url, FailureKind::Encoding { encoding }, err.to_string())
        })?;

        reader_debug!(
            "Fetched {} final_url={} redirects={} bytes={} encoding={}",
            url,
            final_url,
            redirect_counter.load(Ordering::Relaxed),
            bytes.len(),
            decoded.encoding_label
        );

        Ok(decoded.text)
    }
}

fn map_reqwest_error(url: &str, err: reqwest::Error) -> FetchError {
    if err.is_timeout() {
        return FetchError::new(url, FailureKind::Timeout, err.to_string());
    }
    if err.is_redirect() {
        return FetchError::new(url, FailureKind::RedirectLimitExceeded, err.to_string());
    }
    FetchError::new(url, FailureKind::Network, err.to_string())
}
