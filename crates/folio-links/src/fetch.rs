//! Page fetching through a CORS proxy.

use std::collections::HashMap;
use std::sync::{Mutex, PoisonError};
use std::time::Duration;

use folio_renderer::{LinkMetadataSource, LinkPreviewMetadata};
use percent_encoding::{NON_ALPHANUMERIC, utf8_percent_encode};
use ureq::Agent;

use crate::extract::extract_metadata;

/// Default proxy; `{url}` is replaced with the percent-encoded target.
pub const DEFAULT_PROXY_URL: &str = "https://api.allorigins.win/raw?url={url}";

/// Default request timeout.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Pages larger than this are truncated before extraction.
const MAX_BODY_BYTES: u64 = 2 * 1024 * 1024;

/// Error fetching a page.
#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    /// Only absolute http(s) links are fetched.
    #[error("unsupported link '{0}'")]
    UnsupportedUrl(String),
    #[error("HTTP error: {0}")]
    Http(String),
    #[error("HTTP {0}")]
    Status(u16),
    #[error("I/O error: {0}")]
    Io(String),
}

/// Expand a proxy template for `target`.
#[must_use]
pub fn proxy_url(template: &str, target: &str) -> String {
    let encoded = utf8_percent_encode(target, NON_ALPHANUMERIC).to_string();
    template.replace("{url}", &encoded)
}

/// Fetches raw page HTML through a proxy.
pub struct ProxyFetcher {
    agent: Agent,
    proxy_template: String,
}

impl ProxyFetcher {
    #[must_use]
    pub fn new(proxy_template: impl Into<String>, timeout: Duration) -> Self {
        Self {
            agent: Agent::config_builder()
                .timeout_global(Some(timeout))
                .http_status_as_error(false)
                .build()
                .into(),
            proxy_template: proxy_template.into(),
        }
    }

    /// Fetch the HTML of `href`.
    pub fn fetch_html(&self, href: &str) -> Result<String, FetchError> {
        if !(href.starts_with("http://") || href.starts_with("https://")) {
            return Err(FetchError::UnsupportedUrl(href.to_owned()));
        }
        let url = proxy_url(&self.proxy_template, href);
        let response = self
            .agent
            .get(&url)
            .header("Accept", "text/html")
            .call()
            .map_err(|e| FetchError::Http(e.to_string()))?;

        let status = response.status().as_u16();
        if status >= 400 {
            return Err(FetchError::Status(status));
        }
        let mut body = response.into_body();
        body.with_config()
            .limit(MAX_BODY_BYTES)
            .read_to_string()
            .map_err(|e| FetchError::Io(e.to_string()))
    }

    /// Fetch and extract metadata for `href`.
    pub fn fetch_metadata(&self, href: &str) -> Result<LinkPreviewMetadata, FetchError> {
        let html = self.fetch_html(href)?;
        Ok(extract_metadata(&html, href))
    }
}

impl Default for ProxyFetcher {
    fn default() -> Self {
        Self::new(DEFAULT_PROXY_URL, DEFAULT_TIMEOUT)
    }
}

/// [`LinkMetadataSource`] over a [`ProxyFetcher`].
///
/// Failures degrade to `None` and are logged. Results, failures included,
/// are remembered per link so repeated cards hit the network once.
pub struct ProxyMetadataSource {
    fetcher: ProxyFetcher,
    cache: Mutex<HashMap<String, Option<LinkPreviewMetadata>>>,
}

impl ProxyMetadataSource {
    #[must_use]
    pub fn new(fetcher: ProxyFetcher) -> Self {
        Self {
            fetcher,
            cache: Mutex::new(HashMap::new()),
        }
    }
}

impl LinkMetadataSource for ProxyMetadataSource {
    fn fetch(&self, href: &str) -> Option<LinkPreviewMetadata> {
        if let Some(cached) = self
            .cache
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(href)
        {
            return cached.clone();
        }

        let result = match self.fetcher.fetch_metadata(href) {
            Ok(metadata) => Some(metadata),
            Err(e) => {
                tracing::debug!(href, error = %e, "Link metadata fetch failed");
                None
            }
        };
        self.cache
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(href.to_owned(), result.clone());
        result
    }
}
