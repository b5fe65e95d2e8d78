use std::time::Duration;

use reqwest::Url;
use reqwest::header::{ACCEPT, ACCEPT_LANGUAGE, HeaderMap, HeaderValue, USER_AGENT};

use crate::config::CONFIG;
use crate::error::SearchError;

/// The vendor serves an empty shell to clients that don't look like a
/// browser, so the headers matter.
const UA: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 \
                  (KHTML, like Gecko) Chrome/91.0.4472.124 Safari/537.36";

const RETRY_DELAY: Duration = Duration::from_secs(2);

/// Thin HTTP layer: one client, a per-request timeout, and a retry
/// loop for timeouts and connect failures. Everything else propagates
/// on the first attempt.
pub struct Fetcher {
    client: reqwest::Client,
    base_url: Url,
    max_retries: u32,
}

impl Fetcher {
    pub fn new(base_url: &str) -> Result<Fetcher, SearchError> {
        let base_url = Url::parse(base_url)
            .map_err(|e| SearchError::Parse(format!("bad base url {base_url:?}: {e}")))?;

        let mut headers = HeaderMap::new();
        headers.insert(USER_AGENT, HeaderValue::from_static(UA));
        headers.insert(
            ACCEPT,
            HeaderValue::from_static(
                "text/html,application/xhtml+xml,application/xml;q=0.9,image/webp,*/*;q=0.8",
            ),
        );
        headers.insert(ACCEPT_LANGUAGE, HeaderValue::from_static("en-US,en;q=0.5"));

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(Duration::from_secs(CONFIG.page_load_timeout_secs))
            .build()?;

        Ok(Fetcher {
            client,
            base_url,
            max_retries: CONFIG.max_retries,
        })
    }

    pub fn from_config() -> Result<Fetcher, SearchError> {
        Self::new(&CONFIG.base_url)
    }

    /// Override the retry budget. Tests pass zero so connect failures
    /// surface immediately instead of sitting out the retry delays.
    pub fn with_max_retries(mut self, max_retries: u32) -> Fetcher {
        self.max_retries = max_retries;
        self
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// URL of the site's own search endpoint for a normalized query.
    pub fn search_url(&self, query: &str) -> Result<Url, SearchError> {
        let mut url = self
            .base_url
            .join("/en-gb/product/search")
            .map_err(|e| SearchError::Parse(format!("bad search url: {e}")))?;
        url.query_pairs_mut().append_pair("search", query);
        Ok(url)
    }

    /// GET a page and return its body. Retries up to `max_retries`
    /// extra times on timeout/connect errors.
    pub async fn get_html(&self, url: &Url) -> Result<String, SearchError> {
        let mut attempt = 0u32;
        loop {
            match self.try_get(url).await {
                Ok(body) => return Ok(body),
                Err(e) if e.is_retryable() && attempt < self.max_retries => {
                    attempt += 1;
                    tracing::warn!("fetch failed (attempt {attempt}), retrying {url}: {e}");
                    tokio::time::sleep(RETRY_DELAY).await;
                }
                Err(e) => return Err(e),
            }
        }
    }

    async fn try_get(&self, url: &Url) -> Result<String, SearchError> {
        let res = self.client.get(url.clone()).send().await?;
        let body = res.error_for_status()?.text().await?;
        Ok(body)
    }
}
