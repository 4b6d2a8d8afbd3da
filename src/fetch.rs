use crate::error::ImportError;
use log::debug;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT_LANGUAGE, USER_AGENT};
use reqwest::Client;
use std::time::Duration;

const BROWSER_USER_AGENT: &str = "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) \
     AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";

/// Fetches remote pages with a realistic browser identity, a bounded timeout
/// and redirect following. No retry logic lives here; retries are a caller
/// concern.
pub struct PageFetcher {
    client: Client,
}

impl PageFetcher {
    pub fn new(timeout: Duration) -> Result<Self, ImportError> {
        let mut headers = HeaderMap::new();
        headers.insert(USER_AGENT, HeaderValue::from_static(BROWSER_USER_AGENT));
        headers.insert(ACCEPT_LANGUAGE, HeaderValue::from_static("de,en;q=0.8"));

        let client = Client::builder()
            .default_headers(headers)
            .timeout(timeout)
            .build()?;

        Ok(PageFetcher { client })
    }

    /// GET a page and return its body. Non-success statuses and transport
    /// failures both surface as errors; the body is only valid HTML on `Ok`.
    pub async fn fetch(&self, url: &str) -> Result<String, ImportError> {
        debug!("Fetching {url}");
        let response = self.client.get(url).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(ImportError::HttpStatus {
                url: url.to_string(),
                status,
            });
        }

        Ok(response.text().await?)
    }
}
