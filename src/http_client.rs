//! Default blocking HTTP fetcher backed by `reqwest`.

use url::Url;

use crate::http::{FetchError, FetchedDocument, HttpFetcher};

/// Fetcher backed by a blocking [`reqwest::blocking::Client`].
///
/// Follows redirects with reqwest's default policy and reports the
/// effective URL back, as required by [`HttpFetcher`].
#[derive(Debug, Default)]
pub struct DefaultHttpFetcher {
    client: reqwest::blocking::Client,
}

impl DefaultHttpFetcher {
    /// Creates a fetcher with reqwest's default configuration.
    pub fn new() -> Self {
        Self::default()
    }
}

impl HttpFetcher for DefaultHttpFetcher {
    fn fetch(&self, url: &Url) -> Result<FetchedDocument, FetchError> {
        let response = self
            .client
            .get(url.clone())
            .send()
            .map_err(|e| FetchError::Transport(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status(status.as_u16()));
        }

        let final_url = response.url().to_string();
        let body = response
            .text()
            .map_err(|e| FetchError::Transport(e.to_string()))?;

        Ok(FetchedDocument { body, final_url })
    }
}
