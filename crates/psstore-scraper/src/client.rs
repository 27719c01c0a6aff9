use std::time::Duration;

use psstore_core::{AppConfig, Game};
use reqwest::Client;

use crate::assemble::extract_game;
use crate::error::{PageError, ScraperError};
use crate::link::StoreLink;
use crate::rate_limit::retry_with_backoff;

/// HTTP client for rendered storefront pages.
///
/// 429 and transport failures are retried with exponential backoff up to
/// `max_retries` additional attempts, waiting at least as long as a 429's
/// `Retry-After` asks; 404 and other non-2xx statuses are
/// returned as typed errors straight away.
pub struct StoreClient {
    client: Client,
    /// Scheme and host accepted links must start with.
    origin: String,
    max_retries: u32,
    /// Base delay for backoff: `backoff_base_secs * 2^attempt`.
    backoff_base_secs: u64,
}

impl StoreClient {
    /// Creates a client with the given timeout, `User-Agent` and retry policy.
    ///
    /// # Errors
    ///
    /// Returns [`ScraperError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed.
    pub fn new(
        origin: &str,
        timeout_secs: u64,
        user_agent: &str,
        max_retries: u32,
        backoff_base_secs: u64,
    ) -> Result<Self, ScraperError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .user_agent(user_agent)
            .build()?;
        Ok(Self {
            client,
            origin: origin.trim_end_matches('/').to_owned(),
            max_retries,
            backoff_base_secs,
        })
    }

    /// # Errors
    ///
    /// See [`StoreClient::new`].
    pub fn from_config(config: &AppConfig) -> Result<Self, ScraperError> {
        Self::new(
            &config.store_origin,
            config.request_timeout_secs,
            &config.user_agent,
            config.max_retries,
            config.retry_backoff_base_secs,
        )
    }

    #[must_use]
    pub fn origin(&self) -> &str {
        &self.origin
    }

    /// Fetches one page's markup, retrying transient failures.
    ///
    /// # Errors
    ///
    /// - [`ScraperError::RateLimited`]: HTTP 429 after all retries.
    /// - [`ScraperError::NotFound`]: HTTP 404 (not retried).
    /// - [`ScraperError::UnexpectedStatus`]: any other non-2xx (not retried).
    /// - [`ScraperError::Http`]: transport failure after all retries.
    pub async fn fetch_page(&self, url: &str) -> Result<String, ScraperError> {
        retry_with_backoff(self.max_retries, self.backoff_base_secs, || async move {
            let response = self
                .client
                .get(url)
                .header(
                    reqwest::header::ACCEPT,
                    "text/html,application/xhtml+xml;q=0.9,*/*;q=0.8",
                )
                .send()
                .await?;
            let status = response.status();

            if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
                let retry_after_secs = response
                    .headers()
                    .get(reqwest::header::RETRY_AFTER)
                    .and_then(|v| v.to_str().ok())
                    .and_then(|s| s.trim().parse::<u64>().ok());
                return Err(ScraperError::RateLimited {
                    url: url.to_owned(),
                    retry_after_secs,
                });
            }

            if status == reqwest::StatusCode::NOT_FOUND {
                return Err(ScraperError::NotFound {
                    url: url.to_owned(),
                });
            }

            if !status.is_success() {
                return Err(ScraperError::UnexpectedStatus {
                    status: status.as_u16(),
                    url: url.to_owned(),
                });
            }

            Ok(response.text().await?)
        })
        .await
    }

    /// Validates `href`, fetches the page and extracts its `Game`.
    ///
    /// A link that is not a product or concept page on this client's origin
    /// fails before any request is made.
    ///
    /// # Errors
    ///
    /// Returns [`PageError`] tagged with `href` for link, fetch and
    /// extraction failures alike.
    pub async fn fetch_game(&self, href: &str, external_id: Option<&str>) -> Result<Game, PageError> {
        let link =
            StoreLink::parse(href, &self.origin).map_err(|source| PageError::new(href, source))?;
        tracing::debug!(href, kind = %link.kind, id = %link.id, "fetching store page");

        let markup = self
            .fetch_page(&link.url)
            .await
            .map_err(|source| PageError::new(href, source))?;
        extract_game(href, &markup, external_id)
    }
}

#[cfg(test)]
#[path = "client_test.rs"]
mod tests;
