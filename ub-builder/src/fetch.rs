//! Fetch adapter for the scraping passes
//!
//! Resolves a URL to a page body with a bounded number of attempts and a
//! fixed delay between them. Failures never propagate: after the last attempt
//! the error is logged and the caller gets `None`.

use async_trait::async_trait;
use governor::{Quota, RateLimiter};
use reqwest::header::{HeaderMap, HeaderValue, FROM};
use reqwest::Client;
use std::time::Duration;
use tracing::{debug, warn};
use ub_common::config::ScrapeConfig;
use ub_common::{Error, Result};

/// User agent sent with every request
pub const USER_AGENT: &str = "Mozilla/5.0";

/// Source of page bodies for the scraping passes
#[async_trait]
pub trait Fetcher: Send + Sync {
    /// Page body, or `None` if every attempt failed
    async fn fetch(&self, url: &str) -> Option<String>;
}

type DirectLimiter = RateLimiter<
    governor::state::direct::NotKeyed,
    governor::state::InMemoryState,
    governor::clock::DefaultClock,
>;

/// reqwest-backed fetcher with retries and request spacing
pub struct HttpFetcher {
    client: Client,
    max_retries: u32,
    retry_delay: Duration,
    /// `None` when requests are not throttled
    rate_limiter: Option<DirectLimiter>,
}

impl HttpFetcher {
    pub fn new(config: &ScrapeConfig) -> Result<Self> {
        let mut headers = HeaderMap::new();
        if let Some(email) = &config.contact_email {
            let value = HeaderValue::from_str(email)
                .map_err(|e| Error::Config(format!("Invalid contact address '{}': {}", email, e)))?;
            headers.insert(FROM, value);
        }

        let client = Client::builder()
            .user_agent(USER_AGENT)
            .default_headers(headers)
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| Error::Http(format!("Failed to build HTTP client: {}", e)))?;

        let rate_limiter = Quota::with_period(Duration::from_millis(config.min_interval_ms))
            .map(RateLimiter::direct);

        Ok(Self {
            client,
            max_retries: config.max_retries.max(1),
            retry_delay: Duration::from_secs(config.retry_delay_secs),
            rate_limiter,
        })
    }

    async fn fetch_once(&self, url: &str) -> std::result::Result<String, reqwest::Error> {
        if let Some(limiter) = &self.rate_limiter {
            limiter.until_ready().await;
        }
        self.client
            .get(url)
            .send()
            .await?
            .error_for_status()?
            .text()
            .await
    }
}

#[async_trait]
impl Fetcher for HttpFetcher {
    async fn fetch(&self, url: &str) -> Option<String> {
        for attempt in 1..=self.max_retries {
            debug!(url = %url, attempt, "Fetching page");
            match self.fetch_once(url).await {
                Ok(body) => return Some(body),
                Err(e) => {
                    warn!(url = %url, attempt, error = %e, "Fetch attempt failed");
                    if attempt < self.max_retries {
                        tokio::time::sleep(self.retry_delay).await;
                    }
                }
            }
        }
        warn!(url = %url, attempts = self.max_retries, "Giving up on page");
        None
    }
}
