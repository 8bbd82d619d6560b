//! Transiter HTTP client.
//!
//! Fetches single pages of the stops listing. Pagination across pages is
//! driven by [`fetch_cycle`](super::fetch_cycle).

use std::time::Duration;

use super::error::TransiterError;
use super::feed::StopFeed;
use super::types::StopsPage;

/// Default base URL for a locally running Transiter instance.
const DEFAULT_BASE_URL: &str = "http://localhost:8080";

/// Default transit system to poll.
const DEFAULT_SYSTEM_ID: &str = "us-ny-subway";

/// Default cap on pages followed in one cycle.
const DEFAULT_MAX_PAGES: usize = 100;

/// Data the arrivals view never uses; skipping it keeps pages small.
const REDUCTION_PARAMS: [(&str, &str); 3] = [
    ("skip_service_maps", "true"),
    ("skip_alerts", "true"),
    ("skip_transfers", "true"),
];

/// Configuration for the Transiter client.
#[derive(Debug, Clone, PartialEq)]
pub struct TransiterConfig {
    /// Base URL of the Transiter instance
    pub base_url: String,
    /// Transit system id, e.g. "us-ny-subway"
    pub system_id: String,
    /// Per-request timeout in seconds
    pub timeout_secs: u64,
    /// Maximum pages followed in one cycle
    pub max_pages: usize,
}

impl TransiterConfig {
    /// Create a config pointing at the given Transiter instance.
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            ..Self::default()
        }
    }

    /// Set the transit system id.
    pub fn with_system(mut self, system_id: impl Into<String>) -> Self {
        self.system_id = system_id.into();
        self
    }

    /// Set request timeout.
    pub fn with_timeout(mut self, secs: u64) -> Self {
        self.timeout_secs = secs;
        self
    }

    /// Set the page limit per cycle.
    pub fn with_max_pages(mut self, n: usize) -> Self {
        self.max_pages = n;
        self
    }
}

impl Default for TransiterConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            system_id: DEFAULT_SYSTEM_ID.to_string(),
            timeout_secs: 10,
            max_pages: DEFAULT_MAX_PAGES,
        }
    }
}

/// Transiter stops API client.
#[derive(Debug, Clone)]
pub struct TransiterClient {
    http: reqwest::Client,
    stops_url: String,
    max_pages: usize,
}

impl TransiterClient {
    /// Create a new client with the given configuration.
    pub fn new(config: TransiterConfig) -> Result<Self, TransiterError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            http,
            stops_url: stops_url(&config.base_url, &config.system_id),
            max_pages: config.max_pages,
        })
    }

    /// Fetch one page of stops, starting at `cursor` if given.
    pub async fn get_stops(&self, cursor: Option<&str>) -> Result<StopsPage, TransiterError> {
        let mut request = self.http.get(&self.stops_url).query(&REDUCTION_PARAMS);
        if let Some(cursor) = cursor {
            request = request.query(&[("first_id", cursor)]);
        }

        let response = request.send().await?;
        let status = response.status();

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(TransiterError::Api {
                status: status.as_u16(),
                message: body,
            });
        }

        let body = response.text().await?;
        serde_json::from_str(&body).map_err(|e| TransiterError::json(e, &body))
    }
}

impl StopFeed for TransiterClient {
    async fn fetch_page(&self, cursor: Option<&str>) -> Result<StopsPage, TransiterError> {
        self.get_stops(cursor).await
    }

    fn max_pages(&self) -> usize {
        self.max_pages
    }
}

fn stops_url(base_url: &str, system_id: &str) -> String {
    format!(
        "{}/systems/{}/stops",
        base_url.trim_end_matches('/'),
        system_id
    )
}
