//! HTTP timetable client.
//!
//! Timetables are static JSON files published next to the web app, one per
//! stop at `{base_url}/tt/{stop}.json`.

use std::sync::Arc;
use std::time::Duration;

use reqwest::StatusCode;
use reqwest::header::CONTENT_TYPE;
use tokio::sync::Semaphore;
use tracing::debug;

use crate::domain::StopId;
use crate::timetable::ScheduleBlock;

use super::TimetableSource;
use super::error::FetchError;

/// Default base URL for timetable documents.
const DEFAULT_BASE_URL: &str = "http://127.0.0.1:8081";

/// Default maximum concurrent requests.
const DEFAULT_MAX_CONCURRENT: usize = 8;

/// Configuration for the timetable client.
#[derive(Debug, Clone)]
pub struct TimetableConfig {
    /// Where the `tt/` directory is served from
    pub base_url: String,
    /// Maximum concurrent requests
    pub max_concurrent: usize,
    /// Request timeout in seconds
    pub timeout_secs: u64,
}

impl TimetableConfig {
    pub fn new() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            max_concurrent: DEFAULT_MAX_CONCURRENT,
            timeout_secs: 10,
        }
    }

    /// Set a custom base URL.
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    /// Set maximum concurrent requests.
    pub fn with_max_concurrent(mut self, n: usize) -> Self {
        self.max_concurrent = n;
        self
    }

    /// Set request timeout.
    pub fn with_timeout(mut self, secs: u64) -> Self {
        self.timeout_secs = secs;
        self
    }
}

impl Default for TimetableConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// Fetches timetable documents over HTTP.
///
/// A semaphore bounds the number of requests in flight.
#[derive(Debug, Clone)]
pub struct TimetableClient {
    http: reqwest::Client,
    base_url: String,
    semaphore: Arc<Semaphore>,
}

impl TimetableClient {
    pub fn new(config: TimetableConfig) -> Result<Self, FetchError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            http,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            semaphore: Arc::new(Semaphore::new(config.max_concurrent.max(1))),
        })
    }

    /// URL of a stop's timetable document.
    pub fn url_for(&self, stop: StopId) -> String {
        format!("{}/tt/{}.json", self.base_url, stop)
    }
}

impl TimetableSource for TimetableClient {
    async fn fetch(&self, stop: StopId) -> Result<Vec<ScheduleBlock>, FetchError> {
        let _permit = self
            .semaphore
            .acquire()
            .await
            .map_err(|_| FetchError::Api {
                status: 0,
                message: "Semaphore closed".to_string(),
            })?;

        let url = self.url_for(stop);
        debug!(%stop, %url, "fetching timetable");

        let response = self.http.get(&url).send().await?;
        let status = response.status();

        if status == StatusCode::NOT_FOUND {
            return Err(FetchError::NotFound(stop));
        }

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(FetchError::Api {
                status: status.as_u16(),
                message: body,
            });
        }

        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or_default()
            .to_string();
        if !content_type.contains("application/json") {
            return Err(FetchError::NotJson { content_type });
        }

        let body = response.text().await?;
        serde_json::from_str(&body).map_err(|e| FetchError::Json {
            message: e.to_string(),
        })
    }
}
