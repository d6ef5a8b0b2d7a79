//! HTTP client for the Lifeplan schedule endpoints.

use async_trait::async_trait;
use chrono::NaiveDate;
use lifeplan_core::schedules::{Block, BlockPatch, DaySchedule, ScheduleUpdate};
use log::debug;
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION, CONTENT_TYPE};
use serde::de::DeserializeOwned;
use std::time::Duration;

use crate::errors::{ClientError, Result};
use crate::format::format_date;

/// Default timeout for API requests.
const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// The schedule operations the screen depends on.
#[async_trait]
pub trait ScheduleApi: Send + Sync {
    async fn get_schedule(&self, date: NaiveDate) -> Result<DaySchedule>;

    /// Replaces the whole block list for `date`, creating the schedule on
    /// first write.
    async fn update_schedule(&self, date: NaiveDate, blocks: Vec<Block>) -> Result<DaySchedule>;

    async fn update_block(
        &self,
        schedule_id: &str,
        block_id: &str,
        patch: BlockPatch,
    ) -> Result<DaySchedule>;

    async fn delete_block(&self, schedule_id: &str, block_id: &str) -> Result<DaySchedule>;
}

#[derive(Debug, serde::Deserialize)]
struct ApiErrorResponse {
    #[serde(default)]
    error: Option<String>,
    #[serde(default)]
    details: Option<String>,
}

/// [`ScheduleApi`] over HTTP with a bearer token.
///
/// ```ignore
/// let api = HttpScheduleApi::new("http://localhost:8080", &token)?;
/// let today = api.get_schedule(chrono::Local::now().date_naive()).await?;
/// ```
#[derive(Debug, Clone)]
pub struct HttpScheduleApi {
    client: reqwest::Client,
    base_url: String,
    auth_header: HeaderValue,
}

impl HttpScheduleApi {
    pub fn new(base_url: &str, access_token: &str) -> Result<Self> {
        let auth_header = HeaderValue::from_str(&format!("Bearer {}", access_token))
            .map_err(|e| ClientError::Config(format!("Invalid access token format: {}", e)))?;

        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(DEFAULT_TIMEOUT_SECS))
            .build()?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            auth_header,
        })
    }

    fn headers(&self) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        headers.insert(AUTHORIZATION, self.auth_header.clone());
        headers
    }

    fn url(&self, path: &str) -> String {
        format!("{}/api{}", self.base_url, path)
    }

    /// Parses a response body, turning error envelopes into [`ClientError::Api`].
    async fn parse_response<T: DeserializeOwned>(&self, response: reqwest::Response) -> Result<T> {
        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            let message = serde_json::from_str::<ApiErrorResponse>(&body)
                .ok()
                .and_then(|err| match (err.error, err.details) {
                    (Some(error), Some(details)) => Some(format!("{}: {}", error, details)),
                    (Some(error), None) => Some(error),
                    (None, details) => details,
                })
                .unwrap_or_else(|| format!("HTTP {}", status));
            return Err(ClientError::Api {
                status: status.as_u16(),
                message,
            });
        }

        serde_json::from_str(&body).map_err(|e| ClientError::Decode(e.to_string()))
    }
}

#[async_trait]
impl ScheduleApi for HttpScheduleApi {
    async fn get_schedule(&self, date: NaiveDate) -> Result<DaySchedule> {
        let url = self.url("/schedules");
        debug!("[ScheduleApi] GET {} for {}", url, date);
        let response = self
            .client
            .get(&url)
            .query(&[("date", format_date(date))])
            .headers(self.headers())
            .send()
            .await?;
        self.parse_response(response).await
    }

    async fn update_schedule(&self, date: NaiveDate, blocks: Vec<Block>) -> Result<DaySchedule> {
        let url = self.url("/schedules");
        debug!("[ScheduleApi] PUT {} with {} block(s)", url, blocks.len());
        let response = self
            .client
            .put(&url)
            .headers(self.headers())
            .json(&ScheduleUpdate { date, blocks })
            .send()
            .await?;
        self.parse_response(response).await
    }

    async fn update_block(
        &self,
        schedule_id: &str,
        block_id: &str,
        patch: BlockPatch,
    ) -> Result<DaySchedule> {
        let url = self.url(&format!("/schedules/{}/blocks/{}", schedule_id, block_id));
        debug!("[ScheduleApi] PATCH {}", url);
        let response = self
            .client
            .patch(&url)
            .headers(self.headers())
            .json(&patch)
            .send()
            .await?;
        self.parse_response(response).await
    }

    async fn delete_block(&self, schedule_id: &str, block_id: &str) -> Result<DaySchedule> {
        let url = self.url(&format!("/schedules/{}/blocks/{}", schedule_id, block_id));
        debug!("[ScheduleApi] DELETE {}", url);
        let response = self
            .client
            .delete(&url)
            .headers(self.headers())
            .send()
            .await?;
        self.parse_response(response).await
    }
}
