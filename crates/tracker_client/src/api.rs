use std::time::Duration;

use serde::Deserialize;
use thiserror::Error;
use url::Url;

use tracker_core::{CommandAction, JobSnapshot, PollOutcome};

#[derive(Debug, Clone)]
pub struct ApiSettings {
    pub base_url: Url,
    pub connect_timeout: Duration,
    pub request_timeout: Duration,
}

impl ApiSettings {
    pub fn new(base_url: Url) -> Self {
        Self {
            base_url,
            connect_timeout: Duration::from_secs(10),
            request_timeout: Duration::from_secs(30),
        }
    }

    pub fn parse(base_url: &str) -> Result<Self, ApiError> {
        let base_url = Url::parse(base_url).map_err(|err| ApiError::InvalidUrl(err.to_string()))?;
        Ok(Self::new(base_url))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ApiError {
    #[error("invalid url: {0}")]
    InvalidUrl(String),
    #[error("http status {0}")]
    HttpStatus(u16),
    #[error("request timed out")]
    Timeout,
    #[error("network error: {0}")]
    Network(String),
    #[error("malformed response body: {0}")]
    Decode(String),
    #[error("backend reported a running crawl without a job payload")]
    MissingJob,
}

/// Read/command surface of the crawl backend. The HTTP implementation below
/// is the production one; tests substitute their own.
#[async_trait::async_trait]
pub trait StatusApi: Send + Sync {
    /// One status read for the owner, already classified.
    async fn crawl_activity(&self, owner_id: &str) -> Result<PollOutcome, ApiError>;

    /// Issue a control verb against a job; the response is a fresh snapshot.
    async fn run_command(
        &self,
        job_id: &str,
        action: CommandAction,
    ) -> Result<JobSnapshot, ApiError>;
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ActivityBody {
    running: bool,
    #[serde(default)]
    job: Option<JobSnapshot>,
    #[serde(default)]
    last_run: Option<LastRunBody>,
}

#[derive(Debug, Deserialize)]
struct LastRunBody {
    job: JobSnapshot,
}

#[derive(Debug, Deserialize)]
struct CommandBody {
    job: JobSnapshot,
}

#[derive(Debug, Clone)]
pub struct HttpStatusApi {
    client: reqwest::Client,
    settings: ApiSettings,
}

impl HttpStatusApi {
    pub fn new(settings: ApiSettings) -> Result<Self, ApiError> {
        let client = reqwest::Client::builder()
            .connect_timeout(settings.connect_timeout)
            .timeout(settings.request_timeout)
            .build()
            .map_err(|err| ApiError::Network(err.to_string()))?;
        Ok(Self { client, settings })
    }

    fn endpoint(&self, segments: &[&str]) -> Result<Url, ApiError> {
        let mut url = self.settings.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| ApiError::InvalidUrl("base url cannot carry paths".to_string()))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }
}

#[async_trait::async_trait]
impl StatusApi for HttpStatusApi {
    async fn crawl_activity(&self, owner_id: &str) -> Result<PollOutcome, ApiError> {
        let url = self.endpoint(&["api", "knowledge-bases", owner_id, "crawl-activity"])?;
        let response = self.client.get(url).send().await.map_err(map_reqwest_error)?;

        let status = response.status();
        if !status.is_success() {
            return Err(ApiError::HttpStatus(status.as_u16()));
        }

        let text = response.text().await.map_err(map_reqwest_error)?;
        let body: ActivityBody =
            serde_json::from_str(&text).map_err(|err| ApiError::Decode(err.to_string()))?;

        if body.running {
            // A claimed-running response without a job payload is a protocol
            // violation, handled on the same path as transport errors.
            body.job.map(PollOutcome::Active).ok_or(ApiError::MissingJob)
        } else {
            Ok(PollOutcome::Idle(body.last_run.map(|last| last.job)))
        }
    }

    async fn run_command(
        &self,
        job_id: &str,
        action: CommandAction,
    ) -> Result<JobSnapshot, ApiError> {
        let url = self.endpoint(&["api", "crawl-jobs", job_id, action.as_str()])?;
        let response = self
            .client
            .post(url)
            .send()
            .await
            .map_err(map_reqwest_error)?;

        let status = response.status();
        if !status.is_success() {
            return Err(ApiError::HttpStatus(status.as_u16()));
        }

        let text = response.text().await.map_err(map_reqwest_error)?;
        let body: CommandBody =
            serde_json::from_str(&text).map_err(|err| ApiError::Decode(err.to_string()))?;
        Ok(body.job)
    }
}

fn map_reqwest_error(err: reqwest::Error) -> ApiError {
    if err.is_timeout() {
        return ApiError::Timeout;
    }
    ApiError::Network(err.to_string())
}
