//! Gateway to the remote tracking service.
//!
//! The controller consumes the [`ApiGateway`] trait; [`HttpApiGateway`] is
//! the production implementation. Transport failures and non-2xx statuses
//! are normalized into [`FeedError::Transport`] here so the core never
//! sees raw HTTP machinery.

use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::domain::FeedError;

/// Acknowledgement from the begin-tracking endpoint. The server's exact
/// payload varies; nothing in the core depends on it beyond success.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TrackingAck {
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
}

/// Result of the administrative clear endpoint.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ClearOutcome {
    #[serde(default, alias = "deletedCount")]
    pub deleted_count: u64,
}

/// Response of the service health check.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct HealthReport {
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub service: Option<String>,
}

/// The remote operations the feed controller needs.
///
/// `begin_tracking` is idempotent from the client's perspective; the
/// commit list is returned raw because shape validation belongs to the
/// store merge.
#[async_trait]
pub trait ApiGateway: Send + Sync {
    async fn begin_tracking(&self) -> Result<TrackingAck, FeedError>;
    async fn list_commits(&self) -> Result<Value, FeedError>;
    async fn clear_all(&self) -> Result<ClearOutcome, FeedError>;
    async fn health(&self) -> Result<HealthReport, FeedError>;
}

/// HTTP implementation against the tracking service's REST surface.
pub struct HttpApiGateway {
    client: reqwest::Client,
    base_url: String,
}

impl HttpApiGateway {
    /// `timeout` bounds every request; the controller never cancels
    /// in-flight calls itself.
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self, FeedError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|err| FeedError::transport(None, err.to_string()))?;
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Ok(Self { client, base_url })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    async fn read_json<T: DeserializeOwned>(response: reqwest::Response) -> Result<T, FeedError> {
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(transport_error(status.as_u16(), &body));
        }
        response.json::<T>().await.map_err(|err| {
            FeedError::transport(
                Some(status.as_u16()),
                format!("Unreadable response body: {err}"),
            )
        })
    }
}

#[async_trait]
impl ApiGateway for HttpApiGateway {
    async fn begin_tracking(&self) -> Result<TrackingAck, FeedError> {
        let url = self.url("/api/tracking/start");
        log::debug!("POST {url}");
        let response = self.client.post(url).send().await.map_err(request_error)?;
        Self::read_json(response).await
    }

    async fn list_commits(&self) -> Result<Value, FeedError> {
        let url = self.url("/api/commits");
        log::debug!("GET {url}");
        let response = self.client.get(url).send().await.map_err(request_error)?;
        Self::read_json(response).await
    }

    async fn clear_all(&self) -> Result<ClearOutcome, FeedError> {
        let url = self.url("/api/clear-commits");
        log::debug!("DELETE {url}");
        let response = self
            .client
            .delete(url)
            .send()
            .await
            .map_err(request_error)?;
        Self::read_json(response).await
    }

    async fn health(&self) -> Result<HealthReport, FeedError> {
        let url = self.url("/health");
        log::debug!("GET {url}");
        let response = self.client.get(url).send().await.map_err(request_error)?;
        Self::read_json(response).await
    }
}

/// Map a non-2xx response to a transport error. FastAPI-style bodies
/// carry the human-readable reason in `detail`.
fn transport_error(status: u16, body: &str) -> FeedError {
    let detail = serde_json::from_str::<Value>(body)
        .ok()
        .and_then(|value| {
            value
                .get("detail")
                .and_then(Value::as_str)
                .map(str::to_string)
        })
        .unwrap_or_else(|| default_status_message(status));
    FeedError::transport(Some(status), detail)
}

fn default_status_message(status: u16) -> String {
    match status {
        404 => "Resource not found".to_string(),
        500 => "Server error occurred".to_string(),
        _ => format!("Request failed with status {status}"),
    }
}

fn request_error(err: reqwest::Error) -> FeedError {
    if err.is_timeout() {
        FeedError::transport(None, "Request timed out")
    } else {
        FeedError::transport(
            err.status().map(|status| status.as_u16()),
            format!("Network error: {err}"),
        )
    }
}
