//! Guest registry API client
//!
//! The registry answers every request with a JSON envelope:
//!
//! ```json
//! { "success": true, "data": { ... } }
//! { "success": false, "error": "Failed to fetch guests" }
//! ```

use crate::config::ClientConfig;
use crate::guest::{GuestEntry, GuestRecord};
use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::time::Duration;
use thiserror::Error;

/// Registry call failures
#[derive(Debug, Clone, Error)]
pub enum ApiError {
    /// Registry unreachable or the connection broke
    #[error("transport error: {0}")]
    Transport(String),
    /// Non-2xx answer
    #[error("registry returned {status}: {message}")]
    Status { status: u16, message: String },
    /// Body did not match the expected shape
    #[error("malformed response: {0}")]
    Decode(String),
    /// 2xx answer carrying `success: false`
    #[error("request rejected: {0}")]
    Rejected(String),
}

impl From<reqwest::Error> for ApiError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_decode() {
            ApiError::Decode(e.to_string())
        } else {
            ApiError::Transport(e.to_string())
        }
    }
}

pub type ApiResult<T> = Result<T, ApiError>;

/// Answer of a create request
#[derive(Debug, Clone, PartialEq)]
pub struct CreateReceipt {
    pub success: bool,
    /// Stored guest, when the registry echoes it back
    pub guest: Option<GuestEntry>,
    pub error: Option<String>,
}

/// The external service that stores and lists guests
#[async_trait]
pub trait GuestRegistry: Send + Sync {
    /// Register a new guest
    async fn create_guest(&self, record: &GuestRecord) -> ApiResult<CreateReceipt>;

    /// All registered guests
    async fn list_guests(&self) -> ApiResult<Vec<GuestEntry>>;

    /// One guest by registry id
    async fn get_guest(&self, id: u64) -> ApiResult<GuestEntry>;

    /// Replace the record fields of a guest
    async fn update_guest(&self, id: u64, record: &GuestRecord) -> ApiResult<GuestEntry>;

    /// Soft delete: the registry keeps the row with status `deleted`
    async fn delete_guest(&self, id: u64) -> ApiResult<GuestEntry>;
}

#[derive(Debug, Deserialize)]
struct Envelope<T> {
    #[serde(default)]
    success: bool,
    data: Option<T>,
    error: Option<String>,
}

impl<T> Envelope<T> {
    fn into_data(self) -> ApiResult<T> {
        if !self.success {
            return Err(ApiError::Rejected(
                self.error.unwrap_or_else(|| "unknown error".into()),
            ));
        }
        self.data
            .ok_or_else(|| ApiError::Decode("no data in response".into()))
    }
}

/// Registry reached over HTTP
pub struct HttpGuestRegistry {
    base_url: String,
    hide_deleted: bool,
    client: reqwest::Client,
}

impl HttpGuestRegistry {
    /// Client with default settings for `base_url` (e.g. `http://localhost:3000/api/v1`)
    pub fn new(base_url: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            hide_deleted: true,
            client: reqwest::Client::new(),
        }
    }

    pub fn from_config(config: &ClientConfig) -> ApiResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;
        Ok(Self {
            base_url: config.api_url.trim_end_matches('/').to_string(),
            hide_deleted: config.hide_deleted,
            client,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}/guests{}", self.base_url, path)
    }

    async fn send<T: DeserializeOwned>(
        &self,
        req: reqwest::RequestBuilder,
    ) -> ApiResult<Envelope<T>> {
        let resp = req.send().await?;
        let status = resp.status();
        let body = resp.bytes().await?;

        if !status.is_success() {
            let message = serde_json::from_slice::<Envelope<serde_json::Value>>(&body)
                .ok()
                .and_then(|env| env.error)
                .unwrap_or_else(|| status.canonical_reason().unwrap_or("unknown").to_string());
            tracing::warn!("Registry answered {}: {}", status, message);
            return Err(ApiError::Status { status: status.as_u16(), message });
        }

        serde_json::from_slice(&body).map_err(|e| ApiError::Decode(e.to_string()))
    }
}

#[async_trait]
impl GuestRegistry for HttpGuestRegistry {
    async fn create_guest(&self, record: &GuestRecord) -> ApiResult<CreateReceipt> {
        let url = self.url("");
        tracing::debug!("POST {}", url);

        // Only `success` decides the outcome; the echoed row is informational.
        let env: Envelope<serde_json::Value> =
            self.send(self.client.post(&url).json(record)).await?;
        let guest = env.data.and_then(|data| match serde_json::from_value::<GuestEntry>(data) {
            Ok(guest) => Some(guest),
            Err(e) => {
                tracing::debug!("Create echoed an unrecognized guest: {}", e);
                None
            }
        });
        Ok(CreateReceipt {
            success: env.success,
            guest,
            error: env.error,
        })
    }

    async fn list_guests(&self) -> ApiResult<Vec<GuestEntry>> {
        let url = self.url("");
        tracing::debug!("GET {}", url);

        let env: Envelope<Vec<GuestEntry>> = self.send(self.client.get(&url)).await?;
        if !env.success {
            return Err(ApiError::Rejected(env.error.unwrap_or_else(|| "unknown error".into())));
        }

        let mut guests = env.data.unwrap_or_default();
        if self.hide_deleted {
            guests.retain(GuestEntry::is_active);
        }
        Ok(guests)
    }

    async fn get_guest(&self, id: u64) -> ApiResult<GuestEntry> {
        let url = self.url(&format!("/{}", id));
        tracing::debug!("GET {}", url);
        self.send(self.client.get(&url)).await?.into_data()
    }

    async fn update_guest(&self, id: u64, record: &GuestRecord) -> ApiResult<GuestEntry> {
        let url = self.url(&format!("/{}", id));
        tracing::debug!("PUT {}", url);

        // The registry overwrites status from the body as well.
        let mut body = serde_json::to_value(record).map_err(|e| ApiError::Decode(e.to_string()))?;
        body["status"] = serde_json::Value::from("active");

        self.send(self.client.put(&url).json(&body)).await?.into_data()
    }

    async fn delete_guest(&self, id: u64) -> ApiResult<GuestEntry> {
        let url = self.url(&format!("/{}", id));
        tracing::debug!("DELETE {}", url);
        self.send(self.client.delete(&url)).await?.into_data()
    }
}
