//! Remote realtime-database client (Firebase REST surface).
//!
//! The remote database is consulted only as a read fallback for sensor data
//! and as an append-only sink for prediction history. Both paths go through
//! the [`RemoteDb`] trait; [`FirebaseClient`] is the production implementation
//! over plain HTTPS:
//!
//! - `GET  {base}/fields/{id}/sensor_data.json` — snapshot read, `null` body
//!   means the path is absent
//! - `POST {base}/fields/{id}/predictions.json` — REST push: the server
//!   assigns a new unique child key per call, so history is never overwritten
//!
//! The client is constructed once at startup from configuration and passed by
//! reference to whatever needs it. No retries; the HTTP client's own timeout
//! defaults apply.

use async_trait::async_trait;
use serde_json::Value;
use thiserror::Error;

// ---

#[derive(Error, Debug)]
pub enum RemoteDbError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("remote database error: {0}")]
    Other(String),
}

/// Path-addressed access to the remote realtime database.
#[async_trait]
pub trait RemoteDb: Send + Sync {
    /// Read `fields/{field_id}/sensor_data`; `None` when the path holds
    /// no data.
    async fn get_sensor_data(&self, field_id: i64) -> Result<Option<Value>, RemoteDbError>;

    /// Append `entry` under `fields/{field_id}/predictions`, creating a new
    /// unique child per call.
    async fn push_prediction(&self, field_id: i64, entry: Value) -> Result<(), RemoteDbError>;
}

/// Production client over the Firebase realtime-database REST API.
pub struct FirebaseClient {
    client: reqwest::Client,
    base_url: String,
    auth_token: Option<String>,
}

impl FirebaseClient {
    pub fn new(base_url: impl Into<String>, auth_token: Option<String>) -> Self {
        // ---
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            auth_token,
        }
    }

    fn url(&self, path: &str) -> String {
        // ---
        match &self.auth_token {
            Some(token) => format!("{}/{}.json?auth={}", self.base_url, path, token),
            None => format!("{}/{}.json", self.base_url, path),
        }
    }
}

#[async_trait]
impl RemoteDb for FirebaseClient {
    async fn get_sensor_data(&self, field_id: i64) -> Result<Option<Value>, RemoteDbError> {
        // ---
        let url = self.url(&format!("fields/{field_id}/sensor_data"));
        tracing::debug!("Remote read: {}", url);

        let data: Value = self
            .client
            .get(&url)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        // The REST API answers `null` for an absent path
        if data.is_null() {
            Ok(None)
        } else {
            Ok(Some(data))
        }
    }

    async fn push_prediction(&self, field_id: i64, entry: Value) -> Result<(), RemoteDbError> {
        // ---
        let url = self.url(&format!("fields/{field_id}/predictions"));
        tracing::debug!("Remote push: {}", url);

        self.client
            .post(&url)
            .json(&entry)
            .send()
            .await?
            .error_for_status()?;

        Ok(())
    }
}
