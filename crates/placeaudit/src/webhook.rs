//! Delivery of a dataset to a webhook as a single JSON array.

use std::time::Duration;

use serde_json::Value;
use tracing::debug;

use crate::error::{AuditError, Result};
use crate::input::Record;

/// Header carrying the webhook API key.
pub const API_KEY_HEADER: &str = "X-API-Key";

/// Characters of an error body kept in [`AuditError::Webhook`].
const ERROR_BODY_LIMIT: usize = 300;

/// Successful delivery.
#[derive(Debug, Clone)]
pub struct Delivery {
    pub status: u16,
    pub body: String,
    pub records: usize,
    pub payload_bytes: usize,
}

/// Blocking webhook client.
pub struct WebhookClient {
    url: String,
    api_key: String,
    client: reqwest::blocking::Client,
}

impl WebhookClient {
    /// Create a client with a 60 second timeout.
    pub fn new(url: impl Into<String>, api_key: impl Into<String>) -> Result<Self> {
        Self::with_timeout(url, api_key, Duration::from_secs(60))
    }

    pub fn with_timeout(
        url: impl Into<String>,
        api_key: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self> {
        let client = reqwest::blocking::Client::builder()
            .timeout(timeout)
            .build()?;
        Ok(Self {
            url: url.into(),
            api_key: api_key.into(),
            client,
        })
    }

    /// Post all records in one request, each tagged with `search_run_id`.
    pub fn send(&self, run_id: &str, records: &[Record]) -> Result<Delivery> {
        let payload = tag_records(run_id, records);
        let body = serde_json::to_vec(&payload)?;
        let payload_bytes = body.len();
        debug!(url = %self.url, records = records.len(), payload_bytes, "posting records");

        let response = self
            .client
            .post(&self.url)
            .header(reqwest::header::CONTENT_TYPE, "application/json")
            .header(API_KEY_HEADER, &self.api_key)
            .body(body)
            .send()?;

        let status = response.status();
        let text = response.text()?;
        if !status.is_success() {
            return Err(AuditError::Webhook {
                status: status.as_u16(),
                body: text.chars().take(ERROR_BODY_LIMIT).collect(),
            });
        }

        Ok(Delivery {
            status: status.as_u16(),
            body: text,
            records: records.len(),
            payload_bytes,
        })
    }
}

/// Copy of the records with `search_run_id` set on each.
pub fn tag_records(run_id: &str, records: &[Record]) -> Value {
    Value::Array(
        records
            .iter()
            .map(|record| {
                let mut record = record.clone();
                record.insert("search_run_id", run_id);
                record.into_value()
            })
            .collect(),
    )
}
