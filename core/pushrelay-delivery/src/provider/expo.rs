//! Expo push service client.
//!
//! Uses the `/--/api/v2/push/send` endpoint, which takes a JSON array of up
//! to [`MAX_PUSH_BATCH_SIZE`] messages and returns one ticket per message.

use super::{PushProvider, MAX_PUSH_BATCH_SIZE};
use crate::error::{DeliveryError, DeliveryResult};
use crate::message::{OutboundMessage, PushTicket};
use async_trait::async_trait;
use reqwest::header::{ACCEPT, AUTHORIZATION};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::debug;

const SEND_PATH: &str = "/--/api/v2/push/send";

/// Expo client configuration.
#[derive(Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ExpoConfig {
    /// Base URL of the push service (e.g. `https://exp.host`).
    pub api_base_url: String,
    /// Optional access token for projects with enhanced push security.
    pub access_token: Option<String>,
    /// Per-request timeout in seconds.
    pub timeout_secs: u64,
}

impl Default for ExpoConfig {
    fn default() -> Self {
        Self {
            api_base_url: "https://exp.host".to_string(),
            access_token: None,
            timeout_secs: 30,
        }
    }
}

impl std::fmt::Debug for ExpoConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ExpoConfig")
            .field("api_base_url", &self.api_base_url)
            .field("access_token", &self.access_token.as_ref().map(|_| "<redacted>"))
            .field("timeout_secs", &self.timeout_secs)
            .finish()
    }
}

#[derive(Debug, Deserialize)]
struct SendResponse {
    data: Vec<PushTicket>,
}

/// HTTP client for the Expo push service.
#[derive(Debug, Clone)]
pub struct ExpoClient {
    config: ExpoConfig,
    client: Client,
}

impl ExpoClient {
    /// Creates a client from `config`.
    pub fn new(config: ExpoConfig) -> DeliveryResult<Self> {
        if config.timeout_secs == 0 {
            return Err(DeliveryError::Config("timeout_secs must be positive".into()));
        }
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;
        Ok(Self { config, client })
    }

    fn send_url(&self) -> String {
        format!("{}{}", self.config.api_base_url.trim_end_matches('/'), SEND_PATH)
    }
}

#[async_trait]
impl PushProvider for ExpoClient {
    fn name(&self) -> &'static str {
        "expo"
    }

    async fn send_batch(&self, batch: &[OutboundMessage]) -> DeliveryResult<Vec<PushTicket>> {
        if batch.len() > MAX_PUSH_BATCH_SIZE {
            return Err(DeliveryError::BatchTooLarge {
                size: batch.len(),
                limit: MAX_PUSH_BATCH_SIZE,
            });
        }

        let mut request = self
            .client
            .post(self.send_url())
            .header(ACCEPT, "application/json")
            .json(batch);
        if let Some(token) = &self.config.access_token {
            request = request.header(AUTHORIZATION, format!("Bearer {}", token));
        }

        let response = request.send().await?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(DeliveryError::Provider {
                status: status.as_u16(),
                body,
            });
        }

        let body = response.bytes().await?;
        let parsed: SendResponse = serde_json::from_slice(&body)?;
        if parsed.data.len() != batch.len() {
            return Err(DeliveryError::TicketMismatch {
                expected: batch.len(),
                actual: parsed.data.len(),
            });
        }

        debug!("Expo accepted batch of {} messages", batch.len());
        Ok(parsed.data)
    }
}
