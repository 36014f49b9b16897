//! End-to-end notification delivery.

use crate::config::DeliveryConfig;
use crate::dispatcher::{ChunkDispatcher, ChunkFailure};
use crate::error::{NotifyError, NotifyResult};
use crate::identity::{Identity, PushAddress, RecipientSelector};
use crate::message::{OutboundMessage, PushTicket};
use crate::provider::PushProvider;
use crate::registry::AddressRegistry;
use crate::resolver::resolve;
use crate::validator::is_valid_address;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::sync::Arc;
use tracing::{info, warn};

/// Raw request to register a push token.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegistrationRequest {
    pub token: Option<String>,
    pub user_id: Option<String>,
}

impl RegistrationRequest {
    pub fn new(token: impl Into<String>, user_id: impl Into<String>) -> Self {
        Self {
            token: Some(token.into()),
            user_id: Some(user_id.into()),
        }
    }
}

/// Raw request to send a notification. Empty strings count as missing.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NotificationRequest {
    pub recipient_id: Option<String>,
    pub title: Option<String>,
    pub body: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
}

impl NotificationRequest {
    pub fn new(
        recipient_id: impl Into<String>,
        title: impl Into<String>,
        body: impl Into<String>,
    ) -> Self {
        Self {
            recipient_id: Some(recipient_id.into()),
            title: Some(title.into()),
            body: Some(body.into()),
            data: None,
        }
    }

    /// Attaches a structured payload.
    pub fn with_data(mut self, data: Value) -> Self {
        self.data = Some(data);
        self
    }

    /// Checks required fields and parses the selector.
    pub fn validate(self) -> NotifyResult<ValidatedNotification> {
        let (Some(recipient_id), Some(title), Some(body)) = (
            non_empty(self.recipient_id),
            non_empty(self.title),
            non_empty(self.body),
        ) else {
            return Err(NotifyError::InvalidInput(
                "recipientId, title and body are required".into(),
            ));
        };

        let selector = RecipientSelector::parse(&recipient_id)
            .map_err(|e| NotifyError::InvalidInput(e.to_string()))?;

        Ok(ValidatedNotification {
            selector,
            title,
            body,
            data: self.data,
        })
    }
}

/// A notification request whose required fields are present.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidatedNotification {
    pub selector: RecipientSelector,
    pub title: String,
    pub body: String,
    pub data: Option<Value>,
}

/// Aggregated result of one `send_notification` call.
#[derive(Debug, Clone, PartialEq)]
pub struct DeliveryReport {
    /// Always true once dispatch ran, even if every chunk failed.
    pub accepted: bool,
    /// Provider tickets in submission order.
    pub tickets: Vec<PushTicket>,
    /// Number of valid addresses messages were built for.
    pub recipient_count: usize,
    /// Chunks the provider refused.
    pub failed_chunks: Vec<ChunkFailure>,
}

impl DeliveryReport {
    /// Human-readable outcome line.
    pub fn summary(&self) -> String {
        format!("Notification sent to {} device(s)", self.recipient_count)
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}

/// Composes registry, resolver, validator and dispatcher.
pub struct Orchestrator {
    registry: Arc<dyn AddressRegistry>,
    dispatcher: ChunkDispatcher,
    config: DeliveryConfig,
}

impl Orchestrator {
    pub fn new(
        registry: Arc<dyn AddressRegistry>,
        provider: Arc<dyn PushProvider>,
        config: DeliveryConfig,
    ) -> Self {
        let dispatcher = ChunkDispatcher::new(provider, config.max_batch_size);
        Self {
            registry,
            dispatcher,
            config,
        }
    }

    /// Stores a push token for an identity, replacing any previous token.
    pub async fn register(&self, request: RegistrationRequest) -> NotifyResult<Identity> {
        let (Some(token), Some(user_id)) = (non_empty(request.token), non_empty(request.user_id))
        else {
            return Err(NotifyError::InvalidInput(
                "Token and userId are required".into(),
            ));
        };

        let identity =
            Identity::parse(&user_id).map_err(|e| NotifyError::InvalidInput(e.to_string()))?;
        self.registry
            .register(identity.clone(), PushAddress::new(token))
            .await?;
        info!("Saved push token for user {}", identity);
        Ok(identity)
    }

    /// Delivers a notification to every device the recipient id resolves to.
    pub async fn send_notification(
        &self,
        request: NotificationRequest,
    ) -> NotifyResult<DeliveryReport> {
        let notification = request.validate()?;
        info!(
            "Received notification request for {}: {:?}",
            notification.selector, notification.title
        );

        let addresses = self.collect_addresses(&notification.selector).await?;
        if addresses.is_empty() {
            warn!("No registered tokens found for recipient {}", notification.selector);
            return Err(NotifyError::NoRecipients);
        }

        let valid: Vec<PushAddress> = addresses
            .into_iter()
            .filter(|address| is_valid_address(address.as_str()))
            .collect();
        if valid.is_empty() {
            warn!("No valid tokens found for recipient {}", notification.selector);
            return Err(NotifyError::NoRecipients);
        }
        info!("Sending to {} valid tokens", valid.len());

        let messages = self.build_messages(&notification, &valid);
        let dispatch = self.dispatcher.dispatch(&messages).await;
        if !dispatch.failed_chunks.is_empty() {
            warn!(
                "{} of {} chunks failed for recipient {}",
                dispatch.failed_chunks.len(),
                dispatch.chunk_count,
                notification.selector
            );
        }

        Ok(DeliveryReport {
            accepted: true,
            tickets: dispatch.tickets,
            recipient_count: valid.len(),
            failed_chunks: dispatch.failed_chunks,
        })
    }

    async fn collect_addresses(&self, selector: &RecipientSelector) -> NotifyResult<Vec<PushAddress>> {
        let identities = resolve(self.registry.as_ref(), selector).await?;
        if selector.is_broadcast() {
            info!("Sending to all dietitians, found {} identities", identities.len());
        }

        let mut addresses = Vec::with_capacity(identities.len());
        for identity in &identities {
            if let Some(address) = self.registry.lookup(identity).await? {
                addresses.push(address);
            }
        }
        Ok(addresses)
    }

    fn build_messages(
        &self,
        notification: &ValidatedNotification,
        addresses: &[PushAddress],
    ) -> Vec<OutboundMessage> {
        addresses
            .iter()
            .map(|to| OutboundMessage {
                to: to.clone(),
                sound: self.config.sound.clone(),
                title: notification.title.clone(),
                body: notification.body.clone(),
                data: notification.data.clone(),
            })
            .collect()
    }
}
