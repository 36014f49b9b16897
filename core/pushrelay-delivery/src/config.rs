//! Delivery configuration.

use crate::provider::MAX_PUSH_BATCH_SIZE;
use serde::{Deserialize, Serialize};

/// Sound attached to every outbound message unless configured otherwise.
pub const DEFAULT_SOUND: &str = "default";

/// Tunables for the fan-out engine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DeliveryConfig {
    /// Largest number of messages submitted in one provider call.
    pub max_batch_size: usize,
    /// Sound name carried by every outbound message.
    pub sound: String,
}

impl Default for DeliveryConfig {
    fn default() -> Self {
        Self {
            max_batch_size: MAX_PUSH_BATCH_SIZE,
            sound: DEFAULT_SOUND.to_string(),
        }
    }
}
