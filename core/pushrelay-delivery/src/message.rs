//! Provider wire types.

use crate::identity::PushAddress;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// One message addressed to one device.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutboundMessage {
    pub to: PushAddress,
    pub sound: String,
    pub title: String,
    pub body: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
}

/// Provider receipt for a single submitted message.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum PushTicket {
    /// Accepted for delivery.
    Ok { id: String },
    /// Rejected by the provider, e.g. an unregistered device.
    Error {
        message: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        details: Option<Value>,
    },
}

impl PushTicket {
    /// Returns true if the provider accepted the message.
    #[must_use]
    pub fn is_ok(&self) -> bool {
        matches!(self, PushTicket::Ok { .. })
    }
}
