//! Push notification relay engine.
//!
//! Clients register a push address under an identity (a user or a
//! dietitian); other clients then ask for a titled message to be delivered
//! to one identity or to every registered dietitian.
//!
//! # Architecture
//!
//! - **Identity**: tagged identity and recipient selector types, parsed once
//!   at the boundary
//! - **Registry**: identity to push address store (last write wins)
//! - **Validator**: provider push address grammar
//! - **Resolver**: expands a selector into identities
//! - **Dispatcher**: splits outbound messages into provider-sized chunks and
//!   submits each chunk with isolated failure handling
//! - **Orchestrator**: composes the above into `send_notification`
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//! use pushrelay_delivery::provider::mock::MockProvider;
//! use pushrelay_delivery::{
//!     DeliveryConfig, MemoryRegistry, NotificationRequest, Orchestrator, RegistrationRequest,
//! };
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() {
//! let orchestrator = Orchestrator::new(
//!     Arc::new(MemoryRegistry::new()),
//!     Arc::new(MockProvider::new()),
//!     DeliveryConfig::default(),
//! );
//!
//! orchestrator
//!     .register(RegistrationRequest::new("ExponentPushToken[abc]", "user-1"))
//!     .await
//!     .unwrap();
//!
//! let report = orchestrator
//!     .send_notification(NotificationRequest::new("user-1", "Hi", "Hello"))
//!     .await
//!     .unwrap();
//! assert_eq!(report.tickets.len(), 1);
//! # }
//! ```

mod config;
mod dispatcher;
mod error;
mod identity;
mod message;
mod orchestrator;
pub mod provider;
mod registry;
mod resolver;
mod validator;

pub use config::{DeliveryConfig, DEFAULT_SOUND};
pub use dispatcher::{ChunkDispatcher, ChunkFailure, DispatchReport};
pub use error::{
    DeliveryError, DeliveryResult, IdentityError, NotifyError, NotifyResult, RegistryError,
    RegistryResult,
};
pub use identity::{Identity, Namespace, PushAddress, RecipientSelector, ALL_DIETITIANS};
pub use message::{OutboundMessage, PushTicket};
pub use orchestrator::{
    DeliveryReport, NotificationRequest, Orchestrator, RegistrationRequest, ValidatedNotification,
};
pub use provider::expo::{ExpoClient, ExpoConfig};
pub use provider::{PushProvider, MAX_PUSH_BATCH_SIZE};
pub use registry::{AddressRegistry, MemoryRegistry};
pub use resolver::resolve;
pub use validator::is_valid_address;
