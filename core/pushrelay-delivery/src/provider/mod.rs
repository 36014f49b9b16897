//! Push provider abstraction.
//!
//! The dispatcher talks to a [`PushProvider`] so the engine can run against
//! the Expo push service or an in-process mock.

pub mod expo;

use crate::error::DeliveryResult;
use crate::message::{OutboundMessage, PushTicket};
use async_trait::async_trait;

/// Largest batch the Expo push service accepts in one request.
pub const MAX_PUSH_BATCH_SIZE: usize = 100;

/// A service that delivers batches of push messages.
#[async_trait]
pub trait PushProvider: Send + Sync {
    /// Human-readable provider name, used in logs.
    fn name(&self) -> &'static str;

    /// Submits one batch. On success returns one ticket per message, in
    /// message order. A failure covers the whole batch.
    async fn send_batch(&self, batch: &[OutboundMessage]) -> DeliveryResult<Vec<PushTicket>>;
}

/// A mock provider for testing.
pub mod mock {
    use super::*;
    use crate::error::DeliveryError;
    use std::collections::HashSet;
    use std::sync::Mutex;

    /// Records every batch and answers with sequential `ok` tickets.
    ///
    /// Batches whose call index (0-based) was passed to
    /// [`MockProvider::failing_batches`] fail with
    /// [`DeliveryError::Unavailable`] instead.
    #[derive(Debug, Default)]
    pub struct MockProvider {
        failing: HashSet<usize>,
        batches: Mutex<Vec<Vec<OutboundMessage>>>,
    }

    impl MockProvider {
        /// Creates a provider that accepts every batch.
        pub fn new() -> Self {
            Self::default()
        }

        /// Creates a provider that fails the given batch calls.
        pub fn failing_batches(indices: impl IntoIterator<Item = usize>) -> Self {
            Self {
                failing: indices.into_iter().collect(),
                batches: Mutex::new(Vec::new()),
            }
        }

        /// Returns every batch received so far, including failed ones.
        pub fn batches(&self) -> Vec<Vec<OutboundMessage>> {
            self.batches.lock().map(|b| b.clone()).unwrap_or_default()
        }

        /// Total number of messages received.
        pub fn message_count(&self) -> usize {
            self.batches().iter().map(Vec::len).sum()
        }
    }

    #[async_trait]
    impl PushProvider for MockProvider {
        fn name(&self) -> &'static str {
            "mock"
        }

        async fn send_batch(&self, batch: &[OutboundMessage]) -> DeliveryResult<Vec<PushTicket>> {
            let (call, offset) = {
                let mut batches = self
                    .batches
                    .lock()
                    .map_err(|_| DeliveryError::Unavailable("mock lock poisoned".into()))?;
                let offset: usize = batches.iter().map(Vec::len).sum();
                batches.push(batch.to_vec());
                (batches.len() - 1, offset)
            };

            if self.failing.contains(&call) {
                return Err(DeliveryError::Unavailable(format!("batch {} refused", call)));
            }

            Ok((0..batch.len())
                .map(|i| PushTicket::Ok {
                    id: format!("ticket-{}", offset + i),
                })
                .collect())
        }
    }
}
