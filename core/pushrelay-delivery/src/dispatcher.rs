//! Chunked submission of outbound messages.
//!
//! Messages are split into consecutive chunks of at most `max_batch_size`
//! and submitted one after another. A failing chunk is logged and skipped;
//! it never stops the remaining chunks.

use crate::message::{OutboundMessage, PushTicket};
use crate::provider::PushProvider;
use std::sync::Arc;
use tracing::{error, info};

/// A chunk that the provider refused.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChunkFailure {
    /// Position of the chunk in submission order.
    pub index: usize,
    /// Number of messages in the chunk.
    pub size: usize,
    /// Provider error, rendered for logs.
    pub error: String,
}

/// Outcome of dispatching one request's messages.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DispatchReport {
    /// Tickets of every successful chunk, in submission order.
    pub tickets: Vec<PushTicket>,
    /// Chunks that failed as a whole.
    pub failed_chunks: Vec<ChunkFailure>,
    /// Number of chunks submitted.
    pub chunk_count: usize,
}

/// Submits messages to a provider in bounded chunks.
pub struct ChunkDispatcher {
    provider: Arc<dyn PushProvider>,
    max_batch_size: usize,
}

impl ChunkDispatcher {
    /// Creates a dispatcher. A batch size of 0 is treated as 1.
    pub fn new(provider: Arc<dyn PushProvider>, max_batch_size: usize) -> Self {
        Self {
            provider,
            max_batch_size: max_batch_size.max(1),
        }
    }

    /// Returns the effective chunk size.
    pub fn max_batch_size(&self) -> usize {
        self.max_batch_size
    }

    /// Submits `messages` chunk by chunk and concatenates the tickets.
    pub async fn dispatch(&self, messages: &[OutboundMessage]) -> DispatchReport {
        let mut report = DispatchReport::default();

        for (index, chunk) in messages.chunks(self.max_batch_size).enumerate() {
            report.chunk_count += 1;
            match self.provider.send_batch(chunk).await {
                Ok(tickets) => {
                    info!(
                        "Sent chunk {} ({} messages) via {}",
                        index,
                        chunk.len(),
                        self.provider.name()
                    );
                    report.tickets.extend(tickets);
                }
                Err(e) => {
                    error!("Error sending chunk {} ({} messages): {}", index, chunk.len(), e);
                    report.failed_chunks.push(ChunkFailure {
                        index,
                        size: chunk.len(),
                        error: e.to_string(),
                    });
                }
            }
        }

        report
    }
}
