//! Identity to push address registry.
//!
//! The registry is shared by every inbound request. Implementations must
//! keep each identity mapped to at most one address and let a newer
//! registration replace the old one.

use crate::error::RegistryResult;
use crate::identity::{Identity, Namespace, PushAddress};
use async_trait::async_trait;
use std::collections::HashMap;
use tokio::sync::RwLock;
use tracing::debug;

/// A keyed store of push addresses.
#[async_trait]
pub trait AddressRegistry: Send + Sync {
    /// Stores `address` for `identity`, replacing any previous address.
    async fn register(&self, identity: Identity, address: PushAddress) -> RegistryResult<()>;

    /// Returns the current address for `identity`.
    async fn lookup(&self, identity: &Identity) -> RegistryResult<Option<PushAddress>>;

    /// Returns every registered identity in `namespace`, in registration
    /// order.
    async fn identities_in(&self, namespace: Namespace) -> RegistryResult<Vec<Identity>>;

    /// Returns the addresses of every registered identity in `namespace`,
    /// in registration order.
    async fn addresses_in(&self, namespace: Namespace) -> RegistryResult<Vec<PushAddress>>;

    /// Number of registered identities.
    async fn count(&self) -> RegistryResult<usize>;
}

#[derive(Debug, Default)]
struct Table {
    slots: Vec<(Identity, PushAddress)>,
    index: HashMap<Identity, usize>,
}

impl Table {
    fn in_namespace(&self, namespace: Namespace) -> impl Iterator<Item = &(Identity, PushAddress)> {
        self.slots
            .iter()
            .filter(move |(identity, _)| identity.namespace() == namespace)
    }
}

/// Process-memory registry.
///
/// Entries vanish when the process exits. An overwritten identity keeps its
/// original position in scans.
#[derive(Debug, Default)]
pub struct MemoryRegistry {
    table: RwLock<Table>,
}

impl MemoryRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl AddressRegistry for MemoryRegistry {
    async fn register(&self, identity: Identity, address: PushAddress) -> RegistryResult<()> {
        let mut table = self.table.write().await;
        match table.index.get(&identity).copied() {
            Some(slot) => {
                debug!("Replacing push address for {}", identity);
                table.slots[slot].1 = address;
            }
            None => {
                let slot = table.slots.len();
                table.index.insert(identity.clone(), slot);
                table.slots.push((identity, address));
            }
        }
        Ok(())
    }

    async fn lookup(&self, identity: &Identity) -> RegistryResult<Option<PushAddress>> {
        let table = self.table.read().await;
        Ok(table
            .index
            .get(identity)
            .map(|&slot| table.slots[slot].1.clone()))
    }

    async fn identities_in(&self, namespace: Namespace) -> RegistryResult<Vec<Identity>> {
        let table = self.table.read().await;
        Ok(table
            .in_namespace(namespace)
            .map(|(identity, _)| identity.clone())
            .collect())
    }

    async fn addresses_in(&self, namespace: Namespace) -> RegistryResult<Vec<PushAddress>> {
        let table = self.table.read().await;
        Ok(table
            .in_namespace(namespace)
            .map(|(_, address)| address.clone())
            .collect())
    }

    async fn count(&self) -> RegistryResult<usize> {
        Ok(self.table.read().await.slots.len())
    }
}
