//! Recipient selector expansion.

use crate::error::RegistryResult;
use crate::identity::{Identity, Namespace, RecipientSelector};
use crate::registry::AddressRegistry;

/// Expands `selector` into the identities it targets.
///
/// A single-identity selector resolves to itself whether or not it is
/// registered; missing addresses are filtered out later. The broadcast
/// selector resolves to every registered dietitian and may be empty.
pub async fn resolve(
    registry: &dyn AddressRegistry,
    selector: &RecipientSelector,
) -> RegistryResult<Vec<Identity>> {
    match selector {
        RecipientSelector::AllDietitians => registry.identities_in(Namespace::Dietitian).await,
        RecipientSelector::Single(identity) => Ok(vec![identity.clone()]),
    }
}
