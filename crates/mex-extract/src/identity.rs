//! # Identity Assignment
//!
//! Every extracted item is identified by the pair (primary source,
//! identifier in primary source). An [`IdentityStore`] maps that pair to
//! the item's own `identifier` and to the `stableTargetId` of the merged
//! item it contributes to. Asking twice for the same pair returns the same
//! identity.

use std::collections::HashMap;

use mex_core::{canonical_json, Identifier, IdentityProvider, MergedPrimarySourceIdentifier, TypedIdentifier};
use serde_json::json;
use sha2::{Digest, Sha256};

/// Identifiers assigned to one extracted item.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity {
    pub identifier: Identifier,
    pub stable_target_id: Identifier,
}

impl Identity {
    /// The item identifier as a typed identifier.
    pub fn identifier_as<I: TypedIdentifier>(&self) -> I {
        I::from_identifier(self.identifier.clone())
    }

    /// The stable target identifier as a typed identifier.
    pub fn stable_target_id_as<M: TypedIdentifier>(&self) -> M {
        M::from_identifier(self.stable_target_id.clone())
    }
}

/// Assigns identities to extracted items.
pub trait IdentityStore {
    /// Identity of the item `identifier_in_primary_source` of
    /// `had_primary_source`, assigning one if needed.
    fn assign(
        &mut self,
        had_primary_source: &MergedPrimarySourceIdentifier,
        identifier_in_primary_source: &str,
    ) -> Identity;
}

/// Derives identities from a SHA-256 digest of the canonical pair.
///
/// Stateless and reproducible across runs, for tests and local dumps.
#[derive(Debug, Clone, Copy, Default)]
pub struct DummyIdentityStore;

impl IdentityStore for DummyIdentityStore {
    fn assign(
        &mut self,
        had_primary_source: &MergedPrimarySourceIdentifier,
        identifier_in_primary_source: &str,
    ) -> Identity {
        let canonical = canonical_json(&json!([
            had_primary_source.as_str(),
            identifier_in_primary_source,
        ]));
        let hash = Sha256::digest(canonical.as_bytes());
        let mut identifier_seed = [0u8; 16];
        let mut stable_seed = [0u8; 16];
        identifier_seed.copy_from_slice(&hash[..16]);
        stable_seed.copy_from_slice(&hash[16..]);
        Identity {
            identifier: Identifier::from_seed(u128::from_be_bytes(identifier_seed)),
            stable_target_id: Identifier::from_seed(u128::from_be_bytes(stable_seed)),
        }
    }
}

/// Generates random identities and remembers them for the process lifetime.
#[derive(Debug, Clone, Default)]
pub struct MemoryIdentityStore {
    assigned: HashMap<(String, String), Identity>,
}

impl MemoryIdentityStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of identities assigned so far.
    pub fn len(&self) -> usize {
        self.assigned.len()
    }

    pub fn is_empty(&self) -> bool {
        self.assigned.is_empty()
    }
}

impl IdentityStore for MemoryIdentityStore {
    fn assign(
        &mut self,
        had_primary_source: &MergedPrimarySourceIdentifier,
        identifier_in_primary_source: &str,
    ) -> Identity {
        let key = (
            had_primary_source.as_str().to_string(),
            identifier_in_primary_source.to_string(),
        );
        self.assigned
            .entry(key)
            .or_insert_with(|| {
                tracing::debug!(
                    had_primary_source = %had_primary_source,
                    identifier_in_primary_source,
                    "assigning new identity"
                );
                Identity {
                    identifier: Identifier::generate(),
                    stable_target_id: Identifier::generate(),
                }
            })
            .clone()
    }
}

/// The store configured by `provider`.
pub fn identity_store(provider: IdentityProvider) -> Box<dyn IdentityStore> {
    match provider {
        IdentityProvider::Dummy => Box::new(DummyIdentityStore),
        IdentityProvider::Memory => Box::new(MemoryIdentityStore::new()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mex_core::{ExtractedResourceIdentifier, MergedResourceIdentifier};

    #[test]
    fn test_dummy_is_deterministic() {
        let source = MergedPrimarySourceIdentifier::from_seed(7);
        let a = DummyIdentityStore.assign(&source, "item-1");
        let b = DummyIdentityStore.assign(&source, "item-1");
        let c = DummyIdentityStore.assign(&source, "item-2");
        assert_eq!(a, b);
        assert_ne!(a, c);
        assert_ne!(a.identifier, a.stable_target_id);
        assert!(Identifier::is_valid(a.identifier.as_str()));
    }

    #[test]
    fn test_dummy_separates_primary_sources() {
        let a = DummyIdentityStore.assign(&MergedPrimarySourceIdentifier::from_seed(1), "x");
        let b = DummyIdentityStore.assign(&MergedPrimarySourceIdentifier::from_seed(2), "x");
        assert_ne!(a, b);
    }

    #[test]
    fn test_memory_remembers_assignments() {
        let source = MergedPrimarySourceIdentifier::from_seed(7);
        let mut store = MemoryIdentityStore::new();
        let first = store.assign(&source, "item-1");
        let again = store.assign(&source, "item-1");
        store.assign(&source, "item-2");
        assert_eq!(first, again);
        assert_eq!(store.len(), 2);
    }

    #[test]
    fn test_typed_views() {
        let identity = DummyIdentityStore.assign(&MergedPrimarySourceIdentifier::from_seed(3), "r");
        let identifier: ExtractedResourceIdentifier = identity.identifier_as();
        let stable: MergedResourceIdentifier = identity.stable_target_id_as();
        assert_eq!(identifier.as_str(), identity.identifier.as_str());
        assert_eq!(stable.as_str(), identity.stable_target_id.as_str());
    }

    #[test]
    fn test_identity_store_for_provider() {
        let source = MergedPrimarySourceIdentifier::from_seed(9);
        let mut store = identity_store(IdentityProvider::Dummy);
        assert_eq!(store.assign(&source, "a"), DummyIdentityStore.assign(&source, "a"));
    }
}
