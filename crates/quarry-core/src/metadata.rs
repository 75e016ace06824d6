use crate::{
    error::{ErrorClass, ErrorOrigin, InternalError},
    model::EntityModel,
    traits::EntityKind,
};
use std::collections::{BTreeSet, HashMap};
use thiserror::Error as ThisError;

///
/// EntityMetadata
///
/// Resolved schema description plus the single physical store an entity's
/// records live in. Every fetch descriptor is scoped to exactly this store;
/// results are never merged across stores.
///

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct EntityMetadata {
    pub model: &'static EntityModel,
    pub store: &'static str,
}

///
/// MetadataRegistry
///
/// Configuration component mapping entity types to their schema model and
/// assigned store. Resolution failure is the only validation performed
/// before a descriptor is built; on failure no request is issued.
///

#[derive(Debug, Default)]
pub struct MetadataRegistry {
    stores: BTreeSet<&'static str>,
    entities: HashMap<&'static str, EntityMetadata>,
}

impl MetadataRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a physical store name.
    pub fn register_store(&mut self, name: &'static str) -> Result<(), MetadataError> {
        if !self.stores.insert(name) {
            return Err(MetadataError::StoreAlreadyRegistered { name });
        }

        Ok(())
    }

    /// Assign an entity type to a registered store.
    pub fn register_entity<E: EntityKind>(
        &mut self,
        store: &'static str,
    ) -> Result<(), MetadataError> {
        if !self.stores.contains(store) {
            return Err(MetadataError::StoreUnknown { name: store });
        }
        if self.entities.contains_key(E::PATH) {
            return Err(MetadataError::EntityAlreadyMapped { path: E::PATH });
        }

        self.entities.insert(
            E::PATH,
            EntityMetadata {
                model: E::MODEL,
                store,
            },
        );

        Ok(())
    }

    /// Resolve the metadata for an entity type.
    pub fn resolve<E: EntityKind>(&self) -> Result<EntityMetadata, MetadataError> {
        self.entities
            .get(E::PATH)
            .copied()
            .ok_or(MetadataError::EntityUnmapped { path: E::PATH })
    }

    /// Iterate registered store names in canonical order.
    pub fn stores(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.stores.iter().copied()
    }
}

///
/// MetadataError
///

#[remain::sorted]
#[derive(Clone, Copy, Debug, Eq, PartialEq, ThisError)]
pub enum MetadataError {
    #[error("entity '{path}' is already mapped to a store")]
    EntityAlreadyMapped { path: &'static str },

    #[error("entity '{path}' is not mapped to any store")]
    EntityUnmapped { path: &'static str },

    #[error("store '{name}' is already registered")]
    StoreAlreadyRegistered { name: &'static str },

    #[error("store '{name}' is not registered")]
    StoreUnknown { name: &'static str },
}

impl MetadataError {
    pub(crate) const fn class(&self) -> ErrorClass {
        match self {
            Self::EntityUnmapped { .. } | Self::StoreUnknown { .. } => ErrorClass::Internal,
            Self::EntityAlreadyMapped { .. } | Self::StoreAlreadyRegistered { .. } => {
                ErrorClass::InvariantViolation
            }
        }
    }
}

impl From<MetadataError> for InternalError {
    fn from(err: MetadataError) -> Self {
        Self::new(err.class(), ErrorOrigin::Metadata, err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{test_support::fixtures::Order, traits::Path};

    #[test]
    fn resolve_fails_for_unmapped_entity() {
        let registry = MetadataRegistry::new();

        assert_eq!(
            registry.resolve::<Order>(),
            Err(MetadataError::EntityUnmapped { path: Order::PATH })
        );
    }

    #[test]
    fn entity_cannot_map_to_unknown_store() {
        let mut registry = MetadataRegistry::new();

        assert_eq!(
            registry.register_entity::<Order>("nowhere"),
            Err(MetadataError::StoreUnknown { name: "nowhere" })
        );
    }

    #[test]
    fn duplicate_registrations_are_rejected() {
        let mut registry = MetadataRegistry::new();
        registry.register_store("main").unwrap();
        registry.register_entity::<Order>("main").unwrap();

        assert_eq!(
            registry.register_store("main"),
            Err(MetadataError::StoreAlreadyRegistered { name: "main" })
        );
        assert_eq!(
            registry.register_entity::<Order>("main"),
            Err(MetadataError::EntityAlreadyMapped { path: Order::PATH })
        );
    }
}
