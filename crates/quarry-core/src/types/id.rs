use crate::{traits::EntityKind, value::Value};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::{
    cmp::Ordering,
    fmt,
    hash::{Hash, Hasher},
    marker::PhantomData,
};
use ulid::Ulid;

///
/// Id
///
/// Typed identity wrapper for entity records.
/// Carries entity context without changing the underlying key type.
/// Serializes identically to the raw ULID.
///

#[repr(transparent)]
pub struct Id<E: EntityKind> {
    key: Ulid,
    _marker: PhantomData<fn() -> E>,
}

impl<E: EntityKind> Id<E> {
    /// Construct a typed identity from the raw key value.
    #[must_use]
    pub const fn new(key: Ulid) -> Self {
        Self {
            key,
            _marker: PhantomData,
        }
    }

    /// Construct a typed identity from a raw `u128`.
    ///
    /// Intended for tests and fixtures where deterministic keys matter.
    #[must_use]
    pub const fn from_u128(key: u128) -> Self {
        Self::new(Ulid(key))
    }

    /// Returns the underlying key.
    #[must_use]
    pub const fn key(&self) -> Ulid {
        self.key
    }

    /// Convert this identity into a semantic `Value`.
    #[must_use]
    pub const fn as_value(&self) -> Value {
        Value::Ulid(self.key)
    }
}

#[allow(clippy::expl_impl_clone_on_copy)]
impl<E: EntityKind> Clone for Id<E> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<E: EntityKind> Copy for Id<E> {}

impl<E: EntityKind> PartialEq for Id<E> {
    fn eq(&self, other: &Self) -> bool {
        self.key == other.key
    }
}

impl<E: EntityKind> Eq for Id<E> {}

impl<E: EntityKind> PartialOrd for Id<E> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl<E: EntityKind> Ord for Id<E> {
    fn cmp(&self, other: &Self) -> Ordering {
        self.key.cmp(&other.key)
    }
}

impl<E: EntityKind> Hash for Id<E> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.key.hash(state);
    }
}

impl<E: EntityKind> fmt::Debug for Id<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Id").field(&self.key).finish()
    }
}

impl<E: EntityKind> fmt::Display for Id<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.key)
    }
}

impl<E: EntityKind> From<Ulid> for Id<E> {
    fn from(key: Ulid) -> Self {
        Self::new(key)
    }
}

impl<E: EntityKind> Serialize for Id<E> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.key.serialize(serializer)
    }
}

impl<'de, E: EntityKind> Deserialize<'de> for Id<E> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Ulid::deserialize(deserializer).map(Self::new)
    }
}
