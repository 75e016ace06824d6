use crate::{
    error::InternalError,
    value::Value,
};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use thiserror::Error as ThisError;
use ulid::Ulid;

///
/// ValueMap
///
/// Deterministically-ordered mapping from field name to value.
/// Projection queries return one of these per result row.
///

#[derive(Clone, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
#[serde(transparent)]
pub struct ValueMap(BTreeMap<String, Value>);

impl ValueMap {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, name: impl Into<String>, value: Value) -> Option<Value> {
        self.0.insert(name.into(), value)
    }

    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.0.get(name)
    }

    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.0.contains_key(name)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &Value)> {
        self.0.iter()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// First entry in canonical (name) order, used by scalar reads.
    #[must_use]
    pub fn first(&self) -> Option<(&String, &Value)> {
        self.0.iter().next()
    }
}

impl FromIterator<(String, Value)> for ValueMap {
    fn from_iter<I: IntoIterator<Item = (String, Value)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl IntoIterator for ValueMap {
    type Item = (String, Value);
    type IntoIter = std::collections::btree_map::IntoIter<String, Value>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

///
/// Row
///
/// Raw record shape exchanged with the host: a key plus named field
/// values. Typed entities decode from rows via `EntityValue::from_row`.
///

#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct Row {
    pub id: Ulid,
    fields: ValueMap,
}

impl Row {
    #[must_use]
    pub fn new(id: Ulid) -> Self {
        Self {
            id,
            fields: ValueMap::new(),
        }
    }

    /// Build a row from an id plus named field values.
    #[must_use]
    pub fn from_fields(id: Ulid, fields: impl IntoIterator<Item = (&'static str, Value)>) -> Self {
        Self {
            id,
            fields: fields
                .into_iter()
                .map(|(name, value)| (name.to_string(), value))
                .collect(),
        }
    }

    #[must_use]
    pub fn with(mut self, name: &'static str, value: impl Into<Value>) -> Self {
        self.fields.insert(name, value.into());
        self
    }

    #[must_use]
    pub fn value(&self, name: &str) -> Option<&Value> {
        self.fields.get(name)
    }

    /// Field lookup that fails with a decode error when the field is gone.
    pub fn require(&self, name: &str) -> Result<&Value, RowError> {
        self.value(name).ok_or(RowError::MissingField {
            field: name.to_string(),
        })
    }

    #[must_use]
    pub const fn fields(&self) -> &ValueMap {
        &self.fields
    }
}

///
/// RowError
///
/// Decode failures between raw rows and typed entities.
///

#[remain::sorted]
#[derive(Debug, ThisError)]
pub enum RowError {
    #[error("row field '{field}' is missing")]
    MissingField { field: String },

    #[error("row field '{field}' holds a {found} where a {expected} was expected")]
    WrongKind {
        field: String,
        expected: &'static str,
        found: &'static str,
    },
}

impl RowError {
    /// Build a kind-mismatch error for a field decode.
    #[must_use]
    pub fn wrong_kind(field: &str, expected: &'static str, found: &Value) -> Self {
        Self::WrongKind {
            field: field.to_string(),
            expected,
            found: found.kind_name(),
        }
    }
}

impl From<RowError> for InternalError {
    fn from(err: RowError) -> Self {
        Self::serialize_internal(err.to_string())
    }
}
