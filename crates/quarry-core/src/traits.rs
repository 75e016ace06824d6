use crate::{
    model::EntityModel,
    row::{Row, RowError},
    types::Id,
    value::Value,
};

// ============================================================================
// FOUNDATIONAL KINDS
// ============================================================================
//
// These traits define *where* something lives in the system,
// not what data it contains.
//

///
/// Path
/// Fully-qualified schema path.
///

pub trait Path {
    const PATH: &'static str;
}

/// Marker for all schema/runtime nodes.
pub trait Kind: Path + 'static {}
impl<T> Kind for T where T: Path + 'static {}

// ============================================================================
// ENTITY IDENTITY & SCHEMA
// ============================================================================
//
// These traits describe *what an entity is*, not which store holds it.
// Store placement is runtime configuration resolved through the metadata
// registry, and is the one lookup that can fail per operation.
//

///
/// EntityIdentity
///
/// Semantic primary-key metadata about an entity.
///

pub trait EntityIdentity: Path {
    const ENTITY_NAME: &'static str;
    const PRIMARY_KEY: &'static str;
}

///
/// EntitySchema
///
/// Declared schema facts for an entity.
///

pub trait EntitySchema: EntityIdentity {
    const MODEL: &'static EntityModel;
    const FIELDS: &'static [&'static str];
}

///
/// EntityKind
///
/// The full compile-time entity contract required by descriptor
/// construction. Anything schema-declared and `'static` qualifies.
///

pub trait EntityKind: EntitySchema + Kind {}
impl<T> EntityKind for T where T: EntitySchema + Kind {}

// ============================================================================
// ENTITY VALUES
// ============================================================================
//
// These traits describe *instances* of entities.
//

///
/// FieldValues
///
/// Read access to an instance's named field values in `Value` form.
///

pub trait FieldValues {
    /// The value of one named field, `None` for unknown fields.
    fn field_value(&self, field: &str) -> Option<Value>;

    /// All declared fields with their current values, in declaration order.
    fn field_values(&self) -> Vec<(&'static str, Value)>;
}

///
/// EntityValue
///
/// A concrete, resolvable entity instance: identifiable within a context
/// and convertible to and from the host's raw row shape.
///

pub trait EntityValue: EntityKind + FieldValues + Clone + Sized {
    /// Typed identity of this instance.
    fn id(&self) -> Id<Self>;

    /// Decode an instance from a raw host row.
    fn from_row(row: &Row) -> Result<Self, RowError>;

    /// Encode this instance as a raw host row.
    fn to_row(&self) -> Row {
        Row::from_fields(self.id().key(), self.field_values())
    }
}
