//! Shared fixture entities for contract and facade tests.
//!
//! Trait impls are written by hand; they double as the reference for what
//! a schema derive would emit for a real entity.

use crate::{
    metadata::MetadataRegistry,
    model::{EntityFieldModel, EntityModel, FieldKind},
    row::{Row, RowError},
    traits::{EntityIdentity, EntitySchema, EntityValue, FieldValues, Path},
    types::Id,
    value::Value,
};
use ulid::Ulid;

/// Store names used by fixture registries.
pub const STORE_MAIN: &str = "memory::main";
pub const STORE_AUX: &str = "memory::aux";

/// Build a registry with both fixture stores and entities mapped.
pub fn registry() -> MetadataRegistry {
    let mut registry = MetadataRegistry::new();
    registry.register_store(STORE_MAIN).unwrap();
    registry.register_store(STORE_AUX).unwrap();
    registry.register_entity::<Order>(STORE_MAIN).unwrap();
    registry.register_entity::<Customer>(STORE_AUX).unwrap();

    registry
}

///
/// Order
///

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Order {
    pub id: Ulid,
    pub status: String,
    pub amount: i64,
    pub customer: Ulid,
}

impl Order {
    /// Deterministic fixture constructor.
    #[must_use]
    pub fn new(id: u128, status: &str, amount: i64, customer: u128) -> Self {
        Self {
            id: Ulid(id),
            status: status.to_string(),
            amount,
            customer: Ulid(customer),
        }
    }
}

const ORDER_FIELDS: [EntityFieldModel; 4] = [
    EntityFieldModel::new("id", FieldKind::Ulid),
    EntityFieldModel::new("status", FieldKind::Text),
    EntityFieldModel::new("amount", FieldKind::Int),
    EntityFieldModel::new("customer", FieldKind::Ulid),
];

const ORDER_MODEL: EntityModel = EntityModel {
    path: Order::PATH,
    entity_name: "Order",
    primary_key: "id",
    fields: &ORDER_FIELDS,
};

impl Path for Order {
    const PATH: &'static str = "quarry_core::test_support::fixtures::Order";
}

impl EntityIdentity for Order {
    const ENTITY_NAME: &'static str = "Order";
    const PRIMARY_KEY: &'static str = "id";
}

impl EntitySchema for Order {
    const MODEL: &'static EntityModel = &ORDER_MODEL;
    const FIELDS: &'static [&'static str] = &["id", "status", "amount", "customer"];
}

impl FieldValues for Order {
    fn field_value(&self, field: &str) -> Option<Value> {
        match field {
            "id" => Some(Value::Ulid(self.id)),
            "status" => Some(Value::Text(self.status.clone())),
            "amount" => Some(Value::Int(self.amount)),
            "customer" => Some(Value::Ulid(self.customer)),
            _ => None,
        }
    }

    fn field_values(&self) -> Vec<(&'static str, Value)> {
        vec![
            ("id", Value::Ulid(self.id)),
            ("status", Value::Text(self.status.clone())),
            ("amount", Value::Int(self.amount)),
            ("customer", Value::Ulid(self.customer)),
        ]
    }
}

impl EntityValue for Order {
    fn id(&self) -> Id<Self> {
        Id::new(self.id)
    }

    fn from_row(row: &Row) -> Result<Self, RowError> {
        Ok(Self {
            id: row.id,
            status: decode_text(row, "status")?,
            amount: decode_int(row, "amount")?,
            customer: decode_ulid(row, "customer")?,
        })
    }
}

///
/// Customer
///

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Customer {
    pub id: Ulid,
    pub name: String,
}

impl Customer {
    /// Deterministic fixture constructor.
    #[must_use]
    pub fn new(id: u128, name: &str) -> Self {
        Self {
            id: Ulid(id),
            name: name.to_string(),
        }
    }
}

const CUSTOMER_FIELDS: [EntityFieldModel; 2] = [
    EntityFieldModel::new("id", FieldKind::Ulid),
    EntityFieldModel::new("name", FieldKind::Text),
];

const CUSTOMER_MODEL: EntityModel = EntityModel {
    path: Customer::PATH,
    entity_name: "Customer",
    primary_key: "id",
    fields: &CUSTOMER_FIELDS,
};

impl Path for Customer {
    const PATH: &'static str = "quarry_core::test_support::fixtures::Customer";
}

impl EntityIdentity for Customer {
    const ENTITY_NAME: &'static str = "Customer";
    const PRIMARY_KEY: &'static str = "id";
}

impl EntitySchema for Customer {
    const MODEL: &'static EntityModel = &CUSTOMER_MODEL;
    const FIELDS: &'static [&'static str] = &["id", "name"];
}

impl FieldValues for Customer {
    fn field_value(&self, field: &str) -> Option<Value> {
        match field {
            "id" => Some(Value::Ulid(self.id)),
            "name" => Some(Value::Text(self.name.clone())),
            _ => None,
        }
    }

    fn field_values(&self) -> Vec<(&'static str, Value)> {
        vec![
            ("id", Value::Ulid(self.id)),
            ("name", Value::Text(self.name.clone())),
        ]
    }
}

impl EntityValue for Customer {
    fn id(&self) -> Id<Self> {
        Id::new(self.id)
    }

    fn from_row(row: &Row) -> Result<Self, RowError> {
        Ok(Self {
            id: row.id,
            name: decode_text(row, "name")?,
        })
    }
}

// ---------------------------------------------------------------------
// Decode helpers
// ---------------------------------------------------------------------

fn decode_text(row: &Row, field: &str) -> Result<String, RowError> {
    let value = row.require(field)?;

    value
        .as_text()
        .map(ToString::to_string)
        .ok_or_else(|| RowError::wrong_kind(field, "text", value))
}

fn decode_int(row: &Row, field: &str) -> Result<i64, RowError> {
    let value = row.require(field)?;

    value
        .as_int()
        .ok_or_else(|| RowError::wrong_kind(field, "int", value))
}

fn decode_ulid(row: &Row, field: &str) -> Result<Ulid, RowError> {
    let value = row.require(field)?;

    value
        .as_ulid()
        .ok_or_else(|| RowError::wrong_kind(field, "ulid", value))
}
