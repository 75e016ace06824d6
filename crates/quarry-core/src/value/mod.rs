mod float;

pub use float::Float64;

use serde::{Deserialize, Serialize};
use ulid::Ulid;

///
/// Value
///
/// Scalar transport for predicate operands, sort comparisons, and
/// projection results.
///
/// Null → the field's value is Option::None.
/// Unit → internal placeholder; not a real value.
///
/// The derived `Ord` is the canonical sort order: values group by kind in
/// variant declaration order, then order within the kind. Comparisons in
/// predicates are strict (same kind only); the canonical order exists so
/// sorting and extrema are total and deterministic even over mixed kinds.
///

#[derive(Clone, Debug, Deserialize, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize)]
pub enum Value {
    Blob(Vec<u8>),
    Bool(bool),
    Float64(Float64),
    Int(i64),
    /// Ordered list of values, used for `In`-style operand transport.
    List(Vec<Self>),
    Null,
    Text(String),
    Uint(u64),
    Ulid(Ulid),
    Unit,
}

impl Value {
    /// Build a `Value::List` from a list literal.
    ///
    /// Intended for tests and inline construction.
    pub fn from_slice<T>(items: &[T]) -> Self
    where
        T: Into<Self> + Clone,
    {
        Self::List(items.iter().cloned().map(Into::into).collect())
    }

    /// Kind label used in diagnostics.
    #[must_use]
    pub const fn kind_name(&self) -> &'static str {
        match self {
            Self::Blob(_) => "blob",
            Self::Bool(_) => "bool",
            Self::Float64(_) => "float64",
            Self::Int(_) => "int",
            Self::List(_) => "list",
            Self::Null => "null",
            Self::Text(_) => "text",
            Self::Uint(_) => "uint",
            Self::Ulid(_) => "ulid",
            Self::Unit => "unit",
        }
    }

    /// True when both values share the same scalar kind.
    #[must_use]
    pub const fn same_kind(&self, other: &Self) -> bool {
        matches!(
            (self, other),
            (Self::Blob(_), Self::Blob(_))
                | (Self::Bool(_), Self::Bool(_))
                | (Self::Float64(_), Self::Float64(_))
                | (Self::Int(_), Self::Int(_))
                | (Self::List(_), Self::List(_))
                | (Self::Null, Self::Null)
                | (Self::Text(_), Self::Text(_))
                | (Self::Uint(_), Self::Uint(_))
                | (Self::Ulid(_), Self::Ulid(_))
                | (Self::Unit, Self::Unit)
        )
    }

    ///
    /// ACCESSORS
    ///

    #[must_use]
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(v) => Some(v),
            _ => None,
        }
    }

    #[must_use]
    pub const fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(v) => Some(*v),
            _ => None,
        }
    }

    #[must_use]
    pub const fn as_int(&self) -> Option<i64> {
        match self {
            Self::Int(v) => Some(*v),
            _ => None,
        }
    }

    #[must_use]
    pub const fn as_uint(&self) -> Option<u64> {
        match self {
            Self::Uint(v) => Some(*v),
            _ => None,
        }
    }

    #[must_use]
    pub const fn as_float(&self) -> Option<f64> {
        match self {
            Self::Float64(v) => Some(v.get()),
            _ => None,
        }
    }

    #[must_use]
    pub const fn as_ulid(&self) -> Option<Ulid> {
        match self {
            Self::Ulid(v) => Some(*v),
            _ => None,
        }
    }

    #[must_use]
    pub const fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }
}

///
/// From impls keep builder call sites literal-friendly.
///

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Self::Text(v.to_string())
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Self::Text(v)
    }
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Self::Bool(v)
    }
}

impl From<i32> for Value {
    fn from(v: i32) -> Self {
        Self::Int(i64::from(v))
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Self::Int(v)
    }
}

impl From<u32> for Value {
    fn from(v: u32) -> Self {
        Self::Uint(u64::from(v))
    }
}

impl From<u64> for Value {
    fn from(v: u64) -> Self {
        Self::Uint(v)
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Self::Float64(Float64(v))
    }
}

impl From<Float64> for Value {
    fn from(v: Float64) -> Self {
        Self::Float64(v)
    }
}

impl From<Ulid> for Value {
    fn from(v: Ulid) -> Self {
        Self::Ulid(v)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn canonical_order_groups_by_kind_then_value() {
        let mut values = vec![
            Value::Text("b".into()),
            Value::Int(2),
            Value::Null,
            Value::Int(-1),
            Value::Text("a".into()),
        ];
        values.sort();

        assert_eq!(
            values,
            vec![
                Value::Int(-1),
                Value::Int(2),
                Value::Null,
                Value::Text("a".into()),
                Value::Text("b".into()),
            ]
        );
    }

    #[test]
    fn float_equality_is_bitwise_and_order_is_total() {
        let left = Value::from(f64::NAN);
        let right = Value::from(f64::NAN);

        assert_eq!(left, right);
        assert_ne!(Value::from(1.5), Value::from(2.5));
        assert!(Value::from(1.0) < Value::from(2.0));
    }

    #[test]
    fn strict_kind_check_rejects_mixed_numerics() {
        assert!(!Value::Int(1).same_kind(&Value::Uint(1)));
        assert!(Value::Int(1).same_kind(&Value::Int(2)));
    }
}
