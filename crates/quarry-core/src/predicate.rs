use crate::value::Value;
use serde::{Deserialize, Serialize};

///
/// Predicate
///
/// Native predicate form carried by a fetch descriptor. The facade lowers
/// its friendlier expression surface into this; hosts evaluate it. The
/// facade itself never interprets predicate semantics.
///
/// Comparisons are strict: operands of a different kind than the stored
/// value never match.
///

#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub enum Predicate {
    /// Always true.
    True,
    /// Always false.
    False,

    And(Vec<Self>),
    Or(Vec<Self>),
    Not(Box<Self>),

    Compare(ComparePredicate),

    /// Field is present and explicitly null.
    IsNull { field: String },
}

impl Predicate {
    #[must_use]
    pub const fn and(preds: Vec<Self>) -> Self {
        Self::And(preds)
    }

    #[must_use]
    pub const fn or(preds: Vec<Self>) -> Self {
        Self::Or(preds)
    }

    #[must_use]
    #[allow(clippy::should_implement_trait)]
    pub fn not(pred: Self) -> Self {
        Self::Not(Box::new(pred))
    }

    #[must_use]
    pub fn compare(field: impl Into<String>, op: CompareOp, value: Value) -> Self {
        Self::Compare(ComparePredicate {
            field: field.into(),
            op,
            value,
        })
    }

    /// Collect every field name the predicate references.
    pub fn collect_fields<'a>(&'a self, out: &mut Vec<&'a str>) {
        match self {
            Self::True | Self::False => {}
            Self::And(preds) | Self::Or(preds) => {
                for pred in preds {
                    pred.collect_fields(out);
                }
            }
            Self::Not(pred) => pred.collect_fields(out),
            Self::Compare(cmp) => out.push(&cmp.field),
            Self::IsNull { field } => out.push(field),
        }
    }
}

///
/// ComparePredicate
///

#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct ComparePredicate {
    pub field: String,
    pub op: CompareOp,
    pub value: Value,
}

///
/// CompareOp
///

#[remain::sorted]
#[derive(Clone, Copy, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub enum CompareOp {
    /// Collection or text containment.
    Contains,
    EndsWith,
    Eq,
    Gt,
    Gte,
    /// Membership in a `Value::List` operand.
    In,
    Lt,
    Lte,
    Ne,
    NotIn,
    StartsWith,
}
