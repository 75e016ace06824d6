use quarry_core::{
    predicate::{CompareOp, Predicate},
    request::{self, SortKey},
    value::Value,
};
use serde::{Deserialize, Serialize};

///
/// FilterExpr
///
/// Serialized, host-agnostic predicate surface.
///
/// This enum is intentionally isomorphic to the subset of the native
/// `Predicate` form that is deterministic and safe across API boundaries.
/// The facade only lowers it; interpretation belongs to the host.
///

#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub enum FilterExpr {
    /// Always true.
    True,
    /// Always false.
    False,

    And(Vec<Self>),
    Or(Vec<Self>),
    Not(Box<Self>),

    // ─────────────────────────────────────────────────────────────
    // Scalar comparisons
    // ─────────────────────────────────────────────────────────────
    Eq {
        field: String,
        value: Value,
    },
    Ne {
        field: String,
        value: Value,
    },
    Lt {
        field: String,
        value: Value,
    },
    Lte {
        field: String,
        value: Value,
    },
    Gt {
        field: String,
        value: Value,
    },
    Gte {
        field: String,
        value: Value,
    },

    In {
        field: String,
        values: Vec<Value>,
    },
    NotIn {
        field: String,
        values: Vec<Value>,
    },

    // ─────────────────────────────────────────────────────────────
    // Collection / text predicates
    // ─────────────────────────────────────────────────────────────
    /// Collection or substring containment.
    Contains {
        field: String,
        value: Value,
    },

    StartsWith {
        field: String,
        value: Value,
    },
    EndsWith {
        field: String,
        value: Value,
    },

    // ─────────────────────────────────────────────────────────────
    // Presence / nullability
    // ─────────────────────────────────────────────────────────────
    /// Field is present and explicitly null.
    IsNull {
        field: String,
    },
}

impl FilterExpr {
    // ─────────────────────────────────────────────────────────────
    // Lowering
    // ─────────────────────────────────────────────────────────────

    #[must_use]
    pub fn lower(&self) -> Predicate {
        match self {
            Self::True => Predicate::True,
            Self::False => Predicate::False,

            Self::And(xs) => Predicate::and(xs.iter().map(Self::lower).collect()),
            Self::Or(xs) => Predicate::or(xs.iter().map(Self::lower).collect()),
            Self::Not(x) => Predicate::not(x.lower()),

            Self::Eq { field, value } => compare(field, CompareOp::Eq, value.clone()),
            Self::Ne { field, value } => compare(field, CompareOp::Ne, value.clone()),
            Self::Lt { field, value } => compare(field, CompareOp::Lt, value.clone()),
            Self::Lte { field, value } => compare(field, CompareOp::Lte, value.clone()),
            Self::Gt { field, value } => compare(field, CompareOp::Gt, value.clone()),
            Self::Gte { field, value } => compare(field, CompareOp::Gte, value.clone()),

            Self::In { field, values } => compare_list(field, CompareOp::In, values),
            Self::NotIn { field, values } => compare_list(field, CompareOp::NotIn, values),

            Self::Contains { field, value } => {
                compare(field, CompareOp::Contains, value.clone())
            }
            Self::StartsWith { field, value } => {
                compare(field, CompareOp::StartsWith, value.clone())
            }
            Self::EndsWith { field, value } => {
                compare(field, CompareOp::EndsWith, value.clone())
            }

            Self::IsNull { field } => Predicate::IsNull {
                field: field.clone(),
            },
        }
    }

    // ─────────────────────────────────────────────────────────────
    // Boolean
    // ─────────────────────────────────────────────────────────────

    #[must_use]
    pub const fn and(exprs: Vec<Self>) -> Self {
        Self::And(exprs)
    }

    #[must_use]
    pub const fn or(exprs: Vec<Self>) -> Self {
        Self::Or(exprs)
    }

    #[must_use]
    #[allow(clippy::should_implement_trait)]
    pub fn not(expr: Self) -> Self {
        Self::Not(Box::new(expr))
    }

    // ─────────────────────────────────────────────────────────────
    // Scalar comparisons
    // ─────────────────────────────────────────────────────────────

    pub fn eq(field: impl Into<String>, value: impl Into<Value>) -> Self {
        Self::Eq {
            field: field.into(),
            value: value.into(),
        }
    }

    pub fn ne(field: impl Into<String>, value: impl Into<Value>) -> Self {
        Self::Ne {
            field: field.into(),
            value: value.into(),
        }
    }

    pub fn lt(field: impl Into<String>, value: impl Into<Value>) -> Self {
        Self::Lt {
            field: field.into(),
            value: value.into(),
        }
    }

    pub fn lte(field: impl Into<String>, value: impl Into<Value>) -> Self {
        Self::Lte {
            field: field.into(),
            value: value.into(),
        }
    }

    pub fn gt(field: impl Into<String>, value: impl Into<Value>) -> Self {
        Self::Gt {
            field: field.into(),
            value: value.into(),
        }
    }

    pub fn gte(field: impl Into<String>, value: impl Into<Value>) -> Self {
        Self::Gte {
            field: field.into(),
            value: value.into(),
        }
    }

    pub fn in_list(
        field: impl Into<String>,
        values: impl IntoIterator<Item = impl Into<Value>>,
    ) -> Self {
        Self::In {
            field: field.into(),
            values: values.into_iter().map(Into::into).collect(),
        }
    }

    pub fn not_in(
        field: impl Into<String>,
        values: impl IntoIterator<Item = impl Into<Value>>,
    ) -> Self {
        Self::NotIn {
            field: field.into(),
            values: values.into_iter().map(Into::into).collect(),
        }
    }

    // ─────────────────────────────────────────────────────────────
    // Collection / text predicates
    // ─────────────────────────────────────────────────────────────

    pub fn contains(field: impl Into<String>, value: impl Into<Value>) -> Self {
        Self::Contains {
            field: field.into(),
            value: value.into(),
        }
    }

    pub fn starts_with(field: impl Into<String>, value: impl Into<Value>) -> Self {
        Self::StartsWith {
            field: field.into(),
            value: value.into(),
        }
    }

    pub fn ends_with(field: impl Into<String>, value: impl Into<Value>) -> Self {
        Self::EndsWith {
            field: field.into(),
            value: value.into(),
        }
    }

    // ─────────────────────────────────────────────────────────────
    // Presence / nullability
    // ─────────────────────────────────────────────────────────────

    pub fn is_null(field: impl Into<String>) -> Self {
        Self::IsNull {
            field: field.into(),
        }
    }
}

// ─────────────────────────────────────────────────────────────
// Internal helpers
// ─────────────────────────────────────────────────────────────

fn compare(field: &str, op: CompareOp, value: Value) -> Predicate {
    Predicate::compare(field, op, value)
}

fn compare_list(field: &str, op: CompareOp, values: &[Value]) -> Predicate {
    Predicate::compare(field, op, Value::List(values.to_vec()))
}

///
/// SortExpr
///

#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct SortExpr {
    pub fields: Vec<(String, OrderDirection)>,
}

impl SortExpr {
    /// Ascending sort on one field.
    pub fn asc(field: impl Into<String>) -> Self {
        Self {
            fields: vec![(field.into(), OrderDirection::Asc)],
        }
    }

    /// Descending sort on one field.
    pub fn desc(field: impl Into<String>) -> Self {
        Self {
            fields: vec![(field.into(), OrderDirection::Desc)],
        }
    }

    /// Append a secondary ascending key.
    #[must_use]
    pub fn then_asc(mut self, field: impl Into<String>) -> Self {
        self.fields.push((field.into(), OrderDirection::Asc));
        self
    }

    /// Append a secondary descending key.
    #[must_use]
    pub fn then_desc(mut self, field: impl Into<String>) -> Self {
        self.fields.push((field.into(), OrderDirection::Desc));
        self
    }

    #[must_use]
    pub fn lower(&self) -> Vec<SortKey> {
        self.fields
            .iter()
            .map(|(field, dir)| {
                let direction = match dir {
                    OrderDirection::Asc => request::OrderDirection::Asc,
                    OrderDirection::Desc => request::OrderDirection::Desc,
                };

                SortKey {
                    field: field.clone(),
                    direction,
                }
            })
            .collect()
    }
}

///
/// OrderDirection
///

#[derive(Clone, Copy, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub enum OrderDirection {
    Asc,
    Desc,
}

#[cfg(test)]
mod tests {
    use super::*;
    use quarry_core::predicate::ComparePredicate;

    #[test]
    fn comparison_lowers_to_native_predicate() {
        let lowered = FilterExpr::eq("status", "PAID").lower();

        assert_eq!(
            lowered,
            Predicate::Compare(ComparePredicate {
                field: "status".to_string(),
                op: CompareOp::Eq,
                value: Value::from("PAID"),
            })
        );
    }

    #[test]
    fn in_list_lowers_to_list_operand() {
        let lowered = FilterExpr::in_list("amount", [1_i64, 2, 3]).lower();

        assert_eq!(
            lowered,
            Predicate::Compare(ComparePredicate {
                field: "amount".to_string(),
                op: CompareOp::In,
                value: Value::from_slice(&[1_i64, 2, 3]),
            })
        );
    }

    #[test]
    fn boolean_structure_is_preserved() {
        let lowered = FilterExpr::and(vec![
            FilterExpr::eq("status", "PAID"),
            FilterExpr::not(FilterExpr::is_null("customer")),
        ])
        .lower();

        let Predicate::And(parts) = lowered else {
            panic!("expected an And predicate");
        };
        assert_eq!(parts.len(), 2);
        assert_eq!(
            parts[1],
            Predicate::not(Predicate::IsNull {
                field: "customer".to_string()
            })
        );
    }

    #[test]
    fn sort_keys_lower_in_declaration_order() {
        let lowered = SortExpr::desc("amount").then_asc("status").lower();

        assert_eq!(lowered.len(), 2);
        assert_eq!(lowered[0].field, "amount");
        assert_eq!(lowered[0].direction, request::OrderDirection::Desc);
        assert_eq!(lowered[1].field, "status");
        assert_eq!(lowered[1].direction, request::OrderDirection::Asc);
    }
}
