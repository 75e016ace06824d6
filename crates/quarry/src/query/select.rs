use quarry_core::request::{AggregateOp, SelectField, SelectSpec};
use serde::{Deserialize, Serialize};

///
/// Select
///
/// Projection surface: plain fields plus aggregate items, lowered into the
/// descriptor's resolved form. Output names are deterministic — plain
/// fields keep their name, aggregates use `<op>_<field>`, a bare row count
/// is `count`.
///

#[derive(Clone, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
pub struct Select {
    items: Vec<SelectItem>,
}

impl Select {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a projection from one plain field.
    pub fn field(field: impl Into<String>) -> Self {
        Self::new().then_field(field)
    }

    /// Start a projection from several plain fields.
    pub fn fields(fields: impl IntoIterator<Item = impl Into<String>>) -> Self {
        let mut select = Self::new();
        for field in fields {
            select = select.then_field(field);
        }

        select
    }

    /// Start a projection from a bare row count.
    #[must_use]
    pub fn count() -> Self {
        Self::new().then_count()
    }

    /// Start a projection from a sum aggregate.
    pub fn sum(field: impl Into<String>) -> Self {
        Self::new().then_sum(field)
    }

    /// Start a projection from an average aggregate.
    pub fn avg(field: impl Into<String>) -> Self {
        Self::new().then_avg(field)
    }

    /// Start a projection from a minimum aggregate.
    pub fn min(field: impl Into<String>) -> Self {
        Self::new().then_min(field)
    }

    /// Start a projection from a maximum aggregate.
    pub fn max(field: impl Into<String>) -> Self {
        Self::new().then_max(field)
    }

    // ─────────────────────────────────────────────────────────────
    // Chaining
    // ─────────────────────────────────────────────────────────────

    #[must_use]
    pub fn then_field(mut self, field: impl Into<String>) -> Self {
        self.items.push(SelectItem::Field(field.into()));
        self
    }

    #[must_use]
    pub fn then_count(mut self) -> Self {
        self.items.push(SelectItem::Count);
        self
    }

    #[must_use]
    pub fn then_count_of(mut self, field: impl Into<String>) -> Self {
        self.items.push(SelectItem::CountOf(field.into()));
        self
    }

    #[must_use]
    pub fn then_sum(mut self, field: impl Into<String>) -> Self {
        self.items.push(SelectItem::Sum(field.into()));
        self
    }

    #[must_use]
    pub fn then_avg(mut self, field: impl Into<String>) -> Self {
        self.items.push(SelectItem::Avg(field.into()));
        self
    }

    #[must_use]
    pub fn then_min(mut self, field: impl Into<String>) -> Self {
        self.items.push(SelectItem::Min(field.into()));
        self
    }

    #[must_use]
    pub fn then_max(mut self, field: impl Into<String>) -> Self {
        self.items.push(SelectItem::Max(field.into()));
        self
    }

    // ─────────────────────────────────────────────────────────────
    // Lowering
    // ─────────────────────────────────────────────────────────────

    /// Output name of the first selected item; scalar reads return it.
    #[must_use]
    pub fn first_name(&self) -> Option<String> {
        self.items.first().map(SelectItem::output_name)
    }

    #[must_use]
    pub fn lower(&self) -> Vec<SelectSpec> {
        self.items.iter().map(SelectItem::lower).collect()
    }
}

///
/// SelectItem
///

#[remain::sorted]
#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
enum SelectItem {
    Avg(String),
    Count,
    CountOf(String),
    Field(String),
    Max(String),
    Min(String),
    Sum(String),
}

impl SelectItem {
    fn output_name(&self) -> String {
        match self {
            Self::Avg(field) => format!("avg_{field}"),
            Self::Count => "count".to_string(),
            Self::CountOf(field) => format!("count_{field}"),
            Self::Field(field) => field.clone(),
            Self::Max(field) => format!("max_{field}"),
            Self::Min(field) => format!("min_{field}"),
            Self::Sum(field) => format!("sum_{field}"),
        }
    }

    fn lower(&self) -> SelectSpec {
        let field = match self {
            Self::Field(field) => SelectField::Field(field.clone()),
            Self::Count => SelectField::Aggregate {
                op: AggregateOp::Count,
                field: None,
            },
            Self::CountOf(field) => SelectField::Aggregate {
                op: AggregateOp::Count,
                field: Some(field.clone()),
            },
            Self::Sum(field) => SelectField::Aggregate {
                op: AggregateOp::Sum,
                field: Some(field.clone()),
            },
            Self::Avg(field) => SelectField::Aggregate {
                op: AggregateOp::Avg,
                field: Some(field.clone()),
            },
            Self::Min(field) => SelectField::Aggregate {
                op: AggregateOp::Min,
                field: Some(field.clone()),
            },
            Self::Max(field) => SelectField::Aggregate {
                op: AggregateOp::Max,
                field: Some(field.clone()),
            },
        };

        SelectSpec {
            name: self.output_name(),
            field,
        }
    }
}

///
/// GroupBy
///

#[derive(Clone, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
pub struct GroupBy {
    fields: Vec<String>,
}

impl GroupBy {
    /// Group by one field.
    pub fn field(field: impl Into<String>) -> Self {
        Self {
            fields: vec![field.into()],
        }
    }

    /// Group by several fields.
    pub fn fields(fields: impl IntoIterator<Item = impl Into<String>>) -> Self {
        Self {
            fields: fields.into_iter().map(Into::into).collect(),
        }
    }

    #[must_use]
    pub fn lower(&self) -> Vec<String> {
        self.fields.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn aggregate_output_names_are_deterministic() {
        let select = Select::field("status").then_sum("amount").then_count();
        let specs = select.lower();

        assert_eq!(specs[0].name, "status");
        assert_eq!(specs[1].name, "sum_amount");
        assert_eq!(specs[2].name, "count");
        assert_eq!(select.first_name().as_deref(), Some("status"));
    }

    #[test]
    fn count_of_counts_a_field() {
        let specs = Select::new().then_count_of("customer").lower();

        assert_eq!(specs[0].name, "count_customer");
        assert_eq!(
            specs[0].field,
            SelectField::Aggregate {
                op: AggregateOp::Count,
                field: Some("customer".to_string()),
            }
        );
    }
}
