use crate::{
    error::InternalError,
    metadata::EntityMetadata,
    model::EntityModel,
    predicate::Predicate,
    row::{Row, ValueMap},
};
use serde::{Deserialize, Serialize};
use thiserror::Error as ThisError;
use ulid::Ulid;

///
/// FetchRequest
///
/// The host framework's native fetch descriptor. The facade builds one per
/// operation — metadata first, then predicate/sort/projection, then the
/// caller's options — and hands it to `HostContext::execute` unchanged.
///
/// A descriptor is always scoped to a single physical store.
///

#[derive(Clone, Debug)]
pub struct FetchRequest {
    pub entity: &'static EntityModel,
    pub store: &'static str,
    pub shape: ResultShape,
    pub predicate: Option<Predicate>,
    pub sort: Vec<SortKey>,
    pub select: Vec<SelectSpec>,
    pub group_by: Vec<String>,
    pub having: Option<Predicate>,
    /// Maximum result window size; `None` is unlimited.
    pub limit: Option<u32>,
    pub offset: u32,
    /// Materialization batch hint; hosts may ignore it.
    pub batch_size: Option<u32>,
    pub staleness: Staleness,
    /// Relationship key paths to prefetch; hosts may ignore them.
    pub prefetch: Vec<String>,
}

impl FetchRequest {
    #[must_use]
    pub fn new(meta: &EntityMetadata, shape: ResultShape) -> Self {
        Self {
            entity: meta.model,
            store: meta.store,
            shape,
            predicate: None,
            sort: Vec::new(),
            select: Vec::new(),
            group_by: Vec::new(),
            having: None,
            limit: None,
            offset: 0,
            batch_size: None,
            staleness: Staleness::AllowCached,
            prefetch: Vec::new(),
        }
    }

    /// Output names produced by the projection, in declaration order.
    pub fn output_names(&self) -> impl Iterator<Item = &str> {
        self.select.iter().map(|spec| spec.name.as_str())
    }

    /// Host-side shape validation.
    ///
    /// The facade performs no validation beyond metadata resolution; a host
    /// is expected to reject malformed descriptors before touching its
    /// store.
    pub fn validate(&self) -> Result<(), RequestError> {
        self.validate_fields()?;
        self.validate_window()?;
        self.validate_projection()?;

        Ok(())
    }

    fn validate_fields(&self) -> Result<(), RequestError> {
        let mut referenced = Vec::new();

        if let Some(pred) = &self.predicate {
            pred.collect_fields(&mut referenced);
        }
        if let Some(having) = &self.having {
            // Having filters output rows; its fields resolve against the
            // projection, not the entity schema.
            let outputs: Vec<&str> = self.output_names().collect();
            let mut having_fields = Vec::new();
            having.collect_fields(&mut having_fields);

            for field in having_fields {
                if !outputs.contains(&field) {
                    return Err(RequestError::UnknownOutput {
                        field: field.to_string(),
                    });
                }
            }
        }
        for key in &self.group_by {
            referenced.push(key);
        }
        for spec in &self.select {
            match &spec.field {
                SelectField::Field(name) => referenced.push(name),
                SelectField::Aggregate { field, .. } => {
                    if let Some(name) = field {
                        referenced.push(name);
                    }
                }
            }
        }
        if self.group_by.is_empty() {
            for key in &self.sort {
                referenced.push(&key.field);
            }
        } else {
            // Grouped output rows are sorted by output name.
            let outputs: Vec<&str> = self.output_names().collect();
            for key in &self.sort {
                if !outputs.contains(&key.field.as_str()) {
                    return Err(RequestError::UnknownOutput {
                        field: key.field.clone(),
                    });
                }
            }
        }

        for field in referenced {
            if !self.entity.has_field(field) {
                return Err(RequestError::UnknownField {
                    entity: self.entity.entity_name,
                    field: field.to_string(),
                });
            }
        }

        Ok(())
    }

    fn validate_window(&self) -> Result<(), RequestError> {
        if self.offset > 0 && self.sort.is_empty() {
            return Err(RequestError::OffsetWithoutOrder);
        }

        Ok(())
    }

    fn validate_projection(&self) -> Result<(), RequestError> {
        match self.shape {
            ResultShape::Rows => {
                if self.select.is_empty() {
                    return Err(RequestError::SelectRequired);
                }
            }
            ResultShape::Count | ResultShape::Ids | ResultShape::Records => {
                if !self.select.is_empty() {
                    return Err(RequestError::SelectForbidden { shape: self.shape });
                }
                if !self.group_by.is_empty() {
                    return Err(RequestError::GroupForbidden { shape: self.shape });
                }
            }
        }

        if self.having.is_some() && self.group_by.is_empty() {
            return Err(RequestError::HavingWithoutGroupBy);
        }

        for spec in &self.select {
            if let SelectField::Aggregate { op, field: None } = &spec.field
                && *op != AggregateOp::Count
            {
                return Err(RequestError::AggregateFieldRequired { op: *op });
            }
        }

        let has_aggregate = self
            .select
            .iter()
            .any(|spec| matches!(spec.field, SelectField::Aggregate { .. }));

        if self.group_by.is_empty() {
            if has_aggregate
                && self
                    .select
                    .iter()
                    .any(|spec| matches!(spec.field, SelectField::Field(_)))
            {
                return Err(RequestError::MixedUngroupedProjection);
            }
        } else {
            for key in &self.group_by {
                let selected = self.select.iter().any(
                    |spec| matches!(&spec.field, SelectField::Field(name) if name == key),
                );
                if !selected {
                    return Err(RequestError::GroupFieldNotSelected { field: key.clone() });
                }
            }
            for spec in &self.select {
                if let SelectField::Field(name) = &spec.field
                    && !self.group_by.contains(name)
                {
                    return Err(RequestError::UngroupedPlainField {
                        field: name.clone(),
                    });
                }
            }
        }

        Ok(())
    }
}

///
/// ResultShape
///

#[remain::sorted]
#[derive(Clone, Copy, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub enum ResultShape {
    /// Match count only; no materialization.
    Count,
    /// Identifiers only; no record materialization.
    Ids,
    /// Full records.
    Records,
    /// Projected field/aggregate mappings.
    Rows,
}

///
/// SortKey
///

#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct SortKey {
    pub field: String,
    pub direction: OrderDirection,
}

///
/// OrderDirection
///

#[remain::sorted]
#[derive(Clone, Copy, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
pub enum OrderDirection {
    #[default]
    Asc,
    Desc,
}

///
/// SelectSpec
///
/// One resolved projection item: an output name plus the field or
/// aggregate that produces it.
///

#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct SelectSpec {
    pub name: String,
    pub field: SelectField,
}

///
/// SelectField
///

#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub enum SelectField {
    /// A stored field, passed through per row (or per group key).
    Field(String),
    /// An aggregate over the matched set or group. `field` is `None` only
    /// for a bare row count.
    Aggregate {
        op: AggregateOp,
        field: Option<String>,
    },
}

///
/// AggregateOp
///

#[remain::sorted]
#[derive(Clone, Copy, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub enum AggregateOp {
    Avg,
    Count,
    Max,
    Min,
    Sum,
}

///
/// Staleness
///
/// Read policy toward context-cached record state.
///

#[remain::sorted]
#[derive(Clone, Copy, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
pub enum Staleness {
    /// Cached record state may satisfy materialization.
    #[default]
    AllowCached,
    /// Bypass cached state and reload from the store.
    RequireFresh,
}

///
/// FetchOutcome
///
/// Raw host result, shaped per the descriptor's `ResultShape`.
///

#[derive(Clone, Debug)]
pub enum FetchOutcome {
    Count(u64),
    Ids(Vec<Ulid>),
    Records(Vec<Row>),
    Rows(Vec<ValueMap>),
}

impl FetchOutcome {
    #[must_use]
    pub const fn shape(&self) -> ResultShape {
        match self {
            Self::Count(_) => ResultShape::Count,
            Self::Ids(_) => ResultShape::Ids,
            Self::Records(_) => ResultShape::Records,
            Self::Rows(_) => ResultShape::Rows,
        }
    }
}

///
/// RequestError
///
/// Malformed descriptor shapes a host rejects before execution.
///

#[remain::sorted]
#[derive(Clone, Debug, Eq, PartialEq, ThisError)]
pub enum RequestError {
    #[error("aggregate '{op:?}' requires a field")]
    AggregateFieldRequired { op: AggregateOp },

    #[error("group key '{field}' must also be selected")]
    GroupFieldNotSelected { field: String },

    #[error("grouping is not valid for {shape:?} results")]
    GroupForbidden { shape: ResultShape },

    #[error("a post-group filter requires grouping")]
    HavingWithoutGroupBy,

    #[error("ungrouped projections cannot mix plain fields with aggregates")]
    MixedUngroupedProjection,

    #[error("an offset requires explicit ordering")]
    OffsetWithoutOrder,

    #[error("a projection is not valid for {shape:?} results")]
    SelectForbidden { shape: ResultShape },

    #[error("row projections require at least one selected item")]
    SelectRequired,

    #[error("plain field '{field}' is not part of the group key")]
    UngroupedPlainField { field: String },

    #[error("entity '{entity}' has no field '{field}'")]
    UnknownField {
        entity: &'static str,
        field: String,
    },

    #[error("'{field}' is not a selected output")]
    UnknownOutput { field: String },
}

impl From<RequestError> for InternalError {
    fn from(err: RequestError) -> Self {
        Self::query_invariant(err.to_string())
    }
}
