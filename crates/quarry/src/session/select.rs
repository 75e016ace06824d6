use crate::{
    error::Error,
    query::{FetchOptions, FilterExpr, GroupBy, Select, SortExpr},
    session::{FetchSession, shape_mismatch},
};
use quarry_core::{
    context::HostContext,
    request::{FetchOutcome, FetchRequest, ResultShape},
    row::ValueMap,
    traits::EntityKind,
    value::Value,
};
use std::marker::PhantomData;

///
/// SelectQuery
///
/// Session-bound builder for projection and aggregate reads.
///
/// A post-group filter is forwarded only when grouping is present; a
/// `having` without `group_by` is silently dropped, matching the host
/// framework's own conditional.
///

pub struct SelectQuery<'s, 'a, H: HostContext, E: EntityKind> {
    session: &'s FetchSession<'a, H>,
    select: Select,
    filter: Option<FilterExpr>,
    order: Option<SortExpr>,
    group: Option<GroupBy>,
    having: Option<FilterExpr>,
    options: FetchOptions,
    _marker: PhantomData<fn() -> E>,
}

impl<'s, 'a, H: HostContext, E: EntityKind> SelectQuery<'s, 'a, H, E> {
    pub(crate) fn new(session: &'s FetchSession<'a, H>, select: Select) -> Self {
        Self {
            session,
            select,
            filter: None,
            order: None,
            group: None,
            having: None,
            options: FetchOptions::new(),
            _marker: PhantomData,
        }
    }

    // ------------------------------------------------------------------
    // Query refinement
    // ------------------------------------------------------------------

    /// Restrict which records feed the projection.
    #[must_use]
    pub fn filter(mut self, filter: FilterExpr) -> Self {
        self.filter = Some(filter);
        self
    }

    /// Order the output rows.
    #[must_use]
    pub fn order_by(mut self, order: SortExpr) -> Self {
        self.order = Some(order);
        self
    }

    /// Group output rows by the given key fields.
    #[must_use]
    pub fn group_by(mut self, group: GroupBy) -> Self {
        self.group = Some(group);
        self
    }

    /// Filter grouped output rows after aggregation.
    #[must_use]
    pub fn having(mut self, having: FilterExpr) -> Self {
        self.having = Some(having);
        self
    }

    /// Attach caller options, applied to the descriptor immediately
    /// before execution.
    #[must_use]
    pub fn options(mut self, options: FetchOptions) -> Self {
        self.options = options;
        self
    }

    // ------------------------------------------------------------------
    // Execution
    // ------------------------------------------------------------------

    /// Single-field, single-row read: the first selected item's value from
    /// the first output row. NotFound when the host yields no row.
    pub fn scalar(&self) -> Result<Value, Error> {
        let request = self.build(Some(1))?;
        let rows = self.rows_of(&request)?;

        let row = rows
            .into_iter()
            .next()
            .ok_or_else(|| Error::not_found(E::ENTITY_NAME, "query yielded no row"))?;

        let name = self
            .select
            .first_name()
            .ok_or_else(|| Error::not_found(E::ENTITY_NAME, "query yielded no row"))?;

        Ok(row.get(&name).cloned().unwrap_or(Value::Null))
    }

    /// General projection read: one name-to-value mapping per output row.
    pub fn rows(&self) -> Result<Vec<ValueMap>, Error> {
        let request = self.build(None)?;

        self.rows_of(&request)
    }

    // ------------------------------------------------------------------
    // Descriptor construction
    // ------------------------------------------------------------------

    fn rows_of(&self, request: &FetchRequest) -> Result<Vec<ValueMap>, Error> {
        match self.session.run(request)? {
            FetchOutcome::Rows(rows) => Ok(rows),
            _ => Err(shape_mismatch()),
        }
    }

    fn build(&self, limit: Option<u32>) -> Result<FetchRequest, Error> {
        let meta = self.session.metadata_for::<E>()?;
        let mut request = FetchRequest::new(&meta, ResultShape::Rows);

        request.select = self.select.lower();
        request.predicate = self.filter.as_ref().map(FilterExpr::lower);
        if let Some(order) = &self.order {
            request.sort = order.lower();
        }
        if let Some(group) = &self.group {
            request.group_by = group.lower();
            request.having = self.having.as_ref().map(FilterExpr::lower);
        }
        request.limit = limit;

        self.options.apply(&mut request)?;

        Ok(request)
    }
}
