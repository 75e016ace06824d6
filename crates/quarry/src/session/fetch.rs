use crate::{
    error::Error,
    query::{FetchOptions, FilterExpr, SortExpr},
    record::Record,
    session::{FetchSession, shape_mismatch},
};
use quarry_core::{
    context::HostContext,
    request::{FetchOutcome, FetchRequest, ResultShape},
    traits::{EntityKind, EntityValue},
    types::Id,
};
use std::marker::PhantomData;

///
/// FetchQuery
///
/// Session-bound builder for record, identifier, and count reads.
///
/// A limit-1 read takes the first match; without `order_by` the tie-break
/// between multiple matches is deliberately unspecified.
///

pub struct FetchQuery<'s, 'a, H: HostContext, E: EntityKind> {
    session: &'s FetchSession<'a, H>,
    filter: Option<FilterExpr>,
    order: Option<SortExpr>,
    options: FetchOptions,
    _marker: PhantomData<fn() -> E>,
}

impl<'s, 'a, H: HostContext, E: EntityKind> FetchQuery<'s, 'a, H, E> {
    pub(crate) fn new(session: &'s FetchSession<'a, H>) -> Self {
        Self {
            session,
            filter: None,
            order: None,
            options: FetchOptions::new(),
            _marker: PhantomData,
        }
    }

    // ------------------------------------------------------------------
    // Query refinement
    // ------------------------------------------------------------------

    /// Restrict which records qualify.
    #[must_use]
    pub fn filter(mut self, filter: FilterExpr) -> Self {
        self.filter = Some(filter);
        self
    }

    /// Order the result stream.
    #[must_use]
    pub fn order_by(mut self, order: SortExpr) -> Self {
        self.order = Some(order);
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
    // Execution — records
    // ------------------------------------------------------------------

    /// Fetch the single match. NotFound on zero matches.
    pub fn one(&self) -> Result<Record<E>, Error>
    where
        E: EntityValue,
    {
        self.one_opt()?
            .ok_or_else(|| Error::not_found(E::ENTITY_NAME, "no record matched"))
    }

    /// Fetch the single match, `None` on zero matches.
    pub fn one_opt(&self) -> Result<Option<Record<E>>, Error>
    where
        E: EntityValue,
    {
        let rows = self.records(Some(1))?;

        rows.first().map(|row| self.session.bind_row(row)).transpose()
    }

    /// Fetch every match. An empty match set is an empty list, never an
    /// error.
    pub fn all(&self) -> Result<Vec<Record<E>>, Error>
    where
        E: EntityValue,
    {
        self.records(None)?
            .iter()
            .map(|row| self.session.bind_row(row))
            .collect()
    }

    // ------------------------------------------------------------------
    // Execution — counts and identifiers
    // ------------------------------------------------------------------

    /// Count matches without materializing records.
    pub fn count(&self) -> Result<u64, Error> {
        let request = self.build(ResultShape::Count, None)?;

        match self.session.run(&request)? {
            FetchOutcome::Count(n) => Ok(n),
            _ => Err(shape_mismatch()),
        }
    }

    /// Fetch the single matching identifier. NotFound on zero matches.
    pub fn one_id(&self) -> Result<Id<E>, Error> {
        let request = self.build(ResultShape::Ids, Some(1))?;

        match self.session.run(&request)? {
            FetchOutcome::Ids(ids) => ids
                .first()
                .map(|id| Id::new(*id))
                .ok_or_else(|| Error::not_found(E::ENTITY_NAME, "no record matched")),
            _ => Err(shape_mismatch()),
        }
    }

    /// Fetch every matching identifier without materializing records.
    pub fn all_ids(&self) -> Result<Vec<Id<E>>, Error> {
        let request = self.build(ResultShape::Ids, None)?;

        match self.session.run(&request)? {
            FetchOutcome::Ids(ids) => Ok(ids.into_iter().map(Id::new).collect()),
            _ => Err(shape_mismatch()),
        }
    }

    // ------------------------------------------------------------------
    // Descriptor construction
    // ------------------------------------------------------------------

    fn records(&self, limit: Option<u32>) -> Result<Vec<quarry_core::row::Row>, Error> {
        let request = self.build(ResultShape::Records, limit)?;

        match self.session.run(&request)? {
            FetchOutcome::Records(rows) => Ok(rows),
            _ => Err(shape_mismatch()),
        }
    }

    fn build(&self, shape: ResultShape, limit: Option<u32>) -> Result<FetchRequest, Error> {
        let meta = self.session.metadata_for::<E>()?;
        let mut request = FetchRequest::new(&meta, shape);

        request.predicate = self.filter.as_ref().map(FilterExpr::lower);
        if let Some(order) = &self.order {
            request.sort = order.lower();
        }
        request.limit = limit;

        self.options.apply(&mut request)?;

        Ok(request)
    }
}
