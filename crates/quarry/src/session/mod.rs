mod fetch;
mod select;

pub use fetch::FetchQuery;
pub use select::SelectQuery;

use crate::{
    error::Error,
    query::Select,
    record::Record,
};
use log::debug;
use quarry_core::{
    context::HostContext,
    error::InternalError,
    metadata::{EntityMetadata, MetadataRegistry},
    request::{FetchOutcome, FetchRequest},
    row::Row,
    traits::{EntityKind, EntityValue},
    types::{ContextId, Id},
};

///
/// FetchSession
///
/// Public facade for read-only fetch, count, and projection queries over
/// one execution context. Holds the context and the metadata registry by
/// reference; there is no ambient global state, so tests can construct
/// isolated context graphs.
///
/// Every operation resolves metadata first — entity model plus the single
/// physical store the result set is scoped to — then builds the native
/// descriptor, lets the caller's options mutate it, executes, and adapts
/// the outcome. Failures are immediate and terminal; nothing is retried.
///

pub struct FetchSession<'a, H: HostContext> {
    context: &'a H,
    metadata: &'a MetadataRegistry,
    debug: bool,
}

impl<'a, H: HostContext> FetchSession<'a, H> {
    /// Create a session over the provided context and metadata registry.
    #[must_use]
    pub const fn new(context: &'a H, metadata: &'a MetadataRegistry) -> Self {
        Self {
            context,
            metadata,
            debug: false,
        }
    }

    /// Enable debug logging for descriptors executed in this session.
    ///
    /// Debug is session-scoped and affects all subsequent operations.
    #[must_use]
    pub const fn debug(mut self) -> Self {
        self.debug = true;
        self
    }

    /// Identity of the context this session operates on.
    pub fn context_id(&self) -> ContextId {
        self.context.context_id()
    }

    // ------------------------------------------------------------------
    // Query entry points
    // ------------------------------------------------------------------

    /// Start a record/identifier/count query for `E`.
    #[must_use]
    pub fn fetch<E: EntityKind>(&self) -> FetchQuery<'_, 'a, H, E> {
        FetchQuery::new(self)
    }

    /// Start a projection query for `E`.
    #[must_use]
    pub fn select<E: EntityKind>(&self, select: Select) -> SelectQuery<'_, 'a, H, E> {
        SelectQuery::new(self, select)
    }

    // ------------------------------------------------------------------
    // Identity resolution
    // ------------------------------------------------------------------

    /// Re-resolve a record within this session's context.
    ///
    /// Idempotent: a record already bound to this context is returned
    /// unchanged. Otherwise its identity is resolved here, failing with
    /// NotFound when the identity is gone.
    pub fn rebind<E: EntityValue>(&self, record: &Record<E>) -> Result<Record<E>, Error> {
        if record.context_id() == self.context.context_id() {
            return Ok(record.clone());
        }

        self.fetch_by_id(record.id())
    }

    /// Element-wise `rebind`, preserving order and failing atomically.
    pub fn rebind_all<E: EntityValue>(
        &self,
        records: &[Record<E>],
    ) -> Result<Vec<Record<E>>, Error> {
        records.iter().map(|record| self.rebind(record)).collect()
    }

    /// Resolve one identity directly, with no predicate.
    pub fn fetch_by_id<E: EntityValue>(&self, id: Id<E>) -> Result<Record<E>, Error> {
        let meta = self.metadata_for::<E>()?;
        let row = self.context.existing_row(&meta, id.key())?;

        row.map_or_else(
            || {
                Err(Error::not_found(
                    E::ENTITY_NAME,
                    format!("identity {id} no longer resolves"),
                ))
            },
            |row| self.bind_row(&row),
        )
    }

    /// Resolve several identities, failing if any of them is gone.
    pub fn fetch_by_ids<E: EntityValue>(&self, ids: &[Id<E>]) -> Result<Vec<Record<E>>, Error> {
        ids.iter().map(|id| self.fetch_by_id(*id)).collect()
    }

    // ------------------------------------------------------------------
    // Refresh
    // ------------------------------------------------------------------

    /// Invalidate cached record state in this context and every ancestor.
    ///
    /// The active context refreshes synchronously; each ancestor's refresh
    /// is scheduled on that ancestor's own designated queue, respecting
    /// the single-owner discipline of the context tree. Contexts outside
    /// the ancestor chain are untouched.
    pub fn refresh_all(&self) {
        self.context.refresh_all_objects();

        let mut parent = self.context.parent();
        while let Some(ancestor) = parent {
            ancestor.enqueue_refresh();
            parent = ancestor.parent();
        }
    }

    // ------------------------------------------------------------------
    // Internal plumbing shared by the query builders
    // ------------------------------------------------------------------

    pub(crate) fn metadata_for<E: EntityKind>(&self) -> Result<EntityMetadata, Error> {
        self.metadata
            .resolve::<E>()
            .map_err(|err| InternalError::from(err).into())
    }

    pub(crate) fn run(&self, request: &FetchRequest) -> Result<FetchOutcome, Error> {
        if self.debug {
            debug!("execute: {request:?}");
        }

        Ok(self.context.execute(request)?)
    }

    pub(crate) fn bind_row<E: EntityValue>(&self, row: &Row) -> Result<Record<E>, Error> {
        let value = E::from_row(row).map_err(InternalError::from)?;

        Ok(Record::bind(self.context.context_id(), value))
    }
}

/// The host answered with a result shape the descriptor did not ask for.
pub(crate) fn shape_mismatch() -> Error {
    InternalError::executor_invariant("host returned a mismatched result shape").into()
}
