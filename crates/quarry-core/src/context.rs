use crate::{
    error::InternalError,
    metadata::EntityMetadata,
    request::{FetchOutcome, FetchRequest},
    row::Row,
    types::ContextId,
};
use ulid::Ulid;

///
/// HostContext
///
/// The execution-context contract of the wrapped persistence framework.
/// One context owns one logical view of the store and serializes all access
/// to it; implementors are not expected to be `Sync`, and every operation
/// here is synchronous on the calling context.
///
/// Contexts form an ownership tree through `parent`. Cached record state is
/// per-context; sharing a record across contexts goes through an explicit
/// rebind, never raw reuse.
///

pub trait HostContext {
    /// Identity of this context, distinct per context instance.
    fn context_id(&self) -> ContextId;

    /// The parent context, when this context was spawned from one.
    fn parent(&self) -> Option<&Self>;

    /// Execute a fetch descriptor against this context's view of the
    /// store, returning a result shaped per the descriptor.
    fn execute(&self, request: &FetchRequest) -> Result<FetchOutcome, InternalError>;

    /// Resolve an identity within this context.
    ///
    /// Returns `Ok(None)` when the identity no longer resolves; the facade
    /// turns that into its NotFound contract.
    fn existing_row(
        &self,
        meta: &EntityMetadata,
        id: Ulid,
    ) -> Result<Option<Row>, InternalError>;

    /// Invalidate all cached record state in this context, forcing the
    /// next read of each affected field to reload from the store.
    fn refresh_all_objects(&self);

    /// Schedule `refresh_all_objects` on this context's own designated
    /// queue.
    ///
    /// Ancestor refresh goes through this hook so each context's
    /// single-owner discipline is respected; hosts without a real dispatch
    /// queue run the refresh immediately.
    fn enqueue_refresh(&self) {
        self.refresh_all_objects();
    }
}
