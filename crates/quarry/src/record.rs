use quarry_core::{
    traits::EntityValue,
    types::{ContextId, Id},
};
use std::{fmt, ops::Deref};

///
/// Record
///
/// A typed record bound to the execution context that produced it.
///
/// Two records for the same underlying row but different contexts are
/// distinct values; sharing a record across contexts goes through
/// `FetchSession::rebind`, never raw reuse.
///

pub struct Record<E: EntityValue> {
    context: ContextId,
    value: E,
}

impl<E: EntityValue> Record<E> {
    /// Bind a decoded entity value to its producing context.
    pub(crate) const fn bind(context: ContextId, value: E) -> Self {
        Self { context, value }
    }

    /// Typed identity of the underlying record.
    #[must_use]
    pub fn id(&self) -> Id<E> {
        self.value.id()
    }

    /// Identity of the context this record is bound to.
    #[must_use]
    pub const fn context_id(&self) -> ContextId {
        self.context
    }

    #[must_use]
    pub const fn value(&self) -> &E {
        &self.value
    }

    #[must_use]
    pub fn into_value(self) -> E {
        self.value
    }
}

impl<E: EntityValue> Clone for Record<E> {
    fn clone(&self) -> Self {
        Self {
            context: self.context,
            value: self.value.clone(),
        }
    }
}

impl<E: EntityValue> Deref for Record<E> {
    type Target = E;

    fn deref(&self) -> &E {
        &self.value
    }
}

impl<E: EntityValue + PartialEq> PartialEq for Record<E> {
    fn eq(&self, other: &Self) -> bool {
        self.context == other.context && self.value == other.value
    }
}

impl<E: EntityValue + Eq> Eq for Record<E> {}

impl<E: EntityValue + fmt::Debug> fmt::Debug for Record<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Record")
            .field("context", &self.context)
            .field("value", &self.value)
            .finish()
    }
}
