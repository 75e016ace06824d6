//! ## Crate layout
//! - `error`: public error type with a stable kind + origin taxonomy.
//! - `query`: filter/sort/projection/options builder surface.
//! - `record`: context-bound typed records.
//! - `session`: the read-only fetch facade.
//!
//! The facade wraps the `quarry-core` host contract: it translates the
//! builder surface into native fetch descriptors, delegates execution to a
//! `HostContext`, and adapts raw outcomes back into typed records,
//! identifiers, scalars, or name-to-value mappings. It performs no
//! validation beyond metadata resolution and never interprets predicate,
//! ordering, or projection semantics itself.

pub use quarry_core as core;

pub mod error;
pub mod query;
pub mod record;
pub mod session;

pub use error::{Error, ErrorKind, ErrorOrigin};
pub use record::Record;
pub use session::{FetchQuery, FetchSession, SelectQuery};

/// Workspace version re-export for downstream tooling/tests.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

///
/// Prelude
/// using _ brings traits into scope and avoids name conflicts
///

pub mod prelude {
    pub use crate::{
        error::{Error, ErrorKind, ErrorOrigin},
        query::{FetchOptions, FilterExpr, GroupBy, OrderDirection, Select, SortExpr},
        record::Record,
        session::FetchSession,
    };
    pub use quarry_core::{
        context::HostContext as _,
        traits::{EntityKind as _, EntityValue as _, FieldValues as _, Path as _},
        types::{ContextId, Id},
        value::Value,
    };
}
