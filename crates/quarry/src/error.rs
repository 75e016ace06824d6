use derive_more::Display;
use quarry_core::error::{ErrorOrigin as CoreErrorOrigin, InternalError};
use serde::{Deserialize, Serialize};
use thiserror::Error as ThisError;

///
/// Error
///
/// Public error type with a stable kind + origin taxonomy.
///
/// Two kinds suffice for a read-only facade: a required single-result read
/// produced zero rows (`NotFound`), or a failure surfaced unchanged from
/// metadata lookup, options application, or the host context
/// (`Propagated`). There is no local recovery and no retry.
///

#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize, ThisError)]
#[error("{message}")]
pub struct Error {
    pub kind: ErrorKind,
    pub origin: ErrorOrigin,
    pub message: String,
}

impl Error {
    pub fn new(kind: ErrorKind, origin: ErrorOrigin, message: impl Into<String>) -> Self {
        Self {
            kind,
            origin,
            message: message.into(),
        }
    }

    /// A required single-result read produced zero rows, or an identity no
    /// longer resolves.
    pub fn not_found(entity: &'static str, detail: impl Into<String>) -> Self {
        Self::new(
            ErrorKind::NotFound,
            ErrorOrigin::Response,
            format!("{entity}: {}", detail.into()),
        )
    }

    #[must_use]
    pub const fn is_not_found(&self) -> bool {
        matches!(self.kind, ErrorKind::NotFound)
    }
}

impl From<InternalError> for Error {
    fn from(err: InternalError) -> Self {
        Self::new(ErrorKind::Propagated, err.origin.into(), err.message)
    }
}

///
/// ErrorKind
///

#[remain::sorted]
#[derive(Clone, Copy, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub enum ErrorKind {
    /// A contract that guarantees exactly one result had none.
    NotFound,

    /// A collaborator failure returned to the caller unchanged.
    Propagated,
}

///
/// ErrorOrigin
/// Public origin taxonomy for callers.
///

#[remain::sorted]
#[derive(
    Clone, Copy, Debug, Deserialize, Display, Eq, PartialEq, Serialize,
)]
pub enum ErrorOrigin {
    Context,
    Executor,
    Metadata,
    Options,
    Query,
    Response,
    Serialize,
    Store,
}

impl From<CoreErrorOrigin> for ErrorOrigin {
    fn from(origin: CoreErrorOrigin) -> Self {
        match origin {
            CoreErrorOrigin::Context => Self::Context,
            CoreErrorOrigin::Executor => Self::Executor,
            CoreErrorOrigin::Metadata => Self::Metadata,
            CoreErrorOrigin::Options => Self::Options,
            CoreErrorOrigin::Query => Self::Query,
            CoreErrorOrigin::Serialize => Self::Serialize,
            CoreErrorOrigin::Store => Self::Store,
        }
    }
}
