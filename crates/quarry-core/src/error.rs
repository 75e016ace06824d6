use derive_more::Display;
use thiserror::Error as ThisError;

///
/// InternalError
///
/// Structured runtime error carried across the host contract.
/// Not a stable API; the facade wraps it into its public error type.
///

#[derive(Clone, Debug, Eq, PartialEq, ThisError)]
#[error("{message}")]
pub struct InternalError {
    pub class: ErrorClass,
    pub origin: ErrorOrigin,
    pub message: String,
}

impl InternalError {
    pub fn new(class: ErrorClass, origin: ErrorOrigin, message: impl Into<String>) -> Self {
        Self {
            class,
            origin,
            message: message.into(),
        }
    }

    /// Construct an executor-origin invariant violation.
    pub fn executor_invariant(message: impl Into<String>) -> Self {
        Self::new(ErrorClass::InvariantViolation, ErrorOrigin::Executor, message)
    }

    /// Construct a query-origin invariant violation.
    pub fn query_invariant(message: impl Into<String>) -> Self {
        Self::new(ErrorClass::InvariantViolation, ErrorOrigin::Query, message)
    }

    /// Construct a store-origin internal error.
    pub fn store_internal(message: impl Into<String>) -> Self {
        Self::new(ErrorClass::Internal, ErrorOrigin::Store, message)
    }

    /// Construct a serialize-origin internal error.
    pub fn serialize_internal(message: impl Into<String>) -> Self {
        Self::new(ErrorClass::Internal, ErrorOrigin::Serialize, message)
    }
}

///
/// ErrorClass
///
/// Internal classification: remediable by the caller or not.
///

#[remain::sorted]
#[derive(Clone, Copy, Debug, Display, Eq, PartialEq)]
pub enum ErrorClass {
    Internal,
    InvariantViolation,
}

///
/// ErrorOrigin
///
/// Stable origin taxonomy shared with the facade error type.
///

#[remain::sorted]
#[derive(Clone, Copy, Debug, Display, Eq, PartialEq)]
pub enum ErrorOrigin {
    Context,
    Executor,
    Metadata,
    Options,
    Query,
    Serialize,
    Store,
}
