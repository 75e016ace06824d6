mod id;

pub use id::Id;

use derive_more::Display;
use serde::{Deserialize, Serialize};

///
/// ContextId
///
/// Opaque identity of one execution context. Records carry the id of the
/// context that produced them; rebinding compares these ids.
///

#[derive(
    Clone, Copy, Debug, Deserialize, Display, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize,
)]
pub struct ContextId(u64);

impl ContextId {
    #[must_use]
    pub const fn new(raw: u64) -> Self {
        Self(raw)
    }

    #[must_use]
    pub const fn get(self) -> u64 {
        self.0
    }
}
