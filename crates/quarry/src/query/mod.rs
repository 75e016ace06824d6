pub mod expr;
pub mod options;
pub mod select;

pub use expr::{FilterExpr, OrderDirection, SortExpr};
pub use options::{FetchOptions, OptionsError};
pub use select::{GroupBy, Select};

/// Native descriptor types exposed at the facade query boundary.
pub mod request {
    pub use quarry_core::request::{FetchRequest, ResultShape};
}

/// Predicate type exposed at the facade query boundary.
pub mod predicate {
    pub use quarry_core::predicate::Predicate;
}
