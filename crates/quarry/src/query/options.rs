use crate::error::{Error, ErrorKind, ErrorOrigin};
use quarry_core::request::{FetchRequest, Staleness};
use serde::{Deserialize, Serialize};
use thiserror::Error as ThisError;

///
/// FetchOptions
///
/// Immutable options value applied to a descriptor immediately before
/// execution. Unset fields leave the descriptor untouched; application can
/// fail and the failure is surfaced to the caller unchanged.
///

#[derive(Clone, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
pub struct FetchOptions {
    batch_size: Option<u32>,
    offset: Option<u32>,
    staleness: Option<Staleness>,
    prefetch: Vec<String>,
}

impl FetchOptions {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Materialization batch hint; hosts may ignore it. Zero is rejected
    /// at application time.
    #[must_use]
    pub const fn batch_size(mut self, size: u32) -> Self {
        self.batch_size = Some(size);
        self
    }

    /// Skip rows in the ordered result stream. Only valid with explicit
    /// ordering; the host rejects the descriptor otherwise.
    #[must_use]
    pub const fn offset(mut self, offset: u32) -> Self {
        self.offset = Some(offset);
        self
    }

    /// Let cached record state satisfy materialization.
    #[must_use]
    pub const fn allow_cached(mut self) -> Self {
        self.staleness = Some(Staleness::AllowCached);
        self
    }

    /// Bypass cached record state and reload from the store.
    #[must_use]
    pub const fn require_fresh(mut self) -> Self {
        self.staleness = Some(Staleness::RequireFresh);
        self
    }

    /// Relationship key path to prefetch; hosts may ignore it.
    #[must_use]
    pub fn prefetch(mut self, key_path: impl Into<String>) -> Self {
        self.prefetch.push(key_path.into());
        self
    }

    /// Mutate a descriptor with these options.
    ///
    /// Runs last in descriptor construction, immediately before execution.
    pub fn apply(&self, request: &mut FetchRequest) -> Result<(), OptionsError> {
        if let Some(size) = self.batch_size {
            if size == 0 {
                return Err(OptionsError::ZeroBatchSize);
            }
            request.batch_size = Some(size);
        }
        if let Some(offset) = self.offset {
            request.offset = offset;
        }
        if let Some(staleness) = self.staleness {
            request.staleness = staleness;
        }
        request.prefetch.extend(self.prefetch.iter().cloned());

        Ok(())
    }
}

///
/// OptionsError
///

#[remain::sorted]
#[derive(Clone, Copy, Debug, Eq, PartialEq, ThisError)]
pub enum OptionsError {
    #[error("batch size must be non-zero")]
    ZeroBatchSize,
}

impl From<OptionsError> for Error {
    fn from(err: OptionsError) -> Self {
        Self::new(ErrorKind::Propagated, ErrorOrigin::Options, err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use quarry_core::{
        metadata::MetadataRegistry,
        request::ResultShape,
        test_support::fixtures::{self, Order},
    };

    fn request() -> FetchRequest {
        let registry: MetadataRegistry = fixtures::registry();

        FetchRequest::new(&registry.resolve::<Order>().unwrap(), ResultShape::Records)
    }

    #[test]
    fn options_apply_last_and_only_touch_set_fields() {
        let mut req = request();

        FetchOptions::new()
            .batch_size(50)
            .offset(10)
            .require_fresh()
            .prefetch("customer")
            .apply(&mut req)
            .unwrap();

        assert_eq!(req.batch_size, Some(50));
        assert_eq!(req.offset, 10);
        assert_eq!(req.staleness, Staleness::RequireFresh);
        assert_eq!(req.prefetch, vec!["customer".to_string()]);

        let mut untouched = request();
        FetchOptions::new().apply(&mut untouched).unwrap();
        assert_eq!(untouched.batch_size, None);
        assert_eq!(untouched.offset, 0);
        assert_eq!(untouched.staleness, Staleness::AllowCached);
    }

    #[test]
    fn zero_batch_size_is_rejected() {
        let mut req = request();

        assert_eq!(
            FetchOptions::new().batch_size(0).apply(&mut req),
            Err(OptionsError::ZeroBatchSize)
        );
    }
}
