//! Errors raised while building a [`SetConfig`](crate::SetConfig).
//!
//! Set operations themselves never fail: a missing key is reported through
//! return values (`count() == 0`, `erase() == 0`, an end cursor).

use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[non_exhaustive]
pub enum ConfigError {
    #[error("initial bucket count must be at least 1")]
    ZeroBuckets,
    #[error("max load factor must be at least 1")]
    ZeroLoadFactor,
}
