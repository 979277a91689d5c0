//! Runtime sizing parameters for [`ChainHashSet`](crate::ChainHashSet).

use crate::error::ConfigError;

/// Bucket count a fresh (or cleared) set starts with.
pub const DEFAULT_INITIAL_BUCKETS: usize = 7;

/// Average chain length above which the table doubles its bucket count.
pub const DEFAULT_MAX_LOAD_FACTOR: usize = 10;

/// Validated table parameters. Obtain one through [`SetConfig::builder`] or
/// use [`SetConfig::default`].
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub struct SetConfig {
    initial_buckets: usize,
    max_load_factor: usize,
}

impl SetConfig {
    pub const fn new() -> Self {
        Self {
            initial_buckets: DEFAULT_INITIAL_BUCKETS,
            max_load_factor: DEFAULT_MAX_LOAD_FACTOR,
        }
    }

    pub fn builder() -> SetConfigBuilder {
        SetConfigBuilder::default()
    }

    pub fn initial_buckets(&self) -> usize {
        self.initial_buckets
    }

    pub fn max_load_factor(&self) -> usize {
        self.max_load_factor
    }

    /// Growth trigger: true once `len` keys no longer fit in `buckets` chains
    /// of average length `max_load_factor`.
    pub(crate) fn exceeds_load(&self, len: usize, buckets: usize) -> bool {
        len > buckets.saturating_mul(self.max_load_factor)
    }
}

impl Default for SetConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// Builder for [`SetConfig`]; unset fields keep their defaults.
#[derive(Clone, Debug)]
pub struct SetConfigBuilder {
    initial_buckets: usize,
    max_load_factor: usize,
}

impl Default for SetConfigBuilder {
    fn default() -> Self {
        Self {
            initial_buckets: DEFAULT_INITIAL_BUCKETS,
            max_load_factor: DEFAULT_MAX_LOAD_FACTOR,
        }
    }
}

impl SetConfigBuilder {
    pub fn initial_buckets(mut self, buckets: usize) -> Self {
        self.initial_buckets = buckets;
        self
    }

    pub fn max_load_factor(mut self, factor: usize) -> Self {
        self.max_load_factor = factor;
        self
    }

    pub fn build(self) -> Result<SetConfig, ConfigError> {
        if self.initial_buckets == 0 {
            return Err(ConfigError::ZeroBuckets);
        }
        if self.max_load_factor == 0 {
            return Err(ConfigError::ZeroLoadFactor);
        }
        Ok(SetConfig {
            initial_buckets: self.initial_buckets,
            max_load_factor: self.max_load_factor,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Invariant: an untouched builder yields the same config as `default()`.
    #[test]
    fn builder_defaults_match_default() {
        let built = SetConfig::builder().build().unwrap();
        assert_eq!(built, SetConfig::default());
        assert_eq!(built.initial_buckets(), DEFAULT_INITIAL_BUCKETS);
        assert_eq!(built.max_load_factor(), DEFAULT_MAX_LOAD_FACTOR);
    }

    /// Invariant: zero-sized parameters are rejected with a specific error.
    #[test]
    fn zero_values_rejected() {
        assert_eq!(
            SetConfig::builder().initial_buckets(0).build(),
            Err(ConfigError::ZeroBuckets)
        );
        assert_eq!(
            SetConfig::builder().max_load_factor(0).build(),
            Err(ConfigError::ZeroLoadFactor)
        );
    }

    /// Invariant: growth triggers strictly above `buckets * factor`.
    #[test]
    fn exceeds_load_is_strict() {
        let cfg = SetConfig::default();
        assert!(!cfg.exceeds_load(70, 7));
        assert!(cfg.exceeds_load(71, 7));
        // Saturating multiply: huge bucket counts never report overload.
        assert!(!cfg.exceeds_load(usize::MAX, usize::MAX));
    }

    #[test]
    fn error_messages() {
        assert_eq!(
            ConfigError::ZeroBuckets.to_string(),
            "initial bucket count must be at least 1"
        );
        assert_eq!(
            ConfigError::ZeroLoadFactor.to_string(),
            "max load factor must be at least 1"
        );
    }
}
