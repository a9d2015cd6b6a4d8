//! Configuration for a harness run.

use crate::cache::{CacheKind, MAX_CAPACITY};
use crate::error::ConfigError;
use crate::workload::DEFAULT_OPS;

/// Default key domain: `[0, 2^20 - 1]`.
pub const DEFAULT_DOMAIN_MASK: u32 = (1 << 20) - 1;

/// Default worker pool size.
pub const DEFAULT_WORKERS: usize = 2;

const MAX_DOMAIN_MASK: u32 = 0x7fff_ffff;

/// Validated configuration for one [`Harness`](crate::Harness).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HarnessConfig {
    pub(crate) kind: CacheKind,
    pub(crate) domain_mask: u32,
    pub(crate) capacity: usize,
    pub(crate) workers: usize,
    pub(crate) ops_per_invocation: usize,
}

impl HarnessConfig {
    /// Creates a new configuration builder.
    pub fn builder() -> HarnessConfigBuilder {
        HarnessConfigBuilder::new()
    }

    pub fn kind(&self) -> CacheKind {
        self.kind
    }

    pub fn domain_mask(&self) -> u32 {
        self.domain_mask
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn workers(&self) -> usize {
        self.workers
    }

    pub fn ops_per_invocation(&self) -> usize {
        self.ops_per_invocation
    }
}

/// Builder for [`HarnessConfig`].
#[derive(Debug, Clone)]
pub struct HarnessConfigBuilder {
    kind: CacheKind,
    domain_mask: u32,
    capacity: Option<usize>,
    workers: usize,
    ops_per_invocation: usize,
}

impl Default for HarnessConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl HarnessConfigBuilder {
    /// Creates a new builder with default values.
    pub fn new() -> Self {
        Self {
            kind: CacheKind::Unshared,
            domain_mask: DEFAULT_DOMAIN_MASK,
            capacity: None,
            workers: DEFAULT_WORKERS,
            ops_per_invocation: DEFAULT_OPS,
        }
    }

    /// Selects the cache variant.
    ///
    /// Default: `unshared`
    pub fn kind(mut self, kind: CacheKind) -> Self {
        self.kind = kind;
        self
    }

    /// Sets the key domain mask. Must be `2^k - 1` and fit in 31 bits.
    ///
    /// Default: `2^20 - 1`
    pub fn domain_mask(mut self, mask: u32) -> Self {
        self.domain_mask = mask;
        self
    }

    /// Sets the domain mask to `2^bits - 1`. Values above 31 are clamped.
    pub fn domain_bits(self, bits: u32) -> Self {
        let bits = bits.min(31);
        self.domain_mask(((1u64 << bits) - 1) as u32)
    }

    /// Overrides the variant's sizing.
    ///
    /// Default: [`CacheKind::default_capacity`] for the chosen domain.
    pub fn capacity(mut self, capacity: usize) -> Self {
        self.capacity = Some(capacity);
        self
    }

    /// Sets the worker pool size.
    ///
    /// Default: 2
    pub fn workers(mut self, workers: usize) -> Self {
        self.workers = workers;
        self
    }

    /// Sets the operation count of each invocation.
    ///
    /// Default: 1,000,000
    pub fn ops_per_invocation(mut self, ops: usize) -> Self {
        self.ops_per_invocation = ops;
        self
    }

    /// Validates and builds the configuration.
    pub fn build(self) -> Result<HarnessConfig, ConfigError> {
        let mask = self.domain_mask;
        if mask == 0 || mask > MAX_DOMAIN_MASK || mask & (mask + 1) != 0 {
            return Err(ConfigError::InvalidDomainMask { mask });
        }

        let capacity = self
            .capacity
            .unwrap_or_else(|| self.kind.default_capacity(mask));
        if capacity == 0 {
            return Err(ConfigError::ZeroCapacity);
        }
        if capacity > MAX_CAPACITY {
            return Err(ConfigError::CapacityTooLarge {
                capacity,
                max: MAX_CAPACITY,
            });
        }

        if self.workers == 0 {
            return Err(ConfigError::ZeroWorkers);
        }
        if self.ops_per_invocation == 0 {
            return Err(ConfigError::ZeroOps);
        }

        Ok(HarnessConfig {
            kind: self.kind,
            domain_mask: mask,
            capacity,
            workers: self.workers,
            ops_per_invocation: self.ops_per_invocation,
        })
    }
}
