//! Error types for configuration and harness runs.

use crate::cache::CacheKind;
use crate::workload::Shape;

/// Errors raised while validating a [`HarnessConfig`](crate::HarnessConfig).
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    /// The domain mask is zero, not of the form `2^k - 1`, or wider than 31 bits.
    #[error("domain mask {mask:#x} must be a non-zero 2^k - 1 no wider than 31 bits")]
    InvalidDomainMask {
        /// The rejected mask.
        mask: u32,
    },
    /// A cache was asked for zero capacity.
    #[error("capacity must be greater than 0")]
    ZeroCapacity,
    /// The requested capacity is above the 2^31 keys a 31-bit domain can hold.
    #[error("capacity {capacity} exceeds the maximum of {max}")]
    CapacityTooLarge {
        /// The rejected capacity.
        capacity: usize,
        /// Largest accepted capacity.
        max: usize,
    },
    /// The worker pool must have at least one thread.
    #[error("worker count must be greater than 0")]
    ZeroWorkers,
    /// An invocation must perform at least one operation.
    #[error("operations per invocation must be greater than 0")]
    ZeroOps,
    /// A variant name did not match any known cache.
    #[error("unknown cache variant `{0}`")]
    UnknownVariant(String),
    /// A workload name did not match any known shape.
    #[error("unknown workload shape `{0}`")]
    UnknownShape(String),
    /// A threading mode name was neither `single` nor `multi`.
    #[error("unknown threading mode `{0}`")]
    UnknownThreading(String),
}

/// Errors raised by the harness across its lifecycle.
#[derive(Debug, thiserror::Error)]
pub enum HarnessError {
    /// A key read back at teardown did not match what was written.
    ///
    /// This is fatal: either a variant is broken or shared state was corrupted.
    #[error(
        "consistency check failed for {kind}: key {key} read back {observed} (expected {expected})"
    )]
    ConsistencyCheck {
        /// Variant under test.
        kind: CacheKind,
        /// Key that failed.
        key: u32,
        /// Masked value observed.
        observed: u32,
        /// Masked value expected.
        expected: u32,
    },
    /// A multi-threaded write workload was requested on a variant that cannot
    /// be mutated through a shared reference.
    #[error("{kind} cannot run `{shape}` concurrently: the variant is not synchronized")]
    ConcurrentWriteUnsupported {
        /// Variant under test.
        kind: CacheKind,
        /// Requested workload.
        shape: Shape,
    },
    /// The worker pool could not be started.
    #[error("failed to build worker pool: {0}")]
    Pool(#[from] rayon::ThreadPoolBuildError),
    /// The configuration was rejected.
    #[error(transparent)]
    Config(#[from] ConfigError),
}

/// Result type for harness operations.
pub type Result<T> = std::result::Result<T, HarnessError>;
