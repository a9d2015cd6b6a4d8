//! # cache-shootout
//!
//! Compares integer-keyed, fixed-capacity cache strategies under single- and
//! multi-threaded access, and checks after every run that no key was lost or
//! corrupted.
//!
//! The crate has three layers:
//!
//! - [`cache`]: the variants, all behind the [`AnyCache`] capability set.
//!   Each one makes a different concurrency trade-off, from an unsynchronized
//!   `HashMap` to a striped map with per-shard locks.
//! - [`workload`]: get, put and put-then-get loops driven by a
//!   [`xorshift`] key stream.
//! - [`harness`]: owns one cache and a fixed [`pool`] of workers, populates
//!   the full key domain, runs invocations, and verifies the domain at
//!   teardown.
//!
//! ## Example
//!
//! ```rust
//! use cache_shootout::{CacheKind, Harness, HarnessConfig, Shape, Threading};
//!
//! let config = HarnessConfig::builder()
//!     .kind(CacheKind::Concurrent)
//!     .domain_bits(10)
//!     .ops_per_invocation(1_000)
//!     .build()
//!     .unwrap();
//!
//! let mut harness = Harness::setup(&config).unwrap();
//! let m = harness.measure(Shape::PutGet, Threading::Multi).unwrap();
//! assert_eq!(m.threads, 2);
//!
//! let report = harness.teardown().unwrap();
//! assert_eq!(report.keys_verified, 1024);
//! ```
//!
//! ## Safety model
//!
//! Only variants that synchronize internally hand out a [`SharedCache`]
//! view, and only those are ever written from several threads. The
//! unsynchronized variants are shared for reads alone, after population has
//! finished, which the borrow checker already guarantees is race-free.

pub mod cache;
pub mod config;
pub mod error;
pub mod harness;
pub mod pool;
pub mod workload;
pub mod xorshift;

#[cfg(test)]
mod proptests;

pub use cache::{AnyCache, CacheKind, SharedCache, SharedHandle, new_cache};
pub use config::{HarnessConfig, HarnessConfigBuilder};
pub use error::{ConfigError, HarnessError, Result};
pub use harness::{Harness, HarnessState, Measurement, VerifiedReport};
pub use workload::{Shape, Threading};
