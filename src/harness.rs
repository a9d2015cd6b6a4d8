//! Harness lifecycle: populate, measure, verify, tear down.
//!
//! A [`Harness`] is the context object for one configuration. It owns the
//! cache and the worker pool, and walks through
//!
//! ```text
//! Uninitialized -> Populated -> (Measuring -> Populated)* -> Verified -> TornDown
//! ```
//!
//! Population is single-threaded and writes every key of the domain before
//! any worker runs, so variants that cannot survive concurrent structural
//! growth never see it. Teardown re-reads the whole domain and fails on the
//! first key whose value no longer masks back to the key.

use std::time::{Duration, Instant};

use tracing::{debug, error, info, info_span, warn};

use crate::cache::{AnyCache, CacheKind, SharedHandle, new_cache};
use crate::config::HarnessConfig;
use crate::error::{HarnessError, Result};
use crate::pool::WorkerPool;
use crate::workload::{Shape, Threading, run_get};
use crate::xorshift::Xorshift;

/// Lifecycle states of a [`Harness`].
///
/// `Uninitialized` and `Measuring` only hold while [`Harness::setup`] and
/// [`Harness::measure`] run, and show up in their log events.
/// [`Harness::state`] reports `Populated` or `Verified`; a successful
/// teardown reports `TornDown` in its [`VerifiedReport`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HarnessState {
    Uninitialized,
    Populated,
    Measuring,
    Verified,
    TornDown,
}

/// Outcome of one invocation.
#[derive(Debug, Clone, PartialEq)]
pub struct Measurement {
    pub shape: Shape,
    pub threading: Threading,
    /// Threads that ran the workload: 1, or the pool size.
    pub threads: usize,
    /// Operations per invocation. In multi mode every thread performs this many.
    pub ops: usize,
    pub elapsed: Duration,
    /// Wrapping sum of the per-thread checksums.
    pub checksum: u64,
}

impl Measurement {
    /// Average latency of one operation unit of the invocation.
    ///
    /// Multi-threaded invocations are charged per invocation, not per thread,
    /// so this is the wall time for `ops` units run `threads` times over.
    pub fn nanos_per_op(&self) -> f64 {
        self.elapsed.as_nanos() as f64 / self.ops as f64
    }
}

/// Summary returned by a teardown that passed verification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VerifiedReport {
    pub kind: CacheKind,
    /// Always [`HarnessState::TornDown`].
    pub state: HarnessState,
    pub keys_verified: u64,
    pub entries: usize,
    pub invocations: usize,
}

/// Writes every key in `[0, mask]` mapped to itself.
pub fn populate<C>(cache: &mut C, mask: u32)
where
    C: AnyCache + ?Sized,
{
    for key in 0..=mask {
        cache.put(key, key);
    }
}

/// Checks `get(key) & mask == key & mask` for every key in `[0, mask]`.
///
/// Returns the number of keys checked, or the first mismatch.
pub fn verify_domain<C>(cache: &C, mask: u32) -> Result<u64>
where
    C: AnyCache + ?Sized,
{
    for key in 0..=mask {
        let observed = cache.get(key) & mask;
        let expected = key & mask;
        if observed != expected {
            return Err(HarnessError::ConsistencyCheck {
                kind: cache.kind(),
                key,
                observed,
                expected,
            });
        }
    }
    Ok(u64::from(mask) + 1)
}

pub struct Harness {
    config: HarnessConfig,
    cache: Box<dyn AnyCache>,
    pool: WorkerPool,
    state: HarnessState,
    invocations: usize,
}

impl Harness {
    /// Starts the pool, builds the configured variant and populates it.
    pub fn setup(config: &HarnessConfig) -> Result<Self> {
        let span = info_span!("setup", variant = %config.kind);
        let _enter = span.enter();
        debug!(state = ?HarnessState::Uninitialized, "building harness");

        let pool = WorkerPool::new(config.workers)?;
        let mut cache = new_cache(config.kind, config.capacity);

        let start = Instant::now();
        populate(&mut *cache, config.domain_mask);
        info!(
            entries = cache.len(),
            capacity = config.capacity,
            workers = config.workers,
            elapsed_ms = start.elapsed().as_millis() as u64,
            "cache populated"
        );

        Ok(Self {
            config: config.clone(),
            cache,
            pool,
            state: HarnessState::Populated,
            invocations: 0,
        })
    }

    pub fn state(&self) -> HarnessState {
        self.state
    }

    pub fn config(&self) -> &HarnessConfig {
        &self.config
    }

    pub fn cache(&self) -> &dyn AnyCache {
        &*self.cache
    }

    pub fn invocations(&self) -> usize {
        self.invocations
    }

    /// Runs one invocation of `shape`.
    ///
    /// In multi mode every pool worker runs its own copy and this call returns
    /// only once all of them are done. Concurrent writes are refused for
    /// variants without a [`SharedCache`](crate::SharedCache) view; concurrent
    /// reads are allowed for all of them since the domain is fully populated.
    pub fn measure(&mut self, shape: Shape, threading: Threading) -> Result<Measurement> {
        let ops = self.config.ops_per_invocation;
        let threads = match threading {
            Threading::Single => 1,
            Threading::Multi => self.pool.workers(),
        };

        self.state = HarnessState::Measuring;
        debug!(state = ?self.state, %shape, %threading, "invocation starting");
        let start = Instant::now();
        let outcome = match threading {
            Threading::Single => Ok(self.run_single(shape)),
            Threading::Multi => self.run_multi(shape),
        };
        let elapsed = start.elapsed();
        self.state = HarnessState::Populated;

        let checksum = outcome?;
        self.invocations += 1;
        debug!(
            variant = %self.config.kind,
            %shape,
            %threading,
            threads,
            elapsed_us = elapsed.as_micros() as u64,
            "invocation complete"
        );

        Ok(Measurement {
            shape,
            threading,
            threads,
            ops,
            elapsed,
            checksum,
        })
    }

    fn run_single(&mut self, shape: Shape) -> u64 {
        let mut rng = Xorshift::from_time();
        shape.run(
            &mut *self.cache,
            &mut rng,
            self.config.ops_per_invocation,
            self.config.domain_mask,
        )
    }

    fn run_multi(&self, shape: Shape) -> Result<u64> {
        let ops = self.config.ops_per_invocation;
        let mask = self.config.domain_mask;
        let kind = self.config.kind;
        let cache: &dyn AnyCache = &*self.cache;

        let sums = if shape.writes() {
            let Some(shared) = cache.as_shared() else {
                warn!(variant = %kind, %shape, "refusing concurrent writes to unsynchronized cache");
                return Err(HarnessError::ConcurrentWriteUnsupported { kind, shape });
            };
            self.pool.fan_out(|worker| {
                let mut handle = SharedHandle::new(shared, kind);
                let mut rng = Xorshift::for_worker(worker);
                shape.run(&mut handle, &mut rng, ops, mask)
            })
        } else {
            self.pool.fan_out(|worker| {
                let mut rng = Xorshift::for_worker(worker);
                run_get(cache, &mut rng, ops, mask)
            })
        };

        Ok(sums.into_iter().fold(0, u64::wrapping_add))
    }

    /// Re-reads the whole domain without tearing down.
    ///
    /// On success the harness moves to [`HarnessState::Verified`]; the next
    /// [`measure`](Self::measure) returns it to `Populated`. A failed check
    /// leaves the state unchanged.
    pub fn verify(&mut self) -> Result<u64> {
        let keys_verified = verify_domain(&*self.cache, self.config.domain_mask)?;
        self.state = HarnessState::Verified;
        debug!(state = ?self.state, keys_verified, "domain verified");
        Ok(keys_verified)
    }

    /// Verifies the whole domain, then shuts the pool down.
    ///
    /// The pool is shut down whether or not verification passes.
    pub fn teardown(mut self) -> Result<VerifiedReport> {
        let span = info_span!("teardown", variant = %self.config.kind);
        let _enter = span.enter();

        let start = Instant::now();
        let verified = self.verify();
        let Harness {
            config,
            cache,
            pool,
            invocations,
            ..
        } = self;
        pool.shutdown();

        match verified {
            Ok(keys_verified) => {
                let report = VerifiedReport {
                    kind: config.kind,
                    state: HarnessState::TornDown,
                    keys_verified,
                    entries: cache.len(),
                    invocations,
                };
                info!(
                    entries = report.entries,
                    invocations,
                    elapsed_ms = start.elapsed().as_millis() as u64,
                    state = ?report.state,
                    "teardown complete"
                );
                Ok(report)
            }
            Err(err) => {
                error!(%err, "consistency check failed");
                Err(err)
            }
        }
    }
}
