//! Fixed-length get/put workloads driven by the xorshift stream.

use std::fmt;
use std::str::FromStr;

use crate::cache::AnyCache;
use crate::error::ConfigError;
use crate::xorshift::Xorshift;

/// Default number of operations per invocation.
pub const DEFAULT_OPS: usize = 1_000_000;

/// What one operation unit does.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Shape {
    /// `get(r & mask)`.
    Get,
    /// `put(r & mask, r)`.
    Put,
    /// A put followed by a get on a fresh key.
    PutGet,
}

impl Shape {
    pub const ALL: [Shape; 3] = [Shape::Get, Shape::Put, Shape::PutGet];

    pub fn name(&self) -> &'static str {
        match self {
            Shape::Get => "get",
            Shape::Put => "put",
            Shape::PutGet => "putget",
        }
    }

    /// Whether the shape mutates the cache.
    pub fn writes(&self) -> bool {
        !matches!(self, Shape::Get)
    }

    /// Runs `ops` units against `cache` and returns a checksum.
    ///
    /// `Get` only needs shared access; the others need `&mut`.
    pub fn run<C>(self, cache: &mut C, rng: &mut Xorshift, ops: usize, mask: u32) -> u64
    where
        C: AnyCache + ?Sized,
    {
        match self {
            Shape::Get => run_get(cache, rng, ops, mask),
            Shape::Put => run_put(cache, rng, ops, mask),
            Shape::PutGet => run_put_get(cache, rng, ops, mask),
        }
    }
}

impl fmt::Display for Shape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Shape {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Shape::ALL
            .into_iter()
            .find(|shape| shape.name().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| ConfigError::UnknownShape(s.to_string()))
    }
}

/// Whether an invocation runs on the caller or on every pool worker.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Threading {
    Single,
    Multi,
}

impl Threading {
    pub fn name(&self) -> &'static str {
        match self {
            Threading::Single => "single",
            Threading::Multi => "multi",
        }
    }
}

impl fmt::Display for Threading {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Threading {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "single" => Ok(Threading::Single),
            "multi" => Ok(Threading::Multi),
            _ => Err(ConfigError::UnknownThreading(s.to_string())),
        }
    }
}

/// Reads `ops` keys; returns the wrapping sum of the values read.
pub fn run_get<C>(cache: &C, rng: &mut Xorshift, ops: usize, mask: u32) -> u64
where
    C: AnyCache + ?Sized,
{
    let mut sum = 0u64;
    for _ in 0..ops {
        let r = rng.next_u31();
        sum = sum.wrapping_add(u64::from(cache.get(r & mask)));
    }
    sum
}

/// Writes `ops` keys, each mapped to the unmasked generator output, so that
/// `value & mask == key` holds for everything written.
pub fn run_put<C>(cache: &mut C, rng: &mut Xorshift, ops: usize, mask: u32) -> u64
where
    C: AnyCache + ?Sized,
{
    let mut sum = 0u64;
    for _ in 0..ops {
        let r = rng.next_u31();
        cache.put(r & mask, r);
        sum = sum.wrapping_add(u64::from(r));
    }
    sum
}

/// Interleaves a put and a get per unit, each on its own generator step.
pub fn run_put_get<C>(cache: &mut C, rng: &mut Xorshift, ops: usize, mask: u32) -> u64
where
    C: AnyCache + ?Sized,
{
    let mut sum = 0u64;
    for _ in 0..ops {
        let r = rng.next_u31();
        cache.put(r & mask, r);
        let r = rng.next_u31();
        sum = sum.wrapping_add(u64::from(cache.get(r & mask)));
    }
    sum
}
