//! 32-bit xorshift key stream.
//!
//! This is Marsaglia's "xor" generator (p. 4 of "Xorshift RNGs") with the
//! output masked to 31 bits. The masked output doubles as the next state, so a
//! stream is fully determined by its seed.

use std::time::{SystemTime, UNIX_EPOCH};

const OUTPUT_MASK: u32 = 0x7fff_ffff;

/// Applies one step of the recurrence to `r`.
#[inline]
pub fn next(mut r: u32) -> u32 {
    r ^= r << 13;
    r ^= r >> 17;
    r ^= r << 5;
    r & OUTPUT_MASK
}

/// Stateful wrapper over [`next`].
#[derive(Debug, Clone)]
pub struct Xorshift {
    state: u32,
}

impl Xorshift {
    /// Creates a generator from `seed`.
    ///
    /// Zero is a fixed point of the recurrence, so it is replaced by 1.
    pub fn new(seed: u32) -> Self {
        let seed = seed & OUTPUT_MASK;
        Self {
            state: if seed == 0 { 1 } else { seed },
        }
    }

    /// Seeds from the sub-second part of the wall clock.
    pub fn from_time() -> Self {
        let nanos = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.subsec_nanos())
            .unwrap_or(1);
        Self::new(nanos)
    }

    /// Seeds from the wall clock, mixed with a stream index so that workers
    /// started in the same nanosecond still diverge.
    pub fn for_worker(index: usize) -> Self {
        let base = Self::from_time().state;
        Self::new(base ^ next((index as u32).wrapping_add(1)))
    }

    /// Advances the stream and returns the new 31-bit value.
    #[inline]
    pub fn next_u31(&mut self) -> u32 {
        self.state = next(self.state);
        self.state
    }

    /// Current state without advancing.
    pub fn state(&self) -> u32 {
        self.state
    }
}
