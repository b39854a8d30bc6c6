// Deterministic pseudo-random number generator for the colony simulation.
//
// Implements xoshiro256++ (Blackman & Vigna, 2019) seeded through SplitMix64.
// Hand-rolled rather than pulled from an external RNG crate so that a given
// seed produces the same citizen names, attribute rolls, and texture ids on
// every platform and compiler version.
//
// The sim owns one `ColonyRng` per colony; it serializes with the save so a
// reloaded colony continues the same random stream.
//
// **Critical constraint: determinism.** Every method must produce identical
// output given the same prior state. No floating-point arithmetic in the core
// generator, no stdlib PRNG, no OS entropy.

use serde::{Deserialize, Serialize};

/// Xoshiro256++ PRNG — the simulation's sole source of randomness.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ColonyRng {
    state: [u64; 4],
}

impl ColonyRng {
    /// Create a PRNG seeded from a `u64`, expanding the seed into the
    /// 256-bit internal state via SplitMix64. Equal seeds give equal streams.
    pub fn new(seed: u64) -> Self {
        let mut sm = seed;
        Self {
            state: [
                splitmix64(&mut sm),
                splitmix64(&mut sm),
                splitmix64(&mut sm),
                splitmix64(&mut sm),
            ],
        }
    }

    /// Next `u64` in the sequence.
    pub fn next_u64(&mut self) -> u64 {
        let result = (self.state[0].wrapping_add(self.state[3]))
            .rotate_left(23)
            .wrapping_add(self.state[0]);

        let t = self.state[1] << 17;

        self.state[2] ^= self.state[0];
        self.state[3] ^= self.state[1];
        self.state[1] ^= self.state[2];
        self.state[0] ^= self.state[3];

        self.state[2] ^= t;
        self.state[3] = self.state[3].rotate_left(45);

        result
    }

    /// Next `u32` (upper half of the next `u64`).
    pub fn next_u32(&mut self) -> u32 {
        (self.next_u64() >> 32) as u32
    }

    /// Uniform `f64` in `[0, 1)` built from the top 53 bits.
    pub fn next_f64(&mut self) -> f64 {
        (self.next_u64() >> 11) as f64 * (1.0 / (1u64 << 53) as f64)
    }

    /// Uniform `usize` in `[low, high)`. `high` must be greater than `low`.
    pub fn range_usize(&mut self, low: usize, high: usize) -> usize {
        debug_assert!(high > low);
        let span = (high - low) as u64;
        low + (self.next_u64() % span) as usize
    }

    /// Uniform `i32` in `[low, high)`. `high` must be greater than `low`.
    pub fn range_i32(&mut self, low: i32, high: i32) -> i32 {
        debug_assert!(high > low);
        let span = (high - low) as u64;
        low + (self.next_u64() % span) as i32
    }

    /// Bernoulli trial: `true` with probability `p`.
    pub fn chance(&mut self, p: f64) -> bool {
        self.next_f64() < p
    }
}

/// SplitMix64 step — used only for seeding the main generator.
fn splitmix64(state: &mut u64) -> u64 {
    *state = state.wrapping_add(0x9E37_79B9_7F4A_7C15);
    let mut z = *state;
    z = (z ^ (z >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
    z ^ (z >> 31)
}
