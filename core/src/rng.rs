//! Deterministic random number generation.
//!
//! RULE: Nothing in the simulation may call any platform RNG.
//! All randomness flows through GameRng handles derived from the
//! seed passed to `simulate_game` (or the slate seed for bulk runs).
//!
//! Each stream gets its own generator, seeded deterministically from
//! (master_seed XOR stream_index * golden ratio). This means:
//!   - A game's play stream never shares state with any other game.
//!   - Forced-outcome retries and slate games get reproducible seeds.

use rand::{RngCore, SeedableRng};
use rand_pcg::Pcg64Mcg;

const GOLDEN_GAMMA: u64 = 0x9e37_79b9_7f4a_7c15;

/// A named, deterministic RNG handle threaded through the resolver
/// and state machine as an explicit parameter.
pub struct GameRng {
    pub name: &'static str,
    inner: Pcg64Mcg,
}

impl GameRng {
    /// Create a generator from a seed and a stable stream index.
    /// The index must never change once assigned.
    pub fn new(master_seed: u64, stream_index: u64) -> Self {
        Self {
            name: "unnamed",
            inner: Pcg64Mcg::seed_from_u64(derive_seed(master_seed, stream_index)),
        }
    }

    pub fn with_name(mut self, name: &'static str) -> Self {
        self.name = name;
        self
    }

    /// Roll a float in [0.0, 1.0).
    pub fn next_f64(&mut self) -> f64 {
        let bits = self.inner.next_u64();
        (bits >> 11) as f64 * (1.0 / (1u64 << 53) as f64)
    }

    /// Draw a raw u64 (full range).
    pub fn next_u64(&mut self) -> u64 {
        self.inner.next_u64()
    }

    /// Roll a u64 in [0, n).
    pub fn next_u64_below(&mut self, n: u64) -> u64 {
        assert!(n > 0, "n must be > 0");
        self.inner.next_u64() % n
    }

    /// Roll an integer in [lo, hi] (inclusive).
    pub fn range_u32(&mut self, lo: u32, hi: u32) -> u32 {
        if hi <= lo {
            return lo;
        }
        lo + self.next_u64_below(u64::from(hi - lo) + 1) as u32
    }

    /// Bernoulli trial: returns true with probability p.
    pub fn chance(&mut self, p: f64) -> bool {
        self.next_f64() < p
    }

    /// Sample a normal distribution (Box-Muller, one draw discarded).
    pub fn normal(&mut self, mean: f64, std_dev: f64) -> f64 {
        let u1 = self.next_f64().max(1e-12);
        let u2 = self.next_f64();
        let z = (-2.0 * u1.ln()).sqrt() * (std::f64::consts::TAU * u2).cos();
        mean + z * std_dev
    }

    /// Weighted draw over `weights`, returning the chosen index.
    ///
    /// Walks the cumulative weights in slice order, so equal weights are
    /// resolved by enumeration order rather than re-randomised. Negative
    /// and NaN weights count as zero. An all-zero table returns 0.
    pub fn weighted_index(&mut self, weights: &[f64]) -> usize {
        let total: f64 = weights.iter().map(|w| w.max(0.0)).sum();
        if total <= 0.0 || !total.is_finite() {
            return 0;
        }
        let mut roll = self.next_f64() * total;
        for (i, w) in weights.iter().enumerate() {
            let w = w.max(0.0);
            if roll < w {
                return i;
            }
            roll -= w;
        }
        // Float residue lands on the last positive weight.
        weights.iter().rposition(|w| *w > 0.0).unwrap_or(0)
    }
}

/// Derive a child seed for a stream.
pub fn derive_seed(master_seed: u64, stream_index: u64) -> u64 {
    master_seed ^ stream_index.wrapping_mul(GOLDEN_GAMMA)
}

/// Seed derivation for everything keyed off one master seed.
#[derive(Debug, Clone, Copy)]
pub struct SeedBank {
    master_seed: u64,
}

impl SeedBank {
    pub fn new(master_seed: u64) -> Self {
        Self { master_seed }
    }

    pub fn master_seed(&self) -> u64 {
        self.master_seed
    }

    /// The generator for one slot of this seed.
    pub fn rng(&self, slot: StreamSlot) -> GameRng {
        GameRng::new(self.master_seed, slot as u64).with_name(slot.name())
    }

    /// A child seed for the `n`th item of a slot (retry attempt, slate game).
    pub fn child_seed(&self, slot: StreamSlot, n: u64) -> u64 {
        let slot_seed = derive_seed(self.master_seed, slot as u64);
        derive_seed(slot_seed, n.wrapping_add(1))
    }
}

/// Stable stream slot assignments.
/// NEVER reorder or remove entries. Only append.
/// Reordering changes every derived seed.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[repr(u64)]
pub enum StreamSlot {
    Play = 0,
    ForcedAttempt = 1,
    Slate = 2,
    Fixture = 3,
}

impl StreamSlot {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Play => "play",
            Self::ForcedAttempt => "forced_attempt",
            Self::Slate => "slate",
            Self::Fixture => "fixture",
        }
    }
}
