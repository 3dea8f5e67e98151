//! Random sources for every stochastic decision in a battle.
//!
//! The engine never reaches for a global generator: a [`RandomSource`] is
//! injected into each [`Battle`](crate::Battle) and only its provided
//! primitives (Bernoulli trial, uniform draw, bounded Gaussian) are consumed.
//!
//! # Determinism
//!
//! [`PcgSource`] is seeded and serializable, so a caller that wants replayable
//! fights stores it alongside the battle blob. The engine itself only relies on
//! fresh draws; prior rounds are fixed by the already-applied event log.

use core::f64::consts::TAU;

/// Source of uniform draws plus the bounded-probability primitives built on it.
pub trait RandomSource {
    /// Draw a uniform value in `[0, 1)`.
    fn next_f64(&mut self) -> f64;

    /// Bernoulli trial: true with probability `p`.
    fn bernoulli(&mut self, p: f64) -> bool {
        if p <= 0.0 {
            return false;
        }
        self.next_f64() < p
    }

    /// Linear uniform draw in `[min, max]`.
    fn uniform(&mut self, min: f64, max: f64) -> f64 {
        let (lo, hi) = ordered(min, max);
        lo + (hi - lo) * self.next_f64()
    }

    /// Gaussian draw centred on the midpoint of `[min, max]`, redrawn until it
    /// falls inside the bounds.
    fn bounded_normal(&mut self, min: f64, max: f64) -> f64 {
        self.bounded_normal_within(min, max, DEFAULT_MAX_NORMAL_DRAWS)
    }

    /// Same as [`bounded_normal`](Self::bounded_normal) with an explicit cap on
    /// rejected draws. Once the cap is hit the midpoint is returned.
    fn bounded_normal_within(&mut self, min: f64, max: f64, max_draws: u32) -> f64 {
        if min == max {
            return min;
        }
        let (lo, hi) = ordered(min, max);
        let mean = (lo + hi) / 2.0;
        let sigma = (hi - lo) / 4.0;

        for _ in 0..max_draws {
            // Box-Muller; u1 in (0, 1] keeps ln() finite
            let u1 = 1.0 - self.next_f64();
            let u2 = self.next_f64();
            let z = (-2.0 * u1.ln()).sqrt() * (TAU * u2).cos();
            let value = mean + sigma * z;
            if (lo..=hi).contains(&value) {
                return value;
            }
        }

        tracing::warn!(min, max, max_draws, "bounded normal draw exhausted, using midpoint");
        mean
    }
}

/// Default cap on rejected draws when no battle configuration is at hand.
pub const DEFAULT_MAX_NORMAL_DRAWS: u32 = 256;

fn ordered(a: f64, b: f64) -> (f64, f64) {
    if a > b { (b, a) } else { (a, b) }
}

impl<R: RandomSource + ?Sized> RandomSource for &mut R {
    fn next_f64(&mut self) -> f64 {
        (**self).next_f64()
    }
}

/// PCG random number generator (Permuted Congruential Generator).
///
/// PCG-XSH-RR: 64-bit LCG state, 32-bit permuted output. Two outputs are
/// combined for each `f64` draw.
///
/// # Properties
///
/// - **Deterministic**: Same seed always produces same sequence
/// - **Small state**: Only 64 bits, cheap to persist with a save
///
/// # References
///
/// - PCG paper: <https://www.pcg-random.org/>
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PcgSource {
    state: u64,
}

impl PcgSource {
    /// PCG multiplier constant.
    const MULTIPLIER: u64 = 6364136223846793005;

    /// PCG increment constant.
    const INCREMENT: u64 = 1442695040888963407;

    /// Create a source from a seed.
    pub fn new(seed: u64) -> Self {
        let mut source = Self { state: 0 };
        source.step();
        source.state = source.state.wrapping_add(seed);
        source.step();
        source
    }

    /// Current internal state, for callers that persist the source.
    pub fn state(&self) -> u64 {
        self.state
    }

    /// Advance the LCG state by one step.
    #[inline]
    fn step(&mut self) {
        self.state = self
            .state
            .wrapping_mul(Self::MULTIPLIER)
            .wrapping_add(Self::INCREMENT);
    }

    /// XSH-RR output permutation of the pre-step state.
    #[inline]
    fn output(state: u64) -> u32 {
        let xorshifted = (((state >> 18) ^ state) >> 27) as u32;
        let rot = (state >> 59) as u32;
        xorshifted.rotate_right(rot)
    }

    pub fn next_u32(&mut self) -> u32 {
        let old = self.state;
        self.step();
        Self::output(old)
    }
}

impl RandomSource for PcgSource {
    fn next_f64(&mut self) -> f64 {
        let hi = u64::from(self.next_u32());
        let lo = u64::from(self.next_u32());
        // 53 significant bits
        let bits = ((hi << 32) | lo) >> 11;
        bits as f64 * (1.0 / (1u64 << 53) as f64)
    }
}

/// OS-seeded random source backed by `rand`'s standard generator.
///
/// This is the default for callers that do not need replayable fights.
#[cfg(feature = "std")]
#[derive(Clone, Debug)]
pub struct EntropySource {
    inner: rand::rngs::StdRng,
}

#[cfg(feature = "std")]
impl EntropySource {
    pub fn new() -> Self {
        use rand::SeedableRng;
        Self {
            inner: rand::rngs::StdRng::from_entropy(),
        }
    }
}

#[cfg(feature = "std")]
impl Default for EntropySource {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(feature = "std")]
impl RandomSource for EntropySource {
    fn next_f64(&mut self) -> f64 {
        use rand::Rng;
        self.inner.r#gen::<f64>()
    }
}

/// Scripted source that replays a fixed sequence of draws, cycling when
/// exhausted. An empty script always yields `0.5`.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct FixedSource {
    draws: Vec<f64>,
    cursor: usize,
}

impl FixedSource {
    pub fn new(draws: impl Into<Vec<f64>>) -> Self {
        Self {
            draws: draws.into(),
            cursor: 0,
        }
    }

    /// Number of draws consumed so far.
    pub fn consumed(&self) -> usize {
        self.cursor
    }
}

impl RandomSource for FixedSource {
    fn next_f64(&mut self) -> f64 {
        if self.draws.is_empty() {
            return 0.5;
        }
        let value = self.draws[self.cursor % self.draws.len()];
        self.cursor += 1;
        value
    }
}
