//! Deterministic randomness for probability rolls.
//!
//! Passive mitigation, extraction attempts and early status removal are all
//! chance-based. Rolls are derived from a seed built out of the session seed,
//! the current tick, the player and a per-roll context value, so a replay of
//! the same events produces the same outcomes.

/// RNG oracle for deterministic random number generation.
pub trait RngOracle: Send + Sync {
    /// Generate a random u32 value from a seed.
    fn next_u32(&self, seed: u64) -> u32;

    /// Uniform value in `[0, 1)`.
    fn unit(&self, seed: u64) -> f64 {
        f64::from(self.next_u32(seed)) / (f64::from(u32::MAX) + 1.0)
    }

    /// Returns true with the given probability. Probabilities are clamped to `[0, 1]`.
    fn roll_chance(&self, seed: u64, probability: f64) -> bool {
        let p = probability.clamp(0.0, 1.0);
        if p <= 0.0 {
            return false;
        }
        if p >= 1.0 {
            return true;
        }
        self.unit(seed) < p
    }
}

/// PCG-XSH-RR generator: 64-bit state, 32-bit output.
#[derive(Clone, Copy, Debug, Default)]
pub struct PcgRng;

impl PcgRng {
    const MULTIPLIER: u64 = 6364136223846793005;
    const INCREMENT: u64 = 1442695040888963407;

    #[inline]
    fn pcg_step(state: u64) -> u64 {
        state
            .wrapping_mul(Self::MULTIPLIER)
            .wrapping_add(Self::INCREMENT)
    }

    #[inline]
    fn pcg_output(state: u64) -> u32 {
        let xorshifted = (((state >> 18) ^ state) >> 27) as u32;
        let rot = (state >> 59) as u32;
        xorshifted.rotate_right(rot)
    }
}

impl RngOracle for PcgRng {
    fn next_u32(&self, seed: u64) -> u32 {
        Self::pcg_output(Self::pcg_step(seed))
    }
}

/// Fixed-outcome oracle, handy for forcing a roll in tests and debug tools.
#[derive(Clone, Copy, Debug)]
pub struct FixedRng(pub f64);

impl RngOracle for FixedRng {
    fn next_u32(&self, _seed: u64) -> u32 {
        (self.0.clamp(0.0, 1.0) * f64::from(u32::MAX)) as u32
    }

    fn unit(&self, _seed: u64) -> f64 {
        self.0.clamp(0.0, 0.999_999)
    }
}

/// Well-known context values so independent rolls within one tick never share a seed.
pub mod roll {
    pub const EXTRACTION: u32 = 1;
    pub const STATUS_CANCEL: u32 = 2;
    pub const STATUS_EARLY_REMOVAL: u32 = 3;
}

/// Compute a deterministic seed from the session seed, tick, player and roll context.
pub fn compute_seed(session_seed: u64, tick: u64, player: u64, context: u32) -> u64 {
    let mut hash = session_seed;
    hash ^= tick.wrapping_mul(0x9e3779b97f4a7c15);
    hash ^= player.wrapping_mul(0x517cc1b727220a95);
    hash ^= u64::from(context).wrapping_mul(0x85ebca6b);

    hash ^= hash >> 33;
    hash = hash.wrapping_mul(0xff51afd7ed558ccd);
    hash ^= hash >> 33;

    hash
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pcg_is_deterministic() {
        let rng = PcgRng;
        assert_eq!(rng.next_u32(42), rng.next_u32(42));
    }

    #[test]
    fn unit_is_in_range() {
        let rng = PcgRng;
        for seed in 0..500 {
            let v = rng.unit(compute_seed(7, seed, 1, roll::EXTRACTION));
            assert!((0.0..1.0).contains(&v));
        }
    }

    #[test]
    fn chance_extremes() {
        let rng = PcgRng;
        assert!(!rng.roll_chance(1, 0.0));
        assert!(rng.roll_chance(1, 1.0));
        assert!(FixedRng(0.0).roll_chance(9, 0.01));
        assert!(!FixedRng(1.0).roll_chance(9, 0.99));
    }

    #[test]
    fn contexts_produce_distinct_seeds() {
        let a = compute_seed(1, 100, 5, roll::STATUS_CANCEL);
        let b = compute_seed(1, 100, 5, roll::STATUS_EARLY_REMOVAL);
        assert_ne!(a, b);
    }
}
