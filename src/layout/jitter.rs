use super::MAX_CHAOS_LEVEL;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

/// Source of the per-character offsets that make laid out text look hand-placed.
/// Offsets only move where a glyph is drawn, never the layout cursor.
pub trait Jitter {
    /// An offset in `[-bound(chaos_level), bound(chaos_level)]`
    fn offset(&mut self, chaos_level: u8) -> i32;
}

/// Largest offset, in pixels, a chaos level allows. Levels above
/// [MAX_CHAOS_LEVEL] are treated as the maximum.
pub fn bound(chaos_level: u8) -> i32 {
    chaos_level.min(MAX_CHAOS_LEVEL) as i32 * 2
}

/// Uniformly distributed integer offsets. Unseeded by default, so two renders of the
/// same text never look quite the same.
pub struct RandomJitter<R = ChaCha8Rng> {
    rng: R,
}

impl RandomJitter<ChaCha8Rng> {
    /// Seeded from the operating system
    pub fn from_os_rng() -> Self {
        RandomJitter {
            rng: ChaCha8Rng::from_os_rng(),
        }
    }

    /// Reproducible offsets, for tests and for regenerating a particular page
    pub fn seeded(seed: u64) -> Self {
        RandomJitter {
            rng: ChaCha8Rng::seed_from_u64(seed),
        }
    }
}

impl<R: Rng> Jitter for RandomJitter<R> {
    fn offset(&mut self, chaos_level: u8) -> i32 {
        let bound = bound(chaos_level);
        self.rng.random_range(-bound..=bound)
    }
}

/// Always zero; lays text out on a perfect grid
#[derive(Debug, Default, Clone, Copy)]
pub struct NoJitter;

impl Jitter for NoJitter {
    fn offset(&mut self, _chaos_level: u8) -> i32 {
        0
    }
}
