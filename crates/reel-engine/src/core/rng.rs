//! Seedable random source for spin decisions.
//! Deterministic for a given seed, no OS entropy required (works on wasm32).

use rand::Rng;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

/// Generator owned by a `SlotMachine`.
pub type SlotRng = ChaCha8Rng;

/// Build a generator from a 64-bit seed.
pub fn seeded(seed: u64) -> SlotRng {
    ChaCha8Rng::seed_from_u64(seed)
}

/// Uniform draw in [0, 1).
pub fn unit<R: Rng + ?Sized>(rng: &mut R) -> f64 {
    rng.gen::<f64>()
}

/// Symmetric draw in [-window, window]. A non-positive window yields 0.
pub fn jitter<R: Rng + ?Sized>(rng: &mut R, window: f64) -> f64 {
    if window > 0.0 && window.is_finite() {
        rng.gen_range(-window..=window)
    } else {
        0.0
    }
}
