//! Random helpers over an injected, seedable source
//!
//! Gameplay never reaches for a global RNG; every draw goes through the
//! `GameRng` owned by the game state so a fixed seed fixes the sequence.

use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

/// The RNG type used throughout the simulation
pub type GameRng = Pcg32;

/// Build the game RNG from a seed
pub fn seeded(seed: u64) -> GameRng {
    Pcg32::seed_from_u64(seed)
}

/// Integer in `[min, max)`; returns `min` when the range is empty
pub fn random_int<R: Rng + ?Sized>(rng: &mut R, min: i32, max: i32) -> i32 {
    if max <= min {
        return min;
    }
    rng.random_range(min..max)
}

/// Float in `[min, max)`
pub fn random_float<R: Rng + ?Sized>(rng: &mut R, min: f32, max: f32) -> f32 {
    min + rng.random::<f32>() * (max - min)
}

/// Uniform pick from a non-empty slice
pub fn random_choice<'a, T, R: Rng + ?Sized>(rng: &mut R, items: &'a [T]) -> &'a T {
    debug_assert!(!items.is_empty(), "random_choice on empty slice");
    &items[rng.random_range(0..items.len())]
}

/// Weighted pick: one uniform draw scaled to the total weight, then
/// cumulative subtraction. Rounding residue falls back to the first item.
pub fn weighted_random<T: Copy, R: Rng + ?Sized>(rng: &mut R, table: &[(T, f32)]) -> T {
    debug_assert!(!table.is_empty(), "weighted_random on empty table");
    let total: f32 = table.iter().map(|(_, w)| w).sum();
    let roll = rng.random::<f32>() * total;
    pick_weighted(table, roll)
}

/// Deterministic half of `weighted_random`, exposed for table tests
pub fn pick_weighted<T: Copy>(table: &[(T, f32)], mut roll: f32) -> T {
    for &(item, weight) in table {
        roll -= weight;
        if roll <= 0.0 {
            return item;
        }
    }
    table[0].0
}
