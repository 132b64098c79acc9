//! Crossover point generation. Points are gene indices and always inclusive.

use crate::error::{GeneticError, Result};
use crate::rng::RandomNumberGenerator;

/// One point in `[lo, hi - 1]`, or `lo` when that range is empty.
pub fn point(lo: usize, hi: usize, rng: &mut RandomNumberGenerator) -> usize {
    rng.dom(lo, hi.saturating_sub(1))
}

fn check_room(unique: bool, needed: usize, lo: usize, hi: usize) -> Result<()> {
    if unique && hi.saturating_sub(lo) < needed {
        return Err(GeneticError::Configuration(format!(
            "cannot draw {} distinct crossover points from [{}, {})",
            needed, lo, hi
        )));
    }
    Ok(())
}

/// Two sorted points in `[lo, hi - 1]`, distinct when `unique` is set.
pub fn two_points(
    unique: bool,
    lo: usize,
    hi: usize,
    rng: &mut RandomNumberGenerator,
) -> Result<(usize, usize)> {
    check_room(unique, 2, lo, hi)?;
    let a = point(lo, hi, rng);
    let mut b = point(lo, hi, rng);
    while unique && b == a {
        b = point(lo, hi, rng);
    }
    Ok(if a > b { (b, a) } else { (a, b) })
}

/// Four sorted points in `[lo, hi - 1]`, pairwise distinct when `unique` is set.
pub fn four_points(
    unique: bool,
    lo: usize,
    hi: usize,
    rng: &mut RandomNumberGenerator,
) -> Result<[usize; 4]> {
    check_room(unique, 4, lo, hi)?;
    let mut xp = [0usize; 4];
    for k in 0..4 {
        xp[k] = point(lo, hi, rng);
        while unique && xp[..k].contains(&xp[k]) {
            xp[k] = point(lo, hi, rng);
        }
    }

    // Five-comparator sorting network.
    for (i, j) in [(0, 1), (2, 3), (0, 2), (1, 3), (1, 2)] {
        if xp[i] > xp[j] {
            xp.swap(i, j);
        }
    }
    Ok(xp)
}
