use crate::error::{GeneticError, Result};
use crate::pool::Pool;
use crate::rng::RandomNumberGenerator;

/// Fitness-proportional selection.
///
/// Refreshes every member's ptf first, which may move `scale_factor`. When
/// minimizing, the wheel spins over the ptf values (summing to 100) so lower
/// fitness gets the larger share. When maximizing, each member's weight is
/// the scaled fitness `fitness + scale_factor`, not the raw fitness.
///
/// The selected slot is the first one whose cumulative weight reaches the
/// spin.
///
/// # Errors
///
/// Propagates `GeneticError::NumericDegeneracy` from the ptf update.
pub fn roulette(
    pool: &mut Pool,
    scale_factor: &mut f64,
    rng: &mut RandomNumberGenerator,
) -> Result<usize> {
    if pool.is_empty() {
        return Err(GeneticError::EmptyPopulation);
    }
    pool.update_ptf(scale_factor)?;

    let sf = *scale_factor;
    let (spin, weights): (f64, Vec<f64>) = if pool.minimize() {
        (rng.frac() * 100.0, pool.iter().map(|c| c.ptf()).collect())
    } else {
        (
            rng.frac() * pool.last_stats().total_fitness,
            pool.iter().map(|c| c.fitness() + sf).collect(),
        )
    };

    let mut cumulative = 0.0;
    let mut i = 0;
    while cumulative < spin && i < weights.len() {
        cumulative += weights[i];
        i += 1;
    }
    Ok(i.saturating_sub(1))
}
