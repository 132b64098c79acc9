use crate::error::{GeneticError, Result};
use crate::pool::Pool;
use crate::rng::RandomNumberGenerator;

/// Linear rank-biased selection.
///
/// Sorts the pool best first unless `ranked` says it already is, then draws
/// a rank from the linear distribution with parameter `bias`:
///
/// ```text
/// index = size * (bias - sqrt(bias^2 - 4 (bias - 1) u)) / (2 (bias - 1))
/// ```
///
/// With `rank_once` the sort is remembered in `ranked` until the caller
/// starts a new cycle.
///
/// # Errors
///
/// Returns `GeneticError::Configuration` if `bias` is not greater than 1.
pub fn rank_biased(
    pool: &mut Pool,
    bias: f64,
    rank_once: bool,
    ranked: &mut bool,
    rng: &mut RandomNumberGenerator,
) -> Result<usize> {
    if pool.is_empty() {
        return Err(GeneticError::EmptyPopulation);
    }
    if bias <= 1.0 {
        return Err(GeneticError::Configuration(format!(
            "rank_biased selection needs bias > 1, got {}",
            bias
        )));
    }
    if !*ranked {
        pool.sort()?;
        if rank_once {
            *ranked = true;
        }
    }

    let size = pool.len();
    let u = rng.frac();
    let rank = size as f64 * (bias - (bias * bias - 4.0 * (bias - 1.0) * u).sqrt())
        / (2.0 * (bias - 1.0));
    Ok((rank as usize).min(size - 1))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::tests::pool_with_fitness;

    #[test]
    fn test_favors_top_ranks() {
        let mut pool = pool_with_fitness(&[5.0, 3.0, 1.0, 4.0, 2.0], true);
        let mut rng = RandomNumberGenerator::from_seed(42);
        let mut ranked = false;
        let mut counts = [0usize; 5];
        for _ in 0..20_000 {
            counts[rank_biased(&mut pool, 1.8, false, &mut ranked, &mut rng).unwrap()] += 1;
        }
        assert_eq!(pool.get(0).unwrap().fitness(), 1.0);
        assert!(counts.windows(2).all(|w| w[0] > w[1]), "counts = {:?}", counts);
    }

    #[test]
    fn test_rank_once_flag() {
        let mut pool = pool_with_fitness(&[3.0, 1.0, 2.0], true);
        let mut rng = RandomNumberGenerator::from_seed(1);
        let mut ranked = false;

        rank_biased(&mut pool, 1.5, true, &mut ranked, &mut rng).unwrap();
        assert!(ranked);

        // Disturb the order; a ranked pool is not sorted again.
        pool.swap(0, 2).unwrap();
        rank_biased(&mut pool, 1.5, true, &mut ranked, &mut rng).unwrap();
        assert_eq!(pool.get(0).unwrap().fitness(), 3.0);

        ranked = false;
        rank_biased(&mut pool, 1.5, true, &mut ranked, &mut rng).unwrap();
        assert_eq!(pool.get(0).unwrap().fitness(), 1.0);
    }

    #[test]
    fn test_bias_must_exceed_one() {
        let mut pool = pool_with_fitness(&[1.0, 2.0], true);
        let mut rng = RandomNumberGenerator::from_seed(1);
        let mut ranked = false;
        assert!(matches!(
            rank_biased(&mut pool, 1.0, false, &mut ranked, &mut rng),
            Err(GeneticError::Configuration(_))
        ));
    }
}
