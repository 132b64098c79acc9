use crate::error::{GeneticError, Result};
use crate::pool::Pool;
use crate::rng::RandomNumberGenerator;

/// Any live member, with equal probability.
pub fn uniform_random(pool: &Pool, rng: &mut RandomNumberGenerator) -> Result<usize> {
    if pool.is_empty() {
        return Err(GeneticError::EmptyPopulation);
    }
    Ok(rng.dom(0, pool.len() - 1))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::tests::pool_with_fitness;

    #[test]
    fn test_uniform_covers_pool() {
        let pool = pool_with_fitness(&[1.0, 2.0, 3.0, 4.0, 5.0], true);
        let mut rng = RandomNumberGenerator::from_seed(42);
        let mut counts = [0usize; 5];
        for _ in 0..5000 {
            counts[uniform_random(&pool, &mut rng).unwrap()] += 1;
        }
        for c in counts {
            assert!((800..1200).contains(&c), "counts = {:?}", counts);
        }
    }
}
