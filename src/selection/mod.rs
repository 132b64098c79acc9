//! # Selection
//!
//! Picks the slot of a parent in the old pool. Three built-in operators are
//! available (`uniform_random`, `roulette`, `rank_biased`) and a user closure
//! can be installed through the selection [`Registry`](crate::registry::Registry).
//!
//! Roulette and rank-biased selection carry state between calls: the fitness
//! scale factor and the "already ranked this cycle" flag. That state lives in
//! a [`SelectionState`] owned by the driver, so independent runs never share it.

pub mod rank;
pub mod roulette;
pub mod uniform;

pub use rank::rank_biased;
pub use roulette::roulette;
pub use uniform::uniform_random;

use crate::error::{GeneticError, Result};
use crate::pool::Pool;
use crate::registry::{OperatorChoice, Registry};
use crate::rng::RandomNumberGenerator;

/// Built-in selection operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SelectionKind {
    UniformRandom,
    Roulette,
    RankBiased,
}

pub const SELECTION_OPERATORS: &[(&str, SelectionKind)] = &[
    ("uniform_random", SelectionKind::UniformRandom),
    ("roulette", SelectionKind::Roulette),
    ("rank_biased", SelectionKind::RankBiased),
];

/// User selection: returns the slot of the chosen parent.
pub type SelectionFn = dyn Fn(&mut Pool, &mut RandomNumberGenerator) -> Result<usize> + Send + Sync;

pub type Selection = OperatorChoice<SelectionKind, SelectionFn>;

pub fn registry() -> Registry<SelectionKind, SelectionFn> {
    Registry::new("selection", SELECTION_OPERATORS)
}

/// State carried by the selection operators across calls within one run.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SelectionState {
    /// Offset added to every fitness so roulette weights stay positive.
    pub scale_factor: f64,
    /// The pool has been ranked and need not be sorted again this cycle.
    pub ranked: bool,
}

impl SelectionState {
    /// Forgets the ranking; call whenever the pool is regenerated.
    pub fn new_cycle(&mut self) {
        self.ranked = false;
    }
}

/// Runs `selection` against `pool`.
///
/// `bias` parameterizes rank-biased selection; `rank_once` keeps the ranking
/// for the rest of the cycle, which is only sound when replacement keeps the
/// pool ordered.
pub fn select(
    selection: &Selection,
    pool: &mut Pool,
    bias: f64,
    rank_once: bool,
    state: &mut SelectionState,
    rng: &mut RandomNumberGenerator,
) -> Result<usize> {
    if pool.is_empty() {
        return Err(GeneticError::EmptyPopulation);
    }
    let index = match selection {
        OperatorChoice::Builtin(SelectionKind::UniformRandom) => uniform_random(pool, rng)?,
        OperatorChoice::Builtin(SelectionKind::Roulette) => {
            roulette(pool, &mut state.scale_factor, rng)?
        }
        OperatorChoice::Builtin(SelectionKind::RankBiased) => {
            rank_biased(pool, bias, rank_once, &mut state.ranked, rng)?
        }
        OperatorChoice::Custom(f) => f(pool, rng)?,
    };
    if index >= pool.len() {
        return Err(GeneticError::IndexOutOfBounds {
            name: "selected index",
            index,
            length: pool.len(),
        });
    }
    Ok(index)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::tests::pool_with_fitness;
    use std::sync::Arc;

    #[test]
    fn test_dispatch_builtins() {
        let mut rng = RandomNumberGenerator::from_seed(1);
        let mut state = SelectionState::default();
        let registry = registry();
        for name in ["uniform", "roulette", "rank"] {
            let selection = registry.select(name).unwrap();
            let mut pool = pool_with_fitness(&[4.0, 1.0, 3.0, 2.0], true);
            for _ in 0..50 {
                let i = select(&selection, &mut pool, 1.8, false, &mut state, &mut rng).unwrap();
                assert!(i < 4);
            }
        }
    }

    #[test]
    fn test_custom_selection_is_bounds_checked() {
        let mut registry = registry();
        let always_last: Arc<SelectionFn> =
            Arc::new(|pool: &mut Pool, _: &mut RandomNumberGenerator| -> Result<usize> {
                Ok(pool.len() - 1)
            });
        let good = registry.set_user_function("last", always_last);
        let out_of_range: Arc<SelectionFn> =
            Arc::new(|pool: &mut Pool, _: &mut RandomNumberGenerator| -> Result<usize> {
                Ok(pool.len())
            });
        let bad = registry.set_user_function("past_end", out_of_range);

        let mut rng = RandomNumberGenerator::from_seed(1);
        let mut state = SelectionState::default();
        let mut pool = pool_with_fitness(&[1.0, 2.0, 3.0], true);
        assert_eq!(select(&good, &mut pool, 1.8, false, &mut state, &mut rng).unwrap(), 2);
        assert!(matches!(
            select(&bad, &mut pool, 1.8, false, &mut state, &mut rng),
            Err(GeneticError::IndexOutOfBounds { .. })
        ));
    }

    #[test]
    fn test_empty_pool() {
        let selection = registry().select("roulette").unwrap();
        let mut pool = Pool::with_capacity(2);
        let mut state = SelectionState::default();
        let mut rng = RandomNumberGenerator::from_seed(1);
        assert!(matches!(
            select(&selection, &mut pool, 1.8, false, &mut state, &mut rng),
            Err(GeneticError::EmptyPopulation)
        ));
    }
}
