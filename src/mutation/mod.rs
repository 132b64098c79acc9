//! # Mutation
//!
//! Perturbs one child in place. The [`mutate`] gate applies the selected
//! operator with probability `mu_rate` and counts every application in a
//! [`MutationCounter`].
//!
//! The real-valued operators read their amplitudes and clamp range from
//! [`MutationParams`]. `float_LS` also re-evaluates the chromosome, so the
//! dispatch takes the evaluation callback as an explicit argument.

pub mod bit;
pub mod float;

pub use bit::{simple_invert, simple_random, swap};
pub use float::{float_gauss_pert, float_local_search, float_random, float_rnd_pert};

use crate::chromosome::Chromosome;
use crate::error::Result;
use crate::registry::{OperatorChoice, Registry};
use crate::rng::RandomNumberGenerator;

/// Built-in mutation operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MutationKind {
    SimpleInvert,
    SimpleRandom,
    Swap,
    FloatRandom,
    FloatRndPert,
    FloatLocalSearch,
    FloatGaussPert,
}

pub const MUTATION_OPERATORS: &[(&str, MutationKind)] = &[
    ("simple_invert", MutationKind::SimpleInvert),
    ("simple_random", MutationKind::SimpleRandom),
    ("swap", MutationKind::Swap),
    ("float_random", MutationKind::FloatRandom),
    ("float_rnd_pert", MutationKind::FloatRndPert),
    ("float_LS", MutationKind::FloatLocalSearch),
    ("float_gauss_pert", MutationKind::FloatGaussPert),
];

/// User mutation: perturbs the chromosome in place.
pub type MutationFn =
    dyn Fn(&mut Chromosome, &MutationParams, &mut RandomNumberGenerator) -> Result<()> + Send + Sync;

pub type Mutation = OperatorChoice<MutationKind, MutationFn>;

pub fn registry() -> Registry<MutationKind, MutationFn> {
    Registry::new("mutation", MUTATION_OPERATORS)
}

/// Tuning shared by the real-valued operators.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MutationParams {
    /// Amplitude of the uniform and gaussian perturbations.
    pub pert_range: f64,
    /// Inclusive clamp range for real genes.
    pub real_bounds: (f64, f64),
    /// Gene that `float_rnd_pert` redraws outright instead of perturbing.
    pub pert_reset_gene: Option<usize>,
    /// Upper bound on `float_LS` sweeps.
    pub local_search_sweeps: usize,
    pub minimize: bool,
}

impl Default for MutationParams {
    fn default() -> Self {
        Self {
            pert_range: 0.1,
            real_bounds: (0.0, 1.0),
            pert_reset_gene: Some(6),
            local_search_sweeps: 1000,
            minimize: true,
        }
    }
}

impl MutationParams {
    pub(crate) fn clamp(&self, value: f64) -> f64 {
        value.clamp(self.real_bounds.0, self.real_bounds.1)
    }
}

/// Mutations applied in the current trial and over the whole run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MutationCounter {
    pub num_mut: usize,
    pub tot_mut: usize,
}

impl MutationCounter {
    pub fn start_trial(&mut self) {
        self.num_mut = 0;
    }

    fn record(&mut self) {
        self.num_mut += 1;
        self.tot_mut += 1;
    }
}

/// Picks a gene in `[idx_min, len)`, or `None` when that range is empty.
pub(crate) fn pick_gene(chrom: &Chromosome, rng: &mut RandomNumberGenerator) -> Option<usize> {
    let len = chrom.len();
    if chrom.idx_min() >= len {
        return None;
    }
    Some(rng.dom(chrom.idx_min(), len - 1))
}

/// Applies a built-in operator unconditionally.
pub fn apply_builtin(
    kind: MutationKind,
    chrom: &mut Chromosome,
    params: &MutationParams,
    evaluate: &mut dyn FnMut(&mut Chromosome) -> Result<()>,
    rng: &mut RandomNumberGenerator,
) -> Result<()> {
    match kind {
        MutationKind::SimpleInvert => simple_invert(chrom, rng),
        MutationKind::SimpleRandom => simple_random(chrom, rng),
        MutationKind::Swap => swap(chrom, rng),
        MutationKind::FloatRandom => float_random(chrom, params, rng),
        MutationKind::FloatRndPert => float_rnd_pert(chrom, params, rng),
        MutationKind::FloatGaussPert => float_gauss_pert(chrom, params, rng),
        MutationKind::FloatLocalSearch => {
            float_local_search(chrom, params, evaluate, rng)?;
        }
    }
    Ok(())
}

/// Mutates `chrom` with probability `rate`. Returns whether it was mutated.
pub fn mutate(
    mutation: &Mutation,
    rate: f64,
    chrom: &mut Chromosome,
    params: &MutationParams,
    counter: &mut MutationCounter,
    evaluate: &mut dyn FnMut(&mut Chromosome) -> Result<()>,
    rng: &mut RandomNumberGenerator,
) -> Result<bool> {
    if rng.frac() >= rate {
        return Ok(false);
    }
    match mutation {
        OperatorChoice::Builtin(kind) => apply_builtin(*kind, chrom, params, evaluate, rng)?,
        OperatorChoice::Custom(f) => f(chrom, params, rng)?,
    }
    counter.record();
    Ok(true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    fn no_eval() -> impl FnMut(&mut Chromosome) -> Result<()> {
        |_: &mut Chromosome| Ok(())
    }

    #[test]
    fn test_zero_rate_never_mutates() {
        let swap = registry().select("swap").unwrap();
        let params = MutationParams::default();
        let mut counter = MutationCounter::default();
        let mut rng = RandomNumberGenerator::from_seed(11);
        let mut chrom = Chromosome::from_genes(vec![1.0, 2.0, 3.0, 4.0, 5.0]).unwrap();
        let mut eval = no_eval();
        for _ in 0..1000 {
            counter.start_trial();
            let hit = mutate(&swap, 0.0, &mut chrom, &params, &mut counter, &mut eval, &mut rng)
                .unwrap();
            assert!(!hit);
        }
        assert_eq!(counter.num_mut, 0);
        assert_eq!(counter.tot_mut, 0);
        assert_eq!(chrom.genes(), &[1.0, 2.0, 3.0, 4.0, 5.0]);
    }

    #[test]
    fn test_full_rate_counts_every_application() {
        let invert = registry().select("simple_invert").unwrap();
        let params = MutationParams::default();
        let mut counter = MutationCounter::default();
        let mut rng = RandomNumberGenerator::from_seed(11);
        let mut chrom = Chromosome::new(8).unwrap();
        let mut eval = no_eval();
        for _ in 0..3 {
            counter.start_trial();
            for _ in 0..2 {
                mutate(&invert, 1.0, &mut chrom, &params, &mut counter, &mut eval, &mut rng)
                    .unwrap();
            }
        }
        assert_eq!(counter.num_mut, 2);
        assert_eq!(counter.tot_mut, 6);
    }

    #[test]
    fn test_float_ls_name_is_case_sensitive_exact() {
        let registry = registry();
        assert!(matches!(
            registry.select("float_LS"),
            Ok(OperatorChoice::Builtin(MutationKind::FloatLocalSearch))
        ));
        // "float_r" is a prefix of both float_random and float_rnd_pert.
        assert!(registry.select("float_r").is_err());
    }

    #[test]
    fn test_custom_mutation() {
        let mut registry = registry();
        let zero_first: Arc<MutationFn> = Arc::new(
            |chrom: &mut Chromosome,
             _: &MutationParams,
             _: &mut RandomNumberGenerator|
             -> Result<()> {
                chrom.genes_mut()[0] = 0.0;
                Ok(())
            },
        );
        let custom = registry.set_user_function("zero_first", zero_first);
        let params = MutationParams::default();
        let mut counter = MutationCounter::default();
        let mut rng = RandomNumberGenerator::from_seed(2);
        let mut chrom = Chromosome::from_genes(vec![7.0, 8.0]).unwrap();
        let mut eval = no_eval();
        mutate(&custom, 1.0, &mut chrom, &params, &mut counter, &mut eval, &mut rng).unwrap();
        assert_eq!(chrom.genes(), &[0.0, 8.0]);
        assert_eq!(counter.tot_mut, 1);
    }

    #[test]
    fn test_pick_gene_respects_idx_min() {
        let mut chrom = Chromosome::new(6).unwrap();
        chrom.set_operator_range(4, 6).unwrap();
        let mut rng = RandomNumberGenerator::from_seed(8);
        for _ in 0..100 {
            let i = pick_gene(&chrom, &mut rng).unwrap();
            assert!((4..6).contains(&i));
        }
        chrom.set_operator_range(6, 6).unwrap();
        assert_eq!(pick_gene(&chrom, &mut rng), None);
    }
}
