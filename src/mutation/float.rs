//! Real-valued mutations.
//!
//! All of them work on one gene drawn from `[idx_min, len)` except
//! [`float_local_search`], which sweeps the whole eligible range.

use super::{pick_gene, MutationParams};
use crate::chromosome::Chromosome;
use crate::error::Result;
use crate::rng::RandomNumberGenerator;

const GAUSS_SPAN: usize = 10922;
const GAUSS_SCALE: f64 = 1.0 / 32767.0;

fn draw_in_bounds(params: &MutationParams, rng: &mut RandomNumberGenerator) -> f64 {
    let (lo, hi) = params.real_bounds;
    rng.uniform(lo, hi)
}

/// Uniform draw in `[-1, 1)`, scaled by `pert_range`.
fn uniform_delta(params: &MutationParams, rng: &mut RandomNumberGenerator) -> f64 {
    params.pert_range * (1.0 - 2.0 * rng.frac())
}

/// Replaces one gene with a fresh draw from `real_bounds`.
pub fn float_random(chrom: &mut Chromosome, params: &MutationParams, rng: &mut RandomNumberGenerator) {
    if let Some(i) = pick_gene(chrom, rng) {
        chrom.genes_mut()[i] = draw_in_bounds(params, rng);
    }
}

/// Moves one gene by a uniform delta of at most `pert_range`, then clamps it
/// to `real_bounds`.
///
/// When the drawn gene is `pert_reset_gene` it is redrawn from the bounds
/// instead of perturbed.
pub fn float_rnd_pert(
    chrom: &mut Chromosome,
    params: &MutationParams,
    rng: &mut RandomNumberGenerator,
) {
    let Some(i) = pick_gene(chrom, rng) else {
        return;
    };
    let value = if params.pert_reset_gene == Some(i) {
        draw_in_bounds(params, rng)
    } else {
        chrom.genes()[i] + uniform_delta(params, rng)
    };
    chrom.genes_mut()[i] = params.clamp(value);
}

/// Adds approximately normal noise to one gene.
///
/// The noise is a sum of three uniform integers rescaled to roughly
/// `[-1, 1]` and multiplied by `pert_range`. The result is not clamped.
pub fn float_gauss_pert(
    chrom: &mut Chromosome,
    params: &MutationParams,
    rng: &mut RandomNumberGenerator,
) {
    let sum: usize = (0..3).map(|_| rng.dom(0, GAUSS_SPAN)).sum();
    let pert = (2.0 * sum as f64 - 3.0 * GAUSS_SPAN as f64) * GAUSS_SCALE;
    if let Some(i) = pick_gene(chrom, rng) {
        chrom.genes_mut()[i] += params.pert_range * pert;
    }
}

/// Hill climbing over the genes in `[idx_min, len)`.
///
/// Each sweep perturbs every eligible gene in turn, re-evaluates, and undoes
/// the step if fitness got worse. Sweeps repeat while they improve fitness,
/// up to `local_search_sweeps`. Returns the number of sweeps run.
///
/// # Errors
///
/// Propagates any failure of `evaluate`.
pub fn float_local_search(
    chrom: &mut Chromosome,
    params: &MutationParams,
    evaluate: &mut dyn FnMut(&mut Chromosome) -> Result<()>,
    rng: &mut RandomNumberGenerator,
) -> Result<usize> {
    let (start, end) = (chrom.idx_min(), chrom.len());
    if start >= end {
        return Ok(0);
    }
    let worse = |new: f64, old: f64| if params.minimize { new > old } else { new < old };

    evaluate(chrom)?;
    let mut sweeps = 0;
    while sweeps < params.local_search_sweeps {
        sweeps += 1;
        let sweep_start = chrom.fitness();
        for i in start..end {
            let prev_fitness = chrom.fitness();
            let prev_value = chrom.genes()[i];
            chrom.genes_mut()[i] = params.clamp(prev_value + uniform_delta(params, rng));
            evaluate(chrom)?;
            if worse(chrom.fitness(), prev_fitness) {
                chrom.genes_mut()[i] = prev_value;
                chrom.set_fitness(prev_fitness);
            }
        }
        let improved = worse(sweep_start, chrom.fitness());
        if !improved {
            break;
        }
    }
    Ok(sweeps)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params() -> MutationParams {
        MutationParams::default()
    }

    #[test]
    fn test_float_random_within_bounds() {
        let mut rng = RandomNumberGenerator::from_seed(6);
        let p = MutationParams {
            real_bounds: (-2.0, 2.0),
            ..params()
        };
        let mut chrom = Chromosome::new(4).unwrap();
        for _ in 0..200 {
            float_random(&mut chrom, &p, &mut rng);
            assert!(chrom.genes().iter().all(|g| (-2.0..2.0).contains(g)));
        }
    }

    #[test]
    fn test_float_random_classic_range() {
        let mut rng = RandomNumberGenerator::from_seed(11);
        let p = MutationParams {
            real_bounds: (-1.0, 1.0),
            ..params()
        };
        let mut chrom = Chromosome::new(3).unwrap();
        let mut negative = false;
        for _ in 0..200 {
            float_random(&mut chrom, &p, &mut rng);
            assert!(chrom.genes().iter().all(|g| (-1.0..1.0).contains(g)));
            negative |= chrom.genes().iter().any(|g| *g < 0.0);
        }
        assert!(negative);
    }

    #[test]
    fn test_float_rnd_pert_is_small_and_clamped() {
        let mut rng = RandomNumberGenerator::from_seed(6);
        let p = MutationParams {
            pert_reset_gene: None,
            ..params()
        };
        let mut chrom = Chromosome::from_genes(vec![0.5; 3]).unwrap();
        float_rnd_pert(&mut chrom, &p, &mut rng);
        let moved: Vec<f64> = chrom.genes().iter().map(|g| (g - 0.5).abs()).collect();
        assert!(moved.iter().all(|d| *d <= 0.1 + 1e-12));

        let mut edge = Chromosome::from_genes(vec![1.0; 3]).unwrap();
        for _ in 0..100 {
            float_rnd_pert(&mut edge, &p, &mut rng);
        }
        assert!(edge.genes().iter().all(|g| (0.0..=1.0).contains(g)));
    }

    #[test]
    fn test_float_rnd_pert_reset_gene() {
        let mut rng = RandomNumberGenerator::from_seed(9);
        let p = MutationParams {
            pert_range: 0.0,
            pert_reset_gene: Some(2),
            ..params()
        };
        let mut chrom = Chromosome::from_genes(vec![0.5; 3]).unwrap();
        chrom.set_operator_range(2, 3).unwrap();
        float_rnd_pert(&mut chrom, &p, &mut rng);
        // With no perturbation amplitude only a redraw can move the gene.
        assert_ne!(chrom.genes()[2], 0.5);
        assert_eq!(&chrom.genes()[..2], &[0.5, 0.5]);
    }

    #[test]
    fn test_gauss_pert_bounded_by_range() {
        let mut rng = RandomNumberGenerator::from_seed(6);
        let p = params();
        for _ in 0..200 {
            let mut chrom = Chromosome::from_genes(vec![0.0]).unwrap();
            float_gauss_pert(&mut chrom, &p, &mut rng);
            assert!(chrom.genes()[0].abs() <= p.pert_range + 1e-9);
        }
    }

    #[test]
    fn test_local_search_never_worsens() {
        let mut rng = RandomNumberGenerator::from_seed(12);
        let p = params();
        let mut evaluate = |c: &mut Chromosome| -> Result<()> {
            let f: f64 = c.genes().iter().map(|g| (g - 0.2) * (g - 0.2)).sum();
            c.set_fitness(f);
            Ok(())
        };
        let mut chrom = Chromosome::from_genes(vec![0.9; 20]).unwrap();
        evaluate(&mut chrom).unwrap();
        let before = chrom.fitness();
        let sweeps = float_local_search(&mut chrom, &p, &mut evaluate, &mut rng).unwrap();
        assert!(sweeps >= 1 && sweeps <= p.local_search_sweeps);
        assert!(chrom.fitness() < before);
        assert!(chrom.genes().iter().all(|g| (0.0..=1.0).contains(g)));
    }

    #[test]
    fn test_local_search_sweep_cap() {
        let mut rng = RandomNumberGenerator::from_seed(12);
        let p = MutationParams {
            local_search_sweeps: 2,
            ..params()
        };
        let mut calls = 0;
        let mut evaluate = |c: &mut Chromosome| -> Result<()> {
            calls += 1;
            c.set_fitness(-(calls as f64));
            Ok(())
        };
        let mut chrom = Chromosome::from_genes(vec![0.5, 0.5]).unwrap();
        let sweeps = float_local_search(&mut chrom, &p, &mut evaluate, &mut rng).unwrap();
        assert_eq!(sweeps, 2);
        // One baseline evaluation plus one per gene per sweep.
        assert_eq!(calls, 5);
    }
}
