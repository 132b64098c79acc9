use tracing::debug;

use super::Pool;
use crate::error::{GeneticError, Result};

/// Aggregate fitness statistics of a pool.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PoolStats {
    pub min: f64,
    pub max: f64,
    pub ave: f64,
    /// Sample variance.
    pub var: f64,
    pub dev: f64,
    /// Raw total after [`Pool::stats`], scaled total after [`Pool::update_ptf`].
    pub total_fitness: f64,
    pub min_index: Option<usize>,
    pub max_index: Option<usize>,
    pub best_index: Option<usize>,
    /// Fitness variance has collapsed across the pool.
    pub converged: bool,
}

impl Pool {
    /// Recomputes the statistics over the live members and reindexes them.
    ///
    /// Ties for min and max resolve to the first occurrence. The sample
    /// variance is forced to zero, and `converged` raised, when every fitness
    /// is identical or rounding drives it non-positive. A single member never
    /// reports convergence.
    ///
    /// # Errors
    ///
    /// Returns `GeneticError::InvalidState` if a live slot is empty.
    pub fn stats(&mut self) -> Result<PoolStats> {
        self.check_live()?;
        let size = self.size;
        let mut stats = PoolStats::default();

        if size == 0 {
            self.stats = stats;
            return Ok(stats);
        }

        let mut sum = 0.0;
        let mut sum_sq = 0.0;
        let mut min_index = 0;
        let mut max_index = 0;
        let mut no_variance = true;
        let mut prev: Option<f64> = None;

        for (i, slot) in self.slots[..size].iter_mut().enumerate() {
            let Some(chrom) = slot.as_mut() else {
                continue;
            };
            let f = chrom.fitness();
            if i == 0 {
                stats.min = f;
                stats.max = f;
            }
            if let Some(p) = prev {
                if p != f {
                    no_variance = false;
                }
            }
            if f < stats.min {
                stats.min = f;
                min_index = i;
            }
            if f > stats.max {
                stats.max = f;
                max_index = i;
            }
            sum += f;
            sum_sq += f * f;
            prev = Some(f);
            chrom.set_index(Some(i));
        }

        stats.ave = sum / size as f64;
        stats.total_fitness = sum;
        stats.min_index = Some(min_index);
        stats.max_index = Some(max_index);
        stats.best_index = Some(if self.minimize { min_index } else { max_index });

        if size > 1 {
            let var = (sum_sq - stats.ave * sum) / (size - 1) as f64;
            if no_variance || var <= 0.0 {
                stats.converged = true;
            } else {
                stats.var = var;
                stats.dev = var.sqrt();
            }
        }

        self.stats = stats;
        Ok(stats)
    }

    /// Recomputes every member's percent-of-total-fitness for roulette.
    ///
    /// `scale_factor` is raised until every `fitness + scale_factor` is
    /// positive, making the worst offender exactly 1.0, and is reset to zero
    /// once all fitness values are positive on their own. Returns whether the
    /// scale factor changed.
    ///
    /// When minimizing the weights are inverted and renormalized, so the ptf
    /// values of the pool always sum to 100.
    ///
    /// # Errors
    ///
    /// Returns `GeneticError::NumericDegeneracy` if a scaled fitness or a
    /// total is not positive, and `GeneticError::EmptyPopulation` for an
    /// empty pool.
    pub fn update_ptf(&mut self, scale_factor: &mut f64) -> Result<bool> {
        self.check_live()?;
        if self.size == 0 {
            return Err(GeneticError::EmptyPopulation);
        }
        let size = self.size;
        let mut changed = false;
        let mut all_positive = true;

        for chrom in self.slots[..size].iter().flatten() {
            let scaled = chrom.fitness() + *scale_factor;
            if scaled <= 0.0 {
                *scale_factor += 1.0 - scaled;
                changed = true;
            }
            if chrom.fitness() <= 0.0 {
                all_positive = false;
            }
        }
        if all_positive {
            if *scale_factor > 0.0 {
                changed = true;
            }
            *scale_factor = 0.0;
        }
        if changed {
            debug!(scale_factor = *scale_factor, "Scale factor changed");
        }

        let sf = *scale_factor;
        let total: f64 = self.slots[..size]
            .iter()
            .flatten()
            .map(|c| c.fitness() + sf)
            .sum();
        self.stats.total_fitness = total;
        if total <= 0.0 {
            return Err(GeneticError::NumericDegeneracy(format!(
                "total scaled fitness {} is not positive",
                total
            )));
        }

        if self.minimize {
            let mut inverted_total = 0.0;
            for chrom in self.slots[..size].iter_mut().flatten() {
                let scaled = chrom.fitness() + sf;
                if scaled <= 0.0 {
                    return Err(GeneticError::NumericDegeneracy(format!(
                        "fitness + scale = {} is not positive",
                        scaled
                    )));
                }
                let weight = total / scaled;
                chrom.set_ptf(weight);
                inverted_total += weight;
            }
            if inverted_total <= 0.0 {
                return Err(GeneticError::NumericDegeneracy(format!(
                    "renormalized total {} is not positive",
                    inverted_total
                )));
            }
            for chrom in self.slots[..size].iter_mut().flatten() {
                let ptf = 100.0 * chrom.ptf() / inverted_total;
                chrom.set_ptf(ptf);
            }
        } else {
            for chrom in self.slots[..size].iter_mut().flatten() {
                chrom.set_ptf(100.0 * (chrom.fitness() + sf) / total);
            }
        }

        Ok(changed)
    }
}
