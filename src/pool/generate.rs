use super::Pool;
use crate::chromosome::{Chromosome, DataType};
use crate::error::{GeneticError, Result};
use crate::rng::RandomNumberGenerator;

impl Pool {
    /// Appends `count` random chromosomes of length `len`.
    ///
    /// Bits are 0 or 1, integers lie in `[0, len]`, permutations are shuffles
    /// of `1..=len` and reals are an integer part in `[0, len)` plus a fraction.
    pub fn random(
        &mut self,
        count: usize,
        len: usize,
        datatype: DataType,
        rng: &mut RandomNumberGenerator,
    ) -> Result<()> {
        self.fill_random(count, len, datatype, rng, false)
    }

    /// Like [`Pool::random`], except reals are drawn from `[0, 1)`.
    pub fn random_unit(
        &mut self,
        count: usize,
        len: usize,
        datatype: DataType,
        rng: &mut RandomNumberGenerator,
    ) -> Result<()> {
        self.fill_random(count, len, datatype, rng, true)
    }

    fn fill_random(
        &mut self,
        count: usize,
        len: usize,
        datatype: DataType,
        rng: &mut RandomNumberGenerator,
        unit_reals: bool,
    ) -> Result<()> {
        if len == 0 {
            return Err(GeneticError::InvalidLength(len));
        }
        if self.size + count > self.capacity() {
            self.resize(self.size + count);
        }
        for _ in 0..count {
            let mut chrom = Chromosome::new(len)?;
            let genes = chrom.genes_mut();
            match datatype {
                DataType::Bit => {
                    for g in genes.iter_mut() {
                        *g = if rng.bit() { 1.0 } else { 0.0 };
                    }
                }
                DataType::Integer => {
                    for g in genes.iter_mut() {
                        *g = rng.dom(0, len) as f64;
                    }
                }
                DataType::Permutation => {
                    for (i, g) in genes.iter_mut().enumerate() {
                        *g = (i + 1) as f64;
                    }
                    // Fisher-Yates
                    for i in (1..len).rev() {
                        let j = rng.dom(0, i);
                        genes.swap(i, j);
                    }
                }
                DataType::Real if unit_reals => {
                    for g in genes.iter_mut() {
                        *g = rng.frac();
                    }
                }
                DataType::Real => {
                    for g in genes.iter_mut() {
                        *g = rng.dom(0, len - 1) as f64 + rng.frac();
                    }
                }
            }
            self.append(chrom);
        }
        Ok(())
    }
}
