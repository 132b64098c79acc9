use super::pick_gene;
use crate::chromosome::Chromosome;
use crate::rng::RandomNumberGenerator;

/// Flips one gene in `[idx_min, len)` between 0 and 1.
pub fn simple_invert(chrom: &mut Chromosome, rng: &mut RandomNumberGenerator) {
    if let Some(i) = pick_gene(chrom, rng) {
        let g = &mut chrom.genes_mut()[i];
        *g = if *g != 0.0 { 0.0 } else { 1.0 };
    }
}

/// Redraws one gene as a fair bit.
pub fn simple_random(chrom: &mut Chromosome, rng: &mut RandomNumberGenerator) {
    if let Some(i) = pick_gene(chrom, rng) {
        chrom.genes_mut()[i] = if rng.bit() { 1.0 } else { 0.0 };
    }
}

/// Exchanges two genes. Both positions are drawn independently, so they may
/// coincide.
pub fn swap(chrom: &mut Chromosome, rng: &mut RandomNumberGenerator) {
    if let (Some(i), Some(j)) = (pick_gene(chrom, rng), pick_gene(chrom, rng)) {
        chrom.genes_mut().swap(i, j);
    }
}
