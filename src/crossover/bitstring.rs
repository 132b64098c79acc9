use super::{check_homozygous, fit_child, points};
use crate::chromosome::Chromosome;
use crate::error::{GeneticError, Result};
use crate::rng::RandomNumberGenerator;

/// Single-point crossover with a random cut in `[0, len - 2]`.
pub fn simple(
    p1: &Chromosome,
    p2: &Chromosome,
    c1: &mut Chromosome,
    c2: &mut Chromosome,
    rng: &mut RandomNumberGenerator,
) -> Result<()> {
    let len = check_homozygous(p1, p2)?;
    let xp = points::point(0, len - 1, rng);
    simple_at(p1, p2, c1, c2, xp)
}

/// Genes up to and including `xp` come from the child's own parent, the rest
/// from the other parent.
pub fn simple_at(
    p1: &Chromosome,
    p2: &Chromosome,
    c1: &mut Chromosome,
    c2: &mut Chromosome,
    xp: usize,
) -> Result<()> {
    let len = check_homozygous(p1, p2)?;
    if xp >= len {
        return Err(GeneticError::IndexOutOfBounds {
            name: "xp",
            index: xp,
            length: len,
        });
    }
    fit_child(c1, len)?;
    fit_child(c2, len)?;

    let (a, b) = (p1.genes(), p2.genes());
    let g1 = c1.genes_mut();
    g1[..=xp].copy_from_slice(&a[..=xp]);
    g1[xp + 1..].copy_from_slice(&b[xp + 1..]);
    let g2 = c2.genes_mut();
    g2[..=xp].copy_from_slice(&b[..=xp]);
    g2[xp + 1..].copy_from_slice(&a[xp + 1..]);

    c1.set_crossover_points(Some(xp), None);
    c2.set_crossover_points(Some(xp), None);
    Ok(())
}

/// Each gene comes from either parent on a fair coin flip. The children are
/// complementary.
pub fn uniform(
    p1: &Chromosome,
    p2: &Chromosome,
    c1: &mut Chromosome,
    c2: &mut Chromosome,
    rng: &mut RandomNumberGenerator,
) -> Result<()> {
    let len = check_homozygous(p1, p2)?;
    let mask: Vec<bool> = (0..len).map(|_| rng.bit()).collect();
    uniform_with_mask(p1, p2, c1, c2, &mask)
}

/// Child 1 takes `p1[i]` where `mask[i]` is set and `p2[i]` elsewhere;
/// child 2 takes the other gene.
pub fn uniform_with_mask(
    p1: &Chromosome,
    p2: &Chromosome,
    c1: &mut Chromosome,
    c2: &mut Chromosome,
    mask: &[bool],
) -> Result<()> {
    let len = check_homozygous(p1, p2)?;
    if mask.len() != len {
        return Err(GeneticError::InvalidLength(mask.len()));
    }
    fit_child(c1, len)?;
    fit_child(c2, len)?;

    for (i, &keep) in mask.iter().enumerate() {
        let (own, other) = if keep {
            (p1.genes()[i], p2.genes()[i])
        } else {
            (p2.genes()[i], p1.genes()[i])
        };
        c1.genes_mut()[i] = own;
        c2.genes_mut()[i] = other;
    }
    Ok(())
}
