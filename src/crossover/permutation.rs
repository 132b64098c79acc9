//! Order-based crossovers for permutation chromosomes.
//!
//! Every operator builds child 1 from (`p1` as own parent, `p2` as other) and
//! child 2 the same way with the roles swapped. The per-child builders work
//! on gene slices; the repair and fill loops are bounded by the chromosome
//! length and report `InvalidState` if the parents are not permutations of
//! the same alleles.

use super::{check_homozygous, fit_child, points};
use crate::chromosome::{Chromosome, Gene};
use crate::error::{GeneticError, Result};
use crate::rng::RandomNumberGenerator;

fn check_point(name: &'static str, index: usize, length: usize) -> Result<()> {
    if index >= length {
        return Err(GeneticError::IndexOutOfBounds {
            name,
            index,
            length,
        });
    }
    Ok(())
}

fn check_pair(xp1: usize, xp2: usize, len: usize) -> Result<()> {
    check_point("xp1", xp1, len)?;
    check_point("xp2", xp2, len)?;
    if xp1 > xp2 {
        return Err(GeneticError::InvalidState(format!(
            "crossover points out of order: {} > {}",
            xp1, xp2
        )));
    }
    Ok(())
}

fn prepare(
    p1: &Chromosome,
    p2: &Chromosome,
    c1: &mut Chromosome,
    c2: &mut Chromosome,
) -> Result<usize> {
    let len = check_homozygous(p1, p2)?;
    fit_child(c1, len)?;
    fit_child(c2, len)?;
    Ok(len)
}

fn not_a_permutation(operator: &str) -> GeneticError {
    GeneticError::InvalidState(format!(
        "{}: parents are not permutations of the same alleles",
        operator
    ))
}

// ---------------------------------------------------------------------------
// order1
// ---------------------------------------------------------------------------

/// Order crossover with two random (possibly equal) cut points.
pub fn order1(
    p1: &Chromosome,
    p2: &Chromosome,
    c1: &mut Chromosome,
    c2: &mut Chromosome,
    rng: &mut RandomNumberGenerator,
) -> Result<()> {
    let len = check_homozygous(p1, p2)?;
    let (xp1, xp2) = points::two_points(false, 0, len, rng)?;
    order1_at(p1, p2, c1, c2, xp1, xp2)
}

/// Order crossover on the inclusive segment `[xp1, xp2]`.
///
/// The segment is inherited from the own parent in place. The remaining
/// positions, starting right after `xp2` and wrapping around, are filled with
/// the other parent's alleles in the order they appear from `xp2 + 1` on,
/// skipping alleles already in the segment.
///
/// ```rust
/// use genpool::chromosome::Chromosome;
/// use genpool::crossover::order1_at;
///
/// let p1 = Chromosome::from_genes(vec![1.0, 2.0, 3.0, 4.0, 5.0]).unwrap();
/// let p2 = Chromosome::from_genes(vec![5.0, 4.0, 3.0, 2.0, 1.0]).unwrap();
/// let mut c1 = Chromosome::new(5).unwrap();
/// let mut c2 = Chromosome::new(5).unwrap();
///
/// order1_at(&p1, &p2, &mut c1, &mut c2, 1, 3).unwrap();
/// assert_eq!(c1.genes(), &[5.0, 2.0, 3.0, 4.0, 1.0]);
/// ```
pub fn order1_at(
    p1: &Chromosome,
    p2: &Chromosome,
    c1: &mut Chromosome,
    c2: &mut Chromosome,
    xp1: usize,
    xp2: usize,
) -> Result<()> {
    let len = prepare(p1, p2, c1, c2)?;
    check_pair(xp1, xp2, len)?;
    order1_child(p1.genes(), p2.genes(), xp1, xp2, c1.genes_mut())?;
    order1_child(p2.genes(), p1.genes(), xp1, xp2, c2.genes_mut())?;
    c1.set_crossover_points(Some(xp1), Some(xp2));
    c2.set_crossover_points(Some(xp1), Some(xp2));
    Ok(())
}

fn order1_child(
    own: &[Gene],
    other: &[Gene],
    xp1: usize,
    xp2: usize,
    child: &mut [Gene],
) -> Result<()> {
    let n = own.len();
    let segment = &own[xp1..=xp2];
    child[xp1..=xp2].copy_from_slice(segment);

    let remaining = n - segment.len();
    let mut filled = 0;
    let donors = (1..=n)
        .map(|k| other[(xp2 + k) % n])
        .filter(|allele| !segment.contains(allele));
    for allele in donors {
        if filled == remaining {
            return Err(not_a_permutation("order1"));
        }
        child[(xp2 + 1 + filled) % n] = allele;
        filled += 1;
    }
    if filled != remaining {
        return Err(not_a_permutation("order1"));
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// order2
// ---------------------------------------------------------------------------

/// Order-based crossover on four distinct random positions.
pub fn order2(
    p1: &Chromosome,
    p2: &Chromosome,
    c1: &mut Chromosome,
    c2: &mut Chromosome,
    rng: &mut RandomNumberGenerator,
) -> Result<()> {
    let len = check_homozygous(p1, p2)?;
    let xp = points::four_points(true, 0, len, rng)?;
    order2_at(p1, p2, c1, c2, xp)
}

/// Each child starts as a copy of its own parent; the alleles at the four
/// landmark positions are then rewritten in the order those alleles appear
/// in the other parent.
pub fn order2_at(
    p1: &Chromosome,
    p2: &Chromosome,
    c1: &mut Chromosome,
    c2: &mut Chromosome,
    xp: [usize; 4],
) -> Result<()> {
    let len = prepare(p1, p2, c1, c2)?;
    for (k, &x) in xp.iter().enumerate() {
        check_point("xp", x, len)?;
        if xp[..k].contains(&x) {
            return Err(GeneticError::InvalidState(format!(
                "order2 landmark {} repeated",
                x
            )));
        }
    }
    order2_child(p1.genes(), p2.genes(), &xp, c1.genes_mut())?;
    order2_child(p2.genes(), p1.genes(), &xp, c2.genes_mut())?;
    c1.set_crossover_points(Some(xp[0]), Some(xp[1]));
    c2.set_crossover_points(Some(xp[2]), Some(xp[3]));
    Ok(())
}

fn order2_child(own: &[Gene], other: &[Gene], xp: &[usize], child: &mut [Gene]) -> Result<()> {
    child.copy_from_slice(own);
    let landmarks: Vec<Gene> = xp.iter().map(|&x| own[x]).collect();
    let ordered: Vec<Gene> = other
        .iter()
        .copied()
        .filter(|allele| landmarks.contains(allele))
        .collect();
    if ordered.len() != xp.len() {
        return Err(not_a_permutation("order2"));
    }
    for (&x, allele) in xp.iter().zip(ordered) {
        child[x] = allele;
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// position
// ---------------------------------------------------------------------------

/// Position-based crossover on four random (possibly repeated) positions.
pub fn position(
    p1: &Chromosome,
    p2: &Chromosome,
    c1: &mut Chromosome,
    c2: &mut Chromosome,
    rng: &mut RandomNumberGenerator,
) -> Result<()> {
    let len = check_homozygous(p1, p2)?;
    let xp = points::four_points(false, 0, len, rng)?;
    position_at(p1, p2, c1, c2, xp)
}

/// The positions in `xp` keep the own parent's alleles. The other positions
/// are filled left to right with the other parent's alleles in order,
/// skipping those already fixed.
pub fn position_at(
    p1: &Chromosome,
    p2: &Chromosome,
    c1: &mut Chromosome,
    c2: &mut Chromosome,
    xp: [usize; 4],
) -> Result<()> {
    let len = prepare(p1, p2, c1, c2)?;
    for &x in &xp {
        check_point("xp", x, len)?;
    }
    position_child(p1.genes(), p2.genes(), &xp, c1.genes_mut())?;
    position_child(p2.genes(), p1.genes(), &xp, c2.genes_mut())?;
    c1.set_crossover_points(Some(xp[0]), Some(xp[1]));
    c2.set_crossover_points(Some(xp[2]), Some(xp[3]));
    Ok(())
}

fn position_child(own: &[Gene], other: &[Gene], xp: &[usize], child: &mut [Gene]) -> Result<()> {
    let n = own.len();
    let fixed: Vec<Gene> = xp.iter().map(|&x| own[x]).collect();
    for &x in xp {
        child[x] = own[x];
    }

    let mut j = 0;
    for &allele in other.iter().filter(|a| !fixed.contains(a)) {
        while xp.contains(&j) {
            j += 1;
        }
        if j >= n {
            return Err(not_a_permutation("position"));
        }
        child[j] = allele;
        j += 1;
    }
    while xp.contains(&j) {
        j += 1;
    }
    if j != n {
        return Err(not_a_permutation("position"));
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// cycle
// ---------------------------------------------------------------------------

/// Cycle crossover starting from a random position.
pub fn cycle(
    p1: &Chromosome,
    p2: &Chromosome,
    c1: &mut Chromosome,
    c2: &mut Chromosome,
    rng: &mut RandomNumberGenerator,
) -> Result<()> {
    let len = check_homozygous(p1, p2)?;
    let xp = points::point(0, len, rng);
    cycle_at(p1, p2, c1, c2, xp)
}

/// The cycle through `xp` is inherited from the own parent and every other
/// position from the other parent.
pub fn cycle_at(
    p1: &Chromosome,
    p2: &Chromosome,
    c1: &mut Chromosome,
    c2: &mut Chromosome,
    xp: usize,
) -> Result<()> {
    let len = prepare(p1, p2, c1, c2)?;
    check_point("xp", xp, len)?;
    cycle_child(p1.genes(), p2.genes(), xp, c1.genes_mut())?;
    cycle_child(p2.genes(), p1.genes(), xp, c2.genes_mut())?;
    c1.set_crossover_points(Some(xp), None);
    c2.set_crossover_points(Some(xp), None);
    Ok(())
}

fn cycle_child(own: &[Gene], other: &[Gene], xp: usize, child: &mut [Gene]) -> Result<()> {
    let n = own.len();
    child.copy_from_slice(other);
    let mut i = xp;
    // A cycle visits each position at most once.
    for _ in 0..n {
        child[i] = own[i];
        i = own
            .iter()
            .position(|a| *a == other[i])
            .ok_or_else(|| not_a_permutation("cycle"))?;
        if i == xp {
            return Ok(());
        }
    }
    Err(not_a_permutation("cycle"))
}

// ---------------------------------------------------------------------------
// pmx
// ---------------------------------------------------------------------------

/// Partially mapped crossover with two random (possibly equal) cut points.
pub fn pmx(
    p1: &Chromosome,
    p2: &Chromosome,
    c1: &mut Chromosome,
    c2: &mut Chromosome,
    rng: &mut RandomNumberGenerator,
) -> Result<()> {
    let len = check_homozygous(p1, p2)?;
    let (xp1, xp2) = points::two_points(false, 0, len, rng)?;
    pmx_at(p1, p2, c1, c2, xp1, xp2)
}

/// The segment `[xp1, xp2]` is swapped between the parents. Outside genes
/// come from the own parent and are repaired through the segment mapping
/// until no conflict is left.
pub fn pmx_at(
    p1: &Chromosome,
    p2: &Chromosome,
    c1: &mut Chromosome,
    c2: &mut Chromosome,
    xp1: usize,
    xp2: usize,
) -> Result<()> {
    let len = prepare(p1, p2, c1, c2)?;
    check_pair(xp1, xp2, len)?;
    pmx_child(p1.genes(), p2.genes(), xp1, xp2, c1.genes_mut())?;
    pmx_child(p2.genes(), p1.genes(), xp1, xp2, c2.genes_mut())?;
    c1.set_crossover_points(Some(xp1), Some(xp2));
    c2.set_crossover_points(Some(xp1), Some(xp2));
    Ok(())
}

fn pmx_child(
    own: &[Gene],
    other: &[Gene],
    xp1: usize,
    xp2: usize,
    child: &mut [Gene],
) -> Result<()> {
    let n = own.len();
    child.copy_from_slice(own);
    child[xp1..=xp2].copy_from_slice(&other[xp1..=xp2]);

    for i in (0..xp1).chain(xp2 + 1..n) {
        let mut hops = 0;
        while let Some(offset) = child[xp1..=xp2].iter().position(|a| *a == child[i]) {
            hops += 1;
            if hops > n {
                return Err(not_a_permutation("pmx"));
            }
            child[i] = own[xp1 + offset];
        }
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// uox
// ---------------------------------------------------------------------------

/// Uniform order crossover with a random mask shared by both children.
pub fn uox(
    p1: &Chromosome,
    p2: &Chromosome,
    c1: &mut Chromosome,
    c2: &mut Chromosome,
    rng: &mut RandomNumberGenerator,
) -> Result<()> {
    let len = check_homozygous(p1, p2)?;
    let mask: Vec<bool> = (0..len).map(|_| rng.bit()).collect();
    uox_at(p1, p2, c1, c2, &mask)
}

/// Positions where `mask` is set keep the own parent's allele. The holes are
/// filled left to right with the other parent's alleles in order, skipping
/// any already present.
pub fn uox_at(
    p1: &Chromosome,
    p2: &Chromosome,
    c1: &mut Chromosome,
    c2: &mut Chromosome,
    mask: &[bool],
) -> Result<()> {
    let len = prepare(p1, p2, c1, c2)?;
    if mask.len() != len {
        return Err(GeneticError::InvalidLength(mask.len()));
    }
    uox_child(p1.genes(), p2.genes(), mask, c1.genes_mut())?;
    uox_child(p2.genes(), p1.genes(), mask, c2.genes_mut())?;
    Ok(())
}

fn uox_child(own: &[Gene], other: &[Gene], mask: &[bool], child: &mut [Gene]) -> Result<()> {
    let mut slots: Vec<Option<Gene>> = own
        .iter()
        .zip(mask)
        .map(|(&allele, &keep)| keep.then_some(allele))
        .collect();

    let mut j = 0;
    for i in 0..slots.len() {
        if slots[i].is_some() {
            continue;
        }
        while j < other.len() && slots.contains(&Some(other[j])) {
            j += 1;
        }
        let allele = *other.get(j).ok_or_else(|| not_a_permutation("uox"))?;
        slots[i] = Some(allele);
    }

    for (g, slot) in child.iter_mut().zip(slots) {
        *g = slot.ok_or_else(|| not_a_permutation("uox"))?;
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// asexual
// ---------------------------------------------------------------------------

/// Two-opt: each child is its own parent with two distinct alleles in
/// `[idx_min, len)` swapped.
pub fn asexual(
    p1: &Chromosome,
    p2: &Chromosome,
    c1: &mut Chromosome,
    c2: &mut Chromosome,
    rng: &mut RandomNumberGenerator,
) -> Result<()> {
    for (parent, child) in [(p1, c1), (p2, c2)] {
        let points = if parent.idx_min() + 1 >= parent.len() {
            None
        } else {
            Some(points::two_points(true, parent.idx_min(), parent.len(), rng)?)
        };
        asexual_at(parent, child, points)?;
    }
    Ok(())
}

/// Copies `parent` into `child` and swaps the alleles at `points`. With
/// `idx_min >= len - 1` there is no room to swap and the child is a verbatim
/// copy.
pub fn asexual_at(
    parent: &Chromosome,
    child: &mut Chromosome,
    points: Option<(usize, usize)>,
) -> Result<()> {
    let len = parent.len();
    fit_child(child, len)?;
    child.genes_mut().copy_from_slice(parent.genes());
    child.set_operator_range(parent.idx_min(), parent.idx_max())?;

    if parent.idx_min() + 1 >= len {
        return Ok(());
    }
    if let Some((xp1, xp2)) = points {
        check_point("xp1", xp1, len)?;
        check_point("xp2", xp2, len)?;
        child.genes_mut().swap(xp1, xp2);
        child.set_crossover_points(Some(xp1), Some(xp2));
    }
    Ok(())
}
