//! # Crossover
//!
//! Produces two children from two parents. `simple` and `uniform` work on
//! bit, integer and real strings. Every other built-in is an order-based
//! operator for permutations and keeps both children valid permutations of
//! `1..=len` whenever the parents are.
//!
//! Each operator comes in two forms: one that draws its crossover points from
//! the run's generator, and an `_at` form that takes the points explicitly.
//!
//! The [`crossover`] dispatch resets the children, tags them with the
//! parents' pool slots and, with probability `1 - x_rate`, clones the parents
//! instead of applying the operator.

pub mod bitstring;
pub mod permutation;
pub mod points;

pub use bitstring::{simple, simple_at, uniform, uniform_with_mask};
pub use permutation::{
    asexual, asexual_at, cycle, cycle_at, order1, order1_at, order2, order2_at, pmx, pmx_at,
    position, position_at, uox, uox_at,
};

use crate::chromosome::{Chromosome, DataType};
use crate::error::{GeneticError, Result};
use crate::registry::{OperatorChoice, Registry};
use crate::rng::RandomNumberGenerator;

/// Built-in crossover operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CrossoverKind {
    Simple,
    Uniform,
    Order1,
    Order2,
    Position,
    Cycle,
    Pmx,
    /// Uniform order crossover.
    Uox,
    /// Relative order crossover. Listed but not implemented.
    Rox,
    Asexual,
}

impl CrossoverKind {
    pub fn name(&self) -> &'static str {
        match self {
            CrossoverKind::Simple => "simple",
            CrossoverKind::Uniform => "uniform",
            CrossoverKind::Order1 => "order1",
            CrossoverKind::Order2 => "order2",
            CrossoverKind::Position => "position",
            CrossoverKind::Cycle => "cycle",
            CrossoverKind::Pmx => "pmx",
            CrossoverKind::Uox => "uox",
            CrossoverKind::Rox => "rox",
            CrossoverKind::Asexual => "asexual",
        }
    }

    /// Whether the operator is defined for `datatype`.
    pub fn supports(&self, datatype: DataType) -> bool {
        match self {
            CrossoverKind::Simple | CrossoverKind::Uniform => datatype != DataType::Permutation,
            _ => datatype == DataType::Permutation,
        }
    }

    /// Smallest chromosome length the operator can work on.
    pub fn min_length(&self) -> usize {
        match self {
            CrossoverKind::Order2 => 4,
            _ => 1,
        }
    }
}

pub const CROSSOVER_OPERATORS: &[(&str, CrossoverKind)] = &[
    ("simple", CrossoverKind::Simple),
    ("uniform", CrossoverKind::Uniform),
    ("order1", CrossoverKind::Order1),
    ("order2", CrossoverKind::Order2),
    ("position", CrossoverKind::Position),
    ("cycle", CrossoverKind::Cycle),
    ("pmx", CrossoverKind::Pmx),
    ("uox", CrossoverKind::Uox),
    ("rox", CrossoverKind::Rox),
    ("asexual", CrossoverKind::Asexual),
];

/// User crossover: fills both children from both parents.
pub type CrossoverFn = dyn Fn(
        &Chromosome,
        &Chromosome,
        &mut Chromosome,
        &mut Chromosome,
        &mut RandomNumberGenerator,
    ) -> Result<()>
    + Send
    + Sync;

pub type Crossover = OperatorChoice<CrossoverKind, CrossoverFn>;

pub fn registry() -> Registry<CrossoverKind, CrossoverFn> {
    Registry::new("crossover", CROSSOVER_OPERATORS)
}

/// Fails unless both parents have the same length.
pub(crate) fn check_homozygous(p1: &Chromosome, p2: &Chromosome) -> Result<usize> {
    if p1.len() != p2.len() {
        return Err(GeneticError::HeterozygousParents(p1.len(), p2.len()));
    }
    Ok(p1.len())
}

/// Gives `child` exactly `len` genes, resetting it if it had to change.
pub(crate) fn fit_child(child: &mut Chromosome, len: usize) -> Result<()> {
    if child.len() != len {
        child.resize(len)?;
    }
    Ok(())
}

fn init_children(
    p1: &Chromosome,
    p2: &Chromosome,
    c1: &mut Chromosome,
    c2: &mut Chromosome,
) -> Result<()> {
    for (child, parent) in [(&mut *c1, p1), (&mut *c2, p2)] {
        fit_child(child, parent.len())?;
        child.reset();
        child.set_parents(p1.index(), p2.index());
    }
    Ok(())
}

/// Applies a built-in operator without the rate gate.
pub fn apply_builtin(
    kind: CrossoverKind,
    datatype: DataType,
    parents: (&Chromosome, &Chromosome),
    children: (&mut Chromosome, &mut Chromosome),
    rng: &mut RandomNumberGenerator,
) -> Result<()> {
    if !kind.supports(datatype) {
        return Err(GeneticError::IncompatibleDatatype {
            operator: kind.name(),
            datatype,
        });
    }
    let (p1, p2) = parents;
    let (c1, c2) = children;
    match kind {
        CrossoverKind::Simple => simple(p1, p2, c1, c2, rng),
        CrossoverKind::Uniform => uniform(p1, p2, c1, c2, rng),
        CrossoverKind::Order1 => order1(p1, p2, c1, c2, rng),
        CrossoverKind::Order2 => order2(p1, p2, c1, c2, rng),
        CrossoverKind::Position => position(p1, p2, c1, c2, rng),
        CrossoverKind::Cycle => cycle(p1, p2, c1, c2, rng),
        CrossoverKind::Pmx => pmx(p1, p2, c1, c2, rng),
        CrossoverKind::Uox => uox(p1, p2, c1, c2, rng),
        CrossoverKind::Rox => Err(GeneticError::NotImplemented(
            "relative order crossover (rox)".to_string(),
        )),
        CrossoverKind::Asexual => asexual(p1, p2, c1, c2, rng),
    }
}

/// Runs one crossover: resets and tags the children, then either clones
/// the parents (with probability `1 - x_rate`) or applies `crossover`.
pub fn crossover(
    crossover: &Crossover,
    datatype: DataType,
    x_rate: f64,
    parents: (&Chromosome, &Chromosome),
    children: (&mut Chromosome, &mut Chromosome),
    rng: &mut RandomNumberGenerator,
) -> Result<()> {
    let (p1, p2) = parents;
    let (c1, c2) = children;
    init_children(p1, p2, c1, c2)?;

    if x_rate < 1.0 && rng.frac() > x_rate {
        c1.copy_from(p1);
        c2.copy_from(p2);
        for child in [&mut *c1, &mut *c2] {
            child.set_parents(p1.index(), p2.index());
            child.set_crossover_points(None, None);
        }
        return Ok(());
    }

    match crossover {
        OperatorChoice::Builtin(kind) => apply_builtin(*kind, datatype, (p1, p2), (c1, c2), rng),
        OperatorChoice::Custom(f) => f(p1, p2, c1, c2, rng),
    }
}
