//! # Replacement
//!
//! Puts the two children of a trial into the target pool. `append` grows the
//! pool and suits the generational strategy; `by_rank`, `first_weaker` and
//! `weakest` overwrite members of a full pool and suit the steady-state
//! strategy only.
//!
//! With elitism the dispatch first keeps the best two of the four
//! chromosomes in play (see [`pick_best`]).

use crate::chromosome::Chromosome;
use crate::error::{GeneticError, Result};
use crate::pool::Pool;
use crate::registry::{OperatorChoice, Registry};

/// Built-in replacement operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ReplacementKind {
    Append,
    ByRank,
    FirstWeaker,
    Weakest,
}

impl ReplacementKind {
    /// Whether the operator can fill a fresh pool generation by generation.
    pub fn is_generational(&self) -> bool {
        matches!(self, ReplacementKind::Append)
    }
}

pub const REPLACEMENT_OPERATORS: &[(&str, ReplacementKind)] = &[
    ("append", ReplacementKind::Append),
    ("by_rank", ReplacementKind::ByRank),
    ("first_weaker", ReplacementKind::FirstWeaker),
    ("weakest", ReplacementKind::Weakest),
];

/// User replacement: receives the target pool, both parents and both
/// children.
pub type ReplacementFn = dyn Fn(&mut Pool, (&Chromosome, &Chromosome), (&Chromosome, &Chromosome)) -> Result<()>
    + Send
    + Sync;

pub type Replacement = OperatorChoice<ReplacementKind, ReplacementFn>;

pub fn registry() -> Registry<ReplacementKind, ReplacementFn> {
    Registry::new("replacement", REPLACEMENT_OPERATORS)
}

/// Copies `child` into slot `index` and records the slot in it.
fn place(pool: &mut Pool, index: usize, child: &Chromosome) {
    pool.insert_copy(index, child);
    if let Some(c) = pool.get_mut(index) {
        c.set_index(Some(index));
    }
}

fn require_members(pool: &Pool, operator: &str) -> Result<()> {
    if pool.is_empty() {
        return Err(GeneticError::InvalidState(format!(
            "{} replacement needs a populated pool",
            operator
        )));
    }
    Ok(())
}

/// Appends copies of both children.
pub fn append(pool: &mut Pool, c1: &Chromosome, c2: &Chromosome) {
    for child in [c1, c2] {
        let index = pool.len();
        pool.append_copy(child);
        if let Some(c) = pool.get_mut(index) {
            c.set_index(Some(index));
        }
    }
}

/// Inserts each child into a best-first ordered pool.
///
/// A child no better than the last member is dropped; otherwise it takes
/// the last slot and bubbles up to its rank.
pub fn by_rank(pool: &mut Pool, c1: &Chromosome, c2: &Chromosome) -> Result<()> {
    require_members(pool, "by_rank")?;
    for child in [c1, c2] {
        insert_by_rank(pool, child)?;
    }
    Ok(())
}

fn insert_by_rank(pool: &mut Pool, child: &Chromosome) -> Result<()> {
    let minimize = pool.minimize();
    let last = pool.len() - 1;
    if pool.chromosome(last)?.compare(child, minimize).is_le() {
        return Ok(());
    }
    place(pool, last, child);

    for i in (1..=last).rev() {
        let above = pool.chromosome(i - 1)?;
        let below = pool.chromosome(i)?;
        if above.compare(below, minimize).is_le() {
            break;
        }
        pool.swap(i - 1, i)?;
    }
    reindex(pool, 0..pool.len());
    Ok(())
}

fn reindex(pool: &mut Pool, range: std::ops::Range<usize>) {
    for i in range {
        if let Some(c) = pool.get_mut(i) {
            c.set_index(Some(i));
        }
    }
}

/// Each child replaces the first member, in pool order, that it strictly
/// beats. A child that beats nobody is discarded.
pub fn first_weaker(pool: &mut Pool, c1: &Chromosome, c2: &Chromosome) -> Result<()> {
    require_members(pool, "first_weaker")?;
    let minimize = pool.minimize();
    for child in [c1, c2] {
        let target = pool
            .iter()
            .position(|member| member.compare(child, minimize).is_gt());
        if let Some(i) = target {
            place(pool, i, child);
        }
    }
    Ok(())
}

/// Each child replaces the worst member if it is at least as good. Among
/// equally bad members the last one is replaced.
pub fn weakest(pool: &mut Pool, c1: &Chromosome, c2: &Chromosome) -> Result<()> {
    require_members(pool, "weakest")?;
    let minimize = pool.minimize();
    for child in [c1, c2] {
        let mut worst = 0;
        for i in 1..pool.len() {
            if pool
                .chromosome(i)?
                .compare(pool.chromosome(worst)?, minimize)
                .is_ge()
            {
                worst = i;
            }
        }
        if pool.chromosome(worst)?.compare(child, minimize).is_ge() {
            place(pool, worst, child);
        }
    }
    Ok(())
}

/// Keeps the best two of the four chromosomes of a trial in the children.
///
/// Each parent in turn overwrites the worse child if the parent is strictly
/// better. A child keeps its own crossover points through the substitution
/// and both children end up tagged with the parents' slots.
pub fn pick_best(
    p1: &Chromosome,
    p2: &Chromosome,
    c1: &mut Chromosome,
    c2: &mut Chromosome,
    minimize: bool,
) {
    for parent in [p1, p2] {
        let worse = if c1.compare(c2, minimize).is_gt() {
            &mut *c1
        } else {
            &mut *c2
        };
        if worse.compare(parent, minimize).is_gt() {
            let (xp1, xp2) = worse.crossover_points();
            worse.copy_from(parent);
            worse.set_crossover_points(xp1, xp2);
        }
    }
    for child in [c1, c2] {
        child.set_parents(p1.index(), p2.index());
    }
}

/// Runs one replacement, applying [`pick_best`] first when `elitist` is set.
pub fn replace(
    replacement: &Replacement,
    pool: &mut Pool,
    elitist: bool,
    parents: (&Chromosome, &Chromosome),
    children: (&mut Chromosome, &mut Chromosome),
) -> Result<()> {
    let (p1, p2) = parents;
    let (c1, c2) = children;
    if elitist {
        pick_best(p1, p2, c1, c2, pool.minimize());
    }
    match replacement {
        OperatorChoice::Builtin(ReplacementKind::Append) => {
            append(pool, c1, c2);
            Ok(())
        }
        OperatorChoice::Builtin(ReplacementKind::ByRank) => by_rank(pool, c1, c2),
        OperatorChoice::Builtin(ReplacementKind::FirstWeaker) => first_weaker(pool, c1, c2),
        OperatorChoice::Builtin(ReplacementKind::Weakest) => weakest(pool, c1, c2),
        OperatorChoice::Custom(f) => f(pool, (p1, p2), (c1, c2)),
    }
}
