//! # Chromosome
//!
//! A `Chromosome` is a fixed-length vector of genes plus the bookkeeping the
//! engine attaches to it: its fitness, its roulette weight (`ptf`), its slot in
//! the owning pool, the range of genes operators may touch and where it came
//! from (parents and crossover points).
//!
//! Genes are always stored as `f64`. The [`DataType`] of the run decides what
//! the numbers mean: a bit, an integer, a permutation label in `1..=len` or a
//! real value.
//!
//! ## Example
//!
//! ```rust
//! use genpool::chromosome::{Chromosome, DataType};
//! use std::cmp::Ordering;
//!
//! let mut a = Chromosome::from_genes(vec![2.0, 1.0, 3.0]).unwrap();
//! a.set_fitness(4.0);
//! let mut b = a.clone();
//! b.set_fitness(7.0);
//!
//! assert!(a.verify(DataType::Permutation).is_ok());
//! assert_eq!(a.compare(&b, true), Ordering::Less);
//! assert_eq!(a.compare(&b, false), Ordering::Greater);
//! ```

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::error::{GeneticError, Result};

/// Storage type of a single gene.
pub type Gene = f64;

/// What the genes of a run represent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum DataType {
    /// 0 or 1.
    Bit,
    /// Integers, by default drawn from `[0, len]`.
    Integer,
    /// A permutation of `1..=len`.
    Permutation,
    /// Real values.
    Real,
}

impl fmt::Display for DataType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            DataType::Bit => "bit",
            DataType::Integer => "int",
            DataType::Permutation => "int_perm",
            DataType::Real => "real",
        };
        f.write_str(name)
    }
}

impl FromStr for DataType {
    type Err = GeneticError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "bit" => Ok(DataType::Bit),
            "int" => Ok(DataType::Integer),
            "int_perm" => Ok(DataType::Permutation),
            "real" => Ok(DataType::Real),
            other => Err(GeneticError::Configuration(format!(
                "Invalid datatype: {}",
                other
            ))),
        }
    }
}

/// A candidate solution.
///
/// Provenance fields (`parent_1`, `parent_2`, `xp1`, `xp2`) are informational
/// only and never feed back into the search.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Chromosome {
    genes: Vec<Gene>,
    fitness: f64,
    ptf: f64,
    index: Option<usize>,
    idx_min: usize,
    idx_max: usize,
    parent_1: Option<usize>,
    parent_2: Option<usize>,
    xp1: Option<usize>,
    xp2: Option<usize>,
}

impl Chromosome {
    /// Allocates a chromosome of `length` zero genes.
    ///
    /// # Errors
    ///
    /// Returns `GeneticError::InvalidLength` if `length` is zero.
    pub fn new(length: usize) -> Result<Self> {
        if length == 0 {
            return Err(GeneticError::InvalidLength(length));
        }
        Ok(Self::blank(vec![0.0; length]))
    }

    /// Builds a chromosome around the given genes with reset bookkeeping.
    pub fn from_genes(genes: Vec<Gene>) -> Result<Self> {
        if genes.is_empty() {
            return Err(GeneticError::InvalidLength(0));
        }
        Ok(Self::blank(genes))
    }

    fn blank(genes: Vec<Gene>) -> Self {
        let idx_max = genes.len();
        Self {
            genes,
            fitness: 0.0,
            ptf: 0.0,
            index: None,
            idx_min: 0,
            idx_max,
            parent_1: None,
            parent_2: None,
            xp1: None,
            xp2: None,
        }
    }

    /// Replaces the gene storage with `length` zeros and resets every
    /// derived field. No gene data survives.
    pub fn resize(&mut self, length: usize) -> Result<()> {
        *self = Self::new(length)?;
        Ok(())
    }

    /// Zeroes the genes and resets bookkeeping, keeping the length.
    pub fn reset(&mut self) {
        let mut genes = std::mem::take(&mut self.genes);
        genes.iter_mut().for_each(|g| *g = 0.0);
        *self = Self::blank(genes);
    }

    /// Deep copy of `src` into `self`, resizing if the lengths differ.
    pub fn copy_from(&mut self, src: &Chromosome) {
        self.genes.clear();
        self.genes.extend_from_slice(&src.genes);
        self.fitness = src.fitness;
        self.ptf = src.ptf;
        self.index = src.index;
        self.idx_min = src.idx_min;
        self.idx_max = src.idx_max;
        self.parent_1 = src.parent_1;
        self.parent_2 = src.parent_2;
        self.xp1 = src.xp1;
        self.xp2 = src.xp2;
    }

    /// Orders two chromosomes by fitness. `Less` means `self` is better.
    ///
    /// When minimizing the lower fitness wins, otherwise the higher one.
    pub fn compare(&self, other: &Chromosome, minimize: bool) -> Ordering {
        let ord = self
            .fitness
            .partial_cmp(&other.fitness)
            .unwrap_or(Ordering::Equal);
        if minimize {
            ord
        } else {
            ord.reverse()
        }
    }

    /// Checks the structural invariants for `datatype`.
    ///
    /// For permutations every gene must lie in `1..=len` and appear once; the
    /// first duplicate in index order is reported.
    pub fn verify(&self, datatype: DataType) -> Result<()> {
        let length = self.genes.len();
        if length == 0 {
            return Err(GeneticError::InvalidLength(length));
        }
        if self.idx_min > length {
            return Err(GeneticError::IndexOutOfBounds {
                name: "idx_min",
                index: self.idx_min,
                length,
            });
        }
        if self.idx_max > length {
            return Err(GeneticError::IndexOutOfBounds {
                name: "idx_max",
                index: self.idx_max,
                length,
            });
        }

        if datatype == DataType::Permutation {
            let mut seen = vec![false; length + 1];
            for (position, &allele) in self.genes.iter().enumerate() {
                if allele.fract() != 0.0 || allele < 1.0 || allele > length as f64 {
                    return Err(GeneticError::AlleleOutOfRange {
                        position,
                        allele,
                        length,
                    });
                }
                let slot = allele as usize;
                if seen[slot] {
                    return Err(GeneticError::DuplicateAllele { position, allele });
                }
                seen[slot] = true;
            }
        }
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.genes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.genes.is_empty()
    }

    pub fn genes(&self) -> &[Gene] {
        &self.genes
    }

    pub fn genes_mut(&mut self) -> &mut [Gene] {
        &mut self.genes
    }

    pub fn fitness(&self) -> f64 {
        self.fitness
    }

    pub fn set_fitness(&mut self, fitness: f64) {
        self.fitness = fitness;
    }

    /// Percent of total fitness, only meaningful right after a roulette update.
    pub fn ptf(&self) -> f64 {
        self.ptf
    }

    pub(crate) fn set_ptf(&mut self, ptf: f64) {
        self.ptf = ptf;
    }

    /// Slot in the owning pool as of the last stats or sort.
    pub fn index(&self) -> Option<usize> {
        self.index
    }

    pub(crate) fn set_index(&mut self, index: Option<usize>) {
        self.index = index;
    }

    pub fn idx_min(&self) -> usize {
        self.idx_min
    }

    pub fn idx_max(&self) -> usize {
        self.idx_max
    }

    /// Restricts operators to genes in `[idx_min, idx_max)`.
    pub fn set_operator_range(&mut self, idx_min: usize, idx_max: usize) -> Result<()> {
        let length = self.genes.len();
        if idx_max > length {
            return Err(GeneticError::IndexOutOfBounds {
                name: "idx_max",
                index: idx_max,
                length,
            });
        }
        if idx_min > idx_max {
            return Err(GeneticError::IndexOutOfBounds {
                name: "idx_min",
                index: idx_min,
                length: idx_max,
            });
        }
        self.idx_min = idx_min;
        self.idx_max = idx_max;
        Ok(())
    }

    pub fn parents(&self) -> (Option<usize>, Option<usize>) {
        (self.parent_1, self.parent_2)
    }

    pub fn set_parents(&mut self, parent_1: Option<usize>, parent_2: Option<usize>) {
        self.parent_1 = parent_1;
        self.parent_2 = parent_2;
    }

    pub fn crossover_points(&self) -> (Option<usize>, Option<usize>) {
        (self.xp1, self.xp2)
    }

    pub fn set_crossover_points(&mut self, xp1: Option<usize>, xp2: Option<usize>) {
        self.xp1 = xp1;
        self.xp2 = xp2;
    }
}

impl fmt::Display for Chromosome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[")?;
        for (i, g) in self.genes.iter().enumerate() {
            if i > 0 {
                write!(f, " ")?;
            }
            write!(f, "{}", g)?;
        }
        write!(f, "] fitness={}", self.fitness)
    }
}
