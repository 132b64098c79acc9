//! # Error Types
//!
//! This module defines the error type shared by every part of the engine.
//! Every failure is fail-fast: operators, pools and the driver return a
//! `GeneticError` and nothing in the library retries or suppresses it.
//!
//! ## Examples
//!
//! Using the `Result` type:
//!
//! ```rust
//! use genpool::error::{GeneticError, Result};
//!
//! fn check_rate(rate: f64) -> Result<f64> {
//!     if !(0.0..=1.0).contains(&rate) {
//!         return Err(GeneticError::Configuration(format!("invalid rate {}", rate)));
//!     }
//!     Ok(rate)
//! }
//!
//! assert!(check_rate(0.5).is_ok());
//! assert!(check_rate(1.5).is_err());
//! ```
//!
//! Using the `ResultExt` trait to add context to errors:
//!
//! ```rust
//! use genpool::error::{Result, ResultExt};
//! use std::fs::File;
//!
//! fn open_pool_file(path: &str) -> Result<()> {
//!     File::open(path).context("Failed to open pool file")?;
//!     Ok(())
//! }
//! ```
//!
//! Using the `OptionExt` trait to convert `Option` to `Result`:
//!
//! ```rust
//! use genpool::error::{GeneticError, OptionExt};
//!
//! fn first_fitness(fitness: &[f64]) -> genpool::error::Result<f64> {
//!     fitness.first().copied().ok_or_else_genetic(|| GeneticError::EmptyPopulation)
//! }
//! ```

use std::error::Error as StdError;
use std::fmt;
use thiserror::Error;

use crate::chromosome::DataType;

/// Represents errors that can occur in the genetic algorithm engine.
#[derive(Error, Debug)]
pub enum GeneticError {
    /// An invalid or inconsistent run configuration.
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// A chromosome or pool is not in a state the operation can work with.
    #[error("Invalid state: {0}")]
    InvalidState(String),

    /// An operation needed at least one chromosome in the pool.
    #[error("Empty population error: Cannot operate on an empty population")]
    EmptyPopulation,

    /// A chromosome cannot have zero genes.
    #[error("Invalid chromosome length: {0}")]
    InvalidLength(usize),

    /// The operator-eligible gene range lies outside the chromosome.
    #[error("Index out of bounds: {name} = {index} with chromosome length {length}")]
    IndexOutOfBounds {
        name: &'static str,
        index: usize,
        length: usize,
    },

    /// A permutation allele is not in `1..=length`.
    #[error("gene[{position}] = {allele} is out of bounds for permutation of length {length}")]
    AlleleOutOfRange {
        position: usize,
        allele: f64,
        length: usize,
    },

    /// A permutation allele occurs more than once.
    #[error("gene[{position}] = {allele} is a duplicate")]
    DuplicateAllele { position: usize, allele: f64 },

    /// An operator was applied to a representation it was not designed for.
    #[error("Operator {operator} does not support datatype {datatype}")]
    IncompatibleDatatype {
        operator: &'static str,
        datatype: DataType,
    },

    /// Crossover parents of different lengths.
    #[error("Heterozygous parents: lengths {0} and {1}")]
    HeterozygousParents(usize, usize),

    /// Fitness scaling produced a non-positive total.
    #[error("Numeric degeneracy: {0}")]
    NumericDegeneracy(String),

    /// No operator of the category matches the requested name.
    #[error("Unknown {category} operator: {name}")]
    UnknownOperator {
        category: &'static str,
        name: String,
    },

    /// The selected operator exists but has no implementation.
    #[error("Not implemented: {0}")]
    NotImplemented(String),

    /// The evaluation callback returned a non-finite score.
    #[error("Fitness calculation error: {0}")]
    FitnessCalculation(String),

    /// Error that occurs when an I/O operation fails.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A generic error with a custom message.
    #[error("{0}")]
    Other(String),
}

/// A specialized Result type for genetic algorithm operations.
pub type Result<T> = std::result::Result<T, GeneticError>;

/// Extension trait for Result to add context to errors.
///
/// ## Examples
///
/// ```rust
/// use genpool::error::ResultExt;
/// use std::fs::File;
///
/// fn read_file(path: &str) -> genpool::error::Result<()> {
///     File::open(path).context("Failed to open file")?;
///     Ok(())
/// }
/// ```
pub trait ResultExt<T, E> {
    /// Adds context to an error, converting it to `GeneticError::Other`.
    fn context<C>(self, context: C) -> Result<T>
    where
        C: fmt::Display + Send + Sync + 'static;
}

impl<T, E> ResultExt<T, E> for std::result::Result<T, E>
where
    E: StdError + Send + Sync + 'static,
{
    fn context<C>(self, context: C) -> Result<T>
    where
        C: fmt::Display + Send + Sync + 'static,
    {
        self.map_err(|e| GeneticError::Other(format!("{}: {}", context, e)))
    }
}

/// Extension trait for Option to convert to Result with a custom error.
pub trait OptionExt<T> {
    /// Converts an `Option<T>` to a `Result<T, GeneticError>` using
    /// a closure to generate the error.
    fn ok_or_else_genetic<F>(self, err_fn: F) -> Result<T>
    where
        F: FnOnce() -> GeneticError;
}

impl<T> OptionExt<T> for Option<T> {
    fn ok_or_else_genetic<F>(self, err_fn: F) -> Result<T>
    where
        F: FnOnce() -> GeneticError,
    {
        self.ok_or_else(err_fn)
    }
}
