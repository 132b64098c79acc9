//! # GaConfig
//!
//! Every parameter of a run together with the chosen operator of each
//! category. Operators are chosen by name through per-instance registries,
//! so a user function installed in one configuration is invisible to any
//! other.
//!
//! ## Example
//!
//! ```rust
//! use genpool::chromosome::DataType;
//! use genpool::evolution::{GaConfig, Strategy};
//!
//! let mut config = GaConfig::default();
//! config.datatype = DataType::Permutation;
//! config.chrom_len = 8;
//! config.max_iter = Some(50);
//! config.select_crossover("pmx").unwrap();
//!
//! assert_eq!(config.crossover_name(), "pmx");
//! assert_eq!(config.strategy, Strategy::Generational);
//! config.verify().unwrap();
//! ```

use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;
use std::sync::Arc;

use crate::chromosome::DataType;
use crate::crossover::{self, Crossover, CrossoverFn, CrossoverKind};
use crate::error::{GeneticError, Result};
use crate::mutation::{self, Mutation, MutationFn, MutationKind, MutationParams};
use crate::registry::{OperatorChoice, Registry};
use crate::replacement::{self, Replacement, ReplacementFn, ReplacementKind};
use crate::selection::{self, Selection, SelectionFn, SelectionKind};

/// How generations are formed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Strategy {
    /// Every generation fills a fresh pool, then replaces the old one.
    Generational,
    /// Every generation is one trial on a single shared pool.
    SteadyState,
}

impl Strategy {
    pub fn name(&self) -> &'static str {
        match self {
            Strategy::Generational => "generational",
            Strategy::SteadyState => "steady_state",
        }
    }
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Strategy {
    type Err = GeneticError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "generational" => Ok(Strategy::Generational),
            "steady_state" => Ok(Strategy::SteadyState),
            other => Err(GeneticError::UnknownOperator {
                category: "ga",
                name: other.to_string(),
            }),
        }
    }
}

/// Source of the initial pool.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InitPool {
    Random,
    /// Like `Random`, except real genes are drawn from `[0, 1)`.
    Random01,
    FromFile(PathBuf),
    /// No generation; the pool must be supplied to the driver.
    None,
}

/// Verbosity of the report callback and the tracing reporter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ReportLevel {
    None,
    Minimal,
    Short,
    Long,
}

impl FromStr for ReportLevel {
    type Err = GeneticError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "none" => Ok(ReportLevel::None),
            "minimal" => Ok(ReportLevel::Minimal),
            "short" => Ok(ReportLevel::Short),
            "long" => Ok(ReportLevel::Long),
            other => Err(GeneticError::Configuration(format!(
                "Invalid report type {:?}",
                other
            ))),
        }
    }
}

#[derive(Debug, Clone)]
pub struct GaConfig {
    pub datatype: DataType,
    pub chrom_len: usize,
    pub pool_size: usize,
    pub minimize: bool,
    pub elitist: bool,
    /// Probability that a trial applies crossover rather than cloning.
    pub x_rate: f64,
    /// Per-child mutation probability.
    pub mu_rate: f64,
    /// Fraction of the pool cloned into the next generation before trials.
    pub gap: f64,
    /// Rank-biased selection pressure, must exceed 1.
    pub bias: f64,
    /// Starting roulette scale factor.
    pub scale_factor: f64,
    pub use_convergence: bool,
    /// Generation cap; `None` runs until convergence.
    pub max_iter: Option<usize>,
    pub rand_seed: u64,
    pub strategy: Strategy,
    pub init_pool: InitPool,
    pub pert_range: f64,
    /// Range `float_random` draws from and the clamped real operators keep
    /// genes in. Defaults to `[0, 1)`; set `(-1.0, 1.0)` for the classic
    /// `[-1, 1)` draw of `float_random`.
    pub real_bounds: (f64, f64),
    pub pert_reset_gene: Option<usize>,
    pub local_search_sweeps: usize,
    pub report_level: ReportLevel,
    pub report_interval: usize,
    /// Free-form text handed through to the evaluation callback's owner.
    pub user_data: String,
    selection: Selection,
    crossover: Crossover,
    mutation: Mutation,
    replacement: Replacement,
    selection_registry: Registry<SelectionKind, SelectionFn>,
    crossover_registry: Registry<CrossoverKind, CrossoverFn>,
    mutation_registry: Registry<MutationKind, MutationFn>,
    replacement_registry: Registry<ReplacementKind, ReplacementFn>,
}

impl Default for GaConfig {
    fn default() -> Self {
        Self {
            datatype: DataType::Permutation,
            chrom_len: 10,
            pool_size: 100,
            minimize: true,
            elitist: true,
            x_rate: 1.0,
            mu_rate: 0.0,
            gap: 0.0,
            bias: 1.8,
            scale_factor: 0.0,
            use_convergence: true,
            max_iter: None,
            rand_seed: 1,
            strategy: Strategy::Generational,
            init_pool: InitPool::Random,
            pert_range: 0.1,
            real_bounds: (0.0, 1.0),
            pert_reset_gene: Some(6),
            local_search_sweeps: 1000,
            report_level: ReportLevel::Short,
            report_interval: 1,
            user_data: String::new(),
            selection: OperatorChoice::Builtin(SelectionKind::Roulette),
            crossover: OperatorChoice::Builtin(CrossoverKind::Order1),
            mutation: OperatorChoice::Builtin(MutationKind::Swap),
            replacement: OperatorChoice::Builtin(ReplacementKind::Append),
            selection_registry: selection::registry(),
            crossover_registry: crossover::registry(),
            mutation_registry: mutation::registry(),
            replacement_registry: replacement::registry(),
        }
    }
}

impl GaConfig {
    pub fn builder() -> super::builder::GaConfigBuilder {
        super::builder::GaConfigBuilder::default()
    }

    /// Switches strategy together with the operators and report interval
    /// that suit it: roulette/append/1 for generational runs and
    /// rank_biased/by_rank/100 for steady-state runs.
    pub fn use_strategy(&mut self, strategy: Strategy) -> Result<()> {
        self.strategy = strategy;
        match strategy {
            Strategy::Generational => {
                self.select_selection("roulette")?;
                self.select_replacement("append")?;
                self.report_interval = 1;
            }
            Strategy::SteadyState => {
                self.select_selection("rank_biased")?;
                self.select_replacement("by_rank")?;
                self.report_interval = 100;
            }
        }
        Ok(())
    }

    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    pub fn crossover(&self) -> &Crossover {
        &self.crossover
    }

    pub fn mutation(&self) -> &Mutation {
        &self.mutation
    }

    pub fn replacement(&self) -> &Replacement {
        &self.replacement
    }

    pub fn selection_name(&self) -> &str {
        self.selection_registry.name_of(&self.selection)
    }

    pub fn crossover_name(&self) -> &str {
        self.crossover_registry.name_of(&self.crossover)
    }

    pub fn mutation_name(&self) -> &str {
        self.mutation_registry.name_of(&self.mutation)
    }

    pub fn replacement_name(&self) -> &str {
        self.replacement_registry.name_of(&self.replacement)
    }

    pub fn select_selection(&mut self, name: &str) -> Result<()> {
        self.selection = self.selection_registry.select(name)?;
        Ok(())
    }

    pub fn select_crossover(&mut self, name: &str) -> Result<()> {
        self.crossover = self.crossover_registry.select(name)?;
        Ok(())
    }

    pub fn select_mutation(&mut self, name: &str) -> Result<()> {
        self.mutation = self.mutation_registry.select(name)?;
        Ok(())
    }

    pub fn select_replacement(&mut self, name: &str) -> Result<()> {
        self.replacement = self.replacement_registry.select(name)?;
        Ok(())
    }

    /// Installs and selects a user selection function.
    pub fn set_selection_fn(&mut self, name: &str, f: Arc<SelectionFn>) {
        self.selection = self.selection_registry.set_user_function(name, f);
    }

    pub fn set_crossover_fn(&mut self, name: &str, f: Arc<CrossoverFn>) {
        self.crossover = self.crossover_registry.set_user_function(name, f);
    }

    pub fn set_mutation_fn(&mut self, name: &str, f: Arc<MutationFn>) {
        self.mutation = self.mutation_registry.set_user_function(name, f);
    }

    pub fn set_replacement_fn(&mut self, name: &str, f: Arc<ReplacementFn>) {
        self.replacement = self.replacement_registry.set_user_function(name, f);
    }

    /// Parameters of the real-valued mutation operators.
    pub fn mutation_params(&self) -> MutationParams {
        MutationParams {
            pert_range: self.pert_range,
            real_bounds: self.real_bounds,
            pert_reset_gene: self.pert_reset_gene,
            local_search_sweeps: self.local_search_sweeps,
            minimize: self.minimize,
        }
    }

    /// Whether rank-biased selection may keep its ranking for a whole
    /// cycle, which holds while replacement keeps the pool ordered.
    pub fn rank_once(&self) -> bool {
        matches!(self.replacement, OperatorChoice::Builtin(ReplacementKind::ByRank))
    }

    /// Checks the configuration before a run.
    ///
    /// # Errors
    ///
    /// Returns `GeneticError::Configuration` for out-of-range parameters or
    /// conflicting choices and `GeneticError::IncompatibleDatatype` when a
    /// built-in crossover does not fit the datatype.
    pub fn verify(&self) -> Result<()> {
        let fail = |msg: String| Err(GeneticError::Configuration(msg));

        if self.chrom_len == 0 {
            return fail("Chromosome length must be positive".to_string());
        }
        if self.pool_size == 0 {
            return fail("Pool size must be positive".to_string());
        }
        for (name, rate) in [("x_rate", self.x_rate), ("mu_rate", self.mu_rate), ("gap", self.gap)] {
            if !(0.0..=1.0).contains(&rate) {
                return fail(format!("{} must lie in [0, 1], got {}", name, rate));
            }
        }
        if matches!(self.selection, OperatorChoice::Builtin(SelectionKind::RankBiased))
            && self.bias <= 1.0
        {
            return fail(format!("Rank bias must exceed 1, got {}", self.bias));
        }
        if let OperatorChoice::Builtin(kind) = &self.crossover {
            if !kind.supports(self.datatype) {
                return Err(GeneticError::IncompatibleDatatype {
                    operator: kind.name(),
                    datatype: self.datatype,
                });
            }
            if matches!(self.init_pool, InitPool::Random | InitPool::Random01)
                && self.chrom_len < kind.min_length()
            {
                return fail(format!(
                    "{} crossover needs chromosomes of at least {} genes",
                    kind.name(),
                    kind.min_length()
                ));
            }
        }
        if self.strategy == Strategy::Generational {
            if let OperatorChoice::Builtin(kind) = &self.replacement {
                if !kind.is_generational() {
                    return fail(format!(
                        "{} replacement is invalid under the generational strategy",
                        self.replacement_name()
                    ));
                }
            }
        }
        if self.max_iter.is_none() && !self.use_convergence {
            return fail("Run has neither an iteration cap nor a convergence check".to_string());
        }
        if self.max_iter == Some(0) {
            return fail("Iteration cap must be positive".to_string());
        }
        if self.real_bounds.0 >= self.real_bounds.1 {
            return fail(format!(
                "Real bounds [{}, {}] are empty",
                self.real_bounds.0, self.real_bounds.1
            ));
        }
        if let InitPool::FromFile(path) = &self.init_pool {
            if path.as_os_str().is_empty() {
                return fail("No file specified for initpool".to_string());
            }
        }
        if self.report_interval == 0 {
            return fail("Report interval must be positive".to_string());
        }
        Ok(())
    }
}
