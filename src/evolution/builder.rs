use std::path::PathBuf;

use crate::chromosome::DataType;
use crate::error::{GeneticError, Result};
use crate::pool::Pool;

use super::config::{GaConfig, InitPool, ReportLevel, Strategy};
use super::driver::Driver;
use super::evaluator::Evaluator;
use super::report::{Reporter, TracingReporter};

/// Builder for [`GaConfig`].
///
/// Starts from the defaults. Operator names are resolved and the result is
/// verified in [`build`](GaConfigBuilder::build).
#[derive(Debug, Clone, Default)]
pub struct GaConfigBuilder {
    config: GaConfig,
    strategy: Option<Strategy>,
    report_interval: Option<usize>,
    selection: Option<String>,
    crossover: Option<String>,
    mutation: Option<String>,
    replacement: Option<String>,
}

impl GaConfigBuilder {
    pub fn datatype(mut self, value: DataType) -> Self {
        self.config.datatype = value;
        self
    }

    pub fn chrom_len(mut self, value: usize) -> Self {
        self.config.chrom_len = value;
        self
    }

    pub fn pool_size(mut self, value: usize) -> Self {
        self.config.pool_size = value;
        self
    }

    pub fn minimize(mut self, value: bool) -> Self {
        self.config.minimize = value;
        self
    }

    pub fn elitist(mut self, value: bool) -> Self {
        self.config.elitist = value;
        self
    }

    /// Sets the crossover rate.
    pub fn x_rate(mut self, value: f64) -> Self {
        self.config.x_rate = value;
        self
    }

    /// Sets the mutation rate.
    pub fn mu_rate(mut self, value: f64) -> Self {
        self.config.mu_rate = value;
        self
    }

    /// Sets the generation gap.
    pub fn gap(mut self, value: f64) -> Self {
        self.config.gap = value;
        self
    }

    pub fn bias(mut self, value: f64) -> Self {
        self.config.bias = value;
        self
    }

    pub fn scale_factor(mut self, value: f64) -> Self {
        self.config.scale_factor = value;
        self
    }

    pub fn use_convergence(mut self, value: bool) -> Self {
        self.config.use_convergence = value;
        self
    }

    pub fn max_iter(mut self, value: usize) -> Self {
        self.config.max_iter = Some(value);
        self
    }

    pub fn rand_seed(mut self, value: u64) -> Self {
        self.config.rand_seed = value;
        self
    }

    /// Sets the strategy. Its companion operators and report interval are
    /// applied first in `build`, so explicit choices still take precedence.
    pub fn strategy(mut self, value: Strategy) -> Self {
        self.strategy = Some(value);
        self
    }

    pub fn init_pool(mut self, value: InitPool) -> Self {
        self.config.init_pool = value;
        self
    }

    pub fn pool_file(self, path: impl Into<PathBuf>) -> Self {
        self.init_pool(InitPool::FromFile(path.into()))
    }

    pub fn pert_range(mut self, value: f64) -> Self {
        self.config.pert_range = value;
        self
    }

    pub fn real_bounds(mut self, min: f64, max: f64) -> Self {
        self.config.real_bounds = (min, max);
        self
    }

    pub fn pert_reset_gene(mut self, value: Option<usize>) -> Self {
        self.config.pert_reset_gene = value;
        self
    }

    pub fn local_search_sweeps(mut self, value: usize) -> Self {
        self.config.local_search_sweeps = value;
        self
    }

    pub fn report_level(mut self, value: ReportLevel) -> Self {
        self.config.report_level = value;
        self
    }

    pub fn report_interval(mut self, value: usize) -> Self {
        self.report_interval = Some(value);
        self
    }

    pub fn user_data(mut self, value: impl Into<String>) -> Self {
        self.config.user_data = value.into();
        self
    }

    pub fn selection(mut self, name: impl Into<String>) -> Self {
        self.selection = Some(name.into());
        self
    }

    pub fn crossover(mut self, name: impl Into<String>) -> Self {
        self.crossover = Some(name.into());
        self
    }

    pub fn mutation(mut self, name: impl Into<String>) -> Self {
        self.mutation = Some(name.into());
        self
    }

    pub fn replacement(mut self, name: impl Into<String>) -> Self {
        self.replacement = Some(name.into());
        self
    }

    /// Resolves the operator names and verifies the configuration.
    ///
    /// # Errors
    ///
    /// Returns `GeneticError::UnknownOperator` for a name no registry knows
    /// and any error of [`GaConfig::verify`].
    pub fn build(self) -> Result<GaConfig> {
        let mut config = self.config;
        if let Some(strategy) = self.strategy {
            config.use_strategy(strategy)?;
        }
        if let Some(interval) = self.report_interval {
            config.report_interval = interval;
        }
        if let Some(name) = &self.selection {
            config.select_selection(name)?;
        }
        if let Some(name) = &self.crossover {
            config.select_crossover(name)?;
        }
        if let Some(name) = &self.mutation {
            config.select_mutation(name)?;
        }
        if let Some(name) = &self.replacement {
            config.select_replacement(name)?;
        }
        config.verify()?;
        Ok(config)
    }
}

/// Builder for [`Driver`].
///
/// Without [`with_reporter`](DriverBuilder::with_reporter) the driver reports
/// through a [`TracingReporter`] at the configured report level.
pub struct DriverBuilder<E, R = TracingReporter> {
    config: Option<GaConfig>,
    evaluator: Option<E>,
    reporter: R,
    initial_pool: Option<Pool>,
}

impl<E: Evaluator> DriverBuilder<E, TracingReporter> {
    pub fn new() -> Self {
        Self {
            config: None,
            evaluator: None,
            reporter: TracingReporter::default(),
            initial_pool: None,
        }
    }
}

impl<E: Evaluator> Default for DriverBuilder<E, TracingReporter> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E, R> DriverBuilder<E, R>
where
    E: Evaluator,
    R: Reporter,
{
    pub fn with_config(mut self, config: GaConfig) -> Self {
        self.config = Some(config);
        self
    }

    pub fn with_evaluator(mut self, evaluator: E) -> Self {
        self.evaluator = Some(evaluator);
        self
    }

    pub fn with_reporter<R2: Reporter>(self, reporter: R2) -> DriverBuilder<E, R2> {
        DriverBuilder {
            config: self.config,
            evaluator: self.evaluator,
            reporter,
            initial_pool: self.initial_pool,
        }
    }

    /// Uses `pool` as the initial population instead of generating one.
    pub fn with_initial_pool(mut self, pool: Pool) -> Self {
        self.initial_pool = Some(pool);
        self
    }

    /// # Errors
    ///
    /// Returns `GeneticError::Configuration` if no evaluator was given.
    /// The configuration itself is verified when the run initializes.
    pub fn build(self) -> Result<Driver<E, R>> {
        let evaluator = self
            .evaluator
            .ok_or_else(|| GeneticError::Configuration("Evaluator not specified".to_string()))?;
        let config = self.config.unwrap_or_default();
        Driver::new(config, evaluator, self.reporter, self.initial_pool)
    }
}
