//! # Driver
//!
//! Runs a configured GA. A run moves through [`RunState::Initializing`],
//! [`RunState::Iterating`] and ends in [`RunState::Converged`] or
//! [`RunState::Exhausted`].
//!
//! Every trial selects two parents from the current pool, crosses them over,
//! mutates and evaluates both children, and hands them to the replacement
//! operator. The generational strategy repeats trials until a fresh pool is
//! as large as the current one and then swaps the two; the steady-state
//! strategy runs a single trial per generation on one shared pool.
//!
//! ## Example
//!
//! ```rust
//! use genpool::chromosome::Chromosome;
//! use genpool::evolution::{Driver, GaConfig, Termination};
//!
//! let mut config = GaConfig::default();
//! config.chrom_len = 6;
//! config.pool_size = 20;
//! config.max_iter = Some(30);
//!
//! // Count the genes already in place.
//! let misplaced = |c: &Chromosome| {
//!     c.genes()
//!         .iter()
//!         .enumerate()
//!         .filter(|(i, g)| **g != (*i + 1) as f64)
//!         .count() as f64
//! };
//!
//! let mut driver = Driver::builder()
//!     .with_config(config)
//!     .with_evaluator(misplaced)
//!     .build()
//!     .unwrap();
//! let outcome = driver.run().unwrap();
//! assert!(outcome.generations <= 30);
//! assert!(matches!(outcome.termination, Termination::Converged | Termination::Exhausted));
//! ```

use tracing::{debug, info};

use super::builder::DriverBuilder;
use super::config::{GaConfig, InitPool, ReportLevel, Strategy};
use super::evaluator::{evaluate_into, Evaluator};
use super::report::{GenerationReport, ReportSchedule, Reporter, TracingReporter};
use crate::chromosome::Chromosome;
use crate::crossover;
use crate::error::{GeneticError, OptionExt, Result};
use crate::mutation::{self, MutationCounter, MutationParams};
use crate::pool::Pool;
use crate::replacement;
use crate::rng::RandomNumberGenerator;
use crate::selection::{self, SelectionState};

/// Where a run stands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunState {
    Initializing,
    Iterating,
    Converged,
    Exhausted,
}

/// Why a run stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Termination {
    /// Fitness variance collapsed and convergence checking was on.
    Converged,
    /// The generation cap was reached.
    Exhausted,
}

/// Result of a finished run.
#[derive(Debug, Clone)]
pub struct RunOutcome {
    /// Best chromosome seen over the whole run.
    pub best: Chromosome,
    pub generations: usize,
    pub termination: Termination,
    pub total_mutations: usize,
}

pub struct Driver<E, R = TracingReporter> {
    config: GaConfig,
    evaluator: E,
    reporter: R,
    rng: RandomNumberGenerator,
    state: RunState,
    generation: usize,
    initial_pool: Option<Pool>,
    old_pool: Pool,
    new_pool: Pool,
    best: Option<Chromosome>,
    parents: (Chromosome, Chromosome),
    children: (Chromosome, Chromosome),
    selection_state: SelectionState,
    mutations: MutationCounter,
    mutation_params: MutationParams,
    schedule: ReportSchedule,
}

impl<E: Evaluator> Driver<E, TracingReporter> {
    pub fn builder() -> DriverBuilder<E, TracingReporter> {
        DriverBuilder::new()
    }
}

impl<E, R> Driver<E, R>
where
    E: Evaluator,
    R: Reporter,
{
    pub(crate) fn new(
        config: GaConfig,
        evaluator: E,
        reporter: R,
        initial_pool: Option<Pool>,
    ) -> Result<Self> {
        let len = config.chrom_len.max(1);
        Ok(Self {
            rng: RandomNumberGenerator::from_seed(config.rand_seed),
            state: RunState::Initializing,
            generation: 0,
            initial_pool,
            old_pool: Pool::default(),
            new_pool: Pool::default(),
            best: None,
            parents: (Chromosome::new(len)?, Chromosome::new(len)?),
            children: (Chromosome::new(len)?, Chromosome::new(len)?),
            selection_state: SelectionState {
                scale_factor: config.scale_factor,
                ranked: false,
            },
            mutations: MutationCounter::default(),
            mutation_params: config.mutation_params(),
            schedule: ReportSchedule::from_config(&config),
            config,
            evaluator,
            reporter,
        })
    }

    pub fn state(&self) -> RunState {
        self.state
    }

    pub fn config(&self) -> &GaConfig {
        &self.config
    }

    /// Best chromosome seen so far; `None` before initialization.
    pub fn best(&self) -> Option<&Chromosome> {
        self.best.as_ref()
    }

    /// The current population.
    pub fn pool(&self) -> &Pool {
        &self.old_pool
    }

    /// Generations completed.
    pub fn generation(&self) -> usize {
        self.generation
    }

    pub fn mutations(&self) -> MutationCounter {
        self.mutations
    }

    pub fn scale_factor(&self) -> f64 {
        self.selection_state.scale_factor
    }

    pub fn reporter(&self) -> &R {
        &self.reporter
    }

    pub fn reporter_mut(&mut self) -> &mut R {
        &mut self.reporter
    }

    /// Runs to termination, initializing first if needed.
    pub fn run(&mut self) -> Result<RunOutcome> {
        while self.next_generation()? == RunState::Iterating {}
        let outcome = self.outcome()?;
        info!(
            generations = outcome.generations,
            termination = ?outcome.termination,
            best_fitness = outcome.best.fitness(),
            total_mutations = outcome.total_mutations,
            "GA run finished"
        );
        self.reporter.finished(&outcome);
        Ok(outcome)
    }

    /// Summary of the run so far.
    ///
    /// # Errors
    ///
    /// Returns `GeneticError::InvalidState` before initialization.
    pub fn outcome(&self) -> Result<RunOutcome> {
        let best = self
            .best
            .clone()
            .ok_or_else_genetic(|| GeneticError::InvalidState("run not initialized".to_string()))?;
        let termination = match self.state {
            RunState::Converged => Termination::Converged,
            _ => Termination::Exhausted,
        };
        Ok(RunOutcome {
            best,
            generations: self.generation,
            termination,
            total_mutations: self.mutations.tot_mut,
        })
    }

    /// Verifies the configuration, builds and evaluates the initial pool and
    /// records its best member.
    pub fn initialize(&mut self) -> Result<()> {
        self.config.verify()?;
        self.reporter.config(&self.config);
        info!(
            strategy = %self.config.strategy,
            selection = self.config.selection_name(),
            crossover = self.config.crossover_name(),
            mutation = self.config.mutation_name(),
            replacement = self.config.replacement_name(),
            "Starting GA run"
        );
        self.rng = RandomNumberGenerator::from_seed(self.config.rand_seed);

        let mut pool = match self.initial_pool.take() {
            Some(pool) => pool,
            None => self.generate_pool()?,
        };
        pool.set_minimize(self.config.minimize);
        if pool.is_empty() {
            return Err(GeneticError::EmptyPopulation);
        }
        self.config.chrom_len = pool.chromosome(0)?.len();

        for i in 0..pool.len() {
            let chrom = pool
                .get_mut(i)
                .ok_or_else_genetic(|| GeneticError::InvalidState(format!("pool slot {} is empty", i)))?;
            evaluate_into(&self.evaluator, chrom)?;
            chrom.verify(self.config.datatype)?;
        }
        let stats = pool.stats()?;
        let best_index = stats.best_index.ok_or_else_genetic(|| GeneticError::EmptyPopulation)?;
        let best = pool.chromosome(best_index)?.clone();

        if self.config.strategy == Strategy::Generational && pool.len() % 2 != 0 {
            pool.append(best.clone());
            pool.stats()?;
        }

        let mut new_pool = Pool::with_capacity(pool.len());
        new_pool.set_minimize(self.config.minimize);
        self.new_pool = new_pool;
        self.old_pool = pool;
        self.best = Some(best);

        let len = self.config.chrom_len;
        self.parents = (Chromosome::new(len)?, Chromosome::new(len)?);
        self.children = (Chromosome::new(len)?, Chromosome::new(len)?);
        self.selection_state = SelectionState {
            scale_factor: self.config.scale_factor,
            ranked: false,
        };
        self.mutations = MutationCounter::default();
        self.mutation_params = self.config.mutation_params();
        self.schedule = ReportSchedule::from_config(&self.config);
        self.generation = 0;
        self.state = RunState::Iterating;

        self.report(None)?;
        self.check_termination();
        Ok(())
    }

    /// Runs one generation and returns the resulting state. Initializes the
    /// run on the first call; a finished run is left untouched.
    pub fn next_generation(&mut self) -> Result<RunState> {
        match self.state {
            RunState::Initializing => {
                self.initialize()?;
                if self.state != RunState::Iterating {
                    return Ok(self.state);
                }
            }
            RunState::Converged | RunState::Exhausted => return Ok(self.state),
            RunState::Iterating => {}
        }

        match self.config.strategy {
            Strategy::Generational => self.generational_step()?,
            Strategy::SteadyState => {
                self.mutations.start_trial();
                self.trial()?;
            }
        }

        self.report(Some(self.generation))?;
        self.generation += 1;
        self.check_termination();
        Ok(self.state)
    }

    fn generate_pool(&mut self) -> Result<Pool> {
        let (size, len, datatype) = (self.config.pool_size, self.config.chrom_len, self.config.datatype);
        let mut pool = Pool::with_capacity(size);
        match &self.config.init_pool {
            InitPool::Random => pool.random(size, len, datatype, &mut self.rng)?,
            InitPool::Random01 => pool.random_unit(size, len, datatype, &mut self.rng)?,
            InitPool::FromFile(path) => pool = Pool::load(path)?,
            InitPool::None => {
                return Err(GeneticError::Configuration(
                    "initpool none requires a pool supplied to the driver".to_string(),
                ))
            }
        }
        Ok(pool)
    }

    fn check_termination(&mut self) {
        if self.state != RunState::Iterating {
            return;
        }
        if self.config.use_convergence && self.old_pool.last_stats().converged {
            self.state = RunState::Converged;
        } else if self.config.max_iter.is_some_and(|max| self.generation >= max) {
            self.state = RunState::Exhausted;
        }
    }

    fn generational_step(&mut self) -> Result<()> {
        self.new_pool.clear();
        self.mutations.start_trial();
        self.selection_state.new_cycle();

        if self.config.elitist {
            let best_index = self
                .old_pool
                .last_stats()
                .best_index
                .ok_or_else_genetic(|| GeneticError::EmptyPopulation)?;
            for _ in 0..2 {
                self.new_pool.append_copy(self.old_pool.chromosome(best_index)?);
            }
        }
        self.clone_gap()?;

        while self.new_pool.len() < self.old_pool.len() {
            let filled = self.new_pool.len();
            self.trial()?;
            if self.new_pool.len() <= filled {
                return Err(GeneticError::InvalidState(format!(
                    "{} replacement did not grow the new pool",
                    self.config.replacement_name()
                )));
            }
        }

        self.new_pool.stats()?;
        std::mem::swap(&mut self.old_pool, &mut self.new_pool);
        Ok(())
    }

    /// Clones selected members into the new pool. The count is rounded down
    /// to an even number so trials still fill the pool exactly.
    fn clone_gap(&mut self) -> Result<()> {
        if self.config.gap <= 0.0 {
            return Ok(());
        }
        let mut clones = (self.old_pool.len() as f64 * self.config.gap) as usize;
        clones -= clones % 2;
        for _ in 0..clones {
            if self.new_pool.len() >= self.old_pool.len() {
                break;
            }
            let i = self.select_parent()?;
            self.new_pool.append_copy(self.old_pool.chromosome(i)?);
        }
        Ok(())
    }

    fn select_parent(&mut self) -> Result<usize> {
        let before = self.selection_state.scale_factor;
        let index = selection::select(
            self.config.selection(),
            &mut self.old_pool,
            self.config.bias,
            self.config.rank_once(),
            &mut self.selection_state,
            &mut self.rng,
        )?;
        if self.selection_state.scale_factor != before
            && self.config.report_level != ReportLevel::None
        {
            self.reporter.scale_factor_changed(self.selection_state.scale_factor);
        }
        Ok(index)
    }

    /// select, verify parents, crossover, mutate, evaluate, verify children,
    /// replace, track the best, recompute stats.
    fn trial(&mut self) -> Result<()> {
        let first = self.select_parent()?;
        let second = self.select_parent()?;

        let Self {
            config,
            evaluator,
            rng,
            old_pool,
            new_pool,
            best,
            parents,
            children,
            mutations,
            mutation_params,
            ..
        } = self;

        parents.0.copy_from(old_pool.chromosome(first)?);
        parents.1.copy_from(old_pool.chromosome(second)?);
        let (p1, p2) = (&parents.0, &parents.1);
        p1.verify(config.datatype)?;
        p2.verify(config.datatype)?;

        let (c1, c2) = (&mut children.0, &mut children.1);
        crossover::crossover(
            config.crossover(),
            config.datatype,
            config.x_rate,
            (p1, p2),
            (&mut *c1, &mut *c2),
            rng,
        )?;

        let evaluator = &*evaluator;
        let mut evaluate = |c: &mut Chromosome| evaluate_into(evaluator, c);
        for child in [&mut *c1, &mut *c2] {
            mutation::mutate(
                config.mutation(),
                config.mu_rate,
                child,
                mutation_params,
                mutations,
                &mut evaluate,
                rng,
            )?;
        }
        for child in [&mut *c1, &mut *c2] {
            evaluate(child)?;
            child.verify(config.datatype)?;
        }

        let target = match config.strategy {
            Strategy::Generational => new_pool,
            Strategy::SteadyState => old_pool,
        };
        replacement::replace(
            config.replacement(),
            target,
            config.elitist,
            (p1, p2),
            (&mut *c1, &mut *c2),
        )?;

        let best = best
            .as_mut()
            .ok_or_else_genetic(|| GeneticError::InvalidState("run not initialized".to_string()))?;
        for child in [&*c1, &*c2] {
            if child.compare(best, config.minimize).is_lt() {
                best.copy_from(child);
            }
        }

        target.stats()?;
        Ok(())
    }

    fn report(&mut self, generation: Option<usize>) -> Result<()> {
        let stats = *self.old_pool.last_stats();
        if !self.schedule.is_due(generation, stats.converged) {
            return Ok(());
        }
        let best = self
            .best
            .as_ref()
            .ok_or_else_genetic(|| GeneticError::InvalidState("run not initialized".to_string()))?;
        debug!(
            generation = ?generation,
            min = stats.min,
            max = stats.max,
            ave = stats.ave,
            var = stats.var,
            best = best.fitness(),
            "Generation statistics"
        );
        if self.config.report_level == ReportLevel::None {
            return Ok(());
        }
        self.reporter.generation(&GenerationReport {
            generation,
            pool: &self.old_pool,
            stats: &stats,
            best,
            num_mut: self.mutations.num_mut,
            tot_mut: self.mutations.tot_mut,
        });
        Ok(())
    }
}

impl<E, R> std::fmt::Debug for Driver<E, R> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Driver")
            .field("state", &self.state)
            .field("generation", &self.generation)
            .field("strategy", &self.config.strategy)
            .field("pool_size", &self.old_pool.len())
            .field("best", &self.best.as_ref().map(Chromosome::fitness))
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chromosome::DataType;
    use crate::evolution::report::GenerationReport;

    fn displacement(c: &Chromosome) -> f64 {
        c.genes()
            .iter()
            .enumerate()
            .map(|(i, g)| (g - (i + 1) as f64).abs())
            .sum()
    }

    fn config(strategy: Strategy) -> GaConfig {
        let mut config = GaConfig::default();
        config.chrom_len = 8;
        config.pool_size = 20;
        config.max_iter = Some(15);
        config.mu_rate = 0.1;
        config.rand_seed = 42;
        config.use_strategy(strategy).unwrap();
        config
    }

    #[derive(Default)]
    struct Recorder {
        configs: usize,
        generations: Vec<Option<usize>>,
        best: Vec<f64>,
        finished: bool,
    }

    impl Reporter for Recorder {
        fn config(&mut self, _config: &GaConfig) {
            self.configs += 1;
        }

        fn generation(&mut self, report: &GenerationReport<'_>) {
            self.generations.push(report.generation);
            self.best.push(report.best.fitness());
        }

        fn finished(&mut self, _outcome: &RunOutcome) {
            self.finished = true;
        }
    }

    #[test]
    fn test_stepwise_generational() {
        let mut driver = DriverBuilder::new()
            .with_config(config(Strategy::Generational))
            .with_evaluator(displacement)
            .build()
            .unwrap();
        assert_eq!(driver.state(), RunState::Initializing);
        assert!(driver.best().is_none());

        driver.initialize().unwrap();
        assert_eq!(driver.state(), RunState::Iterating);
        assert_eq!(driver.pool().len(), 20);

        let state = driver.next_generation().unwrap();
        assert_eq!(driver.generation(), 1);
        assert_eq!(driver.pool().len(), 20);
        assert!(matches!(state, RunState::Iterating | RunState::Converged));
    }

    #[test]
    fn test_run_reports_in_order() {
        let mut recorder = Recorder::default();
        let outcome = DriverBuilder::new()
            .with_config(config(Strategy::Generational))
            .with_evaluator(displacement)
            .with_reporter(&mut recorder)
            .build()
            .unwrap()
            .run()
            .unwrap();
        assert_eq!(recorder.configs, 1);
        assert!(recorder.finished);
        assert_eq!(recorder.generations.first(), Some(&None));
        assert_eq!(recorder.generations.get(1), Some(&Some(0)));
        // Best-ever never regresses when minimizing.
        assert!(recorder.best.windows(2).all(|w| w[1] <= w[0]));
        assert!(outcome.generations <= 15);
    }

    #[test]
    fn test_report_level_none_silences_reporter() {
        let mut recorder = Recorder::default();
        let mut cfg = config(Strategy::Generational);
        cfg.report_level = ReportLevel::None;
        DriverBuilder::new()
            .with_config(cfg)
            .with_evaluator(displacement)
            .with_reporter(&mut recorder)
            .build()
            .unwrap()
            .run()
            .unwrap();
        assert!(recorder.generations.is_empty());
        assert!(recorder.finished);
    }

    #[test]
    fn test_default_reporter_takes_loaded_level() {
        for (text, level) in [
            ("chrom_len 8\npool_size 10\nrp_type long\n", ReportLevel::Long),
            ("chrom_len 8\npool_size 10\nrp_type none\n", ReportLevel::None),
        ] {
            let cfg = GaConfig::from_reader(text.as_bytes()).unwrap();
            let mut driver = Driver::builder()
                .with_config(cfg)
                .with_evaluator(displacement)
                .build()
                .unwrap();
            driver.initialize().unwrap();
            assert_eq!(driver.reporter().level(), level);
        }
    }

    #[test]
    fn test_odd_pool_made_even() {
        let mut cfg = config(Strategy::Generational);
        cfg.pool_size = 7;
        let mut driver = DriverBuilder::new()
            .with_config(cfg)
            .with_evaluator(displacement)
            .build()
            .unwrap();
        driver.initialize().unwrap();
        assert_eq!(driver.pool().len(), 8);
        driver.next_generation().unwrap();
        assert_eq!(driver.pool().len(), 8);
    }

    #[test]
    fn test_steady_state_keeps_pool_size() {
        let mut driver = DriverBuilder::new()
            .with_config(config(Strategy::SteadyState))
            .with_evaluator(displacement)
            .build()
            .unwrap();
        for _ in 0..10 {
            driver.next_generation().unwrap();
            assert_eq!(driver.pool().len(), 20);
        }
    }

    #[test]
    fn test_identical_pool_converges_immediately() {
        let mut pool = Pool::with_capacity(4);
        for _ in 0..4 {
            pool.append(Chromosome::from_genes(vec![1.0, 2.0, 3.0]).unwrap());
        }
        let mut cfg = config(Strategy::Generational);
        cfg.chrom_len = 3;
        let mut driver = DriverBuilder::new()
            .with_config(cfg)
            .with_evaluator(displacement)
            .with_initial_pool(pool)
            .build()
            .unwrap();
        let outcome = driver.run().unwrap();
        assert_eq!(outcome.termination, Termination::Converged);
        assert_eq!(outcome.generations, 0);
        assert_eq!(outcome.best.fitness(), 0.0);
    }

    #[test]
    fn test_invalid_initial_pool_rejected() {
        let mut pool = Pool::with_capacity(2);
        pool.append(Chromosome::from_genes(vec![1.0, 1.0, 3.0]).unwrap());
        pool.append(Chromosome::from_genes(vec![1.0, 2.0, 3.0]).unwrap());
        let mut driver = DriverBuilder::new()
            .with_config(config(Strategy::Generational))
            .with_evaluator(displacement)
            .with_initial_pool(pool)
            .build()
            .unwrap();
        assert!(matches!(
            driver.run(),
            Err(GeneticError::DuplicateAllele { position: 1, .. })
        ));
    }

    #[test]
    fn test_bit_strings_with_simple_crossover() {
        let mut cfg = config(Strategy::Generational);
        cfg.datatype = DataType::Bit;
        cfg.select_crossover("simple").unwrap();
        cfg.select_mutation("simple_invert").unwrap();
        cfg.minimize = false;
        let ones = |c: &Chromosome| c.genes().iter().sum::<f64>();
        let mut driver = DriverBuilder::new()
            .with_config(cfg)
            .with_evaluator(ones)
            .build()
            .unwrap();
        let outcome = driver.run().unwrap();
        assert!(outcome.best.fitness() >= 1.0);
        assert!(outcome.best.genes().iter().all(|g| *g == 0.0 || *g == 1.0));
    }

    #[test]
    fn test_same_seed_same_run() {
        let run = || {
            DriverBuilder::new()
                .with_config(config(Strategy::SteadyState))
                .with_evaluator(displacement)
                .build()
                .unwrap()
                .run()
                .unwrap()
        };
        let (a, b) = (run(), run());
        assert_eq!(a.best.genes(), b.best.genes());
        assert_eq!(a.generations, b.generations);
        assert_eq!(a.total_mutations, b.total_mutations);
    }
}
