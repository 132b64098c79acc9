//! # Reporting
//!
//! The driver decides when a report is due and what it contains; a
//! [`Reporter`] decides how to render it. [`TracingReporter`] renders through
//! `tracing` at the configured [`ReportLevel`].

use tracing::info;

use super::config::{GaConfig, ReportLevel};
use super::driver::{RunOutcome, Termination};
use crate::chromosome::Chromosome;
use crate::pool::{Pool, PoolStats};

/// Data handed to [`Reporter::generation`].
#[derive(Debug, Clone, Copy)]
pub struct GenerationReport<'a> {
    /// Zero-based generation, or `None` for the initial pool.
    pub generation: Option<usize>,
    pub pool: &'a Pool,
    pub stats: &'a PoolStats,
    pub best: &'a Chromosome,
    pub num_mut: usize,
    pub tot_mut: usize,
}

/// Receives the run's reports. Every method defaults to doing nothing.
pub trait Reporter {
    fn config(&mut self, _config: &GaConfig) {}

    fn generation(&mut self, _report: &GenerationReport<'_>) {}

    fn scale_factor_changed(&mut self, _scale_factor: f64) {}

    fn finished(&mut self, _outcome: &RunOutcome) {}
}

impl<R: Reporter + ?Sized> Reporter for &mut R {
    fn config(&mut self, config: &GaConfig) {
        (**self).config(config)
    }

    fn generation(&mut self, report: &GenerationReport<'_>) {
        (**self).generation(report)
    }

    fn scale_factor_changed(&mut self, scale_factor: f64) {
        (**self).scale_factor_changed(scale_factor)
    }

    fn finished(&mut self, outcome: &RunOutcome) {
        (**self).finished(outcome)
    }
}

/// Discards every report.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoReport;

impl Reporter for NoReport {}

/// When a generation report is due.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReportSchedule {
    pub interval: usize,
    pub max_iter: Option<usize>,
    pub use_convergence: bool,
}

impl ReportSchedule {
    pub fn from_config(config: &GaConfig) -> Self {
        Self {
            interval: config.report_interval,
            max_iter: config.max_iter,
            use_convergence: config.use_convergence,
        }
    }

    /// The initial pool, the first generation, every `interval`-th
    /// generation, the last generation and a converged pool are reported.
    pub fn is_due(&self, generation: Option<usize>, converged: bool) -> bool {
        let Some(iter) = generation else {
            return true;
        };
        iter == 0
            || (self.interval > 0 && (iter + 1) % self.interval == 0)
            || self.max_iter == Some(iter + 1)
            || (self.use_convergence && converged)
    }
}

/// Renders reports as `tracing` events.
///
/// The default reporter takes its level from the run's
/// [`GaConfig::report_level`]. [`TracingReporter::new`] pins a level instead.
#[derive(Debug, Clone, Copy)]
pub struct TracingReporter {
    level: ReportLevel,
    pinned: bool,
}

impl TracingReporter {
    pub fn new(level: ReportLevel) -> Self {
        Self {
            level,
            pinned: true,
        }
    }

    pub fn level(&self) -> ReportLevel {
        self.level
    }
}

impl Default for TracingReporter {
    fn default() -> Self {
        Self {
            level: ReportLevel::Short,
            pinned: false,
        }
    }
}

impl Reporter for TracingReporter {
    fn config(&mut self, config: &GaConfig) {
        if !self.pinned {
            self.level = config.report_level;
        }
        if self.level == ReportLevel::None {
            return;
        }
        info!(
            strategy = %config.strategy,
            datatype = %config.datatype,
            chrom_len = config.chrom_len,
            pool_size = config.pool_size,
            selection = config.selection_name(),
            crossover = config.crossover_name(),
            mutation = config.mutation_name(),
            replacement = config.replacement_name(),
            x_rate = config.x_rate,
            mu_rate = config.mu_rate,
            elitist = config.elitist,
            minimize = config.minimize,
            seed = config.rand_seed,
            "GA configuration"
        );
    }

    fn generation(&mut self, report: &GenerationReport<'_>) {
        let generation = report.generation.map_or(0, |g| g + 1);
        let s = report.stats;
        match self.level {
            ReportLevel::None | ReportLevel::Minimal => {}
            ReportLevel::Short => info!(
                generation,
                min = s.min,
                max = s.max,
                ave = s.ave,
                var = s.var,
                dev = s.dev,
                total = s.total_fitness,
                best = report.best.fitness(),
                "Generation report"
            ),
            ReportLevel::Long => {
                info!(
                    generation,
                    mutations = report.num_mut,
                    total_mutations = report.tot_mut,
                    "Generation report"
                );
                for (i, c) in report.pool.iter().enumerate() {
                    let (p1, p2) = c.parents();
                    let (xp1, xp2) = c.crossover_points();
                    info!(
                        member = i + 1,
                        parents = ?(p1, p2),
                        crossover_points = ?(xp1, xp2),
                        fitness = c.fitness(),
                        genes = %c,
                        "Member"
                    );
                }
                info!(
                    min = s.min,
                    max = s.max,
                    ave = s.ave,
                    total = s.total_fitness,
                    var = s.var,
                    dev = s.dev,
                    best = %report.best,
                    best_fitness = report.best.fitness(),
                    "Pool statistics"
                );
            }
        }
    }

    fn scale_factor_changed(&mut self, scale_factor: f64) {
        if self.level >= ReportLevel::Short {
            info!(scale_factor, "Scale factor adjusted");
        }
    }

    fn finished(&mut self, outcome: &RunOutcome) {
        if self.level == ReportLevel::None {
            return;
        }
        match outcome.termination {
            Termination::Converged => {
                info!(generations = outcome.generations, "The GA has converged")
            }
            Termination::Exhausted => info!("The specified number of iterations has been reached"),
        }
        info!(best = %outcome.best, fitness = outcome.best.fitness(), "Best");
    }
}
