//! # Evolution
//!
//! Configuration, evaluation, reporting and the driver that runs a GA.

pub mod builder;
pub mod config;
pub mod driver;
pub mod evaluator;
pub mod loader;
pub mod report;

pub use builder::{DriverBuilder, GaConfigBuilder};
pub use config::{GaConfig, InitPool, ReportLevel, Strategy};
pub use driver::{Driver, RunOutcome, RunState, Termination};
pub use evaluator::{evaluate_into, Evaluator};
pub use report::{GenerationReport, NoReport, ReportSchedule, Reporter, TracingReporter};
