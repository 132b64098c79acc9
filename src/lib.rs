pub mod chromosome;
pub mod crossover;
pub mod error;
pub mod evolution;
pub mod mutation;
pub mod pool;
pub mod registry;
pub mod replacement;
pub mod rng;
pub mod selection;

// Re-export commonly used types for convenience
pub use chromosome::{Chromosome, DataType, Gene};
pub use error::{GeneticError, OptionExt, Result, ResultExt};
pub use evolution::{
    Driver, DriverBuilder, Evaluator, GaConfig, GaConfigBuilder, Reporter, RunOutcome, Strategy,
    Termination,
};
pub use pool::{Pool, PoolStats};
pub use rng::RandomNumberGenerator;
