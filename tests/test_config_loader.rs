use std::fs;
use std::path::PathBuf;

use genpool::{
    chromosome::{Chromosome, DataType},
    evolution::{Driver, GaConfig, InitPool, Strategy},
};

fn scratch_file(name: &str, contents: &str) -> PathBuf {
    let path = std::env::temp_dir().join(format!("genpool-{}-{}", std::process::id(), name));
    fs::write(&path, contents).unwrap();
    path
}

fn displacement(c: &Chromosome) -> f64 {
    c.genes()
        .iter()
        .enumerate()
        .map(|(i, g)| (g - (i + 1) as f64).abs())
        .sum()
}

#[test]
fn test_load_and_run_from_files() {
    let pool_path = scratch_file(
        "pool.txt",
        "# length first\n5\n\
         2 1 3 4 5\n\
         5 4 3 2 1\n\
         1 3 2 5 4  # third\n\
         4 5 1 2 3\n\
         3 1 2 4 5\n\
         q ignored after the sentinel\n",
    );
    let config_path = scratch_file(
        "run.cfg",
        &format!(
            "datatype int_perm\n\
             ga steady_state\n\
             crossover order1\n\
             mutation swap\n\
             mu_rate 0.5\n\
             stop_after 60\n\
             rand_seed 4\n\
             initpool from_file {}\n",
            pool_path.display()
        ),
    );

    let config = GaConfig::load(&config_path).unwrap();
    assert_eq!(config.strategy, Strategy::SteadyState);
    assert_eq!(config.init_pool, InitPool::FromFile(pool_path.clone()));

    let mut driver = Driver::builder()
        .with_config(config)
        .with_evaluator(displacement)
        .build()
        .unwrap();
    driver.initialize().unwrap();
    assert_eq!(driver.pool().len(), 5);
    assert_eq!(driver.config().chrom_len, 5);

    let outcome = driver.run().unwrap();
    outcome.best.verify(DataType::Permutation).unwrap();
    assert!(outcome.best.fitness() <= 2.0);

    fs::remove_file(pool_path).unwrap();
    fs::remove_file(config_path).unwrap();
}

#[test]
fn test_loaded_config_matches_builder() {
    let text = "\
datatype bit
chrom_len 32
pool_size 50
objective maximize
crossover simple
mutation simple_invert
mu_rate 0.01
stop_after 100
";
    let loaded = GaConfig::from_reader(text.as_bytes()).unwrap();
    let built = GaConfig::builder()
        .datatype(DataType::Bit)
        .chrom_len(32)
        .pool_size(50)
        .minimize(false)
        .crossover("simple")
        .mutation("simple_invert")
        .mu_rate(0.01)
        .max_iter(100)
        .build()
        .unwrap();
    assert_eq!(loaded.datatype, built.datatype);
    assert_eq!(loaded.chrom_len, built.chrom_len);
    assert_eq!(loaded.pool_size, built.pool_size);
    assert_eq!(loaded.minimize, built.minimize);
    assert_eq!(loaded.crossover_name(), built.crossover_name());
    assert_eq!(loaded.mutation_name(), built.mutation_name());
    assert_eq!(loaded.mu_rate, built.mu_rate);
    assert_eq!(loaded.max_iter, built.max_iter);
    assert_eq!(loaded.use_convergence, built.use_convergence);
}

#[test]
fn test_generational_with_steady_state_replacement_fails_verification() {
    let config = GaConfig::from_reader("replacement weakest\nstop_after 10\n".as_bytes()).unwrap();
    assert!(config.verify().is_err());
}
