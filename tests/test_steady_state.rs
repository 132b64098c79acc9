use std::sync::Arc;

use genpool::{
    chromosome::{Chromosome, DataType},
    error::Result,
    evolution::{Driver, GaConfig, RunState, Strategy},
    mutation::{MutationFn, MutationParams},
    rng::RandomNumberGenerator,
};

fn ones(c: &Chromosome) -> f64 {
    c.genes().iter().sum()
}

fn steady_config(replacement: &str) -> GaConfig {
    GaConfig::builder()
        .strategy(Strategy::SteadyState)
        .datatype(DataType::Bit)
        .chrom_len(16)
        .pool_size(20)
        .minimize(false)
        .crossover("simple")
        .mutation("simple_invert")
        .mu_rate(0.3)
        .replacement(replacement)
        .max_iter(300)
        .rand_seed(17)
        .build()
        .unwrap()
}

#[test]
fn test_by_rank_keeps_pool_ordered() {
    let mut driver = Driver::builder()
        .with_config(steady_config("by_rank"))
        .with_evaluator(ones)
        .build()
        .unwrap();
    for _ in 0..50 {
        if driver.next_generation().unwrap() != RunState::Iterating {
            break;
        }
        assert_eq!(driver.pool().len(), 20);
        let fitness: Vec<f64> = driver.pool().iter().map(Chromosome::fitness).collect();
        assert!(fitness.windows(2).all(|w| w[0] >= w[1]), "{:?}", fitness);
    }
}

#[test]
fn test_each_generation_is_one_trial() {
    let mut driver = Driver::builder()
        .with_config(steady_config("weakest"))
        .with_evaluator(ones)
        .build()
        .unwrap();
    driver.initialize().unwrap();
    for expected in 1..=10 {
        if driver.next_generation().unwrap() != RunState::Iterating {
            break;
        }
        assert_eq!(driver.generation(), expected);
        assert!(driver.mutations().num_mut <= 2);
    }
}

#[test]
fn test_worst_member_never_gets_worse() {
    for replacement in ["weakest", "first_weaker", "by_rank"] {
        let mut driver = Driver::builder()
            .with_config(steady_config(replacement))
            .with_evaluator(ones)
            .build()
            .unwrap();
        driver.initialize().unwrap();
        let mut worst = driver.pool().last_stats().min;
        let mut best = driver.pool().last_stats().max;
        while driver.next_generation().unwrap() == RunState::Iterating {
            let stats = driver.pool().last_stats();
            assert!(stats.min >= worst, "{} lowered the worst member", replacement);
            assert!(stats.max >= best, "{} lost the best member", replacement);
            worst = stats.min;
            best = stats.max;
        }
    }
}

#[test]
fn test_user_mutation_is_used() {
    let mut config = steady_config("weakest");
    let flip_first: Arc<MutationFn> = Arc::new(
        |c: &mut Chromosome, _: &MutationParams, _: &mut RandomNumberGenerator| -> Result<()> {
            c.genes_mut()[0] = 1.0;
            Ok(())
        },
    );
    config.set_mutation_fn("flip_first", flip_first);
    config.mu_rate = 1.0;
    assert_eq!(config.mutation_name(), "flip_first");

    let outcome = Driver::builder()
        .with_config(config)
        .with_evaluator(ones)
        .build()
        .unwrap()
        .run()
        .unwrap();
    // Every child of every trial is mutated.
    assert_eq!(outcome.total_mutations, 2 * outcome.generations);
}
