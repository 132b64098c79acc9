use genpool::{
    chromosome::{Chromosome, DataType},
    crossover::{self, CrossoverKind},
    registry::OperatorChoice,
    rng::RandomNumberGenerator,
};
use proptest::prelude::*;

const PERMUTATION_OPERATORS: [CrossoverKind; 7] = [
    CrossoverKind::Order1,
    CrossoverKind::Order2,
    CrossoverKind::Position,
    CrossoverKind::Cycle,
    CrossoverKind::Pmx,
    CrossoverKind::Uox,
    CrossoverKind::Asexual,
];

fn parents() -> impl Strategy<Value = (Vec<f64>, Vec<f64>)> {
    (4usize..40).prop_flat_map(|n| {
        let identity: Vec<f64> = (1..=n).map(|i| i as f64).collect();
        (
            Just(identity.clone()).prop_shuffle(),
            Just(identity).prop_shuffle(),
        )
    })
}

fn chromosome(genes: &[f64]) -> Chromosome {
    Chromosome::from_genes(genes.to_vec()).unwrap()
}

proptest! {
    #[test]
    fn every_operator_keeps_permutations((g1, g2) in parents(), seed in any::<u64>()) {
        let (p1, p2) = (chromosome(&g1), chromosome(&g2));
        let mut rng = RandomNumberGenerator::from_seed(seed);
        for kind in PERMUTATION_OPERATORS {
            let mut c1 = Chromosome::new(1).unwrap();
            let mut c2 = Chromosome::new(1).unwrap();
            crossover::apply_builtin(
                kind,
                DataType::Permutation,
                (&p1, &p2),
                (&mut c1, &mut c2),
                &mut rng,
            )
            .unwrap();
            prop_assert!(c1.verify(DataType::Permutation).is_ok(), "{:?} broke child 1", kind);
            prop_assert!(c2.verify(DataType::Permutation).is_ok(), "{:?} broke child 2", kind);
            prop_assert_eq!(c1.len(), g1.len());
            prop_assert_eq!(c2.len(), g1.len());
        }
    }

    #[test]
    fn order1_keeps_the_segment((g1, g2) in parents(), a in 0usize..40, b in 0usize..40) {
        let n = g1.len();
        let (a, b) = (a % n, b % n);
        let (xp1, xp2) = (a.min(b), a.max(b));
        let (p1, p2) = (chromosome(&g1), chromosome(&g2));
        let mut c1 = Chromosome::new(n).unwrap();
        let mut c2 = Chromosome::new(n).unwrap();
        crossover::order1_at(&p1, &p2, &mut c1, &mut c2, xp1, xp2).unwrap();
        prop_assert_eq!(&c1.genes()[xp1..=xp2], &g1[xp1..=xp2]);
        prop_assert_eq!(&c2.genes()[xp1..=xp2], &g2[xp1..=xp2]);
    }

    #[test]
    fn cycle_takes_each_gene_from_a_parent((g1, g2) in parents(), seed in any::<u64>()) {
        let (p1, p2) = (chromosome(&g1), chromosome(&g2));
        let mut c1 = Chromosome::new(1).unwrap();
        let mut c2 = Chromosome::new(1).unwrap();
        let mut rng = RandomNumberGenerator::from_seed(seed);
        crossover::cycle(&p1, &p2, &mut c1, &mut c2, &mut rng).unwrap();
        for i in 0..g1.len() {
            prop_assert!(c1.genes()[i] == g1[i] || c1.genes()[i] == g2[i]);
            prop_assert!(c2.genes()[i] == g1[i] || c2.genes()[i] == g2[i]);
        }
    }

    #[test]
    fn identical_parents_give_identical_children(
        (g1, _) in parents(),
        seed in any::<u64>(),
    ) {
        let p = chromosome(&g1);
        let mut rng = RandomNumberGenerator::from_seed(seed);
        for kind in PERMUTATION_OPERATORS {
            if kind == CrossoverKind::Asexual {
                continue;
            }
            let mut c1 = Chromosome::new(1).unwrap();
            let mut c2 = Chromosome::new(1).unwrap();
            crossover::apply_builtin(kind, DataType::Permutation, (&p, &p), (&mut c1, &mut c2), &mut rng)
                .unwrap();
            prop_assert_eq!(c1.genes(), p.genes(), "{:?}", kind);
            prop_assert_eq!(c2.genes(), p.genes(), "{:?}", kind);
        }
    }
}

#[test]
fn test_dispatch_clones_parents_at_zero_rate() {
    let p1 = chromosome(&[1.0, 2.0, 3.0, 4.0, 5.0]);
    let p2 = chromosome(&[5.0, 4.0, 3.0, 2.0, 1.0]);
    let mut c1 = Chromosome::new(5).unwrap();
    let mut c2 = Chromosome::new(5).unwrap();
    let mut rng = RandomNumberGenerator::from_seed(9);
    let pmx = OperatorChoice::Builtin(CrossoverKind::Pmx);
    for _ in 0..100 {
        crossover::crossover(
            &pmx,
            DataType::Permutation,
            0.0,
            (&p1, &p2),
            (&mut c1, &mut c2),
            &mut rng,
        )
        .unwrap();
        assert_eq!(c1.genes(), p1.genes());
        assert_eq!(c2.genes(), p2.genes());
    }
}

#[test]
fn test_bit_operator_rejected_for_permutations() {
    let p = chromosome(&[1.0, 2.0, 3.0, 4.0]);
    let mut c1 = Chromosome::new(4).unwrap();
    let mut c2 = Chromosome::new(4).unwrap();
    let mut rng = RandomNumberGenerator::from_seed(1);
    let result = crossover::apply_builtin(
        CrossoverKind::Uniform,
        DataType::Permutation,
        (&p, &p),
        (&mut c1, &mut c2),
        &mut rng,
    );
    assert!(matches!(
        result,
        Err(genpool::error::GeneticError::IncompatibleDatatype { .. })
    ));
}
