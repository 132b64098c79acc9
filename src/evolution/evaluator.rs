use crate::chromosome::Chromosome;
use crate::error::{GeneticError, Result};

/// Scores a chromosome. Lower or higher is better depending on the run's
/// `minimize` flag.
///
/// Any `Fn(&Chromosome) -> f64` is an evaluator.
pub trait Evaluator {
    fn evaluate(&self, chromosome: &Chromosome) -> f64;
}

impl<F> Evaluator for F
where
    F: Fn(&Chromosome) -> f64,
{
    fn evaluate(&self, chromosome: &Chromosome) -> f64 {
        self(chromosome)
    }
}

/// Scores `chromosome` and stores the result as its fitness.
///
/// # Errors
///
/// Returns `GeneticError::FitnessCalculation` if the score is not finite.
pub fn evaluate_into<E: Evaluator + ?Sized>(evaluator: &E, chromosome: &mut Chromosome) -> Result<()> {
    let score = evaluator.evaluate(chromosome);
    if !score.is_finite() {
        return Err(GeneticError::FitnessCalculation(format!(
            "Non-finite fitness score encountered: {}",
            score
        )));
    }
    chromosome.set_fitness(score);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    struct SumOfGenes;

    impl Evaluator for SumOfGenes {
        fn evaluate(&self, chromosome: &Chromosome) -> f64 {
            chromosome.genes().iter().sum()
        }
    }

    #[test]
    fn test_struct_and_closure_evaluators() {
        let mut c = Chromosome::from_genes(vec![1.0, 2.0, 3.0]).unwrap();
        evaluate_into(&SumOfGenes, &mut c).unwrap();
        assert_eq!(c.fitness(), 6.0);

        let first = |c: &Chromosome| c.genes()[0];
        evaluate_into(&first, &mut c).unwrap();
        assert_eq!(c.fitness(), 1.0);
    }

    #[test]
    fn test_non_finite_score_rejected() {
        let mut c = Chromosome::new(2).unwrap();
        let nan = |_: &Chromosome| f64::NAN;
        assert!(matches!(
            evaluate_into(&nan, &mut c),
            Err(GeneticError::FitnessCalculation(_))
        ));
    }
}
