//! # StandardBreeding
//!
//! The `StandardBreeding` strategy recombines two parents with the configured
//! crossover and then passes each child through mutation and inversion, in
//! that order.
use super::{inversion::invert, BreedContext, BreedStrategy, Brood, Offspring};
use crate::{
    error::Result,
    genome::{Allele, Chromosome, ChromosomeSchema},
    rng::RandomNumberGenerator,
};

/// # StandardBreeding
///
/// Crossover, then mutation, then inversion. This is the strategy every
/// launcher uses unless a custom [`BreedStrategy`] is supplied.
#[derive(Debug, Clone, Copy, Default)]
pub struct StandardBreeding;

impl StandardBreeding {
    fn finish<T: Allele>(
        &self,
        schema: &ChromosomeSchema<T>,
        child: Chromosome<T>,
        context: &BreedContext,
        rng: &mut RandomNumberGenerator,
    ) -> Result<Offspring<T>> {
        let (mutated, mutations) = context.mutation.mutate(
            schema,
            &child,
            context.mutation_rate,
            context.sigma_scale,
            rng,
        )?;
        let (chromosome, inverted) = invert(&mutated, context.inversion_rate, rng);

        Ok(Offspring {
            chromosome,
            mutations,
            inverted,
        })
    }
}

impl<T: Allele> BreedStrategy<T> for StandardBreeding {
    fn breed(
        &self,
        schema: &ChromosomeSchema<T>,
        first: &Chromosome<T>,
        second: &Chromosome<T>,
        context: &BreedContext,
        rng: &mut RandomNumberGenerator,
    ) -> Result<Brood<T>> {
        let crossed = context
            .crossover
            .crossover(first, second, context.crossover_rate, rng);

        Ok(Brood {
            first: self.finish(schema, crossed.first, context, rng)?,
            second: self.finish(schema, crossed.second, context, rng)?,
            crossed: crossed.applied,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::breeding::{CrossoverKind, MutationKind};
    use crate::genome::Alphabet;

    fn context(crossover_rate: f64, mutation_rate: f64, inversion_rate: f64) -> BreedContext {
        BreedContext {
            crossover: CrossoverKind::SinglePoint,
            mutation: MutationKind::Resample,
            crossover_rate,
            mutation_rate,
            inversion_rate,
            sigma_scale: 1.0,
        }
    }

    #[test]
    fn test_no_operators_copies_parents() {
        let schema = ChromosomeSchema::uniform(Alphabet::<u8>::binary(), 5).unwrap();
        let a = schema.chromosome(vec![0, 0, 0, 0, 0]).unwrap();
        let b = schema.chromosome(vec![1, 1, 1, 1, 1]).unwrap();
        let mut rng = RandomNumberGenerator::from_seed(1);

        let brood = StandardBreeding
            .breed(&schema, &a, &b, &context(0.0, 0.0, 0.0), &mut rng)
            .unwrap();

        assert!(!brood.crossed);
        assert_eq!(brood.first.chromosome, a);
        assert_eq!(brood.second.chromosome, b);
        assert_eq!(brood.first.mutations + brood.second.mutations, 0);
    }

    #[test]
    fn test_crossover_conserves_genes() {
        let schema = ChromosomeSchema::uniform(Alphabet::<u8>::binary(), 5).unwrap();
        let a = schema.chromosome(vec![0, 0, 0, 0, 0]).unwrap();
        let b = schema.chromosome(vec![1, 1, 1, 1, 1]).unwrap();
        let mut rng = RandomNumberGenerator::from_seed(2);

        for _ in 0..20 {
            let brood = StandardBreeding
                .breed(&schema, &a, &b, &context(1.0, 0.0, 0.0), &mut rng)
                .unwrap();
            assert!(brood.crossed);

            let ones: usize = brood
                .first
                .chromosome
                .genes()
                .iter()
                .chain(brood.second.chromosome.genes())
                .map(|&g| g as usize)
                .sum();
            assert_eq!(ones, 5);
        }
    }

    #[test]
    fn test_permutation_offspring_stay_valid() {
        let schema = ChromosomeSchema::uniform(Alphabet::indices(12).unwrap(), 12).unwrap();
        let mut rng = RandomNumberGenerator::from_seed(3);
        let context = BreedContext {
            crossover: CrossoverKind::PartiallyMatched,
            mutation: MutationKind::Swap,
            crossover_rate: 0.8,
            mutation_rate: 0.2,
            inversion_rate: 0.3,
            sigma_scale: 1.0,
        };

        for _ in 0..100 {
            let a = schema.random_chromosome(&mut rng).unwrap();
            let b = schema.random_chromosome(&mut rng).unwrap();
            let brood = StandardBreeding
                .breed(&schema, &a, &b, &context, &mut rng)
                .unwrap();

            assert!(schema.validate(&brood.first.chromosome).is_ok());
            assert!(schema.validate(&brood.second.chromosome).is_ok());
        }
    }
}
