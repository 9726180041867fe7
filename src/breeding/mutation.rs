//! # Mutation
//!
//! Point changes to a single chromosome. Every kind visits each position once
//! and acts on it with probability `rate`, so a rate of zero never changes a
//! chromosome.

use rand_distr::{Distribution, Normal};

use crate::error::{GeneticError, Result, ResultExt};
use crate::genome::{Allele, Alphabet, Chromosome, ChromosomeSchema};
use crate::rng::RandomNumberGenerator;

/// The mutation operator of a run.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MutationKind {
    /// Replace the gene by a different value from its alphabet.
    Resample,
    /// Add normal noise scaled to the width of the position's range and
    /// clamp to the range. `sigma` is relative to that width; `adapt` is the
    /// factor the run applies to the spread as it adapts.
    Gaussian { sigma: f64, adapt: f64 },
    /// Exchange the gene with the gene at another random position.
    Swap,
}

impl MutationKind {
    /// Gaussian mutation with a spread of a fifth of the range and an
    /// adaptation factor of 0.85.
    pub fn gaussian() -> Self {
        MutationKind::Gaussian {
            sigma: 0.2,
            adapt: 0.85,
        }
    }

    /// `Swap` for permutation schemas, `Resample` otherwise.
    pub fn default_for<T: Allele>(schema: &ChromosomeSchema<T>) -> Self {
        if schema.is_permutation() {
            MutationKind::Swap
        } else {
            MutationKind::Resample
        }
    }

    /// Rejects kinds that cannot keep chromosomes of `schema` valid.
    pub fn validate<T: Allele>(&self, schema: &ChromosomeSchema<T>) -> Result<()> {
        match self {
            MutationKind::Resample | MutationKind::Gaussian { .. } if schema.is_permutation() => {
                Err(GeneticError::Configuration(format!(
                    "{:?} mutation would duplicate values in a permutation; use Swap",
                    self
                )))
            }
            MutationKind::Gaussian { .. } if !schema.is_numeric() => {
                Err(GeneticError::Configuration(
                    "Gaussian mutation requires a numeric range alphabet at every position"
                        .to_string(),
                ))
            }
            MutationKind::Gaussian { sigma, adapt } => {
                if !sigma.is_finite() || *sigma <= 0.0 {
                    return Err(GeneticError::Configuration(format!(
                        "Gaussian sigma must be positive and finite, got {}",
                        sigma
                    )));
                }
                if !(*adapt > 0.0 && *adapt <= 1.0) {
                    return Err(GeneticError::Configuration(format!(
                        "Gaussian adaptation factor must be in (0, 1], got {}",
                        adapt
                    )));
                }
                Ok(())
            }
            MutationKind::Swap if !schema.is_homogeneous() => Err(GeneticError::Configuration(
                "Swap mutation requires every position to share one alphabet".to_string(),
            )),
            _ => Ok(()),
        }
    }

    /// Returns the mutated chromosome and the number of positions changed.
    ///
    /// `sigma_scale` multiplies the Gaussian spread; other kinds ignore it.
    pub fn mutate<T: Allele>(
        &self,
        schema: &ChromosomeSchema<T>,
        chromosome: &Chromosome<T>,
        rate: f64,
        sigma_scale: f64,
        rng: &mut RandomNumberGenerator,
    ) -> Result<(Chromosome<T>, usize)> {
        let mut genes = chromosome.genes().to_vec();
        let mut changed = 0;

        match self {
            MutationKind::Resample => {
                for (position, gene) in genes.iter_mut().enumerate() {
                    if !rng.chance(rate) {
                        continue;
                    }
                    if let Some(value) = schema.alphabet_at(position).sample_excluding(gene, rng) {
                        *gene = value;
                        changed += 1;
                    }
                }
            }
            MutationKind::Gaussian { sigma, .. } => {
                for (position, gene) in genes.iter_mut().enumerate() {
                    if !rng.chance(rate) {
                        continue;
                    }
                    if let Some(value) =
                        gaussian_step(schema.alphabet_at(position), gene, sigma * sigma_scale, rng)?
                    {
                        if value != *gene {
                            *gene = value;
                            changed += 1;
                        }
                    }
                }
            }
            MutationKind::Swap => {
                let length = genes.len();
                if length >= 2 {
                    for position in 0..length {
                        if !rng.chance(rate) {
                            continue;
                        }
                        let mut other = rng.gen_index(length - 1);
                        if other >= position {
                            other += 1;
                        }
                        genes.swap(position, other);
                        changed += 1;
                    }
                }
            }
        }

        Ok((Chromosome::from_genes(genes), changed))
    }
}

/// One perturbed value, or `None` when the alphabet is not a proper range.
fn gaussian_step<T: Allele>(
    alphabet: &Alphabet<T>,
    gene: &T,
    relative_sigma: f64,
    rng: &mut RandomNumberGenerator,
) -> Result<Option<T>> {
    let Some((low, high)) = alphabet.bounds() else {
        return Ok(None);
    };
    let (low, high) = (low.to_f64(), high.to_f64());
    let width = high - low;
    if width <= 0.0 {
        return Ok(None);
    }

    let normal = Normal::new(0.0, relative_sigma * width).context("Invalid Gaussian spread")?;
    let value = (gene.to_f64() + normal.sample(rng)).clamp(low, high);
    Ok(Some(T::from_f64(value)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_rate_zero_is_identity() {
        let schema = ChromosomeSchema::uniform(Alphabet::range(0i32, 9).unwrap(), 8).unwrap();
        let mut rng = RandomNumberGenerator::from_seed(1);
        let chromosome = schema.random_chromosome(&mut rng).unwrap();

        for kind in [MutationKind::Resample, MutationKind::gaussian(), MutationKind::Swap] {
            let (mutated, changed) = kind.mutate(&schema, &chromosome, 0.0, 1.0, &mut rng).unwrap();
            assert_eq!(mutated, chromosome);
            assert_eq!(changed, 0);
        }
    }

    #[test]
    fn test_resample_rate_one_changes_every_position() {
        let schema = ChromosomeSchema::uniform(Alphabet::<u8>::binary(), 6).unwrap();
        let chromosome = schema.chromosome(vec![0, 1, 0, 1, 1, 0]).unwrap();
        let mut rng = RandomNumberGenerator::from_seed(2);

        let (mutated, changed) = MutationKind::Resample
            .mutate(&schema, &chromosome, 1.0, 1.0, &mut rng)
            .unwrap();
        assert_eq!(mutated.genes(), &[1, 0, 1, 0, 0, 1]);
        assert_eq!(changed, 6);
    }

    #[test]
    fn test_resample_skips_single_valued_positions() {
        let schema = ChromosomeSchema::per_position(vec![
            Alphabet::discrete(vec![7u8]).unwrap(),
            Alphabet::discrete(vec![1u8, 2, 3]).unwrap(),
        ])
        .unwrap();
        let chromosome = schema.chromosome(vec![7, 2]).unwrap();
        let mut rng = RandomNumberGenerator::from_seed(3);

        let (mutated, changed) = MutationKind::Resample
            .mutate(&schema, &chromosome, 1.0, 1.0, &mut rng)
            .unwrap();
        assert_eq!(mutated[0], 7);
        assert_ne!(mutated[1], 2);
        assert_eq!(changed, 1);
    }

    #[test]
    fn test_gaussian_stays_in_range() {
        let schema = ChromosomeSchema::uniform(Alphabet::range(-1.0f64, 1.0).unwrap(), 5).unwrap();
        let mut rng = RandomNumberGenerator::from_seed(4);
        let mut chromosome = schema.random_chromosome(&mut rng).unwrap();

        for _ in 0..200 {
            let (mutated, _) = MutationKind::Gaussian {
                sigma: 2.0,
                adapt: 0.85,
            }
            .mutate(&schema, &chromosome, 1.0, 1.0, &mut rng)
            .unwrap();
            assert!(schema.validate(&mutated).is_ok());
            chromosome = mutated;
        }
    }

    #[test]
    fn test_gaussian_spread_follows_scale() {
        let schema = ChromosomeSchema::uniform(Alphabet::range(0.0f64, 100.0).unwrap(), 1).unwrap();
        let chromosome = schema.chromosome(vec![50.0]).unwrap();
        let mut rng = RandomNumberGenerator::from_seed(5);

        let mean_step = |scale: f64, rng: &mut RandomNumberGenerator| {
            (0..500)
                .map(|_| {
                    let (mutated, _) = MutationKind::gaussian()
                        .mutate(&schema, &chromosome, 1.0, scale, rng)
                        .unwrap();
                    (mutated[0] - 50.0).abs()
                })
                .sum::<f64>()
                / 500.0
        };

        let wide = mean_step(1.0, &mut rng);
        let narrow = mean_step(0.1, &mut rng);
        assert!(narrow * 4.0 < wide, "narrow = {}, wide = {}", narrow, wide);
    }

    #[test]
    fn test_swap_preserves_multiset() {
        let schema = ChromosomeSchema::uniform(Alphabet::indices(9).unwrap(), 9).unwrap();
        let mut rng = RandomNumberGenerator::from_seed(6);
        let chromosome = schema.random_chromosome(&mut rng).unwrap();

        for _ in 0..100 {
            let (mutated, changed) = MutationKind::Swap
                .mutate(&schema, &chromosome, 0.5, 1.0, &mut rng)
                .unwrap();
            assert!(schema.validate(&mutated).is_ok());
            let before: HashSet<_> = chromosome.genes().iter().collect();
            let after: HashSet<_> = mutated.genes().iter().collect();
            assert_eq!(before, after);
            assert!(changed <= 9);
        }
    }

    #[test]
    fn test_validate_against_schema() {
        let tour = ChromosomeSchema::uniform(Alphabet::indices(5).unwrap(), 5).unwrap();
        let reals = ChromosomeSchema::uniform(Alphabet::range(0.0f64, 1.0).unwrap(), 3).unwrap();
        let bits = ChromosomeSchema::uniform(Alphabet::<u8>::binary(), 3).unwrap();
        let mixed = ChromosomeSchema::per_position(vec![
            Alphabet::range(0i32, 4).unwrap(),
            Alphabet::range(0i32, 9).unwrap(),
        ])
        .unwrap();

        assert!(MutationKind::Swap.validate(&tour).is_ok());
        assert!(MutationKind::Resample.validate(&tour).is_err());
        assert!(MutationKind::gaussian().validate(&tour).is_err());
        assert!(MutationKind::gaussian().validate(&reals).is_ok());
        assert!(MutationKind::gaussian().validate(&bits).is_err());
        assert!(MutationKind::gaussian().validate(&mixed).is_ok());
        assert!(MutationKind::Swap.validate(&mixed).is_err());
        assert!(MutationKind::Gaussian { sigma: 0.0, adapt: 0.5 }
            .validate(&reals)
            .is_err());
        assert!(MutationKind::Gaussian { sigma: 0.1, adapt: 1.5 }
            .validate(&reals)
            .is_err());

        assert_eq!(MutationKind::default_for(&tour), MutationKind::Swap);
        assert_eq!(MutationKind::default_for(&bits), MutationKind::Resample);
    }
}
