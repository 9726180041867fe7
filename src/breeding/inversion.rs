use crate::error::{GeneticError, Result};
use crate::genome::{Allele, Chromosome, ChromosomeSchema};
use crate::rng::RandomNumberGenerator;

/// With probability `rate`, reverses the genes between two distinct random
/// positions (both inclusive). Returns the new chromosome and whether it was
/// inverted. Chromosomes shorter than two genes are returned unchanged.
pub fn invert<T: Allele>(
    chromosome: &Chromosome<T>,
    rate: f64,
    rng: &mut RandomNumberGenerator,
) -> (Chromosome<T>, bool) {
    let length = chromosome.len();
    if length < 2 || !rng.chance(rate) {
        return (chromosome.clone(), false);
    }

    let picked = rng.distinct_indices(length, 2);
    let (start, end) = (picked[0].min(picked[1]), picked[0].max(picked[1]));

    let mut genes = chromosome.genes().to_vec();
    genes[start..=end].reverse();
    (Chromosome::from_genes(genes), true)
}

/// Inversion moves genes between positions, so all positions must share one
/// alphabet whenever it can happen.
pub fn validate_inversion<T: Allele>(schema: &ChromosomeSchema<T>, rate: f64) -> Result<()> {
    if rate > 0.0 && !schema.is_homogeneous() {
        return Err(GeneticError::Configuration(
            "Inversion requires every position to share one alphabet".to_string(),
        ));
    }
    Ok(())
}
