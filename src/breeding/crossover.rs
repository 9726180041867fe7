//! # Crossover
//!
//! Recombination of two parent chromosomes into two children. The segment
//! swapping kinds exchange whole position ranges and suit any schema whose
//! positions are independent. Permutation schemas need the order-preserving
//! kinds, which never duplicate a value.

use std::collections::{HashMap, HashSet};

use crate::error::{GeneticError, Result};
use crate::genome::{Allele, Chromosome, ChromosomeSchema};
use crate::rng::RandomNumberGenerator;

/// The crossover operator of a run.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CrossoverKind {
    /// One cut point, tails exchanged.
    SinglePoint,
    /// `k` distinct cut points, every other segment exchanged.
    MultiPoint(usize),
    /// Order crossover (OX1) for permutations.
    Order,
    /// Partially matched crossover (PMX) for permutations.
    PartiallyMatched,
}

/// Two children and whether recombination actually happened.
#[derive(Debug, Clone, PartialEq)]
pub struct Crossed<T> {
    pub first: Chromosome<T>,
    pub second: Chromosome<T>,
    pub applied: bool,
}

impl CrossoverKind {
    /// `Order` for permutation schemas, `SinglePoint` otherwise.
    pub fn default_for<T: Allele>(schema: &ChromosomeSchema<T>) -> Self {
        if schema.is_permutation() {
            CrossoverKind::Order
        } else {
            CrossoverKind::SinglePoint
        }
    }

    pub fn preserves_permutations(&self) -> bool {
        matches!(self, CrossoverKind::Order | CrossoverKind::PartiallyMatched)
    }

    /// Rejects kinds that cannot keep chromosomes of `schema` valid.
    pub fn validate<T: Allele>(&self, schema: &ChromosomeSchema<T>) -> Result<()> {
        if let CrossoverKind::MultiPoint(0) = self {
            return Err(GeneticError::Configuration(
                "Multi-point crossover needs at least one cut point".to_string(),
            ));
        }
        if schema.is_permutation() && !self.preserves_permutations() {
            return Err(GeneticError::Configuration(format!(
                "{:?} crossover would duplicate values in a permutation; use Order or PartiallyMatched",
                self
            )));
        }
        if !schema.is_permutation() && self.preserves_permutations() {
            return Err(GeneticError::Configuration(format!(
                "{:?} crossover requires a permutation schema",
                self
            )));
        }
        Ok(())
    }

    /// With probability `rate`, recombines `first` and `second`. Otherwise,
    /// and always for chromosomes shorter than two genes, the children are
    /// copies of the parents.
    pub fn crossover<T: Allele>(
        &self,
        first: &Chromosome<T>,
        second: &Chromosome<T>,
        rate: f64,
        rng: &mut RandomNumberGenerator,
    ) -> Crossed<T> {
        let length = first.len();
        if length < 2 || !rng.chance(rate) {
            return Crossed {
                first: first.clone(),
                second: second.clone(),
                applied: false,
            };
        }

        let (a, b) = (first.genes(), second.genes());
        let (x, y) = match self {
            CrossoverKind::SinglePoint => {
                let cut = 1 + rng.gen_index(length - 1);
                swap_segments(a, b, &[cut])
            }
            CrossoverKind::MultiPoint(points) => {
                let points = (*points).clamp(1, length - 1);
                let mut cuts: Vec<usize> = rng
                    .distinct_indices(length - 1, points)
                    .into_iter()
                    .map(|c| c + 1)
                    .collect();
                cuts.sort_unstable();
                swap_segments(a, b, &cuts)
            }
            CrossoverKind::Order => {
                let (start, end) = segment(length, rng);
                (order_child(a, b, start, end), order_child(b, a, start, end))
            }
            CrossoverKind::PartiallyMatched => {
                let (start, end) = segment(length, rng);
                (pmx_child(a, b, start, end), pmx_child(b, a, start, end))
            }
        };

        Crossed {
            first: Chromosome::from_genes(x),
            second: Chromosome::from_genes(y),
            applied: true,
        }
    }
}

/// Two distinct positions `start < end`.
fn segment(length: usize, rng: &mut RandomNumberGenerator) -> (usize, usize) {
    let picked = rng.distinct_indices(length, 2);
    (picked[0].min(picked[1]), picked[0].max(picked[1]))
}

/// Exchanges every other segment between the sorted `cuts`.
fn swap_segments<T: Clone>(a: &[T], b: &[T], cuts: &[usize]) -> (Vec<T>, Vec<T>) {
    let mut x = a.to_vec();
    let mut y = b.to_vec();

    let mut bounds = cuts.to_vec();
    bounds.push(a.len());

    let mut from = 0;
    for (index, &to) in bounds.iter().enumerate() {
        if index % 2 == 1 {
            x[from..to].clone_from_slice(&b[from..to]);
            y[from..to].clone_from_slice(&a[from..to]);
        }
        from = to;
    }
    (x, y)
}

/// Keeps `donor[start..=end]` in place and fills the other positions, starting
/// after the segment and wrapping around, with the genes of `other` in their
/// cyclic order, skipping values already present.
fn order_child<T: Allele>(donor: &[T], other: &[T], start: usize, end: usize) -> Vec<T> {
    let length = donor.len();
    let mut child: Vec<Option<T>> = vec![None; length];
    let mut used = HashSet::with_capacity(length);

    for position in start..=end {
        used.insert(donor[position].key());
        child[position] = Some(donor[position].clone());
    }

    let fill = (1..=length).map(|offset| (end + offset) % length);
    let mut candidates = (1..=length)
        .map(|offset| &other[(end + offset) % length])
        .filter(|gene| !used.contains(&gene.key()));

    for position in fill.filter(|&p| p < start || p > end) {
        // `other` holds `length` distinct values, at most `end - start + 1` of
        // them are in the kept segment.
        child[position] = candidates.next().cloned();
    }

    child
        .into_iter()
        .zip(donor)
        .map(|(gene, fallback)| gene.unwrap_or_else(|| fallback.clone()))
        .collect()
}

/// Keeps `donor[start..=end]` in place; every other position takes the gene
/// of `other`, following the segment's value mapping until the value is no
/// longer part of the kept segment.
fn pmx_child<T: Allele>(donor: &[T], other: &[T], start: usize, end: usize) -> Vec<T> {
    let segment_positions: HashMap<T::Key, usize> = (start..=end)
        .map(|position| (donor[position].key(), position))
        .collect();

    (0..donor.len())
        .map(|position| {
            if (start..=end).contains(&position) {
                return donor[position].clone();
            }
            let mut gene = &other[position];
            while let Some(&mapped) = segment_positions.get(&gene.key()) {
                gene = &other[mapped];
            }
            gene.clone()
        })
        .collect()
}
