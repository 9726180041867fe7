//! # Population
//!
//! A [`Population`] is an immutable snapshot of one generation: every
//! chromosome paired with its raw fitness. The controller builds a fresh
//! snapshot each generation and drops the previous one.
//!
//! Chromosomes waiting to be scored are [`Candidate`]s; elites carried over
//! from the previous generation keep their cached fitness.

use crate::error::{GeneticError, Result};
use crate::genome::{Allele, Chromosome};

/// Direction of optimization.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Goal {
    #[default]
    Maximize,
    Minimize,
}

impl Goal {
    /// Maps a raw fitness to a value where higher is always better.
    pub fn orient(&self, fitness: f64) -> f64 {
        match self {
            Goal::Maximize => fitness,
            Goal::Minimize => -fitness,
        }
    }

    /// `true` if `candidate` is strictly better than `incumbent`.
    pub fn is_better(&self, candidate: f64, incumbent: f64) -> bool {
        self.orient(candidate) > self.orient(incumbent)
    }

    /// `true` if `fitness` meets or beats `target`.
    pub fn reaches(&self, fitness: f64, target: f64) -> bool {
        self.orient(fitness) >= self.orient(target)
    }
}

/// A chromosome awaiting (or carrying) its fitness.
#[derive(Debug, Clone, PartialEq)]
pub struct Candidate<T> {
    pub chromosome: Chromosome<T>,
    pub fitness: Option<f64>,
}

impl<T: Allele> Candidate<T> {
    pub fn new(chromosome: Chromosome<T>) -> Self {
        Self {
            chromosome,
            fitness: None,
        }
    }

    pub fn evaluated(chromosome: Chromosome<T>, fitness: f64) -> Self {
        Self {
            chromosome,
            fitness: Some(fitness),
        }
    }
}

/// Summary statistics of one population.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FitnessSummary {
    pub best: f64,
    pub mean: f64,
    pub worst: f64,
    pub variance: f64,
}

/// One generation: chromosomes with their raw fitness, index-aligned.
#[derive(Debug, Clone, PartialEq)]
pub struct Population<T> {
    chromosomes: Vec<Chromosome<T>>,
    fitness: Vec<f64>,
}

impl<T: Allele> Population<T> {
    /// # Errors
    ///
    /// - `EmptyPopulation` if there are no chromosomes.
    /// - `Other` if the two vectors differ in length.
    pub fn new(chromosomes: Vec<Chromosome<T>>, fitness: Vec<f64>) -> Result<Self> {
        if chromosomes.is_empty() {
            return Err(GeneticError::EmptyPopulation);
        }
        if chromosomes.len() != fitness.len() {
            return Err(GeneticError::Other(format!(
                "Fitness vector length ({}) doesn't match population length ({})",
                fitness.len(),
                chromosomes.len()
            )));
        }
        Ok(Self {
            chromosomes,
            fitness,
        })
    }

    pub fn len(&self) -> usize {
        self.chromosomes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.chromosomes.is_empty()
    }

    pub fn chromosomes(&self) -> &[Chromosome<T>] {
        &self.chromosomes
    }

    pub fn fitness(&self) -> &[f64] {
        &self.fitness
    }

    pub fn get(&self, index: usize) -> Option<(&Chromosome<T>, f64)> {
        self.chromosomes
            .get(index)
            .map(|chromosome| (chromosome, self.fitness[index]))
    }

    /// Fitness values mapped so that higher is better.
    pub fn oriented_fitness(&self, goal: Goal) -> Vec<f64> {
        self.fitness.iter().map(|&f| goal.orient(f)).collect()
    }

    /// Index of the best member; the lowest index wins among equals.
    pub fn best_index(&self, goal: Goal) -> usize {
        let mut best = 0;
        for (index, &fitness) in self.fitness.iter().enumerate().skip(1) {
            if goal.is_better(fitness, self.fitness[best]) {
                best = index;
            }
        }
        best
    }

    pub fn summary(&self, goal: Goal) -> FitnessSummary {
        let count = self.fitness.len() as f64;
        let mean = self.fitness.iter().sum::<f64>() / count;
        let variance = self
            .fitness
            .iter()
            .map(|f| (f - mean).powi(2))
            .sum::<f64>()
            / count;

        let mut best = self.fitness[0];
        let mut worst = self.fitness[0];
        for &fitness in &self.fitness[1..] {
            if goal.is_better(fitness, best) {
                best = fitness;
            }
            if goal.is_better(worst, fitness) {
                worst = fitness;
            }
        }

        FitnessSummary {
            best,
            mean,
            worst,
            variance,
        }
    }

    /// Splits the snapshot back into evaluated candidates.
    pub fn into_candidates(self) -> Vec<Candidate<T>> {
        self.chromosomes
            .into_iter()
            .zip(self.fitness)
            .map(|(chromosome, fitness)| Candidate::evaluated(chromosome, fitness))
            .collect()
    }
}
