//! Per-generation statistics and the outcome of a run.

use std::fmt;

use crate::genome::Chromosome;

/// Summary of one evaluated generation.
///
/// Generation 0 is the initial population. The operator counters describe the
/// breeding that produced this generation, so they are zero for generation 0.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, PartialEq)]
pub struct GenerationRecord {
    pub generation: usize,
    pub best: f64,
    pub mean: f64,
    pub worst: f64,
    pub variance: f64,
    pub crossovers: usize,
    pub mutations: usize,
    pub inversions: usize,
    /// Objective calls made for this generation (cache hits excluded).
    pub evaluations: usize,
    /// Best fitness seen in this or any earlier generation.
    pub best_ever: f64,
}

/// Why a run stopped.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TerminationReason {
    MaxGenerations,
    TargetReached,
    Stagnation,
    Cancelled,
}

impl fmt::Display for TerminationReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let reason = match self {
            TerminationReason::MaxGenerations => "maximum generations reached",
            TerminationReason::TargetReached => "target fitness reached",
            TerminationReason::Stagnation => "no improvement within the stagnation window",
            TerminationReason::Cancelled => "cancelled",
        };
        f.write_str(reason)
    }
}

/// The outcome of a completed run.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, PartialEq)]
pub struct EvolutionResult<T> {
    /// The best chromosome seen in any generation.
    pub best: Chromosome<T>,
    /// The raw fitness of `best`.
    pub fitness: f64,
    pub reason: TerminationReason,
    /// Index of the last evaluated generation.
    pub generations: usize,
    pub history: Vec<GenerationRecord>,
    /// The seed the run was drawn from; pass it back to reproduce the run.
    pub seed: u64,
}
