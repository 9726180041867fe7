//! # Fitness Scaling
//!
//! Maps oriented fitness values to non-negative selection weights for
//! fitness-proportionate selection.
//!
//! - [`FitnessScaling::Raw`] uses the values as they are; they must be
//!   non-negative.
//! - [`FitnessScaling::Rank`] replaces each value by its rank (worst = 1),
//!   with tied values sharing the mean of their ranks.
//! - [`FitnessScaling::Linear`] rescales the values so the best individual
//!   gets `factor` times the average weight while the average weight stays
//!   equal to the average fitness. Negative weights are clamped to zero.

use std::cmp::Ordering;

use crate::error::{GeneticError, Result};

/// How fitness values are turned into selection weights.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FitnessScaling {
    Raw,
    Rank,
    Linear {
        factor: f64,
    },
}

impl Default for FitnessScaling {
    fn default() -> Self {
        FitnessScaling::linear()
    }
}

impl FitnessScaling {
    /// Linear scaling with the common factor of 1.6.
    pub fn linear() -> Self {
        FitnessScaling::Linear { factor: 1.6 }
    }

    pub(crate) fn validate(&self) -> Result<()> {
        match self {
            FitnessScaling::Linear { factor } if !factor.is_finite() || *factor < 1.0 => {
                Err(GeneticError::Configuration(format!(
                    "Linear scaling factor must be a finite value of at least 1, got {}",
                    factor
                )))
            }
            _ => Ok(()),
        }
    }

    /// Computes one non-negative weight per fitness value.
    ///
    /// # Errors
    ///
    /// Returns a `Selection` error if `Raw` scaling meets a negative value.
    pub fn apply(&self, fitness: &[f64]) -> Result<Vec<f64>> {
        match self {
            FitnessScaling::Raw => {
                if let Some(value) = fitness.iter().find(|&&f| f < 0.0) {
                    return Err(GeneticError::Selection(format!(
                        "Proportionate selection needs non-negative fitness, found {}; \
                         use rank or linear scaling",
                        value
                    )));
                }
                Ok(fitness.to_vec())
            }
            FitnessScaling::Rank => Ok(average_ranks(fitness)),
            FitnessScaling::Linear { factor } => {
                self.validate()?;
                Ok(linear_scale(fitness, *factor))
            }
        }
    }
}

/// 1-based ascending ranks; tied values share the mean of their ranks.
fn average_ranks(fitness: &[f64]) -> Vec<f64> {
    let mut order: Vec<usize> = (0..fitness.len()).collect();
    order.sort_by(|&a, &b| {
        fitness[a]
            .partial_cmp(&fitness[b])
            .unwrap_or(Ordering::Equal)
    });

    let mut ranks = vec![0.0; fitness.len()];
    let mut start = 0;
    while start < order.len() {
        let mut end = start + 1;
        while end < order.len() && fitness[order[end]] == fitness[order[start]] {
            end += 1;
        }
        // Positions start..end hold ranks start+1..=end.
        let shared = (start + 1 + end) as f64 / 2.0;
        for &index in &order[start..end] {
            ranks[index] = shared;
        }
        start = end;
    }
    ranks
}

fn linear_scale(fitness: &[f64], factor: f64) -> Vec<f64> {
    let raw_min = fitness.iter().copied().fold(f64::INFINITY, f64::min);
    let shift = if raw_min < 0.0 { -raw_min } else { 0.0 };
    let shifted: Vec<f64> = fitness.iter().map(|f| f + shift).collect();

    let count = shifted.len() as f64;
    let min = shifted.iter().copied().fold(f64::INFINITY, f64::min);
    let max = shifted.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let avg = shifted.iter().sum::<f64>() / count;

    if max - avg <= f64::EPSILON * max.abs().max(1.0) {
        return vec![1.0; shifted.len()];
    }

    // Keep the scaled minimum non-negative when the full factor would push it
    // below zero.
    let slope = if avg <= (max + min * (factor - 1.0)) / factor {
        avg * (factor - 1.0) / (max - avg)
    } else {
        avg / (avg - min)
    };
    let intercept = avg * (1.0 - slope);

    shifted
        .iter()
        .map(|f| (slope * f + intercept).max(0.0))
        .collect()
}
