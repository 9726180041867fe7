//! # FitnessEvaluator
//!
//! Scores the candidates of one generation. Candidates that already carry a
//! fitness (elites) are skipped. The rest are deduplicated by value through
//! the fitness cache, so the objective runs once per distinct chromosome.
//!
//! Distinct chromosomes are scored on rayon workers once there are at least
//! `parallel_threshold` of them. Results are gathered in candidate order and
//! the first failure by position wins, which makes parallel and sequential
//! evaluation indistinguishable.

use std::collections::HashMap;

use rayon::prelude::*;
use tracing::warn;

use super::{cancel::CancellationToken, challenge::Challenge};
use crate::{
    caching::{CacheKey, CacheType, FitnessCache},
    error::{GeneticError, Result},
    genome::{Allele, Chromosome},
    population::Candidate,
};

/// Fitness of every candidate of a generation, index-aligned.
#[derive(Debug, Clone, PartialEq)]
pub struct Evaluated {
    pub fitness: Vec<f64>,
    /// Number of objective calls made.
    pub evaluations: usize,
}

pub struct FitnessEvaluator<'a, T, C>
where
    T: Allele,
    C: Challenge<T> + ?Sized,
{
    challenge: &'a C,
    cache: FitnessCache<Vec<T::Key>>,
    cache_type: CacheType,
    penalty: Option<f64>,
    parallel_threshold: usize,
}

impl<'a, T, C> FitnessEvaluator<'a, T, C>
where
    T: Allele,
    C: Challenge<T> + ?Sized,
{
    pub fn new(
        challenge: &'a C,
        cache_type: CacheType,
        penalty: Option<f64>,
        parallel_threshold: usize,
    ) -> Self {
        Self {
            challenge,
            cache: FitnessCache::new(),
            cache_type,
            penalty,
            parallel_threshold,
        }
    }

    pub fn cache(&self) -> &FitnessCache<Vec<T::Key>> {
        &self.cache
    }

    /// Scores every candidate lacking a fitness.
    ///
    /// Returns `Ok(None)` if `cancel` fires before all scores are known.
    ///
    /// # Errors
    ///
    /// Returns an `Evaluation` error when the objective fails or produces a
    /// non-finite value and no penalty fitness is configured.
    pub fn evaluate(
        &mut self,
        candidates: &[Candidate<T>],
        cancel: Option<&CancellationToken>,
    ) -> Result<Option<Evaluated>> {
        if self.cache_type == CacheType::Generation {
            self.cache.clear();
        }

        // Slot of each candidate: a known score or an index into `pending`.
        let mut slots: Vec<std::result::Result<f64, usize>> = Vec::with_capacity(candidates.len());
        let mut pending: Vec<(&Chromosome<T>, Option<Vec<T::Key>>)> = Vec::new();
        let mut pending_by_key: HashMap<Vec<T::Key>, usize> = HashMap::new();

        for candidate in candidates {
            if let Some(fitness) = candidate.fitness {
                slots.push(Ok(fitness));
                continue;
            }
            if self.cache_type == CacheType::Disabled {
                slots.push(Err(pending.len()));
                pending.push((&candidate.chromosome, None));
                continue;
            }

            let key = candidate.chromosome.cache_key();
            if let Some(&job) = pending_by_key.get(&key) {
                slots.push(Err(job));
            } else if let Some(fitness) = self.cache.get(&key) {
                slots.push(Ok(fitness));
            } else {
                pending_by_key.insert(key.clone(), pending.len());
                slots.push(Err(pending.len()));
                pending.push((&candidate.chromosome, Some(key)));
            }
        }

        let Some(raw) = self.run_objective(&pending, cancel) else {
            return Ok(None);
        };

        let mut scores = Vec::with_capacity(raw.len());
        for ((chromosome, key), outcome) in pending.into_iter().zip(raw) {
            let score = self.settle(chromosome, outcome)?;
            if let Some(key) = key {
                self.cache.insert(key, score);
            }
            scores.push(score);
        }

        let evaluations = scores.len();
        let fitness = slots
            .into_iter()
            .map(|slot| slot.unwrap_or_else(|job| scores[job]))
            .collect();

        Ok(Some(Evaluated {
            fitness,
            evaluations,
        }))
    }

    fn run_objective(
        &self,
        pending: &[(&Chromosome<T>, Option<Vec<T::Key>>)],
        cancel: Option<&CancellationToken>,
    ) -> Option<Vec<Result<f64>>> {
        let challenge = self.challenge;
        let cancelled = || cancel.is_some_and(CancellationToken::is_cancelled);

        if pending.len() >= self.parallel_threshold {
            let outcomes: Vec<Option<Result<f64>>> = pending
                .par_iter()
                .map(|(chromosome, _)| (!cancelled()).then(|| challenge.score(chromosome)))
                .collect();
            outcomes.into_iter().collect()
        } else {
            let mut outcomes = Vec::with_capacity(pending.len());
            for (chromosome, _) in pending {
                if cancelled() {
                    return None;
                }
                outcomes.push(challenge.score(chromosome));
            }
            Some(outcomes)
        }
    }

    /// Turns an objective outcome into a usable score, falling back to the
    /// penalty fitness when one is configured.
    fn settle(&self, chromosome: &Chromosome<T>, outcome: Result<f64>) -> Result<f64> {
        let failure = match outcome {
            Ok(score) if score.is_finite() => return Ok(score),
            Ok(score) => format!("Non-finite fitness score encountered: {}", score),
            Err(GeneticError::Evaluation { message, .. }) => message,
            Err(other) => other.to_string(),
        };

        match self.penalty {
            Some(penalty) => {
                warn!(
                    chromosome = ?chromosome.genes(),
                    penalty,
                    "{}; using penalty fitness",
                    failure
                );
                Ok(penalty)
            }
            None => Err(GeneticError::evaluation(failure)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::genome::{Alphabet, ChromosomeSchema};
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn candidates(genes: &[[u8; 3]]) -> Vec<Candidate<u8>> {
        let schema = ChromosomeSchema::uniform(Alphabet::<u8>::binary(), 3).unwrap();
        genes
            .iter()
            .map(|g| Candidate::new(schema.chromosome(g.to_vec()).unwrap()))
            .collect()
    }

    fn ones(genes: &[u8]) -> f64 {
        genes.iter().map(|&g| g as f64).sum()
    }

    #[test]
    fn test_duplicates_are_scored_once() {
        let calls = AtomicUsize::new(0);
        let challenge = |genes: &[u8]| {
            calls.fetch_add(1, Ordering::Relaxed);
            ones(genes)
        };
        let mut evaluator = FitnessEvaluator::new(&challenge, CacheType::Generation, None, usize::MAX);

        let batch = candidates(&[[1, 0, 1], [1, 0, 1], [0, 0, 0], [1, 0, 1]]);
        let evaluated = evaluator.evaluate(&batch, None).unwrap().unwrap();

        assert_eq!(evaluated.fitness, vec![2.0, 2.0, 0.0, 2.0]);
        assert_eq!(evaluated.evaluations, 2);
        assert_eq!(calls.load(Ordering::Relaxed), 2);
    }

    #[test]
    fn test_disabled_cache_scores_everything() {
        let challenge = |genes: &[u8]| ones(genes);
        let mut evaluator = FitnessEvaluator::new(&challenge, CacheType::Disabled, None, usize::MAX);

        let batch = candidates(&[[1, 1, 1], [1, 1, 1]]);
        let evaluated = evaluator.evaluate(&batch, None).unwrap().unwrap();

        assert_eq!(evaluated.evaluations, 2);
        assert!(evaluator.cache().is_empty());
    }

    #[test]
    fn test_run_cache_persists_across_generations() {
        let challenge = |genes: &[u8]| ones(genes);
        let batch = candidates(&[[1, 1, 0]]);

        let mut generation = FitnessEvaluator::new(&challenge, CacheType::Generation, None, usize::MAX);
        generation.evaluate(&batch, None).unwrap();
        let again = generation.evaluate(&batch, None).unwrap().unwrap();
        assert_eq!(again.evaluations, 1);

        let mut run = FitnessEvaluator::new(&challenge, CacheType::Run, None, usize::MAX);
        run.evaluate(&batch, None).unwrap();
        let again = run.evaluate(&batch, None).unwrap().unwrap();
        assert_eq!(again.evaluations, 0);
        assert_eq!(again.fitness, vec![2.0]);
        assert_eq!(run.cache().hits(), 1);
    }

    #[test]
    fn test_known_fitness_is_kept() {
        let challenge = |_: &[u8]| 100.0;
        let mut evaluator = FitnessEvaluator::new(&challenge, CacheType::Generation, None, usize::MAX);

        let mut batch = candidates(&[[1, 0, 0], [0, 1, 0]]);
        batch[0].fitness = Some(-1.0);
        let evaluated = evaluator.evaluate(&batch, None).unwrap().unwrap();

        assert_eq!(evaluated.fitness, vec![-1.0, 100.0]);
        assert_eq!(evaluated.evaluations, 1);
    }

    #[test]
    fn test_non_finite_is_an_error() {
        let challenge = |genes: &[u8]| if genes[0] == 1 { f64::NAN } else { 1.0 };
        let mut evaluator = FitnessEvaluator::new(&challenge, CacheType::Generation, None, usize::MAX);

        let batch = candidates(&[[0, 0, 0], [1, 0, 0]]);
        match evaluator.evaluate(&batch, None) {
            Err(GeneticError::Evaluation { message, .. }) => {
                assert!(message.starts_with("Non-finite fitness score encountered"))
            }
            other => panic!("expected evaluation error, got {:?}", other),
        }
    }

    #[test]
    fn test_penalty_replaces_failures() {
        let challenge = |genes: &[u8]| if genes[0] == 1 { f64::INFINITY } else { 1.0 };
        let mut evaluator =
            FitnessEvaluator::new(&challenge, CacheType::Generation, Some(-10.0), usize::MAX);

        let batch = candidates(&[[0, 0, 0], [1, 0, 0]]);
        let evaluated = evaluator.evaluate(&batch, None).unwrap().unwrap();
        assert_eq!(evaluated.fitness, vec![1.0, -10.0]);
    }

    #[test]
    fn test_parallel_matches_sequential() {
        let challenge = |genes: &[u8]| genes.iter().enumerate().map(|(i, &g)| (i + 1) as f64 * g as f64).sum::<f64>();
        let batch = candidates(&[
            [0, 0, 0],
            [0, 0, 1],
            [0, 1, 0],
            [0, 1, 1],
            [1, 0, 0],
            [1, 0, 1],
            [1, 1, 0],
            [1, 1, 1],
            [0, 1, 1],
        ]);

        let mut sequential = FitnessEvaluator::new(&challenge, CacheType::Generation, None, usize::MAX);
        let mut parallel = FitnessEvaluator::new(&challenge, CacheType::Generation, None, 1);

        assert_eq!(
            sequential.evaluate(&batch, None).unwrap(),
            parallel.evaluate(&batch, None).unwrap()
        );
    }

    #[test]
    fn test_first_failure_wins_in_parallel() {
        let challenge = FailsOn(vec![2, 5]);
        let batch: Vec<Candidate<u8>> = (0..8u8)
            .map(|i| {
                let schema = ChromosomeSchema::uniform(Alphabet::range(0u8, 9).unwrap(), 1).unwrap();
                Candidate::new(schema.chromosome(vec![i]).unwrap())
            })
            .collect();

        let mut evaluator = FitnessEvaluator::new(&challenge, CacheType::Disabled, None, 1);
        match evaluator.evaluate(&batch, None) {
            Err(GeneticError::Evaluation { message, .. }) => assert_eq!(message, "bad gene 2"),
            other => panic!("expected evaluation error, got {:?}", other),
        }
    }

    #[test]
    fn test_cancellation_stops_evaluation() {
        let token = CancellationToken::new();
        token.cancel();
        let challenge = |genes: &[u8]| ones(genes);
        let mut evaluator = FitnessEvaluator::new(&challenge, CacheType::Generation, None, usize::MAX);

        let batch = candidates(&[[1, 0, 0]]);
        assert_eq!(evaluator.evaluate(&batch, Some(&token)).unwrap(), None);
        assert!(evaluator.evaluate(&batch, None).unwrap().is_some());
    }

    struct FailsOn(Vec<u8>);

    impl Challenge<u8> for FailsOn {
        fn score(&self, chromosome: &Chromosome<u8>) -> Result<f64> {
            let gene = chromosome[0];
            if self.0.contains(&gene) {
                return Err(GeneticError::evaluation(format!("bad gene {}", gene)));
            }
            Ok(gene as f64)
        }
    }
}
