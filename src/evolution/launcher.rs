//! # EvolutionLauncher
//!
//! Runs the generational loop. A run moves through these phases:
//!
//! ```text
//! Initializing -> Evaluating -> CheckStop -> Selecting -> Breeding -> Replacing -> Evaluating ...
//!                                   |
//!                                   +-> Terminated
//! ```
//!
//! Generation 0 is the initial population. Every evaluated generation is
//! summarized in a [`GenerationRecord`] before the stop decision, so target
//! and stagnation criteria see the generation they judge.
//!
//! ## Example
//!
//! ```rust
//! use chromoga::evolution::{EvolutionLauncher, EvolutionOptions, TerminationReason};
//! use chromoga::genome::{Alphabet, ChromosomeSchema};
//!
//! let schema = ChromosomeSchema::uniform(Alphabet::<u8>::binary(), 12).unwrap();
//! let options = EvolutionOptions::builder()
//!     .population_size(30)
//!     .max_generations(200)
//!     .mutation_rate(0.05)
//!     .elitism(1)
//!     .target_fitness(12.0)
//!     .seed(3)
//!     .build();
//!
//! let launcher = EvolutionLauncher::builder()
//!     .with_schema(schema)
//!     .with_challenge(|genes: &[u8]| genes.iter().map(|&g| g as f64).sum::<f64>())
//!     .with_options(options)
//!     .build()
//!     .unwrap();
//!
//! let result = launcher.evolve().unwrap();
//! assert_eq!(result.seed, 3);
//! assert!(result.fitness <= 12.0);
//! if result.reason == TerminationReason::TargetReached {
//!     assert_eq!(result.best.genes(), &[1u8; 12]);
//! }
//! ```

use tracing::{debug, info, info_span};

use super::{
    builder::EvolutionLauncherBuilder,
    cancel::CancellationToken,
    challenge::Challenge,
    evaluator::FitnessEvaluator,
    options::{EvolutionOptions, LogLevel},
    record::{EvolutionResult, GenerationRecord, TerminationReason},
};
use crate::{
    breeding::{breed_generation, BreedContext, BreedStrategy, BreedingStats, MutationKind, StandardBreeding},
    error::{GeneticError, OptionExt, Result},
    genome::{Allele, Chromosome, ChromosomeSchema},
    population::{Candidate, Goal, Population},
    rng::RandomNumberGenerator,
    selection::{ElitistSelection, SelectionStrategy},
};

/// Generations between two adjustments of the Gaussian mutation spread.
const SIGMA_ADAPTATION_PERIOD: usize = 5;

/// Manages the evolution process for one schema, challenge and set of options.
///
/// Created through [`EvolutionLauncher::builder`]. A launcher can run any
/// number of times; each run draws from its own generator.
pub struct EvolutionLauncher<T, C, B = StandardBreeding>
where
    T: Allele,
{
    pub(super) schema: ChromosomeSchema<T>,
    pub(super) challenge: C,
    pub(super) breed_strategy: B,
    pub(super) options: EvolutionOptions,
    pub(super) cancellation: Option<CancellationToken>,
}

/// A phase of the generational loop together with the data it works on.
enum Phase<T> {
    Initializing(Vec<Chromosome<T>>),
    Evaluating(Vec<Candidate<T>>),
    CheckStop(Population<T>),
    Selecting(Population<T>),
    Breeding(Population<T>, Vec<(usize, usize)>),
    Replacing(Population<T>, Vec<Chromosome<T>>),
    Terminated(TerminationReason),
}

/// Best chromosome seen so far and how long it has stood.
struct BestEver<T> {
    chromosome: Chromosome<T>,
    fitness: f64,
    stagnant_generations: usize,
}

impl<T, C> EvolutionLauncher<T, C, StandardBreeding>
where
    T: Allele,
    C: Challenge<T>,
{
    pub fn builder() -> EvolutionLauncherBuilder<T, C> {
        EvolutionLauncherBuilder::new()
    }
}

impl<T, C, B> EvolutionLauncher<T, C, B>
where
    T: Allele,
    C: Challenge<T>,
    B: BreedStrategy<T>,
{
    pub fn schema(&self) -> &ChromosomeSchema<T> {
        &self.schema
    }

    pub fn options(&self) -> &EvolutionOptions {
        &self.options
    }

    /// Runs from a random initial population.
    ///
    /// # Errors
    ///
    /// Returns `GeneticError::Evaluation` (carrying the history recorded so
    /// far) if the objective fails without a penalty fitness configured, or
    /// the error of a custom breeding strategy.
    pub fn evolve(&self) -> Result<EvolutionResult<T>> {
        self.evolve_from(Vec::new(), |_, _| {})
    }

    /// Runs from a random initial population, calling `observer` after every
    /// evaluated generation.
    pub fn evolve_with<F>(&self, observer: F) -> Result<EvolutionResult<T>>
    where
        F: FnMut(&GenerationRecord, &Population<T>),
    {
        self.evolve_from(Vec::new(), observer)
    }

    /// Runs from the given chromosomes, topped up with random ones to the
    /// population size.
    ///
    /// # Errors
    ///
    /// In addition to the errors of [`evolve`](Self::evolve):
    /// - `Configuration` if more chromosomes than the population size are given.
    /// - `InvalidChromosome` if one of them does not fit the schema.
    pub fn evolve_from<F>(&self, initial: Vec<Chromosome<T>>, mut observer: F) -> Result<EvolutionResult<T>>
    where
        F: FnMut(&GenerationRecord, &Population<T>),
    {
        let options = &self.options;
        let goal = options.get_goal();
        let population_size = options.get_population_size();
        let elitism = options.get_elitism();
        let log_level = options.get_log_level();

        if initial.len() > population_size {
            return Err(GeneticError::Configuration(format!(
                "{} initial chromosomes exceed the population size of {}",
                initial.len(),
                population_size
            )));
        }
        for chromosome in &initial {
            self.schema.validate(chromosome)?;
        }

        let mut rng = match options.get_seed() {
            Some(seed) => RandomNumberGenerator::from_seed(seed),
            None => RandomNumberGenerator::new(),
        };
        let seed = rng.seed();
        let span = info_span!("evolution", seed);
        let _guard = span.enter();

        let mut context = BreedContext {
            crossover: options.crossover_for(&self.schema),
            mutation: options.mutation_for(&self.schema),
            crossover_rate: options.get_crossover_rate(),
            mutation_rate: options.get_mutation_rate(),
            inversion_rate: options.get_inversion_rate(),
            sigma_scale: 1.0,
        };
        let mut evaluator = FitnessEvaluator::new(
            &self.challenge,
            options.get_cache_type(),
            options.get_penalty_fitness(),
            options.get_parallel_threshold(),
        );

        let mut history: Vec<GenerationRecord> = Vec::new();
        let mut best_ever: Option<BestEver<T>> = None;
        let mut stats = BreedingStats::default();
        let mut generation = 0;
        let mut phase = Phase::Initializing(initial);

        let reason = loop {
            phase = match phase {
                Phase::Initializing(mut chromosomes) => {
                    while chromosomes.len() < population_size {
                        chromosomes.push(self.schema.random_chromosome(&mut rng)?);
                    }
                    Phase::Evaluating(chromosomes.into_iter().map(Candidate::new).collect())
                }

                Phase::Evaluating(candidates) => {
                    // The initial population is always scored in full.
                    let cancel = if generation == 0 {
                        None
                    } else {
                        self.cancellation.as_ref()
                    };
                    let evaluated = evaluator
                        .evaluate(&candidates, cancel)
                        .map_err(|e| e.with_history(&history))?;
                    let Some(evaluated) = evaluated else {
                        phase = Phase::Terminated(TerminationReason::Cancelled);
                        continue;
                    };

                    let population = survivors(
                        candidates,
                        evaluated.fitness,
                        elitism,
                        population_size,
                        goal,
                        &mut rng,
                    )
                    .map_err(|e| e.with_history(&history))?;

                    let summary = population.summary(goal);
                    let (best, best_fitness) = population
                        .get(population.best_index(goal))
                        .ok_or_else_genetic(|| GeneticError::EmptyPopulation)?;

                    match best_ever.as_mut() {
                        Some(incumbent) if goal.is_better(best_fitness, incumbent.fitness) => {
                            incumbent.chromosome = best.clone();
                            incumbent.fitness = best_fitness;
                            incumbent.stagnant_generations = 0;
                        }
                        Some(incumbent) => incumbent.stagnant_generations += 1,
                        None => {
                            best_ever = Some(BestEver {
                                chromosome: best.clone(),
                                fitness: best_fitness,
                                stagnant_generations: 0,
                            })
                        }
                    }
                    let best_ever_fitness = best_ever.as_ref().map_or(best_fitness, |incumbent| incumbent.fitness);

                    let record = GenerationRecord {
                        generation,
                        best: summary.best,
                        mean: summary.mean,
                        worst: summary.worst,
                        variance: summary.variance,
                        crossovers: stats.crossovers,
                        mutations: stats.mutations,
                        inversions: stats.inversions,
                        evaluations: evaluated.evaluations,
                        best_ever: best_ever_fitness,
                    };
                    log_generation(log_level, &record, &population);
                    history.push(record);

                    if let MutationKind::Gaussian { sigma, adapt } = context.mutation {
                        context.sigma_scale =
                            adapt_sigma_scale(context.sigma_scale, sigma, adapt, &history, goal);
                    }

                    if let Some(record) = history.last() {
                        observer(record, &population);
                    }
                    Phase::CheckStop(population)
                }

                Phase::CheckStop(population) => match self.stop_reason(generation, best_ever.as_ref()) {
                    Some(reason) => Phase::Terminated(reason),
                    None => Phase::Selecting(population),
                },

                Phase::Selecting(population) => {
                    let num_offspring = options.offspring_count();
                    let oriented = population.oriented_fitness(goal);
                    let picks = options
                        .get_selection()
                        .select(&oriented, num_offspring.div_ceil(2) * 2, &mut rng)
                        .map_err(|e| e.with_history(&history))?;
                    let pairs = picks.chunks_exact(2).map(|pair| (pair[0], pair[1])).collect();
                    Phase::Breeding(population, pairs)
                }

                Phase::Breeding(population, pairs) => {
                    let (offspring, breeding_stats) = breed_generation(
                        &self.breed_strategy,
                        &self.schema,
                        population.chromosomes(),
                        &pairs,
                        options.offspring_count(),
                        &context,
                        options.get_parallel_threshold(),
                        &mut rng,
                    )
                    .map_err(|e| e.with_history(&history))?;
                    stats = breeding_stats;
                    Phase::Replacing(population, offspring)
                }

                Phase::Replacing(population, offspring) => {
                    let mut candidates = Vec::with_capacity(elitism + offspring.len());
                    if elitism > 0 {
                        let elites = ElitistSelection
                            .select(&population.oriented_fitness(goal), elitism, &mut rng)
                            .map_err(|e| e.with_history(&history))?;
                        for index in elites {
                            if let Some((chromosome, fitness)) = population.get(index) {
                                candidates.push(Candidate::evaluated(chromosome.clone(), fitness));
                            }
                        }
                    }
                    candidates.extend(offspring.into_iter().map(Candidate::new));
                    generation += 1;
                    Phase::Evaluating(candidates)
                }

                Phase::Terminated(reason) => break reason,
            };
        };

        let best = best_ever.ok_or_else_genetic(|| GeneticError::EmptyPopulation)?;
        let generations = history.last().map_or(0, |record| record.generation);

        if log_level != LogLevel::None {
            info!(
                reason = %reason,
                generations,
                fitness = best.fitness,
                "evolution finished"
            );
        }

        Ok(EvolutionResult {
            best: best.chromosome,
            fitness: best.fitness,
            reason,
            generations,
            history,
            seed,
        })
    }

    /// Decides whether the run ends after `generation` was evaluated.
    fn stop_reason(&self, generation: usize, best_ever: Option<&BestEver<T>>) -> Option<TerminationReason> {
        let options = &self.options;
        let goal = options.get_goal();

        let target_reached = match (options.get_target_fitness(), best_ever) {
            (Some(target), Some(best)) => goal.reaches(best.fitness, target),
            _ => false,
        };
        let stagnated = match (options.get_stagnation_window(), best_ever) {
            (Some(window), Some(best)) => best.stagnant_generations >= window,
            _ => false,
        };
        let cancelled = self
            .cancellation
            .as_ref()
            .is_some_and(CancellationToken::is_cancelled);

        if target_reached {
            Some(TerminationReason::TargetReached)
        } else if generation >= options.get_max_generations() {
            Some(TerminationReason::MaxGenerations)
        } else if stagnated {
            Some(TerminationReason::Stagnation)
        } else if cancelled {
            Some(TerminationReason::Cancelled)
        } else {
            None
        }
    }
}

/// Cuts an evaluated generation back to `population_size`: the first
/// `pinned` candidates (the elites) always stay, the remaining slots go to
/// the fittest offspring. Survivors keep their original order.
fn survivors<T: Allele>(
    candidates: Vec<Candidate<T>>,
    fitness: Vec<f64>,
    pinned: usize,
    population_size: usize,
    goal: Goal,
    rng: &mut RandomNumberGenerator,
) -> Result<Population<T>> {
    let chromosomes: Vec<Chromosome<T>> = candidates.into_iter().map(|c| c.chromosome).collect();
    if chromosomes.len() <= population_size {
        return Population::new(chromosomes, fitness);
    }

    let pinned = pinned.min(population_size);
    let offspring_fitness: Vec<f64> = fitness[pinned..].iter().map(|&f| goal.orient(f)).collect();
    let mut keep: Vec<usize> = ElitistSelection
        .select(&offspring_fitness, population_size - pinned, rng)?
        .into_iter()
        .map(|index| index + pinned)
        .collect();
    keep.sort_unstable();

    let mut kept = vec![false; chromosomes.len()];
    for index in (0..pinned).chain(keep) {
        kept[index] = true;
    }

    let (chromosomes, fitness): (Vec<_>, Vec<_>) = chromosomes
        .into_iter()
        .zip(fitness)
        .zip(kept)
        .filter_map(|(pair, retained)| retained.then_some(pair))
        .unzip();
    Population::new(chromosomes, fitness)
}

/// The 1/5-style success rule: every few generations the spread shrinks by
/// `adapt` when the mean fitness improved on the record four generations back
/// and grows by `1 / adapt` otherwise. The effective spread never exceeds the full range.
fn adapt_sigma_scale(
    scale: f64,
    sigma: f64,
    adapt: f64,
    history: &[GenerationRecord],
    goal: Goal,
) -> f64 {
    let generation = history.len() - 1;
    if generation == 0 || generation % SIGMA_ADAPTATION_PERIOD != 0 {
        return scale;
    }

    let now = goal.orient(history[generation].mean);
    let before = goal.orient(history[generation + 1 - SIGMA_ADAPTATION_PERIOD].mean);
    let scale = if now > before { scale * adapt } else { scale / adapt };
    scale.min(1.0 / sigma)
}

fn log_generation<T: Allele>(log_level: LogLevel, record: &GenerationRecord, population: &Population<T>) {
    if log_level == LogLevel::None {
        return;
    }

    info!(
        generation = record.generation,
        best = record.best,
        mean = record.mean,
        worst = record.worst,
        best_ever = record.best_ever,
        evaluations = record.evaluations,
        "generation evaluated"
    );

    if log_level == LogLevel::Verbose {
        for (index, (chromosome, fitness)) in population
            .chromosomes()
            .iter()
            .zip(population.fitness())
            .enumerate()
        {
            debug!(
                generation = record.generation,
                index,
                fitness,
                genes = ?chromosome.genes(),
                "individual"
            );
        }
    }
}
