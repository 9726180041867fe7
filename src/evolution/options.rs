//! # EvolutionOptions
//!
//! The `EvolutionOptions` struct holds every tunable parameter of a run:
//! population size, stopping criteria, operator rates and kinds, selection
//! method, elitism, caching, parallelism, and logging.
//!
//! ## Example
//!
//! ```rust
//! use chromoga::evolution::options::{EvolutionOptions, LogLevel};
//! use chromoga::selection::SelectionMethod;
//!
//! let options = EvolutionOptions::builder()
//!     .population_size(40)
//!     .max_generations(200)
//!     .crossover_rate(0.8)
//!     .mutation_rate(0.02)
//!     .elitism(2)
//!     .selection(SelectionMethod::Tournament { size: 3 })
//!     .seed(7)
//!     .log_level(LogLevel::Minimal)
//!     .build();
//!
//! assert_eq!(options.get_population_size(), 40);
//! assert_eq!(options.offspring_count(), 38);
//!
//! let default_options = EvolutionOptions::default();
//! assert_eq!(default_options.get_elitism(), 0);
//! ```
//!
//! ## LogLevel
//!
//! - `Verbose`: one `info!` event per generation and one `debug!` event per individual.
//! - `Minimal`: one `info!` event per generation.
//! - `None`: only warnings are emitted.

use crate::breeding::{inversion::validate_inversion, CrossoverKind, MutationKind};
use crate::caching::CacheType;
use crate::error::{GeneticError, Result};
use crate::genome::{Allele, ChromosomeSchema};
use crate::population::Goal;
use crate::selection::{FitnessScaling, SelectionMethod};

#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogLevel {
    Verbose,
    Minimal,
    #[default]
    None,
}

#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, PartialEq)]
pub struct EvolutionOptions {
    population_size: usize,
    max_generations: usize,
    crossover_rate: f64,
    mutation_rate: f64,
    inversion_rate: f64,
    elitism: usize,
    selection: SelectionMethod,
    /// `None` picks the default kind for the schema.
    crossover: Option<CrossoverKind>,
    /// `None` picks the default kind for the schema.
    mutation: Option<MutationKind>,
    goal: Goal,
    target_fitness: Option<f64>,
    stagnation_window: Option<usize>,
    seed: Option<u64>,
    /// Offspring bred per generation relative to the non-elite slots.
    overpopulation: f64,
    penalty_fitness: Option<f64>,
    cache_type: CacheType,
    /// Minimum number of items to process in parallel
    parallel_threshold: usize,
    log_level: LogLevel,
}

impl EvolutionOptions {
    pub fn get_population_size(&self) -> usize {
        self.population_size
    }

    pub fn get_max_generations(&self) -> usize {
        self.max_generations
    }

    pub fn get_crossover_rate(&self) -> f64 {
        self.crossover_rate
    }

    pub fn get_mutation_rate(&self) -> f64 {
        self.mutation_rate
    }

    pub fn get_inversion_rate(&self) -> f64 {
        self.inversion_rate
    }

    pub fn get_elitism(&self) -> usize {
        self.elitism
    }

    pub fn get_selection(&self) -> SelectionMethod {
        self.selection
    }

    pub fn get_crossover(&self) -> Option<CrossoverKind> {
        self.crossover
    }

    pub fn get_mutation(&self) -> Option<MutationKind> {
        self.mutation
    }

    pub fn get_goal(&self) -> Goal {
        self.goal
    }

    pub fn get_target_fitness(&self) -> Option<f64> {
        self.target_fitness
    }

    pub fn get_stagnation_window(&self) -> Option<usize> {
        self.stagnation_window
    }

    pub fn get_seed(&self) -> Option<u64> {
        self.seed
    }

    pub fn get_overpopulation(&self) -> f64 {
        self.overpopulation
    }

    pub fn get_penalty_fitness(&self) -> Option<f64> {
        self.penalty_fitness
    }

    pub fn get_cache_type(&self) -> CacheType {
        self.cache_type
    }

    /// Returns the minimum number of items to process in parallel.
    pub fn get_parallel_threshold(&self) -> usize {
        self.parallel_threshold
    }

    pub fn get_log_level(&self) -> LogLevel {
        self.log_level
    }

    pub fn set_population_size(&mut self, population_size: usize) {
        self.population_size = population_size;
    }

    pub fn set_max_generations(&mut self, max_generations: usize) {
        self.max_generations = max_generations;
    }

    pub fn set_crossover_rate(&mut self, rate: f64) {
        self.crossover_rate = rate;
    }

    pub fn set_mutation_rate(&mut self, rate: f64) {
        self.mutation_rate = rate;
    }

    pub fn set_inversion_rate(&mut self, rate: f64) {
        self.inversion_rate = rate;
    }

    pub fn set_elitism(&mut self, elitism: usize) {
        self.elitism = elitism;
    }

    pub fn set_selection(&mut self, selection: SelectionMethod) {
        self.selection = selection;
    }

    pub fn set_crossover(&mut self, crossover: CrossoverKind) {
        self.crossover = Some(crossover);
    }

    pub fn set_mutation(&mut self, mutation: MutationKind) {
        self.mutation = Some(mutation);
    }

    pub fn set_goal(&mut self, goal: Goal) {
        self.goal = goal;
    }

    pub fn set_target_fitness(&mut self, target: Option<f64>) {
        self.target_fitness = target;
    }

    pub fn set_stagnation_window(&mut self, window: Option<usize>) {
        self.stagnation_window = window;
    }

    pub fn set_seed(&mut self, seed: Option<u64>) {
        self.seed = seed;
    }

    pub fn set_overpopulation(&mut self, factor: f64) {
        self.overpopulation = factor;
    }

    pub fn set_penalty_fitness(&mut self, penalty: Option<f64>) {
        self.penalty_fitness = penalty;
    }

    pub fn set_cache_type(&mut self, cache_type: CacheType) {
        self.cache_type = cache_type;
    }

    /// Sets the parallel threshold.
    pub fn set_parallel_threshold(&mut self, threshold: usize) {
        self.parallel_threshold = threshold;
    }

    pub fn set_log_level(&mut self, log_level: LogLevel) {
        self.log_level = log_level;
    }

    /// Number of offspring bred per generation:
    /// `ceil((population_size - elitism) * overpopulation)`.
    pub fn offspring_count(&self) -> usize {
        let open_slots = self.population_size.saturating_sub(self.elitism);
        (open_slots as f64 * self.overpopulation).ceil() as usize
    }

    /// The crossover kind in effect for `schema`.
    pub fn crossover_for<T: Allele>(&self, schema: &ChromosomeSchema<T>) -> CrossoverKind {
        self.crossover
            .unwrap_or_else(|| CrossoverKind::default_for(schema))
    }

    /// The mutation kind in effect for `schema`.
    pub fn mutation_for<T: Allele>(&self, schema: &ChromosomeSchema<T>) -> MutationKind {
        self.mutation
            .unwrap_or_else(|| MutationKind::default_for(schema))
    }

    /// Checks every option, and the operators against `schema`.
    ///
    /// # Errors
    ///
    /// Returns `GeneticError::Configuration` describing the first problem
    /// found. Nothing is clamped silently.
    pub fn validate<T: Allele>(&self, schema: &ChromosomeSchema<T>) -> Result<()> {
        if self.population_size < 2 {
            return Err(GeneticError::Configuration(format!(
                "Population size must be at least 2, got {}",
                self.population_size
            )));
        }

        for (name, rate) in [
            ("Crossover", self.crossover_rate),
            ("Mutation", self.mutation_rate),
            ("Inversion", self.inversion_rate),
        ] {
            if !(0.0..=1.0).contains(&rate) {
                return Err(GeneticError::Configuration(format!(
                    "{} rate must be in [0, 1], got {}",
                    name, rate
                )));
            }
        }

        if self.elitism >= self.population_size {
            return Err(GeneticError::Configuration(format!(
                "Elitism ({}) must be smaller than the population size ({})",
                self.elitism, self.population_size
            )));
        }

        self.selection.validate(self.population_size)?;
        if self.goal == Goal::Minimize
            && self.selection
                == (SelectionMethod::Proportionate {
                    scaling: FitnessScaling::Raw,
                })
        {
            return Err(GeneticError::Configuration(
                "Unscaled proportionate selection cannot minimize; use rank or linear scaling"
                    .to_string(),
            ));
        }

        self.crossover_for(schema).validate(schema)?;
        self.mutation_for(schema).validate(schema)?;
        validate_inversion(schema, self.inversion_rate)?;

        if !self.overpopulation.is_finite() || self.overpopulation < 1.0 {
            return Err(GeneticError::Configuration(format!(
                "Overpopulation factor must be a finite value of at least 1, got {}",
                self.overpopulation
            )));
        }
        if let Some(target) = self.target_fitness {
            if !target.is_finite() {
                return Err(GeneticError::Configuration(format!(
                    "Target fitness must be finite, got {}",
                    target
                )));
            }
        }
        if let Some(penalty) = self.penalty_fitness {
            if !penalty.is_finite() {
                return Err(GeneticError::Configuration(format!(
                    "Penalty fitness must be finite, got {}",
                    penalty
                )));
            }
        }
        if self.stagnation_window == Some(0) {
            return Err(GeneticError::Configuration(
                "Stagnation window must be at least 1 generation".to_string(),
            ));
        }

        Ok(())
    }

    /// Returns a builder for creating an `EvolutionOptions` instance.
    pub fn builder() -> EvolutionOptionsBuilder {
        EvolutionOptionsBuilder::default()
    }
}

impl Default for EvolutionOptions {
    fn default() -> Self {
        EvolutionOptionsBuilder::default().build()
    }
}

/// Builder for `EvolutionOptions`.
///
/// Provides a fluent interface for constructing `EvolutionOptions` instances.
/// Unset fields take their defaults: 50 individuals, 100 generations,
/// crossover rate 0.9, mutation rate 0.01, no inversion, no elitism,
/// proportionate selection with linear scaling, maximization, per-generation
/// caching, and a parallel threshold of 1000.
#[derive(Debug, Clone, Default)]
pub struct EvolutionOptionsBuilder {
    population_size: Option<usize>,
    max_generations: Option<usize>,
    crossover_rate: Option<f64>,
    mutation_rate: Option<f64>,
    inversion_rate: Option<f64>,
    elitism: Option<usize>,
    selection: Option<SelectionMethod>,
    crossover: Option<CrossoverKind>,
    mutation: Option<MutationKind>,
    goal: Option<Goal>,
    target_fitness: Option<f64>,
    stagnation_window: Option<usize>,
    seed: Option<u64>,
    overpopulation: Option<f64>,
    penalty_fitness: Option<f64>,
    cache_type: Option<CacheType>,
    parallel_threshold: Option<usize>,
    log_level: Option<LogLevel>,
}

impl EvolutionOptionsBuilder {
    pub fn population_size(mut self, value: usize) -> Self {
        self.population_size = Some(value);
        self
    }

    pub fn max_generations(mut self, value: usize) -> Self {
        self.max_generations = Some(value);
        self
    }

    pub fn crossover_rate(mut self, value: f64) -> Self {
        self.crossover_rate = Some(value);
        self
    }

    pub fn mutation_rate(mut self, value: f64) -> Self {
        self.mutation_rate = Some(value);
        self
    }

    pub fn inversion_rate(mut self, value: f64) -> Self {
        self.inversion_rate = Some(value);
        self
    }

    pub fn elitism(mut self, value: usize) -> Self {
        self.elitism = Some(value);
        self
    }

    pub fn selection(mut self, value: SelectionMethod) -> Self {
        self.selection = Some(value);
        self
    }

    pub fn crossover(mut self, value: CrossoverKind) -> Self {
        self.crossover = Some(value);
        self
    }

    pub fn mutation(mut self, value: MutationKind) -> Self {
        self.mutation = Some(value);
        self
    }

    pub fn goal(mut self, value: Goal) -> Self {
        self.goal = Some(value);
        self
    }

    /// Stops the run once the best fitness meets or beats `value`.
    pub fn target_fitness(mut self, value: f64) -> Self {
        self.target_fitness = Some(value);
        self
    }

    /// Stops the run after `value` generations without a new best.
    pub fn stagnation_window(mut self, value: usize) -> Self {
        self.stagnation_window = Some(value);
        self
    }

    pub fn seed(mut self, value: u64) -> Self {
        self.seed = Some(value);
        self
    }

    pub fn overpopulation(mut self, value: f64) -> Self {
        self.overpopulation = Some(value);
        self
    }

    /// Fitness assigned when the objective fails instead of aborting the run.
    pub fn penalty_fitness(mut self, value: f64) -> Self {
        self.penalty_fitness = Some(value);
        self
    }

    pub fn cache_type(mut self, value: CacheType) -> Self {
        self.cache_type = Some(value);
        self
    }

    /// Sets the parallel threshold.
    pub fn parallel_threshold(mut self, value: usize) -> Self {
        self.parallel_threshold = Some(value);
        self
    }

    pub fn log_level(mut self, value: LogLevel) -> Self {
        self.log_level = Some(value);
        self
    }

    /// Builds the `EvolutionOptions` instance.
    pub fn build(self) -> EvolutionOptions {
        EvolutionOptions {
            population_size: self.population_size.unwrap_or(50),
            max_generations: self.max_generations.unwrap_or(100),
            crossover_rate: self.crossover_rate.unwrap_or(0.9),
            mutation_rate: self.mutation_rate.unwrap_or(0.01),
            inversion_rate: self.inversion_rate.unwrap_or(0.0),
            elitism: self.elitism.unwrap_or(0),
            selection: self.selection.unwrap_or_default(),
            crossover: self.crossover,
            mutation: self.mutation,
            goal: self.goal.unwrap_or_default(),
            target_fitness: self.target_fitness,
            stagnation_window: self.stagnation_window,
            seed: self.seed,
            overpopulation: self.overpopulation.unwrap_or(1.0),
            penalty_fitness: self.penalty_fitness,
            cache_type: self.cache_type.unwrap_or_default(),
            parallel_threshold: self.parallel_threshold.unwrap_or(1000),
            log_level: self.log_level.unwrap_or_default(),
        }
    }
}
