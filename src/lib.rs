//! # chromoga
//!
//! A generational genetic algorithm engine. Candidate solutions are
//! fixed-length chromosomes whose genes are drawn from configurable allele
//! alphabets, so one engine handles bit-strings, integer and real-valued
//! vectors, and permutations.
//!
//! A run is assembled from a [`ChromosomeSchema`], a [`Challenge`] (any
//! `Fn(&[T]) -> f64` closure works) and [`EvolutionOptions`]:
//!
//! ```rust
//! use chromoga::{Alphabet, ChromosomeSchema, EvolutionLauncher, EvolutionOptions, Goal};
//! use chromoga::selection::{FitnessScaling, SelectionMethod};
//!
//! // Shortest closed tour through five points on a line.
//! let positions = [0.0, 4.0, 1.0, 3.0, 2.0];
//! let schema = ChromosomeSchema::uniform(Alphabet::indices(5).unwrap(), 5).unwrap();
//!
//! let launcher = EvolutionLauncher::builder()
//!     .with_schema(schema)
//!     .with_challenge(move |tour: &[usize]| {
//!         (0..tour.len())
//!             .map(|i| {
//!                 let a: f64 = positions[tour[i]];
//!                 let b: f64 = positions[tour[(i + 1) % tour.len()]];
//!                 (a - b).abs()
//!             })
//!             .sum::<f64>()
//!     })
//!     .with_options(
//!         EvolutionOptions::builder()
//!             .population_size(20)
//!             .max_generations(50)
//!             .mutation_rate(0.1)
//!             .elitism(1)
//!             .goal(Goal::Minimize)
//!             .selection(SelectionMethod::Proportionate { scaling: FitnessScaling::Rank })
//!             .seed(42)
//!             .build(),
//!     )
//!     .build()
//!     .unwrap();
//!
//! let result = launcher.evolve().unwrap();
//! assert!(result.fitness >= 8.0);
//! assert_eq!(result.history.len(), result.generations + 1);
//! ```

pub mod breeding;
pub mod caching;
pub mod error;
pub mod evolution;
pub mod genome;
pub mod population;
pub mod rng;
pub mod selection;

// Re-export commonly used types for convenience
pub use breeding::{BreedStrategy, CrossoverKind, MutationKind, StandardBreeding};
pub use caching::CacheType;
pub use error::{GeneticError, OptionExt, Result, ResultExt};
pub use evolution::{
    CancellationToken, Challenge, EvolutionLauncher, EvolutionOptions, EvolutionResult,
    FallibleChallenge, GenerationRecord, LogLevel, TerminationReason,
};
pub use genome::{Allele, Alphabet, Chromosome, ChromosomeSchema};
pub use population::{Goal, Population};
pub use rng::RandomNumberGenerator;
pub use selection::{SelectionMethod, SelectionStrategy};
