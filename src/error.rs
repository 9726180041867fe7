//! # Error Types
//!
//! This module defines the error type shared by every part of the engine.
//! Configuration problems are reported before a run starts. Any failure after
//! the run has started carries the history recorded up to that point.
//!
//! ## Examples
//!
//! Using the `Result` type:
//!
//! ```rust
//! use chromoga::error::{GeneticError, Result};
//!
//! fn check_rate(rate: f64) -> Result<f64> {
//!     if !(0.0..=1.0).contains(&rate) {
//!         return Err(GeneticError::Configuration(format!(
//!             "Rate {} is outside [0, 1]",
//!             rate
//!         )));
//!     }
//!     Ok(rate)
//! }
//!
//! assert!(check_rate(0.5).is_ok());
//! assert!(check_rate(1.5).is_err());
//! ```
//!
//! Using the `ResultExt` trait to add context to foreign errors:
//!
//! ```rust
//! use chromoga::error::{Result, ResultExt};
//!
//! fn parse_generations(raw: &str) -> Result<usize> {
//!     raw.parse::<usize>().context("Invalid generation count")
//! }
//!
//! assert!(parse_generations("50").is_ok());
//! assert!(parse_generations("fifty").is_err());
//! ```
//!
//! Using the `OptionExt` trait to convert `Option` to `Result`:
//!
//! ```rust
//! use chromoga::error::{GeneticError, OptionExt};
//!
//! fn fittest(fitness: &[f64]) -> chromoga::error::Result<f64> {
//!     fitness
//!         .iter()
//!         .copied()
//!         .reduce(f64::max)
//!         .ok_or_else_genetic(|| GeneticError::EmptyPopulation)
//! }
//!
//! assert_eq!(fittest(&[1.0, 3.0, 2.0]).unwrap(), 3.0);
//! assert!(fittest(&[]).is_err());
//! ```

use std::error::Error as StdError;
use std::fmt;
use thiserror::Error;

use crate::evolution::record::GenerationRecord;

/// Represents errors that can occur in the genetic algorithm engine.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum GeneticError {
    /// An invalid run configuration (population size, rates, elitism, or an
    /// operator that does not fit the chromosome schema). Always reported
    /// before the first generation.
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// The objective function failed or produced a non-finite value.
    ///
    /// `history` holds every generation record completed before the failure.
    #[error("Evaluation error: {message}")]
    Evaluation {
        message: String,
        history: Vec<GenerationRecord>,
    },

    /// A permutation alphabet holds fewer distinct values than the chromosome
    /// has positions.
    #[error(
        "Alphabet exhaustion: a permutation alphabet of size {alphabet_size} cannot fill {length} unique positions"
    )]
    AlphabetExhaustion { alphabet_size: usize, length: usize },

    /// Error that occurs when a selection strategy cannot work with the
    /// fitness values it was given.
    #[error("Selection error: {0}")]
    Selection(String),

    /// Error that occurs when a breeding operation fails.
    #[error("Breeding error: {0}")]
    Breeding(String),

    /// A chromosome does not match the length or alphabets of its schema.
    #[error("Invalid chromosome: {0}")]
    InvalidChromosome(String),

    /// Error that occurs when an empty population is encountered.
    #[error("Empty population error: Cannot operate on an empty population")]
    EmptyPopulation,

    /// A generic error with a custom message.
    #[error("{0}")]
    Other(String),

    /// A non-evaluation failure that stopped a run mid-way.
    #[error("Run aborted after {} generations: {source}", history.len())]
    Aborted {
        source: Box<GeneticError>,
        history: Vec<GenerationRecord>,
    },
}

impl GeneticError {
    /// Creates an evaluation error with no history attached yet.
    pub fn evaluation(message: impl Into<String>) -> Self {
        GeneticError::Evaluation {
            message: message.into(),
            history: Vec::new(),
        }
    }

    /// Attaches the generation history of a failed run.
    ///
    /// Evaluation errors keep their variant; any other error is wrapped in
    /// [`GeneticError::Aborted`].
    pub fn with_history(self, records: &[GenerationRecord]) -> Self {
        match self {
            GeneticError::Evaluation { message, .. } => GeneticError::Evaluation {
                message,
                history: records.to_vec(),
            },
            GeneticError::Aborted { source, .. } => GeneticError::Aborted {
                source,
                history: records.to_vec(),
            },
            other => GeneticError::Aborted {
                source: Box::new(other),
                history: records.to_vec(),
            },
        }
    }

    /// Returns the partial history carried by a failed run.
    pub fn history(&self) -> Option<&[GenerationRecord]> {
        match self {
            GeneticError::Evaluation { history, .. } | GeneticError::Aborted { history, .. } => {
                Some(history)
            }
            _ => None,
        }
    }
}

/// A specialized Result type for genetic algorithm operations.
pub type Result<T> = std::result::Result<T, GeneticError>;

/// Extension trait for Result to add context to errors.
///
/// This trait provides a convenient way to add context to errors when
/// converting from one error type to `GeneticError`.
pub trait ResultExt<T, E> {
    /// Converts the error to a `GeneticError::Other` prefixed with `context`.
    fn context<C>(self, context: C) -> Result<T>
    where
        C: fmt::Display + Send + Sync + 'static;
}

impl<T, E> ResultExt<T, E> for std::result::Result<T, E>
where
    E: StdError + Send + Sync + 'static,
{
    fn context<C>(self, context: C) -> Result<T>
    where
        C: fmt::Display + Send + Sync + 'static,
    {
        self.map_err(|e| GeneticError::Other(format!("{}: {}", context, e)))
    }
}

/// Extension trait for Option to convert to Result with a custom error.
pub trait OptionExt<T> {
    /// Converts an `Option<T>` to a `Result<T, GeneticError>` using
    /// a closure to generate the error.
    fn ok_or_else_genetic<F>(self, err_fn: F) -> Result<T>
    where
        F: FnOnce() -> GeneticError;
}

impl<T> OptionExt<T> for Option<T> {
    fn ok_or_else_genetic<F>(self, err_fn: F) -> Result<T>
    where
        F: FnOnce() -> GeneticError,
    {
        self.ok_or_else(err_fn)
    }
}
