//! # Genome
//!
//! Gene alphabets, chromosomes, and the schema that fixes the shape of every
//! chromosome in a run.
pub mod alphabet;
pub mod chromosome;
pub mod schema;

pub use alphabet::{Allele, Alphabet};
pub use chromosome::Chromosome;
pub use schema::ChromosomeSchema;
