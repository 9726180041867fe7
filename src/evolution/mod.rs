pub mod builder;
pub mod cancel;
pub mod challenge;
pub mod evaluator;
pub mod launcher;
pub mod options;
pub mod record;

pub use builder::EvolutionLauncherBuilder;
pub use cancel::CancellationToken;
pub use challenge::{Challenge, FallibleChallenge};
pub use evaluator::{Evaluated, FitnessEvaluator};
pub use launcher::EvolutionLauncher;
pub use options::{EvolutionOptions, EvolutionOptionsBuilder, LogLevel};
pub use record::{EvolutionResult, GenerationRecord, TerminationReason};
