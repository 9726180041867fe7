use crate::{
    breeding::{BreedStrategy, StandardBreeding},
    error::{GeneticError, OptionExt, Result},
    genome::{Allele, ChromosomeSchema},
};

use super::{
    cancel::CancellationToken, challenge::Challenge, launcher::EvolutionLauncher,
    options::EvolutionOptions,
};

/// Assembles an [`EvolutionLauncher`] from a schema, a challenge, options and
/// an optional custom breeding strategy.
///
/// Everything is validated in [`build`](Self::build), so a launcher that
/// exists can always start a run.
pub struct EvolutionLauncherBuilder<T, C, B = StandardBreeding>
where
    T: Allele,
{
    schema: Option<ChromosomeSchema<T>>,
    challenge: Option<C>,
    options: EvolutionOptions,
    breed_strategy: B,
    cancellation: Option<CancellationToken>,
}

impl<T, C> EvolutionLauncherBuilder<T, C, StandardBreeding>
where
    T: Allele,
    C: Challenge<T>,
{
    pub fn new() -> Self {
        Self {
            schema: None,
            challenge: None,
            options: EvolutionOptions::default(),
            breed_strategy: StandardBreeding,
            cancellation: None,
        }
    }
}

impl<T, C, B> EvolutionLauncherBuilder<T, C, B>
where
    T: Allele,
    C: Challenge<T>,
    B: BreedStrategy<T>,
{
    pub fn with_schema(mut self, schema: ChromosomeSchema<T>) -> Self {
        self.schema = Some(schema);
        self
    }

    pub fn with_challenge(mut self, challenge: C) -> Self {
        self.challenge = Some(challenge);
        self
    }

    pub fn with_options(mut self, options: EvolutionOptions) -> Self {
        self.options = options;
        self
    }

    /// Replaces [`StandardBreeding`] with a custom strategy.
    pub fn with_breed_strategy<B2>(self, breed_strategy: B2) -> EvolutionLauncherBuilder<T, C, B2>
    where
        B2: BreedStrategy<T>,
    {
        EvolutionLauncherBuilder {
            schema: self.schema,
            challenge: self.challenge,
            options: self.options,
            breed_strategy,
            cancellation: self.cancellation,
        }
    }

    /// Lets the run be stopped through `token` from another thread.
    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancellation = Some(token);
        self
    }

    /// Builds the launcher.
    ///
    /// # Errors
    ///
    /// Returns `GeneticError::Configuration` if the schema or the challenge is
    /// missing, or if the options do not fit the schema.
    pub fn build(self) -> Result<EvolutionLauncher<T, C, B>> {
        let schema = self.schema.ok_or_else_genetic(|| {
            GeneticError::Configuration("Chromosome schema not specified".to_string())
        })?;

        let challenge = self
            .challenge
            .ok_or_else_genetic(|| GeneticError::Configuration("Challenge not specified".to_string()))?;

        self.options.validate(&schema)?;

        Ok(EvolutionLauncher {
            schema,
            challenge,
            breed_strategy: self.breed_strategy,
            options: self.options,
            cancellation: self.cancellation,
        })
    }
}

impl<T, C> Default for EvolutionLauncherBuilder<T, C, StandardBreeding>
where
    T: Allele,
    C: Challenge<T>,
{
    fn default() -> Self {
        Self::new()
    }
}
