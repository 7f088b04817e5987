use crate::{GenomeKey, SpeciesKey};

use thiserror::Error;

/// An error type indicating an invalid
/// reproduction configuration.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    /// The survival threshold lies outside `(0, 1]`.
    #[error("survival threshold {0} is outside of the range (0, 1]")]
    SurvivalThreshold(f32),
}

/// Errors returned by [`Reproduction`].
///
/// A degenerate offspring allotment is not an error:
/// it is reported and yields an empty generation.
///
/// [`Reproduction`]: crate::Reproduction
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ReproductionError {
    /// The configuration was rejected at construction.
    #[error("invalid reproduction configuration: {0}")]
    Config(#[from] ConfigError),
    /// Every genome key has been issued.
    #[error("genome key space exhausted at key {0}")]
    KeySpaceExhausted(GenomeKey),
    /// A genome's fitness cannot be ordered (NaN).
    #[error("genome {genome} of species {species} has invalid fitness {fitness}")]
    InvalidFitness {
        species: SpeciesKey,
        genome: GenomeKey,
        fitness: f32,
    },
}
