use thiserror::Error;

/// An error type indicating the fitness values
/// handed to [`Population::evolve`] cannot be used.
///
/// [`Population::evolve`]: crate::Population::evolve
#[derive(Debug, Error, PartialEq)]
pub enum EvolutionError {
    /// There is not exactly one fitness value per genome.
    #[error("expected {expected} fitness values, got {actual}")]
    FitnessCountMismatch { expected: usize, actual: usize },
    /// A fitness value is negative, infinite or NaN.
    #[error("fitness of genome {index} must be finite and non-negative, got {value}")]
    InvalidFitness { index: usize, value: f32 },
}
