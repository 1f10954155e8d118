use crate::Innovation;

use thiserror::Error;

/// An error type indicating the gene being
/// added to a genome is invalid.
#[derive(Debug, Error, PartialEq)]
pub enum GeneViabilityError {
    /// The gene's ID is a duplicate.
    #[error("duplicate gene insertion with id {0} between endpoints {1} -> {2}")]
    DuplicateGeneID(Innovation, usize, usize),
    /// The gene's endpoints do not exist.
    #[error("gene insertion between nonexistant endpoint(s) {0} -> {1}")]
    NonexistantEndpoints(usize, usize),
    /// The gene has the same endpoints as another with a different ID.
    #[error("gene insertion with endpoints {1} -> {2} and id {0} shadows gene with same endpoints")]
    DuplicateGeneWithEndpoints(Innovation, usize, usize),
    /// The output of the gene is an input node, which is not allowed.
    #[error("gene insertion with input node {0} as output endpoint")]
    SensorEndpoint(usize),
}

/// An error type indicating a failure
/// to carry out a mutation.
#[derive(Debug, Error, PartialEq)]
pub enum MutationError {
    /// The genome has no genes to pick from.
    #[error("mutation on empty genome")]
    EmptyGenome,
    /// Deleting a gene would leave the genome empty.
    #[error("gene deletion on genome with a single gene")]
    LastGene,
    /// Every gene in the genome is suppressed.
    #[error("node mutation on genome without unsuppressed genes")]
    NoSplittableGene,
    /// No pair of nodes was found to connect.
    #[error("no viable input-output pair found for gene mutation after {0} attempts")]
    NoInputOutputPairFound(usize),
}

/// An error type indicating an invalid
/// configuration value.
#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    /// A probability lies outside [0.0, 1.0].
    #[error("{name} must be a probability in [0.0, 1.0], got {value}")]
    InvalidProbability { name: &'static str, value: f32 },
    /// A magnitude, factor or threshold is negative or not finite.
    #[error("{name} must be finite and non-negative, got {value}")]
    InvalidMagnitude { name: &'static str, value: f32 },
    /// A capacity is too small to hold the initial population.
    #[error("{name} of {capacity} cannot hold the {required} entries of an initial genome")]
    InsufficientCapacity {
        name: &'static str,
        capacity: usize,
        required: usize,
    },
    /// A species capacity of zero.
    #[error("max_species must be at least 1")]
    NoSpeciesCapacity,
}

impl ConfigError {
    pub(crate) fn check_probability(name: &'static str, value: f32) -> Result<(), ConfigError> {
        if (0.0..=1.0).contains(&value) {
            Ok(())
        } else {
            Err(ConfigError::InvalidProbability { name, value })
        }
    }

    pub(crate) fn check_magnitude(name: &'static str, value: f32) -> Result<(), ConfigError> {
        if value.is_finite() && value >= 0.0 {
            Ok(())
        } else {
            Err(ConfigError::InvalidMagnitude { name, value })
        }
    }
}
