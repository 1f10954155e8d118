use crate::genomics::ConfigError;

use serde::{Deserialize, Serialize};

use std::num::NonZeroUsize;

/// Configuration data for genome generation
/// and inter-genome operations.
///
/// # Note
/// All quantities expressing probabilities
/// should be in the range [0.0, 1.0], which
/// is checked by [`validate`].
///
/// [`validate`]: GeneticConfig::validate
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GeneticConfig {
    /// Number of inputs in a genome.
    pub input_count: NonZeroUsize,
    /// Number of outputs in a genome.
    pub output_count: NonZeroUsize,
    /// Maximum magnitude of the weights of a freshly
    /// initialized genome. A bound of 0 makes every
    /// initial weight exactly 0.
    pub initial_weight_bound: f32,
    /// Maximum magnitude of a gene's weight.
    pub weight_bound: f32,
    /// Chance of a weight mutation taking place.
    pub weight_mutation_chance: f32,
    /// Chance that a weight mutation resets the weight
    /// instead of nudging it.
    pub weight_reset_chance: f32,
    /// Magnitude of bound on weight nudge uniform distribution.
    /// It is assumed to be lesser than [`weight_bound`]
    ///
    /// [`weight_bound`]: GeneticConfig::weight_bound
    pub weight_mutation_power: f32,
    /// Chance of a randomly chosen gene being suppressed.
    pub gene_suppression_mutation_chance: f32,
    /// Chance of a gene deletion mutation taking place.
    pub gene_deletion_mutation_chance: f32,
    /// Chance of a gene addition mutation taking place.
    pub gene_addition_mutation_chance: f32,
    /// Chance of a node addition mutation taking place.
    pub node_addition_mutation_chance: f32,
    /// Maximum number of gene mutation attempts before
    /// mutation returns with failure.
    pub max_gene_addition_mutation_attempts: usize,
    /// Chance a suppressed gene is unsuppressed during mating.
    pub suppression_reset_chance: f32,
    /// Weight of disjoint genes in genetic distance.
    pub disjoint_gene_factor: f32,
    /// Weight of excess genes in genetic distance.
    pub excess_gene_factor: f32,
    /// Weight of the common gene weight average in genetic distance.
    pub common_weight_factor: f32,
    /// Genomes whose larger gene count is below this value
    /// are compared without normalizing by gene count.
    pub normalization_threshold: usize,
    /// Maximum number of genes a genome may hold.
    pub max_gene_count: usize,
    /// Maximum number of nodes a genome may hold.
    pub max_node_count: usize,
}

impl GeneticConfig {
    /// Returns a "zero-valued" default configuration.
    /// All values are 0, or in the case of `NonZeroUsize`s, 1.
    /// Capacities are unbounded.
    ///
    /// # Note
    /// This value is not suitable for use in most experiments.
    /// It is meant as a way to fill in unused values during
    /// configuration instantiation.
    ///
    /// # Examples
    /// ```
    /// use tickneat::GeneticConfig;
    ///
    /// let cfg1 = GeneticConfig::zero();
    ///
    /// let cfg2 = GeneticConfig {
    ///     // Specify some values here...
    ///     node_addition_mutation_chance: 0.03,
    ///     gene_addition_mutation_chance: 0.05,
    ///     // Default the rest...
    ///     ..GeneticConfig::zero()
    /// };
    /// ```
    pub const fn zero() -> GeneticConfig {
        GeneticConfig {
            input_count: NonZeroUsize::MIN,
            output_count: NonZeroUsize::MIN,
            initial_weight_bound: 0.0,
            weight_bound: 0.0,
            weight_mutation_chance: 0.0,
            weight_reset_chance: 0.0,
            weight_mutation_power: 0.0,
            gene_suppression_mutation_chance: 0.0,
            gene_deletion_mutation_chance: 0.0,
            gene_addition_mutation_chance: 0.0,
            node_addition_mutation_chance: 0.0,
            max_gene_addition_mutation_attempts: 0,
            suppression_reset_chance: 0.0,
            disjoint_gene_factor: 0.0,
            excess_gene_factor: 0.0,
            common_weight_factor: 0.0,
            normalization_threshold: 0,
            max_gene_count: usize::MAX,
            max_node_count: usize::MAX,
        }
    }

    /// Checks that all probabilities lie in [0.0, 1.0],
    /// that magnitudes and factors are finite and non-negative,
    /// and that capacities can hold a freshly initialized genome.
    ///
    /// # Errors
    /// Returns the first offending value found.
    ///
    /// # Examples
    /// ```
    /// use tickneat::GeneticConfig;
    ///
    /// assert!(GeneticConfig::zero().validate().is_ok());
    /// assert!(GeneticConfig {
    ///     weight_reset_chance: 1.5,
    ///     ..GeneticConfig::zero()
    /// }
    /// .validate()
    /// .is_err());
    /// ```
    pub fn validate(&self) -> Result<(), ConfigError> {
        for (name, chance) in [
            ("weight_mutation_chance", self.weight_mutation_chance),
            ("weight_reset_chance", self.weight_reset_chance),
            ("gene_suppression_mutation_chance", self.gene_suppression_mutation_chance),
            ("gene_deletion_mutation_chance", self.gene_deletion_mutation_chance),
            ("gene_addition_mutation_chance", self.gene_addition_mutation_chance),
            ("node_addition_mutation_chance", self.node_addition_mutation_chance),
            ("suppression_reset_chance", self.suppression_reset_chance),
        ] {
            ConfigError::check_probability(name, chance)?;
        }
        for (name, magnitude) in [
            ("initial_weight_bound", self.initial_weight_bound),
            ("weight_bound", self.weight_bound),
            ("weight_mutation_power", self.weight_mutation_power),
            ("disjoint_gene_factor", self.disjoint_gene_factor),
            ("excess_gene_factor", self.excess_gene_factor),
            ("common_weight_factor", self.common_weight_factor),
        ] {
            ConfigError::check_magnitude(name, magnitude)?;
        }

        let initial_genes = self.input_count.get() * self.output_count.get();
        if self.max_gene_count < initial_genes {
            return Err(ConfigError::InsufficientCapacity {
                name: "max_gene_count",
                capacity: self.max_gene_count,
                required: initial_genes,
            });
        }
        let initial_nodes = self.input_count.get() + self.output_count.get();
        if self.max_node_count < initial_nodes {
            return Err(ConfigError::InsufficientCapacity {
                name: "max_node_count",
                capacity: self.max_node_count,
                required: initial_nodes,
            });
        }
        Ok(())
    }
}
