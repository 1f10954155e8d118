//! A generational implementation of NeuroEvolution of Augmenting Topologies,
//! following the 2002 paper: <http://nn.cs.utexas.edu/keyword?stanley:ec02>
//!
//! It is meant to sit underneath a real-time simulation: the simulation
//! builds one [`NeuralNetwork`] per genome at the start of a generation,
//! drives them tick by tick through [`set_inputs`], [`propagate`] and
//! [`outputs`], accumulates a fitness value for each individual, and
//! calls [`Population::evolve`] once when the generation is over.
//!
//! [`NeuralNetwork`]: crate::networks::NeuralNetwork
//! [`set_inputs`]: crate::networks::NeuralNetwork::set_inputs
//! [`propagate`]: crate::networks::NeuralNetwork::propagate
//! [`outputs`]: crate::networks::NeuralNetwork::outputs
//!
//! # Example usage
//! ```
//! use rand::{rngs::StdRng, SeedableRng};
//! use tickneat::{GeneticConfig, Population, PopulationConfig};
//! use std::num::NonZeroUsize;
//!
//! let genetic_config = GeneticConfig {
//!     input_count: NonZeroUsize::new(2).unwrap(),
//!     output_count: NonZeroUsize::new(1).unwrap(),
//!     initial_weight_bound: 1.0,
//!     weight_bound: 5.0,
//!     weight_mutation_chance: 0.8,
//!     weight_reset_chance: 0.1,
//!     weight_mutation_power: 0.5,
//!     gene_addition_mutation_chance: 0.05,
//!     node_addition_mutation_chance: 0.03,
//!     max_gene_addition_mutation_attempts: 20,
//!     suppression_reset_chance: 0.25,
//!     disjoint_gene_factor: 1.0,
//!     excess_gene_factor: 1.0,
//!     common_weight_factor: 0.4,
//!     ..GeneticConfig::zero()
//! };
//! let population_config = PopulationConfig {
//!     size: NonZeroUsize::new(50).unwrap(),
//!     distance_threshold: 3.0,
//!     stagnation_threshold: NonZeroUsize::new(15).unwrap(),
//!     survival_threshold: 0.5,
//!     champion_population_threshold: 4,
//!     sexual_reproduction_chance: 0.75,
//!     ..PopulationConfig::zero()
//! };
//!
//! let mut rng = StdRng::seed_from_u64(7);
//! let mut population = Population::new(population_config, genetic_config, &mut rng).unwrap();
//!
//! for _ in 0..5 {
//!     let mut networks = population.build_networks();
//!     let mut fitness = vec![0.0; networks.len()];
//!     // The simulation loop.
//!     for _tick in 0..10 {
//!         for (network, fitness) in networks.iter_mut().zip(&mut fitness) {
//!             network.set_inputs(&[0.5, -0.5]);
//!             network.propagate();
//!             *fitness += 1.0 + network.outputs()[0];
//!         }
//!     }
//!     let report = population.evolve(&fitness, &mut rng).unwrap();
//!     println!("{}", report);
//! }
//! assert_eq!(population.genomes().len(), 50);
//! ```

pub mod genomics;
pub mod networks;
pub mod populations;

pub use genomics::{ConfigError, Gene, GeneticConfig, Genome, InnovationTracker};
pub use networks::NeuralNetwork;
pub use populations::{
    logging, EvolutionError, Population, PopulationConfig, SpeciationTracker, Species, SpeciesId,
};

/// Identifier type used to designate historically
/// identical mutations for the purposes of
/// genome comparison and genetic tracking.
pub type Innovation = usize;
