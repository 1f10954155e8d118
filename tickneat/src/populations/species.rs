use crate::populations::PopulationConfig;
use crate::{GeneticConfig, Genome};

use std::fmt;

/// Species identifier. Identifiers are slot
/// indices, and are handed out again once the
/// species holding them goes extinct.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SpeciesId(pub usize);

impl fmt::Display for SpeciesId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "S{}", self.0)
    }
}

/// Species are collections of reproductively
/// compatible (within a certain [genetic distance])
/// genomes. Membership is determined by calculating
/// the genetic distance to a _representative_,
/// which is the first member of the species in
/// population order as of the last speciation.
///
/// Species are eliminated after [`stagnation_threshold`]
/// generations without improving the species' best
/// fitness, and leave no offspring.
///
/// [genetic distance]: PopulationConfig::distance_threshold
/// [`stagnation_threshold`]: PopulationConfig::stagnation_threshold
#[derive(Debug, Clone)]
pub struct Species {
    id: SpeciesId,
    representative: Genome,
    pub(super) population: usize,
    stagnation: usize,
    max_fitness: f32,
    pub(super) eliminated: bool,
}

impl Species {
    pub(super) fn new(id: SpeciesId, representative: Genome) -> Species {
        Species {
            id,
            representative,
            population: 0,
            stagnation: 0,
            max_fitness: f32::NEG_INFINITY,
            eliminated: false,
        }
    }

    /// Returns the species' ID.
    pub fn id(&self) -> SpeciesId {
        self.id
    }

    /// Returns the species' representative.
    pub fn representative(&self) -> &Genome {
        &self.representative
    }

    pub(super) fn set_representative(&mut self, representative: Genome) {
        self.representative = representative;
    }

    /// Returns the number of genomes assigned
    /// to the species in the last speciation.
    pub fn population(&self) -> usize {
        self.population
    }

    /// Returns the number of generations the species
    /// has gone without improving its best fitness.
    pub fn time_stagnated(&self) -> usize {
        self.stagnation
    }

    /// Returns the best fitness any member of the
    /// species has achieved.
    pub fn max_fitness(&self) -> f32 {
        self.max_fitness
    }

    /// Returns whether the species has been eliminated
    /// for stagnating. Eliminated species take no new
    /// members and leave no offspring.
    pub fn eliminated(&self) -> bool {
        self.eliminated
    }

    /// Returns the genetic distance between the species'
    /// representative and `other`.
    pub fn genetic_distance(&self, other: &Genome, config: &GeneticConfig) -> f32 {
        Genome::genetic_distance(&self.representative, other, config)
    }

    /// Updates the species' record of maximum
    /// fitness, to keep track of stagnation.
    pub(super) fn update_fitness(&mut self, generation_max_fitness: f32) {
        if generation_max_fitness > self.max_fitness {
            self.max_fitness = generation_max_fitness;
            self.stagnation = 0;
        } else {
            self.stagnation += 1;
        }
    }

    pub(super) fn record_stagnation(&mut self) {
        self.stagnation += 1;
    }

    pub(super) fn count_survivors(&self, config: &PopulationConfig) -> usize {
        ((self.population as f32 * config.survival_threshold).floor() as usize)
            .clamp(1, self.population.max(1))
    }

    pub(super) fn keeps_champion(&self, config: &PopulationConfig) -> bool {
        self.population > config.champion_population_threshold
    }
}
