use crate::populations::{PopulationConfig, Species, SpeciesId};
use crate::{GeneticConfig, Genome};

use tracing::debug;

/// Groups genomes into species by genetic distance,
/// and keeps each species' stagnation record across
/// generations.
///
/// Species live in slots indexed by their [`SpeciesId`].
/// A slot is vacated once its species is left without
/// members, and the lowest vacant slot is the one handed
/// to the next new species.
#[derive(Debug, Clone)]
pub struct SpeciationTracker {
    slots: Vec<Option<Species>>,
    distance_threshold: f32,
    stagnation_threshold: usize,
    max_species: usize,
}

impl SpeciationTracker {
    /// Creates a tracker with no species.
    pub fn new(config: &PopulationConfig) -> SpeciationTracker {
        SpeciationTracker {
            slots: vec![],
            distance_threshold: config.distance_threshold,
            stagnation_threshold: config.stagnation_threshold.get(),
            max_species: config.max_species,
        }
    }

    /// Forgets all species, then speciates `genomes` from scratch.
    pub fn initialize(&mut self, genomes: &mut [Genome], config: &GeneticConfig) {
        self.slots.clear();
        self.reassign(genomes, config);
    }

    /// Assigns every genome, in order, to the first live species
    /// (by ascending id) whose representative is within the distance
    /// threshold, founding a new species where none is.
    ///
    /// Afterwards, each species' representative becomes its first
    /// member, and species left without members are removed.
    ///
    /// # Panics
    /// Panics if more than [`max_species`] species would be alive.
    ///
    /// [`max_species`]: PopulationConfig::max_species
    pub fn reassign(&mut self, genomes: &mut [Genome], config: &GeneticConfig) {
        for species in self.slots.iter_mut().flatten() {
            species.population = 0;
        }

        for genome in genomes.iter_mut() {
            let id = match self.find_species(genome, config) {
                Some(id) => id,
                None => self.found_species(genome),
            };
            genome.set_species(id);
            if let Some(species) = self.slot_mut(id) {
                species.population += 1;
            }
        }

        let mut refreshed = vec![false; self.slots.len()];
        for genome in genomes.iter() {
            if let Some(id) = genome.species() {
                if !refreshed[id.0] {
                    refreshed[id.0] = true;
                    if let Some(species) = self.slot_mut(id) {
                        species.set_representative(genome.clone());
                    }
                }
            }
        }

        for slot in &mut self.slots {
            if slot.as_ref().map_or(false, |s| s.population == 0) {
                if let Some(species) = slot.take() {
                    debug!("species {} went extinct", species.id());
                }
            }
        }
        while let Some(None) = self.slots.last() {
            self.slots.pop();
        }
    }

    fn find_species(&self, genome: &Genome, config: &GeneticConfig) -> Option<SpeciesId> {
        self.slots
            .iter()
            .flatten()
            .filter(|s| !s.eliminated())
            .find(|s| s.genetic_distance(genome, config) <= self.distance_threshold)
            .map(Species::id)
    }

    fn found_species(&mut self, representative: &Genome) -> SpeciesId {
        let alive = self.species().filter(|s| !s.eliminated()).count();
        assert!(
            alive < self.max_species,
            "species capacity of {} exhausted",
            self.max_species
        );

        let index = self
            .slots
            .iter()
            .position(Option::is_none)
            .unwrap_or(self.slots.len());
        let id = SpeciesId(index);
        let species = Some(Species::new(id, representative.clone()));
        if index == self.slots.len() {
            self.slots.push(species);
        } else {
            self.slots[index] = species;
        }
        debug!("founded species {}", id);
        id
    }

    /// Records each species' best fitness this generation,
    /// indexed by species id, and eliminates species that have
    /// stagnated for too long. The species with the highest
    /// fitness (the lowest id among ties) is never eliminated.
    ///
    /// Returns the ids of the newly eliminated species.
    ///
    /// # Panics
    /// Panics if no species is left alive.
    pub fn update_stagnation(&mut self, species_fitness: &[Option<f32>]) -> Vec<SpeciesId> {
        let fitness_of = |id: SpeciesId| species_fitness.get(id.0).copied().flatten();
        let mut best: Option<(SpeciesId, f32)> = None;
        for species in self.species() {
            if let Some(fitness) = fitness_of(species.id()) {
                if best.map_or(true, |(_, max)| fitness > max) {
                    best = Some((species.id(), fitness));
                }
            }
        }
        let best = best.map(|(id, _)| id);

        let mut eliminated = vec![];
        for species in self.slots.iter_mut().flatten() {
            match fitness_of(species.id()) {
                Some(fitness) => species.update_fitness(fitness),
                None => species.record_stagnation(),
            }
            if !species.eliminated
                && species.time_stagnated() >= self.stagnation_threshold
                && Some(species.id()) != best
            {
                species.eliminated = true;
                debug!(
                    "species {} eliminated after stagnating for {} generations",
                    species.id(),
                    species.time_stagnated()
                );
                eliminated.push(species.id());
            }
        }

        assert!(
            self.species().any(|s| !s.eliminated()),
            "no species survived stagnation"
        );
        eliminated
    }

    /// Returns the species with the given id, if alive.
    pub fn get(&self, id: SpeciesId) -> Option<&Species> {
        self.slots.get(id.0).and_then(Option::as_ref)
    }

    fn slot_mut(&mut self, id: SpeciesId) -> Option<&mut Species> {
        self.slots.get_mut(id.0).and_then(Option::as_mut)
    }

    /// Iterates over all current species in ascending id order.
    pub fn species(&self) -> impl Iterator<Item = &Species> {
        self.slots.iter().flatten()
    }

    /// Returns the number of current species.
    pub fn len(&self) -> usize {
        self.species().count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns one past the highest species id in use.
    pub(crate) fn slot_count(&self) -> usize {
        self.slots.len()
    }
}
