//! A Population is a collection of genomes.
//! These are grouped into species, which are
//! evolved using externally evaluated fitness
//! values as the source of selective pressure.
mod config;
mod errors;
pub mod logging;
mod offspring_factory;
mod speciation;
mod species;

use crate::genomics::{ConfigError, GeneticConfig, Genome, InnovationTracker};
use crate::networks::{self, NeuralNetwork};
use crate::Innovation;
pub use config::PopulationConfig;
pub use errors::EvolutionError;
use logging::GenerationReport;
use offspring_factory::OffspringFactory;
pub use speciation::SpeciationTracker;
pub use species::{Species, SpeciesId};

use rand::prelude::Rng;
use tracing::info;

/// A population of genomes, grouped into species.
#[derive(Debug, Clone)]
pub struct Population {
    genomes: Vec<Genome>,
    spare: Vec<Genome>,
    speciation: SpeciationTracker,
    next_innovation: Innovation,
    generation: usize,
    population_config: PopulationConfig,
    genetic_config: GeneticConfig,
}

impl Population {
    /// Creates a new population of fully-connected genomes
    /// using the passed configurations, and speciates it.
    ///
    /// # Errors
    /// Returns an error if either configuration is invalid.
    ///
    /// # Examples
    /// ```
    /// use rand::{rngs::StdRng, SeedableRng};
    /// use tickneat::{GeneticConfig, Population, PopulationConfig};
    /// use std::num::NonZeroUsize;
    ///
    /// let population_config = PopulationConfig {
    ///     size: NonZeroUsize::new(10).unwrap(),
    ///     ..PopulationConfig::zero()
    /// };
    /// let population = Population::new(
    ///     population_config,
    ///     GeneticConfig::zero(),
    ///     &mut StdRng::seed_from_u64(0),
    /// )
    /// .unwrap();
    ///
    /// assert_eq!(population.genomes().len(), 10);
    /// assert_eq!(population.next_innovation(), 1);
    /// ```
    pub fn new<R: Rng + ?Sized>(
        population_config: PopulationConfig,
        genetic_config: GeneticConfig,
        rng: &mut R,
    ) -> Result<Population, ConfigError> {
        genetic_config.validate()?;
        population_config.validate()?;

        let size = population_config.size.get();
        let mut genomes: Vec<Genome> = (0..size)
            .map(|_| Genome::new(&genetic_config, rng))
            .collect();
        let mut speciation = SpeciationTracker::new(&population_config);
        speciation.initialize(&mut genomes, &genetic_config);
        info!(size, species = speciation.len(), "population created");

        Ok(Population {
            genomes,
            spare: Vec::with_capacity(size),
            speciation,
            next_innovation: genetic_config.input_count.get() * genetic_config.output_count.get(),
            generation: 0,
            population_config,
            genetic_config,
        })
    }

    /// Builds the next generation from the current one, given
    /// the fitness of each genome (in population order).
    ///
    /// Stagnant species are eliminated, species champions are
    /// carried over, and the rest of the population is bred from
    /// the fittest members of every species, mutated and
    /// speciated again.
    ///
    /// # Errors
    /// Returns an error, leaving the population untouched, if
    /// `fitness` does not hold exactly one finite, non-negative
    /// value per genome.
    ///
    /// # Examples
    /// ```
    /// use rand::{rngs::StdRng, SeedableRng};
    /// use tickneat::{GeneticConfig, Population, PopulationConfig};
    /// use std::num::NonZeroUsize;
    ///
    /// let mut rng = StdRng::seed_from_u64(0);
    /// let mut population = Population::new(
    ///     PopulationConfig {
    ///         size: NonZeroUsize::new(10).unwrap(),
    ///         ..PopulationConfig::zero()
    ///     },
    ///     GeneticConfig::zero(),
    ///     &mut rng,
    /// )
    /// .unwrap();
    ///
    /// let fitness: Vec<f32> = (0..10).map(|i| i as f32).collect();
    /// let report = population.evolve(&fitness, &mut rng).unwrap();
    ///
    /// assert_eq!(report.generation, 0);
    /// assert_eq!(report.fitness.maximum, 9.0);
    /// assert_eq!(population.generation(), 1);
    /// assert!(population.evolve(&fitness[1..], &mut rng).is_err());
    /// ```
    pub fn evolve<R: Rng + ?Sized>(
        &mut self,
        fitness: &[f32],
        rng: &mut R,
    ) -> Result<GenerationReport, EvolutionError> {
        self.check_fitness(fitness)?;
        let mut report = GenerationReport::new(
            self.generation,
            &self.genomes,
            fitness,
            self.speciation.len(),
        );

        let species_fitness = self.species_fitness(fitness);
        report.eliminated_species = self.speciation.update_stagnation(&species_fitness);

        let mut offspring = std::mem::take(&mut self.spare);
        let champions = OffspringFactory::new(
            &self.genomes,
            fitness,
            &self.speciation,
            &self.genetic_config,
            &self.population_config,
        )
        .generate_offspring(&mut offspring, rng);

        {
            let mut tracker = InnovationTracker::new(&mut self.next_innovation);
            for child in &mut offspring[champions..] {
                child.mutate_all(&mut tracker, &self.genetic_config, rng);
            }
        }
        self.speciation.reassign(&mut offspring, &self.genetic_config);

        std::mem::swap(&mut self.genomes, &mut offspring);
        self.spare = offspring;
        self.generation += 1;

        report.champion_count = champions;
        report.next_innovation = self.next_innovation;
        info!(
            generation = report.generation,
            species = report.species_count,
            eliminated = report.eliminated_species.len(),
            max_fitness = report.fitness.maximum,
            mean_fitness = report.fitness.mean,
            "generation evolved"
        );
        Ok(report)
    }

    fn check_fitness(&self, fitness: &[f32]) -> Result<(), EvolutionError> {
        if fitness.len() != self.genomes.len() {
            return Err(EvolutionError::FitnessCountMismatch {
                expected: self.genomes.len(),
                actual: fitness.len(),
            });
        }
        match fitness
            .iter()
            .position(|f| !(f.is_finite() && *f >= 0.0))
        {
            Some(index) => Err(EvolutionError::InvalidFitness {
                index,
                value: fitness[index],
            }),
            None => Ok(()),
        }
    }

    /// Best fitness of each species, indexed by species id.
    fn species_fitness(&self, fitness: &[f32]) -> Vec<Option<f32>> {
        let mut species_fitness = vec![None; self.speciation.slot_count()];
        for (genome, &f) in self.genomes.iter().zip(fitness) {
            if let Some(best) = genome.species().and_then(|id| species_fitness.get_mut(id.0)) {
                *best = Some(best.map_or(f, |b: f32| b.max(f)));
            }
        }
        species_fitness
    }

    /// Builds a network from every genome, in population order.
    pub fn build_networks(&self) -> Vec<NeuralNetwork> {
        networks::build_networks(&self.genomes)
    }

    /// Returns the index of the fittest genome, the first among ties.
    /// Returns `None` if `fitness` does not match the population size.
    ///
    /// # Examples
    /// ```
    /// use rand::{rngs::StdRng, SeedableRng};
    /// use tickneat::{GeneticConfig, Population, PopulationConfig};
    /// use std::num::NonZeroUsize;
    ///
    /// let population = Population::new(
    ///     PopulationConfig {
    ///         size: NonZeroUsize::new(3).unwrap(),
    ///         ..PopulationConfig::zero()
    ///     },
    ///     GeneticConfig::zero(),
    ///     &mut StdRng::seed_from_u64(0),
    /// )
    /// .unwrap();
    ///
    /// assert_eq!(population.champion(&[1.0, 3.0, 3.0]), Some(1));
    /// ```
    pub fn champion(&self, fitness: &[f32]) -> Option<usize> {
        if fitness.len() != self.genomes.len() {
            return None;
        }
        fitness
            .iter()
            .enumerate()
            .fold(None, |best: Option<(usize, f32)>, (i, &f)| match best {
                Some((_, max)) if max >= f => best,
                _ => Some((i, f)),
            })
            .map(|(i, _)| i)
    }

    /// Returns the current genomes, in population order.
    pub fn genomes(&self) -> &[Genome] {
        &self.genomes
    }

    /// Returns an iterator over the population's species.
    pub fn species(&self) -> impl Iterator<Item = &Species> {
        self.speciation.species()
    }

    pub fn speciation(&self) -> &SpeciationTracker {
        &self.speciation
    }

    /// Returns the number of generations evolved so far.
    pub fn generation(&self) -> usize {
        self.generation
    }

    /// Returns the innovation number the next
    /// structural mutation will receive.
    pub fn next_innovation(&self) -> Innovation {
        self.next_innovation
    }

    pub fn population_config(&self) -> &PopulationConfig {
        &self.population_config
    }

    pub fn genetic_config(&self) -> &GeneticConfig {
        &self.genetic_config
    }
}
