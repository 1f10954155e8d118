use super::*;

use rand::distributions::{Distribution, WeightedIndex};

/// The eligible parents of a single live species,
/// as population indices sorted by decreasing fitness.
struct BreedingPool {
    population: usize,
    parents: Vec<usize>,
    keeps_champion: bool,
}

/// Fitness-proportionate selection over a set of weights,
/// falling back to a uniform choice when no weight is positive.
enum Roulette {
    Weighted(WeightedIndex<f32>),
    Uniform(usize),
}

impl Roulette {
    fn new(weights: &[f32]) -> Roulette {
        // Scaled to at most 1 so the cumulative sum stays finite.
        let max = weights.iter().copied().fold(0.0, f32::max);
        if !(max > 0.0 && max.is_finite()) {
            return Roulette::Uniform(weights.len());
        }
        match WeightedIndex::new(weights.iter().map(|w| w / max)) {
            Ok(distribution) => Roulette::Weighted(distribution),
            Err(_) => Roulette::Uniform(weights.len()),
        }
    }

    fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> usize {
        match self {
            Roulette::Weighted(distribution) => distribution.sample(rng),
            Roulette::Uniform(len) => rng.gen_range(0..*len),
        }
    }
}

/// Auxiliary type for offspring generation.
/// Handles all the tasks of generating a population's
/// offspring according to the specified configs
/// and the evaluated fitness of its members.
pub(super) struct OffspringFactory<'a> {
    genomes: &'a [Genome],
    fitness: &'a [f32],
    speciation: &'a SpeciationTracker,
    genetic_config: &'a GeneticConfig,
    population_config: &'a PopulationConfig,
}

impl<'a> OffspringFactory<'a> {
    pub(super) fn new(
        genomes: &'a [Genome],
        fitness: &'a [f32],
        speciation: &'a SpeciationTracker,
        genetic_config: &'a GeneticConfig,
        population_config: &'a PopulationConfig,
    ) -> OffspringFactory<'a> {
        OffspringFactory {
            genomes,
            fitness,
            speciation,
            genetic_config,
            population_config,
        }
    }

    /// Fills `offspring` with a full generation. Champions come
    /// first, and are meant to be left unmutated.
    /// Returns the number of champions.
    pub(super) fn generate_offspring<R: Rng + ?Sized>(
        &self,
        offspring: &mut Vec<Genome>,
        rng: &mut R,
    ) -> usize {
        offspring.clear();
        let pools = self.breeding_pools();

        for pool in pools.iter().filter(|p| p.keeps_champion) {
            offspring.push(self.genomes[pool.parents[0]].clone());
        }
        let champions = offspring.len();

        let parents: Vec<(usize, usize)> = pools
            .iter()
            .enumerate()
            .flat_map(|(p, pool)| pool.parents.iter().map(move |&g| (p, g)))
            .collect();
        assert!(!parents.is_empty(), "no eligible parents in population");
        let first_parent = Roulette::new(
            &parents
                .iter()
                .map(|&(p, g)| self.shared_fitness(g, &pools[p]))
                .collect::<Vec<_>>(),
        );

        while offspring.len() < self.population_config.size.get() {
            let (pool, parent) = parents[first_parent.sample(rng)];
            let child = if rng.gen::<f32>() < self.population_config.sexual_reproduction_chance {
                match self.choose_mate(&pools[pool], parent, rng) {
                    Some(mate) => self.mate(parent, mate, rng),
                    None => self.genomes[parent].clone(),
                }
            } else {
                self.genomes[parent].clone()
            };
            offspring.push(child);
        }

        champions
    }

    /// Ranks the population by species, then by decreasing fitness,
    /// and truncates every live species to its eligible parents.
    fn breeding_pools(&self) -> Vec<BreedingPool> {
        let mut ranked: Vec<usize> = (0..self.genomes.len()).collect();
        ranked.sort_by(|&a, &b| {
            self.genomes[a]
                .species()
                .cmp(&self.genomes[b].species())
                .then(self.fitness[b].total_cmp(&self.fitness[a]))
        });

        ranked
            .chunk_by(|&a, &b| self.genomes[a].species() == self.genomes[b].species())
            .filter_map(|members| {
                let species = self
                    .genomes[members[0]]
                    .species()
                    .and_then(|id| self.speciation.get(id))
                    .filter(|s| !s.eliminated())?;
                let survivors = species
                    .count_survivors(self.population_config)
                    .min(members.len());
                Some(BreedingPool {
                    population: members.len(),
                    parents: members[..survivors].to_vec(),
                    keeps_champion: species.keeps_champion(self.population_config),
                })
            })
            .collect()
    }

    fn shared_fitness(&self, genome: usize, pool: &BreedingPool) -> f32 {
        self.fitness[genome] / pool.population as f32
    }

    /// Choose a second parent among the other
    /// eligible parents of the same species.
    fn choose_mate<R: Rng + ?Sized>(
        &self,
        pool: &BreedingPool,
        parent: usize,
        rng: &mut R,
    ) -> Option<usize> {
        let candidates: Vec<usize> = pool
            .parents
            .iter()
            .copied()
            .filter(|&g| g != parent)
            .collect();
        if candidates.is_empty() {
            return None;
        }
        let roulette = Roulette::new(
            &candidates
                .iter()
                .map(|&g| self.shared_fitness(g, pool))
                .collect::<Vec<_>>(),
        );
        Some(candidates[roulette.sample(rng)])
    }

    fn mate<R: Rng + ?Sized>(&self, parent1: usize, parent2: usize, rng: &mut R) -> Genome {
        let (fitter, other) = if self.fitness[parent2] > self.fitness[parent1]
            || (self.fitness[parent2] == self.fitness[parent1] && parent2 < parent1)
        {
            (parent2, parent1)
        } else {
            (parent1, parent2)
        };
        Genome::mate(
            &self.genomes[fitter],
            &self.genomes[other],
            self.genetic_config,
            rng,
        )
    }
}
