use super::SpeciesId;
use crate::{Genome, Innovation};

use std::fmt;

/// A struct for reporting basic statistical data.
#[derive(Clone, Debug, PartialEq)]
pub struct Stats {
    pub maximum: f32,
    pub minimum: f32,
    pub mean: f32,
    pub median: f32,
}

impl Stats {
    /// Returns statistics about numbers in a sequence.
    /// An empty sequence gives NaN everywhere.
    ///
    /// # Examples
    /// ```
    /// use tickneat::logging::Stats;
    ///
    /// let stats = Stats::from([-2.0, -1.0, 0.5, 1.0, 1.5].iter().copied());
    /// assert_eq!(stats.maximum, 1.5);
    /// assert_eq!(stats.minimum, -2.0);
    /// assert_eq!(stats.mean, 0.0);
    /// assert_eq!(stats.median, 0.5);
    /// ```
    pub fn from(data: impl Iterator<Item = f32>) -> Stats {
        let mut data: Vec<f32> = data.collect();
        if data.is_empty() {
            return Stats {
                maximum: f32::NAN,
                minimum: f32::NAN,
                mean: f32::NAN,
                median: f32::NAN,
            };
        }

        let (mut max, mut min, mut sum) = (f32::NEG_INFINITY, f32::INFINITY, 0.0f64);
        for d in &data {
            max = d.max(max);
            min = d.min(min);
            sum += *d as f64;
        }
        let mean = (sum / data.len() as f64) as f32;

        let mid = data.len() / 2;
        let mut median = *data.select_nth_unstable_by(mid, f32::total_cmp).1;
        if data.len() % 2 == 0 {
            // Everything left of `mid` is now no greater than it.
            let lower = data[..mid].iter().copied().fold(f32::NEG_INFINITY, f32::max);
            median = lower / 2.0 + median / 2.0;
        }

        Stats {
            maximum: max,
            minimum: min,
            mean,
            median,
        }
    }
}

/// A summary of one evaluated generation,
/// as returned by [`Population::evolve`].
///
/// [`Population::evolve`]: crate::Population::evolve
#[derive(Clone, Debug)]
pub struct GenerationReport {
    /// The generation that was evaluated.
    pub generation: usize,
    /// Number of species in the evaluated generation.
    pub species_count: usize,
    /// Species eliminated for stagnating.
    pub eliminated_species: Vec<SpeciesId>,
    /// Number of species champions carried over unchanged.
    pub champion_count: usize,
    pub fitness: Stats,
    pub gene_count: Stats,
    pub node_count: Stats,
    /// Next innovation number after the generation's mutations.
    pub next_innovation: Innovation,
}

impl GenerationReport {
    pub(super) fn new(
        generation: usize,
        genomes: &[Genome],
        fitness: &[f32],
        species_count: usize,
    ) -> GenerationReport {
        GenerationReport {
            generation,
            species_count,
            eliminated_species: vec![],
            champion_count: 0,
            fitness: Stats::from(fitness.iter().copied()),
            gene_count: Stats::from(genomes.iter().map(|g| g.genes().len() as f32)),
            node_count: Stats::from(genomes.iter().map(|g| g.node_count() as f32)),
            next_innovation: 0,
        }
    }
}

impl fmt::Display for GenerationReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "GenerationReport {{\n\
            \tgeneration: {:?}\n\
            \tspecies_count: {:?}\n\
            \teliminated_species: [{}]\n\
            \tchampion_count: {:?}\n\
            \tfitness: {:?}\n\
            \tgene_count: {:?}\n\
            \tnode_count: {:?}\n\
            \tnext_innovation: {:?}\n\
            }}",
            self.generation,
            self.species_count,
            self.eliminated_species
                .iter()
                .map(|id| id.to_string())
                .collect::<Vec<_>>()
                .join(", "),
            self.champion_count,
            self.fitness,
            self.gene_count,
            self.node_count,
            self.next_innovation,
        )
    }
}
