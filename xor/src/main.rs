use tickneat::{logging::Stats, GeneticConfig, NeuralNetwork, Population, PopulationConfig};

use std::num::NonZeroUsize;

use rand::{rngs::StdRng, SeedableRng};
use rayon::prelude::*;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

const ERROR_MARGIN: f32 = 0.3;
const PERFECT_FITNESS: f32 = 16.0;
const RUNS: u64 = 20;
const MAX_GENERATIONS: usize = 300;
/// Propagations per case, so signals can cross hidden layers.
const TICKS: usize = 3;

fn evaluate_xor(network: &mut NeuralNetwork) -> f32 {
    let cases = [
        ([0.0, 0.0], 0.0),
        ([0.0, 1.0], 1.0),
        ([1.0, 0.0], 1.0),
        ([1.0, 1.0], 0.0),
    ];

    let mut errors = [0.0; 4];
    for (error, (inputs, expected)) in errors.iter_mut().zip(cases.iter()) {
        network.set_inputs(inputs);
        for _ in 0..TICKS {
            network.propagate();
        }
        *error = (network.outputs()[0] - expected).abs();
        if *error < ERROR_MARGIN {
            *error = 0.0;
        }
    }

    (4.0 - errors.iter().sum::<f32>()).max(0.0).powf(2.0)
}

/// Evolves a population until a genome solves XOR.
/// Returns the generation it was found in, if any.
fn run(
    seed: u64,
    genetic_config: &GeneticConfig,
    population_config: &PopulationConfig,
) -> Option<usize> {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut population = match Population::new(
        population_config.clone(),
        genetic_config.clone(),
        &mut rng,
    ) {
        Ok(population) => population,
        Err(e) => {
            warn!("invalid configuration: {}", e);
            return None;
        }
    };

    for _ in 0..MAX_GENERATIONS {
        let mut networks = population.build_networks();
        let fitness: Vec<f32> = networks.par_iter_mut().map(evaluate_xor).collect();

        if let Some(champion) = population.champion(&fitness) {
            if (fitness[champion] - PERFECT_FITNESS).abs() < f32::EPSILON {
                info!(seed, generation = population.generation(), "solved");
                return Some(population.generation());
            }
        }
        if let Err(e) = population.evolve(&fitness, &mut rng) {
            warn!("{}", e);
            return None;
        }
    }
    None
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .init();

    let genetic_config = GeneticConfig {
        input_count: NonZeroUsize::new(2).unwrap(),
        output_count: NonZeroUsize::new(1).unwrap(),
        initial_weight_bound: 1.0,
        weight_bound: 5.0,
        weight_mutation_chance: 0.8,
        weight_reset_chance: 0.1,
        weight_mutation_power: 2.5,
        gene_suppression_mutation_chance: 0.01,
        gene_deletion_mutation_chance: 0.002,
        gene_addition_mutation_chance: 0.05,
        node_addition_mutation_chance: 0.03,
        max_gene_addition_mutation_attempts: 20,
        suppression_reset_chance: 0.25,
        disjoint_gene_factor: 1.0,
        excess_gene_factor: 1.0,
        common_weight_factor: 0.4,
        normalization_threshold: 20,
        max_gene_count: 512,
        max_node_count: 128,
    };
    let population_config = PopulationConfig {
        size: NonZeroUsize::new(150).unwrap(),
        distance_threshold: 3.0,
        stagnation_threshold: NonZeroUsize::new(15).unwrap(),
        survival_threshold: 0.2,
        champion_population_threshold: 4,
        sexual_reproduction_chance: 0.75,
        max_species: 150,
    };

    let generations: Vec<Option<usize>> = (0..RUNS)
        .map(|seed| run(seed, &genetic_config, &population_config))
        .collect();

    println!(
        "Successful run generation count {:?}, {}% failure rate over {} runs",
        Stats::from(generations.iter().filter_map(|g| g.map(|g| g as f32))),
        generations.iter().filter(|g| g.is_none()).count() as f32 * 100.0 / RUNS as f32,
        RUNS
    );
}
