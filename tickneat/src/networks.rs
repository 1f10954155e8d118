//! A Network is the phenotype of a Genome, with
//! suppressed genes being ignored. Genes become
//! computations, and genome nodes become value
//! slots in a flat buffer.
//!
//! Networks are stepped once per tick: inputs are
//! set, values are propagated from the inputs towards
//! the outputs, and the outputs are read back.
mod computation;

use crate::genomics::Genome;
use computation::Computation;

use rayon::prelude::*;

use std::cmp::Reverse;

/// A feed-forward evaluation plan for a genome.
///
/// Computations are ordered by decreasing distance from
/// the output nodes, so that in acyclic networks every
/// node is computed before it is read. Connections that
/// close a cycle read whatever the source node held when
/// they run, which is the value of the previous propagation.
#[derive(Clone, Debug)]
pub struct NeuralNetwork {
    input_count: usize,
    output_count: usize,
    values: Box<[f32]>,
    computations: Box<[Computation]>,
}

impl NeuralNetwork {
    /// Generates a new network from the passed genome.
    ///
    /// # Examples
    /// ```
    /// use rand::{rngs::StdRng, SeedableRng};
    /// use tickneat::{GeneticConfig, Genome, NeuralNetwork};
    /// use std::num::NonZeroUsize;
    ///
    /// let genome = Genome::new(
    ///     &GeneticConfig {
    ///         input_count: NonZeroUsize::new(2).unwrap(),
    ///         ..GeneticConfig::zero()
    ///     },
    ///     &mut StdRng::seed_from_u64(0),
    /// );
    ///
    /// let mut network = NeuralNetwork::new(&genome);
    /// network.set_inputs(&[0.5, 1.0]);
    /// network.propagate();
    ///
    /// // All weights are 0, leaving only the bias.
    /// assert_eq!(network.outputs(), &[1.0f32.tanh()]);
    /// ```
    pub fn new(genome: &Genome) -> NeuralNetwork {
        let node_count = genome.node_count();
        let output_nodes = genome.input_count()..genome.input_count() + genome.output_count();
        let mut computations: Vec<Computation> = genome
            .genes()
            .iter()
            .filter(|g| !g.suppressed())
            .map(Computation::from)
            .collect();

        let mut depth: Vec<Option<usize>> = vec![None; node_count];
        let mut in_frontier = vec![false; node_count];
        let mut frontier: Vec<usize> = output_nodes.collect();
        for &node in &frontier {
            depth[node] = Some(0);
        }

        // Bounded by node_count so cycles terminate.
        for level in 0..node_count {
            if frontier.is_empty() {
                break;
            }
            for &node in &frontier {
                in_frontier[node] = true;
            }
            let mut next_frontier = vec![];
            for computation in computations.iter().filter(|c| in_frontier[c.output]) {
                let source = computation.input;
                if depth[source].map_or(true, |d| d <= level) {
                    depth[source] = Some(level + 1);
                    next_frontier.push(source);
                }
            }
            for &node in &frontier {
                in_frontier[node] = false;
            }
            frontier = next_frontier;
        }

        computations.retain(|c| depth[c.output].is_some());
        computations.sort_by_key(|c| (Reverse(depth[c.output]), c.output));

        NeuralNetwork {
            input_count: genome.input_count(),
            output_count: genome.output_count(),
            values: vec![0.0; node_count].into(),
            computations: computations.into(),
        }
    }

    /// Sets the values of the input nodes, in order, and
    /// clears every other node.
    ///
    /// # Panics
    /// Panics if more values are passed than the network
    /// has inputs.
    pub fn set_inputs(&mut self, inputs: &[f32]) {
        assert!(
            inputs.len() <= self.input_count,
            "{} inputs passed to a network with {} input nodes",
            inputs.len(),
            self.input_count
        );
        self.values[..inputs.len()].copy_from_slice(inputs);
        self.values[inputs.len()..].fill(0.0);
    }

    /// Runs every computation once, in order. Each node's value
    /// becomes `tanh(1 + Σ weight ⨯ source)` over its incoming
    /// connections.
    pub fn propagate(&mut self) {
        let NeuralNetwork {
            values,
            computations,
            ..
        } = self;
        for group in computations.chunk_by(|a, b| a.output == b.output) {
            let sum: f32 = group.iter().map(|c| c.weight * values[c.input]).sum();
            values[group[0].output] = (1.0 + sum).tanh();
        }
    }

    /// Returns the current values of the output nodes.
    pub fn outputs(&self) -> &[f32] {
        &self.values[self.input_count..self.input_count + self.output_count]
    }

    pub fn input_count(&self) -> usize {
        self.input_count
    }

    pub fn output_count(&self) -> usize {
        self.output_count
    }

    /// Returns the number of nodes in the network.
    pub fn node_count(&self) -> usize {
        self.values.len()
    }
}

impl From<&Genome> for NeuralNetwork {
    fn from(genome: &Genome) -> NeuralNetwork {
        NeuralNetwork::new(genome)
    }
}

/// Builds a network for each genome, in parallel.
pub fn build_networks(genomes: &[Genome]) -> Vec<NeuralNetwork> {
    genomes.par_iter().map(NeuralNetwork::new).collect()
}
