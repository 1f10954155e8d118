//! Genomes are the focus of evolution in NEAT.
//! They are an innovation-ordered list of genes over a set of indexed
//! nodes, and can be instantiated as a phenotype (a neural network).
//! Genomes can be progressively mutated, thus adding complexity and
//! functionality.
//!
//! Node indices are laid out as inputs first, then outputs, then
//! hidden nodes in order of creation. Hidden nodes remember the
//! innovation number of the gene whose split created them, which is
//! what tells apart structurally identical mutations that arose
//! independently.

mod config;
mod errors;
mod genes;
mod innovation;

pub use config::GeneticConfig;
pub use errors::{ConfigError, GeneViabilityError, MutationError};
pub use genes::Gene;
pub use innovation::{InnovationTracker, StructuralMutation};

use crate::populations::SpeciesId;
use crate::Innovation;

use ahash::RandomState;
use rand::prelude::{IteratorRandom, Rng, SliceRandom};
use tracing::trace;

use std::cmp::Ordering;
use std::collections::HashSet;
use std::fmt;

/// A list of genes, kept sorted by innovation number,
/// over a set of indexed nodes.
#[derive(Clone, PartialEq, Debug)]
pub struct Genome {
    genes: Vec<Gene>,
    node_origins: Vec<Option<Innovation>>,
    input_count: usize,
    output_count: usize,
    species: Option<SpeciesId>,
}

impl Genome {
    /// Create a new fully-connected genome with the specified configuration.
    ///
    /// The gene between input `i` and output `o` is given the
    /// innovation number `o + i ⨯ output_count`. Thus, genes
    /// created through mutation start at innovation number
    /// `input_count ⨯ output_count`.
    ///
    /// # Examples
    /// ```
    /// use rand::{rngs::StdRng, SeedableRng};
    /// use tickneat::{GeneticConfig, Genome};
    /// use std::num::NonZeroUsize;
    ///
    /// let config = GeneticConfig {
    ///     input_count: NonZeroUsize::new(3).unwrap(),
    ///     output_count: NonZeroUsize::new(2).unwrap(),
    ///     initial_weight_bound: 5.0,
    ///     ..GeneticConfig::zero()
    /// };
    ///
    /// let genome = Genome::new(&config, &mut StdRng::seed_from_u64(0));
    ///
    /// // As configured, the genome should have 3 inputs + 2 outputs.
    /// assert_eq!(genome.node_count(), 3 + 2);
    ///
    /// // There is a gene for every pair of input and output nodes.
    /// assert_eq!(genome.genes().len(), 3 * 2);
    ///
    /// // All genes should have weights within the established bound.
    /// assert!(genome.genes().iter().all(|g| g.weight().abs() <= config.initial_weight_bound));
    ///
    /// // All genes should have innovation numbers in the range (0..6)
    /// assert!(genome.genes().iter().all(|g| (0..3 * 2).contains(&g.innovation())));
    /// ```
    pub fn new<R: Rng + ?Sized>(config: &GeneticConfig, rng: &mut R) -> Genome {
        let input_count = config.input_count.get();
        let output_count = config.output_count.get();
        let mut genome = Genome::bare(input_count, output_count);

        for i in 0..input_count {
            for o in 0..output_count {
                genome.genes.push(Gene::new(
                    o + i * output_count,
                    i,
                    o + input_count,
                    Gene::random_weight(config.initial_weight_bound, rng),
                ));
            }
        }

        genome
    }

    /// A genome with input and output nodes, but no genes.
    pub(crate) fn bare(input_count: usize, output_count: usize) -> Genome {
        Genome {
            genes: vec![],
            node_origins: vec![None; input_count + output_count],
            input_count,
            output_count,
            species: None,
        }
    }

    /// Add a new gene to the genome, keeping genes sorted.
    /// Returns a reference to the new gene.
    ///
    /// # Panics
    ///
    /// This function will panic if a gene with the same
    /// `gene_id` or the same endpoints already existed in the genome,
    /// if either endpoint is not a node in the genome, or if `output`
    /// is an input node.
    #[cfg(test)]
    pub(crate) fn add_gene(
        &mut self,
        gene_id: Innovation,
        input: usize,
        output: usize,
        weight: f32,
    ) -> &mut Gene {
        self.check_gene_viability(gene_id, input, output)
            .unwrap_or_else(|e| panic!("{} in {}", e, self));
        let index = self.add_gene_unchecked(gene_id, input, output, weight);
        &mut self.genes[index]
    }

    /// Inserts a gene at its sorted position and returns that position.
    /// Assumes that the gene is not a duplicate or invalid gene for the genome.
    fn add_gene_unchecked(
        &mut self,
        gene_id: Innovation,
        input: usize,
        output: usize,
        weight: f32,
    ) -> usize {
        debug_assert_eq!(self.check_gene_viability(gene_id, input, output), Ok(()));
        let index = self.genes.partition_point(|g| g.innovation() < gene_id);
        self.genes
            .insert(index, Gene::new(gene_id, input, output, weight));
        index
    }

    /// Checks whether a gene is a duplicate or
    /// is invalid for the genome.
    fn check_gene_viability(
        &self,
        gene_id: Innovation,
        input: usize,
        output: usize,
    ) -> Result<(), GeneViabilityError> {
        use GeneViabilityError::*;
        if self.gene(gene_id).is_some() {
            Err(DuplicateGeneID(gene_id, input, output))
        } else if input >= self.node_count() || output >= self.node_count() {
            Err(NonexistantEndpoints(input, output))
        } else if self.has_connection(input, output) {
            Err(DuplicateGeneWithEndpoints(gene_id, input, output))
        } else if output < self.input_count {
            Err(SensorEndpoint(output))
        } else {
            Ok(())
        }
    }

    /// Appends a hidden node with the given origin marker.
    /// Returns the new node's index.
    pub(crate) fn add_node(&mut self, origin: Option<Innovation>) -> usize {
        self.node_origins.push(origin);
        self.node_origins.len() - 1
    }

    fn assert_gene_capacity(&self, additional: usize, config: &GeneticConfig) {
        assert!(
            self.genes.len() + additional <= config.max_gene_count,
            "gene capacity of {} exhausted in {}",
            config.max_gene_count,
            self
        );
    }

    fn assert_node_capacity(&self, additional: usize, config: &GeneticConfig) {
        assert!(
            self.node_count() + additional <= config.max_node_count,
            "node capacity of {} exhausted in {}",
            config.max_node_count,
            self
        );
    }

    /// Returns the genetic distance between two genomes.
    ///
    /// Genes are aligned by innovation number. Genes present in
    /// both genomes are _matching_, and contribute the difference of
    /// their weights to an average. Of the remaining genes, those
    /// beyond the smaller of the two genomes' highest innovation
    /// numbers are _excess_, and the rest are _disjoint_. Excess and
    /// disjoint counts are normalized by the larger gene count, unless
    /// it is below the configured [normalization threshold].
    ///
    /// [normalization threshold]: GeneticConfig::normalization_threshold
    ///
    /// # Examples
    /// ```
    /// use rand::{rngs::StdRng, SeedableRng};
    /// use tickneat::{GeneticConfig, Genome};
    ///
    /// let config = GeneticConfig {
    ///     initial_weight_bound: 1.0,
    ///     disjoint_gene_factor: 1.0,
    ///     excess_gene_factor: 1.0,
    ///     common_weight_factor: 0.4,
    ///     ..GeneticConfig::zero()
    /// };
    /// let mut rng = StdRng::seed_from_u64(0);
    /// let a = Genome::new(&config, &mut rng);
    /// let b = Genome::new(&config, &mut rng);
    ///
    /// assert_eq!(Genome::genetic_distance(&a, &a, &config), 0.0);
    /// assert_eq!(
    ///     Genome::genetic_distance(&a, &b, &config),
    ///     Genome::genetic_distance(&b, &a, &config),
    /// );
    /// ```
    pub fn genetic_distance(first: &Genome, second: &Genome, config: &GeneticConfig) -> f32 {
        let common_bound = first.max_innovation().min(second.max_innovation());
        let mut disjoint_gene_count = 0;
        let mut excess_gene_count = 0;
        let mut common_gene_count = 0;
        let mut common_weight_diff = 0.0;

        let mut classify_unmatched = |gene: &Gene| match common_bound {
            Some(bound) if gene.innovation() <= bound => disjoint_gene_count += 1,
            _ => excess_gene_count += 1,
        };

        let mut first_genes = first.genes.iter().peekable();
        let mut second_genes = second.genes.iter().peekable();
        loop {
            match (first_genes.peek().copied(), second_genes.peek().copied()) {
                (Some(g1), Some(g2)) => match g1.innovation().cmp(&g2.innovation()) {
                    Ordering::Equal => {
                        common_gene_count += 1;
                        common_weight_diff += (g1.weight() - g2.weight()).abs();
                        first_genes.next();
                        second_genes.next();
                    }
                    Ordering::Less => {
                        classify_unmatched(g1);
                        first_genes.next();
                    }
                    Ordering::Greater => {
                        classify_unmatched(g2);
                        second_genes.next();
                    }
                },
                (Some(g1), None) => {
                    classify_unmatched(g1);
                    first_genes.next();
                }
                (None, Some(g2)) => {
                    classify_unmatched(g2);
                    second_genes.next();
                }
                (None, None) => break,
            }
        }

        let common_weight_average = if common_gene_count > 0 {
            common_weight_diff / common_gene_count as f32
        } else {
            0.0
        };
        let larger_gene_count = first.genes.len().max(second.genes.len());
        let normalizer = if larger_gene_count < config.normalization_threshold {
            1.0
        } else {
            larger_gene_count.max(1) as f32
        };

        config.disjoint_gene_factor * disjoint_gene_count as f32 / normalizer
            + config.excess_gene_factor * excess_gene_count as f32 / normalizer
            + config.common_weight_factor * common_weight_average
    }

    /// Combines two genomes and returns a "child" genome.
    ///
    /// Genes present in both parents are taken from either at random,
    /// and are suppressed if suppressed in either. All genes unique to
    /// the `fitter` parent are inherited, as are the disjoint (but not
    /// excess) genes unique to the `other` parent. Every inherited
    /// suppressed gene has a [chance] of being unsuppressed.
    ///
    /// Afterwards, only the first gene between each pair of nodes is
    /// kept, favoring the fitter parent's genes.
    ///
    /// Nodes are identified by index, so a hidden node present in both
    /// parents takes the fitter parent's origin, even if every gene
    /// touching it came from the `other` parent.
    ///
    /// [chance]: GeneticConfig::suppression_reset_chance
    ///
    /// # Panics
    /// This function panics if the child exceeds the configured
    /// gene or node capacities.
    pub fn mate<R: Rng + ?Sized>(
        fitter: &Genome,
        other: &Genome,
        config: &GeneticConfig,
        rng: &mut R,
    ) -> Genome {
        let common_bound = fitter.max_innovation().min(other.max_innovation());
        let mut genes = Vec::with_capacity(fitter.genes.len() + other.genes.len());

        for gene in &fitter.genes {
            let mut inherited = match other.gene(gene.innovation()) {
                Some(others_gene) => {
                    let mut chosen = if rng.gen::<bool>() {
                        gene.clone()
                    } else {
                        others_gene.clone()
                    };
                    chosen.set_suppressed(gene.suppressed() || others_gene.suppressed());
                    chosen
                }
                None => gene.clone(),
            };
            Self::reset_suppression(&mut inherited, config, rng);
            genes.push(inherited);
        }

        for gene in &other.genes {
            let disjoint = common_bound.map_or(false, |bound| gene.innovation() <= bound);
            if disjoint && fitter.gene(gene.innovation()).is_none() {
                let mut inherited = gene.clone();
                Self::reset_suppression(&mut inherited, config, rng);
                genes.push(inherited);
            }
        }

        let mut endpoints: HashSet<(usize, usize), RandomState> = HashSet::default();
        genes.retain(|g| endpoints.insert(g.endpoints()));
        genes.sort_by_key(Gene::innovation);

        let node_count = genes
            .iter()
            .map(|g| g.input().max(g.output()) + 1)
            .max()
            .unwrap_or(0)
            .max(fitter.input_count + fitter.output_count);
        let node_origins = (0..node_count)
            .map(|node| {
                fitter
                    .node_origins
                    .get(node)
                    .or_else(|| other.node_origins.get(node))
                    .copied()
                    .flatten()
            })
            .collect();

        let child = Genome {
            genes,
            node_origins,
            input_count: fitter.input_count,
            output_count: fitter.output_count,
            species: fitter.species,
        };
        child.assert_gene_capacity(0, config);
        child.assert_node_capacity(0, config);
        child
    }

    fn reset_suppression<R: Rng + ?Sized>(gene: &mut Gene, config: &GeneticConfig, rng: &mut R) {
        if gene.suppressed() && rng.gen::<f32>() < config.suppression_reset_chance {
            gene.set_suppressed(false);
        }
    }

    /// Runs every mutation once, each with its configured chance.
    /// Mutations that cannot be carried out are skipped.
    ///
    /// # Panics
    /// This function panics if a mutation would exceed the
    /// configured gene or node capacities.
    ///
    /// # Examples
    /// ```
    /// use rand::{rngs::StdRng, SeedableRng};
    /// use tickneat::{GeneticConfig, Genome, InnovationTracker};
    ///
    /// let config = GeneticConfig {
    ///     node_addition_mutation_chance: 1.0,
    ///     ..GeneticConfig::zero()
    /// };
    /// let mut rng = StdRng::seed_from_u64(0);
    /// let mut genome = Genome::new(&config, &mut rng);
    ///
    /// let mut next_innovation = 1;
    /// let mut tracker = InnovationTracker::new(&mut next_innovation);
    /// genome.mutate_all(&mut tracker, &config, &mut rng);
    ///
    /// assert_eq!(genome.genes().len(), 3);
    /// assert_eq!(genome.node_count(), 3);
    /// ```
    pub fn mutate_all<R: Rng + ?Sized>(
        &mut self,
        tracker: &mut InnovationTracker,
        config: &GeneticConfig,
        rng: &mut R,
    ) {
        if rng.gen::<f32>() < config.gene_suppression_mutation_chance {
            if let Err(e) = self.mutate_suppress_gene(rng) {
                trace!("skipped gene suppression: {}", e);
            }
        }
        if rng.gen::<f32>() < config.gene_deletion_mutation_chance {
            if let Err(e) = self.mutate_delete_gene(rng) {
                trace!("skipped gene deletion: {}", e);
            }
        }
        if rng.gen::<f32>() < config.weight_mutation_chance {
            if let Err(e) = self.mutate_weight(config, rng) {
                trace!("skipped weight mutation: {}", e);
            }
        }
        if rng.gen::<f32>() < config.gene_addition_mutation_chance {
            if let Err(e) = self.mutate_add_gene(tracker, config, rng) {
                trace!("skipped gene addition: {}", e);
            }
        }
        if rng.gen::<f32>() < config.node_addition_mutation_chance {
            if let Err(e) = self.mutate_add_node(tracker, config, rng) {
                trace!("skipped node addition: {}", e);
            }
        }
    }

    /// Suppresses a randomly-chosen gene.
    /// Returns the gene's innovation number.
    ///
    /// # Errors
    /// Returns an error if the genome has no genes.
    pub fn mutate_suppress_gene<R: Rng + ?Sized>(
        &mut self,
        rng: &mut R,
    ) -> Result<Innovation, MutationError> {
        let gene = self.genes.choose_mut(rng).ok_or(MutationError::EmptyGenome)?;
        gene.set_suppressed(true);
        Ok(gene.innovation())
    }

    /// Deletes a randomly-chosen gene from the genome,
    /// and returns it.
    ///
    /// # Errors
    /// Returns an error if the genome has fewer than two genes,
    /// as genomes may never become empty.
    ///
    /// # Examples
    /// ```
    /// use rand::{rngs::StdRng, SeedableRng};
    /// use tickneat::{GeneticConfig, Genome};
    /// use std::num::NonZeroUsize;
    ///
    /// let config = GeneticConfig {
    ///     input_count: NonZeroUsize::new(2).unwrap(),
    ///     ..GeneticConfig::zero()
    /// };
    /// let mut rng = StdRng::seed_from_u64(0);
    /// let mut genome = Genome::new(&config, &mut rng);
    ///
    /// assert!(genome.mutate_delete_gene(&mut rng).is_ok());
    /// assert!(genome.mutate_delete_gene(&mut rng).is_err());
    /// assert_eq!(genome.genes().len(), 1);
    /// ```
    pub fn mutate_delete_gene<R: Rng + ?Sized>(
        &mut self,
        rng: &mut R,
    ) -> Result<Gene, MutationError> {
        match self.genes.len() {
            0 => Err(MutationError::EmptyGenome),
            1 => Err(MutationError::LastGene),
            len => Ok(self.genes.remove(rng.gen_range(0..len))),
        }
    }

    /// Induces a _weight mutation_ in a randomly-chosen gene.
    /// The weight is either reset, with [`weight_reset_chance`],
    /// or nudged. Returns the gene's innovation number.
    ///
    /// [`weight_reset_chance`]: GeneticConfig::weight_reset_chance
    ///
    /// # Errors
    /// Returns an error if the genome has no genes.
    pub fn mutate_weight<R: Rng + ?Sized>(
        &mut self,
        config: &GeneticConfig,
        rng: &mut R,
    ) -> Result<Innovation, MutationError> {
        let reset = rng.gen::<f32>() < config.weight_reset_chance;
        let gene = self.genes.choose_mut(rng).ok_or(MutationError::EmptyGenome)?;
        if reset {
            gene.randomize_weight(config, rng);
        } else {
            gene.nudge_weight(config, rng);
        }
        Ok(gene.innovation())
    }

    /// Induces a _gene mutation_ in the genome, connecting a random
    /// non-output node to a random hidden or output node.
    /// If successful, returns the newly added gene.
    ///
    /// # Errors
    ///
    /// Returns an error if no unconnected pair of distinct nodes
    /// was found in [too many] attempts.
    ///
    /// [too many]: GeneticConfig::max_gene_addition_mutation_attempts
    ///
    /// # Panics
    /// This function panics if the gene would exceed the genome's
    /// gene capacity.
    pub fn mutate_add_gene<R: Rng + ?Sized>(
        &mut self,
        tracker: &mut InnovationTracker,
        config: &GeneticConfig,
        rng: &mut R,
    ) -> Result<&Gene, MutationError> {
        let sources: Vec<usize> = (0..self.input_count).chain(self.hidden_nodes()).collect();
        let destinations = self.input_count..self.node_count();

        for _ in 0..config.max_gene_addition_mutation_attempts {
            let input = sources[rng.gen_range(0..sources.len())];
            let output = rng.gen_range(destinations.clone());
            if input == output || self.has_connection(input, output) {
                continue;
            }

            self.assert_gene_capacity(1, config);
            let gene_id = tracker.innovation_for(self.structural_mutation(input, output));
            let weight = Gene::random_weight(config.weight_bound, rng);
            let index = self.add_gene_unchecked(gene_id, input, output, weight);
            return Ok(&self.genes[index]);
        }

        Err(MutationError::NoInputOutputPairFound(
            config.max_gene_addition_mutation_attempts,
        ))
    }

    /// Induces a _node mutation_ in the genome, splitting a random
    /// unsuppressed gene in two with a new hidden node in between.
    /// The split gene is suppressed; the gene into the new node has
    /// a weight of 1, and the gene out of it inherits the split gene's
    /// weight.
    ///
    /// If successful, returns the triplet (_in gene_, _new node_, _out gene_).
    ///
    /// # Errors
    ///
    /// This function returns an error if there are no unsuppressed
    /// genes in the genome that could be split.
    ///
    /// # Panics
    /// This function panics if the mutation would exceed the genome's
    /// gene or node capacities.
    ///
    /// # Examples
    /// ```
    /// use rand::{rngs::StdRng, SeedableRng};
    /// use tickneat::{GeneticConfig, Genome, InnovationTracker};
    ///
    /// let config = GeneticConfig::zero();
    /// let mut rng = StdRng::seed_from_u64(0);
    ///
    /// // A single gene between a single input and a single output.
    /// let mut genome = Genome::new(&config, &mut rng);
    /// let mut next_innovation = 1;
    /// let mut tracker = InnovationTracker::new(&mut next_innovation);
    ///
    /// let (input_gene, new_node, output_gene) =
    ///     genome.mutate_add_node(&mut tracker, &config, &mut rng).unwrap();
    ///
    /// assert_eq!((input_gene, new_node, output_gene), (1, 2, 2));
    /// assert_eq!(genome.node_origin(new_node), Some(0));
    /// assert!(genome.genes()[0].suppressed());
    /// ```
    pub fn mutate_add_node<R: Rng + ?Sized>(
        &mut self,
        tracker: &mut InnovationTracker,
        config: &GeneticConfig,
        rng: &mut R,
    ) -> Result<(Innovation, usize, Innovation), MutationError> {
        let split_index = self
            .genes
            .iter()
            .enumerate()
            .filter(|(_, g)| !g.suppressed())
            .map(|(i, _)| i)
            .choose(rng)
            .ok_or(MutationError::NoSplittableGene)?;

        self.assert_node_capacity(1, config);
        self.assert_gene_capacity(2, config);

        let split_gene = &mut self.genes[split_index];
        split_gene.set_suppressed(true);
        let (input, output) = split_gene.endpoints();
        let (split_id, weight) = (split_gene.innovation(), split_gene.weight());

        let new_node = self.add_node(Some(split_id));
        let input_gene = tracker.innovation_for(self.structural_mutation(input, new_node));
        let output_gene = tracker.innovation_for(self.structural_mutation(new_node, output));
        self.add_gene_unchecked(input_gene, input, new_node, 1.0);
        self.add_gene_unchecked(output_gene, new_node, output, weight);

        Ok((input_gene, new_node, output_gene))
    }

    fn structural_mutation(&self, input: usize, output: usize) -> StructuralMutation {
        StructuralMutation {
            input,
            output,
            input_origin: self.node_origins[input],
            output_origin: self.node_origins[output],
        }
    }

    /// Returns the gene with the given innovation number, if present.
    pub fn gene(&self, innovation: Innovation) -> Option<&Gene> {
        self.genes
            .binary_search_by_key(&innovation, Gene::innovation)
            .ok()
            .map(|i| &self.genes[i])
    }

    /// Returns whether a gene, suppressed or not, already
    /// connects `input` to `output`.
    pub fn has_connection(&self, input: usize, output: usize) -> bool {
        self.genes.iter().any(|g| g.endpoints() == (input, output))
    }

    /// Returns the highest innovation number in the genome.
    pub fn max_innovation(&self) -> Option<Innovation> {
        self.genes.last().map(Gene::innovation)
    }

    /// Returns the genome's genes, sorted by innovation number.
    pub fn genes(&self) -> &[Gene] {
        &self.genes
    }

    /// Returns the total number of nodes in the genome.
    pub fn node_count(&self) -> usize {
        self.node_origins.len()
    }

    pub fn input_count(&self) -> usize {
        self.input_count
    }

    pub fn output_count(&self) -> usize {
        self.output_count
    }

    /// Returns the indices of the genome's hidden nodes.
    pub fn hidden_nodes(&self) -> std::ops::Range<usize> {
        self.input_count + self.output_count..self.node_count()
    }

    /// Returns the origin marker of a node: the innovation number
    /// of the gene split to create it, or `None` for input and
    /// output nodes.
    ///
    /// # Panics
    /// Panics if `node` is not a node of the genome.
    pub fn node_origin(&self, node: usize) -> Option<Innovation> {
        self.node_origins[node]
    }

    /// Returns the species the genome was last assigned to.
    pub fn species(&self) -> Option<SpeciesId> {
        self.species
    }

    pub(crate) fn set_species(&mut self, species: SpeciesId) {
        self.species = Some(species);
    }

    /// Asserts every structural invariant of the genome.
    #[cfg(test)]
    pub(crate) fn assert_well_formed(&self) {
        assert!(!self.genes.is_empty(), "empty genome {}", self);
        assert!(
            self.genes
                .windows(2)
                .all(|w| w[0].innovation() < w[1].innovation()),
            "unsorted genome {}",
            self
        );
        assert!(self.node_count() >= self.input_count + self.output_count);
        let mut endpoints = HashSet::new();
        for gene in &self.genes {
            assert!(gene.input() < self.node_count() && gene.output() < self.node_count());
            assert!(gene.output() >= self.input_count, "gene into input node in {}", self);
            assert!(endpoints.insert(gene.endpoints()), "duplicate endpoints in {}", self);
        }
    }
}

impl fmt::Display for Genome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Genome")
            .field("Genes", &self.genes.iter().map(|g| g.to_string()).collect::<Vec<_>>())
            .field("Nodes", &self.node_count())
            .field("Hidden origins", &&self.node_origins[self.input_count + self.output_count..])
            .field("Species", &self.species)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use rand::{rngs::StdRng, SeedableRng};
    use std::num::NonZeroUsize;

    fn config(inputs: usize, outputs: usize) -> GeneticConfig {
        GeneticConfig {
            input_count: NonZeroUsize::new(inputs).unwrap(),
            output_count: NonZeroUsize::new(outputs).unwrap(),
            ..GeneticConfig::zero()
        }
    }

    /// 2 inputs, 1 output, and a hidden node 3 split from gene 0.
    fn fitter_parent() -> Genome {
        let mut genome = Genome::bare(2, 1);
        genome.add_node(Some(0));
        genome.add_gene(0, 0, 2, 1.0);
        genome.add_gene(1, 1, 2, 1.0);
        genome.add_gene(2, 0, 3, 1.0);
        genome.add_gene(3, 3, 2, 1.0);
        genome.add_gene(6, 1, 3, 1.0);
        genome
    }

    /// 2 inputs, 1 output, and hidden nodes 3 and 4.
    fn other_parent() -> Genome {
        let mut genome = Genome::bare(2, 1);
        genome.add_node(Some(1));
        genome.add_node(Some(9));
        genome.add_gene(0, 0, 2, -1.0);
        genome.add_gene(1, 1, 2, -1.0);
        genome.add_gene(4, 1, 4, -1.0);
        genome.add_gene(5, 4, 2, -1.0);
        genome.add_gene(7, 0, 3, -1.0);
        genome
    }

    fn innovations(genome: &Genome) -> Vec<Innovation> {
        genome.genes().iter().map(Gene::innovation).collect()
    }

    #[test]
    fn new_fully_connected() {
        let mut rng = StdRng::seed_from_u64(0);
        for input_count in 1..10 {
            for output_count in 1..10 {
                let config = config(input_count, output_count);
                let genome = Genome::new(&config, &mut rng);

                assert_eq!(genome.genes.len(), input_count * output_count);
                assert_eq!(genome.node_count(), input_count + output_count);
                assert!(genome.node_origins.iter().all(Option::is_none));
                for g in &genome.genes {
                    assert_eq!(
                        g.innovation(),
                        g.input() * output_count + (g.output() - input_count),
                        "gene: {:?}, total I/O, {}/{}",
                        g,
                        input_count,
                        output_count
                    );
                }
                genome.assert_well_formed();
            }
        }
    }

    #[test]
    fn new_zero_weight_bound() {
        let genome = Genome::new(&config(3, 3), &mut StdRng::seed_from_u64(0));
        assert!(genome.genes().iter().all(|g| g.weight() == 0.0));
    }

    #[test]
    fn add_gene() {
        let mut genome = Genome::bare(2, 1);
        genome.add_gene(7, 1, 2, 3.0);
        genome.add_gene(3, 0, 2, -3.0);
        let gene = genome.add_gene(5, 2, 2, 1.0).clone();

        assert_eq!(gene, Gene::new(5, 2, 2, 1.0));
        assert_eq!(innovations(&genome), [3, 5, 7]);
        assert_eq!(genome.gene(5), Some(&gene));
        assert_eq!(genome.gene(4), None);
    }

    #[test]
    #[should_panic]
    fn add_gene_duplicate_gene_innovation() {
        let mut genome = Genome::new(&config(2, 1), &mut StdRng::seed_from_u64(0));
        genome.add_node(Some(0));
        genome.add_gene(0, 0, 3, 1.0);
    }

    #[test]
    #[should_panic]
    fn add_gene_duplicate_io() {
        let mut genome = Genome::new(&config(2, 1), &mut StdRng::seed_from_u64(0));
        genome.add_gene(42, 0, 2, 1.0);
    }

    #[test]
    #[should_panic]
    fn add_gene_invalid_output() {
        let mut genome = Genome::bare(2, 1);
        genome.add_gene(0, 0, 3, 1.0);
    }

    #[test]
    #[should_panic]
    fn add_gene_into_input_node() {
        let mut genome = Genome::bare(2, 1);
        genome.add_gene(0, 0, 1, 1.0);
    }

    #[test]
    fn genetic_distance_to() {
        const WEIGHT_FACTOR: f32 = 0.8;
        const DISJOINT_FACTOR: f32 = 0.6;
        const EXCESS_FACTOR: f32 = 0.4;
        let mut config = config(2, 1);
        config.common_weight_factor = WEIGHT_FACTOR;
        config.disjoint_gene_factor = DISJOINT_FACTOR;
        config.excess_gene_factor = EXCESS_FACTOR;

        let mut genome1 = Genome::bare(2, 1);
        let mut genome2 = Genome::bare(2, 1);
        genome1.add_node(Some(0));
        genome2.add_node(Some(0));

        genome1.add_gene(0, 0, 2, -2.0);
        genome2.add_gene(0, 0, 2, 2.0);
        genome1.add_gene(1, 1, 2, 3.0);
        genome2.add_gene(1, 1, 2, 6.0);

        genome2.add_gene(2, 1, 3, 5.0);
        genome1.add_gene(3, 0, 3, 5.0);
        genome1.add_gene(4, 3, 2, 1.0);
        genome2.add_gene(5, 3, 2, 1.0);
        genome2.add_gene(6, 0, 3, 1.0);

        // Common bound is 4: genes 2, 3 and 4 are disjoint, 5 and 6 excess.
        assert_relative_eq!(
            Genome::genetic_distance(&genome1, &genome2, &config),
            DISJOINT_FACTOR * 3.0 / 5.0 + EXCESS_FACTOR * 2.0 / 5.0 + WEIGHT_FACTOR * (4.0 + 3.0) / 2.0,
            epsilon = 1e-6
        );

        config.normalization_threshold = 20;
        assert_relative_eq!(
            Genome::genetic_distance(&genome1, &genome2, &config),
            DISJOINT_FACTOR * 3.0 + EXCESS_FACTOR * 2.0 + WEIGHT_FACTOR * (4.0 + 3.0) / 2.0,
            epsilon = 1e-6
        );
    }

    #[test]
    fn genetic_distance_single_extra_gene() {
        let config = GeneticConfig {
            disjoint_gene_factor: 1.0,
            excess_gene_factor: 1.0,
            common_weight_factor: 0.4,
            ..config(2, 1)
        };
        let mut shorter = Genome::bare(2, 1);
        shorter.add_gene(0, 0, 2, 0.5);
        shorter.add_gene(1, 1, 2, 0.5);
        let mut longer = shorter.clone();
        let hidden = longer.add_node(Some(0));
        longer.add_gene(2, 0, hidden, 0.5);

        assert_relative_eq!(Genome::genetic_distance(&shorter, &longer, &config), 1.0 / 3.0);
        assert_relative_eq!(Genome::genetic_distance(&longer, &shorter, &config), 1.0 / 3.0);
    }

    #[test]
    fn genetic_distance_is_zero_to_self_and_symmetric() {
        let config = GeneticConfig {
            initial_weight_bound: 2.0,
            weight_bound: 3.0,
            weight_mutation_chance: 0.9,
            weight_mutation_power: 1.0,
            gene_addition_mutation_chance: 0.3,
            node_addition_mutation_chance: 0.2,
            gene_deletion_mutation_chance: 0.1,
            max_gene_addition_mutation_attempts: 10,
            disjoint_gene_factor: 1.0,
            excess_gene_factor: 0.7,
            common_weight_factor: 0.4,
            normalization_threshold: 5,
            ..config(3, 2)
        };
        let mut rng = StdRng::seed_from_u64(11);
        let mut next_innovation = 6;
        let mut genomes: Vec<Genome> = (0..12).map(|_| Genome::new(&config, &mut rng)).collect();
        for _ in 0..15 {
            let mut tracker = InnovationTracker::new(&mut next_innovation);
            for genome in &mut genomes {
                genome.mutate_all(&mut tracker, &config, &mut rng);
            }
        }

        for a in &genomes {
            assert_eq!(Genome::genetic_distance(a, a, &config), 0.0);
            assert_eq!(Genome::genetic_distance(a, &a.clone(), &config), 0.0);
            for b in &genomes {
                assert_eq!(
                    Genome::genetic_distance(a, b, &config),
                    Genome::genetic_distance(b, a, &config)
                );
            }
        }
    }

    #[test]
    fn mate_inherits_fitter_and_disjoint_genes() {
        let mut rng = StdRng::seed_from_u64(0);
        let child = Genome::mate(&fitter_parent(), &other_parent(), &config(2, 1), &mut rng);

        // Gene 7 is excess on the less fit parent, and is dropped.
        assert_eq!(innovations(&child), [0, 1, 2, 3, 4, 5, 6]);
        assert_eq!(child.node_count(), 5);
        assert_eq!(child.node_origins, [None, None, None, Some(0), Some(9)]);
        assert!([1.0, -1.0].contains(&child.gene(0).unwrap().weight()));
        assert!([1.0, -1.0].contains(&child.gene(1).unwrap().weight()));
        assert_eq!(child.gene(4).unwrap().weight(), -1.0);
        assert_eq!(child.gene(6).unwrap().weight(), 1.0);
        child.assert_well_formed();
    }

    #[test]
    fn mate_keeps_first_gene_per_endpoints() {
        let mut other = Genome::bare(2, 1);
        other.add_node(Some(1));
        other.add_gene(0, 0, 2, -1.0);
        other.add_gene(1, 1, 2, -1.0);
        other.add_gene(4, 1, 3, -1.0);
        other.add_gene(5, 3, 2, -1.0);
        other.add_gene(7, 0, 3, -1.0);

        let mut rng = StdRng::seed_from_u64(0);
        let child = Genome::mate(&fitter_parent(), &other, &config(2, 1), &mut rng);

        // 4 and 5 share endpoints with the fitter parent's 6 and 3.
        assert_eq!(innovations(&child), [0, 1, 2, 3, 6]);
        assert_eq!(child.node_count(), 4);
        assert_eq!(child.node_origin(3), Some(0));
        child.assert_well_formed();
    }

    #[test]
    fn mate_recombines_suppression() {
        let mut fitter = fitter_parent();
        let mut other = other_parent();
        fitter.genes[0].set_suppressed(true);
        other.genes[1].set_suppressed(true);
        other.genes[2].set_suppressed(true);
        let mut rng = StdRng::seed_from_u64(5);

        for _ in 0..10 {
            let child = Genome::mate(&fitter, &other, &config(2, 1), &mut rng);
            assert!(child.gene(0).unwrap().suppressed());
            assert!(child.gene(1).unwrap().suppressed());
            assert!(child.gene(4).unwrap().suppressed());
            assert!(!child.gene(2).unwrap().suppressed());
        }

        let always_reset = GeneticConfig {
            suppression_reset_chance: 1.0,
            ..config(2, 1)
        };
        let child = Genome::mate(&fitter, &other, &always_reset, &mut rng);
        assert!(child.genes().iter().all(|g| !g.suppressed()));
    }

    #[test]
    fn mate_child_genes_come_from_parents() {
        let config = GeneticConfig {
            initial_weight_bound: 1.0,
            weight_bound: 2.0,
            gene_addition_mutation_chance: 0.5,
            node_addition_mutation_chance: 0.4,
            max_gene_addition_mutation_attempts: 10,
            suppression_reset_chance: 0.3,
            ..config(2, 2)
        };
        let mut rng = StdRng::seed_from_u64(21);
        let mut next_innovation = 4;
        let mut genomes: Vec<Genome> = (0..10).map(|_| Genome::new(&config, &mut rng)).collect();
        for _ in 0..10 {
            let mut tracker = InnovationTracker::new(&mut next_innovation);
            for genome in &mut genomes {
                genome.mutate_all(&mut tracker, &config, &mut rng);
            }
        }

        for a in &genomes {
            for b in &genomes {
                let child = Genome::mate(a, b, &config, &mut rng);
                child.assert_well_formed();
                for gene in child.genes() {
                    assert!(a.gene(gene.innovation()).is_some() || b.gene(gene.innovation()).is_some());
                }
            }
        }
    }

    #[test]
    fn mutate_suppress_gene() {
        let mut rng = StdRng::seed_from_u64(0);
        let mut genome = Genome::new(&config(1, 1), &mut rng);
        assert_eq!(genome.mutate_suppress_gene(&mut rng), Ok(0));
        assert!(genome.genes()[0].suppressed());
        assert_eq!(
            Genome::bare(1, 1).mutate_suppress_gene(&mut rng),
            Err(MutationError::EmptyGenome)
        );
    }

    #[test]
    fn mutate_gene_deletion_never_empties() {
        let mut rng = StdRng::seed_from_u64(0);
        let mut genome = Genome::new(&config(3, 3), &mut rng);
        for remaining in (1..9).rev() {
            genome.mutate_delete_gene(&mut rng).unwrap();
            assert_eq!(genome.genes().len(), remaining);
            genome.assert_well_formed();
        }
        assert_eq!(genome.mutate_delete_gene(&mut rng), Err(MutationError::LastGene));
        assert_eq!(genome.genes().len(), 1);
    }

    #[test]
    fn mutate_weights_reset() {
        let config = GeneticConfig {
            weight_reset_chance: 1.0,
            weight_bound: 3.0,
            ..config(1, 1)
        };
        let mut rng = StdRng::seed_from_u64(0);
        let mut genome = Genome::new(&config, &mut rng);
        genome.genes[0].set_weight(100.0);
        genome.mutate_weight(&config, &mut rng).unwrap();
        assert!(genome.genes[0].weight().abs() <= 3.0);
    }

    #[test]
    fn mutate_weights_nudge() {
        let config = GeneticConfig {
            weight_reset_chance: 0.0,
            weight_mutation_power: 0.5,
            weight_bound: 5.0,
            ..config(1, 1)
        };
        let mut rng = StdRng::seed_from_u64(0);
        let mut genome = Genome::new(&config, &mut rng);
        genome.genes[0].set_weight(2.0);
        genome.mutate_weight(&config, &mut rng).unwrap();
        assert!((genome.genes[0].weight() - 2.0).abs() <= 0.5);
    }

    #[test]
    fn mutate_gene_addition() {
        let config = GeneticConfig {
            max_gene_addition_mutation_attempts: 100,
            weight_bound: 1.0,
            ..config(2, 1)
        };
        let mut rng = StdRng::seed_from_u64(0);
        let mut genome = Genome::new(&config, &mut rng);
        let mut next_innovation = 2;
        let mut tracker = InnovationTracker::new(&mut next_innovation);
        genome.mutate_add_node(&mut tracker, &config, &mut rng).unwrap();
        let split_input = genome.genes().iter().find(|g| g.suppressed()).unwrap().input();

        // Only the other input -> hidden node 3 remains unconnected.
        let gene = genome
            .mutate_add_gene(&mut tracker, &config, &mut rng)
            .unwrap()
            .clone();
        assert_eq!(gene.endpoints(), (1 - split_input, 3));
        assert_eq!(gene.innovation(), 4);
        assert!(gene.weight().abs() <= 1.0);
        genome.assert_well_formed();

        assert_eq!(
            genome.mutate_add_gene(&mut tracker, &config, &mut rng).map(|g| g.innovation()),
            Err(MutationError::NoInputOutputPairFound(100))
        );
    }

    #[test]
    fn mutate_gene_addition_never_targets_inputs_or_leaves_outputs() {
        let config = GeneticConfig {
            max_gene_addition_mutation_attempts: 20,
            ..config(3, 2)
        };
        let mut rng = StdRng::seed_from_u64(8);
        let mut next_innovation = 6;
        let mut genome = Genome::new(&config, &mut rng);
        for _ in 0..30 {
            let mut tracker = InnovationTracker::new(&mut next_innovation);
            let _ = genome.mutate_add_node(&mut tracker, &config, &mut rng);
            let _ = genome.mutate_add_gene(&mut tracker, &config, &mut rng);
        }
        for gene in genome.genes() {
            assert!(gene.input() != gene.output());
            assert!(!(3..5).contains(&gene.input()), "output node used as source");
        }
        genome.assert_well_formed();
    }

    #[test]
    fn identical_gene_additions_share_innovation() {
        let config = GeneticConfig {
            max_gene_addition_mutation_attempts: 1000,
            ..config(2, 1)
        };
        let mut rng = StdRng::seed_from_u64(4);
        let mut next_innovation = 2;
        let mut ancestor = Genome::new(&config, &mut rng);
        ancestor
            .mutate_add_node(&mut InnovationTracker::new(&mut next_innovation), &config, &mut rng)
            .unwrap();

        // A single unconnected pair remains, from the input that was not split.
        let mut first = ancestor.clone();
        let mut second = ancestor.clone();
        let mut tracker = InnovationTracker::new(&mut next_innovation);
        let first_gene = first
            .mutate_add_gene(&mut tracker, &config, &mut rng)
            .unwrap()
            .clone();
        let second_gene = second
            .mutate_add_gene(&mut tracker, &config, &mut rng)
            .unwrap()
            .clone();

        assert_eq!(first_gene.endpoints(), second_gene.endpoints());
        assert_eq!(first_gene.innovation(), second_gene.innovation());
        assert_eq!(tracker.len(), 1);
    }

    #[test]
    fn identical_node_additions_share_innovations() {
        let config = config(1, 1);
        let mut rng = StdRng::seed_from_u64(0);
        let mut first = Genome::new(&config, &mut rng);
        let mut second = first.clone();
        let mut next_innovation = 1;
        let mut tracker = InnovationTracker::new(&mut next_innovation);

        let first_split = first.mutate_add_node(&mut tracker, &config, &mut rng).unwrap();
        let second_split = second.mutate_add_node(&mut tracker, &config, &mut rng).unwrap();

        assert_eq!(first_split, second_split);
        assert_eq!(first, second);
    }

    #[test]
    fn mutate_node_addition_splits_gene() {
        let mut config = config(2, 1);
        config.initial_weight_bound = 1.0;
        let mut rng = StdRng::seed_from_u64(0);
        let mut genome = Genome::new(&config, &mut rng);
        let mut next_innovation = 2;
        let mut tracker = InnovationTracker::new(&mut next_innovation);

        let (input_gene, node, output_gene) =
            genome.mutate_add_node(&mut tracker, &config, &mut rng).unwrap();
        let split = genome
            .genes()
            .iter()
            .find(|g| g.suppressed())
            .unwrap()
            .clone();

        assert_eq!(genome.genes().len(), 3);
        assert_eq!(genome.node_count(), 4);
        assert_eq!(node, 3);
        assert_eq!(genome.node_origin(node), Some(split.innovation()));
        let input_gene = genome.gene(input_gene).unwrap();
        let output_gene = genome.gene(output_gene).unwrap();
        assert_eq!(input_gene.endpoints(), (split.input(), node));
        assert_eq!(input_gene.weight(), 1.0);
        assert_eq!(output_gene.endpoints(), (node, split.output()));
        assert_eq!(output_gene.weight(), split.weight());
        genome.assert_well_formed();
    }

    #[test]
    fn mutate_node_addition_no_gene_found() {
        let config = config(1, 1);
        let mut rng = StdRng::seed_from_u64(0);
        let mut genome = Genome::new(&config, &mut rng);
        genome.genes[0].set_suppressed(true);
        let mut next_innovation = 1;
        let mut tracker = InnovationTracker::new(&mut next_innovation);
        assert_eq!(
            genome.mutate_add_node(&mut tracker, &config, &mut rng),
            Err(MutationError::NoSplittableGene)
        );
    }

    #[test]
    #[should_panic(expected = "node capacity")]
    fn mutate_node_addition_beyond_capacity() {
        let config = GeneticConfig {
            max_node_count: 2,
            ..config(1, 1)
        };
        let mut rng = StdRng::seed_from_u64(0);
        let mut genome = Genome::new(&config, &mut rng);
        let mut next_innovation = 1;
        let mut tracker = InnovationTracker::new(&mut next_innovation);
        let _ = genome.mutate_add_node(&mut tracker, &config, &mut rng);
    }

    #[test]
    fn mutation_keeps_genomes_well_formed() {
        let config = GeneticConfig {
            initial_weight_bound: 1.0,
            weight_bound: 3.0,
            weight_mutation_chance: 0.5,
            weight_reset_chance: 0.2,
            weight_mutation_power: 0.5,
            gene_suppression_mutation_chance: 0.5,
            gene_deletion_mutation_chance: 0.5,
            gene_addition_mutation_chance: 0.5,
            node_addition_mutation_chance: 0.5,
            max_gene_addition_mutation_attempts: 5,
            ..config(2, 2)
        };
        let mut rng = StdRng::seed_from_u64(99);
        let mut next_innovation = 4;
        let mut genomes: Vec<Genome> = (0..8).map(|_| Genome::new(&config, &mut rng)).collect();
        for _ in 0..100 {
            let mut tracker = InnovationTracker::new(&mut next_innovation);
            for genome in &mut genomes {
                genome.mutate_all(&mut tracker, &config, &mut rng);
                genome.assert_well_formed();
            }
        }
    }
}
