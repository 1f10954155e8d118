use crate::genomics::GeneticConfig;
use crate::Innovation;

use std::fmt;

use rand::Rng;

/// Genes are the principal components of genomes.
/// They are created between two nodes, and become
/// network connections in the genome's phenotype.
#[derive(Clone, PartialEq, Debug)]
pub struct Gene {
    id: Innovation,
    input: usize,
    output: usize,
    weight: f32,
    suppressed: bool,
}

impl Gene {
    /// Returns a new _unsuppressed_ gene with the specified parameters.
    ///
    /// # Examples
    /// ```
    /// use tickneat::Gene;
    ///
    /// let gene = Gene::new(42, 3, 9, 2.0);
    /// ```
    pub fn new(id: Innovation, input: usize, output: usize, weight: f32) -> Gene {
        Gene {
            id,
            input,
            output,
            weight,
            suppressed: false,
        }
    }

    /// Returns a random weight, drawn uniformly from `±bound`.
    pub(crate) fn random_weight<R: Rng + ?Sized>(bound: f32, rng: &mut R) -> f32 {
        if bound > 0.0 {
            rng.gen_range(-bound..=bound)
        } else {
            0.0
        }
    }

    /// Randomizes the gene's weight. Uses a uniform
    /// distribution over the range ±[`weight_bound`].
    ///
    /// [`weight_bound`]: crate::GeneticConfig::weight_bound
    ///
    /// # Examples
    /// ```
    /// use rand::{rngs::StdRng, SeedableRng};
    /// use tickneat::{Gene, GeneticConfig};
    ///
    /// let mut gene = Gene::new(42, 3, 9, 20.0);
    ///
    /// gene.randomize_weight(
    ///     &GeneticConfig {
    ///         weight_bound: 5.0,
    ///         ..GeneticConfig::zero()
    ///     },
    ///     &mut StdRng::seed_from_u64(0),
    /// );
    ///
    /// assert!(gene.weight().abs() <= 5.0);
    /// ```
    pub fn randomize_weight<R: Rng + ?Sized>(&mut self, config: &GeneticConfig, rng: &mut R) {
        self.weight = Self::random_weight(config.weight_bound, rng);
    }

    /// Nudges the gene's weight by a random amount. Uses
    /// a uniform distribution over the range ±[`weight_mutation_power`].
    /// If the weight's magnitude would exceed the [`weight_bound`],
    /// the weight is set to the maximum magnitude with the same
    /// sign.
    ///
    /// [`weight_mutation_power`]: crate::GeneticConfig::weight_mutation_power
    /// [`weight_bound`]: crate::GeneticConfig::weight_bound
    ///
    /// # Examples
    /// ```
    /// use rand::{rngs::StdRng, SeedableRng};
    /// use tickneat::{Gene, GeneticConfig};
    ///
    /// let mut gene = Gene::new(42, 3, 9, 4.5);
    ///
    /// gene.nudge_weight(
    ///     &GeneticConfig {
    ///         weight_mutation_power: 2.5,
    ///         weight_bound: 5.0,
    ///         ..GeneticConfig::zero()
    ///     },
    ///     &mut StdRng::seed_from_u64(0),
    /// );
    ///
    /// assert!((gene.weight() - 4.5).abs() <= 2.5);
    /// assert!(gene.weight().abs() <= 5.0);
    /// ```
    pub fn nudge_weight<R: Rng + ?Sized>(&mut self, config: &GeneticConfig, rng: &mut R) {
        self.weight += Self::random_weight(config.weight_mutation_power, rng);
        self.weight = self.weight.clamp(-config.weight_bound, config.weight_bound);
    }

    /// Returns the gene's innovation number.
    ///
    /// # Examples
    /// ```
    /// use tickneat::Gene;
    ///
    /// let gene = Gene::new(42, 3, 9, 2.0);
    ///
    /// assert_eq!(gene.innovation(), 42);
    /// ```
    pub fn innovation(&self) -> Innovation {
        self.id
    }

    /// Returns the index of the gene's input node.
    pub fn input(&self) -> usize {
        self.input
    }

    /// Returns the index of the gene's output node.
    pub fn output(&self) -> usize {
        self.output
    }

    /// Returns the gene's input and output node indices.
    pub fn endpoints(&self) -> (usize, usize) {
        (self.input, self.output)
    }

    /// Returns the gene's weight.
    pub fn weight(&self) -> f32 {
        self.weight
    }

    /// Sets the gene's weight
    ///
    /// # Examples
    /// ```
    /// use tickneat::Gene;
    ///
    /// let mut gene = Gene::new(42, 3, 9, 2.0);
    /// gene.set_weight(-5.0);
    ///
    /// assert_eq!(gene.weight(), -5.0);
    /// ```
    pub fn set_weight(&mut self, w: f32) {
        self.weight = w;
    }

    /// Returns the gene's suppression status.
    /// Suppressed genes are not expressed in the
    /// genome's network.
    pub fn suppressed(&self) -> bool {
        self.suppressed
    }

    /// Sets the gene's suppression status.
    ///
    /// # Examples
    /// ```
    /// use tickneat::Gene;
    ///
    /// let mut gene = Gene::new(42, 3, 9, 2.0);
    ///
    /// assert_eq!(gene.suppressed(), false);
    ///
    /// gene.set_suppressed(true);
    ///
    /// assert_eq!(gene.suppressed(), true);
    /// ```
    pub fn set_suppressed(&mut self, suppression: bool) {
        self.suppressed = suppression;
    }
}

impl fmt::Display for Gene {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}{:?}[{:?}->{:?}, {:.3}]{}",
            if self.suppressed { "(" } else { "" },
            self.id,
            self.input,
            self.output,
            self.weight,
            if self.suppressed { ")" } else { "" },
        )
    }
}
