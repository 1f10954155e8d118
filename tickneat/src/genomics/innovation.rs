use crate::Innovation;

use ahash::RandomState;

use std::collections::hash_map::{Entry, HashMap};

/// A structural change, identified by the nodes it connects
/// and the origin markers of those nodes. Input and output
/// nodes have no origin; hidden nodes carry the innovation
/// number of the gene that was split to create them.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct StructuralMutation {
    pub input: usize,
    pub output: usize,
    pub input_origin: Option<Innovation>,
    pub output_origin: Option<Innovation>,
}

/// An `InnovationTracker` makes sure identical structural
/// mutations arising independently within one generation
/// are assigned the same innovation number.
///
/// It borrows the run-wide innovation counter for the
/// duration of a single generation's mutation phase, and
/// is dropped once it ends. Only the counter outlives it.
#[derive(Debug)]
pub struct InnovationTracker<'a> {
    next_innovation: &'a mut Innovation,
    innovations: HashMap<StructuralMutation, Innovation, RandomState>,
}

impl<'a> InnovationTracker<'a> {
    /// Creates an empty tracker allocating innovation
    /// numbers from `next_innovation` onwards.
    ///
    /// # Examples
    /// ```
    /// use tickneat::InnovationTracker;
    ///
    /// let mut counter = 6;
    /// let tracker = InnovationTracker::new(&mut counter);
    /// assert_eq!(tracker.next_innovation(), 6);
    /// ```
    pub fn new(next_innovation: &'a mut Innovation) -> InnovationTracker<'a> {
        InnovationTracker {
            next_innovation,
            innovations: HashMap::default(),
        }
    }

    /// Returns the innovation number previously assigned
    /// to the same mutation this generation, or allocates
    /// the next one from the counter.
    ///
    /// # Examples
    /// ```
    /// use tickneat::genomics::StructuralMutation;
    /// use tickneat::InnovationTracker;
    ///
    /// let mut counter = 2;
    /// let mut tracker = InnovationTracker::new(&mut counter);
    ///
    /// let mutation = StructuralMutation {
    ///     input: 0,
    ///     output: 3,
    ///     input_origin: None,
    ///     output_origin: Some(1),
    /// };
    /// assert_eq!(tracker.innovation_for(mutation), 2);
    /// assert_eq!(tracker.innovation_for(mutation), 2);
    /// assert_eq!(tracker.next_innovation(), 3);
    /// ```
    pub fn innovation_for(&mut self, mutation: StructuralMutation) -> Innovation {
        match self.innovations.entry(mutation) {
            Entry::Occupied(entry) => *entry.get(),
            Entry::Vacant(entry) => {
                let innovation = *self.next_innovation;
                *self.next_innovation += 1;
                *entry.insert(innovation)
            }
        }
    }

    /// Returns the next innovation number that will be allocated.
    pub fn next_innovation(&self) -> Innovation {
        *self.next_innovation
    }

    /// Returns the number of distinct mutations recorded this generation.
    pub fn len(&self) -> usize {
        self.innovations.len()
    }

    /// Returns whether no mutation has been recorded this generation.
    pub fn is_empty(&self) -> bool {
        self.innovations.is_empty()
    }
}
