use crate::Gene;

use std::fmt;

/// A single weighted read from one node into the
/// accumulated input of another.
#[derive(Clone, Copy, PartialEq)]
pub(super) struct Computation {
    pub input: usize,
    pub output: usize,
    pub weight: f32,
}

impl From<&Gene> for Computation {
    fn from(gene: &Gene) -> Computation {
        Computation {
            input: gene.input(),
            output: gene.output(),
            weight: gene.weight(),
        }
    }
}

impl fmt::Debug for Computation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}->{} {:.9}", self.input, self.output, self.weight)
    }
}
