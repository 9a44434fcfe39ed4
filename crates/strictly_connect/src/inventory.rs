//! Special-sequence inventory: the wide pieces a seat may still play.

use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

/// Ordered multiset of special piece sizes.
///
/// Duplicates are independent pieces; taking a size removes exactly one
/// occurrence.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SpecialSequences {
    sizes: Vec<usize>,
}

impl SpecialSequences {
    /// Creates an inventory holding the given sizes in order.
    pub fn new(sizes: Vec<usize>) -> Self {
        Self { sizes }
    }

    /// Returns all remaining sizes in order.
    pub fn sizes(&self) -> &[usize] {
        &self.sizes
    }

    /// Number of remaining pieces.
    pub fn len(&self) -> usize {
        self.sizes.len()
    }

    /// Checks if no pieces remain.
    pub fn is_empty(&self) -> bool {
        self.sizes.is_empty()
    }

    /// Checks if at least one piece of this size remains.
    pub fn contains(&self, size: usize) -> bool {
        self.sizes.contains(&size)
    }

    /// Number of remaining pieces of this size.
    pub fn count(&self, size: usize) -> usize {
        self.sizes.iter().filter(|s| **s == size).count()
    }

    /// Removes the first occurrence of `size`. Returns false if none remained.
    #[instrument(skip(self))]
    pub fn take(&mut self, size: usize) -> bool {
        match self.sizes.iter().position(|s| *s == size) {
            Some(idx) => {
                self.sizes.remove(idx);
                debug!(size, remaining = self.sizes.len(), "Special sequence consumed");
                true
            }
            None => false,
        }
    }

    /// Distinct sizes in order of first appearance.
    pub fn distinct(&self) -> Vec<usize> {
        let mut seen = Vec::new();
        for size in &self.sizes {
            if !seen.contains(size) {
                seen.push(*size);
            }
        }
        seen
    }

    /// `(size, remaining count)` for every distinct size of `declared`.
    pub fn histogram(&self, declared: &SpecialSequences) -> Vec<(usize, usize)> {
        declared
            .distinct()
            .into_iter()
            .map(|size| (size, self.count(size)))
            .collect()
    }
}

impl FromIterator<usize> for SpecialSequences {
    fn from_iter<I: IntoIterator<Item = usize>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}
