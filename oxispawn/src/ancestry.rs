//! Lineage records of every genome created
//! during reproduction.
use crate::GenomeKey;

use ahash::RandomState;
use serde::{Deserialize, Serialize};

use std::collections::{HashMap, VecDeque};
use std::num::NonZeroUsize;

/// The parents of a genome.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Parents {
    /// The genome was created from scratch.
    Founder,
    /// The genome is the child of two (possibly
    /// identical) parents.
    Crossover(GenomeKey, GenomeKey),
}

/// A destination for lineage records.
///
/// Receives exactly one record per genome created.
pub trait AncestrySink {
    fn record(&mut self, genome: GenomeKey, parents: Parents);
}

/// An unbounded in-memory lineage record.
///
/// # Examples
/// ```
/// use oxispawn::ancestry::{AncestryLog, AncestrySink, Parents};
///
/// let mut log = AncestryLog::new();
/// log.record(1, Parents::Founder);
/// log.record(2, Parents::Crossover(1, 1));
///
/// assert_eq!(log.parents(2), Some(Parents::Crossover(1, 1)));
/// assert_eq!(log.len(), 2);
/// ```
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct AncestryLog {
    entries: HashMap<GenomeKey, Parents, RandomState>,
}

impl AncestryLog {
    pub fn new() -> AncestryLog {
        AncestryLog::default()
    }

    /// Returns the recorded parents of `genome`.
    pub fn parents(&self, genome: GenomeKey) -> Option<Parents> {
        self.entries.get(&genome).copied()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Returns an iterator over all records, in no particular order.
    pub fn iter(&self) -> impl Iterator<Item = (GenomeKey, Parents)> + '_ {
        self.entries.iter().map(|(k, p)| (*k, *p))
    }
}

impl AncestrySink for AncestryLog {
    fn record(&mut self, genome: GenomeKey, parents: Parents) {
        self.entries.insert(genome, parents);
    }
}

/// A lineage record retaining only the most
/// recent `capacity` entries.
///
/// # Examples
/// ```
/// use oxispawn::ancestry::{AncestrySink, BoundedAncestry, Parents};
/// use std::num::NonZeroUsize;
///
/// let mut log = BoundedAncestry::new(NonZeroUsize::new(2).unwrap());
/// log.record(1, Parents::Founder);
/// log.record(2, Parents::Founder);
/// log.record(3, Parents::Crossover(1, 2));
///
/// assert_eq!(log.parents(1), None);
/// assert_eq!(log.parents(3), Some(Parents::Crossover(1, 2)));
/// ```
#[derive(Clone, Debug)]
pub struct BoundedAncestry {
    capacity: NonZeroUsize,
    order: VecDeque<GenomeKey>,
    entries: HashMap<GenomeKey, Parents, RandomState>,
}

impl BoundedAncestry {
    pub fn new(capacity: NonZeroUsize) -> BoundedAncestry {
        BoundedAncestry {
            capacity,
            order: VecDeque::with_capacity(capacity.get()),
            entries: HashMap::default(),
        }
    }

    /// Returns the recorded parents of `genome`,
    /// if the record has not been evicted.
    pub fn parents(&self, genome: GenomeKey) -> Option<Parents> {
        self.entries.get(&genome).copied()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity.get()
    }
}

impl AncestrySink for BoundedAncestry {
    fn record(&mut self, genome: GenomeKey, parents: Parents) {
        if self.entries.insert(genome, parents).is_some() {
            return;
        }
        self.order.push_back(genome);
        while self.order.len() > self.capacity.get() {
            if let Some(evicted) = self.order.pop_front() {
                self.entries.remove(&evicted);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bounded_ancestry_evicts_oldest() {
        let mut log = BoundedAncestry::new(NonZeroUsize::new(3).unwrap());
        for key in 1..=10 {
            log.record(key, Parents::Founder);
        }
        assert_eq!(log.len(), 3);
        assert!((1..=7).all(|k| log.parents(k).is_none()));
        assert!((8..=10).all(|k| log.parents(k) == Some(Parents::Founder)));
    }

    #[test]
    fn rerecording_does_not_grow_bounded_ancestry() {
        let mut log = BoundedAncestry::new(NonZeroUsize::new(2).unwrap());
        log.record(1, Parents::Founder);
        log.record(1, Parents::Crossover(0, 0));
        log.record(2, Parents::Founder);
        assert_eq!(log.parents(1), Some(Parents::Crossover(0, 0)));
        assert_eq!(log.len(), 2);
    }
}
