use crate::{Genome, GenomeKey};

use ahash::RandomState;
use serde::{Deserialize, Serialize};

use std::collections::{BTreeMap, HashMap};

/// Species identifier.
pub type SpeciesKey = usize;

/// A partition of a population into species, indexed by key.
pub type SpeciesSet<G> = BTreeMap<SpeciesKey, Species<G>>;

/// Species are collections of genomes deemed
/// mutually compatible by some external
/// speciation scheme.
///
/// Membership is owned by whoever clusters the
/// population. During reproduction the members of
/// each surviving species are consumed, and the
/// species is returned empty, ready to be repopulated.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Species<G> {
    key: SpeciesKey,
    created: usize,
    members: HashMap<GenomeKey, G, RandomState>,
}

impl<G> Species<G> {
    /// Creates a new, empty species with the specified key,
    /// born in generation `created`.
    ///
    /// # Examples
    /// ```
    /// use oxispawn::Species;
    /// # use oxispawn_bits::BitGenome;
    ///
    /// let species = Species::<BitGenome>::new(3, 0);
    /// assert!(species.is_empty());
    /// ```
    pub fn new(key: SpeciesKey, created: usize) -> Species<G> {
        Species {
            key,
            created,
            members: HashMap::default(),
        }
    }

    /// Returns the species' key.
    pub fn key(&self) -> SpeciesKey {
        self.key
    }

    /// Returns the generation in which the species was created.
    pub fn created(&self) -> usize {
        self.created
    }

    /// Adds a genome to the species, returning the
    /// previous member with the same key, if any.
    ///
    /// # Examples
    /// ```
    /// use oxispawn::{Genome, Species};
    /// use oxispawn_bits::BitGenome;
    ///
    /// let mut species = Species::new(1, 0);
    /// let genome = BitGenome::from_bits(7, vec![true, false, true]);
    /// assert!(species.insert(7, genome).is_none());
    ///
    /// assert_eq!(species.len(), 1);
    /// assert_eq!(species.get(7).map(|g| g.ones()), Some(2));
    /// ```
    pub fn insert(&mut self, key: GenomeKey, genome: G) -> Option<G> {
        self.members.insert(key, genome)
    }

    /// Returns the member with the specified key.
    pub fn get(&self, key: GenomeKey) -> Option<&G> {
        self.members.get(&key)
    }

    /// Returns the number of members.
    pub fn len(&self) -> usize {
        self.members.len()
    }

    /// Returns whether the species has no members.
    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    /// Returns an iterator over the species' members,
    /// in no particular order.
    pub fn members(&self) -> impl Iterator<Item = (GenomeKey, &G)> {
        self.members.iter().map(|(k, g)| (*k, g))
    }

    /// Removes and returns all members, leaving
    /// the species empty.
    pub(crate) fn take_members(&mut self) -> Vec<(GenomeKey, G)> {
        self.members.drain().collect()
    }
}

impl<G: Genome> Species<G> {
    /// Returns an iterator over the members' fitnesses.
    pub fn fitnesses(&self) -> impl Iterator<Item = f32> + '_ {
        self.members.values().map(|g| g.fitness())
    }

    /// Returns the mean fitness of the species' members,
    /// or `None` if the species is empty.
    ///
    /// # Examples
    /// ```
    /// use oxispawn::{Genome, Species};
    /// use oxispawn_bits::BitGenome;
    ///
    /// let mut species = Species::new(1, 0);
    /// for (key, fitness) in [(1, 20.0), (2, 30.0)] {
    ///     let mut genome = BitGenome::from_bits(key, vec![]);
    ///     genome.set_fitness(fitness);
    ///     species.insert(key, genome);
    /// }
    ///
    /// assert_eq!(species.mean_fitness(), Some(25.0));
    /// assert_eq!(species.max_fitness(), Some(30.0));
    /// ```
    pub fn mean_fitness(&self) -> Option<f32> {
        if self.is_empty() {
            return None;
        }
        Some(self.fitnesses().sum::<f32>() / self.len() as f32)
    }

    /// Returns the highest member fitness,
    /// or `None` if the species is empty.
    pub fn max_fitness(&self) -> Option<f32> {
        self.fitnesses().reduce(f32::max)
    }

    /// Returns the currently best-performing member.
    /// Ties are broken in favor of the lowest key.
    pub fn champion(&self) -> Option<(GenomeKey, &G)> {
        self.members().max_by(|(k1, g1), (k2, g2)| {
            g1.fitness()
                .total_cmp(&g2.fitness())
                .then_with(|| k2.cmp(k1))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::genome::test_genome::TestGenome;

    fn species_with(fitnesses: &[(GenomeKey, f32)]) -> Species<TestGenome> {
        let mut species = Species::new(0, 0);
        for &(key, fitness) in fitnesses {
            species.insert(key, TestGenome::with_fitness(key, fitness));
        }
        species
    }

    #[test]
    fn champion_prefers_lowest_key_on_ties() {
        let species = species_with(&[(4, 5.0), (2, 7.0), (3, 7.0)]);
        assert_eq!(species.champion().map(|(k, _)| k), Some(2));
    }

    #[test]
    fn empty_species_has_no_fitness() {
        let species = species_with(&[]);
        assert_eq!(species.mean_fitness(), None);
        assert_eq!(species.max_fitness(), None);
        assert!(species.champion().is_none());
    }

    #[test]
    fn take_members_empties_species() {
        let mut species = species_with(&[(1, 1.0), (2, 2.0)]);
        let mut taken = species.take_members();
        taken.sort_by_key(|(k, _)| *k);
        assert_eq!(taken.iter().map(|(k, _)| *k).collect::<Vec<_>>(), [1, 2]);
        assert!(species.is_empty());
        assert_eq!(species.key(), 0);
    }
}
