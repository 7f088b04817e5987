use rand::Rng;

use std::collections::BTreeMap;

/// Unique identifier of a genome, as issued by an [`Indexer`].
///
/// [`Indexer`]: crate::Indexer
pub type GenomeKey = usize;

/// A population of genomes, indexed by key.
///
/// Ordered so that iterating over it under a fixed
/// random seed always produces the same draws.
pub type Population<G> = BTreeMap<GenomeKey, G>;

/// An interface for genomes that can be reproduced.
///
/// Random sources are always supplied by the caller,
/// so runs are reproducible for a seeded generator.
pub trait Genome: Sized {
    type Config;

    /// Returns a randomized founder genome,
    /// identified by `key`.
    fn create<R: Rng + ?Sized>(key: GenomeKey, config: &Self::Config, rng: &mut R) -> Self;

    /// Combines two genomes and returns a "child" genome
    /// identified by `key`.
    ///
    /// `self` and `other` may be the same genome, in which
    /// case the child should be a clone of its parent.
    fn crossover<R: Rng + ?Sized>(
        &self,
        other: &Self,
        key: GenomeKey,
        config: &Self::Config,
        rng: &mut R,
    ) -> Self;

    /// Mutates the genome in place.
    fn mutate<R: Rng + ?Sized>(&mut self, config: &Self::Config, rng: &mut R);

    /// Sets the genome's fitness value.
    fn set_fitness(&mut self, fitness: f32);

    /// Returns the genome's fitness value.
    fn fitness(&self) -> f32;
}

#[cfg(test)]
pub(crate) mod test_genome {
    use super::*;

    /// Minimal genome used by unit tests: records
    /// its lineage and how many times it mutated.
    #[derive(Clone, Debug, PartialEq)]
    pub(crate) struct TestGenome {
        pub key: GenomeKey,
        pub fitness: f32,
        pub parents: Option<(GenomeKey, GenomeKey)>,
        pub mutations: usize,
    }

    impl TestGenome {
        pub(crate) fn with_fitness(key: GenomeKey, fitness: f32) -> TestGenome {
            TestGenome {
                key,
                fitness,
                parents: None,
                mutations: 0,
            }
        }
    }

    impl Genome for TestGenome {
        type Config = ();

        fn create<R: Rng + ?Sized>(key: GenomeKey, _: &(), _: &mut R) -> Self {
            TestGenome::with_fitness(key, 0.0)
        }

        fn crossover<R: Rng + ?Sized>(
            &self,
            other: &Self,
            key: GenomeKey,
            _: &(),
            _: &mut R,
        ) -> Self {
            TestGenome {
                key,
                fitness: 0.0,
                parents: Some((self.key, other.key)),
                mutations: 0,
            }
        }

        fn mutate<R: Rng + ?Sized>(&mut self, _: &(), _: &mut R) {
            self.mutations += 1;
        }

        fn set_fitness(&mut self, fitness: f32) {
            self.fitness = fitness;
        }

        fn fitness(&self) -> f32 {
            self.fitness
        }
    }
}
