use super::{ReproductionConfig, ReproductionError};
use crate::ancestry::{AncestrySink, Parents};
use crate::{Genome, GenomeKey, Indexer, Population, SpeciesKey};

use rand::Rng;

/// Minimum number of eligible parents, whatever
/// the survival threshold.
const MIN_SURVIVORS: usize = 2;

/// Auxiliary type for offspring generation.
/// Handles the tasks of turning a species' former
/// members into its allotted share of the next
/// generation: copying the elite and mating the
/// survivors.
pub(super) struct OffspringFactory<'a, C, A> {
    config: &'a ReproductionConfig,
    genetic_config: &'a C,
    indexer: &'a mut Indexer,
    ancestry: &'a mut A,
}

impl<'a, C, A: AncestrySink> OffspringFactory<'a, C, A> {
    pub(super) fn new(
        config: &'a ReproductionConfig,
        genetic_config: &'a C,
        indexer: &'a mut Indexer,
        ancestry: &'a mut A,
    ) -> OffspringFactory<'a, C, A> {
        OffspringFactory {
            config,
            genetic_config,
            indexer,
            ancestry,
        }
    }

    /// Adds `spawn` genomes descended from `members` to
    /// the population. `spawn` must be at least the
    /// configured elitism.
    pub(super) fn generate_offspring<G, R>(
        &mut self,
        species: SpeciesKey,
        mut members: Vec<(GenomeKey, G)>,
        spawn: usize,
        population: &mut Population<G>,
        rng: &mut R,
    ) -> Result<(), ReproductionError>
    where
        G: Genome<Config = C>,
        R: Rng + ?Sized,
    {
        debug_assert!(spawn >= self.config.elitism);
        sort_by_decreasing_fitness(&mut members);

        let elite = self.config.elitism.min(members.len());
        let offspring = spawn - elite;
        log::debug!(
            "Reproducing species #{} from {} members into {} elites and {} offspring.",
            species,
            members.len(),
            elite,
            offspring
        );

        if offspring > 0 {
            self.add_mated_offspring(&members, offspring, population, rng)?;
        }
        population.extend(members.into_iter().take(elite));
        Ok(())
    }

    /// Randomly pair up parents among the top survivors,
    /// and add their mutated children to the population.
    fn add_mated_offspring<G, R>(
        &mut self,
        members: &[(GenomeKey, G)],
        offspring: usize,
        population: &mut Population<G>,
        rng: &mut R,
    ) -> Result<(), ReproductionError>
    where
        G: Genome<Config = C>,
        R: Rng + ?Sized,
    {
        let survivors = count_survivors(members.len(), self.config.survival_threshold);
        let eligible_parents = &members[..survivors];
        for _ in 0..offspring {
            let (parent1_key, parent1) = &eligible_parents[rng.gen_range(0..survivors)];
            let (parent2_key, parent2) = &eligible_parents[rng.gen_range(0..survivors)];

            // Identical parents yield a clone under a new key.
            let key = self.indexer.next_key()?;
            let mut child = parent1.crossover(parent2, key, self.genetic_config, rng);
            child.mutate(self.genetic_config, rng);
            self.ancestry
                .record(key, Parents::Crossover(*parent1_key, *parent2_key));
            population.insert(key, child);
        }
        Ok(())
    }
}

/// Sorts genomes by fitness in descending order,
/// breaking ties by ascending key.
pub(super) fn sort_by_decreasing_fitness<G: Genome>(members: &mut [(GenomeKey, G)]) {
    members.sort_unstable_by(|(k1, g1), (k2, g2)| {
        g2.fitness()
            .total_cmp(&g1.fitness())
            .then_with(|| k1.cmp(k2))
    });
}

/// Number of top members eligible for mating.
/// Never below two, unless the species is smaller.
pub(super) fn count_survivors(member_count: usize, survival_threshold: f32) -> usize {
    let survivors = (member_count as f32 * survival_threshold).ceil() as usize;
    survivors.max(MIN_SURVIVORS).min(member_count)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::genome::test_genome::TestGenome;

    #[test]
    fn survivors_are_floored_at_two() {
        assert_eq!(count_survivors(5, 0.1), 2);
        assert_eq!(count_survivors(100, 0.01), 2);
        assert_eq!(count_survivors(3, 0.5), 2);
        assert_eq!(count_survivors(10, 0.5), 5);
        assert_eq!(count_survivors(10, 1.0), 10);
        assert_eq!(count_survivors(7, 0.5), 4);
    }

    #[test]
    fn survivors_never_exceed_members() {
        assert_eq!(count_survivors(1, 0.2), 1);
        assert_eq!(count_survivors(1, 1.0), 1);
    }

    #[test]
    fn sorting_breaks_ties_by_key() {
        let mut members: Vec<_> = [(5, 1.0), (2, 3.0), (9, 3.0), (1, 1.0)]
            .iter()
            .map(|&(k, f)| (k, TestGenome::with_fitness(k, f)))
            .collect();
        sort_by_decreasing_fitness(&mut members);
        let keys: Vec<_> = members.iter().map(|(k, _)| *k).collect();
        assert_eq!(keys, [2, 9, 1, 5]);
    }
}
