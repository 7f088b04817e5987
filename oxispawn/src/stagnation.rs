//! Stagnation tracking classifies species as either
//! still making progress or stagnated, in which
//! case they are culled during reproduction.
use crate::{Genome, Species, SpeciesKey, SpeciesSet};

use ahash::RandomState;
use serde::{Deserialize, Serialize};

use std::collections::HashMap;
use std::num::NonZeroUsize;

/// Classification of a species by a [`StagnationTracker`].
#[derive(Debug, Clone)]
pub enum SpeciesStatus<G> {
    /// The species takes part in reproduction.
    Active(Species<G>),
    /// The species is dropped from the population.
    Stagnant(Species<G>),
}

impl<G> SpeciesStatus<G> {
    /// Returns the classified species.
    pub fn species(&self) -> &Species<G> {
        match self {
            SpeciesStatus::Active(s) | SpeciesStatus::Stagnant(s) => s,
        }
    }

    /// Returns whether the species was classified as stagnant.
    pub fn is_stagnant(&self) -> bool {
        matches!(self, SpeciesStatus::Stagnant(_))
    }
}

/// An interface for policies deciding which
/// species have stagnated.
///
/// Called exactly once per generation. The returned
/// statuses must account for every species passed in;
/// reproduction processes them in the returned order.
pub trait StagnationTracker<G> {
    fn classify(&mut self, species: SpeciesSet<G>) -> Vec<SpeciesStatus<G>>;
}

/// Aggregation used to summarize a species'
/// member fitnesses into a single value.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum SpeciesFitness {
    /// Highest member fitness.
    Max,
    /// Mean member fitness.
    Mean,
}

impl SpeciesFitness {
    /// Summarizes the species' fitness. Empty species score 0.
    pub fn of<G: Genome>(self, species: &Species<G>) -> f32 {
        match self {
            SpeciesFitness::Max => species.max_fitness(),
            SpeciesFitness::Mean => species.mean_fitness(),
        }
        .unwrap_or(0.0)
    }
}

/// Configuration data for [`FitnessStagnation`].
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StagnationConfig {
    /// Number of generations without an improvement
    /// of species fitness before a species is
    /// considered stagnant.
    pub max_stagnation: NonZeroUsize,
    /// Summary of member fitnesses used as the
    /// species' fitness.
    pub species_fitness: SpeciesFitness,
    /// Number of best-performing species protected
    /// from stagnation.
    pub species_elitism: usize,
}

impl Default for StagnationConfig {
    fn default() -> StagnationConfig {
        StagnationConfig {
            // SAFETY: 15 is a valid NonZeroUsize.
            max_stagnation: unsafe { NonZeroUsize::new_unchecked(15) },
            species_fitness: SpeciesFitness::Max,
            species_elitism: 0,
        }
    }
}

#[derive(Clone, Copy, Debug)]
struct Record {
    best_fitness: f32,
    last_improved: usize,
}

/// Fixed-time stagnation: a species stagnates once its
/// fitness has not improved for [`max_stagnation`] generations.
///
/// [`max_stagnation`]: StagnationConfig::max_stagnation
#[derive(Clone, Debug)]
pub struct FitnessStagnation {
    config: StagnationConfig,
    generation: usize,
    records: HashMap<SpeciesKey, Record, RandomState>,
}

impl FitnessStagnation {
    /// Creates a new tracker with no recorded history.
    ///
    /// # Examples
    /// ```
    /// use oxispawn::stagnation::{FitnessStagnation, StagnationConfig};
    ///
    /// let tracker = FitnessStagnation::new(StagnationConfig::default());
    /// assert_eq!(tracker.generation(), 0);
    /// ```
    pub fn new(config: StagnationConfig) -> FitnessStagnation {
        FitnessStagnation {
            config,
            generation: 0,
            records: HashMap::default(),
        }
    }

    /// Returns the tracker's configuration.
    pub fn config(&self) -> &StagnationConfig {
        &self.config
    }

    /// Returns the number of generations classified so far.
    pub fn generation(&self) -> usize {
        self.generation
    }

    /// Returns the number of generations since the species
    /// last improved, if it has been seen before.
    pub fn time_stagnated(&self, species: SpeciesKey) -> Option<usize> {
        self.records
            .get(&species)
            .map(|r| self.generation.saturating_sub(r.last_improved + 1))
    }
}

impl<G: Genome> StagnationTracker<G> for FitnessStagnation {
    /// Statuses are returned in order of ascending species fitness.
    fn classify(&mut self, species: SpeciesSet<G>) -> Vec<SpeciesStatus<G>> {
        let generation = self.generation;
        let aggregate = self.config.species_fitness;
        self.records.retain(|key, _| species.contains_key(key));

        let mut scored: Vec<(f32, usize, Species<G>)> = species
            .into_values()
            .map(|s| {
                let fitness = aggregate.of(&s);
                let record = self.records.entry(s.key()).or_insert(Record {
                    best_fitness: fitness,
                    last_improved: generation,
                });
                if fitness > record.best_fitness {
                    record.best_fitness = fitness;
                    record.last_improved = generation;
                }
                (fitness, generation - record.last_improved, s)
            })
            .collect();
        scored.sort_by(|(f1, _, s1), (f2, _, s2)| f1.total_cmp(f2).then(s1.key().cmp(&s2.key())));

        let species_count = scored.len();
        let mut non_stagnant = species_count;
        let statuses = scored
            .into_iter()
            .enumerate()
            .map(|(rank, (_, stagnant_time, s))| {
                let protected = species_count - rank <= self.config.species_elitism;
                let stagnant = !protected
                    && non_stagnant > self.config.species_elitism
                    && stagnant_time >= self.config.max_stagnation.get();
                if stagnant {
                    non_stagnant -= 1;
                    SpeciesStatus::Stagnant(s)
                } else {
                    SpeciesStatus::Active(s)
                }
            })
            .collect();

        self.generation += 1;
        statuses
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::genome::test_genome::TestGenome;

    fn species_set(fitnesses: &[(SpeciesKey, f32)]) -> SpeciesSet<TestGenome> {
        fitnesses
            .iter()
            .enumerate()
            .map(|(i, &(key, fitness))| {
                let mut s = Species::new(key, 0);
                s.insert(i, TestGenome::with_fitness(i, fitness));
                (key, s)
            })
            .collect()
    }

    fn stagnant_keys(statuses: &[SpeciesStatus<TestGenome>]) -> Vec<SpeciesKey> {
        statuses
            .iter()
            .filter(|s| s.is_stagnant())
            .map(|s| s.species().key())
            .collect()
    }

    fn tracker(max_stagnation: usize, species_elitism: usize) -> FitnessStagnation {
        FitnessStagnation::new(StagnationConfig {
            max_stagnation: NonZeroUsize::new(max_stagnation).unwrap(),
            species_fitness: SpeciesFitness::Max,
            species_elitism,
        })
    }

    #[test]
    fn new_species_are_active() {
        let mut tracker = tracker(1, 0);
        let statuses = tracker.classify(species_set(&[(1, 1.0), (2, 5.0)]));
        assert!(stagnant_keys(&statuses).is_empty());
        assert_eq!(statuses.len(), 2);
    }

    #[test]
    fn statuses_are_sorted_by_ascending_fitness() {
        let mut tracker = tracker(3, 0);
        let statuses = tracker.classify(species_set(&[(1, 9.0), (2, 5.0), (3, 7.0)]));
        let keys: Vec<_> = statuses.iter().map(|s| s.species().key()).collect();
        assert_eq!(keys, [2, 3, 1]);
    }

    #[test]
    fn species_without_improvement_stagnate() {
        let mut tracker = tracker(2, 0);
        tracker.classify(species_set(&[(1, 1.0), (2, 1.0)]));
        tracker.classify(species_set(&[(1, 2.0), (2, 1.0)]));
        assert_eq!(tracker.time_stagnated(2), Some(1));
        let statuses = tracker.classify(species_set(&[(1, 3.0), (2, 1.0)]));
        assert_eq!(stagnant_keys(&statuses), [2]);
        assert_eq!(tracker.time_stagnated(1), Some(0));
    }

    #[test]
    fn species_elitism_protects_best_species() {
        let mut tracker = tracker(1, 1);
        tracker.classify(species_set(&[(1, 1.0), (2, 4.0)]));
        let statuses = tracker.classify(species_set(&[(1, 1.0), (2, 4.0)]));
        assert_eq!(stagnant_keys(&statuses), [1]);
    }

    #[test]
    fn species_elitism_keeps_minimum_species_count() {
        let mut tracker = tracker(1, 2);
        tracker.classify(species_set(&[(1, 1.0), (2, 4.0)]));
        let statuses = tracker.classify(species_set(&[(1, 1.0), (2, 4.0)]));
        assert!(stagnant_keys(&statuses).is_empty());
    }

    #[test]
    fn mean_fitness_ignores_improved_maximum() {
        fn members(fitnesses: &[f32]) -> SpeciesSet<TestGenome> {
            let mut s = Species::new(1, 0);
            for (key, fitness) in fitnesses.iter().enumerate() {
                s.insert(key, TestGenome::with_fitness(key, *fitness));
            }
            [(1, s)].into_iter().collect()
        }
        let config = |species_fitness: SpeciesFitness| StagnationConfig {
            max_stagnation: NonZeroUsize::new(1).unwrap(),
            species_fitness,
            species_elitism: 0,
        };

        let mut by_mean = FitnessStagnation::new(config(SpeciesFitness::Mean));
        let mut by_max = FitnessStagnation::new(config(SpeciesFitness::Max));
        by_mean.classify(members(&[2.0, 2.0]));
        by_max.classify(members(&[2.0, 2.0]));

        // Best member improves, average does not.
        let statuses = by_mean.classify(members(&[1.0, 3.0]));
        assert_eq!(stagnant_keys(&statuses), [1]);
        let statuses = by_max.classify(members(&[1.0, 3.0]));
        assert!(stagnant_keys(&statuses).is_empty());
    }

    #[test]
    fn records_of_vanished_species_are_forgotten() {
        let mut tracker = tracker(1, 0);
        tracker.classify(species_set(&[(1, 1.0), (2, 1.0)]));
        tracker.classify(species_set(&[(1, 1.0)]));
        assert_eq!(tracker.time_stagnated(2), None);
        // Reappearing under the same key starts a fresh record.
        let statuses = tracker.classify(species_set(&[(1, 1.0), (2, 1.0)]));
        assert_eq!(stagnant_keys(&statuses), [1]);
    }
}
