//! Progress notifications emitted during reproduction.
//!
//! Reporters are side-effect only: nothing they do
//! feeds back into the evolutionary process.
mod statistics;

use crate::SpeciesKey;

pub use statistics::{GenerationStats, StatisticsReporter, Stats};

/// Receiver of reproduction progress notifications.
///
/// All hooks default to doing nothing.
pub trait Reporter {
    /// A new generation is about to be reproduced.
    fn start_generation(&mut self, _generation: usize) {}

    /// A species was classified as stagnant and culled.
    fn species_stagnant(&mut self, _species: SpeciesKey, _size: usize) {}

    /// Mean adjusted fitness over all surviving species.
    fn average_adjusted_fitness(&mut self, _fitness: f32) {}

    /// Adjusted fitness of each surviving species.
    fn species_fitness(&mut self, _fitness: &[(SpeciesKey, f32)]) {}

    /// Number of offspring allotted to each surviving
    /// species, before the elitism floor is applied.
    fn spawn_amounts(&mut self, _amounts: &[(SpeciesKey, usize)]) {}

    /// A species received no offspring and went extinct.
    fn species_extinct(&mut self, _species: SpeciesKey) {}

    /// Offspring could not be allotted because the total
    /// spawn weight was `total_weight`; the generation is empty.
    ///
    /// Only possible if a species without members were
    /// allotted offspring, which reproduction rules out.
    fn allocation_degenerate(&mut self, _total_weight: f32) {}

    /// Reproduction produced a population of
    /// `population_size` genomes in `species_count` species.
    fn end_generation(&mut self, _population_size: usize, _species_count: usize) {}
}

/// Discards all notifications.
impl Reporter for () {}

/// Forwards notifications to the [`log`] facade.
#[derive(Clone, Copy, Debug, Default)]
pub struct LogReporter;

impl Reporter for LogReporter {
    fn start_generation(&mut self, generation: usize) {
        log::info!("Reproducing generation {}.", generation);
    }

    fn species_stagnant(&mut self, species: SpeciesKey, size: usize) {
        log::warn!(
            "Species #{} with {} members is stagnated: removing it.",
            species,
            size
        );
    }

    fn average_adjusted_fitness(&mut self, fitness: f32) {
        log::info!("Average adjusted fitness: {:.3}", fitness);
    }

    fn species_fitness(&mut self, fitness: &[(SpeciesKey, f32)]) {
        log::info!("Species fitness: {:?}", fitness);
    }

    fn spawn_amounts(&mut self, amounts: &[(SpeciesKey, usize)]) {
        log::info!("Spawn amounts: {:?}", amounts);
    }

    fn species_extinct(&mut self, species: SpeciesKey) {
        log::debug!("Species #{} went extinct.", species);
    }

    fn allocation_degenerate(&mut self, total_weight: f32) {
        log::warn!(
            "Degenerate offspring allotment (total spawn weight {}): population is empty.",
            total_weight
        );
    }

    fn end_generation(&mut self, population_size: usize, species_count: usize) {
        log::info!(
            "Population of {} genomes in {} species.",
            population_size,
            species_count
        );
    }
}

/// Forwards each notification to every reporter in the set.
///
/// # Examples
/// ```
/// use oxispawn::reporting::{LogReporter, Reporter, ReporterSet, StatisticsReporter};
///
/// let mut reporters = ReporterSet::new();
/// reporters.add(LogReporter);
/// reporters.add(StatisticsReporter::new());
///
/// reporters.start_generation(0);
/// assert_eq!(reporters.len(), 2);
/// ```
#[derive(Default)]
pub struct ReporterSet {
    reporters: Vec<Box<dyn Reporter>>,
}

impl ReporterSet {
    pub fn new() -> ReporterSet {
        ReporterSet::default()
    }

    pub fn add<R: Reporter + 'static>(&mut self, reporter: R) {
        self.reporters.push(Box::new(reporter));
    }

    pub fn len(&self) -> usize {
        self.reporters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.reporters.is_empty()
    }
}

impl Reporter for ReporterSet {
    fn start_generation(&mut self, generation: usize) {
        for r in &mut self.reporters {
            r.start_generation(generation);
        }
    }

    fn species_stagnant(&mut self, species: SpeciesKey, size: usize) {
        for r in &mut self.reporters {
            r.species_stagnant(species, size);
        }
    }

    fn average_adjusted_fitness(&mut self, fitness: f32) {
        for r in &mut self.reporters {
            r.average_adjusted_fitness(fitness);
        }
    }

    fn species_fitness(&mut self, fitness: &[(SpeciesKey, f32)]) {
        for r in &mut self.reporters {
            r.species_fitness(fitness);
        }
    }

    fn spawn_amounts(&mut self, amounts: &[(SpeciesKey, usize)]) {
        for r in &mut self.reporters {
            r.spawn_amounts(amounts);
        }
    }

    fn species_extinct(&mut self, species: SpeciesKey) {
        for r in &mut self.reporters {
            r.species_extinct(species);
        }
    }

    fn allocation_degenerate(&mut self, total_weight: f32) {
        for r in &mut self.reporters {
            r.allocation_degenerate(total_weight);
        }
    }

    fn end_generation(&mut self, population_size: usize, species_count: usize) {
        for r in &mut self.reporters {
            r.end_generation(population_size, species_count);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::cell::RefCell;
    use std::rc::Rc;

    /// Lets a test inspect a reporter owned by a [`ReporterSet`].
    struct Shared(Rc<RefCell<StatisticsReporter>>);

    impl Reporter for Shared {
        fn start_generation(&mut self, generation: usize) {
            self.0.borrow_mut().start_generation(generation);
        }

        fn species_stagnant(&mut self, species: SpeciesKey, size: usize) {
            self.0.borrow_mut().species_stagnant(species, size);
        }

        fn average_adjusted_fitness(&mut self, fitness: f32) {
            self.0.borrow_mut().average_adjusted_fitness(fitness);
        }

        fn species_fitness(&mut self, fitness: &[(SpeciesKey, f32)]) {
            self.0.borrow_mut().species_fitness(fitness);
        }

        fn spawn_amounts(&mut self, amounts: &[(SpeciesKey, usize)]) {
            self.0.borrow_mut().spawn_amounts(amounts);
        }

        fn species_extinct(&mut self, species: SpeciesKey) {
            self.0.borrow_mut().species_extinct(species);
        }

        fn allocation_degenerate(&mut self, total_weight: f32) {
            self.0.borrow_mut().allocation_degenerate(total_weight);
        }

        fn end_generation(&mut self, population_size: usize, species_count: usize) {
            self.0.borrow_mut().end_generation(population_size, species_count);
        }
    }

    #[test]
    fn set_forwards_every_notification() {
        let first = Rc::new(RefCell::new(StatisticsReporter::new()));
        let second = Rc::new(RefCell::new(StatisticsReporter::new()));
        let mut reporters = ReporterSet::new();
        reporters.add(Shared(Rc::clone(&first)));
        reporters.add(LogReporter);
        reporters.add(Shared(Rc::clone(&second)));

        reporters.start_generation(3);
        reporters.species_stagnant(1, 4);
        reporters.average_adjusted_fitness(2.0);
        reporters.species_fitness(&[(2, 2.0)]);
        reporters.spawn_amounts(&[(2, 5), (3, 0)]);
        reporters.species_extinct(3);
        reporters.allocation_degenerate(0.0);
        reporters.end_generation(5, 1);

        let expected = GenerationStats {
            generation: 3,
            average_adjusted_fitness: Some(2.0),
            adjusted_fitness: Stats::from(std::iter::once(2.0)),
            spawn_amounts: vec![(2, 5), (3, 0)],
            stagnant: vec![1],
            extinct: vec![3],
            degenerate: true,
            population_size: 5,
            species_count: 1,
        };
        for reporter in [first, second] {
            let reporter = reporter.borrow();
            assert_eq!(reporter.len(), 1);
            assert_eq!(reporter.last(), Some(&expected));
        }
    }
}
