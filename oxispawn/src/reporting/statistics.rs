use super::Reporter;
use crate::SpeciesKey;

use serde::{Deserialize, Serialize};

use std::fmt;

/// A struct for reporting basic statistical data.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Stats {
    pub maximum: f32,
    pub minimum: f32,
    pub mean: f32,
    pub median: f32,
}

impl Stats {
    /// Returns statistics about numbers in a sequence,
    /// or `None` if the sequence is empty.
    ///
    /// # Examples
    /// ```
    /// use oxispawn::reporting::Stats;
    ///
    /// let stats = Stats::from([-2.0, -1.0, 0.5, 1.0, 1.5].iter().copied()).unwrap();
    /// assert_eq!(stats.maximum, 1.5);
    /// assert_eq!(stats.minimum, -2.0);
    /// assert_eq!(stats.mean, 0.0);
    /// assert_eq!(stats.median, 0.5);
    ///
    /// assert!(Stats::from(std::iter::empty()).is_none());
    /// ```
    pub fn from(data: impl Iterator<Item = f32>) -> Option<Stats> {
        let mut data: Vec<f32> = data.collect();
        if data.is_empty() {
            return None;
        }
        data.sort_unstable_by(f32::total_cmp);
        let mid = data.len() / 2;
        let median = if data.len() % 2 == 0 {
            (data[mid - 1] + data[mid]) / 2.0
        } else {
            data[mid]
        };
        Some(Stats {
            maximum: data[data.len() - 1],
            minimum: data[0],
            mean: data.iter().sum::<f32>() / data.len() as f32,
            median,
        })
    }
}

/// A summary of one reproduction step.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct GenerationStats {
    pub generation: usize,
    pub average_adjusted_fitness: Option<f32>,
    pub adjusted_fitness: Option<Stats>,
    pub spawn_amounts: Vec<(SpeciesKey, usize)>,
    pub stagnant: Vec<SpeciesKey>,
    pub extinct: Vec<SpeciesKey>,
    pub degenerate: bool,
    pub population_size: usize,
    pub species_count: usize,
}

impl fmt::Display for GenerationStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "GenerationStats {{\n\
            \tgeneration: {:?}\n\
            \taverage_adjusted_fitness: {:?}\n\
            \tadjusted_fitness: {:?}\n\
            \tspawn_amounts: {:?}\n\
            \tstagnant: {:?}\n\
            \textinct: {:?}\n\
            \tdegenerate: {:?}\n\
            \tpopulation_size: {:?}\n\
            \tspecies_count: {:?}\n\
            }}",
            &self.generation,
            &self.average_adjusted_fitness,
            &self.adjusted_fitness,
            &self.spawn_amounts,
            &self.stagnant,
            &self.extinct,
            &self.degenerate,
            &self.population_size,
            &self.species_count,
        )
    }
}

/// Records a [`GenerationStats`] for every
/// reproduced generation.
///
/// # Examples
/// ```
/// use oxispawn::reporting::{Reporter, StatisticsReporter};
///
/// let mut statistics = StatisticsReporter::new();
/// statistics.start_generation(0);
/// statistics.spawn_amounts(&[(1, 4), (2, 2)]);
/// statistics.end_generation(6, 2);
///
/// let last = statistics.last().unwrap();
/// assert_eq!(last.population_size, 6);
/// assert_eq!(last.spawn_amounts, [(1, 4), (2, 2)]);
/// ```
#[derive(Clone, Debug, Default)]
pub struct StatisticsReporter {
    records: Vec<GenerationStats>,
}

impl StatisticsReporter {
    pub fn new() -> StatisticsReporter {
        StatisticsReporter::default()
    }

    /// Iterate over all recorded generations.
    pub fn iter(&self) -> impl Iterator<Item = &GenerationStats> {
        self.records.iter()
    }

    /// Returns the most recently recorded generation.
    pub fn last(&self) -> Option<&GenerationStats> {
        self.records.last()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    fn current(&mut self) -> &mut GenerationStats {
        if self.records.is_empty() {
            self.records.push(GenerationStats::default());
        }
        let last = self.records.len() - 1;
        &mut self.records[last]
    }
}

impl Reporter for StatisticsReporter {
    fn start_generation(&mut self, generation: usize) {
        self.records.push(GenerationStats {
            generation,
            ..GenerationStats::default()
        });
    }

    fn species_stagnant(&mut self, species: SpeciesKey, _size: usize) {
        self.current().stagnant.push(species);
    }

    fn average_adjusted_fitness(&mut self, fitness: f32) {
        self.current().average_adjusted_fitness = Some(fitness);
    }

    fn species_fitness(&mut self, fitness: &[(SpeciesKey, f32)]) {
        self.current().adjusted_fitness = Stats::from(fitness.iter().map(|(_, f)| *f));
    }

    fn spawn_amounts(&mut self, amounts: &[(SpeciesKey, usize)]) {
        self.current().spawn_amounts = amounts.to_vec();
    }

    fn species_extinct(&mut self, species: SpeciesKey) {
        self.current().extinct.push(species);
    }

    fn allocation_degenerate(&mut self, _total_weight: f32) {
        self.current().degenerate = true;
    }

    fn end_generation(&mut self, population_size: usize, species_count: usize) {
        let current = self.current();
        current.population_size = population_size;
        current.species_count = species_count;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn even_length_median_is_averaged() {
        let stats = Stats::from([4.0, 1.0, 3.0, 2.0].iter().copied()).unwrap();
        assert_eq!(stats.median, 2.5);
        assert_eq!(stats.mean, 2.5);
    }

    #[test]
    fn notifications_without_start_open_a_record() {
        let mut statistics = StatisticsReporter::new();
        statistics.species_stagnant(3, 10);
        statistics.allocation_degenerate(0.0);
        assert_eq!(statistics.len(), 1);
        let record = statistics.last().unwrap();
        assert_eq!(record.stagnant, [3]);
        assert!(record.degenerate);
    }
}
