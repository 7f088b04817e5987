//! Reproduction turns a speciated population into
//! the next generation, using explicit fitness sharing
//! to allot offspring to each species and culling
//! stagnated species.
mod config;
mod errors;
mod offspring_factory;

pub use config::ReproductionConfig;
pub use errors::{ConfigError, ReproductionError};

use crate::ancestry::{AncestryLog, AncestrySink, Parents};
use crate::reporting::Reporter;
use crate::stagnation::{SpeciesStatus, StagnationTracker};
use crate::{Genome, GenomeKey, Indexer, Population, Species, SpeciesKey, SpeciesSet};
use offspring_factory::OffspringFactory;

use rand::Rng;

use std::num::NonZeroUsize;

/// Spawn factor of species with above-average adjusted fitness.
const GROWTH_FACTOR: f64 = 1.1;
/// Spawn factor of all other species.
const SHRINK_FACTOR: f64 = 0.9;

/// The result of reproducing a generation.
#[derive(Debug, Clone)]
pub struct Generation<G> {
    /// Elites and newly bred offspring.
    pub population: Population<G>,
    /// The species which survived, emptied of members
    /// so they can be repopulated by re-speciation.
    pub species: SpeciesSet<G>,
}

impl<G> Generation<G> {
    fn empty() -> Generation<G> {
        Generation {
            population: Population::new(),
            species: SpeciesSet::new(),
        }
    }
}

/// Handles creation of genomes, either from scratch
/// or by reproduction of a speciated population.
///
/// Every genome created is given a fresh key and
/// recorded in the ancestry sink `A`.
pub struct Reproduction<G: Genome, S, A = AncestryLog> {
    config: ReproductionConfig,
    genetic_config: G::Config,
    indexer: Indexer,
    stagnation: S,
    ancestry: A,
    generation: usize,
}

impl<G, S, A> Reproduction<G, S, A>
where
    G: Genome,
    S: StagnationTracker<G>,
    A: AncestrySink,
{
    /// Creates a new reproduction scheme.
    ///
    /// The type of `genetic_config` depends on the implementation
    /// of [`Genome`], and is effectively opaque to reproduction.
    ///
    /// # Errors
    /// Returns an error if `config` fails [validation].
    ///
    /// [`Genome`]: crate::Genome
    /// [validation]: ReproductionConfig::validate
    ///
    /// # Examples
    /// ```
    /// use oxispawn::ancestry::AncestryLog;
    /// use oxispawn::stagnation::{FitnessStagnation, StagnationConfig};
    /// use oxispawn::{Reproduction, ReproductionConfig};
    /// use oxispawn_bits::{BitConfig, BitGenome};
    ///
    /// let reproduction = Reproduction::<BitGenome, _>::new(
    ///     ReproductionConfig::default(),
    ///     BitConfig::default(),
    ///     FitnessStagnation::new(StagnationConfig::default()),
    ///     AncestryLog::new(),
    /// );
    /// assert!(reproduction.is_ok());
    /// ```
    pub fn new(
        config: ReproductionConfig,
        genetic_config: G::Config,
        stagnation: S,
        ancestry: A,
    ) -> Result<Reproduction<G, S, A>, ReproductionError> {
        config.validate()?;
        Ok(Reproduction {
            indexer: Indexer::new(config.first_genome_key),
            config,
            genetic_config,
            stagnation,
            ancestry,
            generation: 0,
        })
    }

    /// Creates `count` founder genomes from scratch.
    ///
    /// # Errors
    /// Returns an error if the genome key space is exhausted.
    pub fn create_new<R: Rng + ?Sized>(
        &mut self,
        count: NonZeroUsize,
        rng: &mut R,
    ) -> Result<Population<G>, ReproductionError> {
        let mut genomes = Population::new();
        for _ in 0..count.get() {
            let key = self.indexer.next_key()?;
            genomes.insert(key, G::create(key, &self.genetic_config, rng));
            self.ancestry.record(key, Parents::Founder);
        }
        Ok(genomes)
    }

    /// Produces the next generation from a speciated population
    /// of evaluated genomes, aiming for a total of `pop_size` genomes.
    ///
    /// Stagnated species are culled. Each remaining species is
    /// allotted offspring in proportion to its size, grown or
    /// shrunk depending on whether its adjusted fitness is above
    /// the average. Species keep their [elite] and breed from their
    /// [top performers]; species allotted no offspring go extinct.
    ///
    /// If no species remain, or offspring cannot be allotted,
    /// the returned generation is empty.
    ///
    /// # Errors
    /// Returns an error if a genome's fitness is NaN, or
    /// if the genome key space is exhausted.
    ///
    /// [elite]: ReproductionConfig::elitism
    /// [top performers]: ReproductionConfig::survival_threshold
    pub fn reproduce<R, P>(
        &mut self,
        species: SpeciesSet<G>,
        pop_size: NonZeroUsize,
        rng: &mut R,
        reporter: &mut P,
    ) -> Result<Generation<G>, ReproductionError>
    where
        R: Rng + ?Sized,
        P: Reporter + ?Sized,
    {
        reporter.start_generation(self.generation);
        self.generation += 1;

        let remaining = self.cull_stagnant(species, reporter)?;
        if remaining.is_empty() {
            reporter.end_generation(0, 0);
            return Ok(Generation::empty());
        }

        let species_fitness: Vec<(SpeciesKey, f32)> =
            remaining.iter().map(|(f, s)| (s.key(), *f)).collect();
        let average_fitness =
            species_fitness.iter().map(|(_, f)| f).sum::<f32>() / species_fitness.len() as f32;
        reporter.average_adjusted_fitness(average_fitness);

        let spawn_weights: Vec<f64> = remaining
            .iter()
            .map(|(f, s)| spawn_weight(s.len(), *f, average_fitness))
            .collect();
        let spawn_amounts = match normalize_spawn(&spawn_weights, pop_size) {
            Some(amounts) => amounts,
            None => {
                reporter.allocation_degenerate(spawn_weights.iter().sum::<f64>() as f32);
                reporter.end_generation(0, 0);
                return Ok(Generation::empty());
            }
        };
        reporter.spawn_amounts(
            &remaining
                .iter()
                .map(|(_, s)| s.key())
                .zip(spawn_amounts.iter().copied())
                .collect::<Vec<_>>(),
        );
        reporter.species_fitness(&species_fitness);

        let mut next = Generation::empty();
        let mut factory = OffspringFactory::new(
            &self.config,
            &self.genetic_config,
            &mut self.indexer,
            &mut self.ancestry,
        );
        for (spawn, (_, mut species)) in spawn_amounts.into_iter().zip(remaining) {
            // Each species always gets to retain its elites.
            let spawn = spawn.max(self.config.elitism);
            if spawn == 0 {
                reporter.species_extinct(species.key());
                continue;
            }
            let members = species.take_members();
            factory.generate_offspring(species.key(), members, spawn, &mut next.population, rng)?;
            next.species.insert(species.key(), species);
        }

        reporter.end_generation(next.population.len(), next.species.len());
        Ok(next)
    }

    /// Submits the species to stagnation tracking, returning
    /// the active, non-empty species with their adjusted fitness.
    fn cull_stagnant<P: Reporter + ?Sized>(
        &mut self,
        species: SpeciesSet<G>,
        reporter: &mut P,
    ) -> Result<Vec<(f32, Species<G>)>, ReproductionError> {
        let mut remaining = vec![];
        for status in self.stagnation.classify(species) {
            match status {
                SpeciesStatus::Stagnant(s) => reporter.species_stagnant(s.key(), s.len()),
                // Nothing to retain or breed from.
                SpeciesStatus::Active(s) if s.is_empty() => reporter.species_extinct(s.key()),
                SpeciesStatus::Active(s) => remaining.push((adjusted_fitness(&s)?, s)),
            }
        }
        Ok(remaining)
    }

    /// Returns the reproduction configuration.
    pub fn config(&self) -> &ReproductionConfig {
        &self.config
    }

    /// Returns the configuration passed to genome operations.
    pub fn genetic_config(&self) -> &G::Config {
        &self.genetic_config
    }

    /// Returns the lineage record.
    pub fn ancestry(&self) -> &A {
        &self.ancestry
    }

    /// Returns the stagnation tracker.
    pub fn stagnation(&self) -> &S {
        &self.stagnation
    }

    /// Returns the number of generations reproduced so far.
    pub fn generation(&self) -> usize {
        self.generation
    }

    /// Returns the key the next created genome will receive.
    pub fn next_genome_key(&self) -> GenomeKey {
        self.indexer.peek()
    }
}

/// Returns the species' explicitly shared fitness:
/// the sum of member fitnesses, each divided by the
/// species size, divided again by the species size.
///
/// Members are summed in key order, so the result does
/// not depend on hash iteration order.
fn adjusted_fitness<G: Genome>(species: &Species<G>) -> Result<f32, ReproductionError> {
    let size = species.len() as f32;
    let mut members: Vec<_> = species.members().collect();
    members.sort_unstable_by_key(|(k, _)| *k);

    let mut shared_sum = 0.0;
    for (key, genome) in members {
        let fitness = genome.fitness();
        if fitness.is_nan() {
            return Err(ReproductionError::InvalidFitness {
                species: species.key(),
                genome: key,
                fitness,
            });
        }
        shared_sum += fitness / size;
    }
    Ok(shared_sum / size)
}

/// Unnormalized offspring count of a species.
/// Computed in `f64`, as rounding ties after normalization
/// depend on the precision.
fn spawn_weight(member_count: usize, adjusted_fitness: f32, average_fitness: f32) -> f64 {
    if adjusted_fitness > average_fitness {
        member_count as f64 * GROWTH_FACTOR
    } else {
        member_count as f64 * SHRINK_FACTOR
    }
}

/// Scales the weights so they sum to `pop_size`, and rounds
/// each one independently (half to even).
///
/// Returns `None` if the weights sum to zero, or their
/// sum is not finite. Weights are positive multiples of
/// non-zero member counts, so [`Reproduction::reproduce`]
/// never takes this path: the check only guards the division.
fn normalize_spawn(weights: &[f64], pop_size: NonZeroUsize) -> Option<Vec<usize>> {
    let total: f64 = weights.iter().sum();
    if !total.is_finite() || total <= 0.0 {
        return None;
    }
    let norm = pop_size.get() as f64 / total;
    Some(
        weights
            .iter()
            .map(|w| (w * norm).round_ties_even() as usize)
            .collect(),
    )
}
