use oxispawn::ancestry::BoundedAncestry;
use oxispawn::reporting::{Reporter, StatisticsReporter, Stats};
use oxispawn::stagnation::{FitnessStagnation, StagnationConfig};
use oxispawn::{
    Genome, Population, Reproduction, ReproductionConfig, ReproductionError, Species, SpeciesKey,
    SpeciesSet,
};
use oxispawn_bits::{BitConfig, BitGenome};

use std::collections::BTreeMap;
use std::num::NonZeroUsize;

use env_logger::Env;
use log::{error, info};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use rayon::prelude::*;
use serde::Deserialize;

#[derive(Clone, Debug, Deserialize)]
struct DemoConfig {
    population_size: NonZeroUsize,
    generations: usize,
    runs: u64,
    seed: u64,
    distance_threshold: f32,
    reproduction: ReproductionConfig,
    stagnation: StagnationConfig,
    genome: BitConfig,
}

/// Assigns genomes to the first species whose
/// representative is within the distance threshold.
struct Speciator {
    threshold: f32,
    next_key: SpeciesKey,
    representatives: BTreeMap<SpeciesKey, BitGenome>,
}

impl Speciator {
    fn new(threshold: f32) -> Speciator {
        Speciator {
            threshold,
            next_key: 1,
            representatives: BTreeMap::new(),
        }
    }

    /// Partitions `population` into the species left over from
    /// the last reproduction, founding new ones where needed.
    fn speciate(
        &mut self,
        population: Population<BitGenome>,
        mut species: SpeciesSet<BitGenome>,
        generation: usize,
    ) -> SpeciesSet<BitGenome> {
        self.representatives.retain(|k, _| species.contains_key(k));
        species.retain(|k, _| self.representatives.contains_key(k));

        for (key, genome) in population {
            let closest = self
                .representatives
                .iter()
                .find(|(_, r)| r.distance(&genome) < self.threshold)
                .map(|(k, _)| *k);
            let species_key = match closest {
                Some(k) => k,
                None => {
                    let k = self.next_key;
                    self.next_key += 1;
                    self.representatives.insert(k, genome.clone());
                    k
                }
            };
            species
                .entry(species_key)
                .or_insert_with(|| Species::new(species_key, generation))
                .insert(key, genome);
        }

        species.retain(|_, s| !s.is_empty());
        self.representatives.retain(|k, _| species.contains_key(k));
        // Each representative moves to its closest current member.
        for (k, representative) in self.representatives.iter_mut() {
            let closest = species[k].members().min_by(|(ka, a), (kb, b)| {
                a.distance(representative)
                    .total_cmp(&b.distance(representative))
                    .then(ka.cmp(kb))
            });
            if let Some((_, genome)) = closest {
                *representative = genome.clone();
            }
        }
        species
    }
}

fn evaluate_onemax(population: &mut Population<BitGenome>) {
    population
        .par_iter_mut()
        .for_each(|(_, genome)| genome.set_fitness(genome.ones() as f32));
}

/// Evolves a population until a genome of all ones appears,
/// returning the generation in which it did.
fn run<P: Reporter + ?Sized>(
    config: &DemoConfig,
    seed: u64,
    reporter: &mut P,
    mut on_generation: impl FnMut(&P, &Population<BitGenome>),
) -> Result<Option<usize>, ReproductionError> {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let mut reproduction = Reproduction::<BitGenome, _, _>::new(
        config.reproduction.clone(),
        config.genome.clone(),
        FitnessStagnation::new(config.stagnation.clone()),
        BoundedAncestry::new(config.population_size.saturating_mul(
            // SAFETY: 4 is a valid NonZeroUsize.
            unsafe { NonZeroUsize::new_unchecked(4) },
        )),
    )?;
    let mut speciator = Speciator::new(config.distance_threshold);
    let target = config.genome.length.get() as f32;

    let mut population = reproduction.create_new(config.population_size, &mut rng)?;
    let mut species = SpeciesSet::new();
    for _ in 0..config.generations {
        evaluate_onemax(&mut population);
        if population.values().any(|g| g.fitness() >= target) {
            return Ok(Some(reproduction.generation()));
        }

        let speciated = speciator.speciate(population, species, reproduction.generation());
        let next = reproduction.reproduce(speciated, config.population_size, &mut rng, reporter)?;
        on_generation(&*reporter, &next.population);

        if next.population.is_empty() {
            info!("All species went extinct, restarting from scratch");
            population = reproduction.create_new(config.population_size, &mut rng)?;
            species = SpeciesSet::new();
        } else {
            population = next.population;
            species = next.species;
        }
    }
    Ok(None)
}

fn main() {
    env_logger::Builder::from_env(Env::default().default_filter_or("info")).init();

    let config: DemoConfig = match ron::from_str(include_str!("../onemax.ron")) {
        Ok(config) => config,
        Err(e) => {
            error!("Invalid configuration: {}", e);
            return;
        }
    };

    showcase(&config);
    stress_test(&config);
}

/// A single run, logging per-generation statistics.
fn showcase(config: &DemoConfig) {
    let mut statistics = StatisticsReporter::new();
    let result = run(config, config.seed, &mut statistics, |stats, population| {
        if let Some(record) = stats.last() {
            info!("{}", record);
        }
        if let Some(champion) = population.values().max_by_key(|g| g.ones()) {
            info!("Best offspring: {}", champion);
        }
    });
    match result {
        Ok(Some(generation)) => info!("Solved in generation {}", generation),
        Ok(None) => info!("Unsolved after {} generations", config.generations),
        Err(e) => error!("{}", e),
    }
}

fn stress_test(config: &DemoConfig) {
    let results: Vec<_> = (0..config.runs)
        .into_par_iter()
        .map(|i| run(config, config.seed.wrapping_add(i), &mut (), |_, _| {}))
        .collect();

    let errors = results.iter().filter(|r| r.is_err()).count();
    let generations: Vec<usize> = results.into_iter().filter_map(|r| r.ok().flatten()).collect();
    info!(
        "Successful run generation count {:?}, {}% failure rate over {} runs ({} errors)",
        Stats::from(generations.iter().map(|g| *g as f32)),
        (config.runs as usize - generations.len()) as f32 * 100.0 / config.runs as f32,
        config.runs,
        errors,
    );
}
