//! Generational reproduction for speciated, fitness-sharing
//! genetic algorithms, in the style of NeuroEvolution of
//! Augmenting Topologies (NEAT).
//!
//! Given a population partitioned into species, a [`Reproduction`]
//! decides which species survive [stagnation], how many offspring
//! each produces (by explicit fitness sharing), which genomes are
//! carried over as elites, and which are allowed to breed.
//!
//! Genome representation is left to the user via the [`Genome`]
//! trait, and speciation to whatever clustering scheme the caller
//! prefers. A bit-string genome is supplied by the
//! `oxispawn-bits` crate.
//!
//! [stagnation]: crate::stagnation
//!
//! # Example usage: OneMax with a single species
//! ```
//! use oxispawn::ancestry::AncestryLog;
//! use oxispawn::reporting::LogReporter;
//! use oxispawn::stagnation::{FitnessStagnation, StagnationConfig};
//! use oxispawn::{Genome, Reproduction, ReproductionConfig, Species, SpeciesSet};
//! use oxispawn_bits::{BitConfig, BitGenome};
//! use rand::SeedableRng;
//! use rand_chacha::ChaCha8Rng;
//! use std::num::NonZeroUsize;
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let mut rng = ChaCha8Rng::seed_from_u64(0);
//!     let pop_size = NonZeroUsize::new(50).unwrap();
//!
//!     let mut reproduction = Reproduction::<BitGenome, _>::new(
//!         ReproductionConfig {
//!             elitism: 1,
//!             survival_threshold: 0.2,
//!             ..ReproductionConfig::default()
//!         },
//!         BitConfig {
//!             length: NonZeroUsize::new(16).unwrap(),
//!             ..BitConfig::default()
//!         },
//!         FitnessStagnation::new(StagnationConfig::default()),
//!         AncestryLog::new(),
//!     )?;
//!
//!     let mut population = reproduction.create_new(pop_size, &mut rng)?;
//!     for _ in 0..20 {
//!         // Evaluate...
//!         for genome in population.values_mut() {
//!             genome.set_fitness(genome.ones() as f32);
//!         }
//!         // ...speciate (trivially, into a single species)...
//!         let mut species = Species::new(0, 0);
//!         for (key, genome) in population {
//!             species.insert(key, genome);
//!         }
//!         let species: SpeciesSet<_> = [(0, species)].into_iter().collect();
//!
//!         // ...and reproduce.
//!         population = reproduction
//!             .reproduce(species, pop_size, &mut rng, &mut LogReporter)?
//!             .population;
//!     }
//!
//!     assert_eq!(reproduction.generation(), 20);
//!     Ok(())
//! }
//! ```

pub mod ancestry;
mod genome;
mod indexer;
pub mod reporting;
mod reproduction;
mod species;
pub mod stagnation;

pub use genome::*;
pub use indexer::Indexer;
pub use reproduction::*;
pub use species::*;
