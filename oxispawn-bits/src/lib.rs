//! # OxiSpawn-Bits
//! A bit-string implementation of the [`OxiSpawn` crate](../oxispawn/index.html)'s `Genome` trait.
//!
//! Provides a [`BitGenome`] type usable with an `OxiSpawn` `Reproduction`,
//! reproducing by uniform crossover and per-bit flip mutation, along
//! with a [`distance`] measure suitable for threshold-based speciation.
//!
//! [`distance`]: BitGenome::distance
//!
//! # Example usage
//! ```
//! use oxispawn::Genome;
//! use oxispawn_bits::{BitConfig, BitGenome};
//! use rand::SeedableRng;
//! use rand_chacha::ChaCha8Rng;
//!
//! let mut rng = ChaCha8Rng::seed_from_u64(0);
//! let config = BitConfig::default();
//!
//! let mother = BitGenome::create(1, &config, &mut rng);
//! let father = BitGenome::create(2, &config, &mut rng);
//! let mut child = mother.crossover(&father, 3, &config, &mut rng);
//! child.mutate(&config, &mut rng);
//!
//! assert_eq!(child.len(), config.length.get());
//! assert!(child.distance(&mother) <= 1.0);
//! ```

mod config;
mod genome;

pub use config::BitConfig;
pub use genome::BitGenome;
